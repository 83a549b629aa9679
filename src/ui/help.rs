//! Help Overlay
//!
//! Shows keyboard shortcuts and help information.

use super::centered_rect;
use crate::app::App;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("j/k, ↑/↓", "Move up/down"),
            ("gg / G", "Go to top / bottom"),
            ("[/], ←/→", "Previous/next page"),
            ("Tab/S-Tab", "Next/previous resource"),
            (":", "Pick resource"),
        ],
    ),
    (
        "Views",
        &[
            ("Enter", "View record details"),
            ("Esc/q", "Back from details"),
            ("R", "Reload list"),
            ("r", "Retry a failed detail load"),
        ],
    ),
    (
        "Filtering",
        &[
            ("/", "Search name and description"),
            ("c", "Filter by category"),
            ("Esc", "Clear search, then selection"),
        ],
    ),
    (
        "Selection",
        &[
            ("Space", "Toggle row and move down"),
            ("a", "Select every row on the page"),
            ("x", "Clear selection"),
        ],
    ),
    (
        "Editing",
        &[
            ("n / e", "New record / edit record"),
            ("D, Del", "Delete record or selection"),
            ("Ctrl+s", "Save form"),
            ("←/→", "Pick relation in form"),
            ("Enter", "Choose several related records"),
        ],
    ),
];

pub fn render(f: &mut Frame, _app: &App) {
    let area = f.area();
    let popup_area = centered_rect(70, 80, area);

    f.render_widget(Clear, popup_area);

    let mut help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for (title, keys) in SECTIONS {
        help_text.push(Line::from(Span::styled(
            *title,
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for (key, action) in keys.iter() {
            help_text.push(Line::from(vec![
                Span::styled(format!("  {:<12}", key), Style::default().fg(Color::Yellow)),
                Span::raw(*action),
            ]));
        }
        help_text.push(Line::from(""));
    }

    help_text.push(Line::from(Span::styled(
        "Press ? or Esc to close",
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Help ")
        .title_alignment(Alignment::Center);

    let paragraph = Paragraph::new(help_text).block(block);
    f.render_widget(paragraph, popup_area);
}
