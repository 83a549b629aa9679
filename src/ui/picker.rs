//! Picker Overlay
//!
//! Searchable selection list for categories, resources, and the relation
//! lists of a form.

use super::centered_rect;
use crate::app::{App, PickerKind};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let Some(picker) = &app.picker else {
        return;
    };

    let popup_area = centered_rect(60, 70, area);
    f.render_widget(Clear, popup_area);

    let multi = picker.kind == PickerKind::Relations;

    // Title with count
    let title = if multi {
        format!(
            " {} [{}/{}] {}✓ ",
            picker.title,
            picker.filtered.len(),
            picker.options.len(),
            picker.checked.len()
        )
    } else {
        format!(
            " {} [{}/{}] ",
            picker.title,
            picker.filtered.len(),
            picker.options.len()
        )
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    // Split inner into: search box, help text, separator, list
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Search input
            Constraint::Length(1), // Help text
            Constraint::Length(1), // Separator
            Constraint::Min(1),    // Option list
        ])
        .split(inner);

    // Search input with cursor
    let search_line = Line::from(vec![
        Span::styled(" / ", Style::default().fg(Color::Yellow)),
        Span::styled(&picker.search_text, Style::default().fg(Color::White)),
        Span::styled("_", Style::default().fg(Color::Yellow)),
    ]);
    f.render_widget(Paragraph::new(search_line), chunks[0]);

    // Help text
    let help = Line::from(vec![
        Span::styled(" Type to search | ", Style::default().fg(Color::DarkGray)),
        Span::styled("↑↓", Style::default().fg(Color::Yellow)),
        Span::styled(":nav ", Style::default().fg(Color::DarkGray)),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::styled(
            if multi { ":toggle " } else { ":select " },
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::styled(
            if multi { ":done" } else { ":cancel" },
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(Paragraph::new(help), chunks[1]);

    // Separator line
    let sep = "─".repeat(chunks[2].width as usize);
    f.render_widget(
        Paragraph::new(sep).style(Style::default().fg(Color::DarkGray)),
        chunks[2],
    );

    if picker.filtered.is_empty() {
        let msg = Paragraph::new("No matches")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(msg, chunks[3]);
        return;
    }

    // Mark the options in effect with a checkmark
    let items: Vec<ListItem> = picker
        .filtered
        .iter()
        .map(|option| {
            let current = picker.is_marked(&option.id);
            let style = if current {
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let prefix = if current { "✓ " } else { "  " };
            ListItem::new(Span::styled(format!("{}{}", prefix, option.label), style))
        })
        .collect();

    let list = List::new(items).highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = ListState::default();
    state.select(Some(picker.selected));

    f.render_stateful_widget(list, chunks[3], &mut state);
}
