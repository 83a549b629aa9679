//! Header Component
//!
//! Displays backend, resource, and filter information.

use crate::app::App;
use crate::VERSION;
use catadmin::store::CategoryFilter;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" catadmin v{} ", VERSION),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    f.render_widget(block, area);

    // Split into rows
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    // Row 1: Backend and auth
    let config = app.client.config();
    let backend = Line::from(vec![
        Span::styled(" Backend: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            config.base_url.as_str(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("Auth: ", Style::default().fg(Color::DarkGray)),
        if config.token.is_some() {
            Span::styled("token", Style::default().fg(Color::Green))
        } else {
            Span::styled("none", Style::default().fg(Color::DarkGray))
        },
    ]);
    f.render_widget(Paragraph::new(backend), rows[0]);

    // Row 2: Current resource, count and category filter
    let schema = app.current_resource();
    let list = &app.manager.list;
    let mut resource_info = vec![
        Span::styled(" Resource: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            &schema.display_name,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("Count: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("{}", list.filtered_count()),
            Style::default().fg(Color::White),
        ),
        if list.items().len() != list.filtered_count() {
            Span::styled(
                format!(" (filtered from {})", list.items().len()),
                Style::default().fg(Color::DarkGray),
            )
        } else {
            Span::raw("")
        },
    ];
    if schema.has_category_filter() {
        let all = matches!(list.filter().category, CategoryFilter::All);
        let label = app.category_filter_label();
        resource_info.push(Span::raw("  "));
        resource_info.push(Span::styled("Category: ", Style::default().fg(Color::DarkGray)));
        resource_info.push(Span::styled(
            label,
            Style::default()
                .fg(if all { Color::Yellow } else { Color::Green })
                .add_modifier(Modifier::BOLD),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(resource_info)), rows[1]);

    // Row 3: Help hint
    let help_line = Line::from(vec![
        Span::styled(
            " ?:help  ::resource  /:filter  c:category  n:new  D:delete  q:quit",
            Style::default().fg(Color::DarkGray),
        ),
        if app.readonly {
            Span::styled(
                "  [READ-ONLY]",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::raw("")
        },
    ]);
    f.render_widget(Paragraph::new(help_line), rows[2]);
}
