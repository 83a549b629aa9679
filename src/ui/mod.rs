//! Terminal User Interface rendering module
//!
//! This module handles all UI rendering for catadmin using the ratatui
//! framework. The list view is a paginated table of the current resource;
//! detail and form views replace it, dialogs and selectors overlay it.
//!
//! # Architecture
//!
//! - [`splash`] - Startup splash screen
//! - `header` - Header bar with backend and resource info
//! - `help` - Help overlay showing keybindings
//! - `dialog` - Confirmation and warning dialogs
//! - `picker` - Category and resource selector
//! - `form` - Create/edit form
//!
//! # JSON Highlighting
//!
//! The detail view shows the raw record with syntax highlighting:
//! - Keys in cyan
//! - Strings in green
//! - Numbers in light blue
//! - Booleans in magenta
//! - Null values in dark gray

mod dialog;
mod form;
mod header;
mod help;
mod picker;
pub mod splash;

use crate::app::{App, Mode};
use catadmin::resource::{ColumnDef, FieldKind, Record, Ref};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Scrollbar, ScrollbarOrientation, ScrollbarState, Table, TableState},
    Frame,
};

pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Header (multi-line)
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Footer/status
        ])
        .split(f.area());

    // Header - multi-line with context info
    header::render(f, app, chunks[0]);

    // Main content - depends on which view is open; the form stays under its overlays
    if app.editor.is_some() {
        form::render(f, app, chunks[1]);
    } else if app.detail.is_some() {
        render_detail_view(f, app, chunks[1]);
    } else {
        render_main_content(f, app, chunks[1]);
    }

    // Footer
    render_status(f, app, chunks[2]);

    // Overlays
    match app.mode {
        Mode::Help => {
            help::render(f, app);
        },
        Mode::Confirm | Mode::Warning => {
            dialog::render(f, app);
        },
        Mode::Picker => {
            picker::render(f, app, f.area());
        },
        _ => {},
    }
}

fn render_main_content(f: &mut Frame, app: &App, area: Rect) {
    // If filter is active or has text, show filter input above table
    let show_filter = app.filter_active || !app.filter_text.is_empty();

    if show_filter {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(area);

        render_filter_bar(f, app, chunks[0]);
        render_table(f, app, chunks[1]);
    } else {
        render_table(f, app, area);
    }
}

fn render_filter_bar(f: &mut Frame, app: &App, area: Rect) {
    let cursor_style = if app.filter_active {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let filter_display = if app.filter_active {
        format!("/{}_", app.filter_text)
    } else {
        format!("/{}", app.filter_text)
    };

    let paragraph = Paragraph::new(Line::from(vec![Span::styled(filter_display, cursor_style)]));
    f.render_widget(paragraph, area);
}

/// Render the current page of the resource table
fn render_table(f: &mut Frame, app: &App, area: Rect) {
    let schema = app.current_resource();
    let list = &app.manager.list;

    // Title with count, selection, and pagination
    let title = {
        let count = list.filtered_count();
        let total = list.items().len();
        let selection_count = list.selection().len();

        let selection_info = if selection_count > 0 {
            format!(" [{}✓]", selection_count)
        } else {
            String::new()
        };

        let page_info = format!(" pg.{}/{}", list.page(), list.total_pages());

        if count == total {
            format!(" {}[{}]{}{} ", schema.display_name, count, selection_info, page_info)
        } else {
            format!(
                " {}[{}/{}]{}{} ",
                schema.display_name, count, total, selection_info, page_info
            )
        }
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let page_items = list.page_items();
    if page_items.is_empty() {
        let message = if list.loading {
            "Loading..."
        } else if list.items().is_empty() {
            "No records"
        } else {
            "No records match the filter"
        };
        let msg = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(msg, inner_area);
        return;
    }

    let has_selection = !list.selection().is_empty();
    let header_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let mut header_cells: Vec<Cell> = Vec::new();
    if has_selection {
        header_cells.push(Cell::from(" ").style(header_style));
    }
    header_cells.extend(
        schema
            .columns
            .iter()
            .map(|col| Cell::from(format!(" {}", col.header)).style(header_style)),
    );
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = page_items
        .iter()
        .map(|record| {
            let is_selected = record
                .id(schema)
                .is_some_and(|id| list.is_selected(&id));

            let mut cells: Vec<Cell> = Vec::new();

            if has_selection {
                let indicator = if is_selected { "●" } else { " " };
                let style = if is_selected {
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                cells.push(Cell::from(format!(" {}", indicator)).style(style));
            }

            cells.extend(schema.columns.iter().map(|col| {
                let value = cell_text(app, record, col);
                let style = if is_selected {
                    Style::default().bg(Color::Rgb(40, 60, 40))
                } else {
                    Style::default()
                };
                Cell::from(format!(" {}", truncate_string(&value, 38))).style(style)
            }));

            Row::new(cells)
        })
        .collect();

    let mut widths: Vec<Constraint> = Vec::new();
    if has_selection {
        widths.push(Constraint::Length(3));
    }
    widths.extend(schema.columns.iter().map(|col| Constraint::Percentage(col.width)));

    let table = Table::new(rows, widths).header(header).row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = TableState::default();
    state.select(Some(app.selected));

    f.render_stateful_widget(table, inner_area, &mut state);
}

/// Cell text; bare relation ids are shown with their loaded label
fn cell_text(app: &App, record: &Record, col: &ColumnDef) -> String {
    let schema = app.current_resource();
    if let Some(field) = schema.field(&col.json_path) {
        if field.kind == FieldKind::Relation {
            if let (Some(Ref::Bare(id)), Some(source)) = (
                record.get(&field.name).and_then(Ref::from_value),
                field.source.as_deref(),
            ) {
                if let Some(label) = app.manager.relation_label(source, &id) {
                    return label.to_string();
                }
            }
        }
    }
    record.column_value(schema, col)
}

/// Truncate string for display (Unicode-safe)
fn truncate_string(s: &str, max_len: usize) -> String {
    let s = s.replace('\n', " ");
    let char_count = s.chars().count();
    if char_count > max_len {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    } else {
        s
    }
}

fn render_detail_view(f: &mut Frame, app: &App, area: Rect) {
    let Some(detail) = &app.detail else {
        return;
    };
    let schema = app.current_resource();

    let title = format!(" {} Details ", schema.display_name);
    let border_color = if detail.error.is_some() {
        Color::Red
    } else {
        Color::Cyan
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(
            title,
            Style::default()
                .fg(border_color)
                .add_modifier(Modifier::BOLD),
        ));

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    // Error state with retry/back actions
    if let Some(error) = &detail.error {
        let content = vec![
            Line::from(""),
            Line::from(Span::styled(
                error.as_str(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("{} id: {}", schema.item_name, detail.id),
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("r", Style::default().fg(Color::Yellow)),
                Span::styled(": retry   ", Style::default().fg(Color::DarkGray)),
                Span::styled("Esc", Style::default().fg(Color::Yellow)),
                Span::styled(": back", Style::default().fg(Color::DarkGray)),
            ]),
        ];
        f.render_widget(Paragraph::new(content).alignment(Alignment::Center), inner_area);
        return;
    }

    let Some(record) = &detail.record else {
        let msg = Paragraph::new("Loading...")
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center);
        f.render_widget(msg, inner_area);
        return;
    };

    let mut lines: Vec<Line> = Vec::new();
    for field in &schema.fields {
        let mut value = record.field_display(&field.name, field.kind);
        if field.kind == FieldKind::Relation {
            if let (Some(Ref::Bare(id)), Some(source)) = (
                record.get(&field.name).and_then(Ref::from_value),
                field.source.as_deref(),
            ) {
                if let Some(label) = app.manager.relation_label(source, &id) {
                    value = label.to_string();
                }
            }
        }
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {:<14}", field.label),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw(value.replace('\n', " ")),
        ]));
    }

    let images = record.image_paths(schema);
    if !images.is_empty() {
        lines.push(Line::from(vec![
            Span::styled(format!(" {:<14}", "Images"), Style::default().fg(Color::Yellow)),
            Span::raw(images.join(", ")),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Raw",
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )));
    let json = serde_json::to_string_pretty(record.value()).unwrap_or_default();
    lines.extend(json.lines().map(highlight_json_line));

    let total_lines = lines.len();
    let visible_lines = inner_area.height as usize;
    let max_scroll = total_lines.saturating_sub(visible_lines);
    let scroll = detail.scroll.min(max_scroll);

    let paragraph = Paragraph::new(lines).scroll((scroll as u16, 0));
    f.render_widget(paragraph, inner_area);

    // Render scrollbar if content exceeds visible area
    if total_lines > visible_lines {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));
        let mut scrollbar_state = ScrollbarState::new(max_scroll + visible_lines).position(scroll);
        f.render_stateful_widget(scrollbar, inner_area, &mut scrollbar_state);
    }
}

/// Apply JSON syntax highlighting to a single line
fn highlight_json_line(line: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut chars = line.chars().peekable();
    let mut current = String::new();
    let mut is_key = true;

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if !current.is_empty() {
                    spans.push(Span::raw(current.clone()));
                    current.clear();
                }

                let mut string_content = String::from("\"");
                while let Some(&next_c) = chars.peek() {
                    chars.next();
                    string_content.push(next_c);
                    if next_c == '"' {
                        break;
                    }
                    if next_c == '\\' {
                        if let Some(&escaped) = chars.peek() {
                            chars.next();
                            string_content.push(escaped);
                        }
                    }
                }

                let style = if is_key {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default().fg(Color::Green)
                };
                spans.push(Span::styled(string_content, style));
            },
            ':' => {
                current.push(c);
                spans.push(Span::styled(
                    current.clone(),
                    Style::default().fg(Color::White),
                ));
                current.clear();
                is_key = false;
            },
            ',' => {
                if !current.is_empty() {
                    let style = get_json_value_style(&current);
                    spans.push(Span::styled(current.clone(), style));
                    current.clear();
                }
                spans.push(Span::styled(
                    ",".to_string(),
                    Style::default().fg(Color::White),
                ));
                is_key = true;
            },
            '{' | '}' | '[' | ']' => {
                if !current.is_empty() {
                    let style = get_json_value_style(&current);
                    spans.push(Span::styled(current.clone(), style));
                    current.clear();
                }
                spans.push(Span::styled(
                    c.to_string(),
                    Style::default().fg(Color::Yellow),
                ));
                if c == '{' || c == '[' {
                    is_key = c == '{';
                }
            },
            ' ' | '\t' => {
                if !current.is_empty() {
                    let style = get_json_value_style(&current);
                    spans.push(Span::styled(current.clone(), style));
                    current.clear();
                }
                spans.push(Span::raw(c.to_string()));
            },
            _ => {
                current.push(c);
            },
        }
    }

    if !current.is_empty() {
        let style = get_json_value_style(&current);
        spans.push(Span::styled(current, style));
    }

    Line::from(spans)
}

/// Get style for JSON values (numbers, booleans, null)
fn get_json_value_style(value: &str) -> Style {
    let trimmed = value.trim();
    if trimmed == "null" {
        Style::default().fg(Color::DarkGray)
    } else if trimmed == "true" || trimmed == "false" {
        Style::default().fg(Color::Magenta)
    } else if trimmed.parse::<f64>().is_ok() {
        Style::default().fg(Color::LightBlue)
    } else {
        Style::default().fg(Color::White)
    }
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let schema = app.current_resource();
    let crumb_display = match (&app.detail, app.mode) {
        _ if app.editor.is_some() => format!("{} > form", schema.key),
        (Some(detail), _) => format!("{} > {}", schema.key, detail.id),
        (None, _) => schema.key.clone(),
    };

    let status_text = if let Some(err) = app.error_message() {
        format!("Error: {}", err)
    } else if app.loading() {
        "Loading...".to_string()
    } else if let Some(msg) = &app.status_message {
        msg.clone()
    } else if app.mode == Mode::Detail {
        "j/k: scroll | e: edit | D: delete | r: reload | Esc: back".to_string()
    } else if app.mode == Mode::Form {
        "Tab/↑↓: field | ←/→: pick relation | Enter: pick list | Ctrl+s: save | Esc: cancel"
            .to_string()
    } else if app.filter_active {
        "Type to filter | Enter: apply | Esc: clear".to_string()
    } else {
        "[/]: page | Space: select | n: new | e: edit | D: delete".to_string()
    };

    let style = if app.error_message().is_some() {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else if app.loading() {
        Style::default().fg(Color::Yellow)
    } else if app.status_message.is_some() {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let crumb = Line::from(vec![
        Span::styled(
            format!("<{}>", crumb_display),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        Span::raw(" "),
        Span::styled(status_text, style),
    ]);

    f.render_widget(Paragraph::new(crumb), area);
}

/// Centered popup area taking the given percentages of `r`
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("a very long bootcamp name", 10), "a very ...");
        assert_eq!(truncate_string("two\nlines", 20), "two lines");
    }

    #[test]
    fn test_json_value_styles() {
        assert_eq!(get_json_value_style("null"), Style::default().fg(Color::DarkGray));
        assert_eq!(get_json_value_style("12.5"), Style::default().fg(Color::LightBlue));
        assert_eq!(get_json_value_style("true"), Style::default().fg(Color::Magenta));
    }
}
