//! Form View
//!
//! Create/edit form with one row per field and inline validation issues.

use crate::app::App;
use crate::editor::{EditorRow, FormEditor};
use catadmin::form::FieldValue;
use catadmin::resource::FieldKind;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const LABEL_WIDTH: usize = 16;

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let Some(editor) = &app.editor else {
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            editor.title(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(if editor.error.is_some() { 2 } else { 0 }),
            Constraint::Min(1),
        ])
        .split(inner);

    if let Some(error) = &editor.error {
        let msg = Paragraph::new(Span::styled(
            format!(" {}", error),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
        .wrap(Wrap { trim: true });
        f.render_widget(msg, chunks[0]);
    }

    let mut lines: Vec<Line> = Vec::new();
    let mut cursor_line = 0;
    for (index, row) in editor.rows().into_iter().enumerate() {
        let current = index == editor.row;
        if current {
            cursor_line = lines.len();
        }
        lines.extend(row_lines(app, editor, row, current));
    }

    let existing = editor.form.existing_images();
    if !existing.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {:<width$}", "Current images", width = LABEL_WIDTH),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(existing.join(", "), Style::default().fg(Color::DarkGray)),
        ]));
    }

    // Keep the cursor row in view
    let visible = chunks[1].height as usize;
    let scroll = cursor_line.saturating_sub(visible.saturating_sub(3));

    f.render_widget(Paragraph::new(lines).scroll((scroll as u16, 0)), chunks[1]);
}

fn row_lines(app: &App, editor: &FormEditor, row: EditorRow, current: bool) -> Vec<Line<'static>> {
    let (label, required, kind) = match row {
        EditorRow::Field(def) => (def.label.clone(), def.required, Some(def.kind)),
        EditorRow::Files => {
            let multiple = editor
                .form
                .schema()
                .file_field
                .as_ref()
                .is_some_and(|f| f.multiple);
            let label = if multiple { "Image files" } else { "Image file" };
            (label.to_string(), false, None)
        }
    };

    let marker = if current { "▶" } else { " " };
    let label_text = format!(
        "{}{:<width$}",
        marker,
        if required { format!("{} *", label) } else { label },
        width = LABEL_WIDTH
    );
    let label_style = if current {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Yellow)
    };

    let raw = if current {
        editor.input.clone()
    } else {
        editor.display_value(row)
    };

    let value = match (row, kind) {
        (EditorRow::Field(def), Some(FieldKind::Relation)) => {
            let source = def.source.as_deref().unwrap_or_default();
            let shown = if raw.is_empty() {
                "(none)".to_string()
            } else {
                app.manager
                    .relation_label(source, &raw)
                    .map(str::to_string)
                    .unwrap_or(raw)
            };
            if current {
                format!("◀ {} ▶", shown)
            } else {
                shown
            }
        }
        (EditorRow::Field(def), Some(FieldKind::RelationList)) => {
            let source = def.source.as_deref().unwrap_or_default();
            let labels: Vec<&str> = match editor.form.value(&def.name) {
                Some(FieldValue::Refs(ids)) => ids
                    .iter()
                    .map(|id| app.manager.relation_label(source, id).unwrap_or(id))
                    .collect(),
                _ => Vec::new(),
            };
            if labels.is_empty() {
                "(none)".to_string()
            } else {
                labels.join(", ")
            }
        }
        (_, Some(FieldKind::Bool)) => {
            let checked = raw == "yes";
            format!("[{}]", if checked { "x" } else { " " })
        }
        _ if current => format!("{}_", raw.replace('\n', " ⏎ ")),
        _ => raw.replace('\n', ", "),
    };

    let value_style = if current {
        Style::default().fg(Color::White).bg(Color::Rgb(40, 40, 60))
    } else {
        Style::default().fg(Color::White)
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(label_text, label_style),
        Span::styled(value, value_style),
    ])];

    if let Some(issue) = editor.issue_for(row) {
        lines.push(Line::from(Span::styled(
            format!(" {:<width$}{}", "", issue.message, width = LABEL_WIDTH),
            Style::default().fg(Color::Red),
        )));
    }

    if current {
        let hint = match kind {
            Some(FieldKind::Relation) => Some("←/→ to choose"),
            Some(FieldKind::RelationList) => Some("Enter to pick"),
            Some(FieldKind::Bool) => Some("Space to toggle"),
            Some(FieldKind::Date) => Some("YYYY-MM-DD"),
            Some(FieldKind::StringList) => Some("Enter for a new item"),
            None => Some("comma separated file paths"),
            _ => None,
        };
        if let Some(hint) = hint {
            lines.push(Line::from(Span::styled(
                format!(" {:<width$}{}", "", hint, width = LABEL_WIDTH),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    lines
}
