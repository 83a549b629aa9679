//! Dialogs
//!
//! The delete confirmation names what is about to go: the record for a
//! single delete, or the selected records for a bulk delete. Warnings are a
//! plain message with an OK hint.

use crate::app::{App, Mode};
use catadmin::confirm::{ConfirmTarget, PendingAction};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Records listed by name before the rest are counted
const MAX_LISTED: usize = 6;

pub fn render(f: &mut Frame, app: &App) {
    match app.mode {
        Mode::Confirm => {
            if let Some(pending) = app.manager.gate.pending() {
                render_confirm(f, app, pending);
            }
        },
        Mode::Warning => {
            if let Some(message) = &app.warning_message {
                render_warning(f, message);
            }
        },
        _ => {},
    }
}

/// Names of the staged records, as shown in the dialog body
fn target_lines(app: &App, target: &ConfirmTarget) -> Vec<String> {
    let schema = app.current_resource();
    match target {
        ConfirmTarget::Single { id, label } if label != id => vec![format!("{}  ({})", label, id)],
        ConfirmTarget::Single { id, .. } => vec![id.clone()],
        ConfirmTarget::Bulk { ids } => {
            let mut lines: Vec<String> = ids
                .iter()
                .take(MAX_LISTED)
                .map(|id| {
                    app.manager
                        .list
                        .find(id)
                        .map(|r| r.label(schema))
                        .unwrap_or_else(|| id.clone())
                })
                .collect();
            if ids.len() > MAX_LISTED {
                lines.push(format!("... and {} more", ids.len() - MAX_LISTED));
            }
            lines
        }
    }
}

fn render_confirm(f: &mut Frame, app: &App, pending: &PendingAction) {
    let schema = app.current_resource();
    let accent = if pending.destructive {
        Color::Red
    } else {
        Color::Yellow
    };

    let title = match &pending.target {
        ConfirmTarget::Single { .. } => format!(" Delete {} ", schema.item_name),
        ConfirmTarget::Bulk { ids } => format!(
            " Delete {} {} ",
            ids.len(),
            schema.display_name.to_lowercase()
        ),
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            pending.message.as_str(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    lines.extend(target_lines(app, &pending.target).into_iter().map(|name| {
        Line::from(vec![
            Span::styled("  • ", Style::default().fg(accent)),
            Span::styled(name, Style::default().fg(Color::Gray)),
        ])
    }));
    lines.push(Line::from(""));
    lines.push(buttons(pending.selected_yes, accent));
    lines.push(Line::from(Span::styled(
        "←/→ move | Enter confirm | Esc cancel",
        Style::default().fg(Color::DarkGray),
    )));

    let popup = popup_rect(56, lines.len() as u16 + 2, f.area());
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .title(Span::styled(
            title,
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ));

    f.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center),
        popup,
    );
}

/// Yes/No row; the focused button is filled in
fn buttons(selected_yes: bool, accent: Color) -> Line<'static> {
    let focused = |bg: Color| {
        Style::default()
            .fg(Color::Black)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    };
    let idle = Style::default().fg(Color::DarkGray);

    let (yes, no) = if selected_yes {
        (focused(accent), idle)
    } else {
        (idle, focused(Color::White))
    };

    Line::from(vec![
        Span::styled(" Yes (y) ", yes),
        Span::raw("    "),
        Span::styled(" No (n) ", no),
    ])
}

fn render_warning(f: &mut Frame, message: &str) {
    // Room for the wrapped message plus the hint
    let width = 56u16.min(f.area().width);
    let text_width = width.saturating_sub(4).max(1) as usize;
    let message_rows = message.chars().count().div_ceil(text_width).max(1) as u16;
    let popup = popup_rect(width, message_rows + 5, f.area());
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Span::styled(
            " Warning ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(Color::White))),
        Line::from(""),
        Line::from(Span::styled(
            "Enter or Esc to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    f.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        popup,
    );
}

/// Rect of `width` x `height` cells centered in `area`, clipped to it
fn popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_popup_rect_is_centered_and_clipped() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(popup_rect(56, 10, area), Rect::new(22, 15, 56, 10));

        let small = Rect::new(0, 0, 30, 5);
        assert_eq!(popup_rect(56, 10, small), small);
    }
}
