//! Splash Screen
//!
//! Startup checklist: each load stage is listed with its status and the
//! detail of what it is working on (backend URL, resource name).

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const LOGO: &[&str] = &[
    "            _             _           _       ",
    "   ___ __ _| |_ __ _  __| |_ __ ___ (_)_ __  ",
    "  / __/ _` | __/ _` |/ _` | '_ ` _ \\| | '_ \\ ",
    " | (_| (_| | || (_| | (_| | | | | | | | | | |",
    "  \\___\\__,_|\\__\\__,_|\\__,_|_| |_| |_|_|_| |_|",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    Pending,
    Running,
    Done,
    /// Finished with an error that did not stop startup
    Failed,
}

#[derive(Debug, Clone)]
struct Stage {
    label: &'static str,
    detail: String,
    status: StageStatus,
}

/// Startup stages, in the order they run
pub struct SplashState {
    stages: Vec<Stage>,
}

impl SplashState {
    pub fn new() -> Self {
        let stages = ["Configuration", "HTTP client", "Records", "Related options"]
            .into_iter()
            .map(|label| Stage {
                label,
                detail: String::new(),
                status: StageStatus::Pending,
            })
            .collect();
        Self { stages }
    }

    /// Start the next pending stage
    pub fn begin(&mut self, detail: &str) {
        if let Some(stage) = self
            .stages
            .iter_mut()
            .find(|s| s.status == StageStatus::Pending)
        {
            stage.detail = detail.to_string();
            stage.status = StageStatus::Running;
        }
    }

    /// Close the running stage
    pub fn finish(&mut self, ok: bool) {
        if let Some(stage) = self
            .stages
            .iter_mut()
            .find(|s| s.status == StageStatus::Running)
        {
            stage.status = if ok {
                StageStatus::Done
            } else {
                StageStatus::Failed
            };
        }
    }

    #[cfg(test)]
    fn status(&self, label: &str) -> Option<StageStatus> {
        self.stages
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.status)
    }

    fn is_complete(&self) -> bool {
        self.stages
            .iter()
            .all(|s| matches!(s.status, StageStatus::Done | StageStatus::Failed))
    }
}

impl Default for SplashState {
    fn default() -> Self {
        Self::new()
    }
}

fn stage_line(stage: &Stage) -> Line<'_> {
    let (marker, color) = match stage.status {
        StageStatus::Pending => ("·", Color::DarkGray),
        StageStatus::Running => ("▸", Color::Yellow),
        StageStatus::Done => ("✓", Color::Green),
        StageStatus::Failed => ("✗", Color::Red),
    };
    Line::from(vec![
        Span::styled(format!(" {} ", marker), Style::default().fg(color)),
        Span::styled(
            format!("{:<16}", stage.label),
            Style::default().fg(if stage.status == StageStatus::Pending {
                Color::DarkGray
            } else {
                Color::White
            }),
        ),
        Span::styled(stage.detail.as_str(), Style::default().fg(Color::DarkGray)),
    ])
}

pub fn render(f: &mut Frame, state: &SplashState) {
    let height = (LOGO.len() + state.stages.len() + 6) as u16;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(f.area());
    let center = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(rows[1])[1];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            if state.is_complete() { " ready " } else { " starting " },
            Style::default().fg(Color::Cyan),
        ))
        .title_alignment(Alignment::Center);
    let inner = block.inner(center);
    f.render_widget(block, center);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(LOGO.len() as u16 + 2),
            Constraint::Min(1),
        ])
        .split(inner);

    let mut logo: Vec<Line> = LOGO
        .iter()
        .map(|row| Line::from(Span::styled(*row, Style::default().fg(Color::Cyan))))
        .collect();
    logo.push(Line::from(Span::styled(
        "Terminal admin for the catalog backend",
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )));
    f.render_widget(Paragraph::new(logo).alignment(Alignment::Center), parts[0]);

    let stages: Vec<Line> = state.stages.iter().map(stage_line).collect();
    f.render_widget(Paragraph::new(stages), parts[1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stages_run_in_order() {
        let mut state = SplashState::new();
        state.begin("http://localhost:3000/api");
        assert_eq!(state.status("Configuration"), Some(StageStatus::Running));
        assert_eq!(state.status("HTTP client"), Some(StageStatus::Pending));

        state.finish(true);
        state.begin("");
        state.finish(true);
        state.begin("bootcamps");
        state.finish(false);
        assert_eq!(state.status("Records"), Some(StageStatus::Failed));
        assert!(!state.is_complete());

        state.begin("categories");
        state.finish(true);
        assert!(state.is_complete());
    }

    #[test]
    fn test_finish_without_running_stage_is_ignored() {
        let mut state = SplashState::new();
        state.finish(true);
        assert_eq!(state.status("Configuration"), Some(StageStatus::Pending));
        assert_eq!(state.status("Nope"), None);
    }
}
