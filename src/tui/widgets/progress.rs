//! Progress Widget
//!
//! Displays the submission pipeline progress.

use crate::tui::app::SubmissionStage;
use crate::tui::theme::{Icons, Theme};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// Render the submission progress indicator
pub fn render_progress(frame: &mut Frame, area: Rect, stage: &SubmissionStage) {
    let block = Block::default()
        .title(" Submission ")
        .borders(Borders::ALL)
        .border_style(Theme::border());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![Line::from(build_stage_line(stage))];

    match stage {
        SubmissionStage::Submitting { processed, total } => {
            lines.push(Line::from(vec![
                Span::styled("  Processing batch ", Theme::text_secondary()),
                Span::styled(
                    format!("{} of {}", (processed + 1).min((*total).max(1)), total),
                    Theme::text(),
                ),
            ]));
        }
        SubmissionStage::Error(message) => {
            lines.push(Line::from(Span::styled(message.clone(), Theme::error())));
        }
        _ => {}
    }

    if let SubmissionStage::Submitting { processed, total } = stage {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Length(1)])
            .split(inner);

        frame.render_widget(Paragraph::new(lines), chunks[0]);

        let ratio = if *total == 0 {
            0.0
        } else {
            *processed as f64 / *total as f64
        };
        let gauge = Gauge::default()
            .ratio(ratio)
            .label(format!("{}/{} batches ({:.0}%)", processed, total, ratio * 100.0))
            .gauge_style(Theme::active());
        frame.render_widget(gauge, chunks[1]);
    } else {
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

/// Build the progress line with stage indicators
fn build_stage_line(stage: &SubmissionStage) -> Vec<Span<'static>> {
    let stages = [
        ("Scan", StageState::from_scan(stage)),
        ("Submit", StageState::from_submit(stage)),
        ("Done", StageState::from_done(stage)),
    ];

    let mut spans = Vec::new();

    for (i, (name, state)) in stages.iter().enumerate() {
        let (icon, style) = match state {
            StageState::Complete => (Icons::COMPLETE, Theme::complete()),
            StageState::Active => (Icons::ACTIVE, Theme::active()),
            StageState::Pending => (Icons::PENDING, Theme::pending()),
            StageState::Error => (Icons::ERROR, Theme::error()),
        };

        spans.push(Span::styled(format!("{} ", icon), style));
        spans.push(Span::styled(name.to_string(), style));

        if i < stages.len() - 1 {
            spans.push(Span::styled(format!(" {} ", Icons::ARROW), Theme::text_dim()));
        }
    }

    spans
}

/// State of a pipeline stage
#[derive(Debug, Clone, Copy, PartialEq)]
enum StageState {
    Pending,
    Active,
    Complete,
    Error,
}

impl StageState {
    fn from_scan(stage: &SubmissionStage) -> Self {
        match stage {
            SubmissionStage::Idle => StageState::Pending,
            SubmissionStage::Scanning => StageState::Active,
            SubmissionStage::Error(_) => StageState::Error,
            _ => StageState::Complete,
        }
    }

    fn from_submit(stage: &SubmissionStage) -> Self {
        match stage {
            SubmissionStage::Idle | SubmissionStage::Scanning => StageState::Pending,
            SubmissionStage::Submitting { .. } => StageState::Active,
            SubmissionStage::Error(_) => StageState::Error,
            SubmissionStage::Complete => StageState::Complete,
        }
    }

    fn from_done(stage: &SubmissionStage) -> Self {
        match stage {
            SubmissionStage::Complete => StageState::Complete,
            SubmissionStage::Error(_) => StageState::Error,
            _ => StageState::Pending,
        }
    }
}
