//! UI Rendering
//!
//! Main UI layout and rendering logic for the TUI.

use crate::tui::app::{App, Focus, SubmissionStage, View};
use crate::tui::theme::Theme;
use crate::tui::widgets;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Render the main UI
pub fn render(frame: &mut Frame, app: &App) {
    match app.view {
        View::Submission => render_submission_view(frame, app),
        View::Dashboard => render_dashboard_view(frame, app),
    }

    if app.show_help {
        render_help(frame);
    }
}

fn render_submission_view(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(5), // Progress
            Constraint::Length(6), // Job description
            Constraint::Length(3), // Resume directory
            Constraint::Length(3), // Filter bar
            Constraint::Min(8),    // Results
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, chunks[0], "Resume Matcher", &app.config.api.base_url);
    widgets::render_progress(frame, chunks[1], &app.stage);
    render_job_input(frame, chunks[2], app);
    render_dir_input(frame, chunks[3], app);
    widgets::render_filter_bar(frame, chunks[4], app);
    widgets::render_results_table(frame, chunks[5], app);
    render_status_bar(frame, chunks[6], app);
}

fn render_dashboard_view(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Cards + charts
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, chunks[0], "Dashboard", &app.config.api.dashboard_origin);
    widgets::render_dashboard(frame, chunks[1], app);
    render_status_bar(frame, chunks[2], app);
}

/// Render the header
fn render_header(frame: &mut Frame, area: Rect, screen: &str, origin: &str) {
    let title_text = vec![Line::from(vec![
        Span::styled("Matchdeck", Theme::title()),
        Span::styled(format!(" {}", screen), Theme::text_secondary()),
        Span::raw("  "),
        Span::styled(origin.to_string(), Theme::text_dim()),
    ])];

    let title = Paragraph::new(title_text)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        );

    frame.render_widget(title, area);
}

/// Render the job description editor
fn render_job_input(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.focus == Focus::JobDescription;

    let block = Block::default()
        .title(" Job Description ")
        .borders(Borders::ALL)
        .border_style(if is_focused {
            Theme::border_focused()
        } else {
            Theme::border()
        });

    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(&app.job_input, inner);
}

/// Render the resume directory input
fn render_dir_input(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.focus == Focus::ResumeDir;

    let block = Block::default()
        .title(" Resume Directory ")
        .borders(Borders::ALL)
        .border_style(if is_focused {
            Theme::border_focused()
        } else {
            Theme::border()
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut spans = Vec::new();
    if app.dir_input.is_empty() {
        spans.push(Span::styled(
            "Path to a directory of resumes...",
            Theme::placeholder(),
        ));
    } else {
        spans.push(Span::styled(app.dir_input.clone(), Theme::text()));
    }
    if is_focused {
        spans.push(Span::styled(
            crate::tui::theme::Icons::CURSOR,
            Theme::active(),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let status = if let Some(line) = &app.status_line {
        Span::styled(line.clone(), Theme::text_secondary())
    } else {
        match &app.stage {
            SubmissionStage::Idle => Span::styled("Ready", Theme::text_secondary()),
            SubmissionStage::Scanning => Span::styled("Reading resumes...", Theme::active()),
            SubmissionStage::Submitting { processed, total } => Span::styled(
                format!("Processing batches ({}/{})", processed, total),
                Theme::active(),
            ),
            SubmissionStage::Complete => Span::styled("Complete", Theme::complete()),
            SubmissionStage::Error(_) => Span::styled("Submission failed", Theme::error()),
        }
    };

    let shortcuts = vec![
        Span::styled(" [Enter]", Theme::shortcut_key()),
        Span::styled(" Submit ", Theme::shortcut_desc()),
        Span::styled("[Tab]", Theme::shortcut_key()),
        Span::styled(" Field ", Theme::shortcut_desc()),
        Span::styled("[Ctrl+D]", Theme::shortcut_key()),
        Span::styled(" Dashboard ", Theme::shortcut_desc()),
        Span::styled("[Ctrl+Q]", Theme::shortcut_key()),
        Span::styled(" Quit ", Theme::shortcut_desc()),
        Span::styled("[F1]", Theme::shortcut_key()),
        Span::styled(" Help", Theme::shortcut_desc()),
    ];

    let line = Line::from(
        std::iter::once(status)
            .chain(std::iter::once(Span::raw(" │ ")))
            .chain(shortcuts)
            .collect::<Vec<_>>(),
    );

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the help modal
fn render_help(frame: &mut Frame) {
    let area = centered_rect(60, 60, frame.area());
    frame.render_widget(Clear, area);

    let entries = [
        ("Enter        ", "Submit form / download selected row"),
        ("Tab          ", "Next field"),
        ("Shift+Tab    ", "Previous field"),
        ("↑/↓          ", "Move row selection"),
        ("f            ", "Cycle fit filter (results focused)"),
        ("s            ", "Cycle skill filter (results focused)"),
        ("/            ", "Search by filename"),
        ("d            ", "Download selected resume"),
        ("e            ", "Export charts (dashboard)"),
        ("Ctrl+D       ", "Toggle dashboard view"),
        ("Ctrl+Q       ", "Quit application"),
        ("Esc / F1     ", "Close this help"),
    ];

    let mut help_lines = vec![
        Line::from(Span::styled("Keyboard Shortcuts", Theme::heading())),
        Line::from(""),
    ];
    for (key, desc) in entries {
        help_lines.push(Line::from(vec![
            Span::styled(key, Theme::shortcut_key()),
            Span::styled(desc, Theme::text()),
        ]));
    }

    let paragraph = Paragraph::new(help_lines).block(
        Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Theme::border_focused()),
    );

    frame.render_widget(paragraph, area);
}

/// Helper to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
