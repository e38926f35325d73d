//! Dashboard Widgets
//!
//! Summary cards and the two aggregate charts.

use crate::dashboard::{total_fit_count, DashboardState, FitSlice};
use crate::tui::app::App;
use crate::tui::theme::{Icons, Theme};
use crate::types::DashboardSummary;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Paragraph},
    Frame,
};

/// Render the dashboard body: loading screen or cards plus charts
pub fn render_dashboard(frame: &mut Frame, area: Rect, app: &App) {
    match &app.dashboard {
        DashboardState::Idle | DashboardState::Loading => {
            let paragraph = Paragraph::new(Span::styled(
                "Loading dashboard...",
                Theme::text_dim(),
            ))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Theme::border()),
            );
            frame.render_widget(paragraph, area);
        }
        DashboardState::Ready { summary, slices } => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(5), Constraint::Min(10)])
                .split(area);

            render_cards(frame, chunks[0], summary);
            render_charts(frame, chunks[1], summary, slices);
        }
    }
}

/// The three summary cards
fn render_cards(frame: &mut Frame, area: Rect, summary: &DashboardSummary) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(34),
            Constraint::Percentage(33),
        ])
        .split(area);

    let cards = [
        ("Total Job Descriptions", summary.total_jobs.to_string()),
        ("Total Resumes Processed", summary.total_resumes.to_string()),
        (
            "Average Similarity Score",
            format!("{:.2}%", summary.avg_similarity),
        ),
    ];

    for (column, (title, value)) in columns.iter().zip(cards) {
        let block = Block::default()
            .title(format!(" {} ", title))
            .borders(Borders::ALL)
            .border_style(Theme::border());
        let paragraph = Paragraph::new(Span::styled(value, Theme::title()))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, *column);
    }
}

fn render_charts(frame: &mut Frame, area: Rect, summary: &DashboardSummary, slices: &[FitSlice]) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_fit_ratio(frame, columns[0], slices);
    render_top_skills(frame, columns[1], summary);
}

/// Fit vs Not Fit as a proportional bar plus legend, the terminal stand-in
/// for the original pie chart.
fn render_fit_ratio(frame: &mut Frame, area: Rect, slices: &[FitSlice]) {
    let block = Block::default()
        .title(" Fit vs Not Fit ")
        .borders(Borders::ALL)
        .border_style(Theme::border());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let total = total_fit_count(slices);
    if total == 0 {
        frame.render_widget(
            Paragraph::new(Span::styled("No match data", Theme::text_dim())),
            inner,
        );
        return;
    }

    let width = inner.width.saturating_sub(2) as usize;
    let mut bar = Vec::new();
    for slice in slices {
        let cells = ((slice.value as f64 / total as f64) * width as f64).round() as usize;
        bar.push(Span::styled(
            Icons::BLOCK.repeat(cells.max(1)),
            ratatui::style::Style::default().fg(Theme::palette(slice.color)),
        ));
    }

    let mut lines = vec![Line::from(bar), Line::from("")];
    for slice in slices {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} ", Icons::ACTIVE),
                ratatui::style::Style::default().fg(Theme::palette(slice.color)),
            ),
            Span::styled(
                format!("{} {} ({:.0}%)", slice.name, slice.value, slice.percent_of(total)),
                Theme::text(),
            ),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_top_skills(frame: &mut Frame, area: Rect, summary: &DashboardSummary) {
    let block = Block::default()
        .title(" Top Extracted Skills ")
        .borders(Borders::ALL)
        .border_style(Theme::border());

    if summary.top_skills.is_empty() {
        let paragraph = Paragraph::new(Span::styled("No skill data", Theme::text_dim()))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let data: Vec<(&str, u64)> = summary
        .top_skills
        .iter()
        .map(|entry| (entry.skill.as_str(), entry.count))
        .collect();

    let chart = BarChart::default()
        .data(&data)
        .bar_width(9)
        .bar_gap(2)
        .bar_style(ratatui::style::Style::default().fg(Theme::CHART_BAR))
        .value_style(Theme::heading())
        .label_style(Theme::text_secondary())
        .block(block);

    frame.render_widget(chart, area);
}
