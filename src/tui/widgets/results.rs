//! Results Widgets
//!
//! Filter bar and the match-results table.

use crate::tui::app::{App, Focus};
use crate::tui::theme::{Icons, Theme};
use ratatui::{
    layout::{Alignment, Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

/// Render the filter bar above the table
pub fn render_filter_bar(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Filters ")
        .borders(Borders::ALL)
        .border_style(if app.focus == Focus::Search {
            Theme::border_focused()
        } else {
            Theme::border()
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut spans = vec![
        Span::styled("Fit: ", Theme::text_secondary()),
        Span::styled(app.fit_filter_label().to_string(), Theme::text()),
        Span::styled(" [f]", Theme::shortcut_key()),
        Span::raw("   "),
        Span::styled("Skill: ", Theme::text_secondary()),
        Span::styled(app.skill_filter_label().to_string(), Theme::text()),
        Span::styled(" [s]", Theme::shortcut_key()),
        Span::raw("   "),
        Span::styled("Search: ", Theme::text_secondary()),
    ];

    if app.filter.query.is_empty() && app.focus != Focus::Search {
        spans.push(Span::styled("Search...", Theme::placeholder()));
    } else {
        spans.push(Span::styled(app.filter.query.clone(), Theme::text()));
    }
    if app.focus == Focus::Search {
        spans.push(Span::styled(Icons::CURSOR, Theme::active()));
    }
    spans.push(Span::styled(" [/]", Theme::shortcut_key()));

    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}

/// Render the results table
pub fn render_results_table(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Results;
    let block = Block::default()
        .title(" Results ")
        .borders(Borders::ALL)
        .border_style(if focused {
            Theme::border_focused()
        } else {
            Theme::border()
        });

    let visible = app.filtered();
    if visible.is_empty() {
        let message = if app.results.is_empty() {
            "No resumes processed yet"
        } else {
            "No matching resumes found"
        };
        let paragraph = Paragraph::new(Span::styled(message, Theme::text_dim()))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec!["Filename", "Score", "Fit", "Skills"]).style(Theme::heading());

    let rows = visible.iter().map(|result| {
        let label = result.label_display();
        Row::new(vec![
            Cell::from(result.filename.clone()),
            Cell::from(result.score_display()),
            Cell::from(Span::styled(label.to_string(), Theme::fit_label(label))),
            Cell::from(result.skills_display()),
        ])
        .style(Theme::text())
    });

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(35),
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Percentage(45),
        ],
    )
    .header(header)
    .highlight_style(Theme::selected())
    .highlight_symbol(Icons::SELECTED)
    .block(block);

    let mut state = TableState::default();
    state.select(focused.then_some(app.selected));
    frame.render_stateful_widget(table, area, &mut state);
}
