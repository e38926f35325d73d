//! Terminal User Interface Module
//!
//! The two screens of the matcher client, rendered with Ratatui.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Matchdeck Resume Matcher                 http://127.0.0.1:5000 │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─ Submission ────────────────────────────────────────────┐   │
//! │  │ ✓ Scan → ● Submit → ○ Done      [#####.....] 3/6 (50%)  │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │  ┌─ Job Description ───────┐ ┌─ Resume Directory ──────────┐   │
//! │  └─────────────────────────┘ └─────────────────────────────┘   │
//! │  ┌─ Results ───────────────────────────────────────────────┐   │
//! │  │  [Filterable, searchable match table]                    │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │  [Enter] Submit | [Ctrl+D] Dashboard | [Ctrl+Q] Quit | [F1]    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod app;
pub mod event;
pub mod theme;
pub mod ui;
pub mod widgets;

pub use app::{App, AppEvent, SubmissionStage, View};
pub use event::{AppAction, EventHandler};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use tracing::{error, info};

/// Type alias for our terminal backend
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> anyhow::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state
pub fn restore_terminal(terminal: &mut Tui) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the TUI application
pub async fn run(config: crate::config::Config, start_on_dashboard: bool) -> anyhow::Result<()> {
    info!("Starting TUI mode");

    let mut terminal = init_terminal()?;

    let tick = std::time::Duration::from_millis(config.ui.tick_ms);
    let mut app = App::new(config);
    if start_on_dashboard {
        app.handle_action(AppAction::ToggleDashboard).await;
    }

    let mut events = EventHandler::new(tick);

    let result = run_app(&mut terminal, &mut app, &mut events).await;

    if let Err(e) = restore_terminal(&mut terminal) {
        error!("Failed to restore terminal: {}", e);
    }

    result
}

/// Main application loop
async fn run_app(
    terminal: &mut Tui,
    app: &mut App,
    events: &mut EventHandler,
) -> anyhow::Result<()> {
    loop {
        // Draw UI
        terminal.draw(|frame| ui::render(frame, app))?;

        // Handle async events from the submission pipeline and fetches
        app.poll_events();

        // Handle user input
        if let Some(action) = events.try_next().await {
            match action {
                AppAction::Quit | AppAction::ForceQuit => break,
                _ => app.handle_action(action).await,
            }
        }

        if app.should_quit {
            break;
        }

        // Small yield to prevent busy loop
        tokio::task::yield_now().await;
    }

    info!("TUI exited normally");
    Ok(())
}
