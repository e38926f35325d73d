//! Application State
//!
//! Contains the main application state and logic for the TUI.

use crate::batch::{self, SubmissionOutcome};
use crate::charts;
use crate::client::{MatcherClient, MatchService};
use crate::config::Config;
use crate::dashboard::{shape_fit_distribution, DashboardState};
use crate::results::{self, ResultFilter};
use crate::tui::event::AppAction;
use crate::types::{AppError, DashboardSummary, MatchResult};
use chrono::Local;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info};
use tui_textarea::TextArea;

/// The one user-facing message for a failed submission, regardless of
/// whether the transport or the response shape was at fault.
pub const SUBMISSION_ERROR: &str = "Failed to process the submission. Please try again.";

/// Fit-filter choices cycled by the `f` key.
const FIT_CHOICES: [Option<&str>; 3] = [None, Some("Fit"), Some("Not Fit")];

/// Submission lifecycle
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SubmissionStage {
    /// Idle, waiting for input
    #[default]
    Idle,
    /// Reading resume files from disk
    Scanning,
    /// Batches in flight
    Submitting { processed: usize, total: usize },
    /// All batches accepted
    Complete,
    /// Submission aborted
    Error(String),
}

/// Current view/screen
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum View {
    #[default]
    Submission,
    Dashboard,
}

/// Which widget receives plain key input on the submission view
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Focus {
    #[default]
    JobDescription,
    ResumeDir,
    Results,
    Search,
}

/// Events from async work back into the UI loop
#[derive(Debug)]
pub enum AppEvent {
    /// File scan finished, batches are about to go out
    SubmissionStarted { total_batches: usize },
    /// One more batch accepted
    BatchCompleted { processed: usize, total: usize },
    /// The pipeline is done, one way or another
    SubmissionFinished(SubmissionOutcome),
    /// Delayed auto-switch after a successful submission
    OpenDashboard,
    /// Dashboard summary arrived
    DashboardLoaded(DashboardSummary),
    /// A download finished
    DownloadFinished(Result<PathBuf, String>),
    /// Chart export finished
    ExportFinished(Result<(PathBuf, PathBuf), String>),
}

/// Main application state
pub struct App {
    // Configuration
    pub config: Config,
    client: Arc<MatcherClient>,

    // UI State
    pub view: View,
    pub focus: Focus,
    pub show_help: bool,
    pub should_quit: bool,

    // Form state
    pub job_input: TextArea<'static>,
    pub dir_input: String,

    // Submission state
    pub stage: SubmissionStage,
    pub results: Vec<MatchResult>,
    pub filter: ResultFilter,
    pub skill_options: Vec<String>,
    fit_index: usize,
    skill_index: usize,
    pub selected: usize,
    pub status_line: Option<String>,

    // Dashboard state
    pub dashboard: DashboardState,

    // Async communication
    event_rx: Option<mpsc::Receiver<AppEvent>>,
    event_tx: Option<mpsc::Sender<AppEvent>>,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config) -> Self {
        let mut job_input = TextArea::default();
        job_input.set_cursor_line_style(ratatui::style::Style::default());
        job_input.set_placeholder_text("Paste the job description here...");

        let client = Arc::new(MatcherClient::new(config.api.base_url.clone()));
        let (tx, rx) = mpsc::channel(100);

        Self {
            config,
            client,
            view: View::Submission,
            focus: Focus::JobDescription,
            show_help: false,
            should_quit: false,
            job_input,
            dir_input: String::new(),
            stage: SubmissionStage::Idle,
            results: Vec::new(),
            filter: ResultFilter::default(),
            skill_options: Vec::new(),
            fit_index: 0,
            skill_index: 0,
            selected: 0,
            status_line: None,
            dashboard: DashboardState::Idle,
            event_rx: Some(rx),
            event_tx: Some(tx),
        }
    }

    /// The rows currently visible under the active filters.
    pub fn filtered(&self) -> Vec<&MatchResult> {
        self.filter.apply(&self.results)
    }

    /// Label shown for the fit filter.
    pub fn fit_filter_label(&self) -> &str {
        FIT_CHOICES[self.fit_index].unwrap_or("All")
    }

    /// Label shown for the skill filter.
    pub fn skill_filter_label(&self) -> &str {
        self.filter.skill.as_deref().unwrap_or("All")
    }

    pub fn batch_progress(&self) -> Option<(usize, usize)> {
        match self.stage {
            SubmissionStage::Submitting { processed, total } => Some((processed, total)),
            _ => None,
        }
    }

    fn submission_in_flight(&self) -> bool {
        matches!(
            self.stage,
            SubmissionStage::Scanning | SubmissionStage::Submitting { .. }
        )
    }

    /// Poll for async events
    pub fn poll_events(&mut self) {
        let events: Vec<AppEvent> = {
            if let Some(ref mut rx) = self.event_rx {
                let mut collected = Vec::new();
                while let Ok(event) = rx.try_recv() {
                    collected.push(event);
                }
                collected
            } else {
                Vec::new()
            }
        };

        for event in events {
            self.handle_event(event);
        }
    }

    /// Handle an async event
    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::SubmissionStarted { total_batches } => {
                self.stage = SubmissionStage::Submitting {
                    processed: 0,
                    total: total_batches,
                };
            }
            AppEvent::BatchCompleted { processed, total } => {
                self.stage = SubmissionStage::Submitting { processed, total };
            }
            AppEvent::SubmissionFinished(outcome) => {
                if self.apply_outcome(outcome) {
                    self.schedule_dashboard_switch();
                }
            }
            AppEvent::OpenDashboard => {
                self.open_dashboard();
            }
            AppEvent::DashboardLoaded(summary) => {
                let slices = shape_fit_distribution(&summary);
                self.dashboard = DashboardState::Ready { summary, slices };
            }
            AppEvent::DownloadFinished(outcome) => {
                self.status_line = Some(match outcome {
                    Ok(path) => format!(
                        "[{}] Saved to {}",
                        Local::now().format("%H:%M:%S"),
                        path.display()
                    ),
                    Err(message) => format!("[{}] {}", Local::now().format("%H:%M:%S"), message),
                });
            }
            AppEvent::ExportFinished(outcome) => {
                self.status_line = Some(match outcome {
                    Ok((fit, skills)) => format!(
                        "[{}] Charts written: {} {}",
                        Local::now().format("%H:%M:%S"),
                        fit.display(),
                        skills.display()
                    ),
                    Err(message) => {
                        format!("[{}] Export failed: {}", Local::now().format("%H:%M:%S"), message)
                    }
                });
            }
        }
    }

    /// Fold a finished submission into view state. Returns true on success.
    ///
    /// Any kept results from a partial failure are dropped here: the table
    /// shows a submission all-or-nothing even though the service committed
    /// the earlier batches.
    fn apply_outcome(&mut self, outcome: SubmissionOutcome) -> bool {
        match outcome {
            SubmissionOutcome::Success(results) => {
                self.results = results;
                self.skill_options = results::skill_options(&self.results);
                self.reset_filters();
                self.stage = SubmissionStage::Complete;
                true
            }
            SubmissionOutcome::PartialFailure {
                kept,
                batches_done,
                error,
            } => {
                error!(batches_done, kept = kept.len(), %error, "submission aborted");
                self.fail_submission();
                false
            }
            SubmissionOutcome::Failure(error) => {
                error!(%error, "submission failed");
                self.fail_submission();
                false
            }
        }
    }

    fn fail_submission(&mut self) {
        self.results.clear();
        self.skill_options.clear();
        self.reset_filters();
        self.stage = SubmissionStage::Error(SUBMISSION_ERROR.to_string());
    }

    fn reset_filters(&mut self) {
        self.filter = ResultFilter::default();
        self.fit_index = 0;
        self.skill_index = 0;
        self.selected = 0;
    }

    /// Handle a user action
    pub async fn handle_action(&mut self, action: AppAction) {
        match action {
            AppAction::Quit | AppAction::ForceQuit => {
                self.should_quit = true;
            }
            AppAction::Submit => match (self.view, self.focus) {
                (View::Submission, Focus::JobDescription | Focus::ResumeDir) => {
                    self.start_submission();
                }
                (View::Submission, Focus::Search) => {
                    self.focus = Focus::Results;
                }
                (View::Submission, Focus::Results) => {
                    self.download_selected();
                }
                (View::Dashboard, _) => {}
            },
            AppAction::ToggleDashboard => {
                if self.view == View::Dashboard {
                    self.view = View::Submission;
                } else {
                    self.open_dashboard();
                }
            }
            AppAction::ToggleHelp => {
                self.show_help = !self.show_help;
            }
            AppAction::Escape => {
                if self.show_help {
                    self.show_help = false;
                } else if self.focus == Focus::Search {
                    self.focus = Focus::Results;
                }
            }
            AppAction::ScrollUp => self.move_selection(-1),
            AppAction::ScrollDown => self.move_selection(1),
            AppAction::ScrollPageUp => self.move_selection(-10),
            AppAction::ScrollPageDown => self.move_selection(10),
            AppAction::NextField => self.cycle_focus(true),
            AppAction::PrevField => self.cycle_focus(false),
            AppAction::Input(key_event) => {
                self.handle_input(key_event);
            }
            AppAction::Tick => {}
        }
    }

    fn cycle_focus(&mut self, forward: bool) {
        if self.view != View::Submission {
            return;
        }
        self.focus = match (self.focus, forward) {
            (Focus::JobDescription, true) => Focus::ResumeDir,
            (Focus::ResumeDir, true) => Focus::Results,
            (Focus::Results | Focus::Search, true) => Focus::JobDescription,
            (Focus::JobDescription, false) => Focus::Results,
            (Focus::ResumeDir, false) => Focus::JobDescription,
            (Focus::Results | Focus::Search, false) => Focus::ResumeDir,
        };
    }

    fn move_selection(&mut self, delta: isize) {
        if self.view != View::Submission || self.focus != Focus::Results {
            return;
        }
        let len = self.filtered().len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        let next = self.selected as isize + delta;
        self.selected = next.clamp(0, len as isize - 1) as usize;
    }

    /// Handle keyboard input
    fn handle_input(&mut self, key: crossterm::event::KeyEvent) {
        use crossterm::event::KeyCode;

        if self.view == View::Dashboard {
            if key.code == KeyCode::Char('e') {
                self.export_charts();
            }
            return;
        }

        match self.focus {
            Focus::JobDescription => {
                self.job_input.input(key);
            }
            Focus::ResumeDir => match key.code {
                KeyCode::Char(c) => self.dir_input.push(c),
                KeyCode::Backspace => {
                    self.dir_input.pop();
                }
                _ => {}
            },
            Focus::Search => match key.code {
                KeyCode::Char(c) => {
                    self.filter.query.push(c);
                    self.selected = 0;
                }
                KeyCode::Backspace => {
                    self.filter.query.pop();
                    self.selected = 0;
                }
                _ => {}
            },
            Focus::Results => match key.code {
                KeyCode::Char('f') => self.cycle_fit_filter(),
                KeyCode::Char('s') => self.cycle_skill_filter(),
                KeyCode::Char('/') => self.focus = Focus::Search,
                KeyCode::Char('d') => self.download_selected(),
                _ => {}
            },
        }
    }

    fn cycle_fit_filter(&mut self) {
        self.fit_index = (self.fit_index + 1) % FIT_CHOICES.len();
        self.filter.fit = FIT_CHOICES[self.fit_index].map(String::from);
        self.selected = 0;
    }

    fn cycle_skill_filter(&mut self) {
        let choices = self.skill_options.len() + 1;
        self.skill_index = (self.skill_index + 1) % choices;
        self.filter.skill = if self.skill_index == 0 {
            None
        } else {
            Some(self.skill_options[self.skill_index - 1].clone())
        };
        self.selected = 0;
    }

    /// Kick off a submission from the current form state
    fn start_submission(&mut self) {
        if self.submission_in_flight() {
            return;
        }

        let job = self.job_input.lines().join("\n").trim().to_string();
        let dir = self.dir_input.trim().to_string();
        if job.is_empty() || dir.is_empty() {
            self.stage = SubmissionStage::Error(
                "Please provide a job description and a resume directory.".to_string(),
            );
            return;
        }

        self.stage = SubmissionStage::Scanning;
        self.status_line = None;

        let tx = self.event_tx.clone().unwrap();
        let client = self.client.clone();
        let batch_size = self.config.batch.batch_size;
        let concurrency = self.config.batch.concurrency;

        tokio::spawn(async move {
            Self::run_submission(client, job, PathBuf::from(dir), batch_size, concurrency, tx)
                .await;
        });
    }

    /// Run the submission pipeline in background
    async fn run_submission(
        client: Arc<MatcherClient>,
        job_description: String,
        dir: PathBuf,
        batch_size: usize,
        concurrency: usize,
        tx: mpsc::Sender<AppEvent>,
    ) {
        let files = match batch::load_resume_dir(&dir).await {
            Ok(files) if files.is_empty() => {
                let error =
                    AppError::InvalidInput(format!("no resume files found in {}", dir.display()));
                tx.send(AppEvent::SubmissionFinished(SubmissionOutcome::Failure(
                    error,
                )))
                .await
                .ok();
                return;
            }
            Ok(files) => files,
            Err(error) => {
                tx.send(AppEvent::SubmissionFinished(SubmissionOutcome::Failure(
                    error,
                )))
                .await
                .ok();
                return;
            }
        };

        info!(files = files.len(), "resumes loaded");
        let total_batches = batch::batch_count(files.len(), batch_size);
        tx.send(AppEvent::SubmissionStarted { total_batches })
            .await
            .ok();

        let (progress_tx, mut progress_rx) = mpsc::channel::<batch::BatchDone>(16);
        let forward = tx.clone();
        tokio::spawn(async move {
            while let Some(done) = progress_rx.recv().await {
                forward
                    .send(AppEvent::BatchCompleted {
                        processed: done.processed,
                        total: done.total,
                    })
                    .await
                    .ok();
            }
        });

        let outcome = batch::submit_all(
            client.as_ref(),
            &job_description,
            files,
            batch_size,
            concurrency,
            Some(progress_tx),
        )
        .await;
        tx.send(AppEvent::SubmissionFinished(outcome)).await.ok();
    }

    /// Switch to the dashboard after the configured delay
    fn schedule_dashboard_switch(&self) {
        let tx = self.event_tx.clone().unwrap();
        let delay = self.config.ui.dashboard_switch_delay_ms;
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay)).await;
            tx.send(AppEvent::OpenDashboard).await.ok();
        });
    }

    /// Enter the dashboard view and fetch a fresh summary
    fn open_dashboard(&mut self) {
        self.view = View::Dashboard;
        self.dashboard = DashboardState::Loading;

        let tx = self.event_tx.clone().unwrap();
        let client = self.client.clone();
        tokio::spawn(async move {
            match client.fetch_dashboard().await {
                Ok(summary) => {
                    tx.send(AppEvent::DashboardLoaded(summary)).await.ok();
                }
                Err(e) => {
                    // Logged only; the view keeps its loading screen.
                    error!("Error fetching dashboard data: {}", e);
                }
            }
        });
    }

    /// Download the selected row's resume into the configured directory
    fn download_selected(&mut self) {
        let Some(filename) = self
            .filtered()
            .get(self.selected)
            .map(|r| r.filename.clone())
        else {
            return;
        };

        self.status_line = Some(format!("Downloading {}...", filename));
        let tx = self.event_tx.clone().unwrap();
        let client = self.client.clone();
        let dest = self.config.files.download_dir.clone();
        tokio::spawn(async move {
            let outcome = client
                .download(&filename, &dest)
                .await
                .map_err(|e| format!("Download failed: {}", e));
            tx.send(AppEvent::DownloadFinished(outcome)).await.ok();
        });
    }

    /// Write the dashboard charts as PNG files
    fn export_charts(&mut self) {
        let DashboardState::Ready { summary, slices } = &self.dashboard else {
            return;
        };

        let slices = slices.clone();
        let top_skills = summary.top_skills.clone();
        let out_dir = self.config.files.export_dir.clone();
        let tx = self.event_tx.clone().unwrap();
        tokio::spawn(async move {
            let outcome =
                tokio::task::spawn_blocking(move || charts::export_charts(&out_dir, &slices, &top_skills))
                    .await
                    .map_err(|e| e.to_string())
                    .and_then(|r| r.map_err(|e| e.to_string()));
            tx.send(AppEvent::ExportFinished(outcome)).await.ok();
        });
    }
}
