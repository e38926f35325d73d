//! Reusable widgets for the TUI.

pub mod progress;
pub mod results;
pub mod summary;

pub use progress::render_progress;
pub use results::{render_filter_bar, render_results_table};
pub use summary::render_dashboard;
