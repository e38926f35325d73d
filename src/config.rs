use anyhow::{ensure, Result};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub batch: BatchConfig,
    pub files: FilesConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the scoring service.
    pub base_url: String,
    /// Origin the original web dashboard was served from; shown on the
    /// dashboard header since this client renders the dashboard itself.
    pub dashboard_origin: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchConfig {
    pub batch_size: usize,
    /// How many batches may be in flight at once. The service commits each
    /// batch independently, so anything above 1 trades the simple ordered
    /// progress display for throughput.
    pub concurrency: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    pub download_dir: PathBuf,
    pub export_dir: PathBuf,
    pub log_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    pub tick_ms: u64,
    /// Delay before the dashboard view opens after a successful submission.
    pub dashboard_switch_delay_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            api: ApiConfig {
                base_url: env::var("MATCHER_API_URL")
                    .unwrap_or_else(|_| "http://127.0.0.1:5000".to_string()),
                dashboard_origin: env::var("MATCHER_DASHBOARD_ORIGIN")
                    .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            },
            batch: BatchConfig {
                batch_size: env::var("MATCHER_BATCH_SIZE")
                    .unwrap_or_else(|_| "100".to_string())
                    .parse()?,
                concurrency: env::var("MATCHER_BATCH_CONCURRENCY")
                    .unwrap_or_else(|_| "1".to_string())
                    .parse()?,
            },
            files: FilesConfig {
                download_dir: env::var("MATCHER_DOWNLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| {
                        dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
                    }),
                export_dir: env::var("MATCHER_EXPORT_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(".")),
                log_dir: env::var("MATCHER_LOG_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| {
                        dirs::data_local_dir()
                            .unwrap_or_else(|| PathBuf::from("."))
                            .join("matchdeck")
                            .join("logs")
                    }),
            },
            ui: UiConfig {
                tick_ms: env::var("MATCHER_UI_TICK_MS")
                    .unwrap_or_else(|_| "100".to_string())
                    .parse()?,
                dashboard_switch_delay_ms: env::var("MATCHER_DASHBOARD_DELAY_MS")
                    .unwrap_or_else(|_| "1000".to_string())
                    .parse()?,
            },
        };

        ensure!(config.batch.batch_size > 0, "MATCHER_BATCH_SIZE must be at least 1");
        ensure!(
            config.batch.concurrency > 0,
            "MATCHER_BATCH_CONCURRENCY must be at least 1"
        );

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_mirror_original_endpoints() {
        // Only touch vars this test owns; from_env falls back per-var.
        env::remove_var("MATCHER_API_URL");
        env::remove_var("MATCHER_DASHBOARD_ORIGIN");
        env::remove_var("MATCHER_BATCH_SIZE");
        env::remove_var("MATCHER_BATCH_CONCURRENCY");

        let config = Config::from_env().unwrap();
        assert_eq!(config.api.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.api.dashboard_origin, "http://localhost:3000");
        assert_eq!(config.batch.batch_size, 100);
        assert_eq!(config.batch.concurrency, 1);
        assert_eq!(config.ui.dashboard_switch_delay_ms, 1000);
    }
}
