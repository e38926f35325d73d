//! Batch submission pipeline.
//!
//! Partitions the selected resume files into fixed-size chunks and submits
//! them through a [`MatchService`], one multipart request per chunk. The
//! `clear_database` flag is raised only on chunk 0 so the service starts a
//! fresh session. Chunks run through an async stage with an injectable
//! in-flight limit (default 1, matching the strictly sequential original);
//! accumulation order always follows chunk order.

use crate::client::{MatchService, ResumeFile};
use crate::types::{AppError, AppResult, MatchResult};
use futures::{stream, StreamExt};
use std::path::Path;
use tokio::sync::mpsc;
use tracing::{info, warn};

pub const DEFAULT_BATCH_SIZE: usize = 100;

/// File extensions accepted by the directory scan.
const RESUME_EXTENSIONS: [&str; 4] = ["pdf", "docx", "doc", "txt"];

/// Progress emitted while a submission runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchDone {
    pub processed: usize,
    pub total: usize,
}

/// Terminal state of one submission.
///
/// The pipeline never throws away completed work; whether `kept` survives a
/// failing batch is the caller's policy (the UI discards it, matching the
/// all-or-nothing behavior of the original client).
#[derive(Debug)]
pub enum SubmissionOutcome {
    Success(Vec<MatchResult>),
    PartialFailure {
        kept: Vec<MatchResult>,
        batches_done: usize,
        error: AppError,
    },
    Failure(AppError),
}

/// Number of chunks a file count splits into.
pub fn batch_count(files: usize, batch_size: usize) -> usize {
    files.div_ceil(batch_size)
}

/// Non-recursive scan of a directory for resume files, loaded fully into
/// memory in filename order so the upload order is stable.
pub async fn load_resume_dir(dir: &Path) -> AppResult<Vec<ResumeFile>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let path = entry.path();
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if !RESUME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) {
            continue;
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let bytes = tokio::fs::read(&path).await?;
        let mime = mime_guess::from_path(&path)
            .first_or_octet_stream()
            .to_string();
        files.push(ResumeFile::new(name, bytes, mime));
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

/// Submit every chunk and fold the per-chunk results into one ordered list.
///
/// A chunk failure (transport error, HTTP error status, or a response
/// missing `results`) stops the pipeline; no retries.
pub async fn submit_all<S>(
    service: &S,
    job_description: &str,
    files: Vec<ResumeFile>,
    batch_size: usize,
    concurrency: usize,
    progress: Option<mpsc::Sender<BatchDone>>,
) -> SubmissionOutcome
where
    S: MatchService + ?Sized,
{
    let total = batch_count(files.len(), batch_size);
    let chunks: Vec<Vec<ResumeFile>> = files.chunks(batch_size).map(|c| c.to_vec()).collect();

    info!(files = files.len(), batches = total, "starting submission");

    let mut batches = stream::iter(chunks.into_iter().enumerate())
        .map(|(index, chunk)| async move {
            service
                .submit_batch(job_description, &chunk, index == 0)
                .await
        })
        .buffered(concurrency.max(1));

    let mut accumulated: Vec<MatchResult> = Vec::new();
    let mut processed = 0usize;

    while let Some(batch) = batches.next().await {
        match batch {
            Ok(mut results) => {
                accumulated.append(&mut results);
                processed += 1;
                if let Some(tx) = &progress {
                    tx.send(BatchDone { processed, total }).await.ok();
                }
            }
            Err(error) => {
                warn!(batch = processed + 1, total, %error, "batch failed, aborting submission");
                return if processed == 0 {
                    SubmissionOutcome::Failure(error)
                } else {
                    SubmissionOutcome::PartialFailure {
                        kept: accumulated,
                        batches_done: processed,
                        error,
                    }
                };
            }
        }
    }

    info!(
        results = accumulated.len(),
        batches = total,
        "submission complete"
    );
    SubmissionOutcome::Success(accumulated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MatcherClient;
    use crate::types::DashboardSummary;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Records every call and fails on request when asked to.
    struct ScriptedService {
        calls: Mutex<Vec<(bool, usize)>>,
        fail_on: Option<usize>,
    }

    impl ScriptedService {
        fn new(fail_on: Option<usize>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on,
            }
        }

        fn calls(&self) -> Vec<(bool, usize)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MatchService for ScriptedService {
        async fn submit_batch(
            &self,
            _job_description: &str,
            files: &[ResumeFile],
            clear_database: bool,
        ) -> AppResult<Vec<MatchResult>> {
            let index = {
                let mut calls = self.calls.lock().unwrap();
                calls.push((clear_database, files.len()));
                calls.len() - 1
            };
            if self.fail_on == Some(index) {
                return Err(AppError::MalformedResponse(
                    "response is missing the results field".to_string(),
                ));
            }
            Ok(files
                .iter()
                .map(|f| MatchResult {
                    filename: f.name.clone(),
                    similarity_score: Some(50.0),
                    fit_label: Some("Fit".to_string()),
                    skills: Vec::new(),
                })
                .collect())
        }

        async fn fetch_dashboard(&self) -> AppResult<DashboardSummary> {
            unimplemented!("not used by the pipeline")
        }

        async fn download(&self, _filename: &str, _dest_dir: &Path) -> AppResult<PathBuf> {
            unimplemented!("not used by the pipeline")
        }
    }

    fn files(count: usize) -> Vec<ResumeFile> {
        (0..count)
            .map(|i| ResumeFile::new(format!("resume_{:03}.pdf", i), b"stub".to_vec(), "application/pdf"))
            .collect()
    }

    #[test]
    fn test_batch_count() {
        assert_eq!(batch_count(0, 100), 0);
        assert_eq!(batch_count(1, 100), 1);
        assert_eq!(batch_count(99, 100), 1);
        assert_eq!(batch_count(100, 100), 1);
        assert_eq!(batch_count(101, 100), 2);
        assert_eq!(batch_count(250, 100), 3);
    }

    #[tokio::test]
    async fn test_clear_flag_only_on_first_batch() {
        let service = ScriptedService::new(None);
        let outcome = submit_all(&service, "role", files(250), 100, 1, None).await;

        assert!(matches!(outcome, SubmissionOutcome::Success(ref r) if r.len() == 250));
        let calls = service.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(
            calls.iter().map(|(clear, _)| *clear).collect::<Vec<_>>(),
            vec![true, false, false]
        );
        assert_eq!(
            calls.iter().map(|(_, n)| *n).collect::<Vec<_>>(),
            vec![100, 100, 50]
        );
    }

    #[tokio::test]
    async fn test_results_preserve_batch_order() {
        let service = ScriptedService::new(None);
        let outcome = submit_all(&service, "role", files(250), 100, 1, None).await;

        let SubmissionOutcome::Success(results) = outcome else {
            panic!("expected success");
        };
        let names: Vec<&str> = results.iter().map(|r| r.filename.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[tokio::test]
    async fn test_failure_on_first_batch() {
        let service = ScriptedService::new(Some(0));
        let outcome = submit_all(&service, "role", files(150), 100, 1, None).await;

        assert!(matches!(outcome, SubmissionOutcome::Failure(_)));
        // Remaining batches were never issued.
        assert_eq!(service.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_completed_batches() {
        let service = ScriptedService::new(Some(1));
        let outcome = submit_all(&service, "role", files(250), 100, 1, None).await;

        let SubmissionOutcome::PartialFailure {
            kept,
            batches_done,
            error,
        } = outcome
        else {
            panic!("expected partial failure");
        };
        assert_eq!(batches_done, 1);
        assert_eq!(kept.len(), 100);
        assert!(matches!(error, AppError::MalformedResponse(_)));
        assert_eq!(service.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_progress_events() {
        let service = ScriptedService::new(None);
        let (tx, mut rx) = mpsc::channel(16);
        submit_all(&service, "role", files(250), 100, 1, Some(tx)).await;

        let mut seen = Vec::new();
        while let Some(event) = rx.recv().await {
            seen.push((event.processed, event.total));
        }
        assert_eq!(seen, vec![(1, 3), (2, 3), (3, 3)]);
    }

    #[tokio::test]
    async fn test_load_resume_dir_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b_resume.txt"), "plain").unwrap();
        std::fs::write(dir.path().join("a_resume.pdf"), "%PDF").unwrap();
        std::fs::write(dir.path().join("notes.exe"), "skip").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let loaded = load_resume_dir(dir.path()).await.unwrap();
        let names: Vec<&str> = loaded.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a_resume.pdf", "b_resume.txt"]);
        assert_eq!(loaded[0].mime, "application/pdf");
    }

    /// End-to-end over HTTP: 250 files at batch size 100 produce exactly
    /// three requests with clear flags true, false, false, and the final
    /// list concatenates every response's results.
    #[tokio::test]
    async fn test_end_to_end_three_requests() {
        let mut server = mockito::Server::new_async().await;
        let body = r#"{"results":[{"filename":"x.pdf","similarity_score":42.0,"fit_label":"Fit","skills":["Go"]}]}"#;
        let first = server
            .mock("POST", "/")
            .match_body(mockito::Matcher::Regex(
                r#"name="clear_database"\r?\n\r?\ntrue"#.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(1)
            .create_async()
            .await;
        let rest = server
            .mock("POST", "/")
            .match_body(mockito::Matcher::Regex(
                r#"name="clear_database"\r?\n\r?\nfalse"#.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(2)
            .create_async()
            .await;

        let client = MatcherClient::new(server.url());
        let outcome = submit_all(&client, "role", files(250), 100, 1, None).await;

        let SubmissionOutcome::Success(results) = outcome else {
            panic!("expected success");
        };
        assert_eq!(results.len(), 3);
        first.assert_async().await;
        rest.assert_async().await;
    }
}
