//! HTTP client for the scoring service.
//!
//! The service owns matching, skill extraction, and persistence; this module
//! only speaks its three endpoints: `POST /` (multipart batch submission),
//! `GET /dashboard` (aggregate summary), `GET /download/{filename}`.

use crate::types::{AppError, AppResult, DashboardSummary, MatchPayload, MatchResult};
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

const MATCH_ENDPOINT: &str = "/";
const DOWNLOAD_ENDPOINT: &str = "/download";
const DASHBOARD_ENDPOINT: &str = "/dashboard";

/// A resume loaded into memory, ready for upload. Content is refcounted so
/// chunking the file set never copies the underlying buffers.
#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub name: String,
    pub bytes: Bytes,
    pub mime: String,
}

impl ResumeFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>, mime: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
            mime: mime.into(),
        }
    }
}

/// Seam over the scoring service, so the submission pipeline can be driven
/// against a scripted backend in tests.
#[async_trait]
pub trait MatchService: Send + Sync {
    async fn submit_batch(
        &self,
        job_description: &str,
        files: &[ResumeFile],
        clear_database: bool,
    ) -> AppResult<Vec<MatchResult>>;

    async fn fetch_dashboard(&self) -> AppResult<DashboardSummary>;

    async fn download(&self, filename: &str, dest_dir: &Path) -> AppResult<PathBuf>;
}

pub struct MatcherClient {
    client: reqwest::Client,
    base_url: String,
}

impl MatcherClient {
    /// No request timeout is set on purpose: large batches can legitimately
    /// take minutes server-side, and the original client waited forever too.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

#[async_trait]
impl MatchService for MatcherClient {
    async fn submit_batch(
        &self,
        job_description: &str,
        files: &[ResumeFile],
        clear_database: bool,
    ) -> AppResult<Vec<MatchResult>> {
        let mut form = Form::new().text("job_description", job_description.to_string());
        for file in files {
            let part = Part::stream(file.bytes.clone())
                .file_name(file.name.clone())
                .mime_str(&file.mime)?;
            form = form.part("resumes", part);
        }
        form = form.text(
            "clear_database",
            if clear_database { "true" } else { "false" },
        );

        debug!(
            files = files.len(),
            clear_database, "submitting batch to scoring service"
        );

        let response = self
            .client
            .post(self.url(MATCH_ENDPOINT))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Status(status));
        }

        let body = response.text().await?;
        let payload: MatchPayload = serde_json::from_str(&body)
            .map_err(|e| AppError::MalformedResponse(format!("invalid JSON body: {}", e)))?;

        payload.results.ok_or_else(|| {
            AppError::MalformedResponse("response is missing the results field".to_string())
        })
    }

    async fn fetch_dashboard(&self) -> AppResult<DashboardSummary> {
        let response = self.client.get(self.url(DASHBOARD_ENDPOINT)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Status(status));
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| AppError::MalformedResponse(format!("invalid dashboard body: {}", e)))
    }

    async fn download(&self, filename: &str, dest_dir: &Path) -> AppResult<PathBuf> {
        let url = format!("{}/{}", self.url(DOWNLOAD_ENDPOINT), filename);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Status(status));
        }

        tokio::fs::create_dir_all(dest_dir).await?;
        let dest = dest_dir.join(filename);
        let mut file = tokio::fs::File::create(&dest).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        info!(filename, dest = %dest.display(), "resume downloaded");
        Ok(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_file() -> ResumeFile {
        ResumeFile::new("resume.pdf", b"%PDF-1.4 stub".to_vec(), "application/pdf")
    }

    #[tokio::test]
    async fn test_submit_batch_parses_results() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"results":[
                    {"filename":"resume.pdf","similarity_score":61.2,"fit_label":"Fit","skills":["Python","SQL"]},
                    {"filename":"other.pdf","similarity_score":12.0,"fit_label":"Not Fit","skills":[]}
                ]}"#,
            )
            .create_async()
            .await;

        let client = MatcherClient::new(server.url());
        let results = client
            .submit_batch("Backend engineer", &[sample_file()], true)
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].fit_label.as_deref(), Some("Fit"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_submit_batch_missing_results_is_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message":"Failed to process the request"}"#)
            .create_async()
            .await;

        let client = MatcherClient::new(server.url());
        let err = client
            .submit_batch("Backend engineer", &[sample_file()], true)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_submit_batch_http_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let client = MatcherClient::new(server.url());
        let err = client
            .submit_batch("Backend engineer", &[sample_file()], false)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Status(_)));
    }

    #[tokio::test]
    async fn test_fetch_dashboard() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/dashboard")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "total_jobs": 2,
                    "total_resumes": 40,
                    "avg_similarity": 55.1,
                    "fit_distribution": {"Fit": 18, "Not Fit": 22},
                    "top_skills": [{"skill":"Python","count":25},{"skill":"SQL","count":14}]
                }"#,
            )
            .create_async()
            .await;

        let client = MatcherClient::new(server.url());
        let summary = client.fetch_dashboard().await.unwrap();
        assert_eq!(summary.total_resumes, 40);
        assert_eq!(summary.top_skills.len(), 2);
    }

    #[tokio::test]
    async fn test_download_streams_to_disk() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/download/resume.pdf")
            .with_status(200)
            .with_body("file bytes")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = MatcherClient::new(server.url());
        let dest = client.download("resume.pdf", dir.path()).await.unwrap();

        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "file bytes");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = MatcherClient::new("http://127.0.0.1:5000/");
        assert_eq!(client.url(DASHBOARD_ENDPOINT), "http://127.0.0.1:5000/dashboard");
    }
}
