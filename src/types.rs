// Wire types for the matching service, plus shared error definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Per-resume match produced by the scoring service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub filename: String,
    // The service reports per-file processing failures with a string score;
    // anything that is not a number collapses to None.
    #[serde(default, deserialize_with = "lenient_score")]
    pub similarity_score: Option<f64>,
    #[serde(default)]
    pub fit_label: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl MatchResult {
    pub fn score_display(&self) -> String {
        match self.similarity_score {
            Some(score) => format!("{:.2}", score),
            None => "N/A".to_string(),
        }
    }

    pub fn label_display(&self) -> &str {
        self.fit_label.as_deref().unwrap_or("N/A")
    }

    pub fn skills_display(&self) -> String {
        if self.skills.is_empty() {
            "No skills found".to_string()
        } else {
            self.skills.join(", ")
        }
    }
}

fn lenient_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}

/// Response envelope of `POST /`. A payload without `results` is a failure.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchPayload {
    pub results: Option<Vec<MatchResult>>,
}

/// Aggregate statistics returned by `GET /dashboard`.
///
/// `fit_distribution` arrives as a JSON object with no guaranteed entry
/// order; a BTreeMap pins the order so the chart palette is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_jobs: u64,
    pub total_resumes: u64,
    pub avg_similarity: f64,
    #[serde(default)]
    pub fit_distribution: BTreeMap<String, u64>,
    #[serde(default)]
    pub top_skills: Vec<SkillCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCount {
    pub skill: String,
    pub count: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Service returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;
