use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::resume::ResumeId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobMatch {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub salary_range: Option<String>,
    pub similarity_score: f64,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSearchResponse {
    pub query: String,
    pub limit: u32,
    pub total_matches: u32,
    #[serde(default)]
    pub matches: Vec<JobMatch>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDetail {
    pub job_id: String,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub full_description: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub salary_range: Option<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// A persisted job-fit analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobFitSaved {
    pub analysis_id: i64,
    pub result: JobSearchResponse,
}

/// `POST /search` body.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub limit: u32,
}

/// `POST /search/resume` body. Absent options are omitted from the JSON.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeSearchRequest {
    pub resume_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_id: Option<ResumeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_analysis: Option<Value>,
    pub limit: u32,
    pub min_score: f64,
}

impl ResumeSearchRequest {
    pub const DEFAULT_LIMIT: u32 = 10;
    pub const DEFAULT_MIN_SCORE: f64 = 0.6;

    pub fn new(resume_text: impl Into<String>) -> Self {
        Self {
            resume_text: resume_text.into(),
            resume_id: None,
            role: None,
            location: None,
            resume_analysis: None,
            limit: Self::DEFAULT_LIMIT,
            min_score: Self::DEFAULT_MIN_SCORE,
        }
    }
}
