use serde::{Deserialize, Serialize};

/// Retrieval parameters the backend uses when grounding a review.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewParams {
    /// Top-k documents for the MMR retriever (1..=10).
    pub k: u32,
    /// MMR diversity parameter (0.0..=1.0).
    pub lambda_mult: f64,
}

impl Default for ReviewParams {
    fn default() -> Self {
        Self {
            k: 2,
            lambda_mult: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeReview {
    #[serde(default)]
    pub buzzwords: Vec<String>,
    #[serde(default)]
    pub weak_sentences: Vec<String>,
    #[serde(default)]
    pub strong_points: Vec<String>,
    pub skills_score: u8,
    pub experience_score: u8,
    pub clarity_score: u8,
    pub ats_score: u8,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub irrelevant_content: Vec<String>,
    #[serde(default)]
    pub role_fit_analysis: String,
    #[serde(default)]
    pub improvement_suggestions: Vec<String>,
    #[serde(default)]
    pub final_feedback: String,
}

impl ResumeReview {
    /// Mean of the four 0–10 scores, scaled to 0–100.
    pub fn overall_score(&self) -> u32 {
        let sum = u32::from(self.skills_score)
            + u32::from(self.experience_score)
            + u32::from(self.clarity_score)
            + u32::from(self.ats_score);
        sum * 10 / 4
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeReviewResponse {
    pub review: ResumeReview,
}
