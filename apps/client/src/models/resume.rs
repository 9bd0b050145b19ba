use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::timestamp;

/// Server-assigned résumé identifier.
pub type ResumeId = i64;

/// Shown when the backend stored a résumé without a file name.
pub const FALLBACK_DISPLAY_NAME: &str = "Current Resume";

/// A résumé row as returned by `/resumes` and `/resumes/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub resume_id: ResumeId,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub resume_text: Option<String>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// The single résumé the client is currently operating on.
///
/// `version` is a local freshness tick: 1 on first load, +1 on every reload of
/// the slot. It has nothing to do with any server-side revision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveResume {
    pub id: ResumeId,
    pub version: u64,
    pub display_name: String,
    pub last_modified: DateTime<Utc>,
    pub content: String,
}

impl ActiveResume {
    pub fn from_record(record: ResumeRecord, version: u64) -> Self {
        let display_name = record
            .file_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| FALLBACK_DISPLAY_NAME.to_string());
        Self {
            id: record.resume_id,
            version,
            display_name,
            last_modified: record.updated_at.unwrap_or(record.created_at),
            content: record.resume_text.unwrap_or_default(),
        }
    }
}

/// `POST /upload/pdf` envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<UploadedResume>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadedResume {
    pub resume_id: ResumeId,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub resume_text: Option<String>,
}

/// Plain acknowledgement body, e.g. from `DELETE /resumes/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(file_name: Option<&str>, text: Option<&str>, updated: Option<&str>) -> ResumeRecord {
        serde_json::from_value(serde_json::json!({
            "resume_id": 42,
            "user_id": 1,
            "file_name": file_name,
            "resume_text": text,
            "created_at": "2024-05-01T10:00:00",
            "updated_at": updated
        }))
        .unwrap()
    }

    #[test]
    fn test_active_resume_from_full_record() {
        let active = ActiveResume::from_record(
            record(Some("cv.txt"), Some("Hello"), Some("2024-05-03T09:00:00")),
            1,
        );
        assert_eq!(active.id, 42);
        assert_eq!(active.display_name, "cv.txt");
        assert_eq!(active.content, "Hello");
        assert_eq!(active.version, 1);
        assert_eq!(
            active.last_modified,
            timestamp::parse("2024-05-03T09:00:00").unwrap()
        );
    }

    #[test]
    fn test_active_resume_fallbacks() {
        let active = ActiveResume::from_record(record(None, None, None), 3);
        assert_eq!(active.display_name, FALLBACK_DISPLAY_NAME);
        assert_eq!(active.content, "");
        assert_eq!(
            active.last_modified,
            timestamp::parse("2024-05-01T10:00:00").unwrap()
        );
    }

    #[test]
    fn test_upload_envelope_without_data() {
        let parsed: UploadResponse =
            serde_json::from_str(r#"{"success": false, "message": "Only PDF files are allowed"}"#)
                .unwrap();
        assert!(!parsed.success);
        assert!(parsed.data.is_none());
    }
}
