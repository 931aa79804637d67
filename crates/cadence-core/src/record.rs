use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw event history for a single change, as returned by a hosting-platform
/// fetcher. Timestamps are RFC3339 strings; parsing happens at analysis
/// time so one bad instant fails only the change it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub id: String,
    pub title: String,
    /// Handle of the change author.
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_by: Option<String>,
    #[serde(default)]
    pub commits: Vec<CommitRecord>,
    #[serde(default)]
    pub comments: Vec<CommentRecord>,
    #[serde(default)]
    pub approvals: Vec<ApprovalRecord>,
    #[serde(default)]
    pub pipelines: Vec<PipelineRecord>,
}

/// One code update pushed to the change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRecord {
    pub ts: String,
    pub author: String,
}

/// One discussion note on the change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRecord {
    pub ts: String,
    pub handle: String,
    pub body: String,
}

/// One approval granted on the change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalRecord {
    pub ts: String,
    pub handle: String,
}

/// One pipeline run triggered for the change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRecord {
    pub ts: String,
    pub status: PipelineStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Pipeline run status as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    Pending,
    Running,
    Success,
    Failed,
    Canceled,
}

impl PipelineStatus {
    /// Whether the run has reached a final state.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            PipelineStatus::Success | PipelineStatus::Failed | PipelineStatus::Canceled
        )
    }
}

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStatus::Pending => write!(f, "pending"),
            PipelineStatus::Running => write!(f, "running"),
            PipelineStatus::Success => write!(f, "success"),
            PipelineStatus::Failed => write!(f, "failed"),
            PipelineStatus::Canceled => write!(f, "canceled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_record_deserializes_with_defaults() {
        let json = r#"{
            "id": "1042",
            "title": "Add retry to uploader",
            "author": "alice",
            "created_at": "2026-03-01T09:00:00Z"
        }"#;
        let record: ChangeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "1042");
        assert!(record.merged_at.is_none());
        assert!(record.commits.is_empty());
        assert!(record.comments.is_empty());
        assert!(record.approvals.is_empty());
        assert!(record.pipelines.is_empty());
    }

    #[test]
    fn pipeline_status_snake_case() {
        let status: PipelineStatus = serde_json::from_str("\"success\"").unwrap();
        assert_eq!(status, PipelineStatus::Success);
        assert!(status.is_terminal());
        let running: PipelineStatus = serde_json::from_str("\"running\"").unwrap();
        assert!(!running.is_terminal());
    }

    #[test]
    fn change_record_full_roundtrip() {
        let record = ChangeRecord {
            id: "7".into(),
            title: "Fix flaky test".into(),
            author: "bob".into(),
            author_name: Some("Bob".into()),
            created_at: "2026-03-01T09:00:00Z".into(),
            merged_at: Some("2026-03-02T09:00:00Z".into()),
            merged_by: Some("carol".into()),
            commits: vec![CommitRecord {
                ts: "2026-03-01T10:00:00Z".into(),
                author: "bob".into(),
            }],
            comments: vec![CommentRecord {
                ts: "2026-03-01T11:00:00Z".into(),
                handle: "carol".into(),
                body: "LGTM".into(),
            }],
            approvals: vec![ApprovalRecord {
                ts: "2026-03-01T12:00:00Z".into(),
                handle: "carol".into(),
            }],
            pipelines: vec![PipelineRecord {
                ts: "2026-03-01T10:05:00Z".into(),
                status: PipelineStatus::Success,
                name: Some("test".into()),
            }],
        };
        let json = serde_json::to_string(&record).unwrap();
        let parsed: ChangeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.commits.len(), 1);
        assert_eq!(parsed.pipelines[0].status, PipelineStatus::Success);
    }
}
