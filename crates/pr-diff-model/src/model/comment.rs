//! Review comment data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A review comment anchored to a file of a pull request.
///
/// Field names follow the GitHub pull request review comment payload, so a
/// list of comments fetched from the API deserializes directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewComment {
    /// GitHub comment ID.
    pub id: u64,
    /// File path the comment is on.
    pub path: String,
    /// Diff position in the current patch. `None` once the comment is outdated.
    #[serde(default)]
    pub position: Option<u32>,
    /// Diff position in the patch the comment was written against.
    #[serde(default)]
    pub original_position: Option<u32>,
    /// Commit the current position refers to.
    #[serde(default)]
    pub commit_id: Option<String>,
    /// Commit the comment was written against.
    #[serde(default)]
    pub original_commit_id: Option<String>,
    /// Comment body (markdown).
    #[serde(default)]
    pub body: String,
    /// Author's login.
    #[serde(default)]
    pub author: String,
    /// When the comment was created.
    pub created_at: DateTime<Utc>,
}

impl ReviewComment {
    /// Create a comment anchored at `position`.
    pub fn new(id: u64, path: impl Into<String>, position: Option<u32>) -> Self {
        Self {
            id,
            path: path.into(),
            position,
            original_position: position,
            commit_id: None,
            original_commit_id: None,
            body: String::new(),
            author: String::new(),
            created_at: Utc::now(),
        }
    }

    /// Create an outdated comment that only knows its original position.
    pub fn outdated(id: u64, path: impl Into<String>, original_position: u32) -> Self {
        Self {
            position: None,
            original_position: Some(original_position),
            ..Self::new(id, path, None)
        }
    }

    /// Set the comment body, builder style.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// The diff no longer contains the line this comment was written on.
    pub fn is_outdated(&self) -> bool {
        self.position.is_none() && self.original_position.is_some()
    }

    /// Current position, falling back to the original one.
    pub fn effective_position(&self) -> Option<u32> {
        self.position.or(self.original_position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outdated_comment() {
        let comment = ReviewComment::outdated(1, "src/lib.rs", 12);
        assert!(comment.is_outdated());
        assert_eq!(comment.position, None);
        assert_eq!(comment.effective_position(), Some(12));
    }

    #[test]
    fn test_current_comment_prefers_position() {
        let mut comment = ReviewComment::new(2, "src/lib.rs", Some(4));
        comment.original_position = Some(9);
        assert!(!comment.is_outdated());
        assert_eq!(comment.effective_position(), Some(4));
    }

    #[test]
    fn test_deserialize_github_payload() {
        let json = r#"{
            "id": 42,
            "path": "src/main.rs",
            "position": null,
            "original_position": 7,
            "commit_id": "def456",
            "original_commit_id": "abc123",
            "body": "nit",
            "author": "octocat",
            "created_at": "2024-01-15T10:30:00Z"
        }"#;

        let comment: ReviewComment = serde_json::from_str(json).unwrap();
        assert_eq!(comment.id, 42);
        assert!(comment.is_outdated());
        assert_eq!(comment.original_commit_id.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_deserialize_minimal_payload() {
        let json = r#"{"id": 1, "path": "a.rs", "created_at": "2024-01-15T10:30:00Z"}"#;
        let comment: ReviewComment = serde_json::from_str(json).unwrap();
        assert_eq!(comment.position, None);
        assert!(comment.body.is_empty());
        assert!(!comment.is_outdated());
    }
}
