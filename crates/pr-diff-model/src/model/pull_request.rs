//! The pull request a set of file changes belongs to.

use serde::{Deserialize, Serialize};

/// Identifies a pull request and the commits its diff spans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRef {
    /// PR number.
    pub number: u64,
    /// Name of the git remote hosting the PR's repository.
    pub remote_name: String,
    /// Base commit SHA.
    pub base_sha: String,
    /// Head commit SHA.
    pub head_sha: String,
    /// Web URL of the PR.
    #[serde(default)]
    pub html_url: Option<String>,
}

impl PullRequestRef {
    /// Create a new pull request reference.
    pub fn new(
        number: u64,
        remote_name: impl Into<String>,
        base_sha: impl Into<String>,
        head_sha: impl Into<String>,
    ) -> Self {
        Self {
            number,
            remote_name: remote_name.into(),
            base_sha: base_sha.into(),
            head_sha: head_sha.into(),
            html_url: None,
        }
    }

    /// Set the web URL, builder style.
    pub fn with_html_url(mut self, html_url: impl Into<String>) -> Self {
        self.html_url = Some(html_url.into());
        self
    }

    /// Web URL of `path` at the head commit.
    ///
    /// Derived from the PR's web URL (`<repo>/pull/<number>`), `None` when
    /// that is unknown or has a different shape.
    pub fn blob_url(&self, path: &str) -> Option<String> {
        let html_url = self.html_url.as_deref()?.trim_end_matches('/');
        let repo_url = html_url.strip_suffix(&format!("/pull/{}", self.number))?;
        Some(format!("{}/blob/{}/{}", repo_url, self.head_sha, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_url() {
        let pr = PullRequestRef::new(42, "origin", "base", "head")
            .with_html_url("https://github.com/owner/repo/pull/42");
        assert_eq!(
            pr.blob_url("src/main.rs").as_deref(),
            Some("https://github.com/owner/repo/blob/head/src/main.rs")
        );
    }

    #[test]
    fn test_blob_url_unknown() {
        let pr = PullRequestRef::new(42, "origin", "base", "head");
        assert_eq!(pr.blob_url("a.rs"), None);

        let other = pr.with_html_url("https://github.com/owner/repo/pull/7");
        assert_eq!(other.blob_url("a.rs"), None);
    }
}
