//! JSON payloads carried in the query of review, pull request and resource URIs.

use crate::uri::Uri;
use pr_diff_model::{FileStatus, PullRequestRef};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Scheme of URIs resolved against a local git repository.
pub const REVIEW_SCHEME: &str = "review";
/// Scheme of URIs resolved against the pull request's remote.
pub const PR_SCHEME: &str = "pr";

/// Payload of a `review` URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewUriParams {
    /// Repository path of the file.
    pub path: String,
    /// Git ref the content is read from.
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
    /// Commit the content is read from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    /// Whether this is the base (left) side of a diff.
    pub base: bool,
    /// Whether the content belongs to an outdated comment thread.
    pub is_outdated: bool,
}

/// Payload of a `pr` URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrUriParams {
    pub base_commit: String,
    pub head_commit: String,
    /// Whether this is the base (left) side of a diff.
    pub is_base: bool,
    pub file_name: String,
    pub pr_number: u64,
    pub status: FileStatus,
    pub remote_name: String,
}

/// Payload of a file change node's resource URI, read by decorations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileChangeNodeUriParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_comments: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<FileStatus>,
}

/// Options for building a `review` URI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GitUriOptions {
    /// Append `.git` to the path so language features ignore the document.
    pub replace_file_extension: bool,
    /// Whether this is the base (left) side of a diff.
    pub base: bool,
}

fn to_query<T: Serialize>(params: &T) -> String {
    serde_json::to_string(params).unwrap_or_else(|e| {
        log::error!("Failed to encode URI params: {}", e);
        String::new()
    })
}

fn from_query<T: DeserializeOwned>(uri: &Uri) -> Option<T> {
    match serde_json::from_str(&uri.query) {
        Ok(params) => Some(params),
        Err(e) => {
            log::debug!("Query of {} is not a URI payload: {}", uri, e);
            None
        }
    }
}

/// Build a `review` URI for `uri`.
///
/// A non-empty `file_path` overrides the path recorded in the payload; the
/// URI path itself is kept.
pub fn to_review_uri(
    uri: &Uri,
    file_path: Option<&str>,
    git_ref: Option<&str>,
    commit: &str,
    is_outdated: bool,
    options: GitUriOptions,
) -> Uri {
    let params = ReviewUriParams {
        path: file_path
            .filter(|p| !p.is_empty())
            .unwrap_or(uri.path.as_str())
            .to_string(),
        git_ref: git_ref.map(str::to_string),
        commit: Some(commit.to_string()),
        base: options.base,
        is_outdated,
    };

    let path = if options.replace_file_extension {
        format!("{}.git", uri.path)
    } else {
        uri.path.clone()
    };

    Uri {
        scheme: REVIEW_SCHEME.to_string(),
        path,
        query: to_query(&params),
        ..uri.clone()
    }
}

/// Decode the payload of a `review` URI.
pub fn from_review_uri(uri: &Uri) -> Option<ReviewUriParams> {
    from_query(uri)
}

/// Build a `pr` URI for a file of `pull_request`.
pub fn to_pr_uri(
    uri: &Uri,
    pull_request: &PullRequestRef,
    base_commit: &str,
    head_commit: &str,
    file_name: &str,
    base: bool,
    status: FileStatus,
) -> Uri {
    let params = PrUriParams {
        base_commit: base_commit.to_string(),
        head_commit: head_commit.to_string(),
        is_base: base,
        file_name: file_name.to_string(),
        pr_number: pull_request.number,
        status,
        remote_name: pull_request.remote_name.clone(),
    };

    Uri {
        scheme: PR_SCHEME.to_string(),
        query: to_query(&params),
        ..uri.clone()
    }
}

/// Decode the payload of a `pr` URI.
pub fn from_pr_uri(uri: &Uri) -> Option<PrUriParams> {
    from_query(uri)
}

/// Annotate a resource URI with comment and change-status flags.
pub fn to_resource_uri(uri: &Uri, has_comments: bool, status: FileStatus) -> Uri {
    let params = FileChangeNodeUriParams {
        has_comments: Some(has_comments),
        status: Some(status),
    };
    uri.with_query(to_query(&params))
}

/// Decode the flags of an annotated resource URI.
pub fn from_file_change_node_uri(uri: &Uri) -> Option<FileChangeNodeUriParams> {
    from_query(uri)
}
