//! Turning a pull request diff into file change nodes.

use crate::node::{FileChangeNode, GitFileChange, InMemFileChange, RemoteFileChange};
use pr_diff_model::{FileDiff, PullRequestDiff, PullRequestRef, ReviewComment};
use pr_review_config::ReviewConfig;
use pr_review_uri::{to_pr_uri, to_review_uri, GitUriOptions, Uri};
use std::sync::Arc;

/// Where the files of a pull request can be read from.
#[derive(Debug, Clone)]
pub struct ChangeContext<'a> {
    /// Root of the local repository the file URIs are resolved against.
    pub workspace_root: String,
    /// Whether the PR's head is checked out in `workspace_root`.
    pub checked_out: bool,
    pub config: &'a ReviewConfig,
}

impl ChangeContext<'_> {
    fn local_uri(&self, path: &str) -> Uri {
        let root = self.workspace_root.trim_end_matches('/');
        Uri::file(format!("{}/{}", root, path))
    }
}

/// Build one node per changed file.
///
/// Checked-out pull requests produce git-backed nodes. Otherwise files with
/// a patch are held in memory, and files without one (binary, too large)
/// point to the hosting service.
pub fn build_file_changes(
    pull_request: Arc<PullRequestRef>,
    diff: &PullRequestDiff,
    comments: &[ReviewComment],
    ctx: &ChangeContext<'_>,
) -> Vec<FileChangeNode> {
    let nodes: Vec<FileChangeNode> = diff
        .files
        .iter()
        .map(|file| {
            let file_comments: Vec<ReviewComment> = comments
                .iter()
                .filter(|c| c.path == file.path)
                .cloned()
                .collect();
            build_node(&pull_request, diff, file, file_comments, ctx)
        })
        .collect();

    log::debug!(
        "Built {} file change nodes for PR #{}",
        nodes.len(),
        pull_request.number
    );
    nodes
}

fn build_node(
    pull_request: &Arc<PullRequestRef>,
    diff: &PullRequestDiff,
    file: &FileDiff,
    comments: Vec<ReviewComment>,
    ctx: &ChangeContext<'_>,
) -> FileChangeNode {
    let local_uri = ctx.local_uri(&file.path);
    let blob_url = pull_request
        .blob_url(&file.path)
        .and_then(|url| Uri::parse(&url).ok());

    if ctx.checked_out {
        let base_uri = ctx.local_uri(file.old_path.as_deref().unwrap_or(&file.path));
        let parent_file_path = to_review_uri(
            &base_uri,
            Some(file.old_path.as_deref().unwrap_or(&file.path)),
            None,
            &diff.base_sha,
            false,
            GitUriOptions {
                replace_file_extension: false,
                base: true,
            },
        );

        let mut node = GitFileChange::new(
            Arc::clone(pull_request),
            file.status,
            &file.path,
            local_uri,
            parent_file_path,
            file.hunks.clone(),
        )
        .with_blob_url(blob_url)
        .with_comments(comments);
        node.preserve_focus = ctx.config.preserve_focus;
        return FileChangeNode::Git(node);
    }

    let head_uri = to_pr_uri(
        &local_uri,
        pull_request,
        &diff.base_sha,
        &diff.head_sha,
        &file.path,
        false,
        file.status,
    );

    if file.hunks.is_empty() {
        log::debug!("{} has no patch, linking to remote", file.path);
        let blob_url = blob_url.unwrap_or(head_uri);
        return FileChangeNode::Remote(RemoteFileChange::new(
            Arc::clone(pull_request),
            file.status,
            &file.path,
            blob_url,
        ));
    }

    let parent_file_path = to_pr_uri(
        &local_uri,
        pull_request,
        &diff.base_sha,
        &diff.head_sha,
        &file.path,
        true,
        file.status,
    );

    let mut node = InMemFileChange::new(
        Arc::clone(pull_request),
        file.status,
        &file.path,
        blob_url.unwrap_or_else(|| head_uri.clone()),
        head_uri,
        parent_file_path,
        file.hunks.clone(),
    )
    .with_previous_file_name(file.old_path.clone())
    .with_patch(file.patch())
    .with_comments(comments);
    node.preserve_focus = ctx.config.preserve_focus;
    FileChangeNode::InMem(node)
}
