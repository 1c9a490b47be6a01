//! File change nodes of the pull request tree.

use crate::tree_item::{
    CollapsibleState, Command, CommandArgument, Icon, Range, ShowOptions, TreeItem,
    OPEN_CHANGED_FILE, OPEN_DIFF_GITHUB, OPEN_DIFF_VIEW,
};
use pr_diff_model::position;
use pr_diff_model::{FileStatus, Hunk, PullRequestRef, ReviewComment};
use pr_review_uri::{to_resource_uri, Uri};
use std::sync::Arc;

/// File name without its directory.
fn label_of(file_name: &str) -> String {
    file_name
        .rsplit('/')
        .next()
        .unwrap_or(file_name)
        .to_string()
}

/// Directory of the file relative to the repository root, empty at the root.
fn description_of(file_name: &str) -> String {
    let file_name = file_name.trim_start_matches("./");
    file_name
        .rsplit_once('/')
        .map(|(dir, _)| dir.to_string())
        .unwrap_or_default()
}

fn context_value_of(status: FileStatus) -> String {
    format!("filechange:{}", status.as_str())
}

/// Hunks and comments of a file, plus what they determine in the tree item.
#[derive(Debug, Clone)]
struct CommentedDiff {
    status: FileStatus,
    file_path: Uri,
    hunks: Vec<Hunk>,
    comments: Vec<ReviewComment>,
    resource_uri: Uri,
    selection: Option<Range>,
}

impl CommentedDiff {
    fn new(status: FileStatus, file_path: Uri, hunks: Vec<Hunk>) -> Self {
        let resource_uri = to_resource_uri(&file_path, false, status);
        Self {
            status,
            file_path,
            hunks,
            comments: Vec::new(),
            resource_uri,
            selection: None,
        }
    }

    fn update(&mut self, comments: Vec<ReviewComment>) {
        self.resource_uri = to_resource_uri(&self.file_path, !comments.is_empty(), self.status);
        self.selection = position::default_selection(&self.hunks, &comments).map(Range::caret);
        self.comments = comments;
    }

    fn comment_line(&self, comment: &ReviewComment) -> u32 {
        position::comment_line(&self.hunks, comment)
    }
}

/// A file whose content cannot be resolved locally; users are sent to the
/// hosting service instead.
#[derive(Debug, Clone)]
pub struct RemoteFileChange {
    pub pull_request: Arc<PullRequestRef>,
    pub status: FileStatus,
    pub file_name: String,
    pub blob_url: Uri,
    resource_uri: Uri,
}

impl RemoteFileChange {
    pub fn new(
        pull_request: Arc<PullRequestRef>,
        status: FileStatus,
        file_name: impl Into<String>,
        blob_url: Uri,
    ) -> Self {
        let resource_uri = to_resource_uri(&blob_url, false, status);
        Self {
            pull_request,
            status,
            file_name: file_name.into(),
            blob_url,
            resource_uri,
        }
    }

    pub fn resource_uri(&self) -> &Uri {
        &self.resource_uri
    }

    pub fn tree_item(&self) -> TreeItem {
        TreeItem {
            label: label_of(&self.file_name),
            description: description_of(&self.file_name),
            icon: Icon::File,
            resource_uri: Some(self.resource_uri.clone()),
            context_value: None,
            command: Some(Command::new(
                "show remote file",
                OPEN_DIFF_GITHUB,
                vec![CommandArgument::Uri(self.blob_url.clone())],
            )),
            show_options: None,
            collapsible_state: CollapsibleState::None,
        }
    }
}

/// A file whose content is held in memory (the patch) and resolved when the
/// diff is opened.
#[derive(Debug, Clone)]
pub struct InMemFileChange {
    pub pull_request: Arc<PullRequestRef>,
    pub file_name: String,
    pub previous_file_name: Option<String>,
    pub blob_url: Uri,
    pub parent_file_path: Uri,
    pub patch: String,
    pub preserve_focus: bool,
    diff: CommentedDiff,
}

impl InMemFileChange {
    pub fn new(
        pull_request: Arc<PullRequestRef>,
        status: FileStatus,
        file_name: impl Into<String>,
        blob_url: Uri,
        file_path: Uri,
        parent_file_path: Uri,
        hunks: Vec<Hunk>,
    ) -> Self {
        Self {
            pull_request,
            file_name: file_name.into(),
            previous_file_name: None,
            blob_url,
            parent_file_path,
            patch: String::new(),
            preserve_focus: true,
            diff: CommentedDiff::new(status, file_path, hunks),
        }
    }

    pub fn with_previous_file_name(mut self, previous_file_name: Option<String>) -> Self {
        self.previous_file_name = previous_file_name;
        self
    }

    pub fn with_patch(mut self, patch: impl Into<String>) -> Self {
        self.patch = patch.into();
        self
    }

    pub fn with_comments(mut self, comments: Vec<ReviewComment>) -> Self {
        self.update(comments);
        self
    }

    pub fn status(&self) -> FileStatus {
        self.diff.status
    }

    pub fn file_path(&self) -> &Uri {
        &self.diff.file_path
    }

    pub fn hunks(&self) -> &[Hunk] {
        &self.diff.hunks
    }

    pub fn comments(&self) -> &[ReviewComment] {
        &self.diff.comments
    }

    pub fn resource_uri(&self) -> &Uri {
        &self.diff.resource_uri
    }

    pub fn show_options(&self) -> ShowOptions {
        ShowOptions {
            preserve_focus: self.preserve_focus,
            selection: self.diff.selection,
        }
    }

    /// Replace the file's comments.
    pub fn update(&mut self, comments: Vec<ReviewComment>) {
        self.diff.update(comments);
    }

    /// Zero-based line a comment is displayed at.
    pub fn comment_line(&self, comment: &ReviewComment) -> u32 {
        self.diff.comment_line(comment)
    }

    pub fn tree_item(&self) -> TreeItem {
        TreeItem {
            label: label_of(&self.file_name),
            description: description_of(&self.file_name),
            icon: Icon::File,
            resource_uri: Some(self.diff.resource_uri.clone()),
            context_value: Some(context_value_of(self.diff.status)),
            command: Some(Command::new(
                "show diff",
                OPEN_DIFF_VIEW,
                vec![CommandArgument::FileChange(self.file_name.clone())],
            )),
            show_options: Some(self.show_options()),
            collapsible_state: CollapsibleState::None,
        }
    }
}

/// A file whose content can be resolved from a local checkout by commit.
#[derive(Debug, Clone)]
pub struct GitFileChange {
    pub pull_request: Arc<PullRequestRef>,
    pub file_name: String,
    pub blob_url: Option<Uri>,
    pub parent_file_path: Uri,
    pub preserve_focus: bool,
    diff: CommentedDiff,
}

impl GitFileChange {
    pub fn new(
        pull_request: Arc<PullRequestRef>,
        status: FileStatus,
        file_name: impl Into<String>,
        file_path: Uri,
        parent_file_path: Uri,
        hunks: Vec<Hunk>,
    ) -> Self {
        Self {
            pull_request,
            file_name: file_name.into(),
            blob_url: None,
            parent_file_path,
            preserve_focus: true,
            diff: CommentedDiff::new(status, file_path, hunks),
        }
    }

    pub fn with_blob_url(mut self, blob_url: Option<Uri>) -> Self {
        self.blob_url = blob_url;
        self
    }

    pub fn with_comments(mut self, comments: Vec<ReviewComment>) -> Self {
        self.update(comments);
        self
    }

    pub fn status(&self) -> FileStatus {
        self.diff.status
    }

    pub fn file_path(&self) -> &Uri {
        &self.diff.file_path
    }

    pub fn hunks(&self) -> &[Hunk] {
        &self.diff.hunks
    }

    pub fn comments(&self) -> &[ReviewComment] {
        &self.diff.comments
    }

    pub fn resource_uri(&self) -> &Uri {
        &self.diff.resource_uri
    }

    pub fn show_options(&self) -> ShowOptions {
        ShowOptions {
            preserve_focus: self.preserve_focus,
            selection: self.diff.selection,
        }
    }

    /// Replace the file's comments.
    pub fn update(&mut self, comments: Vec<ReviewComment>) {
        self.diff.update(comments);
    }

    /// Zero-based line a comment is displayed at.
    pub fn comment_line(&self, comment: &ReviewComment) -> u32 {
        self.diff.comment_line(comment)
    }

    pub fn tree_item(&self) -> TreeItem {
        TreeItem {
            label: label_of(&self.file_name),
            description: description_of(&self.file_name),
            icon: Icon::File,
            resource_uri: Some(self.diff.resource_uri.clone()),
            context_value: Some(context_value_of(self.diff.status)),
            command: Some(Command::new(
                "open changed file",
                OPEN_CHANGED_FILE,
                vec![CommandArgument::FileChange(self.file_name.clone())],
            )),
            show_options: Some(self.show_options()),
            collapsible_state: CollapsibleState::None,
        }
    }
}

/// Any file change shown in the pull request tree.
#[derive(Debug, Clone)]
pub enum FileChangeNode {
    Remote(RemoteFileChange),
    InMem(InMemFileChange),
    Git(GitFileChange),
}

impl FileChangeNode {
    pub fn file_name(&self) -> &str {
        match self {
            FileChangeNode::Remote(node) => &node.file_name,
            FileChangeNode::InMem(node) => &node.file_name,
            FileChangeNode::Git(node) => &node.file_name,
        }
    }

    pub fn status(&self) -> FileStatus {
        match self {
            FileChangeNode::Remote(node) => node.status,
            FileChangeNode::InMem(node) => node.status(),
            FileChangeNode::Git(node) => node.status(),
        }
    }

    pub fn comments(&self) -> &[ReviewComment] {
        match self {
            FileChangeNode::Remote(_) => &[],
            FileChangeNode::InMem(node) => node.comments(),
            FileChangeNode::Git(node) => node.comments(),
        }
    }

    /// Replace the comments of a node. Remote nodes carry no comments and
    /// return `false`.
    pub fn update_comments(&mut self, comments: Vec<ReviewComment>) -> bool {
        match self {
            FileChangeNode::Remote(_) => false,
            FileChangeNode::InMem(node) => {
                node.update(comments);
                true
            }
            FileChangeNode::Git(node) => {
                node.update(comments);
                true
            }
        }
    }

    pub fn tree_item(&self) -> TreeItem {
        match self {
            FileChangeNode::Remote(node) => node.tree_item(),
            FileChangeNode::InMem(node) => node.tree_item(),
            FileChangeNode::Git(node) => node.tree_item(),
        }
    }
}

/// Nodes backed by the local checkout.
pub fn git_file_changes(nodes: &[FileChangeNode]) -> Vec<&GitFileChange> {
    nodes
        .iter()
        .filter_map(|node| match node {
            FileChangeNode::Git(git) => Some(git),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pr_diff_model::DiffLine;
    use pr_review_uri::from_file_change_node_uri;
    use pretty_assertions::assert_eq;

    fn pull_request() -> Arc<PullRequestRef> {
        Arc::new(PullRequestRef::new(42, "origin", "base123", "head456"))
    }

    fn hunks() -> Vec<Hunk> {
        vec![Hunk::new(5, 2, 5, 2)
            .line(DiffLine::context("a", 5, 5))
            .line(DiffLine::deletion("b", 6))
            .line(DiffLine::addition("c", 6))]
    }

    fn in_mem() -> InMemFileChange {
        InMemFileChange::new(
            pull_request(),
            FileStatus::Modified,
            "src/view/tree.rs",
            Uri::parse("https://github.com/o/r/blob/head456/src/view/tree.rs").unwrap(),
            Uri::file("/repo/src/view/tree.rs"),
            Uri::file("/repo/src/view/tree.rs").with_scheme("pr"),
            hunks(),
        )
    }

    #[test]
    fn test_label_and_description() {
        assert_eq!(label_of("src/view/tree.rs"), "tree.rs");
        assert_eq!(description_of("src/view/tree.rs"), "src/view");
        assert_eq!(label_of("README.md"), "README.md");
        assert_eq!(description_of("README.md"), "");
        assert_eq!(description_of("./src/a.rs"), "src");
    }

    #[test]
    fn test_remote_file_change_item() {
        let blob = Uri::parse("https://github.com/o/r/blob/head456/assets/logo.png").unwrap();
        let node = RemoteFileChange::new(
            pull_request(),
            FileStatus::Added,
            "assets/logo.png",
            blob.clone(),
        );
        let item = node.tree_item();

        assert_eq!(item.label, "logo.png");
        assert_eq!(item.description, "assets");
        assert_eq!(item.icon, Icon::File);
        assert_eq!(item.context_value, None);

        let command = item.command.unwrap();
        assert_eq!(command.command, OPEN_DIFF_GITHUB);
        assert_eq!(command.title, "show remote file");
        assert_eq!(command.arguments, vec![CommandArgument::Uri(blob)]);

        let flags = from_file_change_node_uri(&item.resource_uri.unwrap()).unwrap();
        assert_eq!(flags.has_comments, Some(false));
        assert_eq!(flags.status, Some(FileStatus::Added));
    }

    #[test]
    fn test_in_mem_without_comments() {
        let node = in_mem();
        let item = node.tree_item();

        assert_eq!(item.context_value.as_deref(), Some("filechange:MODIFY"));
        assert_eq!(item.command.as_ref().unwrap().command, OPEN_DIFF_VIEW);
        assert_eq!(item.command.as_ref().unwrap().title, "show diff");
        assert_eq!(
            item.show_options,
            Some(ShowOptions {
                preserve_focus: true,
                selection: None,
            })
        );

        let flags = from_file_change_node_uri(node.resource_uri()).unwrap();
        assert_eq!(flags.has_comments, Some(false));
    }

    #[test]
    fn test_in_mem_update_selects_topmost_comment() {
        let mut node = in_mem();
        node.update(vec![
            ReviewComment::new(1, "src/view/tree.rs", Some(3)),
            ReviewComment::new(2, "src/view/tree.rs", Some(2)),
        ]);

        // Position 2 is the deletion of old line 6
        assert_eq!(node.show_options().selection, Some(Range::caret(5)));
        let flags = from_file_change_node_uri(node.resource_uri()).unwrap();
        assert_eq!(flags.has_comments, Some(true));

        node.update(Vec::new());
        assert_eq!(node.show_options().selection, None);
        assert!(node.comments().is_empty());
    }

    #[test]
    fn test_outdated_comments_mark_but_do_not_select() {
        let node = in_mem().with_comments(vec![ReviewComment::outdated(1, "src/view/tree.rs", 3)]);

        assert_eq!(node.show_options().selection, None);
        let flags = from_file_change_node_uri(node.resource_uri()).unwrap();
        assert_eq!(flags.has_comments, Some(true));

        // The comment itself is still placed by its original position
        assert_eq!(node.comment_line(&node.comments()[0]), 5);
    }

    #[test]
    fn test_git_file_change_item() {
        let node = GitFileChange::new(
            pull_request(),
            FileStatus::Deleted,
            "old.rs",
            Uri::file("/repo/old.rs"),
            Uri::file("/repo/old.rs").with_scheme("review"),
            hunks(),
        )
        .with_comments(vec![ReviewComment::new(1, "old.rs", Some(3))]);

        let item = node.tree_item();
        assert_eq!(item.context_value.as_deref(), Some("filechange:DELETE"));
        let command = item.command.unwrap();
        assert_eq!(command.command, OPEN_CHANGED_FILE);
        assert_eq!(command.title, "open changed file");
        assert_eq!(
            item.show_options.unwrap().selection,
            Some(Range::caret(5))
        );
        assert_eq!(
            node.comment_line(&ReviewComment::new(2, "old.rs", Some(99))),
            0
        );
    }

    #[test]
    fn test_node_dispatch_and_filter() {
        let remote = FileChangeNode::Remote(RemoteFileChange::new(
            pull_request(),
            FileStatus::Added,
            "a.png",
            Uri::file("/a.png"),
        ));
        let git = FileChangeNode::Git(GitFileChange::new(
            pull_request(),
            FileStatus::Modified,
            "b.rs",
            Uri::file("/repo/b.rs"),
            Uri::file("/repo/b.rs"),
            hunks(),
        ));
        let mut nodes = vec![remote, git, FileChangeNode::InMem(in_mem())];

        let git_nodes = git_file_changes(&nodes);
        assert_eq!(git_nodes.len(), 1);
        assert_eq!(git_nodes[0].file_name, "b.rs");

        assert!(!nodes[0].update_comments(vec![ReviewComment::new(1, "a.png", Some(1))]));
        assert!(nodes[0].comments().is_empty());
        assert!(nodes[1].update_comments(vec![ReviewComment::new(2, "b.rs", Some(1))]));
        assert_eq!(nodes[1].comments().len(), 1);
        assert_eq!(nodes[2].status(), FileStatus::Modified);
        assert_eq!(nodes[2].file_name(), "src/view/tree.rs");
    }
}
