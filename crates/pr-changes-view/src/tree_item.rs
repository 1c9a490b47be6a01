//! Host-agnostic tree item description.

use pr_review_uri::Uri;
use serde::Serialize;

/// Command opening a file on the hosting service.
pub const OPEN_DIFF_GITHUB: &str = "pr.openDiffGitHub";
/// Command opening the diff of an in-memory file change.
pub const OPEN_DIFF_VIEW: &str = "pr.openDiffView";
/// Command opening a file change from the local checkout.
pub const OPEN_CHANGED_FILE: &str = "pr.openChangedFile";

/// Icon shown next to a tree item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Icon {
    File,
    Folder,
}

/// Whether a tree item has children and shows them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CollapsibleState {
    #[default]
    None,
    Collapsed,
    Expanded,
}

/// Zero-based line and character in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

/// A range in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Empty range at the start of `line`.
    pub fn caret(line: u32) -> Self {
        let position = Position { line, character: 0 };
        Self {
            start: position,
            end: position,
        }
    }
}

/// Options for showing a document opened from the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowOptions {
    /// Keep focus in the tree.
    pub preserve_focus: bool,
    /// Initial selection in the opened document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<Range>,
}

/// An argument passed to a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum CommandArgument {
    Uri(Uri),
    /// The file change node itself, identified by its file name.
    FileChange(String),
}

/// Command run when a tree item is activated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    pub title: String,
    pub command: String,
    pub arguments: Vec<CommandArgument>,
}

impl Command {
    pub fn new(title: &str, command: &str, arguments: Vec<CommandArgument>) -> Self {
        Self {
            title: title.to_string(),
            command: command.to_string(),
            arguments,
        }
    }
}

/// Everything a host tree view needs to render one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeItem {
    pub label: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub icon: Icon,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_uri: Option<Uri>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<Command>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_options: Option<ShowOptions>,
    pub collapsible_state: CollapsibleState,
}

impl TreeItem {
    /// Item for a directory grouping file changes.
    pub fn directory(name: impl Into<String>, expanded: bool) -> Self {
        Self {
            label: name.into(),
            description: String::new(),
            icon: Icon::Folder,
            resource_uri: None,
            context_value: None,
            command: None,
            show_options: None,
            collapsible_state: if expanded {
                CollapsibleState::Expanded
            } else {
                CollapsibleState::Collapsed
            },
        }
    }
}
