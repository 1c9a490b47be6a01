//! # pr-changes-view
//!
//! Tree view model for the files changed by a pull request.
//!
//! Every changed file becomes a [`FileChangeNode`]. Depending on where its
//! content can be read from, a node is
//!
//! - [`RemoteFileChange`]: only viewable on the hosting service,
//! - [`InMemFileChange`]: resolved from the patch held in memory,
//! - [`GitFileChange`]: resolved from a local checkout by commit.
//!
//! Nodes render to host-agnostic [`TreeItem`]s: a label, an icon, the
//! command run when the item is activated and the editor options (cursor
//! line) to open the file with. [`FileTree`] arranges the nodes either as a
//! flat list or grouped under their directories.

pub mod changes;
pub mod layout;
pub mod node;
pub mod tree_item;

pub use changes::{build_file_changes, ChangeContext};
pub use layout::{FileTree, FlatFileEntry};
pub use node::{git_file_changes, FileChangeNode, GitFileChange, InMemFileChange, RemoteFileChange};
pub use tree_item::{
    CollapsibleState, Command, CommandArgument, Icon, Position, Range, ShowOptions, TreeItem,
};
