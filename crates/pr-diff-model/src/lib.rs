//! # pr-diff-model
//!
//! Data model for the file changes of a pull request: diff hunks, review
//! comments and the pull request a change belongs to.
//!
//! ## Diff positions
//!
//! Review systems anchor a comment to a *diff position*: the number of lines
//! below the first `@@` header of a file's patch. The [`position`] module maps
//! such a position back to a concrete, zero-based line of the file so a
//! viewer can place the cursor next to the comment.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pr_diff_model::parser::parse_patch;
//! use pr_diff_model::position::default_selection;
//!
//! let hunks = parse_patch("src/lib.rs", patch_text)?;
//! if let Some(line) = default_selection(&hunks, &comments) {
//!     // open the file with the cursor on `line`
//! }
//! ```

pub mod model;
pub mod parser;
pub mod position;

// Re-export commonly used types
pub use model::{
    DiffLine, FileDiff, FileStatus, Hunk, LineKind, PullRequestDiff, PullRequestRef, ReviewComment,
};
pub use parser::{parse_patch, parse_unified_diff, ParseError};
pub use position::{
    comment_line, default_selection, diff_line_by_position, display_line, display_line_for_position,
    representative_comment, zero_based,
};
