//! Pull request diff, comment and reference types.

mod comment;
mod diff;
mod pull_request;

pub use comment::ReviewComment;
pub use diff::{DiffLine, FileDiff, FileStatus, Hunk, LineKind, PullRequestDiff};
pub use pull_request::PullRequestRef;
