//! Files, hunks and lines of a pull request diff.

use serde::{Deserialize, Serialize};
use std::fmt;

/// All file changes between the base and head commit of a pull request.
#[derive(Debug, Clone)]
pub struct PullRequestDiff {
    pub base_sha: String,
    pub head_sha: String,
    /// Changed files in diff order.
    pub files: Vec<FileDiff>,
    pub total_additions: usize,
    pub total_deletions: usize,
}

impl PullRequestDiff {
    pub fn new(base_sha: impl Into<String>, head_sha: impl Into<String>) -> Self {
        Self {
            base_sha: base_sha.into(),
            head_sha: head_sha.into(),
            files: Vec::new(),
            total_additions: 0,
            total_deletions: 0,
        }
    }

    /// Sum the per-file counts into the totals.
    pub fn recalculate_totals(&mut self) {
        let (additions, deletions) = self
            .files
            .iter()
            .fold((0, 0), |(a, d), f| (a + f.additions, d + f.deletions));
        self.total_additions = additions;
        self.total_deletions = deletions;
    }

    /// Look up a file by its path on the head side.
    pub fn file(&self, path: &str) -> Option<&FileDiff> {
        self.files.iter().find(|f| f.path == path)
    }
}

/// Changes of one file.
#[derive(Debug, Clone)]
pub struct FileDiff {
    /// Path on the head side, or the removed path for deletions.
    pub path: String,
    /// Path on the base side, set for renames and copies only.
    pub old_path: Option<String>,
    pub status: FileStatus,
    /// Empty for binary files and pure renames.
    pub hunks: Vec<Hunk>,
    pub additions: usize,
    pub deletions: usize,
}

impl FileDiff {
    /// A modified file without hunks.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            old_path: None,
            status: FileStatus::Modified,
            hunks: Vec::new(),
            additions: 0,
            deletions: 0,
        }
    }

    /// Count added and deleted lines over all hunks.
    pub fn recalculate_stats(&mut self) {
        let mut additions = 0;
        let mut deletions = 0;
        for line in self.hunks.iter().flat_map(|h| &h.lines) {
            match line.kind {
                LineKind::Addition => additions += 1,
                LineKind::Deletion => deletions += 1,
                LineKind::Context => {}
            }
        }
        self.additions = additions;
        self.deletions = deletions;
    }

    /// The file's patch text: every hunk header followed by its prefixed
    /// lines, without file headers.
    pub fn patch(&self) -> String {
        let mut patch = String::new();
        for hunk in &self.hunks {
            patch.push_str(&hunk.header);
            patch.push('\n');
            for line in &hunk.lines {
                patch.push(line.kind.prefix());
                patch.push_str(&line.content);
                patch.push('\n');
            }
        }
        patch
    }

    /// Number of diff positions in the patch, hunk headers included.
    pub fn position_count(&self) -> usize {
        self.hunks.iter().map(|h| h.lines.len() + 1).sum()
    }
}

/// Git change type of a file.
///
/// Serialized with the upper-case names used in tree item context values
/// (`filechange:MODIFY`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileStatus {
    #[serde(rename = "ADD")]
    Added,
    #[serde(rename = "COPY")]
    Copied,
    #[serde(rename = "DELETE")]
    Deleted,
    #[serde(rename = "MODIFY")]
    Modified,
    #[serde(rename = "RENAME")]
    Renamed,
    #[serde(rename = "TYPE")]
    TypeChanged,
    #[serde(rename = "UNKNOWN")]
    Unknown,
    #[serde(rename = "UNMERGED")]
    Unmerged,
}

impl FileStatus {
    /// Name used in serialized payloads and context values.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Added => "ADD",
            FileStatus::Copied => "COPY",
            FileStatus::Deleted => "DELETE",
            FileStatus::Modified => "MODIFY",
            FileStatus::Renamed => "RENAME",
            FileStatus::TypeChanged => "TYPE",
            FileStatus::Unknown => "UNKNOWN",
            FileStatus::Unmerged => "UNMERGED",
        }
    }

    /// Map a GitHub "files" API status string.
    pub fn from_github_str(status: &str) -> Self {
        match status {
            "added" => FileStatus::Added,
            "copied" => FileStatus::Copied,
            "removed" => FileStatus::Deleted,
            "modified" | "changed" => FileStatus::Modified,
            "renamed" => FileStatus::Renamed,
            _ => FileStatus::Unknown,
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `@@` block of a patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    /// The `@@ -a,b +c,d @@ section` line.
    pub header: String,
    pub old_start: u32,
    pub old_count: u32,
    pub new_start: u32,
    pub new_count: u32,
    pub lines: Vec<DiffLine>,
}

impl Hunk {
    pub fn new(old_start: u32, old_count: u32, new_start: u32, new_count: u32) -> Self {
        Self {
            header: format!("@@ -{old_start},{old_count} +{new_start},{new_count} @@"),
            old_start,
            old_count,
            new_start,
            new_count,
            lines: Vec::new(),
        }
    }

    /// Append the enclosing section (usually a function signature) to the
    /// header, as git does after the second `@@`.
    pub fn with_section(mut self, section: &str) -> Self {
        if !section.is_empty() {
            self.header = format!("{} {}", self.header, section);
        }
        self
    }

    /// Append a line, builder style.
    pub fn line(mut self, line: DiffLine) -> Self {
        self.lines.push(line);
        self
    }
}

/// A line of a hunk with its numbers on either side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub kind: LineKind,
    /// Text without the `+`, `-` or space prefix.
    pub content: String,
    /// 1-based number in the base file, absent for additions.
    pub old_line: Option<u32>,
    /// 1-based number in the head file, absent for deletions.
    pub new_line: Option<u32>,
}

impl DiffLine {
    pub fn context(content: impl Into<String>, old_line: u32, new_line: u32) -> Self {
        Self {
            kind: LineKind::Context,
            content: content.into(),
            old_line: Some(old_line),
            new_line: Some(new_line),
        }
    }

    pub fn addition(content: impl Into<String>, new_line: u32) -> Self {
        Self {
            kind: LineKind::Addition,
            content: content.into(),
            old_line: None,
            new_line: Some(new_line),
        }
    }

    pub fn deletion(content: impl Into<String>, old_line: u32) -> Self {
        Self {
            kind: LineKind::Deletion,
            content: content.into(),
            old_line: Some(old_line),
            new_line: None,
        }
    }

    /// Line number on the side of the diff this line lives on.
    ///
    /// Deleted lines only exist in the old file, everything else is
    /// addressed by its new-side number.
    pub fn side_line_number(&self) -> Option<u32> {
        match self.kind {
            LineKind::Deletion => self.old_line,
            LineKind::Context | LineKind::Addition => self.new_line,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Context,
    Addition,
    Deletion,
}

impl LineKind {
    /// Character the line starts with in patch text.
    pub fn prefix(&self) -> char {
        match self {
            LineKind::Context => ' ',
            LineKind::Addition => '+',
            LineKind::Deletion => '-',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_file() -> FileDiff {
        let mut file = FileDiff::new("src/lib.rs");
        file.hunks.push(
            Hunk::new(3, 2, 3, 2)
                .with_section("fn f()")
                .line(DiffLine::deletion("old", 3))
                .line(DiffLine::addition("new", 3))
                .line(DiffLine::context("same", 4, 4)),
        );
        file.hunks.push(
            Hunk::new(20, 1, 20, 2)
                .line(DiffLine::context("x", 20, 20))
                .line(DiffLine::addition("y", 21)),
        );
        file
    }

    #[test]
    fn test_hunk_header() {
        assert_eq!(Hunk::new(10, 5, 10, 7).header, "@@ -10,5 +10,7 @@");
        assert_eq!(
            Hunk::new(10, 5, 10, 7).with_section("impl Tree {").header,
            "@@ -10,5 +10,7 @@ impl Tree {"
        );
        assert_eq!(
            Hunk::new(1, 1, 1, 1).with_section("").header,
            "@@ -1,1 +1,1 @@"
        );
    }

    #[test]
    fn test_side_line_number() {
        assert_eq!(DiffLine::context("a", 5, 7).side_line_number(), Some(7));
        assert_eq!(DiffLine::addition("b", 10).side_line_number(), Some(10));
        assert_eq!(DiffLine::deletion("c", 8).side_line_number(), Some(8));
    }

    #[test]
    fn test_stats_and_totals() {
        let mut file = sample_file();
        file.recalculate_stats();
        assert_eq!((file.additions, file.deletions), (2, 1));

        let mut diff = PullRequestDiff::new("abc", "def");
        diff.files.push(file);
        diff.files.push(FileDiff::new("logo.png"));
        diff.recalculate_totals();
        assert_eq!((diff.total_additions, diff.total_deletions), (2, 1));
        assert!(diff.file("logo.png").is_some());
        assert!(diff.file("missing.rs").is_none());
    }

    #[test]
    fn test_position_count_includes_headers() {
        assert_eq!(sample_file().position_count(), 7);
        assert_eq!(FileDiff::new("logo.png").position_count(), 0);
    }

    #[test]
    fn test_patch_text() {
        assert_eq!(
            sample_file().patch(),
            "@@ -3,2 +3,2 @@ fn f()\n-old\n+new\n same\n@@ -20,1 +20,2 @@\n x\n+y\n"
        );
    }

    #[test]
    fn test_file_status_serde_names() {
        let json = serde_json::to_string(&FileStatus::Modified).unwrap();
        assert_eq!(json, "\"MODIFY\"");

        let status: FileStatus = serde_json::from_str("\"TYPE\"").unwrap();
        assert_eq!(status, FileStatus::TypeChanged);
        assert_eq!(status.to_string(), "TYPE");
    }

    #[test]
    fn test_file_status_from_github() {
        assert_eq!(FileStatus::from_github_str("added"), FileStatus::Added);
        assert_eq!(FileStatus::from_github_str("removed"), FileStatus::Deleted);
        assert_eq!(FileStatus::from_github_str("renamed"), FileStatus::Renamed);
        assert_eq!(FileStatus::from_github_str("bogus"), FileStatus::Unknown);
    }
}
