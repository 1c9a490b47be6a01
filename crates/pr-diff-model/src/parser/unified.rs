//! Unified diff parsing on top of `unidiff`.

use crate::model::{DiffLine, FileDiff, FileStatus, Hunk, LineKind, PullRequestDiff};
use thiserror::Error;
use unidiff::{Hunk as UnidiffHunk, Line as UnidiffLine, PatchSet, PatchedFile};

/// Errors that can occur during diff parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to parse diff: {0}")]
    ParseFailed(String),
    #[error("Patch for {0} contains no file")]
    EmptyPatch(String),
}

/// Parse the unified diff of a whole pull request (`git diff base...head`
/// or the `.diff` media type of the GitHub API).
pub fn parse_unified_diff(
    diff_text: &str,
    base_sha: impl Into<String>,
    head_sha: impl Into<String>,
) -> Result<PullRequestDiff, ParseError> {
    let mut patch_set = PatchSet::new();
    patch_set
        .parse(diff_text)
        .map_err(|e| ParseError::ParseFailed(e.to_string()))?;

    let mut diff = PullRequestDiff::new(base_sha, head_sha);
    let parsed = patch_set.files().iter().map(parse_patched_file).collect();
    diff.files = merge_git_headers(parsed, scan_git_headers(diff_text));

    diff.recalculate_totals();
    log::debug!(
        "Parsed diff with {} files (+{} -{})",
        diff.files.len(),
        diff.total_additions,
        diff.total_deletions
    );
    Ok(diff)
}

/// Parse the `patch` of a single file as listed by the GitHub "files" API.
///
/// Such patches start directly with the first `@@` header. Empty patches
/// (binary files, pure renames) yield no hunks.
pub fn parse_patch(path: &str, patch: &str) -> Result<Vec<Hunk>, ParseError> {
    if patch.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut text = format!("--- a/{path}\n+++ b/{path}\n{patch}");
    if !text.ends_with('\n') {
        text.push('\n');
    }

    let mut patch_set = PatchSet::new();
    patch_set
        .parse(&text)
        .map_err(|e| ParseError::ParseFailed(e.to_string()))?;

    let file = patch_set
        .files()
        .first()
        .ok_or_else(|| ParseError::EmptyPatch(path.to_string()))?;

    Ok(file.hunks().iter().map(parse_hunk).collect())
}

fn parse_patched_file(file: &PatchedFile) -> FileDiff {
    let source = strip_side_prefix(&file.source_file);
    let target = strip_side_prefix(&file.target_file);
    let status = status_of(source, target);

    let mut file_diff = match status {
        FileStatus::Deleted => FileDiff::new(source),
        _ => FileDiff::new(target),
    };
    file_diff.status = status;
    if status == FileStatus::Renamed {
        file_diff.old_path = Some(source.to_string());
    }

    file_diff.hunks = file.hunks().iter().map(parse_hunk).collect();
    file_diff.recalculate_stats();
    file_diff
}

fn parse_hunk(hunk: &UnidiffHunk) -> Hunk {
    let section = hunk.section_header.trim();
    let mut parsed = Hunk::new(
        hunk.source_start as u32,
        hunk.source_length as u32,
        hunk.target_start as u32,
        hunk.target_length as u32,
    )
    .with_section(section);
    parsed.lines = hunk.lines().iter().filter_map(parse_line).collect();
    parsed
}

fn parse_line(line: &UnidiffLine) -> Option<DiffLine> {
    let kind = match line.line_type.as_str() {
        "+" => LineKind::Addition,
        "-" => LineKind::Deletion,
        // "\ No newline at end of file" carries no line of its own
        "\\" => return None,
        _ => LineKind::Context,
    };

    Some(DiffLine {
        kind,
        content: line.value.trim_end_matches('\n').to_string(),
        old_line: line.source_line_no.map(|n| n as u32),
        new_line: line.target_line_no.map(|n| n as u32),
    })
}

fn status_of(source: &str, target: &str) -> FileStatus {
    let missing = |path: &str| path.is_empty() || path == "/dev/null";
    match (missing(source), missing(target)) {
        (true, _) => FileStatus::Added,
        (_, true) => FileStatus::Deleted,
        _ if source != target => FileStatus::Renamed,
        _ => FileStatus::Modified,
    }
}

/// File header of a `diff --git` block, read from its extended header lines.
#[derive(Debug, Clone, PartialEq, Eq)]
struct GitHeader {
    path: String,
    old_path: Option<String>,
    status: FileStatus,
    /// The block has `---`/`+++` lines, so `unidiff` yields it.
    has_patch: bool,
}

/// Collect the `diff --git` blocks in diff order.
///
/// Binary files and pure renames have no `---`/`+++` lines, so these headers
/// are the only trace of them.
fn scan_git_headers(diff_text: &str) -> Vec<GitHeader> {
    let mut headers: Vec<GitHeader> = Vec::new();

    for line in diff_text.lines() {
        if let Some(paths) = line.strip_prefix("diff --git ") {
            let (old, new) = split_git_paths(paths);
            headers.push(GitHeader {
                path: new.to_string(),
                old_path: (old != new).then(|| old.to_string()),
                status: if old != new {
                    FileStatus::Renamed
                } else {
                    FileStatus::Modified
                },
                has_patch: false,
            });
            continue;
        }

        let Some(header) = headers.last_mut() else {
            continue;
        };
        if line.starts_with("--- ") || line.starts_with("+++ ") {
            header.has_patch = true;
        } else if line.starts_with("new file mode") {
            header.status = FileStatus::Added;
            header.old_path = None;
        } else if line.starts_with("deleted file mode") {
            header.status = FileStatus::Deleted;
            header.old_path = None;
        } else if let Some(from) = line.strip_prefix("rename from ") {
            header.status = FileStatus::Renamed;
            header.old_path = Some(unquote(from).to_string());
        } else if let Some(from) = line.strip_prefix("copy from ") {
            header.status = FileStatus::Copied;
            header.old_path = Some(unquote(from).to_string());
        } else if let Some(to) = line
            .strip_prefix("rename to ")
            .or_else(|| line.strip_prefix("copy to "))
        {
            header.path = unquote(to).to_string();
        }
    }

    headers
}

/// Split `a/<old> b/<new>` into both paths.
fn split_git_paths(paths: &str) -> (&str, &str) {
    // Same path on both sides splits in the middle, even with " b/" inside it
    let mid = paths.len().saturating_sub(1) / 2;
    if paths.is_char_boundary(mid) && paths[mid..].starts_with(' ') {
        let old = strip_side_prefix(&paths[..mid]);
        let new = strip_side_prefix(&paths[mid + 1..]);
        if old == new {
            return (old, new);
        }
    }

    match paths.rsplit_once(" b/") {
        Some((old, new)) => (strip_side_prefix(old), new.trim()),
        None => (paths.trim(), paths.trim()),
    }
}

/// Order the parsed files by their git headers and add a hunk-less file for
/// every header `unidiff` yielded nothing for.
fn merge_git_headers(parsed: Vec<FileDiff>, headers: Vec<GitHeader>) -> Vec<FileDiff> {
    let mut parsed: Vec<Option<FileDiff>> = parsed.into_iter().map(Some).collect();
    let mut files = Vec::with_capacity(headers.len().max(parsed.len()));

    for header in headers {
        let found = parsed
            .iter_mut()
            .find(|f| f.as_ref().is_some_and(|f| f.path == header.path))
            .and_then(Option::take);
        match found {
            // Bare `---`/`+++` lines cannot tell a copy from a rename
            Some(mut file) if header.status != FileStatus::Modified => {
                file.status = header.status;
                file.old_path = header.old_path;
                files.push(file);
            }
            Some(file) => files.push(file),
            // Header paths that failed to split, the parsed file follows below
            None if header.has_patch => {}
            None => {
                log::debug!("{} has no patch ({})", header.path, header.status);
                let mut file = FileDiff::new(header.path.as_str());
                file.status = header.status;
                file.old_path = header.old_path;
                files.push(file);
            }
        }
    }

    // Plain unified diffs carry no git headers
    files.extend(parsed.into_iter().flatten());
    files
}

/// Drop the quotes git puts around names with special characters. Escapes
/// stay as they are.
fn unquote(path: &str) -> &str {
    let path = path.trim();
    path.strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
        .unwrap_or(path)
}

/// Drop the `a/` or `b/` side prefix git puts in front of file names.
fn strip_side_prefix(path: &str) -> &str {
    let path = unquote(path);
    path.strip_prefix("a/")
        .or_else(|| path.strip_prefix("b/"))
        .unwrap_or(path)
}
