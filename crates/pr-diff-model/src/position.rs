//! Mapping of review comment diff positions to display lines.
//!
//! A diff position counts lines downwards from the first `@@` header of a
//! file's patch: the header itself is position 0, the line below it is
//! position 1. Later hunk headers take a position of their own, so the count
//! keeps increasing through every hunk of the file.

use crate::model::{DiffLine, Hunk, ReviewComment};

/// What sits at a given diff position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PositionEntry<'a> {
    Header,
    Line(&'a DiffLine),
}

fn entry_at(hunks: &[Hunk], position: u32) -> Option<PositionEntry<'_>> {
    let mut current = 0u32;
    for (idx, hunk) in hunks.iter().enumerate() {
        if idx > 0 {
            current += 1;
        }
        if current == position {
            return Some(PositionEntry::Header);
        }

        let remaining = position - current;
        if remaining as usize <= hunk.lines.len() {
            return Some(PositionEntry::Line(&hunk.lines[remaining as usize - 1]));
        }
        current += hunk.lines.len() as u32;
    }
    None
}

/// Find the diff line at a 1-based diff position.
///
/// Hunk headers are not lines of the file and never match.
pub fn diff_line_by_position(hunks: &[Hunk], position: u32) -> Option<&DiffLine> {
    match entry_at(hunks, position)? {
        PositionEntry::Line(line) => Some(line),
        PositionEntry::Header => None,
    }
}

/// Convert a 1-based line number into a 0-based one.
///
/// Missing numbers and line 0 collapse to the first line.
pub fn zero_based(line: Option<u32>) -> u32 {
    line.map_or(0, |l| l.saturating_sub(1))
}

/// Zero-based line of the file a diff line should be displayed at.
///
/// Deleted lines have no new-side number, they are shown at their old-side
/// number instead.
pub fn display_line(line: &DiffLine) -> u32 {
    zero_based(line.side_line_number())
}

/// Resolve a diff position to a zero-based display line.
///
/// Positions landing on a hunk header resolve to the first line. `None`
/// means the position lies outside the patch.
pub fn display_line_for_position(hunks: &[Hunk], position: u32) -> Option<u32> {
    match entry_at(hunks, position)? {
        PositionEntry::Line(line) => Some(display_line(line)),
        PositionEntry::Header => Some(0),
    }
}

/// Display line of a comment, using its original position once outdated.
///
/// Comments that cannot be placed are shown at the first line.
pub fn comment_line(hunks: &[Hunk], comment: &ReviewComment) -> u32 {
    comment
        .effective_position()
        .and_then(|position| display_line_for_position(hunks, position))
        .unwrap_or(0)
}

/// The topmost comment that still has a position in the current diff.
///
/// Comments without a position (outdated) and those anchored on the first
/// hunk header are skipped.
pub fn representative_comment(comments: &[ReviewComment]) -> Option<&ReviewComment> {
    comments
        .iter()
        .filter(|c| c.position.is_some_and(|p| p > 0))
        .min_by_key(|c| c.position)
}

/// Default cursor line for a file: where its topmost comment sits.
pub fn default_selection(hunks: &[Hunk], comments: &[ReviewComment]) -> Option<u32> {
    let comment = representative_comment(comments)?;
    let position = comment.position?;
    let line = display_line_for_position(hunks, position);
    if line.is_none() {
        log::debug!(
            "Comment {} on {} has position {} outside the patch",
            comment.id,
            comment.path,
            position
        );
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LineKind;
    use pretty_assertions::assert_eq;

    /// Position 1: deletion of old line 5, position 2: addition of new line 9.
    fn delete_then_add() -> Vec<Hunk> {
        vec![Hunk::new(5, 1, 9, 1)
            .line(DiffLine::deletion("old", 5))
            .line(DiffLine::addition("new", 9))]
    }

    fn two_hunks() -> Vec<Hunk> {
        vec![
            Hunk::new(1, 2, 1, 2)
                .line(DiffLine::context("a", 1, 1))
                .line(DiffLine::deletion("b", 2))
                .line(DiffLine::addition("c", 2)),
            Hunk::new(30, 2, 30, 3)
                .line(DiffLine::context("x", 30, 30))
                .line(DiffLine::addition("y", 31))
                .line(DiffLine::context("z", 31, 32)),
        ]
    }

    #[test]
    fn test_deletion_uses_old_line() {
        let hunks = delete_then_add();
        let line = diff_line_by_position(&hunks, 1).unwrap();
        assert_eq!(line.kind, LineKind::Deletion);
        assert_eq!(display_line_for_position(&hunks, 1), Some(4));
    }

    #[test]
    fn test_addition_uses_new_line() {
        let hunks = delete_then_add();
        assert_eq!(display_line_for_position(&hunks, 2), Some(8));
    }

    #[test]
    fn test_positions_continue_across_hunks() {
        let hunks = two_hunks();

        // 0: header, 1..=3: first hunk, 4: second header, 5..=7: second hunk
        assert_eq!(display_line_for_position(&hunks, 3), Some(1));
        assert_eq!(diff_line_by_position(&hunks, 4), None);
        assert_eq!(display_line_for_position(&hunks, 4), Some(0));
        assert_eq!(diff_line_by_position(&hunks, 5).unwrap().content, "x");
        assert_eq!(display_line_for_position(&hunks, 6), Some(30));
        assert_eq!(display_line_for_position(&hunks, 7), Some(31));
    }

    #[test]
    fn test_position_outside_patch() {
        let hunks = two_hunks();
        assert_eq!(display_line_for_position(&hunks, 8), None);
        assert_eq!(display_line_for_position(&[], 1), None);
    }

    #[test]
    fn test_first_header_position() {
        let hunks = two_hunks();
        assert_eq!(diff_line_by_position(&hunks, 0), None);
        assert_eq!(display_line_for_position(&hunks, 0), Some(0));
    }

    #[test]
    fn test_line_numbers_clamp_to_zero() {
        assert_eq!(zero_based(Some(0)), 0);
        assert_eq!(zero_based(None), 0);
        assert_eq!(zero_based(Some(1)), 0);
        assert_eq!(zero_based(Some(12)), 11);

        // A deletion without an old-side number would compute line -1
        let broken = DiffLine {
            kind: LineKind::Deletion,
            content: "?".to_string(),
            old_line: None,
            new_line: Some(3),
        };
        let hunks = vec![Hunk::new(1, 1, 1, 0).line(broken)];
        assert_eq!(display_line_for_position(&hunks, 1), Some(0));
    }

    #[test]
    fn test_representative_comment_is_topmost() {
        let comments = vec![
            ReviewComment::new(1, "a.rs", Some(7)),
            ReviewComment::outdated(2, "a.rs", 1),
            ReviewComment::new(3, "a.rs", Some(3)),
            ReviewComment::new(4, "a.rs", None),
            ReviewComment::new(5, "a.rs", Some(5)),
        ];

        let picked = representative_comment(&comments).unwrap();
        assert_eq!(picked.id, 3);
        assert_eq!(picked.position, Some(3));
    }

    #[test]
    fn test_no_positioned_comments() {
        let comments = vec![
            ReviewComment::outdated(1, "a.rs", 2),
            ReviewComment::new(2, "a.rs", None),
        ];
        assert!(representative_comment(&comments).is_none());
        assert_eq!(default_selection(&delete_then_add(), &comments), None);
        assert_eq!(default_selection(&delete_then_add(), &[]), None);
    }

    #[test]
    fn test_default_selection() {
        let hunks = two_hunks();
        let comments = vec![
            ReviewComment::new(1, "a.rs", Some(7)),
            ReviewComment::new(2, "a.rs", Some(6)),
        ];
        assert_eq!(default_selection(&hunks, &comments), Some(30));
    }

    #[test]
    fn test_default_selection_outside_patch() {
        let comments = vec![ReviewComment::new(1, "a.rs", Some(40))];
        assert_eq!(default_selection(&two_hunks(), &comments), None);
    }

    #[test]
    fn test_comment_line_falls_back_to_original_position() {
        let hunks = two_hunks();
        assert_eq!(
            comment_line(&hunks, &ReviewComment::outdated(1, "a.rs", 6)),
            30
        );
        assert_eq!(
            comment_line(&hunks, &ReviewComment::new(2, "a.rs", Some(2))),
            1
        );
        assert_eq!(
            comment_line(&hunks, &ReviewComment::new(3, "a.rs", Some(99))),
            0
        );
        assert_eq!(
            comment_line(&hunks, &ReviewComment::new(4, "a.rs", None)),
            0
        );
    }
}
