//! Diff parsers.

mod unified;

pub use unified::{parse_patch, parse_unified_diff, ParseError};
