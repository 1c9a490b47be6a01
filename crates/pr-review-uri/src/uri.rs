//! URI value type.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Write as _};
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing a URI string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UriError {
    #[error("URI has no scheme: {0}")]
    MissingScheme(String),
    #[error("Invalid URI scheme: {0}")]
    InvalidScheme(String),
}

/// A URI split into its components.
///
/// Path, query and fragment are stored percent-decoded. The string form
/// escapes exactly the characters that would otherwise end a component, so
/// `Uri::parse(&uri.to_string())` yields the same value back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Uri {
    pub scheme: String,
    pub authority: String,
    pub path: String,
    pub query: String,
    pub fragment: String,
}

impl Uri {
    /// Create a URI without query and fragment.
    ///
    /// A relative path is rooted when the URI has an authority part.
    pub fn new(
        scheme: impl Into<String>,
        authority: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        let scheme = scheme.into();
        let authority = authority.into();
        let path = rooted_path(&scheme, &authority, path.into());
        Self {
            scheme,
            authority,
            path,
            query: String::new(),
            fragment: String::new(),
        }
    }

    /// Create a `file` URI for a local path.
    pub fn file(path: impl Into<String>) -> Self {
        let path = path.into();
        let path = if path.starts_with('/') {
            path
        } else {
            format!("/{path}")
        };
        Self::new("file", "", path)
    }

    /// Parse a URI string.
    pub fn parse(input: &str) -> Result<Self, UriError> {
        let (scheme, rest) = input
            .split_once(':')
            .ok_or_else(|| UriError::MissingScheme(input.to_string()))?;

        if !is_valid_scheme(scheme) {
            return Err(UriError::InvalidScheme(scheme.to_string()));
        }

        let (rest, fragment) = rest.split_once('#').unwrap_or((rest, ""));
        let (rest, query) = rest.split_once('?').unwrap_or((rest, ""));
        let (authority, path) = match rest.strip_prefix("//") {
            Some(after) => match after.find('/') {
                Some(idx) => after.split_at(idx),
                None => (after, ""),
            },
            None => ("", rest),
        };

        Ok(Self {
            scheme: scheme.to_string(),
            authority: authority.to_string(),
            path: percent_decode(path),
            query: percent_decode(query),
            fragment: percent_decode(fragment),
        })
    }

    /// Copy with a different scheme.
    pub fn with_scheme(&self, scheme: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            ..self.clone()
        }
    }

    /// Copy with a different path.
    pub fn with_path(&self, path: impl Into<String>) -> Self {
        Self {
            path: rooted_path(&self.scheme, &self.authority, path.into()),
            ..self.clone()
        }
    }

    /// Copy with a different query.
    pub fn with_query(&self, query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..self.clone()
        }
    }

    /// Last segment of the path.
    pub fn basename(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or_default()
    }
}

/// `//authority` is written for file URIs and whenever it is non-empty.
fn has_authority_part(scheme: &str, authority: &str) -> bool {
    !authority.is_empty() || scheme == "file"
}

/// After an authority the path must be empty or start with `/`.
fn rooted_path(scheme: &str, authority: &str, path: String) -> String {
    if has_authority_part(scheme, authority) && !path.is_empty() && !path.starts_with('/') {
        format!("/{path}")
    } else {
        path
    }
}

fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn percent_decode(input: &str) -> String {
    if !input.contains('%') {
        return input.to_string();
    }

    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut idx = 0;
    while idx < bytes.len() {
        if bytes[idx] == b'%' {
            let hex = input
                .get(idx + 1..idx + 3)
                .filter(|h| h.bytes().all(|b| b.is_ascii_hexdigit()));
            if let Some(value) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(value);
                idx += 3;
                continue;
            }
        }
        out.push(bytes[idx]);
        idx += 1;
    }

    match String::from_utf8(out) {
        Ok(decoded) => decoded,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

fn percent_encode(f: &mut fmt::Formatter<'_>, input: &str, reserved: &[char]) -> fmt::Result {
    for ch in input.chars() {
        if ch == '%' || reserved.contains(&ch) {
            write!(f, "%{:02X}", ch as u32)?;
        } else {
            f.write_char(ch)?;
        }
    }
    Ok(())
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.scheme)?;
        // A path starting with `//` would otherwise read as an authority
        if has_authority_part(&self.scheme, &self.authority) || self.path.starts_with("//") {
            write!(f, "//{}", self.authority)?;
            if !self.path.is_empty() && !self.path.starts_with('/') {
                f.write_char('/')?;
            }
        }
        percent_encode(f, &self.path, &['?', '#', ' '])?;
        if !self.query.is_empty() {
            f.write_char('?')?;
            percent_encode(f, &self.query, &['#', ' '])?;
        }
        if !self.fragment.is_empty() {
            f.write_char('#')?;
            percent_encode(f, &self.fragment, &[' '])?;
        }
        Ok(())
    }
}

impl FromStr for Uri {
    type Err = UriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Uri {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Uri {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Uri::parse(&raw).map_err(de::Error::custom)
    }
}
