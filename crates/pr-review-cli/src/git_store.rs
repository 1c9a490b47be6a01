//! Object store backed by the `git` command line of a local repository.

use async_trait::async_trait;
use log::debug;
use pr_review_uri::{ObjectDetails, ObjectStore, ObjectStoreError};
use std::path::PathBuf;

/// Reads blobs of the repository at `repo` with `git ls-tree`, `git cat-file`
/// and `git show`.
#[derive(Debug, Clone)]
pub struct GitStore {
    repo: PathBuf,
}

impl GitStore {
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self { repo: repo.into() }
    }

    /// Path relative to the repository root, as git expects it.
    fn relative_path<'a>(&self, path: &'a str) -> &'a str {
        let root = self.repo.to_string_lossy();
        let root = root.trim_end_matches('/');
        path.strip_prefix(root)
            .unwrap_or(path)
            .trim_start_matches('/')
    }

    async fn git(&self, args: &[&str]) -> Result<Vec<u8>, ObjectStoreError> {
        debug!("git {}", args.join(" "));
        let output = tokio::process::Command::new("git")
            .arg("-C")
            .arg(&self.repo)
            .args(args)
            .output()
            .await?;

        if output.status.success() {
            Ok(output.stdout)
        } else {
            Err(ObjectStoreError::Failed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ))
        }
    }
}

#[async_trait]
impl ObjectStore for GitStore {
    async fn object_details(
        &self,
        treeish: &str,
        path: &str,
    ) -> Result<ObjectDetails, ObjectStoreError> {
        let path = self.relative_path(path);
        let output = self.git(&["ls-tree", "-l", treeish, "--", path]).await?;
        parse_ls_tree(&String::from_utf8_lossy(&output))
            .ok_or_else(|| ObjectStoreError::NotFound(format!("{}:{}", treeish, path)))
    }

    async fn detect_object_type(&self, object: &str) -> Result<String, ObjectStoreError> {
        let contents = self.git(&["cat-file", "blob", object]).await?;
        Ok(sniff_mimetype(&contents).to_string())
    }

    async fn buffer(&self, treeish: &str, path: &str) -> Result<Vec<u8>, ObjectStoreError> {
        let rev = format!("{}:{}", treeish, self.relative_path(path));
        self.git(&["show", &rev]).await
    }
}

/// Parse the first line of `git ls-tree -l`:
/// `<mode> blob <object> <size>\t<path>`.
fn parse_ls_tree(output: &str) -> Option<ObjectDetails> {
    let line = output.lines().next()?;
    let (meta, _path) = line.split_once('\t')?;
    let fields: Vec<&str> = meta.split_whitespace().collect();
    match fields.as_slice() {
        [_mode, "blob", object, size] => Some(ObjectDetails {
            object: object.to_string(),
            size: size.parse().ok()?,
        }),
        _ => None,
    }
}

/// Mimetype from the leading magic bytes of a blob.
fn sniff_mimetype(contents: &[u8]) -> &'static str {
    const SIGNATURES: &[(&[u8], &str)] = &[
        (b"\x89PNG\r\n\x1a\n", "image/png"),
        (b"GIF87a", "image/gif"),
        (b"GIF89a", "image/gif"),
        (b"\xff\xd8\xff", "image/jpeg"),
        (b"II*\x00", "image/tiff"),
        (b"MM\x00*", "image/tiff"),
        (b"BM", "image/bmp"),
    ];

    if contents.len() >= 12 && &contents[..4] == b"RIFF" && &contents[8..12] == b"WEBP" {
        return "image/webp";
    }
    if let Some((_, mime)) = SIGNATURES
        .iter()
        .find(|(magic, _)| contents.starts_with(magic))
    {
        return *mime;
    }
    if !contents.contains(&0) && std::str::from_utf8(contents).is_ok() {
        "text/plain"
    } else {
        "application/octet-stream"
    }
}
