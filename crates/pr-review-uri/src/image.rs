//! Image previews for binary files shown in a diff.

use crate::uri::Uri;
use async_trait::async_trait;
use base64::Engine as _;
use serde::Deserialize;
use thiserror::Error;

/// Mimetypes rendered as an inline image preview.
pub const IMAGE_MIMETYPES: &[&str] = &[
    "image/png",
    "image/gif",
    "image/jpeg",
    "image/webp",
    "image/tiff",
    "image/bmp",
];

/// Errors that can occur when reading from an object store.
#[derive(Debug, Error)]
pub enum ObjectStoreError {
    /// No object exists at the given commit and path.
    #[error("Object not found: {0}")]
    NotFound(String),

    /// The backing command or service failed.
    #[error("Object store failed: {0}")]
    Failed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Size and id of a blob at a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectDetails {
    /// Blob id.
    pub object: String,
    /// Size in bytes.
    pub size: u64,
}

/// Read access to the blobs of a repository.
///
/// Implement this trait to back image previews with a local git checkout,
/// a remote API or an in-memory fixture.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Look up the blob of `path` at `treeish`.
    async fn object_details(
        &self,
        treeish: &str,
        path: &str,
    ) -> Result<ObjectDetails, ObjectStoreError>;

    /// Detect the mimetype of a blob.
    async fn detect_object_type(&self, object: &str) -> Result<String, ObjectStoreError>;

    /// Read the contents of `path` at `treeish`.
    async fn buffer(&self, treeish: &str, path: &str) -> Result<Vec<u8>, ObjectStoreError>;
}

#[derive(Debug, Error)]
enum PreviewError {
    #[error("URI query has no commit: {0}")]
    Query(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] ObjectStoreError),
}

#[derive(Deserialize)]
struct CommitQuery {
    commit: String,
}

/// Render the file a URI points at as an image `data:` URI.
///
/// The commit is read from the URI's JSON query. Text files, non-image
/// files and any lookup failure yield `None`.
pub async fn as_image_data_uri(uri: &Uri, store: &dyn ObjectStore) -> Option<Uri> {
    match image_data_uri(uri, store).await {
        Ok(data_uri) => data_uri,
        Err(e) => {
            log::debug!("No image preview for {}: {}", uri.path, e);
            None
        }
    }
}

async fn image_data_uri(uri: &Uri, store: &dyn ObjectStore) -> Result<Option<Uri>, PreviewError> {
    let CommitQuery { commit } = serde_json::from_str(&uri.query)?;
    let details = store.object_details(&commit, &uri.path).await?;
    let mimetype = store.detect_object_type(&details.object).await?;

    if mimetype == "text/plain" || !IMAGE_MIMETYPES.contains(&mimetype.as_str()) {
        return Ok(None);
    }

    let contents = store.buffer(&commit, &uri.path).await?;
    let path = format!(
        "{};label:{};description:{};size:{};base64,{}",
        mimetype,
        uri.basename(),
        commit,
        details.size,
        base64::engine::general_purpose::STANDARD.encode(contents)
    );

    Ok(Some(Uri::new("data", "", path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{to_review_uri, GitUriOptions};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    /// Blobs keyed by (commit, path) with a fixed mimetype per blob id.
    #[derive(Default)]
    struct MemoryStore {
        blobs: HashMap<(String, String), (String, Vec<u8>)>,
        mimetypes: HashMap<String, String>,
    }

    impl MemoryStore {
        fn insert(&mut self, commit: &str, path: &str, object: &str, mime: &str, data: &[u8]) {
            self.blobs.insert(
                (commit.to_string(), path.to_string()),
                (object.to_string(), data.to_vec()),
            );
            self.mimetypes.insert(object.to_string(), mime.to_string());
        }
    }

    #[async_trait]
    impl ObjectStore for MemoryStore {
        async fn object_details(
            &self,
            treeish: &str,
            path: &str,
        ) -> Result<ObjectDetails, ObjectStoreError> {
            self.blobs
                .get(&(treeish.to_string(), path.to_string()))
                .map(|(object, data)| ObjectDetails {
                    object: object.clone(),
                    size: data.len() as u64,
                })
                .ok_or_else(|| ObjectStoreError::NotFound(path.to_string()))
        }

        async fn detect_object_type(&self, object: &str) -> Result<String, ObjectStoreError> {
            self.mimetypes
                .get(object)
                .cloned()
                .ok_or_else(|| ObjectStoreError::Failed(format!("unknown object {object}")))
        }

        async fn buffer(&self, treeish: &str, path: &str) -> Result<Vec<u8>, ObjectStoreError> {
            self.blobs
                .get(&(treeish.to_string(), path.to_string()))
                .map(|(_, data)| data.clone())
                .ok_or_else(|| ObjectStoreError::NotFound(path.to_string()))
        }
    }

    fn store() -> MemoryStore {
        let mut store = MemoryStore::default();
        store.insert("abc", "/repo/logo.png", "blob1", "image/png", b"\x89PNG");
        store.insert("abc", "/repo/README.md", "blob2", "text/plain", b"# hi");
        store.insert("abc", "/repo/a.zip", "blob3", "application/zip", b"PK");
        store
    }

    fn review_uri(path: &str) -> Uri {
        to_review_uri(
            &Uri::file(path),
            None,
            None,
            "abc",
            false,
            GitUriOptions::default(),
        )
    }

    #[tokio::test]
    async fn test_image_becomes_data_uri() {
        let uri = as_image_data_uri(&review_uri("/repo/logo.png"), &store())
            .await
            .unwrap();

        assert_eq!(uri.scheme, "data");
        assert_eq!(
            uri.to_string(),
            "data:image/png;label:logo.png;description:abc;size:4;base64,iVBORw=="
        );
    }

    #[tokio::test]
    async fn test_text_and_other_files_have_no_preview() {
        let store = store();
        assert_eq!(
            as_image_data_uri(&review_uri("/repo/README.md"), &store).await,
            None
        );
        assert_eq!(
            as_image_data_uri(&review_uri("/repo/a.zip"), &store).await,
            None
        );
    }

    #[tokio::test]
    async fn test_failures_have_no_preview() {
        let store = store();

        // Unknown file
        assert_eq!(
            as_image_data_uri(&review_uri("/repo/missing.png"), &store).await,
            None
        );

        // Query without a commit
        let no_commit = Uri::file("/repo/logo.png").with_query("{}");
        assert_eq!(as_image_data_uri(&no_commit, &store).await, None);

        // Query that is not JSON
        let garbage = Uri::file("/repo/logo.png").with_query("commit=abc");
        assert_eq!(as_image_data_uri(&garbage, &store).await, None);
    }
}
