//! Review URIs
//!
//! This crate provides:
//! - A small [`Uri`] value type (`scheme://authority/path?query#fragment`)
//! - The `review` and `pr` schemes, whose JSON query carries the file,
//!   commits and diff side a document provider needs to resolve content
//! - Resource URIs annotated with comment and change-status flags for
//!   decorating tree items
//! - Image previews rendered as `data:` URIs from an [`ObjectStore`]
//!
//! Decoding never fails loudly: a query that is not a payload of the
//! requested kind yields `None`.

pub mod image;
pub mod params;
pub mod uri;

pub use image::{as_image_data_uri, ObjectDetails, ObjectStore, ObjectStoreError, IMAGE_MIMETYPES};
pub use params::{
    from_file_change_node_uri, from_pr_uri, from_review_uri, to_pr_uri, to_resource_uri,
    to_review_uri, FileChangeNodeUriParams, GitUriOptions, PrUriParams, ReviewUriParams, PR_SCHEME,
    REVIEW_SCHEME,
};
pub use uri::{Uri, UriError};
