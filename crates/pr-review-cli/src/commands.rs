//! Subcommand implementations. Each returns what to print on stdout.

use crate::git_store::GitStore;
use crate::TreeArgs;
use anyhow::{bail, Context, Result};
use pr_changes_view::{build_file_changes, ChangeContext, FileTree};
use pr_diff_model::{parse_unified_diff, position, PullRequestDiff, PullRequestRef, ReviewComment};
use pr_review_config::ReviewConfig;
use pr_review_uri::{
    as_image_data_uri, from_file_change_node_uri, from_pr_uri, from_review_uri, Uri,
};
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn read_diff(path: &Path, base: &str, head: &str) -> Result<PullRequestDiff> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read diff {}", path.display()))?;
    parse_unified_diff(&text, base, head)
        .with_context(|| format!("Failed to parse diff {}", path.display()))
}

fn read_comments(path: &Path) -> Result<Vec<ReviewComment>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read comments {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse comments {}", path.display()))
}

pub fn tree(args: TreeArgs, mut config: ReviewConfig) -> Result<Option<String>> {
    if let Some(layout) = args.layout {
        config.file_list_layout = layout.into();
    }

    let diff = read_diff(&args.diff, &args.base, &args.head)?;
    let comments = match &args.comments {
        Some(path) => read_comments(path)?,
        None => Vec::new(),
    };

    let mut pull_request = PullRequestRef::new(args.pr, args.remote, args.base, args.head);
    if let Some(html_url) = args.html_url {
        pull_request = pull_request.with_html_url(html_url);
    }

    let workspace = match args.workspace {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };
    let ctx = ChangeContext {
        workspace_root: workspace.to_string_lossy().into_owned(),
        checked_out: args.checked_out,
        config: &config,
    };

    let nodes = build_file_changes(Arc::new(pull_request), &diff, &comments, &ctx);
    let tree = FileTree::new(&nodes, config.file_list_layout);
    let items = tree.tree_items(&nodes);
    log::info!("{} files, {} tree items", nodes.len(), items.len());

    Ok(Some(serde_json::to_string_pretty(&items)?))
}

/// Decode every parameter kind the URI carries, keyed by kind.
pub fn decode(input: &str) -> Result<Option<String>> {
    let uri = Uri::parse(input).with_context(|| format!("Invalid URI {}", input))?;
    let decoded = decode_params(&uri)?;
    if decoded.is_empty() {
        log::warn!("{} carries no review, pr or resource parameters", input);
        return Ok(None);
    }
    Ok(Some(serde_json::to_string_pretty(&Value::Object(decoded))?))
}

fn decode_params(uri: &Uri) -> Result<Map<String, Value>> {
    let mut decoded = Map::new();
    if let Some(params) = from_review_uri(uri) {
        decoded.insert("review".to_string(), serde_json::to_value(params)?);
    }
    if let Some(params) = from_pr_uri(uri) {
        decoded.insert("pr".to_string(), serde_json::to_value(params)?);
    }
    // Every JSON object decodes as resource flags, so only report set ones
    if let Some(params) = from_file_change_node_uri(uri)
        .filter(|p| p.has_comments.is_some() || p.status.is_some())
    {
        decoded.insert("resource".to_string(), serde_json::to_value(params)?);
    }
    Ok(decoded)
}

pub fn resolve(diff: &Path, path: &str, diff_position: u32) -> Result<Option<String>> {
    let diff = read_diff(diff, "", "")?;
    let Some(file) = diff.file(path) else {
        bail!("{} is not part of the diff", path);
    };

    match position::display_line_for_position(&file.hunks, diff_position) {
        Some(line) => Ok(Some(json!({ "path": path, "line": line }).to_string())),
        None => bail!(
            "Position {} is outside the patch of {} ({} positions)",
            diff_position,
            path,
            file.position_count()
        ),
    }
}

pub async fn preview(input: &str, repo: PathBuf, config: &ReviewConfig) -> Result<Option<String>> {
    if !config.image_preview {
        log::info!("Image preview is disabled in the config");
        return Ok(None);
    }

    let uri = Uri::parse(input).with_context(|| format!("Invalid URI {}", input))?;
    // URI paths are absolute, so the root must be too
    let repo = std::fs::canonicalize(&repo)
        .with_context(|| format!("Repository {} not found", repo.display()))?;
    let store = GitStore::new(repo);
    Ok(as_image_data_uri(&uri, &store)
        .await
        .map(|data_uri| data_uri.to_string()))
}
