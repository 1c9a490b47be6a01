use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod commands;
mod git_store;
mod logger;

#[derive(Parser, Debug)]
#[command(name = "pr-review")]
#[command(about = "Inspect pull request diffs, review comments and review URIs")]
#[command(version)]
struct Args {
    /// Also write debug logs to a timestamped file in the cache directory
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print the changed files of a pull request as tree items (JSON)
    Tree(TreeArgs),

    /// Decode the parameters carried by a review, pr or resource URI
    Decode { uri: String },

    /// Print the zero-based display line of a diff position
    Resolve {
        /// Unified diff of the pull request
        #[arg(long)]
        diff: PathBuf,

        /// File within the diff
        #[arg(long)]
        path: String,

        /// Diff position (0 is the first hunk header)
        #[arg(long)]
        position: u32,
    },

    /// Print an image file at a review URI's commit as a data URI
    Preview {
        uri: String,

        /// Local repository to read blobs from
        #[arg(long, default_value = ".")]
        repo: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
pub struct TreeArgs {
    /// Unified diff of the pull request
    #[arg(long)]
    diff: PathBuf,

    /// Review comments as a JSON array (GitHub review comment payloads)
    #[arg(long)]
    comments: Option<PathBuf>,

    /// Base commit
    #[arg(long)]
    base: String,

    /// Head commit
    #[arg(long)]
    head: String,

    /// Pull request number
    #[arg(long)]
    pr: u64,

    /// Git remote the pull request belongs to
    #[arg(long, default_value = "origin")]
    remote: String,

    /// Web URL of the pull request, used to link files on the hosting service
    #[arg(long)]
    html_url: Option<String>,

    /// Repository root the file URIs point into (default: current directory)
    #[arg(long)]
    workspace: Option<PathBuf>,

    /// The pull request head is checked out in the workspace
    #[arg(long)]
    checked_out: bool,

    /// Override the configured file list layout
    #[arg(long, value_enum)]
    layout: Option<Layout>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Layout {
    Flat,
    Tree,
}

impl From<Layout> for pr_review_config::FileListLayout {
    fn from(layout: Layout) -> Self {
        match layout {
            Layout::Flat => Self::Flat,
            Layout::Tree => Self::Tree,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = logger::init(args.log_file)? {
        eprintln!("Logging to {}", path.display());
    }

    let config = pr_review_config::ReviewConfig::load();
    log::debug!("Running {:?}", args.command);

    let output = match args.command {
        Cmd::Tree(tree) => commands::tree(tree, config)?,
        Cmd::Decode { uri } => commands::decode(&uri)?,
        Cmd::Resolve {
            diff,
            path,
            position,
        } => commands::resolve(&diff, &path, position)?,
        Cmd::Preview { uri, repo } => commands::preview(&uri, repo, &config).await?,
    };

    if let Some(output) = output {
        println!("{}", output);
    }
    Ok(())
}
