//! Like-Harvester main entry point
//!
//! This is the command-line interface for harvesting posts and media from
//! the remote blog API and for downloading URL lists.

use anyhow::{bail, Context};
use clap::Parser;
use like_harvester::api::{ApiClient, ResourceKind};
use like_harvester::config::{load_config_with_hash, Config};
use like_harvester::harvest::Harvester;
use like_harvester::output::{print_statistics, RunSummary};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Like-Harvester: saves liked posts and their media
///
/// Pages a blog's posts or likes through the remote API, appends the post
/// and media URLs to list files and downloads the media with a bounded
/// number of parallel downloads. Re-running over the same directory only
/// fetches what is missing.
#[derive(Parser, Debug)]
#[command(name = "like-harvester")]
#[command(version)]
#[command(about = "Harvests liked posts and their media", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be harvested without doing it
    #[arg(long)]
    dry_run: bool,

    /// Download every URL listed in FILE (one per line)
    #[arg(long, value_name = "FILE", requires = "into", conflicts_with_all = ["blog_media", "liked_media", "following"])]
    from_list: Option<PathBuf>,

    /// Target directory for --from-list
    #[arg(long, value_name = "DIR", requires = "from_list")]
    into: Option<PathBuf>,

    /// Harvest the posts published on BLOG
    #[arg(long, value_name = "BLOG", conflicts_with_all = ["liked_media", "following"])]
    blog_media: Option<String>,

    /// Harvest the posts liked by BLOG
    #[arg(long, value_name = "BLOG", conflicts_with = "following")]
    liked_media: Option<String>,

    /// Print the names of the blogs followed by the API account
    #[arg(long)]
    following: bool,
}

enum Mode {
    FromList { list: PathBuf, into: PathBuf },
    Remote(ResourceKind),
    Following,
}

impl Cli {
    fn mode(&self) -> Option<Mode> {
        if let (Some(list), Some(into)) = (&self.from_list, &self.into) {
            return Some(Mode::FromList {
                list: list.clone(),
                into: into.clone(),
            });
        }
        if let Some(blog) = &self.blog_media {
            return Some(Mode::Remote(ResourceKind::BlogPosts { blog: blog.clone() }));
        }
        if let Some(blog) = &self.liked_media {
            return Some(Mode::Remote(ResourceKind::BlogLikes { blog: blog.clone() }));
        }
        self.following.then_some(Mode::Following)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let Some(mode) = cli.mode() else {
        bail!("Nothing to do: pass --from-list/--into, --blog-media, --liked-media or --following");
    };

    if cli.dry_run {
        handle_dry_run(&config, &mode);
        return Ok(());
    }

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let harvester = Harvester::from_config(config)?
        .with_config_hash(config_hash)
        .with_cancellation(cancel);

    let summary = match mode {
        Mode::FromList { list, into } => handle_list(&harvester, list, into).await?,
        Mode::Remote(kind) => handle_remote(&harvester, kind).await?,
        Mode::Following => return handle_following(&harvester).await,
    };

    if !cli.quiet {
        print_statistics(&summary);
    }
    if summary.has_failures() {
        tracing::warn!("Harvest finished with failures; re-run to fetch what is missing");
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("like_harvester=info,warn"),
            1 => EnvFilter::new("like_harvester=debug,info"),
            2 => EnvFilter::new("like_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Cancels `token` on the first Ctrl-C
///
/// Downloads already running finish; nothing new is started.
fn spawn_interrupt_handler(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing downloads in flight");
            token.cancel();
        }
    });
}

/// Handles the --dry-run mode: shows the effective settings and the planned work
fn handle_dry_run(config: &Config, mode: &Mode) {
    println!("=== Like-Harvester Dry Run ===\n");

    println!("Downloads:");
    println!(
        "  Max parallel downloads: {}",
        config.fetcher.max_concurrent_downloads
    );
    println!("  Request timeout: {}s", config.fetcher.request_timeout_secs);
    println!("  User agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Destination: {}", config.output.dest_path.display());
    println!(
        "  Pages: {}, posts: {}, pics: {}, videos: {}, download media: {}",
        config.output.pages,
        config.output.posts,
        config.output.pics,
        config.output.videos,
        config.output.download_media
    );

    println!();
    match mode {
        Mode::FromList { list, into } => {
            println!("✓ Would download URLs from {} into {}", list.display(), into.display());
        }
        Mode::Remote(kind) => {
            println!("API: {} (page size {})", config.api.base_url, config.api.page_size);
            println!("✓ Would harvest {}", kind);
        }
        Mode::Following => {
            println!("API: {} (page size {})", config.api.base_url, config.api.page_size);
            println!("✓ Would list followed blogs");
        }
    }
    println!("✓ Configuration is valid");
}

/// Handles --from-list: downloads one URL list
async fn handle_list(
    harvester: &Harvester,
    list: PathBuf,
    into: PathBuf,
) -> anyhow::Result<RunSummary> {
    harvester
        .download_list(&list, &into)
        .await
        .with_context(|| format!("Failed to download URL list {}", list.display()))
}

/// Handles --blog-media / --liked-media: pages the remote API
async fn handle_remote(harvester: &Harvester, kind: ResourceKind) -> anyhow::Result<RunSummary> {
    let client = api_client(harvester)?;
    let label = kind.to_string();
    harvester
        .harvest_remote(&client, kind)
        .await
        .with_context(|| format!("Failed to harvest {}", label))
}

/// Handles --following: prints one followed blog name per line
async fn handle_following(harvester: &Harvester) -> anyhow::Result<()> {
    let client = api_client(harvester)?;
    let names = harvester.followed_blogs(&client).await;
    for name in &names {
        println!("{}", name);
    }
    tracing::info!("{} followed blogs", names.len());
    Ok(())
}

fn api_client(harvester: &Harvester) -> anyhow::Result<ApiClient> {
    let config = harvester.config();
    if config.api.api_key.is_empty() {
        bail!("[api] api-key must be set to use the remote API");
    }
    Ok(ApiClient::from_config(&config.user_agent, &config.fetcher, &config.api)?)
}
