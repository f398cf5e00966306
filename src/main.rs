//! Sumi-Linkcheck main entry point
//!
//! This is the command-line interface for the Sumi-Linkcheck broken link checker.

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use sumi_linkcheck::checker::CheckObserver;
use sumi_linkcheck::config::{load_config_with_hash, validate, Config};
use sumi_linkcheck::crawler::{spawn_interrupt_listener, CancellationToken, CheckReport, LinkChecker};
use sumi_linkcheck::output::{print_statistics, write_reports, RunReport};
use sumi_linkcheck::StatusOutcome;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Exit code when broken links were found and `--fail-on-broken` is set
const EXIT_BROKEN: u8 = 1;

/// Exit code when the base page is unreachable or the run could not start
const EXIT_FATAL: u8 = 2;

/// Pool size used by `--concurrent` when no limit is given on the command line
const DEFAULT_CONCURRENCY: usize = 10;

/// Sumi-Linkcheck: a bounded broken link checker
///
/// Sumi-Linkcheck crawls a single site breadth-first, checks every link it
/// finds, and writes CSV, Markdown and JSON reports of the broken ones.
#[derive(Parser, Debug)]
#[command(name = "sumi-linkcheck")]
#[command(version)]
#[command(about = "A bounded broken link checker", long_about = None)]
struct Cli {
    /// URL to start checking from (overrides the config file)
    #[arg(value_name = "BASE_URL")]
    base_url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum link hops from the base page to crawl
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Maximum number of pages to fetch
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Extra attempts for timeouts, connection failures and 5xx responses
    #[arg(long, value_name = "N")]
    retries: Option<u32>,

    /// Check links with GET only, never HEAD
    #[arg(long)]
    no_head: bool,

    /// Check links concurrently
    #[arg(long)]
    concurrent: bool,

    /// Maximum number of concurrent link checks
    #[arg(long, value_name = "N")]
    concurrency_limit: Option<usize>,

    /// Path of the CSV report; .md and .json reports are written next to it
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Exit with status 1 when any broken link is found
    #[arg(long)]
    fail_on_broken: bool,

    /// Validate the configuration and show what would be checked
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::from(EXIT_FATAL)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_linkcheck=info,warn"),
            1 => EnvFilter::new("sumi_linkcheck=debug,info"),
            2 => EnvFilter::new("sumi_linkcheck=trace,debug"),
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

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let (config, config_hash) = load_merged_config(&cli)?;

    if cli.dry_run {
        print_dry_run(&config);
        return Ok(ExitCode::SUCCESS);
    }

    let observer = Arc::new(ProgressObserver::new(cli.quiet, cli.verbose > 0));
    let checker = LinkChecker::new(config.crawl.clone(), &config.user_agent)
        .context("Failed to build HTTP client")?
        .with_observer(observer.clone());

    let cancel = CancellationToken::new();
    let listener = spawn_interrupt_listener(cancel.clone());

    let check = checker.run(&cancel).await;
    observer.finish();
    listener.abort();
    let check = check.context("Link check failed")?;

    let report = RunReport::from_check(&check, config_hash);
    let output = Path::new(&config.output.path);
    write_reports(&report, output)
        .with_context(|| format!("Failed to write reports to {}", output.display()))?;

    if !cli.quiet {
        print_statistics(&report);
    }

    Ok(ExitCode::from(exit_status(&check, config.output.fail_on_broken)))
}

/// Loads the config file (if any), applies command-line overrides and validates the result
fn load_merged_config(cli: &Cli) -> anyhow::Result<(Config, Option<String>)> {
    let (mut config, hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    apply_overrides(&mut config, cli);
    validate(&config).context("Invalid configuration")?;

    Ok((config, hash))
}

/// Layers command-line flags over file values
fn apply_overrides(config: &mut Config, cli: &Cli) {
    let crawl = &mut config.crawl;

    if let Some(base_url) = &cli.base_url {
        crawl.base_url = base_url.clone();
    }
    if let Some(max_depth) = cli.max_depth {
        crawl.max_depth = max_depth;
    }
    if let Some(max_pages) = cli.max_pages {
        crawl.max_pages = max_pages;
    }
    if let Some(timeout) = cli.timeout {
        crawl.timeout_ms = timeout.saturating_mul(1000);
    }
    if let Some(retries) = cli.retries {
        crawl.retries = retries;
    }
    if cli.no_head {
        crawl.use_head = false;
    }
    match cli.concurrency_limit {
        Some(limit) => crawl.concurrency_limit = limit,
        None if cli.concurrent && crawl.concurrency_limit <= 1 => {
            crawl.concurrency_limit = DEFAULT_CONCURRENCY;
        }
        None => {}
    }

    if let Some(output) = &cli.output {
        config.output.path = output.display().to_string();
    }
    if cli.fail_on_broken {
        config.output.fail_on_broken = true;
    }
}

/// Maps a finished check to the process exit status
fn exit_status(check: &CheckReport, fail_on_broken: bool) -> u8 {
    if !check.base_status.is_reachable() {
        return EXIT_FATAL;
    }
    if fail_on_broken && check.has_broken() {
        return EXIT_BROKEN;
    }
    0
}

/// Handles the --dry-run mode: shows the effective configuration
fn print_dry_run(config: &Config) {
    let crawl = &config.crawl;

    println!("=== Sumi-Linkcheck Dry Run ===\n");

    println!("Check Configuration:");
    println!("  Base URL: {}", crawl.base_url);
    println!("  Max depth: {}", crawl.max_depth);
    println!("  Max pages: {}", crawl.max_pages);
    println!("  Timeout: {}ms", crawl.timeout_ms);
    println!("  Retries: {} (backoff {}ms)", crawl.retries, crawl.backoff_ms);
    println!("  Probe method: {}", if crawl.use_head { "HEAD, GET fallback" } else { "GET" });
    println!("  Concurrency limit: {}", crawl.concurrency_limit);

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    let output = Path::new(&config.output.path);
    for extension in ["csv", "md", "json"] {
        println!("  {}", output.with_extension(extension).display());
    }
    println!("  Fail on broken: {}", config.output.fail_on_broken);

    println!("\n✓ Configuration is valid");
}

/// Console progress fed by check events
struct ProgressObserver {
    bar: ProgressBar,
    verbose: bool,
}

impl ProgressObserver {
    fn new(quiet: bool, verbose: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new_spinner();
            bar.enable_steady_tick(Duration::from_millis(120));
            bar
        };
        Self { bar, verbose }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl CheckObserver for ProgressObserver {
    fn on_page_fetched(&self, url: &Url, depth: u32, outcome: &StatusOutcome) {
        self.bar
            .set_message(format!("crawled {} [depth {}, {}]", url, depth, outcome.label()));
    }

    fn on_checks_planned(&self, total: usize) {
        if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {msg}") {
            self.bar.set_style(style.progress_chars("=> "));
        }
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
        self.bar.set_message("checking links");
    }

    fn on_link_checked(&self, url: &Url, outcome: &StatusOutcome) {
        self.bar.inc(1);
        if self.verbose || outcome.is_broken() {
            self.bar.println(format!("[{}] {}", outcome.label(), url));
        }
    }
}
