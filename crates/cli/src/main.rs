// ABOUTME: CLI binary that scrapes every mhn.quest category and writes JSON output files.
// ABOUTME: Drives headless Chrome, or replays saved debug pages, and exits 0 only if records were found.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use mhn_extract::options::DEFAULT_BASE_URL;
use mhn_extract::{
    load_builtin_registry, BrowserConfig, ChromeSession, Mode, OutputWriter, PageSession,
    ReplaySession, ScrapeRun, ScraperBuilder, SelectorRegistry,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "mhn-scrape")]
#[command(about = "Scrape Monster Hunter Now game data from mhn.quest")]
struct Args {
    /// Run mode: normal, or debug (longer waits, page dumps, verbose logs)
    #[arg(long = "mode", default_value = "normal")]
    mode: Mode,

    /// Site to scrape
    #[arg(long = "base-url", default_value = DEFAULT_BASE_URL)]
    base_url: Url,

    /// Directory for the JSON output files
    #[arg(long = "output-dir", default_value = "./output")]
    output_dir: PathBuf,

    /// Directory for debug page dumps
    #[arg(long = "debug-dir", default_value = "./debug")]
    debug_dir: PathBuf,

    /// Selector registry JSON replacing the built-in selectors
    #[arg(long = "selectors")]
    selectors: Option<PathBuf>,

    /// Serve pages from saved debug dumps in this directory instead of launching Chrome
    #[arg(long = "replay")]
    replay: Option<PathBuf>,

    /// Show the browser window
    #[arg(long = "headed")]
    headed: bool,

    /// Pass --no-sandbox and --disable-dev-shm-usage to Chrome (containers)
    #[arg(long = "no-sandbox")]
    no_sandbox: bool,

    /// Navigation timeout per category in milliseconds
    #[arg(long = "nav-timeout-ms", default_value_t = 30_000)]
    nav_timeout_ms: u64,
}

fn init_tracing(mode: Mode) {
    let level = match mode {
        Mode::Debug => "debug",
        Mode::Normal => "info",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("warn,mhn_extract={level},mhn_scrape={level}"))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn load_registry(path: Option<&Path>) -> Result<SelectorRegistry> {
    match path {
        Some(path) => SelectorRegistry::from_path(path)
            .with_context(|| format!("loading selectors from {}", path.display())),
        None => load_builtin_registry().context("loading built-in selectors"),
    }
}

async fn run_with<S: PageSession>(builder: ScraperBuilder, session: S) -> ScrapeRun {
    match builder.build(session) {
        Ok(mut scraper) => scraper.run().await,
        Err(e) => ScrapeRun::aborted(format!("Failed to load selectors: {}", e)),
    }
}

async fn scrape(args: &Args) -> ScrapeRun {
    let registry = match load_registry(args.selectors.as_deref()) {
        Ok(registry) => registry,
        Err(e) => {
            error!(error = %format!("{:#}", e), "selector registry unusable");
            return ScrapeRun::aborted(format!("Failed to load selectors: {:#}", e));
        }
    };

    let builder = ScraperBuilder::new()
        .mode(args.mode)
        .base_url(args.base_url.clone())
        .navigation_timeout(Duration::from_millis(args.nav_timeout_ms))
        .debug_dir(&args.debug_dir)
        .registry(registry.clone());

    if let Some(ref dir) = args.replay {
        info!(dir = %dir.display(), "replaying saved pages");
        let session = match ReplaySession::from_debug_dir(dir, &registry, &args.base_url) {
            Ok(session) => session,
            Err(e) => return ScrapeRun::aborted(format!("Invalid category url: {}", e)),
        };
        // Saved pages are already rendered.
        let builder = builder
            .settle(Duration::ZERO, Duration::ZERO)
            .ready_timeout(Duration::ZERO)
            .consent(None, Duration::ZERO);
        return run_with(builder, session).await;
    }

    let mut config = if args.headed {
        BrowserConfig::headed()
    } else {
        BrowserConfig::default()
    };
    if args.no_sandbox {
        config.chrome_flags = BrowserConfig::container().chrome_flags;
    }

    let session = match tokio::task::block_in_place(|| ChromeSession::launch(&config)) {
        Ok(session) => session,
        Err(e) => {
            error!(error = %e, "browser launch failed");
            return ScrapeRun::aborted(format!("Failed to launch browser: {}", e));
        }
    };
    run_with(builder, session).await
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.mode);

    let mut run = scrape(&args).await;
    let written = OutputWriter::new(&args.output_dir).write(&run.data, &mut run.report);
    info!(files = written.len(), dir = %args.output_dir.display(), "output written");

    print!("{}", run.report.summary());

    if run.succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
