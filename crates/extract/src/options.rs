// ABOUTME: Run configuration for the scraper including Mode, ScrapeOptions, and ScraperBuilder.
// ABOUTME: ScraperBuilder provides a fluent API for constructing a Scraper over any PageSession.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::browser::PageSession;
use crate::error::RegistryError;
use crate::extractors::registry::SelectorRegistry;
use crate::scraper::Scraper;

pub const DEFAULT_BASE_URL: &str = "http://mhn.quest";

/// Run mode. Debug waits longer for rendering and dumps each page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Debug,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Mode::Normal => "normal",
            Mode::Debug => "debug",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" => Ok(Mode::Normal),
            "debug" => Ok(Mode::Debug),
            other => Err(format!("unknown mode {other:?} (expected normal or debug)")),
        }
    }
}

/// Configuration options for a scrape run.
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    pub mode: Mode,
    pub base_url: Url,
    pub navigation_timeout: Duration,
    pub normal_settle: Duration,
    pub debug_settle: Duration,
    pub ready_timeout: Duration,
    /// Generic content markers waited on alongside the category container.
    pub ready_markers: Vec<String>,
    pub debug_dir: PathBuf,
    /// Text of a consent button to click once per run, if it appears.
    pub consent_text: Option<String>,
    pub consent_timeout: Duration,
    pub registry: Option<SelectorRegistry>,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Normal,
            base_url: default_base_url(),
            navigation_timeout: Duration::from_secs(30),
            normal_settle: Duration::from_millis(3000),
            debug_settle: Duration::from_millis(6000),
            ready_timeout: Duration::from_secs(10),
            ready_markers: vec![
                ".content".to_string(),
                "main".to_string(),
                "[role='main']".to_string(),
            ],
            debug_dir: PathBuf::from("./debug"),
            consent_text: Some("Consent".to_string()),
            consent_timeout: Duration::from_secs(5),
            registry: None,
        }
    }
}

fn default_base_url() -> Url {
    match Url::parse(DEFAULT_BASE_URL) {
        Ok(url) => url,
        Err(_) => unreachable!("DEFAULT_BASE_URL is a valid absolute url"),
    }
}

impl ScrapeOptions {
    pub fn is_debug(&self) -> bool {
        self.mode == Mode::Debug
    }

    /// Fixed wait after navigation for the current mode.
    pub fn settle_delay(&self) -> Duration {
        match self.mode {
            Mode::Normal => self.normal_settle,
            Mode::Debug => self.debug_settle,
        }
    }
}

/// Builder for constructing a Scraper with custom configuration.
#[derive(Debug, Clone, Default)]
pub struct ScraperBuilder {
    opts: ScrapeOptions,
}

impl ScraperBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.opts.mode = mode;
        self
    }

    pub fn base_url(mut self, url: Url) -> Self {
        self.opts.base_url = url;
        self
    }

    /// Hard limit for a single navigation.
    pub fn navigation_timeout(mut self, timeout: Duration) -> Self {
        self.opts.navigation_timeout = timeout;
        self
    }

    /// Override both settle delays.
    pub fn settle(mut self, normal: Duration, debug: Duration) -> Self {
        self.opts.normal_settle = normal;
        self.opts.debug_settle = debug;
        self
    }

    pub fn ready_timeout(mut self, timeout: Duration) -> Self {
        self.opts.ready_timeout = timeout;
        self
    }

    pub fn ready_markers(mut self, markers: Vec<String>) -> Self {
        self.opts.ready_markers = markers;
        self
    }

    pub fn debug_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.opts.debug_dir = dir.into();
        self
    }

    /// Set or disable (`None`) consent popup dismissal.
    pub fn consent(mut self, text: Option<String>, timeout: Duration) -> Self {
        self.opts.consent_text = text;
        self.opts.consent_timeout = timeout;
        self
    }

    /// Use a custom selector registry instead of the built-in one.
    pub fn registry(mut self, registry: SelectorRegistry) -> Self {
        self.opts.registry = Some(registry);
        self
    }

    pub fn options(&self) -> &ScrapeOptions {
        &self.opts
    }

    /// Build a Scraper driving `session`.
    pub fn build<S: PageSession>(self, session: S) -> Result<Scraper<S>, RegistryError> {
        Scraper::new(self.opts, session)
    }
}
