// ABOUTME: Section orchestrator: drives one PageSession through every category in order.
// ABOUTME: Each category runs navigate, wait, extract; a failure is recorded and the run moves on.

//! The scrape run.
//!
//! Categories are processed one at a time in declaration order. Each moves
//! through [`SectionState`]s and ends `Done` or `Failed`; nothing a category
//! does can stop the ones after it.

use std::collections::BTreeMap;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::browser::{PageSession, WaitOutcome, WaitStrategy};
use crate::category::Category;
use crate::error::{RegistryError, SectionError};
use crate::extractors::loader::load_builtin_registry;
use crate::extractors::parser::{CategoryParser, ParsedCategory};
use crate::extractors::registry::{CategorySelectors, SelectorRegistry};
use crate::options::ScrapeOptions;
use crate::persist::write_debug_html;
use crate::record::Record;
use crate::report::{RunReport, SectionOutcome, SectionState};

pub const EMPTY_SECTION_WARNING: &str = "No items found - check selectors";

/// Records by category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapedData {
    sections: BTreeMap<Category, Vec<Record>>,
}

impl ScrapedData {
    pub fn insert(&mut self, category: Category, records: Vec<Record>) {
        self.sections.insert(category, records);
    }

    /// Records for `category`; empty if it produced none.
    pub fn get(&self, category: Category) -> &[Record] {
        self.sections
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn total(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    /// Every record, in category order.
    pub fn combined(&self) -> Vec<&Record> {
        self.sections.values().flatten().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &[Record])> {
        self.sections.iter().map(|(c, r)| (*c, r.as_slice()))
    }
}

/// What a run produced.
#[derive(Debug, Clone)]
pub struct ScrapeRun {
    pub data: ScrapedData,
    pub report: RunReport,
}

impl ScrapeRun {
    /// A run that never reached any category.
    pub fn aborted(global_error: impl Into<String>) -> Self {
        let mut report = RunReport::new();
        report.push_global_error(global_error);
        report.finalize();
        Self {
            data: ScrapedData::default(),
            report,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.report.succeeded()
    }
}

/// Drives a [`PageSession`] through every category.
pub struct Scraper<S: PageSession> {
    opts: ScrapeOptions,
    registry: SelectorRegistry,
    session: S,
    consent_dismissed: bool,
}

impl<S: PageSession> Scraper<S> {
    /// Uses the options' registry, or the built-in one when none is set.
    pub fn new(mut opts: ScrapeOptions, session: S) -> Result<Self, RegistryError> {
        let registry = match opts.registry.take() {
            Some(registry) => registry,
            None => load_builtin_registry()?,
        };
        Ok(Self {
            opts,
            registry,
            session,
            consent_dismissed: false,
        })
    }

    pub fn options(&self) -> &ScrapeOptions {
        &self.opts
    }

    pub fn registry(&self) -> &SelectorRegistry {
        &self.registry
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn into_session(self) -> S {
        self.session
    }

    /// Scrapes every category and returns the records with a finalized report.
    pub async fn run(&mut self) -> ScrapeRun {
        let mut data = ScrapedData::default();
        let mut report = RunReport::new();
        info!(mode = %self.opts.mode, base_url = %self.opts.base_url, "starting scrape");

        for category in Category::ALL {
            let started = Instant::now();
            let mut state = SectionState::Pending;
            info!(%category, "scraping section");

            match self.scrape_category(category, &mut state).await {
                Ok(parsed) => {
                    let count = parsed.records.len();
                    let mut warnings = Vec::new();
                    if count == 0 {
                        warnings.push(EMPTY_SECTION_WARNING.to_string());
                    }
                    info!(
                        %category,
                        count,
                        candidates = parsed.candidates,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "section done"
                    );
                    report.record(
                        category,
                        SectionOutcome::done(count, warnings, started.elapsed()),
                    );
                    data.insert(category, parsed.records);
                }
                Err(e) => {
                    let message = format!("Failed to scrape {}: {}", category.section_name(), e);
                    error!(%category, during = ?state, error = %e, "section failed");
                    report.record(
                        category,
                        SectionOutcome::failed(state, message, started.elapsed()),
                    );
                    data.insert(category, Vec::new());
                }
            }
        }

        report.finalize();
        info!(total = report.total_records(), "scrape finished");
        ScrapeRun { data, report }
    }

    async fn scrape_category(
        &mut self,
        category: Category,
        state: &mut SectionState,
    ) -> Result<ParsedCategory, SectionError> {
        let spec = self.registry.get(category);
        let url = spec.url(&self.opts.base_url).map_err(|source| SectionError::Url {
            path: spec.path.clone(),
            source,
        })?;
        let strategy = readiness_strategy(spec, &self.opts.ready_markers);

        transition(category, state, SectionState::Navigating);
        self.session
            .navigate(&url, self.opts.navigation_timeout)
            .await?;

        transition(category, state, SectionState::Waiting);
        self.try_dismiss_consent().await;
        tokio::time::sleep(self.opts.settle_delay()).await;
        if self.session.wait(&strategy, self.opts.ready_timeout).await == WaitOutcome::TimedOut {
            warn!(
                %category,
                timeout_ms = self.opts.ready_timeout.as_millis() as u64,
                "readiness wait expired, extracting anyway"
            );
        }

        transition(category, state, SectionState::Extracting);
        let html = self.session.content().await?;
        if self.opts.is_debug() {
            let path = write_debug_html(&self.opts.debug_dir, category, &html).map_err(|source| {
                SectionError::DebugDump {
                    path: self.opts.debug_dir.clone(),
                    source,
                }
            })?;
            debug!(%category, path = %path.display(), "saved page dump");
        }

        Ok(CategoryParser::new(&self.registry).parse_html(&html, category))
    }

    async fn try_dismiss_consent(&mut self) {
        if self.consent_dismissed {
            return;
        }
        let Some(text) = self.opts.consent_text.as_deref() else {
            return;
        };
        if self
            .session
            .dismiss_consent(text, self.opts.consent_timeout)
            .await
        {
            info!(button = text, "dismissed consent popup");
            self.consent_dismissed = true;
        }
    }
}

fn transition(category: Category, state: &mut SectionState, next: SectionState) {
    debug!(%category, from = ?state, to = ?next, "section state");
    *state = next;
}

/// Waits for any container candidate or generic content marker.
fn readiness_strategy(spec: &CategorySelectors, markers: &[String]) -> WaitStrategy {
    let selectors: Vec<&str> = spec
        .container
        .iter()
        .chain(markers)
        .map(String::as_str)
        .collect();
    if selectors.is_empty() {
        WaitStrategy::DocumentReady
    } else {
        WaitStrategy::Selector(selectors.join(", "))
    }
}
