// ABOUTME: Main library entry point for the MHN game-data scraper.
// ABOUTME: Re-exports the public API: Scraper, ScraperBuilder, Record, RunReport, sessions, and errors.

//! mhn-extract - scrapes Monster Hunter Now game data from a rendered web app.
//!
//! A [`PageSession`] loads each category page, the [`CategoryParser`] turns the
//! rendered markup into sparse [`Record`]s using candidate selectors from a
//! [`SelectorRegistry`], and the [`RunReport`] collects per-category outcomes.
//!
//! # Example
//!
//! ```no_run
//! use mhn_extract::{BrowserConfig, ChromeSession, OutputWriter, ScraperBuilder};
//!
//! #[tokio::main(flavor = "multi_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let session = ChromeSession::launch(&BrowserConfig::default())?;
//!     let mut scraper = ScraperBuilder::new().build(session)?;
//!     let mut run = scraper.run().await;
//!     OutputWriter::new("./output").write(&run.data, &mut run.report);
//!     println!("{}", run.report.summary());
//!     Ok(())
//! }
//! ```

pub mod browser;
pub mod category;
pub mod dom;
pub mod error;
pub mod extractors;
pub mod options;
pub mod persist;
pub mod record;
pub mod report;
pub mod scraper;

pub use crate::browser::{
    BrowserConfig, ChromeSession, PageSession, ReplaySession, WaitOutcome, WaitStrategy,
};
pub use crate::category::{Category, Field};
pub use crate::error::{
    BrowserError, DomError, ErrorCode, PersistError, RegistryError, SectionError,
};
pub use crate::extractors::loader::load_builtin_registry;
pub use crate::extractors::parser::{CategoryParser, ParsedCategory};
pub use crate::extractors::registry::{SelectorRegistry, SelectorSpec};
pub use crate::options::{Mode, ScrapeOptions, ScraperBuilder};
pub use crate::persist::OutputWriter;
pub use crate::record::{DisplayName, Record};
pub use crate::report::{RunReport, SectionOutcome, SectionState};
pub use crate::scraper::{ScrapeRun, ScrapedData, Scraper};
