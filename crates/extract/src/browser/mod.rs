// ABOUTME: Browser session surface used by the orchestrator: navigate, wait, read content.
// ABOUTME: Implemented by a headless Chrome session and by an offline replay of saved pages.

//! Browser sessions.
//!
//! A [`PageSession`] owns one page for the whole run. Navigation is the only
//! fallible step that ends a category; readiness waits report an outcome and
//! never fail the caller.

pub mod chrome;
pub mod config;
pub mod replay;

use std::time::Duration;

use url::Url;

use crate::error::BrowserError;

pub use chrome::ChromeSession;
pub use config::BrowserConfig;
pub use replay::ReplaySession;

/// What a readiness wait looks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitStrategy {
    /// Any element matching this (possibly comma-joined) selector.
    Selector(String),
    /// `document.readyState == "complete"`.
    DocumentReady,
}

/// Result of a best-effort readiness wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome {
    Ready,
    TimedOut,
}

/// One browser page driven sequentially by the orchestrator.
#[allow(async_fn_in_trait)]
pub trait PageSession {
    /// Loads `url`, failing if the page does not finish navigating within `timeout`.
    async fn navigate(&mut self, url: &Url, timeout: Duration) -> Result<(), BrowserError>;

    /// Waits up to `timeout` for `strategy` to be satisfied.
    async fn wait(&mut self, strategy: &WaitStrategy, timeout: Duration) -> WaitOutcome;

    /// Serialized markup of the current page.
    async fn content(&mut self) -> Result<String, BrowserError>;

    /// Clicks a consent button labelled `button_text` if one shows up within
    /// `timeout`. Returns true if a button was clicked.
    async fn dismiss_consent(&mut self, _button_text: &str, _timeout: Duration) -> bool {
        false
    }
}
