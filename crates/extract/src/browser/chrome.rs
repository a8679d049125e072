// ABOUTME: PageSession backed by a single headless Chrome tab via headless_chrome.
// ABOUTME: Blocking CDP calls run under block_in_place; dropping the session closes the browser.

use std::ffi::OsStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use headless_chrome::{Browser, LaunchOptions, Tab};
use tracing::{debug, info};
use url::Url;

use crate::browser::config::BrowserConfig;
use crate::browser::{PageSession, WaitOutcome, WaitStrategy};
use crate::error::BrowserError;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Headless Chrome with one tab, reused for every category.
///
/// Requires a multi-threaded tokio runtime.
pub struct ChromeSession {
    tab: Arc<Tab>,
    current: Option<Url>,
    _browser: Browser,
}

impl ChromeSession {
    /// Launches Chrome and opens the tab used for the run.
    pub fn launch(config: &BrowserConfig) -> Result<Self, BrowserError> {
        let flags: Vec<&OsStr> = config.chrome_flags.iter().map(OsStr::new).collect();
        let options = LaunchOptions::default_builder()
            .headless(config.headless)
            .window_size(Some(config.window_size))
            .idle_browser_timeout(Duration::from_secs(300))
            .args(flags)
            .build()
            .map_err(|e| BrowserError::launch("configure", Some(anyhow::anyhow!(e.to_string()))))?;

        let browser = Browser::new(options).map_err(|e| BrowserError::launch("launch", Some(e)))?;
        let tab = browser
            .new_tab()
            .map_err(|e| BrowserError::launch("new_tab", Some(e)))?;

        if let Some(ref ua) = config.user_agent {
            tab.set_user_agent(ua, None, None)
                .map_err(|e| BrowserError::launch("set_user_agent", Some(e)))?;
        }

        info!(headless = config.headless, "browser launched");
        Ok(Self {
            tab,
            current: None,
            _browser: browser,
        })
    }
}

/// True when `a` and `b` differ only by fragment, which the page handles
/// without a document load.
fn same_document(a: &Url, b: &Url) -> bool {
    let mut a = a.clone();
    let mut b = b.clone();
    a.set_fragment(None);
    b.set_fragment(None);
    a == b
}

/// XPath for a button whose normalized text equals `text`.
fn button_xpath(text: &str) -> Option<String> {
    if !text.contains('\'') {
        Some(format!("//button[normalize-space(.)='{}']", text))
    } else if !text.contains('"') {
        Some(format!("//button[normalize-space(.)=\"{}\"]", text))
    } else {
        None
    }
}

impl PageSession for ChromeSession {
    async fn navigate(&mut self, url: &Url, timeout: Duration) -> Result<(), BrowserError> {
        let reload_needed = self
            .current
            .as_ref()
            .is_some_and(|cur| same_document(cur, url));
        let tab = Arc::clone(&self.tab);
        let started = Instant::now();

        let result = tokio::task::block_in_place(|| {
            tab.set_default_timeout(timeout);
            if reload_needed {
                // Hash routes only differ by fragment; force a real load.
                tab.navigate_to("about:blank")?.wait_until_navigated()?;
            }
            tab.navigate_to(url.as_str())?.wait_until_navigated()?;
            Ok::<(), anyhow::Error>(())
        });

        match result {
            Ok(()) => {
                debug!(url = %url, elapsed_ms = started.elapsed().as_millis() as u64, "navigated");
                self.current = Some(url.clone());
                Ok(())
            }
            Err(e) if started.elapsed() >= timeout => {
                Err(BrowserError::timeout(url.as_str(), "navigate", Some(e)))
            }
            Err(e) => Err(BrowserError::navigation(url.as_str(), "navigate", Some(e))),
        }
    }

    async fn wait(&mut self, strategy: &WaitStrategy, timeout: Duration) -> WaitOutcome {
        let tab = Arc::clone(&self.tab);
        tokio::task::block_in_place(|| match strategy {
            WaitStrategy::Selector(selector) => {
                match tab.wait_for_element_with_custom_timeout(selector, timeout) {
                    Ok(_) => WaitOutcome::Ready,
                    Err(e) => {
                        debug!(%selector, error = %e, "selector wait ended without a match");
                        WaitOutcome::TimedOut
                    }
                }
            }
            WaitStrategy::DocumentReady => {
                let started = Instant::now();
                loop {
                    let ready = tab
                        .evaluate("document.readyState", false)
                        .ok()
                        .and_then(|obj| obj.value)
                        .is_some_and(|v| v.as_str() == Some("complete"));
                    if ready {
                        return WaitOutcome::Ready;
                    }
                    if started.elapsed() >= timeout {
                        return WaitOutcome::TimedOut;
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
            }
        })
    }

    async fn content(&mut self) -> Result<String, BrowserError> {
        let url = self
            .current
            .as_ref()
            .map(|u| u.to_string())
            .unwrap_or_default();
        let tab = Arc::clone(&self.tab);
        tokio::task::block_in_place(|| tab.get_content())
            .map_err(|e| BrowserError::content(url, "get_content", Some(e)))
    }

    async fn dismiss_consent(&mut self, button_text: &str, timeout: Duration) -> bool {
        let Some(xpath) = button_xpath(button_text) else {
            return false;
        };
        let tab = Arc::clone(&self.tab);
        tokio::task::block_in_place(|| {
            let started = Instant::now();
            loop {
                if let Ok(button) = tab.find_element_by_xpath(&xpath) {
                    return match button.click() {
                        Ok(_) => true,
                        Err(e) => {
                            debug!(error = %e, "consent button click failed");
                            false
                        }
                    };
                }
                if started.elapsed() >= timeout {
                    return false;
                }
                std::thread::sleep(POLL_INTERVAL);
            }
        })
    }
}
