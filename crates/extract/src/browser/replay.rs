// ABOUTME: Offline PageSession that serves debug HTML dumps saved by an earlier debug run.
// ABOUTME: Lets selectors be iterated on without a browser; a missing dump fails navigation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::browser::{PageSession, WaitOutcome, WaitStrategy};
use crate::error::BrowserError;
use crate::extractors::registry::SelectorRegistry;
use crate::persist::debug_file_name;

/// Serves `debug_<section>.html` files in place of live pages.
#[derive(Debug, Clone)]
pub struct ReplaySession {
    pages: HashMap<String, PathBuf>,
    current: Option<(String, String)>,
}

impl ReplaySession {
    /// Maps every category URL under `base` to its dump inside `dir`.
    pub fn from_debug_dir(
        dir: &Path,
        registry: &SelectorRegistry,
        base: &Url,
    ) -> Result<Self, url::ParseError> {
        let mut pages = HashMap::new();
        for spec in registry.iter() {
            let url = spec.url(base)?;
            pages.insert(url.to_string(), dir.join(debug_file_name(spec.category)));
        }
        Ok(Self {
            pages,
            current: None,
        })
    }
}

impl PageSession for ReplaySession {
    async fn navigate(&mut self, url: &Url, _timeout: Duration) -> Result<(), BrowserError> {
        self.current = None;
        let path = self.pages.get(url.as_str()).ok_or_else(|| {
            BrowserError::navigation(
                url.as_str(),
                "replay",
                Some(anyhow::anyhow!("no saved page for this url")),
            )
        })?;
        let html = std::fs::read_to_string(path).map_err(|e| {
            BrowserError::navigation(
                url.as_str(),
                "replay",
                Some(anyhow::Error::new(e).context(format!("reading {}", path.display()))),
            )
        })?;
        debug!(url = %url, path = %path.display(), "replaying saved page");
        self.current = Some((url.to_string(), html));
        Ok(())
    }

    async fn wait(&mut self, _strategy: &WaitStrategy, _timeout: Duration) -> WaitOutcome {
        WaitOutcome::Ready
    }

    async fn content(&mut self) -> Result<String, BrowserError> {
        match self.current {
            Some((_, ref html)) => Ok(html.clone()),
            None => Err(BrowserError::content("", "replay", None)),
        }
    }
}
