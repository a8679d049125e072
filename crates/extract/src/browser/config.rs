// ABOUTME: Launch configuration for the headless Chrome session.
// ABOUTME: Defaults to a headless 1920x1080 window with a desktop user agent.

/// Configuration for the Chrome instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserConfig {
    /// Run without a visible window
    pub headless: bool,

    /// Browser window size
    pub window_size: (u32, u32),

    /// Custom user agent
    pub user_agent: Option<String>,

    /// Additional Chrome flags
    pub chrome_flags: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_size: (1920, 1080),
            user_agent: Some(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36"
                    .to_string(),
            ),
            chrome_flags: vec![],
        }
    }
}

impl BrowserConfig {
    /// A visible browser window, for watching a debug run.
    pub fn headed() -> Self {
        Self {
            headless: false,
            ..Self::default()
        }
    }

    /// Flags for constrained container environments.
    pub fn container() -> Self {
        Self {
            chrome_flags: vec![
                "--disable-dev-shm-usage".to_string(),
                "--no-sandbox".to_string(),
            ],
            ..Self::default()
        }
    }
}
