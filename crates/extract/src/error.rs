// ABOUTME: Error types for browser sessions, DOM queries, registry loading, sections and output.
// ABOUTME: BrowserError carries a categorized code with convenience constructors and helpers.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::category::{Category, Field};

/// Categories of browser session failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Launch,
    Navigation,
    Timeout,
    Content,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::Launch => "browser launch failed",
            ErrorCode::Navigation => "navigation failed",
            ErrorCode::Timeout => "navigation timed out",
            ErrorCode::Content => "content unavailable",
        };
        write!(f, "{}", s)
    }
}

/// Error raised by a browser session operation.
#[derive(Debug, thiserror::Error)]
pub struct BrowserError {
    pub code: ErrorCode,
    pub url: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for BrowserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.op, self.url, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl BrowserError {
    fn new(
        code: ErrorCode,
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            url: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Create a Launch error.
    pub fn launch(op: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self::new(ErrorCode::Launch, String::new(), op, source)
    }

    /// Create a Navigation error.
    pub fn navigation(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Navigation, url, op, source)
    }

    /// Create a Timeout error.
    pub fn timeout(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Timeout, url, op, source)
    }

    /// Create a Content error.
    pub fn content(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Content, url, op, source)
    }

    /// Returns true if this is a Timeout error.
    pub fn is_timeout(&self) -> bool {
        self.code == ErrorCode::Timeout
    }

    /// Returns true if this is a Navigation error.
    pub fn is_navigation(&self) -> bool {
        self.code == ErrorCode::Navigation
    }
}

/// Errors from the DOM query surface. Always handled at the field level.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("invalid selector: {0}")]
    InvalidSelector(String),

    #[error("node is detached or unreadable")]
    Detached,
}

/// Errors building a selector registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to parse selector registry: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read selector registry {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no selectors declared for category {0}")]
    MissingCategory(Category),

    #[error("category {0} is declared more than once")]
    DuplicateCategory(Category),

    #[error("category {0} has no item selectors")]
    NoItemSelectors(Category),

    #[error("category {0} has no selectors for the display name")]
    NoNameSelectors(Category),

    #[error("field {field} is not declared for category {category}")]
    FieldNotApplicable { category: Category, field: Field },

    #[error("invalid selector {selector:?} in {context}")]
    InvalidSelector { selector: String, context: String },
}

/// Errors that end a single category's attempt.
#[derive(Debug, Error)]
pub enum SectionError {
    #[error("invalid url for {path:?}: {source}")]
    Url {
        path: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error("failed to save debug html to {path}: {source}")]
    DebugDump {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors writing output files.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
