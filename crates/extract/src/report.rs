// ABOUTME: Per-category outcomes and the run report aggregated from them.
// ABOUTME: Produces the JSON report, the terminal summary, and the overall success signal.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::category::Category;

/// Where a category's attempt stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionState {
    Pending,
    Navigating,
    Waiting,
    Extracting,
    Done,
    Failed,
}

impl SectionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SectionState::Done | SectionState::Failed)
    }
}

/// The recorded result of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionOutcome {
    pub state: SectionState,
    /// State the attempt was in when it failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_during: Option<SectionState>,
    pub count: usize,
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub duration_ms: u64,
}

impl SectionOutcome {
    pub fn pending() -> Self {
        Self {
            state: SectionState::Pending,
            failed_during: None,
            count: 0,
            errors: Vec::new(),
            warnings: Vec::new(),
            duration_ms: 0,
        }
    }

    pub fn done(count: usize, warnings: Vec<String>, elapsed: Duration) -> Self {
        Self {
            state: SectionState::Done,
            count,
            warnings,
            duration_ms: elapsed.as_millis() as u64,
            ..Self::pending()
        }
    }

    pub fn failed(during: SectionState, error: String, elapsed: Duration) -> Self {
        Self {
            state: SectionState::Failed,
            failed_during: Some(during),
            errors: vec![error],
            duration_ms: elapsed.as_millis() as u64,
            ..Self::pending()
        }
    }
}

/// Outcomes of every category plus run-level errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub sections: BTreeMap<Category, SectionOutcome>,
    pub global_errors: Vec<String>,
    pub started_at: DateTime<Utc>,
    /// Set once every category has been attempted.
    #[serde(rename = "timestamp")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

impl RunReport {
    /// A report with every category pending.
    pub fn new() -> Self {
        Self {
            sections: Category::ALL
                .iter()
                .map(|c| (*c, SectionOutcome::pending()))
                .collect(),
            global_errors: Vec::new(),
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Records a category's outcome. A category is recorded once; later
    /// attempts to overwrite a terminal outcome are ignored.
    pub fn record(&mut self, category: Category, outcome: SectionOutcome) {
        let slot = self
            .sections
            .entry(category)
            .or_insert_with(SectionOutcome::pending);
        if slot.state.is_terminal() {
            warn!(%category, "outcome already recorded, ignoring");
            return;
        }
        *slot = outcome;
    }

    pub fn push_global_error(&mut self, error: impl Into<String>) {
        self.global_errors.push(error.into());
    }

    pub fn finalize(&mut self) {
        if self.completed_at.is_none() {
            self.completed_at = Some(Utc::now());
        }
    }

    pub fn outcome(&self, category: Category) -> Option<&SectionOutcome> {
        self.sections.get(&category)
    }

    pub fn total_records(&self) -> usize {
        self.sections.values().map(|o| o.count).sum()
    }

    /// True when at least one record was extracted.
    pub fn succeeded(&self) -> bool {
        self.total_records() > 0
    }

    /// Human-readable summary, identical for identical outcomes.
    pub fn summary(&self) -> String {
        let rule = "=".repeat(60);
        let mut out = String::new();
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "SCRAPING SUMMARY");
        let _ = writeln!(out, "{rule}");
        for (category, outcome) in &self.sections {
            let _ = writeln!(
                out,
                "{}: {} entries",
                capitalize(category.section_name()),
                outcome.count
            );
            if outcome.state != SectionState::Done && outcome.state != SectionState::Failed {
                let _ = writeln!(out, "  State: {:?}", outcome.state);
            }
            if !outcome.errors.is_empty() {
                let _ = writeln!(out, "  Errors: {}", outcome.errors.join("; "));
            }
            if !outcome.warnings.is_empty() {
                let _ = writeln!(out, "  Warnings: {}", outcome.warnings.join("; "));
            }
        }
        let _ = writeln!(out, "Total: {} entries", self.total_records());
        if !self.global_errors.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Global Errors: {}", self.global_errors.join("; "));
        }
        let _ = writeln!(out, "{rule}");
        out
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
