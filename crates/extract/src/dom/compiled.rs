// ABOUTME: Process-wide cache of compiled CSS selectors shared by the registry and the DOM snapshot.
// ABOUTME: Invalid selectors are cached too, so a stale registry entry is only parsed once.

//! Compiled selector cache.
//!
//! Every item and field candidate is matched once per item element, so the
//! same handful of selector strings is compiled over and over without a
//! cache. Registry validation warms the cache at startup.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use dom_query::Matcher;
use once_cell::sync::Lazy;

use crate::error::DomError;

static SELECTOR_CACHE: Lazy<RwLock<HashMap<String, Option<Matcher>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Gets or compiles a CSS selector.
///
/// Returns `DomError::InvalidSelector` for selectors that fail to compile.
pub fn compile(css: &str) -> Result<Matcher, DomError> {
    {
        let cache = SELECTOR_CACHE
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = cache.get(css) {
            return cached
                .clone()
                .ok_or_else(|| DomError::InvalidSelector(css.to_string()));
        }
    }

    let compiled = Matcher::new(css).ok();
    let mut cache = SELECTOR_CACHE
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    let entry = cache.entry(css.to_string()).or_insert(compiled);
    entry
        .clone()
        .ok_or_else(|| DomError::InvalidSelector(css.to_string()))
}

/// Returns true if `css` compiles. Warms the cache as a side effect.
pub fn is_valid(css: &str) -> bool {
    compile(css).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_selector_compiles_twice() {
        assert!(compile("div.monster-card").is_ok());
        assert!(compile("div.monster-card").is_ok());
    }

    #[test]
    fn test_invalid_selector_is_reported_every_time() {
        assert_eq!(
            compile("[[[invalid").unwrap_err(),
            DomError::InvalidSelector("[[[invalid".to_string())
        );
        assert!(!is_valid("[[[invalid"));
    }

    #[test]
    fn test_attribute_substring_selectors_compile() {
        assert!(is_valid("div[class*='card']"));
        assert!(is_valid("img[class*='weak']"));
        assert!(is_valid("[lang='ja']"));
    }
}
