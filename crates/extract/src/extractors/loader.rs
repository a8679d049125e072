// ABOUTME: Loads the builtin selector registry from JSON embedded at compile time.
// ABOUTME: The same schema is accepted from a user file to override stale selectors.

use crate::error::RegistryError;
use crate::extractors::registry::SelectorRegistry;

/// Embedded selector registry for mhn.quest.
const BUILTIN_SELECTORS_JSON: &str = include_str!("../../data/selectors.json");

/// Loads and validates the builtin selector registry.
pub fn load_builtin_registry() -> Result<SelectorRegistry, RegistryError> {
    SelectorRegistry::from_json(BUILTIN_SELECTORS_JSON)
}
