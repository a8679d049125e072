// ABOUTME: Category parser: finds item elements on a page and turns each into a Record.
// ABOUTME: Falls back to structural card/row selectors when the category's item selectors find nothing.

//! Category parsing.
//!
//! For one category the parser resolves the item boundary, extracts every
//! declared field scoped to each item element, and drops elements without a
//! display name. It keeps no state between calls.

use tracing::{debug, warn};

use crate::category::{Category, FieldKind};
use crate::dom::{Dom, Snapshot};
use crate::extractors::registry::{CategorySelectors, SelectorRegistry};
use crate::extractors::select::{extract_list, extract_scalar};
use crate::record::{FieldValue, FieldValues, Record};

/// Which selector set produced the item elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemSource {
    /// One of the category's own item candidates (index into the list).
    Primary(usize),
    /// One of the registry's structural fallback candidates.
    Fallback(usize),
    /// Nothing matched.
    None,
}

/// Records parsed for one category, plus how they were found.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCategory {
    pub records: Vec<Record>,
    /// Item elements considered before dropping nameless ones.
    pub candidates: usize,
    pub source: ItemSource,
}

/// Stateless parser over a shared registry.
#[derive(Debug, Clone, Copy)]
pub struct CategoryParser<'r> {
    registry: &'r SelectorRegistry,
}

/// Returns the first candidate list entry yielding any element, keeping only
/// the innermost matches.
fn first_matching<'a, D: Dom>(
    dom: &'a D,
    root: &D::Node<'a>,
    candidates: &[String],
) -> Option<(usize, Vec<D::Node<'a>>)> {
    for (idx, css) in candidates.iter().enumerate() {
        match dom.query_all(root, css) {
            Ok(nodes) if !nodes.is_empty() => return Some((idx, innermost(dom, nodes, css))),
            Ok(_) => {}
            Err(e) => debug!(selector = %css, error = %e, "item candidate failed"),
        }
    }
    None
}

/// Drops elements that wrap another element matched by `css`. A wrapper such
/// as a card grid would otherwise read its first child's fields.
fn innermost<'a, D: Dom>(dom: &'a D, nodes: Vec<D::Node<'a>>, css: &str) -> Vec<D::Node<'a>> {
    nodes
        .into_iter()
        .filter(|node| match dom.query_all(node, css) {
            Ok(nested) => nested.is_empty(),
            Err(e) => {
                debug!(selector = %css, error = %e, "nesting check failed, keeping element");
                true
            }
        })
        .collect()
}

impl<'r> CategoryParser<'r> {
    pub fn new(registry: &'r SelectorRegistry) -> Self {
        Self { registry }
    }

    /// Parses raw page HTML.
    pub fn parse_html(&self, html: &str, category: Category) -> ParsedCategory {
        let snapshot = Snapshot::parse(html);
        self.parse(&snapshot, category)
    }

    /// Parses a page exposed through the [`Dom`] surface.
    pub fn parse<D: Dom>(&self, dom: &D, category: Category) -> ParsedCategory {
        let spec = self.registry.get(category);
        let root = dom.root();

        let (source, items) = if let Some((idx, nodes)) = first_matching(dom, &root, &spec.items)
        {
            (ItemSource::Primary(idx), nodes)
        } else {
            debug!(%category, "item selectors matched nothing, trying structural fallback");
            match first_matching(dom, &root, self.registry.fallback_items()) {
                Some((idx, nodes)) => (ItemSource::Fallback(idx), nodes),
                None => (ItemSource::None, Vec::new()),
            }
        };

        debug!(%category, candidates = items.len(), ?source, "resolved item elements");

        let candidates = items.len();
        let mut records = Vec::with_capacity(candidates);
        for (position, item) in items.iter().enumerate() {
            let fields = extract_fields(dom, item, spec);
            match Record::from_fields(category, fields) {
                Some(record) => records.push(record),
                None => debug!(%category, position, "skipping item without a display name"),
            }
        }

        if records.is_empty() {
            warn!(%category, candidates, "no records extracted - selectors may need adjustment");
        }

        ParsedCategory {
            records,
            candidates,
            source,
        }
    }
}

/// Extracts every field the category declares, scoped to `item`.
fn extract_fields<'a, D: Dom>(
    dom: &'a D,
    item: &D::Node<'a>,
    spec: &CategorySelectors,
) -> FieldValues {
    let mut values = FieldValues::new();
    for field in spec.category.fields() {
        let candidates = spec.candidates(*field);
        let value = match field.kind() {
            FieldKind::Scalar => FieldValue::Text(extract_scalar(dom, item, candidates)),
            FieldKind::List => FieldValue::List(extract_list(dom, item, candidates)),
        };
        values.insert(*field, value);
    }
    values
}
