// ABOUTME: Field extraction over ordered candidate selectors scoped to one element.
// ABOUTME: Scalar fields take the first matching element; list fields take the first candidate with values.

//! Selector-based field extraction.
//!
//! Key behaviors:
//! - Candidates are tried in order and only descendants of the scope element
//!   are considered.
//! - Scalar extraction stops at the first candidate that matches any element
//!   and returns its value even if that value is empty.
//! - List extraction returns every non-empty value of the first candidate
//!   yielding at least one; later candidates are never merged in.
//! - DOM errors are logged and treated as "no match" for that candidate. A
//!   list candidate with one unreadable element contributes nothing.
//! - Values are trimmed; internal whitespace, including line breaks, is kept.

use tracing::debug;

use crate::dom::Dom;
use crate::error::DomError;
use crate::extractors::registry::SelectorSpec;

/// Trims surrounding whitespace.
pub(crate) fn clean_text(s: &str) -> String {
    s.trim().to_string()
}

/// Reads the value a candidate describes from one matched element.
fn read_value<D: Dom>(dom: &D, node: &D::Node<'_>, spec: &SelectorSpec) -> Result<String, DomError> {
    let raw = match spec {
        SelectorSpec::Css(_) => dom.text_of(node)?,
        SelectorSpec::CssAttr(_, attr) => dom.attribute_of(node, attr)?.unwrap_or_default(),
    };
    Ok(clean_text(&raw))
}

fn scalar_from<'a, D: Dom>(
    dom: &'a D,
    scope: &D::Node<'a>,
    spec: &SelectorSpec,
) -> Result<Option<String>, DomError> {
    let matches = dom.query_all(scope, spec.css())?;
    match matches.first() {
        Some(node) => read_value(dom, node, spec).map(Some),
        None => Ok(None),
    }
}

fn list_from<'a, D: Dom>(
    dom: &'a D,
    scope: &D::Node<'a>,
    spec: &SelectorSpec,
) -> Result<Vec<String>, DomError> {
    let mut values = Vec::new();
    for node in dom.query_all(scope, spec.css())? {
        let value = read_value(dom, &node, spec)?;
        if !value.is_empty() {
            values.push(value);
        }
    }
    Ok(values)
}

/// Extracts a scalar field from `scope`.
///
/// Returns the value of the first element matched by the first candidate that
/// matches anything, or an empty string when no candidate matches.
pub fn extract_scalar<'a, D: Dom>(
    dom: &'a D,
    scope: &D::Node<'a>,
    candidates: &[SelectorSpec],
) -> String {
    for spec in candidates {
        match scalar_from(dom, scope, spec) {
            Ok(Some(value)) => return value,
            Ok(None) => {}
            Err(e) => debug!(selector = spec.css(), error = %e, "scalar candidate failed"),
        }
    }
    String::new()
}

/// Extracts a list field from `scope`.
///
/// Returns the non-empty values of the first candidate yielding any, or an
/// empty list when every candidate comes up empty.
pub fn extract_list<'a, D: Dom>(
    dom: &'a D,
    scope: &D::Node<'a>,
    candidates: &[SelectorSpec],
) -> Vec<String> {
    for spec in candidates {
        match list_from(dom, scope, spec) {
            Ok(values) if !values.is_empty() => return values,
            Ok(_) => {}
            Err(e) => debug!(selector = spec.css(), error = %e, "list candidate failed"),
        }
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Snapshot, SnapshotNode};
    use pretty_assertions::assert_eq;

    const CARD: &str = r#"
        <div class="card">
            <div class="name-en">
                Great Jagras
            </div>
            <div class="name"></div>
            <span class="blank">   </span>
            <div class="weakness">Fire</div>
            <div class="weakness"> </div>
            <div class="weakness">Thunder</div>
            <div class="element">Ice</div>
            <img class="weak-icon" alt="fire">
            <img class="weak-icon" alt="thunder">
            <img class="weak-icon">
        </div>
    "#;

    fn css(s: &str) -> SelectorSpec {
        SelectorSpec::Css(s.to_string())
    }

    fn attr(s: &str, a: &str) -> SelectorSpec {
        SelectorSpec::CssAttr(s.to_string(), a.to_string())
    }

    /// Wraps a snapshot, failing every query for one selector and every text
    /// read of elements whose text contains `unreadable`.
    struct FailingDom {
        inner: Snapshot,
        broken: &'static str,
        unreadable: Option<&'static str>,
    }

    impl Dom for FailingDom {
        type Node<'a> = SnapshotNode<'a>;

        fn root(&self) -> SnapshotNode<'_> {
            self.inner.root()
        }

        fn query_all<'a>(
            &'a self,
            scope: &SnapshotNode<'a>,
            selector: &str,
        ) -> Result<Vec<SnapshotNode<'a>>, DomError> {
            if selector == self.broken {
                return Err(DomError::Detached);
            }
            self.inner.query_all(scope, selector)
        }

        fn text_of(&self, node: &SnapshotNode<'_>) -> Result<String, DomError> {
            let text = self.inner.text_of(node)?;
            match self.unreadable {
                Some(marker) if text.contains(marker) => Err(DomError::Detached),
                _ => Ok(text),
            }
        }

        fn attribute_of(
            &self,
            node: &SnapshotNode<'_>,
            name: &str,
        ) -> Result<Option<String>, DomError> {
            self.inner.attribute_of(node, name)
        }
    }

    #[test]
    fn test_scalar_first_match_trimmed() {
        let dom = Snapshot::parse(CARD);
        let root = dom.root();
        assert_eq!(
            extract_scalar(&dom, &root, &[css(".name-en"), css(".name")]),
            "Great Jagras"
        );
    }

    #[test]
    fn test_internal_line_breaks_are_kept() {
        let dom = Snapshot::parse("<p class=\"description\">  Line one.\nLine two.  </p>");
        let root = dom.root();
        assert_eq!(
            extract_scalar(&dom, &root, &[css(".description")]),
            "Line one.\nLine two."
        );
    }

    #[test]
    fn test_unreadable_element_fails_the_whole_list_candidate() {
        let dom = FailingDom {
            inner: Snapshot::parse(CARD),
            broken: "",
            unreadable: Some("Thunder"),
        };
        let root = dom.root();
        assert_eq!(
            extract_list(&dom, &root, &[css(".weakness"), css(".element")]),
            vec!["Ice"]
        );
    }

    #[test]
    fn test_scalar_returns_empty_match_without_trying_later_candidates() {
        let dom = Snapshot::parse(CARD);
        let root = dom.root();
        assert_eq!(extract_scalar(&dom, &root, &[css(".name"), css(".name-en")]), "");
        assert_eq!(extract_scalar(&dom, &root, &[css(".blank"), css(".name-en")]), "");
    }

    #[test]
    fn test_scalar_no_match_is_empty() {
        let dom = Snapshot::parse(CARD);
        let root = dom.root();
        assert_eq!(extract_scalar(&dom, &root, &[css(".name-jp"), css("[lang='ja']")]), "");
        assert_eq!(extract_scalar(&dom, &root, &[]), "");
    }

    #[test]
    fn test_scalar_attribute_candidate() {
        let dom = Snapshot::parse(CARD);
        let root = dom.root();
        assert_eq!(extract_scalar(&dom, &root, &[attr("img.weak-icon", "alt")]), "fire");
        assert_eq!(extract_scalar(&dom, &root, &[attr("img.weak-icon", "title")]), "");
    }

    #[test]
    fn test_list_collects_non_empty_values_of_first_candidate() {
        let dom = Snapshot::parse(CARD);
        let root = dom.root();
        assert_eq!(
            extract_list(&dom, &root, &[css(".weakness"), css(".element")]),
            vec!["Fire", "Thunder"]
        );
    }

    #[test]
    fn test_list_first_yielding_candidate_wins_exclusively() {
        let dom = Snapshot::parse(CARD);
        let root = dom.root();
        // Both candidates match elements; only the first set is kept.
        assert_eq!(
            extract_list(&dom, &root, &[css(".element"), css(".weakness")]),
            vec!["Ice"]
        );
    }

    #[test]
    fn test_list_skips_candidates_with_only_empty_values() {
        let dom = Snapshot::parse(CARD);
        let root = dom.root();
        assert_eq!(
            extract_list(&dom, &root, &[css(".blank"), attr("img.weak-icon", "alt")]),
            vec!["fire", "thunder"]
        );
    }

    #[test]
    fn test_list_exhausted_is_empty() {
        let dom = Snapshot::parse(CARD);
        let root = dom.root();
        assert!(extract_list(&dom, &root, &[css(".material"), css(".drop")]).is_empty());
    }

    #[test]
    fn test_invalid_selector_falls_through_to_next_candidate() {
        let dom = Snapshot::parse(CARD);
        let root = dom.root();
        assert_eq!(
            extract_scalar(&dom, &root, &[css("[[[invalid"), css(".name-en")]),
            "Great Jagras"
        );
        assert_eq!(
            extract_list(&dom, &root, &[css("[[[invalid"), css(".element")]),
            vec!["Ice"]
        );
    }

    #[test]
    fn test_dom_errors_do_not_escape() {
        let dom = FailingDom {
            inner: Snapshot::parse(CARD),
            broken: ".name-en",
            unreadable: None,
        };
        let root = dom.root();
        assert_eq!(extract_scalar(&dom, &root, &[css(".name-en")]), "");
        assert_eq!(
            extract_scalar(&dom, &root, &[css(".name-en"), css(".element")]),
            "Ice"
        );
    }

    #[test]
    fn test_scope_limits_matches_to_descendants() {
        let html = r#"
            <div class="card" id="a"><span class="name">A</span></div>
            <div class="card" id="b"></div>
        "#;
        let dom = Snapshot::parse(html);
        let root = dom.root();
        let cards = dom.query_all(&root, "div.card").unwrap();
        assert_eq!(extract_scalar(&dom, &cards[0], &[css(".name")]), "A");
        assert_eq!(extract_scalar(&dom, &cards[1], &[css(".name")]), "");
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  hello   world  "), "hello   world");
        assert_eq!(clean_text("\n\tGreat Jagras\n"), "Great Jagras");
        assert_eq!(clean_text(""), "");
    }
}
