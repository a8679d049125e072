// ABOUTME: Dom implementation over a static HTML snapshot parsed with dom_query.
// ABOUTME: Used for page content captured from the browser and for offline fixtures.

use dom_query::{Document, Selection};

use crate::dom::compiled::compile;
use crate::dom::Dom;
use crate::error::DomError;

/// A parsed HTML document.
pub struct Snapshot {
    doc: Document,
}

/// Handle into a [`Snapshot`].
#[derive(Clone)]
pub enum SnapshotNode<'a> {
    Root,
    Element(Selection<'a>),
}

impl Snapshot {
    pub fn parse(html: &str) -> Self {
        Self {
            doc: Document::from(html),
        }
    }
}

impl Dom for Snapshot {
    type Node<'a> = SnapshotNode<'a>;

    fn root(&self) -> SnapshotNode<'_> {
        SnapshotNode::Root
    }

    fn query_all<'a>(
        &'a self,
        scope: &SnapshotNode<'a>,
        selector: &str,
    ) -> Result<Vec<SnapshotNode<'a>>, DomError> {
        let matcher = compile(selector)?;
        let found = match scope {
            SnapshotNode::Root => self.doc.select_matcher(&matcher),
            SnapshotNode::Element(sel) => sel.select_matcher(&matcher),
        };
        Ok(found.iter().map(SnapshotNode::Element).collect())
    }

    fn text_of(&self, node: &SnapshotNode<'_>) -> Result<String, DomError> {
        match node {
            SnapshotNode::Root => Ok(self.doc.root().text().to_string()),
            SnapshotNode::Element(sel) => Ok(sel.text().to_string()),
        }
    }

    fn attribute_of(
        &self,
        node: &SnapshotNode<'_>,
        name: &str,
    ) -> Result<Option<String>, DomError> {
        match node {
            SnapshotNode::Root => Ok(None),
            SnapshotNode::Element(sel) => Ok(sel.attr(name).map(|v| v.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML: &str = r#"
        <html><body>
            <div class="monster-card"><span class="name">Great Jagras</span></div>
            <div class="monster-card"><span class="name">Kulu-Ya-Ku</span>
                <img class="weakness" alt="water"></div>
        </body></html>
    "#;

    #[test]
    fn test_root_query_finds_all_in_document_order() {
        let snap = Snapshot::parse(HTML);
        let root = snap.root();
        let cards = snap.query_all(&root, "div.monster-card").unwrap();
        assert_eq!(cards.len(), 2);
        let names: Vec<String> = cards
            .iter()
            .map(|c| snap.text_of(&snap.query_all(c, ".name").unwrap()[0]).unwrap())
            .collect();
        assert_eq!(names, vec!["Great Jagras", "Kulu-Ya-Ku"]);
    }

    #[test]
    fn test_scoped_query_does_not_leak_into_siblings() {
        let snap = Snapshot::parse(HTML);
        let root = snap.root();
        let cards = snap.query_all(&root, "div.monster-card").unwrap();
        assert!(snap.query_all(&cards[0], "img").unwrap().is_empty());
        assert_eq!(snap.query_all(&cards[1], "img").unwrap().len(), 1);
    }

    #[test]
    fn test_attribute_present_and_absent() {
        let snap = Snapshot::parse(HTML);
        let root = snap.root();
        let img = snap.query_all(&root, "img").unwrap().remove(0);
        assert_eq!(snap.attribute_of(&img, "alt").unwrap().as_deref(), Some("water"));
        assert_eq!(snap.attribute_of(&img, "title").unwrap(), None);
        assert_eq!(snap.attribute_of(&root, "alt").unwrap(), None);
    }

    #[test]
    fn test_invalid_selector_is_an_error() {
        let snap = Snapshot::parse(HTML);
        let root = snap.root();
        assert!(matches!(
            snap.query_all(&root, "[[[invalid"),
            Err(DomError::InvalidSelector(_))
        ));
    }
}
