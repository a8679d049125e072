// ABOUTME: The element-query surface consumed by the field extractor and category parser.
// ABOUTME: Includes the dom_query-backed snapshot implementation and the compiled selector cache.

//! DOM query surface.
//!
//! The extractor never touches a concrete DOM library. It works against
//! [`Dom`], which exposes scoped queries, text and attribute reads. Every
//! operation is fallible so that implementations backed by a live page can
//! report detached handles; callers treat each failure as "no match".

pub mod compiled;
pub mod snapshot;

pub use snapshot::{Snapshot, SnapshotNode};

use crate::error::DomError;

/// Scoped element queries over a rendered page.
pub trait Dom {
    /// Handle to one element (or the document root).
    type Node<'a>: Clone
    where
        Self: 'a;

    /// The document root. Queries scoped to it search the whole page.
    fn root(&self) -> Self::Node<'_>;

    /// All descendants of `scope` matching `selector`, in document order.
    fn query_all<'a>(
        &'a self,
        scope: &Self::Node<'a>,
        selector: &str,
    ) -> Result<Vec<Self::Node<'a>>, DomError>;

    /// Rendered text of `node`, untrimmed.
    fn text_of(&self, node: &Self::Node<'_>) -> Result<String, DomError>;

    /// Value of attribute `name`, or `None` when absent.
    fn attribute_of(&self, node: &Self::Node<'_>, name: &str)
        -> Result<Option<String>, DomError>;
}
