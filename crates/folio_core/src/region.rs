//! Region handles
//!
//! A region is a rendered node tagged with a stable identifier. The node itself
//! is owned by whatever renders it; the observer only keeps the id and an opaque
//! handle it can resolve through a [`LayoutSource`].

use crate::geometry::Rect;
use rustc_hash::FxHashMap;
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Stable identifier of a section or content block (e.g. `"about"`)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(Arc<str>);

impl RegionId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RegionId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

impl Borrow<str> for RegionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for RegionId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for RegionId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

/// What a region represents on the page
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegionKind {
    /// Top-level page section, drives navigation highlighting
    Section,
    /// Content block inside a section, revealed once on first entry
    Block,
}

/// Opaque handle to a rendered node
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(pub u64);

/// Resolves node handles to document-space bounds.
///
/// Returns `None` when the node no longer exists. The observer treats a missing
/// node as "nothing to report" rather than an error.
pub trait LayoutSource {
    fn bounds(&self, node: NodeHandle) -> Option<Rect>;
}

impl LayoutSource for FxHashMap<NodeHandle, Rect> {
    fn bounds(&self, node: NodeHandle) -> Option<Rect> {
        self.get(&node).copied()
    }
}

impl<F> LayoutSource for F
where
    F: Fn(NodeHandle) -> Option<Rect>,
{
    fn bounds(&self, node: NodeHandle) -> Option<Rect> {
        self(node)
    }
}
