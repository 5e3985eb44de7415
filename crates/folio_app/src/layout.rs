//! Page layout model
//!
//! Stacks sections top to bottom at full viewport width and places each
//! section's blocks below its top padding, separated by a fixed gap. Every
//! section and block gets a [`NodeHandle`]; removing a node makes it
//! unresolvable, which the observer treats as a missing target.

use crate::config::PageConfig;
use folio_core::{LayoutSource, NodeHandle, Rect, RegionId, RegionKind};
use rustc_hash::{FxHashMap, FxHashSet};

/// A laid-out section or block
#[derive(Debug, Clone)]
pub struct LayoutNode {
    pub id: RegionId,
    pub kind: RegionKind,
    pub node: NodeHandle,
    pub bounds: Rect,
    /// Owning section for blocks, `None` for sections
    pub section: Option<RegionId>,
    /// Position among the blocks of its section
    pub index: usize,
}

#[derive(Debug, Default)]
pub struct PageLayout {
    /// Document order: each section followed by its blocks
    nodes: Vec<LayoutNode>,
    by_handle: FxHashMap<NodeHandle, usize>,
    removed: FxHashSet<NodeHandle>,
    content_height: f32,
}

impl PageLayout {
    /// Lay out all sections and blocks for a viewport width
    pub fn build(config: &PageConfig, width: f32) -> Self {
        let mut layout = Self::default();
        let spacing = config.layout;
        let mut next_handle = 1u64;
        let mut top = 0.0;

        for section in &config.sections {
            let section_id = RegionId::new(&section.id);
            layout.push(LayoutNode {
                id: section_id.clone(),
                kind: RegionKind::Section,
                node: NodeHandle(next_handle),
                bounds: Rect::new(0.0, top, width, section.height),
                section: None,
                index: 0,
            });
            next_handle += 1;

            let mut block_top = top + spacing.section_padding;
            for (index, block) in section.blocks.iter().enumerate() {
                layout.push(LayoutNode {
                    id: RegionId::new(&block.id),
                    kind: RegionKind::Block,
                    node: NodeHandle(next_handle),
                    bounds: Rect::new(0.0, block_top, width, block.height),
                    section: Some(section_id.clone()),
                    index,
                });
                next_handle += 1;
                block_top += block.height + spacing.block_gap;
            }

            top += section.height;
        }

        layout.content_height = top;
        tracing::debug!(
            "layout: {} node(s), content height {:.0}",
            layout.nodes.len(),
            top
        );
        layout
    }

    fn push(&mut self, node: LayoutNode) {
        self.by_handle.insert(node.node, self.nodes.len());
        self.nodes.push(node);
    }

    /// Re-flow to a new width. Heights are fixed, so only widths change.
    pub fn set_width(&mut self, width: f32) {
        for node in &mut self.nodes {
            node.bounds.size.width = width;
        }
    }

    /// Total document height
    pub fn content_height(&self) -> f32 {
        self.content_height
    }

    /// All nodes in document order, removed ones included
    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    pub fn sections(&self) -> impl Iterator<Item = &LayoutNode> {
        self.nodes
            .iter()
            .filter(|node| node.kind == RegionKind::Section)
    }

    pub fn blocks(&self) -> impl Iterator<Item = &LayoutNode> {
        self.nodes.iter().filter(|node| node.kind == RegionKind::Block)
    }

    /// Look up a live node by region id
    pub fn find(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes
            .iter()
            .find(|node| node.id.as_str() == id && !self.is_removed(node.node))
    }

    /// Take a node out of the document
    pub fn remove(&mut self, node: NodeHandle) -> bool {
        self.by_handle.contains_key(&node) && self.removed.insert(node)
    }

    pub fn is_removed(&self, node: NodeHandle) -> bool {
        self.removed.contains(&node)
    }
}

impl LayoutSource for PageLayout {
    fn bounds(&self, node: NodeHandle) -> Option<Rect> {
        if self.is_removed(node) {
            return None;
        }
        self.by_handle
            .get(&node)
            .and_then(|index| self.nodes.get(*index))
            .map(|entry| entry.bounds)
    }
}
