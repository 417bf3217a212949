//! Retained element tree
//!
//! Widgets rebuild their part of the tree whenever their state asks for a
//! rebuild. Every node carries a string key that stays the same across
//! rebuilds, so the event router can keep hover, press and focus state
//! while node ids change.

use std::collections::HashMap;

use slotmap::{new_key_type, SlotMap};

use crate::element::ElementBounds;
use crate::event_handler::EventHandlers;

new_key_type! {
    pub struct LayoutNodeId;
}

/// A node in the element tree
pub struct LayoutNode {
    pub key: String,
    pub parent: Option<LayoutNodeId>,
    pub children: Vec<LayoutNodeId>,
    pub bounds: ElementBounds,
    pub handlers: EventHandlers,
}

/// Element tree with key lookup and hit testing
#[derive(Default)]
pub struct LayoutTree {
    nodes: SlotMap<LayoutNodeId, LayoutNode>,
    keys: HashMap<String, LayoutNodeId>,
    roots: Vec<LayoutNodeId>,
}

impl LayoutTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node under `parent` (or as a new root)
    ///
    /// Later children are stacked above earlier ones for hit testing.
    pub fn create_node(
        &mut self,
        parent: Option<LayoutNodeId>,
        key: impl Into<String>,
        bounds: ElementBounds,
        handlers: EventHandlers,
    ) -> LayoutNodeId {
        let key = key.into();
        let id = self.nodes.insert(LayoutNode {
            key: key.clone(),
            parent,
            children: Vec::new(),
            bounds,
            handlers,
        });

        match parent.and_then(|p| self.nodes.get_mut(p)) {
            Some(parent_node) => parent_node.children.push(id),
            None => self.roots.push(id),
        }

        if let Some(previous) = self.keys.insert(key, id) {
            tracing::warn!(?previous, "duplicate element key, newest node wins lookups");
        }
        id
    }

    pub fn get(&self, id: LayoutNodeId) -> Option<&LayoutNode> {
        self.nodes.get(id)
    }

    /// Find a node by its element key
    pub fn node_by_key(&self, key: &str) -> Option<LayoutNodeId> {
        self.keys.get(key).copied()
    }

    /// Bounds of the node with the given key
    pub fn bounds_of(&self, key: &str) -> Option<ElementBounds> {
        self.node_by_key(key)
            .and_then(|id| self.nodes.get(id))
            .map(|n| n.bounds)
    }

    /// Children of a node, in insertion order
    pub fn children(&self, id: LayoutNodeId) -> &[LayoutNodeId] {
        self.nodes
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// The node followed by its ancestors, up to the root
    pub fn ancestors(&self, id: LayoutNodeId) -> Vec<LayoutNodeId> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.nodes.get(node_id) else {
                break;
            };
            chain.push(node_id);
            current = node.parent;
        }
        chain
    }

    /// Topmost, deepest node containing the point
    ///
    /// A child is only considered if its parent contains the point.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<LayoutNodeId> {
        self.roots
            .iter()
            .rev()
            .find_map(|&root| self.hit_test_node(root, x, y))
    }

    fn hit_test_node(&self, id: LayoutNodeId, x: f32, y: f32) -> Option<LayoutNodeId> {
        let node = self.nodes.get(id)?;
        if !node.bounds.contains(x, y) {
            return None;
        }
        node.children
            .iter()
            .rev()
            .find_map(|&child| self.hit_test_node(child, x, y))
            .or(Some(id))
    }

    /// Remove every node
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.keys.clear();
        self.roots.clear();
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Keys of every node, in no particular order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(tree: &mut LayoutTree, parent: Option<LayoutNodeId>, key: &str, b: ElementBounds) -> LayoutNodeId {
        tree.create_node(parent, key, b, EventHandlers::new())
    }

    #[test]
    fn test_hit_test_prefers_deepest_topmost() {
        let mut tree = LayoutTree::new();
        let root = leaf(&mut tree, None, "root", ElementBounds::new(0.0, 0.0, 200.0, 100.0));
        let a = leaf(&mut tree, Some(root), "a", ElementBounds::new(0.0, 0.0, 100.0, 100.0));
        let b = leaf(&mut tree, Some(root), "b", ElementBounds::new(50.0, 0.0, 100.0, 100.0));
        let inner = leaf(&mut tree, Some(a), "a/inner", ElementBounds::new(10.0, 10.0, 20.0, 20.0));

        assert_eq!(tree.hit_test(15.0, 15.0), Some(inner));
        // b overlaps a and was inserted later
        assert_eq!(tree.hit_test(60.0, 50.0), Some(b));
        assert_eq!(tree.hit_test(180.0, 50.0), Some(root));
        assert_eq!(tree.hit_test(250.0, 50.0), None);
    }

    #[test]
    fn test_ancestors_and_keys() {
        let mut tree = LayoutTree::new();
        let root = leaf(&mut tree, None, "dd", ElementBounds::new(0.0, 0.0, 100.0, 40.0));
        let trigger = leaf(&mut tree, Some(root), "dd/trigger", ElementBounds::new(0.0, 0.0, 100.0, 40.0));
        let chip = leaf(&mut tree, Some(trigger), "dd/chip/0", ElementBounds::new(4.0, 4.0, 40.0, 32.0));

        assert_eq!(tree.ancestors(chip), vec![chip, trigger, root]);
        assert_eq!(tree.node_by_key("dd/trigger"), Some(trigger));
        assert_eq!(tree.children(root), &[trigger]);

        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.node_by_key("dd"), None);
    }
}
