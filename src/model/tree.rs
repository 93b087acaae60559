//! The settings tree: an arena of group/key/value nodes.

use slotmap::{SlotMap, new_key_type};

use crate::settings::SettingsValue;

new_key_type! {
    /// Generational handle to a node in a [`SettingsTree`].
    pub struct NodeId;
}

/// Number of columns a settings node spans: group, key, value.
pub const NODE_COLUMN_COUNT: usize = 3;

/// Column holding the group name.
pub const GROUP_COLUMN: usize = 0;
/// Column holding the key name.
pub const KEY_COLUMN: usize = 1;
/// Column holding the value.
pub const VALUE_COLUMN: usize = 2;

/// One node of the settings hierarchy.
///
/// Group nodes carry a `group` name and an empty `key`; leaf nodes carry a
/// `key` (and usually an empty `group`). The payload owns no locks and no
/// parent pointers; structure lives in the arena.
#[derive(Debug, Clone)]
pub struct SettingsNode {
    group: String,
    key: String,
    value: SettingsValue,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SettingsNode {
    /// The group name of this node.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// The key name of this node.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The value stored on this node.
    pub fn value(&self) -> &SettingsValue {
        &self.value
    }

    /// Number of direct children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Reads the node as a row of cells.
    pub fn cell(&self, column: usize) -> SettingsValue {
        match column {
            GROUP_COLUMN => SettingsValue::String(self.group.clone()),
            KEY_COLUMN => SettingsValue::String(self.key.clone()),
            VALUE_COLUMN => self.value.clone(),
            _ => SettingsValue::None,
        }
    }
}

/// Arena-backed tree of [`SettingsNode`]s with a fixed root.
///
/// The root is created as `("Root", "")` and survives every clear. Handles
/// are generational: a handle to a removed node misses in the arena and all
/// accessors degrade to their empty results.
#[derive(Debug)]
pub struct SettingsTree {
    nodes: SlotMap<NodeId, SettingsNode>,
    root: NodeId,
}

impl Default for SettingsTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsTree {
    /// Creates a tree holding only the root node.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(SettingsNode {
            group: "Root".to_string(),
            key: String::new(),
            value: SettingsValue::None,
            parent: None,
            children: Vec::new(),
        });
        Self { nodes, root }
    }

    /// The root handle.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Borrows a node, if the handle is live.
    pub fn node(&self, id: NodeId) -> Option<&SettingsNode> {
        self.nodes.get(id)
    }

    /// Whether the handle refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Total number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds only the root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Appends a child under `parent` and returns its handle.
    ///
    /// Returns `None` when `parent` is stale.
    pub fn append_child(
        &mut self,
        parent: NodeId,
        group: impl Into<String>,
        key: impl Into<String>,
        value: SettingsValue,
    ) -> Option<NodeId> {
        if !self.nodes.contains_key(parent) {
            return None;
        }
        let child = self.nodes.insert(SettingsNode {
            group: group.into(),
            key: key.into(),
            value,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(child);
        Some(child)
    }

    /// The child of `id` at `row`, in insertion order.
    pub fn child(&self, id: NodeId, row: usize) -> Option<NodeId> {
        self.nodes.get(id)?.children.get(row).copied()
    }

    /// Number of children under `id`; zero for stale handles.
    pub fn child_count(&self, id: NodeId) -> usize {
        self.nodes.get(id).map_or(0, |n| n.children.len())
    }

    /// The parent of `id`, `None` for the root or stale handles.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id)?.parent
    }

    /// The row of `id` within its parent's children; zero for the root.
    pub fn row_of(&self, id: NodeId) -> usize {
        let Some(parent) = self.parent_of(id) else {
            return 0;
        };
        self.nodes[parent]
            .children
            .iter()
            .position(|c| *c == id)
            .unwrap_or(0)
    }

    /// Replaces the value on `id`. Returns `false` for stale handles.
    pub fn set_value(&mut self, id: NodeId, value: SettingsValue) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.value = value;
                true
            }
            None => false,
        }
    }

    /// Finds the first node whose group equals `name`, searching the subtree
    /// rooted at `start` in pre-order: `start` itself first, then each child
    /// subtree in insertion order.
    ///
    /// The search deliberately spans the whole subtree, not just direct
    /// children, so a group chain can resolve into an existing deeper
    /// subgroup.
    pub fn find_by_group(&self, start: NodeId, name: &str) -> Option<NodeId> {
        self.find_preorder(start, |node| node.group == name)
    }

    /// Finds the first node whose key equals `name`, same traversal as
    /// [`SettingsTree::find_by_group`].
    pub fn find_by_key(&self, start: NodeId, name: &str) -> Option<NodeId> {
        self.find_preorder(start, |node| node.key == name)
    }

    fn find_preorder(&self, start: NodeId, pred: impl Fn(&SettingsNode) -> bool) -> Option<NodeId> {
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let node = self.nodes.get(id)?;
            if pred(node) {
                return Some(id);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    /// The group names from the root down to `id`, empty groups skipped.
    ///
    /// The root's `"Root"` segment comes first; callers composing store keys
    /// strip it.
    pub fn group_path(&self, id: NodeId) -> Vec<String> {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.nodes.get(node_id) else {
                break;
            };
            if !node.group.is_empty() {
                segments.push(node.group.clone());
            }
            current = node.parent;
        }
        segments.reverse();
        segments
    }

    /// Every childless node except the root, in document order.
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[self.root]
            .children
            .iter()
            .rev()
            .copied()
            .collect();
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if node.children.is_empty() {
                leaves.push(id);
            } else {
                stack.extend(node.children.iter().rev());
            }
        }
        leaves
    }

    /// Removes the subtree rooted at `id` and detaches it from its parent.
    ///
    /// Removing the root is rejected. Teardown is a work stack, not
    /// recursion, so arbitrarily deep trees cannot exhaust the call stack.
    pub fn remove_subtree(&mut self, id: NodeId) -> bool {
        if id == self.root || !self.nodes.contains_key(id) {
            return false;
        }
        if let Some(parent) = self.nodes[id].parent {
            self.nodes[parent].children.retain(|c| *c != id);
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
            }
        }
        true
    }

    /// Removes every node except the root.
    pub fn clear(&mut self) {
        let children = std::mem::take(&mut self.nodes[self.root].children);
        let mut stack = children;
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> (SettingsTree, NodeId, NodeId, NodeId) {
        // Root
        //   General
        //     timeout = 30
        //   Appearance
        //     colors
        //       accent = "blue"
        let mut tree = SettingsTree::new();
        let general = tree
            .append_child(tree.root(), "General", "", SettingsValue::None)
            .unwrap();
        tree.append_child(general, "", "timeout", SettingsValue::Int(30))
            .unwrap();
        let appearance = tree
            .append_child(tree.root(), "Appearance", "", SettingsValue::None)
            .unwrap();
        let colors = tree
            .append_child(appearance, "colors", "", SettingsValue::None)
            .unwrap();
        tree.append_child(colors, "", "accent", SettingsValue::from("blue"))
            .unwrap();
        (tree, general, appearance, colors)
    }

    #[test]
    fn test_root_survives_clear() {
        let (mut tree, ..) = sample_tree();
        assert_eq!(tree.len(), 6);
        tree.clear();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.node(tree.root()).unwrap().group(), "Root");
    }

    #[test]
    fn test_child_navigation() {
        let (tree, general, appearance, _) = sample_tree();
        assert_eq!(tree.child_count(tree.root()), 2);
        assert_eq!(tree.child(tree.root(), 0), Some(general));
        assert_eq!(tree.child(tree.root(), 1), Some(appearance));
        assert_eq!(tree.row_of(appearance), 1);
        assert_eq!(tree.parent_of(general), Some(tree.root()));
        assert_eq!(tree.parent_of(tree.root()), None);
    }

    #[test]
    fn test_find_by_group_spans_subtree() {
        let (tree, _, appearance, colors) = sample_tree();
        // From the root: matches a nested subgroup, not only direct children.
        assert_eq!(tree.find_by_group(tree.root(), "colors"), Some(colors));
        // From a subtree root: the start node itself matches first.
        assert_eq!(tree.find_by_group(appearance, "Appearance"), Some(appearance));
        assert_eq!(tree.find_by_group(tree.root(), "absent"), None);
    }

    #[test]
    fn test_find_by_key_preorder_first_match() {
        let mut tree = SettingsTree::new();
        let a = tree
            .append_child(tree.root(), "A", "", SettingsValue::None)
            .unwrap();
        let first = tree
            .append_child(a, "", "dup", SettingsValue::Int(1))
            .unwrap();
        let b = tree
            .append_child(tree.root(), "B", "", SettingsValue::None)
            .unwrap();
        tree.append_child(b, "", "dup", SettingsValue::Int(2))
            .unwrap();

        assert_eq!(tree.find_by_key(tree.root(), "dup"), Some(first));
    }

    #[test]
    fn test_group_path_skips_empty_groups() {
        let (tree, ..) = sample_tree();
        let accent = tree.find_by_key(tree.root(), "accent").unwrap();
        assert_eq!(tree.group_path(accent), vec!["Root", "Appearance", "colors"]);
    }

    #[test]
    fn test_leaves_in_document_order() {
        let (tree, ..) = sample_tree();
        let keys: Vec<String> = tree
            .leaves()
            .iter()
            .map(|id| tree.node(*id).unwrap().key().to_string())
            .collect();
        assert_eq!(keys, vec!["timeout", "accent"]);
    }

    #[test]
    fn test_remove_subtree_detaches_and_frees() {
        let (mut tree, _, appearance, colors) = sample_tree();
        assert!(tree.remove_subtree(appearance));
        assert!(!tree.contains(appearance));
        assert!(!tree.contains(colors));
        assert_eq!(tree.child_count(tree.root()), 1);
        assert!(!tree.remove_subtree(tree.root()));
    }

    #[test]
    fn test_stale_handle_degrades() {
        let (mut tree, general, ..) = sample_tree();
        tree.remove_subtree(general);
        assert_eq!(tree.child_count(general), 0);
        assert_eq!(tree.child(general, 0), None);
        assert!(!tree.set_value(general, SettingsValue::Int(1)));
    }

    #[test]
    fn test_deep_tree_teardown() {
        let mut tree = SettingsTree::new();
        let mut current = tree.root();
        for depth in 0..50_000 {
            current = tree
                .append_child(current, format!("g{depth}"), "", SettingsValue::None)
                .unwrap();
        }
        tree.clear();
        assert_eq!(tree.len(), 1);
    }
}
