//! The hierarchical settings model.
//!
//! `SettingsModel` presents application settings as a three-column tree
//! (group, key, value) behind the [`ItemModel`] interface, while mirroring
//! every setting into a flat [`SettingsStore`] for persistence. Keys are
//! slash-separated paths; intermediate segments become nested group nodes.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_appshell::model::SettingsModel;
//! use horizon_appshell::settings::{SettingsStore, SettingsValue};
//!
//! let store = Arc::new(SettingsStore::new());
//! let model = SettingsModel::new(Arc::clone(&store));
//!
//! model.set("timeout", 30, "General");
//! assert_eq!(model.value("timeout", "General", 0), SettingsValue::Int(30));
//! // The store carries the flattened key.
//! assert_eq!(store.get("General/timeout"), Some(SettingsValue::Int(30)));
//! ```

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use slotmap::{Key, KeyData};

use crate::file::FileResult;
use crate::settings::{SettingsStore, SettingsValue};

use super::index::ModelIndex;
use super::role::{ItemFlags, ItemRole};
use super::traits::{ItemModel, ModelSignals};
use super::tree::{NODE_COLUMN_COUNT, NodeId, SettingsTree, VALUE_COLUMN};

/// Group used when a key or store entry names none.
pub const DEFAULT_GROUP: &str = "General";

/// Role exposing a node's group name regardless of column.
pub const GROUP_ROLE: ItemRole = ItemRole::User(1);
/// Role exposing a node's key name regardless of column.
pub const KEY_ROLE: ItemRole = ItemRole::User(2);
/// Role exposing a node's value regardless of column.
pub const VALUE_ROLE: ItemRole = ItemRole::User(3);

/// Tree-shaped settings model backed by a flat store.
pub struct SettingsModel {
    tree: RwLock<SettingsTree>,
    store: Arc<SettingsStore>,
    sync_with_store: AtomicBool,
    signals: ModelSignals,
}

impl SettingsModel {
    /// Creates an empty model mirroring into `store`.
    ///
    /// Store synchronization starts enabled.
    pub fn new(store: Arc<SettingsStore>) -> Self {
        Self {
            tree: RwLock::new(SettingsTree::new()),
            store,
            sync_with_store: AtomicBool::new(true),
            signals: ModelSignals::new(),
        }
    }

    /// The flat store this model mirrors into.
    pub fn store(&self) -> &Arc<SettingsStore> {
        &self.store
    }

    /// Whether `set` mirrors each setting into the store.
    pub fn sync_with_store(&self) -> bool {
        self.sync_with_store.load(Ordering::SeqCst)
    }

    /// Enables or disables store mirroring.
    ///
    /// With mirroring off, the store only catches up when
    /// [`SettingsModel::save`] flushes the tree's leaves.
    pub fn set_sync_with_store(&self, sync: bool) {
        self.sync_with_store.store(sync, Ordering::SeqCst);
    }

    /// The role names a declarative UI layer binds against.
    pub fn role_names() -> [(ItemRole, &'static str); 4] {
        [
            (ItemRole::Display, "Display"),
            (GROUP_ROLE, "Group"),
            (KEY_ROLE, "Key"),
            (VALUE_ROLE, "Value"),
        ]
    }

    /// Every key currently held by the backing store, in order.
    pub fn keys(&self) -> Vec<String> {
        self.store.all_keys()
    }

    /// Reads the setting at `key` under `group`, or `default` when absent.
    ///
    /// `group` falls back to [`DEFAULT_GROUP`] when empty. The group (and any
    /// intermediate path segments of `key`) resolve by subtree search, the
    /// terminal segment by key search within the resolved subtree.
    pub fn value(
        &self,
        key: &str,
        group: &str,
        default: impl Into<SettingsValue>,
    ) -> SettingsValue {
        let default = default.into();
        let group = effective_group(group);
        let segments = path_segments(key);
        let Some((leaf_key, groups)) = segments.split_last() else {
            return default;
        };

        let tree = self.tree.read();
        let mut current = match tree.find_by_group(tree.root(), group) {
            Some(id) => id,
            None => return default,
        };
        for subgroup in groups {
            current = match tree.find_by_group(current, subgroup) {
                Some(id) => id,
                None => return default,
            };
        }
        match tree.find_by_key(current, leaf_key) {
            Some(id) => tree
                .node(id)
                .map_or(default, |node| node.value().clone()),
            None => default,
        }
    }

    /// Writes the setting at `key` under `group`, creating any missing
    /// group nodes along the way.
    ///
    /// `key` is split on `'/'`; empty segments are skipped, and a key that
    /// is empty after filtering is rejected. Each segment resolves by
    /// subtree search from the current node, so a path can land in an
    /// existing deeper subgroup instead of creating a sibling. When store
    /// synchronization is on, the flattened `group/key` entry is written
    /// unconditionally.
    pub fn set(&self, key: &str, value: impl Into<SettingsValue>, group: &str) {
        let value = value.into();
        let group = effective_group(group);
        let segments = path_segments(key);
        let Some((leaf_key, groups)) = segments.split_last() else {
            tracing::warn!(target: "appshell::model", key, "rejected setting with empty key path");
            return;
        };

        let found = {
            let tree = self.tree.read();
            tree.find_by_group(tree.root(), group)
        };
        let mut current = match found {
            Some(id) => id,
            None => {
                let root = self.tree.read().root();
                match self.create_child(root, group, "", SettingsValue::None) {
                    Some(id) => id,
                    None => return,
                }
            }
        };

        for subgroup in groups {
            let found = self.tree.read().find_by_group(current, subgroup);
            current = match found {
                Some(id) => id,
                None => match self.create_child(current, *subgroup, "", SettingsValue::None) {
                    Some(id) => id,
                    None => return,
                },
            };
        }

        let existing = self.tree.read().find_by_key(current, leaf_key);
        match existing {
            Some(leaf) => {
                let changed = self.tree.write().set_value(leaf, value.clone());
                if changed {
                    let index = {
                        let tree = self.tree.read();
                        self.index_for(&tree, leaf, VALUE_COLUMN)
                    };
                    self.signals.emit_data_changed(
                        &index,
                        vec![ItemRole::Display, ItemRole::Edit, VALUE_ROLE],
                    );
                }
            }
            None => {
                self.create_child(current, "", *leaf_key, value.clone());
            }
        }

        if self.sync_with_store() {
            self.store
                .set(format!("{}/{}", group, segments.join("/")), value);
        }
    }

    /// Replaces the model contents with the settings file at `path`.
    ///
    /// The tree is reset, the store reloads the file, and every store entry
    /// is replayed through [`SettingsModel::set`] with its first path
    /// segment as the group. Entries without a separator land in
    /// [`DEFAULT_GROUP`] and their store keys are rewritten to the
    /// flattened spelling, so `keys()` matches the tree exactly after a
    /// load. A missing file yields an empty model.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load(&self, path: impl AsRef<Path>) -> FileResult<()> {
        self.signals.emit_reset(|| self.tree.write().clear());
        self.store.load(path)?;

        for key in self.store.all_keys() {
            let Some(value) = self.store.get(&key) else {
                continue;
            };
            let (group, remainder) = match key.split_once('/') {
                Some((group, rest)) if !rest.is_empty() => (group, rest),
                _ => (DEFAULT_GROUP, key.as_str()),
            };
            self.set(remainder, value, group);

            // `set` mirrors under the canonical flattened spelling. A store
            // entry spelled differently (groupless, or with empty segments)
            // would otherwise survive alongside the mirror as a phantom key
            // with no tree leaf, and persist on the next save.
            if self.sync_with_store() {
                let segments = path_segments(remainder);
                if !segments.is_empty() {
                    let canonical =
                        format!("{}/{}", effective_group(group), segments.join("/"));
                    if canonical != key {
                        self.store.remove(&key);
                    }
                }
            }
        }
        Ok(())
    }

    /// Persists the settings to the file at `path`.
    ///
    /// When store synchronization is off, every leaf of the tree is first
    /// flushed into the store under its full group path (minus the root
    /// segment). The store then writes the file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> FileResult<()> {
        if !self.sync_with_store() {
            let tree = self.tree.read();
            for leaf in tree.leaves() {
                let Some(node) = tree.node(leaf) else {
                    continue;
                };
                if node.key().is_empty() {
                    // Childless group node, not a setting.
                    continue;
                }
                let mut groups = tree.group_path(leaf);
                if groups.first().is_some_and(|g| g == "Root") {
                    groups.remove(0);
                }
                let store_key = if groups.is_empty() {
                    format!("{DEFAULT_GROUP}/{}", node.key())
                } else {
                    format!("{}/{}", groups.join("/"), node.key())
                };
                self.store.set(store_key, node.value().clone());
            }
        }
        self.store.save(path)
    }

    /// Appends a child node, bracketed by the rows-inserted signal pair.
    fn create_child(
        &self,
        parent: NodeId,
        group: &str,
        key: &str,
        value: SettingsValue,
    ) -> Option<NodeId> {
        let (parent_index, row) = {
            let tree = self.tree.read();
            if !tree.contains(parent) {
                return None;
            }
            (self.index_for(&tree, parent, 0), tree.child_count(parent))
        };
        self.signals.emit_rows_inserted(parent_index, row, row, || {
            self.tree.write().append_child(parent, group, key, value)
        })
    }

    /// Builds the canonical index (with parent chain) for a node.
    ///
    /// The chain is assembled iteratively, root first, so arbitrarily deep
    /// trees cannot exhaust the call stack.
    fn index_for(&self, tree: &SettingsTree, id: NodeId, column: usize) -> ModelIndex {
        if id == tree.root() || !tree.contains(id) {
            return ModelIndex::invalid();
        }
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            if node_id == tree.root() {
                break;
            }
            chain.push(node_id);
            current = tree.parent_of(node_id);
        }

        let mut index: Option<ModelIndex> = None;
        for (pos, node_id) in chain.iter().rev().enumerate() {
            let col = if pos + 1 == chain.len() { column } else { 0 };
            index = Some(ModelIndex::new(
                tree.row_of(*node_id),
                col,
                index,
                node_id.data().as_ffi(),
            ));
        }
        index.unwrap_or_default()
    }

    /// Resolves an index back to its node; the invalid index is the root.
    fn node_for(&self, tree: &SettingsTree, index: &ModelIndex) -> Option<NodeId> {
        if !index.is_valid() {
            return Some(tree.root());
        }
        let id = NodeId::from(KeyData::from_ffi(index.internal_id()));
        tree.contains(id).then_some(id)
    }
}

impl ItemModel for SettingsModel {
    fn row_count(&self, parent: &ModelIndex) -> usize {
        let tree = self.tree.read();
        self.node_for(&tree, parent)
            .map_or(0, |id| tree.child_count(id))
    }

    fn column_count(&self, _parent: &ModelIndex) -> usize {
        NODE_COLUMN_COUNT
    }

    fn data(&self, index: &ModelIndex, role: ItemRole) -> SettingsValue {
        if !index.is_valid() {
            return SettingsValue::None;
        }
        let tree = self.tree.read();
        let Some(node) = self.node_for(&tree, index).and_then(|id| tree.node(id)) else {
            return SettingsValue::None;
        };
        match role {
            ItemRole::Display | ItemRole::Edit => node.cell(index.column()),
            GROUP_ROLE => SettingsValue::String(node.group().to_string()),
            KEY_ROLE => SettingsValue::String(node.key().to_string()),
            VALUE_ROLE => node.value().clone(),
            _ => SettingsValue::None,
        }
    }

    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex {
        if column >= NODE_COLUMN_COUNT {
            return ModelIndex::invalid();
        }
        let tree = self.tree.read();
        let Some(parent_id) = self.node_for(&tree, parent) else {
            return ModelIndex::invalid();
        };
        match tree.child(parent_id, row) {
            Some(child) => self.index_for(&tree, child, column),
            None => ModelIndex::invalid(),
        }
    }

    fn parent(&self, index: &ModelIndex) -> ModelIndex {
        if !index.is_valid() {
            return ModelIndex::invalid();
        }
        let tree = self.tree.read();
        let Some(id) = self.node_for(&tree, index) else {
            return ModelIndex::invalid();
        };
        match tree.parent_of(id) {
            Some(parent) if parent != tree.root() => self.index_for(&tree, parent, 0),
            _ => ModelIndex::invalid(),
        }
    }

    fn set_data(&self, index: &ModelIndex, value: SettingsValue, role: ItemRole) -> bool {
        if !index.is_valid() || role != ItemRole::Edit || index.column() != VALUE_COLUMN {
            return false;
        }
        let changed = {
            let mut tree = self.tree.write();
            match self.node_for(&tree, index) {
                Some(id) if id != tree.root() => tree.set_value(id, value),
                _ => false,
            }
        };
        if changed {
            self.signals.emit_data_changed(
                index,
                vec![ItemRole::Display, ItemRole::Edit, VALUE_ROLE],
            );
        }
        changed
    }

    fn flags(&self, index: &ModelIndex) -> ItemFlags {
        if !index.is_valid() {
            return ItemFlags::none();
        }
        if index.column() == VALUE_COLUMN {
            ItemFlags::standard().with_editable()
        } else {
            ItemFlags::standard()
        }
    }

    fn signals(&self) -> &ModelSignals {
        &self.signals
    }
}

impl std::fmt::Debug for SettingsModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsModel")
            .field("nodes", &self.tree.read().len())
            .field("sync_with_store", &self.sync_with_store())
            .finish()
    }
}

fn effective_group(group: &str) -> &str {
    if group.is_empty() { DEFAULT_GROUP } else { group }
}

fn path_segments(key: &str) -> Vec<&str> {
    key.split('/').filter(|s| !s.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> SettingsModel {
        SettingsModel::new(Arc::new(SettingsStore::new()))
    }

    #[test]
    fn test_set_then_value_round_trip() {
        let model = model();
        model.set("timeout", 30, "General");
        assert_eq!(model.value("timeout", "General", 0), SettingsValue::Int(30));
        assert_eq!(
            model.value("missing", "General", "fallback"),
            SettingsValue::String("fallback".to_string())
        );
    }

    #[test]
    fn test_set_is_idempotent_on_structure() {
        let model = model();
        model.set("timeout", 30, "General");
        model.set("timeout", 45, "General");

        let root = ModelIndex::invalid();
        assert_eq!(model.row_count(&root), 1);
        let general = model.index(0, 0, &root);
        assert_eq!(model.row_count(&general), 1);
        assert_eq!(model.value("timeout", "General", 0), SettingsValue::Int(45));
    }

    #[test]
    fn test_nested_key_creates_group_chain() {
        let model = model();
        model.set("colors/accent", "blue", "Appearance");

        let root = ModelIndex::invalid();
        let appearance = model.index(0, 0, &root);
        assert_eq!(
            model.data(&appearance, GROUP_ROLE),
            SettingsValue::String("Appearance".to_string())
        );
        let colors = model.index(0, 0, &appearance);
        assert_eq!(
            model.data(&colors, GROUP_ROLE),
            SettingsValue::String("colors".to_string())
        );
        let leaf = model.index(0, 2, &colors);
        assert_eq!(
            model.data(&leaf, KEY_ROLE),
            SettingsValue::String("accent".to_string())
        );
        assert_eq!(
            model.data(&leaf, VALUE_ROLE),
            SettingsValue::String("blue".to_string())
        );
        assert_eq!(model.parent(&colors), appearance);
    }

    #[test]
    fn test_groups_isolate_keys() {
        let model = model();
        model.set("size", 10, "Window");
        model.set("size", 20, "Font");
        assert_eq!(model.value("size", "Window", 0), SettingsValue::Int(10));
        assert_eq!(model.value("size", "Font", 0), SettingsValue::Int(20));
    }

    #[test]
    fn test_sync_mirrors_into_store() {
        let model = model();
        model.set("colors/accent", "blue", "Appearance");
        assert_eq!(
            model.store().get("Appearance/colors/accent"),
            Some(SettingsValue::String("blue".to_string()))
        );
        assert_eq!(model.keys(), vec!["Appearance/colors/accent"]);
    }

    #[test]
    fn test_sync_disabled_leaves_store_untouched() {
        let model = model();
        model.set_sync_with_store(false);
        model.set("timeout", 30, "General");
        assert!(model.store().is_empty());
        assert_eq!(model.value("timeout", "General", 0), SettingsValue::Int(30));
    }

    #[test]
    fn test_empty_group_falls_back_to_general() {
        let model = model();
        model.set("timeout", 30, "");
        assert_eq!(model.value("timeout", "General", 0), SettingsValue::Int(30));
        assert_eq!(
            model.store().get("General/timeout"),
            Some(SettingsValue::Int(30))
        );
    }

    #[test]
    fn test_empty_key_is_rejected() {
        let model = model();
        model.set("", 1, "General");
        model.set("//", 2, "General");
        assert_eq!(model.row_count(&ModelIndex::invalid()), 0);
        assert!(model.store().is_empty());
    }

    #[test]
    fn test_empty_segments_are_skipped() {
        let model = model();
        model.set("colors//accent", "blue", "Appearance");
        assert_eq!(
            model.store().get("Appearance/colors/accent"),
            Some(SettingsValue::String("blue".to_string()))
        );
        assert_eq!(
            model.value("colors/accent", "Appearance", 0),
            SettingsValue::String("blue".to_string())
        );
    }

    #[test]
    fn test_path_resolves_into_existing_subtree() {
        let model = model();
        model.set("colors/accent", "blue", "Appearance");
        // "colors" is found by subtree search from the root group walk, so
        // this lands in the existing chain instead of creating a sibling.
        model.set("colors/background", "gray", "Appearance");

        let root = ModelIndex::invalid();
        assert_eq!(model.row_count(&root), 1);
        let appearance = model.index(0, 0, &root);
        assert_eq!(model.row_count(&appearance), 1);
        let colors = model.index(0, 0, &appearance);
        assert_eq!(model.row_count(&colors), 2);
    }

    #[test]
    fn test_rows_inserted_fires_per_created_node() {
        use std::sync::{Arc as StdArc, Mutex};

        let model = model();
        let count = StdArc::new(Mutex::new(0usize));
        let c = StdArc::clone(&count);
        model
            .signals()
            .rows_inserted
            .connect(move |_| *c.lock().unwrap() += 1);

        // Creates group, subgroup, and leaf: three insertions.
        model.set("colors/accent", "blue", "Appearance");
        assert_eq!(*count.lock().unwrap(), 3);

        // Updating the value inserts nothing further.
        model.set("colors/accent", "red", "Appearance");
        assert_eq!(*count.lock().unwrap(), 3);
    }

    #[test]
    fn test_data_changed_on_update() {
        use std::sync::{Arc as StdArc, Mutex};

        let model = model();
        model.set("timeout", 30, "General");

        let seen = StdArc::new(Mutex::new(Vec::new()));
        let s = StdArc::clone(&seen);
        model
            .signals()
            .data_changed
            .connect(move |(top_left, _, roles)| {
                s.lock().unwrap().push((top_left.column(), roles.clone()));
            });

        model.set("timeout", 45, "General");
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, VALUE_COLUMN);
        assert!(seen[0].1.contains(&VALUE_ROLE));
    }

    #[test]
    fn test_set_data_only_on_value_column() {
        let model = model();
        model.set("timeout", 30, "General");

        let root = ModelIndex::invalid();
        let general = model.index(0, 0, &root);
        let key_cell = model.index(0, 1, &general);
        let value_cell = model.index(0, 2, &general);

        assert!(!model.set_data(&key_cell, SettingsValue::from("renamed"), ItemRole::Edit));
        assert!(!model.set_data(&value_cell, SettingsValue::Int(9), ItemRole::Display));
        assert!(model.set_data(&value_cell, SettingsValue::Int(9), ItemRole::Edit));
        assert_eq!(model.data(&value_cell, VALUE_ROLE), SettingsValue::Int(9));
    }

    #[test]
    fn test_flags_editable_on_value_column() {
        let model = model();
        model.set("timeout", 30, "General");
        let general = model.index(0, 0, &ModelIndex::invalid());
        assert!(!model.flags(&general).is_editable());
        assert!(model.flags(&model.index(0, 2, &general)).is_editable());
        assert!(!model.flags(&ModelIndex::invalid()).is_enabled());
    }

    #[test]
    fn test_out_of_range_requests_degrade() {
        let model = model();
        model.set("timeout", 30, "General");
        let root = ModelIndex::invalid();

        assert!(!model.index(5, 0, &root).is_valid());
        assert!(!model.index(0, 3, &root).is_valid());
        assert_eq!(model.data(&root, ItemRole::Display), SettingsValue::None);
        assert_eq!(model.row_count(&model.index(9, 0, &root)), 0);
    }

    #[test]
    fn test_load_canonicalizes_groupless_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ini");
        std::fs::write(&path, "bare=7\n").unwrap();

        let model = model();
        model.load(&path).unwrap();

        // The groupless entry is replayed into General and its original
        // store spelling dropped, so no phantom key survives the load.
        assert_eq!(model.keys(), vec!["General/bare"]);
        assert_eq!(model.value("bare", "General", 0), SettingsValue::Int(7));
    }

    #[test]
    fn test_deep_key_path_round_trip() {
        let model = model();
        let key = (0..2000)
            .map(|i| format!("g{i}"))
            .collect::<Vec<_>>()
            .join("/");
        model.set(&key, 1, "Deep");
        assert_eq!(model.value(&key, "Deep", 0), SettingsValue::Int(1));
    }

    #[test]
    fn test_stale_index_after_reset_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let model = model();
        model.set("timeout", 30, "General");
        let general = model.index(0, 0, &ModelIndex::invalid());

        model.load(dir.path().join("absent.ini")).unwrap();
        assert_eq!(model.data(&general, GROUP_ROLE), SettingsValue::None);
        assert_eq!(model.row_count(&general), 0);
    }
}
