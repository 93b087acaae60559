//! The item model trait and its change-notification signals.

use crate::settings::SettingsValue;
use crate::signal::Signal;

use super::index::ModelIndex;
use super::role::{ItemFlags, ItemRole};

/// Signals a model emits when its structure or contents change.
///
/// Structural changes come in pairs: the `about_to` signal fires before the
/// model mutates, the completion signal after. Views that cache layout rely
/// on that ordering, so models should go through the `emit_*` helpers, which
/// wrap the mutation closure between the two.
#[derive(Default)]
pub struct ModelSignals {
    /// Rows are about to be inserted: (parent, first, last).
    pub rows_about_to_be_inserted: Signal<(ModelIndex, usize, usize)>,
    /// Rows have been inserted: (parent, first, last).
    pub rows_inserted: Signal<(ModelIndex, usize, usize)>,
    /// Data changed in the inclusive index range: (top_left, bottom_right, roles).
    pub data_changed: Signal<(ModelIndex, ModelIndex, Vec<ItemRole>)>,
    /// The whole model is about to be replaced.
    pub model_about_to_be_reset: Signal<()>,
    /// The whole model has been replaced; all held indexes are stale.
    pub model_reset: Signal<()>,
}

impl ModelSignals {
    /// Creates a fresh signal set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `mutate` bracketed by the rows-inserted signal pair.
    pub fn emit_rows_inserted<R>(
        &self,
        parent: ModelIndex,
        first: usize,
        last: usize,
        mutate: impl FnOnce() -> R,
    ) -> R {
        self.rows_about_to_be_inserted
            .emit((parent.clone(), first, last));
        let result = mutate();
        self.rows_inserted.emit((parent, first, last));
        result
    }

    /// Runs `mutate` bracketed by the model-reset signal pair.
    pub fn emit_reset<R>(&self, mutate: impl FnOnce() -> R) -> R {
        self.model_about_to_be_reset.emit(());
        let result = mutate();
        self.model_reset.emit(());
        result
    }

    /// Announces a single-cell change for the given roles.
    pub fn emit_data_changed(&self, index: &ModelIndex, roles: Vec<ItemRole>) {
        self.data_changed.emit((index.clone(), index.clone(), roles));
    }
}

/// Interface for hierarchical and tabular data models.
///
/// Views address items through [`ModelIndex`] and read facets of them
/// through [`ItemRole`]. Implementations must be total: out-of-range or
/// stale indexes yield empty results, never panics.
pub trait ItemModel {
    /// Number of child rows under `parent` (the invalid index is the root).
    fn row_count(&self, parent: &ModelIndex) -> usize;

    /// Number of columns under `parent`.
    fn column_count(&self, parent: &ModelIndex) -> usize;

    /// The data for `index` in the given `role`.
    ///
    /// Returns [`SettingsValue::None`] when the index or role does not
    /// apply.
    fn data(&self, index: &ModelIndex, role: ItemRole) -> SettingsValue;

    /// Builds the index for (`row`, `column`) under `parent`.
    ///
    /// Returns the invalid index when out of range.
    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex;

    /// The parent of `index`, or the invalid index for top-level items.
    fn parent(&self, index: &ModelIndex) -> ModelIndex;

    /// Attempts to change the data at `index`. Returns `true` on success.
    ///
    /// The default implementation rejects all edits.
    fn set_data(&self, _index: &ModelIndex, _value: SettingsValue, _role: ItemRole) -> bool {
        false
    }

    /// The behavioral flags of `index`.
    fn flags(&self, index: &ModelIndex) -> ItemFlags {
        if index.is_valid() {
            ItemFlags::standard()
        } else {
            ItemFlags::none()
        }
    }

    /// Whether `parent` has any children.
    fn has_children(&self, parent: &ModelIndex) -> bool {
        self.row_count(parent) > 0
    }

    /// The model's change-notification signals.
    fn signals(&self) -> &ModelSignals;
}
