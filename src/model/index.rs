//! Model index type for addressing items in a model.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifies the position of an item in a model.
///
/// A `ModelIndex` is a lightweight value: row, column, an optional parent
/// index (boxed, so indexes into deep trees stay cheap to pass around), and
/// an opaque `internal_id` the owning model uses to find the underlying
/// item again. The invalid index stands for the root of a hierarchy.
///
/// Parent chains are cloned and dropped iteratively, so indexes into
/// arbitrarily deep hierarchies are safe to copy and discard.
pub struct ModelIndex {
    row: usize,
    column: usize,
    parent: Option<Box<ModelIndex>>,
    internal_id: u64,
    valid: bool,
}

impl ModelIndex {
    /// Creates the invalid index, which refers to the model root.
    pub fn invalid() -> Self {
        Self {
            row: 0,
            column: 0,
            parent: None,
            internal_id: 0,
            valid: false,
        }
    }

    /// Creates a valid index.
    ///
    /// Only models create indexes; views obtain them through
    /// [`crate::model::ItemModel::index`].
    pub fn new(row: usize, column: usize, parent: Option<ModelIndex>, internal_id: u64) -> Self {
        Self {
            row,
            column,
            parent: parent.map(Box::new),
            internal_id,
            valid: true,
        }
    }

    /// Whether this index refers to an actual item.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The row of the item within its parent.
    pub fn row(&self) -> usize {
        self.row
    }

    /// The column of the item.
    pub fn column(&self) -> usize {
        self.column
    }

    /// The parent index, or the invalid index for top-level items.
    pub fn parent(&self) -> ModelIndex {
        match &self.parent {
            Some(parent) => (**parent).clone(),
            None => ModelIndex::invalid(),
        }
    }

    /// Whether this index has a valid parent.
    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    /// The model-private identifier attached to this index.
    pub fn internal_id(&self) -> u64 {
        self.internal_id
    }

    /// Number of ancestors above this index.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent.as_deref();
        while let Some(parent) = current {
            depth += 1;
            current = parent.parent.as_deref();
        }
        depth
    }
}

impl Clone for ModelIndex {
    fn clone(&self) -> Self {
        let mut chain: Vec<&ModelIndex> = Vec::new();
        let mut current = Some(self);
        while let Some(index) = current {
            chain.push(index);
            current = index.parent.as_deref();
        }

        // Rebuild root first so no step recurses.
        let mut cloned: Option<Box<ModelIndex>> = None;
        for index in chain.into_iter().rev() {
            cloned = Some(Box::new(ModelIndex {
                row: index.row,
                column: index.column,
                parent: cloned.take(),
                internal_id: index.internal_id,
                valid: index.valid,
            }));
        }
        match cloned {
            Some(boxed) => *boxed,
            // The chain always contains `self`.
            None => ModelIndex::invalid(),
        }
    }
}

impl Drop for ModelIndex {
    fn drop(&mut self) {
        // Unlink the chain front-to-back; each box is freed with its parent
        // already detached, so teardown never recurses.
        let mut parent = self.parent.take();
        while let Some(mut boxed) = parent {
            parent = boxed.parent.take();
        }
    }
}

impl Default for ModelIndex {
    fn default() -> Self {
        Self::invalid()
    }
}

impl PartialEq for ModelIndex {
    fn eq(&self, other: &Self) -> bool {
        if !self.valid && !other.valid {
            return true;
        }
        self.valid == other.valid
            && self.row == other.row
            && self.column == other.column
            && self.internal_id == other.internal_id
    }
}

impl Eq for ModelIndex {}

impl Hash for ModelIndex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.valid.hash(state);
        if self.valid {
            self.row.hash(state);
            self.column.hash(state);
            self.internal_id.hash(state);
        }
    }
}

impl fmt::Debug for ModelIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.valid {
            return write!(f, "ModelIndex(invalid)");
        }
        write!(
            f,
            "ModelIndex(row={}, col={}, id={})",
            self.row, self.column, self.internal_id
        )
    }
}
