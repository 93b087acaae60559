//! Model/View foundation and the settings model built on it.
//!
//! # Core Types
//!
//! - `ModelIndex`: Identifies an item's position in a model
//! - `ItemRole`: Specifies what facet of an item to access
//! - `ItemModel`: The trait that models implement
//! - `ModelSignals`: Signals for change notifications
//!
//! # Model Implementations
//!
//! - `SettingsModel`: Three-column settings hierarchy backed by a
//!   [`crate::settings::SettingsStore`]
//!
//! ```text
//! ┌───────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ SettingsModel │────>│   Signals   │────>│    View     │
//! │  (ItemModel)  │     │             │     │             │
//! └───────────────┘     └─────────────┘     └─────────────┘
//!         │
//!         v
//! ┌───────────────┐     settings tree mirrored into the flat
//! │ SettingsStore │     store for INI persistence
//! └───────────────┘
//! ```

mod index;
mod role;
mod settings_model;
mod traits;
mod tree;

pub use index::ModelIndex;
pub use role::{ItemFlags, ItemRole};
pub use settings_model::{DEFAULT_GROUP, GROUP_ROLE, KEY_ROLE, SettingsModel, VALUE_ROLE};
pub use traits::{ItemModel, ModelSignals};
pub use tree::{
    GROUP_COLUMN, KEY_COLUMN, NODE_COLUMN_COUNT, NodeId, SettingsNode, SettingsTree, VALUE_COLUMN,
};
