//! Settings values and flat persistent storage.

mod store;
mod value;

pub use store::SettingsStore;
pub use value::{FromSettingsValue, SettingsValue};
