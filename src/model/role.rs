//! Data roles and item flags.

/// Specifies which facet of an item a data request targets.
///
/// The `User` range (256 and up) is reserved for model-specific roles;
/// [`crate::model::SettingsModel`] defines its group/key/value roles there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemRole {
    /// The primary display text of a cell.
    Display,
    /// The value in a form suitable for editing.
    Edit,
    /// A model-specific role.
    User(u32),
}

impl ItemRole {
    /// First numeric value of the user role range.
    pub const USER_BASE: u32 = 256;

    /// The numeric value of this role.
    pub fn value(&self) -> u32 {
        match self {
            ItemRole::Display => 0,
            ItemRole::Edit => 2,
            ItemRole::User(n) => Self::USER_BASE + n,
        }
    }

    /// Builds a role from its numeric value.
    pub fn from_value(value: u32) -> Option<ItemRole> {
        match value {
            0 => Some(ItemRole::Display),
            2 => Some(ItemRole::Edit),
            n if n >= Self::USER_BASE => Some(ItemRole::User(n - Self::USER_BASE)),
            _ => None,
        }
    }
}

/// Behavioral flags for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemFlags {
    enabled: bool,
    selectable: bool,
    editable: bool,
}

impl ItemFlags {
    /// No capabilities.
    pub fn none() -> Self {
        Self::default()
    }

    /// Enabled and selectable, the default for live items.
    pub fn standard() -> Self {
        Self {
            enabled: true,
            selectable: true,
            editable: false,
        }
    }

    /// Adds the editable capability.
    pub fn with_editable(mut self) -> Self {
        self.editable = true;
        self
    }

    /// Whether the item responds to interaction.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the item can be selected.
    pub fn is_selectable(&self) -> bool {
        self.selectable
    }

    /// Whether the item accepts edits.
    pub fn is_editable(&self) -> bool {
        self.editable
    }
}
