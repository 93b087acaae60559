//! Flat, INI-backed settings storage.
//!
//! The store is the persistence half of the settings system: a flat map from
//! slash-separated keys (`"General/timeout"`, `"Appearance/theme"`) to
//! [`SettingsValue`]s. The tree-shaped [`crate::model::SettingsModel`] mirrors
//! into it and replays out of it; the store itself knows nothing about the
//! tree.
//!
//! On disk the first path segment becomes the INI section and the remainder
//! the entry key, so `"Appearance/colors/accent"` is written as the entry
//! `colors/accent` inside `[Appearance]`.

use std::collections::BTreeMap;
use std::path::Path;

use ini::Ini;
use parking_lot::RwLock;

use crate::file::{FileError, FileResult, atomic_write, read_text};
use crate::signal::Signal;

use super::value::{FromSettingsValue, SettingsValue};

/// Flat key/value settings storage with change notification.
///
/// Keys are ordered lexicographically, which fixes the iteration order of
/// [`SettingsStore::all_keys`] and of saved files.
pub struct SettingsStore {
    values: RwLock<BTreeMap<String, SettingsValue>>,
    changed: Signal<String>,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            values: RwLock::new(BTreeMap::new()),
            changed: Signal::new(),
        }
    }

    /// Signal emitted with the key after every `set` or `remove`.
    pub fn changed(&self) -> &Signal<String> {
        &self.changed
    }

    /// Returns the value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<SettingsValue> {
        self.values.read().get(key).cloned()
    }

    /// Returns the value for `key`, or `default` when absent.
    pub fn get_or(&self, key: &str, default: impl Into<SettingsValue>) -> SettingsValue {
        self.get(key).unwrap_or_else(|| default.into())
    }

    /// Returns the value for `key` extracted as `T`.
    ///
    /// `None` when the key is absent or holds a different variant.
    pub fn get_as<T: FromSettingsValue>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|v| T::from_settings_value(&v))
    }

    /// Stores `value` under `key` and emits the changed signal.
    pub fn set(&self, key: impl Into<String>, value: impl Into<SettingsValue>) {
        let key = key.into();
        self.values.write().insert(key.clone(), value.into());
        self.changed.emit(key);
    }

    /// Removes `key`. Returns the previous value, if any.
    pub fn remove(&self, key: &str) -> Option<SettingsValue> {
        let removed = self.values.write().remove(key);
        if removed.is_some() {
            self.changed.emit(key.to_string());
        }
        removed
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.values.read().contains_key(key)
    }

    /// Every key, in lexicographic order.
    pub fn all_keys(&self) -> Vec<String> {
        self.values.read().keys().cloned().collect()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }

    /// Drops every key without emitting change signals.
    pub fn clear(&self) {
        self.values.write().clear();
    }

    /// Replaces the store contents with the INI file at `path`.
    ///
    /// Section and entry key compose the flat key as `section/entry`;
    /// entries outside any section keep their bare key. A missing file
    /// loads an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load(&self, path: impl AsRef<Path>) -> FileResult<()> {
        let path = path.as_ref();
        self.clear();

        let text = match read_text(path) {
            Ok(text) => text,
            Err(e) if e.is_not_found() => {
                tracing::debug!(target: "appshell::settings", path = %path.display(), "no settings file, store left empty");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let ini = Ini::load_from_str(&text)
            .map_err(|e| FileError::invalid_data(path, &e.to_string()))?;

        let mut values = self.values.write();
        for (section, properties) in ini.iter() {
            for (entry, raw) in properties.iter() {
                let key = match section {
                    Some(section) => format!("{section}/{entry}"),
                    None => entry.to_string(),
                };
                values.insert(key, SettingsValue::from_ini_str(raw));
            }
        }
        drop(values);

        tracing::debug!(target: "appshell::settings", path = %path.display(), keys = self.len(), "settings loaded");
        Ok(())
    }

    /// Writes the store contents to `path` as an INI file, atomically.
    ///
    /// The first `'/'` segment of each key becomes the section; keys without
    /// a separator land outside any section.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> FileResult<()> {
        let path = path.as_ref();
        let mut ini = Ini::new();

        {
            let values = self.values.read();
            for (key, value) in values.iter() {
                match key.split_once('/') {
                    Some((section, entry)) => {
                        ini.set_to(Some(section), entry.to_string(), value.to_ini_string());
                    }
                    None => {
                        ini.set_to::<String>(None, key.clone(), value.to_ini_string());
                    }
                }
            }
        }

        let mut buffer = Vec::new();
        ini.write_to(&mut buffer)
            .map_err(|e| FileError::from_io(e, path))?;
        atomic_write(path, &buffer)?;

        tracing::debug!(target: "appshell::settings", path = %path.display(), keys = self.len(), "settings saved");
        Ok(())
    }
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("len", &self.len())
            .finish()
    }
}
