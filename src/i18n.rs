//! Translation catalogs and language switching.
//!
//! Catalogs are INI files named `<prefix>_<language>.ini` in a catalog
//! directory; each entry maps a source string to its translation. Sections
//! may be used to group entries but carry no meaning.
//!
//! # Example
//!
//! ```no_run
//! use horizon_appshell::i18n::Translator;
//!
//! let translator = Translator::new("translations", "app");
//! translator.load_translation("de")?;
//! assert_eq!(translator.current_language(), "de");
//! let label = translator.translate("Settings");
//! # Ok::<(), horizon_appshell::i18n::TranslationError>(())
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use ini::Ini;
use parking_lot::RwLock;

use crate::file::read_text;
use crate::signal::Signal;

/// Error type for translation operations.
#[derive(Debug)]
pub struct TranslationError {
    kind: TranslationErrorKind,
    message: String,
}

/// The kind of translation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationErrorKind {
    /// The catalog file for the requested language does not exist or could
    /// not be read.
    CatalogNotFound,
    /// The catalog file exists but is not valid INI.
    CatalogInvalid,
}

impl TranslationError {
    fn catalog_not_found(path: &Path) -> Self {
        Self {
            kind: TranslationErrorKind::CatalogNotFound,
            message: format!("translation catalog not found: {}", path.display()),
        }
    }

    fn catalog_invalid(path: &Path, detail: &str) -> Self {
        Self {
            kind: TranslationErrorKind::CatalogInvalid,
            message: format!("invalid translation catalog {}: {detail}", path.display()),
        }
    }

    /// The kind of error.
    pub fn kind(&self) -> TranslationErrorKind {
        self.kind
    }
}

impl fmt::Display for TranslationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for TranslationError {}

/// Loads and applies per-language string catalogs.
pub struct Translator {
    directory: PathBuf,
    prefix: String,
    entries: RwLock<HashMap<String, String>>,
    language: RwLock<String>,
    language_changed: Signal<String>,
}

impl Translator {
    /// Creates a translator over `directory` with catalog files named
    /// `<prefix>_<language>.ini`.
    ///
    /// No catalog is loaded yet; until one is, every lookup passes through.
    pub fn new(directory: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            prefix: prefix.into(),
            entries: RwLock::new(HashMap::new()),
            language: RwLock::new(String::new()),
            language_changed: Signal::new(),
        }
    }

    /// Signal emitted with the new language after every catalog switch.
    pub fn language_changed(&self) -> &Signal<String> {
        &self.language_changed
    }

    /// The language of the currently loaded catalog, empty before the first
    /// load.
    pub fn current_language(&self) -> String {
        self.language.read().clone()
    }

    /// The catalog file path for `language`.
    pub fn catalog_path(&self, language: &str) -> PathBuf {
        self.directory
            .join(format!("{}_{language}.ini", self.prefix))
    }

    /// Loads the catalog for `language`, replacing the current one, and
    /// emits [`Translator::language_changed`].
    ///
    /// # Errors
    ///
    /// Returns an error when the catalog is missing or malformed; the
    /// current catalog stays in place.
    pub fn load_translation(&self, language: &str) -> Result<(), TranslationError> {
        let path = self.catalog_path(language);
        let text =
            read_text(&path).map_err(|_| TranslationError::catalog_not_found(&path))?;
        let ini = Ini::load_from_str(&text)
            .map_err(|e| TranslationError::catalog_invalid(&path, &e.to_string()))?;

        let mut entries = HashMap::new();
        for (_, properties) in ini.iter() {
            for (source, translated) in properties.iter() {
                entries.insert(source.to_string(), translated.to_string());
            }
        }

        *self.entries.write() = entries;
        *self.language.write() = language.to_string();
        tracing::debug!(target: "appshell::i18n", language, path = %path.display(), "translation catalog loaded");
        self.language_changed.emit(language.to_string());
        Ok(())
    }

    /// Loads the catalog matching the system locale, falling back to `"en"`
    /// when the detected language has no catalog.
    ///
    /// # Errors
    ///
    /// Returns an error when the fallback catalog is also unavailable.
    pub fn load_system_translation(&self) -> Result<(), TranslationError> {
        let language = system_language();
        match self.load_translation(&language) {
            Ok(()) => Ok(()),
            Err(e) if language != "en" && e.kind() == TranslationErrorKind::CatalogNotFound => {
                self.load_translation("en")
            }
            Err(e) => Err(e),
        }
    }

    /// Translates `source`, passing it through when the catalog has no
    /// entry for it.
    pub fn translate(&self, source: &str) -> String {
        self.entries
            .read()
            .get(source)
            .cloned()
            .unwrap_or_else(|| source.to_string())
    }

    /// Number of entries in the current catalog.
    pub fn catalog_len(&self) -> usize {
        self.entries.read().len()
    }
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translator")
            .field("language", &self.current_language())
            .field("entries", &self.catalog_len())
            .finish()
    }
}

/// The system language subtag (`"en"` from `"en-US"`), `"en"` when
/// detection fails.
pub fn system_language() -> String {
    sys_locale::get_locale()
        .as_deref()
        .and_then(|locale| locale.split(['-', '_']).next())
        .filter(|lang| !lang.is_empty())
        .map(str::to_lowercase)
        .unwrap_or_else(|| "en".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn write_catalog(dir: &Path, prefix: &str, language: &str, body: &str) {
        std::fs::write(dir.join(format!("{prefix}_{language}.ini")), body).unwrap();
    }

    #[test]
    fn test_translate_hit_and_passthrough() {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(dir.path(), "app", "de", "Settings=Einstellungen\nQuit=Beenden\n");

        let translator = Translator::new(dir.path(), "app");
        translator.load_translation("de").unwrap();

        assert_eq!(translator.translate("Settings"), "Einstellungen");
        assert_eq!(translator.translate("Untranslated"), "Untranslated");
        assert_eq!(translator.current_language(), "de");
        assert_eq!(translator.catalog_len(), 2);
    }

    #[test]
    fn test_sections_are_flattened() {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(dir.path(), "app", "fr", "[menu]\nFile=Fichier\n[dialog]\nCancel=Annuler\n");

        let translator = Translator::new(dir.path(), "app");
        translator.load_translation("fr").unwrap();
        assert_eq!(translator.translate("File"), "Fichier");
        assert_eq!(translator.translate("Cancel"), "Annuler");
    }

    #[test]
    fn test_language_changed_emitted() {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(dir.path(), "app", "de", "a=b\n");

        let translator = Translator::new(dir.path(), "app");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        translator
            .language_changed()
            .connect(move |lang| s.lock().unwrap().push(lang.clone()));

        translator.load_translation("de").unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["de".to_string()]);
    }

    #[test]
    fn test_missing_catalog_keeps_current() {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(dir.path(), "app", "de", "Settings=Einstellungen\n");

        let translator = Translator::new(dir.path(), "app");
        translator.load_translation("de").unwrap();

        let err = translator.load_translation("xx").unwrap_err();
        assert_eq!(err.kind(), TranslationErrorKind::CatalogNotFound);
        assert_eq!(translator.current_language(), "de");
        assert_eq!(translator.translate("Settings"), "Einstellungen");
    }

    #[test]
    fn test_system_language_is_nonempty() {
        let language = system_language();
        assert!(!language.is_empty());
        assert_eq!(language, language.to_lowercase());
    }
}
