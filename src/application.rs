//! Application bootstrap.
//!
//! `Application` wires the shell services together: the settings store and
//! model, the translator, and the log router. It is a plain value the host
//! constructs and owns; nothing here is global.
//!
//! The UI runtime is the host's business: [`Application::run`] hands control
//! to a host closure and treats its return value as the process exit code.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use directories::ProjectDirs;

use crate::file::FileError;
use crate::i18n::{TranslationError, Translator};
use crate::logging::{ConsoleSink, LogRouter, LogSink};
use crate::model::SettingsModel;
use crate::settings::SettingsStore;
use crate::{shell_info, shell_warning};

/// Name of the settings file inside the config directory.
const SETTINGS_FILE: &str = "settings.ini";

/// Errors raised by application bootstrap and persistence.
#[derive(Debug)]
pub enum ShellError {
    /// No per-user config directory could be determined on this platform.
    ConfigDirUnavailable,
    /// Reading or writing the settings file failed.
    Settings(FileError),
    /// Loading a translation catalog failed.
    Translation(TranslationError),
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellError::ConfigDirUnavailable => {
                write!(f, "no config directory available for this platform")
            }
            ShellError::Settings(e) => write!(f, "settings error: {e}"),
            ShellError::Translation(e) => write!(f, "translation error: {e}"),
        }
    }
}

impl std::error::Error for ShellError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShellError::ConfigDirUnavailable => None,
            ShellError::Settings(e) => Some(e),
            ShellError::Translation(e) => Some(e),
        }
    }
}

impl From<FileError> for ShellError {
    fn from(e: FileError) -> Self {
        ShellError::Settings(e)
    }
}

impl From<TranslationError> for ShellError {
    fn from(e: TranslationError) -> Self {
        ShellError::Translation(e)
    }
}

/// The assembled application shell.
pub struct Application {
    organization: String,
    name: String,
    store: Arc<SettingsStore>,
    settings: Arc<SettingsModel>,
    translator: Translator,
    log: LogRouter,
}

impl Application {
    /// Assembles the shell for an application.
    ///
    /// The settings model starts empty with store synchronization on, the
    /// translator reads catalogs from a `translations` directory next to
    /// the executable's working directory, and the log router starts with a
    /// console sink.
    pub fn new(organization: impl Into<String>, name: impl Into<String>) -> Self {
        let organization = organization.into();
        let name = name.into();

        let store = Arc::new(SettingsStore::new());
        let settings = Arc::new(SettingsModel::new(Arc::clone(&store)));
        let translator = Translator::new("translations", name.to_lowercase());
        let mut log = LogRouter::new();
        log.add_sink(Box::new(ConsoleSink::new()));

        Self {
            organization,
            name,
            store,
            settings,
            translator,
            log,
        }
    }

    /// Replaces the translation catalog directory.
    pub fn with_translation_dir(mut self, directory: impl Into<PathBuf>) -> Self {
        self.translator = Translator::new(directory, self.name.to_lowercase());
        self
    }

    /// Attaches an additional log sink.
    pub fn add_log_sink(&mut self, sink: Box<dyn LogSink>) {
        self.log.add_sink(sink);
    }

    /// The application name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The organization name used for the config directory.
    pub fn organization(&self) -> &str {
        &self.organization
    }

    /// The flat settings store.
    pub fn store(&self) -> &Arc<SettingsStore> {
        &self.store
    }

    /// The hierarchical settings model.
    pub fn settings(&self) -> &Arc<SettingsModel> {
        &self.settings
    }

    /// The translator.
    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    /// The log router.
    pub fn log(&self) -> &LogRouter {
        &self.log
    }

    /// The per-user settings file path for this application.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::ConfigDirUnavailable`] when the platform
    /// exposes no config directory.
    pub fn settings_path(&self) -> Result<PathBuf, ShellError> {
        let dirs = ProjectDirs::from("", &self.organization, &self.name)
            .ok_or(ShellError::ConfigDirUnavailable)?;
        Ok(dirs.config_dir().join(SETTINGS_FILE))
    }

    /// Loads the settings model from the default settings file.
    ///
    /// # Errors
    ///
    /// Returns an error when the path cannot be determined or the file is
    /// unreadable. A missing file is not an error; it loads empty.
    pub fn load_settings(&self) -> Result<(), ShellError> {
        let path = self.settings_path()?;
        self.load_settings_from(path)
    }

    /// Loads the settings model from an explicit file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load_settings_from(&self, path: impl AsRef<Path>) -> Result<(), ShellError> {
        self.settings.load(path.as_ref())?;
        Ok(())
    }

    /// Saves the settings model to the default settings file, creating the
    /// config directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error when the path cannot be determined or written.
    pub fn save_settings(&self) -> Result<(), ShellError> {
        let path = self.settings_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| FileError::from_io(e, parent))?;
        }
        self.save_settings_to(path)
    }

    /// Saves the settings model to an explicit file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be written.
    pub fn save_settings_to(&self, path: impl AsRef<Path>) -> Result<(), ShellError> {
        self.settings.save(path.as_ref())?;
        Ok(())
    }

    /// Runs the host's UI closure and returns its exit code.
    ///
    /// A nonzero exit code is logged as a warning, mirroring a UI runtime
    /// that failed to present anything.
    pub fn run<F>(&self, ui: F) -> i32
    where
        F: FnOnce(&Application) -> i32,
    {
        shell_info!(self.log, "{} starting", self.name);
        let code = ui(self);
        if code != 0 {
            shell_warning!(self.log, "UI runtime exited with code {code}");
        }
        shell_info!(self.log, "{} exited with code {code}", self.name);
        code
    }
}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Application")
            .field("organization", &self.organization)
            .field("name", &self.name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SettingsValue;

    #[test]
    fn test_wiring() {
        let app = Application::new("Horizon Analytic", "Orbit");
        assert_eq!(app.name(), "Orbit");
        assert_eq!(app.organization(), "Horizon Analytic");
        assert!(app.settings().sync_with_store());
        assert_eq!(app.log().sink_count(), 1);

        app.settings().set("timeout", 30, "General");
        assert_eq!(app.store().get("General/timeout"), Some(SettingsValue::Int(30)));
    }

    #[test]
    fn test_run_returns_exit_code() {
        let app = Application::new("Horizon Analytic", "Orbit");
        let code = app.run(|app| {
            app.settings().set("ran", true, "General");
            7
        });
        assert_eq!(code, 7);
        assert_eq!(
            app.settings().value("ran", "General", false),
            SettingsValue::Bool(true)
        );
    }

    #[test]
    fn test_settings_round_trip_via_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);

        let app = Application::new("Horizon Analytic", "Orbit");
        app.settings().set("theme", "dark", "Appearance");
        app.save_settings_to(&path).unwrap();

        let other = Application::new("Horizon Analytic", "Orbit");
        other.load_settings_from(&path).unwrap();
        assert_eq!(
            other.settings().value("theme", "Appearance", ""),
            SettingsValue::String("dark".to_string())
        );
    }
}
