//! Application shell services for Horizon desktop apps.
//!
//! This crate provides the service layer a desktop application needs before
//! any UI runtime is attached:
//!
//! - **Settings Model**: Hierarchical group/key/value settings behind the
//!   Model/View interface (`ItemModel`, `ModelIndex`, roles, signals)
//! - **Settings Store**: Flat, INI-backed persistence the model mirrors into
//! - **Log Routing**: Sink chain with a closed formatter set
//! - **Translations**: Per-language string catalogs with system-locale
//!   detection
//! - **Application**: Bootstrap wiring the services together
//!
//! # Settings Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_appshell::model::SettingsModel;
//! use horizon_appshell::settings::{SettingsStore, SettingsValue};
//!
//! let store = Arc::new(SettingsStore::new());
//! let settings = SettingsModel::new(Arc::clone(&store));
//!
//! // Nested keys become group chains in the tree...
//! settings.set("colors/accent", "blue", "Appearance");
//! assert_eq!(
//!     settings.value("colors/accent", "Appearance", ""),
//!     SettingsValue::String("blue".to_string()),
//! );
//!
//! // ...and flat entries in the store.
//! assert_eq!(
//!     store.get("Appearance/colors/accent"),
//!     Some(SettingsValue::String("blue".to_string())),
//! );
//! ```
//!
//! # Application Example
//!
//! ```no_run
//! use horizon_appshell::application::Application;
//!
//! let app = Application::new("Horizon Analytic", "Orbit");
//! app.load_settings()?;
//! let code = app.run(|app| {
//!     // hand the settings model and translator to the UI runtime
//!     let _ = app.settings();
//!     0
//! });
//! app.save_settings()?;
//! std::process::exit(code);
//! # Ok::<(), horizon_appshell::application::ShellError>(())
//! ```

pub mod application;
pub mod file;
pub mod i18n;
pub mod logging;
pub mod model;
pub mod settings;
pub mod signal;

pub use application::{Application, ShellError};
pub use file::{FileError, FileErrorKind, FileResult};
pub use i18n::{TranslationError, Translator};
pub use logging::{ConsoleSink, FileSink, LogFormatter, LogLevel, LogRecord, LogRouter, LogSink};
pub use model::{ItemModel, ModelIndex, ModelSignals, SettingsModel};
pub use settings::{FromSettingsValue, SettingsStore, SettingsValue};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
