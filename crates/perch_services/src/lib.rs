//! Perch Services Layer
//!
//! Settings and user input for the placement runtime.

pub mod input;
pub mod settings;

pub use input::{CommandParseError, ModelRef, PlaneKind, UiCommand};
pub use settings::{Settings, SettingsError};

use std::path::Path;

/// Default settings file, looked up in the working directory
pub const SETTINGS_FILE: &str = "perch.json";

/// Service initialization: resolves settings for this run
pub fn init_services(settings_path: Option<&Path>) -> Settings {
    let path = settings_path.unwrap_or_else(|| Path::new(SETTINGS_FILE));
    let settings = Settings::load_or_default(path);
    tracing::debug!(?settings, "services initialized");
    settings
}
