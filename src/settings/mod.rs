mod models;

use std::path::{Path, PathBuf};
use std::{fs, sync::OnceLock};

pub use models::{BackendSettings, Settings}; // Re-export the model types to callers.

/// Env var holding a path to the settings file.
pub const SETTINGS_PATH_ENV: &str = "MACHINE_WIZARD_SETTINGS";

/// Single, module-private cache (set exactly once).
static SETTINGS: OnceLock<Settings> = OnceLock::new();

/// Default location: `resources/settings.json` next to the manifest, unless
/// overridden through [`SETTINGS_PATH_ENV`].
pub fn settings_file_path() -> PathBuf {
    std::env::var_os(SETTINGS_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources").join("settings.json"))
}

/// Parse settings from a JSON file. Relative catalog paths are resolved
/// against the file's directory.
pub fn load_file(path: impl AsRef<Path>) -> Result<Settings, SettingsError> {
    let path = path.as_ref();
    let data = fs::read_to_string(path).map_err(SettingsError::Io)?;
    let mut settings = parse_json_str(&data)?;

    if let BackendSettings::Catalog { path: catalog } = &mut settings.backend
        && catalog.is_relative()
        && let Some(dir) = path.parent()
    {
        *catalog = dir.join(&*catalog);
    }

    Ok(settings)
}

pub fn parse_json_str(json: &str) -> Result<Settings, SettingsError> {
    serde_json::from_str(json).map_err(SettingsError::Json)
}

/// Initialize from a JSON file path.
pub fn init_from_file(path: impl AsRef<Path>) -> Result<&'static Settings, SettingsError> {
    install(load_file(path)?)
}

/// Initialize from a JSON string.
pub fn init_from_json_str(json: &str) -> Result<&'static Settings, SettingsError> {
    install(parse_json_str(json)?)
}

/// Initialize from an env var containing JSON.
pub fn init_from_env(var: &str) -> Result<&'static Settings, SettingsError> {
    let s = std::env::var(var).map_err(|_| SettingsError::MissingEnv(var.to_string()))?;
    init_from_json_str(&s)
}

fn install(settings: Settings) -> Result<&'static Settings, SettingsError> {
    SETTINGS.set(settings).map_err(|_| SettingsError::AlreadyInitialized)?;
    get()
}

pub fn get() -> Result<&'static Settings, SettingsError> {
    SETTINGS.get().ok_or(SettingsError::NotInitialized)
}

/// ---- Errors ----
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("settings are not initialized")]
    NotInitialized,
    #[error("settings already initialized")]
    AlreadyInitialized,
    #[error("missing env var: {0}")]
    MissingEnv(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
