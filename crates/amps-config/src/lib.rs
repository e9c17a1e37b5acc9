//! amps-config: the run configuration record, its field registry,
//! range checks and session snapshot format.

pub mod checks;
pub mod defaults;
pub mod derived;
pub mod fields;
pub mod migrate;
pub mod schema;
pub mod snapshot;
pub mod step;

pub use checks::{Check, CheckLevel, CheckReport, check_config};
pub use derived::DerivedValues;
pub use fields::{FieldError, FieldId, FieldSpec, NumberFormat};
pub use migrate::{LATEST_VERSION, migrate_to_latest};
pub use schema::*;
pub use snapshot::SessionSnapshot;
pub use step::WizardStep;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Unsupported snapshot version: {version}")]
    UnsupportedVersion { version: u32 },

    #[error("Migration error: {what}")]
    Migration { what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn check_version(snapshot: &SessionSnapshot) -> ConfigResult<()> {
    if snapshot.version > LATEST_VERSION {
        return Err(ConfigError::UnsupportedVersion {
            version: snapshot.version,
        });
    }
    Ok(())
}

pub fn load_yaml(path: &std::path::Path) -> ConfigResult<SessionSnapshot> {
    let content = std::fs::read_to_string(path)?;
    let snapshot: SessionSnapshot = serde_yaml::from_str(&content)?;
    check_version(&snapshot)?;
    migrate_to_latest(snapshot)
}

pub fn save_yaml(path: &std::path::Path, snapshot: &SessionSnapshot) -> ConfigResult<()> {
    check_version(snapshot)?;
    let content = serde_yaml::to_string(snapshot)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ConfigResult<SessionSnapshot> {
    let content = std::fs::read_to_string(path)?;
    let snapshot: SessionSnapshot = serde_json::from_str(&content)?;
    check_version(&snapshot)?;
    migrate_to_latest(snapshot)
}

pub fn save_json(path: &std::path::Path, snapshot: &SessionSnapshot) -> ConfigResult<()> {
    check_version(snapshot)?;
    let content = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a snapshot, choosing the format from the file extension.
pub fn load_snapshot(path: &std::path::Path) -> ConfigResult<SessionSnapshot> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_json(path),
        _ => load_yaml(path),
    }
}

/// Save a snapshot, choosing the format from the file extension.
pub fn save_snapshot(path: &std::path::Path, snapshot: &SessionSnapshot) -> ConfigResult<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => save_json(path, snapshot),
        _ => save_yaml(path, snapshot),
    }
}
