use std::path::{Path, PathBuf};

use cmas_pose::{BatteryConfig, SourceConfig};
use serde::{Deserialize, Serialize};

/// Current config version. Bump this when changing the file's shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CmasConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    pub config_version: u32,
    pub source: SourceConfig,
    pub battery: BatteryConfig,
}

pub fn default_config_path() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("cmas").join("config.json"))
}

/// Load the config at `explicit`, or at the default location.
///
/// An explicit path must exist. A missing file at the default location
/// means all defaults.
pub fn load_config(explicit: Option<&Path>) -> eyre::Result<CmasConfig> {
    let config = match explicit {
        Some(path) => read_config(path)?,
        None => {
            let path = default_config_path()?;
            if path.exists() {
                read_config(&path)?
            } else {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                CmasConfig::default()
            }
        }
    };

    config.battery.validate()?;
    Ok(config)
}

fn read_config(path: &Path) -> eyre::Result<CmasConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: CmasConfig = serde_json::from_value(migrated)?;
    tracing::info!(path = %path.display(), version = config.config_version, "config loaded");
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update cmas."
        ));
    }

    // Baseline stamp only: unversioned files already have the v1 shape.
    // Real shape changes start at v2.
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
    }

    Ok(json)
}

/// The config as it would be written today.
pub fn stamped(config: &CmasConfig) -> CmasConfig {
    CmasConfig {
        config_version: CURRENT_VERSION,
        ..config.clone()
    }
}
