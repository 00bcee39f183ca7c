use crate::{Dialects, PkgDiffError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "pkgdiff.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Extension pair of the two mirrored dialects
    #[serde(default)]
    pub dialects: Dialects,

    /// Ignore patterns for package directories (e.g., "testdata/")
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Compare files of a package on the rayon thread pool
    #[serde(default)]
    pub parallel: bool,

    /// Hide files that compare equal when rendering
    #[serde(default)]
    pub diff_only: bool,
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub path: PathBuf,
    pub exists: bool,
}

/// Load the config from `explicit` or from the platform config directory
///
/// A missing file yields the defaults. An explicit path that does not exist
/// is a configuration error.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    let path = match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(PkgDiffError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => default_config_path()?,
    };
    let exists = path.is_file();

    let config = if exists {
        let data = fs::read_to_string(&path)?;
        parse_config(&data)?
    } else {
        AppConfig::default()
    };

    Ok(LoadedConfig {
        config,
        path,
        exists,
    })
}

pub fn parse_config(data: &str) -> Result<AppConfig> {
    let config: AppConfig =
        toml::from_str(data).map_err(|e| PkgDiffError::Serialization(e.to_string()))?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &AppConfig) -> Result<()> {
    let dialects = &config.dialects;
    if dialects.primary_extension.is_empty() || dialects.secondary_extension.is_empty() {
        return Err(PkgDiffError::Config(
            "Dialect extensions must not be empty".to_string(),
        ));
    }
    if dialects.primary_extension == dialects.secondary_extension {
        return Err(PkgDiffError::Config(format!(
            "Dialect extensions must differ, both are {}",
            dialects.primary_extension
        )));
    }
    Ok(())
}

fn default_config_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "pkgdiff")
        .ok_or_else(|| PkgDiffError::Config("Unable to determine config directory".to_string()))?;
    Ok(dirs.config_dir().join(CONFIG_FILE_NAME))
}
