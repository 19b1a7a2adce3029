use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::resolver::LayeredDirs;

/// Store configuration, usually read from a JSON file.
///
/// Every field is optional; an empty object `{}` means "use the host's
/// cache and documents directories".
///
/// ```json
/// { "cache_root": "/var/tmp/larder", "documents_root": null }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Replaces the OS cache directory for the `cache` scope.
    #[serde(default)]
    pub cache_root: Option<PathBuf>,
    /// Replaces the OS documents directory for the `documents` scope.
    #[serde(default)]
    pub documents_root: Option<PathBuf>,
}

impl StoreConfig {
    pub fn from_json_str(text: &str, origin: &Path) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::Config {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text, path)
    }

    pub fn resolver(&self) -> LayeredDirs {
        LayeredDirs {
            cache: self.cache_root.clone(),
            documents: self.documents_root.clone(),
        }
    }
}
