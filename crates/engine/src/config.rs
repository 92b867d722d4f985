//! Repository configuration via `folio.toml`
//!
//! On first open, a default `folio.toml` is written to the repository
//! directory. To change settings, edit the file and reopen.

use folio_core::{Error, Result, VersionPolicy, VersioningMode};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name placed in the repository directory.
pub const CONFIG_FILE_NAME: &str = "folio.toml";

/// Default bound on rename-and-retry attempts.
pub const DEFAULT_MAX_NAME_RETRIES: u32 = 10;

/// Repository-wide policy used when neither the item nor its content type
/// sets a value. Persisted under the `[defaults]` section.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PolicyDefaults {
    /// `"none"`, `"major_only"` or `"major_and_minor"`
    #[serde(default = "default_versioning")]
    pub versioning: VersioningMode,
    /// Whether new versions need approval before becoming public
    #[serde(default)]
    pub approval: bool,
}

fn default_versioning() -> VersioningMode {
    VersioningMode::None
}

impl Default for PolicyDefaults {
    fn default() -> Self {
        Self {
            versioning: default_versioning(),
            approval: false,
        }
    }
}

/// Repository configuration loaded from `folio.toml`.
///
/// # Example
///
/// ```toml
/// max_name_retries = 10
///
/// [defaults]
/// versioning = "major_and_minor"
/// approval = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FolioConfig {
    /// How many alternative names to try when an insert collides with a
    /// sibling. `0` disables renaming.
    #[serde(default = "default_max_name_retries")]
    pub max_name_retries: u32,
    /// Fallback policy.
    #[serde(default)]
    pub defaults: PolicyDefaults,
}

fn default_max_name_retries() -> u32 {
    DEFAULT_MAX_NAME_RETRIES
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            max_name_retries: default_max_name_retries(),
            defaults: PolicyDefaults::default(),
        }
    }
}

impl FolioConfig {
    /// The fallback policy as a resolved bucket.
    pub fn default_policy(&self) -> VersionPolicy {
        VersionPolicy::new(self.defaults.versioning, self.defaults.approval)
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Folio repository configuration
#
# How many alternative names ("report(1).docx", "report(2).docx", ...) to try
# when a new item collides with a sibling's name (default: 10, 0 = never rename)
max_name_retries = 10

# Policy used when neither the item nor its content type sets one.
[defaults]
# "none", "major_only" or "major_and_minor"
versioning = "none"
# Require approval before a version becomes public
approval = false
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content).map_err(|e| {
            Error::config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Load `folio.toml` from `dir`, creating the default file first if it
    /// is missing.
    pub fn open(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        Self::write_default_if_missing(&path)?;
        Self::from_file(&path)
    }
}
