//! Runtime settings configuration
//!
//! Values the control derives settings from. Every field has a default, so
//! an empty TOML document is a valid configuration.
//!
//! ```toml
//! [node_versions]
//! v2 = "~10"
//! v3 = "~12"
//! default = "6.5.0"
//!
//! [worker_runtime]
//! dotnet = "dotnet"
//!
//! [probes]
//! timeout_ms = 30000
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use fnc_version::MajorVersion;
use serde::{Deserialize, Serialize};

/// Runtime settings configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSettingsConfig {
    /// Node.js versions pinned per runtime major version
    pub node_versions: NodeVersionDefaults,
    /// Worker runtime names with special handling
    pub worker_runtime: WorkerRuntimeConfig,
    /// Probe driver settings
    pub probes: ProbeConfig,
}

impl RuntimeSettingsConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With node version defaults
    #[inline]
    #[must_use]
    pub fn with_node_versions(mut self, node_versions: NodeVersionDefaults) -> Self {
        self.node_versions = node_versions;
        self
    }

    /// With probe timeout
    #[inline]
    #[must_use]
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probes.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Parse and validate a TOML document
    ///
    /// # Errors
    /// Returns error if the TOML is malformed or a value is invalid
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or does not parse
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded runtime settings configuration");
        Ok(config)
    }

    /// Check invariants serde cannot express
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the offending field
    pub fn validate(&self) -> Result<(), ConfigError> {
        let node = &self.node_versions;
        for (field, value) in [
            ("node_versions.v2", &node.v2),
            ("node_versions.v3", &node.v3),
            ("node_versions.default", &node.default),
            ("worker_runtime.dotnet", &self.worker_runtime.dotnet),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{field} must not be empty")));
            }
        }
        if self.probes.timeout_ms == 0 {
            return Err(ConfigError::Invalid("probes.timeout_ms must be positive".into()));
        }
        Ok(())
    }
}

/// Node.js version written alongside each runtime major version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeVersionDefaults {
    /// Pinned for `~2`
    pub v2: String,
    /// Pinned for `~3`
    pub v3: String,
    /// Pinned for every other target
    pub default: String,
}

impl NodeVersionDefaults {
    /// Node version for `target`
    #[must_use]
    pub fn for_version(&self, target: MajorVersion) -> &str {
        match target {
            MajorVersion::V2 => &self.v2,
            MajorVersion::V3 => &self.v3,
            _ => &self.default,
        }
    }
}

impl Default for NodeVersionDefaults {
    fn default() -> Self {
        Self {
            v2: "~10".to_string(),
            v3: "~12".to_string(),
            default: "6.5.0".to_string(),
        }
    }
}

/// Worker runtime names with special handling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerRuntimeConfig {
    /// In-process .NET worker; never eligible for the `~4` shortcut
    pub dotnet: String,
}

impl Default for WorkerRuntimeConfig {
    fn default() -> Self {
        Self {
            dotnet: "dotnet".to_string(),
        }
    }
}

/// Probe driver settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Time after which an unanswered probe is treated as failed
    pub timeout_ms: u64,
}

impl ProbeConfig {
    /// Timeout as a duration
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self { timeout_ms: 30_000 }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading the file failed
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// TOML did not parse into the configuration shape
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value violates a configuration invariant
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
