#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! protogen configuration
//!
//! Two layers of configuration live here:
//! - the per-invocation generator parameter string (`lite,proto_h,...`), resolved
//!   into an immutable [`GeneratorConfiguration`] by [`resolve`] / [`resolve_with`];
//! - the environment file loaded by the CLI, stored in TOML, that describes the
//!   hosting build (runtime flavour, bootstrap mode), logging and output defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod generator_config;
pub mod options;
pub mod resolver;

pub use generator_config::{
    FieldListenerScope, GeneratorConfiguration, LazyFieldPolicy, RuntimeContext, RuntimeMode,
    TailCallTableMode,
};
pub use options::OptionKey;
pub use resolver::{resolve, resolve_with};

/// Errors that can occur when resolving options or loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The parameter string named an option this generator does not know
    #[error("Unknown generator option: {0}")]
    UnknownOption(String),
    /// An option that needs `=value` was given bare
    #[error("Generator option {0} requires a value")]
    MissingValue(String),
    /// An option value could not be interpreted
    #[error("Invalid value for {key}: {value}")]
    InvalidValue {
        /// Option key
        key: String,
        /// Offending value
        value: String,
    },
    /// The option is only available to the controlled in-house runtime
    #[error("The {0} option is not supported outside of a controlled environment.")]
    UnsupportedOutsideControlledEnvironment(String),
    /// Failed to read the configuration file from disk
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    /// Failed to parse the TOML configuration file
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize configuration to TOML format
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Configuration file was not found at the specified path
    #[error("Config file not found at: {0}")]
    NotFound(PathBuf),
    /// Could not locate the user's configuration directory
    #[error("Could not find user config directory")]
    ConfigDirUnavailable,
}

/// Environment file contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Hosting build facts
    #[serde(default)]
    pub runtime: RuntimeContext,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Code generation settings
    pub codegen: CodegenConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log file path (optional)
    pub file: Option<PathBuf>,
}

/// Code generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodegenConfig {
    /// Parameter string applied before any parameter given on the command line
    pub default_parameter: Option<String>,
    /// Where to write generated artifacts
    pub output_dir: PathBuf,
}

impl Config {
    /// Load configuration from a TOML file at `path`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save this configuration as a pretty-printed TOML file at `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Returns the default config file path:
    /// `{config_dir()}/protogen/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir =
            dirs::config_dir().ok_or(ConfigError::ConfigDirUnavailable)?.join("protogen");
        Ok(config_dir.join("config.toml"))
    }

    /// Load the file at [`Config::default_path`], or defaults when it does not exist
    pub fn load_or_default() -> Result<Self, ConfigError> {
        match Self::from_file(Self::default_path()?) {
            Err(ConfigError::NotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }

    /// Get the default output directory for generated code
    pub fn default_output_dir() -> PathBuf {
        Self::default_output_dir_internal(
            std::env::var("OUT_DIR").ok(),
            std::env::current_dir().ok(),
        )
    }

    /// Internal function for testing - allows injection of environment values
    fn default_output_dir_internal(
        out_dir: Option<String>,
        current_dir: Option<PathBuf>,
    ) -> PathBuf {
        if let Some(out_dir) = out_dir {
            return PathBuf::from(out_dir);
        }

        if let Some(current_dir) = current_dir {
            return current_dir;
        }

        PathBuf::from(".")
    }

    /// The parameter string for one invocation: the configured default
    /// options followed by `parameter`, so command-line options win.
    pub fn effective_parameter(&self, parameter: Option<&str>) -> String {
        [self.codegen.default_parameter.as_deref(), parameter]
            .into_iter()
            .flatten()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Resolve `parameter` against this environment's runtime context
    pub fn resolve(&self, parameter: Option<&str>) -> Result<GeneratorConfiguration, ConfigError> {
        resolve_with(&self.effective_parameter(parameter), self.runtime.clone())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            runtime: RuntimeContext::default(),
            logging: LoggingConfig { level: "info".to_string(), file: None },
            codegen: CodegenConfig {
                default_parameter: None,
                output_dir: Self::default_output_dir(),
            },
        }
    }
}
