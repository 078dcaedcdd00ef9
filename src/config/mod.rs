use crate::charts::DEFAULT_FILTER_COLUMN;
use crate::storage::{DEFAULT_ORIGINAL_FILE, DEFAULT_WORKING_FILE};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub charts: ChartsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Largest accepted request body, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_upload_bytes() -> usize {
    50 * 1024 * 1024
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathsConfig {
    /// The working dataset every query reads. Overwritten on upload.
    #[serde(default = "default_working_file")]
    pub working_file: String,
    /// Bundled dataset copied into place when the working file is missing or empty.
    #[serde(default = "default_original_file")]
    pub default_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            working_file: default_working_file(),
            default_file: default_original_file(),
        }
    }
}

fn default_working_file() -> String {
    DEFAULT_WORKING_FILE.to_string()
}

fn default_original_file() -> String {
    DEFAULT_ORIGINAL_FILE.to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChartsConfig {
    /// Column the `flipper_length_min` query parameter filters on.
    #[serde(default = "default_filter_column")]
    pub filter_column: String,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            filter_column: default_filter_column(),
        }
    }
}

fn default_filter_column() -> String {
    DEFAULT_FILTER_COLUMN.to_string()
}

impl AppConfig {
    /// Load configuration from an optional file and environment variables
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Add environment variables with prefix PENGUIN_
        // Example: PENGUIN_SERVER__PORT=8080
        builder = builder.add_source(
            config::Environment::with_prefix("PENGUIN")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.max_upload_bytes == 0 {
            anyhow::bail!("'server.max_upload_bytes' must be greater than zero");
        }

        if self.paths.working_file.trim().is_empty() {
            anyhow::bail!("'paths.working_file' cannot be empty");
        }

        if self.paths.working_file == self.paths.default_file {
            anyhow::bail!(
                "'paths.working_file' and 'paths.default_file' must differ (both are '{}')",
                self.paths.working_file
            );
        }

        if self.charts.filter_column.trim().is_empty() {
            anyhow::bail!("'charts.filter_column' cannot be empty");
        }

        Ok(())
    }
}
