//! Application configuration for Limitrofe.
//!
//! User config lives at `~/.limitrofe/limitrofe.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LimitrofeError, Result};
use crate::types::{ColumnNames, DEFAULT_ENTITY_COLUMN, DEFAULT_NEIGHBOR_COLUMN};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "limitrofe.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".limitrofe";

/// Published adjacency dataset used when nothing else is configured.
pub const DEFAULT_SOURCE_URL: &str = "https://raw.githubusercontent.com/johnmbf/municipio_limitrofe/refs/heads/main/municipios_limitrofes.csv";

// ---------------------------------------------------------------------------
// Config structs (matching limitrofe.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where the dataset text comes from.
    #[serde(default)]
    pub source: SourceConfig,

    /// Header names of the required fields.
    #[serde(default)]
    pub columns: ColumnsConfig,

    /// User-facing strings.
    #[serde(default)]
    pub display: DisplayConfig,
}

/// `[source]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// HTTP(S) URL or local file path of the CSV document.
    #[serde(default = "default_location")]
    pub location: String,

    /// Request timeout for HTTP sources.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            location: default_location(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_location() -> String {
    DEFAULT_SOURCE_URL.into()
}
fn default_timeout_secs() -> u64 {
    30
}

/// `[columns]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnsConfig {
    /// Header name of the municipality field.
    #[serde(default = "default_entity_column")]
    pub entity: String,

    /// Header name of the bordering-municipality field.
    #[serde(default = "default_neighbor_column")]
    pub neighbor: String,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            entity: default_entity_column(),
            neighbor: default_neighbor_column(),
        }
    }
}

fn default_entity_column() -> String {
    DEFAULT_ENTITY_COLUMN.into()
}
fn default_neighbor_column() -> String {
    DEFAULT_NEIGHBOR_COLUMN.into()
}

impl From<&ColumnsConfig> for ColumnNames {
    fn from(config: &ColumnsConfig) -> Self {
        Self {
            entity: config.entity.clone(),
            neighbor: config.neighbor.clone(),
        }
    }
}

/// `[display]` section: messages shown by the selector and result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Leading selector entry meaning "no selection".
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    /// Disabled selector entry shown while a load is in flight.
    #[serde(default = "default_loading")]
    pub loading: String,

    /// Disabled selector entry shown after a failed load.
    #[serde(default = "default_load_error")]
    pub load_error: String,

    /// Result message when nothing is selected.
    #[serde(default = "default_nothing_selected")]
    pub nothing_selected: String,

    /// Result message when the selection has no recorded neighbors.
    #[serde(default = "default_not_found")]
    pub not_found: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            placeholder: default_placeholder(),
            loading: default_loading(),
            load_error: default_load_error(),
            nothing_selected: default_nothing_selected(),
            not_found: default_not_found(),
        }
    }
}

fn default_placeholder() -> String {
    "Selecione...".into()
}
fn default_loading() -> String {
    "Carregando...".into()
}
fn default_load_error() -> String {
    "Erro ao carregar dados".into()
}
fn default_nothing_selected() -> String {
    "Nenhum município selecionado.".into()
}
fn default_not_found() -> String {
    "Não foram encontrados dados de limites para este município.".into()
}

// ---------------------------------------------------------------------------
// Load config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime load configuration, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// HTTP(S) URL or file path of the dataset.
    pub location: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Required header names.
    pub columns: ColumnNames,
}

impl From<&AppConfig> for LoadConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            location: config.source.location.clone(),
            timeout_secs: config.source.timeout_secs,
            columns: ColumnNames::from(&config.columns),
        }
    }
}

impl LoadConfig {
    /// Apply command-line overrides on top of the file/default values.
    pub fn with_overrides(
        mut self,
        location: Option<&str>,
        entity_column: Option<&str>,
        neighbor_column: Option<&str>,
    ) -> Self {
        if let Some(location) = location {
            self.location = location.to_string();
        }
        if let Some(entity) = entity_column {
            self.columns.entity = entity.to_string();
        }
        if let Some(neighbor) = neighbor_column {
            self.columns.neighbor = neighbor.to_string();
        }
        self
    }

    /// Reject settings that cannot possibly load.
    pub fn validate(&self) -> Result<()> {
        if self.location.trim().is_empty() {
            return Err(LimitrofeError::config("source location is empty"));
        }
        if self.timeout_secs == 0 {
            return Err(LimitrofeError::config("timeout_secs must be greater than zero"));
        }
        if self.columns.entity.is_empty() || self.columns.neighbor.is_empty() {
            return Err(LimitrofeError::config("column names must not be empty"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.limitrofe/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| LimitrofeError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.limitrofe/limitrofe.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| LimitrofeError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        LimitrofeError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| LimitrofeError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| LimitrofeError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| LimitrofeError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("location"));
        assert!(toml_str.contains("NM_MUN"));
        assert!(toml_str.contains("Selecione..."));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.source.timeout_secs, 30);
        assert_eq!(parsed.columns.neighbor, "NM_LIM");
        assert_eq!(parsed.display, DisplayConfig::default());
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let toml_str = r#"
[source]
location = "/data/limites.csv"

[columns]
entity = "municipio"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.source.location, "/data/limites.csv");
        assert_eq!(config.source.timeout_secs, 30);
        assert_eq!(config.columns.entity, "municipio");
        assert_eq!(config.columns.neighbor, "NM_LIM");
        assert_eq!(config.display.placeholder, "Selecione...");
    }

    #[test]
    fn load_config_from_app_config() {
        let app = AppConfig::default();
        let load = LoadConfig::from(&app);
        assert_eq!(load.location, DEFAULT_SOURCE_URL);
        assert_eq!(load.columns, ColumnNames::default());
        assert!(load.validate().is_ok());
    }

    #[test]
    fn overrides_win_over_file_values() {
        let load = LoadConfig::from(&AppConfig::default()).with_overrides(
            Some("local.csv"),
            None,
            Some("VIZINHO"),
        );
        assert_eq!(load.location, "local.csv");
        assert_eq!(load.columns.entity, "NM_MUN");
        assert_eq!(load.columns.neighbor, "VIZINHO");
    }

    #[test]
    fn validation_rejects_zero_timeout() {
        let mut load = LoadConfig::from(&AppConfig::default());
        load.timeout_secs = 0;
        let err = load.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn load_config_from_file() {
        let path = std::env::temp_dir().join(format!("limitrofe-config-{}.toml", std::process::id()));
        std::fs::write(&path, "[source]\ntimeout_secs = 5\n").expect("write config");
        let config = load_config_from(&path).expect("load");
        std::fs::remove_file(&path).ok();
        assert_eq!(config.source.timeout_secs, 5);
        assert_eq!(config.source.location, DEFAULT_SOURCE_URL);
    }
}
