use std::{
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result, anyhow};
use jsonschema::{JSONSchema, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    engine::EngineSettings, observability::metrics::MetricsRuntime, reasoning::CredentialRef,
    selection::AssistedSettings,
};

pub const DEFAULT_CONFIG_FILE: &str = "atelier.jsonc";
const SCHEMA_FILE: &str = "atelier.schema.json";
const BUNDLED_SCHEMA: &str = include_str!("../atelier.schema.json");

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub assisted: AssistedConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

fn default_enabled_true() -> bool {
    true
}

fn default_assisted_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_assisted_timeout_ms() -> u64 {
    5_000
}

fn default_assisted_max_output_tokens() -> u32 {
    500
}

fn default_assisted_temperature() -> f32 {
    0.8
}

fn default_logging_dir() -> PathBuf {
    PathBuf::from("./logs")
}

fn default_logging_filter() -> String {
    "info".to_string()
}

fn default_logging_rotation() -> LoggingRotation {
    LoggingRotation::Daily
}

fn default_logging_retention_days() -> usize {
    14
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssistedConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_assisted_model")]
    pub model: String,
    #[serde(default)]
    pub credential: CredentialRef,
    #[serde(default = "default_assisted_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_assisted_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default = "default_assisted_temperature")]
    pub temperature: f32,
}

impl Default for AssistedConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            model: default_assisted_model(),
            credential: CredentialRef::None,
            timeout_ms: default_assisted_timeout_ms(),
            max_output_tokens: default_assisted_max_output_tokens(),
            temperature: default_assisted_temperature(),
        }
    }
}

impl AssistedConfig {
    pub fn settings(&self) -> AssistedSettings {
        AssistedSettings {
            timeout: self.timeout(),
            max_output_tokens: self.max_output_tokens,
            temperature: self.temperature,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Preset catalog file; the built-in catalog is used when absent.
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub strategy_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LoggingRotation {
    Daily,
    Hourly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_logging_filter")]
    pub filter: String,
    #[serde(default = "default_logging_rotation")]
    pub rotation: LoggingRotation,
    #[serde(default = "default_logging_retention_days")]
    pub retention_days: usize,
    #[serde(default = "default_enabled_true")]
    pub stderr_warn_enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_logging_dir(),
            filter: default_logging_filter(),
            rotation: default_logging_rotation(),
            retention_days: default_logging_retention_days(),
            stderr_warn_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetricsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub listen_addr: Option<SocketAddr>,
}

impl MetricsConfig {
    pub fn listen_addr(&self) -> SocketAddr {
        self.listen_addr
            .unwrap_or_else(MetricsRuntime::default_listen_addr)
    }
}

impl Config {
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config_value: Value = json5::from_str(&config_content)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;

        let config_base = config_path.parent().unwrap_or_else(|| Path::new("."));
        let schema = resolve_schema(config_base, &config_value)?;
        validate_against_schema(&config_value, &schema)?;

        let mut config: Config =
            serde_json::from_value(config_value).context("failed to deserialize atelier config")?;

        for path in [&mut config.catalog.path, &mut config.catalog.strategy_path]
            .into_iter()
            .flatten()
        {
            if !path.is_absolute() {
                *path = config_base.join(&*path);
            }
        }
        if !config.logging.dir.is_absolute() {
            config.logging.dir = config_base.join(&config.logging.dir);
        }
        if config.assisted.enabled && config.assisted.endpoint.is_none() {
            return Err(anyhow!("assisted.enabled requires assisted.endpoint"));
        }

        Ok(config)
    }

    /// Loads the file when it exists, otherwise returns the built-in defaults.
    pub fn load_or_default(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            Self::load(config_path)
        } else {
            Ok(Self::default())
        }
    }
}

fn resolve_schema(config_base: &Path, config_value: &Value) -> Result<Value> {
    let schema_path = match config_value.get("$schema").and_then(|value| value.as_str()) {
        Some(path_text) => {
            let configured = PathBuf::from(path_text);
            Some(if configured.is_absolute() {
                configured
            } else {
                config_base.join(&configured)
            })
        }
        None => Some(config_base.join(SCHEMA_FILE)).filter(|path| path.exists()),
    };

    let (schema_content, origin) = match &schema_path {
        Some(path) => (
            fs::read_to_string(path)
                .with_context(|| format!("failed to read schema {}", path.display()))?,
            path.display().to_string(),
        ),
        None => (BUNDLED_SCHEMA.to_string(), "bundled schema".to_string()),
    };

    serde_json::from_str(&schema_content).with_context(|| format!("failed to parse {origin}"))
}

fn validate_against_schema(config_value: &Value, schema: &Value) -> Result<()> {
    let compiled =
        JSONSchema::compile(schema).map_err(|e| anyhow!("failed to compile schema: {e}"))?;

    match compiled.validate(config_value) {
        Ok(()) => Ok(()),
        Err(errors_iter) => {
            let validation_errors: Vec<ValidationError> = errors_iter.collect();
            let messages: Vec<String> = validation_errors
                .into_iter()
                .map(|error| error.to_string())
                .collect();
            Err(anyhow!("config validation failed: {}", messages.join("; ")))
        }
    }
}
