use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::{Matcher, PartitionKind, QueueDiscipline};
use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    /// Seed used when a request does not carry one; unset means fresh entropy per run
    pub default_seed: Option<u64>,
    #[serde(default)]
    pub queue_discipline: QueueDiscipline,
    #[serde(default)]
    pub partition_strategy: PartitionKind,
    #[serde(default = "default_max_members")]
    pub max_members: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_seed: None,
            queue_discipline: QueueDiscipline::default(),
            partition_strategy: PartitionKind::default(),
            max_members: default_max_members(),
        }
    }
}

fn default_max_members() -> usize { 2000 }

impl MatchingSettings {
    pub fn matcher(&self) -> Matcher {
        Matcher::new(self.queue_discipline, self.partition_strategy)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_agreement_weight")]
    pub agreement: f64,
    #[serde(default = "default_rarity_weight")]
    pub rarity: f64,
    #[serde(default = "default_cohort_weight")]
    pub cohort: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            agreement: default_agreement_weight(),
            rarity: default_rarity_weight(),
            cohort: default_cohort_weight(),
        }
    }
}

fn default_agreement_weight() -> f64 { 1.0 }
fn default_rarity_weight() -> f64 { 0.0 }
fn default_cohort_weight() -> f64 { 0.5 }

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            agreement: config.agreement,
            rarity: config.rarity,
            cohort: config.cohort,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with LUME_)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., LUME__MATCHING__MAX_MEMBERS -> matching.max_members
            .add_source(
                Environment::with_prefix("LUME")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("LUME")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
