use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub feed: FeedSettings,
    pub extraction: ExtractionSettings,
    pub presentation: PresentationSettings,
    pub scoring: ScoringSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedSettings {
    pub url: String,
    #[serde(default = "default_feed_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

fn default_feed_timeout() -> u64 {
    15
}
fn default_cache_ttl() -> u64 {
    600
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionSettings {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    #[serde(default = "default_extraction_timeout")]
    pub timeout_secs: u64,
}

fn default_extraction_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct PresentationSettings {
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "default_expanded_limit")]
    pub expanded_limit: usize,
}

fn default_limit() -> usize {
    5
}
fn default_expanded_limit() -> usize {
    20
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f64,
}

fn default_fuzzy_threshold() -> f64 {
    0.75
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_city_weight")]
    pub city: i64,
    #[serde(default = "default_city_mention_weight")]
    pub city_mention: i64,
    #[serde(default = "default_city_fuzzy_weight")]
    pub city_fuzzy: i64,
    #[serde(default = "default_date_overlap_weight")]
    pub date_overlap: i64,
    #[serde(default = "default_title_word_weight")]
    pub title_word: i64,
    #[serde(default = "default_description_word_weight")]
    pub description_word: i64,
    #[serde(default = "default_category_weight")]
    pub category: i64,
    #[serde(default = "default_free_weight")]
    pub free: i64,
    #[serde(default = "default_baseline_weight")]
    pub baseline: i64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            city: default_city_weight(),
            city_mention: default_city_mention_weight(),
            city_fuzzy: default_city_fuzzy_weight(),
            date_overlap: default_date_overlap_weight(),
            title_word: default_title_word_weight(),
            description_word: default_description_word_weight(),
            category: default_category_weight(),
            free: default_free_weight(),
            baseline: default_baseline_weight(),
        }
    }
}

impl From<WeightsConfig> for ScoringWeights {
    fn from(config: WeightsConfig) -> Self {
        Self {
            city: config.city,
            city_mention: config.city_mention,
            city_fuzzy: config.city_fuzzy,
            date_overlap: config.date_overlap,
            title_word: config.title_word,
            description_word: config.description_word,
            category: config.category,
            free: config.free,
            baseline: config.baseline,
        }
    }
}

fn default_city_weight() -> i64 {
    50
}
fn default_city_mention_weight() -> i64 {
    20
}
fn default_city_fuzzy_weight() -> i64 {
    35
}
fn default_date_overlap_weight() -> i64 {
    40
}
fn default_title_word_weight() -> i64 {
    100
}
fn default_description_word_weight() -> i64 {
    30
}
fn default_category_weight() -> i64 {
    60
}
fn default_free_weight() -> i64 {
    15
}
fn default_baseline_weight() -> i64 {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with AGENDA_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with AGENDA_)
            // e.g., AGENDA_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("AGENDA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("AGENDA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Honor the conventional environment variables directly.
/// GEMINI_API_KEY takes precedence over the file value, matching the
/// original deployment's .env convention.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let api_key = env::var("GEMINI_API_KEY")
        .or_else(|_| env::var("AGENDA_EXTRACTION__API_KEY"))
        .ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(api_key) = api_key {
        builder = builder.set_override("extraction.api_key", api_key)?;
    }

    builder.build()
}
