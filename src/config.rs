use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub image: ImageSettings,
    #[serde(default)]
    pub outfit: OutfitSettings,
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
fn default_port() -> u16 { 8000 }

/// Where clothing items are loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    Json,
    Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_catalog_source")]
    pub source: CatalogSource,
    #[serde(default = "default_json_dir")]
    pub json_dir: PathBuf,
    /// JSON directory imported into Postgres at startup
    pub seed_dir: Option<PathBuf>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            source: default_catalog_source(),
            json_dir: default_json_dir(),
            seed_dir: None,
        }
    }
}

fn default_catalog_source() -> CatalogSource { CatalogSource::Json }
fn default_json_dir() -> PathBuf { PathBuf::from("data/clothing") }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default)]
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            api_key: String::new(),
            model: default_llm_model(),
            temperature: default_temperature(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

fn default_llm_endpoint() -> String { "https://api.openai.com/v1".to_string() }
fn default_llm_model() -> String { "gpt-4o-mini".to_string() }
fn default_temperature() -> f32 { 0.7 }
fn default_llm_timeout() -> u64 { 60 }

#[derive(Debug, Clone, Deserialize)]
pub struct ImageSettings {
    #[serde(default = "default_image_endpoint")]
    pub endpoint: String,
    pub api_key: Option<String>,
    #[serde(default = "default_image_model")]
    pub model: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_steps")]
    pub steps: u32,
    #[serde(default = "default_image_timeout")]
    pub timeout_secs: u64,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            endpoint: default_image_endpoint(),
            api_key: None,
            model: default_image_model(),
            width: default_width(),
            height: default_height(),
            steps: default_steps(),
            timeout_secs: default_image_timeout(),
        }
    }
}

impl ImageSettings {
    /// Image generation is skipped entirely without a key
    pub fn enabled(&self) -> bool {
        self.api_key.as_deref().map_or(false, |k| !k.trim().is_empty())
    }
}

fn default_image_endpoint() -> String { "https://api.together.xyz/v1".to_string() }
fn default_image_model() -> String { "black-forest-labs/FLUX.1-schnell".to_string() }
fn default_width() -> u32 { 768 }
fn default_height() -> u32 { 1024 }
fn default_steps() -> u32 { 4 }
fn default_image_timeout() -> u64 { 45 }

/// Where the shoe slot comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShoeSource {
    Catalog,
    Generated,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutfitSettings {
    #[serde(default = "default_shoe_source")]
    pub shoe_source: ShoeSource,
    #[serde(default = "default_palette_history")]
    pub palette_history: usize,
    #[serde(default = "default_top_matches")]
    pub top_matches: usize,
}

impl Default for OutfitSettings {
    fn default() -> Self {
        Self {
            shoe_source: default_shoe_source(),
            palette_history: default_palette_history(),
            top_matches: default_top_matches(),
        }
    }
}

fn default_shoe_source() -> ShoeSource { ShoeSource::Catalog }
fn default_palette_history() -> usize { 5 }
fn default_top_matches() -> usize { 5 }

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
    /// 1. Serde defaults on each section
    /// 2. Configuration files (config/default.toml, then config/local.toml)
    /// 3. Environment variables (prefixed with OUTFIT__)
    /// 4. Provider keys (OPENAI_API_KEY, TOGETHER_API_KEY, DATABASE_URL)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., OUTFIT__SERVER__PORT -> server.port
            .add_source(outfit_environment())
            .build()?;

        apply_provider_env(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(outfit_environment())
            .build()?;

        settings.try_deserialize()
    }
}

fn outfit_environment() -> Environment {
    Environment::with_prefix("OUTFIT")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Well-known provider variables win over file and prefixed settings
fn apply_provider_env(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    for (var, key) in [
        ("OPENAI_API_KEY", "llm.api_key"),
        ("TOGETHER_API_KEY", "image.api_key"),
        ("DATABASE_URL", "database.url"),
    ] {
        if let Ok(value) = env::var(var) {
            if !value.trim().is_empty() {
                builder = builder.set_override(key, value)?;
            }
        }
    }

    builder.build()
}
