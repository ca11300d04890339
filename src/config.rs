use crate::error::ConfigError;
use crate::extract::ExtractOptions;
use crate::providers::{DEFAULT_TIMEOUT_SECS, ProviderOptions};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Persisted settings at `~/.pageask/config.toml`.
///
/// The settings store is a collaborator of the core, not part of it: the
/// extractor and providers only ever see plain values resolved from here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Path to config.toml — computed, not serialized.
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Credential used when no explicit flag or env var is set.
    pub api_key: Option<String>,
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Override the provider's default model identifier.
    pub model: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub extraction: ExtractionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,
    #[serde(default = "default_max_headings")]
    pub max_headings: usize,
    #[serde(default = "default_lite_max_content_chars")]
    pub lite_max_content_chars: usize,
    #[serde(default = "default_lite_max_headings")]
    pub lite_max_headings: usize,
}

fn default_provider() -> String {
    "openai".into()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_content_chars() -> usize {
    8000
}

fn default_max_headings() -> usize {
    10
}

fn default_lite_max_content_chars() -> usize {
    5000
}

fn default_lite_max_headings() -> usize {
    5
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_content_chars: default_max_content_chars(),
            max_headings: default_max_headings(),
            lite_max_content_chars: default_lite_max_content_chars(),
            lite_max_headings: default_lite_max_headings(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            api_key: None,
            provider: default_provider(),
            model: None,
            timeout_secs: default_timeout_secs(),
            extraction: ExtractionConfig::default(),
        }
    }
}

impl Settings {
    /// Load the config file, creating it with defaults on first run.
    pub fn load_or_init() -> Result<Self, ConfigError> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .ok_or_else(|| ConfigError::Load("could not find home directory".into()))?;
        Self::load_or_init_at(&home.join(".pageask"))
    }

    /// Same as `load_or_init`, rooted at an explicit directory (test seam).
    pub fn load_or_init_at(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join("config.toml");

        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path)?;
            let mut settings: Settings = toml::from_str(&contents)
                .map_err(|e| ConfigError::Load(format!("failed to parse config file: {e}")))?;
            settings.config_path = config_path;
            settings.validate()?;
            Ok(settings)
        } else {
            let settings = Self {
                config_path: config_path.clone(),
                ..Self::default()
            };
            settings.save()?;
            Ok(settings)
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Load(format!("failed to serialize config: {e}")))?;
        fs::write(&self.config_path, contents)?;
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "timeout_secs must be at least 1".into(),
            ));
        }
        if self.extraction.max_content_chars == 0 || self.extraction.lite_max_content_chars == 0 {
            return Err(ConfigError::Validation(
                "extraction caps must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Options for the primary extractor with this config's caps applied.
    pub fn full_extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            max_content_chars: self.extraction.max_content_chars,
            max_headings: self.extraction.max_headings,
            ..ExtractOptions::full()
        }
    }

    /// Options for the lightweight extractor.
    pub fn lite_extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            max_content_chars: self.extraction.lite_max_content_chars,
            max_headings: self.extraction.lite_max_headings,
            ..ExtractOptions::lite()
        }
    }

    pub fn provider_options(&self, model_override: Option<&str>) -> ProviderOptions {
        ProviderOptions {
            model: model_override
                .map(ToString::to_string)
                .or_else(|| self.model.clone()),
            timeout_secs: self.timeout_secs,
        }
    }
}
