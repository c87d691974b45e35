//! Site configuration loading and resolution
//!
//! Resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file in the platform config directory
//! 4. Compiled defaults (fallback)
//!
//! A missing default config file is not an error; the compiled defaults are
//! used instead. An explicitly named file that is missing or malformed is.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::audio::Tone;
use crate::consent::BannerTiming;
use crate::cookie::{CookieAttributes, SameSite, DEFAULT_MAX_AGE_SECS};
use crate::{Error, Result};

/// Environment variable naming a config file
pub const CONFIG_ENV_VAR: &str = "DV_SITE_CONFIG";

/// Environment variable overriding the bind address
pub const BIND_ENV_VAR: &str = "DV_SITE_BIND";

/// Default listen address
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5740";

/// Top-level site configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub bind_addr: String,
    pub log_level: String,
    pub banner: BannerConfig,
    pub cookies: CookieConfig,
    pub audio: AudioConfig,
}

/// Consent banner timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BannerConfig {
    pub close_delay_ms: u64,
    pub frame_interval_ms: u64,
}

/// Attributes for cookies the site writes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieConfig {
    pub max_age_secs: u64,
    pub same_site: String,
}

/// Feedback tones
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Played when the consent banner appears
    pub notify: Tone,
    /// Played on page navigation
    pub click: Tone,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            log_level: "info".to_string(),
            banner: BannerConfig::default(),
            cookies: CookieConfig::default(),
            audio: AudioConfig::default(),
        }
    }
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            close_delay_ms: 260,
            frame_interval_ms: 16,
        }
    }
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            max_age_secs: DEFAULT_MAX_AGE_SECS,
            same_site: "Lax".to_string(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            notify: Tone::new(880.0, 180, 0.08),
            click: Tone::new(620.0, 60, 0.04),
        }
    }
}

impl SiteConfig {
    /// Parse and validate TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bind_addr.trim().is_empty() {
            return Err(Error::Config("bind_addr must not be empty".to_string()));
        }
        if self.banner.close_delay_ms == 0 {
            return Err(Error::Config("banner.close_delay_ms must be non-zero".to_string()));
        }
        if self.banner.frame_interval_ms == 0 {
            return Err(Error::Config(
                "banner.frame_interval_ms must be non-zero".to_string(),
            ));
        }
        if SameSite::from_str(&self.cookies.same_site).is_none() {
            return Err(Error::Config(format!(
                "cookies.same_site must be Strict, Lax or None, got {:?}",
                self.cookies.same_site
            )));
        }
        for (name, tone) in [("audio.notify", &self.audio.notify), ("audio.click", &self.audio.click)] {
            tone.validate()
                .map_err(|e| Error::Config(format!("{}: {}", name, e)))?;
        }
        Ok(())
    }

    pub fn banner_timing(&self) -> BannerTiming {
        BannerTiming {
            close_delay: Duration::from_millis(self.banner.close_delay_ms),
            frame_interval: Duration::from_millis(self.banner.frame_interval_ms),
            notify_tone: self.audio.notify,
        }
    }

    pub fn cookie_attributes(&self) -> CookieAttributes {
        CookieAttributes {
            max_age_secs: self.cookies.max_age_secs,
            path: "/".to_string(),
            same_site: SameSite::from_str(&self.cookies.same_site).unwrap_or_default(),
        }
    }
}

/// Platform config file location (`<config_dir>/doublevisuals/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("doublevisuals").join("config.toml"))
}

/// Combines command-line, environment and file sources
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    cli_config: Option<PathBuf>,
    cli_bind: Option<String>,
    default_path: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new(cli_config: Option<PathBuf>, cli_bind: Option<String>) -> Self {
        Self {
            cli_config,
            cli_bind,
            default_path: default_config_path(),
        }
    }

    /// Override the platform config path (tests, packaging)
    pub fn with_default_path(mut self, path: Option<PathBuf>) -> Self {
        self.default_path = path;
        self
    }

    pub fn resolve(&self) -> Result<SiteConfig> {
        let explicit = self
            .cli_config
            .clone()
            .or_else(|| std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => {
                info!("Loading config from {}", path.display());
                SiteConfig::load_file(&path)?
            }
            None => match self.default_path.as_ref().filter(|p| p.exists()) {
                Some(path) => {
                    info!("Loading config from {}", path.display());
                    SiteConfig::load_file(path)?
                }
                None => {
                    warn!("No config file found, using compiled defaults");
                    SiteConfig::default()
                }
            },
        };

        if let Some(bind) = self
            .cli_bind
            .clone()
            .or_else(|| std::env::var(BIND_ENV_VAR).ok())
        {
            config.bind_addr = bind;
        }

        config.validate()?;
        Ok(config)
    }
}
