// src/config.rs
//! Configuration file parsing
//!
//! The configuration lives at `$BUCKAROO_HOME/config.toml`, falling back to
//! `~/.buckaroo/config.toml`. Every setting has a default, so a missing
//! file is not an error:
//!
//! ```toml
//! io_threads = 10
//! sample_interval_ms = 100
//! telemetry_url = "https://telemetry.example.org/events"
//!
//! [[cookbook]]
//! name = "official"
//! path = "/home/me/.buckaroo/buckaroo-recipes"
//! ```
//!
//! The first cookbook is the default recipe source.

use crate::executor::DEFAULT_IO_THREADS;
use crate::identifier::Identifier;
use crate::pipeline::{DIAGNOSTICS_FILE, RenderSettings};
use crate::source::{LazyCookbookSource, SourceRef, SourceRegistry};
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Environment variable overriding the buckaroo home directory
pub const HOME_ENV: &str = "BUCKAROO_HOME";

pub const CONFIG_FILE: &str = "config.toml";

/// Name of the cookbook used when none is configured
pub const DEFAULT_COOKBOOK: &str = "official";

const DEFAULT_COOKBOOK_DIR: &str = "buckaroo-recipes";

/// TOML configuration file structure
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Threads for fetch work (at least 2)
    #[serde(default = "default_io_threads")]
    pub io_threads: usize,

    /// Milliseconds between painted frames
    #[serde(default = "default_sample_interval_ms")]
    pub sample_interval_ms: u64,

    /// Milliseconds before stats appear
    #[serde(default = "default_stats_warmup_ms")]
    pub stats_warmup_ms: u64,

    #[serde(default = "default_terminal_width")]
    pub terminal_width: usize,

    #[serde(default = "default_error_width")]
    pub error_width: usize,

    /// Endpoint for command telemetry; disabled when absent
    #[serde(default)]
    pub telemetry_url: Option<String>,

    /// Longest wait for telemetry before exiting
    #[serde(default = "default_telemetry_wait_ms")]
    pub telemetry_wait_ms: u64,

    /// Recipe cookbooks, default first
    #[serde(default, rename = "cookbook")]
    pub cookbooks: Vec<CookbookSection>,
}

/// A `[[cookbook]]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CookbookSection {
    pub name: String,
    pub path: PathBuf,
}

fn default_io_threads() -> usize {
    DEFAULT_IO_THREADS
}

fn default_sample_interval_ms() -> u64 {
    100
}

fn default_stats_warmup_ms() -> u64 {
    300
}

fn default_terminal_width() -> usize {
    80
}

fn default_error_width() -> usize {
    60
}

fn default_telemetry_wait_ms() -> u64 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            io_threads: default_io_threads(),
            sample_interval_ms: default_sample_interval_ms(),
            stats_warmup_ms: default_stats_warmup_ms(),
            terminal_width: default_terminal_width(),
            error_width: default_error_width(),
            telemetry_url: None,
            telemetry_wait_ms: default_telemetry_wait_ms(),
            cookbooks: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load `path` if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.sample_interval_ms == 0 {
            bail!("sample_interval_ms must be greater than 0");
        }
        if self.terminal_width == 0 || self.error_width == 0 {
            bail!("terminal_width and error_width must be greater than 0");
        }

        let mut seen = HashSet::new();
        for cookbook in &self.cookbooks {
            Identifier::parse(&cookbook.name)
                .with_context(|| format!("Invalid cookbook name: {}", cookbook.name))?;
            if !seen.insert(cookbook.name.as_str()) {
                bail!("Cookbook '{}' is configured more than once", cookbook.name);
            }
        }

        Ok(())
    }

    pub fn telemetry_wait(&self) -> Duration {
        Duration::from_millis(self.telemetry_wait_ms)
    }

    /// Render settings, with diagnostics in `working_dir`
    pub fn render_settings(&self, working_dir: &Path) -> RenderSettings {
        RenderSettings {
            sample_interval: Duration::from_millis(self.sample_interval_ms),
            stats_warmup: Duration::from_millis(self.stats_warmup_ms),
            width: self.terminal_width,
            error_width: self.error_width,
            diagnostics_path: working_dir.join(DIAGNOSTICS_FILE),
        }
    }

    /// Configured cookbooks, or the official one under `home`
    pub fn cookbooks(&self, home: &Path) -> Vec<CookbookSection> {
        if self.cookbooks.is_empty() {
            vec![CookbookSection {
                name: DEFAULT_COOKBOOK.to_string(),
                path: home.join(DEFAULT_COOKBOOK_DIR),
            }]
        } else {
            self.cookbooks.clone()
        }
    }

    /// Build the source registry; relative cookbook paths resolve against `home`
    pub fn registry(&self, home: &Path) -> Result<SourceRegistry> {
        let mut sources = self.cookbooks(home).into_iter().map(|cookbook| {
            let name = Identifier::parse(&cookbook.name)
                .with_context(|| format!("Invalid cookbook name: {}", cookbook.name))?;
            let root = home.join(&cookbook.path);
            Ok::<_, anyhow::Error>(SourceRef::new(LazyCookbookSource::new(name, root)))
        });

        let default = sources
            .next()
            .context("At least one cookbook must be configured")??;
        let mut registry = SourceRegistry::new(default);
        for source in sources {
            registry = registry.with_source(source?)?;
        }
        Ok(registry)
    }
}

/// The buckaroo home directory
pub fn home_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(home));
    }
    dirs::home_dir()
        .map(|home| home.join(".buckaroo"))
        .context("Could not determine the home directory; set BUCKAROO_HOME")
}

/// Default location of the configuration file
pub fn default_config_path() -> Result<PathBuf> {
    Ok(home_dir()?.join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::RecipeIdentifier;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.io_threads, 10);
        assert_eq!(config.sample_interval_ms, 100);
        assert_eq!(config.stats_warmup_ms, 300);
        assert_eq!(config.terminal_width, 80);
        assert_eq!(config.error_width, 60);
        assert!(config.telemetry_url.is_none());
        assert_eq!(config.telemetry_wait(), Duration::from_secs(1));

        let cookbooks = config.cookbooks(Path::new("/home/me/.buckaroo"));
        assert_eq!(cookbooks.len(), 1);
        assert_eq!(cookbooks[0].name, "official");
        assert_eq!(
            cookbooks[0].path,
            PathBuf::from("/home/me/.buckaroo/buckaroo-recipes")
        );
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_toml(
            r#"
            io_threads = 1
            sample_interval_ms = 50
            telemetry_url = "https://telemetry.example.org/events"

            [[cookbook]]
            name = "main"
            path = "/srv/recipes"

            [[cookbook]]
            name = "local"
            path = "local-recipes"
            "#,
        )
        .unwrap();

        assert_eq!(config.io_threads, 1);
        assert_eq!(
            config.render_settings(Path::new("/work")).sample_interval,
            Duration::from_millis(50)
        );
        assert_eq!(
            config.render_settings(Path::new("/work")).diagnostics_path,
            PathBuf::from("/work/buckaroo-stacktrace.log")
        );

        let registry = config.registry(Path::new("/home/me/.buckaroo")).unwrap();
        assert_eq!(registry.default_source().name().as_str(), "main");
        let local = registry
            .route(&RecipeIdentifier::parse("a/x@local").unwrap())
            .unwrap();
        assert_eq!(
            local.to_string(),
            "cookbook local (/home/me/.buckaroo/local-recipes)"
        );
    }

    #[test]
    fn test_validation() {
        let duplicate = r#"
            [[cookbook]]
            name = "main"
            path = "/a"

            [[cookbook]]
            name = "main"
            path = "/b"
        "#;
        assert!(Config::from_toml(duplicate).is_err());

        let invalid_name = r#"
            [[cookbook]]
            name = "-main"
            path = "/a"
        "#;
        assert!(Config::from_toml(invalid_name).is_err());

        assert!(Config::from_toml("terminal_width = 0").is_err());
        assert!(Config::from_toml("sample_interval_ms = 0").is_err());
        assert!(Config::from_toml("unknown_key = true").is_err());
    }

    #[test]
    fn test_load_or_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);

        let config = Config::load_or_default(&path).unwrap();
        assert_eq!(config.io_threads, DEFAULT_IO_THREADS);

        std::fs::write(&path, "io_threads = 4\n").unwrap();
        assert_eq!(Config::load_or_default(&path).unwrap().io_threads, 4);

        std::fs::write(&path, "io_threads = \"many\"\n").unwrap();
        let err = Config::load_or_default(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
