use std::path::{Path, PathBuf};

use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CatalogEntry};
use crate::error::ScourError;
use crate::mock::{GeneratorSettings, MAX_DELAY_SCALE};

/// User configuration loaded from `~/.config/scour/config.toml`.
///
/// All fields have sensible defaults so the config file is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_min_files")]
    pub min_files: usize,
    #[serde(default = "default_max_files")]
    pub max_files: usize,
    /// Multiplier for the simulated disk I/O delay. `0` disables sleeping.
    #[serde(default = "default_delay_scale")]
    pub delay_scale: f64,
    pub seed: Option<u64>,
    /// Width of the options pane, in percent of the terminal.
    #[serde(default = "default_options_width")]
    pub options_width: u16,
    pub log_file: Option<PathBuf>,
    #[serde(default)]
    pub catalog: Vec<CatalogEntry>,
}

fn default_min_files() -> usize {
    5
}

fn default_max_files() -> usize {
    50
}

fn default_delay_scale() -> f64 {
    1.0
}

fn default_options_width() -> u16 {
    20
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_files: default_min_files(),
            max_files: default_max_files(),
            delay_scale: default_delay_scale(),
            seed: None,
            options_width: default_options_width(),
            log_file: None,
            catalog: Vec::new(),
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when `None`.
    /// A missing default file yields the defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> color_eyre::Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ScourError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScourError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ScourError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ScourError> {
        if self.min_files > self.max_files {
            return Err(ScourError::InvalidConfig(format!(
                "min_files ({}) is greater than max_files ({})",
                self.min_files, self.max_files
            )));
        }
        if !(0.0..=MAX_DELAY_SCALE).contains(&self.delay_scale) {
            return Err(ScourError::InvalidConfig(format!(
                "delay_scale must be between 0 and {MAX_DELAY_SCALE}, got {}",
                self.delay_scale
            )));
        }
        if !(5..=80).contains(&self.options_width) {
            return Err(ScourError::InvalidConfig(format!(
                "options_width must be between 5 and 80, got {}",
                self.options_width
            )));
        }
        if !self.catalog.is_empty() {
            self.catalog().validate()?;
        }
        Ok(())
    }

    /// The configured catalog, or the built-in one when none is configured.
    pub fn catalog(&self) -> Catalog {
        if self.catalog.is_empty() {
            Catalog::default()
        } else {
            Catalog::new(self.catalog.clone())
        }
    }

    pub fn generator_settings(&self) -> GeneratorSettings {
        GeneratorSettings {
            min_files: self.min_files,
            max_files: self.max_files,
            delay_scale: self.delay_scale,
            seed: self.seed,
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| Self::project_dirs().map(|dirs| dirs.data_dir().join("scour.log")))
    }

    pub fn home_dir() -> Result<PathBuf, ScourError> {
        BaseDirs::new()
            .map(|dirs| dirs.home_dir().to_path_buf())
            .ok_or(ScourError::NoHomeDir)
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "scour")
    }
}
