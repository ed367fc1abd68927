use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{fs, io};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

pub const CONFIG_ENV_VAR: &str = "NEON_SNAKE_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "neon_snake.json";
pub const MAX_TILES: u16 = 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

#[derive(PartialEq, Eq, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodPlacement {
    /// Any cell, occupied or not.
    Uniform,
    /// Only cells the snake does not cover.
    AvoidSnake,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub cell_px: u16,
    pub max_board_px: u16,
    pub board_margin_px: u16,
    pub hud_px: u16,
    pub min_tiles: u16,
    pub initial_interval_ms: u64,
    pub speed_step_ms: u64,
    pub min_interval_ms: u64,
    pub speed_up_every: u32,
    pub max_catch_up_ticks: u32,
    pub food_placement: FoodPlacement,
    pub store_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            cell_px: 20,
            max_board_px: 400,
            board_margin_px: 40,
            hud_px: 40,
            min_tiles: 5,
            initial_interval_ms: 150,
            speed_step_ms: 10,
            min_interval_ms: 50,
            speed_up_every: 5,
            max_catch_up_ticks: 3,
            food_placement: FoodPlacement::AvoidSnake,
            store_path: PathBuf::from("neon_snake_scores.json"),
        }
    }
}

impl GameConfig {
    pub fn initial_interval(&self) -> Duration {
        Duration::from_millis(self.initial_interval_ms)
    }

    pub fn speed_step(&self) -> Duration {
        Duration::from_millis(self.speed_step_ms)
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_px == 0 {
            return Err(ConfigError::Invalid("cell_px must be positive"));
        }
        if self.min_tiles == 0 {
            return Err(ConfigError::Invalid("min_tiles must be positive"));
        }
        if self.min_tiles > MAX_TILES {
            return Err(ConfigError::Invalid("min_tiles must not exceed 1024"));
        }
        if self.speed_up_every == 0 {
            return Err(ConfigError::Invalid("speed_up_every must be positive"));
        }
        if self.min_interval_ms == 0 {
            return Err(ConfigError::Invalid("min_interval_ms must be positive"));
        }
        if self.min_interval_ms > self.initial_interval_ms {
            return Err(ConfigError::Invalid(
                "min_interval_ms must not exceed initial_interval_ms",
            ));
        }
        Ok(())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GameConfig =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the config named by `NEON_SNAKE_CONFIG`, else `neon_snake.json`.
    /// A missing default file is not an error; any other failure falls back
    /// to defaults with a warning.
    pub fn load() -> Self {
        let (path, explicit) = match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => (PathBuf::from(path), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        if !explicit && !path.exists() {
            return GameConfig::default();
        }

        match GameConfig::from_file(&path) {
            Ok(config) => {
                info!(path = %path.display(), "loaded config");
                config
            }
            Err(e) => {
                warn!("{e}; using defaults");
                GameConfig::default()
            }
        }
    }
}
