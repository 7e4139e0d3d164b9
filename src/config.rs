// Configuration module for reading Bot.toml
// Holds the tunables of the engine and the defaults used by the host

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub board: BoardConfig,
    pub search: SearchConfig,
}

/// Board size used when a setup request does not carry one
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BoardConfig {
    pub rows: usize,
    pub cols: usize,
}

/// Search constants
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SearchConfig {
    /// Plies explored per decision; worst-case work grows as 6^max_depth
    pub max_depth: u8,
    /// Search the bot's first moves on separate graph copies with rayon
    pub parallel_root: bool,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Bot.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, String> {
        let config: Config =
            toml::from_str(contents).map_err(|e| format!("Failed to parse config file: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the engine cannot play with
    pub fn validate(&self) -> Result<(), String> {
        if self.search.max_depth == 0 {
            return Err("search.max_depth must be at least 1".to_string());
        }
        if self.board.rows == 0 || self.board.cols == 0 {
            return Err(format!(
                "board must have at least one row and column, got {}x{}",
                self.board.rows, self.board.cols
            ));
        }
        Ok(())
    }

    /// Loads default configuration from Bot.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Bot.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Bot.toml
    pub fn default_hardcoded() -> Self {
        Config {
            board: BoardConfig { rows: 9, cols: 16 },
            search: SearchConfig {
                max_depth: 5,
                parallel_root: false,
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            eprintln!("Warning: Could not load Bot.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}
