use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::extract::models::Criteria;

/// Runtime configuration for docsift
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Criteria applied when the command line selects none
    pub criteria: CriteriaConfig,

    /// Colors used for markup provenance in the report
    pub colors: MarkupColors,
}

/// Default extraction criteria. All enabled unless the file says otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CriteriaConfig {
    pub redline: bool,
    pub highlight: bool,
    pub square_brackets: bool,
    pub comments: bool,
    pub footnotes: bool,
    pub endnotes: bool,
}

impl Default for CriteriaConfig {
    fn default() -> Self {
        CriteriaConfig {
            redline: true,
            highlight: true,
            square_brackets: true,
            comments: true,
            footnotes: true,
            endnotes: true,
        }
    }
}

impl CriteriaConfig {
    pub fn to_criteria(&self) -> Criteria {
        Criteria {
            redline: self.redline,
            highlight: self.highlight,
            square_brackets: self.square_brackets,
            comments: self.comments,
            footnotes: self.footnotes,
            endnotes: self.endnotes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupColors {
    pub insertion: String,
    pub deletion: String,
    pub move_from: String,
    pub move_to: String,
    pub comment_anchor: String,
    pub footnote_anchor: String,
    pub endnote_anchor: String,
}

impl Default for MarkupColors {
    fn default() -> Self {
        MarkupColors {
            insertion: "#0000CC".to_string(),       // Blue
            deletion: "#CC0000".to_string(),        // Red
            move_from: "#2E8B57".to_string(),       // Sea Green
            move_to: "#2E8B57".to_string(),         // Sea Green
            comment_anchor: "#C45911".to_string(),  // Burnt Orange
            footnote_anchor: "#7030A0".to_string(), // Purple
            endnote_anchor: "#1F6FC5".to_string(),  // Steel Blue
        }
    }
}

impl Config {
    /// Load configuration from the config directory
    pub fn load() -> Result<Self> {
        if let Some(config_path) = Self::get_config_path() {
            if config_path.exists() {
                let content = fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&content)?;
                return Ok(config);
            }
        }

        // Return defaults if no config found
        Ok(Config::default())
    }

    /// Save configuration to the config directory
    pub fn save(&self) -> Result<()> {
        if let Some(config_path) = Self::get_config_path() {
            // Create config directory if it doesn't exist
            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent)?;
            }

            let content = toml::to_string_pretty(self)?;
            fs::write(&config_path, content)?;
        }

        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("docsift").join("config.toml"))
    }

    /// Initialize a default config file
    pub fn init_default() -> Result<()> {
        let config = Config::default();
        config.save()?;
        Ok(())
    }
}
