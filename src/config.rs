// ABOUTME: Configuration module for the deckgen application
// ABOUTME: Provides configuration settings, environment variable handling and template listing

use crate::errors::{DeckError, Result};
use crate::layout::{ImagePlacement, LayoutOptions};
use crate::pptx::PackageConfig;
use log::info;
use std::env;
use std::path::{Path, PathBuf};

/// Global configuration for the application
pub struct Config {
    pub default_theme: String,
    pub aspect_ratio: String,
    pub templates_dir: PathBuf,
    pub fetch_timeout_ms: u64,
    pub image_placement: ImagePlacement,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_theme: "modern".to_string(),
            aspect_ratio: "16:9".to_string(),
            templates_dir: PathBuf::from("templates"),
            fetch_timeout_ms: 10000, // 10 seconds
            image_placement: ImagePlacement::SideColumn,
        }
    }
}

impl Config {
    /// Create a new configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default_theme = env::var("DECKGEN_THEME").unwrap_or_else(|_| "modern".to_string());
        let aspect_ratio =
            env::var("DECKGEN_ASPECT_RATIO").unwrap_or_else(|_| "16:9".to_string());
        let templates_dir = env::var("DECKGEN_TEMPLATES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("templates"));
        let fetch_timeout_ms = env::var("DECKGEN_FETCH_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(10000);
        let image_placement = match env::var("DECKGEN_IMAGE_PLACEMENT").ok().as_deref() {
            Some("top") => ImagePlacement::TopBand,
            _ => ImagePlacement::SideColumn,
        };

        Self {
            default_theme,
            aspect_ratio,
            templates_dir,
            fetch_timeout_ms,
            image_placement,
        }
    }

    /// Get layout options with defaults from this config
    pub fn get_layout_options(&self, top_band: bool) -> LayoutOptions {
        LayoutOptions {
            image_placement: if top_band {
                ImagePlacement::TopBand
            } else {
                self.image_placement
            },
        }
    }

    /// Get a package configuration with defaults
    pub fn get_package_config(
        &self,
        title: Option<String>,
        aspect_ratio: Option<String>,
        template: Option<String>,
    ) -> PackageConfig {
        PackageConfig {
            title: title.unwrap_or_else(|| "Presentation".to_string()),
            aspect_ratio: aspect_ratio.unwrap_or_else(|| self.aspect_ratio.clone()),
            template,
        }
    }
}

/// List available presentation templates by name: every `*.pptx` file in the
/// directory, without its extension. A missing directory yields an empty list.
pub fn list_templates(dir: &Path) -> Result<Vec<String>> {
    if !dir.exists() {
        info!("Templates directory {:?} does not exist", dir);
        return Ok(Vec::new());
    }

    let glob_pattern = format!("{}/*.pptx", dir.to_string_lossy());
    let mut names = Vec::new();

    for entry in (glob::glob(&glob_pattern)
        .map_err(|e| DeckError::ConfigError(format!("Invalid glob pattern: {}", e)))?)
    .flatten()
    {
        if let Some(stem) = entry.file_stem() {
            names.push(stem.to_string_lossy().to_string());
        }
    }

    names.sort();
    info!("Found {} template files in {:?}", names.len(), dir);
    Ok(names)
}

/// Check that a requested template exists in the templates directory.
pub fn validate_template(name: &str, dir: &Path) -> Result<()> {
    let available = list_templates(dir)?;
    if available.is_empty() {
        return Err(DeckError::NoTemplatesFoundError(format!(
            "{}/*.pptx",
            dir.to_string_lossy()
        )));
    }
    if !available.iter().any(|t| t == name) {
        return Err(DeckError::ValidationError(format!(
            "Unknown template '{}'; available: {}",
            name,
            available.join(", ")
        )));
    }
    Ok(())
}
