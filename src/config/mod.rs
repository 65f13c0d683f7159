use crate::logging::LoggingConfig;
use crate::visualization::FigureStyle;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub grid: GridConfig,
    pub logging: LoggingConfig,
}

/// Defaults for the image grid viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Cell edge length in inches
    pub size: f32,
    pub rows: usize,
    /// Pixels per inch when a figure is rendered
    pub dpi: f32,
    pub background: [u8; 3],
    pub frame_color: [u8; 3],
    pub title_font_size: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        let style = FigureStyle::default();
        Self {
            size: 3.0,
            rows: 1,
            dpi: 100.0,
            background: style.background,
            frame_color: style.frame_color,
            title_font_size: style.title_font_size,
        }
    }
}

impl GridConfig {
    pub fn style(&self) -> FigureStyle {
        FigureStyle {
            background: self.background,
            frame_color: self.frame_color,
            title_font_size: self.title_font_size,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = fs::read_to_string(path)?;

        if content.trim_start().starts_with('{') {
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(toml::from_str(&content)?)
        }
    }

    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !(self.grid.size.is_finite() && self.grid.size > 0.0) {
            errors.push("Grid size must be positive".to_string());
        }

        if self.grid.rows == 0 {
            errors.push("Grid rows must be at least 1".to_string());
        }

        if !(self.grid.dpi.is_finite() && self.grid.dpi > 0.0) {
            errors.push("Grid dpi must be positive".to_string());
        }

        if self.grid.title_font_size < 0.0 {
            errors.push("Title font size must be non-negative".to_string());
        }

        if let Err(error) = self.logging.validate() {
            errors.push(error);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
