//! Viewer configuration.

use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

pub const DEFAULT_PATH: &str = "quadview.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub tree: TreeConfig,
    #[serde(default)]
    pub spawn: SpawnConfig,
    #[serde(default)]
    pub select: SelectConfig,
}

impl Config {
    /// Load configuration from an explicitly requested `path`. A missing file
    /// is an error.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config =
            Self::parse(&contents).with_context(|| format!("parsing {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`, falling back to defaults when the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            info!("No {} found, using default config", path.display());
            Ok(Self::default())
        }
    }

    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.window.width > 0.0 && self.window.height > 0.0,
            "window size must be positive"
        );
        ensure!(self.tree.capacity > 0, "tree capacity must be at least 1");
        ensure!(
            0.0 <= self.select.min_radius && self.select.min_radius <= self.select.max_radius,
            "select radius bounds are inverted"
        );
        ensure!(
            self.select.step.is_finite() && self.select.step > 0.0,
            "select radius step must be positive"
        );
        ensure!(self.spawn.jitter >= 0.0, "spawn jitter must not be negative");
        Ok(())
    }
}

/// Window size; the tree boundary covers the whole window.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WindowConfig {
    #[serde(default = "default_window_size")]
    pub width: f32,
    #[serde(default = "default_window_size")]
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_window_size(),
            height: default_window_size(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TreeConfig {
    /// Points per node before subdivision.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            max_depth: default_max_depth(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SpawnConfig {
    /// Points added at startup and per frame while F4 is held.
    #[serde(default = "default_spawn_count")]
    pub count: usize,
    /// Maximum offset from the cursor for right-click spawns.
    #[serde(default = "default_jitter")]
    pub jitter: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            count: default_spawn_count(),
            jitter: default_jitter(),
        }
    }
}

/// Cursor region sizing.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SelectConfig {
    #[serde(default = "default_radius")]
    pub radius: f32,
    #[serde(default = "default_min_radius")]
    pub min_radius: f32,
    #[serde(default = "default_max_radius")]
    pub max_radius: f32,
    /// Radius change per wheel notch.
    #[serde(default = "default_radius_step")]
    pub step: f32,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            min_radius: default_min_radius(),
            max_radius: default_max_radius(),
            step: default_radius_step(),
        }
    }
}

fn default_window_size() -> f32 {
    800.0
}
fn default_capacity() -> usize {
    quadview::DEFAULT_CAPACITY
}
fn default_max_depth() -> usize {
    quadview::DEFAULT_MAX_DEPTH
}
fn default_spawn_count() -> usize {
    90
}
fn default_jitter() -> f32 {
    10.0
}
fn default_radius() -> f32 {
    100.0
}
fn default_min_radius() -> f32 {
    50.0
}
fn default_max_radius() -> f32 {
    200.0
}
fn default_radius_step() -> f32 {
    10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.window.width, 800.0);
        assert_eq!(config.tree.capacity, 4);
        assert_eq!(config.spawn.count, 90);
        assert_eq!(config.select.radius, 100.0);
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::parse(
            r#"
            [tree]
            capacity = 8

            [select]
            max_radius = 300.0
            "#,
        )
        .unwrap();
        assert_eq!(config.tree.capacity, 8);
        assert_eq!(config.tree.max_depth, quadview::DEFAULT_MAX_DEPTH);
        assert_eq!(config.select.max_radius, 300.0);
        assert_eq!(config.select.min_radius, 50.0);
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(Config::parse(&text).unwrap(), config);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.tree.capacity = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.select.min_radius = 300.0;
        assert!(config.validate().is_err());

        assert!(Config::parse("[window]\nwidth = \"wide\"").is_err());
    }

    #[test]
    fn test_validate_rejects_bad_radius_step() {
        for step in [0.0, -10.0, f32::NAN, f32::INFINITY] {
            let mut config = Config::default();
            config.select.step = step;
            assert!(config.validate().is_err(), "step {step} accepted");
        }

        let config = Config::parse("[select]\nstep = -5.0").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_default_file_falls_back_to_defaults() {
        let config = Config::load_or_default(Path::new("definitely/not/here.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = Config::load(Path::new("definitely/not/here.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("definitely/not/here.toml"));
    }
}
