//! Configuration module.
//!
//! Handles loading, validating, and merging an optional TOML config file.
//! Stock defaults are overridden by the file, and command-line flags override
//! both (that last step lives in `main.rs`).
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [canvas]
//! width = 1080              # Output width in pixels
//! height = 1350             # Output height in pixels
//! background = "white"      # CSS color name for the bars
//!
//! [output]
//! quality = 75              # JPEG quality, clamped to 1-100
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! # Square posts on a black background
//! [canvas]
//! height = 1080
//! background = "black"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{MaximizeOptions, Quality, Rotation, TargetBox};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tool configuration loaded from a TOML file.
///
/// All fields have defaults; a file only needs the values it changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Output canvas size and fill.
    pub canvas: CanvasConfig,
    /// Encoder settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    /// CSS color name; unknown names fall back to white at run time.
    pub background: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        let target = TargetBox::default();
        Self {
            width: target.width,
            height: target.height,
            background: crate::imaging::DEFAULT_BACKGROUND.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// JPEG quality. Out-of-range values are clamped, not rejected.
    pub quality: i64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            quality: i64::from(Quality::default().value()),
        }
    }
}

impl Config {
    /// Validate values that can't be normalized.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ConfigError::Validation(
                "canvas.width and canvas.height must be non-zero".into(),
            ));
        }
        Ok(())
    }

    pub fn target(&self) -> TargetBox {
        TargetBox::new(self.canvas.width, self.canvas.height)
    }

    /// Letterbox options from this config, with the given rotation.
    pub fn options(&self, rotation: Rotation) -> MaximizeOptions {
        MaximizeOptions {
            rotation,
            background: self.canvas.background.clone(),
            quality: Quality::new(self.output.quality),
            target: self.target(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Config::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<Config, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, or the stock defaults when there is none.
///
/// An explicitly named file that doesn't exist is an error.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let overlay = path.map(load_raw_config).transpose()?;
    resolve_config(stock_defaults_value(), overlay)
}

/// Returns a fully-commented stock config file with all keys and explanations.
///
/// Printed by `--gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# InstaMax Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Command-line flags take precedence.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Output canvas
# ---------------------------------------------------------------------------
[canvas]
# Exact output size in pixels. 1080x1350 is Instagram's tallest portrait.
width = 1080
height = 1350

# Fill color for the bars around the image. Any CSS/HTML color name, matched
# case-sensitively. Unknown names fall back to "white".
background = "white"

# ---------------------------------------------------------------------------
# Encoding
# ---------------------------------------------------------------------------
[output]
# JPEG quality, 1 (smallest) to 100 (best). Values outside the range are
# clamped. Going above 95 rarely helps.
quality = 75
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_targets_instagram_portrait() {
        let config = Config::default();
        assert_eq!(config.target(), TargetBox::new(1080, 1350));
        assert_eq!(config.canvas.background, "white");
        assert_eq!(config.output.quality, 75);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
[canvas]
background = "black"
"##;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.canvas.background, "black");
        // Defaults preserved
        assert_eq!(config.canvas.width, 1080);
        assert_eq!(config.output.quality, 75);
    }

    #[test]
    fn options_clamp_quality() {
        let mut config = Config::default();
        config.output.quality = 0;
        assert_eq!(config.options(Rotation::None).quality.value(), 1);
        config.output.quality = 400;
        assert_eq!(config.options(Rotation::None).quality.value(), 100);
    }

    #[test]
    fn options_carry_rotation_and_target() {
        let mut config = Config::default();
        config.canvas.height = 1080;
        let options = config.options(Rotation::Clockwise);
        assert_eq!(options.rotation, Rotation::Clockwise);
        assert_eq!(options.target, TargetBox::new(1080, 1080));
        assert_eq!(options.background, "white");
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_without_file_is_default() {
        assert_eq!(load_config(None).unwrap(), Config::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("instamax.toml");
        fs::write(
            &path,
            r##"
[canvas]
width = 1080
height = 1080

[output]
quality = 90
"##,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.target(), TargetBox::new(1080, 1080));
        assert_eq!(config.output.quality, 90);
        // Unspecified values should be defaults
        assert_eq!(config.canvas.background, "white");
    }

    #[test]
    fn load_config_missing_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_config(Some(&tmp.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("instamax.toml");
        fs::write(&path, "this is not valid toml [[[").unwrap();

        let result = load_config(Some(&path));
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("instamax.toml");
        fs::write(&path, "[canvas]\ncolour = \"red\"\n").unwrap();

        assert!(matches!(
            load_config(Some(&path)),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn zero_canvas_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("instamax.toml");
        fs::write(&path, "[canvas]\nwidth = 0\n").unwrap();

        assert!(matches!(
            load_config(Some(&path)),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn negative_quality_is_accepted_and_clamped() {
        let overlay: toml::Value = toml::from_str("[output]\nquality = -5\n").unwrap();
        let config = resolve_config(stock_defaults_value(), Some(overlay)).unwrap();
        assert_eq!(config.options(Rotation::None).quality.value(), 1);
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_preserves_sibling_keys() {
        let overlay: toml::Value = toml::from_str("[canvas]\nwidth = 720").unwrap();
        let merged = merge_toml(stock_defaults_value(), overlay);
        assert_eq!(merged["canvas"]["width"].as_integer(), Some(720));
        assert_eq!(merged["canvas"]["height"].as_integer(), Some(1350));
        assert_eq!(merged["output"]["quality"].as_integer(), Some(75));
    }

    // =========================================================================
    // stock config tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: Config = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let value = stock_defaults_value();
        let table = value.as_table().unwrap();
        assert!(table.contains_key("canvas"));
        assert!(table.contains_key("output"));
    }
}
