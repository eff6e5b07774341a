//! # Config — Slider Options and the JSON File Format
//!
//! Everything tunable about a slider fits in one JSON document:
//!
//! ```json
//! {
//!   "images": ["covers/a.jpg", "covers/b.jpg"],
//!   "options": { "speed": 30, "gap": 10, "curve": 12, "direction": -1, "autoPlay": true },
//!   "base_dir": "assets",
//!   "window": { "title": "Releases", "width": 1280, "height": 720 },
//!   "clear_color": [0.0, 0.0, 0.0, 1.0],
//!   "load_timeout_ms": 10000
//! }
//! ```
//!
//! Every field is optional. Missing fields take the defaults below, so `{}`
//! is a valid (if empty) config.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::render::ClearColor;
use crate::scene_init::SceneInitOptions;

/// Numeric tuning for one slider mount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SliderOptions {
    /// Autoplay speed multiplier.
    pub speed: f32,
    /// Gap between slides, percent of the slide width.
    pub gap: f32,
    /// Curvature strength. 0 keeps slides flat.
    pub curve: f32,
    /// `-1` scrolls left, `1` scrolls right.
    pub direction: f32,
    /// Start the advance loop on mount.
    #[serde(alias = "auto_play")]
    pub auto_play: bool,
}

impl Default for SliderOptions {
    fn default() -> Self {
        Self {
            speed: 30.0,
            gap: 10.0,
            curve: 12.0,
            direction: -1.0,
            auto_play: false,
        }
    }
}

impl SliderOptions {
    /// Replace unusable values with defaults, logging each replacement.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let mut out = self;
        if !out.speed.is_finite() {
            log::warn!("speed {} is not finite, using {}", out.speed, defaults.speed);
            out.speed = defaults.speed;
        }
        if !out.gap.is_finite() || out.gap <= -100.0 {
            log::warn!("gap {} leaves no room for slides, using {}", out.gap, defaults.gap);
            out.gap = defaults.gap;
        }
        if !out.curve.is_finite() {
            log::warn!("curve {} is not finite, using {}", out.curve, defaults.curve);
            out.curve = defaults.curve;
        }
        if !out.direction.is_finite() || out.direction == 0.0 {
            log::warn!("direction {} is not ±1, using {}", out.direction, defaults.direction);
            out.direction = defaults.direction;
        }
        out
    }

    pub fn scene_init(&self) -> SceneInitOptions {
        SceneInitOptions {
            gap: self.gap,
            direction: self.direction,
            curve: self.curve,
        }
    }
}

/// Window settings for the standalone host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "curved-slider".to_owned(),
            width: 1280,
            height: 720,
        }
    }
}

/// A complete slider setup: images, options and host settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderConfig {
    pub images: Vec<String>,
    pub options: SliderOptions,
    /// Directory relative image paths resolve against.
    pub base_dir: Option<PathBuf>,
    pub window: WindowConfig,
    pub clear_color: [f64; 4],
    /// Give up on an image load after this many milliseconds. Unset waits forever.
    pub load_timeout_ms: Option<u64>,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            options: SliderOptions::default(),
            base_dir: None,
            window: WindowConfig::default(),
            clear_color: ClearColor::default().0,
            load_timeout_ms: None,
        }
    }
}

impl SliderConfig {
    /// Read and parse a config file.
    ///
    /// A relative `base_dir` is taken relative to the file's directory; with
    /// no `base_dir` images resolve against the file's directory itself.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_json(&text).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: Some(path.to_path_buf()),
                source,
            },
            other => other,
        })?;

        let dir = path.parent().unwrap_or_else(|| Path::new(""));
        config.base_dir = Some(match config.base_dir.take() {
            Some(base) if base.is_relative() => dir.join(base),
            Some(base) => base,
            None => dir.to_path_buf(),
        });
        Ok(config)
    }

    /// Parse a config from JSON text. Options are sanitized.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(text).map_err(|source| ConfigError::Parse { path: None, source })?;
        config.options = config.options.sanitized();
        Ok(config)
    }

    pub fn load_timeout(&self) -> Option<Duration> {
        self.load_timeout_ms.map(Duration::from_millis)
    }

    pub fn clear_color(&self) -> ClearColor {
        ClearColor(self.clear_color)
    }
}

/// Errors from reading a config file.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: Option<PathBuf>, source: serde_json::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read '{}': {source}", path.display()),
            Self::Parse { path: Some(path), source } => write!(f, "invalid config '{}': {source}", path.display()),
            Self::Parse { path: None, source } => write!(f, "invalid config: {source}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config = SliderConfig::from_json("{}").expect("valid json");
        assert_eq!(config, SliderConfig::default());
        assert_eq!(config.options.speed, 30.0);
        assert_eq!(config.options.gap, 10.0);
        assert_eq!(config.options.curve, 12.0);
        assert_eq!(config.options.direction, -1.0);
        assert!(!config.options.auto_play);
        assert_eq!(config.load_timeout(), None);
    }

    #[test]
    fn parses_camel_case_options() {
        let config = SliderConfig::from_json(
            r#"{ "images": ["a.png", "b.png"], "options": { "speed": 45, "autoPlay": true, "direction": 1 } }"#,
        )
        .expect("valid json");
        assert_eq!(config.images, vec!["a.png", "b.png"]);
        assert_eq!(config.options.speed, 45.0);
        assert!(config.options.auto_play);
        assert_eq!(config.options.direction, 1.0);
        assert_eq!(config.options.gap, 10.0);
    }

    #[test]
    fn snake_case_autoplay_is_accepted() {
        let config = SliderConfig::from_json(r#"{ "options": { "auto_play": true } }"#).expect("valid json");
        assert!(config.options.auto_play);
    }

    #[test]
    fn zero_direction_falls_back_to_default() {
        let config = SliderConfig::from_json(r#"{ "options": { "direction": 0, "gap": -150 } }"#).expect("valid json");
        assert_eq!(config.options.direction, -1.0);
        assert_eq!(config.options.gap, 10.0);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = SliderConfig::from_json("{ images: }").expect_err("invalid json");
        assert!(matches!(err, ConfigError::Parse { path: None, .. }));
    }

    #[test]
    fn load_resolves_base_dir_next_to_file() {
        let dir = std::env::temp_dir().join(format!("curved-slider-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        let path = dir.join("slider.json");
        std::fs::write(&path, r#"{ "base_dir": "covers", "load_timeout_ms": 2500 }"#).expect("write config");

        let config = SliderConfig::load(&path).expect("load config");
        assert_eq!(config.base_dir, Some(dir.join("covers")));
        assert_eq!(config.load_timeout(), Some(Duration::from_millis(2500)));

        std::fs::remove_dir_all(&dir).expect("clean up");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SliderConfig::load(Path::new("no/such/slider.json")).expect_err("missing");
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("slider.json"));
    }

    #[test]
    fn bundled_gallery_images_decode() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("examples/gallery.json");
        let config = SliderConfig::load(&path).expect("gallery config");
        let base = config.base_dir.clone().expect("base dir");
        assert!(!config.images.is_empty());
        for image in &config.images {
            let decoded = crate::texture::decode_rgba8(&base.join(image)).expect("bundled image");
            assert!(decoded.width > 0 && decoded.height > 0);
        }
    }
}
