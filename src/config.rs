//! Application configuration.
//!
//! The configuration is a JSON file with two optional sections.  A minimal
//! `{}` file is valid and every value falls back to its compiled-in default.
//!
//! # Example
//!
//! ```json
//! {
//!   "overlay": {
//!     "duration_ms": 1000,
//!     "settle_delay_ms": 100,
//!     "font_size": 16,
//!     "font_path": "/usr/share/fonts/noto/NotoSans-Regular.ttf"
//!   },
//!   "colors": {
//!     "gui_background": [30, 30, 30, 255],
//!     "gui_client_master": [60, 130, 220, 255],
//!     "gui_client_slave": [110, 110, 110, 255],
//!     "gui_text": [235, 235, 235, 255]
//!   }
//! }
//! ```

use image::Rgba;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A straight-alpha RGBA color.
pub type Color = Rgba<u8>;

/// Fully transparent black, used for malformed color entries.
pub const ZERO_COLOR: Color = Rgba([0, 0, 0, 0]);

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Overlay timing and layout settings.
    #[serde(default)]
    pub overlay: OverlayConfig,

    /// Named colors, resolved into a [`Palette`] with [`Config::palette`].
    #[serde(default)]
    pub colors: ColorTable,
}

/// Overlay timing and layout settings.
///
/// Durations are in **milliseconds**.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// How long an overlay stays on screen.  Zero or negative disables the
    /// overlay entirely.
    pub duration_ms: i64,
    /// Delay between a trigger and the actual draw, so bursts of layout
    /// changes collapse onto the last state.
    pub settle_delay_ms: u64,
    /// Label font size in pixels.
    pub font_size: u32,
    /// Space above and below the label.
    pub font_margin: u32,
    /// Gap around client rectangles.
    pub rect_margin: u32,
    /// TrueType/OpenType font for the label.  When unset or unreadable the
    /// bundled font is used.
    pub font_path: Option<PathBuf>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            duration_ms: 1000,
            settle_delay_ms: 100,
            font_size: 16,
            font_margin: 4,
            rect_margin: 4,
            font_path: None,
        }
    }
}

impl OverlayConfig {
    /// Whether the overlay is switched on at all.
    pub fn enabled(&self) -> bool {
        self.duration_ms > 0
    }

    /// On-screen lifetime of one overlay (zero when disabled).
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms.max(0) as u64)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Height of the label row below the client rectangles.
    pub fn text_strip_height(&self) -> u32 {
        self.font_size
            .saturating_add(self.font_margin.saturating_mul(2))
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Resolve the color table once, so malformed entries are reported at
    /// load time rather than on every render.
    pub fn palette(&self) -> Palette {
        Palette::from_colors(&self.colors)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);

//  Colors

/// Color keys the overlay reads.
pub const BACKGROUND: &str = "gui_background";
pub const TEXT: &str = "gui_text";
pub const CLIENT_MASTER: &str = "gui_client_master";
pub const CLIENT_SLAVE: &str = "gui_client_slave";

/// Raw `name -> [r, g, b, a]` mapping as written in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorTable(HashMap<String, Vec<i64>>);

/// Why a color entry could not be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("no color named {0}")]
    Missing(String),
    #[error("color {name} has {len} channels, expected 4")]
    ChannelCount { name: String, len: usize },
    #[error("color {name} has channel value {value} outside 0..=255")]
    OutOfRange { name: String, value: i64 },
}

impl Default for ColorTable {
    fn default() -> Self {
        Self::new([
            (BACKGROUND, vec![30, 30, 30, 255]),
            (TEXT, vec![235, 235, 235, 255]),
            (CLIENT_MASTER, vec![60, 130, 220, 255]),
            (CLIENT_SLAVE, vec![110, 110, 110, 255]),
        ])
    }
}

impl ColorTable {
    pub fn new<'a>(entries: impl IntoIterator<Item = (&'a str, Vec<i64>)>) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(name, rgba)| (name.to_string(), rgba))
                .collect(),
        )
    }

    /// Look up and validate the entry for `name`.
    pub fn lookup(&self, name: &str) -> Result<Color, ColorError> {
        let rgba = self
            .0
            .get(name)
            .ok_or_else(|| ColorError::Missing(name.to_string()))?;
        if rgba.len() != 4 {
            return Err(ColorError::ChannelCount {
                name: name.to_string(),
                len: rgba.len(),
            });
        }
        let mut channels = [0u8; 4];
        for (channel, &value) in channels.iter_mut().zip(rgba) {
            *channel = u8::try_from(value).map_err(|_| ColorError::OutOfRange {
                name: name.to_string(),
                value,
            })?;
        }
        Ok(Rgba(channels))
    }

    /// Resolve `name`, falling back to [`ZERO_COLOR`] with a warning when the
    /// entry is missing or malformed.
    pub fn resolve(&self, name: &str) -> Color {
        self.lookup(name).unwrap_or_else(|e| {
            warn!("error obtaining color for {}: {}", name, e);
            ZERO_COLOR
        })
    }
}

/// The resolved colors used while compositing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub client_master: Color,
    pub client_slave: Color,
}

impl Palette {
    pub fn from_colors(colors: &ColorTable) -> Self {
        Self {
            background: colors.resolve(BACKGROUND),
            text: colors.resolve(TEXT),
            client_master: colors.resolve(CLIENT_MASTER),
            client_slave: colors.resolve(CLIENT_SLAVE),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_colors(&ColorTable::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::mock::capture_logs;
    use log::Level;
    use std::sync::atomic::{AtomicU32, Ordering};

    static TEST_ID: AtomicU32 = AtomicU32::new(0);

    fn tmp_config_path() -> PathBuf {
        let id = TEST_ID.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!(
            "layout-overlay-test-{}-{}.json",
            std::process::id(),
            id
        ))
    }

    #[test]
    fn deserialize_full_config() {
        let json = r#"{
            "overlay": {
                "duration_ms": 1500,
                "settle_delay_ms": 50,
                "font_size": 20,
                "font_margin": 6,
                "rect_margin": 2,
                "font_path": "/tmp/font.ttf"
            },
            "colors": {
                "gui_background": [1, 2, 3, 4],
                "gui_text": [5, 6, 7, 8]
            }
        }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.overlay.duration_ms, 1500);
        assert_eq!(cfg.overlay.settle_delay(), Duration::from_millis(50));
        assert_eq!(cfg.overlay.text_strip_height(), 32);
        assert_eq!(cfg.overlay.rect_margin, 2);
        assert_eq!(cfg.overlay.font_path, Some(PathBuf::from("/tmp/font.ttf")));
        assert_eq!(cfg.colors.lookup(BACKGROUND), Ok(Rgba([1, 2, 3, 4])));
        assert_eq!(cfg.colors.lookup(TEXT), Ok(Rgba([5, 6, 7, 8])));
    }

    #[test]
    fn deserialize_empty_uses_defaults() {
        let cfg: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.overlay, OverlayConfig::default());
        assert_eq!(cfg.colors, ColorTable::default());
        assert!(cfg.overlay.enabled());
    }

    #[test]
    fn deserialize_partial_overlay() {
        let json = r#"{ "overlay": { "duration_ms": 0 } }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert!(!cfg.overlay.enabled());
        assert_eq!(cfg.overlay.duration(), Duration::ZERO);
        assert_eq!(cfg.overlay.font_size, OverlayConfig::default().font_size);
    }

    #[test]
    fn negative_duration_disables() {
        let json = r#"{ "overlay": { "duration_ms": -5 } }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert!(!cfg.overlay.enabled());
        assert_eq!(cfg.overlay.duration(), Duration::ZERO);
    }

    #[test]
    fn resolve_valid_color() {
        let table = ColorTable::new([("x", vec![0, 128, 255, 17])]);
        assert_eq!(table.resolve("x"), Rgba([0, 128, 255, 17]));
    }

    #[test]
    fn wrong_channel_count_resolves_to_zero() {
        let table = ColorTable::new([("three", vec![1, 2, 3]), ("five", vec![1, 2, 3, 4, 5])]);
        assert_eq!(
            table.lookup("three"),
            Err(ColorError::ChannelCount {
                name: "three".into(),
                len: 3
            })
        );
        assert_eq!(table.resolve("three"), ZERO_COLOR);
        assert_eq!(table.resolve("five"), ZERO_COLOR);
    }

    #[test]
    fn malformed_color_warns_exactly_once() {
        let mut colors = ColorTable::default();
        colors.0.insert(CLIENT_SLAVE.to_string(), vec![1, 2, 3]);

        let logs = capture_logs(|| {
            let palette = Palette::from_colors(&colors);
            assert_eq!(palette.client_slave, ZERO_COLOR);
        });
        assert_eq!(logs.len(), 1, "{logs:?}");
        assert_eq!(logs[0].0, Level::Warn);
        assert!(logs[0].1.contains(CLIENT_SLAVE));
    }

    #[test]
    fn valid_colors_resolve_silently() {
        let logs = capture_logs(|| {
            Palette::from_colors(&ColorTable::default());
        });
        assert!(logs.is_empty(), "{logs:?}");
    }

    #[test]
    fn out_of_range_channel_resolves_to_zero() {
        let table = ColorTable::new([("hot", vec![256, 0, 0, 255]), ("neg", vec![-1, 0, 0, 0])]);
        assert!(matches!(
            table.lookup("hot"),
            Err(ColorError::OutOfRange { value: 256, .. })
        ));
        assert_eq!(table.resolve("neg"), ZERO_COLOR);
    }

    #[test]
    fn missing_color_resolves_to_zero() {
        let palette = Palette::from_colors(&ColorTable::new([(TEXT, vec![9, 9, 9, 9])]));
        assert_eq!(palette.text, Rgba([9, 9, 9, 9]));
        assert_eq!(palette.background, ZERO_COLOR);
        assert_eq!(palette.client_master, ZERO_COLOR);
    }

    #[test]
    fn load_reads_file() {
        let path = tmp_config_path();
        std::fs::write(&path, r#"{ "overlay": { "duration_ms": 250 } }"#).unwrap();
        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.overlay.duration_ms, 250);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_reports_missing_and_malformed_files() {
        let path = tmp_config_path();
        assert!(Config::load(&path).is_err());

        std::fs::write(&path, "not json").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
        let _ = std::fs::remove_file(&path);
    }
}
