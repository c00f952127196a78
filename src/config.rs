use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use image::Rgb;
use serde::{Deserialize, Serialize};

use crate::background::RampThresholds;
use crate::compose::ComposeOptions;
use crate::pipeline::{SquareIconOptions, TrayEnhance};
use crate::silhouette::SilhouetteOptions;

/// Largest square output, in pixels, any target may request.
const MAX_ICON_SIZE: u32 = 8192;
/// Tray icons are rendered at 1x and 2x of this.
const MAX_TRAY_SIZE: u32 = 1024;
/// Upper end of RGB Euclidean distance (`sqrt(3) * 255`, rounded up).
const MAX_RGB_DISTANCE: u32 = 442;
/// Padding beyond half the side would leave no room for the glyph.
const MAX_PADDING_RATIO: f64 = 0.5;
const MAX_OUTPUT_WIDTH_RATIO: f64 = 8.0;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "CropConfig::is_default")]
    pub crop: CropConfig,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub app: Option<AppIconConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tray: Option<TrayIconConfig>,

    #[serde(default, skip_serializing_if = "is_default_silhouette")]
    pub silhouette: SilhouetteOptions,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub compose: Option<ComposeOptions>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CropConfig {
    /// Pixels with alpha at or below this are ignored when trimming.
    #[serde(default = "default_alpha_threshold")]
    pub alpha_threshold: u8,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            alpha_threshold: default_alpha_threshold(),
        }
    }
}

impl CropConfig {
    fn is_default(&self) -> bool {
        self.alpha_threshold == default_alpha_threshold()
    }
}

/// The primary, colorful application icon.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AppIconConfig {
    pub source: PathBuf,

    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    /// The first size is written as `icon.png`, the rest as `icon@<size>.png`.
    #[serde(default = "default_png_sizes")]
    pub png_sizes: Vec<u32>,

    /// Frames of `icon.ico`; empty skips the `.ico`.
    #[serde(default = "default_ico_sizes")]
    pub ico_sizes: Vec<u32>,

    #[serde(default = "default_app_bg_start")]
    pub bg_start: f64,

    #[serde(default = "default_app_bg_end")]
    pub bg_end: f64,

    #[serde(default = "default_app_padding")]
    pub padding_ratio: f64,
}

/// The small monochrome tray/menu-bar icon, written at 1x and 2x.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TrayIconConfig {
    pub source: PathBuf,

    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    #[serde(default = "default_tray_size")]
    pub size: u32,

    #[serde(default = "default_tray_bg_start")]
    pub bg_start: f64,

    #[serde(default = "default_tray_bg_end")]
    pub bg_end: f64,

    #[serde(default = "default_white")]
    pub color: [u8; 3],

    #[serde(default = "default_tray_padding")]
    pub padding_ratio: f64,

    #[serde(default)]
    pub enhance: EnhanceSetting,
}

/// `enhance = false`, `enhance = true`, or an `[tray.enhance]` table.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum EnhanceSetting {
    Enabled(bool),
    Custom(EnhanceConfig),
}

impl Default for EnhanceSetting {
    fn default() -> Self {
        EnhanceSetting::Enabled(true)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EnhanceConfig {
    pub intermediate_size: u32,
    pub alpha_cut: u8,
    pub dilate: u32,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        let defaults = TrayEnhance::default();
        Self {
            intermediate_size: defaults.intermediate_size,
            alpha_cut: defaults.alpha_cut,
            dilate: defaults.dilate,
        }
    }
}

impl EnhanceSetting {
    pub fn resolve(&self) -> Option<TrayEnhance> {
        match self {
            EnhanceSetting::Enabled(false) => None,
            EnhanceSetting::Enabled(true) => Some(TrayEnhance::default()),
            EnhanceSetting::Custom(c) => Some(TrayEnhance {
                intermediate_size: c.intermediate_size,
                alpha_cut: c.alpha_cut,
                dilate: c.dilate,
            }),
        }
    }
}

fn default_alpha_threshold() -> u8 {
    24
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("assets")
}

fn default_png_sizes() -> Vec<u32> {
    vec![512, 1024]
}

fn default_ico_sizes() -> Vec<u32> {
    vec![16, 24, 32, 48, 64, 128, 256]
}

fn default_app_bg_start() -> f64 {
    32.0
}

fn default_app_bg_end() -> f64 {
    78.0
}

fn default_app_padding() -> f64 {
    0.10
}

fn default_tray_size() -> u32 {
    18
}

fn default_tray_bg_start() -> f64 {
    70.0
}

fn default_tray_bg_end() -> f64 {
    140.0
}

fn default_white() -> [u8; 3] {
    [255, 255, 255]
}

fn default_tray_padding() -> f64 {
    0.05
}

fn is_default_silhouette(options: &SilhouetteOptions) -> bool {
    *options == SilhouetteOptions::default()
}

impl AppIconConfig {
    pub fn square_options(&self, crop: &CropConfig) -> SquareIconOptions {
        let mut options = SquareIconOptions::new(
            crop.alpha_threshold,
            RampThresholds::new(self.bg_start, self.bg_end),
        );
        options.padding_ratio = self.padding_ratio;
        options
    }

    /// Output file name for each PNG size, in `png_sizes` order.
    pub fn png_outputs(&self) -> Vec<(u32, String)> {
        self.png_sizes
            .iter()
            .enumerate()
            .map(|(i, &size)| {
                let name = if i == 0 {
                    "icon.png".to_string()
                } else {
                    format!("icon@{}.png", size)
                };
                (size, name)
            })
            .collect()
    }
}

impl TrayIconConfig {
    pub fn square_options(&self, crop: &CropConfig) -> SquareIconOptions {
        let mut options = SquareIconOptions::new(
            crop.alpha_threshold,
            RampThresholds::new(self.bg_start, self.bg_end),
        );
        options.padding_ratio = self.padding_ratio;
        options.monochrome = Some(Rgb(self.color));
        options.enhance = self.enhance.resolve();
        options
    }

    pub fn outputs(&self) -> Vec<(u32, String)> {
        vec![
            (self.size, "tray-icon.png".to_string()),
            (self.size.saturating_mul(2), "tray-icon@2x.png".to_string()),
        ]
    }
}

impl Config {
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.validate(config_dir)?;

        Ok(config)
    }

    pub fn validate(&self, config_dir: &Path) -> Result<()> {
        if let Some(app) = &self.app {
            check_source("app", config_dir, &app.source)?;
            check_ramp("app", app.bg_start, app.bg_end)?;
            check_ratio("app", "padding_ratio", app.padding_ratio, true, MAX_PADDING_RATIO)?;
            if app.png_sizes.is_empty() && app.ico_sizes.is_empty() {
                bail!("[app]: png_sizes and ico_sizes are both empty");
            }
            if app.png_sizes.iter().chain(&app.ico_sizes).any(|&s| s == 0) {
                bail!("[app]: sizes must be greater than 0");
            }
            if let Some(size) = app.png_sizes.iter().find(|&&s| s > MAX_ICON_SIZE) {
                bail!("[app]: png_sizes cannot exceed {} (got {})", MAX_ICON_SIZE, size);
            }
            if let Some(size) = app.ico_sizes.iter().find(|&&s| s > 256) {
                bail!("[app]: ico_sizes cannot exceed 256 (got {})", size);
            }
        }

        if let Some(tray) = &self.tray {
            check_source("tray", config_dir, &tray.source)?;
            check_ramp("tray", tray.bg_start, tray.bg_end)?;
            check_ratio("tray", "padding_ratio", tray.padding_ratio, true, MAX_PADDING_RATIO)?;
            if tray.size == 0 || tray.size > MAX_TRAY_SIZE {
                bail!(
                    "[tray]: size must be in 1..={} (got {})",
                    MAX_TRAY_SIZE,
                    tray.size
                );
            }
            if let Some(enhance) = tray.enhance.resolve() {
                if enhance.intermediate_size == 0 || enhance.intermediate_size > MAX_ICON_SIZE {
                    bail!(
                        "[tray.enhance]: intermediate_size must be in 1..={} (got {})",
                        MAX_ICON_SIZE,
                        enhance.intermediate_size
                    );
                }
            }
        }

        if self.silhouette.levels < 2 {
            bail!(
                "[silhouette]: levels must be at least 2 (got {})",
                self.silhouette.levels
            );
        }
        if !(0.0..1.0).contains(&self.silhouette.floor) {
            bail!(
                "[silhouette]: floor must be in [0, 1) (got {})",
                self.silhouette.floor
            );
        }
        if self.silhouette.flood_threshold > MAX_RGB_DISTANCE {
            bail!(
                "[silhouette]: flood_threshold cannot exceed {} (got {})",
                MAX_RGB_DISTANCE,
                self.silhouette.flood_threshold
            );
        }

        match &self.compose {
            Some(ComposeOptions::Overlay(o)) => {
                check_ratio("compose", "badge_size_ratio", o.badge_size_ratio, false, 1.0)?;
                check_ratio("compose", "margin_ratio", o.margin_ratio, true, 1.0)?;
            }
            Some(ComposeOptions::SideBySide(o)) => {
                check_ratio("compose", "base_size_ratio", o.base_size_ratio, false, 1.0)?;
                check_ratio("compose", "badge_size_ratio", o.badge_size_ratio, false, 1.0)?;
                check_ratio("compose", "gap_ratio", o.gap_ratio, true, 1.0)?;
                check_ratio("compose", "margin_ratio", o.margin_ratio, true, 1.0)?;
                check_ratio(
                    "compose",
                    "output_width_ratio",
                    o.output_width_ratio,
                    false,
                    MAX_OUTPUT_WIDTH_RATIO,
                )?;
            }
            None => {}
        }

        Ok(())
    }

    pub fn compose_options(&self) -> ComposeOptions {
        self.compose.clone().unwrap_or_default()
    }

    pub fn default_template() -> String {
        r#"# iconforge configuration

# Trimming to visible content
# [crop]
# alpha_threshold = 24     # alpha at or below this is treated as empty

# Application icon (colorful)
[app]
source = "icon-solid.png"
# out_dir = "assets"
# png_sizes = [512, 1024]                   # first -> icon.png, rest -> icon@<size>.png
# ico_sizes = [16, 24, 32, 48, 64, 128, 256] # [] to skip icon.ico
# bg_start = 32             # background removal ramp for opaque sources (RGB distance)
# bg_end = 78
# padding_ratio = 0.10

# Tray icon (monochrome, 1x and 2x)
# [tray]
# source = "icon-silhouette.png"
# out_dir = "assets"
# size = 18
# bg_start = 70
# bg_end = 140
# color = [255, 255, 255]
# padding_ratio = 0.05
# enhance = true            # binarize + dilate; or a [tray.enhance] table:
#
# [tray.enhance]
# intermediate_size = 256
# alpha_cut = 6
# dilate = 1

# Badge silhouettes (side-by-side composition)
# [silhouette]
# levels = 4
# floor = 0.10
# flood_threshold = 26
# trim_threshold = 8
# color = [255, 255, 255]

# Badge composition for `iconforge compose`
# [compose]
# mode = "side-by-side"     # or "overlay"
# output_width_ratio = 2.05
# base_size_ratio = 0.90
# badge_size_ratio = 0.90
# gap_ratio = 0.14
# margin_ratio = 0.06
# placement = "bottom-right" # top-left, top-right, bottom-left, bottom-right
"#
        .to_string()
    }
}

fn check_source(section: &str, config_dir: &Path, source: &Path) -> Result<()> {
    let full = config_dir.join(source);
    if !full.exists() {
        bail!(
            "[{}]: source path does not exist: {}",
            section,
            full.display()
        );
    }
    Ok(())
}

fn check_ramp(section: &str, start: f64, end: f64) -> Result<()> {
    if !(start.is_finite() && end.is_finite()) || start < 0.0 || start >= end {
        bail!(
            "[{}]: bg_start must be non-negative and below bg_end (got {} / {})",
            section,
            start,
            end
        );
    }
    Ok(())
}

fn check_ratio(section: &str, field: &str, value: f64, allow_zero: bool, max: f64) -> Result<()> {
    let above_min = if allow_zero { value >= 0.0 } else { value > 0.0 };
    let ok = value.is_finite() && above_min && value <= max;
    if !ok {
        bail!("[{}]: {} is out of range: {}", section, field, value);
    }
    Ok(())
}
