//! Scatter-plot rendering and image output.

pub mod crop;
pub mod scatter;

use std::path::Path;
use std::process::Command;

use image::{ImageFormat, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::data::model::{Labels, Projection};
use crate::error::{Result, VizError};

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

// ---------------------------------------------------------------------------
// Plot style
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotStyle {
    /// Canvas size before cropping, in pixels.
    pub width: u32,
    pub height: u32,
    /// Marker area in px², like matplotlib's `s`.
    pub marker_size: f64,
    pub color_by_rank: bool,
    /// Label position relative to its point, in pixels, y pointing up.
    pub label_offset: [i32; 2],
    pub font_size: f64,
    pub callout_alpha: f64,
    /// Crop the saved image to its content.
    pub crop: bool,
    pub crop_pad: u32,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 750,
            marker_size: 20.0,
            color_by_rank: false,
            label_offset: [-20, 20],
            font_size: 14.0,
            callout_alpha: 0.5,
            crop: true,
            crop_pad: 10,
        }
    }
}

impl PlotStyle {
    pub fn validate(&self) -> Result<()> {
        if self.width < 64 || self.height < 64 {
            return Err(VizError::Config(format!(
                "canvas must be at least 64x64, got {}x{}",
                self.width, self.height
            )));
        }
        if self.crop_pad > self.width.max(self.height) {
            return Err(VizError::Config(format!(
                "crop pad must not exceed the canvas, got {}",
                self.crop_pad
            )));
        }
        if !(self.marker_size > 0.0) {
            return Err(VizError::Config(format!(
                "marker size must be positive, got {}",
                self.marker_size
            )));
        }
        if !(self.font_size > 0.0) {
            return Err(VizError::Config(format!(
                "font size must be positive, got {}",
                self.font_size
            )));
        }
        if !(0.0..=1.0).contains(&self.callout_alpha) {
            return Err(VizError::Config(format!(
                "callout alpha must be in [0, 1], got {}",
                self.callout_alpha
            )));
        }
        Ok(())
    }

    /// Marker radius in pixels for the configured area.
    pub fn marker_radius(&self) -> i32 {
        ((self.marker_size / std::f64::consts::PI).sqrt().round() as i32).max(1)
    }

    /// Padding between a label and its box: half the font size.
    pub fn callout_pad(&self) -> i32 {
        (self.font_size * 0.5).round() as i32
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Render the plot and write it to `path`. Returns the saved image size.
pub fn save_plot(
    projection: &Projection,
    labels: Option<&Labels>,
    style: &PlotStyle,
    path: &Path,
) -> Result<(u32, u32)> {
    let img = scatter::render(projection, labels, style)?;
    let img = if style.crop {
        crop::crop_tight(img, BACKGROUND, style.crop_pad)
    } else {
        img
    };
    write_image(&img, path)?;
    Ok(img.dimensions())
}

/// Format follows the extension; a path without one is written as PNG.
fn write_image(img: &RgbImage, path: &Path) -> Result<()> {
    let result = if path.extension().is_some() {
        img.save(path)
    } else {
        img.save_with_format(path, ImageFormat::Png)
    };
    result.map_err(|e| VizError::Render(format!("writing {}: {e}", path.display())))
}

/// Hand the saved image to the desktop's default viewer. Failures are logged,
/// the image is already on disk.
pub fn open_in_viewer(path: &Path) {
    let mut cmd = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else {
        Command::new("xdg-open")
    };
    match cmd.arg(path).spawn() {
        Ok(_) => log::debug!("Opened {} in the default viewer", path.display()),
        Err(e) => log::warn!("Could not open {}: {e}", path.display()),
    }
}
