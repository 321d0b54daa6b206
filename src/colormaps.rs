//! Colour maps used by the reference plots

use crate::errors::{GalleryError, Result};
use plotters::style::RGBColor;

/// A colour map defined by evenly spaced anchor colours
#[derive(Debug, Clone)]
pub struct Colormap {
    pub name: &'static str,
    anchors: Vec<(u8, u8, u8)>,
}

impl Colormap {
    /// Colour map through `anchors`; at least one anchor is required.
    pub fn new(name: &'static str, anchors: Vec<(u8, u8, u8)>) -> Result<Self> {
        if anchors.is_empty() {
            return Err(GalleryError::Generic(format!(
                "colormap '{}' has no anchor colours",
                name
            )));
        }
        Ok(Self::from_anchors(name, anchors))
    }

    fn from_anchors(name: &'static str, anchors: Vec<(u8, u8, u8)>) -> Self {
        Self { name, anchors }
    }

    /// NCL `BlWhRe`: blue through white to red.
    pub fn bl_wh_re() -> Self {
        Self::from_anchors(
            "BlWhRe",
            vec![
                (0, 0, 160),
                (25, 60, 230),
                (95, 150, 250),
                (175, 210, 255),
                (255, 255, 255),
                (255, 205, 175),
                (250, 140, 95),
                (230, 50, 30),
                (160, 0, 0),
            ],
        )
    }

    pub fn magma() -> Self {
        Self::from_anchors(
            "magma",
            vec![
                (0, 0, 4),
                (28, 16, 68),
                (79, 18, 123),
                (129, 37, 129),
                (181, 54, 122),
                (229, 80, 100),
                (251, 135, 97),
                (254, 194, 135),
                (252, 253, 191),
            ],
        )
    }

    pub fn jet() -> Self {
        Self::from_anchors(
            "jet",
            vec![
                (0, 0, 128),
                (0, 0, 255),
                (0, 128, 255),
                (0, 255, 255),
                (128, 255, 128),
                (255, 255, 0),
                (255, 128, 0),
                (255, 0, 0),
                (128, 0, 0),
            ],
        )
    }

    /// Looks up a map by name, case-insensitively.
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "blwhre" => Some(Self::bl_wh_re()),
            "magma" => Some(Self::magma()),
            "jet" => Some(Self::jet()),
            _ => None,
        }
    }

    /// Colour at `t` in `[0, 1]`; values outside are clamped.
    pub fn sample(&self, t: f64) -> RGBColor {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let segments = self.anchors.len() - 1;
        let position = t * segments as f64;
        let lo = (position.floor() as usize).min(segments.saturating_sub(1));
        let frac = position - lo as f64;
        let (r0, g0, b0) = self.anchors[lo];
        let (r1, g1, b1) = self.anchors[(lo + 1).min(segments)];
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
        RGBColor(mix(r0, r1), mix(g0, g1), mix(b0, b1))
    }

    /// `count` colours sampled evenly from the first to the last anchor.
    pub fn discrete(&self, count: usize) -> Vec<RGBColor> {
        match count {
            0 => Vec::new(),
            1 => vec![self.sample(0.5)],
            _ => (0..count)
                .map(|i| self.sample(i as f64 / (count - 1) as f64))
                .collect(),
        }
    }
}
