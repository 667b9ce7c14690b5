//! Colors and fonts used to style a badge.

use serde::Serialize;

/// RGBA color tuple, each component in 0.0-1.0.
pub type Color = (f64, f64, f64, f64);

pub const RED: Color = (1.0, 0.0, 0.0, 1.0);
pub const WHITE: Color = (1.0, 1.0, 1.0, 1.0);
/// Default shadow: black at half opacity.
pub const SHADOW: Color = (0.0, 0.0, 0.0, 0.5);

/// Family name that stands for the platform's UI font.
pub const SYSTEM_FONT_FAMILY: &str = "System";

/// Parse a hex color string into RGBA components (0.0-1.0)
///
/// Accepts `#RRGGBB` and `#RRGGBBAA`, with or without the leading `#`.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }

    let channel = |range: std::ops::Range<usize>| -> Option<f64> {
        Some(u8::from_str_radix(&hex[range], 16).ok()? as f64 / 255.0)
    };

    match hex.len() {
        6 => Some((channel(0..2)?, channel(2..4)?, channel(4..6)?, 1.0)),
        8 => Some((
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
            channel(6..8)?,
        )),
        _ => None,
    }
}

/// Converts a Color to a hex string. Alpha is appended only when not opaque.
pub fn color_to_hex(color: Color) -> String {
    let byte = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    let rgb = format!(
        "#{:02x}{:02x}{:02x}",
        byte(color.0),
        byte(color.1),
        byte(color.2)
    );
    if color.3 >= 1.0 {
        rgb
    } else {
        format!("{}{:02x}", rgb, byte(color.3))
    }
}

/// A font reference handed to the text measurer and the canvas.
///
/// Only "system" style fonts keep the pad and shine geometry looking right;
/// nothing here enforces that.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub family: String,
    pub size: f64,
    pub bold: bool,
}

impl Font {
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
            bold: false,
        }
    }

    pub fn system(size: f64) -> Self {
        Self::new(SYSTEM_FONT_FAMILY, size)
    }

    pub fn bold_system(size: f64) -> Self {
        Self::system(size).bold(true)
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn is_system(&self) -> bool {
        self.family == SYSTEM_FONT_FAMILY
    }
}

impl Default for Font {
    /// Bold system font at 16pt.
    fn default() -> Self {
        Self::bold_system(16.0)
    }
}
