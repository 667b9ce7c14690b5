//! Text measurement collaborator.
//!
//! The badge never measures glyphs itself; the host toolkit supplies a
//! [`TextMeasurer`]. On macOS that is Core Text (see `render`), elsewhere
//! [`EstimatedMetrics`] gives a deterministic approximation.

use crate::geometry::Size;
use crate::theme::Font;

/// Measures the bounding size of a single line of text.
pub trait TextMeasurer {
    /// Returns the width and line height of `text` set in `font`.
    fn measure(&self, text: &str, font: &Font) -> Size;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn measure(&self, text: &str, font: &Font) -> Size {
        (**self).measure(text, font)
    }
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for Box<T> {
    fn measure(&self, text: &str, font: &Font) -> Size {
        (**self).measure(text, font)
    }
}

/// Font-size proportional metrics with no font data behind them.
///
/// Digits in system UI fonts are tabular and close to 0.6em wide; the line
/// height of those fonts sits near 1.2em.
#[derive(Debug, Clone, Copy)]
pub struct EstimatedMetrics {
    /// Advance per character, in ems.
    pub advance: f64,
    /// Extra advance applied to bold faces, in ems.
    pub bold_extra: f64,
    /// Line height, in ems.
    pub line_height: f64,
}

impl Default for EstimatedMetrics {
    fn default() -> Self {
        Self {
            advance: 0.6,
            bold_extra: 0.04,
            line_height: 1.2,
        }
    }
}

impl TextMeasurer for EstimatedMetrics {
    fn measure(&self, text: &str, font: &Font) -> Size {
        let advance = if font.bold {
            self.advance + self.bold_extra
        } else {
            self.advance
        };
        let chars = text.chars().count() as f64;
        Size::new(chars * advance * font.size, self.line_height * font.size)
    }
}
