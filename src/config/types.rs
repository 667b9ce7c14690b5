use serde::Deserialize;
use std::fmt;

use crate::badge::{BadgeAlignment, BadgeView, DEFAULT_PAD, DEFAULT_STROKE_WIDTH};
use crate::format::TextFormat;
use crate::geometry::{Point, Size};
use crate::theme::{self, parse_hex_color, Color, Font};

/// Badge style as written in `badge.toml`. Every key is optional.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BadgeStyleConfig {
    /// Template with one numeric placeholder, e.g. "{}" or "%d+"
    #[serde(default = "default_text_format")]
    pub text_format: String,
    /// Font family; "System" picks the platform UI font
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default = "default_bold")]
    pub bold: bool,
    /// Badge background in hex format (#RRGGBB or #RRGGBBAA)
    #[serde(default = "default_fill_color")]
    pub fill_color: String,
    #[serde(default = "default_stroke_color")]
    pub stroke_color: String,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default = "default_text_color")]
    pub text_color: String,
    /// Spacing between the number and the stroke (points)
    #[serde(default = "default_pad")]
    pub pad: u32,
    #[serde(default)]
    pub shadow: bool,
    /// Shadow offset as [x, y]
    #[serde(default = "default_shadow_offset")]
    pub shadow_offset: [f64; 2],
    #[serde(default = "default_shadow_color")]
    pub shadow_color: String,
    #[serde(default)]
    pub shine: bool,
    #[serde(default)]
    pub hide_when_zero: bool,
    #[serde(default)]
    pub alignment: BadgeAlignment,
    /// Manual text position correction as [x, y]
    #[serde(default)]
    pub adjust_offset: [f64; 2],
}

impl Default for BadgeStyleConfig {
    fn default() -> Self {
        Self {
            text_format: default_text_format(),
            font_family: default_font_family(),
            font_size: default_font_size(),
            bold: default_bold(),
            fill_color: default_fill_color(),
            stroke_color: default_stroke_color(),
            stroke_width: default_stroke_width(),
            text_color: default_text_color(),
            pad: default_pad(),
            shadow: false,
            shadow_offset: default_shadow_offset(),
            shadow_color: default_shadow_color(),
            shine: false,
            hide_when_zero: false,
            alignment: BadgeAlignment::default(),
            adjust_offset: [0.0, 0.0],
        }
    }
}

fn default_text_format() -> String {
    TextFormat::default().template().to_string()
}

fn default_font_family() -> String {
    theme::SYSTEM_FONT_FAMILY.to_string()
}

fn default_font_size() -> f64 {
    Font::default().size
}

fn default_bold() -> bool {
    true
}

fn default_fill_color() -> String {
    theme::color_to_hex(theme::RED)
}

fn default_stroke_color() -> String {
    theme::color_to_hex(theme::WHITE)
}

fn default_stroke_width() -> f64 {
    DEFAULT_STROKE_WIDTH
}

fn default_text_color() -> String {
    theme::color_to_hex(theme::WHITE)
}

fn default_pad() -> u32 {
    DEFAULT_PAD
}

fn default_shadow_offset() -> [f64; 2] {
    [0.0, 3.0]
}

fn default_shadow_color() -> String {
    theme::color_to_hex(theme::SHADOW)
}

/// A problem found while validating a style file.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    pub field: &'static str,
    pub message: String,
    pub is_error: bool,
}

impl ConfigIssue {
    fn error(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
            is_error: true,
        }
    }

    fn warning(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
            is_error: false,
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = if self.is_error { "error" } else { "warning" };
        write!(f, "{} in '{}': {}", level, self.field, self.message)
    }
}

impl BadgeStyleConfig {
    /// Checks values serde cannot. Errors make the style unusable.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        let format = TextFormat::new(self.text_format.as_str());
        match format.placeholder_count() {
            1 => {}
            0 => issues.push(ConfigIssue::error(
                "text_format",
                format!("'{}' has no numeric placeholder", self.text_format),
            )),
            n => issues.push(ConfigIssue::error(
                "text_format",
                format!(
                    "'{}' has {} numeric placeholders, expected one",
                    self.text_format, n
                ),
            )),
        }

        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            issues.push(ConfigIssue::error(
                "font_size",
                format!("must be a positive number, got {}", self.font_size),
            ));
        }
        if self.font_family != theme::SYSTEM_FONT_FAMILY {
            issues.push(ConfigIssue::warning(
                "font_family",
                format!(
                    "'{}' is not a system font; pad and shine may look off",
                    self.font_family
                ),
            ));
        }

        if !self.stroke_width.is_finite() || self.stroke_width < 0.0 {
            issues.push(ConfigIssue::error(
                "stroke_width",
                format!("must be zero or positive, got {}", self.stroke_width),
            ));
        }

        for (field, value) in [
            ("fill_color", &self.fill_color),
            ("stroke_color", &self.stroke_color),
            ("text_color", &self.text_color),
            ("shadow_color", &self.shadow_color),
        ] {
            if parse_hex_color(value).is_none() {
                issues.push(ConfigIssue::error(
                    field,
                    format!("'{}' is not #RRGGBB or #RRGGBBAA", value),
                ));
            }
        }

        let offsets = [
            ("shadow_offset", self.shadow_offset),
            ("adjust_offset", self.adjust_offset),
        ];
        for (field, [x, y]) in offsets {
            if !x.is_finite() || !y.is_finite() {
                issues.push(ConfigIssue::error(field, "components must be finite"));
            }
        }

        issues
    }

    pub fn font(&self) -> Font {
        Font::new(self.font_family.as_str(), self.font_size).bold(self.bold)
    }

    /// Pushes this style into `view` through its setters.
    ///
    /// Colors that fail to parse keep the view's current color.
    pub fn apply(&self, view: &mut BadgeView) {
        view.set_text_format(self.text_format.as_str());
        view.set_font(self.font());
        view.set_stroke_width(self.stroke_width);
        view.set_pad(self.pad);
        view.set_shadow(self.shadow);
        view.set_shadow_offset(Size::new(self.shadow_offset[0], self.shadow_offset[1]));
        view.set_shine(self.shine);
        view.set_hide_when_zero(self.hide_when_zero);
        view.set_badge_alignment(self.alignment);
        view.set_adjust_offset(Point::new(self.adjust_offset[0], self.adjust_offset[1]));

        let colors: [(&str, fn(&mut BadgeView, Color)); 4] = [
            (self.fill_color.as_str(), BadgeView::set_fill_color),
            (self.stroke_color.as_str(), BadgeView::set_stroke_color),
            (self.text_color.as_str(), BadgeView::set_text_color),
            (self.shadow_color.as_str(), BadgeView::set_shadow_color),
        ];
        for (hex, set) in colors {
            match parse_hex_color(hex) {
                Some(color) => set(view, color),
                None => log::warn!("Ignoring invalid color '{}'", hex),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    #[test]
    fn empty_file_gives_defaults() {
        let config: BadgeStyleConfig = toml::from_str("").unwrap();
        assert_eq!(config, BadgeStyleConfig::default());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn defaults_match_a_new_view() {
        let mut view = BadgeView::new(Rect::new(0.0, 0.0, 40.0, 40.0));
        let fresh = format!("{:?}", view);
        BadgeStyleConfig::default().apply(&mut view);
        assert_eq!(format!("{:?}", view), fresh);
        assert_eq!(view.fill_color(), theme::RED);
        assert_eq!(view.text_color(), theme::WHITE);
        assert_eq!(view.shadow_offset(), Size::new(0.0, 3.0));
        assert!((view.shadow_color().3 - 0.5).abs() < 0.01);
    }

    #[test]
    fn parses_full_style() {
        let config: BadgeStyleConfig = toml::from_str(
            r##"
            text_format = "%d+"
            font_size = 12.0
            bold = false
            fill_color = "#3366ff"
            stroke_width = 1.5
            pad = 4
            shadow = true
            shadow_offset = [1.0, -2.0]
            shine = true
            hide_when_zero = true
            alignment = "top_right"
            adjust_offset = [0.5, 1.0]
            "##,
        )
        .unwrap();

        assert!(config.validate().is_empty());
        assert_eq!(config.alignment, BadgeAlignment::TopRight);

        let mut view = BadgeView::new(Rect::new(0.0, 0.0, 60.0, 30.0));
        config.apply(&mut view);
        view.set_value(7);
        assert_eq!(view.display_text(), "7+");
        assert_eq!(view.font(), &Font::system(12.0));
        assert_eq!(view.pad(), 4);
        assert_eq!(view.stroke_width(), 1.5);
        assert!(view.shadow() && view.shine() && view.hide_when_zero());
        assert_eq!(view.shadow_offset(), Size::new(1.0, -2.0));
        assert_eq!(view.adjust_offset(), Point::new(0.5, 1.0));
        assert_eq!(view.badge_alignment(), BadgeAlignment::TopRight);
        assert_eq!(view.fill_color(), parse_hex_color("#3366ff").unwrap());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<BadgeStyleConfig>("colour = \"#fff\"").is_err());
    }

    #[test]
    fn unknown_alignment_is_rejected() {
        assert!(toml::from_str::<BadgeStyleConfig>("alignment = \"middle\"").is_err());
    }

    #[test]
    fn validate_reports_errors() {
        let config = BadgeStyleConfig {
            text_format: "%d of %d".to_string(),
            font_size: 0.0,
            stroke_width: -1.0,
            fill_color: "red".to_string(),
            shadow_offset: [f64::NAN, 0.0],
            ..BadgeStyleConfig::default()
        };
        let issues = config.validate();
        let fields: Vec<_> = issues.iter().map(|i| i.field).collect();
        assert_eq!(
            fields,
            vec![
                "text_format",
                "font_size",
                "stroke_width",
                "fill_color",
                "shadow_offset"
            ]
        );
        assert!(issues.iter().all(|i| i.is_error));
    }

    #[test]
    fn missing_placeholder_is_an_error() {
        let config = BadgeStyleConfig {
            text_format: "new".to_string(),
            ..BadgeStyleConfig::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("no numeric placeholder"));
    }

    #[test]
    fn padded_printf_templates_validate() {
        for template in ["%3d", "%02d", "%+d", "%.2lu new"] {
            let config = BadgeStyleConfig {
                text_format: template.to_string(),
                ..BadgeStyleConfig::default()
            };
            assert!(config.validate().is_empty(), "{} should validate", template);
        }
    }

    #[test]
    fn non_system_font_is_a_warning() {
        let config = BadgeStyleConfig {
            font_family: "Comic Sans MS".to_string(),
            ..BadgeStyleConfig::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error);
        assert!(issues[0].to_string().starts_with("warning in 'font_family'"));
    }

    #[test]
    fn apply_keeps_color_on_bad_hex() {
        let config = BadgeStyleConfig {
            text_color: "nope".to_string(),
            ..BadgeStyleConfig::default()
        };
        let mut view = BadgeView::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        view.set_text_color(theme::RED);
        config.apply(&mut view);
        assert_eq!(view.text_color(), theme::RED);
    }
}
