use std::cell::RefCell;
use std::collections::HashMap;

use core_foundation::attributed_string::CFMutableAttributedString;
use core_foundation::base::{CFRange, TCFType};
use core_foundation::string::CFString;
use core_graphics::color_space::CGColorSpace;
use core_graphics::context::CGContext;
use core_graphics::geometry::{CGAffineTransform, CGPoint};
use core_graphics::gradient::{CGGradient, CGGradientDrawingOptions};
use core_text::font::CTFont;
use core_text::line::CTLine;
use core_text::string_attributes::kCTFontAttributeName;
use foreign_types::ForeignType;

use crate::canvas::{Canvas, GradientStop, RoundedRect};
use crate::geometry::{Point, Size};
use crate::measure::{EstimatedMetrics, TextMeasurer};
use crate::theme::{Color, Font};

/// PostScript names tried, in order, for the system font.
const SYSTEM_FONT_NAMES: [&str; 2] = [".AppleSystemUIFont", "Helvetica"];
const BOLD_SYSTEM_FONT_NAMES: [&str; 2] = [".AppleSystemUIFontBold", "Helvetica-Bold"];

fn load_font(font: &Font) -> Option<CTFont> {
    let candidates: Vec<&str> = match (font.is_system(), font.bold) {
        (true, false) => SYSTEM_FONT_NAMES.to_vec(),
        (true, true) => BOLD_SYSTEM_FONT_NAMES.to_vec(),
        (false, _) => vec![font.family.as_str(), "Helvetica"],
    };

    let loaded = candidates
        .iter()
        .find_map(|name| core_text::font::new_from_name(name, font.size).ok());
    if loaded.is_none() {
        log::warn!("Failed to load font '{}' or any fallback", font.family);
    }
    loaded
}

fn line_for(text: &str, font: &CTFont) -> CTLine {
    let cf_string = CFString::new(text);
    let mut attr_string = CFMutableAttributedString::new();
    attr_string.replace_str(&cf_string, CFRange::init(0, 0));

    // Attribute ranges count UTF-16 units.
    let range = CFRange::init(0, text.encode_utf16().count() as isize);

    unsafe {
        attr_string.set_attribute(range, kCTFontAttributeName, font);
    }

    CTLine::new_with_attributed_string(attr_string.as_concrete_TypeRef())
}

/// Text measurement through Core Text, with loaded fonts cached per style.
#[derive(Default)]
pub struct CoreTextMeasurer {
    fonts: RefCell<HashMap<(String, u64, bool), Option<CTFont>>>,
}

impl CoreTextMeasurer {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_font<R>(&self, font: &Font, f: impl FnOnce(&CTFont) -> R) -> Option<R> {
        let key = (font.family.clone(), font.size.to_bits(), font.bold);
        let mut fonts = self.fonts.borrow_mut();
        let loaded = fonts.entry(key).or_insert_with(|| load_font(font));
        loaded.as_ref().map(f)
    }
}

impl TextMeasurer for CoreTextMeasurer {
    fn measure(&self, text: &str, font: &Font) -> Size {
        self.with_font(font, |ct| {
            let bounds = line_for(text, ct).get_typographic_bounds();
            Size::new(bounds.width, ct.ascent() + ct.descent())
        })
        .unwrap_or_else(|| EstimatedMetrics::default().measure(text, font))
    }
}

/// A [`Canvas`] over a flipped Core Graphics context.
pub struct CgCanvas<'a> {
    ctx: &'a mut CGContext,
    fonts: &'a CoreTextMeasurer,
}

impl<'a> CgCanvas<'a> {
    /// `ctx` must already be flipped so that y grows downward.
    pub fn new(ctx: &'a mut CGContext, fonts: &'a CoreTextMeasurer) -> Self {
        Self { ctx, fonts }
    }

    /// Adds a rounded rectangle path to the CGContext.
    fn add_rounded_rect_path(&mut self, shape: &RoundedRect) {
        let x = shape.rect.min_x();
        let y = shape.rect.min_y();
        let width = shape.rect.width();
        let height = shape.rect.height();
        let r = shape.radius;

        self.ctx.begin_path();
        self.ctx.move_to_point(x + r, y);

        self.ctx.add_line_to_point(x + width - r, y);
        self.ctx.add_quad_curve_to_point(x + width, y, x + width, y + r);

        self.ctx.add_line_to_point(x + width, y + height - r);
        self.ctx
            .add_quad_curve_to_point(x + width, y + height, x + width - r, y + height);

        self.ctx.add_line_to_point(x + r, y + height);
        self.ctx.add_quad_curve_to_point(x, y + height, x, y + height - r);

        self.ctx.add_line_to_point(x, y + r);
        self.ctx.add_quad_curve_to_point(x, y, x + r, y);

        self.ctx.close_path();
    }
}

impl Canvas for CgCanvas<'_> {
    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn clip(&mut self, shape: &RoundedRect) {
        self.add_rounded_rect_path(shape);
        self.ctx.clip();
    }

    fn fill(&mut self, shape: &RoundedRect, color: Color) {
        let (r, g, b, a) = color;
        self.ctx.set_rgb_fill_color(r, g, b, a);
        self.add_rounded_rect_path(shape);
        self.ctx.fill_path();
    }

    fn stroke(&mut self, shape: &RoundedRect, color: Color, width: f64) {
        let (r, g, b, a) = color;
        self.ctx.set_rgb_stroke_color(r, g, b, a);
        self.ctx.set_line_width(width);
        self.add_rounded_rect_path(shape);
        self.ctx.stroke_path();
    }

    fn fill_linear_gradient(&mut self, start: Point, end: Point, stops: &[GradientStop]) {
        let components: Vec<f64> = stops
            .iter()
            .flat_map(|s| [s.color.0, s.color.1, s.color.2, s.color.3])
            .collect();
        let locations: Vec<f64> = stops.iter().map(|s| s.location).collect();

        let color_space = CGColorSpace::create_device_rgb();
        let gradient = CGGradient::create_with_color_components(
            &color_space,
            &components,
            &locations,
            stops.len(),
        );
        self.ctx.draw_linear_gradient(
            &gradient,
            CGPoint::new(start.x, start.y),
            CGPoint::new(end.x, end.y),
            CGGradientDrawingOptions::empty(),
        );
    }

    fn draw_text(&mut self, text: &str, font: &Font, origin: Point, color: Color) {
        let drawn = self.fonts.with_font(font, |ct| {
            let line = line_for(text, ct);

            let (r, g, b, a) = color;
            let color = core_graphics::color::CGColor::rgb(r, g, b, a);
            self.ctx.set_fill_color(&color);

            // Glyphs are upright only with the y axis flipped back.
            let flip = CGAffineTransform {
                a: 1.0,
                b: 0.0,
                c: 0.0,
                d: -1.0,
                tx: 0.0,
                ty: 0.0,
            };
            self.ctx.set_text_matrix(&flip);
            self.ctx.set_text_position(origin.x, origin.y + ct.ascent());

            unsafe {
                use core_text::line::CTLineRef;
                unsafe extern "C" {
                    fn CTLineDraw(line: CTLineRef, context: core_graphics::sys::CGContextRef);
                }
                CTLineDraw(line.as_concrete_TypeRef(), self.ctx.as_ptr());
            }
        });

        if drawn.is_none() {
            log::warn!("Skipped badge text {:?}: no usable font", text);
        }
    }
}
