//! Number badge view.
//!
//! A [`BadgeView`] shows an unsigned value inside a stroked capsule, like the
//! count badge on an app icon. The capsule is sized from the formatted value
//! measured in the badge font, then placed inside the view's bounds according
//! to [`BadgeAlignment`].
//!
//! The view's frame should be larger than the badge. The badge is always
//! centered on its own shape, ignoring the shadow, when the alignment asks
//! for centering on an axis.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::canvas::{Canvas, GradientStop, RoundedRect};
use crate::component::{Component, DisplayHost, DrawContext, MeasureContext};
use crate::format::TextFormat;
use crate::geometry::{Point, Rect, Size};
use crate::measure::TextMeasurer;
use crate::theme::{self, Color, Font};

/// Default spacing between the text and the stroke.
pub const DEFAULT_PAD: u32 = 2;
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;
pub const DEFAULT_SHADOW_OFFSET: Size = Size {
    width: 0.0,
    height: 3.0,
};

/// Shine highlight, top edge to vertical middle of the badge.
const SHINE_STOPS: [GradientStop; 2] = [
    GradientStop::new(0.0, (1.0, 1.0, 1.0, 0.55)),
    GradientStop::new(1.0, (1.0, 1.0, 1.0, 0.0)),
];

/// Placement of the badge inside the view's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeAlignment {
    #[default]
    Center,
    TopRight,
    TopLeft,
    BottomLeft,
    BottomRight,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    Start,
    Middle,
    End,
}

impl BadgeAlignment {
    pub const ALL: [BadgeAlignment; 7] = [
        Self::Center,
        Self::TopRight,
        Self::TopLeft,
        Self::BottomLeft,
        Self::BottomRight,
        Self::Left,
        Self::Right,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::TopRight => "top_right",
            Self::TopLeft => "top_left",
            Self::BottomLeft => "bottom_left",
            Self::BottomRight => "bottom_right",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    fn horizontal(self) -> Anchor {
        match self {
            Self::Center => Anchor::Middle,
            Self::TopLeft | Self::BottomLeft | Self::Left => Anchor::Start,
            Self::TopRight | Self::BottomRight | Self::Right => Anchor::End,
        }
    }

    fn vertical(self) -> Anchor {
        match self {
            Self::Center | Self::Left | Self::Right => Anchor::Middle,
            Self::TopLeft | Self::TopRight => Anchor::Start,
            Self::BottomLeft | Self::BottomRight => Anchor::End,
        }
    }
}

impl fmt::Display for BadgeAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BadgeAlignment {
    type Err = String;

    /// Accepts `top_right`, `top-right`, `TopRight` and so on.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|a| a.name().replace('_', "") == key)
            .ok_or_else(|| format!("unknown badge alignment '{}'", s))
    }
}

/// Where everything goes for one paint, in the view's coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BadgeLayout {
    /// The formatted value.
    pub text: String,
    /// Measured size of `text`.
    pub text_size: Size,
    /// Badge size including the shadow extent.
    pub badge_size: Size,
    /// Outer bounds of the stroked capsule, shadow excluded.
    pub shape: Rect,
    /// Always half of `shape`'s height.
    pub corner_radius: f64,
    /// The shadow's copy of `shape`, when the shadow is on.
    pub shadow: Option<Rect>,
    /// Top-left corner of the text, `adjust_offset` applied.
    pub text_origin: Point,
}

impl BadgeLayout {
    /// Area touched by the paint: the shape plus its shadow copy.
    pub fn extent(&self) -> Rect {
        match self.shadow {
            Some(shadow) => self.shape.union(&shadow),
            None => self.shape,
        }
    }

    pub fn fits(&self, bounds: &Rect) -> bool {
        bounds.contains_rect(&self.extent())
    }
}

/// Capsule size around a text box.
///
/// The width is never less than the height so single digits get a circle.
fn shape_size_for_text(text_size: Size, pad: u32, stroke_width: f64) -> Size {
    let allowance = 2.0 * pad as f64 + 2.0 * stroke_width;
    Size::new(
        text_size.width.max(text_size.height) + allowance,
        text_size.height + allowance,
    )
}

/// A view that displays a number in a badge.
///
/// Every setter requests a repaint through [`BadgeView::set_needs_display`].
/// All access happens on the UI thread.
pub struct BadgeView {
    frame: Rect,
    value: u64,
    text_format: TextFormat,
    font: Font,
    fill_color: Color,
    stroke_color: Color,
    stroke_width: f64,
    text_color: Color,
    pad: u32,
    shadow: bool,
    shadow_offset: Size,
    shadow_color: Color,
    shine: bool,
    hide_when_zero: bool,
    badge_alignment: BadgeAlignment,
    adjust_offset: Point,
    needs_display: bool,
    host: Option<Rc<dyn DisplayHost>>,
}

impl BadgeView {
    /// Creates a badge with the default style and a value of zero.
    pub fn new(frame: Rect) -> Self {
        Self {
            frame,
            value: 0,
            text_format: TextFormat::default(),
            font: Font::default(),
            fill_color: theme::RED,
            stroke_color: theme::WHITE,
            stroke_width: DEFAULT_STROKE_WIDTH,
            text_color: theme::WHITE,
            pad: DEFAULT_PAD,
            shadow: false,
            shadow_offset: DEFAULT_SHADOW_OFFSET,
            shadow_color: theme::SHADOW,
            shine: false,
            hide_when_zero: false,
            badge_alignment: BadgeAlignment::Center,
            adjust_offset: Point::ZERO,
            needs_display: true,
            host: None,
        }
    }

    /// Creates a badge whose frame exactly fits `pattern_text`.
    ///
    /// The text is measured in `font`, or the default bold system font when
    /// `None`, and sized with the default pad and stroke and no shadow.
    /// Returns `None` when no usable frame can be built from the measurement.
    pub fn fitting_text(
        pattern_text: &str,
        font: Option<Font>,
        measurer: &dyn TextMeasurer,
    ) -> Option<Self> {
        let font = font.unwrap_or_default();
        let text_size = measurer.measure(pattern_text, &font);
        let size = Self::default_badge_size_for_text_size(text_size);
        if !size.is_drawable() {
            log::warn!(
                "Cannot build badge frame for {:?} in {} {}pt: measured {:?}",
                pattern_text,
                font.family,
                font.size,
                text_size
            );
            return None;
        }

        log::debug!("Badge frame for {:?}: {:?}", pattern_text, size);
        let mut view = Self::new(Rect::from_size(size));
        view.font = font;
        Some(view)
    }

    /// Badge size for a text box using the default pad and stroke and no
    /// shadow. Depends on nothing but `text_size`.
    pub fn default_badge_size_for_text_size(text_size: Size) -> Size {
        shape_size_for_text(text_size, DEFAULT_PAD, DEFAULT_STROKE_WIDTH)
    }

    // -- invalidation -------------------------------------------------------

    /// Routes repaint requests to the host toolkit.
    pub fn attach_host(&mut self, host: Rc<dyn DisplayHost>) {
        self.host = Some(host);
        self.set_needs_display();
    }

    pub fn detach_host(&mut self) {
        self.host = None;
    }

    /// Marks the badge dirty and tells the attached host, if any.
    pub fn set_needs_display(&mut self) {
        self.needs_display = true;
        if let Some(host) = &self.host {
            host.set_needs_display();
        }
    }

    pub fn needs_display(&self) -> bool {
        self.needs_display
    }

    // -- derived values -----------------------------------------------------

    /// The value rendered through the text format.
    pub fn display_text(&self) -> String {
        self.text_format.format(self.value)
    }

    /// True when nothing will be drawn for the current value.
    pub fn is_hidden(&self) -> bool {
        self.hide_when_zero && self.value == 0
    }

    /// The visual size of the badge for the current value, shadow included.
    ///
    /// This is not the size of the view's bounds, which should be larger.
    pub fn badge_size(&self, measurer: &dyn TextMeasurer) -> Size {
        let text_size = measurer.measure(&self.display_text(), &self.font);
        self.badge_size_for_text(text_size)
    }

    /// Corner radius of the capsule: half the height without the shadow.
    pub fn corner_radius(&self, measurer: &dyn TextMeasurer) -> f64 {
        let text_size = measurer.measure(&self.display_text(), &self.font);
        self.shape_size(text_size).height / 2.0
    }

    fn shape_size(&self, text_size: Size) -> Size {
        shape_size_for_text(text_size, self.pad, self.stroke_width)
    }

    fn badge_size_for_text(&self, text_size: Size) -> Size {
        let shape = self.shape_size(text_size);
        if !self.shadow {
            return shape;
        }
        // Blur is not accounted for.
        Size::new(
            shape.width + self.shadow_offset.width.abs(),
            shape.height + self.shadow_offset.height.abs(),
        )
    }

    /// Room the shadow needs before and after the shape on each axis.
    fn shadow_margins(&self) -> (Size, Size) {
        if !self.shadow {
            return (Size::ZERO, Size::ZERO);
        }
        let Size { width, height } = self.shadow_offset;
        (
            Size::new((-width).max(0.0), (-height).max(0.0)),
            Size::new(width.max(0.0), height.max(0.0)),
        )
    }

    /// Places the badge inside `bounds` for the current value and style.
    pub fn layout(&self, bounds: Rect, measurer: &dyn TextMeasurer) -> BadgeLayout {
        let text = self.display_text();
        let text_size = measurer.measure(&text, &self.font);
        let shape_size = self.shape_size(text_size);
        let (lead, trail) = self.shadow_margins();

        let x = match self.badge_alignment.horizontal() {
            Anchor::Start => bounds.min_x() + lead.width,
            Anchor::Middle => bounds.min_x() + (bounds.width() - shape_size.width) / 2.0,
            Anchor::End => bounds.max_x() - shape_size.width - trail.width,
        };
        let y = match self.badge_alignment.vertical() {
            Anchor::Start => bounds.min_y() + lead.height,
            Anchor::Middle => bounds.min_y() + (bounds.height() - shape_size.height) / 2.0,
            Anchor::End => bounds.max_y() - shape_size.height - trail.height,
        };

        let shape = Rect {
            origin: Point::new(x, y),
            size: shape_size,
        };
        let shadow = self
            .shadow
            .then(|| shape.translate(self.shadow_offset.width, self.shadow_offset.height));
        let center = shape.center();
        let text_origin = Point::new(
            center.x - text_size.width / 2.0 + self.adjust_offset.x,
            center.y - text_size.height / 2.0 + self.adjust_offset.y,
        );

        BadgeLayout {
            text,
            text_size,
            badge_size: self.badge_size_for_text(text_size),
            shape,
            corner_radius: shape_size.height / 2.0,
            shadow,
            text_origin,
        }
    }

    /// Draws the badge into `bounds`. Draws nothing while hidden.
    pub fn paint(&self, canvas: &mut dyn Canvas, bounds: Rect, measurer: &dyn TextMeasurer) {
        if self.is_hidden() {
            return;
        }

        let layout = self.layout(bounds, measurer);
        if !layout.fits(&bounds) {
            log::debug!(
                "Badge {:?} overflows bounds {:?}",
                layout.badge_size,
                bounds.size
            );
        }

        let outline = RoundedRect::new(layout.shape, layout.corner_radius);
        // The stroke straddles the path; inset so its outer edge is the outline.
        let body = outline.inset(self.stroke_width / 2.0);

        canvas.save();

        if let Some(shadow) = layout.shadow {
            canvas.fill(&RoundedRect::new(shadow, layout.corner_radius), self.shadow_color);
        }

        canvas.fill(&body, self.fill_color);
        if self.stroke_width > 0.0 {
            canvas.stroke(&body, self.stroke_color, self.stroke_width);
        }

        if self.shine {
            let center = body.rect.center();
            canvas.save();
            canvas.clip(&body);
            canvas.fill_linear_gradient(
                Point::new(center.x, body.rect.min_y()),
                Point::new(center.x, center.y),
                &SHINE_STOPS,
            );
            canvas.restore();
        }

        canvas.draw_text(&layout.text, &self.font, layout.text_origin, self.text_color);

        canvas.restore();
    }

    // -- properties ---------------------------------------------------------

    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// The frame's size at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.frame.size)
    }

    pub fn set_frame(&mut self, frame: Rect) {
        if frame != self.frame {
            self.frame = frame;
            if let Some(host) = &self.host {
                host.frame_did_change(frame);
            }
        }
        self.set_needs_display();
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn set_value(&mut self, value: u64) {
        self.value = value;
        self.set_needs_display();
    }

    pub fn increment(&mut self) {
        self.set_value(self.value.saturating_add(1));
    }

    pub fn decrement(&mut self) {
        self.set_value(self.value.saturating_sub(1));
    }

    pub fn text_format(&self) -> &TextFormat {
        &self.text_format
    }

    /// Sets the template. It must contain exactly one numeric placeholder;
    /// see [`TextFormat`] for what happens otherwise.
    pub fn set_text_format(&mut self, text_format: impl Into<TextFormat>) {
        self.text_format = text_format.into();
        self.set_needs_display();
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    pub fn set_font(&mut self, font: Font) {
        self.font = font;
        self.set_needs_display();
    }

    pub fn fill_color(&self) -> Color {
        self.fill_color
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
        self.set_needs_display();
    }

    pub fn stroke_color(&self) -> Color {
        self.stroke_color
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        self.stroke_color = color;
        self.set_needs_display();
    }

    pub fn stroke_width(&self) -> f64 {
        self.stroke_width
    }

    /// Negative and non-finite widths become 0.
    pub fn set_stroke_width(&mut self, width: f64) {
        self.stroke_width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        self.set_needs_display();
    }

    pub fn text_color(&self) -> Color {
        self.text_color
    }

    pub fn set_text_color(&mut self, color: Color) {
        self.text_color = color;
        self.set_needs_display();
    }

    pub fn pad(&self) -> u32 {
        self.pad
    }

    /// Approximate spacing between the text and the stroke. Font geometry can
    /// make the visible pad slightly larger or smaller.
    pub fn set_pad(&mut self, pad: u32) {
        self.pad = pad;
        self.set_needs_display();
    }

    pub fn shadow(&self) -> bool {
        self.shadow
    }

    pub fn set_shadow(&mut self, shadow: bool) {
        self.shadow = shadow;
        self.set_needs_display();
    }

    pub fn shadow_offset(&self) -> Size {
        self.shadow_offset
    }

    pub fn set_shadow_offset(&mut self, offset: Size) {
        self.shadow_offset = offset;
        self.set_needs_display();
    }

    pub fn shadow_color(&self) -> Color {
        self.shadow_color
    }

    pub fn set_shadow_color(&mut self, color: Color) {
        self.shadow_color = color;
        self.set_needs_display();
    }

    pub fn shine(&self) -> bool {
        self.shine
    }

    pub fn set_shine(&mut self, shine: bool) {
        self.shine = shine;
        self.set_needs_display();
    }

    pub fn hide_when_zero(&self) -> bool {
        self.hide_when_zero
    }

    pub fn set_hide_when_zero(&mut self, hide: bool) {
        self.hide_when_zero = hide;
        self.set_needs_display();
    }

    pub fn badge_alignment(&self) -> BadgeAlignment {
        self.badge_alignment
    }

    pub fn set_badge_alignment(&mut self, alignment: BadgeAlignment) {
        self.badge_alignment = alignment;
        self.set_needs_display();
    }

    pub fn adjust_offset(&self) -> Point {
        self.adjust_offset
    }

    /// Manual correction applied to the text position only.
    pub fn set_adjust_offset(&mut self, offset: Point) {
        self.adjust_offset = offset;
        self.set_needs_display();
    }
}

impl fmt::Debug for BadgeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BadgeView")
            .field("frame", &self.frame)
            .field("value", &self.value)
            .field("text_format", &self.text_format.template())
            .field("font", &self.font)
            .field("pad", &self.pad)
            .field("stroke_width", &self.stroke_width)
            .field("shadow", &self.shadow)
            .field("shine", &self.shine)
            .field("hide_when_zero", &self.hide_when_zero)
            .field("badge_alignment", &self.badge_alignment)
            .field("needs_display", &self.needs_display)
            .finish_non_exhaustive()
    }
}

impl Component for BadgeView {
    fn measure(&self, ctx: &MeasureContext) -> Size {
        self.badge_size(ctx.measurer)
    }

    fn draw(&self, ctx: &mut DrawContext) {
        self.paint(ctx.canvas, ctx.bounds, ctx.measurer);
    }

    fn take_needs_display(&mut self) -> bool {
        std::mem::take(&mut self.needs_display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawOp, RecordingCanvas};
    use std::cell::{Cell, RefCell};

    /// Half an em per character, one em tall.
    struct HalfEm;

    impl TextMeasurer for HalfEm {
        fn measure(&self, text: &str, font: &Font) -> Size {
            Size::new(text.chars().count() as f64 * font.size / 2.0, font.size)
        }
    }

    #[derive(Default)]
    struct CountingHost {
        calls: Cell<usize>,
        frames: RefCell<Vec<Rect>>,
    }

    impl DisplayHost for CountingHost {
        fn set_needs_display(&self) {
            self.calls.set(self.calls.get() + 1);
        }

        fn frame_did_change(&self, frame: Rect) {
            self.frames.borrow_mut().push(frame);
        }
    }

    fn view(width: f64, height: f64) -> BadgeView {
        BadgeView::new(Rect::new(0.0, 0.0, width, height))
    }

    fn painted(view: &BadgeView) -> RecordingCanvas {
        let mut canvas = RecordingCanvas::new();
        view.paint(&mut canvas, view.bounds(), &HalfEm);
        canvas
    }

    // -- sizing -------------------------------------------------------------

    #[test]
    fn single_digit_badge_is_a_circle() {
        let mut badge = view(100.0, 50.0);
        badge.set_value(8);
        // text 8x16, pad 2, stroke 2
        assert_eq!(badge.badge_size(&HalfEm), Size::new(24.0, 24.0));
    }

    #[test]
    fn long_values_widen_the_badge() {
        let mut badge = view(100.0, 50.0);
        badge.set_value(12345);
        let size = badge.badge_size(&HalfEm);
        assert_eq!(size, Size::new(40.0 + 8.0, 24.0));
    }

    #[test]
    fn shadow_extends_by_absolute_offset() {
        let mut badge = view(100.0, 50.0);
        badge.set_value(8);
        badge.set_shadow(true);
        badge.set_shadow_offset(Size::new(-2.0, 3.0));
        assert_eq!(badge.badge_size(&HalfEm), Size::new(26.0, 27.0));
    }

    #[test]
    fn badge_size_non_decreasing_in_pad() {
        let mut badge = view(100.0, 50.0);
        badge.set_value(42);
        let mut last = Size::ZERO;
        for pad in 0..12 {
            badge.set_pad(pad);
            let size = badge.badge_size(&HalfEm);
            assert!(size.width >= last.width && size.height >= last.height);
            last = size;
        }
    }

    #[test]
    fn badge_size_non_decreasing_in_stroke_width() {
        let mut badge = view(100.0, 50.0);
        badge.set_value(7);
        badge.set_shadow(true);
        let mut last = Size::ZERO;
        for step in 0..20 {
            badge.set_stroke_width(step as f64 * 0.5);
            let size = badge.badge_size(&HalfEm);
            assert!(size.width >= last.width && size.height >= last.height);
            last = size;
        }
    }

    #[test]
    fn stroke_width_clamped_to_zero() {
        let mut badge = view(10.0, 10.0);
        badge.set_stroke_width(-4.0);
        assert_eq!(badge.stroke_width(), 0.0);
        badge.set_stroke_width(f64::NAN);
        assert_eq!(badge.stroke_width(), 0.0);
    }

    #[test]
    fn default_size_for_text_size_is_pure() {
        let text = Size::new(21.5, 19.0);
        let a = BadgeView::default_badge_size_for_text_size(text);
        let b = BadgeView::default_badge_size_for_text_size(text);
        assert_eq!(a, b);
        assert_eq!(a, Size::new(29.5, 27.0));
    }

    #[test]
    fn default_size_ignores_instance_style() {
        let mut badge = view(10.0, 10.0);
        badge.set_pad(10);
        badge.set_shadow(true);
        let text = Size::new(8.0, 16.0);
        assert_eq!(
            BadgeView::default_badge_size_for_text_size(text),
            Size::new(24.0, 24.0)
        );
    }

    #[test]
    fn corner_radius_is_half_unshadowed_height() {
        let mut badge = view(200.0, 100.0);
        badge.set_value(321);
        badge.set_shadow(true);
        badge.set_shadow_offset(Size::new(1.0, 5.0));
        for pad in [0, 1, 4, 9] {
            for stroke in [0.0, 1.0, 2.5] {
                for size in [9.0, 16.0, 30.0] {
                    badge.set_pad(pad);
                    badge.set_stroke_width(stroke);
                    badge.set_font(Font::bold_system(size));
                    let layout = badge.layout(badge.bounds(), &HalfEm);
                    assert_eq!(layout.corner_radius, layout.shape.height() / 2.0);
                    assert_eq!(
                        layout.corner_radius,
                        (layout.badge_size.height - 5.0) / 2.0
                    );
                    assert_eq!(badge.corner_radius(&HalfEm), layout.corner_radius);
                }
            }
        }
    }

    #[test]
    fn font_change_updates_badge_size() {
        let mut badge = view(100.0, 100.0);
        badge.set_value(5);
        let before = badge.badge_size(&HalfEm);
        badge.set_font(Font::bold_system(32.0));
        let after = badge.badge_size(&HalfEm);
        assert!(after.width > before.width);
        assert!(after.height > before.height);
    }

    // -- fit to text --------------------------------------------------------

    #[test]
    fn fitting_text_frame_matches_default_size() {
        let badge = BadgeView::fitting_text("88", None, &HalfEm).unwrap();
        let expected = BadgeView::default_badge_size_for_text_size(Size::new(16.0, 16.0));
        assert_eq!(badge.frame(), Rect::from_size(expected));
        assert_eq!(badge.font(), &Font::default());
    }

    #[test]
    fn fitting_two_digits_is_wider_than_tall_with_single_digit_height() {
        let mut badge = BadgeView::fitting_text("88", None, &HalfEm).unwrap();
        badge.set_value(88);
        let two = badge.badge_size(&HalfEm);
        assert!(two.width >= two.height);

        let one = BadgeView::default_badge_size_for_text_size(HalfEm.measure("8", &Font::default()));
        assert_eq!(two.height, one.height);
    }

    #[test]
    fn fitting_text_keeps_custom_font() {
        let font = Font::system(12.0);
        let badge = BadgeView::fitting_text("999", Some(font.clone()), &HalfEm).unwrap();
        assert_eq!(badge.font(), &font);
        assert_eq!(badge.frame().size, Size::new(18.0 + 8.0, 12.0 + 8.0));
    }

    #[test]
    fn fitting_text_fails_on_unusable_measurement() {
        struct Broken;
        impl TextMeasurer for Broken {
            fn measure(&self, _: &str, _: &Font) -> Size {
                Size::new(f64::NAN, f64::NAN)
            }
        }
        assert!(BadgeView::fitting_text("1", None, &Broken).is_none());
    }

    // -- placement ----------------------------------------------------------

    #[test]
    fn center_alignment_centers_both_axes() {
        let mut badge = view(100.0, 50.0);
        badge.set_value(8);
        let layout = badge.layout(badge.bounds(), &HalfEm);
        assert_eq!(layout.shape, Rect::new(38.0, 13.0, 24.0, 24.0));
    }

    #[test]
    fn top_right_is_flush_to_corner_for_any_value() {
        let mut badge = view(100.0, 50.0);
        badge.set_badge_alignment(BadgeAlignment::TopRight);
        for value in [0, 3, 77, 123_456] {
            badge.set_value(value);
            let layout = badge.layout(badge.bounds(), &HalfEm);
            assert_eq!(layout.shape.min_y(), 0.0);
            assert_eq!(layout.shape.max_x(), 100.0);
        }
    }

    #[test]
    fn corners_keep_shadow_inside_bounds() {
        let mut badge = view(100.0, 50.0);
        badge.set_value(8);
        badge.set_shadow(true);
        badge.set_shadow_offset(Size::new(-2.0, -4.0));

        badge.set_badge_alignment(BadgeAlignment::TopRight);
        let layout = badge.layout(badge.bounds(), &HalfEm);
        assert_eq!(layout.shape.origin, Point::new(76.0, 4.0));
        assert_eq!(layout.shadow.unwrap().origin, Point::new(74.0, 0.0));

        badge.set_badge_alignment(BadgeAlignment::TopLeft);
        let layout = badge.layout(badge.bounds(), &HalfEm);
        assert_eq!(layout.shape.origin, Point::new(2.0, 4.0));

        badge.set_shadow_offset(Size::new(0.0, 3.0));
        badge.set_badge_alignment(BadgeAlignment::BottomRight);
        let layout = badge.layout(badge.bounds(), &HalfEm);
        assert_eq!(layout.shape.origin, Point::new(76.0, 23.0));
        assert_eq!(layout.shadow.unwrap().max_y(), 50.0);

        badge.set_badge_alignment(BadgeAlignment::BottomLeft);
        let layout = badge.layout(badge.bounds(), &HalfEm);
        assert_eq!(layout.shape.origin, Point::new(0.0, 23.0));
    }

    #[test]
    fn edges_center_vertically_ignoring_shadow() {
        let mut badge = view(100.0, 50.0);
        badge.set_value(8);
        badge.set_shadow(true);
        badge.set_shadow_offset(Size::new(0.0, 6.0));

        badge.set_badge_alignment(BadgeAlignment::Left);
        let layout = badge.layout(badge.bounds(), &HalfEm);
        assert_eq!(layout.shape.origin, Point::new(0.0, 13.0));

        badge.set_badge_alignment(BadgeAlignment::Right);
        let layout = badge.layout(badge.bounds(), &HalfEm);
        assert_eq!(layout.shape.origin, Point::new(76.0, 13.0));

        badge.set_badge_alignment(BadgeAlignment::Center);
        let layout = badge.layout(badge.bounds(), &HalfEm);
        assert_eq!(layout.shape.center(), Point::new(50.0, 25.0));
    }

    #[test]
    fn layout_respects_bounds_origin() {
        let mut badge = view(100.0, 50.0);
        badge.set_value(8);
        badge.set_badge_alignment(BadgeAlignment::TopLeft);
        let layout = badge.layout(Rect::new(10.0, 20.0, 100.0, 50.0), &HalfEm);
        assert_eq!(layout.shape.origin, Point::new(10.0, 20.0));
    }

    #[test]
    fn extent_includes_the_shadow() {
        let mut badge = view(24.0, 27.0);
        badge.set_value(8);
        badge.set_shadow(true);

        let layout = badge.layout(badge.bounds(), &HalfEm);
        assert_eq!(layout.extent(), Rect::new(0.0, 1.5, 24.0, 27.0));
        // Centering ignores the shadow, so its copy hangs past the bottom.
        assert!(badge.bounds().contains_rect(&layout.shape));
        assert!(!layout.fits(&badge.bounds()));

        badge.set_badge_alignment(BadgeAlignment::TopLeft);
        let layout = badge.layout(badge.bounds(), &HalfEm);
        assert_eq!(layout.extent(), badge.bounds());
        assert!(layout.fits(&badge.bounds()));

        badge.set_shadow(false);
        let layout = badge.layout(badge.bounds(), &HalfEm);
        assert_eq!(layout.extent(), layout.shape);
    }

    #[test]
    fn adjust_offset_moves_text_only() {
        let mut badge = view(100.0, 50.0);
        badge.set_value(8);
        let before = badge.layout(badge.bounds(), &HalfEm);
        badge.set_adjust_offset(Point::new(1.5, -2.0));
        let after = badge.layout(badge.bounds(), &HalfEm);

        assert_eq!(before.shape, after.shape);
        assert_eq!(after.text_origin, before.text_origin.offset(1.5, -2.0));
        assert_eq!(before.text_origin, Point::new(46.0, 17.0));
    }

    #[test]
    fn alignment_parses_loose_names() {
        assert_eq!("top_right".parse::<BadgeAlignment>(), Ok(BadgeAlignment::TopRight));
        assert_eq!("Bottom-Left".parse::<BadgeAlignment>(), Ok(BadgeAlignment::BottomLeft));
        assert_eq!("TopLeft".parse::<BadgeAlignment>(), Ok(BadgeAlignment::TopLeft));
        assert_eq!("center".parse::<BadgeAlignment>(), Ok(BadgeAlignment::Center));
        assert!("middle".parse::<BadgeAlignment>().is_err());
        for alignment in BadgeAlignment::ALL {
            assert_eq!(alignment.to_string().parse::<BadgeAlignment>(), Ok(alignment));
        }
    }

    // -- painting -----------------------------------------------------------

    #[test]
    fn hide_when_zero_suppresses_then_resumes() {
        let mut badge = view(100.0, 50.0);
        badge.set_hide_when_zero(true);
        badge.set_value(0);
        assert!(badge.is_hidden());
        assert!(painted(&badge).is_empty());
        assert!(badge.hide_when_zero());

        badge.set_value(1);
        assert!(!badge.is_hidden());
        let canvas = painted(&badge);
        assert_eq!(canvas.texts(), vec!["1"]);
        assert_eq!(
            badge.badge_size(&HalfEm),
            BadgeView::default_badge_size_for_text_size(HalfEm.measure("1", badge.font()))
        );
    }

    #[test]
    fn zero_is_drawn_without_hide_flag() {
        let badge = view(100.0, 50.0);
        assert_eq!(painted(&badge).texts(), vec!["0"]);
    }

    #[test]
    fn paint_order_without_extras() {
        let mut badge = view(100.0, 50.0);
        badge.set_value(8);
        let ops = painted(&badge).into_ops();

        assert_eq!(ops.len(), 5);
        assert_eq!(ops[0], DrawOp::Save);
        match &ops[1] {
            DrawOp::Fill { shape, color } => {
                assert_eq!(color, "#ff0000");
                assert_eq!(shape.rect, Rect::new(39.0, 14.0, 22.0, 22.0));
                assert_eq!(shape.radius, 11.0);
            }
            other => panic!("expected fill, got {:?}", other),
        }
        match &ops[2] {
            DrawOp::Stroke { color, width, .. } => {
                assert_eq!(color, "#ffffff");
                assert_eq!(*width, 2.0);
            }
            other => panic!("expected stroke, got {:?}", other),
        }
        assert!(matches!(&ops[3], DrawOp::Text { text, .. } if text == "8"));
        assert_eq!(ops[4], DrawOp::Restore);
    }

    #[test]
    fn zero_stroke_skips_stroke() {
        let mut badge = view(100.0, 50.0);
        badge.set_stroke_width(0.0);
        let ops = painted(&badge).into_ops();
        assert!(!ops.iter().any(|op| matches!(op, DrawOp::Stroke { .. })));
    }

    #[test]
    fn shadow_is_drawn_first_at_offset() {
        let mut badge = view(100.0, 50.0);
        badge.set_value(8);
        badge.set_shadow(true);
        let ops = painted(&badge).into_ops();
        let layout = badge.layout(badge.bounds(), &HalfEm);

        match &ops[1] {
            DrawOp::Fill { shape, color } => {
                assert_eq!(color, "#00000080");
                assert_eq!(shape.rect, layout.shape.translate(0.0, 3.0));
            }
            other => panic!("expected shadow fill, got {:?}", other),
        }
    }

    #[test]
    fn shine_clips_gradient_to_badge() {
        let mut badge = view(100.0, 50.0);
        badge.set_value(8);
        badge.set_shine(true);
        let ops = painted(&badge).into_ops();

        let clip = ops
            .iter()
            .position(|op| matches!(op, DrawOp::Clip { .. }))
            .unwrap();
        assert_eq!(ops[clip - 1], DrawOp::Save);
        match &ops[clip + 1] {
            DrawOp::LinearGradient { start, end, stops } => {
                assert_eq!(start.y, 14.0);
                assert_eq!(end.y, 25.0);
                assert_eq!(stops.len(), 2);
            }
            other => panic!("expected gradient, got {:?}", other),
        }
        assert_eq!(ops[clip + 2], DrawOp::Restore);
    }

    #[test]
    fn text_format_applies_to_drawn_text() {
        let mut badge = view(100.0, 50.0);
        badge.set_value(99);
        badge.set_text_format("{}+");
        assert_eq!(badge.display_text(), "99+");
        assert_eq!(painted(&badge).texts(), vec!["99+"]);
    }

    #[test]
    fn repaint_is_idempotent() {
        let mut badge = view(100.0, 50.0);
        badge.set_value(12);
        badge.set_shine(true);
        badge.set_shadow(true);
        assert_eq!(painted(&badge).into_ops(), painted(&badge).into_ops());
    }

    // -- invalidation -------------------------------------------------------

    #[test]
    fn every_setter_invalidates() {
        let host = Rc::new(CountingHost::default());
        let mut badge = view(100.0, 50.0);
        badge.attach_host(host.clone());
        assert!(badge.take_needs_display());
        let base = host.calls.get();

        let setters: Vec<Box<dyn Fn(&mut BadgeView)>> = vec![
            Box::new(|b: &mut BadgeView| b.set_value(3)),
            Box::new(|b: &mut BadgeView| b.set_text_format("%d")),
            Box::new(|b: &mut BadgeView| b.set_font(Font::system(12.0))),
            Box::new(|b: &mut BadgeView| b.set_pad(4)),
            Box::new(|b: &mut BadgeView| b.set_stroke_width(1.0)),
            Box::new(|b: &mut BadgeView| b.set_shadow(true)),
            Box::new(|b: &mut BadgeView| b.set_shadow_offset(Size::new(1.0, 1.0))),
            Box::new(|b: &mut BadgeView| b.set_shadow_color(theme::WHITE)),
            Box::new(|b: &mut BadgeView| b.set_shine(true)),
            Box::new(|b: &mut BadgeView| b.set_fill_color(theme::WHITE)),
            Box::new(|b: &mut BadgeView| b.set_stroke_color(theme::RED)),
            Box::new(|b: &mut BadgeView| b.set_text_color(theme::RED)),
            Box::new(|b: &mut BadgeView| b.set_hide_when_zero(true)),
            Box::new(|b: &mut BadgeView| b.set_badge_alignment(BadgeAlignment::Left)),
            Box::new(|b: &mut BadgeView| b.set_adjust_offset(Point::new(1.0, 0.0))),
            Box::new(|b: &mut BadgeView| b.set_frame(Rect::new(0.0, 0.0, 10.0, 10.0))),
            Box::new(|b: &mut BadgeView| b.increment()),
            Box::new(|b: &mut BadgeView| b.decrement()),
        ];

        for (i, setter) in setters.iter().enumerate() {
            setter(&mut badge);
            assert!(badge.take_needs_display(), "setter {} did not invalidate", i);
            assert!(!badge.needs_display());
            assert_eq!(host.calls.get(), base + i + 1);
        }
    }

    #[test]
    fn host_follows_frame_changes() {
        let host = Rc::new(CountingHost::default());
        let mut badge = view(10.0, 10.0);
        badge.attach_host(host.clone());

        let moved = Rect::new(5.0, 5.0, 30.0, 20.0);
        badge.set_frame(moved);
        assert_eq!(*host.frames.borrow(), vec![moved]);
        assert_eq!(badge.bounds(), Rect::new(0.0, 0.0, 30.0, 20.0));

        // Same frame: repaint only.
        let calls = host.calls.get();
        badge.set_frame(moved);
        assert_eq!(host.frames.borrow().len(), 1);
        assert_eq!(host.calls.get(), calls + 1);
    }

    #[test]
    fn detached_host_is_not_notified() {
        let host = Rc::new(CountingHost::default());
        let mut badge = view(10.0, 10.0);
        badge.attach_host(host.clone());
        badge.detach_host();
        let calls = host.calls.get();
        badge.set_value(4);
        assert_eq!(host.calls.get(), calls);
        assert!(badge.needs_display());
    }

    #[test]
    fn increment_and_decrement_saturate() {
        let mut badge = view(10.0, 10.0);
        badge.decrement();
        assert_eq!(badge.value(), 0);
        badge.set_value(u64::MAX);
        badge.increment();
        assert_eq!(badge.value(), u64::MAX);
        badge.decrement();
        assert_eq!(badge.value(), u64::MAX - 1);
    }

    #[test]
    fn component_measure_matches_badge_size() {
        let mut badge = view(100.0, 50.0);
        badge.set_value(64);
        let ctx = MeasureContext::new(&HalfEm);
        assert_eq!(badge.measure(&ctx), badge.badge_size(&HalfEm));

        let mut canvas = RecordingCanvas::new();
        let mut draw = DrawContext {
            canvas: &mut canvas,
            measurer: &HalfEm,
            bounds: badge.bounds(),
        };
        badge.draw(&mut draw);
        assert_eq!(canvas.texts(), vec!["64"]);
    }
}
