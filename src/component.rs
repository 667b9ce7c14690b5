//! The drawable-component capability a host toolkit drives.
//!
//! A host measures a component, asks it to draw into a [`Canvas`] when it is
//! invalidated, and learns about invalidation through [`DisplayHost`] or by
//! polling [`Component::take_needs_display`].

use crate::canvas::Canvas;
use crate::geometry::{Rect, Size};
use crate::measure::TextMeasurer;

/// Context provided during component measurement.
pub struct MeasureContext<'a> {
    /// Text measurement service of the host toolkit
    pub measurer: &'a dyn TextMeasurer,
}

impl<'a> MeasureContext<'a> {
    pub fn new(measurer: &'a dyn TextMeasurer) -> Self {
        Self { measurer }
    }
}

/// Context provided during component drawing.
pub struct DrawContext<'a> {
    /// Drawing surface
    pub canvas: &'a mut dyn Canvas,
    /// Text measurement service of the host toolkit
    pub measurer: &'a dyn TextMeasurer,
    /// The component's own bounds, origin at top-left
    pub bounds: Rect,
}

/// The host toolkit's invalidation channel.
pub trait DisplayHost {
    /// Schedules a repaint before the next frame.
    fn set_needs_display(&self);

    /// The component's frame changed; hosts that own a native view resize it.
    fn frame_did_change(&self, _frame: Rect) {}
}

/// Trait for UI components that can be measured and drawn.
///
/// Components support a two-phase layout: first measure to determine size,
/// then draw at the allocated position. Components live on the UI thread.
pub trait Component {
    /// Measure the component and return its preferred size.
    fn measure(&self, ctx: &MeasureContext) -> Size;

    /// Draw the component into the bounds given in the context.
    fn draw(&self, ctx: &mut DrawContext);

    /// Returns whether a repaint was requested and clears the request.
    fn take_needs_display(&mut self) -> bool;
}
