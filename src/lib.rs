//! A number badge view.
//!
//! [`BadgeView`] displays an unsigned value inside a rounded, stroked,
//! optionally shadowed and shined capsule, sized from the formatted value and
//! placed inside its host bounds by [`BadgeAlignment`]. The host toolkit
//! supplies text measurement ([`TextMeasurer`]), drawing ([`Canvas`]) and
//! invalidation ([`DisplayHost`]); on macOS the `render` and `view` modules
//! provide all three over Core Graphics and AppKit.
//!
//! ```
//! use numbadge::{BadgeView, EstimatedMetrics, RecordingCanvas};
//!
//! let metrics = EstimatedMetrics::default();
//! let mut badge = BadgeView::fitting_text("88", None, &metrics).unwrap();
//! badge.set_value(12);
//!
//! let mut canvas = RecordingCanvas::new();
//! badge.paint(&mut canvas, badge.bounds(), &metrics);
//! assert_eq!(canvas.texts(), vec!["12"]);
//! ```

pub mod badge;
pub mod canvas;
pub mod component;
pub mod config;
pub mod format;
pub mod geometry;
pub mod measure;
pub mod theme;

#[cfg(target_os = "macos")]
pub mod render;
#[cfg(target_os = "macos")]
pub mod view;

pub use badge::{BadgeAlignment, BadgeLayout, BadgeView};
pub use canvas::{Canvas, DrawOp, GradientStop, RecordingCanvas, RoundedRect};
pub use component::{Component, DisplayHost, DrawContext, MeasureContext};
pub use format::TextFormat;
pub use geometry::{Point, Rect, Size};
pub use measure::{EstimatedMetrics, TextMeasurer};
pub use theme::{Color, Font};
