//! Core Graphics and Core Text backends for the badge collaborators.

mod graphics;

pub use graphics::{CgCanvas, CoreTextMeasurer};
