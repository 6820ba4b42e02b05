//! PPTX (PowerPoint) presentation editing.
//!
//! This module opens Office Open XML presentations (.pptx), appends slides
//! and shapes, and writes them back out.

pub mod parts;
mod presentation;
pub mod shapes;

pub use presentation::{Presentation, SlideLayout};
pub use shapes::{ShapeKind, ShapeSummary};

/// Package relationship to the main presentation part.
pub const RT_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
pub const RT_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
pub const RT_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
pub const RT_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
pub const RT_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

/// Content type of a slide part.
pub const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
