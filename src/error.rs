//! Error types for the deckshot library.

use crate::detect::FormatType;
use std::io;
use thiserror::Error;

/// Result type alias for deckshot operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading, editing or writing a deck.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format could not be determined.
    #[error("Unknown file format")]
    UnknownFormat,

    /// The package is an Office document, but not a presentation.
    #[error("Not a presentation: found {0}")]
    NotAPresentation(FormatType),

    /// Error reading or writing the ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// Error reading an image file.
    #[error("Image error: {0}")]
    Image(String),

    /// Error loading configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid or malformed data in the document.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A required document component is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// A slide index past the end of the deck.
    #[error("Slide index {index} out of range (deck has {count} slides)")]
    SlideOutOfRange { index: usize, count: usize },
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}
