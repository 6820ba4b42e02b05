//! Format detection for Office Open XML packages.
//!
//! Decks are checked before any editing so that a Word or Excel file handed in
//! by mistake fails early instead of producing a corrupt output.

use crate::container::{Package, CONTENT_TYPES_PART};
use crate::error::{Error, Result};

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Main-part content types of a PowerPoint package, including the
/// macro-enabled, slideshow and template variants.
const PPTX_CONTENT_TYPES: [&str; 4] = [
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml",
    "application/vnd.ms-powerpoint.presentation.macroEnabled.main+xml",
    "application/vnd.openxmlformats-officedocument.presentationml.slideshow.main+xml",
    "application/vnd.openxmlformats-officedocument.presentationml.template.main+xml",
];

/// Content type for DOCX main document part.
const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";

/// Content type for XLSX workbook part.
const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";

/// Detected Office document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    /// Microsoft Word document (.docx)
    Docx,
    /// Microsoft Excel workbook (.xlsx)
    Xlsx,
    /// Microsoft PowerPoint presentation (.pptx)
    Pptx,
}

impl FormatType {
    /// Returns a human-readable name for this format.
    pub fn name(&self) -> &'static str {
        match self {
            FormatType::Docx => "Word Document",
            FormatType::Xlsx => "Excel Workbook",
            FormatType::Pptx => "PowerPoint Presentation",
        }
    }
}

impl std::fmt::Display for FormatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Detect the format type of an already-loaded package.
///
/// Inspects `[Content_Types].xml` first and falls back to the top-level
/// folder layout when the content types are non-standard.
pub fn detect_format(package: &Package) -> Result<FormatType> {
    let content_types = package
        .read_xml(CONTENT_TYPES_PART)
        .map_err(|_| Error::MissingComponent(CONTENT_TYPES_PART.to_string()))?;

    if PPTX_CONTENT_TYPES.iter().any(|ct| content_types.contains(ct)) {
        Ok(FormatType::Pptx)
    } else if content_types.contains(DOCX_CONTENT_TYPE) {
        Ok(FormatType::Docx)
    } else if content_types.contains(XLSX_CONTENT_TYPE) {
        Ok(FormatType::Xlsx)
    } else {
        detect_by_folder_structure(package)
    }
}

/// Fail with [`Error::NotAPresentation`] unless the package is a deck.
pub fn ensure_presentation(package: &Package) -> Result<()> {
    match detect_format(package)? {
        FormatType::Pptx => Ok(()),
        other => Err(Error::NotAPresentation(other)),
    }
}

/// Fallback detection by checking folder structure.
fn detect_by_folder_structure(package: &Package) -> Result<FormatType> {
    let names = package.part_names();

    let has_word = names.iter().any(|n| n.starts_with("word/"));
    let has_xl = names.iter().any(|n| n.starts_with("xl/"));
    let has_ppt = names.iter().any(|n| n.starts_with("ppt/"));

    match (has_word, has_xl, has_ppt) {
        (true, false, false) => Ok(FormatType::Docx),
        (false, true, false) => Ok(FormatType::Xlsx),
        (false, false, true) => Ok(FormatType::Pptx),
        _ => Err(Error::UnknownFormat),
    }
}

/// Check if data starts with ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == ZIP_MAGIC
}
