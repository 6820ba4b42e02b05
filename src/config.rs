//! Run configuration.
//!
//! [`DeckConfig::default`] is the fixed setup the tool was built for; a JSON
//! file can override any subset of fields.

use crate::catalog::{ScreenshotCatalog, ScreenshotKey};
use crate::error::Result;
use crate::layout::{default_annotation_slots, AnnotationSlot, GridSpec, ImageFrame, TextFrame};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Everything the deck updater needs to know.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Deck to read. Never modified.
    pub source: PathBuf,
    /// Verbatim copy of `source` taken before editing.
    pub backup: PathBuf,
    pub screenshots_dir: PathBuf,
    /// Deck with screenshots on the annotation slides.
    pub updated_output: PathBuf,
    /// Deck with the appended showcase slide.
    pub showcase_output: PathBuf,
    pub catalog: ScreenshotCatalog,
    pub annotation_slots: Vec<AnnotationSlot>,
    pub annotation_frame: ImageFrame,
    pub showcase_title: String,
    pub title_frame: TextFrame,
    /// Layout of the first slide master used for the showcase slide.
    pub showcase_layout: usize,
    pub grid: GridSpec,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("StockFlow_Pitch_Deck.pptx"),
            backup: PathBuf::from("StockFlow_Pitch_Deck_backup.pptx"),
            screenshots_dir: PathBuf::from("docs/screenshots"),
            updated_output: PathBuf::from("StockFlow_Pitch_Deck_Updated.pptx"),
            showcase_output: PathBuf::from("StockFlow_with_Screenshots.pptx"),
            catalog: ScreenshotCatalog::default(),
            annotation_slots: default_annotation_slots(),
            annotation_frame: ImageFrame::default(),
            showcase_title: "Digital Inventory - Application Screenshots".to_string(),
            title_frame: TextFrame::default(),
            showcase_layout: 6,
            grid: GridSpec::default(),
        }
    }
}

impl DeckConfig {
    /// Parse a (possibly partial) JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a (possibly partial) JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Resolve every relative path against `root`.
    pub fn rooted_at(mut self, root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        for path in [
            &mut self.source,
            &mut self.backup,
            &mut self.screenshots_dir,
            &mut self.updated_output,
            &mut self.showcase_output,
        ] {
            if path.is_relative() {
                *path = root.join(&*path);
            }
        }
        self
    }

    /// Location of a screenshot on disk.
    pub fn screenshot_path(&self, key: ScreenshotKey) -> PathBuf {
        self.catalog.path_in(&self.screenshots_dir, key)
    }

    /// The annotation slot for a 1-based slide number, if any.
    pub fn slot_for_slide(&self, slide_number: usize) -> Option<ScreenshotKey> {
        self.annotation_slots
            .iter()
            .find(|slot| slot.slide_number == slide_number)
            .map(|slot| slot.key)
    }
}
