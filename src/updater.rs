//! The deck updater: annotated deck and showcase deck.
//!
//! The two operations are independent. Each loads the source deck on its
//! own, so the showcase never contains the annotation screenshots.

use crate::catalog::ScreenshotKey;
use crate::config::DeckConfig;
use crate::error::{Error, Result};
use crate::layout::ShowcasePlacement;
use crate::media::Image;
use crate::pptx::{Presentation, ShapeSummary};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, instrument};

/// Characters of existing slide text reported per shape.
pub const TEXT_PREVIEW_CHARS: usize = 50;

/// A screenshot that made it onto a slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsertedScreenshot {
    pub key: ScreenshotKey,
    pub path: PathBuf,
    pub shape_id: u32,
}

/// What happened on one slide of the annotated deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlideVisit {
    /// 1-based slide number.
    pub number: usize,
    /// Shapes found on the slide before anything was added.
    pub shapes: Vec<ShapeSummary>,
    pub inserted: Option<InsertedScreenshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotateReport {
    /// Set when the source existed and was copied.
    pub backup: Option<PathBuf>,
    pub slide_count: usize,
    pub slides: Vec<SlideVisit>,
    pub updates_made: usize,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowcaseReport {
    /// 1-based number of the appended slide.
    pub slide_number: usize,
    pub layout_index: usize,
    pub placements: Vec<ShowcasePlacement>,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub annotate: AnnotateReport,
    pub showcase: ShowcaseReport,
}

/// Runs the two deck operations for a configuration.
#[derive(Debug, Clone, Default)]
pub struct DeckUpdater {
    config: DeckConfig,
}

impl DeckUpdater {
    pub fn new(config: DeckConfig) -> Self {
        Self { config }
    }

    /// Copy the source deck verbatim to the backup path. Returns the backup
    /// path, or `None` when there is no source to copy.
    pub fn write_backup(&self) -> Result<Option<PathBuf>> {
        let config = &self.config;
        if !config.source.exists() {
            return Ok(None);
        }
        fs::copy(&config.source, &config.backup)?;
        debug!(backup = %config.backup.display(), "backup written");
        Ok(Some(config.backup.clone()))
    }

    /// Back up the source, then place the annotation screenshots and write
    /// the updated deck.
    ///
    /// Screenshots missing from disk are skipped and only show up as a lower
    /// `updates_made`. Everything else that goes wrong is returned as an
    /// error; a backup already written stays in place.
    pub fn annotate(&self) -> Result<AnnotateReport> {
        let backup = self.write_backup()?;
        self.annotate_after_backup(backup)
    }

    /// The annotation pass without the backup step. `backup` is only
    /// carried into the report.
    #[instrument(skip(self, backup), fields(source = %self.config.source.display()))]
    pub fn annotate_after_backup(&self, backup: Option<PathBuf>) -> Result<AnnotateReport> {
        let config = &self.config;

        let mut deck = Presentation::open(&config.source)?;
        let slide_count = deck.slide_count();
        let frame = config.annotation_frame;

        let mut slides = Vec::with_capacity(slide_count);
        let mut updates_made = 0;

        for index in 0..slide_count {
            let number = index + 1;
            let shapes = deck.shapes(index)?;

            let mut inserted = None;
            if let Some(key) = config.slot_for_slide(number) {
                let path = config.screenshot_path(key);
                if path.exists() {
                    let image = Image::open(&path)?;
                    let shape_id = deck.add_picture(
                        index,
                        &image,
                        frame.left_emu(),
                        frame.top_emu(),
                        frame.width_emu(),
                    )?;
                    updates_made += 1;
                    inserted = Some(InsertedScreenshot {
                        key,
                        path,
                        shape_id,
                    });
                } else {
                    debug!(slide = number, key = %key, path = %path.display(), "screenshot missing, skipped");
                }
            }

            slides.push(SlideVisit {
                number,
                shapes,
                inserted,
            });
        }

        deck.save(&config.updated_output)?;
        info!(
            output = %config.updated_output.display(),
            updates_made,
            "saved updated presentation"
        );

        Ok(AnnotateReport {
            backup,
            slide_count,
            slides,
            updates_made,
            output: config.updated_output.clone(),
        })
    }

    /// Reload the untouched source, append a showcase slide with a title
    /// and a grid of labeled screenshots, and write the showcase deck.
    #[instrument(skip(self), fields(source = %self.config.source.display()))]
    pub fn showcase(&self) -> Result<ShowcaseReport> {
        let config = &self.config;

        let mut deck = Presentation::open(&config.source)?;
        let layout_index = showcase_layout(&deck, config.showcase_layout)?;
        let slide = deck.add_slide(layout_index)?;

        deck.add_textbox(slide, config.title_frame.to_rect(), &config.showcase_title)?;

        let placements = config
            .grid
            .plan(&ScreenshotKey::ALL, |key| config.screenshot_path(key).exists());

        for placement in &placements {
            let image = Image::open(config.screenshot_path(placement.key))?;
            deck.add_picture(
                slide,
                &image,
                placement.image_left,
                placement.image_top,
                placement.image_width,
            )?;
            deck.add_textbox(slide, placement.label, placement.key.label())?;
        }

        deck.save(&config.showcase_output)?;
        info!(
            output = %config.showcase_output.display(),
            screenshots = placements.len(),
            "saved screenshot showcase"
        );

        Ok(ShowcaseReport {
            slide_number: slide + 1,
            layout_index,
            placements,
            output: config.showcase_output.clone(),
        })
    }

    /// Annotate, then build the showcase.
    pub fn run(&self) -> Result<RunReport> {
        let annotate = self.annotate()?;
        let showcase = self.showcase()?;
        Ok(RunReport { annotate, showcase })
    }
}

/// Pick the layout for the showcase slide: the configured index when the
/// master has it, otherwise the layout declared blank.
fn showcase_layout(deck: &Presentation, preferred: usize) -> Result<usize> {
    if preferred < deck.layout_count() {
        return Ok(preferred);
    }
    deck.layouts()
        .iter()
        .position(|layout| layout.kind.as_deref() == Some("blank"))
        .ok_or_else(|| Error::MissingComponent(format!("slide layout {} or a blank layout", preferred)))
}
