//! # deckshot
//!
//! Inject application screenshots into a PowerPoint deck.
//!
//! The library opens an existing `.pptx`, places screenshots at fixed slide
//! positions and writes the result next to the source, which is never
//! modified. A second, independent pass appends a showcase slide with all
//! screenshots in a labeled grid.
//!
//! ## Quick Start
//!
//! ```no_run
//! use deckshot::{DeckConfig, DeckUpdater};
//!
//! let report = DeckUpdater::new(DeckConfig::default()).run()?;
//! println!("Total updates made: {}", report.annotate.updates_made);
//! # Ok::<(), deckshot::Error>(())
//! ```
//!
//! ## Editing a deck directly
//!
//! ```no_run
//! use deckshot::media::Image;
//! use deckshot::pptx::Presentation;
//! use deckshot::units::inches;
//!
//! let mut deck = Presentation::open("deck.pptx")?;
//! let image = Image::open("docs/screenshots/dashboard.png")?;
//! deck.add_picture(2, &image, inches(1.0), inches(2.0), inches(8.0))?;
//! deck.save("deck_updated.pptx")?;
//! # Ok::<(), deckshot::Error>(())
//! ```

pub mod catalog;
pub mod config;
pub mod container;
pub mod detect;
pub mod error;
pub mod layout;
pub mod media;
pub mod pptx;
pub mod units;
pub mod updater;

// Re-exports
pub use catalog::{ScreenshotCatalog, ScreenshotKey};
pub use config::DeckConfig;
pub use container::{Package, Relationship, Relationships};
pub use detect::FormatType;
pub use error::{Error, Result};
pub use pptx::{Presentation, ShapeKind, ShapeSummary};
pub use updater::{AnnotateReport, DeckUpdater, RunReport, ShowcaseReport, SlideVisit};

/// Run both operations with the built-in configuration, relative to the
/// current directory.
pub fn run_default() -> Result<RunReport> {
    DeckUpdater::new(DeckConfig::default()).run()
}
