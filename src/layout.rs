//! Fixed slide positions: annotation slots and the showcase grid.

use crate::catalog::ScreenshotKey;
use crate::units::{inches, Emu, Rect};
use serde::{Deserialize, Serialize};

/// A screenshot pinned to a slide of the annotated deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationSlot {
    /// 1-based slide number.
    pub slide_number: usize,
    pub key: ScreenshotKey,
}

impl AnnotationSlot {
    pub const fn new(slide_number: usize, key: ScreenshotKey) -> Self {
        Self { slide_number, key }
    }
}

/// Slides 3, 4 and 5 get the dashboard, inventory and analytics shots.
pub fn default_annotation_slots() -> Vec<AnnotationSlot> {
    vec![
        AnnotationSlot::new(3, ScreenshotKey::Dashboard),
        AnnotationSlot::new(4, ScreenshotKey::Inventory),
        AnnotationSlot::new(5, ScreenshotKey::Analytics),
    ]
}

/// Where an image goes: the height follows from the image's aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageFrame {
    pub left: f64,
    pub top: f64,
    pub width: f64,
}

impl ImageFrame {
    pub fn left_emu(&self) -> Emu {
        inches(self.left)
    }

    pub fn top_emu(&self) -> Emu {
        inches(self.top)
    }

    pub fn width_emu(&self) -> Emu {
        inches(self.width)
    }
}

impl Default for ImageFrame {
    fn default() -> Self {
        Self {
            left: 1.0,
            top: 2.0,
            width: 8.0,
        }
    }
}

/// A fixed box for text, in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextFrame {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl TextFrame {
    pub fn to_rect(&self) -> Rect {
        Rect::new(
            inches(self.left),
            inches(self.top),
            inches(self.width),
            inches(self.height),
        )
    }
}

impl Default for TextFrame {
    /// The showcase title box.
    fn default() -> Self {
        Self {
            left: 0.5,
            top: 0.3,
            width: 9.0,
            height: 0.5,
        }
    }
}

/// Geometry of the showcase grid, in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSpec {
    pub columns: usize,
    pub origin_left: f64,
    pub origin_top: f64,
    pub column_pitch: f64,
    pub row_pitch: f64,
    pub image_width: f64,
    /// Distance from an image's top edge to its label.
    pub label_offset: f64,
    pub label_height: f64,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            columns: 2,
            origin_left: 0.5,
            origin_top: 1.2,
            column_pitch: 3.5,
            row_pitch: 2.5,
            image_width: 3.0,
            label_offset: 1.8,
            label_height: 0.3,
        }
    }
}

/// Column-then-row position in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridCursor {
    pub row: usize,
    pub col: usize,
}

impl GridCursor {
    /// Move to the next cell, wrapping to a new row after `columns` cells.
    pub fn advance(&mut self, columns: usize) {
        self.col += 1;
        if self.col >= columns.max(1) {
            self.col = 0;
            self.row += 1;
        }
    }
}

/// One screenshot cell of the showcase slide.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShowcasePlacement {
    pub key: ScreenshotKey,
    pub row: usize,
    pub col: usize,
    pub image_left: Emu,
    pub image_top: Emu,
    pub image_width: Emu,
    pub label: Rect,
}

impl GridSpec {
    fn placement(&self, key: ScreenshotKey, cursor: GridCursor) -> ShowcasePlacement {
        let left = inches(self.origin_left + cursor.col as f64 * self.column_pitch);
        let top = inches(self.origin_top + cursor.row as f64 * self.row_pitch);
        let width = inches(self.image_width);
        ShowcasePlacement {
            key,
            row: cursor.row,
            col: cursor.col,
            image_left: left,
            image_top: top,
            image_width: width,
            label: Rect::new(
                left,
                top + inches(self.label_offset),
                width,
                inches(self.label_height),
            ),
        }
    }

    /// Lay out the keys for which `is_present` holds.
    ///
    /// Absent keys leave no hole: the cursor only moves after a placement, so
    /// the next present key takes the cell the absent one would have used.
    pub fn plan<F>(&self, keys: &[ScreenshotKey], mut is_present: F) -> Vec<ShowcasePlacement>
    where
        F: FnMut(ScreenshotKey) -> bool,
    {
        let mut cursor = GridCursor::default();
        let mut placements = Vec::new();
        for &key in keys {
            if !is_present(key) {
                continue;
            }
            placements.push(self.placement(key, cursor));
            cursor.advance(self.columns);
        }
        placements
    }
}
