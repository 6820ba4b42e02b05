//! Editable PowerPoint presentation.

use super::parts;
use super::shapes::{parse_shapes, NewShape, ShapeSummary};
use super::{CT_SLIDE, RT_IMAGE, RT_OFFICE_DOCUMENT, RT_SLIDE, RT_SLIDE_LAYOUT, RT_SLIDE_MASTER};
use crate::container::{Package, CONTENT_TYPES_PART};
use crate::detect::{ensure_presentation, is_zip_file};
use crate::error::{Error, Result};
use crate::media::Image;
use crate::units::{Emu, Rect};
use std::fs;
use std::path::Path;
use tracing::debug;

/// A slide layout of the first slide master.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideLayout {
    /// Part name, e.g. `ppt/slideLayouts/slideLayout7.xml`.
    pub part: String,
    /// Layout type from the part (`title`, `blank`, ...), when declared.
    pub kind: Option<String>,
}

/// A presentation loaded into memory for editing.
///
/// Edits only ever append: new parts, new relationships, new shapes at the
/// end of a slide's shape tree. Everything else is written back unchanged.
#[derive(Debug)]
pub struct Presentation {
    package: Package,
    main_part: String,
    slides: Vec<String>,
    layouts: Vec<SlideLayout>,
}

impl Presentation {
    /// Open a presentation file.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use deckshot::pptx::Presentation;
    ///
    /// let deck = Presentation::open("StockFlow_Pitch_Deck.pptx")?;
    /// println!("{} slides", deck.slide_count());
    /// # Ok::<(), deckshot::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_bytes(fs::read(path.as_ref())?)
    }

    /// Load a presentation from bytes.
    ///
    /// Anything that is not a ZIP archive fails with [`Error::UnknownFormat`].
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        if !is_zip_file(&data) {
            return Err(Error::UnknownFormat);
        }
        Self::from_package(Package::from_bytes(data)?)
    }

    fn from_package(package: Package) -> Result<Self> {
        ensure_presentation(&package)?;

        let main_part = package
            .read_relationships("")?
            .get_by_type(RT_OFFICE_DOCUMENT)
            .first()
            .map(|rel| Package::resolve_path("", &rel.target))
            .unwrap_or_else(|| "ppt/presentation.xml".to_string());

        let presentation_xml = package.read_xml(&main_part)?;
        let rels = package.read_relationships(&main_part)?;

        let mut slides = Vec::new();
        for rel_id in parts::list_rel_ids(&presentation_xml, b"sldId")? {
            let rel = rels
                .get(&rel_id)
                .filter(|r| r.rel_type == RT_SLIDE)
                .ok_or_else(|| Error::InvalidData(format!("slide relationship {} not found", rel_id)))?;
            slides.push(Package::resolve_path(&main_part, &rel.target));
        }

        let masters = parts::list_rel_ids(&presentation_xml, b"sldMasterId")?;
        let layouts = match masters.first().and_then(|id| rels.get(id)) {
            Some(rel) if rel.rel_type == RT_SLIDE_MASTER => {
                let master = Package::resolve_path(&main_part, &rel.target);
                Self::read_layouts(&package, &master)?
            }
            _ => Vec::new(),
        };

        debug!(
            part = %main_part,
            slides = slides.len(),
            layouts = layouts.len(),
            "loaded presentation"
        );

        Ok(Self {
            package,
            main_part,
            slides,
            layouts,
        })
    }

    fn read_layouts(package: &Package, master: &str) -> Result<Vec<SlideLayout>> {
        let master_xml = package.read_xml(master)?;
        let master_rels = package.read_relationships(master)?;

        let mut layouts = Vec::new();
        for rel_id in parts::layout_rel_ids(&master_xml)? {
            let Some(rel) = master_rels.get(&rel_id).filter(|r| r.rel_type == RT_SLIDE_LAYOUT)
            else {
                continue;
            };
            let part = Package::resolve_path(master, &rel.target);
            let kind = match package.read_xml(&part) {
                Ok(xml) => parts::layout_type(&xml)?,
                Err(_) => None,
            };
            layouts.push(SlideLayout { part, kind });
        }
        Ok(layouts)
    }

    /// Number of slides.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Number of layouts under the first slide master.
    pub fn layout_count(&self) -> usize {
        self.layouts.len()
    }

    pub fn layouts(&self) -> &[SlideLayout] {
        &self.layouts
    }

    /// Part name of the slide at a 0-based index.
    pub fn slide_part(&self, index: usize) -> Result<&str> {
        self.slides
            .get(index)
            .map(String::as_str)
            .ok_or(Error::SlideOutOfRange {
                index,
                count: self.slides.len(),
            })
    }

    /// The underlying package.
    pub fn package(&self) -> &Package {
        &self.package
    }

    /// Top-level shapes of a slide.
    pub fn shapes(&self, slide_index: usize) -> Result<Vec<ShapeSummary>> {
        let part = self.slide_part(slide_index)?;
        parse_shapes(&self.package.read_xml(part)?)
    }

    /// Append an empty slide based on the layout at `layout_index` and
    /// return the new slide's 0-based index.
    pub fn add_slide(&mut self, layout_index: usize) -> Result<usize> {
        let layout = self
            .layouts
            .get(layout_index)
            .ok_or_else(|| Error::MissingComponent(format!("slide layout {}", layout_index)))?
            .part
            .clone();

        let part = self.package.next_part_name("ppt/slides/slide", "xml");
        self.package.put_xml(&part, parts::blank_slide_xml());

        let mut slide_rels = self.package.read_relationships(&part)?;
        slide_rels.add_internal(RT_SLIDE_LAYOUT, &Package::relative_target(&part, &layout));
        self.package.write_relationships(&part, &slide_rels);

        let mut rels = self.package.read_relationships(&self.main_part)?;
        let rel_id = rels.add_internal(RT_SLIDE, &Package::relative_target(&self.main_part, &part));
        self.package.write_relationships(&self.main_part, &rels);

        let presentation_xml = self.package.read_xml(&self.main_part)?;
        let (presentation_xml, slide_id) = parts::append_slide_id(&presentation_xml, &rel_id)?;
        self.package.put_xml(&self.main_part, presentation_xml);

        let content_types = self.package.read_xml(CONTENT_TYPES_PART)?;
        let content_types =
            parts::add_override_content_type(&content_types, &format!("/{}", part), CT_SLIDE)?;
        self.package.put_xml(CONTENT_TYPES_PART, content_types);

        debug!(part = %part, layout = %layout, slide_id, "added slide");
        self.slides.push(part);
        Ok(self.slides.len() - 1)
    }

    /// Place an image on a slide, `width` wide with the height following the
    /// image's aspect ratio. Returns the new shape id.
    pub fn add_picture(
        &mut self,
        slide_index: usize,
        image: &Image,
        left: Emu,
        top: Emu,
        width: Emu,
    ) -> Result<u32> {
        let slide = self.slide_part(slide_index)?.to_string();

        let media = self
            .package
            .next_part_name("ppt/media/image", image.extension());
        self.package.put_part(&media, image.data().to_vec());

        let content_types = self.package.read_xml(CONTENT_TYPES_PART)?;
        let content_types = parts::ensure_default_content_type(
            &content_types,
            image.extension(),
            image.content_type(),
        )?;
        self.package.put_xml(CONTENT_TYPES_PART, content_types);

        let mut slide_rels = self.package.read_relationships(&slide)?;
        let rel_id = slide_rels.add_internal(RT_IMAGE, &Package::relative_target(&slide, &media));
        self.package.write_relationships(&slide, &slide_rels);

        let frame = Rect::new(left, top, width, image.scaled_height(width));
        let shape_id = self.append_shape(
            &slide,
            &NewShape::Picture {
                frame,
                rel_id: &rel_id,
                description: image.filename(),
            },
        )?;

        debug!(slide = %slide, media = %media, shape_id, "added picture");
        Ok(shape_id)
    }

    /// Add a single-paragraph text box. Returns the new shape id.
    pub fn add_textbox(&mut self, slide_index: usize, frame: Rect, text: &str) -> Result<u32> {
        let slide = self.slide_part(slide_index)?.to_string();
        let shape_id = self.append_shape(&slide, &NewShape::TextBox { frame, text })?;
        debug!(slide = %slide, shape_id, "added text box");
        Ok(shape_id)
    }

    fn append_shape(&mut self, slide: &str, shape: &NewShape<'_>) -> Result<u32> {
        let xml = self.package.read_xml(slide)?;
        let shape_id = parts::max_shape_id(&xml)? + 1;
        let edited = parts::append_to_shape_tree(&xml, &shape.to_xml(shape_id)?)?;
        self.package.put_xml(slide, edited);
        Ok(shape_id)
    }

    /// Serialize to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.package.to_bytes()
    }

    /// Write the presentation to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.package.save(path)
    }
}
