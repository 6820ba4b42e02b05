//! Shape markup: building new pictures and text boxes, and summarizing the
//! shapes already on a slide.

use crate::error::{Error, Result};
use crate::units::Rect;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;
use std::fmt::Write as FmtWrite;

/// A shape to be appended to a slide's shape tree.
#[derive(Debug, Clone)]
pub enum NewShape<'a> {
    Picture {
        frame: Rect,
        /// Relationship id of the embedded image.
        rel_id: &'a str,
        description: &'a str,
    },
    TextBox {
        frame: Rect,
        text: &'a str,
    },
}

fn write_xfrm(xml: &mut String, frame: &Rect) -> Result<()> {
    xml.push_str("<a:xfrm>");
    write!(xml, r#"<a:off x="{}" y="{}"/>"#, frame.left, frame.top)
        .map_err(|e| Error::InvalidData(e.to_string()))?;
    write!(xml, r#"<a:ext cx="{}" cy="{}"/>"#, frame.width, frame.height)
        .map_err(|e| Error::InvalidData(e.to_string()))?;
    xml.push_str("</a:xfrm>");
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
    Ok(())
}

impl NewShape<'_> {
    /// Name PowerPoint shows in the selection pane. PowerPoint numbers
    /// names one below the shape id.
    pub fn name(&self, shape_id: u32) -> String {
        let number = shape_id.saturating_sub(1);
        match self {
            NewShape::Picture { .. } => format!("Picture {}", number),
            NewShape::TextBox { .. } => format!("TextBox {}", number),
        }
    }

    /// Render the shape element with the given id.
    pub fn to_xml(&self, shape_id: u32) -> Result<String> {
        let mut xml = String::new();
        let name = self.name(shape_id);

        match self {
            NewShape::Picture {
                frame,
                rel_id,
                description,
            } => {
                xml.push_str("<p:pic>");
                xml.push_str("<p:nvPicPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="{}" descr="{}"/>"#,
                    shape_id,
                    escape(name.as_str()),
                    escape(*description)
                )
                .map_err(|e| Error::InvalidData(e.to_string()))?;
                xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr>"#);
                xml.push_str("<p:nvPr/>");
                xml.push_str("</p:nvPicPr>");

                xml.push_str("<p:blipFill>");
                write!(xml, r#"<a:blip r:embed="{}"/>"#, escape(*rel_id))
                    .map_err(|e| Error::InvalidData(e.to_string()))?;
                xml.push_str("<a:stretch><a:fillRect/></a:stretch>");
                xml.push_str("</p:blipFill>");

                xml.push_str("<p:spPr>");
                write_xfrm(&mut xml, frame)?;
                xml.push_str("</p:spPr>");
                xml.push_str("</p:pic>");
            }
            NewShape::TextBox { frame, text } => {
                xml.push_str("<p:sp>");
                xml.push_str("<p:nvSpPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="{}"/>"#,
                    shape_id,
                    escape(name.as_str())
                )
                .map_err(|e| Error::InvalidData(e.to_string()))?;
                xml.push_str(r#"<p:cNvSpPr txBox="1"/>"#);
                xml.push_str("<p:nvPr/>");
                xml.push_str("</p:nvSpPr>");

                xml.push_str("<p:spPr>");
                write_xfrm(&mut xml, frame)?;
                xml.push_str("<a:noFill/>");
                xml.push_str("</p:spPr>");

                xml.push_str("<p:txBody>");
                xml.push_str(r#"<a:bodyPr wrap="none"><a:spAutoFit/></a:bodyPr>"#);
                xml.push_str("<a:lstStyle/>");
                xml.push_str("<a:p><a:r>");
                xml.push_str(r#"<a:rPr lang="en-US" dirty="0"/>"#);
                write!(xml, "<a:t>{}</a:t>", escape(*text))
                    .map_err(|e| Error::InvalidData(e.to_string()))?;
                xml.push_str("</a:r></a:p>");
                xml.push_str("</p:txBody>");
                xml.push_str("</p:sp>");
            }
        }

        Ok(xml)
    }
}

/// Kind of a top-level shape on a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShapeKind {
    Shape,
    Picture,
    GraphicFrame,
    Group,
    Connector,
}

impl ShapeKind {
    fn from_local_name(local: &[u8]) -> Option<Self> {
        match local {
            b"sp" => Some(ShapeKind::Shape),
            b"pic" => Some(ShapeKind::Picture),
            b"graphicFrame" => Some(ShapeKind::GraphicFrame),
            b"grpSp" => Some(ShapeKind::Group),
            b"cxnSp" => Some(ShapeKind::Connector),
            _ => None,
        }
    }
}

/// What is already on a slide, as reported while visiting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShapeSummary {
    pub id: u32,
    pub name: String,
    pub kind: ShapeKind,
    /// Text of an autoshape or text box; paragraphs joined by newlines.
    pub text: Option<String>,
}

impl ShapeSummary {
    pub fn is_picture(&self) -> bool {
        self.kind == ShapeKind::Picture
    }

    /// The first `max_chars` characters of the text, if any.
    pub fn text_preview(&self, max_chars: usize) -> Option<String> {
        self.text
            .as_deref()
            .map(|t| t.chars().take(max_chars).collect())
    }
}

/// Stand-in for `a:br` inside a paragraph (vertical tab).
pub const LINE_BREAK: char = '\u{000B}';

struct ShapeBuilder {
    kind: ShapeKind,
    depth: usize,
    id: u32,
    name: Option<String>,
    paragraphs: Vec<String>,
    paragraph: String,
    in_text: bool,
}

impl ShapeBuilder {
    fn new(kind: ShapeKind, depth: usize) -> Self {
        Self {
            kind,
            depth,
            id: 0,
            name: None,
            paragraphs: Vec::new(),
            paragraph: String::new(),
            in_text: false,
        }
    }

    fn on_element(&mut self, e: &BytesStart<'_>) -> Result<()> {
        if e.name().local_name().as_ref() == b"cNvPr" && self.name.is_none() {
            let mut name = String::new();
            for attr in e.attributes().flatten() {
                match attr.key.as_ref() {
                    b"id" => self.id = attr.unescape_value()?.parse::<u32>().unwrap_or(0),
                    b"name" => name = attr.unescape_value()?.into_owned(),
                    _ => {}
                }
            }
            self.name = Some(name);
        }
        Ok(())
    }

    fn collects_text(&self) -> bool {
        self.kind == ShapeKind::Shape
    }

    fn finish(self) -> ShapeSummary {
        let text = self.paragraphs.join("\n");
        let has_text = self.collects_text() && !text.is_empty();
        ShapeSummary {
            id: self.id,
            name: self.name.unwrap_or_default(),
            kind: self.kind,
            text: has_text.then_some(text),
        }
    }
}

/// Summarize the top-level shapes of a slide's shape tree.
pub fn parse_shapes(xml: &str) -> Result<Vec<ShapeSummary>> {
    let mut reader = Reader::from_str(xml);
    let mut shapes = Vec::new();
    let mut depth = 0usize;
    let mut tree_depth: Option<usize> = None;
    let mut current: Option<ShapeBuilder> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                let name = e.name();
                let local = name.local_name();
                match (tree_depth, current.as_mut()) {
                    (None, _) if local.as_ref() == b"spTree" => tree_depth = Some(depth),
                    (Some(tree), None) if depth == tree + 1 => {
                        current = ShapeKind::from_local_name(local.as_ref())
                            .map(|kind| ShapeBuilder::new(kind, depth));
                    }
                    (Some(_), Some(shape)) => {
                        shape.on_element(&e)?;
                        if shape.collects_text() && local.as_ref() == b"t" {
                            shape.in_text = true;
                        } else if shape.collects_text() && local.as_ref() == b"br" {
                            shape.paragraph.push(LINE_BREAK);
                        }
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => {
                if let Some(shape) = current.as_mut() {
                    shape.on_element(&e)?;
                    if shape.collects_text() && e.name().local_name().as_ref() == b"br" {
                        shape.paragraph.push(LINE_BREAK);
                    }
                }
            }
            Event::Text(t) => {
                if let Some(shape) = current.as_mut().filter(|s| s.in_text) {
                    shape.paragraph.push_str(&t.unescape().unwrap_or_default());
                }
            }
            Event::End(e) => {
                let name = e.name();
                let local = name.local_name();
                let closes_shape = current.as_ref().is_some_and(|s| s.depth == depth);
                if closes_shape {
                    if let Some(done) = current.take() {
                        shapes.push(done.finish());
                    }
                } else if let Some(shape) = current.as_mut() {
                    if local.as_ref() == b"t" {
                        shape.in_text = false;
                    } else if local.as_ref() == b"p" && shape.collects_text() {
                        let paragraph = std::mem::take(&mut shape.paragraph);
                        shape.paragraphs.push(paragraph);
                    }
                } else if tree_depth == Some(depth) {
                    break;
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(shapes)
}
