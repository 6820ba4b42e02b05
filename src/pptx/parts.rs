//! Targeted edits of individual package parts.
//!
//! Parts are edited by splicing new markup into the original text at
//! positions located with a streaming reader, so everything around the
//! insertion point stays exactly as PowerPoint wrote it.

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Lowest slide id PowerPoint accepts.
const MIN_SLIDE_ID: u32 = 256;

/// Master lists that precede `p:sldIdLst` in `presentation.xml`.
const MASTER_LISTS: [&[u8]; 3] = [b"sldMasterIdLst", b"notesMasterIdLst", b"handoutMasterIdLst"];

fn attr_value(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn splice(xml: &str, at: usize, fragment: &str) -> String {
    let mut out = String::with_capacity(xml.len() + fragment.len());
    out.push_str(&xml[..at]);
    out.push_str(fragment);
    out.push_str(&xml[at..]);
    out
}

/// Markup of a slide with an empty shape tree.
pub fn blank_slide_xml() -> String {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        "\n",
        r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
        r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#,
        r#"<p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
        r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#,
        r#"</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#,
    )
    .to_string()
}

/// Largest `cNvPr` id on a slide (the shape tree itself counts).
pub fn max_shape_id(xml: &str) -> Result<u32> {
    let mut reader = Reader::from_str(xml);
    let mut max = 0;

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.name().local_name().as_ref() == b"cNvPr" => {
                if let Some(id) = attr_value(&e, b"id")?.and_then(|v| v.parse::<u32>().ok()) {
                    max = max.max(id);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(max)
}

/// Append shape markup as the last shape of the slide's shape tree.
///
/// A trailing `p:extLst` must stay the last child of the tree, so the
/// markup goes in front of it when present.
pub fn append_to_shape_tree(xml: &str, fragment: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut depth = 0usize;
    let mut tree_depth: Option<usize> = None;

    loop {
        let start = reader.buffer_position() as usize;
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                let name = e.name();
                let local = name.local_name();
                match tree_depth {
                    None if local.as_ref() == b"spTree" => tree_depth = Some(depth),
                    Some(tree) if depth == tree + 1 && local.as_ref() == b"extLst" => {
                        return Ok(splice(xml, start, fragment));
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => {
                if tree_depth == Some(depth) && e.name().local_name().as_ref() == b"extLst" {
                    return Ok(splice(xml, start, fragment));
                }
            }
            Event::End(e) => {
                if tree_depth == Some(depth) && e.name().local_name().as_ref() == b"spTree" {
                    return Ok(splice(xml, start, fragment));
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => return Err(Error::MissingComponent("p:spTree".to_string())),
            _ => {}
        }
    }
}

/// Slide-layout relationship ids listed by a slide master, in order.
pub fn layout_rel_ids(master_xml: &str) -> Result<Vec<String>> {
    list_rel_ids(master_xml, b"sldLayoutId")
}

/// The `type` attribute of a slide layout's root element (e.g. `blank`).
pub fn layout_type(layout_xml: &str) -> Result<Option<String>> {
    let mut reader = Reader::from_str(layout_xml);

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.name().local_name().as_ref() == b"sldLayout" => {
                return attr_value(&e, b"type");
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Relationship ids (`r:id`) of every element named `local` in document order.
pub fn list_rel_ids(xml: &str, local: &[u8]) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut ids = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.name().local_name().as_ref() == local => {
                for attr in e.attributes().flatten() {
                    // r:id, as opposed to the numeric id
                    if attr.key.prefix().is_some() && attr.key.local_name().as_ref() == b"id" {
                        ids.push(attr.unescape_value()?.into_owned());
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(ids)
}

/// Append a `p:sldId` referencing `rel_id` to `presentation.xml`.
///
/// Returns the edited markup and the new slide id, which is greater than
/// every existing id and never below 256. The id list is created after the
/// master lists when the deck has no slides yet.
pub fn append_slide_id(xml: &str, rel_id: &str) -> Result<(String, u32)> {
    let mut reader = Reader::from_str(xml);
    let mut max_id = MIN_SLIDE_ID - 1;
    let mut list_end: Option<usize> = None;
    let mut empty_list: Option<(usize, usize)> = None;
    let mut after_masters: Option<usize> = None;

    loop {
        let start = reader.buffer_position() as usize;
        let event = reader.read_event()?;
        let end = reader.buffer_position() as usize;
        match event {
            Event::Start(e) | Event::Empty(e) if e.name().local_name().as_ref() == b"sldId" => {
                if let Some(id) = attr_value(&e, b"id")?.and_then(|v| v.parse::<u32>().ok()) {
                    max_id = max_id.max(id);
                }
            }
            Event::Empty(e) if e.name().local_name().as_ref() == b"sldIdLst" => {
                empty_list = Some((start, end));
            }
            Event::Empty(e) if MASTER_LISTS.contains(&e.name().local_name().as_ref()) => {
                after_masters = Some(end);
            }
            Event::End(e) => {
                let name = e.name();
                let local = name.local_name();
                if local.as_ref() == b"sldIdLst" && list_end.is_none() {
                    list_end = Some(start);
                } else if MASTER_LISTS.contains(&local.as_ref()) {
                    after_masters = Some(end);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let new_id = max_id + 1;
    let entry = format!(r#"<p:sldId id="{}" r:id="{}"/>"#, new_id, rel_id);

    let edited = if let Some(at) = list_end {
        splice(xml, at, &entry)
    } else if let Some((from, to)) = empty_list {
        format!("{}<p:sldIdLst>{}</p:sldIdLst>{}", &xml[..from], entry, &xml[to..])
    } else if let Some(at) = after_masters {
        splice(xml, at, &format!("<p:sldIdLst>{}</p:sldIdLst>", entry))
    } else {
        return Err(Error::MissingComponent("p:sldMasterIdLst".to_string()));
    };

    Ok((edited, new_id))
}

/// Register a `Default` content type for a file extension unless one exists.
pub fn ensure_default_content_type(xml: &str, extension: &str, content_type: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);

    loop {
        let start = reader.buffer_position() as usize;
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.name().local_name().as_ref() == b"Default" => {
                if attr_value(&e, b"Extension")?
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
                {
                    return Ok(xml.to_string());
                }
            }
            Event::End(e) if e.name().local_name().as_ref() == b"Types" => {
                let entry = format!(
                    r#"<Default Extension="{}" ContentType="{}"/>"#,
                    extension, content_type
                );
                return Ok(splice(xml, start, &entry));
            }
            Event::Eof => return Err(Error::MissingComponent("Types".to_string())),
            _ => {}
        }
    }
}

/// Add an `Override` content type for a part, e.g. `/ppt/slides/slide7.xml`.
pub fn add_override_content_type(xml: &str, part_name: &str, content_type: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);

    loop {
        let start = reader.buffer_position() as usize;
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.name().local_name().as_ref() == b"Override" => {
                if attr_value(&e, b"PartName")?.is_some_and(|name| name == part_name) {
                    return Ok(xml.to_string());
                }
            }
            Event::End(e) if e.name().local_name().as_ref() == b"Types" => {
                let entry = format!(
                    r#"<Override PartName="{}" ContentType="{}"/>"#,
                    part_name, content_type
                );
                return Ok(splice(xml, start, &entry));
            }
            Event::Eof => return Err(Error::MissingComponent("Types".to_string())),
            _ => {}
        }
    }
}
