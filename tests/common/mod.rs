//! Synthetic decks and screenshots for integration tests.

#![allow(dead_code)]

use deckshot::ScreenshotKey;
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

const CT_PRESENTATION: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
const CT_MASTER: &str = "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
const CT_LAYOUT: &str = "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";

const REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const RT_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Text of the title shape on slide 1, longer than the preview limit.
pub const LONG_TITLE: &str =
    "StockFlow turns spreadsheets into a live inventory for small warehouses";

/// Shape of a synthetic deck.
#[derive(Debug, Clone)]
pub struct DeckSpec {
    pub slides: usize,
    pub layouts: usize,
    /// 0-based index of the layout declared `type="blank"`.
    pub blank_layout: Option<usize>,
}

impl Default for DeckSpec {
    /// Seven layouts with the blank one last, like the stock Office theme.
    fn default() -> Self {
        Self {
            slides: 6,
            layouts: 7,
            blank_layout: Some(6),
        }
    }
}

impl DeckSpec {
    pub fn with_slides(slides: usize) -> Self {
        Self {
            slides,
            ..Self::default()
        }
    }
}

fn start(zip: &mut ZipWriter<Cursor<&mut Vec<u8>>>, name: &str, body: &[u8]) {
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    zip.start_file(name, options).unwrap();
    zip.write_all(body).unwrap();
}

fn rels_xml(rels: &[(String, &str, String)]) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{}">"#,
        REL_NS
    );
    for (id, kind, target) in rels {
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}/{}" Target="{}"/>"#,
            id, RT_BASE, kind, target
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn slide_xml(number: usize) -> String {
    let title = if number == 1 {
        LONG_TITLE.to_string()
    } else {
        format!("Slide {} title", number)
    };
    let picture = if number == 2 {
        r#"<p:pic><p:nvPicPr><p:cNvPr id="3" name="Picture 2" descr="logo.png"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="rId2"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="914400" cy="914400"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#
    } else {
        ""
    };
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld {ns}><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/><p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr lang="en-US"/><a:t>{title}</a:t></a:r></a:p></p:txBody></p:sp>{picture}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#,
        ns = NS,
        title = title,
        picture = picture
    )
}

/// Build a deck in memory.
pub fn build_deck(spec: &DeckSpec) -> Vec<u8> {
    let mut buffer = Vec::new();
    let mut zip = ZipWriter::new(Cursor::new(&mut buffer));

    let mut content_types = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/>"#,
    );
    content_types.push_str(&format!(
        r#"<Override PartName="/ppt/presentation.xml" ContentType="{}"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="{}"/>"#,
        CT_PRESENTATION, CT_MASTER
    ));
    for i in 1..=spec.layouts {
        content_types.push_str(&format!(
            r#"<Override PartName="/ppt/slideLayouts/slideLayout{}.xml" ContentType="{}"/>"#,
            i, CT_LAYOUT
        ));
    }
    for i in 1..=spec.slides {
        content_types.push_str(&format!(
            r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="{}"/>"#,
            i, CT_SLIDE
        ));
    }
    content_types.push_str("</Types>");
    start(&mut zip, "[Content_Types].xml", content_types.as_bytes());

    start(
        &mut zip,
        "_rels/.rels",
        rels_xml(&[("rId1".into(), "officeDocument", "ppt/presentation.xml".into())]).as_bytes(),
    );

    let mut presentation = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation {} saveSubsetFonts="1"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#,
        NS
    );
    if spec.slides > 0 {
        presentation.push_str("<p:sldIdLst>");
        for i in 0..spec.slides {
            presentation.push_str(&format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 256 + i, i + 2));
        }
        presentation.push_str("</p:sldIdLst>");
    }
    presentation.push_str(
        r#"<p:sldSz cx="9144000" cy="6858000" type="screen4x3"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#,
    );
    start(&mut zip, "ppt/presentation.xml", presentation.as_bytes());

    let mut presentation_rels = vec![(
        "rId1".to_string(),
        "slideMaster",
        "slideMasters/slideMaster1.xml".to_string(),
    )];
    for i in 0..spec.slides {
        presentation_rels.push((format!("rId{}", i + 2), "slide", format!("slides/slide{}.xml", i + 1)));
    }
    start(
        &mut zip,
        "ppt/_rels/presentation.xml.rels",
        rels_xml(&presentation_rels).as_bytes(),
    );

    let mut master = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster {}><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree></p:cSld><p:sldLayoutIdLst>"#,
        NS
    );
    let mut master_rels = Vec::new();
    for i in 0..spec.layouts {
        master.push_str(&format!(
            r#"<p:sldLayoutId id="{}" r:id="rId{}"/>"#,
            2147483649u64 + i as u64,
            i + 1
        ));
        master_rels.push((
            format!("rId{}", i + 1),
            "slideLayout",
            format!("../slideLayouts/slideLayout{}.xml", i + 1),
        ));
    }
    master.push_str("</p:sldLayoutIdLst></p:sldMaster>");
    start(&mut zip, "ppt/slideMasters/slideMaster1.xml", master.as_bytes());
    start(
        &mut zip,
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        rels_xml(&master_rels).as_bytes(),
    );

    for i in 0..spec.layouts {
        let kind = if spec.blank_layout == Some(i) { "blank" } else { "obj" };
        let layout = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout {} type="{}" preserve="1"><p:cSld name="Layout {}"><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree></p:cSld></p:sldLayout>"#,
            NS,
            kind,
            i + 1
        );
        start(
            &mut zip,
            &format!("ppt/slideLayouts/slideLayout{}.xml", i + 1),
            layout.as_bytes(),
        );
        start(
            &mut zip,
            &format!("ppt/slideLayouts/_rels/slideLayout{}.xml.rels", i + 1),
            rels_xml(&[("rId1".into(), "slideMaster", "../slideMasters/slideMaster1.xml".into())])
                .as_bytes(),
        );
    }

    for i in 1..=spec.slides {
        start(&mut zip, &format!("ppt/slides/slide{}.xml", i), slide_xml(i).as_bytes());
        let mut rels = vec![("rId1".to_string(), "slideLayout", "../slideLayouts/slideLayout1.xml".to_string())];
        if i == 2 {
            rels.push(("rId2".to_string(), "image", "../media/image1.png".to_string()));
        }
        start(
            &mut zip,
            &format!("ppt/slides/_rels/slide{}.xml.rels", i),
            rels_xml(&rels).as_bytes(),
        );
    }

    if spec.slides >= 2 {
        start(&mut zip, "ppt/media/image1.png", &png_bytes(16, 16));
    }

    zip.finish().unwrap();
    buffer
}

/// Encode a solid PNG of the given pixel size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([40, 120, 200]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

/// Write a deck to `path`.
pub fn write_deck(path: &Path, spec: &DeckSpec) {
    fs::write(path, build_deck(spec)).unwrap();
}

/// Write the given screenshots under their default file names.
pub fn write_screenshots(dir: &Path, keys: &[ScreenshotKey]) {
    fs::create_dir_all(dir).unwrap();
    for key in keys {
        fs::write(dir.join(key.default_file_name()), png_bytes(160, 90)).unwrap();
    }
}

/// A working directory laid out like the repository the tool runs in:
/// the source deck at the root and screenshots under `docs/screenshots`.
pub fn workspace(spec: &DeckSpec, keys: &[ScreenshotKey]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_deck(&dir.path().join("StockFlow_Pitch_Deck.pptx"), spec);
    write_screenshots(&dir.path().join("docs/screenshots"), keys);
    dir
}
