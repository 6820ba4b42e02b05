//! Editing decks through the `Presentation` API.

mod common;

use common::{build_deck, png_bytes, DeckSpec, LONG_TITLE};
use deckshot::media::Image;
use deckshot::units::{inches, Rect};
use deckshot::{Error, FormatType, Package, Presentation, ShapeKind};
use std::collections::HashSet;
use std::io::{Cursor, Write};

fn deck(spec: &DeckSpec) -> Presentation {
    Presentation::from_bytes(build_deck(spec)).unwrap()
}

fn png(width: u32, height: u32) -> Image {
    Image::from_bytes(png_bytes(width, height), "shot.png").unwrap()
}

fn reopen(deck: &Presentation) -> Presentation {
    Presentation::from_bytes(deck.to_bytes().unwrap()).unwrap()
}

#[test]
fn test_open_reads_slides_and_layouts() {
    let deck = deck(&DeckSpec::default());
    assert_eq!(deck.slide_count(), 6);
    assert_eq!(deck.layout_count(), 7);
    assert_eq!(deck.slide_part(0).unwrap(), "ppt/slides/slide1.xml");
    assert_eq!(deck.layouts()[6].kind.as_deref(), Some("blank"));
    assert_eq!(deck.layouts()[6].part, "ppt/slideLayouts/slideLayout7.xml");
}

#[test]
fn test_existing_shapes_are_reported() {
    let deck = deck(&DeckSpec::default());

    let first = deck.shapes(0).unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].text.as_deref(), Some(LONG_TITLE));
    let preview = first[0].text_preview(50).unwrap();
    assert_eq!(preview.chars().count(), 50);
    assert!(LONG_TITLE.starts_with(&preview));

    let second = deck.shapes(1).unwrap();
    assert_eq!(second.len(), 2);
    assert_eq!(second[1].kind, ShapeKind::Picture);
    assert_eq!(second[1].name, "Picture 2");
    assert!(second[1].text.is_none());
}

#[test]
fn test_add_picture() {
    let mut deck = deck(&DeckSpec::default());
    let image = png(200, 100);

    let id = deck
        .add_picture(2, &image, inches(1.0), inches(2.0), inches(8.0))
        .unwrap();
    assert_eq!(id, 3);

    let deck = reopen(&deck);
    let shapes = deck.shapes(2).unwrap();
    let added = shapes.last().unwrap();
    assert_eq!(added.kind, ShapeKind::Picture);
    assert_eq!(added.id, 3);
    // named like PowerPoint does: one below the id
    assert_eq!(added.name, "Picture 2");

    // image1.png already belongs to slide 2
    let package = deck.package();
    assert_eq!(
        package.read_binary("ppt/media/image2.png").unwrap(),
        image.data()
    );
    let rels = package.read_relationships("ppt/slides/slide3.xml").unwrap();
    let image_rel = rels.get("rId2").unwrap();
    assert_eq!(image_rel.target, "../media/image2.png");

    let slide = package.read_xml("ppt/slides/slide3.xml").unwrap();
    assert!(slide.contains(r#"<a:blip r:embed="rId2"/>"#));
    assert!(slide.contains(r#"<a:off x="914400" y="1828800"/>"#));
    // 8in wide at 2:1 keeps the aspect ratio
    assert!(slide.contains(r#"<a:ext cx="7315200" cy="3657600"/>"#));
}

#[test]
fn test_add_picture_registers_new_extension_once() {
    let mut deck = deck(&DeckSpec::default());
    let img = image::RgbImage::from_pixel(40, 30, image::Rgb([200, 10, 10]));
    let mut jpeg = Cursor::new(Vec::new());
    img.write_to(&mut jpeg, image::ImageFormat::Jpeg).unwrap();
    let image = Image::from_bytes(jpeg.into_inner(), "photo.jpg").unwrap();

    deck.add_picture(0, &image, inches(1.0), inches(1.0), inches(2.0))
        .unwrap();
    deck.add_picture(1, &image, inches(1.0), inches(1.0), inches(2.0))
        .unwrap();

    let deck = reopen(&deck);
    let content_types = deck.package().read_xml("[Content_Types].xml").unwrap();
    assert_eq!(content_types.matches(r#"Extension="jpeg""#).count(), 1);
    assert!(deck.package().exists("ppt/media/image2.jpeg"));
    assert!(deck.package().exists("ppt/media/image3.jpeg"));
}

#[test]
fn test_untouched_parts_are_byte_identical() {
    let original = Package::from_bytes(build_deck(&DeckSpec::default())).unwrap();
    let mut deck = deck(&DeckSpec::default());
    deck.add_picture(3, &png(64, 48), inches(1.0), inches(2.0), inches(8.0))
        .unwrap();
    let edited = Package::from_bytes(deck.to_bytes().unwrap()).unwrap();

    let touched: HashSet<&str> = [
        "ppt/slides/slide4.xml",
        "ppt/slides/_rels/slide4.xml.rels",
    ]
    .into_iter()
    .collect();

    for name in original.part_names() {
        if touched.contains(name) {
            continue;
        }
        assert_eq!(
            original.read_binary(name).unwrap(),
            edited.read_binary(name).unwrap(),
            "{} changed",
            name
        );
    }
    assert_eq!(edited.part_names().len(), original.part_names().len() + 1);
}

#[test]
fn test_add_slide_appends_to_list() {
    let mut deck = deck(&DeckSpec::default());
    let index = deck.add_slide(6).unwrap();
    assert_eq!(index, 6);
    assert_eq!(deck.slide_part(6).unwrap(), "ppt/slides/slide7.xml");

    let deck = reopen(&deck);
    assert_eq!(deck.slide_count(), 7);
    assert!(deck.shapes(6).unwrap().is_empty());

    let package = deck.package();
    let presentation = package.read_xml("ppt/presentation.xml").unwrap();
    assert!(presentation.contains(r#"<p:sldId id="262" r:id="rId8"/>"#));

    let content_types = package.read_xml("[Content_Types].xml").unwrap();
    assert!(content_types.contains(r#"PartName="/ppt/slides/slide7.xml""#));

    let rels = package.read_relationships("ppt/slides/slide7.xml").unwrap();
    assert_eq!(rels.len(), 1);
    assert_eq!(rels.get("rId1").unwrap().target, "../slideLayouts/slideLayout7.xml");
}

#[test]
fn test_add_slide_to_empty_deck_creates_list() {
    let mut deck = deck(&DeckSpec::with_slides(0));
    assert_eq!(deck.slide_count(), 0);
    deck.add_slide(0).unwrap();

    let deck = reopen(&deck);
    assert_eq!(deck.slide_count(), 1);
    let presentation = deck.package().read_xml("ppt/presentation.xml").unwrap();
    assert!(presentation
        .contains(r#"</p:sldMasterIdLst><p:sldIdLst><p:sldId id="256" r:id="rId2"/></p:sldIdLst>"#));
}

#[test]
fn test_add_slide_unknown_layout() {
    let mut deck = deck(&DeckSpec::default());
    let err = deck.add_slide(7).unwrap_err();
    assert!(matches!(err, Error::MissingComponent(_)));
    assert_eq!(deck.slide_count(), 6);
}

#[test]
fn test_shape_ids_stay_unique() {
    let mut deck = deck(&DeckSpec::default());
    let slide = deck.add_slide(6).unwrap();
    let label = Rect::new(inches(0.5), inches(3.0), inches(3.0), inches(0.3));

    let mut ids = vec![deck
        .add_textbox(slide, label, "Digital Inventory - Application Screenshots")
        .unwrap()];
    for _ in 0..3 {
        ids.push(
            deck.add_picture(slide, &png(30, 20), inches(0.5), inches(1.2), inches(3.0))
                .unwrap(),
        );
        ids.push(deck.add_textbox(slide, label, "Dashboard").unwrap());
    }

    let unique: HashSet<u32> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len());
    assert!(ids.iter().all(|id| *id > 1));

    let deck = reopen(&deck);
    let shapes = deck.shapes(slide).unwrap();
    assert_eq!(shapes.len(), 7);
    assert_eq!(shapes.iter().filter(|s| s.is_picture()).count(), 3);
    assert_eq!(
        shapes[0].text.as_deref(),
        Some("Digital Inventory - Application Screenshots")
    );
    assert_eq!(shapes[0].name, "TextBox 1");
    assert_eq!(shapes[1].name, "Picture 2");
}

#[test]
fn test_textbox_text_is_escaped() {
    let mut deck = deck(&DeckSpec::default());
    let frame = Rect::new(inches(1.0), inches(1.0), inches(2.0), inches(0.5));
    deck.add_textbox(0, frame, "Stock & <Flow>").unwrap();

    let deck = reopen(&deck);
    let shapes = deck.shapes(0).unwrap();
    assert_eq!(shapes.last().unwrap().text.as_deref(), Some("Stock & <Flow>"));
}

#[test]
fn test_slide_out_of_range() {
    let mut deck = deck(&DeckSpec::with_slides(2));
    let err = deck
        .add_picture(5, &png(10, 10), inches(1.0), inches(1.0), inches(1.0))
        .unwrap_err();
    assert!(matches!(err, Error::SlideOutOfRange { index: 5, count: 2 }));
}

#[test]
fn test_rejects_word_document() {
    let mut buffer = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(
            br#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#,
        )
        .unwrap();
        zip.start_file("word/document.xml", options).unwrap();
        zip.write_all(b"<w:document/>").unwrap();
        zip.finish().unwrap();
    }

    let err = Presentation::from_bytes(buffer).unwrap_err();
    assert!(matches!(err, Error::NotAPresentation(FormatType::Docx)));
}

#[test]
fn test_rejects_non_zip() {
    let err = Presentation::from_bytes(b"not a deck at all".to_vec()).unwrap_err();
    assert!(matches!(err, Error::UnknownFormat));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.pptx");
    std::fs::write(&path, "plain text renamed to pptx").unwrap();
    let err = Presentation::open(&path).unwrap_err();
    assert!(matches!(err, Error::UnknownFormat));
}
