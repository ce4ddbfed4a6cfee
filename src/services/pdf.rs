//! Minimal single-page PDF writer for the finished layout: the map frame
//! border, the parcel/soil outlines, and the populated text elements.
//! Coordinates are rounded to whole points.

use anyhow::Result;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::path::Path;

pub struct PageText {
    pub x_pt: f64,
    pub y_pt: f64,
    pub text: String,
}

pub struct PdfPage {
    pub width_pt: f64,
    pub height_pt: f64,
    /// Frame border as (x, y, width, height) in points.
    pub frame_rect: (f64, f64, f64, f64),
    /// Polygon rings already transformed into page space.
    pub outlines: Vec<Vec<(f64, f64)>>,
    pub texts: Vec<PageText>,
}

fn pt(value: f64) -> Object {
    (value.round() as i64).into()
}

pub fn export(path: &Path, page: &PdfPage) -> Result<()> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut ops = Vec::new();
    let (fx, fy, fw, fh) = page.frame_rect;
    ops.push(Operation::new("w", vec![1.into()]));
    ops.push(Operation::new("re", vec![pt(fx), pt(fy), pt(fw), pt(fh)]));
    ops.push(Operation::new("S", vec![]));

    for ring in &page.outlines {
        for (i, (x, y)) in ring.iter().enumerate() {
            let op = if i == 0 { "m" } else { "l" };
            ops.push(Operation::new(op, vec![pt(*x), pt(*y)]));
        }
        ops.push(Operation::new("h", vec![]));
        ops.push(Operation::new("S", vec![]));
    }

    for text in &page.texts {
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tf", vec!["F1".into(), 11.into()]));
        ops.push(Operation::new("Td", vec![pt(text.x_pt), pt(text.y_pt)]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(text.text.clone())],
        ));
        ops.push(Operation::new("ET", vec![]));
    }

    let content = Content { operations: ops };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![
            0.into(),
            0.into(),
            pt(page.width_pt),
            pt(page.height_pt),
        ],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path)?;
    Ok(())
}
