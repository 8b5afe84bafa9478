use std::io::Write;
use std::path::Path;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use tracing::debug;

use crate::error::{BananaError, Result};

use super::text::{easy_report_lines, pro_report_lines, ReportContext};

// A4 portrait, in points.
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 50;
const FONT_SIZE: i64 = 10;
const LEADING: i64 = 14;
const WRAP_COLUMNS: usize = 90;
const LINES_PER_PAGE: usize = ((PAGE_HEIGHT - 2 * MARGIN) / LEADING) as usize;

const FONT_NAME: &str = "F1";
const OVERLAY_NAME: &str = "Im1";

/// Write the PDF report.
///
/// The first page carries the plain-language summary followed by the overlay
/// image, scaled to fit the page. The technical report follows on as many
/// pages as it needs. Text is set in the standard Helvetica font, so
/// characters outside ASCII are replaced with `?`.
pub fn write_pdf_report(ctx: &ReportContext<'_>, overlay_png: &Path, path: &Path) -> Result<()> {
    let overlay = image::open(overlay_png)?.to_rgb8();

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let image_id = doc.add_object(image_stream(&overlay)?);
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { FONT_NAME => font_id },
        "XObject" => dictionary! { OVERLAY_NAME => image_id },
    });

    let summary = wrap_lines(&easy_report_lines(ctx));
    let mut first_page = text_operations(&summary);
    let image_top = PAGE_HEIGHT - MARGIN - LEADING * (summary.len() as i64 + 1);
    first_page.extend(image_operations(overlay.dimensions(), image_top));

    let mut pages = vec![first_page];
    for chunk in wrap_lines(&pro_report_lines(ctx)).chunks(LINES_PER_PAGE) {
        pages.push(text_operations(chunk));
    }

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations }
            .encode()
            .map_err(|e| BananaError::Pdf(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }
    let page_count = kids.len() as i64;

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc.save(path)?;
    debug!(path = %path.display(), pages = page_count, "Wrote PDF report");
    Ok(())
}

/// Overlay pixels as a Flate-compressed RGB image XObject.
fn image_stream(rgb: &RgbImage) -> Result<Stream> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(rgb.as_raw())?;
    let data = encoder.finish()?;
    let (width, height) = rgb.dimensions();

    Ok(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width,
            "Height" => height,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
        },
        data,
    ))
}

/// One text block starting at the top-left margin, one line per `lines` entry.
fn text_operations(lines: &[String]) -> Vec<Operation> {
    let mut ops = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![FONT_NAME.into(), FONT_SIZE.into()]),
        Operation::new("TL", vec![LEADING.into()]),
        Operation::new(
            "Td",
            vec![MARGIN.into(), (PAGE_HEIGHT - MARGIN - FONT_SIZE).into()],
        ),
    ];
    for line in lines {
        ops.push(Operation::new("Tj", vec![Object::string_literal(ascii_only(line))]));
        ops.push(Operation::new("T*", vec![]));
    }
    ops.push(Operation::new("ET", vec![]));
    ops
}

/// Draw the overlay below `top`, as large as the remaining page allows.
fn image_operations((width, height): (u32, u32), top: i64) -> Vec<Operation> {
    let max_width = (PAGE_WIDTH - 2 * MARGIN) as f64;
    let max_height = (top - MARGIN) as f64;
    if width == 0 || height == 0 || max_height <= 0.0 {
        return Vec::new();
    }

    let scale = (max_width / width as f64).min(max_height / height as f64);
    let draw_width = ((width as f64 * scale).round() as i64).max(1);
    let draw_height = ((height as f64 * scale).round() as i64).max(1);

    vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                draw_width.into(),
                0.into(),
                0.into(),
                draw_height.into(),
                MARGIN.into(),
                (top - draw_height).into(),
            ],
        ),
        Operation::new("Do", vec![OVERLAY_NAME.into()]),
        Operation::new("Q", vec![]),
    ]
}

/// Word-wrap lines wider than the page. Words longer than a line are kept whole.
fn wrap_lines(lines: &[String]) -> Vec<String> {
    let mut wrapped = Vec::with_capacity(lines.len());
    for line in lines {
        if line.chars().count() <= WRAP_COLUMNS {
            wrapped.push(line.clone());
            continue;
        }
        let mut current = String::new();
        for word in line.split_whitespace() {
            let needed = current.chars().count() + 1 + word.chars().count();
            if !current.is_empty() && needed > WRAP_COLUMNS {
                wrapped.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            wrapped.push(current);
        }
    }
    wrapped
}

fn ascii_only(line: &str) -> String {
    line.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect()
}
