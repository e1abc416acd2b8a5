use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, StringFormat, dictionary};

use super::{DocumentError, PDF_VERSION};

/// US Letter, in points.
const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 72.0;

const TITLE: &str = "Shipping Label";
const TITLE_SIZE: f32 = 20.0;
const BODY_SIZE: f32 = 14.0;
const LINE_GAP: f32 = 4.0;

/// Helvetica's average glyph advance, as a fraction of the font size.
const AVERAGE_ADVANCE: f32 = 0.5;

/// The printable fields of a shipping label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelContent {
    pub recipient: String,
    pub address: String,
    /// Rendered in pounds.
    pub weight: f64,
    pub service: String,
}

impl LabelContent {
    /// The body lines, top to bottom.
    pub fn lines(&self) -> [String; 4] {
        [
            format!("Recipient: {}", self.recipient),
            format!("Address: {}", self.address),
            format!("Weight: {} lb", self.weight),
            format!("Service: {}", self.service),
        ]
    }
}

/// Render a single-page label: a centered title followed by the four body lines.
///
/// The output depends only on `content`, so rendering the same label twice
/// yields identical bytes.
pub fn render_label(content: &LabelContent) -> Result<Vec<u8>, DocumentError> {
    let mut doc = Document::with_version(PDF_VERSION);
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let title_y = PAGE_HEIGHT - MARGIN - TITLE_SIZE;
    let title_width = TITLE.chars().count() as f32 * TITLE_SIZE * AVERAGE_ADVANCE;
    let title_x = ((PAGE_WIDTH - title_width) / 2.0).max(MARGIN);

    let mut operations = text_line(TITLE, TITLE_SIZE, title_x, title_y);
    // One blank line between the title and the body, like a paragraph break.
    let mut y = title_y - 2.0 * (TITLE_SIZE + LINE_GAP);
    for line in content.lines() {
        operations.extend(text_line(&line, BODY_SIZE, MARGIN, y));
        y -= BODY_SIZE + LINE_GAP;
    }

    let content_id = doc.add_object(lopdf::Stream::new(
        dictionary! {},
        Content { operations }.encode()?,
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
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

    let mut out = Vec::new();
    doc.save_to(&mut out)?;
    Ok(out)
}

fn text_line(text: &str, size: f32, x: f32, y: f32) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), size.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new(
            "Tj",
            vec![Object::String(win_ansi(text), StringFormat::Literal)],
        ),
        Operation::new("ET", vec![]),
    ]
}

/// Latin-1 characters map onto WinAnsi directly; anything else becomes `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}
