//! Content-stream interpretation: text spans with position and font size.
//!
//! Walks a page's content stream tracking the text matrix and current font,
//! emitting one span per shown string. Only what outline inference needs is
//! modeled; clipping, color and graphics state are ignored.

use std::collections::BTreeMap;

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::parser::source::{LayoutLine, LayoutSpan};

/// A positioned span before line grouping.
#[derive(Debug, Clone)]
struct RawSpan {
    text: String,
    x: f32,
    y: f32,
    font_size: f32,
}

/// Spans closer than this on the Y axis are considered the same line.
const LINE_Y_TOLERANCE: f32 = 2.0;

/// Extract layout lines for one page.
pub(crate) fn extract_page_layout(
    doc: &LopdfDocument,
    page_id: ObjectId,
) -> Result<Vec<LayoutLine>> {
    let spans = extract_spans(doc, page_id)?;
    Ok(group_into_lines(spans))
}

/// Get the decompressed content stream bytes for a page.
fn page_content(doc: &LopdfDocument, page_id: ObjectId) -> Result<Vec<u8>> {
    let page_dict = doc
        .get_dictionary(page_id)
        .map_err(|e| Error::PdfParse(e.to_string()))?;

    let contents = page_dict
        .get(b"Contents")
        .map_err(|e| Error::PdfParse(e.to_string()))?;

    match contents {
        Object::Reference(r) => {
            if let Ok(Object::Stream(s)) = doc.get_object(*r) {
                return s
                    .get_plain_content()
                    .map_err(|e| Error::PdfParse(e.to_string()));
            }
            Err(Error::PdfParse("Invalid content stream".to_string()))
        }
        Object::Array(arr) => {
            let mut content = Vec::new();
            for obj in arr {
                if let Object::Reference(r) = obj {
                    if let Ok(Object::Stream(s)) = doc.get_object(*r) {
                        if let Ok(data) = s.get_plain_content() {
                            content.extend_from_slice(&data);
                            content.push(b' ');
                        }
                    }
                }
            }
            Ok(content)
        }
        Object::Stream(s) => s
            .get_plain_content()
            .map_err(|e| Error::PdfParse(e.to_string())),
        _ => Err(Error::PdfParse("Invalid content stream".to_string())),
    }
}

/// Walk the content stream and emit one span per shown string.
fn extract_spans(doc: &LopdfDocument, page_id: ObjectId) -> Result<Vec<RawSpan>> {
    let fonts = doc.get_page_fonts(page_id).unwrap_or_default();
    let content_bytes = page_content(doc, page_id)?;
    let content = lopdf::content::Content::decode(&content_bytes)
        .map_err(|e| Error::PdfParse(e.to_string()))?;

    let mut spans = Vec::new();
    let mut current_font_name: Vec<u8> = Vec::new();
    let mut current_font_size: f32 = 12.0;
    let mut matrix = TextMatrix::default();
    let mut in_text_block = false;

    for op in content.operations {
        match op.operator.as_str() {
            "BT" => {
                in_text_block = true;
                matrix = TextMatrix::default();
            }
            "ET" => {
                in_text_block = false;
            }
            "Tf" => {
                if op.operands.len() >= 2 {
                    if let Object::Name(name) = &op.operands[0] {
                        current_font_name = name.clone();
                    }
                    current_font_size = get_number(&op.operands[1]).unwrap_or(12.0);
                }
            }
            "TL" => {
                if let Some(tl) = op.operands.first().and_then(get_number) {
                    matrix.leading = tl;
                }
            }
            "Td" | "TD" => {
                if op.operands.len() >= 2 {
                    let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                    let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                    if op.operator == "TD" {
                        matrix.leading = -ty;
                    }
                    matrix.translate(tx, ty);
                }
            }
            "Tm" => {
                if op.operands.len() >= 6 {
                    matrix.set(
                        get_number(&op.operands[0]).unwrap_or(1.0),
                        get_number(&op.operands[1]).unwrap_or(0.0),
                        get_number(&op.operands[2]).unwrap_or(0.0),
                        get_number(&op.operands[3]).unwrap_or(1.0),
                        get_number(&op.operands[4]).unwrap_or(0.0),
                        get_number(&op.operands[5]).unwrap_or(0.0),
                    );
                }
            }
            "T*" => {
                matrix.next_line();
            }
            "Tj" | "TJ" => {
                if in_text_block {
                    let text = match (op.operator.as_str(), op.operands.first()) {
                        ("TJ", Some(Object::Array(arr))) => {
                            decode_tj_array(doc, page_id, &fonts, &current_font_name, arr)
                        }
                        ("Tj", Some(Object::String(bytes, _))) => {
                            decode_with_font(doc, page_id, &fonts, &current_font_name, bytes)
                        }
                        _ => String::new(),
                    };
                    push_span(&mut spans, text, &matrix, current_font_size);
                }
            }
            "'" | "\"" => {
                matrix.next_line();
                if in_text_block {
                    let text_idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(Object::String(bytes, _)) = op.operands.get(text_idx) {
                        let text =
                            decode_with_font(doc, page_id, &fonts, &current_font_name, bytes);
                        push_span(&mut spans, text, &matrix, current_font_size);
                    }
                }
            }
            _ => {}
        }
    }

    Ok(spans)
}

fn push_span(spans: &mut Vec<RawSpan>, text: String, matrix: &TextMatrix, font_size: f32) {
    if text.trim().is_empty() {
        return;
    }
    let (x, y) = matrix.position();
    spans.push(RawSpan {
        text,
        x,
        y,
        font_size: font_size * matrix.scale(),
    });
}

/// Decode a TJ operand array, inserting spaces for large kerning gaps.
fn decode_tj_array(
    doc: &LopdfDocument,
    page_id: ObjectId,
    fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    font_name: &[u8],
    arr: &[Object],
) -> String {
    // Adjustments are in 1/1000 text space units; large negative
    // values usually stand in for word spaces.
    const SPACE_THRESHOLD: f32 = 200.0;

    let mut combined = String::new();
    for item in arr {
        match item {
            Object::String(bytes, _) => {
                combined.push_str(&decode_with_font(doc, page_id, fonts, font_name, bytes));
            }
            Object::Integer(n) => {
                if -(*n as f32) > SPACE_THRESHOLD && !combined.is_empty() && !combined.ends_with(' ')
                {
                    combined.push(' ');
                }
            }
            Object::Real(n) => {
                if -n > SPACE_THRESHOLD && !combined.is_empty() && !combined.ends_with(' ') {
                    combined.push(' ');
                }
            }
            _ => {}
        }
    }
    combined
}

/// Decode a shown string using the current font's encoding, with a
/// simple fallback when no encoding is available.
fn decode_with_font(
    doc: &LopdfDocument,
    _page_id: ObjectId,
    fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    font_name: &[u8],
    bytes: &[u8],
) -> String {
    if let Some(font_dict) = fonts.get(font_name) {
        if let Ok(enc) = font_dict.get_font_encoding(doc) {
            if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                return text;
            }
        }
    }
    decode_text_simple(bytes)
}

/// Simple text decoding fallback when no encoding is available.
fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }

    // Fallback: Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

/// Group spans into visual lines by baseline proximity.
///
/// Spans are sorted top-to-bottom, then left-to-right within a line.
fn group_into_lines(mut spans: Vec<RawSpan>) -> Vec<LayoutLine> {
    if spans.is_empty() {
        return Vec::new();
    }

    spans.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines: Vec<Vec<RawSpan>> = Vec::new();
    for span in spans {
        match lines.last_mut() {
            Some(line) if (line[0].y - span.y).abs() <= LINE_Y_TOLERANCE => line.push(span),
            _ => lines.push(vec![span]),
        }
    }

    lines
        .into_iter()
        .map(|mut line| {
            line.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
            LayoutLine::new(line.into_iter().map(to_layout_span).collect())
        })
        .collect()
}

fn to_layout_span(span: RawSpan) -> LayoutSpan {
    // Width is estimated; the bbox only feeds position bookkeeping.
    let est_width = span.text.chars().count() as f32 * span.font_size * 0.5;
    LayoutSpan::new(
        span.text,
        span.font_size,
        [span.x, span.y, span.x + est_width, span.y + span.font_size],
    )
}

/// Text matrix state (translation, scale and leading only).
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            leading: 12.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        let leading = self.leading;
        self.translate(0.0, -leading);
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        // Vertical scale factor applied to the nominal font size
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Helper to extract a number from a PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(text: &str, x: f32, y: f32, size: f32) -> RawSpan {
        RawSpan {
            text: text.to_string(),
            x,
            y,
            font_size: size,
        }
    }

    #[test]
    fn test_group_into_lines_same_baseline() {
        let spans = vec![raw("World", 120.0, 700.0, 12.0), raw("Hello", 72.0, 700.5, 12.0)];
        let lines = group_into_lines(spans);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spans[0].text, "Hello");
        assert_eq!(lines[0].spans[1].text, "World");
    }

    #[test]
    fn test_group_into_lines_separate_baselines() {
        let spans = vec![raw("Body", 72.0, 650.0, 10.0), raw("Title", 72.0, 700.0, 24.0)];
        let lines = group_into_lines(spans);
        assert_eq!(lines.len(), 2);
        // Top of page first
        assert_eq!(lines[0].spans[0].text, "Title");
        assert_eq!(lines[1].spans[0].text, "Body");
    }

    #[test]
    fn test_group_into_lines_empty() {
        assert!(group_into_lines(Vec::new()).is_empty());
    }

    #[test]
    fn test_text_matrix_translate_and_scale() {
        let mut m = TextMatrix::default();
        m.translate(10.0, -14.0);
        assert_eq!(m.position(), (10.0, -14.0));
        assert_eq!(m.scale(), 1.0);

        m.set(2.0, 0.0, 0.0, 2.0, 0.0, 0.0);
        assert_eq!(m.scale(), 2.0);
    }

    #[test]
    fn test_next_line_uses_leading() {
        let mut m = TextMatrix::default();
        m.leading = 18.0;
        m.next_line();
        assert_eq!(m.position(), (0.0, -18.0));
    }

    #[test]
    fn test_decode_text_simple_utf8() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
    }

    #[test]
    fn test_decode_text_simple_utf16be() {
        let bytes = vec![0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
        assert_eq!(decode_text_simple(&bytes), "Hi");
    }
}
