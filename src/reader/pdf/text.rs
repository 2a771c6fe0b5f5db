//! Positioned text spans from a page content stream.
//!
//! Only the text and graphics state needed for placement is tracked: the
//! current transformation matrix, the text and line matrices, font size and
//! leading. Glyph widths are estimated from the font size.

use lopdf::content::Operation;
use lopdf::Object;

/// Estimated glyph advance as a fraction of the font size.
const AVERAGE_GLYPH_WIDTH: f32 = 0.5;

/// TJ adjustments below this (thousandths of an em) read as a word space.
const TJ_SPACE_THRESHOLD: f32 = -200.0;

/// A run of text placed on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Estimated width of the text
    pub width: f32,
    /// Font size in points
    pub font_size: f32,
}

impl TextSpan {
    /// Create a new span.
    pub fn new(text: impl Into<String>, x: f32, y: f32, width: f32, font_size: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width,
            font_size,
        }
    }

    /// Right edge of the span.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn translate(tx: f32, ty: f32) -> Self {
        Matrix {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    fn from_operands(operands: &[Object]) -> Option<Self> {
        let n = numbers(operands);
        if n.len() < 6 {
            return None;
        }
        Some(Matrix {
            a: n[0],
            b: n[1],
            c: n[2],
            d: n[3],
            e: n[4],
            f: n[5],
        })
    }

    /// `self × other`
    fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn horizontal_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

struct TextState {
    ctm: Matrix,
    saved: Vec<Matrix>,
    tm: Matrix,
    tlm: Matrix,
    font_size: f32,
    leading: f32,
    spans: Vec<TextSpan>,
}

impl TextState {
    fn new() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            saved: Vec::new(),
            tm: Matrix::IDENTITY,
            tlm: Matrix::IDENTITY,
            font_size: 0.0,
            leading: 0.0,
            spans: Vec::new(),
        }
    }

    fn apply(&mut self, op: &Operation) {
        let operands = op.operands.as_slice();
        match op.operator.as_str() {
            "q" => self.saved.push(self.ctm),
            "Q" => {
                if let Some(ctm) = self.saved.pop() {
                    self.ctm = ctm;
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.ctm = m.multiply(&self.ctm);
                }
            }
            "BT" => {
                self.tm = Matrix::IDENTITY;
                self.tlm = Matrix::IDENTITY;
            }
            "Tf" => {
                if let Some(size) = operands.get(1).and_then(number) {
                    self.font_size = size;
                }
            }
            "TL" => {
                if let Some(leading) = operands.first().and_then(number) {
                    self.leading = leading;
                }
            }
            "Td" => {
                if let [tx, ty] = numbers(operands).as_slice() {
                    self.move_line(*tx, *ty);
                }
            }
            "TD" => {
                if let [tx, ty] = numbers(operands).as_slice() {
                    self.leading = -*ty;
                    self.move_line(*tx, *ty);
                }
            }
            "Tm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.tm = m;
                    self.tlm = m;
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    let text = decode_string(bytes);
                    let advance = glyph_advance(&text);
                    self.show(text, advance);
                }
            }
            "'" => {
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.first() {
                    let text = decode_string(bytes);
                    let advance = glyph_advance(&text);
                    self.show(text, advance);
                }
            }
            "\"" => {
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.get(2) {
                    let text = decode_string(bytes);
                    let advance = glyph_advance(&text);
                    self.show(text, advance);
                }
            }
            "TJ" => {
                if let Some(Object::Array(parts)) = operands.first() {
                    self.show_array(parts);
                }
            }
            _ => {}
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.tlm = Matrix::translate(tx, ty).multiply(&self.tlm);
        self.tm = self.tlm;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    fn show_array(&mut self, parts: &[Object]) {
        let mut text = String::new();
        let mut advance = 0.0;
        for part in parts {
            match part {
                Object::String(bytes, _) => {
                    let decoded = decode_string(bytes);
                    advance += glyph_advance(&decoded);
                    text.push_str(&decoded);
                }
                other => {
                    if let Some(adjust) = number(other) {
                        advance -= adjust / 1000.0;
                        if adjust < TJ_SPACE_THRESHOLD && !text.ends_with(' ') {
                            text.push(' ');
                        }
                    }
                }
            }
        }
        self.show(text, advance);
    }

    /// Emit a span at the current text position and move past it.
    /// `advance` is in units of the font size.
    fn show(&mut self, text: String, advance: f32) {
        let width = advance * self.font_size;
        let trm = self.tm.multiply(&self.ctm);
        if !text.trim().is_empty() {
            self.spans.push(TextSpan::new(
                text,
                trm.e,
                trm.f,
                width * trm.horizontal_scale(),
                self.font_size * trm.vertical_scale(),
            ));
        }
        self.tm = Matrix::translate(width, 0.0).multiply(&self.tm);
    }
}

/// Collect the text spans drawn by a page's content operations, in
/// stream order.
pub fn page_spans(operations: &[Operation]) -> Vec<TextSpan> {
    let mut state = TextState::new();
    for op in operations {
        state.apply(op);
    }
    state.spans
}

/// Decode a PDF string: UTF-16BE with a byte order mark, otherwise one
/// byte per character.
pub fn decode_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    bytes
        .iter()
        .map(|&b| char::from(b))
        .filter(|c| !c.is_control())
        .collect()
}

fn glyph_advance(text: &str) -> f32 {
    text.chars().count() as f32 * AVERAGE_GLYPH_WIDTH
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

fn numbers(operands: &[Object]) -> Vec<f32> {
    operands.iter().filter_map(number).collect()
}
