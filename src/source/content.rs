//! Content stream interpretation: text operators to positioned words.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document as LopdfDocument, Object};

use crate::error::{Error, Result};
use crate::model::Word;

/// Adjustment in a `TJ` array, in thousandths of an em, treated as a word break.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Glyph width used when a font carries no `/Widths`, in ems.
const DEFAULT_GLYPH_WIDTH: f32 = 0.5;

/// Height of the glyph top above the baseline, in ems.
const ASCENT: f32 = 0.8;

/// Visible page area from `MediaBox`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl PageBox {
    /// US Letter.
    pub const LETTER: PageBox = PageBox {
        x0: 0.0,
        y0: 0.0,
        x1: 612.0,
        y1: 792.0,
    };

    pub fn width(&self) -> f32 {
        (self.x1 - self.x0).abs()
    }

    pub fn height(&self) -> f32 {
        (self.y1 - self.y0).abs()
    }
}

/// Text matrix (a b c d e f).
#[derive(Debug, Clone, Copy)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
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
        }
    }
}

impl TextMatrix {
    fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Pre-multiply by a translation in text space.
    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn horizontal_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Glyph widths of a simple font.
#[derive(Debug, Clone, Default)]
struct FontMetrics {
    first_char: i64,
    widths: Vec<f32>,
}

impl FontMetrics {
    fn from_font(doc: &LopdfDocument, font: &Dictionary) -> Option<Self> {
        let first_char = font.get(b"FirstChar").ok()?.as_i64().ok()?;
        let widths = match font.get(b"Widths").ok()? {
            Object::Reference(id) => doc.get_object(*id).ok()?,
            other => other,
        };
        let widths = widths
            .as_array()
            .ok()?
            .iter()
            .map(|w| get_number(w).unwrap_or(0.0) / 1000.0)
            .collect();
        Some(Self { first_char, widths })
    }

    /// Width of a one-byte code in ems.
    fn width(&self, code: u8) -> f32 {
        let index = i64::from(code) - self.first_char;
        usize::try_from(index)
            .ok()
            .and_then(|i| self.widths.get(i))
            .copied()
            .filter(|w| *w > 0.0)
            .unwrap_or(DEFAULT_GLYPH_WIDTH)
    }
}

struct TextState {
    matrix: TextMatrix,
    line_matrix: TextMatrix,
    font: Vec<u8>,
    font_size: f32,
    leading: Option<f32>,
    char_spacing: f32,
    word_spacing: f32,
    in_text: bool,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            matrix: TextMatrix::default(),
            line_matrix: TextMatrix::default(),
            font: Vec::new(),
            font_size: 12.0,
            leading: None,
            char_spacing: 0.0,
            word_spacing: 0.0,
            in_text: false,
        }
    }
}

impl TextState {
    /// `T*`; without `TL` the leading is 1.2 times the font size.
    fn next_line(&mut self) {
        let leading = self.leading.unwrap_or(self.font_size * 1.2);
        self.line_matrix.translate(0.0, -leading);
        self.matrix = self.line_matrix;
    }
}

/// Interprets the text operators of one page's content stream.
pub(crate) struct ContentInterpreter<'a> {
    doc: &'a LopdfDocument,
    fonts: BTreeMap<Vec<u8>, &'a Dictionary>,
    metrics: BTreeMap<Vec<u8>, FontMetrics>,
    page_box: PageBox,
}

impl<'a> ContentInterpreter<'a> {
    pub(crate) fn new(
        doc: &'a LopdfDocument,
        fonts: BTreeMap<Vec<u8>, &'a Dictionary>,
        page_box: PageBox,
    ) -> Self {
        let metrics = fonts
            .iter()
            .filter_map(|(name, font)| FontMetrics::from_font(doc, font).map(|m| (name.clone(), m)))
            .collect();

        Self {
            doc,
            fonts,
            metrics,
            page_box,
        }
    }

    /// Run the content stream and collect words.
    pub(crate) fn words(&self, content: &[u8]) -> Result<Vec<Word>> {
        let content =
            lopdf::content::Content::decode(content).map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut state = TextState::default();
        let mut words = Vec::new();

        for op in &content.operations {
            let operands = &op.operands;
            match op.operator.as_str() {
                "BT" => {
                    state.in_text = true;
                    state.matrix = TextMatrix::default();
                    state.line_matrix = TextMatrix::default();
                }
                "ET" => state.in_text = false,
                "Tf" => {
                    if let Some(Object::Name(name)) = operands.first() {
                        state.font = name.clone();
                    }
                    state.font_size = operands.get(1).and_then(get_number).unwrap_or(12.0);
                }
                "TL" => state.leading = operands.first().and_then(get_number),
                "Tc" => state.char_spacing = operands.first().and_then(get_number).unwrap_or(0.0),
                "Tw" => state.word_spacing = operands.first().and_then(get_number).unwrap_or(0.0),
                "Td" | "TD" => {
                    let tx = operands.first().and_then(get_number).unwrap_or(0.0);
                    let ty = operands.get(1).and_then(get_number).unwrap_or(0.0);
                    if op.operator == "TD" {
                        state.leading = Some(-ty);
                    }
                    state.line_matrix.translate(tx, ty);
                    state.matrix = state.line_matrix;
                }
                "Tm" => {
                    if operands.len() >= 6 {
                        let n = |i: usize| get_number(&operands[i]).unwrap_or(0.0);
                        state.line_matrix = TextMatrix::new(n(0), n(1), n(2), n(3), n(4), n(5));
                        state.matrix = state.line_matrix;
                    }
                }
                "T*" => state.next_line(),
                "Tj" => {
                    if let Some(Object::String(bytes, _)) = operands.first() {
                        self.show(&mut state, bytes, &mut words);
                    }
                }
                "TJ" => {
                    if let Some(Object::Array(items)) = operands.first() {
                        self.show_array(&mut state, items, &mut words);
                    }
                }
                "'" => {
                    state.next_line();
                    if let Some(Object::String(bytes, _)) = operands.first() {
                        self.show(&mut state, bytes, &mut words);
                    }
                }
                "\"" => {
                    state.word_spacing = operands.first().and_then(get_number).unwrap_or(0.0);
                    state.char_spacing = operands.get(1).and_then(get_number).unwrap_or(0.0);
                    state.next_line();
                    if let Some(Object::String(bytes, _)) = operands.get(2) {
                        self.show(&mut state, bytes, &mut words);
                    }
                }
                _ => {}
            }
        }

        Ok(words)
    }

    fn show_array(&self, state: &mut TextState, items: &[Object], words: &mut Vec<Word>) {
        let mut last_char: Option<char> = None;

        for item in items {
            match item {
                Object::String(bytes, _) => {
                    if let Some(c) = self.show(state, bytes, words) {
                        last_char = Some(c);
                    }
                }
                other => {
                    let Some(adjustment) = get_number(other) else {
                        continue;
                    };
                    // Negative adjustments move right; large ones stand for a space.
                    let mut advance = -adjustment / 1000.0 * state.font_size;
                    let breaks_word = -adjustment > TJ_SPACE_THRESHOLD
                        && last_char.is_some_and(|c| !is_spaceless_script_char(c));
                    if breaks_word {
                        advance = advance.max(DEFAULT_GLYPH_WIDTH * state.font_size);
                    }
                    state.matrix.translate(advance, 0.0);
                }
            }
        }
    }

    /// Show one string, advancing the text matrix. Returns the last
    /// character shown.
    fn show(&self, state: &mut TextState, bytes: &[u8], words: &mut Vec<Word>) -> Option<char> {
        if !state.in_text {
            return None;
        }

        let encoding = self
            .fonts
            .get(&state.font)
            .and_then(|f| f.get_font_encoding(self.doc).ok());
        let text = match encoding {
            Some(ref enc) => LopdfDocument::decode_text(enc, bytes).unwrap_or_default(),
            None => decode_text_simple(bytes),
        };
        let chars: Vec<char> = text.chars().collect();

        // Per-character advance in ems; real widths only when bytes map 1:1.
        let widths: Vec<f32> = match self.metrics.get(&state.font) {
            Some(m) if chars.len() == bytes.len() => bytes.iter().map(|&b| m.width(b)).collect(),
            _ => vec![DEFAULT_GLYPH_WIDTH; chars.len()],
        };

        let size = state.font_size;
        let effective_size = size * state.matrix.vertical_scale();
        let h_scale = state.matrix.horizontal_scale();
        let baseline = state.matrix.f;

        let mut current = String::new();
        let mut start_x = 0.0;
        let mut end_x = 0.0;

        for (c, width) in chars.iter().zip(&widths) {
            let x = state.matrix.e;
            let mut advance = width * size + state.char_spacing;
            if *c == ' ' {
                advance += state.word_spacing;
            }

            if c.is_whitespace() {
                self.emit(&mut current, start_x, end_x, baseline, effective_size, words);
            } else {
                if current.is_empty() {
                    start_x = x;
                }
                current.push(*c);
                end_x = x + width * size * h_scale;
            }
            state.matrix.translate(advance, 0.0);
        }
        self.emit(&mut current, start_x, end_x, baseline, effective_size, words);

        chars.last().copied()
    }

    fn emit(&self, current: &mut String, x0: f32, x1: f32, baseline: f32, size: f32, words: &mut Vec<Word>) {
        if current.is_empty() {
            return;
        }
        let top = self.page_box.y1 - (baseline + size * ASCENT);
        words.push(Word::new(
            std::mem::take(current),
            x0 - self.page_box.x0,
            x1 - self.page_box.x0,
            top,
            size,
        ));
    }
}

/// Helper to extract number from PDF object.
pub(crate) fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Check if character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and Extension A
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    // Extensions B-F
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

/// Simple text decoding fallback when no encoding is available.
fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}
