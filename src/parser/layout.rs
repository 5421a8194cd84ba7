//! Layout analysis for PDF pages.
//!
//! Walks a page's content stream once, collecting positioned text spans and
//! the XObjects painted with `Do`. Spans are grouped into lines and lines
//! into horizontal text blocks (column aware), which become the page's text
//! regions.

use std::collections::{BTreeMap, HashMap};

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};

use super::element::{resolve_xobject, PageElement};

/// Widest text extent (in points) considered for column detection.
/// Anything wider is treated as a single column.
const MAX_LAYOUT_WIDTH: f32 = 10_000.0;

/// A text span with position and font information.
#[derive(Debug, Clone)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Approximate width of the text
    pub width: f32,
    /// Font size in points
    pub font_size: f32,
    /// Font name (e.g., "Helvetica-Bold")
    pub font_name: String,
}

impl TextSpan {
    /// Create a new text span. Width is estimated from the character count.
    pub fn new(text: String, x: f32, y: f32, font_size: f32, font_name: String) -> Self {
        let width = text.chars().count() as f32 * font_size * 0.5;
        Self {
            text,
            x,
            y,
            width,
            font_size,
            font_name,
        }
    }
}

/// Spans sharing a baseline.
#[derive(Debug, Clone)]
pub struct TextLine {
    /// The spans in this line, sorted by X position
    pub spans: Vec<TextSpan>,
    /// Y position (baseline)
    pub y: f32,
    /// Leftmost X position
    pub x: f32,
    /// Dominant font size in this line
    pub font_size: f32,
}

impl TextLine {
    /// Create a new text line from spans.
    pub fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        if spans.is_empty() {
            return Self {
                spans: vec![],
                y: 0.0,
                x: 0.0,
                font_size: 0.0,
            };
        }

        spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));

        // Dominant size, weighted by text length
        let total_chars: usize = spans.iter().map(|s| s.text.len()).sum();
        let weighted_size: f32 = spans
            .iter()
            .map(|s| s.font_size * s.text.len() as f32)
            .sum();
        let font_size = if total_chars > 0 {
            weighted_size / total_chars as f32
        } else {
            spans[0].font_size
        };

        let y = spans[0].y;
        let x = spans[0].x;

        Self {
            spans,
            y,
            x,
            font_size,
        }
    }

    /// Combined text of all spans, with spaces inserted at visible gaps.
    pub fn text(&self) -> String {
        let mut result = String::new();

        for (i, span) in self.spans.iter().enumerate() {
            if i == 0 {
                result.push_str(&span.text);
                continue;
            }

            let prev_span = &self.spans[i - 1];
            let gap = span.x - (prev_span.x + prev_span.width);

            let char_count = span.text.chars().count();
            let avg_char_width = if char_count > 0 && span.width > 0.0 {
                span.width / char_count as f32
            } else {
                span.font_size * 0.5
            };

            let spaceless = prev_span
                .text
                .chars()
                .last()
                .map(is_spaceless_script_char)
                .unwrap_or(false)
                && span
                    .text
                    .chars()
                    .next()
                    .map(is_spaceless_script_char)
                    .unwrap_or(false);

            let already_spaced = prev_span.text.ends_with(&[' ', '\u{00A0}'][..])
                || span.text.starts_with(&[' ', '\u{00A0}'][..]);

            if gap > avg_char_width * 0.2 && !spaceless && !already_spaced {
                result.push(' ');
            }

            result.push_str(&span.text);
        }

        result
    }
}

/// A horizontal text block: consecutive lines with regular spacing.
#[derive(Debug, Clone)]
pub struct TextBlock {
    /// The lines in this block, top to bottom
    pub lines: Vec<TextLine>,
}

impl TextBlock {
    /// Create a new text block.
    pub fn new(lines: Vec<TextLine>) -> Self {
        Self { lines }
    }

    /// Text of all lines, one per row.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check if the block has no visible text.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() || self.text().trim().is_empty()
    }
}

/// A detected column in the page layout.
#[derive(Debug, Clone)]
pub struct Column {
    /// Left boundary X coordinate
    pub left: f32,
    /// Right boundary X coordinate
    pub right: f32,
    /// Column index (0 = leftmost)
    pub index: usize,
}

impl Column {
    /// Check if an X coordinate falls within this column.
    pub fn contains(&self, x: f32) -> bool {
        x >= self.left && x <= self.right
    }

    /// A span belongs to a column if its left edge or center lies inside it.
    pub fn contains_span(&self, span: &TextSpan) -> bool {
        let center = span.x + span.width / 2.0;
        self.contains(span.x) || self.contains(center)
    }
}

/// Result of walking one page's content stream.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    /// Text spans in stream order
    pub spans: Vec<TextSpan>,
    /// Names passed to `Do`, in stream order
    pub xobjects: Vec<Vec<u8>>,
}

/// Layout analyzer over a loaded document.
pub struct LayoutAnalyzer<'a> {
    doc: &'a LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
}

impl<'a> LayoutAnalyzer<'a> {
    /// Create a new layout analyzer.
    pub fn new(doc: &'a LopdfDocument) -> Self {
        Self {
            doc,
            pages: doc.get_pages(),
        }
    }

    /// Page numbers (1-indexed) in document order.
    pub fn page_numbers(&self) -> Vec<u32> {
        self.pages.keys().copied().collect()
    }

    fn page_id(&self, page_num: u32) -> Result<ObjectId> {
        self.pages
            .get(&page_num)
            .copied()
            .ok_or(Error::PageOutOfRange(page_num, self.pages.len() as u32))
    }

    /// Classify a page's content into layout elements.
    ///
    /// Text blocks come first in reading order, followed by painted
    /// XObjects in stream order.
    pub fn page_elements(&self, page_num: u32) -> Result<Vec<PageElement<'a>>> {
        let page_id = self.page_id(page_num)?;
        let content = self.walk_page(page_id)?;

        let mut elements: Vec<PageElement<'a>> = self
            .group_into_blocks(content.spans)
            .into_iter()
            .filter(|block| !block.is_empty())
            .map(|block| PageElement::TextRegion(block.text()))
            .collect();

        let resources = self.page_resources(page_id);
        for name in content.xobjects {
            elements.push(resolve_xobject(self.doc, resources, &name));
        }

        Ok(elements)
    }

    /// Extract positioned text spans from a page.
    pub fn extract_page_spans(&self, page_num: u32) -> Result<Vec<TextSpan>> {
        let page_id = self.page_id(page_num)?;
        Ok(self.walk_page(page_id)?.spans)
    }

    /// Group spans into horizontal text blocks.
    pub fn group_into_blocks(&self, spans: Vec<TextSpan>) -> Vec<TextBlock> {
        let lines = self.group_spans_into_lines(spans);
        self.group_lines_into_blocks(lines)
    }

    fn walk_page(&self, page_id: ObjectId) -> Result<PageContent> {
        let lopdf_fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut fonts = HashMap::new();
        for (name, font) in &lopdf_fonts {
            let base_font = font
                .get(b"BaseFont")
                .ok()
                .and_then(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            fonts.insert(name.clone(), base_font);
        }

        let content = self.get_page_content(page_id)?;
        self.parse_content_stream(&content, &fonts, &lopdf_fonts)
    }

    /// Concatenated page content streams, decompressed where a filter is declared.
    fn get_page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents,
            // A page without content is blank, not broken
            Err(_) => return Ok(Vec::new()),
        };

        let refs: Vec<ObjectId> = match contents {
            Object::Reference(r) => match self.doc.get_object(*r) {
                Ok(Object::Array(arr)) => arr.iter().filter_map(|o| o.as_reference().ok()).collect(),
                _ => vec![*r],
            },
            Object::Array(arr) => arr.iter().filter_map(|o| o.as_reference().ok()).collect(),
            _ => return Err(Error::PdfParse("Invalid content stream".to_string())),
        };

        let mut content = Vec::new();
        for r in refs {
            if let Ok(Object::Stream(s)) = self.doc.get_object(r) {
                let data = s
                    .decompressed_content()
                    .unwrap_or_else(|_| s.content.clone());
                content.extend_from_slice(&data);
                content.push(b' ');
            }
        }
        Ok(content)
    }

    /// Resources dictionary of a page, following `/Parent` inheritance.
    fn page_resources(&self, page_id: ObjectId) -> Option<&'a lopdf::Dictionary> {
        let mut current = self.doc.get_dictionary(page_id).ok();
        // Bounded to guard against reference cycles
        for _ in 0..32 {
            let dict = current?;
            if let Ok(res) = dict.get(b"Resources") {
                return match res {
                    Object::Reference(r) => self.doc.get_dictionary(*r).ok(),
                    Object::Dictionary(d) => Some(d),
                    _ => None,
                };
            }
            current = dict
                .get(b"Parent")
                .and_then(Object::as_reference)
                .and_then(|r| self.doc.get_dictionary(r))
                .ok();
        }
        None
    }

    fn decode_string(
        &self,
        lopdf_fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
        font_name: &[u8],
        bytes: &[u8],
    ) -> String {
        if let Some(font) = lopdf_fonts.get(font_name) {
            if let Ok(enc) = font.get_font_encoding(self.doc) {
                if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                    return text;
                }
            }
        }
        decode_text_simple(bytes)
    }

    fn parse_content_stream(
        &self,
        content: &[u8],
        fonts: &HashMap<Vec<u8>, String>,
        lopdf_fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    ) -> Result<PageContent> {
        let content =
            lopdf::content::Content::decode(content).map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut page = PageContent::default();
        let mut current_font = String::new();
        let mut current_font_name: Vec<u8> = Vec::new();
        let mut current_font_size: f32 = 12.0;
        let mut text_matrix = TextMatrix::default();
        let mut in_text_block = false;

        for op in content.operations {
            let shown = match op.operator.as_str() {
                "BT" => {
                    in_text_block = true;
                    text_matrix = TextMatrix::default();
                    None
                }
                "ET" => {
                    in_text_block = false;
                    None
                }
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let Object::Name(font_name) = &op.operands[0] {
                            current_font_name = font_name.clone();
                            current_font = fonts
                                .get(font_name.as_slice())
                                .cloned()
                                .unwrap_or_else(|| String::from_utf8_lossy(font_name).to_string());
                        }
                        current_font_size = get_number(&op.operands[1]).unwrap_or(12.0);
                    }
                    None
                }
                "TL" => {
                    if let Some(leading) = op.operands.first().and_then(get_number) {
                        text_matrix.leading = leading;
                    }
                    None
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                        let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                        if op.operator == "TD" {
                            text_matrix.leading = -ty;
                        }
                        text_matrix.translate(tx, ty);
                    }
                    None
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        text_matrix.set(
                            get_number(&op.operands[0]).unwrap_or(1.0),
                            get_number(&op.operands[1]).unwrap_or(0.0),
                            get_number(&op.operands[2]).unwrap_or(0.0),
                            get_number(&op.operands[3]).unwrap_or(1.0),
                            get_number(&op.operands[4]).unwrap_or(0.0),
                            get_number(&op.operands[5]).unwrap_or(0.0),
                        );
                    }
                    None
                }
                "T*" => {
                    text_matrix.next_line();
                    None
                }
                "Tj" if in_text_block => match op.operands.first() {
                    Some(Object::String(bytes, _)) => {
                        Some(self.decode_string(lopdf_fonts, &current_font_name, bytes))
                    }
                    _ => None,
                },
                "TJ" if in_text_block => match op.operands.first() {
                    Some(Object::Array(arr)) => {
                        Some(self.decode_tj_array(lopdf_fonts, &current_font_name, arr))
                    }
                    _ => None,
                },
                "'" | "\"" => {
                    text_matrix.next_line();
                    let text_idx = if op.operator == "\"" { 2 } else { 0 };
                    match op.operands.get(text_idx) {
                        Some(Object::String(bytes, _)) if in_text_block => {
                            Some(self.decode_string(lopdf_fonts, &current_font_name, bytes))
                        }
                        _ => None,
                    }
                }
                "Do" => {
                    if let Some(Object::Name(name)) = op.operands.first() {
                        page.xobjects.push(name.clone());
                    }
                    None
                }
                _ => None,
            };

            if let Some(text) = shown {
                if !text.trim().is_empty() {
                    let (x, y) = text_matrix.get_position();
                    let effective_size = current_font_size * text_matrix.get_scale();
                    page.spans.push(TextSpan::new(
                        text,
                        x,
                        y,
                        effective_size,
                        current_font.clone(),
                    ));
                }
            }
        }

        Ok(page)
    }

    /// Decode a `TJ` array. Large negative kerning values mark word breaks.
    fn decode_tj_array(
        &self,
        lopdf_fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
        font_name: &[u8],
        arr: &[Object],
    ) -> String {
        // 1/1000 text space units
        const SPACE_THRESHOLD: f32 = 200.0;

        let mut combined = String::new();
        for item in arr {
            match item {
                Object::String(bytes, _) => {
                    combined.push_str(&self.decode_string(lopdf_fonts, font_name, bytes));
                }
                Object::Integer(_) | Object::Real(_) => {
                    let adjustment = -get_number(item).unwrap_or(0.0);
                    let needs_space = adjustment > SPACE_THRESHOLD
                        && !combined.ends_with(&[' ', '\u{00A0}'][..])
                        && combined
                            .chars()
                            .last()
                            .map(|c| !is_spaceless_script_char(c))
                            .unwrap_or(false);
                    if needs_space {
                        combined.push(' ');
                    }
                }
                _ => {}
            }
        }
        combined
    }

    /// Detect a two-column layout from a vertical gutter in span coverage.
    fn detect_columns(&self, spans: &[TextSpan]) -> Vec<Column> {
        if spans.is_empty() {
            return vec![];
        }

        let min_x = spans
            .iter()
            .map(|s| s.x)
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .unwrap_or(0.0);
        let max_x = spans
            .iter()
            .map(|s| s.x + s.width)
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .unwrap_or(0.0);

        let single = vec![Column {
            left: min_x - 10.0,
            right: max_x + 10.0,
            index: 0,
        }];

        let page_width = max_x - min_x;
        if !page_width.is_finite() || !(250.0..=MAX_LAYOUT_WIDTH).contains(&page_width) {
            return single;
        }

        let slice_width = 3.0;
        let num_slices = match ((page_width / slice_width) as usize).checked_add(1) {
            Some(n) => n,
            None => return single,
        };
        let mut slice_occupancy = vec![0usize; num_slices];

        for span in spans {
            let start_slice = ((span.x - min_x) / slice_width) as usize;
            let end_slice = (((span.x + span.width) - min_x) / slice_width) as usize;

            for slot in slice_occupancy
                .iter_mut()
                .take(end_slice.min(num_slices - 1) + 1)
                .skip(start_slice)
            {
                *slot += 1;
            }
        }

        // Largest empty run in the middle 70% of the page, preferring central gaps
        let search_start = num_slices * 15 / 100;
        let search_end = num_slices * 85 / 100;
        let page_center = num_slices / 2;

        let mut best: Option<(usize, usize, f32)> = None;
        let mut run_start = 0;
        let mut run_len = 0;

        let consider = |start: usize, len: usize, best: &mut Option<(usize, usize, f32)>| {
            let width = len as f32 * slice_width;
            if width < 10.0 {
                return;
            }
            let center_dist = ((start + len / 2) as i32 - page_center as i32).abs() as f32;
            let replace = match best {
                None => true,
                Some((_, best_len, best_dist)) => {
                    let best_width = *best_len as f32 * slice_width;
                    width > best_width * 1.5 || (width >= best_width * 0.7 && center_dist < *best_dist)
                }
            };
            if replace {
                *best = Some((start, len, center_dist));
            }
        };

        for (i, &occupancy) in slice_occupancy
            .iter()
            .enumerate()
            .take(search_end)
            .skip(search_start)
        {
            if occupancy == 0 {
                if run_len == 0 {
                    run_start = i;
                }
                run_len += 1;
            } else {
                if run_len > 0 {
                    consider(run_start, run_len, &mut best);
                }
                run_len = 0;
            }
        }
        if run_len > 0 {
            consider(run_start, run_len, &mut best);
        }

        let Some((gap_start, gap_len, _)) = best else {
            return single;
        };

        if (gap_len as f32 * slice_width) < 12.0 {
            log::debug!("Gap too small (< 12pt), treating as single column");
            return single;
        }

        let gutter_center = min_x + (gap_start as f32 + gap_len as f32 / 2.0) * slice_width;

        if gutter_center - min_x < 80.0 || max_x - gutter_center < 80.0 {
            log::debug!("Column too narrow, treating as single column");
            return single;
        }

        let left_spans = spans
            .iter()
            .filter(|s| s.x + s.width / 2.0 < gutter_center)
            .count();
        let right_spans = spans.len() - left_spans;

        // Each side needs at least 10% of the spans
        let min_spans = (spans.len() / 10).max(2);
        if left_spans < min_spans || right_spans < min_spans {
            log::debug!(
                "Spans too imbalanced (left={}, right={}), treating as single column",
                left_spans,
                right_spans
            );
            return single;
        }

        vec![
            Column {
                left: min_x - 10.0,
                right: gutter_center,
                index: 0,
            },
            Column {
                left: gutter_center,
                right: max_x + 10.0,
                index: 1,
            },
        ]
    }

    /// Group spans into lines, keeping columns apart.
    ///
    /// Lines are returned column by column so that each column reads as a
    /// continuous run of text blocks.
    fn group_spans_into_lines(&self, spans: Vec<TextSpan>) -> Vec<TextLine> {
        if spans.is_empty() {
            return vec![];
        }

        let columns = self.detect_columns(&spans);
        log::debug!("Detected {} columns", columns.len());

        if columns.len() <= 1 {
            return group_single_column(spans);
        }

        let mut column_spans: Vec<Vec<TextSpan>> = vec![Vec::new(); columns.len()];
        for span in spans {
            let col_idx = columns
                .iter()
                .position(|c| c.contains_span(&span))
                .unwrap_or(0);
            column_spans[col_idx].push(span);
        }

        column_spans
            .into_iter()
            .flat_map(group_single_column)
            .collect()
    }

    /// Group lines into blocks based on spacing, size, and indentation breaks.
    fn group_lines_into_blocks(&self, lines: Vec<TextLine>) -> Vec<TextBlock> {
        if lines.is_empty() {
            return vec![];
        }

        let avg_spacing = average_line_spacing(&lines);
        let mut blocks: Vec<TextBlock> = Vec::new();
        let mut current: Vec<TextLine> = Vec::new();

        for line in lines {
            if let Some(prev) = current.last() {
                if should_break_block(prev, &line, avg_spacing) {
                    blocks.push(TextBlock::new(std::mem::take(&mut current)));
                }
            }
            current.push(line);
        }

        if !current.is_empty() {
            blocks.push(TextBlock::new(current));
        }

        blocks
    }
}

/// Y-based line grouping within one column, top to bottom.
fn group_single_column(mut spans: Vec<TextSpan>) -> Vec<TextLine> {
    if spans.is_empty() {
        return vec![];
    }

    // PDF Y grows upwards
    spans.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines: Vec<TextLine> = Vec::new();
    let mut current_line_spans: Vec<TextSpan> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let y_tolerance = span.font_size * 0.3;

        match current_y {
            Some(y) if (span.y - y).abs() <= y_tolerance => current_line_spans.push(span),
            _ => {
                if !current_line_spans.is_empty() {
                    lines.push(TextLine::from_spans(std::mem::take(&mut current_line_spans)));
                }
                current_y = Some(span.y);
                current_line_spans.push(span);
            }
        }
    }

    if !current_line_spans.is_empty() {
        lines.push(TextLine::from_spans(current_line_spans));
    }

    lines
}

fn average_line_spacing(lines: &[TextLine]) -> f32 {
    let spacings: Vec<f32> = lines
        .windows(2)
        .map(|w| (w[0].y - w[1].y).abs())
        .filter(|s| *s > 0.1)
        .collect();

    if spacings.is_empty() {
        return 12.0;
    }

    spacings.iter().sum::<f32>() / spacings.len() as f32
}

fn should_break_block(prev_line: &TextLine, curr_line: &TextLine, avg_spacing: f32) -> bool {
    let spacing = (prev_line.y - curr_line.y).abs();

    // A line above the previous one means a new column or region started
    curr_line.y > prev_line.y + 0.1
        || spacing > avg_spacing * 1.5
        || (prev_line.font_size - curr_line.font_size).abs() > 1.0
        || (prev_line.x - curr_line.x).abs() > 20.0
}

/// Text matrix for tracking position in content stream.
#[derive(Debug, Clone)]
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
        self.translate(0.0, -self.leading);
    }

    fn get_position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn get_scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Check if a character belongs to a script written without word spaces.
///
/// Chinese and Japanese qualify; Korean (Hangul) uses spaces and does not.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&code)
        || (0x3400..=0x4DBF).contains(&code)
        || (0x20000..=0x2EBEF).contains(&code)
        // Hiragana, Katakana
        || (0x3040..=0x30FF).contains(&code)
        // CJK Symbols and Punctuation
        || (0x3000..=0x303F).contains(&code)
}

/// Fallback decoding when the font has no usable encoding.
fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}
