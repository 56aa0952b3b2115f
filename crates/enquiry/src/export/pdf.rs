//! Tabular PDF rendering.
//!
//! Produces a PDF 1.4 file using only the standard Type 1 fonts, so no font
//! data is embedded. The table is laid out on A4 portrait pages with the
//! header row repeated at the top of every page. Cells too long for their
//! column wrap onto extra lines and the row grows to fit.

use std::fmt::Write as _;
use std::io::{self, Write};

use chrono::{DateTime, Utc};

use crate::entry::{Entry, COLUMN_HEADERS};

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 40.0;
const ROW_HEIGHT: f32 = 18.0;
const LINE_HEIGHT: f32 = 11.0;
const FONT_SIZE: f32 = 9.0;
const CELL_PADDING: f32 = 4.0;
const V_PADDING: f32 = (ROW_HEIGHT - LINE_HEIGHT) / 2.0;
// Helvetica averages a little over half an em per glyph
const AVG_GLYPH_WIDTH: f32 = FONT_SIZE * 0.55;
// Relative column widths, in column order
const COLUMN_WEIGHTS: [f32; 6] = [1.0, 1.6, 1.1, 0.7, 0.5, 0.9];

/// A rendered table document.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfDocument {
    pages: Vec<String>,
    rows: usize,
    created: DateTime<Utc>,
}

/// Lay out `entries` as a six-column table.
///
/// Rows fill a page until the next one no longer fits below the header.
/// An empty slice still produces one page holding the header row.
#[must_use]
pub fn generate_document(entries: &[Entry]) -> PdfDocument {
    let body_height = PAGE_HEIGHT - 2.0 * MARGIN - ROW_HEIGHT;
    let mut pages = Vec::new();
    let mut current: Vec<Row> = Vec::new();
    let mut used = 0.0;

    for entry in entries {
        let row = Row::layout(entry);
        if !current.is_empty() && used + row.height > body_height {
            pages.push(page_content(&current));
            current.clear();
            used = 0.0;
        }
        used += row.height;
        current.push(row);
    }
    if !current.is_empty() || pages.is_empty() {
        pages.push(page_content(&current));
    }

    PdfDocument {
        pages,
        rows: entries.len(),
        created: Utc::now(),
    }
}

impl PdfDocument {
    /// Number of pages.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of data rows, header excluded.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Serialize the document.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = ObjectWriter::new();

        let first_page_obj = 5;
        let kids: Vec<String> = (0..self.pages.len())
            .map(|i| format!("{} 0 R", first_page_obj + 2 * i))
            .collect();

        out.object(1, "<< /Type /Catalog /Pages 2 0 R >>");
        out.object(
            2,
            &format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                self.pages.len()
            ),
        );
        out.object(
            3,
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
        );
        out.object(
            4,
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>",
        );

        for (i, content) in self.pages.iter().enumerate() {
            let page_obj = first_page_obj + 2 * i;
            let content_obj = page_obj + 1;
            out.object(
                page_obj,
                &format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
                     /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {content_obj} 0 R >>"
                ),
            );
            out.stream(content_obj, content);
        }

        let info_obj = first_page_obj + 2 * self.pages.len();
        out.object(
            info_obj,
            &format!(
                "<< /Title (User Data) /Producer (enquiry) /CreationDate ({}) >>",
                self.created.format("D:%Y%m%d%H%M%SZ")
            ),
        );

        out.finish(1, info_obj)
    }

    /// Write the serialized document to `writer`.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(&self.to_bytes())?;
        writer.flush()
    }
}

/// Accumulates numbered objects and records their byte offsets for the
/// cross-reference table.
struct ObjectWriter {
    buf: Vec<u8>,
    offsets: Vec<(usize, usize)>,
}

impl ObjectWriter {
    fn new() -> Self {
        let mut buf = Vec::new();
        // Binary marker comment so transfer tools treat the file as binary
        buf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
        Self {
            buf,
            offsets: Vec::new(),
        }
    }

    fn object(&mut self, id: usize, body: &str) {
        self.offsets.push((id, self.buf.len()));
        self.buf
            .extend_from_slice(format!("{id} 0 obj\n{body}\nendobj\n").as_bytes());
    }

    fn stream(&mut self, id: usize, content: &str) {
        self.offsets.push((id, self.buf.len()));
        self.buf.extend_from_slice(
            format!(
                "{id} 0 obj\n<< /Length {} >>\nstream\n{content}\nendstream\nendobj\n",
                content.len()
            )
            .as_bytes(),
        );
    }

    fn finish(mut self, root: usize, info: usize) -> Vec<u8> {
        self.offsets.sort_unstable();
        let size = self.offsets.len() + 1;
        let xref_at = self.buf.len();

        let mut xref = format!("xref\n0 {size}\n0000000000 65535 f \n");
        for (_, offset) in &self.offsets {
            let _ = writeln!(xref, "{offset:010} 00000 n ");
        }
        let _ = write!(
            xref,
            "trailer\n<< /Size {size} /Root {root} 0 R /Info {info} 0 R >>\nstartxref\n{xref_at}\n%%EOF\n"
        );
        self.buf.extend_from_slice(xref.as_bytes());
        self.buf
    }
}

/// One table row with every cell already wrapped to its column.
#[derive(Debug)]
struct Row {
    cells: Vec<Vec<String>>,
    height: f32,
}

impl Row {
    fn layout(entry: &Entry) -> Self {
        let cells: Vec<Vec<String>> = entry
            .cells()
            .iter()
            .zip(column_layout())
            .map(|(cell, (_, width))| wrap(cell, max_chars(width)))
            .collect();
        let lines = cells.iter().map(Vec::len).max().unwrap_or(1);
        Self {
            cells,
            height: lines as f32 * LINE_HEIGHT + 2.0 * V_PADDING,
        }
    }
}

/// Left edge and width of every column.
fn column_layout() -> [(f32, f32); 6] {
    let table_w = PAGE_WIDTH - 2.0 * MARGIN;
    let total: f32 = COLUMN_WEIGHTS.iter().sum();
    let mut x = MARGIN;
    COLUMN_WEIGHTS.map(|weight| {
        let width = table_w * weight / total;
        let column = (x, width);
        x += width;
        column
    })
}

fn max_chars(column_width: f32) -> usize {
    ((column_width - 2.0 * CELL_PADDING) / AVG_GLYPH_WIDTH).floor() as usize
}

/// Build the content stream of one page.
fn page_content(rows: &[Row]) -> String {
    let table_w = PAGE_WIDTH - 2.0 * MARGIN;
    let columns = column_layout();
    let mut s = String::new();

    // Header band
    let header_y = PAGE_HEIGHT - MARGIN - ROW_HEIGHT;
    let _ = writeln!(
        s,
        "0.16 0.50 0.73 rg {MARGIN} {header_y} {table_w} {ROW_HEIGHT} re f"
    );
    s.push_str("1 g\n");
    for ((x, _), header) in columns.iter().zip(COLUMN_HEADERS) {
        text(&mut s, "F2", *x, baseline(header_y + ROW_HEIGHT, 0), header);
    }

    // Body
    s.push_str("0 g 0.80 G 0.5 w\n");
    let mut top = header_y;
    for (index, row) in rows.iter().enumerate() {
        let y = top - row.height;
        let h = row.height;
        if index % 2 == 1 {
            let _ = writeln!(s, "0.96 g {MARGIN} {y} {table_w} {h} re f 0 g");
        }
        for ((x, w), lines) in columns.iter().zip(&row.cells) {
            let _ = writeln!(s, "{x} {y} {w} {h} re S");
            for (line_no, line) in lines.iter().enumerate() {
                text(&mut s, "F1", *x, baseline(top, line_no), line);
            }
        }
        top = y;
    }

    s
}

/// Baseline of line `line_no` in a row whose top edge is at `row_top`.
fn baseline(row_top: f32, line_no: usize) -> f32 {
    row_top - V_PADDING - (line_no as f32 + 1.0) * LINE_HEIGHT + 2.5
}

fn text(s: &mut String, font: &str, column_x: f32, y: f32, value: &str) {
    let x = column_x + CELL_PADDING;
    let _ = writeln!(
        s,
        "BT /{font} {FONT_SIZE} Tf {x} {y} Td ({}) Tj ET",
        escape(value)
    );
}

/// Break `value` into lines of at most `width` characters.
///
/// Breaks at spaces where possible; words longer than a line are split.
/// Always returns at least one line.
fn wrap(value: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0;

    for word in value.split(' ') {
        let mut chars: Vec<char> = word.chars().collect();
        while chars.len() > width {
            if line_len > 0 {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            }
            lines.push(chars.drain(..width).collect());
        }
        if line_len > 0 && line_len + 1 + chars.len() > width {
            lines.push(std::mem::take(&mut line));
            line_len = 0;
        }
        if line_len > 0 {
            line.push(' ');
            line_len += 1;
        }
        line.extend(chars.iter());
        line_len += chars.len();
    }

    if line_len > 0 || lines.is_empty() {
        lines.push(line);
    }
    lines
}

/// Escape a string for a PDF literal, mapping to WinAnsi bytes.
///
/// Characters outside Latin-1 become `?`.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            '\u{a0}'..='\u{ff}' => {
                let _ = write!(out, "\\{:03o}", u32::from(c));
            }
            _ => out.push('?'),
        }
    }
    out
}
