//! Paginated (PDF) output
//!
//! Text-only layout in the standard Courier font: the document is reduced to
//! lines, wrapped to the content frame width and then placed page by page.
//! Each iteration asks how many of the remaining lines fit the next frame,
//! emits that page and advances until nothing is left. Embedded images
//! become a bracketed placeholder line.

use super::{DocumentWriter, RenderContext, RenderedDocument, RichDocument};
use crate::domain::errors::FolioError;
use crate::domain::result::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write as _;

/// Courier advance width as a fraction of the font size
const COURIER_ADVANCE: f32 = 0.6;

/// Page geometry, in PostScript points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub font_size: f32,
    pub line_height: f32,
}

impl Default for PageLayout {
    /// US Letter with one-inch margins
    fn default() -> Self {
        Self {
            width: 612.0,
            height: 792.0,
            margin: 72.0,
            font_size: 10.0,
            line_height: 12.0,
        }
    }
}

impl PageLayout {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.font_size <= 0.0 || self.line_height <= 0.0 {
            return Err("page.font_size and page.line_height must be positive".to_string());
        }
        if self.chars_per_line() == 0 || self.lines_per_page() == 0 {
            return Err(format!(
                "page.margin {} leaves no room for text on a {}x{} page",
                self.margin, self.width, self.height
            ));
        }
        Ok(())
    }

    /// Characters that fit the content frame width
    pub fn chars_per_line(&self) -> usize {
        let frame = self.width - 2.0 * self.margin;
        if frame <= 0.0 {
            return 0;
        }
        (frame / (self.font_size * COURIER_ADVANCE)).floor() as usize
    }

    /// Lines that fit the content frame height
    pub fn lines_per_page(&self) -> usize {
        let frame = self.height - 2.0 * self.margin;
        if frame <= 0.0 || self.line_height <= 0.0 {
            return 0;
        }
        (frame / self.line_height).floor() as usize
    }
}

/// Split `lines` into pages
///
/// `cancelled` is consulted before every page; when it reports true the
/// pages laid out so far are discarded and `None` is returned.
pub fn paginate<'a>(
    lines: &'a [String],
    layout: &PageLayout,
    cancelled: impl Fn() -> bool,
) -> Option<Vec<&'a [String]>> {
    let per_page = layout.lines_per_page().max(1);
    let mut pages = Vec::new();
    let mut remaining = lines;

    while !remaining.is_empty() {
        if cancelled() {
            return None;
        }
        let fits = remaining.len().min(per_page);
        let (page, rest) = remaining.split_at(fits);
        pages.push(page);
        remaining = rest;
    }

    if pages.is_empty() {
        pages.push(&lines[..0]);
    }
    Some(pages)
}

/// Wrap one line to `width` characters, breaking at spaces where possible
pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let chars: Vec<char> = line.chars().collect();
    if chars.len() <= width {
        return vec![line.to_string()];
    }

    let mut wrapped = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        if chars.len() - start <= width {
            wrapped.push(chars[start..].iter().collect());
            break;
        }
        let window = &chars[start..start + width + 1];
        let split = window.iter().rposition(|c| *c == ' ').filter(|&i| i > 0);
        match split {
            Some(i) => {
                wrapped.push(chars[start..start + i].iter().collect());
                start += i + 1;
            }
            None => {
                wrapped.push(chars[start..start + width].iter().collect());
                start += width;
            }
        }
    }
    wrapped
}

#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    layout: PageLayout,
}

impl PdfWriter {
    pub fn new(layout: PageLayout) -> Self {
        Self { layout }
    }
}

impl DocumentWriter for PdfWriter {
    fn write(&self, document: &RichDocument, ctx: &RenderContext<'_>) -> Result<RenderedDocument> {
        let width = self.layout.chars_per_line();
        let lines: Vec<String> = document
            .text_with_placeholders()
            .split('\n')
            .flat_map(|line| wrap_line(line, width))
            .collect();
        let lines = if document.is_empty() { Vec::new() } else { lines };

        let pages = paginate(&lines, &self.layout, || ctx.is_cancelled())
            .ok_or(FolioError::Cancelled)?;

        tracing::trace!(
            note_id = %ctx.note.id,
            pages = pages.len(),
            "Laid out paginated document"
        );

        let (bytes, replaced) =
            assemble(&pages, &self.layout, &ctx.note.title, ctx.note.created_at)?;
        let mut rendered = RenderedDocument::new(bytes);
        if replaced > 0 {
            tracing::debug!(
                note_id = %ctx.note.id,
                replaced,
                "Characters outside WinAnsi replaced in PDF text"
            );
            rendered.warnings.push(format!(
                "{replaced} character(s) outside the PDF font's WinAnsi range were replaced with '?'"
            ));
        }
        Ok(rendered)
    }
}

/// Serialize laid-out pages as a PDF 1.4 file
///
/// Also returns how many body characters had no WinAnsi code.
fn assemble(
    pages: &[&[String]],
    layout: &PageLayout,
    title: &str,
    created_at: DateTime<Utc>,
) -> Result<(Vec<u8>, usize)> {
    let mut replaced = 0;
    let mut objects: Vec<Vec<u8>> = Vec::new();
    let page_count = pages.len();
    let first_page = 4;
    let info = first_page + 2 * page_count;

    objects.push(b"<< /Type /Catalog /Pages 2 0 R >>".to_vec());
    let kids: Vec<String> = (0..page_count)
        .map(|i| format!("{} 0 R", first_page + 2 * i))
        .collect();
    objects.push(format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids.join(" "), page_count).into_bytes());
    objects.push(
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Courier /Encoding /WinAnsiEncoding >>".to_vec(),
    );

    for (i, page) in pages.iter().enumerate() {
        let content_id = first_page + 2 * i + 1;
        objects.push(
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
                num(layout.width),
                num(layout.height),
                content_id
            )
            .into_bytes(),
        );

        let mut stream = Vec::new();
        write!(
            stream,
            "BT\n/F1 {} Tf\n{} TL\n{} {} Td\n",
            num(layout.font_size),
            num(layout.line_height),
            num(layout.margin),
            num(layout.height - layout.margin - layout.font_size)
        )?;
        for line in page.iter() {
            stream.push(b'(');
            replaced += encode_winansi(line, &mut stream);
            stream.extend_from_slice(b") Tj T*\n");
        }
        stream.extend_from_slice(b"ET");

        let mut object = format!("<< /Length {} >>\nstream\n", stream.len()).into_bytes();
        object.extend(stream);
        object.extend_from_slice(b"\nendstream");
        objects.push(object);
    }

    let mut info_dict = b"<< /Title (".to_vec();
    encode_winansi(title, &mut info_dict);
    info_dict.extend_from_slice(
        format!(
            ") /Producer (folio) /CreationDate (D:{}Z) >>",
            created_at.format("%Y%m%d%H%M%S")
        )
        .as_bytes(),
    );
    objects.push(info_dict);

    let mut out = b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        write!(out, "{} 0 obj\n", i + 1)?;
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref = out.len();
    write!(out, "xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1)?;
    for offset in offsets {
        write!(out, "{offset:010} 00000 n \n")?;
    }
    write!(
        out,
        "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        info,
        xref
    )?;

    Ok((out, replaced))
}

/// Append text as the body of a PDF literal string in WinAnsi
///
/// Characters without a WinAnsi code become `?`; returns how many.
fn encode_winansi(text: &str, out: &mut Vec<u8>) -> usize {
    let mut replaced = 0;
    for c in text.chars() {
        let byte = match c {
            '(' | ')' | '\\' => {
                out.push(b'\\');
                c as u8
            }
            c if (' '..='~').contains(&c) => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '\u{20ac}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2122}' => 0x99,
            '\t' => b' ',
            _ => {
                replaced += 1;
                b'?'
            }
        };
        out.push(byte);
    }
    replaced
}

fn num(value: f32) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}
