//! Rich-text (RTF) output
//!
//! Styled runs map to RTF character groups. PNG and JPEG images are spliced
//! in as native `\pict` objects at the position the image tag had in the
//! text; other image types are dropped.

use super::rich::{list_marker, Inline, Style};
use super::{DocumentWriter, RenderContext, RenderedDocument, RichDocument};
use crate::domain::note::Attachment;
use crate::domain::result::Result;
use std::fmt::Write as _;

/// Twips per pixel at 96 dpi
const TWIPS_PER_PIXEL: u32 = 15;

/// Hex digits per line of picture data
const HEX_LINE_WIDTH: usize = 128;

#[derive(Debug, Clone, Copy, Default)]
pub struct RtfWriter;

impl DocumentWriter for RtfWriter {
    fn write(&self, document: &RichDocument, ctx: &RenderContext<'_>) -> Result<RenderedDocument> {
        let mut out = String::new();
        out.push_str("{\\rtf1\\ansi\\ansicpg1252\\deff0\n");
        out.push_str("{\\fonttbl{\\f0\\fswiss Helvetica;}{\\f1\\fmodern Courier;}}\n");
        let _ = writeln!(out, "{{\\info{{\\title {}}}}}", escape(&ctx.note.title));
        out.push_str("\\viewkind4\\uc1\\pard\\f0\\fs24\n");

        for inline in document.inlines() {
            match inline {
                Inline::Text { text, style, link } => {
                    let run = styled_run(text, style);
                    match link {
                        Some(href) => {
                            let _ = write!(
                                out,
                                "{{\\field{{\\*\\fldinst{{HYPERLINK \"{}\"}}}}{{\\fldrslt{}}}}}",
                                escape(href),
                                run
                            );
                        }
                        None => out.push_str(&run),
                    }
                }
                Inline::LineBreak => out.push_str("\\par\n"),
                Inline::ListMarker { ordinal, depth } => {
                    out.push_str(&escape(&list_marker(*ordinal, *depth)));
                }
                Inline::Image { attachment, .. } => match picture(attachment) {
                    Some(pict) => out.push_str(&pict),
                    None => tracing::debug!(
                        note_id = %ctx.note.id,
                        mime_type = %attachment.mime_type,
                        "Skipping image type RTF cannot embed"
                    ),
                },
            }
        }

        out.push_str("\n}\n");
        Ok(RenderedDocument::new(out.into_bytes()))
    }
}

fn styled_run(text: &str, style: &Style) -> String {
    let mut run = String::from("{");
    if style.bold || style.heading.is_some() {
        run.push_str("\\b");
    }
    if style.italic {
        run.push_str("\\i");
    }
    if style.underline {
        run.push_str("\\ul");
    }
    if style.strikethrough {
        run.push_str("\\strike");
    }
    if style.monospace {
        run.push_str("\\f1");
    }
    if let Some(level) = style.heading {
        let size = match level {
            1 => 40,
            2 => 32,
            3 => 28,
            _ => 24,
        };
        let _ = write!(run, "\\fs{size}");
    }
    run.push(' ');
    run.push_str(&escape(text));
    run.push('}');
    run
}

/// Escape text for an RTF body, using `\uN?` for anything beyond ASCII
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '\t' => out.push_str("\\tab "),
            '\n' => out.push_str("\\line "),
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            c if c.is_ascii() => {}
            c => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    let _ = write!(out, "\\u{}?", *unit as i16);
                }
            }
        }
    }
    out
}

fn picture(attachment: &Attachment) -> Option<String> {
    let (blip, size) = match attachment.mime_type.as_str() {
        "image/png" => ("\\pngblip", png_dimensions(&attachment.data)),
        "image/jpeg" | "image/jpg" | "image/pjpeg" => ("\\jpegblip", jpeg_dimensions(&attachment.data)),
        _ => return None,
    };

    let mut pict = String::with_capacity(attachment.data.len() * 2 + 96);
    pict.push_str("{\\pict");
    pict.push_str(blip);
    if let Some((width, height)) = size {
        let _ = write!(
            pict,
            "\\picw{width}\\pich{height}\\picwgoal{}\\pichgoal{}",
            width * TWIPS_PER_PIXEL,
            height * TWIPS_PER_PIXEL
        );
    }
    pict.push('\n');

    let hex: String = attachment.data.iter().map(|b| format!("{b:02x}")).collect();
    for chunk in hex.as_bytes().chunks(HEX_LINE_WIDTH) {
        pict.push_str(&String::from_utf8_lossy(chunk));
        pict.push('\n');
    }
    pict.push('}');
    Some(pict)
}

/// Width and height from a PNG IHDR chunk
pub fn png_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    const SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
    if data.len() < 24 || !data.starts_with(SIGNATURE) || &data[12..16] != b"IHDR" {
        return None;
    }
    let width = u32::from_be_bytes(data[16..20].try_into().ok()?);
    let height = u32::from_be_bytes(data[20..24].try_into().ok()?);
    Some((width, height))
}

/// Width and height from the first JPEG start-of-frame segment
pub fn jpeg_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    if !data.starts_with(&[0xff, 0xd8]) {
        return None;
    }

    let mut pos = 2;
    while pos + 4 <= data.len() {
        if data[pos] != 0xff {
            return None;
        }
        let marker = data[pos + 1];
        if marker == 0xff {
            pos += 1;
            continue;
        }
        let length = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
        let is_frame = (0xc0..=0xcf).contains(&marker) && !matches!(marker, 0xc4 | 0xc8 | 0xcc);
        if is_frame {
            let segment = data.get(pos + 5..pos + 9)?;
            let height = u16::from_be_bytes([segment[0], segment[1]]) as u32;
            let width = u16::from_be_bytes([segment[2], segment[3]]) as u32;
            return Some((width, height));
        }
        pos += 2 + length;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::NoteId;
    use crate::domain::note::Note;
    use chrono::Utc;

    const PNG_1X1: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8BQDwAEhQGAhKmMIQAAAABJRU5ErkJggg==";

    fn note(content: &str) -> Note {
        Note {
            id: NoteId::new("n1").unwrap(),
            title: "Résumé".to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
            modified_at: Utc::now(),
            path: vec![],
        }
    }

    fn write(content: &str) -> String {
        let note = note(content);
        let doc = RichDocument::parse(content);
        let out = RtfWriter.write(&doc, &RenderContext::new(&note, "n")).unwrap();
        String::from_utf8(out.bytes).unwrap()
    }

    #[test]
    fn test_document_structure() {
        let rtf = write("<div>Hello</div><div><b>World</b></div>");
        assert!(rtf.starts_with("{\\rtf1"));
        assert!(rtf.trim_end().ends_with('}'));
        assert!(rtf.contains("{ Hello}\\par\n{\\b World}"));
        assert!(rtf.contains("{\\title R\\u233?sum\\u233?}"));
    }

    #[test]
    fn test_escaping() {
        assert_eq!(escape("a{b}\\c"), "a\\{b\\}\\\\c");
        assert_eq!(escape("\u{1F600}"), "\\u-10179?\\u-8704?");
    }

    #[test]
    fn test_inline_image_embedded_once() {
        let content = format!(r#"<div>Before<img src="data:image/png;base64,{PNG_1X1}">After</div>"#);
        let doc = RichDocument::parse(&content);
        assert_eq!(doc.embedded_count(), 1);
        assert_eq!(doc.text(), "BeforeAfter");

        let rtf = write(&content);
        assert_eq!(rtf.matches("\\pict").count(), 1);
        assert!(rtf.contains("\\pngblip\\picw1\\pich1"));
        assert!(rtf.contains("89504e47"));
        assert!(!rtf.contains(PNG_1X1));
        let before = rtf.find("Before").unwrap();
        let pict = rtf.find("\\pict").unwrap();
        let after = rtf.find("After").unwrap();
        assert!(before < pict && pict < after);
    }

    #[test]
    fn test_unsupported_image_type_skipped() {
        let rtf = write(r#"<div>x<img src="data:image/gif;base64,R0lGODlh"></div>"#);
        assert!(!rtf.contains("\\pict"));
    }

    #[test]
    fn test_links() {
        let rtf = write(r#"<a href="https://example.com">site</a>"#);
        assert!(rtf.contains("HYPERLINK \"https://example.com\""));
        assert!(rtf.contains("{\\fldrslt{ site}}"));
    }

    #[test]
    fn test_jpeg_dimensions() {
        let jpeg = [
            0xff, 0xd8, // SOI
            0xff, 0xe0, 0x00, 0x04, 0x00, 0x00, // APP0, empty payload
            0xff, 0xc0, 0x00, 0x0b, 0x08, 0x00, 0x20, 0x00, 0x40, 0x01, 0x01, 0x11, 0x00,
        ];
        assert_eq!(jpeg_dimensions(&jpeg), Some((64, 32)));
        assert_eq!(jpeg_dimensions(b"not a jpeg"), None);
    }
}
