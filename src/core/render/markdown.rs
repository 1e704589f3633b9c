//! Markdown (CommonMark) output
//!
//! Inline images are extracted into an `attachments/` folder next to the
//! note and linked relatively. Attachment names derive from the note's
//! final file stem, so they inherit its collision suffix and stay unique.

use super::rich::{Inline, Style};
use super::{DocumentWriter, RenderContext, RenderedAttachment, RenderedDocument, RichDocument};
use crate::domain::result::Result;
use std::path::PathBuf;

/// Folder beside the note that receives extracted images
pub const ATTACHMENTS_DIR: &str = "attachments";

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownWriter;

impl DocumentWriter for MarkdownWriter {
    fn write(&self, document: &RichDocument, ctx: &RenderContext<'_>) -> Result<RenderedDocument> {
        let mut lines: Vec<Line> = vec![Line::default()];
        let mut attachments = Vec::new();

        for inline in document.inlines() {
            let line = match lines.last_mut() {
                Some(line) => line,
                None => continue,
            };
            match inline {
                Inline::Text { text, style, link } => {
                    if line.body.is_empty() && line.prefix.is_empty() {
                        if let Some(level) = style.heading {
                            line.prefix = format!("{} ", "#".repeat(level as usize));
                        }
                    }
                    line.body.push_str(&format_run(text, style, link.as_deref()));
                }
                Inline::LineBreak => lines.push(Line::default()),
                Inline::ListMarker { ordinal, depth } => {
                    let indent = "    ".repeat(*depth);
                    line.prefix = match ordinal {
                        Some(n) => format!("{indent}{n}. "),
                        None => format!("{indent}- "),
                    };
                    line.list_item = true;
                }
                Inline::Image { attachment, alt } => {
                    let file_name = format!(
                        "{}-{}.{}",
                        ctx.attachment_stem,
                        attachments.len() + 1,
                        attachment.extension()
                    );
                    let relative_path = PathBuf::from(ATTACHMENTS_DIR).join(&file_name);
                    line.body.push_str(&format!(
                        "![{}](<{}/{}>)",
                        escape(alt.as_deref().unwrap_or_default()),
                        ATTACHMENTS_DIR,
                        file_name
                    ));
                    attachments.push(RenderedAttachment {
                        relative_path,
                        attachment: attachment.clone(),
                    });
                }
            }
        }

        let mut out = String::new();
        let mut previous: Option<&Line> = None;
        for line in lines.iter().filter(|line| !line.is_blank()) {
            if let Some(prev) = previous {
                out.push_str(if prev.list_item && line.list_item {
                    "\n"
                } else {
                    "\n\n"
                });
            }
            out.push_str(&line.prefix);
            out.push_str(&line.body);
            previous = Some(line);
        }
        if !out.is_empty() {
            out.push('\n');
        }

        Ok(RenderedDocument {
            bytes: out.into_bytes(),
            attachments,
            warnings: Vec::new(),
        })
    }
}

#[derive(Debug, Default)]
struct Line {
    prefix: String,
    body: String,
    list_item: bool,
}

impl Line {
    fn is_blank(&self) -> bool {
        self.body.trim().is_empty() && !self.list_item
    }
}

fn format_run(text: &str, style: &Style, link: Option<&str>) -> String {
    let mut run = if style.monospace {
        code_span(text)
    } else {
        escape(text)
    };

    if !style.monospace {
        if style.strikethrough {
            run = wrap(&run, "~~");
        }
        if style.italic {
            run = wrap(&run, "*");
        }
        if style.bold && style.heading.is_none() {
            run = wrap(&run, "**");
        }
    }

    match link {
        Some(href) if !run.trim().is_empty() => format!("[{run}](<{}>)", href.replace('>', "%3E")),
        _ => run,
    }
}

/// Surround the non-whitespace core of `text` with `marker`
fn wrap(text: &str, marker: &str) -> String {
    let core = text.trim();
    if core.is_empty() {
        return text.to_string();
    }
    let lead = &text[..text.len() - text.trim_start().len()];
    let trail = &text[text.trim_end().len()..];
    format!("{lead}{marker}{core}{marker}{trail}")
}

fn code_span(text: &str) -> String {
    let longest_run = text
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest_run + 1);
    if text.starts_with('`') || text.ends_with('`') {
        format!("{fence} {text} {fence}")
    } else {
        format!("{fence}{text}{fence}")
    }
}

/// Backslash-escape characters CommonMark would read as markup
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, c) in text.char_indices() {
        let at_start = i == 0;
        let needs_escape = matches!(c, '\\' | '*' | '_' | '`' | '[' | ']' | '<' | '>')
            || (at_start && matches!(c, '#' | '-' | '+'));
        if needs_escape {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
