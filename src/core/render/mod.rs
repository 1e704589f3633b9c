//! Content rendering
//!
//! Converts a note's canonical HTML content into the bytes of one output
//! document. HTML is passed through inside a document shell; every other
//! format is produced from the flattened [`RichDocument`].
//!
//! - [`markup`] - HTML tokenizer and inline image decoding
//! - [`rich`] - styled inline model shared by the non-HTML writers
//! - [`html`], [`text`], [`rtf`], [`pdf`], [`markdown`] - one writer each

pub mod html;
pub mod markdown;
pub mod markup;
pub mod pdf;
pub mod rich;
pub mod rtf;
pub mod text;

pub use pdf::PageLayout;
pub use rich::RichDocument;

use crate::core::sanitize::{SanitizeRules, MARKUP_SYNTAX};
use crate::domain::errors::FolioError;
use crate::domain::note::{Attachment, Note};
use crate::domain::result::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tokio::sync::watch;

/// Target document format
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OutputFormat {
    /// Standalone HTML document
    Html,
    /// CommonMark with extracted attachments
    Markdown,
    /// RTF with embedded pictures
    RichText,
    /// Plain UTF-8 text
    PlainText,
    /// Paginated PDF
    Pdf,
    /// Anything else; rendering reports it as unsupported
    Other(String),
}

impl OutputFormat {
    /// File extension for documents in this format
    pub fn extension(&self) -> &str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Markdown => "md",
            OutputFormat::RichText => "rtf",
            OutputFormat::PlainText => "txt",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Other(name) => name,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, OutputFormat::Other(_))
    }

    /// Sanitizer rules for names written in this format
    ///
    /// Markup formats that treat `[ ] # ^` as syntax strip them as well.
    pub fn sanitize_rules(&self, base: &SanitizeRules) -> SanitizeRules {
        match self {
            OutputFormat::Markdown => base.clone().with_extra_illegal(MARKUP_SYNTAX),
            _ => base.clone(),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().trim_start_matches('.').to_ascii_lowercase();
        Ok(match name.as_str() {
            "" => {
                return Err(FolioError::Validation(
                    "Output format cannot be empty".to_string(),
                ))
            }
            "html" | "htm" => OutputFormat::Html,
            "md" | "markdown" => OutputFormat::Markdown,
            "rtf" => OutputFormat::RichText,
            "txt" | "text" => OutputFormat::PlainText,
            "pdf" => OutputFormat::Pdf,
            _ => OutputFormat::Other(name),
        })
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = FolioError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<OutputFormat> for String {
    fn from(format: OutputFormat) -> Self {
        format.to_string()
    }
}

/// Attachment written beside a rendered document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedAttachment {
    /// Path relative to the folder holding the document
    pub relative_path: PathBuf,
    pub attachment: Attachment,
}

/// Bytes of one rendered document plus any side files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub attachments: Vec<RenderedAttachment>,
    /// Content the format could not represent faithfully
    pub warnings: Vec<String>,
}

impl RenderedDocument {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            attachments: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// Outcome of rendering a note
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Document(RenderedDocument),
    /// The format has no writer; nothing was produced
    Unsupported,
}

/// Per-note inputs shared by all writers
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub note: &'a Note,

    /// File stem of the document being written, used to name attachments
    pub attachment_stem: &'a str,

    cancel: Option<&'a watch::Receiver<bool>>,
}

impl<'a> RenderContext<'a> {
    pub fn new(note: &'a Note, attachment_stem: &'a str) -> Self {
        Self {
            note,
            attachment_stem,
            cancel: None,
        }
    }

    /// Let long-running writers observe a shutdown signal
    pub fn with_cancellation(mut self, cancel: &'a watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.map(|rx| *rx.borrow()).unwrap_or(false)
    }

    /// Fail with [`FolioError::Cancelled`] once shutdown was requested
    pub fn check_cancelled(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(FolioError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Writer producing one format from a rich document
pub trait DocumentWriter: Send + Sync {
    fn write(&self, document: &RichDocument, ctx: &RenderContext<'_>) -> Result<RenderedDocument>;
}

/// Dispatches a note to the writer for the requested format
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    page: PageLayout,
}

impl Renderer {
    pub fn new(page: PageLayout) -> Self {
        Self { page }
    }

    /// Render the note in `ctx` as `format`
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::Render`] when a writer fails and
    /// [`FolioError::Cancelled`] when a writer observed shutdown part way.
    pub fn render(&self, format: &OutputFormat, ctx: &RenderContext<'_>) -> Result<Rendered> {
        let document = match format {
            OutputFormat::Html => RenderedDocument::new(html::render(ctx.note)),
            OutputFormat::Other(name) => {
                tracing::debug!(format = %name, note_id = %ctx.note.id, "No writer for format");
                return Ok(Rendered::Unsupported);
            }
            _ => {
                let rich = RichDocument::parse(&ctx.note.content);
                self.writer(format).write(&rich, ctx)?
            }
        };
        Ok(Rendered::Document(document))
    }

    fn writer(&self, format: &OutputFormat) -> Box<dyn DocumentWriter> {
        match format {
            OutputFormat::Markdown => Box::new(markdown::MarkdownWriter),
            OutputFormat::RichText => Box::new(rtf::RtfWriter),
            OutputFormat::Pdf => Box::new(pdf::PdfWriter::new(self.page.clone())),
            _ => Box::new(text::TextWriter),
        }
    }
}

/// Render `note` as `format` with default page settings
pub fn render(note: &Note, format: &OutputFormat) -> Result<Rendered> {
    let stem = note.title.clone();
    Renderer::default().render(format, &RenderContext::new(note, &stem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::NoteId;
    use chrono::Utc;

    fn note(content: &str) -> Note {
        Note {
            id: NoteId::new("n1").unwrap(),
            title: "Sample".to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
            modified_at: Utc::now(),
            path: vec![],
        }
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("HTML".parse::<OutputFormat>().unwrap(), OutputFormat::Html);
        assert_eq!("htm".parse::<OutputFormat>().unwrap(), OutputFormat::Html);
        assert_eq!(".md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("rtf".parse::<OutputFormat>().unwrap(), OutputFormat::RichText);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::PlainText);
        assert_eq!("pdf".parse::<OutputFormat>().unwrap(), OutputFormat::Pdf);
        assert_eq!(
            "docx".parse::<OutputFormat>().unwrap(),
            OutputFormat::Other("docx".to_string())
        );
        assert!(" ".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_format_extension_and_rules() {
        let base = SanitizeRules::default();
        assert_eq!(OutputFormat::PlainText.extension(), "txt");
        assert!(OutputFormat::Markdown
            .sanitize_rules(&base)
            .extra_illegal
            .contains(&'#'));
        assert!(OutputFormat::Html.sanitize_rules(&base).extra_illegal.is_empty());
    }

    #[test]
    fn test_format_serde() {
        let format: OutputFormat = serde_json::from_str("\"rtf\"").unwrap();
        assert_eq!(format, OutputFormat::RichText);
        assert_eq!(serde_json::to_string(&OutputFormat::Pdf).unwrap(), "\"pdf\"");
    }

    #[test]
    fn test_unsupported_format() {
        let rendered = render(&note("<div>x</div>"), &OutputFormat::Other("docx".into())).unwrap();
        assert_eq!(rendered, Rendered::Unsupported);
    }

    #[test]
    fn test_dispatch_plain_text() {
        match render(&note("<div>Milk</div><div>Eggs</div>"), &OutputFormat::PlainText).unwrap() {
            Rendered::Document(doc) => assert_eq!(doc.bytes, b"Milk\nEggs\n"),
            Rendered::Unsupported => panic!("plain text is supported"),
        }
    }

    #[test]
    fn test_cancelled_context() {
        let (tx, rx) = watch::channel(false);
        let n = note("");
        let ctx = RenderContext::new(&n, "x").with_cancellation(&rx);
        assert!(ctx.check_cancelled().is_ok());
        tx.send(true).unwrap();
        assert!(matches!(ctx.check_cancelled(), Err(FolioError::Cancelled)));
    }
}
