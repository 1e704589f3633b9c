//! Rich document model
//!
//! Flattens the parsed DOM into a sequence of styled inline runs
//! separated by explicit line breaks. Every non-HTML writer renders from
//! this model, so all of them agree on what the text of a note is.

use super::markup;
use crate::domain::note::Attachment;
use markup5ever_rcdom::{Handle, NodeData};

/// Character-level styling of a text run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub monospace: bool,
    /// Heading level 1-6
    pub heading: Option<u8>,
}

/// One element of a flattened document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text {
        text: String,
        style: Style,
        link: Option<String>,
    },
    LineBreak,
    /// Start of a list item; `ordinal` is set for ordered lists
    ListMarker { ordinal: Option<usize>, depth: usize },
    Image {
        attachment: Attachment,
        alt: Option<String>,
    },
}

/// Flattened rich text of one note
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichDocument {
    inlines: Vec<Inline>,
}

impl RichDocument {
    /// Parse an HTML fragment or document
    pub fn parse(html: &str) -> Self {
        Self::from_dom(&markup::parse(html))
    }

    /// Build from an already parsed DOM node
    pub fn from_dom(root: &Handle) -> Self {
        let mut builder = Builder::default();
        builder.walk(root);
        builder.finish()
    }

    pub fn inlines(&self) -> &[Inline] {
        &self.inlines
    }

    pub fn is_empty(&self) -> bool {
        self.inlines.is_empty()
    }

    /// Plain text content; embedded objects contribute nothing
    pub fn text(&self) -> String {
        self.flatten(false)
    }

    /// Plain text with a bracketed placeholder for each embedded object
    pub fn text_with_placeholders(&self) -> String {
        self.flatten(true)
    }

    /// Embedded objects in document order
    pub fn embedded_objects(&self) -> impl Iterator<Item = &Attachment> {
        self.inlines.iter().filter_map(|inline| match inline {
            Inline::Image { attachment, .. } => Some(attachment),
            _ => None,
        })
    }

    pub fn embedded_count(&self) -> usize {
        self.embedded_objects().count()
    }

    fn flatten(&self, placeholders: bool) -> String {
        let mut out = String::new();
        for inline in &self.inlines {
            match inline {
                Inline::Text { text, .. } => out.push_str(text),
                Inline::LineBreak => out.push('\n'),
                Inline::ListMarker { ordinal, depth } => {
                    out.push_str(&list_marker(*ordinal, *depth));
                }
                Inline::Image { attachment, alt } if placeholders => {
                    let label = alt.as_deref().unwrap_or(&attachment.mime_type);
                    out.push_str(&format!("[image: {label}]"));
                }
                Inline::Image { .. } => {}
            }
        }
        out
    }
}

/// Plain-text bullet or number for a list item
pub fn list_marker(ordinal: Option<usize>, depth: usize) -> String {
    let indent = "  ".repeat(depth);
    match ordinal {
        Some(n) => format!("{indent}{n}. "),
        None => format!("{indent}\u{2022} "),
    }
}

#[derive(Debug)]
struct ListState {
    ordered: bool,
    next: usize,
}

#[derive(Debug, Default)]
struct Builder {
    inlines: Vec<Inline>,
    bold: u32,
    italic: u32,
    underline: u32,
    strikethrough: u32,
    monospace: u32,
    preformatted: u32,
    headings: Vec<u8>,
    links: Vec<Option<String>>,
    lists: Vec<ListState>,
}

impl Builder {
    fn walk(&mut self, handle: &Handle) {
        match &handle.data {
            NodeData::Text { contents } => self.text(&contents.borrow()),
            NodeData::Element { name, attrs, .. } => {
                let tag: &str = &name.local;
                if is_hidden(tag) {
                    return;
                }
                if tag == "img" {
                    if let Some((attachment, alt)) = markup::inline_image(&attrs.borrow()) {
                        self.inlines.push(Inline::Image { attachment, alt });
                    }
                    return;
                }
                let href = markup::attribute(&attrs.borrow(), "href");
                self.open(tag, href);
                self.children(handle);
                self.close(tag);
            }
            NodeData::Document => self.children(handle),
            _ => {}
        }
    }

    fn children(&mut self, handle: &Handle) {
        for child in handle.children.borrow().iter() {
            self.walk(child);
        }
    }

    fn open(&mut self, name: &str, href: Option<String>) {
        match name {
            "br" => self.line_break(),
            "hr" => {
                self.ensure_line_break();
                self.push_text("\u{2014}\u{2014}\u{2014}".to_string());
                self.line_break();
            }
            "li" => {
                self.ensure_line_break();
                let depth = self.lists.len().saturating_sub(1);
                let ordinal = self.lists.last_mut().and_then(|list| {
                    list.ordered.then(|| {
                        list.next += 1;
                        list.next
                    })
                });
                self.inlines.push(Inline::ListMarker { ordinal, depth });
            }
            "ul" | "ol" => {
                self.ensure_line_break();
                self.lists.push(ListState {
                    ordered: name == "ol",
                    next: 0,
                });
            }
            "b" | "strong" => self.bold += 1,
            "i" | "em" | "cite" => self.italic += 1,
            "u" | "ins" => self.underline += 1,
            "s" | "strike" | "del" => self.strikethrough += 1,
            "code" | "tt" | "kbd" | "samp" => self.monospace += 1,
            "pre" => {
                self.ensure_line_break();
                self.monospace += 1;
                self.preformatted += 1;
            }
            "a" => self.links.push(href),
            _ => {
                if let Some(level) = heading_level(name) {
                    self.ensure_line_break();
                    self.headings.push(level);
                } else if is_block(name) {
                    self.ensure_line_break();
                }
            }
        }
    }

    fn close(&mut self, name: &str) {
        match name {
            "ul" | "ol" => {
                self.lists.pop();
                self.ensure_line_break();
            }
            "b" | "strong" => self.bold = self.bold.saturating_sub(1),
            "i" | "em" | "cite" => self.italic = self.italic.saturating_sub(1),
            "u" | "ins" => self.underline = self.underline.saturating_sub(1),
            "s" | "strike" | "del" => self.strikethrough = self.strikethrough.saturating_sub(1),
            "code" | "tt" | "kbd" | "samp" => self.monospace = self.monospace.saturating_sub(1),
            "pre" => {
                self.monospace = self.monospace.saturating_sub(1);
                self.preformatted = self.preformatted.saturating_sub(1);
                self.ensure_line_break();
            }
            "a" => {
                self.links.pop();
            }
            _ => {
                if heading_level(name).is_some() {
                    self.headings.pop();
                    self.ensure_line_break();
                } else if name == "li" || is_block(name) {
                    self.ensure_line_break();
                }
            }
        }
    }

    fn text(&mut self, raw: &str) {
        if self.preformatted > 0 {
            let mut lines = raw.split('\n').peekable();
            while let Some(line) = lines.next() {
                if !line.is_empty() {
                    self.push_text(line.replace('\r', ""));
                }
                if lines.peek().is_some() {
                    self.line_break();
                }
            }
            return;
        }

        let mut collapsed = collapse_whitespace(raw);
        if self.at_line_start() || self.ends_with_space() {
            collapsed = collapsed.trim_start().to_string();
        }
        if collapsed.is_empty() {
            return;
        }
        self.push_text(collapsed.replace('\u{a0}', " "));
    }

    fn style(&self) -> Style {
        Style {
            bold: self.bold > 0,
            italic: self.italic > 0,
            underline: self.underline > 0,
            strikethrough: self.strikethrough > 0,
            monospace: self.monospace > 0,
            heading: self.headings.last().copied(),
        }
    }

    fn push_text(&mut self, text: String) {
        let style = self.style();
        let link = self.links.iter().rev().find_map(Clone::clone);

        if let Some(Inline::Text {
            text: previous,
            style: previous_style,
            link: previous_link,
        }) = self.inlines.last_mut()
        {
            if *previous_style == style && *previous_link == link {
                previous.push_str(&text);
                return;
            }
        }

        self.inlines.push(Inline::Text { text, style, link });
    }

    fn line_break(&mut self) {
        self.trim_trailing_space();
        self.inlines.push(Inline::LineBreak);
    }

    fn ensure_line_break(&mut self) {
        if !matches!(self.inlines.last(), None | Some(Inline::LineBreak)) {
            self.line_break();
        }
    }

    fn at_line_start(&self) -> bool {
        matches!(
            self.inlines.last(),
            None | Some(Inline::LineBreak) | Some(Inline::ListMarker { .. })
        )
    }

    fn ends_with_space(&self) -> bool {
        matches!(self.inlines.last(), Some(Inline::Text { text, .. }) if text.ends_with(' '))
    }

    fn trim_trailing_space(&mut self) {
        if let Some(Inline::Text { text, .. }) = self.inlines.last_mut() {
            let trimmed = text.trim_end_matches(' ').len();
            text.truncate(trimmed);
            if text.is_empty() {
                self.inlines.pop();
            }
        }
    }

    fn finish(mut self) -> RichDocument {
        self.trim_trailing_space();
        while matches!(self.inlines.last(), Some(Inline::LineBreak)) {
            self.inlines.pop();
            self.trim_trailing_space();
        }
        RichDocument {
            inlines: self.inlines,
        }
    }
}

fn collapse_whitespace(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_space = false;
    for c in raw.chars() {
        if c.is_ascii_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

fn heading_level(name: &str) -> Option<u8> {
    match name {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

fn is_hidden(name: &str) -> bool {
    matches!(name, "head" | "title" | "script" | "style" | "template")
}

fn is_block(name: &str) -> bool {
    matches!(
        name,
        "p" | "div"
            | "blockquote"
            | "table"
            | "tr"
            | "section"
            | "article"
            | "header"
            | "footer"
            | "figure"
            | "dl"
            | "dt"
            | "dd"
    )
}
