//! Plain-text output. Only the text survives; embedded objects are dropped.

use super::{DocumentWriter, RenderContext, RenderedDocument, RichDocument};
use crate::domain::result::Result;

#[derive(Debug, Clone, Copy, Default)]
pub struct TextWriter;

impl DocumentWriter for TextWriter {
    fn write(&self, document: &RichDocument, _ctx: &RenderContext<'_>) -> Result<RenderedDocument> {
        let mut text = document.text();
        if !text.is_empty() {
            text.push('\n');
        }
        Ok(RenderedDocument::new(text.into_bytes()))
    }
}
