//! HTML output
//!
//! Note content is already HTML, so this writer only wraps it in a
//! standalone document shell. The content is passed through untouched.

use super::markup::{self, escape_text};
use crate::domain::note::Note;

/// Wrap a note's content in a complete HTML document
pub fn render(note: &Note) -> Vec<u8> {
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{}</title>\n\
         </head>\n\
         <body>\n\
         {}\n\
         </body>\n\
         </html>\n",
        escape_text(&note.title),
        note.content
    )
    .into_bytes()
}

/// Title of an HTML document, if it has a `<title>` element
pub fn extract_title(html: &str) -> Option<String> {
    markup::find_element(&markup::parse(html), "title").map(|title| markup::text_content(&title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::rich::RichDocument;
    use crate::domain::ids::NoteId;
    use chrono::Utc;

    fn note(title: &str, content: &str) -> Note {
        Note {
            id: NoteId::new("n1").unwrap(),
            title: title.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
            modified_at: Utc::now(),
            path: vec![],
        }
    }

    #[test]
    fn test_document_shell() {
        let html = String::from_utf8(render(&note("Groceries", "<div>Milk</div>"))).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<meta charset=\"utf-8\">"));
        assert!(html.contains("<body>\n<div>Milk</div>\n</body>"));
    }

    #[test]
    fn test_title_round_trip() {
        let title = "Fish & <chips> \"deluxe\"";
        let html = String::from_utf8(render(&note(title, ""))).unwrap();
        assert!(html.contains("<title>Fish &amp; &lt;chips&gt; &quot;deluxe&quot;</title>"));
        assert_eq!(extract_title(&html).as_deref(), Some(title));
    }

    #[test]
    fn test_text_round_trip() {
        let content = "<div><b>Milk</b></div><div>Eggs &amp; ham</div><ul><li>one</li></ul>";
        let html = String::from_utf8(render(&note("List", content))).unwrap();
        assert_eq!(
            RichDocument::parse(&html).text(),
            RichDocument::parse(content).text()
        );
    }

    #[test]
    fn test_extract_title_missing() {
        assert_eq!(extract_title("<div>no title</div>"), None);
    }
}
