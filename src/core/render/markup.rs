//! Markup parsing
//!
//! Note content is parsed once with html5ever into a DOM. Writers walk that
//! tree; inline images carried as `data:` URIs are decoded straight from
//! the `<img>` element, so no later stage ever sees the encoded text.

use crate::domain::note::Attachment;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, Attribute, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Accepts payloads with or without trailing padding
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Parse an HTML fragment or document, returning the document node
///
/// Fragments are placed in `<body>` the way a browser would; the parser
/// never fails, malformed input is repaired.
pub fn parse(html: &str) -> Handle {
    parse_document(RcDom::default(), ParseOpts::default())
        .one(html)
        .document
}

/// Lowercase local name of an element node
pub fn element_name(handle: &Handle) -> Option<String> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}

/// Attribute value by local name
pub fn attribute(attrs: &[Attribute], key: &str) -> Option<String> {
    attrs
        .iter()
        .find(|attr| &*attr.name.local == key)
        .map(|attr| attr.value.to_string())
}

/// Decoded payload and alt text of an `<img>` carrying a `data:` URI
pub fn inline_image(attrs: &[Attribute]) -> Option<(Attachment, Option<String>)> {
    let src = attribute(attrs, "src")?;
    match decode_data_uri(&src) {
        Some(attachment) => {
            let alt = attribute(attrs, "alt").filter(|alt| !alt.is_empty());
            Some((attachment, alt))
        }
        None => {
            if src.trim_start().to_ascii_lowercase().starts_with("data:") {
                tracing::debug!("Dropping inline image with undecodable data URI");
            }
            None
        }
    }
}

/// First element named `name` in document order
pub fn find_element(handle: &Handle, name: &str) -> Option<Handle> {
    if element_name(handle).as_deref() == Some(name) {
        return Some(handle.clone());
    }
    handle
        .children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, name))
}

/// Concatenated text of every descendant text node
pub fn text_content(handle: &Handle) -> String {
    let mut out = String::new();
    collect_text(handle, &mut out);
    out
}

fn collect_text(handle: &Handle, out: &mut String) {
    if let NodeData::Text { contents } = &handle.data {
        out.push_str(&contents.borrow());
    }
    for child in handle.children.borrow().iter() {
        collect_text(child, out);
    }
}

/// Decode a `data:<mime>;base64,<payload>` URI
///
/// Returns `None` for anything that is not a base64 data URI or whose
/// payload does not decode.
pub fn decode_data_uri(uri: &str) -> Option<Attachment> {
    let trimmed = uri.trim();
    let rest = trimmed
        .get(..5)
        .filter(|scheme| scheme.eq_ignore_ascii_case("data:"))
        .map(|_| &trimmed[5..])?;

    let (meta, payload) = rest.split_once(',')?;
    let mut params = meta.split(';');
    let mime = params.next().map(str::trim).filter(|m| !m.is_empty());
    if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        return None;
    }

    let payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let data = LENIENT_BASE64.decode(payload.as_bytes()).ok()?;

    Some(Attachment::new(
        mime.unwrap_or("application/octet-stream").to_ascii_lowercase(),
        data,
    ))
}

/// Escape text for use in element content or a quoted attribute
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_1X1: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8BQDwAEhQGAhKmMIQAAAABJRU5ErkJggg==";

    fn attrs_of(handle: &Handle) -> Vec<Attribute> {
        match &handle.data {
            NodeData::Element { attrs, .. } => attrs.borrow().clone(),
            _ => Vec::new(),
        }
    }

    #[test]
    fn test_fragment_lands_in_body() {
        let doc = parse("<div>Hello <b>world</b></div>");
        let body = find_element(&doc, "body").unwrap();
        let div = find_element(&body, "div").unwrap();
        assert_eq!(text_content(&div), "Hello world");
        assert!(find_element(&div, "b").is_some());
    }

    #[test]
    fn test_attributes_and_case() {
        let doc = parse(r#"<A HREF="https://example.com/?a=1&amp;b=2" target=_blank data-x='y'>x</a>"#);
        let link = find_element(&doc, "a").unwrap();
        let attrs = attrs_of(&link);
        assert_eq!(attribute(&attrs, "href").as_deref(), Some("https://example.com/?a=1&b=2"));
        assert_eq!(attribute(&attrs, "target").as_deref(), Some("_blank"));
        assert_eq!(attribute(&attrs, "data-x").as_deref(), Some("y"));
    }

    #[test]
    fn test_entities_decoded() {
        let doc = parse("<p>a &amp; b &lt;c&gt; &#65;&#x42;&nbsp;&hellip;</p>");
        let p = find_element(&doc, "p").unwrap();
        assert_eq!(text_content(&p), "a & b <c> AB\u{a0}\u{2026}");
    }

    #[test]
    fn test_stray_angle_bracket_is_text() {
        let doc = parse("<p>1 < 2 and 3 <> 4</p>");
        let p = find_element(&doc, "p").unwrap();
        assert_eq!(text_content(&p), "1 < 2 and 3 <> 4");
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text(r#"<a & "b">"#), "&lt;a &amp; &quot;b&quot;&gt;");
        let doc = parse(&format!("<p>{}</p>", escape_text("x < y & z")));
        assert_eq!(text_content(&find_element(&doc, "p").unwrap()), "x < y & z");
    }

    #[test]
    fn test_inline_image_decoded() {
        let html = format!(r#"<div>Look<img alt="dot" src="data:image/png;base64,{PNG_1X1}"></div>"#);
        let doc = parse(&html);
        let img = find_element(&doc, "img").unwrap();
        let (attachment, alt) = inline_image(&attrs_of(&img)).unwrap();
        assert_eq!(attachment.mime_type, "image/png");
        assert_eq!(&attachment.data[1..4], b"PNG");
        assert_eq!(alt.as_deref(), Some("dot"));
    }

    #[test]
    fn test_remote_image_is_not_inline() {
        let doc = parse(r#"<img src="https://example.com/a.png">"#);
        let img = find_element(&doc, "img").unwrap();
        assert!(inline_image(&attrs_of(&img)).is_none());
    }

    #[test]
    fn test_decode_data_uri() {
        let att = decode_data_uri("data:image/jpeg;base64,/9j/\n4A==").unwrap();
        assert_eq!(att.mime_type, "image/jpeg");
        assert_eq!(att.data, vec![0xff, 0xd8, 0xff, 0xe0]);

        let unpadded = decode_data_uri("DATA:image/gif;base64,R0lGODlh").unwrap();
        assert_eq!(unpadded.data, b"GIF89a");

        assert!(decode_data_uri("data:text/plain,hello").is_none());
        assert!(decode_data_uri("https://example.com").is_none());
        assert!(decode_data_uri("data:image/png;base64,@@@").is_none());
    }

    #[test]
    fn test_unterminated_tag_does_not_panic() {
        let doc = parse("text<div class=\"x");
        let body = find_element(&doc, "body").unwrap();
        assert!(text_content(&body).starts_with("text"));
    }
}
