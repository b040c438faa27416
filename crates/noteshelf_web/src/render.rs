//! HTML rendering for the note index page.

use noteshelf_core::Note;

/// Fixed heading present on every index page.
pub const INDEX_HEADING: &str = "Notes";

const EMPTY_STATE: &str = "No notes yet.";

/// Renders the full index page listing every note name.
pub fn render_index(notes: &[Note]) -> String {
    let mut body = String::with_capacity(256 + notes.len() * 32);
    body.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    body.push_str(&format!("<title>{INDEX_HEADING}</title>\n"));
    body.push_str("</head>\n<body>\n");
    body.push_str(&format!("<h1>{INDEX_HEADING}</h1>\n"));

    if notes.is_empty() {
        body.push_str(&format!("<p>{EMPTY_STATE}</p>\n"));
    } else {
        body.push_str("<ul>\n");
        for note in notes {
            body.push_str(&format!("<li>{}</li>\n", escape_html(&note.name)));
        }
        body.push_str("</ul>\n");
    }

    body.push_str("</body>\n</html>\n");
    body
}

/// Escapes text for use inside HTML element content or quoted attributes.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
