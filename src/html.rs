//! Escaping for anything this crate writes as HTML.

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Plain text as an HTML fragment: escaped, newlines as `<br>`.
pub fn text_to_html(text: &str) -> String {
    escape_html(text).replace('\n', "<br>")
}
