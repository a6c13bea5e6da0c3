//! HTML escaping for untrusted session text

use std::borrow::Cow;

/// Escape `&`, `<`, `>`, `"` and `'` for use in HTML text and attribute values.
///
/// Borrows the input when nothing needs escaping.
///
/// # Examples
///
/// ```
/// use jc_common::escape::escape_html;
///
/// assert_eq!(escape_html("<script>"), "&lt;script&gt;");
/// assert_eq!(escape_html("plain"), "plain");
/// ```
pub fn escape_html(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }

    let mut escaped = String::with_capacity(input.len() + 16);
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

/// URL schemes allowed in `href` and `src` attributes
const SAFE_SCHEMES: [&str; 2] = ["http", "https"];

/// Return the URL when it is safe to place in a link or image attribute.
///
/// Absolute URLs must use `http` or `https`; relative URLs pass. Whitespace
/// and control characters are ignored when reading the scheme, the way
/// browsers do, so `java\tscript:` is rejected too.
///
/// # Examples
///
/// ```
/// use jc_common::escape::safe_url;
///
/// assert_eq!(safe_url("https://doi.org/10.1/x"), Some("https://doi.org/10.1/x"));
/// assert_eq!(safe_url("pdfs/paper.pdf"), Some("pdfs/paper.pdf"));
/// assert_eq!(safe_url("javascript:alert(1)"), None);
/// ```
pub fn safe_url(url: &str) -> Option<&str> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    let cleaned: String = url
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_control())
        .collect();
    match cleaned.find([':', '/', '?', '#']) {
        Some(end) if cleaned[end..].starts_with(':') => {
            let scheme = cleaned[..end].to_ascii_lowercase();
            SAFE_SCHEMES.contains(&scheme.as_str()).then_some(url)
        }
        _ => Some(url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_url_schemes() {
        assert_eq!(safe_url(" HTTPS://example.org/a.pdf "), Some("HTTPS://example.org/a.pdf"));
        assert_eq!(safe_url("http://example.org"), Some("http://example.org"));
        assert_eq!(safe_url("/files/a.png?x=1:2"), Some("/files/a.png?x=1:2"));
        assert_eq!(safe_url("JavaScript:alert(1)"), None);
        assert_eq!(safe_url("java\tscript:alert(1)"), None);
        assert_eq!(safe_url("data:text/html,<script>"), None);
        assert_eq!(safe_url("vbscript:msgbox"), None);
        assert_eq!(safe_url("   "), None);
    }

    #[test]
    fn test_escapes_all_special_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_borrows_clean_input() {
        assert!(matches!(escape_html("Laryngoscope"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_already_escaped_text_is_escaped_again() {
        assert_eq!(escape_html("&amp;"), "&amp;amp;");
    }
}
