//! Minimal escaping HTML writer
//!
//! Text and attribute values always go through [`escape_html`]; only tag and
//! attribute names (which are compile-time literals at every call site) are
//! written raw.

use jc_common::escape::escape_html;

#[derive(Debug, Default)]
pub struct Html {
    buf: String,
}

impl Html {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opening tag. Attributes with a `None` value are omitted; an empty
    /// value renders a bare boolean attribute (`hidden`).
    pub fn open(&mut self, tag: &str, attrs: &[(&str, Option<&str>)]) -> &mut Self {
        self.buf.push('<');
        self.buf.push_str(tag);
        for (name, value) in attrs {
            match value {
                None => {}
                Some("") => {
                    self.buf.push(' ');
                    self.buf.push_str(name);
                }
                Some(value) => {
                    self.buf.push(' ');
                    self.buf.push_str(name);
                    self.buf.push_str("=\"");
                    self.buf.push_str(&escape_html(value));
                    self.buf.push('"');
                }
            }
        }
        self.buf.push('>');
        self
    }

    pub fn close(&mut self, tag: &str) -> &mut Self {
        self.buf.push_str("</");
        self.buf.push_str(tag);
        self.buf.push('>');
        self
    }

    /// Void element such as `<input>` or `<img>`
    pub fn void(&mut self, tag: &str, attrs: &[(&str, Option<&str>)]) -> &mut Self {
        self.open(tag, attrs)
    }

    pub fn text(&mut self, text: &str) -> &mut Self {
        self.buf.push_str(&escape_html(text));
        self
    }

    /// Element with children written by `body`
    pub fn el(
        &mut self,
        tag: &str,
        attrs: &[(&str, Option<&str>)],
        body: impl FnOnce(&mut Self),
    ) -> &mut Self {
        self.open(tag, attrs);
        body(self);
        self.close(tag)
    }

    /// Element containing only escaped text
    pub fn text_el(&mut self, tag: &str, attrs: &[(&str, Option<&str>)], text: &str) -> &mut Self {
        self.open(tag, attrs).text(text).close(tag)
    }

    /// Trusted markup produced by another `Html` or a compile-time constant
    pub fn raw(&mut self, markup: &str) -> &mut Self {
        self.buf.push_str(markup);
        self
    }

    pub fn newline(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

/// `Some("")` when the flag is set: renders a bare boolean attribute
pub fn flag(set: bool) -> Option<&'static str> {
    set.then_some("")
}
