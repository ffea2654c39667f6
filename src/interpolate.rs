//! Path template interpolation.
//!
//! Output paths are configured as templates containing `:token` placeholders:
//!
//! ```text
//! articles/page/:num/index.html   →  articles/page/2/index.html
//! archive/:name/index.html        →  archive/2014/index.html
//! ```
//!
//! A token is a `:` followed by one or more ASCII alphanumerics or `_`.
//! Substitution is literal: the resolved value is spliced in as-is, without
//! escaping. Tokens the context doesn't know resolve to the empty string, and
//! a `:` that isn't followed by a word character is kept verbatim.

/// Anything that can resolve `:token` placeholders to values.
pub trait Context {
    /// Look up a placeholder by name (without the leading `:`).
    fn field(&self, key: &str) -> Option<String>;
}

/// The pagination fields available to path templates.
#[derive(Debug, Clone, PartialEq)]
pub struct PathContext<'a> {
    /// Zero-based page index.
    pub index: usize,
    /// One-based page number.
    pub num: usize,
    /// Group key that produced the page.
    pub name: &'a str,
    /// Total number of pages in the collection.
    pub total: usize,
}

impl Context for PathContext<'_> {
    fn field(&self, key: &str) -> Option<String> {
        match key {
            "index" => Some(self.index.to_string()),
            "num" => Some(self.num.to_string()),
            "name" => Some(self.name.to_string()),
            "total" => Some(self.total.to_string()),
            _ => None,
        }
    }
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Replace every `:token` in `template` with its value from `ctx`.
pub fn interpolate(template: &str, ctx: &impl Context) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(colon) = rest.find(':') {
        out.push_str(&rest[..colon]);
        let after = &rest[colon + 1..];
        let token_len = after
            .find(|c: char| !is_token_char(c))
            .unwrap_or(after.len());

        if token_len == 0 {
            out.push(':');
        } else {
            let key = &after[..token_len];
            if let Some(value) = ctx.field(key) {
                out.push_str(&value);
            }
        }
        rest = &after[token_len..];
    }
    out.push_str(rest);
    out
}
