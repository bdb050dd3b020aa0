//! Struct tag parsing.
//!
//! Tags are literals of the form `` `key:"value" other:"value,opt"` ``.
//! Parsing is deliberately strict: a space-separated token that does not split
//! into exactly one key and one value around a colon is ignored.

use std::borrow::Cow;

/// Return the value stored under `key` in a tag literal.
///
/// Only the first comma-separated segment of the value is returned, so
/// `json:"id,omitempty"` yields `id`. Returns an empty string when the key is
/// absent or the tag is malformed.
///
/// ```
/// use layergen_codegen::tags::tag_value;
///
/// assert_eq!(tag_value(r#"`json:"id,omitempty" gorm:"primaryKey"`"#, "json"), "id");
/// assert_eq!(tag_value(r#"`xml:"id"`"#, "json"), "");
/// ```
pub fn tag_value(tag: &str, key: &str) -> String {
    let tag = unquote(tag);
    let tag = tag.trim_matches('`');
    for token in tag.split_whitespace() {
        let mut parts = token.split(':');
        let (Some(name), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
            continue;
        };
        if name == key {
            let value = value.trim_matches('"');
            return value.split(',').next().unwrap_or_default().to_string();
        }
    }
    String::new()
}

/// The external name a field is serialized under, if the tag names one.
pub fn serialization_name(tag: &str, key: &str) -> Option<String> {
    let value = tag_value(tag, key);
    (!value.is_empty()).then_some(value)
}

/// Tags may also be written as interpreted string literals (`"json:\"id\""`).
fn unquote(tag: &str) -> Cow<'_, str> {
    let Some(inner) = tag.strip_prefix('"').and_then(|t| t.strip_suffix('"')) else {
        return Cow::Borrowed(tag);
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('t') => out.push('\t'),
                Some('n') => out.push('\n'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}
