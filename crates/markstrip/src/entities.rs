//! Entity decoding.
//!
//! Resolves the body of an `&body;` reference to the text it stands for.
//! Numeric references (`#NNN`, `#xHHH`) map through the code point; named
//! references are looked up in a caller-extensible table layered over the
//! built-in [`NAMED_ENTITIES`].

use alloc::{
    borrow::Cow,
    collections::BTreeMap,
    string::{String, ToString},
};

use crate::span::Capture;

/// Built-in named entities: the XML five, the HTML 4 Latin-1 set, and common
/// typographic entities. Sorted by name (byte order) for binary search.
pub static NAMED_ENTITIES: &[(&str, &str)] = &[
    ("AElig", "\u{00C6}"),
    ("Aacute", "\u{00C1}"),
    ("Acirc", "\u{00C2}"),
    ("Agrave", "\u{00C0}"),
    ("Aring", "\u{00C5}"),
    ("Atilde", "\u{00C3}"),
    ("Auml", "\u{00C4}"),
    ("Ccedil", "\u{00C7}"),
    ("Dagger", "\u{2021}"),
    ("ETH", "\u{00D0}"),
    ("Eacute", "\u{00C9}"),
    ("Ecirc", "\u{00CA}"),
    ("Egrave", "\u{00C8}"),
    ("Euml", "\u{00CB}"),
    ("Iacute", "\u{00CD}"),
    ("Icirc", "\u{00CE}"),
    ("Igrave", "\u{00CC}"),
    ("Iuml", "\u{00CF}"),
    ("Ntilde", "\u{00D1}"),
    ("OElig", "\u{0152}"),
    ("Oacute", "\u{00D3}"),
    ("Ocirc", "\u{00D4}"),
    ("Ograve", "\u{00D2}"),
    ("Oslash", "\u{00D8}"),
    ("Otilde", "\u{00D5}"),
    ("Ouml", "\u{00D6}"),
    ("Scaron", "\u{0160}"),
    ("THORN", "\u{00DE}"),
    ("Uacute", "\u{00DA}"),
    ("Ucirc", "\u{00DB}"),
    ("Ugrave", "\u{00D9}"),
    ("Uuml", "\u{00DC}"),
    ("Yacute", "\u{00DD}"),
    ("Yuml", "\u{0178}"),
    ("aacute", "\u{00E1}"),
    ("acirc", "\u{00E2}"),
    ("acute", "\u{00B4}"),
    ("aelig", "\u{00E6}"),
    ("agrave", "\u{00E0}"),
    ("amp", "&"),
    ("apos", "'"),
    ("aring", "\u{00E5}"),
    ("atilde", "\u{00E3}"),
    ("auml", "\u{00E4}"),
    ("bdquo", "\u{201E}"),
    ("brvbar", "\u{00A6}"),
    ("bull", "\u{2022}"),
    ("ccedil", "\u{00E7}"),
    ("cedil", "\u{00B8}"),
    ("cent", "\u{00A2}"),
    ("circ", "\u{02C6}"),
    ("copy", "\u{00A9}"),
    ("curren", "\u{00A4}"),
    ("dagger", "\u{2020}"),
    ("deg", "\u{00B0}"),
    ("divide", "\u{00F7}"),
    ("eacute", "\u{00E9}"),
    ("ecirc", "\u{00EA}"),
    ("egrave", "\u{00E8}"),
    ("emsp", "\u{2003}"),
    ("ensp", "\u{2002}"),
    ("eth", "\u{00F0}"),
    ("euml", "\u{00EB}"),
    ("euro", "\u{20AC}"),
    ("fnof", "\u{0192}"),
    ("frac12", "\u{00BD}"),
    ("frac14", "\u{00BC}"),
    ("frac34", "\u{00BE}"),
    ("gt", ">"),
    ("hellip", "\u{2026}"),
    ("iacute", "\u{00ED}"),
    ("icirc", "\u{00EE}"),
    ("iexcl", "\u{00A1}"),
    ("igrave", "\u{00EC}"),
    ("iquest", "\u{00BF}"),
    ("iuml", "\u{00EF}"),
    ("laquo", "\u{00AB}"),
    ("ldquo", "\u{201C}"),
    ("lrm", "\u{200E}"),
    ("lsaquo", "\u{2039}"),
    ("lsquo", "\u{2018}"),
    ("lt", "<"),
    ("macr", "\u{00AF}"),
    ("mdash", "\u{2014}"),
    ("micro", "\u{00B5}"),
    ("middot", "\u{00B7}"),
    ("nbsp", "\u{00A0}"),
    ("ndash", "\u{2013}"),
    ("not", "\u{00AC}"),
    ("ntilde", "\u{00F1}"),
    ("oacute", "\u{00F3}"),
    ("ocirc", "\u{00F4}"),
    ("oelig", "\u{0153}"),
    ("ograve", "\u{00F2}"),
    ("ordf", "\u{00AA}"),
    ("ordm", "\u{00BA}"),
    ("oslash", "\u{00F8}"),
    ("otilde", "\u{00F5}"),
    ("ouml", "\u{00F6}"),
    ("para", "\u{00B6}"),
    ("permil", "\u{2030}"),
    ("plusmn", "\u{00B1}"),
    ("pound", "\u{00A3}"),
    ("quot", "\""),
    ("raquo", "\u{00BB}"),
    ("rdquo", "\u{201D}"),
    ("reg", "\u{00AE}"),
    ("rlm", "\u{200F}"),
    ("rsaquo", "\u{203A}"),
    ("rsquo", "\u{2019}"),
    ("sbquo", "\u{201A}"),
    ("scaron", "\u{0161}"),
    ("sect", "\u{00A7}"),
    ("shy", "\u{00AD}"),
    ("sup1", "\u{00B9}"),
    ("sup2", "\u{00B2}"),
    ("sup3", "\u{00B3}"),
    ("szlig", "\u{00DF}"),
    ("thinsp", "\u{2009}"),
    ("thorn", "\u{00FE}"),
    ("tilde", "\u{02DC}"),
    ("times", "\u{00D7}"),
    ("trade", "\u{2122}"),
    ("uacute", "\u{00FA}"),
    ("ucirc", "\u{00FB}"),
    ("ugrave", "\u{00F9}"),
    ("uml", "\u{00A8}"),
    ("uuml", "\u{00FC}"),
    ("yacute", "\u{00FD}"),
    ("yen", "\u{00A5}"),
    ("yuml", "\u{00FF}"),
    ("zwj", "\u{200D}"),
    ("zwnj", "\u{200C}"),
];

/// Looks up a built-in named entity. Names are case-sensitive.
#[must_use]
pub fn lookup_named(name: &str) -> Option<&'static str> {
    NAMED_ENTITIES
        .binary_search_by(|(candidate, _)| (*candidate).cmp(name))
        .ok()
        .map(|index| NAMED_ENTITIES[index].1)
}

/// Decodes a numeric entity body: `#` followed by decimal digits, or `#x` /
/// `#X` followed by hex digits.
///
/// Zero, surrogates, values above U+10FFFF and malformed digit runs yield
/// `None`.
#[must_use]
pub fn decode_numeric(body: &str) -> Option<char> {
    let digits = body.strip_prefix('#')?;
    let (radix, digits) = match digits.strip_prefix(['x', 'X']) {
        Some(hex) => (16, hex),
        None => (10, digits),
    };
    // `from_str_radix` would accept a leading sign.
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    let value = u32::from_str_radix(digits, radix).ok()?;
    if value == 0 {
        return None;
    }
    char::from_u32(value)
}

/// Decodes an entity body against the built-in table.
///
/// # Examples
///
/// ```rust
/// use markstrip::decode_entity;
///
/// assert_eq!(decode_entity("amp").as_deref(), Some("&"));
/// assert_eq!(decode_entity("#x41").as_deref(), Some("A"));
/// assert_eq!(decode_entity("bogus"), None);
/// ```
#[must_use]
pub fn decode_entity(body: &str) -> Option<Cow<'static, str>> {
    if let Some(ch) = decode_numeric(body) {
        return Some(Cow::Owned(ch.to_string()));
    }
    lookup_named(body).map(Cow::Borrowed)
}

/// Named entity table: the built-in set plus caller-supplied additions.
///
/// Additions take precedence over built-in names. The table is read-only once
/// handed to a [`Stripper`](crate::Stripper) and is shared between scans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct EntityTable {
    extra: BTreeMap<String, String>,
}

impl EntityTable {
    /// Creates a table holding only the built-in entities.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or overrides a named entity.
    #[must_use]
    pub fn with_entity(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Adds or overrides a named entity in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.extra.insert(name.into(), value.into());
    }

    /// Decodes an entity body, `None` if it is not a known entity.
    #[must_use]
    pub fn decode(&self, body: &str) -> Option<Cow<'_, str>> {
        if let Some(ch) = decode_numeric(body) {
            return Some(Cow::Owned(ch.to_string()));
        }
        if let Some(value) = self.extra.get(body) {
            return Some(Cow::Borrowed(value.as_str()));
        }
        lookup_named(body).map(Cow::Borrowed)
    }

    /// Decodes into a capture that outlives the table: built-in values are
    /// borrowed from static data, everything else is owned.
    pub(crate) fn decode_capture<'src>(&self, body: &str) -> Option<Capture<'src>> {
        if let Some(ch) = decode_numeric(body) {
            return Some(Capture::Owned(ch.to_string()));
        }
        if let Some(value) = self.extra.get(body) {
            return Some(Capture::Owned(value.clone()));
        }
        lookup_named(body).map(Capture::Borrowed)
    }
}
