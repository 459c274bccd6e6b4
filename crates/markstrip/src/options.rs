use alloc::{
    string::{String, ToString},
    sync::Arc,
    vec::Vec,
};

/// Configuration options for the markup scanner.
///
/// # Examples
///
/// ```rust
/// use markstrip::{StripOptions, Stripper};
///
/// let options = StripOptions {
///     opaque_elements: vec!["script".into(), "noscript".into()],
///     ..Default::default()
/// };
/// let stripper = Stripper::new(&options);
/// assert_eq!(stripper.strip("a<noscript>b</noscript>c"), "ac");
/// ```
///
/// # Default
///
/// `script` and `style` are opaque, entities are at most 32 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct StripOptions {
    /// Elements whose entire content is discarded up to the matching end
    /// tag.
    ///
    /// Names are matched ASCII case-insensitively. Names that are empty or
    /// contain anything other than ASCII alphanumerics, `-`, `_` or `:` can
    /// never match a tag and are ignored.
    ///
    /// # Default
    ///
    /// `["script", "style"]`
    pub opaque_elements: Vec<String>,

    /// Longest entity body, in characters, the scanner will buffer while
    /// looking for the terminating `;`.
    ///
    /// Longer candidates are emitted literally as text.
    ///
    /// # Default
    ///
    /// `32`
    pub max_entity_len: usize,
}

/// Default bound on entity body length.
pub const DEFAULT_MAX_ENTITY_LEN: usize = 32;

impl Default for StripOptions {
    fn default() -> Self {
        Self {
            opaque_elements: ["script", "style"].map(ToString::to_string).to_vec(),
            max_entity_len: DEFAULT_MAX_ENTITY_LEN,
        }
    }
}

impl StripOptions {
    /// Options with no opaque elements: every element's text is kept.
    #[must_use]
    pub fn without_opaque_elements() -> Self {
        Self {
            opaque_elements: Vec::new(),
            ..Self::default()
        }
    }
}

/// Characters that may appear in a tag name.
#[inline]
pub(crate) fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | ':')
}

/// Scanner configuration derived once from [`StripOptions`] and shared by
/// every scan.
#[derive(Debug, Clone)]
pub(crate) struct ScanConfig {
    opaque: Arc<[String]>,
    /// Longest opaque element name; tag names are only buffered up to this.
    pub(crate) name_limit: usize,
    pub(crate) max_entity_len: usize,
}

impl ScanConfig {
    pub(crate) fn new(options: &StripOptions) -> Self {
        let opaque: Vec<String> = options
            .opaque_elements
            .iter()
            .filter(|name| !name.is_empty() && name.chars().all(is_name_char))
            .map(|name| name.to_ascii_lowercase())
            .collect();
        let name_limit = opaque.iter().map(String::len).max().unwrap_or(0);
        Self {
            opaque: opaque.into(),
            name_limit,
            max_entity_len: options.max_entity_len,
        }
    }

    /// Index of the opaque element named `name` (already lowercase).
    pub(crate) fn opaque_index(&self, name: &str) -> Option<usize> {
        self.opaque.iter().position(|element| element == name)
    }

    pub(crate) fn opaque_name(&self, index: usize) -> &str {
        &self.opaque[index]
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(&StripOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_opaque_names_are_ignored() {
        let config = ScanConfig::new(&StripOptions {
            opaque_elements: ["SCRIPT", "", "no space", "x-widget"]
                .map(ToString::to_string)
                .to_vec(),
            ..StripOptions::default()
        });
        assert_eq!(config.opaque_index("script"), Some(0));
        assert_eq!(config.opaque_index("x-widget"), Some(1));
        assert_eq!(config.name_limit, "x-widget".len());
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: StripOptions = serde_json::from_str(r#"{"max_entity_len": 8}"#).unwrap();
        assert_eq!(options.max_entity_len, 8);
        assert_eq!(options.opaque_elements, ["script", "style"]);
    }
}
