//! Editor configuration.

use serde::Deserialize;

/// Default longest `$ref` chain followed while resolving or validating.
pub const DEFAULT_MAX_REF_DEPTH: usize = 100;

/// Tunables for schema navigation, validation, and rendering.
///
/// Every field has a default matching the BI project format, so
/// `EditorConfig::default()` is the usual starting point. Hosts that need a
/// different layout can deserialize one from JSON.
///
/// # Example
///
/// ```rust
/// use schema_editor::EditorConfig;
///
/// let config = EditorConfig::default().with_max_ref_depth(20);
/// assert_eq!(config.max_ref_depth, 20);
/// assert!(config.top_level_kinds.iter().any(|k| k == "charts"));
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Root array properties whose items are the project's top-level objects.
    pub top_level_kinds: Vec<String>,
    /// Keys hidden from root-level cards, compared case-insensitively.
    pub bookkeeping_keys: Vec<String>,
    /// Longest `$ref` chain followed before giving up.
    pub max_ref_depth: usize,
    /// Template for reference values; `{}` is replaced by the object name.
    pub reference_format: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            top_level_kinds: ["models", "traces", "charts", "dashboards", "tables", "selectors"]
                .into_iter()
                .map(String::from)
                .collect(),
            bookkeeping_keys: ["path", "name", "changed"]
                .into_iter()
                .map(String::from)
                .collect(),
            max_ref_depth: DEFAULT_MAX_REF_DEPTH,
            reference_format: "ref({})".to_string(),
        }
    }
}

impl EditorConfig {
    /// Parses a configuration from JSON, filling omitted fields with defaults.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Sets the maximum `$ref` chain depth.
    pub fn with_max_ref_depth(mut self, depth: usize) -> Self {
        self.max_ref_depth = depth;
        self
    }

    /// Replaces the list of top-level kinds.
    pub fn with_top_level_kinds<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.top_level_kinds = kinds.into_iter().map(Into::into).collect();
        self
    }

    /// Returns true if `key` is a bookkeeping key hidden from root cards.
    pub fn is_bookkeeping_key(&self, key: &str) -> bool {
        self.bookkeeping_keys
            .iter()
            .any(|k| k.eq_ignore_ascii_case(key))
    }

    /// Wraps an object name into a reference value.
    pub fn reference_token(&self, name: &str) -> String {
        self.reference_format.replacen("{}", name, 1)
    }

    /// Extracts the object name from a reference value, if it is one.
    pub fn parse_reference<'v>(&self, token: &'v str) -> Option<&'v str> {
        let (prefix, suffix) = self.reference_format.split_once("{}")?;
        token
            .strip_prefix(prefix)?
            .strip_suffix(suffix)
            .filter(|name| !name.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EditorConfig::from_json_str(r#"{"max_ref_depth": 7}"#).unwrap();
        assert_eq!(config.max_ref_depth, 7);
        assert_eq!(config.top_level_kinds.len(), 6);
        assert_eq!(config.reference_format, "ref({})");
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(EditorConfig::from_json_str(r#"{"max_depth": 7}"#).is_err());
    }

    #[test]
    fn test_bookkeeping_keys_ignore_case() {
        let config = EditorConfig::default();
        assert!(config.is_bookkeeping_key("Name"));
        assert!(config.is_bookkeeping_key("CHANGED"));
        assert!(!config.is_bookkeeping_key("label"));
    }

    #[test]
    fn test_reference_token_round_trip() {
        let config = EditorConfig::default();
        let token = config.reference_token("orders");
        assert_eq!(token, "ref(orders)");
        assert_eq!(config.parse_reference(&token), Some("orders"));
        assert_eq!(config.parse_reference("orders"), None);
        assert_eq!(config.parse_reference("ref()"), None);
    }
}
