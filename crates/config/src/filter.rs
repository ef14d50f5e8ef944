//! Tag filter options

use serde::Deserialize;

/// Options for the ingress tag filter
///
/// ```toml
/// [filter]
/// remove_empty_tag = true
/// remove_unsupported_tag = true
/// ```
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TagFilterConfig {
    /// Drop records whose tag is empty. Default: true
    pub remove_empty_tag: bool,

    /// Drop records whose tag is absent from the configured tag table.
    /// Default: true
    pub remove_unsupported_tag: bool,
}

impl Default for TagFilterConfig {
    fn default() -> Self {
        Self {
            remove_empty_tag: true,
            remove_unsupported_tag: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_drop_both() {
        let config: TagFilterConfig = toml::from_str("").unwrap();
        assert!(config.remove_empty_tag);
        assert!(config.remove_unsupported_tag);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: TagFilterConfig = toml::from_str("remove_empty_tag = false").unwrap();
        assert!(!config.remove_empty_tag);
        assert!(config.remove_unsupported_tag);
    }
}
