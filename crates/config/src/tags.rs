//! Per-tag concatenation table
//!
//! Each recognized tag maps to the payload keys and first-line pattern its
//! concatenator runs with. The table doubles as the tag filter's snapshot
//! of supported tags.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Concatenation options for one tag
#[derive(Debug, Clone, Deserialize)]
pub struct TagConfig {
    /// Payload key holding the log text to fuse
    pub msg_key: String,

    /// Payload key distinguishing sources within the tag
    /// (typically a container id)
    pub identifier_key: String,

    /// Pattern matching the first line of a logical entry
    pub first_line: String,
}

impl TagConfig {
    /// Compile the first-line pattern
    ///
    /// Patterns run against raw payload bytes, so this produces a
    /// `regex::bytes::Regex`.
    pub fn compile_first_line(&self, tag: &str) -> Result<regex::bytes::Regex> {
        regex::bytes::Regex::new(&self.first_line)
            .map_err(|e| ConfigError::invalid_regex(tag, &self.first_line, e.to_string()))
    }

    /// Validate this entry under its tag name
    pub fn validate(&self, tag: &str) -> Result<()> {
        if self.msg_key.is_empty() {
            return Err(ConfigError::missing_field(tag, "msg_key"));
        }
        if self.identifier_key.is_empty() {
            return Err(ConfigError::missing_field(tag, "identifier_key"));
        }
        self.compile_first_line(tag)?;
        Ok(())
    }
}

/// The tag → options table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct TagsConfig(HashMap<String, TagConfig>);

impl TagsConfig {
    /// Look up one tag's options
    pub fn get(&self, tag: &str) -> Option<&TagConfig> {
        self.0.get(tag)
    }

    /// Iterate over all (tag, options) entries
    pub fn iter(&self) -> impl Iterator<Item = (&String, &TagConfig)> {
        self.0.iter()
    }

    /// Number of configured tags
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no tags are configured
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Snapshot of the supported tag set, for the tag filter
    pub fn tag_set(&self) -> HashSet<String> {
        self.0.keys().cloned().collect()
    }

    /// Validate every entry
    pub fn validate(&self) -> Result<()> {
        for (tag, config) in &self.0 {
            config.validate(tag)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(toml: &str) -> TagsConfig {
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn test_deserialize_table() {
        let tags = table(
            r#"
[app]
msg_key = "log"
identifier_key = "container_id"
first_line = '^\d{4}-'

[nginx]
msg_key = "message"
identifier_key = "host"
first_line = '^\['
"#,
        );

        assert_eq!(tags.len(), 2);
        let app = tags.get("app").unwrap();
        assert_eq!(app.msg_key, "log");
        assert_eq!(app.identifier_key, "container_id");
        assert!(tags.validate().is_ok());
    }

    #[test]
    fn test_tag_set_snapshot() {
        let tags = table(
            "[a]\nmsg_key = \"m\"\nidentifier_key = \"i\"\nfirst_line = \"^x\"\n\
             [b]\nmsg_key = \"m\"\nidentifier_key = \"i\"\nfirst_line = \"^y\"\n",
        );

        let set = tags.tag_set();
        assert!(set.contains("a"));
        assert!(set.contains("b"));
        assert!(!set.contains("c"));
    }

    #[test]
    fn test_compile_first_line() {
        let tags = table("[app]\nmsg_key = \"log\"\nidentifier_key = \"cid\"\nfirst_line = '^\\d{4}-'");
        let regex = tags.get("app").unwrap().compile_first_line("app").unwrap();

        assert!(regex.is_match(b"2024-01-01 boom"));
        assert!(!regex.is_match(b"  at foo()"));
    }

    #[test]
    fn test_invalid_pattern() {
        let tags = table("[app]\nmsg_key = \"log\"\nidentifier_key = \"cid\"\nfirst_line = '^('");
        let err = tags.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRegex { .. }));
    }

    #[test]
    fn test_empty_keys_rejected() {
        let tags = table("[app]\nmsg_key = \"\"\nidentifier_key = \"cid\"\nfirst_line = \"^x\"");
        let err = tags.validate().unwrap_err();
        assert!(err.to_string().contains("msg_key"));

        let tags = table("[app]\nmsg_key = \"log\"\nidentifier_key = \"\"\nfirst_line = \"^x\"");
        let err = tags.validate().unwrap_err();
        assert!(err.to_string().contains("identifier_key"));
    }

    #[test]
    fn test_empty_table() {
        let tags = TagsConfig::default();
        assert!(tags.is_empty());
        assert!(tags.validate().is_ok());
        assert!(tags.tag_set().is_empty());
    }
}
