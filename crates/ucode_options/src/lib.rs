//! ucode_options: parser configuration.
//!
//! [`ParseOptions`] controls which grammar a source is read with and how the
//! parser reacts to errors. Options can be built in code or loaded from a
//! JSON document such as:
//!
//! ```json
//! { "mode": "program", "failFast": true, "maxNestingDepth": 64 }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
pub use ucode_ast::types::SourceMode;

/// Default limit on expression nesting before the parser gives up on a
/// subtree.
pub const DEFAULT_MAX_NESTING_DEPTH: u32 = 200;

/// Parser options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ParseOptions {
    /// Markup (text with tags) or program (code only).
    pub mode: SourceMode,
    /// Stop at the first error instead of recovering.
    pub fail_fast: bool,
    pub max_nesting_depth: u32,
    /// Skip a leading `#!` line.
    pub allow_hash_bang: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            mode: SourceMode::Markup,
            fail_fast: false,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            allow_hash_bang: true,
        }
    }
}

impl ParseOptions {
    pub fn markup() -> Self {
        Self::default()
    }

    pub fn program() -> Self {
        Self {
            mode: SourceMode::Program,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: SourceMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub fn with_max_nesting_depth(mut self, depth: u32) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// Parse options from a JSON string. Missing keys take their defaults;
    /// unknown keys are rejected.
    pub fn from_json(content: &str) -> Result<Self, OptionsError> {
        let options: ParseOptions = serde_json::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| OptionsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String, OptionsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.max_nesting_depth == 0 {
            return Err(OptionsError::InvalidNestingDepth(self.max_nesting_depth));
        }
        Ok(())
    }
}

/// Errors raised while loading options.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("invalid parse options: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot read options file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("maxNestingDepth must be at least 1, got {0}")]
    InvalidNestingDepth(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ParseOptions::default();
        assert_eq!(options.mode, SourceMode::Markup);
        assert!(!options.fail_fast);
        assert_eq!(options.max_nesting_depth, 200);
        assert!(options.allow_hash_bang);
    }

    #[test]
    fn test_from_json_camel_case() {
        let options = ParseOptions::from_json(r#"{ "mode": "program", "failFast": true, "maxNestingDepth": 64 }"#)
            .expect("valid options");
        assert_eq!(options, ParseOptions::program().with_fail_fast(true).with_max_nesting_depth(64));
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let options = ParseOptions::from_json("{}").expect("empty object");
        assert_eq!(options, ParseOptions::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = ParseOptions::from_json(r#"{ "strict": true }"#).unwrap_err();
        assert!(matches!(err, OptionsError::Json(_)));
        assert!(err.to_string().contains("strict"));
    }

    #[test]
    fn test_bad_mode_rejected() {
        assert!(ParseOptions::from_json(r#"{ "mode": "Markup" }"#).is_err());
    }

    #[test]
    fn test_zero_depth_rejected() {
        let err = ParseOptions::from_json(r#"{ "maxNestingDepth": 0 }"#).unwrap_err();
        assert!(matches!(err, OptionsError::InvalidNestingDepth(0)));
    }

    #[test]
    fn test_json_round_trip() {
        let options = ParseOptions::program();
        let json = options.to_json().expect("serializable");
        assert!(json.contains("\"allowHashBang\": true"));
        assert_eq!(ParseOptions::from_json(&json).expect("parses back"), options);
    }

    #[test]
    fn test_missing_file() {
        let err = ParseOptions::from_file("/nonexistent/ucode-options.json").unwrap_err();
        assert!(matches!(err, OptionsError::Io { .. }));
    }
}
