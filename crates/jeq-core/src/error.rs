use thiserror::Error;

/// Errors that can occur while turning external data into a [`Node`](crate::Node).
#[derive(Debug, Error)]
pub enum ParseError {
    /// The provided JSON input was invalid.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The provided YAML input was invalid.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// YAML maps may only contain string keys.
    #[error("unsupported YAML key type: {found}")]
    NonStringYamlKey {
        /// A description of the key that triggered the error.
        found: String,
    },
    /// YAML tags have no JSON counterpart and are rejected.
    #[error("unsupported YAML tag: {tag}")]
    UnsupportedYamlTag {
        /// The tag identifier encountered in the document.
        tag: String,
    },
    /// Encountered a number that JSON cannot represent.
    #[error("non-finite number encountered: {value}")]
    NotFinite {
        /// The offending numeric value.
        value: f64,
    },
}

/// Errors returned by the checks in [`JsonAssertions`](crate::JsonAssertions).
///
/// `Failed` is the ordinary outcome of a check that does not hold. The other
/// variants report bad arguments and are raised before the subject is
/// inspected.
#[derive(Debug, Error)]
pub enum AssertionError {
    /// The asserted condition does not hold.
    #[error("{message}")]
    Failed {
        /// Fully rendered failure message.
        message: String,
    },
    /// A JSON string argument could not be parsed.
    #[error("unable to parse {argument} JSON string:\n{text}")]
    InvalidJson {
        /// Which argument was rejected (`expected`, `unexpected`, `subtree`).
        argument: &'static str,
        /// The offending input text.
        text: String,
        /// The underlying parser error.
        #[source]
        source: ParseError,
    },
    /// A regular expression argument could not be compiled.
    #[error("invalid regex pattern {pattern:?}")]
    InvalidPattern {
        /// The rejected pattern.
        pattern: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },
}
