//! Error taxonomy for the resolution engine.
//!
//! Every variant renders as `<kind>: <detail>`; the kind string is the
//! machine-readable classification shared by the CLI and HTTP surfaces, so
//! automated consumers can branch on the prefix of the error message.
//!
//! "No route matched" is deliberately absent: an unresolved route is a
//! normal `None` outcome, not an error.

/// Errors produced while resolving intents, references, and flows.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// A document required by the requested operation is absent.
    #[error("missing_artifact: {0}")]
    MissingArtifact(String),

    /// A flow reference does not have the exact `brick:export` shape.
    #[error("invalid_reference: {0}")]
    InvalidReference(String),

    /// A well-formed reference names a brick absent from the registry.
    #[error("unknown_brick: {0}")]
    UnknownBrick(String),

    /// A well-formed reference names an export the brick does not define.
    #[error("unknown_export: export '{export}' not defined by brick '{brick}'")]
    UnknownExport { brick: String, export: String },

    /// A registered brick's document file cannot be read.
    #[error("missing_file: {0}")]
    MissingFile(String),
}

impl ResolveError {
    /// The stable classification string for this error.
    pub fn kind(&self) -> &'static str {
        match self {
            ResolveError::MissingArtifact(_) => "missing_artifact",
            ResolveError::InvalidReference(_) => "invalid_reference",
            ResolveError::UnknownBrick(_) => "unknown_brick",
            ResolveError::UnknownExport { .. } => "unknown_export",
            ResolveError::MissingFile(_) => "missing_file",
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, ResolveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_prefixed_with_kind() {
        let err = ResolveError::MissingArtifact("router rules not found".to_string());
        assert!(err.to_string().starts_with("missing_artifact: "));

        let err = ResolveError::InvalidReference("abc".to_string());
        assert!(err.to_string().starts_with("invalid_reference: "));

        let err = ResolveError::UnknownExport {
            brick: "CORE-01".to_string(),
            export: "onboarding".to_string(),
        };
        assert!(err.to_string().starts_with("unknown_export: "));
        assert!(err.to_string().contains("CORE-01"));
        assert!(err.to_string().contains("onboarding"));
    }

    #[test]
    fn test_kind_matches_display_prefix() {
        let errors = vec![
            ResolveError::MissingArtifact("x".to_string()),
            ResolveError::InvalidReference("x".to_string()),
            ResolveError::UnknownBrick("x".to_string()),
            ResolveError::UnknownExport {
                brick: "b".to_string(),
                export: "e".to_string(),
            },
            ResolveError::MissingFile("x".to_string()),
        ];
        for err in errors {
            let rendered = err.to_string();
            let prefix = format!("{}: ", err.kind());
            assert!(
                rendered.starts_with(&prefix),
                "{rendered} does not start with {prefix}"
            );
        }
    }
}
