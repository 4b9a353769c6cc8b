//! Failures of the "use dom" rewrite.

use swc_core::common::Span;

pub type Result<T, E = DomDirectiveError> = std::result::Result<T, E>;

/// Every failure aborts the rewrite of the current file before the tree is touched.
#[derive(Debug, thiserror::Error)]
pub enum DomDirectiveError {
    /// The host invoked the transform without a usable file path.
    #[error("[use dom] {0}")]
    Configuration(String),

    /// A named export sits next to the directive.
    #[error("Modules with the \"use dom\" directive only support a single default export.")]
    UnsupportedExport { span: Span },

    #[error("The \"use dom\" directive requires a default export to be present in the file.")]
    MissingExport { span: Span },

    /// Production builds only know the asset layout of some platforms.
    #[error("production \"use dom\" directive is not supported yet for platform: {platform}")]
    UnsupportedPlatform { platform: String },

    #[error("expected the file metadata to be an object")]
    Metadata,
}

impl DomDirectiveError {
    /// Source location to point the diagnostic at, when the failure has one.
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::UnsupportedExport { span } | Self::MissingExport { span } if !span.is_dummy() => {
                Some(*span)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swc_core::common::{BytePos, DUMMY_SP};

    #[test]
    fn dummy_spans_are_not_reported() {
        let err = DomDirectiveError::MissingExport { span: DUMMY_SP };
        assert!(err.span().is_none());
    }

    #[test]
    fn export_errors_carry_their_span() {
        let span = Span::new(BytePos(10), BytePos(24));
        let err = DomDirectiveError::UnsupportedExport { span };
        assert_eq!(err.span(), Some(span));
        assert!(err.to_string().contains("single default export"));
    }

    #[test]
    fn platform_error_names_the_platform() {
        let err = DomDirectiveError::UnsupportedPlatform {
            platform: "windows".into(),
        };
        assert_eq!(
            err.to_string(),
            "production \"use dom\" directive is not supported yet for platform: windows"
        );
    }
}
