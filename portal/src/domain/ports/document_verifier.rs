//! Port verifying a transferred document.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{DocumentKind, SelectedFile};

define_port_error! {
    /// Reasons a transferred document is not accepted.
    pub enum DocumentVerificationError {
        /// The document does not meet the expected format or content.
        NonConformant => "document non-conformant",
        /// The verification service could not be reached.
        Unavailable { message: String } => "verification unavailable: {message}",
    }
}

/// Checks a document once its transfer completed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentVerifier: Send + Sync {
    /// Accept or reject `file` uploaded for `kind`.
    async fn verify(
        &self,
        kind: DocumentKind,
        file: &SelectedFile,
    ) -> Result<(), DocumentVerificationError>;
}

/// Verifier accepting every document.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDocumentVerifier;

#[async_trait]
impl DocumentVerifier for FixtureDocumentVerifier {
    async fn verify(
        &self,
        _kind: DocumentKind,
        _file: &SelectedFile,
    ) -> Result<(), DocumentVerificationError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_conformant_message_matches_slot_message() {
        assert_eq!(
            DocumentVerificationError::non_conformant().to_string(),
            crate::domain::NON_CONFORMANT_MESSAGE
        );
    }
}
