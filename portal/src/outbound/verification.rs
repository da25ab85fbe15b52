//! Probabilistic stand-in for a document verification service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{DocumentVerificationError, DocumentVerifier, RandomSource};
use crate::domain::{DocumentKind, SelectedFile};

/// Percent of transferred documents accepted.
pub const ACCEPT_PERCENT: u8 = 90;

/// Accepts roughly nine documents in ten.
pub struct SimulatedDocumentVerifier {
    random: Arc<dyn RandomSource>,
}

impl SimulatedDocumentVerifier {
    pub fn new(random: Arc<dyn RandomSource>) -> Self {
        Self { random }
    }
}

#[async_trait]
impl DocumentVerifier for SimulatedDocumentVerifier {
    async fn verify(
        &self,
        _kind: DocumentKind,
        _file: &SelectedFile,
    ) -> Result<(), DocumentVerificationError> {
        if self.random.chance(ACCEPT_PERCENT) {
            Ok(())
        } else {
            Err(DocumentVerificationError::non_conformant())
        }
    }
}
