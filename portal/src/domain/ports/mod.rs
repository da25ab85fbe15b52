//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod autosave;
mod document_verifier;
mod login_service;
mod random_source;
mod sleeper;
mod token_store;

#[cfg(test)]
pub use autosave::MockAutosaveSink;
pub use autosave::{AutosaveError, AutosaveSink};
#[cfg(test)]
pub use document_verifier::MockDocumentVerifier;
pub use document_verifier::{DocumentVerificationError, DocumentVerifier, FixtureDocumentVerifier};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{Authenticated, FixtureLoginService, LoginService};
#[cfg(test)]
pub use random_source::MockRandomSource;
pub use random_source::RandomSource;
#[cfg(test)]
pub use sleeper::MockSleeper;
pub use sleeper::Sleeper;
#[cfg(test)]
pub use token_store::MockSessionTokenStore;
pub use token_store::{InMemoryTokenStore, SessionTokenStore, TokenStoreError};
