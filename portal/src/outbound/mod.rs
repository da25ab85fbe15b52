//! Outbound adapters implementing domain ports for the runtime environment.
//!
//! - **runtime**: Tokio sleeping and `rand`-backed randomness
//! - **autosave**: fire-and-forget autosave spawned on the ambient runtime
//! - **verification**: probabilistic document verifier
//! - **files**: cap-std backed token store and receipt writer
//! - **fixtures**: seeded applications for the admin board
//!
//! Adapters translate between ports and infrastructure; they hold no
//! enrolment rules.

pub mod autosave;
pub mod files;
pub mod fixtures;
pub mod runtime;
pub mod verification;

pub use autosave::SpawningAutosave;
pub use files::{FileTokenStore, ReceiptWriter};
pub use fixtures::fixture_applications;
pub use runtime::{SeededRandomSource, ThreadRandomSource, TokioSleeper};
pub use verification::SimulatedDocumentVerifier;
