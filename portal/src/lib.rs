//! University enrolment portal core.
//!
//! The [`domain`] module holds the wizard, validators, upload and submission
//! simulators, session and admin board; [`outbound`] implements the domain
//! ports; [`inbound`] resolves request paths into views.

pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use settings::PortalSettings;
