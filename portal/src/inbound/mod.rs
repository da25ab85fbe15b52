//! Inbound adapters translating navigation requests and applicant scripts
//! into domain calls.
//!
//! Only path routing and scripted replay live here; rendering is left to
//! whichever shell embeds the portal.

pub mod routes;
pub mod script;

pub use routes::{Destination, View, resolve, resolve_path};
pub use script::{ApplicantScript, ScriptOutcome, ScriptServices, ScriptedDocument, run_script};
