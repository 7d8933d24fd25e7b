//! The consultation pipeline — model gateway, role roster, prompt
//! assembly, defensive reply parsing, and the chain / consensus /
//! follow-up runners.

pub mod chain;
pub mod consensus;
pub mod followup;
pub mod gateway;
pub mod parser;
pub mod prompt;
pub mod roles;

use gateway::ModelError;

/// Errors from consultation orchestration.
#[derive(Debug, thiserror::Error)]
pub enum ConsultError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("Malformed model reply: {0}")]
    Reply(String),
}
