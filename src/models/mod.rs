pub mod case;
pub mod consensus;
pub mod conversation;
pub mod enums;

pub use case::{MedicalCase, NewMedicalCase};
pub use consensus::{DiagnosticConsensus, EstimatedCosts, RiskAssessment};
pub use conversation::{AgentMessage, Conversation};
pub use enums::{AgentRole, ConversationStatus, RiskLevel};
