use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::consensus::DiagnosticConsensus;
use super::enums::{AgentRole, ConversationStatus};

/// One consultation per case: the ordered specialist transcript plus the
/// synthesized consensus once the chain has run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: u64,
    pub case_id: u64,
    /// Invocation order: gp, cardiologist, research, diagnostician, then
    /// any follow-ups appended afterward.
    pub messages: Vec<AgentMessage>,
    pub status: ConversationStatus,
    pub consensus: Option<DiagnosticConsensus>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One specialist's contribution to a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentMessage {
    pub id: String,
    pub agent_type: AgentRole,
    pub agent_name: String,
    pub content: String,
    /// Model-reported, 0–100 expected but stored verbatim.
    pub confidence: i32,
    /// RFC 3339 instant the message was produced.
    pub timestamp: String,
    /// Wall-clock milliseconds spent in the model call.
    pub response_time: u64,
    pub references: Vec<String>,
}
