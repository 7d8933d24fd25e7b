//! The agent chain — four specialists invoked in roster order.
//!
//! A failed invocation never aborts the chain: the role gets a fallback
//! message and later specialists see that fallback as context.

use std::time::Instant;

use chrono::Utc;
use uuid::Uuid;

use crate::models::{AgentMessage, MedicalCase};

use super::gateway::{ChatModel, ModelRequest};
use super::parser::parse_agent_reply;
use super::prompt::build_agent_prompt;
use super::roles::{AgentProfile, ROSTER};
use super::ConsultError;

/// Sampling temperature for specialist and follow-up calls.
pub(crate) const CONSULT_TEMPERATURE: f32 = 0.7;

/// Content of the placeholder substituted for a failed specialist.
pub const FALLBACK_CONTENT: &str =
    "Unable to generate response at this time. Please try again.";

/// Run the full consultation for one case.
///
/// Always returns exactly `ROSTER.len()` messages in roster order, one
/// per specialist, each carrying its wall-clock response time.
pub async fn run_chain(model: &dyn ChatModel, case: &MedicalCase) -> Vec<AgentMessage> {
    let mut messages = Vec::with_capacity(ROSTER.len());

    for profile in &ROSTER {
        let prompt = build_agent_prompt(profile, case, &messages);
        let request = ModelRequest {
            system: prompt,
            user: None,
            temperature: CONSULT_TEMPERATURE,
        };
        let started = Instant::now();

        let outcome = match model.generate(&request).await {
            Ok(raw) => parse_agent_reply(&raw),
            Err(e) => Err(ConsultError::from(e)),
        };

        let message = match outcome {
            Ok(reply) => AgentMessage {
                id: message_id(profile),
                agent_type: profile.role,
                agent_name: profile.name.to_string(),
                content: reply.assessment,
                confidence: reply.confidence,
                timestamp: Utc::now().to_rfc3339(),
                response_time: started.elapsed().as_millis() as u64,
                references: reply.key_points,
            },
            Err(e) => {
                tracing::warn!(
                    role = %profile.role,
                    error = %e,
                    "Specialist reply failed, substituting fallback"
                );
                fallback_message(profile)
            }
        };
        messages.push(message);
    }

    messages
}

/// Placeholder message for a specialist whose invocation or parse failed.
pub fn fallback_message(profile: &AgentProfile) -> AgentMessage {
    AgentMessage {
        id: message_id(profile),
        agent_type: profile.role,
        agent_name: profile.name.to_string(),
        content: FALLBACK_CONTENT.to_string(),
        confidence: 0,
        timestamp: Utc::now().to_rfc3339(),
        response_time: 0,
        references: Vec::new(),
    }
}

fn message_id(profile: &AgentProfile) -> String {
    format!("{}-{}", profile.role, Uuid::new_v4())
}
