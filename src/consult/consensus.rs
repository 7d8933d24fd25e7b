//! Consensus synthesis over the full chain transcript.

use crate::models::{AgentMessage, DiagnosticConsensus, EstimatedCosts, RiskAssessment, RiskLevel};

use super::gateway::{ChatModel, ModelRequest};
use super::parser::parse_consensus_reply;
use super::prompt::{render_consensus_transcript, CONSENSUS_SYSTEM_PROMPT};
use super::ConsultError;

/// Sampling temperature for the synthesis call.
const CONSENSUS_TEMPERATURE: f32 = 0.3;

/// Synthesize one diagnostic consensus from the transcript.
///
/// Total invocation or parse failure yields the fixed sentinel; it is
/// never retried.
pub async fn synthesize_consensus(
    model: &dyn ChatModel,
    messages: &[AgentMessage],
) -> DiagnosticConsensus {
    let request = ModelRequest {
        system: CONSENSUS_SYSTEM_PROMPT.to_string(),
        user: Some(render_consensus_transcript(messages)),
        temperature: CONSENSUS_TEMPERATURE,
    };

    let outcome = match model.generate(&request).await {
        Ok(raw) => parse_consensus_reply(&raw),
        Err(e) => Err(ConsultError::from(e)),
    };

    match outcome {
        Ok(consensus) => consensus,
        Err(e) => {
            tracing::warn!(error = %e, "Consensus synthesis failed, substituting sentinel");
            sentinel_consensus()
        }
    }
}

/// Fixed placeholder consensus for a synthesis that failed entirely.
pub fn sentinel_consensus() -> DiagnosticConsensus {
    DiagnosticConsensus {
        primary_diagnosis: "Consensus generation failed".to_string(),
        confidence: 0,
        agent_agreement: 0,
        immediate_actions: vec!["Retry consultation".to_string()],
        differential_diagnoses: Some(Vec::new()),
        risk_assessment: Some(RiskAssessment {
            level: RiskLevel::Medium,
            factors: vec!["Unable to assess risk due to system error".to_string()],
        }),
        follow_up_plan: Some(vec![
            "Retry consultation with additional information".to_string(),
        ]),
        estimated_costs: Some(EstimatedCosts {
            diagnostic: "Unable to estimate".to_string(),
            treatment: "Unable to estimate".to_string(),
        }),
    }
}
