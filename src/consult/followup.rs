//! Follow-up questions, answered by the senior diagnostician over the
//! full prior transcript.
//!
//! Unlike the chain, there is no fallback substitution here: a failed
//! invocation or parse propagates to the caller and the conversation is
//! left unmodified.

use std::time::Instant;

use chrono::Utc;
use uuid::Uuid;

use crate::models::{AgentMessage, AgentRole};

use super::chain::CONSULT_TEMPERATURE;
use super::gateway::{ChatModel, ModelRequest};
use super::parser::parse_follow_up_reply;
use super::prompt::build_follow_up_prompt;
use super::ConsultError;

/// Answer one follow-up question in the diagnostician role.
pub async fn answer_follow_up(
    model: &dyn ChatModel,
    transcript: &[AgentMessage],
    question: &str,
) -> Result<AgentMessage, ConsultError> {
    let profile = AgentRole::Diagnostician.profile();
    let request = ModelRequest {
        system: build_follow_up_prompt(profile, transcript, question),
        user: None,
        temperature: CONSULT_TEMPERATURE,
    };

    let started = Instant::now();
    let raw = model.generate(&request).await?;
    let reply = parse_follow_up_reply(&raw)?;

    Ok(AgentMessage {
        id: format!("followup-{}", Uuid::new_v4()),
        agent_type: profile.role,
        agent_name: profile.name.to_string(),
        content: reply.response,
        confidence: reply.confidence,
        timestamp: Utc::now().to_rfc3339(),
        response_time: started.elapsed().as_millis() as u64,
        references: reply.additional_recommendations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consult::gateway::MockChatModel;

    fn transcript() -> Vec<AgentMessage> {
        vec![AgentMessage {
            id: "diagnostician-1".into(),
            agent_type: AgentRole::Diagnostician,
            agent_name: "Senior Diagnostician".into(),
            content: "Initial verdict".into(),
            confidence: 90,
            timestamp: Utc::now().to_rfc3339(),
            response_time: 100,
            references: vec![],
        }]
    }

    #[tokio::test]
    async fn successful_follow_up_builds_a_diagnostician_message() {
        let reply = serde_json::json!({
            "response": "Yes, repeat the ECG.",
            "confidence": 88,
            "additional_recommendations": ["Repeat in 6 hours"]
        })
        .to_string();
        let model = MockChatModel::fixed(&reply);

        let message = answer_follow_up(&model, &transcript(), "Repeat the ECG?")
            .await
            .unwrap();

        assert!(message.id.starts_with("followup-"));
        assert_eq!(message.agent_type, AgentRole::Diagnostician);
        assert_eq!(message.agent_name, "Senior Diagnostician");
        assert_eq!(message.content, "Yes, repeat the ECG.");
        assert_eq!(message.confidence, 88);
        assert_eq!(message.references, vec!["Repeat in 6 hours"]);
    }

    #[tokio::test]
    async fn prompt_includes_transcript_and_question() {
        let model = MockChatModel::fixed("{}");
        let _ = answer_follow_up(&model, &transcript(), "What next?").await;

        let requests = model.requests();
        assert!(requests[0].system.contains("Senior Diagnostician: Initial verdict"));
        assert!(requests[0].system.contains("Follow-up question: What next?"));
    }

    #[tokio::test]
    async fn invocation_failure_propagates() {
        let model = MockChatModel::failing();
        let result = answer_follow_up(&model, &transcript(), "What next?").await;
        assert!(matches!(result, Err(ConsultError::Model(_))));
    }

    #[tokio::test]
    async fn unparseable_reply_propagates() {
        let model = MockChatModel::fixed("plain text, no JSON");
        let result = answer_follow_up(&model, &transcript(), "What next?").await;
        assert!(matches!(result, Err(ConsultError::Reply(_))));
    }
}
