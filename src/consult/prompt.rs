//! Prompt assembly for the consultation pipeline.
//!
//! Pure functions of the case, the transcript so far, and the role
//! descriptors. A role's prompt only ever contains messages produced
//! before it — callers pass the transcript as it stood at that point.

use crate::models::{AgentMessage, MedicalCase};

use super::roles::AgentProfile;

/// Preamble appended to every specialist instruction block.
const MULTI_AGENT_PREAMBLE: &str = "You are participating in a multi-agent medical consultation. Other specialists will also provide their input.";

/// JSON shape every specialist is instructed to reply with.
const AGENT_REPLY_FORMAT: &str = r#"Provide your professional assessment in JSON format with the following structure:
{
  "assessment": "Your detailed clinical assessment and recommendations",
  "confidence": 85,
  "key_points": ["point1", "point2", "point3"],
  "recommendations": ["rec1", "rec2"]
}"#;

/// System instruction for the consensus synthesis call.
pub const CONSENSUS_SYSTEM_PROMPT: &str = r#"Analyze the following medical agent responses and create a comprehensive diagnostic consensus. Provide a JSON response with the following structure:
{
  "primaryDiagnosis": "Most likely diagnosis",
  "confidence": 90,
  "agentAgreement": 4,
  "immediateActions": ["action1", "action2"],
  "differentialDiagnoses": ["diff1", "diff2"],
  "riskAssessment": {
    "level": "high",
    "factors": ["factor1", "factor2"]
  },
  "followUpPlan": ["followup1", "followup2"],
  "estimatedCosts": {
    "diagnostic": "Estimated diagnostic costs and procedures",
    "treatment": "Estimated treatment costs and timeline"
  }
}"#;

/// JSON shape the diagnostician is instructed to answer follow-ups with.
const FOLLOW_UP_REPLY_FORMAT: &str = r#"Provide a JSON response addressing the follow-up question:
{
  "response": "Your response to the follow-up question",
  "confidence": 85,
  "additional_recommendations": ["rec1", "rec2"]
}"#;

/// Build a specialist's full prompt: instruction block, preamble, case
/// rendering, prior responses in order, reply-format instruction.
pub fn build_agent_prompt(
    profile: &AgentProfile,
    case: &MedicalCase,
    prior: &[AgentMessage],
) -> String {
    let mut prompt = String::new();
    prompt.push_str(profile.instruction);
    prompt.push_str("\n\n");
    prompt.push_str(MULTI_AGENT_PREAMBLE);
    prompt.push_str("\n\n");
    prompt.push_str(&render_case(case));
    prompt.push_str("\n\nPrevious agent responses:\n");
    prompt.push_str(&render_transcript(prior));
    prompt.push_str("\n\n");
    prompt.push_str(AGENT_REPLY_FORMAT);
    prompt
}

/// User turn for the consensus call: each message's name, confidence,
/// and content, in order.
pub fn render_consensus_transcript(messages: &[AgentMessage]) -> String {
    let rendered = messages
        .iter()
        .map(|m| format!("{} (Confidence: {}%): {}", m.agent_name, m.confidence, m.content))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("Agent Responses:\n{rendered}")
}

/// Build the diagnostician's follow-up prompt from the full transcript
/// and the new question.
pub fn build_follow_up_prompt(
    profile: &AgentProfile,
    transcript: &[AgentMessage],
    question: &str,
) -> String {
    let mut prompt = String::new();
    prompt.push_str(profile.instruction);
    prompt.push_str("\n\nPrevious conversation context:\n");
    prompt.push_str(&render_transcript(transcript));
    prompt.push_str(&format!("\n\nFollow-up question: {question}\n\n"));
    prompt.push_str(FOLLOW_UP_REPLY_FORMAT);
    prompt
}

fn render_case(case: &MedicalCase) -> String {
    format!(
        "Case Information:\n\
         - Patient ID: {}\n\
         - Age: {}\n\
         - Gender: {}\n\
         - Chief Complaint: {}\n\
         - Symptoms & History: {}\n\
         - Test Results: {}",
        case.patient_id,
        case.age,
        case.gender,
        case.chief_complaint,
        case.symptoms_history,
        case.test_results.as_deref().unwrap_or("None provided"),
    )
}

fn render_transcript(messages: &[AgentMessage]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.agent_name, m.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AgentRole;
    use chrono::Utc;

    fn sample_case() -> MedicalCase {
        MedicalCase {
            id: 1,
            patient_id: "P-1".into(),
            age: 45,
            gender: "Female".into(),
            chief_complaint: "chest pain".into(),
            symptoms_history: "intermittent for two days".into(),
            test_results: None,
            created_at: Utc::now(),
        }
    }

    fn message(name: &str, content: &str, confidence: i32) -> AgentMessage {
        AgentMessage {
            id: format!("{name}-1"),
            agent_type: AgentRole::Gp,
            agent_name: name.into(),
            content: content.into(),
            confidence,
            timestamp: Utc::now().to_rfc3339(),
            response_time: 0,
            references: vec![],
        }
    }

    #[test]
    fn agent_prompt_contains_instruction_and_case_fields() {
        let profile = AgentRole::Gp.profile();
        let prompt = build_agent_prompt(profile, &sample_case(), &[]);

        assert!(prompt.starts_with(profile.instruction));
        assert!(prompt.contains("multi-agent medical consultation"));
        assert!(prompt.contains("Patient ID: P-1"));
        assert!(prompt.contains("Age: 45"));
        assert!(prompt.contains("Chief Complaint: chest pain"));
        assert!(prompt.contains("\"assessment\""));
        assert!(prompt.contains("\"key_points\""));
    }

    #[test]
    fn missing_test_results_render_as_none_provided() {
        let prompt = build_agent_prompt(AgentRole::Gp.profile(), &sample_case(), &[]);
        assert!(prompt.contains("Test Results: None provided"));

        let mut case = sample_case();
        case.test_results = Some("Troponin negative".into());
        let prompt = build_agent_prompt(AgentRole::Gp.profile(), &case, &[]);
        assert!(prompt.contains("Test Results: Troponin negative"));
    }

    #[test]
    fn prior_responses_appear_in_order() {
        let prior = vec![
            message("Dr. General Practitioner", "First opinion", 80),
            message("Dr. Cardiologist", "Second opinion", 85),
        ];
        let prompt = build_agent_prompt(AgentRole::Research.profile(), &sample_case(), &prior);

        let first = prompt.find("Dr. General Practitioner: First opinion").unwrap();
        let second = prompt.find("Dr. Cardiologist: Second opinion").unwrap();
        assert!(first < second);
    }

    #[test]
    fn consensus_transcript_embeds_confidence() {
        let messages = vec![
            message("Dr. General Practitioner", "Opinion A", 80),
            message("Research Agent", "Opinion B", 65),
        ];
        let transcript = render_consensus_transcript(&messages);
        assert!(transcript.starts_with("Agent Responses:"));
        assert!(transcript.contains("Dr. General Practitioner (Confidence: 80%): Opinion A"));
        assert!(transcript.contains("Research Agent (Confidence: 65%): Opinion B"));
    }

    #[test]
    fn consensus_prompt_names_every_consensus_field() {
        for field in [
            "primaryDiagnosis",
            "agentAgreement",
            "immediateActions",
            "differentialDiagnoses",
            "riskAssessment",
            "followUpPlan",
            "estimatedCosts",
        ] {
            assert!(CONSENSUS_SYSTEM_PROMPT.contains(field), "missing {field}");
        }
    }

    #[test]
    fn follow_up_prompt_contains_context_and_question() {
        let transcript = vec![message("Senior Diagnostician", "Initial verdict", 90)];
        let prompt = build_follow_up_prompt(
            AgentRole::Diagnostician.profile(),
            &transcript,
            "Should we repeat the ECG?",
        );

        assert!(prompt.contains("Previous conversation context:"));
        assert!(prompt.contains("Senior Diagnostician: Initial verdict"));
        assert!(prompt.contains("Follow-up question: Should we repeat the ECG?"));
        assert!(prompt.contains("additional_recommendations"));
    }
}
