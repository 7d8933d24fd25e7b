//! Defensive parsing of model replies.
//!
//! One parse function per reply kind; every optional field has an
//! explicit default substituted here, so the defaulting policy stays
//! auditable and testable without the network. Confidence values are
//! truncated to i32 but never clamped to 0–100.

use serde::Deserialize;
use serde_json::Value;

use crate::models::{DiagnosticConsensus, EstimatedCosts, RiskAssessment, RiskLevel};

use super::ConsultError;

/// A specialist's parsed chain reply.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentReply {
    pub assessment: String,
    pub confidence: i32,
    pub key_points: Vec<String>,
}

/// The diagnostician's parsed follow-up reply.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowUpReply {
    pub response: String,
    pub confidence: i32,
    pub additional_recommendations: Vec<String>,
}

#[derive(Deserialize)]
struct RawAgentReply {
    assessment: Option<String>,
    confidence: Option<f64>,
    key_points: Option<Vec<Value>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConsensusReply {
    primary_diagnosis: Option<String>,
    confidence: Option<f64>,
    agent_agreement: Option<f64>,
    immediate_actions: Option<Vec<Value>>,
    differential_diagnoses: Option<Vec<Value>>,
    risk_assessment: Option<Value>,
    follow_up_plan: Option<Vec<Value>>,
    estimated_costs: Option<Value>,
}

#[derive(Deserialize)]
struct RawFollowUpReply {
    response: Option<String>,
    confidence: Option<f64>,
    additional_recommendations: Option<Vec<Value>>,
}

/// Parse a specialist reply. Defaults: assessment "No assessment
/// provided", confidence 75, key_points [].
pub fn parse_agent_reply(raw: &str) -> Result<AgentReply, ConsultError> {
    let reply: RawAgentReply =
        serde_json::from_str(raw).map_err(|e| ConsultError::Reply(e.to_string()))?;

    Ok(AgentReply {
        assessment: reply
            .assessment
            .unwrap_or_else(|| "No assessment provided".to_string()),
        confidence: reply.confidence.map(|c| c as i32).unwrap_or(75),
        key_points: string_items(reply.key_points),
    })
}

/// Parse a consensus reply, substituting the documented default for
/// every absent field. Sub-objects that fail to deserialize are treated
/// as absent.
pub fn parse_consensus_reply(raw: &str) -> Result<DiagnosticConsensus, ConsultError> {
    let reply: RawConsensusReply =
        serde_json::from_str(raw).map_err(|e| ConsultError::Reply(e.to_string()))?;

    let risk_assessment = reply
        .risk_assessment
        .and_then(|v| serde_json::from_value::<RiskAssessment>(v).ok())
        .unwrap_or_else(default_risk_assessment);
    let estimated_costs = reply
        .estimated_costs
        .and_then(|v| serde_json::from_value::<EstimatedCosts>(v).ok())
        .unwrap_or_else(default_estimated_costs);

    Ok(DiagnosticConsensus {
        primary_diagnosis: reply
            .primary_diagnosis
            .unwrap_or_else(|| "Unable to determine primary diagnosis".to_string()),
        confidence: reply.confidence.map(|c| c as i32).unwrap_or(50),
        agent_agreement: reply.agent_agreement.map(|c| c as i32).unwrap_or(0),
        immediate_actions: string_items(reply.immediate_actions),
        differential_diagnoses: Some(string_items(reply.differential_diagnoses)),
        risk_assessment: Some(risk_assessment),
        follow_up_plan: Some(string_items(reply.follow_up_plan)),
        estimated_costs: Some(estimated_costs),
    })
}

/// Parse a follow-up reply. Defaults: response "Unable to provide
/// response", confidence 75, additional_recommendations [].
pub fn parse_follow_up_reply(raw: &str) -> Result<FollowUpReply, ConsultError> {
    let reply: RawFollowUpReply =
        serde_json::from_str(raw).map_err(|e| ConsultError::Reply(e.to_string()))?;

    Ok(FollowUpReply {
        response: reply
            .response
            .unwrap_or_else(|| "Unable to provide response".to_string()),
        confidence: reply.confidence.map(|c| c as i32).unwrap_or(75),
        additional_recommendations: string_items(reply.additional_recommendations),
    })
}

fn default_risk_assessment() -> RiskAssessment {
    RiskAssessment {
        level: RiskLevel::Medium,
        factors: vec!["Insufficient data for risk assessment".to_string()],
    }
}

fn default_estimated_costs() -> EstimatedCosts {
    EstimatedCosts {
        diagnostic: "Cost analysis not available".to_string(),
        treatment: "Cost analysis not available".to_string(),
    }
}

/// Keep only the string items of a model-supplied array.
fn string_items(items: Option<Vec<Value>>) -> Vec<String> {
    items
        .map(|arr| {
            arr.into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_reply_full_parse() {
        let raw = r#"{
            "assessment": "Likely stable angina",
            "confidence": 82,
            "key_points": ["Exertional pattern", "Relieved by rest"],
            "recommendations": ["Stress test"]
        }"#;
        let reply = parse_agent_reply(raw).unwrap();
        assert_eq!(reply.assessment, "Likely stable angina");
        assert_eq!(reply.confidence, 82);
        assert_eq!(reply.key_points, vec!["Exertional pattern", "Relieved by rest"]);
    }

    #[test]
    fn agent_reply_defaults_for_missing_fields() {
        let reply = parse_agent_reply("{}").unwrap();
        assert_eq!(reply.assessment, "No assessment provided");
        assert_eq!(reply.confidence, 75);
        assert!(reply.key_points.is_empty());
    }

    #[test]
    fn agent_reply_confidence_not_clamped() {
        let reply = parse_agent_reply(r#"{"confidence": 250}"#).unwrap();
        assert_eq!(reply.confidence, 250);
        let reply = parse_agent_reply(r#"{"confidence": -5}"#).unwrap();
        assert_eq!(reply.confidence, -5);
    }

    #[test]
    fn agent_reply_fractional_confidence_truncates() {
        let reply = parse_agent_reply(r#"{"confidence": 85.9}"#).unwrap();
        assert_eq!(reply.confidence, 85);
    }

    #[test]
    fn agent_reply_non_json_is_an_error() {
        assert!(parse_agent_reply("I think the patient has angina.").is_err());
    }

    #[test]
    fn agent_reply_keeps_only_string_key_points() {
        let raw = r#"{"key_points": ["valid", 42, null, "also valid"]}"#;
        let reply = parse_agent_reply(raw).unwrap();
        assert_eq!(reply.key_points, vec!["valid", "also valid"]);
    }

    #[test]
    fn consensus_full_parse() {
        let raw = r#"{
            "primaryDiagnosis": "Acute coronary syndrome",
            "confidence": 91,
            "agentAgreement": 4,
            "immediateActions": ["Admit", "Serial troponins"],
            "differentialDiagnoses": ["Pericarditis"],
            "riskAssessment": {"level": "high", "factors": ["Age", "History"]},
            "followUpPlan": ["Cardiology clinic in 2 weeks"],
            "estimatedCosts": {"diagnostic": "~$2,000", "treatment": "Varies"}
        }"#;
        let consensus = parse_consensus_reply(raw).unwrap();
        assert_eq!(consensus.primary_diagnosis, "Acute coronary syndrome");
        assert_eq!(consensus.confidence, 91);
        assert_eq!(consensus.agent_agreement, 4);
        assert_eq!(consensus.immediate_actions.len(), 2);
        let risk = consensus.risk_assessment.unwrap();
        assert_eq!(risk.level, RiskLevel::High);
        assert_eq!(consensus.estimated_costs.unwrap().diagnostic, "~$2,000");
    }

    #[test]
    fn consensus_defaults_for_empty_object() {
        let consensus = parse_consensus_reply("{}").unwrap();
        assert_eq!(consensus.primary_diagnosis, "Unable to determine primary diagnosis");
        assert_eq!(consensus.confidence, 50);
        assert_eq!(consensus.agent_agreement, 0);
        assert!(consensus.immediate_actions.is_empty());
        assert_eq!(consensus.differential_diagnoses, Some(vec![]));

        let risk = consensus.risk_assessment.unwrap();
        assert_eq!(risk.level, RiskLevel::Medium);
        assert_eq!(risk.factors, vec!["Insufficient data for risk assessment"]);

        let costs = consensus.estimated_costs.unwrap();
        assert_eq!(costs.diagnostic, "Cost analysis not available");
        assert_eq!(costs.treatment, "Cost analysis not available");
    }

    #[test]
    fn consensus_malformed_risk_object_falls_back_to_default() {
        let raw = r#"{"riskAssessment": {"level": "catastrophic"}}"#;
        let consensus = parse_consensus_reply(raw).unwrap();
        let risk = consensus.risk_assessment.unwrap();
        assert_eq!(risk.level, RiskLevel::Medium);
    }

    #[test]
    fn consensus_invalid_json_is_an_error() {
        assert!(parse_consensus_reply("{not json").is_err());
    }

    #[test]
    fn follow_up_full_parse() {
        let raw = r#"{
            "response": "A repeat ECG is reasonable.",
            "confidence": 88,
            "additional_recommendations": ["Repeat in 6 hours"]
        }"#;
        let reply = parse_follow_up_reply(raw).unwrap();
        assert_eq!(reply.response, "A repeat ECG is reasonable.");
        assert_eq!(reply.confidence, 88);
        assert_eq!(reply.additional_recommendations, vec!["Repeat in 6 hours"]);
    }

    #[test]
    fn follow_up_defaults_for_missing_fields() {
        let reply = parse_follow_up_reply("{}").unwrap();
        assert_eq!(reply.response, "Unable to provide response");
        assert_eq!(reply.confidence, 75);
        assert!(reply.additional_recommendations.is_empty());
    }
}
