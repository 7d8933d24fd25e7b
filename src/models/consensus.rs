use serde::{Deserialize, Serialize};

use super::enums::RiskLevel;

/// The synthesized diagnostic summary derived from all chain outputs.
///
/// Optional fields are filled with documented defaults by the reply
/// parser, so a consensus attached after synthesis always carries all
/// of them; `None` only occurs on hand-built records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticConsensus {
    pub primary_diagnosis: String,
    pub confidence: i32,
    /// How many of the four specialists agree with the primary diagnosis.
    pub agent_agreement: i32,
    pub immediate_actions: Vec<String>,
    pub differential_diagnoses: Option<Vec<String>>,
    pub risk_assessment: Option<RiskAssessment>,
    pub follow_up_plan: Option<Vec<String>>,
    pub estimated_costs: Option<EstimatedCosts>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub factors: Vec<String>,
}

/// Free-text cost estimates for the diagnostic workup and treatment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimatedCosts {
    pub diagnostic: String,
    pub treatment: String,
}
