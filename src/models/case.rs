use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A patient case. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalCase {
    pub id: u64,
    pub patient_id: String,
    pub age: u32,
    pub gender: String,
    pub chief_complaint: String,
    pub symptoms_history: String,
    pub test_results: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Case fields supplied by the client when creating a case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMedicalCase {
    pub patient_id: String,
    pub age: u32,
    pub gender: String,
    pub chief_complaint: String,
    pub symptoms_history: String,
    #[serde(default)]
    pub test_results: Option<String>,
}
