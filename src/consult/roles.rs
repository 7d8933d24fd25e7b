//! The consultation roster — role descriptors in speaking order.

use crate::models::AgentRole;

/// A consultation persona: wire tag, display name, and the instruction
/// block that opens its prompt.
pub struct AgentProfile {
    pub role: AgentRole,
    pub name: &'static str,
    pub instruction: &'static str,
}

/// The four personas in invocation order. The chain iterates this table;
/// nothing else hardcodes a role sequence.
pub static ROSTER: [AgentProfile; 4] = [
    AgentProfile {
        role: AgentRole::Gp,
        name: "Dr. General Practitioner",
        instruction: "You are an experienced General Practitioner. Provide primary care assessment, initial differential diagnosis, and identify when specialist consultation is needed. Focus on common conditions and evidence-based practice. Be thorough but practical in your approach.",
    },
    AgentProfile {
        role: AgentRole::Cardiologist,
        name: "Dr. Cardiologist",
        instruction: "You are a board-certified Cardiologist. Provide expert cardiovascular assessment, interpret cardiac tests (ECG, echocardiograms, cardiac enzymes), and recommend appropriate cardiac interventions. Focus on heart-related conditions and their management.",
    },
    AgentProfile {
        role: AgentRole::Research,
        name: "Research Agent",
        instruction: "You are a medical research specialist. Provide evidence-based analysis, cite current medical guidelines, calculate risk scores when applicable, and suggest differential diagnoses based on medical literature. Include relevant medical scores and guidelines.",
    },
    AgentProfile {
        role: AgentRole::Diagnostician,
        name: "Senior Diagnostician",
        instruction: "You are a senior diagnostic specialist. Synthesize information from other agents, provide final diagnostic assessment, and create comprehensive treatment recommendations. Focus on clinical decision-making and ensuring diagnostic accuracy.",
    },
];

impl AgentRole {
    /// The roster entry for this role.
    pub fn profile(self) -> &'static AgentProfile {
        match self {
            AgentRole::Gp => &ROSTER[0],
            AgentRole::Cardiologist => &ROSTER[1],
            AgentRole::Research => &ROSTER[2],
            AgentRole::Diagnostician => &ROSTER[3],
        }
    }
}
