//! In-memory case and conversation storage.
//!
//! Keyed maps behind a single mutex, with store-owned monotonic id
//! counters starting at 1. Records live for the process lifetime only;
//! updates replace whole records (last-writer-wins).

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use crate::models::{
    AgentMessage, Conversation, ConversationStatus, DiagnosticConsensus, MedicalCase,
    NewMedicalCase,
};

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Internal lock error")]
    LockPoisoned,
}

/// Partial update applied to a conversation.
///
/// Unset fields keep their current value; `updated_at` is always bumped.
#[derive(Debug, Default)]
pub struct ConversationPatch {
    pub messages: Option<Vec<AgentMessage>>,
    pub consensus: Option<DiagnosticConsensus>,
    pub status: Option<ConversationStatus>,
}

#[derive(Default)]
struct Inner {
    cases: HashMap<u64, MedicalCase>,
    conversations: HashMap<u64, Conversation>,
    next_case_id: u64,
    next_conversation_id: u64,
}

/// Process-lifetime store for cases and conversations.
pub struct MemStore {
    inner: Mutex<Inner>,
}

impl MemStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_case_id: 1,
                next_conversation_id: 1,
                ..Inner::default()
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Create a case, assigning the next id.
    pub fn create_case(&self, new_case: NewMedicalCase) -> Result<MedicalCase, StoreError> {
        let mut inner = self.lock()?;
        let id = inner.next_case_id;
        inner.next_case_id += 1;
        let case = MedicalCase {
            id,
            patient_id: new_case.patient_id,
            age: new_case.age,
            gender: new_case.gender,
            chief_complaint: new_case.chief_complaint,
            symptoms_history: new_case.symptoms_history,
            test_results: new_case.test_results,
            created_at: Utc::now(),
        };
        inner.cases.insert(id, case.clone());
        Ok(case)
    }

    pub fn case(&self, id: u64) -> Result<Option<MedicalCase>, StoreError> {
        Ok(self.lock()?.cases.get(&id).cloned())
    }

    /// All cases, ascending id.
    pub fn cases(&self) -> Result<Vec<MedicalCase>, StoreError> {
        let inner = self.lock()?;
        let mut cases: Vec<_> = inner.cases.values().cloned().collect();
        cases.sort_by_key(|c| c.id);
        Ok(cases)
    }

    /// Return the case's conversation, creating it if none exists yet.
    ///
    /// The check-and-insert happens under one lock, so a case can never
    /// end up with two conversations.
    pub fn get_or_create_conversation(&self, case_id: u64) -> Result<Conversation, StoreError> {
        let mut inner = self.lock()?;
        if let Some(existing) = inner
            .conversations
            .values()
            .find(|c| c.case_id == case_id)
            .cloned()
        {
            return Ok(existing);
        }
        let id = inner.next_conversation_id;
        inner.next_conversation_id += 1;
        let now = Utc::now();
        let conversation = Conversation {
            id,
            case_id,
            messages: Vec::new(),
            status: ConversationStatus::Active,
            consensus: None,
            created_at: now,
            updated_at: now,
        };
        inner.conversations.insert(id, conversation.clone());
        Ok(conversation)
    }

    pub fn conversation(&self, id: u64) -> Result<Option<Conversation>, StoreError> {
        Ok(self.lock()?.conversations.get(&id).cloned())
    }

    pub fn conversation_by_case(&self, case_id: u64) -> Result<Option<Conversation>, StoreError> {
        Ok(self
            .lock()?
            .conversations
            .values()
            .find(|c| c.case_id == case_id)
            .cloned())
    }

    /// Apply a patch to a conversation. Returns the updated record, or
    /// `None` if the id is unknown.
    pub fn update_conversation(
        &self,
        id: u64,
        patch: ConversationPatch,
    ) -> Result<Option<Conversation>, StoreError> {
        let mut inner = self.lock()?;
        let Some(conversation) = inner.conversations.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(messages) = patch.messages {
            conversation.messages = messages;
        }
        if let Some(consensus) = patch.consensus {
            conversation.consensus = Some(consensus);
        }
        if let Some(status) = patch.status {
            conversation.status = status;
        }
        conversation.updated_at = Utc::now();
        Ok(Some(conversation.clone()))
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}
