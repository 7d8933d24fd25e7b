//! Conversation lifecycle endpoints.
//!
//! - `POST /api/conversations` — get-or-create for a case
//! - `GET /api/conversations/:id`, `GET /api/conversations/case/:case_id`
//! - `POST /api/conversations/:id/start` — run the full consultation
//! - `POST /api/conversations/:id/message` — follow-up question

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::consult::{chain, consensus, followup};
use crate::models::{Conversation, ConversationStatus};
use crate::store::ConversationPatch;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConversationRequest {
    pub case_id: u64,
}

#[derive(Deserialize)]
pub struct FollowUpRequest {
    pub message: String,
}

/// `POST /api/conversations` — return the case's conversation, creating
/// it if none exists. Idempotent per case.
pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<CreateConversationRequest>, JsonRejection>,
) -> Result<Json<Conversation>, ApiError> {
    let Json(req) =
        payload.map_err(|_| ApiError::BadRequest("Invalid conversation data".into()))?;

    if ctx.store.case(req.case_id)?.is_none() {
        return Err(ApiError::NotFound("Case not found".into()));
    }

    let conversation = ctx.store.get_or_create_conversation(req.case_id)?;
    Ok(Json(conversation))
}

/// `GET /api/conversations/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<u64>,
) -> Result<Json<Conversation>, ApiError> {
    let conversation = ctx
        .store
        .conversation(id)?
        .ok_or_else(|| ApiError::NotFound("Conversation not found".into()))?;
    Ok(Json(conversation))
}

/// `GET /api/conversations/case/:case_id`
pub async fn by_case(
    State(ctx): State<ApiContext>,
    Path(case_id): Path<u64>,
) -> Result<Json<Conversation>, ApiError> {
    let conversation = ctx
        .store
        .conversation_by_case(case_id)?
        .ok_or_else(|| ApiError::NotFound("Conversation not found".into()))?;
    Ok(Json(conversation))
}

/// `POST /api/conversations/:id/start` — run the four-role chain and the
/// consensus synthesis, then mark the conversation completed.
///
/// The whole sequence runs within this request; each model round trip
/// completes before the next begins.
pub async fn start(
    State(ctx): State<ApiContext>,
    Path(id): Path<u64>,
) -> Result<Json<Conversation>, ApiError> {
    let conversation = ctx
        .store
        .conversation(id)?
        .ok_or_else(|| ApiError::NotFound("Conversation not found".into()))?;
    let case = ctx
        .store
        .case(conversation.case_id)?
        .ok_or_else(|| ApiError::NotFound("Case not found".into()))?;

    tracing::info!(conversation_id = id, case_id = case.id, "Starting consultation");
    let messages = chain::run_chain(ctx.model.as_ref(), &case).await;
    let consensus = consensus::synthesize_consensus(ctx.model.as_ref(), &messages).await;

    let updated = ctx
        .store
        .update_conversation(
            id,
            ConversationPatch {
                messages: Some(messages),
                consensus: Some(consensus),
                status: Some(ConversationStatus::Completed),
            },
        )?
        .ok_or_else(|| ApiError::Internal("Failed to start consultation".into()))?;

    Ok(Json(updated))
}

/// `POST /api/conversations/:id/message` — append one follow-up answer.
///
/// Model or parse failure surfaces as a 500 and leaves the conversation
/// unmodified.
pub async fn message(
    State(ctx): State<ApiContext>,
    Path(id): Path<u64>,
    payload: Result<Json<FollowUpRequest>, JsonRejection>,
) -> Result<Json<Conversation>, ApiError> {
    let Json(req) = payload.map_err(|_| ApiError::BadRequest("Invalid message data".into()))?;
    if req.message.trim().is_empty() {
        return Err(ApiError::BadRequest("Message cannot be empty".into()));
    }

    let conversation = ctx
        .store
        .conversation(id)?
        .ok_or_else(|| ApiError::NotFound("Conversation not found".into()))?;
    if ctx.store.case(conversation.case_id)?.is_none() {
        return Err(ApiError::NotFound("Case not found".into()));
    }

    let reply = followup::answer_follow_up(
        ctx.model.as_ref(),
        &conversation.messages,
        req.message.trim(),
    )
    .await
    .map_err(|e| {
        tracing::error!(conversation_id = id, error = %e, "Follow-up generation failed");
        ApiError::Internal("Failed to add follow-up message".into())
    })?;

    let mut messages = conversation.messages;
    messages.push(reply);

    let updated = ctx
        .store
        .update_conversation(
            id,
            ConversationPatch {
                messages: Some(messages),
                ..ConversationPatch::default()
            },
        )?
        .ok_or_else(|| ApiError::Internal("Failed to add follow-up message".into()))?;

    Ok(Json(updated))
}
