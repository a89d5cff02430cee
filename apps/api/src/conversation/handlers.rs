//! Route handlers for the conversation API.
//!
//! The assisted message handler is two-phase: classifiers and bookkeeping
//! run under the store's write lock, the model call runs with no lock held,
//! and the response is applied under the lock again, guarded by the message
//! sequence it was issued for.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::assisted::orchestrator::{handle_ai_response, resolve_unconfirmed, ResponseOutcome};
use crate::conversation::engine::{
    self, assisted_fallback_reply, handle_guided_back, handle_guided_message,
    prepare_assisted_turn, AssistedTurn, EngineReply,
};
use crate::conversation::session::{ConversationSession, Mode, UnconfirmedField};
use crate::errors::AppError;
use crate::flow::Category;
use crate::llm_client::LlmError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub mode: Mode,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "en".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCreated {
    pub session_id: Uuid,
    pub mode: Mode,
    #[serde(flatten)]
    pub reply: EngineReply,
}

#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub reply: EngineReply,
    pub unconfirmed: Vec<UnconfirmedField>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session_id: Uuid,
    pub mode: Mode,
    pub category: Category,
    pub complete: bool,
    pub record: Value,
    pub unconfirmed: Vec<UnconfirmedField>,
    pub missing_fields: Vec<&'static str>,
}

fn session_view(session: &ConversationSession) -> SessionView {
    SessionView {
        session_id: session.id,
        mode: session.mode(),
        category: session.category(),
        complete: session.is_complete(),
        record: session.record.data().clone(),
        unconfirmed: session.unconfirmed.clone(),
        missing_fields: session.record.missing_minimal_fields(),
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("session {id} not found"))
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<Json<SessionCreated>, AppError> {
    if req.language != "en" && req.language != "es" {
        return Err(AppError::Validation(
            "language must be 'en' or 'es'".to_string(),
        ));
    }
    let mut session = ConversationSession::new(req.mode, &req.language);
    let reply = engine::greeting(&mut session);
    let session_id = session.id;
    state.store.insert(session).await;
    tracing::info!("session {session_id} created ({:?})", req.mode);
    Ok(Json(SessionCreated {
        session_id,
        mode: req.mode,
        reply,
    }))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.store.get(id).await.ok_or_else(|| not_found(id))?;
    Ok(Json(session_view(&session)))
}

/// POST /api/v1/sessions/:id/messages
pub async fn handle_post_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<PostMessageRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let text = req.text.trim().to_string();
    if text.is_empty() {
        return Err(AppError::Validation("message text is empty".to_string()));
    }

    let mode = state
        .store
        .get(id)
        .await
        .ok_or_else(|| not_found(id))?
        .mode();

    let reply = match mode {
        Mode::Guided => state
            .store
            .update(id, |s| handle_guided_message(s, &text))
            .await
            .ok_or_else(|| not_found(id))?,
        Mode::Assisted => handle_assisted_message(&state, id, &text).await?,
    };

    let unconfirmed = state
        .store
        .get(id)
        .await
        .map(|s| s.unconfirmed)
        .unwrap_or_default();

    Ok(Json(MessageResponse {
        session_id: id,
        reply,
        unconfirmed,
    }))
}

async fn handle_assisted_message(
    state: &AppState,
    id: Uuid,
    text: &str,
) -> Result<EngineReply, AppError> {
    let turn = state
        .store
        .update(id, |s| prepare_assisted_turn(s, text))
        .await
        .ok_or_else(|| not_found(id))?;

    let (request, seq) = match turn {
        AssistedTurn::Scripted(reply) => return Ok(reply),
        AssistedTurn::NeedsExtraction { request, seq } => (request, seq),
    };

    // model call with no session lock held
    match state.extractor.extract(&request).await {
        Ok(response) => {
            let message = response.assistant_message.clone();
            let (outcome, category, complete) = state
                .store
                .update(id, |s| {
                    let outcome = handle_ai_response(s, response, seq);
                    (outcome, s.category(), s.is_complete())
                })
                .await
                .ok_or_else(|| not_found(id))?;
            match outcome {
                ResponseOutcome::Applied => Ok(EngineReply {
                    message,
                    question_id: None,
                    category,
                    complete,
                }),
                ResponseOutcome::Stale => {
                    // a newer message superseded this one; surface whatever
                    // the newer turn said instead
                    tracing::debug!("session {id}: stale extraction for seq {seq} dropped");
                    let session = state.store.get(id).await.ok_or_else(|| not_found(id))?;
                    let message = session
                        .transcript
                        .iter()
                        .rev()
                        .find(|t| t.role == "assistant")
                        .map(|t| t.content.clone())
                        .unwrap_or_default();
                    Ok(EngineReply {
                        message,
                        question_id: None,
                        category: session.category(),
                        complete: session.is_complete(),
                    })
                }
            }
        }
        Err(e) if e.recoverable() => {
            tracing::warn!("session {id}: extraction failed, degrading: {e}");
            let rate_limited = matches!(
                e,
                LlmError::RateLimited { .. } | LlmError::Api { status: 429, .. }
            );
            state
                .store
                .update(id, |s| assisted_fallback_reply(s, rate_limited))
                .await
                .ok_or_else(|| not_found(id))
        }
        Err(e) => Err(AppError::Llm(e)),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmFieldRequest {
    pub path: String,
    pub accept: bool,
}

/// POST /api/v1/sessions/:id/confirm
pub async fn handle_confirm_field(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ConfirmFieldRequest>,
) -> Result<Json<SessionView>, AppError> {
    let resolved = state
        .store
        .update(id, |s| resolve_unconfirmed(s, &req.path, req.accept))
        .await
        .ok_or_else(|| not_found(id))?;
    if !resolved {
        return Err(AppError::NotFound(format!(
            "no pending field at path '{}'",
            req.path
        )));
    }
    let session = state.store.get(id).await.ok_or_else(|| not_found(id))?;
    Ok(Json(session_view(&session)))
}

/// POST /api/v1/sessions/:id/back
pub async fn handle_back(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let session = state.store.get(id).await.ok_or_else(|| not_found(id))?;
    if session.mode() != Mode::Guided {
        return Err(AppError::Validation(
            "back navigation is only available in guided mode".to_string(),
        ));
    }
    let reply = state
        .store
        .update(id, handle_guided_back)
        .await
        .ok_or_else(|| not_found(id))?;
    let unconfirmed = state
        .store
        .get(id)
        .await
        .map(|s| s.unconfirmed)
        .unwrap_or_default();
    Ok(Json(MessageResponse {
        session_id: id,
        reply,
        unconfirmed,
    }))
}
