// src/routes/chat.rs
use axum::{Json, extract::State, extract::rejection::JsonRejection};
use tracing::info;

use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse},
    services::tutor,
    state::SharedState,
};

/// `POST /chat`: validate, build the age-tailored system prompt, make exactly
/// one completion call, hand the model's text back verbatim.
pub async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    // Lenient body handling: an unreadable or non-JSON body validates as empty
    // input, so the caller always gets the `{"error": ...}` shape.
    let Json(payload) = payload.unwrap_or_else(|_| Json(ChatRequest::default()));
    let chat = payload.validate()?;

    info!(age = chat.age, "handling chat request");

    let system_prompt = tutor::system_prompt(chat.age);
    let reply = state.completion.complete(&system_prompt, &chat.message).await?;

    Ok(Json(ChatResponse { reply }))
}
