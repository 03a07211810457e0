use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{dto::MessageResponse, extractors::AuthUser, policy},
    contact::{
        dto::{ContactRequest, MessageListResponse, MessageView},
        repo::{self, NewMessage},
    },
    error::ApiError,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/contact", post(submit).get(inbox))
}

/// Public endpoint behind the contact form and the report-listing dialog.
#[instrument(skip(state, payload))]
pub async fn submit(
    State(state): State<AppState>,
    Json(payload): Json<ContactRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let name = payload.name.trim();
    let email = payload.email.trim();
    let subject = payload.subject.trim();
    let message = payload.message.trim();
    if name.is_empty() || email.is_empty() || subject.is_empty() || message.is_empty() {
        return Err(ApiError::Validation("All fields are required".into()));
    }

    let saved = repo::insert(
        &state.db,
        NewMessage {
            name: name.to_string(),
            email: email.to_string(),
            subject: subject.to_string(),
            message: message.to_string(),
            is_report: payload.is_report,
        },
    )
    .await?;
    info!(message_id = %saved.id, is_report = saved.is_report, "contact submission stored");

    let body = if payload.is_report {
        "Report submitted successfully."
    } else {
        "Message sent successfully!"
    };
    Ok((StatusCode::CREATED, Json(MessageResponse::ok(body))))
}

#[instrument(skip(state, user))]
pub async fn inbox(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<MessageListResponse>, ApiError> {
    policy::authorize(&user, policy::MODERATE)?;

    let messages = repo::list_all(&state.db)
        .await?
        .into_iter()
        .map(MessageView::of)
        .collect();
    Ok(Json(MessageListResponse {
        success: true,
        messages,
    }))
}
