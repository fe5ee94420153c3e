use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use log::{info, warn};

use crate::error::DispatchError;
use crate::jid::Jid;
use crate::session::Session;
use crate::types::{HealthResponse, OutgoingMessage, SendMessagePayload, SendResult};

pub const SERVICE_NAME: &str = "whatsapp-sender";

pub struct AppState {
    pub session: Arc<dyn Session>,
    pub api_key: Option<String>,
}

/// Prefixes `text` with an @mention of `recipient` and attaches the JID so
/// clients render it as a mention rather than plain text.
pub fn format_mention(recipient: &Jid, text: &str) -> OutgoingMessage {
    OutgoingMessage {
        text: format!("@{} {}", recipient.user(), text),
        mentioned_jids: vec![recipient.to_string()],
    }
}

pub async fn send_message(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, DispatchError> {
    let body = body.map_err(|e| DispatchError::BodyReadError(e.body_text()))?;
    let payload: SendMessagePayload = serde_json::from_slice(&body)
        .map_err(|e| DispatchError::MalformedPayload(e.to_string()))?;
    let req = payload.validate()?;
    if !req.group.is_group() {
        warn!("group_jid {} is not a group address, sending anyway", req.group);
    }

    let outgoing = format_mention(&req.recipient, &req.text);
    state
        .session
        .transmit(&req.group, &outgoing)
        .await
        .map_err(DispatchError::DispatchFailure)?;

    info!(
        "Sent message to {} mentioning {} ({} chars)",
        req.group,
        req.recipient,
        req.text.chars().count()
    );

    Ok((
        StatusCode::OK,
        Json(SendResult::ok("Message sent successfully")),
    ))
}

pub async fn method_not_allowed() -> DispatchError {
    DispatchError::MethodNotAllowed
}

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: SERVICE_NAME.to_string(),
        connected: state.session.is_connected().await,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mention_prefixes_local_part() {
        let recipient: Jid = "27640412391@s.whatsapp.net".parse().unwrap();
        let msg = format_mention(&recipient, "Please resubmit photo");
        assert_eq!(msg.text, "@27640412391 Please resubmit photo");
        assert_eq!(msg.mentioned_jids, vec!["27640412391@s.whatsapp.net"]);
    }

    #[test]
    fn mention_passes_text_through_unescaped() {
        let recipient: Jid = "1@s.whatsapp.net".parse().unwrap();
        let msg = format_mention(&recipient, "*bold* _it_ \"q\"\n@2 line");
        assert_eq!(msg.text, "@1 *bold* _it_ \"q\"\n@2 line");
    }
}
