use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::jid::JidError;
use crate::types::SendResult;

/// Every way a send request can end without a delivered message.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Failed to read request body: {0}")]
    BodyReadError(String),

    #[error("Invalid JSON: {0}")]
    MalformedPayload(String),

    #[error("group_jid, recipient_jid, and message are required")]
    MissingField,

    #[error("Invalid group JID: {0}")]
    InvalidGroupIdentifier(JidError),

    #[error("Invalid recipient JID: {0}")]
    InvalidRecipientIdentifier(JidError),

    #[error("Failed to send message: {0:#}")]
    DispatchFailure(anyhow::Error),
}

impl DispatchError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::BodyReadError(_)
            | Self::MalformedPayload(_)
            | Self::MissingField
            | Self::InvalidGroupIdentifier(_)
            | Self::InvalidRecipientIdentifier(_) => StatusCode::BAD_REQUEST,
            Self::DispatchFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        match &self {
            Self::DispatchFailure(_) => log::error!("{}", self),
            _ => log::warn!("Rejected send request: {}", self),
        }
        let status = self.status();
        let body = Json(SendResult::err(self.to_string()));
        match self {
            Self::MethodNotAllowed => (status, [(header::ALLOW, "POST")], body).into_response(),
            _ => (status, body).into_response(),
        }
    }
}
