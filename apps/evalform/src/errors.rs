use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::evaluation::invite::InviteError;
use crate::evaluation::session::SessionError;
use crate::evaluation::submitter::SubmitError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error(transparent)]
    Invite(#[from] InviteError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

fn session_status(e: &SessionError) -> (StatusCode, &'static str) {
    match e {
        SessionError::IncompleteAssessment { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "INCOMPLETE_ASSESSMENT")
        }
        SessionError::MissingFields(_) => (StatusCode::BAD_REQUEST, "MISSING_FIELD"),
        SessionError::SubmissionInFlight => (StatusCode::CONFLICT, "SUBMISSION_IN_FLIGHT"),
        SessionError::AlreadySubmitted => (StatusCode::CONFLICT, "ALREADY_SUBMITTED"),
        SessionError::Locked(_) => (StatusCode::CONFLICT, "SESSION_LOCKED"),
        SessionError::UnknownCriterion(_)
        | SessionError::RatingOutOfRange(_)
        | SessionError::UnsupportedFileType(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Session(e) => {
                let (status, code) = session_status(e);
                (status, code, e.to_string())
            }
            AppError::Submit(SubmitError::Session(e)) => {
                let (status, code) = session_status(e);
                (status, code, e.to_string())
            }
            AppError::Submit(SubmitError::FileRead(e)) => {
                tracing::error!("File read failure: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "FILE_READ_FAILURE",
                    "Could not read the résumé file. Please attach it again and resubmit."
                        .to_string(),
                )
            }
            AppError::Submit(SubmitError::Transport(e)) => {
                tracing::error!("Transport failure: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "TRANSPORT_FAILURE",
                    "Error saving to the spreadsheet. Please try again.".to_string(),
                )
            }
            AppError::Submit(SubmitError::Aborted(e)) => {
                tracing::error!("Submission aborted: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SUBMISSION_ABORTED",
                    "The submission was interrupted. Please try again.".to_string(),
                )
            }
            AppError::Invite(e) => (StatusCode::BAD_REQUEST, "MISSING_CONTACT", e.to_string()),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
