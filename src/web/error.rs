// src/web/error.rs
//! Handler error taxonomy and its JSON rendering

use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::Request;

use crate::app_log;
use crate::core::is_unique_violation;
use crate::types::{ErrorResponse, FieldError, ValidationErrors};
use crate::web::types::ServerConfig;

pub const SERVER_ERROR: &str = "Server Error";
pub const JOB_NOT_FOUND: &str = "Job not found";
pub const DUPLICATE_JOB: &str = "Duplicate job entry";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{message}")]
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{message}: {cause:#}")]
    Internal {
        message: &'static str,
        cause: anyhow::Error,
    },
}

impl ApiError {
    pub fn internal(message: &'static str, cause: anyhow::Error) -> Self {
        ApiError::Internal { message, cause }
    }

    pub fn job_not_found() -> Self {
        ApiError::NotFound(JOB_NOT_FOUND.to_string())
    }

    /// Storage failure on a write: duplicate keys are conflicts, the rest internal
    pub fn from_write(message: &'static str, cause: anyhow::Error) -> Self {
        if is_unique_violation(&cause) {
            ApiError::Conflict(DUPLICATE_JOB.to_string())
        } else {
            ApiError::internal(message, cause)
        }
    }

    pub fn status(&self) -> Status {
        match self {
            ApiError::Validation { .. } => Status::BadRequest,
            ApiError::NotFound(_) => Status::NotFound,
            ApiError::Conflict(_) => Status::BadRequest,
            ApiError::Internal { .. } => Status::InternalServerError,
        }
    }

    fn into_body(self, expose_details: bool) -> ErrorResponse {
        match self {
            ApiError::Validation { message, errors } => {
                ErrorResponse::new(message).with_errors(errors)
            }
            ApiError::NotFound(message) => ErrorResponse::new(message),
            ApiError::Conflict(message) => ErrorResponse::new(message)
                .with_error("A job with similar details already exists"),
            ApiError::Internal { message, cause } => {
                app_log!(error, "{}: {:#}", message, cause);
                let body = ErrorResponse::new(message);
                if expose_details {
                    body.with_error(format!("{:#}", cause))
                } else {
                    body
                }
            }
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation {
            message: errors.summary(),
            errors: errors.into_errors(),
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let expose_details = request
            .rocket()
            .state::<ServerConfig>()
            .map(|config| config.mode.exposes_error_details())
            .unwrap_or(false);

        let status = self.status();
        (status, Json(self.into_body(expose_details))).respond_to(request)
    }
}
