use crate::flash;
use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use std::path::PathBuf;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// The multipart body had no `file` field at all
    #[error("No file part")]
    MissingFile,

    /// A `file` field was sent without a file name (nothing selected in the form)
    #[error("No selected file")]
    NoSelectedFile,

    /// The client-supplied file name sanitises to nothing usable
    #[error("Invalid file name: {filename}")]
    InvalidFilename { filename: String },

    /// No API key available for the identification service
    #[error("API key not found. Please set the {env_var} environment variable.")]
    MissingApiKey { env_var: String },

    /// Upstream answered 429
    #[error(
        "Error: Received status code 429. The specified API key does not have sufficient number of available credits."
    )]
    InsufficientCredits,

    /// Upstream answered with any other non-200 status
    #[error("Error: Received status code {status}. Response content: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// Upstream answered 200 but the body is not an identification result
    #[error("Error: Unable to parse JSON response. Response content: {body}")]
    InvalidResponse {
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// The identification service could not be reached
    #[error("Error: Unable to reach the identification service: {0}")]
    Transport(#[from] reqwest::Error),

    /// Reading or writing an uploaded file failed
    #[error("Failed to store upload at {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed request body
    #[error("{message}")]
    BadRequest { message: String },

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },
}

impl Error {
    /// Whether this error is shown to the user as a flash message on the form
    pub fn is_flashable(&self) -> bool {
        !matches!(self, Error::Internal { .. })
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self {
            Error::Internal { .. } => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Transport(_) | Error::Storage { .. } | Error::InvalidResponse { .. } => {
                tracing::error!(error = ?self, "Identification failed: {}", self);
            }
            Error::InsufficientCredits | Error::UnexpectedStatus { .. } | Error::MissingApiKey { .. } => {
                tracing::warn!("Identification rejected: {}", self);
            }
            Error::MissingFile | Error::NoSelectedFile | Error::InvalidFilename { .. } | Error::BadRequest { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        if !self.is_flashable() {
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response();
        }

        let cookie = flash::set_cookie(&self.to_string());
        ([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response()
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_names_variable() {
        let err = Error::MissingApiKey {
            env_var: "PLANT_ID_API_KEY".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API key not found. Please set the PLANT_ID_API_KEY environment variable."
        );
    }

    #[test]
    fn test_flashable_errors_redirect_home() {
        let response = Error::NoSelectedFile.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");

        let cookie = response.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert_eq!(flash::read_cookie(cookie).as_deref(), Some("No selected file"));
    }

    #[test]
    fn test_internal_errors_are_not_flashed() {
        let response = Error::Internal {
            operation: "render page".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }
}
