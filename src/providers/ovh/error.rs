use reqwest::StatusCode;
use thiserror::Error;

/// A single failed call against the API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OVH API responded {status}: {message}")]
    Api {
        status: StatusCode,
        class: Option<String>,
        message: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Api { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

#[derive(Error, Debug)]
pub enum InitError {
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("unknown endpoint: {0}")]
    UnknownEndpoint(String),

    #[error("credential is not a valid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum OvhClientError {
    #[error("Error creating OVH client: {0}")]
    ClientInit(#[source] InitError),

    #[error("Error getting record: {0}")]
    Lookup(#[source] ApiError),

    #[error("Error creating record: {0}")]
    Create(#[source] ApiError),

    #[error("Error updating record: {0}")]
    Update(#[source] ApiError),

    #[error("Error updating record: record {0} vanished after update")]
    UpdateVanished(u64),

    #[error("Error deleting record: {0}")]
    Delete(#[source] ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    fn api_error(status: StatusCode) -> ApiError {
        ApiError::Api {
            status,
            class: Some("Client::NotFound".to_string()),
            message: "Record does not exist".to_string(),
        }
    }

    #[test]
    fn test_not_found_only_for_404() {
        assert!(api_error(StatusCode::NOT_FOUND).is_not_found());
        assert!(!api_error(StatusCode::BAD_REQUEST).is_not_found());
        assert!(!api_error(StatusCode::INTERNAL_SERVER_ERROR).is_not_found());
    }

    #[test]
    fn test_client_error_keeps_cause() {
        let err = OvhClientError::Create(api_error(StatusCode::BAD_REQUEST));
        assert_eq!(
            err.to_string(),
            "Error creating record: OVH API responded 400 Bad Request: Record does not exist"
        );
        let source = err.source().expect("cause attached");
        assert!(source.downcast_ref::<ApiError>().is_some());
    }

    #[test]
    fn test_vanished_message() {
        let err = OvhClientError::UpdateVanished(5115496087);
        assert_eq!(
            err.to_string(),
            "Error updating record: record 5115496087 vanished after update"
        );
    }
}
