use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use candy_engine::{BatchRejection, DeliveryError, ErrorKind};
use log::error;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("The request refers to something that does not exist. {0}")]
    UnknownReference(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    BatchRejected(BatchRejection),
    #[error("The server is busy. Try again shortly.")]
    StoreBusy,
}

impl ServerError {
    /// For ids that arrive in a request body rather than the path, a missing record is a bad request, not a missing
    /// resource.
    pub fn from_body_reference(e: DeliveryError) -> Self {
        match e.kind() {
            ErrorKind::NotFound => Self::UnknownReference(e.to_string()),
            _ => Self::from(e),
        }
    }
}

impl From<DeliveryError> for ServerError {
    fn from(e: DeliveryError) -> Self {
        if let DeliveryError::BatchRejected(rejection) = e {
            return Self::BatchRejected(rejection);
        }
        match e.kind() {
            ErrorKind::Validation | ErrorKind::Conflict => Self::ValidationError(e.to_string()),
            ErrorKind::NotFound => Self::NoRecordFound(e.to_string()),
            ErrorKind::Concurrency => Self::StoreBusy,
            ErrorKind::Internal => {
                error!("💻️ Internal error while handling a request. {e}");
                Self::BackendError(e.to_string())
            },
        }
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::UnknownReference(_) => StatusCode::BAD_REQUEST,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::BatchRejected(_) => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::StoreBusy => StatusCode::SERVICE_UNAVAILABLE,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            Self::BatchRejected(rejection) => {
                let ids = rejection.ids().into_iter().map(|id| json!({ "id": id })).collect::<Vec<_>>();
                json!({ "validation_error": { rejection.kind.to_string(): ids } })
            },
            _ => json!({ "error": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).insert_header(ContentType::json()).body(body.to_string())
    }
}
