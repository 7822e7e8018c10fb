use salvo::http::StatusCode;
use salvo::writing::Json;
use serde::Serialize;
use thiserror::Error;
use vellum_core::config::AuthMethod;
use vellum_service::error::ServiceError;

use crate::config::get_config_from_depot;

/// Application-level errors (HTTP layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] ServiceError),

    #[error(transparent)]
    DatabaseError(#[from] vellum_db::error::DbError),

    #[error(transparent)]
    CoreError(#[from] vellum_core::error::CoreError),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ErrorBody {
    fn new(error: &'static str) -> Self {
        Self { error, path: None }
    }

    fn at(error: &'static str, path: &str) -> Self {
        Self {
            error,
            path: Some(path.to_string()),
        }
    }
}

impl AppError {
    /// ## Summary
    /// Status and body for this error. Denials look like missing objects
    /// unless `disclose_existence` is set.
    #[must_use]
    pub fn status_and_body(&self, path: &str, disclose_existence: bool) -> (StatusCode, ErrorBody) {
        let service = match self {
            Self::ServiceError(err) => err,
            Self::DatabaseError(err) if err.is_timeout() => {
                return (StatusCode::GATEWAY_TIMEOUT, ErrorBody::new("internal_error"));
            }
            Self::DatabaseError(_) => {
                return (StatusCode::SERVICE_UNAVAILABLE, ErrorBody::new("internal_error"));
            }
            Self::CoreError(_) => {
                return (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::new("internal_error"));
            }
        };

        match service {
            ServiceError::InvalidIdentifier(_) | ServiceError::NotFound(_) => {
                (StatusCode::NOT_FOUND, ErrorBody::at("invalid_id", path))
            }
            ServiceError::AuthorizationDenied(_) if disclose_existence => {
                (StatusCode::FORBIDDEN, ErrorBody::at("forbidden", path))
            }
            ServiceError::AuthorizationDenied(_) => {
                (StatusCode::NOT_FOUND, ErrorBody::at("invalid_id", path))
            }
            ServiceError::NotAuthenticated => {
                (StatusCode::UNAUTHORIZED, ErrorBody::new("not_authenticated"))
            }
            ServiceError::BrowseFailure(_) | ServiceError::StructuralCycle { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::new("integrity_error"))
            }
            ServiceError::CollaboratorTimeout(_) => {
                (StatusCode::GATEWAY_TIMEOUT, ErrorBody::new("internal_error"))
            }
            ServiceError::CollaboratorUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, ErrorBody::new("internal_error"))
            }
            ServiceError::StreamingFailure(_)
            | ServiceError::InvalidConfiguration(_)
            | ServiceError::InvariantViolation(_)
            | ServiceError::CasbinError(_)
            | ServiceError::CoreError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::new("internal_error"))
            }
        }
    }

    /// ## Summary
    /// Writes the error response, logging at a level that matches its severity.
    pub fn render(&self, req: &salvo::Request, depot: &salvo::Depot, res: &mut salvo::Response) {
        let config = get_config_from_depot(depot).ok();
        let disclose = config.as_ref().is_some_and(|c| c.delivery.disclose_existence);
        let path = req.uri().path();
        let (status, body) = self.status_and_body(path, disclose);

        if status.is_server_error() {
            tracing::error!(error = %self, status = %status, "Request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        if status == StatusCode::UNAUTHORIZED
            && config.is_some_and(|c| c.auth.method == AuthMethod::BasicAuth)
            && let Ok(value) = salvo::http::HeaderValue::from_str("Basic realm=\"vellum\"")
        {
            res.headers_mut()
                .insert(salvo::http::header::WWW_AUTHENTICATE, value);
        }

        res.status_code(status);
        res.render(Json(body));
    }
}
