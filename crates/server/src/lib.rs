use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;
use integrations::IntegrationError;

use serde::Serialize;
pub use server::{AuthConfig, ServerState, router, run, run_with_listener, spawn_with_listener};

mod approvals;
mod auth;
mod configs;
mod ledger;
mod notify;
mod ocr;
mod server;
mod transactions;
mod uploads;
mod views;

pub mod types {
    pub use api_types::{Envelope, PageEnvelope, PageQuery, Pagination};

    pub mod user {
        pub use api_types::user::{
            AuthData, LoginRequest, OtpVerifyRequest, RegisterRequest, SsoData, TokenClaims,
            UserView,
        };
    }

    pub mod approval {
        pub use api_types::approval::{
            ApproveListCreate, ApproveListQuery, ApproveListUpdate, ApproveListView,
            StatusApproveCreate, StatusApproveView,
        };
    }

    pub mod config {
        pub use api_types::config::{
            ConfigCreate, ConfigQuery, ConfigTypeCreate, ConfigTypeView, ConfigUpdate, ConfigView,
        };
    }

    pub mod transaction {
        pub use api_types::transaction::{
            FileNew, FileView, ItemNew, ItemView, TransactionApprove, TransactionCreate,
            TransactionKind, TransactionQuery, TransactionUpdate, TransactionView,
        };
    }

    pub mod ledger {
        pub use api_types::ledger::{HistoryNetAmountView, NetAmountSet, NetAmountView};
    }

    pub mod upload {
        pub use api_types::upload::UploadedFile;
    }
}

pub enum ServerError {
    Engine(EngineError),
    Integration(IntegrationError),
    Unauthorized(String),
    Internal(String),
    Generic(String),
}

/// Failure half of the response envelope.
#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Validation(_) => StatusCode::BAD_REQUEST,
        EngineError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) | EngineError::Conflict(_) => StatusCode::CONFLICT,
        EngineError::Internal(_) | EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Integration(err) => {
                tracing::error!("integration error: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            ServerError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message),
            ServerError::Internal(message) => {
                tracing::error!("{message}");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
            ServerError::Generic(message) => (StatusCode::BAD_REQUEST, message),
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<IntegrationError> for ServerError {
    fn from(value: IntegrationError) -> Self {
        Self::Integration(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_validation_maps_to_400() {
        let res = ServerError::from(EngineError::Validation("bad input".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn engine_unauthorized_maps_to_401() {
        let res = ServerError::from(EngineError::Unauthorized("no".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn engine_forbidden_maps_to_403() {
        let res = ServerError::from(EngineError::Forbidden("forbidden".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_conflicts_map_to_409() {
        let existing = ServerError::from(EngineError::ExistingKey("x".to_string())).into_response();
        assert_eq!(existing.status(), StatusCode::CONFLICT);

        let referenced =
            ServerError::from(EngineError::Conflict("still referenced".to_string())).into_response();
        assert_eq!(referenced.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn integration_maps_to_500() {
        let res = ServerError::from(IntegrationError::Mail("relay refused".to_string()))
            .into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn unauthorized_maps_to_401() {
        let res = ServerError::Unauthorized("missing bearer token".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
