use std::sync::Arc;
use axum::http::StatusCode;
use crate::catalog::domain::CatalogService;
use crate::core::command::CommandError;

#[derive(Clone)]
pub struct AppState {
    pub(crate) catalog: Arc<dyn CatalogService>,
}

impl AppState {
    pub fn new(catalog: Box<dyn CatalogService>) -> AppState {
        AppState {
            catalog: Arc::from(catalog),
        }
    }
}

pub type ServerError = (StatusCode, String);

pub fn json_to_server_error(err: serde_json::Error) -> ServerError {
    (StatusCode::BAD_REQUEST, format!("{}", err))
}

impl From<CommandError> for ServerError {
    fn from(err: CommandError) -> Self {
        let status = match err {
            CommandError::NotFound { .. } => StatusCode::NOT_FOUND,
            CommandError::DuplicateKey { .. } => StatusCode::CONFLICT,
            CommandError::Serialization { .. } | CommandError::Validation { .. } => StatusCode::BAD_REQUEST,
            CommandError::Database { .. } | CommandError::Runtime { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, format!("{:?}", err))
    }
}
