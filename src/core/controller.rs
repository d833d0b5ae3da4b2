use std::collections::HashMap;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use crate::core::command::{CommandError, Notice};
use crate::core::domain::Configuration;
use crate::core::library::LibraryError;
use crate::core::repository::RepositoryStore;

pub const LOGIN_PATH: &str = "/login/";
pub const HOME_PATH: &str = "/";
pub const MY_BOOKS_PATH: &str = "/my-books/";
pub const STAFF_DASHBOARD_PATH: &str = "/staff-dashboard/";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppState {
    pub config: Configuration,
    pub store: RepositoryStore,
}

impl AppState {
    pub fn new(branch: &str, store: RepositoryStore) -> AppState {
        AppState {
            config: Configuration::new(branch),
            store,
        }
    }

    pub fn with_config(config: Configuration, store: RepositoryStore) -> AppState {
        AppState {
            config,
            store,
        }
    }
}

// ServerError is the HTTP face of a failed command: a status, an error notice, optional
// per-field messages and, for redirects, the Location to follow.
#[derive(Debug)]
pub struct ServerError {
    pub status: StatusCode,
    pub notice: Notice,
    pub errors: HashMap<String, String>,
    pub redirect: Option<String>,
}

impl ServerError {
    pub fn new(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            notice: Notice::error(message),
            errors: HashMap::new(),
            redirect: None,
        }
    }

    pub fn with_redirect(mut self, location: &str) -> Self {
        self.redirect = Some(location.to_string());
        self
    }

    pub fn with_field_error(mut self, field: &str, message: &str) -> Self {
        self.errors.insert(field.to_string(), message.to_string());
        self
    }

    pub fn login_required() -> Self {
        ServerError::new(StatusCode::SEE_OTHER, "Please log in to continue.").with_redirect(LOGIN_PATH)
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    notice: &'a Notice,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    errors: &'a HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect: &'a Option<String>,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            notice: &self.notice,
            errors: &self.errors,
            redirect: &self.redirect,
        }).into_response();
        match (&self.redirect, self.status.is_redirection()) {
            (Some(location), true) => {
                (self.status, [(header::LOCATION, location.to_string())], body).into_response()
            }
            _ => (self.status, body).into_response(),
        }
    }
}

pub fn json_to_server_error(err: serde_json::Error) -> ServerError {
    ServerError::new(StatusCode::BAD_REQUEST, format!("{}", err).as_str())
}

impl From<CommandError> for ServerError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Access { message, .. } => {
                warn!("access denied {}", message);
                ServerError::new(StatusCode::FORBIDDEN, "You don't have permission to access this page.")
            }
            CommandError::Unauthenticated { message } => {
                warn!("unauthenticated {}", message);
                ServerError::login_required()
            }
            CommandError::Database { message, .. } => {
                error!("database error {}", message);
                ServerError::new(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong, please try again.")
            }
            CommandError::DuplicateKey { message } => {
                warn!("duplicate key {}", message);
                ServerError::new(StatusCode::CONFLICT, message.as_str())
            }
            CommandError::NotFound { message } => {
                warn!("not found {}", message);
                ServerError::new(StatusCode::NOT_FOUND, "The requested page was not found.")
            }
            CommandError::InsufficientStock { message, available, requested } => {
                warn!("insufficient stock {} available {} requested {}", message, available, requested);
                ServerError::new(StatusCode::CONFLICT, message.as_str()).with_redirect(HOME_PATH)
            }
            CommandError::Runtime { message, retryable, .. } => {
                error!("runtime error {} retryable {}", message, retryable);
                ServerError::new(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong, please try again.")
            }
            CommandError::Serialization { message } => {
                warn!("serialization error {}", message);
                ServerError::new(StatusCode::BAD_REQUEST, message.as_str())
            }
            CommandError::Validation { message, reason_code } => {
                let err = ServerError::new(StatusCode::BAD_REQUEST, message.as_str());
                match reason_code {
                    Some(field) => err.with_field_error(field.as_str(), message.as_str()),
                    None => err,
                }
            }
            CommandError::Other { message, .. } => {
                error!("command error {}", message);
                ServerError::new(StatusCode::INTERNAL_SERVER_ERROR, message.as_str())
            }
        }
    }
}

impl From<LibraryError> for ServerError {
    fn from(err: LibraryError) -> Self {
        ServerError::from(CommandError::from(err))
    }
}
