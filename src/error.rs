use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

pub type AppResult<T = ()> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    SqlError(sqlx::Error),
    PasswordHash(String),

    NotLoggedIn,
    NotAuthorized,
    InvalidCredentials,
    UsernameTaken,

    UserDoesNotExist,
    LevelDoesNotExist,
    AnswerDoesNotExist,
    LevelHasAnswers,

    InsufficientCoin,
    EmptyField(&'static str),
    InvalidForm(String),
}

impl AppError {
    pub fn message(&self) -> String {
        match self {
            Self::SqlError(err) => format!("Internal SQL error: {err}"),
            Self::PasswordHash(err) => format!("Password hashing error: {err}"),

            Self::NotLoggedIn => "Not logged in".to_string(),
            Self::NotAuthorized => "Not authorized".to_string(),
            Self::InvalidCredentials => "Invalid credentials".to_string(),
            Self::UsernameTaken => "Username already exists".to_string(),

            Self::UserDoesNotExist => "User does not exist".to_string(),
            Self::LevelDoesNotExist => "Level does not exist".to_string(),
            Self::AnswerDoesNotExist => "Answer does not exist".to_string(),
            Self::LevelHasAnswers => {
                "Level still has answers and cannot be deleted".to_string()
            }

            Self::InsufficientCoin => "Not enough coin to submit answer".to_string(),
            Self::EmptyField(field) => format!("{field} must not be empty"),
            Self::InvalidForm(err) => format!("Invalid form data: {err}"),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::SqlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::PasswordHash(_) => StatusCode::INTERNAL_SERVER_ERROR,

            Self::NotLoggedIn => StatusCode::UNAUTHORIZED,
            Self::NotAuthorized => StatusCode::FORBIDDEN,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::UsernameTaken => StatusCode::CONFLICT,

            Self::UserDoesNotExist => StatusCode::NOT_FOUND,
            Self::LevelDoesNotExist => StatusCode::NOT_FOUND,
            Self::AnswerDoesNotExist => StatusCode::NOT_FOUND,
            Self::LevelHasAnswers => StatusCode::CONFLICT,

            Self::InsufficientCoin => StatusCode::BAD_REQUEST,
            Self::EmptyField(_) => StatusCode::BAD_REQUEST,
            Self::InvalidForm(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status_code().is_server_error() {
            tracing::error!(error = ?self, "Request failed.");
        }
        (
            self.status_code(),
            crate::render_html_template(
                "error.html",
                &None,
                serde_json::json!({ "error_msg": self.message() }),
            ),
        )
            .into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> AppError {
        AppError::SqlError(err)
    }
}

/// Returns an error if a required form field is blank.
pub fn require_nonempty(field: &'static str, value: &str) -> AppResult {
    if value.trim().is_empty() {
        Err(AppError::EmptyField(field))
    } else {
        Ok(())
    }
}
