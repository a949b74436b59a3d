use axum::response::{IntoResponse, Redirect, Response};

pub mod answers;
pub mod auth;
pub mod coins;
pub mod levels;

/// Sends the user back to the dashboard after an admin action.
#[must_use]
#[derive(Debug)]
pub struct DashboardRedirect;

impl IntoResponse for DashboardRedirect {
    fn into_response(self) -> Response {
        Redirect::to("/dashboard").into_response()
    }
}
