use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;

use crate::db::User;
use crate::traits::RequestBody;
use crate::{AppError, AppResult, AppState};

#[derive(serde::Deserialize)]
pub struct SignOutPage {}

impl RequestBody for SignOutPage {
    type Response = Response;

    async fn preprocess_jar(state: &AppState, jar: &CookieJar) -> AppResult {
        state.invalidate_current_token(jar).await
    }

    async fn request(
        self,
        _state: AppState,
        _user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        // the token was removed in `preprocess_jar`, so `user` is always
        // `None` here; `process_cookies` clears the stale cookie
        Ok(Redirect::to("/").into_response())
    }
}

/// Signs the user out of every session.
#[derive(serde::Deserialize)]
pub struct SignOutEverywherePage {}

impl RequestBody for SignOutEverywherePage {
    type Response = Response;

    async fn request(
        self,
        state: AppState,
        user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        let user = user.ok_or(AppError::NotLoggedIn)?;
        state.remove_all_tokens_for_user(user.id).await?;
        tracing::info!(user_id = ?user.id, "Signed out everywhere.");
        // the current cookie now refers to an unknown token and gets cleared
        // on the next request
        Ok(Redirect::to("/").into_response())
    }
}
