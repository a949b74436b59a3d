use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Query, State};
use axum::http::Uri;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;

use crate::db::User;
use crate::error::AppError;
use crate::{AppResult, AppState};

/// Object that can be linked to.
pub trait Linkable {
    /// Returns the relative URL. Example: `/level?id=3`
    fn relative_url(&self) -> String;
}

/// Redirects to the sign-in page, coming back to `uri` afterwards if given.
fn login_redirect(uri: Option<&Uri>) -> Response {
    let mut login_redirect = url::Url::parse("https://example.com/login").expect("valid url"); // the url crate cannot handle relative urls
    if let Some(path_and_query) = uri.and_then(|uri| uri.path_and_query()) {
        login_redirect
            .query_pairs_mut()
            .append_pair("redirect", path_and_query.as_str());
    }

    match login_redirect.query() {
        Some(query) => Redirect::to(&format!("{}?{query}", login_redirect.path())),
        None => Redirect::to(login_redirect.path()),
    }
    .into_response()
}

/// Object that can be received as a request.
pub trait RequestBody {
    type Response;

    async fn request(self, state: AppState, user: Option<User>)
    -> Result<Self::Response, AppError>;

    async fn preprocess_jar(_state: &AppState, _jar: &CookieJar) -> AppResult {
        Ok(())
    }

    async fn as_handler_query(
        State(state): State<AppState>,
        uri: Uri,
        jar: CookieJar,
        Query(item): Query<Self>,
    ) -> Result<impl IntoResponse, AppError>
    where
        Self: Sized,
        Self::Response: IntoResponse,
    {
        Self::preprocess_jar(&state, &jar).await?;
        let (user, headers) = crate::cookies::process_cookies(&state, &jar).await?;
        match item.request(state, user).await {
            Err(AppError::NotLoggedIn) => Ok((headers, login_redirect(Some(&uri))).into_response()),
            response => Ok((headers, response?).into_response()),
        }
    }

    async fn as_form_handler(
        State(state): State<AppState>,
        jar: CookieJar,
        form: Result<Form<Self>, FormRejection>,
    ) -> Result<impl IntoResponse, AppError>
    where
        Self: Sized,
        Self::Response: IntoResponse,
    {
        let Form(item) = form.map_err(|e| AppError::InvalidForm(e.body_text()))?;
        let (user, headers) = crate::cookies::process_cookies(&state, &jar).await?;
        match item.request(state, user).await {
            Err(AppError::NotLoggedIn) => Ok((headers, login_redirect(None)).into_response()),
            response => Ok((headers, response?).into_response()),
        }
    }
}
