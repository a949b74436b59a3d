use axum::http::header::SET_COOKIE;
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};

use crate::cookies::TOKEN_COOKIE;
use crate::db::{Role, User};
use crate::traits::RequestBody;
use crate::{AppError, AppResult, AppState};

const EXPIRED_TOKEN: &str = "token=expired; Path=/; Expires=Thu, 1 Jan 1970 00:00:00 GMT";
pub const APPEND_EXPIRED_TOKEN: AppendHeaders<Option<(axum::http::header::HeaderName, &str)>> =
    AppendHeaders(Some((SET_COOKIE, EXPIRED_TOKEN)));
pub const APPEND_NO_TOKEN: AppendHeaders<Option<(axum::http::header::HeaderName, &str)>> =
    AppendHeaders(None);

#[derive(serde::Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

pub struct RegisterResponse;

impl RequestBody for RegisterRequest {
    type Response = RegisterResponse;

    async fn request(
        self,
        state: AppState,
        _user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        state.register_user(&self.username, &self.password).await?;
        Ok(RegisterResponse)
    }
}

impl IntoResponse for RegisterResponse {
    fn into_response(self) -> Response {
        Redirect::to("/login?registered=true").into_response()
    }
}

#[derive(serde::Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub redirect: Option<String>,
}

impl LoginRequest {
    async fn sign_in(self, state: AppState, role: Role) -> AppResult<TokenReturn> {
        let user = state
            .authenticate(&self.username, &self.password, role)
            .await?;
        let token = state.create_token(user.id).await?;

        tracing::info!(user_id = ?user.id, ?role, "User signed in.");

        Ok(TokenReturn {
            token: token.string,
            redirect: self.redirect.as_deref().and_then(local_redirect),
        })
    }
}

/// Sign-in through the regular user form.
#[derive(serde::Deserialize)]
#[serde(transparent)]
pub struct UserLoginRequest(LoginRequest);

impl RequestBody for UserLoginRequest {
    type Response = TokenReturn;

    async fn request(
        self,
        state: AppState,
        _user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        self.0.sign_in(state, Role::User).await
    }
}

/// Sign-in through the admin form.
#[derive(serde::Deserialize)]
#[serde(transparent)]
pub struct AdminLoginRequest(LoginRequest);

impl RequestBody for AdminLoginRequest {
    type Response = TokenReturn;

    async fn request(
        self,
        state: AppState,
        _user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        self.0.sign_in(state, Role::Admin).await
    }
}

/// Returns the path and query of `redirect` if it stays on this site.
///
/// The path is resolved the way a browser would (backslashes count as
/// slashes), so `//host` and `/\host` are both rejected.
fn local_redirect(redirect: &str) -> Option<String> {
    let base = url::Url::parse("https://example.com/").ok()?; // the url crate cannot handle relative urls
    if !redirect.starts_with('/') {
        return None;
    }
    let resolved = base.join(redirect).ok()?;
    if resolved.origin() != base.origin() {
        return None;
    }
    Some(resolved[url::Position::BeforePath..].to_string())
}

pub struct TokenReturn {
    pub token: String,
    pub redirect: Option<String>,
}

impl IntoResponse for TokenReturn {
    fn into_response(self) -> Response {
        let cookie = Cookie::build((TOKEN_COOKIE, self.token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict);
        let jar = CookieJar::new().add(cookie);

        (
            jar,
            Redirect::to(self.redirect.as_deref().unwrap_or("/dashboard")),
        )
            .into_response()
    }
}

impl AppState {
    /// Removes the session token in the cookie jar from the database.
    pub async fn invalidate_current_token(&self, jar: &CookieJar) -> AppResult {
        if let Some(token) = jar.get(TOKEN_COOKIE) {
            self.remove_token(token.value()).await?;
        }
        Ok(())
    }
}
