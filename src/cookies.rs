use axum::response::AppendHeaders;
use axum_extra::extract::CookieJar;

use crate::api::auth::{APPEND_EXPIRED_TOKEN, APPEND_NO_TOKEN};
use crate::db::User;
use crate::db::token::TokenStatus;
use crate::{AppError, AppState};

/// Name of the cookie holding the session token.
pub const TOKEN_COOKIE: &str = "token";

/// Resolves the signed-in user from the session cookie. Also returns a header
/// that clears the cookie if the token was expired or unknown.
pub async fn process_cookies(
    state: &AppState,
    jar: &CookieJar,
) -> Result<
    (
        Option<User>,
        AppendHeaders<Option<(axum::http::HeaderName, &'static str)>>,
    ),
    AppError,
> {
    let token = jar.get(TOKEN_COOKIE).map(|cookie| cookie.value());
    let token_status = state.token_status(token).await?;
    let cookie_header = match &token_status {
        TokenStatus::None | TokenStatus::Valid(_) => APPEND_NO_TOKEN,
        TokenStatus::Expired | TokenStatus::Unknown => APPEND_EXPIRED_TOKEN,
    };
    let user = match token_status {
        TokenStatus::Valid(user) => Some(user),
        _ => None,
    };
    Ok((user, cookie_header))
}
