use axum::response::{IntoResponse, Redirect, Response};

use crate::db::User;
use crate::traits::RequestBody;
use crate::{AppError, AppState};

#[derive(serde::Deserialize)]
pub struct IndexPage {}

pub struct IndexPageResponse {
    user: Option<User>,
}

impl RequestBody for IndexPage {
    type Response = IndexPageResponse;

    async fn request(
        self,
        _state: AppState,
        user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        Ok(IndexPageResponse { user })
    }
}

impl IntoResponse for IndexPageResponse {
    fn into_response(self) -> Response {
        if self.user.is_some() {
            Redirect::to("/dashboard").into_response()
        } else {
            crate::render_html_template("index.html", &self.user, serde_json::json!({}))
        }
    }
}

/// Which sign-in form to show.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SignInForm {
    User,
    Admin,
    Register,
}

#[derive(serde::Deserialize)]
pub struct SignInPage {
    redirect: Option<String>,
    #[serde(default)]
    registered: bool,
}

#[derive(serde::Deserialize)]
#[serde(transparent)]
pub struct AdminSignInPage(SignInPage);

#[derive(serde::Deserialize)]
#[serde(transparent)]
pub struct RegisterPage(SignInPage);

pub struct SignInPageResponse {
    user: Option<User>,
    form: SignInForm,
    redirect: Option<String>,
    registered: bool,
}

impl SignInPage {
    fn respond(self, user: Option<User>, form: SignInForm) -> SignInPageResponse {
        SignInPageResponse {
            user,
            form,
            redirect: self.redirect,
            registered: self.registered,
        }
    }
}

impl RequestBody for SignInPage {
    type Response = SignInPageResponse;

    async fn request(
        self,
        _state: AppState,
        user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        Ok(self.respond(user, SignInForm::User))
    }
}

impl RequestBody for AdminSignInPage {
    type Response = SignInPageResponse;

    async fn request(
        self,
        _state: AppState,
        user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        Ok(self.0.respond(user, SignInForm::Admin))
    }
}

impl RequestBody for RegisterPage {
    type Response = SignInPageResponse;

    async fn request(
        self,
        _state: AppState,
        user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        Ok(self.0.respond(user, SignInForm::Register))
    }
}

impl IntoResponse for SignInPageResponse {
    fn into_response(self) -> Response {
        if self.user.is_some() {
            return Redirect::to("/dashboard").into_response();
        }

        let (template, action) = match self.form {
            SignInForm::User => ("sign-in.html", "/login"),
            SignInForm::Admin => ("sign-in.html", "/admin-login"),
            SignInForm::Register => ("register.html", "/register"),
        };
        crate::render_html_template(
            template,
            &self.user,
            serde_json::json!({
                "action": action,
                "admin": self.form == SignInForm::Admin,
                "redirect": self.redirect.unwrap_or_default(),
                "registered": self.registered,
            }),
        )
    }
}
