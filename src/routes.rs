use crate::traits::RequestBody;
use crate::{AppState, api, html, static_files};

pub(crate) fn router() -> axum::Router<AppState> {
    use axum::routing::{get, post};

    axum::Router::new()
        // Authentication
        .route("/", get(html::sign_in::IndexPage::as_handler_query))
        .route(
            "/register",
            get(html::sign_in::RegisterPage::as_handler_query)
                .post(api::auth::RegisterRequest::as_form_handler),
        )
        .route(
            "/login",
            get(html::sign_in::SignInPage::as_handler_query)
                .post(api::auth::UserLoginRequest::as_form_handler),
        )
        .route(
            "/admin-login",
            get(html::sign_in::AdminSignInPage::as_handler_query)
                .post(api::auth::AdminLoginRequest::as_form_handler),
        )
        .route("/logout", get(html::sign_out::SignOutPage::as_handler_query))
        .route(
            "/logout-everywhere",
            get(html::sign_out::SignOutEverywherePage::as_handler_query),
        )
        // Pages
        .route(
            "/dashboard",
            get(html::dashboard::DashboardPage::as_handler_query),
        )
        .route("/level", get(html::level::LevelPage::as_handler_query))
        .route(
            "/level-answers",
            get(html::level::LevelAnswersPage::as_handler_query),
        )
        // Actions
        .route(
            "/create-level",
            post(api::levels::CreateLevelRequest::as_form_handler),
        )
        .route(
            "/edit-level",
            post(api::levels::EditLevelRequest::as_form_handler),
        )
        .route(
            "/delete-level",
            post(api::levels::DeleteLevelRequest::as_form_handler),
        )
        .route(
            "/submit-answer",
            post(api::answers::SubmitAnswerRequest::as_form_handler),
        )
        .route(
            "/review-answer",
            post(api::answers::ReviewAnswerRequest::as_form_handler),
        )
        .route(
            "/update-coin",
            post(api::coins::UpdateCoinRequest::as_form_handler),
        )
        // Resources
        .route("/css/{*file_path}", get(static_files::css_handler))
        .fallback(html::not_found::handler_query)
}
