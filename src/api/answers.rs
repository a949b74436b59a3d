use axum::response::{IntoResponse, Redirect, Response};

use crate::db::{AnswerId, LevelId, ReviewDecision, User};
use crate::traits::Linkable;
use crate::{AppError, AppState, RequestBody};

#[derive(serde::Deserialize)]
pub struct SubmitAnswerRequest {
    pub level_id: i32,
    pub answer: String,
}
impl RequestBody for SubmitAnswerRequest {
    type Response = LevelRedirect;

    async fn request(
        self,
        state: AppState,
        user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        let author = user.ok_or(AppError::NotLoggedIn)?;
        let answer = state
            .submit_answer(&author, LevelId(self.level_id), &self.answer)
            .await?;
        Ok(LevelRedirect {
            level_id: answer.level_id,
            admin_listing: false,
        })
    }
}

#[derive(serde::Deserialize)]
pub struct ReviewAnswerRequest {
    pub answer_id: i32,
    pub decision: ReviewDecision,
    /// Whether the review came from the admin answer listing.
    #[serde(default)]
    pub from_listing: bool,
}
impl RequestBody for ReviewAnswerRequest {
    type Response = LevelRedirect;

    async fn request(
        self,
        state: AppState,
        user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        let reviewer = user.ok_or(AppError::NotLoggedIn)?;
        let answer = state
            .review_answer(&reviewer, AnswerId(self.answer_id), self.decision)
            .await?;
        Ok(LevelRedirect {
            level_id: answer.level_id,
            admin_listing: self.from_listing && reviewer.is_admin(),
        })
    }
}

#[must_use]
#[derive(Debug)]
pub struct LevelRedirect {
    level_id: LevelId,
    admin_listing: bool,
}
impl IntoResponse for LevelRedirect {
    fn into_response(self) -> Response {
        if self.admin_listing {
            Redirect::to(&format!("/level-answers?id={}", self.level_id.0)).into_response()
        } else {
            Redirect::to(&self.level_id.relative_url()).into_response()
        }
    }
}
