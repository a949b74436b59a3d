use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::db::{AnswerWithAuthor, Level, LevelId, User};
use crate::traits::RequestBody;
use crate::{AppError, AppState};

/// Answer as shown to a particular viewer.
#[derive(Serialize, Debug, Clone)]
pub struct AnswerRow {
    #[serde(flatten)]
    pub answer: AnswerWithAuthor,
    pub can_review: bool,
    pub is_own: bool,
}

impl AnswerRow {
    fn for_viewer(answer: AnswerWithAuthor, viewer: &User) -> Self {
        AnswerRow {
            can_review: viewer.can_review(&answer.answer).is_some(),
            is_own: answer.answer.user_id == viewer.id,
            answer,
        }
    }
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct LevelPage {
    pub id: LevelId,
}

pub struct LevelPageResponse {
    user: Option<User>,
    level: Level,
    answers: Vec<AnswerRow>,
}

impl RequestBody for LevelPage {
    type Response = LevelPageResponse;

    async fn request(
        self,
        state: AppState,
        user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        let viewer = user.as_ref().ok_or(AppError::NotLoggedIn)?;
        let level = state.get_level(self.id).await?;
        let answers = state
            .get_answers_for_level(self.id)
            .await?
            .into_iter()
            .map(|a| AnswerRow::for_viewer(a, viewer))
            .collect();

        Ok(LevelPageResponse {
            user,
            level,
            answers,
        })
    }
}

impl IntoResponse for LevelPageResponse {
    fn into_response(self) -> Response {
        let admin = self.user.as_ref().is_some_and(|u| u.is_admin());
        crate::render_html_template(
            "level.html",
            &self.user,
            serde_json::json!({
                "admin": admin,
                "level": self.level,
                "answers": self.answers,
            }),
        )
    }
}

/// Admin listing of every answer to a level.
#[derive(serde::Deserialize, Debug, Clone)]
pub struct LevelAnswersPage {
    pub id: LevelId,
}

impl RequestBody for LevelAnswersPage {
    type Response = LevelAnswersPageResponse;

    async fn request(
        self,
        state: AppState,
        user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        let viewer = user.as_ref().ok_or(AppError::NotLoggedIn)?;
        viewer.try_admin()?;

        let level = state.get_level(self.id).await?;
        let answers = state
            .get_answers_for_level(self.id)
            .await?
            .into_iter()
            .map(|a| AnswerRow::for_viewer(a, viewer))
            .collect();

        Ok(LevelAnswersPageResponse(LevelPageResponse {
            user,
            level,
            answers,
        }))
    }
}

pub struct LevelAnswersPageResponse(LevelPageResponse);

impl IntoResponse for LevelAnswersPageResponse {
    fn into_response(self) -> Response {
        let LevelPageResponse {
            user,
            level,
            answers,
        } = self.0;
        crate::render_html_template(
            "level-answers.html",
            &user,
            serde_json::json!({
                "level": level,
                "answers": answers,
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use sqlx::SqlitePool;

    use super::*;
    use crate::AppResult;
    use crate::db::Role;

    #[sqlx::test]
    async fn review_flags_depend_on_viewer(pool: SqlitePool) -> AppResult {
        let state = AppState {
            pool,
            starter_coin: 10,
        };
        let admin = state.insert_user("root", "toor", Role::Admin, 0).await?;
        let alice = state.register_user("alice", "hunter2").await?;
        let bob = state.register_user("bob", "hunter2").await?;
        let level = state.add_level(&admin, "2 + 2 = ?", "4").await?;
        state.submit_answer(&alice, level.id, "4").await?;

        let page = LevelPage { id: level.id };
        let response = page.clone().request(state.clone(), Some(alice.clone())).await?;
        assert!(response.answers[0].is_own);
        assert!(!response.answers[0].can_review);

        let response = page.clone().request(state.clone(), Some(bob.clone())).await?;
        assert!(!response.answers[0].is_own);
        assert!(response.answers[0].can_review);

        let response = page.request(state.clone(), Some(admin.clone())).await?;
        assert!(response.answers[0].can_review);

        let listing = LevelAnswersPage { id: level.id };
        let result = listing.clone().request(state.clone(), Some(bob)).await;
        assert!(matches!(result, Err(AppError::NotAuthorized)));
        let response = listing.request(state.clone(), Some(admin)).await?;
        assert_eq!(response.0.answers.len(), 1);
        Ok(())
    }

    #[sqlx::test]
    async fn missing_level_page(pool: SqlitePool) -> AppResult {
        let state = AppState {
            pool,
            starter_coin: 10,
        };
        let alice = state.register_user("alice", "hunter2").await?;

        let result = LevelPage { id: LevelId(7) }
            .request(state, Some(alice))
            .await;
        assert!(matches!(result, Err(AppError::LevelDoesNotExist)));
        Ok(())
    }
}
