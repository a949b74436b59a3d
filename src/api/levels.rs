use crate::api::DashboardRedirect;
use crate::db::{LevelId, User};
use crate::{AppError, AppState, RequestBody};

#[derive(serde::Deserialize)]
pub struct CreateLevelRequest {
    pub question: String,
    pub golden_answer: String,
}
impl RequestBody for CreateLevelRequest {
    type Response = DashboardRedirect;

    async fn request(
        self,
        state: AppState,
        user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        let editor = user.ok_or(AppError::NotLoggedIn)?;
        state
            .add_level(&editor, &self.question, &self.golden_answer)
            .await?;
        Ok(DashboardRedirect)
    }
}

#[derive(serde::Deserialize)]
pub struct EditLevelRequest {
    pub level_id: i32,
    pub question: String,
    pub golden_answer: String,
}
impl RequestBody for EditLevelRequest {
    type Response = DashboardRedirect;

    async fn request(
        self,
        state: AppState,
        user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        let editor = user.ok_or(AppError::NotLoggedIn)?;
        state
            .update_level(
                &editor,
                LevelId(self.level_id),
                &self.question,
                &self.golden_answer,
            )
            .await?;
        Ok(DashboardRedirect)
    }
}

#[derive(serde::Deserialize)]
pub struct DeleteLevelRequest {
    pub level_id: i32,
}
impl RequestBody for DeleteLevelRequest {
    type Response = DashboardRedirect;

    async fn request(
        self,
        state: AppState,
        user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        let editor = user.ok_or(AppError::NotLoggedIn)?;
        state.delete_level(&editor, LevelId(self.level_id)).await?;
        Ok(DashboardRedirect)
    }
}

#[cfg(test)]
mod tests {
    use sqlx::SqlitePool;

    use super::*;
    use crate::AppResult;
    use crate::db::Role;

    #[sqlx::test]
    async fn level_requests(pool: SqlitePool) -> AppResult {
        let state = AppState {
            pool,
            starter_coin: 10,
        };
        let admin = state.insert_user("root", "toor", Role::Admin, 0).await?;

        let result = CreateLevelRequest {
            question: "2 + 2 = ?".to_string(),
            golden_answer: "4".to_string(),
        }
        .request(state.clone(), None)
        .await;
        assert!(matches!(result, Err(AppError::NotLoggedIn)));

        CreateLevelRequest {
            question: "2 + 2 = ?".to_string(),
            golden_answer: "4".to_string(),
        }
        .request(state.clone(), Some(admin.clone()))
        .await?;
        let level = state.get_all_levels().await?.remove(0);

        EditLevelRequest {
            level_id: level.id.0,
            question: "3 + 3 = ?".to_string(),
            golden_answer: "6".to_string(),
        }
        .request(state.clone(), Some(admin.clone()))
        .await?;
        assert_eq!(state.get_level(level.id).await?.golden_answer, "6");

        DeleteLevelRequest {
            level_id: level.id.0,
        }
        .request(state.clone(), Some(admin))
        .await?;
        assert!(state.get_all_levels().await?.is_empty());
        Ok(())
    }
}
