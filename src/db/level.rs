use serde::Serialize;
use sqlx::query_as;

use crate::error::require_nonempty;
use crate::traits::Linkable;
use crate::{AppError, AppResult, AppState};

use super::User;

id_struct!(LevelId, Level);

/// Question with a reference answer.
#[derive(sqlx::FromRow, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Level {
    pub id: LevelId,
    pub question: String,
    pub golden_answer: String,
}

impl Linkable for LevelId {
    fn relative_url(&self) -> String {
        format!("/level?id={}", self.0)
    }
}

impl Linkable for Level {
    fn relative_url(&self) -> String {
        self.id.relative_url()
    }
}

impl AppState {
    pub async fn get_opt_level(&self, id: LevelId) -> sqlx::Result<Option<Level>> {
        query_as::<_, Level>("SELECT * FROM Level WHERE id = $1")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn get_level(&self, id: LevelId) -> AppResult<Level> {
        self.get_opt_level(id)
            .await?
            .ok_or(AppError::LevelDoesNotExist)
    }

    pub async fn get_all_levels(&self) -> sqlx::Result<Vec<Level>> {
        query_as::<_, Level>("SELECT * FROM Level ORDER BY id")
            .fetch_all(&self.pool)
            .await
    }

    pub async fn add_level(
        &self,
        editor: &User,
        question: &str,
        golden_answer: &str,
    ) -> AppResult<Level> {
        editor.try_admin()?;
        require_nonempty("Question", question)?;
        require_nonempty("Golden answer", golden_answer)?;

        let level = query_as::<_, Level>(
            "INSERT INTO Level (question, golden_answer) VALUES ($1, $2) RETURNING *",
        )
        .bind(question)
        .bind(golden_answer)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(editor_id = ?editor.id, level_id = ?level.id, "Level created.");

        Ok(level)
    }

    pub async fn update_level(
        &self,
        editor: &User,
        id: LevelId,
        question: &str,
        golden_answer: &str,
    ) -> AppResult<Level> {
        editor.try_admin()?;
        require_nonempty("Question", question)?;
        require_nonempty("Golden answer", golden_answer)?;

        let level = query_as::<_, Level>(
            "UPDATE Level
                SET question = $1, golden_answer = $2
                WHERE id = $3
                RETURNING *",
        )
        .bind(question)
        .bind(golden_answer)
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::LevelDoesNotExist)?;

        tracing::info!(editor_id = ?editor.id, level_id = ?id, "Level updated.");

        Ok(level)
    }

    /// Deletes a level. Levels that still have answers are kept and
    /// [`AppError::LevelHasAnswers`] is returned.
    pub async fn delete_level(&self, editor: &User, id: LevelId) -> AppResult {
        editor.try_admin()?;

        let mut transaction = self.pool.begin().await?;

        let deleted = sqlx::query(
            "DELETE FROM Level
                WHERE id = $1
                AND NOT EXISTS (SELECT 1 FROM Answer WHERE Answer.level_id = Level.id)",
        )
        .bind(id.0)
        .execute(&mut *transaction)
        .await?
        .rows_affected();

        if deleted == 0 {
            let exists = query_as::<_, (i64,)>("SELECT COUNT(*) FROM Level WHERE id = $1")
                .bind(id.0)
                .fetch_one(&mut *transaction)
                .await?
                .0
                > 0;
            return Err(match exists {
                true => AppError::LevelHasAnswers,
                false => AppError::LevelDoesNotExist,
            });
        }

        transaction.commit().await?;

        tracing::info!(editor_id = ?editor.id, level_id = ?id, "Level deleted.");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sqlx::SqlitePool;

    use super::*;
    use crate::db::Role;

    async fn setup(pool: SqlitePool) -> AppResult<(AppState, User, User)> {
        let state = AppState {
            pool,
            starter_coin: 10,
        };
        let admin = state.insert_user("root", "toor", Role::Admin, 0).await?;
        let alice = state.register_user("alice", "hunter2").await?;
        Ok((state, admin, alice))
    }

    #[sqlx::test]
    async fn level_crud(pool: SqlitePool) -> AppResult {
        let (state, admin, _) = setup(pool).await?;

        let level = state.add_level(&admin, "2 + 2 = ?", "4").await?;
        assert_eq!(state.get_level(level.id).await?, level);

        let updated = state
            .update_level(&admin, level.id, "2 + 3 = ?", "5")
            .await?;
        assert_eq!(updated.question, "2 + 3 = ?");
        assert_eq!(updated.golden_answer, "5");
        assert_eq!(state.get_all_levels().await?, vec![updated]);

        state.delete_level(&admin, level.id).await?;
        assert!(matches!(
            state.get_level(level.id).await,
            Err(AppError::LevelDoesNotExist),
        ));
        Ok(())
    }

    #[sqlx::test]
    async fn level_editing_requires_admin(pool: SqlitePool) -> AppResult {
        let (state, admin, alice) = setup(pool).await?;
        let level = state.add_level(&admin, "2 + 2 = ?", "4").await?;

        assert!(matches!(
            state.add_level(&alice, "q", "a").await,
            Err(AppError::NotAuthorized),
        ));
        assert!(matches!(
            state.update_level(&alice, level.id, "q", "a").await,
            Err(AppError::NotAuthorized),
        ));
        assert!(matches!(
            state.delete_level(&alice, level.id).await,
            Err(AppError::NotAuthorized),
        ));
        assert_eq!(state.get_level(level.id).await?, level);
        Ok(())
    }

    #[sqlx::test]
    async fn missing_level(pool: SqlitePool) -> AppResult {
        let (state, admin, _) = setup(pool).await?;

        assert!(matches!(
            state.update_level(&admin, LevelId(42), "q", "a").await,
            Err(AppError::LevelDoesNotExist),
        ));
        assert!(matches!(
            state.delete_level(&admin, LevelId(42)).await,
            Err(AppError::LevelDoesNotExist),
        ));
        Ok(())
    }

    #[sqlx::test]
    async fn blank_level_fields(pool: SqlitePool) -> AppResult {
        let (state, admin, _) = setup(pool).await?;

        assert!(matches!(
            state.add_level(&admin, "", "4").await,
            Err(AppError::EmptyField(_)),
        ));
        assert!(matches!(
            state.add_level(&admin, "2 + 2 = ?", " ").await,
            Err(AppError::EmptyField(_)),
        ));
        assert!(state.get_all_levels().await?.is_empty());
        Ok(())
    }

    #[sqlx::test]
    async fn level_with_answers_is_not_deleted(pool: SqlitePool) -> AppResult {
        let (state, admin, alice) = setup(pool).await?;
        let level = state.add_level(&admin, "2 + 2 = ?", "4").await?;
        state.submit_answer(&alice, level.id, "4").await?;

        assert!(matches!(
            state.delete_level(&admin, level.id).await,
            Err(AppError::LevelHasAnswers),
        ));
        assert_eq!(state.get_level(level.id).await?, level);
        Ok(())
    }
}
