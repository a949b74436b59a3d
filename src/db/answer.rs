use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, query_as};

use super::{LevelId, ReviewAuthorization, User, UserId};
use crate::error::require_nonempty;
use crate::{AppError, AppResult, AppState};

id_struct!(AnswerId, Answer);

#[derive(sqlx::Type, Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AnswerStatus {
    Pending,
    Approved,
    Rejected,
}

/// Outcome chosen by a reviewer.
#[derive(Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approve,
    Reject,
}
impl From<ReviewDecision> for AnswerStatus {
    fn from(value: ReviewDecision) -> Self {
        match value {
            ReviewDecision::Approve => AnswerStatus::Approved,
            ReviewDecision::Reject => AnswerStatus::Rejected,
        }
    }
}

/// User's answer to a level.
#[derive(sqlx::FromRow, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub id: AnswerId,
    pub content: String,
    pub user_id: UserId,
    pub level_id: LevelId,
    pub status: AnswerStatus,
}

#[derive(sqlx::FromRow, Serialize, Debug, Clone)]
pub struct AnswerWithAuthor {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub answer: Answer,
    pub author_name: String,
}

impl AppState {
    pub async fn get_opt_answer(&self, id: AnswerId) -> sqlx::Result<Option<Answer>> {
        query_as::<_, Answer>("SELECT * FROM Answer WHERE id = $1")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn get_answer(&self, id: AnswerId) -> AppResult<Answer> {
        self.get_opt_answer(id)
            .await?
            .ok_or(AppError::AnswerDoesNotExist)
    }

    /// Returns all answers to a level in submission order.
    pub async fn get_answers_for_level(
        &self,
        level_id: LevelId,
    ) -> sqlx::Result<Vec<AnswerWithAuthor>> {
        query_as::<_, AnswerWithAuthor>(
            "SELECT Answer.*, UserAccount.username AS author_name
                FROM Answer
                JOIN UserAccount ON Answer.user_id = UserAccount.id
                WHERE Answer.level_id = $1
                ORDER BY Answer.id",
        )
        .bind(level_id.0)
        .fetch_all(&self.pool)
        .await
    }

    /// Charges the author one coin and records a pending answer.
    ///
    /// The charge and the insert happen in one transaction. The charge only
    /// applies while the balance is at least one, so concurrent submissions
    /// cannot overdraw.
    pub async fn submit_answer(
        &self,
        author: &User,
        level_id: LevelId,
        content: &str,
    ) -> AppResult<Answer> {
        require_nonempty("Answer", content)?;
        self.get_level(level_id).await?;

        let mut transaction = self.pool.begin().await?;

        let charged = sqlx::query(
            "UPDATE UserAccount
                SET coin = coin - 1
                WHERE id = $1 AND coin >= 1",
        )
        .bind(author.id.0)
        .execute(&mut *transaction)
        .await?
        .rows_affected();
        if charged == 0 {
            return Err(AppError::InsufficientCoin);
        }

        let answer = insert_pending_answer(&mut transaction, author.id, level_id, content).await?;

        transaction.commit().await?;

        tracing::info!(user_id = ?author.id, ?level_id, answer_id = ?answer.id, "Answer submitted.");

        Ok(answer)
    }

    /// Sets the status of an answer. Approving pays the reviewer one coin,
    /// every time, even if the answer was already approved.
    pub async fn review_answer(
        &self,
        reviewer: &User,
        answer_id: AnswerId,
        decision: ReviewDecision,
    ) -> AppResult<Answer> {
        // the author of an answer never changes, so this check does not need
        // to be inside the transaction
        let old_answer = self.get_answer(answer_id).await?;
        let auth = reviewer.try_review_auth(&old_answer)?;

        let status = AnswerStatus::from(decision);

        let mut transaction = self.pool.begin().await?;

        let answer = query_as::<_, Answer>(
            "UPDATE Answer
                SET status = $1
                WHERE id = $2
                RETURNING *",
        )
        .bind(status)
        .bind(answer_id.0)
        .fetch_optional(&mut *transaction)
        .await?
        .ok_or(AppError::AnswerDoesNotExist)?;

        if decision == ReviewDecision::Approve {
            sqlx::query("UPDATE UserAccount SET coin = coin + 1 WHERE id = $1")
                .bind(reviewer.id.0)
                .execute(&mut *transaction)
                .await?;
        }

        transaction.commit().await?;

        tracing::info!(
            reviewer_id = ?reviewer.id,
            ?auth,
            ?answer_id,
            old_status = ?old_answer.status,
            new_status = ?status,
            "Answer reviewed.",
        );

        Ok(answer)
    }
}

/// Inserts a pending answer. A level that disappeared since it was looked up
/// is reported as [`AppError::LevelDoesNotExist`].
async fn insert_pending_answer(
    conn: &mut SqliteConnection,
    user_id: UserId,
    level_id: LevelId,
    content: &str,
) -> AppResult<Answer> {
    let result = query_as::<_, Answer>(
        "INSERT INTO Answer (content, user_id, level_id, status)
            VALUES ($1, $2, $3, $4)
            RETURNING *",
    )
    .bind(content)
    .bind(user_id.0)
    .bind(level_id.0)
    .bind(AnswerStatus::Pending)
    .fetch_one(conn)
    .await;

    match result {
        Ok(answer) => Ok(answer),
        Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
            Err(AppError::LevelDoesNotExist)
        }
        Err(e) => Err(e.into()),
    }
}
