use serde::{Deserialize, Serialize};
use sqlx::query_as;

use super::{Answer, ReviewAuthorization};
use crate::{AppError, AppResult, AppState, password};

id_struct!(UserId, User);

/// Role of an account. Logging in goes through a separate form per role.
#[derive(sqlx::Type, Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

#[derive(sqlx::FromRow, Serialize, Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub coin: i64,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Returns whether the user may approve or reject `answer`.
    ///
    /// Admins may review anything. Regular users may review any answer except
    /// their own.
    pub fn can_review(&self, answer: &Answer) -> Option<ReviewAuthorization> {
        match self.role {
            Role::Admin => Some(ReviewAuthorization::Admin),
            Role::User if self.id != answer.user_id => Some(ReviewAuthorization::Peer),
            Role::User => None,
        }
    }

    pub fn try_review_auth(&self, answer: &Answer) -> AppResult<ReviewAuthorization> {
        self.can_review(answer).ok_or(AppError::NotAuthorized)
    }

    pub fn try_admin(&self) -> AppResult {
        match self.is_admin() {
            true => Ok(()),
            false => Err(AppError::NotAuthorized),
        }
    }

    /// Data shown in the page header for the signed-in user.
    pub fn to_header_json(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "username": self.username,
            "coin": self.coin,
            "admin": self.is_admin(),
        })
    }
}

impl AppState {
    pub async fn get_opt_user(&self, id: UserId) -> sqlx::Result<Option<User>> {
        query_as::<_, User>("SELECT * FROM UserAccount WHERE id = $1")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn get_user(&self, id: UserId) -> AppResult<User> {
        self.get_opt_user(id)
            .await?
            .ok_or(AppError::UserDoesNotExist)
    }

    pub async fn get_opt_user_from_username(&self, username: &str) -> sqlx::Result<Option<User>> {
        query_as::<_, User>("SELECT * FROM UserAccount WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
    }

    /// Returns all non-admin users, ordered by ID.
    pub async fn get_all_regular_users(&self) -> sqlx::Result<Vec<User>> {
        query_as::<_, User>("SELECT * FROM UserAccount WHERE role = $1 ORDER BY id")
            .bind(Role::User)
            .fetch_all(&self.pool)
            .await
    }

    /// Inserts a new account, hashing `password`.
    pub(crate) async fn insert_user(
        &self,
        username: &str,
        password: &str,
        role: Role,
        coin: i64,
    ) -> AppResult<User> {
        crate::error::require_nonempty("Username", username)?;
        crate::error::require_nonempty("Password", password)?;

        if self.get_opt_user_from_username(username).await?.is_some() {
            return Err(AppError::UsernameTaken);
        }

        let password_hash = password::hash_password(password)?;

        let result = query_as::<_, User>(
            "INSERT INTO UserAccount (username, password_hash, role, coin)
                VALUES ($1, $2, $3, $4)
                RETURNING *",
        )
        .bind(username)
        .bind(password_hash)
        .bind(role)
        .bind(coin)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            // lost a race with another registration
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(AppError::UsernameTaken)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Creates a regular user with the starter coin balance.
    pub async fn register_user(&self, username: &str, password: &str) -> AppResult<User> {
        let user = self
            .insert_user(username, password, Role::User, self.starter_coin)
            .await?;

        tracing::info!(user_id = ?user.id, username, "User registered.");

        Ok(user)
    }

    /// Checks credentials against the account with `username` and `role`.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> AppResult<User> {
        let user: Option<User> =
            query_as::<_, User>("SELECT * FROM UserAccount WHERE username = $1 AND role = $2")
                .bind(username)
                .bind(role)
                .fetch_optional(&self.pool)
                .await?;

        match user {
            Some(user) if password::verify_password(password, &user.password_hash) => Ok(user),
            _ => {
                tracing::info!(username, ?role, "Failed login attempt.");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    /// Adds `delta` to a user's coin balance, clamping the result at zero.
    pub async fn adjust_coin(&self, editor: &User, target: UserId, delta: i32) -> AppResult<User> {
        editor.try_admin()?;
        let old_coin = self.get_user(target).await?.coin;

        let user = query_as::<_, User>(
            "UPDATE UserAccount
                SET coin = MAX(0, coin + $1)
                WHERE id = $2
                RETURNING *",
        )
        .bind(i64::from(delta))
        .bind(target.0)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(
            editor_id = ?editor.id,
            target_id = ?target,
            delta,
            old_coin,
            coin = user.coin,
            "Coin balance adjusted."
        );

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use sqlx::SqlitePool;

    use super::*;

    fn state(pool: SqlitePool) -> AppState {
        AppState {
            pool,
            starter_coin: 10,
        }
    }

    #[sqlx::test]
    async fn register_gives_starter_coin(pool: SqlitePool) -> AppResult {
        let state = state(pool);
        let user = state.register_user("alice", "hunter2").await?;
        assert_eq!(user.coin, 10);
        assert_eq!(user.role, Role::User);
        assert_ne!(user.password_hash, "hunter2");
        Ok(())
    }

    #[sqlx::test]
    async fn register_duplicate_username(pool: SqlitePool) -> AppResult {
        let state = state(pool);
        state.register_user("alice", "hunter2").await?;

        let result = state.register_user("alice", "other").await;
        assert!(matches!(result, Err(AppError::UsernameTaken)));

        let (count,) = query_as::<_, (i64,)>("SELECT COUNT(*) FROM UserAccount")
            .fetch_one(&state.pool)
            .await?;
        assert_eq!(count, 1);
        Ok(())
    }

    #[sqlx::test]
    async fn usernames_are_case_sensitive(pool: SqlitePool) -> AppResult {
        let state = state(pool);
        state.register_user("alice", "hunter2").await?;
        state.register_user("Alice", "hunter2").await?;
        Ok(())
    }

    #[sqlx::test]
    async fn register_rejects_blank_fields(pool: SqlitePool) -> AppResult {
        let state = state(pool);
        assert!(matches!(
            state.register_user("  ", "hunter2").await,
            Err(AppError::EmptyField(_)),
        ));
        assert!(matches!(
            state.register_user("alice", "").await,
            Err(AppError::EmptyField(_)),
        ));
        Ok(())
    }

    #[sqlx::test]
    async fn authenticate_checks_password_and_role(pool: SqlitePool) -> AppResult {
        let state = state(pool);
        let alice = state.register_user("alice", "hunter2").await?;
        state.insert_user("root", "toor", Role::Admin, 0).await?;

        let user = state.authenticate("alice", "hunter2", Role::User).await?;
        assert_eq!(user.id, alice.id);

        assert!(matches!(
            state.authenticate("alice", "wrong", Role::User).await,
            Err(AppError::InvalidCredentials),
        ));
        assert!(matches!(
            state.authenticate("alice", "hunter2", Role::Admin).await,
            Err(AppError::InvalidCredentials),
        ));
        assert!(matches!(
            state.authenticate("root", "toor", Role::User).await,
            Err(AppError::InvalidCredentials),
        ));
        assert!(matches!(
            state.authenticate("nobody", "hunter2", Role::User).await,
            Err(AppError::InvalidCredentials),
        ));
        state.authenticate("root", "toor", Role::Admin).await?;
        Ok(())
    }

    #[sqlx::test]
    async fn adjust_coin_clamps_at_zero(pool: SqlitePool) -> AppResult {
        let state = state(pool);
        let admin = state.insert_user("root", "toor", Role::Admin, 0).await?;
        let alice = state.insert_user("alice", "hunter2", Role::User, 3).await?;

        let alice = state.adjust_coin(&admin, alice.id, -1000).await?;
        assert_eq!(alice.coin, 0);

        let alice = state.adjust_coin(&admin, alice.id, 5).await?;
        assert_eq!(alice.coin, 5);

        let alice = state.adjust_coin(&admin, alice.id, -2).await?;
        assert_eq!(alice.coin, 3);
        Ok(())
    }

    #[sqlx::test]
    async fn adjust_coin_requires_admin(pool: SqlitePool) -> AppResult {
        let state = state(pool);
        let alice = state.register_user("alice", "hunter2").await?;
        let bob = state.register_user("bob", "hunter2").await?;

        assert!(matches!(
            state.adjust_coin(&alice, bob.id, 100).await,
            Err(AppError::NotAuthorized),
        ));
        assert_eq!(state.get_user(bob.id).await?.coin, 10);
        Ok(())
    }

    #[sqlx::test]
    async fn adjust_coin_unknown_user(pool: SqlitePool) -> AppResult {
        let state = state(pool);
        let admin = state.insert_user("root", "toor", Role::Admin, 0).await?;

        assert!(matches!(
            state.adjust_coin(&admin, UserId(999), 1).await,
            Err(AppError::UserDoesNotExist),
        ));
        Ok(())
    }
}
