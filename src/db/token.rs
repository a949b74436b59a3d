use chrono::{DateTime, TimeDelta, Utc};
use sqlx::query_as;

use crate::db::{User, UserId};
use crate::AppState;

/// How long a session token is valid for.
const TOKEN_DURATION: TimeDelta = TimeDelta::days(30);
/// Number of characters in a token.
const TOKEN_LEN: usize = 64;

id_struct!(TokenId, Token);
/// Token for staying logged in.
#[derive(sqlx::FromRow, Debug)]
pub struct Token {
    #[allow(unused)]
    pub id: TokenId, // stored in DB; never actually read by Rust code
    pub user_id: UserId,
    pub string: String,
    pub expiry: DateTime<Utc>,
}

impl Token {
    /// Returns whether the token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expiry
    }
}

impl AppState {
    /// Returns the status of a token, includes user that the token belongs to
    /// if it is valid.
    pub async fn token_status(&self, string: Option<&str>) -> sqlx::Result<TokenStatus> {
        let Some(string) = string else {
            return Ok(TokenStatus::None);
        };

        let token = query_as::<_, Token>("SELECT * FROM Token WHERE string = $1")
            .bind(string)
            .fetch_optional(&self.pool)
            .await?;

        let Some(token) = token else {
            return Ok(TokenStatus::Unknown);
        };

        if token.is_expired() {
            self.remove_token(&token.string).await?;
            return Ok(TokenStatus::Expired);
        }

        let Some(user) = self.get_opt_user(token.user_id).await? else {
            return Ok(TokenStatus::Unknown);
        };

        Ok(TokenStatus::Valid(user))
    }

    /// Creates a token for a user and adds it to the database.
    pub async fn create_token(&self, user_id: UserId) -> sqlx::Result<Token> {
        let expiry = Utc::now() + TOKEN_DURATION;
        let string = crate::util::random_alphanumeric_string(TOKEN_LEN);

        query_as::<_, Token>(
            "INSERT INTO Token (user_id, string, expiry) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(user_id.0)
        .bind(string)
        .bind(expiry)
        .fetch_one(&self.pool)
        .await
    }

    /// Removes a token from the database.
    pub async fn remove_token(&self, string: &str) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM Token WHERE string = $1")
            .bind(string)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Removes all tokens for a user from the database.
    pub async fn remove_all_tokens_for_user(&self, user: UserId) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM Token WHERE user_id = $1")
            .bind(user.0)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub enum TokenStatus {
    /// No token was given.
    #[default]
    None,
    /// The token is valid and the user is logged in.
    Valid(User),
    /// The token has expired.
    Expired,
    /// The token is not recognized.
    Unknown,
}
