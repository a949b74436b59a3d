use axum::response::{IntoResponse, Response};

use crate::db::{Level, User};
use crate::traits::RequestBody;
use crate::{AppError, AppState};

#[derive(serde::Deserialize, Debug, Clone)]
pub struct DashboardPage {}

pub struct DashboardPageResponse {
    user: Option<User>,
    levels: Vec<Level>,
    /// Regular users, only listed for admins.
    users: Vec<User>,
}

impl RequestBody for DashboardPage {
    type Response = DashboardPageResponse;

    async fn request(
        self,
        state: AppState,
        user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        let viewer = user.as_ref().ok_or(AppError::NotLoggedIn)?;

        let levels = state.get_all_levels().await?;
        let users = match viewer.is_admin() {
            true => state.get_all_regular_users().await?,
            false => vec![],
        };

        Ok(DashboardPageResponse {
            user,
            levels,
            users,
        })
    }
}

impl IntoResponse for DashboardPageResponse {
    fn into_response(self) -> Response {
        let admin = self.user.as_ref().is_some_and(|u| u.is_admin());
        crate::render_html_template(
            "dashboard.html",
            &self.user,
            serde_json::json!({
                "admin": admin,
                "levels": self.levels,
                "users": self.users,
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
    async fn dashboard_contents(pool: SqlitePool) -> AppResult {
        let state = AppState {
            pool,
            starter_coin: 10,
        };
        let admin = state.insert_user("root", "toor", Role::Admin, 0).await?;
        let alice = state.register_user("alice", "hunter2").await?;
        state.add_level(&admin, "2 + 2 = ?", "4").await?;

        let response = DashboardPage {}.request(state.clone(), Some(admin)).await?;
        assert_eq!(response.levels.len(), 1);
        assert_eq!(response.users.len(), 1);
        assert_eq!(response.users[0].id, alice.id);

        let response = DashboardPage {}.request(state.clone(), Some(alice)).await?;
        assert_eq!(response.levels.len(), 1);
        assert!(response.users.is_empty());

        let result = DashboardPage {}.request(state, None).await;
        assert!(matches!(result, Err(AppError::NotLoggedIn)));
        Ok(())
    }
}
