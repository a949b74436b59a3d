use crate::api::DashboardRedirect;
use crate::db::{User, UserId};
use crate::{AppError, AppState, RequestBody};

#[derive(serde::Deserialize)]
pub struct UpdateCoinRequest {
    pub user_id: i32,
    /// Amount to add; negative amounts subtract.
    pub coin: i32,
}
impl RequestBody for UpdateCoinRequest {
    type Response = DashboardRedirect;

    async fn request(
        self,
        state: AppState,
        user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        let editor = user.ok_or(AppError::NotLoggedIn)?;
        state
            .adjust_coin(&editor, UserId(self.user_id), self.coin)
            .await?;
        Ok(DashboardRedirect)
    }
}
