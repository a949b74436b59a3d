use eyre::{Context, Result};
use sqlx::query_as;

use super::Role;
use crate::AppState;

/// Levels inserted into an empty catalog.
const SAMPLE_LEVELS: &[(&str, &str)] = &[
    ("print('Hello World')?", "Hello World"),
    ("2 + 2 = ?", "4"),
];

impl AppState {
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!().run(&self.pool).await?;
        Ok(())
    }

    /// Creates the admin account if there is none and fills an empty level
    /// catalog with sample levels. Safe to run on every start.
    pub async fn init(&self, admin_username: &str, admin_password: &str) -> Result<()> {
        self.init_admin(admin_username, admin_password)
            .await
            .wrap_err("error creating admin account")?;
        self.init_levels()
            .await
            .wrap_err("error loading sample levels")?;
        Ok(())
    }

    async fn init_admin(&self, username: &str, password: &str) -> Result<()> {
        let (admin_count,) =
            query_as::<_, (i64,)>("SELECT COUNT(*) FROM UserAccount WHERE role = $1")
                .bind(Role::Admin)
                .fetch_one(&self.pool)
                .await?;
        if admin_count > 0 {
            return Ok(());
        }

        let admin = self.insert_user(username, password, Role::Admin, 0).await?;
        tracing::info!(user_id = ?admin.id, username, "Created admin account.");
        Ok(())
    }

    async fn init_levels(&self) -> Result<()> {
        let mut transaction = self.pool.begin().await?;

        let (level_count,) = query_as::<_, (i64,)>("SELECT COUNT(*) FROM Level")
            .fetch_one(&mut *transaction)
            .await?;
        if level_count > 0 {
            return Ok(());
        }

        for (question, golden_answer) in SAMPLE_LEVELS {
            sqlx::query("INSERT INTO Level (question, golden_answer) VALUES ($1, $2)")
                .bind(*question)
                .bind(*golden_answer)
                .execute(&mut *transaction)
                .await?;
        }

        transaction.commit().await?;
        tracing::info!(count = SAMPLE_LEVELS.len(), "Added sample levels.");
        Ok(())
    }
}
