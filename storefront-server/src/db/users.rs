//! User lookups

use shared::models::User;
use sqlx::PgPool;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub async fn find_by_id(pool: &PgPool, user_id: i64) -> Result<Option<User>, BoxError> {
    let row: Option<User> =
        sqlx::query_as("SELECT id, name, email, role, created_at FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    Ok(row)
}
