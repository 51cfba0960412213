use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// Admin-managed email settings. A single row with id 1, absent until the
/// admin saves it for the first time.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Settings {
    pub id: i32,
    pub use_cloudflare_email: bool,
    pub cloudflare_api_token: Option<String>,
    pub cloudflare_from_email: Option<String>,
    pub cloudflare_from_name: Option<String>,
    pub resend_api_key: Option<String>,
    pub default_from_email: String,
    pub default_from_name: String,
    pub updated_at: DateTime<Utc>,
}

impl Settings {
    pub async fn get(pool: &PgPool) -> Result<Option<Self>> {
        let settings = sqlx::query_as::<_, Settings>(
            r#"
            SELECT * FROM settings
            WHERE id = 1
            "#,
        )
        .fetch_optional(pool)
        .await?;

        Ok(settings)
    }
}
