use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Media {
    pub id: Uuid,
    pub filename: String,
    pub mime_type: String,
    pub filesize: i64,
    pub url: String,
    pub alt: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Media {
    fn default() -> Self {
        Media {
            id: Uuid::new_v4(),
            filename: String::new(),
            mime_type: String::new(),
            filesize: 0,
            url: String::new(),
            alt: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

impl Media {
    pub fn new(filename: &str, mime_type: &str, filesize: i64, url: &str, alt: &str) -> Self {
        Media {
            filename: filename.to_string(),
            mime_type: mime_type.to_string(),
            filesize,
            url: url.to_string(),
            alt: alt.to_string(),
            ..Default::default()
        }
    }

    pub async fn create(pool: &PgPool, new_media: Media) -> Result<Self> {
        let media = sqlx::query_as::<_, Media>(
            r#"
            INSERT INTO media (id, filename, mime_type, filesize, url, alt, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(new_media.id)
        .bind(&new_media.filename)
        .bind(&new_media.mime_type)
        .bind(new_media.filesize)
        .bind(&new_media.url)
        .bind(&new_media.alt)
        .bind(new_media.created_at)
        .bind(new_media.updated_at)
        .fetch_one(pool)
        .await?;

        Ok(media)
    }
}
