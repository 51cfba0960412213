use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Type};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "contact_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    New,
    Read,
    Replied,
    Archived,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct ContactFormSubmission {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub status: ContactStatus,
    pub submitted_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for ContactFormSubmission {
    fn default() -> Self {
        ContactFormSubmission {
            id: Uuid::new_v4(),
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            message: String::new(),
            status: ContactStatus::New,
            submitted_at: Utc::now(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

impl ContactFormSubmission {
    pub fn new(name: &str, email: &str, phone: &str, message: &str) -> Self {
        ContactFormSubmission {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            message: message.to_string(),
            ..Default::default()
        }
    }

    pub async fn create(
        pool: &PgPool,
        name: &str,
        email: &str,
        phone: &str,
        message: &str,
    ) -> Result<Self> {
        let new_submission = ContactFormSubmission::new(name, email, phone, message);

        let submission = sqlx::query_as::<_, ContactFormSubmission>(
            r#"
            INSERT INTO contact_form_submissions (id, name, email, phone, message, status, submitted_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(new_submission.id)
        .bind(&new_submission.name)
        .bind(&new_submission.email)
        .bind(&new_submission.phone)
        .bind(&new_submission.message)
        .bind(new_submission.status.clone())
        .bind(new_submission.submitted_at)
        .bind(new_submission.created_at)
        .bind(new_submission.updated_at)
        .fetch_one(pool)
        .await?;

        Ok(submission)
    }
}
