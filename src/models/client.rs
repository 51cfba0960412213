use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use tracing::debug;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub website: String,
    pub location: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Client {
    fn default() -> Self {
        Client {
            id: Uuid::new_v4(),
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            company: String::new(),
            website: String::new(),
            location: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

impl Client {
    pub fn new(
        name: &str,
        email: &str,
        phone: &str,
        company: &str,
        website: &str,
        location: &str,
    ) -> Self {
        Client {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            company: company.to_string(),
            website: website.to_string(),
            location: location.to_string(),
            ..Default::default()
        }
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT * FROM clients
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(client)
    }

    /// Looks up a client by email, creating one when absent. An existing
    /// client is returned untouched.
    pub async fn get_or_create(
        pool: &PgPool,
        name: &str,
        email: &str,
        phone: &str,
        company: &str,
        website: &str,
        location: &str,
    ) -> Result<Self> {
        if let Some(existing_client) = Self::find_by_email(pool, email).await? {
            return Ok(existing_client);
        }

        let new_client = Client::new(name, email, phone, company, website, location);
        let client = Self::insert(pool, new_client).await?;

        debug!("Client created: {:?}", client.id);
        Ok(client)
    }

    /// Looks up a client by email and refreshes its contact details, creating
    /// one when absent. Email stays fixed since it is the lookup key.
    pub async fn upsert(
        pool: &PgPool,
        name: &str,
        email: &str,
        phone: &str,
        company: &str,
        website: &str,
        location: &str,
    ) -> Result<Self> {
        if let Some(existing_client) = Self::find_by_email(pool, email).await? {
            let client = sqlx::query_as::<_, Client>(
                r#"
                UPDATE clients
                SET name = $1, phone = $2, company = $3, website = $4, location = $5, updated_at = $6
                WHERE id = $7
                RETURNING *
                "#,
            )
            .bind(name)
            .bind(phone)
            .bind(company)
            .bind(website)
            .bind(location)
            .bind(Utc::now())
            .bind(existing_client.id)
            .fetch_one(pool)
            .await?;

            debug!("Client updated: {:?}", client.id);
            return Ok(client);
        }

        let new_client = Client::new(name, email, phone, company, website, location);
        let client = Self::insert(pool, new_client).await?;

        debug!("Client created: {:?}", client.id);
        Ok(client)
    }

    async fn insert(pool: &PgPool, new_client: Client) -> Result<Self> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (id, name, email, phone, company, website, location, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(new_client.id)
        .bind(&new_client.name)
        .bind(&new_client.email)
        .bind(&new_client.phone)
        .bind(&new_client.company)
        .bind(&new_client.website)
        .bind(&new_client.location)
        .bind(new_client.created_at)
        .bind(new_client.updated_at)
        .fetch_one(pool)
        .await?;

        Ok(client)
    }
}
