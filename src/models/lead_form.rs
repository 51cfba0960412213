use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Type};
use tracing::debug;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "lead_form_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LeadFormType {
    Quote,
    Purchase,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "lead_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum LeadStatus {
    New,
    Contacted,
    QuoteSent,
    InProgress,
    Completed,
    Archived,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct LeadForm {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub website: String,
    pub location: String,
    pub needs: String,
    pub reference_ids: Vec<Uuid>,
    pub form_type: LeadFormType,
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for LeadForm {
    fn default() -> Self {
        LeadForm {
            id: Uuid::new_v4(),
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            company: String::new(),
            website: String::new(),
            location: String::new(),
            needs: String::new(),
            reference_ids: Vec::new(),
            form_type: LeadFormType::Quote,
            status: LeadStatus::New,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

impl LeadForm {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &str,
        email: &str,
        phone: &str,
        company: &str,
        website: &str,
        location: &str,
        needs: &str,
        reference_ids: Vec<Uuid>,
        form_type: LeadFormType,
    ) -> Self {
        LeadForm {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            company: company.to_string(),
            website: website.to_string(),
            location: location.to_string(),
            needs: needs.to_string(),
            reference_ids,
            form_type,
            ..Default::default()
        }
    }

    pub async fn create(pool: &PgPool, new_lead: LeadForm) -> Result<Self> {
        let lead = sqlx::query_as::<_, LeadForm>(
            r#"
            INSERT INTO lead_forms (id, name, email, phone, company, website, location, needs, reference_ids, form_type, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(new_lead.id)
        .bind(&new_lead.name)
        .bind(&new_lead.email)
        .bind(&new_lead.phone)
        .bind(&new_lead.company)
        .bind(&new_lead.website)
        .bind(&new_lead.location)
        .bind(&new_lead.needs)
        .bind(&new_lead.reference_ids)
        .bind(new_lead.form_type.clone())
        .bind(new_lead.status.clone())
        .bind(new_lead.created_at)
        .bind(new_lead.updated_at)
        .fetch_one(pool)
        .await?;

        debug!("Lead form created: {:?}", lead.id);
        Ok(lead)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>> {
        let lead = sqlx::query_as::<_, LeadForm>(
            r#"
            SELECT * FROM lead_forms
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(lead)
    }

    pub async fn set_status(pool: &PgPool, id: Uuid, status: LeadStatus) -> Result<Self> {
        let lead = sqlx::query_as::<_, LeadForm>(
            r#"
            UPDATE lead_forms
            SET status = $1, updated_at = $2
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(pool)
        .await?;

        Ok(lead)
    }
}
