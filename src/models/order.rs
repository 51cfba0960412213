use anyhow::Result;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Type};
use tracing::debug;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "order_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Purchase,
    Quote,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
    Processing,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub client_id: Option<Uuid>,
    pub lead_form_id: Option<Uuid>,
    pub order_type: OrderType,
    pub amount: f64,
    pub status: OrderStatus,
    pub paypal_order_id: Option<String>,
    pub payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Order {
    fn default() -> Self {
        Order {
            id: Uuid::new_v4(),
            order_number: Order::generate_order_number(),
            client_id: None,
            lead_form_id: None,
            order_type: OrderType::Purchase,
            amount: 0.0,
            status: OrderStatus::Pending,
            paypal_order_id: None,
            payment_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

impl Order {
    /// Human-readable order references like ORD-1717171717171-042. Uniqueness
    /// is enforced by the database, the random suffix only avoids collisions
    /// within the same millisecond.
    pub fn generate_order_number() -> String {
        let millis = Utc::now().timestamp_millis();
        let suffix = rand::thread_rng().gen_range(0..1000);
        format!("ORD-{}-{}", millis, suffix)
    }

    /// Records a freshly created provider order before the buyer has approved
    /// anything. No client is attached yet.
    pub async fn create_pending(
        pool: &PgPool,
        amount: f64,
        paypal_order_id: &str,
        lead_form_id: Uuid,
    ) -> Result<Self> {
        let new_order = Order {
            amount,
            paypal_order_id: Some(paypal_order_id.to_string()),
            lead_form_id: Some(lead_form_id),
            ..Default::default()
        };

        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (id, order_number, client_id, lead_form_id, order_type, amount, status, paypal_order_id, payment_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(new_order.id)
        .bind(&new_order.order_number)
        .bind(new_order.client_id)
        .bind(new_order.lead_form_id)
        .bind(new_order.order_type.clone())
        .bind(new_order.amount)
        .bind(new_order.status.clone())
        .bind(&new_order.paypal_order_id)
        .bind(&new_order.payment_id)
        .bind(new_order.created_at)
        .bind(new_order.updated_at)
        .fetch_one(pool)
        .await?;

        debug!("Order created: {:?}", order.id);
        Ok(order)
    }

    pub async fn find_by_paypal_order_id(
        pool: &PgPool,
        paypal_order_id: &str,
    ) -> Result<Option<Self>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT * FROM orders
            WHERE paypal_order_id = $1
            "#,
        )
        .bind(paypal_order_id)
        .fetch_optional(pool)
        .await?;

        Ok(order)
    }

    pub async fn mark_paid(pool: &PgPool, id: Uuid, payment_id: &str) -> Result<Self> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders
            SET status = $1, payment_id = $2, updated_at = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(OrderStatus::Paid)
        .bind(payment_id)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(pool)
        .await?;

        debug!("Order marked paid: {:?}", order.id);
        Ok(order)
    }

    pub async fn set_client(pool: &PgPool, id: Uuid, client_id: Uuid) -> Result<Self> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders
            SET client_id = $1, updated_at = $2
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(client_id)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(pool)
        .await?;

        Ok(order)
    }
}
