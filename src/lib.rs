use sqlx::PgPool;

pub mod config;
pub mod docs;
pub mod email;
pub mod models;
pub mod paypal;
pub mod routes;
pub mod types;

pub use config::AppConfig;

pub struct AppState {
    pub pool: PgPool,
    pub paypal: paypal::PayPal,
    pub mailer: email::Mailer,
}

impl AppState {
    pub fn new(pool: PgPool, config: &AppConfig) -> Self {
        AppState {
            pool,
            paypal: paypal::PayPal::from_config(config),
            mailer: email::Mailer::new(),
        }
    }
}
