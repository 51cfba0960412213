use actix_web::web;

pub mod contact;
pub mod lead_form;
pub mod paypal;
pub mod upload;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(contact::submit_contact)
            .service(lead_form::lead_form_status)
            .service(lead_form::submit_lead_form)
            .service(upload::upload_files)
            .service(
                web::scope("/paypal")
                    .service(paypal::create_order)
                    .service(paypal::capture_order)
                    .service(paypal::debug_credentials),
            ),
    );
}

/// Required-field check with JS-style semantics: absent and empty both fail.
pub(crate) fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

#[cfg(test)]
pub(crate) mod test_utils {
    use actix_web::web;
    use sqlx::PgPool;
    use std::sync::Arc;

    use crate::email::Mailer;
    use crate::paypal::PayPal;
    use crate::{AppConfig, AppState};

    pub fn test_config() -> AppConfig {
        AppConfig {
            database_url: "postgres://postgres@localhost/studio_test".to_string(),
            public_site_url: "http://localhost:3000".to_string(),
            paypal_mode: None,
            paypal_client_id: Some("test-client-id".to_string()),
            paypal_client_secret: Some("test-client-secret".to_string()),
            resend_api_key: None,
            default_from_email: None,
            default_from_name: None,
            media_dir: std::env::temp_dir().display().to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
        }
    }

    /// A pool that never actually connects. Handler tests only exercise paths
    /// that return before running a query.
    pub fn lazy_pool() -> PgPool {
        PgPool::connect_lazy("postgres://postgres@localhost/studio_test").unwrap()
    }

    pub fn app_data(paypal: PayPal) -> (web::Data<Arc<AppState>>, web::Data<Arc<AppConfig>>) {
        let state = AppState {
            pool: lazy_pool(),
            paypal,
            mailer: Mailer::new(),
        };
        (
            web::Data::new(Arc::new(state)),
            web::Data::new(Arc::new(test_config())),
        )
    }
}
