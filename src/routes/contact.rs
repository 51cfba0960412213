use actix_web::{post, web, HttpResponse, Responder};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::email::{EmailSettings, OutgoingEmail};
use crate::models::{ContactFormSubmission, Settings};
use crate::routes::present;
use crate::types::{ContactRequest, ContactResponse};
use crate::{AppConfig, AppState};

#[post("/contact")]
pub async fn submit_contact(
    app_state: web::Data<Arc<AppState>>,
    app_config: web::Data<Arc<AppConfig>>,
    body: web::Json<ContactRequest>,
) -> Result<impl Responder, actix_web::Error> {
    let body = body.into_inner();

    let (name, email, message) = match (
        present(&body.name),
        present(&body.email),
        present(&body.message),
    ) {
        (Some(name), Some(email), Some(message)) => (name, email, message),
        _ => {
            return Err(actix_web::error::ErrorBadRequest(
                "Name, email, and message are required",
            ))
        }
    };
    let phone = body.phone.as_deref().unwrap_or("");

    let submission = ContactFormSubmission::create(&app_state.pool, name, email, phone, message)
        .await
        .map_err(|e| {
            error!("Failed to save contact submission: {:?}", e);
            actix_web::error::ErrorInternalServerError("Failed to submit contact form")
        })?;

    info!("Contact submission stored: {}", submission.id);

    // Settings lookup and the notification email are non-critical, the
    // submission is already persisted.
    let settings = match Settings::get(&app_state.pool).await {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Could not load settings, using defaults: {:?}", e);
            None
        }
    };
    let email_settings = EmailSettings::resolve(settings.as_ref(), &app_config);

    let mut html = format!(
        "<h2>New Contact Form Submission</h2>\n\
         <p><strong>Name:</strong> {}</p>\n\
         <p><strong>Email:</strong> {}</p>\n",
        name, email
    );
    if !phone.is_empty() {
        html.push_str(&format!("<p><strong>Phone:</strong> {}</p>\n", phone));
    }
    html.push_str(&format!(
        "<p><strong>Message:</strong></p>\n<p>{}</p>",
        message
    ));

    let notification = OutgoingEmail {
        to: email_settings.admin_recipient(),
        subject: format!("New Contact Form Submission from {}", name),
        html,
    };
    if let Err(e) = app_state.mailer.send(&notification, &email_settings).await {
        error!("Email sending failed (non-critical): {:?}", e);
    }

    Ok(HttpResponse::Created().json(ContactResponse {
        success: true,
        id: submission.id,
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::{test, App};

    use crate::paypal::PayPal;
    use crate::routes;
    use crate::routes::test_utils::app_data;

    #[actix_web::test]
    async fn missing_required_fields_return_400() {
        let (state, config) = app_data(PayPal::new("http://localhost:9", None, None));
        let app = test::init_service(
            App::new()
                .app_data(state)
                .app_data(config)
                .configure(routes::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/contact")
            .set_json(serde_json::json!({
                "name": "Ada",
                "email": "ada@example.com",
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
        let body = test::read_body(resp).await;
        assert_eq!(body, "Name, email, and message are required");
    }

    #[actix_web::test]
    async fn empty_strings_count_as_missing() {
        let (state, config) = app_data(PayPal::new("http://localhost:9", None, None));
        let app = test::init_service(
            App::new()
                .app_data(state)
                .app_data(config)
                .configure(routes::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/contact")
            .set_json(serde_json::json!({
                "name": "",
                "email": "ada@example.com",
                "message": "I would like a landing page.",
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
    }
}
