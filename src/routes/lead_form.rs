use actix_web::{get, post, web, HttpResponse, Responder};
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::email::{EmailSettings, OutgoingEmail};
use crate::models::lead_form::LeadFormType;
use crate::models::{Client, LeadForm, Settings};
use crate::routes::present;
use crate::types::{ApiMessage, LeadFormRequest, LeadFormResponse};
use crate::{AppConfig, AppState};

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

#[get("/lead-form")]
pub async fn lead_form_status() -> Result<impl Responder, actix_web::Error> {
    Ok(web::Json(ApiMessage {
        message: "Lead form API is active".to_string(),
    }))
}

#[post("/lead-form")]
pub async fn submit_lead_form(
    app_state: web::Data<Arc<AppState>>,
    app_config: web::Data<Arc<AppConfig>>,
    body: web::Json<LeadFormRequest>,
) -> Result<impl Responder, actix_web::Error> {
    let body = body.into_inner();

    let (Some(name), Some(email), Some(phone), Some(needs), Some(form_type)) = (
        present(&body.name),
        present(&body.email),
        present(&body.phone),
        present(&body.needs),
        body.form_type.clone(),
    ) else {
        return Err(actix_web::error::ErrorBadRequest(
            "Name, email, phone, needs, and formType are required",
        ));
    };

    if name.chars().count() < 2 {
        return Err(actix_web::error::ErrorBadRequest(
            "Name must be at least 2 characters",
        ));
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err(actix_web::error::ErrorBadRequest("Invalid email address"));
    }
    if phone.chars().count() < 10 {
        return Err(actix_web::error::ErrorBadRequest(
            "Phone number must be at least 10 digits",
        ));
    }
    if needs.chars().count() < 10 {
        return Err(actix_web::error::ErrorBadRequest(
            "Please provide more detail about your needs",
        ));
    }

    let company = body.company.as_deref().unwrap_or("");
    let website = body.website.as_deref().unwrap_or("");
    let location = body.location.as_deref().unwrap_or("");

    let client = Client::get_or_create(
        &app_state.pool,
        name,
        email,
        phone,
        company,
        website,
        location,
    )
    .await
    .map_err(|e| {
        error!("Client creation/lookup failed: {:?}", e);
        actix_web::error::ErrorInternalServerError("Failed to process client data")
    })?;

    let new_lead = LeadForm::new(
        name,
        email,
        phone,
        company,
        website,
        location,
        needs,
        body.references.clone(),
        form_type.clone(),
    );
    let lead = LeadForm::create(&app_state.pool, new_lead)
        .await
        .map_err(|e| {
            error!("Lead form creation failed: {:?}", e);
            actix_web::error::ErrorInternalServerError("Failed to save lead form")
        })?;

    info!("Lead form stored: {} (client {})", lead.id, client.id);

    // Settings lookup and the notification email are non-critical, the lead
    // is already persisted.
    let settings = match Settings::get(&app_state.pool).await {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Could not load settings, using defaults: {:?}", e);
            None
        }
    };
    let email_settings = EmailSettings::resolve(settings.as_ref(), &app_config);

    let form_label = match form_type {
        LeadFormType::Quote => "Quote Request",
        LeadFormType::Purchase => "Purchase Request",
    };

    let mut html = format!(
        "<h2>New {}</h2>\n\
         <p><strong>Name:</strong> {}</p>\n\
         <p><strong>Email:</strong> {}</p>\n\
         <p><strong>Phone:</strong> {}</p>\n",
        form_label, name, email, phone
    );
    if !company.is_empty() {
        html.push_str(&format!("<p><strong>Company:</strong> {}</p>\n", company));
    }
    if !website.is_empty() {
        html.push_str(&format!("<p><strong>Website:</strong> {}</p>\n", website));
    }
    if !location.is_empty() {
        html.push_str(&format!("<p><strong>Location:</strong> {}</p>\n", location));
    }
    html.push_str(&format!("<p><strong>Needs:</strong></p>\n<p>{}</p>\n", needs));
    html.push_str(match form_type {
        LeadFormType::Quote => "<p><em>This is a quote request for a multi-page site.</em></p>",
        LeadFormType::Purchase => {
            "<p><em>This is a purchase request for a single-page landing page ($199).</em></p>"
        }
    });

    let notification = OutgoingEmail {
        to: email_settings.admin_recipient(),
        subject: format!("New {} from {}", form_label, name),
        html,
    };
    if let Err(e) = app_state.mailer.send(&notification, &email_settings).await {
        error!("Email sending failed (non-critical): {:?}", e);
    }

    Ok(HttpResponse::Created().json(LeadFormResponse {
        success: true,
        id: lead.id,
        client_id: client.id,
    }))
}
