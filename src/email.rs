use reqwest::Client;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

use crate::config::AppConfig;
use crate::models::Settings;

const RESEND_API_URL: &str = "https://api.resend.com/emails";
const CLOUDFLARE_EMAIL_API_URL: &str =
    "https://api.cloudflare.com/client/v4/accounts/{account_id}/email/routing/rules";

const FALLBACK_FROM_EMAIL: &str = "onboarding@resend.dev";
const FALLBACK_FROM_NAME: &str = "Landing Page Portfolio";
const FALLBACK_ADMIN_EMAIL: &str = "admin@example.com";

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Resend API key is not configured")]
    ResendKeyMissing,
    #[error("email request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("email API error ({status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Clone)]
pub struct CloudflareEmailConfig {
    pub api_token: String,
    pub from_email: String,
    pub from_name: String,
}

/// Sender identity and provider selection for one send, resolved from the
/// admin-managed settings row with environment values as fallback.
#[derive(Debug, Clone, Default)]
pub struct EmailSettings {
    pub use_cloudflare: bool,
    pub cloudflare: Option<CloudflareEmailConfig>,
    pub resend_api_key: Option<String>,
    pub from_email: Option<String>,
    pub from_name: Option<String>,
}

impl EmailSettings {
    pub fn resolve(settings: Option<&Settings>, config: &AppConfig) -> Self {
        let from_email = settings
            .map(|s| s.default_from_email.clone())
            .or_else(|| config.default_from_email.clone());
        let from_name = settings
            .map(|s| s.default_from_name.clone())
            .or_else(|| config.default_from_name.clone());

        let resend_api_key = settings
            .and_then(|s| s.resend_api_key.clone())
            .or_else(|| config.resend_api_key.clone());

        let use_cloudflare = settings.map(|s| s.use_cloudflare_email).unwrap_or(false);
        let cloudflare = settings.and_then(|s| {
            s.cloudflare_api_token
                .clone()
                .map(|api_token| CloudflareEmailConfig {
                    api_token,
                    from_email: s.cloudflare_from_email.clone().unwrap_or_default(),
                    from_name: s.cloudflare_from_name.clone().unwrap_or_default(),
                })
        });

        EmailSettings {
            use_cloudflare,
            cloudflare,
            resend_api_key,
            from_email,
            from_name,
        }
    }

    /// Recipient for internal notification emails. Submissions go to the
    /// configured sender address, the admin inbox.
    pub fn admin_recipient(&self) -> String {
        self.from_email
            .clone()
            .unwrap_or_else(|| FALLBACK_ADMIN_EMAIL.to_string())
    }
}

#[derive(Clone)]
pub struct Mailer {
    http: Client,
    resend_url: String,
    cloudflare_url: String,
}

impl Default for Mailer {
    fn default() -> Self {
        Self::new()
    }
}

impl Mailer {
    pub fn new() -> Self {
        Mailer {
            http: Client::new(),
            resend_url: RESEND_API_URL.to_string(),
            cloudflare_url: CLOUDFLARE_EMAIL_API_URL.to_string(),
        }
    }

    pub async fn send(
        &self,
        email: &OutgoingEmail,
        settings: &EmailSettings,
    ) -> Result<(), EmailError> {
        if settings.use_cloudflare {
            if let Some(cloudflare) = &settings.cloudflare {
                return self.send_cloudflare(email, cloudflare).await;
            }
        }
        self.send_resend(email, settings).await
    }

    async fn send_resend(
        &self,
        email: &OutgoingEmail,
        settings: &EmailSettings,
    ) -> Result<(), EmailError> {
        let api_key = settings
            .resend_api_key
            .as_deref()
            .ok_or(EmailError::ResendKeyMissing)?;
        let from_email = settings.from_email.as_deref().unwrap_or(FALLBACK_FROM_EMAIL);
        let from_name = settings.from_name.as_deref().unwrap_or(FALLBACK_FROM_NAME);

        let body = json!({
            "from": format!("{} <{}>", from_name, from_email),
            "to": [email.to],
            "subject": email.subject,
            "html": email.html,
        });

        let response = self
            .http
            .post(&self.resend_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await;

        match response {
            Ok(resp) => {
                if resp.status().is_success() {
                    debug!("Email sent to {}: {}", email.to, email.subject);
                    Ok(())
                } else {
                    Err(Self::api_error(resp).await)
                }
            }
            Err(e) => {
                error!("Resend request error: {}", e);
                Err(e.into())
            }
        }
    }

    /// The Cloudflare path only registers a forwarding rule. Actual delivery
    /// depends on an email Worker configured on the account.
    async fn send_cloudflare(
        &self,
        email: &OutgoingEmail,
        config: &CloudflareEmailConfig,
    ) -> Result<(), EmailError> {
        let body = json!({
            "actions": [
                {
                    "type": "forward",
                    "value": [email.to],
                }
            ],
            "matchers": [
                {
                    "type": "literal",
                    "field": "to",
                    "value": config.from_email,
                }
            ],
        });

        let response = self
            .http
            .post(&self.cloudflare_url)
            .bearer_auth(&config.api_token)
            .json(&body)
            .send()
            .await;

        match response {
            Ok(resp) => {
                if resp.status().is_success() {
                    Ok(())
                } else {
                    Err(Self::api_error(resp).await)
                }
            }
            Err(e) => {
                error!("Cloudflare email request error: {}", e);
                Err(e.into())
            }
        }
    }

    async fn api_error(resp: reqwest::Response) -> EmailError {
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read response body".to_string());
        error!("Error response from email provider ({}): {}", status, body);

        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| {
                value
                    .get("message")
                    .and_then(|m| m.as_str())
                    .map(|m| m.to_string())
            })
            .unwrap_or(body);

        EmailError::Api { status, message }
    }
}
