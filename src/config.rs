use anyhow::anyhow;
use std::env;

const PAYPAL_SANDBOX_URL: &str = "https://api-m.sandbox.paypal.com";
const PAYPAL_LIVE_URL: &str = "https://api-m.paypal.com";

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub public_site_url: String,
    pub paypal_mode: Option<String>,
    pub paypal_client_id: Option<String>,
    pub paypal_client_secret: Option<String>,
    pub resend_api_key: Option<String>,
    pub default_from_email: Option<String>,
    pub default_from_name: Option<String>,
    pub media_dir: String,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow!("DATABASE_URL not found"))?
            .trim()
            .to_string();

        if database_url.is_empty() {
            return Err(anyhow!("DATABASE_URL is set but empty"));
        }
        if !database_url.starts_with("postgresql://") && !database_url.starts_with("postgres://") {
            return Err(anyhow!(
                "DATABASE_URL must start with 'postgresql://' or 'postgres://'"
            ));
        }

        let public_site_url =
            env::var("PUBLIC_SITE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let paypal_mode = env::var("PAYPAL_MODE").ok();
        let paypal_client_id = env::var("PAYPAL_CLIENT_ID").ok();
        let paypal_client_secret = env::var("PAYPAL_CLIENT_SECRET").ok();

        let resend_api_key = env::var("RESEND_API_KEY").ok();
        let default_from_email = env::var("DEFAULT_FROM_EMAIL").ok();
        let default_from_name = env::var("DEFAULT_FROM_NAME").ok();

        let media_dir = env::var("MEDIA_DIR").unwrap_or_else(|_| "media".to_string());

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| anyhow!("PORT must be a valid port number"))?;

        Ok(AppConfig {
            database_url,
            public_site_url,
            paypal_mode,
            paypal_client_id,
            paypal_client_secret,
            resend_api_key,
            default_from_email,
            default_from_name,
            media_dir,
            host,
            port,
        })
    }

    /// Live endpoints are only used when PAYPAL_MODE is explicitly "live".
    pub fn paypal_base_url(&self) -> &'static str {
        match self.paypal_mode.as_deref() {
            Some("live") => PAYPAL_LIVE_URL,
            _ => PAYPAL_SANDBOX_URL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sandbox_is_the_default_base_url() {
        let config = AppConfig {
            database_url: "postgres://localhost/studio".to_string(),
            public_site_url: "http://localhost:3000".to_string(),
            paypal_mode: None,
            paypal_client_id: None,
            paypal_client_secret: None,
            resend_api_key: None,
            default_from_email: None,
            default_from_name: None,
            media_dir: "media".to_string(),
            host: "0.0.0.0".to_string(),
            port: 3000,
        };
        assert_eq!(config.paypal_base_url(), PAYPAL_SANDBOX_URL);

        let live = AppConfig {
            paypal_mode: Some("live".to_string()),
            ..config
        };
        assert_eq!(live.paypal_base_url(), PAYPAL_LIVE_URL);
    }
}
