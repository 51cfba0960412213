use reqwest::Client;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

use crate::config::AppConfig;
use crate::types::{PayPalAccessToken, PayPalCaptureResponse, PayPalOrderResponse};

const ORDER_DESCRIPTION: &str = "Single Page Landing Page - 2 Day Turn-around";

#[derive(Debug, Error)]
pub enum PayPalError {
    #[error("PayPal credentials not configured")]
    CredentialsMissing,
    #[error("PayPal request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("PayPal API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("No approval URL found in PayPal response")]
    MissingApprovalUrl,
}

/// The id and approval link handed back to the frontend after order creation.
#[derive(Debug, Clone)]
pub struct CreatedOrder {
    pub id: String,
    pub approval_url: String,
}

#[derive(Clone)]
pub struct PayPal {
    http: Client,
    base_url: String,
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl PayPal {
    pub fn new(base_url: &str, client_id: Option<String>, client_secret: Option<String>) -> Self {
        PayPal {
            http: Client::new(),
            base_url: base_url.to_string(),
            client_id,
            client_secret,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.paypal_base_url(),
            config.paypal_client_id.clone(),
            config.paypal_client_secret.clone(),
        )
    }

    pub fn is_configured(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some()
    }

    fn credentials(&self) -> Result<(&str, &str), PayPalError> {
        match (self.client_id.as_deref(), self.client_secret.as_deref()) {
            (Some(id), Some(secret)) => Ok((id, secret)),
            _ => Err(PayPalError::CredentialsMissing),
        }
    }

    /// Client-credential exchange. Each API call sequence starts with a fresh
    /// token, tokens are not cached.
    pub async fn access_token(&self) -> Result<String, PayPalError> {
        let (client_id, client_secret) = self.credentials()?;

        let response = self
            .http
            .post(format!("{}/v1/oauth2/token", self.base_url))
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await;

        match response {
            Ok(resp) => {
                if resp.status().is_success() {
                    let token = resp.json::<PayPalAccessToken>().await?;
                    Ok(token.access_token)
                } else {
                    Err(Self::api_error(resp).await)
                }
            }
            Err(e) => {
                error!("PayPal token request error: {}", e);
                Err(e.into())
            }
        }
    }

    pub async fn create_order(
        &self,
        access_token: &str,
        amount: f64,
        return_url: &str,
        cancel_url: &str,
    ) -> Result<CreatedOrder, PayPalError> {
        let body = json!({
            "intent": "CAPTURE",
            "purchase_units": [
                {
                    "amount": {
                        "currency_code": "USD",
                        "value": amount.to_string(),
                    },
                    "description": ORDER_DESCRIPTION,
                }
            ],
            "application_context": {
                "return_url": return_url,
                "cancel_url": cancel_url,
            },
        });

        let response = self
            .http
            .post(format!("{}/v2/checkout/orders", self.base_url))
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await;

        let order = match response {
            Ok(resp) => {
                if resp.status().is_success() {
                    resp.json::<PayPalOrderResponse>().await?
                } else {
                    return Err(Self::api_error(resp).await);
                }
            }
            Err(e) => {
                error!("PayPal create order request error: {}", e);
                return Err(e.into());
            }
        };

        debug!("PayPal order created: {}", order.id);

        let approval_url = order
            .links
            .iter()
            .find(|link| link.rel == "approve")
            .map(|link| link.href.clone())
            .ok_or(PayPalError::MissingApprovalUrl)?;

        Ok(CreatedOrder {
            id: order.id,
            approval_url,
        })
    }

    pub async fn get_order(
        &self,
        access_token: &str,
        order_id: &str,
    ) -> Result<PayPalOrderResponse, PayPalError> {
        let response = self
            .http
            .get(format!("{}/v2/checkout/orders/{}", self.base_url, order_id))
            .bearer_auth(access_token)
            .send()
            .await;

        match response {
            Ok(resp) => {
                if resp.status().is_success() {
                    let order = resp.json::<PayPalOrderResponse>().await?;
                    Ok(order)
                } else {
                    Err(Self::api_error(resp).await)
                }
            }
            Err(e) => {
                error!("PayPal order details request error: {}", e);
                Err(e.into())
            }
        }
    }

    pub async fn capture_order(
        &self,
        access_token: &str,
        order_id: &str,
    ) -> Result<PayPalCaptureResponse, PayPalError> {
        let response = self
            .http
            .post(format!(
                "{}/v2/checkout/orders/{}/capture",
                self.base_url, order_id
            ))
            .bearer_auth(access_token)
            .header("Content-Type", "application/json")
            .send()
            .await;

        match response {
            Ok(resp) => {
                if resp.status().is_success() {
                    let capture = resp.json::<PayPalCaptureResponse>().await?;
                    debug!("PayPal capture {} status: {}", capture.id, capture.status);
                    Ok(capture)
                } else {
                    Err(Self::api_error(resp).await)
                }
            }
            Err(e) => {
                error!("PayPal capture request error: {}", e);
                Err(e.into())
            }
        }
    }

    /// Reads the error body and pulls out PayPal's message field when the
    /// payload is JSON, otherwise the raw text is kept.
    async fn api_error(resp: reqwest::Response) -> PayPalError {
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read response body".to_string());
        error!("Error response from PayPal ({}): {}", status, body);

        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| {
                value
                    .get("message")
                    .or_else(|| value.get("error_description"))
                    .and_then(|m| m.as_str())
                    .map(|m| m.to_string())
            })
            .unwrap_or(body);

        PayPalError::Api { status, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn paypal_against(server: &MockServer) -> PayPal {
        PayPal::new(
            &server.uri(),
            Some("test-client-id".to_string()),
            Some("test-client-secret".to_string()),
        )
    }

    #[tokio::test]
    async fn access_token_uses_client_credentials_grant() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/oauth2/token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(header(
                "Authorization",
                "Basic dGVzdC1jbGllbnQtaWQ6dGVzdC1jbGllbnQtc2VjcmV0",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "A21AAFs",
                "token_type": "Bearer",
                "expires_in": 32400,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let paypal = paypal_against(&server);
        let token = paypal.access_token().await.unwrap();
        assert_eq!(token, "A21AAFs");
    }

    #[tokio::test]
    async fn missing_credentials_short_circuit_before_any_request() {
        let server = MockServer::start().await;

        let paypal = PayPal::new(&server.uri(), None, None);

        let err = paypal.access_token().await.unwrap_err();
        assert!(matches!(err, PayPalError::CredentialsMissing));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_order_returns_the_approve_link() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2/checkout/orders"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "5O190127TN364715T",
                "status": "CREATED",
                "links": [
                    {"href": "https://api-m.sandbox.paypal.com/v2/checkout/orders/5O190127TN364715T", "rel": "self", "method": "GET"},
                    {"href": "https://www.sandbox.paypal.com/checkoutnow?token=5O190127TN364715T", "rel": "approve", "method": "GET"},
                    {"href": "https://api-m.sandbox.paypal.com/v2/checkout/orders/5O190127TN364715T/capture", "rel": "capture", "method": "POST"},
                ],
            })))
            .mount(&server)
            .await;

        let paypal = paypal_against(&server);
        let created = paypal
            .create_order(
                "token",
                199.0,
                "http://localhost:3000/payment/success",
                "http://localhost:3000/payment/cancel",
            )
            .await
            .unwrap();

        assert_eq!(created.id, "5O190127TN364715T");
        assert_eq!(
            created.approval_url,
            "https://www.sandbox.paypal.com/checkoutnow?token=5O190127TN364715T"
        );
    }

    #[tokio::test]
    async fn create_order_without_approve_link_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2/checkout/orders"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "5O190127TN364715T",
                "status": "CREATED",
                "links": [
                    {"href": "https://api-m.sandbox.paypal.com/v2/checkout/orders/5O190127TN364715T", "rel": "self", "method": "GET"},
                ],
            })))
            .mount(&server)
            .await;

        let paypal = paypal_against(&server);
        let err = paypal
            .create_order("token", 199.0, "http://a/success", "http://a/cancel")
            .await
            .unwrap_err();

        assert!(matches!(err, PayPalError::MissingApprovalUrl));
    }

    #[tokio::test]
    async fn provider_error_message_is_surfaced() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2/checkout/orders"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "name": "UNPROCESSABLE_ENTITY",
                "message": "The requested action could not be performed.",
            })))
            .mount(&server)
            .await;

        let paypal = paypal_against(&server);
        let err = paypal
            .create_order("token", 199.0, "http://a/success", "http://a/cancel")
            .await
            .unwrap_err();

        match err {
            PayPalError::Api { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "The requested action could not be performed.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn capture_reports_the_provider_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2/checkout/orders/5O190127TN364715T/capture"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "2GG279541U471931P",
                "status": "COMPLETED",
            })))
            .mount(&server)
            .await;

        let paypal = paypal_against(&server);
        let capture = paypal
            .capture_order("token", "5O190127TN364715T")
            .await
            .unwrap();

        assert_eq!(capture.id, "2GG279541U471931P");
        assert_eq!(capture.status, "COMPLETED");
    }
}
