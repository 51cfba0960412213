use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::LeadFormRequest;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub amount: Option<f64>,
    pub form_data: Option<LeadFormRequest>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub success: bool,
    /// PayPal's order id, echoed back for the capture call.
    pub order_id: String,
    pub approval_url: String,
    pub order_number: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaptureOrderRequest {
    pub order_id: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaptureOrderResponse {
    pub success: bool,
    pub order_number: String,
    /// The local order record id, not PayPal's.
    pub order_id: Uuid,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayPalDebugResponse {
    pub paypal_mode: String,
    pub using_url: String,
    pub has_client_id: bool,
    pub has_client_secret: bool,
    pub client_id_preview: String,
    pub credentials_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub timestamp: String,
}

#[derive(Debug, Deserialize)]
pub struct PayPalAccessToken {
    pub access_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayPalLink {
    pub href: String,
    pub rel: String,
}

#[derive(Debug, Deserialize)]
pub struct PayPalOrderResponse {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub links: Vec<PayPalLink>,
}

#[derive(Debug, Deserialize)]
pub struct PayPalCaptureResponse {
    pub id: String,
    pub status: String,
}
