use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::lead_form::LeadFormType;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct ContactResponse {
    pub success: bool,
    pub id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadFormRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub needs: Option<String>,
    #[serde(default)]
    pub references: Vec<Uuid>,
    pub form_type: Option<LeadFormType>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadFormResponse {
    pub success: bool,
    pub id: Uuid,
    pub client_id: Uuid,
}

#[derive(Serialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub ids: Vec<Uuid>,
}

#[derive(Serialize, ToSchema)]
pub struct ApiMessage {
    pub message: String,
}
