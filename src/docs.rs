use utoipa::OpenApi;

use crate::models::contact::{ContactFormSubmission, ContactStatus};
use crate::models::lead_form::{LeadForm, LeadFormType, LeadStatus};
use crate::models::order::{Order, OrderStatus, OrderType};
use crate::models::{Client, Media};
use crate::types::{
    ApiMessage, CaptureOrderRequest, CaptureOrderResponse, ContactRequest, ContactResponse,
    CreateOrderRequest, CreateOrderResponse, LeadFormRequest, LeadFormResponse,
    PayPalDebugResponse, UploadResponse,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Studio Backend API",
        description = "Contact intake, lead forms, uploads, and the PayPal order lifecycle."
    ),
    components(schemas(
        ApiMessage,
        ContactRequest,
        ContactResponse,
        LeadFormRequest,
        LeadFormResponse,
        UploadResponse,
        CreateOrderRequest,
        CreateOrderResponse,
        CaptureOrderRequest,
        CaptureOrderResponse,
        PayPalDebugResponse,
        Client,
        ContactFormSubmission,
        ContactStatus,
        LeadForm,
        LeadFormType,
        LeadStatus,
        Media,
        Order,
        OrderStatus,
        OrderType,
    ))
)]
pub struct ApiDoc;
