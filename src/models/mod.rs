pub mod client;
pub mod contact;
pub mod lead_form;
pub mod media;
pub mod order;
pub mod settings;

pub use client::Client;
pub use contact::ContactFormSubmission;
pub use lead_form::LeadForm;
pub use media::Media;
pub use order::Order;
pub use settings::Settings;
