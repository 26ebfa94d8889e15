pub mod contact_handlers;
pub mod dashboard_handlers;
pub mod health_handlers;
pub mod tracking_handlers;
