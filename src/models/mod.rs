pub mod contact;
pub mod contact_filter;
pub mod tracking_event;
