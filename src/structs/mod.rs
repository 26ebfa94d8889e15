pub mod contact;
pub mod dashboard;
