pub mod client_info;
pub mod pixel;
