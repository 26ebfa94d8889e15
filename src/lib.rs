//! Email-open tracking and contact management over MongoDB.
//!
//! - `handlers`: one async function per HTTP route
//! - `db`: the `Store` trait with MongoDB and in-memory backends
//! - `models`: stored documents and typed contact filters
//! - `structs`: request and response shapes
//! - `config`: environment-driven settings

pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;
pub mod structs;
pub mod utils;
