use actix_web::{HttpResponse, error, web};
use log::warn;

use crate::handlers::contact_handlers::{get_contacts, update_contact};
use crate::handlers::dashboard_handlers::get_dashboard;
use crate::handlers::health_handlers::health_check;
use crate::handlers::tracking_handlers::track_open;

/// Bodies that do not deserialize (unknown field, wrong type, bad JSON)
/// are answered with 400 and a flat message.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        warn!("Rejected request body: {}", err);
        let response = HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Invalid request body"
        }));
        error::InternalError::from_response(err, response).into()
    })
}

/// Configure the routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config());
    // Tracking pixel
    cfg.route("/assets/{mail_id}", web::get().to(track_open));
    cfg.route("/contacts", web::get().to(get_contacts));
    cfg.route(
        "/contact/update/{contact_id}",
        web::patch().to(update_contact),
    );
    cfg.route("/dashboard", web::get().to(get_dashboard));
    cfg.route("/health/check", web::get().to(health_check));
}
