use actix_web::{HttpRequest, HttpResponse, web};
use log::{debug, error};

use crate::models::tracking_event::TrackingEvent;
use crate::state::app_state::AppState;
use crate::utils::client_info::{client_ip, device_type};

/// Record an email open and return the tracking pixel.
///
/// Every request stores a new event. The image is served even when the
/// insert fails so the recipient's mail client never shows a broken image.
pub async fn track_open(
    app_state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> HttpResponse {
    let mail_id = path.into_inner();
    let event = TrackingEvent::new(mail_id, device_type(&req), client_ip(&req));

    match app_state.store.insert_event(&event).await {
        Ok(()) => debug!(
            "Recorded open of {} from {:?} ({})",
            event.mail_id, event.ip_address, event.device_type
        ),
        Err(e) => error!("Failed to record open of {}: {}", event.mail_id, e),
    }

    app_state.pixel.respond()
}
