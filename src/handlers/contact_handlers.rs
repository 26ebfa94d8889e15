use actix_web::{HttpResponse, web};
use futures_util::future::try_join;
use log::{error, warn};

use crate::config::MissingContactPolicy;
use crate::models::contact::ContactPatch;
use crate::models::contact_filter::parse_filters;
use crate::state::app_state::AppState;
use crate::structs::contact::{ContactListParams, ContactListResponse, ContactResponse};

/// List one page of contacts, optionally filtered.
pub async fn get_contacts(
    app_state: web::Data<AppState>,
    query: web::Query<ContactListParams>,
) -> HttpResponse {
    let page = query.page();
    let limit = query.limit();
    let skip = query.skip();

    let filters = match query.filters.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => match parse_filters(raw) {
            Ok(filters) => filters,
            Err(e) => {
                warn!("Rejected contact filters {}: {}", raw, e);
                return HttpResponse::BadRequest().json(serde_json::json!({
                    "error": e.to_string()
                }));
            }
        },
        _ => Vec::new(),
    };

    let store = &app_state.store;
    let result = try_join(
        store.find_contacts(&filters, skip, limit),
        store.count_contacts(&filters),
    )
    .await;

    match result {
        Ok((contacts, total)) => HttpResponse::Ok().json(ContactListResponse {
            contacts: contacts.into_iter().map(ContactResponse::from).collect(),
            current_page: page,
            total_pages: total.div_ceil(limit),
        }),
        Err(e) => {
            error!("Error fetching contacts: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal Server Error"
            }))
        }
    }
}

/// Set the fields present in the body on one contact.
pub async fn update_contact(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
    web::Json(patch): web::Json<ContactPatch>,
) -> HttpResponse {
    let contact_id = path.into_inner();

    match app_state.store.update_contact(&contact_id, &patch).await {
        Ok(0) if app_state.missing_contact == MissingContactPolicy::NotFound => {
            HttpResponse::NotFound().json(serde_json::json!({
                "message": "Contact not found"
            }))
        }
        Ok(_) => HttpResponse::Created().json(serde_json::json!({
            "message": "Updated"
        })),
        Err(e) => {
            error!("Failed to update contact {}: {}", contact_id, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Internal server error"
            }))
        }
    }
}
