use actix_web::{HttpResponse, web};
use futures_util::future::try_join;
use log::error;

use crate::config::SentCriterion;
use crate::models::contact_filter::{ContactField, ContactFilter, FilterValue};
use crate::state::app_state::AppState;
use crate::structs::dashboard::DashboardResponse;

fn sent_filter(criterion: SentCriterion) -> ContactFilter {
    match criterion {
        SentCriterion::MailingStage => {
            ContactFilter::eq(ContactField::MailingStage, FilterValue::Number(1))
        }
        SentCriterion::EmailSent => ContactFilter::eq(ContactField::EmailSent, FilterValue::Flag(true)),
    }
}

/// Total and sent contact counts, both or neither.
pub async fn get_dashboard(app_state: web::Data<AppState>) -> HttpResponse {
    let store = &app_state.store;
    let sent = [sent_filter(app_state.sent_criterion)];

    match try_join(store.count_contacts(&[]), store.count_contacts(&sent)).await {
        Ok((total_contacts, total_sent)) => HttpResponse::Ok().json(DashboardResponse {
            total_contacts,
            total_sent,
        }),
        Err(e) => {
            error!("Failed to fetch dashboard: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal Server Error"
            }))
        }
    }
}
