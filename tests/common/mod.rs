#![allow(dead_code)]

use std::io;
use std::sync::Arc;

use actix_web::web;
use async_trait::async_trait;

use mailtrack::config::{MissingContactPolicy, SentCriterion};
use mailtrack::db::Store;
use mailtrack::errors::{StoreError, StoreResult};
use mailtrack::models::contact::{Contact, ContactPatch};
use mailtrack::models::contact_filter::ContactFilter;
use mailtrack::models::tracking_event::TrackingEvent;
use mailtrack::state::app_state::AppState;
use mailtrack::utils::pixel::Pixel;

pub fn app_state(store: Arc<dyn Store>) -> web::Data<AppState> {
    app_state_with(store, MissingContactPolicy::Created, SentCriterion::MailingStage)
}

pub fn app_state_with(
    store: Arc<dyn Store>,
    missing_contact: MissingContactPolicy,
    sent_criterion: SentCriterion,
) -> web::Data<AppState> {
    web::Data::new(AppState {
        store,
        pixel: Pixel::transparent_gif(),
        missing_contact,
        sent_criterion,
    })
}

pub fn contact(name: &str, state: &str) -> Contact {
    Contact {
        id: None,
        cin: Some(format!("CIN-{}", name)),
        company_name: Some(name.to_string()),
        state: Some(state.to_string()),
        activity: Some("Manufacturing".to_string()),
        email: Some(format!("{}@example.com", name)),
        email_sent: Some(false),
        doi: Some("2019-04-01".to_string()),
        mailing_stage: None,
    }
}

/// Store whose every operation fails as if the database were down.
pub struct FailingStore;

fn offline() -> StoreError {
    StoreError::Database(mongodb::error::Error::from(io::Error::new(
        io::ErrorKind::ConnectionRefused,
        "store offline",
    )))
}

#[async_trait]
impl Store for FailingStore {
    async fn insert_event(&self, _event: &TrackingEvent) -> StoreResult<()> {
        Err(offline())
    }

    async fn find_contacts(
        &self,
        _filters: &[ContactFilter],
        _skip: u64,
        _limit: u64,
    ) -> StoreResult<Vec<Contact>> {
        Err(offline())
    }

    async fn count_contacts(&self, _filters: &[ContactFilter]) -> StoreResult<u64> {
        Err(offline())
    }

    async fn update_contact(&self, _id: &str, _patch: &ContactPatch) -> StoreResult<u64> {
        Err(offline())
    }

    async fn ping(&self) -> StoreResult<()> {
        Err(offline())
    }
}
