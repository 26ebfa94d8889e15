use std::sync::Arc;

use crate::config::{Config, MissingContactPolicy, SentCriterion};
use crate::db::Store;
use crate::utils::pixel::Pixel;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub pixel: Pixel,
    pub missing_contact: MissingContactPolicy,
    pub sent_criterion: SentCriterion,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, pixel: Pixel, config: &Config) -> Self {
        Self {
            store,
            pixel,
            missing_contact: config.missing_contact,
            sent_criterion: config.sent_criterion,
        }
    }
}
