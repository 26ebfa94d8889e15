pub mod memory;
pub mod mongo;

use async_trait::async_trait;

use crate::errors::StoreResult;
use crate::models::contact::{Contact, ContactPatch};
use crate::models::contact_filter::ContactFilter;
use crate::models::tracking_event::TrackingEvent;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Persistence operations used by the HTTP handlers.
///
/// Handlers only see this trait; the concrete backend is chosen once at
/// startup and shared through `AppState`.
#[async_trait]
pub trait Store: Send + Sync {
    /// Appends one tracking event. Never deduplicates.
    async fn insert_event(&self, event: &TrackingEvent) -> StoreResult<()>;

    /// At most `limit` contacts matching every filter, after skipping `skip`,
    /// in the backend's natural order.
    async fn find_contacts(
        &self,
        filters: &[ContactFilter],
        skip: u64,
        limit: u64,
    ) -> StoreResult<Vec<Contact>>;

    async fn count_contacts(&self, filters: &[ContactFilter]) -> StoreResult<u64>;

    /// Sets the fields present in `patch` on the contact with id `id` and
    /// returns how many documents matched (0 or 1). An empty patch writes
    /// nothing but still reports whether `id` matched.
    async fn update_contact(&self, id: &str, patch: &ContactPatch) -> StoreResult<u64>;

    async fn ping(&self) -> StoreResult<()>;

    /// Releases connections. Called once after the server stops.
    async fn close(&self) {}
}
