use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::db::Store;
use crate::errors::{StoreError, StoreResult};
use crate::models::contact::{Contact, ContactPatch};
use crate::models::contact_filter::{ContactFilter, matches_all};
use crate::models::tracking_event::TrackingEvent;

/// Process-local store. Contacts keep insertion order, which is the natural
/// order returned by listings. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    events: RwLock<Vec<TrackingEvent>>,
    contacts: RwLock<Vec<Contact>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a contact, assigning an id when it has none.
    pub async fn insert_contact(&self, mut contact: Contact) -> ObjectId {
        let id = *contact.id.get_or_insert_with(ObjectId::new);
        self.contacts.write().await.push(contact);
        id
    }

    pub async fn contact(&self, id: &ObjectId) -> Option<Contact> {
        self.contacts
            .read()
            .await
            .iter()
            .find(|c| c.id.as_ref() == Some(id))
            .cloned()
    }

    pub async fn events(&self) -> Vec<TrackingEvent> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_event(&self, event: &TrackingEvent) -> StoreResult<()> {
        let mut event = event.clone();
        event.id = Some(ObjectId::new());
        self.events.write().await.push(event);
        Ok(())
    }

    async fn find_contacts(
        &self,
        filters: &[ContactFilter],
        skip: u64,
        limit: u64,
    ) -> StoreResult<Vec<Contact>> {
        let contacts = self.contacts.read().await;
        Ok(contacts
            .iter()
            .filter(|c| matches_all(filters, c))
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn count_contacts(&self, filters: &[ContactFilter]) -> StoreResult<u64> {
        let contacts = self.contacts.read().await;
        Ok(contacts.iter().filter(|c| matches_all(filters, c)).count() as u64)
    }

    async fn update_contact(&self, id: &str, patch: &ContactPatch) -> StoreResult<u64> {
        let object_id =
            ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))?;

        let mut contacts = self.contacts.write().await;
        match contacts.iter_mut().find(|c| c.id == Some(object_id)) {
            Some(contact) => {
                patch.apply_to(contact);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
