use async_trait::async_trait;
use futures_util::TryStreamExt;
use log::info;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::{Client, Collection, Database};

use crate::db::Store;
use crate::errors::{StoreError, StoreResult};
use crate::models::contact::{Contact, ContactPatch};
use crate::models::contact_filter::{ContactFilter, filter_document};
use crate::models::tracking_event::TrackingEvent;

// Collection names follow the pluralised model names already in use by
// existing deployments.
pub const TRACKING_COLLECTION: &str = "trackinginfos";
pub const CONTACTS_COLLECTION: &str = "contacts";
pub const FALLBACK_DATABASE: &str = "test";

#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    db: Database,
}

impl MongoStore {
    /// Connects and pings the server. `database` overrides the database named
    /// in the connection string.
    pub async fn connect(uri: &str, database: Option<&str>) -> StoreResult<Self> {
        let client = Client::with_uri_str(uri).await?;
        let db = match database {
            Some(name) => client.database(name),
            None => client
                .default_database()
                .unwrap_or_else(|| client.database(FALLBACK_DATABASE)),
        };

        db.run_command(doc! { "ping": 1 }).await?;
        info!("Connected to MongoDB database `{}`", db.name());

        Ok(Self { client, db })
    }

    fn events(&self) -> Collection<TrackingEvent> {
        self.db.collection::<TrackingEvent>(TRACKING_COLLECTION)
    }

    fn contacts(&self) -> Collection<Contact> {
        self.db.collection::<Contact>(CONTACTS_COLLECTION)
    }
}

#[async_trait]
impl Store for MongoStore {
    async fn insert_event(&self, event: &TrackingEvent) -> StoreResult<()> {
        self.events().insert_one(event).await?;
        Ok(())
    }

    async fn find_contacts(
        &self,
        filters: &[ContactFilter],
        skip: u64,
        limit: u64,
    ) -> StoreResult<Vec<Contact>> {
        let contacts = self
            .contacts()
            .find(filter_document(filters))
            .skip(skip.min(i64::MAX as u64))
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .await?
            .try_collect::<Vec<Contact>>()
            .await?;

        Ok(contacts)
    }

    async fn count_contacts(&self, filters: &[ContactFilter]) -> StoreResult<u64> {
        Ok(self
            .contacts()
            .count_documents(filter_document(filters))
            .await?)
    }

    async fn update_contact(&self, id: &str, patch: &ContactPatch) -> StoreResult<u64> {
        let object_id =
            ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))?;

        // `$set` with an empty document is a server error
        if patch.is_empty() {
            return Ok(self
                .contacts()
                .count_documents(doc! { "_id": object_id })
                .await?);
        }

        let result = self
            .contacts()
            .update_one(
                doc! { "_id": object_id },
                doc! { "$set": patch.to_set_document()? },
            )
            .await?;

        Ok(result.matched_count)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
        info!("MongoDB client shut down");
    }
}
