use mongodb::Collection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::clients::mongodb::MongoClient;
use crate::types::ueau::AuthEvent;

type StoreResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// One authentication-attempt outcome, keyed by {generated id, subscriber}.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAuthEvent {
    #[serde(rename = "_id")]
    pub id: String,
    pub ue_id: String,
    #[serde(flatten)]
    pub event: AuthEvent,
}

pub struct AuthEventStore {
    collection: Collection<StoredAuthEvent>,
}

impl AuthEventStore {
    pub fn new(mongo_client: Arc<MongoClient>) -> Self {
        let collection = mongo_client.get_collection("auth_events");
        Self { collection }
    }

    pub async fn append(&self, record: StoredAuthEvent) -> StoreResult<()> {
        self.collection.insert_one(record).await?;
        Ok(())
    }

    pub async fn find_by_id_and_owner(
        &self,
        id: &str,
        ue_id: &str,
    ) -> StoreResult<Option<StoredAuthEvent>> {
        let filter = mongodb::bson::doc! { "_id": id, "ueId": ue_id };
        let result = self.collection.find_one(filter).await?;
        Ok(result)
    }

    /// Replaces the stored fields wholesale. Returns the number of
    /// documents the store reports as modified.
    pub async fn replace(&self, id: &str, ue_id: &str, event: AuthEvent) -> StoreResult<u64> {
        let filter = mongodb::bson::doc! { "_id": id, "ueId": ue_id };
        let replacement = StoredAuthEvent {
            id: id.to_string(),
            ue_id: ue_id.to_string(),
            event,
        };
        let result = self.collection.replace_one(filter, replacement).await?;
        Ok(result.modified_count)
    }
}
