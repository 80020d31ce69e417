use mongodb::Collection;
use std::sync::Arc;

use crate::clients::mongodb::MongoClient;
use crate::types::subscriber::{SqnLocation, SubscriberDocument};

type StoreResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub struct SubscriberStore {
    collection: Collection<SubscriberDocument>,
}

impl SubscriberStore {
    pub fn new(mongo_client: Arc<MongoClient>) -> Self {
        let collection = mongo_client.get_collection("subscribers");
        Self { collection }
    }

    pub async fn find_by_id(&self, ue_id: &str) -> StoreResult<Option<SubscriberDocument>> {
        let filter = mongodb::bson::doc! { "_id": ue_id };
        let result = self.collection.find_one(filter).await?;
        Ok(result)
    }

    /// Writes the advanced counter back to the location it was read from.
    /// Returns the number of documents the store reports as modified.
    pub async fn update_sequence_number(
        &self,
        ue_id: &str,
        location: SqnLocation,
        new_sqn_hex: &str,
    ) -> StoreResult<u64> {
        let field = match location {
            SqnLocation::Flat => "sequenceNumber",
            SqnLocation::Legacy => "authenticationSubscription.sequenceNumber",
        };

        let filter = mongodb::bson::doc! { "_id": ue_id };
        let update = mongodb::bson::doc! { "$set": { field: new_sqn_hex } };
        let result = self.collection.update_one(filter, update).await?;
        Ok(result.modified_count)
    }
}
