//! In-memory [`DocumentStore`]
//!
//! Keeps each collection as a `Vec` in insertion order. Matching follows the
//! MongoDB store: exact string equality, identifier lookup, and
//! case-insensitive literal substring search over string fields.

use std::collections::HashMap;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use serde_json::Value;
use tokio::sync::RwLock;

use super::store::{
    Collection, DocumentStore, Filter, ID_FIELD, InsertAck, StoreError, UpdateOutcome, Window,
};
use crate::models::Record;

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Record>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(record: &Record, filter: &Filter) -> bool {
    match filter {
        Filter::All => true,
        Filter::FieldEquals { field, value } => {
            record.get(*field).and_then(Value::as_str) == Some(value.as_str())
        }
        Filter::Id(id) => record.get(ID_FIELD).and_then(Value::as_str) == Some(id.as_str()),
        Filter::AnyFieldContains { fields, needle } => {
            let needle = needle.to_lowercase();
            fields.iter().any(|field| {
                record
                    .get(*field)
                    .and_then(Value::as_str)
                    .is_some_and(|value| value.to_lowercase().contains(&needle))
            })
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_one(
        &self,
        collection: Collection,
        mut record: Record,
    ) -> Result<InsertAck, StoreError> {
        let id = ObjectId::new().to_hex();
        record.insert(ID_FIELD.to_string(), Value::String(id.clone()));

        self.collections
            .write()
            .await
            .entry(collection)
            .or_default()
            .push(record);

        Ok(InsertAck {
            acknowledged: true,
            inserted_id: id,
        })
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        window: Option<Window>,
    ) -> Result<Vec<Record>, StoreError> {
        let collections = self.collections.read().await;
        let matching = collections
            .get(&collection)
            .into_iter()
            .flatten()
            .filter(|record| matches(record, filter));

        let records = match window {
            Some(Window { skip, limit }) => matching
                .skip(usize::try_from(skip).unwrap_or(usize::MAX))
                .take(usize::try_from(limit).unwrap_or(usize::MAX))
                .cloned()
                .collect(),
            None => matching.cloned().collect(),
        };

        Ok(records)
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Record>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|records| records.iter().find(|record| matches(record, filter)))
            .cloned())
    }

    async fn count(&self, collection: Collection) -> Result<u64, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections.get(&collection).map_or(0, |records| records.len() as u64))
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        fields: Record,
    ) -> Result<UpdateOutcome, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(record) = collections
            .get_mut(&collection)
            .and_then(|records| records.iter_mut().find(|record| matches(record, filter)))
        else {
            return Ok(UpdateOutcome::default());
        };

        let mut changed = false;
        for (field, value) in fields {
            if record.get(&field) != Some(&value) {
                record.insert(field, value);
                changed = true;
            }
        }

        Ok(UpdateOutcome {
            matched: 1,
            modified: u64::from(changed),
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn shutdown(&self) {}
}
