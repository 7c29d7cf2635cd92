//! # MongoDB
//!
//! Production [`DocumentStore`]. One `Client` is opened at startup and shared
//! by every request; the driver pools connections internally.
//!
//! Records are converted to BSON on the way in. On the way out `_id` is
//! rendered as a hex string and the rest of the document as relaxed
//! extended JSON.

use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    Client, Database,
    bson::{self, Bson, Document, doc, oid::ObjectId},
    options::{ClientOptions, ServerApi, ServerApiVersion},
};
use serde_json::Value;
use tracing::info;

use super::store::{
    Collection, DocumentStore, Filter, ID_FIELD, InsertAck, StoreError, UpdateOutcome, Window,
};
use crate::models::Record;

pub struct MongoStore {
    client: Client,
    database: Database,
}

impl MongoStore {
    /// Build a client for `uri` pinned to Stable API v1.
    ///
    /// No network traffic happens until the first operation; call
    /// [`DocumentStore::ping`] to verify the deployment is reachable.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(uri)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let server_api = ServerApi::builder()
            .version(ServerApiVersion::V1)
            .strict(true)
            .deprecation_errors(true)
            .build();
        options.server_api = Some(server_api);
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

        let client =
            Client::with_options(options).map_err(|e| StoreError::Connection(e.to_string()))?;
        let database = client.database(database);

        info!("MongoDB client created for database {}", database.name());

        Ok(Self { client, database })
    }

    fn collection(&self, collection: Collection) -> mongodb::Collection<Document> {
        self.database.collection(collection.name())
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn insert_one(
        &self,
        collection: Collection,
        record: Record,
    ) -> Result<InsertAck, StoreError> {
        let document = to_document(record)?;
        let result = self.collection(collection).insert_one(document).await?;

        Ok(InsertAck {
            acknowledged: true,
            inserted_id: id_to_string(result.inserted_id),
        })
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        window: Option<Window>,
    ) -> Result<Vec<Record>, StoreError> {
        let coll = self.collection(collection);
        let mut find = coll
            .find(filter_document(filter))
            .sort(doc! { ID_FIELD: 1 });

        if let Some(window) = window {
            find = find
                .skip(window.skip)
                .limit(i64::try_from(window.limit).unwrap_or(i64::MAX));
        }

        let documents: Vec<Document> = find.await?.try_collect().await?;
        Ok(documents.into_iter().map(from_document).collect())
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Record>, StoreError> {
        let document = self
            .collection(collection)
            .find_one(filter_document(filter))
            .await?;

        Ok(document.map(from_document))
    }

    async fn count(&self, collection: Collection) -> Result<u64, StoreError> {
        Ok(self.collection(collection).count_documents(doc! {}).await?)
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        fields: Record,
    ) -> Result<UpdateOutcome, StoreError> {
        let update = doc! { "$set": to_document(fields)? };
        let result = self
            .collection(collection)
            .update_one(filter_document(filter), update)
            .await?;

        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::Connection(format!("Ping failed: {e}")))?;
        Ok(())
    }

    async fn shutdown(&self) {
        self.client.clone().shutdown().await;
        info!("MongoDB client disconnected");
    }
}

fn filter_document(filter: &Filter) -> Document {
    match filter {
        Filter::All => doc! {},
        Filter::FieldEquals { field, value } => {
            let mut document = Document::new();
            document.insert(*field, value.as_str());
            document
        }
        Filter::Id(id) => match ObjectId::parse_str(id) {
            Ok(oid) => doc! { ID_FIELD: oid },
            Err(_) => doc! { ID_FIELD: id.as_str() },
        },
        Filter::AnyFieldContains { fields, needle } => {
            let pattern = escape_regex(needle);
            let clauses: Vec<Document> = fields
                .iter()
                .map(|field| {
                    let mut clause = Document::new();
                    clause.insert(*field, doc! { "$regex": pattern.as_str(), "$options": "i" });
                    clause
                })
                .collect();
            doc! { "$or": clauses }
        }
    }
}

/// Escapes PCRE metacharacters so `needle` matches literally
fn escape_regex(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(
            c,
            '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$' | '#'
                | '-'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn to_document(record: Record) -> Result<Document, StoreError> {
    bson::to_document(&record).map_err(|e| StoreError::InvalidDocument(e.to_string()))
}

fn from_document(mut document: Document) -> Record {
    if let Some(Bson::ObjectId(oid)) = document.get(ID_FIELD) {
        let hex = oid.to_hex();
        document.insert(ID_FIELD, hex);
    }

    match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(map) => map,
        _ => Record::new(),
    }
}

fn id_to_string(id: Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s,
        other => other.to_string(),
    }
}
