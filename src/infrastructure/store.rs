//! Persistence interface
//!
//! Everything the services need from a document database goes through the
//! [`DocumentStore`] trait. The MongoDB client and the in-memory store used
//! by tests both implement it, and [`AppState`](crate::state::AppState) holds
//! one behind an `Arc<dyn DocumentStore>`.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::models::Record;

/// Field holding the store-assigned identifier
pub const ID_FIELD: &str = "_id";

/// The four document collections served by this backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Resorts,
    Users,
    Bookings,
    PaymentInfo,
}

impl Collection {
    pub fn name(self) -> &'static str {
        match self {
            Collection::Resorts => "resorts",
            Collection::Users => "users",
            Collection::Bookings => "bookings",
            Collection::PaymentInfo => "paymentInfo",
        }
    }
}

/// Document selection understood by every store
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Every document in the collection
    All,
    /// Exact string equality on one field
    FieldEquals { field: &'static str, value: String },
    /// Match on the store-assigned identifier
    Id(String),
    /// Case-insensitive literal substring match on any of `fields`.
    /// Only string-valued fields can match.
    AnyFieldContains {
        fields: &'static [&'static str],
        needle: String,
    },
}

impl Filter {
    pub fn field_equals(field: &'static str, value: impl Into<String>) -> Self {
        Filter::FieldEquals {
            field,
            value: value.into(),
        }
    }
}

/// Skip/limit window applied to a listing in ascending `_id` order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub skip: u64,
    pub limit: u64,
}

/// Acknowledgment returned after an insert
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsertAck {
    pub acknowledged: bool,
    #[serde(rename = "insertedId")]
    pub inserted_id: String,
}

/// Counts reported by a single-document update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store connection error: {0}")]
    Connection(String),

    #[error("Store query error: {0}")]
    Query(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind;

        match *err.kind {
            ErrorKind::ServerSelection { .. }
            | ErrorKind::Io(_)
            | ErrorKind::DnsResolve { .. }
            | ErrorKind::Authentication { .. } => StoreError::Connection(err.to_string()),
            ErrorKind::BsonSerialization(_) | ErrorKind::BsonDeserialization(_) => {
                StoreError::InvalidDocument(err.to_string())
            }
            _ => StoreError::Query(err.to_string()),
        }
    }
}

/// Narrow persistence interface consumed by the services
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert `record` as a new document; the store assigns `_id`.
    async fn insert_one(
        &self,
        collection: Collection,
        record: Record,
    ) -> Result<InsertAck, StoreError>;

    /// All documents matching `filter` in ascending `_id` order, optionally windowed.
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        window: Option<Window>,
    ) -> Result<Vec<Record>, StoreError>;

    /// First document matching `filter`.
    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Record>, StoreError>;

    /// Number of documents in the collection.
    async fn count(&self, collection: Collection) -> Result<u64, StoreError>;

    /// Set each field of `fields` on the first document matching `filter`.
    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        fields: Record,
    ) -> Result<UpdateOutcome, StoreError>;

    /// Round trip to the deployment.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Close underlying connections.
    async fn shutdown(&self);
}
