use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{options::FindOptions, Client as MongoClient, Collection};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::StatusCheck;

/// Most records a single list call returns.
pub const STATUS_LIST_LIMIT: usize = 1000;

const COLLECTION: &str = "status_checks";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("stored record has invalid id {id:?}: {source}")]
    InvalidId { id: String, source: uuid::Error },
}

/// Append-only log of status checks.
#[async_trait]
pub trait StatusStore: Send + Sync {
    async fn insert(&self, record: &StatusCheck) -> Result<(), StoreError>;

    /// Up to `limit` records in store order.
    async fn list(&self, limit: usize) -> Result<Vec<StatusCheck>, StoreError>;

    async fn close(&self) {}
}

#[derive(Default)]
pub struct MemoryStatusStore {
    records: RwLock<Vec<StatusCheck>>,
}

impl MemoryStatusStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StatusStore for MemoryStatusStore {
    async fn insert(&self, record: &StatusCheck) -> Result<(), StoreError> {
        self.records.write().push(record.clone());
        Ok(())
    }

    async fn list(&self, limit: usize) -> Result<Vec<StatusCheck>, StoreError> {
        Ok(self.records.read().iter().take(limit).cloned().collect())
    }
}

// Mongo keeps the id as a string and the timestamp as RFC 3339 text so a
// record reads back exactly as it was written.
#[derive(Debug, Serialize, Deserialize)]
struct StatusDocument {
    id: String,
    client_name: String,
    timestamp: DateTime<Utc>,
}

impl From<&StatusCheck> for StatusDocument {
    fn from(r: &StatusCheck) -> Self {
        Self { id: r.id.to_string(), client_name: r.client_name.clone(), timestamp: r.timestamp }
    }
}

impl TryFrom<StatusDocument> for StatusCheck {
    type Error = StoreError;

    fn try_from(d: StatusDocument) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&d.id).map_err(|source| StoreError::InvalidId { id: d.id.clone(), source })?;
        Ok(StatusCheck { id, client_name: d.client_name, timestamp: d.timestamp })
    }
}

#[derive(Clone)]
pub struct MongoStatusStore {
    client: MongoClient,
    collection: Collection<StatusDocument>,
}

impl MongoStatusStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            StoreError::from(e)
        })?;
        let collection = client.database(database).collection(COLLECTION);
        tracing::info!(database = %database, collection = COLLECTION, "MongoDB client ready");
        Ok(Self { client, collection })
    }
}

#[async_trait]
impl StatusStore for MongoStatusStore {
    async fn insert(&self, record: &StatusCheck) -> Result<(), StoreError> {
        self.collection.insert_one(StatusDocument::from(record), None).await?;
        Ok(())
    }

    async fn list(&self, limit: usize) -> Result<Vec<StatusCheck>, StoreError> {
        let options = FindOptions::builder().limit(limit as i64).build();
        let docs: Vec<StatusDocument> = self.collection.find(None, options).await?.try_collect().await?;
        docs.into_iter().map(StatusCheck::try_from).collect()
    }

    async fn close(&self) {
        tracing::info!("Closing MongoDB client");
        self.client.clone().shutdown().await;
    }
}
