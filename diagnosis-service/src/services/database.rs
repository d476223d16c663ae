//! Database operations for the diagnosis service.
//!
//! Stores diagnosis history in MongoDB. Records are insert-only: no update
//! or delete path exists.

use crate::models::DiagnosisRecord;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{FindOptions, IndexOptions},
    Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

#[derive(Clone)]
pub struct DiagnosisDb {
    client: MongoClient,
    db: Database,
}

impl DiagnosisDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(uri = %uri, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", uri, e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for diagnosis-service");

        // Descending timestamp index for "most recent" history queries
        let timestamp_index = IndexModel::builder()
            .keys(doc! { "timestamp": -1 })
            .options(
                IndexOptions::builder()
                    .name("timestamp_idx".to_string())
                    .build(),
            )
            .build();

        self.diagnosis_history()
            .create_index(timestamp_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create timestamp index: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        tracing::info!("Successfully created all MongoDB indexes");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;
        Ok(())
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    pub fn diagnosis_history(&self) -> Collection<DiagnosisRecord> {
        self.db.collection("diagnosis_history")
    }

    pub async fn insert_diagnosis(&self, record: &DiagnosisRecord) -> Result<(), AppError> {
        self.diagnosis_history()
            .insert_one(record, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert diagnosis: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;
        Ok(())
    }

    /// Up to `limit` records, most recent first.
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<DiagnosisRecord>, AppError> {
        let find_options = FindOptions::builder()
            .sort(doc! { "timestamp": -1 })
            .limit(limit)
            .build();

        let cursor = self
            .diagnosis_history()
            .find(doc! {}, find_options)
            .await
            .map_err(|e| {
                tracing::error!("Failed to query diagnosis history: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        let records: Vec<DiagnosisRecord> = cursor.try_collect().await.map_err(|e| {
            tracing::error!("Failed to collect diagnosis records: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;

        Ok(records)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<DiagnosisRecord>, AppError> {
        self.diagnosis_history()
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to find diagnosis {}: {}", id, e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })
    }
}
