//! In-memory application store

use super::{ApplicationStore, StoredApplication};
use crate::error::StoreResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local store; contents are lost on restart
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, StoredApplication>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl ApplicationStore for MemoryStore {
    async fn insert(&self, record: StoredApplication) -> StoreResult<()> {
        self.records
            .write()
            .await
            .insert(record.application_id.clone(), record);
        Ok(())
    }

    async fn get(&self, application_id: &str) -> StoreResult<Option<StoredApplication>> {
        Ok(self.records.read().await.get(application_id).cloned())
    }

    async fn created_since(&self, since: DateTime<Utc>) -> StoreResult<Vec<StoredApplication>> {
        let records = self.records.read().await;
        let mut matching: Vec<StoredApplication> = records
            .values()
            .filter(|r| r.created_at >= since)
            .cloned()
            .collect();
        matching.sort_by_key(|r| r.created_at);
        Ok(matching)
    }
}
