//! In-memory retained store for development and testing

use crate::{RetainedRecord, RetainedStore, Result, StoreError};
use async_trait::async_trait;
use dashmap::DashMap;
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::Arc;

/// An in-memory retained store holding one record per topic
#[derive(Clone, Default)]
pub struct MemoryRetainedStore {
    records: Arc<DashMap<String, RetainedRecord>>,
}

impl MemoryRetainedStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self {
            records: Arc::new(DashMap::new()),
        }
    }

    /// Get the number of retained topics
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Clear all records
    pub fn clear(&self) {
        self.records.clear();
    }

    /// List all retained topics
    pub fn topics(&self) -> Vec<String> {
        self.records.iter().map(|entry| entry.key().clone()).collect()
    }
}

#[async_trait]
impl RetainedStore for MemoryRetainedStore {
    fn lookup(&self, topic: &str) -> BoxStream<'static, Result<RetainedRecord>> {
        let found = self.records.get(topic).map(|entry| Ok(entry.value().clone()));
        stream::iter(found).boxed()
    }

    async fn write(&self, record: RetainedRecord) -> Result<()> {
        if !record.retain {
            return Err(StoreError::NotRetained(record.topic));
        }
        tracing::trace!(topic = %record.topic, size = record.len(), "storing retained record");
        self.records.insert(record.topic.clone(), record);
        Ok(())
    }
}
