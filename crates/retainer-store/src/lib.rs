//! # Retainer Store
//!
//! Retained-message storage and broker notifications for the Retainer
//! gateway.
//!
//! This crate provides:
//! - **Retained records**: the last-known payload for a topic
//! - **Store trait**: lazy lookup and acknowledged writes
//! - **Memory store**: a concurrent in-process backend
//! - **Event sinks**: fire-and-forget "retained updated" notifications
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              HTTP Gateway               │
//! ├────────────────────┬────────────────────┤
//! │  RetainedStore     │     EventSink      │
//! ├────────────────────┼──────────┬─────────┤
//! │ MemoryRetainedStore│ Broadcast│  Noop   │
//! └────────────────────┴──────────┴─────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use retainer_store::{MemoryRetainedStore, RetainedRecord, RetainedStore};
//! use futures::StreamExt;
//!
//! let store = MemoryRetainedStore::new();
//! store.write(RetainedRecord::new("hello", "hello world")).await?;
//! let first = store.lookup("hello").next().await;
//! ```

pub mod error;
pub mod events;
pub mod memory;
pub mod record;

pub use error::{Result, StoreError};
pub use events::{
    BroadcastEventSink, EventSink, NoopEventSink, RetainedEvent, DEFAULT_EVENT_CAPACITY,
};
pub use memory::MemoryRetainedStore;
pub use record::RetainedRecord;

use async_trait::async_trait;
use futures::stream::BoxStream;

/// Trait for retained-message storage backends
#[async_trait]
pub trait RetainedStore: Send + Sync {
    /// Lazily stream the retained records held for a topic.
    ///
    /// The stream is finite and yields at most the records matching
    /// `topic`; an empty stream means nothing is retained.
    fn lookup(&self, topic: &str) -> BoxStream<'static, Result<RetainedRecord>>;

    /// Store a retained record, replacing any previous record for its topic.
    ///
    /// Resolves once the write is durable as far as this backend goes.
    async fn write(&self, record: RetainedRecord) -> Result<()>;
}
