//! Retained record type

use bytes::Bytes;

/// The last-known payload for a topic, as exchanged with a store
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetainedRecord {
    /// Topic the payload is retained under
    pub topic: String,
    /// Payload bytes, stored verbatim
    pub payload: Bytes,
    /// Retain flag; always `true` for records built with [`RetainedRecord::new`]
    pub retain: bool,
}

impl RetainedRecord {
    /// Create a retained record
    pub fn new(topic: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
            retain: true,
        }
    }

    /// Payload size in bytes
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}
