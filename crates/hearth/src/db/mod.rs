pub mod memory;
pub mod seed;

pub use memory::{Clock, MemoryStore, Table};

use crate::schema::Schema;
use crate::services::EntityKind;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A stored entity of one kind
pub trait Record: Clone + Serialize + Send + Sync + 'static {
    const KIND: EntityKind;

    /// Message reported when an insert collides on [`Record::unique_key`]
    const DUPLICATE_MESSAGE: &'static str = "Record already exists";

    fn id(&self) -> &str;

    /// Timestamp listings are ordered by, newest first. Kinds returning
    /// `None` list in insertion order.
    fn listed_at(&self) -> Option<DateTime<Utc>> {
        None
    }

    /// Value that must be unique across the kind's table
    fn unique_key(&self) -> Option<&str> {
        None
    }

    /// The store table holding this kind
    fn table(store: &MemoryStore) -> &Table<Self>;
}

/// Caller-supplied fields for creating a record. Identity and server
/// timestamps are not part of the shape.
pub trait Insert: DeserializeOwned + Send + 'static {
    type Record: Record;

    const SCHEMA: &'static Schema;

    /// Build a new record with a fresh identity
    fn into_record(self, id: String, now: DateTime<Utc>) -> Self::Record;

    /// Build a replacement for `existing`, keeping its identity and
    /// server-assigned timestamps
    fn replace(self, existing: &Self::Record) -> Self::Record;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{message}")]
    Duplicate {
        kind: EntityKind,
        message: &'static str,
    },

    #[error("{0} table lock poisoned")]
    Poisoned(EntityKind),
}
