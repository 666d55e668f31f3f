//! Write collaborator interface
//!
//! A collection durably accepts content records and reports the outcome
//! through a completion callback. Transport and persistence are entirely
//! the collection's business.

pub mod memory;

use std::rc::Rc;

use crate::error::WriteError;
use crate::models::{CollectionRef, ContentRecord};

pub use memory::MemoryCollection;

/// Outcome of a write: the collaborator's response or its error
pub type WriteResult = std::result::Result<serde_json::Value, WriteError>;

/// Completion callback for a single write
pub type WriteCallback = Box<dyn FnOnce(WriteResult)>;

/// A writable collection of content
pub trait Collection {
    /// Reference stamped onto every record written here
    fn collection_ref(&self) -> CollectionRef;

    /// Write `record`; `done` is called exactly once, possibly later
    fn write(&self, record: ContentRecord, done: WriteCallback);
}

/// Existing content the editor posts against
///
/// Replies carry the content id as their parent; the content's own
/// collection is used when no explicit collection is configured.
#[derive(Clone)]
pub struct ContentTarget {
    pub id: String,
    pub collection: Option<Rc<dyn Collection>>,
}

impl ContentTarget {
    pub fn new(id: impl Into<String>, collection: Option<Rc<dyn Collection>>) -> Self {
        Self {
            id: id.into(),
            collection,
        }
    }
}
