//! In-memory collection
//!
//! Records every write attempt. Completions are delivered immediately, or
//! held until [`MemoryCollection::settle_next`] when created with
//! [`MemoryCollection::manual`].

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::{Collection, WriteCallback, WriteResult};
use crate::error::WriteError;
use crate::models::{CollectionRef, ContentRecord};

#[derive(Default)]
struct MemoryState {
    writes: Vec<ContentRecord>,
    pending: VecDeque<(ContentRecord, WriteCallback)>,
    failures: VecDeque<WriteError>,
}

/// Cheaply cloneable in-memory write target
#[derive(Clone)]
pub struct MemoryCollection {
    collection: CollectionRef,
    manual: bool,
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryCollection {
    /// Collection that completes every write synchronously
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            collection: CollectionRef::new(id),
            manual: false,
            state: Rc::default(),
        }
    }

    /// Collection that holds completions until settled
    pub fn manual(id: impl Into<String>) -> Self {
        Self {
            manual: true,
            ..Self::new(id)
        }
    }

    /// Make the next write fail with `err`
    pub fn fail_next(&self, err: WriteError) {
        self.state.borrow_mut().failures.push_back(err);
    }

    /// Every record received, in order, retries included
    pub fn writes(&self) -> Vec<ContentRecord> {
        self.state.borrow().writes.clone()
    }

    pub fn pending_count(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Complete the oldest held write with `result`
    ///
    /// Returns false when nothing is pending.
    pub fn settle_next(&self, result: WriteResult) -> bool {
        let next = self.state.borrow_mut().pending.pop_front();
        match next {
            Some((_, done)) => {
                done(result);
                true
            }
            None => false,
        }
    }

    fn outcome_for(&self, record: &ContentRecord) -> WriteResult {
        match self.state.borrow_mut().failures.pop_front() {
            Some(err) => Err(err),
            None => Ok(serde_json::json!({ "id": record.id.to_string() })),
        }
    }
}

impl Collection for MemoryCollection {
    fn collection_ref(&self) -> CollectionRef {
        self.collection.clone()
    }

    fn write(&self, record: ContentRecord, done: WriteCallback) {
        log::debug!("memory collection {}: write {}", self.collection.id, record.id);
        self.state.borrow_mut().writes.push(record.clone());

        if self.manual {
            self.state.borrow_mut().pending.push_back((record, done));
            return;
        }

        let outcome = self.outcome_for(&record);
        done(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PostData, User};
    use std::cell::Cell;

    fn record(collection: &MemoryCollection) -> ContentRecord {
        ContentRecord::new(
            User::new("u1", "Ada"),
            &PostData::new("<p>hi</p>", None),
            None,
            collection.collection_ref(),
        )
    }

    #[test]
    fn test_immediate_write_succeeds() {
        let collection = MemoryCollection::new("c1");
        let ok = Rc::new(Cell::new(false));
        let flag = Rc::clone(&ok);

        collection.write(record(&collection), Box::new(move |result| flag.set(result.is_ok())));

        assert!(ok.get());
        assert_eq!(collection.writes().len(), 1);
    }

    #[test]
    fn test_scripted_failure_applies_once() {
        let collection = MemoryCollection::new("c1");
        collection.fail_next(WriteError::new("offline"));
        let results = Rc::new(RefCell::new(Vec::new()));

        for _ in 0..2 {
            let results = Rc::clone(&results);
            collection.write(record(&collection), Box::new(move |r| results.borrow_mut().push(r.is_ok())));
        }

        assert_eq!(*results.borrow(), vec![false, true]);
    }

    #[test]
    fn test_manual_writes_wait_for_settlement() {
        let collection = MemoryCollection::manual("c1");
        let done = Rc::new(Cell::new(false));
        let flag = Rc::clone(&done);

        collection.write(record(&collection), Box::new(move |_| flag.set(true)));
        assert!(!done.get());
        assert_eq!(collection.pending_count(), 1);

        assert!(collection.settle_next(Ok(serde_json::Value::Null)));
        assert!(done.get());
        assert!(!collection.settle_next(Ok(serde_json::Value::Null)));
    }
}
