//! Post data and content records
//!
//! `PostData` is what the editing surface hands to the submission pipeline;
//! `ContentRecord` is what finally reaches the write collaborator.

use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::WriteError;

/// An authenticated user as reported by the session provider
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,

    #[serde(default)]
    pub display_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            avatar_url: None,
        }
    }

    pub fn with_avatar(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = Some(url.into());
        self
    }
}

/// Reference to the collection a record is written into
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRef {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
}

impl CollectionRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            site_id: None,
        }
    }
}

/// Called with the written record and the collaborator's response
pub type SuccessCallback = Rc<dyn Fn(&ContentRecord, &serde_json::Value)>;

/// Called with the failed record and the collaborator's error
pub type FailureCallback = Rc<dyn Fn(&ContentRecord, &WriteError)>;

/// Post data built fresh for every submission attempt
#[derive(Clone)]
pub struct PostData {
    /// Normalized paragraph markup
    pub body: String,

    /// Raw title text, present only when the title field is enabled
    pub title: Option<String>,

    on_success: SuccessCallback,
    on_failure: FailureCallback,
}

impl PostData {
    pub fn new(body: impl Into<String>, title: Option<String>) -> Self {
        Self {
            body: body.into(),
            title,
            on_success: Rc::new(|record: &ContentRecord, _: &serde_json::Value| log::debug!("post {} written", record.id)),
            on_failure: Rc::new(|record: &ContentRecord, err: &WriteError| log::debug!("post {} failed: {}", record.id, err)),
        }
    }

    pub fn on_success(mut self, callback: SuccessCallback) -> Self {
        self.on_success = callback;
        self
    }

    pub fn on_failure(mut self, callback: FailureCallback) -> Self {
        self.on_failure = callback;
        self
    }

    /// Report a successful write of the record built from this post
    pub fn succeeded(&self, record: &ContentRecord, response: &serde_json::Value) {
        (self.on_success)(record, response);
    }

    /// Report a failed write of the record built from this post
    pub fn failed(&self, record: &ContentRecord, err: &WriteError) {
        (self.on_failure)(record, err);
    }
}

impl fmt::Debug for PostData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostData")
            .field("body", &self.body)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

/// The unit written to the collection
///
/// Built only after validation and authentication succeed. A retry reuses
/// the same record, `id` and `created_at` included.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    /// Client-side identifier, stable across retries
    pub id: Uuid,

    pub author: User,

    pub body: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub created_at: DateTime<Utc>,

    /// Content being replied to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    pub collection: CollectionRef,
}

impl ContentRecord {
    /// Build a record stamped with the current time and a fresh id
    pub fn new(author: User, post: &PostData, parent_id: Option<String>, collection: CollectionRef) -> Self {
        Self {
            id: Uuid::new_v4(),
            author,
            body: post.body.clone(),
            title: post.title.clone(),
            created_at: Utc::now(),
            parent_id,
            collection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_record_copies_post_fields() {
        let post = PostData::new("<p>hi</p>", Some("Title".to_string()));
        let record = ContentRecord::new(
            User::new("u1", "Ada"),
            &post,
            Some("parent-7".to_string()),
            CollectionRef::new("c1"),
        );

        assert_eq!(record.author.id, "u1");
        assert_eq!(record.body, "<p>hi</p>");
        assert_eq!(record.title.as_deref(), Some("Title"));
        assert_eq!(record.parent_id.as_deref(), Some("parent-7"));
        assert_eq!(record.collection.id, "c1");
    }

    #[test]
    fn test_records_get_distinct_ids() {
        let post = PostData::new("<p>hi</p>", None);
        let a = ContentRecord::new(User::new("u1", "Ada"), &post, None, CollectionRef::new("c1"));
        let b = ContentRecord::new(User::new("u1", "Ada"), &post, None, CollectionRef::new("c1"));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let post = PostData::new("<p>hi</p>", None);
        let record = ContentRecord::new(User::new("u1", "Ada"), &post, None, CollectionRef::new("c1"));
        let json = serde_json::to_value(&record).unwrap();

        assert!(json.get("createdAt").is_some());
        assert_eq!(json["author"]["displayName"], "Ada");
        assert!(json.get("parentId").is_none());
        assert!(json.get("title").is_none());
    }

    #[test]
    fn test_post_callbacks_fire() {
        let hits = Rc::new(Cell::new(0));
        let on_ok = Rc::clone(&hits);
        let on_err = Rc::clone(&hits);
        let post = PostData::new("<p>x</p>", None)
            .on_success(Rc::new(move |_: &ContentRecord, _: &serde_json::Value| on_ok.set(on_ok.get() + 1)))
            .on_failure(Rc::new(move |_: &ContentRecord, _: &WriteError| on_err.set(on_err.get() + 10)));
        let record = ContentRecord::new(User::new("u1", "Ada"), &post, None, CollectionRef::new("c1"));

        post.succeeded(&record, &serde_json::Value::Null);
        post.failed(&record, &WriteError::new("boom"));
        assert_eq!(hits.get(), 11);
    }
}
