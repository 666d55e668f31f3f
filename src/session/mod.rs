//! Session provider interface
//!
//! The editor never talks to a global auth object. A session provider
//! handle is injected at construction; it answers "who is signed in",
//! starts login flows, and hands out subscription handles for login and
//! logout notifications that are released on teardown.

pub mod local;

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::User;

pub use local::LocalSession;

/// Event stream topics a view can subscribe to
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SessionTopic {
    /// `login.<provider>`
    Login(String),
    /// `logout`
    Logout,
}

impl SessionTopic {
    /// Event name on the host event stream
    pub fn event_name(&self) -> String {
        match self {
            SessionTopic::Login(provider) => format!("login.{}", provider),
            SessionTopic::Logout => "logout".to_string(),
        }
    }
}

/// A session lifecycle notification
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    Login { provider: String, user: User },
    Logout,
}

impl SessionEvent {
    pub fn topic(&self) -> SessionTopic {
        match self {
            SessionEvent::Login { provider, .. } => SessionTopic::Login(provider.clone()),
            SessionEvent::Logout => SessionTopic::Logout,
        }
    }
}

pub type SessionHandler = Rc<dyn Fn(&SessionEvent)>;

/// Arguments passed to the provider's login delegation
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub provider: String,
}

impl LoginRequest {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
        }
    }
}

/// Current-user lookup, login delegation and lifecycle events
pub trait SessionProvider {
    /// The signed-in user for `provider`, if any
    fn current_session(&self, provider: &str) -> Option<User>;

    /// Start a login flow. Completion is reported through a login event,
    /// never through the return value.
    fn login(&self, request: &LoginRequest) -> Result<()>;

    /// Register `handler` for `topic` until the returned handle is released
    fn subscribe(&self, topic: SessionTopic, handler: SessionHandler) -> Subscription;
}

/// Handle for a registered session handler
///
/// Releasing it (explicitly or by dropping it) removes the handler.
pub struct Subscription {
    topic: SessionTopic,
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(topic: SessionTopic, release: impl FnOnce() + 'static) -> Self {
        Self {
            topic,
            release: Some(Box::new(release)),
        }
    }

    pub fn topic(&self) -> &SessionTopic {
        &self.topic
    }

    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    /// Remove the handler now
    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("topic", &self.topic)
            .field("active", &self.is_active())
            .finish()
    }
}
