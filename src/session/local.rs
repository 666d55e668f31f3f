//! In-memory session provider
//!
//! Keeps signed-in users per provider key and dispatches login/logout
//! events to subscribers in subscription order. Login delegation goes to
//! an optional delegate, which may complete the login synchronously by
//! calling [`LocalSession::sign_in`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use super::{LoginRequest, SessionEvent, SessionHandler, SessionProvider, SessionTopic, Subscription};
use crate::error::Result;
use crate::models::User;

/// Handles a login request on behalf of the session
pub type LoginDelegate = Rc<dyn Fn(&LocalSession, &LoginRequest) -> Result<()>>;

#[derive(Default)]
struct LocalState {
    users: HashMap<String, User>,
    handlers: Vec<(u64, SessionTopic, SessionHandler)>,
    next_id: u64,
    delegate: Option<LoginDelegate>,
    login_requests: Vec<LoginRequest>,
}

/// Cheaply cloneable in-memory session provider
#[derive(Clone, Default)]
pub struct LocalSession {
    state: Rc<RefCell<LocalState>>,
}

impl LocalSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the login delegate
    pub fn delegate(&self, delegate: impl Fn(&LocalSession, &LoginRequest) -> Result<()> + 'static) {
        self.state.borrow_mut().delegate = Some(Rc::new(delegate));
    }

    /// Mark `user` as signed in for `provider` and emit `login.<provider>`
    pub fn sign_in(&self, provider: &str, user: User) {
        log::info!("session: {} signed in via {}", user.id, provider);
        self.state.borrow_mut().users.insert(provider.to_string(), user.clone());
        self.emit(&SessionEvent::Login {
            provider: provider.to_string(),
            user,
        });
    }

    /// Forget every signed-in user and emit `logout`
    pub fn sign_out(&self) {
        log::info!("session: signed out");
        self.state.borrow_mut().users.clear();
        self.emit(&SessionEvent::Logout);
    }

    /// Login requests received so far
    pub fn login_requests(&self) -> Vec<LoginRequest> {
        self.state.borrow().login_requests.clone()
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.state.borrow().handlers.len()
    }

    fn emit(&self, event: &SessionEvent) {
        let topic = event.topic();
        // Snapshot so handlers may subscribe or unsubscribe while running
        let handlers: Vec<SessionHandler> = self
            .state
            .borrow()
            .handlers
            .iter()
            .filter(|(_, t, _)| *t == topic)
            .map(|(_, _, handler)| Rc::clone(handler))
            .collect();

        for handler in handlers {
            handler(event);
        }
    }
}

impl SessionProvider for LocalSession {
    fn current_session(&self, provider: &str) -> Option<User> {
        self.state.borrow().users.get(provider).cloned()
    }

    fn login(&self, request: &LoginRequest) -> Result<()> {
        let delegate = {
            let mut state = self.state.borrow_mut();
            state.login_requests.push(request.clone());
            state.delegate.clone()
        };

        match delegate {
            Some(delegate) => delegate(self, request),
            None => {
                log::warn!("session: no login delegate installed for {}", request.provider);
                Ok(())
            }
        }
    }

    fn subscribe(&self, topic: SessionTopic, handler: SessionHandler) -> Subscription {
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.next_id;
            state.next_id += 1;
            state.handlers.push((id, topic.clone(), handler));
            id
        };

        let state: Weak<RefCell<LocalState>> = Rc::downgrade(&self.state);
        Subscription::new(topic, move || {
            if let Some(state) = state.upgrade() {
                state.borrow_mut().handlers.retain(|(handler_id, _, _)| *handler_id != id);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditorError;
    use std::cell::Cell;

    fn user() -> User {
        User::new("u1", "Ada")
    }

    #[test]
    fn test_sign_in_sets_current_session() {
        let session = LocalSession::new();
        assert!(session.current_session("livefyre").is_none());

        session.sign_in("livefyre", user());
        assert_eq!(session.current_session("livefyre"), Some(user()));
        assert!(session.current_session("other").is_none());

        session.sign_out();
        assert!(session.current_session("livefyre").is_none());
    }

    #[test]
    fn test_events_reach_matching_subscribers_only() {
        let session = LocalSession::new();
        let logins = Rc::new(Cell::new(0));
        let logouts = Rc::new(Cell::new(0));

        let l = Rc::clone(&logins);
        let _login_sub = session.subscribe(
            SessionTopic::Login("livefyre".into()),
            Rc::new(move |_: &SessionEvent| l.set(l.get() + 1)),
        );
        let o = Rc::clone(&logouts);
        let _logout_sub = session.subscribe(SessionTopic::Logout, Rc::new(move |_: &SessionEvent| o.set(o.get() + 1)));

        session.sign_in("livefyre", user());
        session.sign_in("other", user());
        session.sign_out();

        assert_eq!(logins.get(), 1);
        assert_eq!(logouts.get(), 1);
    }

    #[test]
    fn test_released_subscription_stops_delivery() {
        let session = LocalSession::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let sub = session.subscribe(SessionTopic::Logout, Rc::new(move |_: &SessionEvent| h.set(h.get() + 1)));
        assert_eq!(session.subscriber_count(), 1);

        sub.unsubscribe();
        session.sign_out();

        assert_eq!(hits.get(), 0);
        assert_eq!(session.subscriber_count(), 0);
    }

    #[test]
    fn test_handlers_run_in_subscription_order() {
        let session = LocalSession::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        let subs: Vec<Subscription> = (0..3)
            .map(|i| {
                let order = Rc::clone(&order);
                session.subscribe(SessionTopic::Logout, Rc::new(move |_: &SessionEvent| order.borrow_mut().push(i)))
            })
            .collect();

        session.sign_out();
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
        drop(subs);
    }

    #[test]
    fn test_login_goes_through_delegate() {
        let session = LocalSession::new();
        session.delegate(|session, request| {
            session.sign_in(&request.provider, User::new("u2", "Grace"));
            Ok(())
        });

        session.login(&LoginRequest::new("livefyre")).unwrap();

        assert_eq!(session.login_requests().len(), 1);
        assert_eq!(session.current_session("livefyre").map(|u| u.id), Some("u2".to_string()));
    }

    #[test]
    fn test_delegate_errors_propagate() {
        let session = LocalSession::new();
        session.delegate(|_, _| Err(EditorError::Login("popup blocked".into())));

        let err = session.login(&LoginRequest::new("livefyre")).unwrap_err();
        assert_eq!(err, EditorError::Login("popup blocked".into()));
    }
}
