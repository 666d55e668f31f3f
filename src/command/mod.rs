//! Deferred actions
//!
//! A [`Command`] wraps a zero-argument action. An [`AuthRequiredCommand`]
//! wraps a command and only lets it run while the session provider reports
//! a signed-in user; otherwise it hands off to the provider's login flow.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::session::{LoginRequest, SessionProvider};

type Action = Rc<dyn Fn() -> Result<()>>;

/// An invokable action; every `execute` is an independent invocation
#[derive(Clone)]
pub struct Command {
    action: Action,
}

impl Command {
    pub fn new(action: impl Fn() -> Result<()> + 'static) -> Self {
        Self {
            action: Rc::new(action),
        }
    }

    /// Invoke the wrapped action once
    pub fn execute(&self) -> Result<()> {
        (self.action)()
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command").finish_non_exhaustive()
    }
}

/// What happened to the wrapped command on an `execute` call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    /// A session existed and the wrapped command ran
    Executed,
    /// No session; login delegation was started and the command did not run
    Deferred,
}

/// Authentication state as seen by an [`AuthRequiredCommand`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    /// A login was requested and has not completed yet
    PendingLogin,
    Ready,
}

/// Runs a command only while a session exists
pub struct AuthRequiredCommand {
    command: Command,
    session: Rc<dyn SessionProvider>,
    provider: String,
    login_requested: Cell<bool>,
}

impl AuthRequiredCommand {
    pub fn new(command: Command, session: Rc<dyn SessionProvider>, provider: impl Into<String>) -> Self {
        Self {
            command,
            session,
            provider: provider.into(),
            login_requested: Cell::new(false),
        }
    }

    pub fn state(&self) -> AuthState {
        if self.session.current_session(&self.provider).is_some() {
            AuthState::Ready
        } else if self.login_requested.get() {
            AuthState::PendingLogin
        } else {
            AuthState::Unauthenticated
        }
    }

    /// Execute the wrapped command, or start a login if nobody is signed in
    ///
    /// Login failures propagate and the wrapped command does not run.
    pub fn execute(&self) -> Result<CommandOutcome> {
        if self.session.current_session(&self.provider).is_some() {
            self.login_requested.set(false);
            self.command.execute()?;
            return Ok(CommandOutcome::Executed);
        }

        log::info!("auth required for {}, delegating to login", self.provider);
        self.session.login(&LoginRequest::new(self.provider.clone()))?;
        self.login_requested.set(true);
        Ok(CommandOutcome::Deferred)
    }
}

impl fmt::Debug for AuthRequiredCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthRequiredCommand")
            .field("provider", &self.provider)
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditorError;
    use crate::models::User;
    use crate::session::LocalSession;

    fn counting_command() -> (Command, Rc<Cell<u32>>) {
        let runs = Rc::new(Cell::new(0));
        let counter = Rc::clone(&runs);
        let command = Command::new(move || {
            counter.set(counter.get() + 1);
            Ok(())
        });
        (command, runs)
    }

    #[test]
    fn test_command_runs_once_per_call() {
        let (command, runs) = counting_command();
        command.execute().unwrap();
        command.execute().unwrap();
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn test_command_errors_propagate() {
        let command = Command::new(|| Err(EditorError::Host("gone".into())));
        assert!(command.execute().is_err());
    }

    #[test]
    fn test_signed_in_executes_immediately() {
        let session = LocalSession::new();
        session.sign_in("livefyre", User::new("u1", "Ada"));
        let (command, runs) = counting_command();
        let auth = AuthRequiredCommand::new(command, Rc::new(session.clone()), "livefyre");

        assert_eq!(auth.state(), AuthState::Ready);
        assert_eq!(auth.execute().unwrap(), CommandOutcome::Executed);
        assert_eq!(runs.get(), 1);
        assert!(session.login_requests().is_empty());
    }

    #[test]
    fn test_signed_out_delegates_to_login() {
        let session = LocalSession::new();
        let (command, runs) = counting_command();
        let auth = AuthRequiredCommand::new(command, Rc::new(session.clone()), "livefyre");

        assert_eq!(auth.state(), AuthState::Unauthenticated);
        assert_eq!(auth.execute().unwrap(), CommandOutcome::Deferred);
        assert_eq!(runs.get(), 0);
        assert_eq!(session.login_requests(), vec![LoginRequest::new("livefyre")]);
        assert_eq!(auth.state(), AuthState::PendingLogin);

        session.sign_in("livefyre", User::new("u1", "Ada"));
        assert_eq!(auth.state(), AuthState::Ready);
    }

    #[test]
    fn test_synchronous_login_still_defers() {
        let session = LocalSession::new();
        session.delegate(|session, request| {
            session.sign_in(&request.provider, User::new("u1", "Ada"));
            Ok(())
        });
        let (command, runs) = counting_command();
        let auth = AuthRequiredCommand::new(command, Rc::new(session), "livefyre");

        assert_eq!(auth.execute().unwrap(), CommandOutcome::Deferred);
        assert_eq!(runs.get(), 0);
        assert_eq!(auth.execute().unwrap(), CommandOutcome::Executed);
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn test_login_failure_propagates_without_running() {
        let session = LocalSession::new();
        session.delegate(|_, _| Err(EditorError::Login("denied".into())));
        let (command, runs) = counting_command();
        let auth = AuthRequiredCommand::new(command, Rc::new(session), "livefyre");

        assert_eq!(auth.execute(), Err(EditorError::Login("denied".into())));
        assert_eq!(runs.get(), 0);
        assert_eq!(auth.state(), AuthState::Unauthenticated);
    }
}
