//! Signed-in comment editor
//!
//! Composes an [`EditorView`] with a session provider and a writable
//! collection. Submissions go through an [`AuthRequiredCommand`]; valid
//! posts from a signed-in user become [`ContentRecord`]s written to the
//! collection, and the outcome is reported as [`EditorSignal`]s.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use super::{EditorView, KeyOutcome, KeyPress, SubmitOutcome, Surface, TemplateContext};
use crate::collection::{Collection, ContentTarget, WriteResult};
use crate::command::{AuthRequiredCommand, AuthState, Command, CommandOutcome};
use crate::error::{EditorError, Result, WriteError};
use crate::models::{ContentRecord, EditorConfig, Field, PostData, Strings, User};
use crate::session::{SessionEvent, SessionHandler, SessionProvider, SessionTopic, Subscription};

/// Provider key used when none is configured
pub const DEFAULT_PROVIDER: &str = "livefyre";

/// Error code a collection uses for a post it has already accepted
pub const DUPLICATE_CODE: &str = "duplicate";

/// Construction options for [`AuthEditorView`]
#[derive(Clone)]
pub struct AuthEditorOptions {
    pub config: EditorConfig,
    /// Explicit write target
    pub collection: Option<Rc<dyn Collection>>,
    /// Content being replied to; supplies the parent id and, failing an
    /// explicit collection, the write target
    pub content: Option<ContentTarget>,
    /// Session provider key
    pub provider: String,
    /// Show the write error on the surface as well as signalling it
    pub show_write_errors: bool,
}

impl AuthEditorOptions {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            collection: None,
            content: None,
            provider: DEFAULT_PROVIDER.to_string(),
            show_write_errors: false,
        }
    }

    pub fn collection(mut self, collection: Rc<dyn Collection>) -> Self {
        self.collection = Some(collection);
        self
    }

    pub fn content(mut self, content: ContentTarget) -> Self {
        self.content = Some(content);
        self
    }

    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    pub fn show_write_errors(mut self, show: bool) -> Self {
        self.show_write_errors = show;
        self
    }
}

impl Default for AuthEditorOptions {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

/// Re-issues one failed write with the original record
#[derive(Clone)]
pub struct Retry {
    record: ContentRecord,
    post: PostData,
    reissue: Rc<dyn Fn(&ContentRecord, &PostData) -> Result<()>>,
}

impl Retry {
    /// The record that failed and will be written again
    pub fn record(&self) -> &ContentRecord {
        &self.record
    }

    /// Write the same record again
    pub fn invoke(&self) -> Result<()> {
        (self.reissue)(&self.record, &self.post)
    }
}

impl fmt::Debug for Retry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retry").field("record", &self.record.id).finish()
    }
}

/// UI signals for the surrounding controller
#[derive(Clone, Debug)]
pub enum EditorSignal {
    /// A record is about to be written
    WriteContent(ContentRecord),
    /// The collection accepted the record; resetting is up to the controller
    WriteSuccess {
        record: ContentRecord,
        response: serde_json::Value,
    },
    /// The collection rejected the record
    WriteFailure { error: WriteError, retry: Retry },
}

impl EditorSignal {
    /// Event name on the host side
    pub fn name(&self) -> &'static str {
        match self {
            EditorSignal::WriteContent(_) => "writeContent",
            EditorSignal::WriteSuccess { .. } => "writeSuccess",
            EditorSignal::WriteFailure { .. } => "writeFailure",
        }
    }
}

pub type SignalSink = Rc<dyn Fn(&EditorSignal)>;

/// Focus change reported by the host
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FieldEvent {
    Focus(Field),
    Blur(Field),
}

struct Inner<S: Surface> {
    editor: RefCell<EditorView<S>>,
    session: Rc<dyn SessionProvider>,
    provider: String,
    /// Built once; sends whatever sits in `pending_post`
    auth: AuthRequiredCommand,
    pending_post: RefCell<Option<PostData>>,
    /// Focus events that arrived while the editor was borrowed
    deferred: RefCell<VecDeque<FieldEvent>>,
    collection: Rc<dyn Collection>,
    parent_id: Option<String>,
    show_write_errors: bool,
    user: RefCell<Option<User>>,
    pending_retry: RefCell<Option<Retry>>,
    write_in_flight: Cell<bool>,
    sinks: RefCell<Vec<SignalSink>>,
    subscriptions: RefCell<Vec<Subscription>>,
}

impl<S: Surface + 'static> Inner<S> {
    /// Run `f` on the editor, then replay focus events the host fired
    /// synchronously while it ran
    fn with_editor<R>(&self, f: impl FnOnce(&mut EditorView<S>) -> R) -> R {
        let result = {
            let mut editor = self.editor.borrow_mut();
            f(&mut editor)
        };
        self.flush_field_events();
        result
    }

    fn field_event(&self, event: FieldEvent) {
        match self.editor.try_borrow_mut() {
            Ok(mut editor) => Self::apply(&mut editor, event),
            Err(_) => {
                log::debug!("editor busy, deferring {:?}", event);
                self.deferred.borrow_mut().push_back(event);
                return;
            }
        }
        self.flush_field_events();
    }

    fn flush_field_events(&self) {
        loop {
            let Some(event) = self.deferred.borrow_mut().pop_front() else {
                return;
            };
            let Ok(mut editor) = self.editor.try_borrow_mut() else {
                self.deferred.borrow_mut().push_front(event);
                return;
            };
            Self::apply(&mut editor, event);
        }
    }

    fn apply(editor: &mut EditorView<S>, event: FieldEvent) {
        match event {
            FieldEvent::Focus(field) => editor.handle_focus(field),
            FieldEvent::Blur(field) => editor.handle_blur(field),
        }
    }

    fn context_for(&self, editor: &EditorView<S>) -> TemplateContext {
        let mut context = editor.template_context();
        let user = self.user.borrow();

        if let Some(user) = user.as_ref() {
            if !user.display_name.is_empty() {
                context.strings.username = Some(user.display_name.clone());
            }
            if editor.config().show_avatar {
                context.show_avatar = true;
                context.avatar_url = user.avatar_url.clone();
            }
        }
        context
    }

    fn handle_session_event(&self, event: &SessionEvent) {
        match event {
            SessionEvent::Login { provider, user } => {
                log::info!("editor: {} logged in via {}", user.id, provider);
                *self.user.borrow_mut() = Some(user.clone());
            }
            SessionEvent::Logout => {
                log::info!("editor: logged out");
                *self.user.borrow_mut() = None;
            }
        }
        self.rerender();
    }

    fn rerender(&self) {
        {
            let Ok(mut editor) = self.editor.try_borrow_mut() else {
                log::warn!("editor busy, skipping re-render");
                return;
            };
            if !editor.is_rendered() {
                return;
            }
            let context = self.context_for(&editor);
            if let Err(err) = editor.render_with(&context) {
                log::error!("editor re-render failed: {}", err);
            }
        }
        self.flush_field_events();
    }

    fn emit(&self, signal: &EditorSignal) {
        log::debug!("signal: {}", signal.name());
        let sinks: Vec<SignalSink> = self.sinks.borrow().iter().cloned().collect();
        for sink in sinks {
            sink(signal);
        }
    }

    /// Send the post staged by `submit`
    fn send_pending_post(inner: &Rc<Self>) -> Result<()> {
        let post = inner.pending_post.borrow_mut().take();
        match post {
            Some(post) => Self::send_post_event(inner, post),
            None => {
                log::warn!("editor: no post staged for sending");
                Ok(())
            }
        }
    }

    /// Build the record for `post` and start writing it
    fn send_post_event(inner: &Rc<Self>, post: PostData) -> Result<()> {
        let held = inner.user.borrow().clone();
        let author = match held {
            Some(user) => user,
            None => {
                let user = inner
                    .session
                    .current_session(&inner.provider)
                    .ok_or_else(|| EditorError::Login(format!("no {} session", inner.provider)))?;
                *inner.user.borrow_mut() = Some(user.clone());
                user
            }
        };

        let record = ContentRecord::new(
            author,
            &post,
            inner.parent_id.clone(),
            inner.collection.collection_ref(),
        );
        log::info!("editor: writing {} to {}", record.id, record.collection.id);
        inner.emit(&EditorSignal::WriteContent(record.clone()));
        Self::write(inner, record, post);
        Ok(())
    }

    fn write(inner: &Rc<Self>, record: ContentRecord, post: PostData) {
        inner.write_in_flight.set(true);
        inner.pending_retry.borrow_mut().take();

        let weak = Rc::downgrade(inner);
        let attempt = record.clone();
        inner.collection.write(
            record,
            Box::new(move |result: WriteResult| {
                if let Some(inner) = weak.upgrade() {
                    Self::complete_write(&inner, attempt, post, result);
                }
            }),
        );
    }

    fn complete_write(inner: &Rc<Self>, record: ContentRecord, post: PostData, result: WriteResult) {
        inner.write_in_flight.set(false);

        match result {
            Ok(response) => {
                log::info!("editor: wrote {}", record.id);
                post.succeeded(&record, &response);
                inner.emit(&EditorSignal::WriteSuccess { record, response });
            }
            Err(error) => {
                log::warn!("editor: write of {} failed: {}", record.id, error);
                post.failed(&record, &error);

                let retry = Self::retry_for(inner, record, post);
                *inner.pending_retry.borrow_mut() = Some(retry.clone());

                if inner.show_write_errors {
                    inner.show_write_error(&error);
                }
                inner.emit(&EditorSignal::WriteFailure { error, retry });
            }
        }
    }

    fn retry_for(inner: &Rc<Self>, record: ContentRecord, post: PostData) -> Retry {
        let weak: Weak<Self> = Rc::downgrade(inner);
        Retry {
            record,
            post,
            reissue: Rc::new(move |record: &ContentRecord, post: &PostData| -> Result<()> {
                let inner = weak
                    .upgrade()
                    .ok_or_else(|| EditorError::Host("editor was dropped".to_string()))?;
                if inner.write_in_flight.get() {
                    return Err(EditorError::WriteInFlight);
                }
                log::info!("editor: retrying {}", record.id);
                Self::write(&inner, record.clone(), post.clone());
                Ok(())
            }),
        }
    }

    fn show_write_error(&self, error: &WriteError) {
        {
            let Ok(mut editor) = self.editor.try_borrow_mut() else {
                return;
            };
            let message = error_message_for(editor.strings(), error);
            if let Err(err) = editor.show_error(&message) {
                log::error!("could not show write error: {}", err);
            }
        }
        self.flush_field_events();
    }
}

/// User-facing message for a write failure
pub fn error_message_for(strings: &Strings, error: &WriteError) -> String {
    match error.code.as_deref() {
        Some(DUPLICATE_CODE) => strings.errors.duplicate.clone(),
        _ => strings.errors.generic.clone(),
    }
}

/// Comment editor bound to a live session and a write target
pub struct AuthEditorView<S: Surface + 'static> {
    inner: Rc<Inner<S>>,
}

impl<S: Surface + 'static> AuthEditorView<S> {
    /// Build the view and subscribe to the provider's login and logout events
    ///
    /// Fails with [`EditorError::Configuration`] unless a collection is
    /// given directly or through the content target.
    pub fn new(surface: S, session: Rc<dyn SessionProvider>, options: AuthEditorOptions) -> Result<Self> {
        let AuthEditorOptions {
            config,
            collection,
            content,
            provider,
            show_write_errors,
        } = options;

        let collection = collection
            .or_else(|| content.as_ref().and_then(|content| content.collection.clone()))
            .ok_or_else(|| {
                EditorError::Configuration(
                    "a collection, or content with a collection, is required".to_string(),
                )
            })?;

        let user = session.current_session(&provider);
        let inner = Rc::new_cyclic(|weak: &Weak<Inner<S>>| {
            let weak = weak.clone();
            let command = Command::new(move || match weak.upgrade() {
                Some(inner) => Inner::send_pending_post(&inner),
                None => Ok(()),
            });

            Inner {
                editor: RefCell::new(EditorView::with_defaults(surface, config, Strings::authenticated())),
                session: Rc::clone(&session),
                provider: provider.clone(),
                auth: AuthRequiredCommand::new(command, Rc::clone(&session), provider.clone()),
                pending_post: RefCell::new(None),
                deferred: RefCell::new(VecDeque::new()),
                collection,
                parent_id: content.map(|content| content.id),
                show_write_errors,
                user: RefCell::new(user),
                pending_retry: RefCell::new(None),
                write_in_flight: Cell::new(false),
                sinks: RefCell::new(Vec::new()),
                subscriptions: RefCell::new(Vec::new()),
            }
        });

        let subscriptions: Vec<Subscription> = [SessionTopic::Login(provider), SessionTopic::Logout]
            .into_iter()
            .map(|topic| {
                let weak = Rc::downgrade(&inner);
                let handler: SessionHandler = Rc::new(move |event: &SessionEvent| {
                    if let Some(inner) = weak.upgrade() {
                        inner.handle_session_event(event);
                    }
                });
                session.subscribe(topic, handler)
            })
            .collect();
        inner.subscriptions.borrow_mut().extend(subscriptions);

        Ok(Self { inner })
    }

    /// Register a receiver for [`EditorSignal`]s
    pub fn on_signal(&self, sink: impl Fn(&EditorSignal) + 'static) {
        self.inner.sinks.borrow_mut().push(Rc::new(sink));
    }

    pub fn editor(&self) -> Ref<'_, EditorView<S>> {
        self.inner.editor.borrow()
    }

    pub fn editor_mut(&self) -> RefMut<'_, EditorView<S>> {
        self.inner.editor.borrow_mut()
    }

    /// The user this view currently believes is signed in
    pub fn user(&self) -> Option<User> {
        self.inner.user.borrow().clone()
    }

    pub fn provider(&self) -> &str {
        &self.inner.provider
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.inner.parent_id.as_deref()
    }

    pub fn template_context(&self) -> TemplateContext {
        let editor = self.inner.editor.borrow();
        self.inner.context_for(&editor)
    }

    /// Authentication state of the submit command
    pub fn auth_state(&self) -> AuthState {
        self.inner.auth.state()
    }

    pub fn render(&self) -> Result<()> {
        self.inner.with_editor(|editor| {
            let context = self.inner.context_for(editor);
            editor.render_with(&context)
        })
    }

    pub fn initialize(&self) {
        self.inner.with_editor(|editor| editor.initialize());
    }

    /// Host focus event; safe to deliver while the view is focusing the field
    pub fn handle_focus(&self, field: Field) {
        self.inner.field_event(FieldEvent::Focus(field));
    }

    /// Host blur event; safe to deliver while the view is blurring the field
    pub fn handle_blur(&self, field: Field) {
        self.inner.field_event(FieldEvent::Blur(field));
    }

    pub fn handle_keyup(&self) {
        self.inner.with_editor(|editor| editor.handle_keyup());
    }

    /// Resize, submitting on a bare Enter
    pub fn handle_keydown(&self, key: &KeyPress) -> Result<KeyOutcome> {
        let outcome = self.inner.with_editor(|editor| editor.handle_keydown(key));
        if outcome == KeyOutcome::Submit {
            self.submit()?;
        }
        Ok(outcome)
    }

    /// Validate, then post through the auth-gated command chain
    ///
    /// Rejected while an earlier write is still in flight.
    pub fn submit(&self) -> Result<SubmitOutcome> {
        if self.inner.write_in_flight.get() {
            log::warn!("editor: submission rejected, a write is in flight");
            return Err(EditorError::WriteInFlight);
        }

        let prepared = self.inner.with_editor(|editor| editor.prepare_submission())?;
        let Some(post) = prepared else {
            return Ok(SubmitOutcome::Rejected);
        };

        *self.inner.pending_post.borrow_mut() = Some(post);
        let outcome = self.inner.auth.execute();
        // Deferred posts are not kept; the next submit rebuilds from the field
        self.inner.pending_post.borrow_mut().take();

        match outcome? {
            CommandOutcome::Executed => Ok(SubmitOutcome::Submitted),
            CommandOutcome::Deferred => Ok(SubmitOutcome::LoginRequested),
        }
    }

    pub fn is_write_in_flight(&self) -> bool {
        self.inner.write_in_flight.get()
    }

    /// Retry handle for the most recent failed write
    pub fn pending_retry(&self) -> Option<Retry> {
        self.inner.pending_retry.borrow().clone()
    }

    /// Re-issue the most recent failed write; false when there is none
    pub fn retry_last_write(&self) -> Result<bool> {
        let retry = self.inner.pending_retry.borrow().clone();
        match retry {
            Some(retry) => {
                retry.invoke()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn show_error(&self, message: &str) -> Result<()> {
        self.inner.with_editor(|editor| editor.show_error(message))
    }

    pub fn dismiss_error(&self) -> bool {
        self.inner.with_editor(|editor| editor.dismiss_error())
    }

    pub fn reset(&self) {
        self.inner.with_editor(|editor| editor.reset());
    }

    /// Release every session subscription; later events are ignored
    pub fn destroy(&self) {
        let subscriptions: Vec<Subscription> = self.inner.subscriptions.borrow_mut().drain(..).collect();
        if subscriptions.is_empty() {
            return;
        }
        for subscription in subscriptions {
            subscription.unsubscribe();
        }
        log::debug!("editor destroyed");
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.subscriptions.borrow().is_empty()
    }
}
