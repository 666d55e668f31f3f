//! Editor views
//!
//! [`EditorView`] drives a host [`Surface`]: placeholder emulation, focus
//! tracking, auto-resize, keyboard submission, validation and the single
//! error surface. What happens to a valid post is decided by an injected
//! [`SubmitPolicy`]; [`auth::AuthEditorView`] supplies the signed-in,
//! collection-writing one.

pub mod auth;
pub mod memory;
pub mod template;

use crate::error::Result;
use crate::models::{EditorConfig, EditorState, Field, PostData, Strings, SurfaceState};
use crate::utils::{denormalize_paragraphs, is_body_valid, normalize_newlines};

pub use auth::{AuthEditorOptions, AuthEditorView, EditorSignal, Retry};
pub use memory::MemorySurface;
pub use template::{TemplateContext, TemplateStrings};

/// The host input surface
///
/// Implemented over the DOM in the browser and by [`MemorySurface`]
/// elsewhere. The view never assumes anything about markup.
pub trait Surface {
    /// Rebuild the surface from `context`; field values start out empty
    fn render(&mut self, context: &TemplateContext) -> Result<()>;

    fn has_field(&self, field: Field) -> bool;

    /// Whether the controls support a native placeholder attribute
    fn supports_placeholder(&self) -> bool;

    fn set_placeholder(&mut self, field: Field, text: &str);

    fn value(&self, field: Field) -> String;

    fn set_value(&mut self, field: Field, value: &str);

    /// Replace the hidden measuring element's markup
    fn set_mirror(&mut self, markup: &str);

    /// Rendered height of each line in the measuring element
    fn mirror_line_heights(&self) -> Vec<f64>;

    /// Current height of the body field
    fn height(&self) -> f64;

    fn set_height(&mut self, height: f64);

    /// Toggle the focus marker on the surface root
    fn set_focused(&mut self, focused: bool);

    /// Focus the body field and place the cursor at the end
    fn focus(&mut self);

    fn blur(&mut self);

    /// Display an error surface carrying `message`
    fn show_error(&mut self, message: &str) -> Result<()>;

    fn remove_error(&mut self);
}

/// What a valid post is handed to
pub trait SubmitPolicy {
    fn send_post(&mut self, post: PostData) -> Result<()>;
}

impl<F> SubmitPolicy for F
where
    F: FnMut(PostData) -> Result<()>,
{
    fn send_post(&mut self, post: PostData) -> Result<()> {
        self(post)
    }
}

/// A key event from the body field
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    pub shift: bool,
}

impl KeyPress {
    pub fn new(key: impl Into<String>, shift: bool) -> Self {
        Self {
            key: key.into(),
            shift,
        }
    }

    pub fn enter() -> Self {
        Self::new("Enter", false)
    }

    fn is_submit(&self) -> bool {
        self.key == "Enter" && !self.shift
    }
}

/// How the host should treat a key event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Let the control handle the key
    Default,
    /// Default suppressed; the submit pipeline should run
    Submit,
}

/// Result of a submission attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed and an error is showing
    Rejected,
    /// The post went to the policy
    Submitted,
    /// Nobody is signed in; a login flow was started instead
    LoginRequested,
}

/// Interactive editing surface
pub struct EditorView<S: Surface> {
    surface: S,
    config: EditorConfig,
    strings: Strings,
    state: EditorState,
    error: Option<String>,
    rendered: bool,
}

impl<S: Surface> EditorView<S> {
    pub fn new(surface: S, config: EditorConfig) -> Self {
        Self::with_defaults(surface, config, Strings::default())
    }

    /// Build with a different set of default strings under the config
    pub fn with_defaults(surface: S, config: EditorConfig, defaults: Strings) -> Self {
        let strings = config.strings(defaults);
        Self {
            surface,
            config,
            strings,
            state: EditorState::new(),
            error: None,
            rendered: false,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn strings(&self) -> &Strings {
        &self.strings
    }

    pub fn editor_state(&self) -> &EditorState {
        &self.state
    }

    pub fn is_rendered(&self) -> bool {
        self.rendered
    }

    /// Current state of the surface state machine
    pub fn state(&self) -> SurfaceState {
        self.state.surface_state(!self.field_text(Field::Body).is_empty())
    }

    fn shows_title(&self) -> bool {
        self.config.show_title && self.surface.has_field(Field::Title)
    }

    fn placeholder_for(&self, field: Field) -> &str {
        match field {
            Field::Body => &self.strings.placeholder_text,
            Field::Title => &self.strings.title_placeholder_text,
        }
    }

    /// Field value with an emulated placeholder read as empty
    fn field_text(&self, field: Field) -> String {
        if !self.surface.has_field(field) {
            return String::new();
        }
        let value = self.surface.value(field);
        if !self.state.placeholder_supported && value == self.placeholder_for(field) {
            return String::new();
        }
        value
    }

    pub fn template_context(&self) -> TemplateContext {
        TemplateContext {
            strings: TemplateStrings {
                post: self.strings.post.clone(),
                username: None,
            },
            show_title: self.config.show_title,
            show_avatar: false,
            avatar_url: None,
        }
    }

    /// Render with the view's own template context
    pub fn render(&mut self) -> Result<()> {
        let context = self.template_context();
        self.render_with(&context)
    }

    /// Render with a caller-built context, keeping typed text
    pub fn render_with(&mut self, context: &TemplateContext) -> Result<()> {
        let (body, title) = if self.rendered {
            (self.field_text(Field::Body), self.field_text(Field::Title))
        } else {
            (String::new(), String::new())
        };

        self.surface.render(context)?;
        self.rendered = true;
        self.process_placeholders();

        if !body.is_empty() {
            self.surface.set_value(Field::Body, &body);
        }
        if !title.is_empty() && self.shows_title() {
            self.surface.set_value(Field::Title, &title);
        }

        // The old error surface went away with the old markup
        if let Some(message) = self.error.clone() {
            self.surface.show_error(&message)?;
        }
        log::debug!("editor rendered (state: {:?})", self.state());
        Ok(())
    }

    fn process_placeholders(&mut self) {
        let show_title = self.shows_title();

        if self.surface.supports_placeholder() {
            self.state.placeholder_supported = true;
            self.surface.set_placeholder(Field::Body, &self.strings.placeholder_text);
            if show_title {
                self.surface.set_placeholder(Field::Title, &self.strings.title_placeholder_text);
            }
            return;
        }

        self.state.placeholder_supported = false;
        self.surface.set_value(Field::Body, &self.strings.placeholder_text);
        if show_title {
            self.surface.set_value(Field::Title, &self.strings.title_placeholder_text);
        }
    }

    /// Record the original height and focus the body
    ///
    /// Call once the surface is attached.
    pub fn initialize(&mut self) {
        self.state.original_height = Some(self.surface.height());
        self.focus();
    }

    pub fn focus(&mut self) {
        self.surface.focus();
    }

    pub fn handle_focus(&mut self, field: Field) {
        if field == Field::Body {
            self.state.focused = true;
            self.surface.set_focused(true);
        }

        if self.state.placeholder_supported {
            return;
        }
        if self.surface.value(field) == self.placeholder_for(field) {
            self.surface.set_value(field, "");
        }
    }

    pub fn handle_blur(&mut self, field: Field) {
        if field == Field::Body {
            self.state.focused = false;
            self.surface.set_focused(false);
        }

        if self.state.placeholder_supported || !self.surface.value(field).is_empty() {
            return;
        }
        let placeholder = self.placeholder_for(field).to_string();
        self.surface.set_value(field, &placeholder);
    }

    /// Resize, and turn a bare Enter into a submit request
    pub fn handle_keydown(&mut self, key: &KeyPress) -> KeyOutcome {
        self.resize();
        if key.is_submit() {
            KeyOutcome::Submit
        } else {
            KeyOutcome::Default
        }
    }

    pub fn handle_keyup(&mut self) {
        self.resize();
    }

    /// Grow or shrink the body to fit its lines
    pub fn resize(&mut self) {
        let markup = normalize_newlines(&self.field_text(Field::Body));
        self.surface.set_mirror(&markup);
        let height: f64 = self.surface.mirror_line_heights().iter().sum();
        self.surface.set_height(height);
    }

    /// Normalized body markup
    pub fn contents(&self) -> String {
        normalize_newlines(&self.field_text(Field::Body))
    }

    /// Load paragraph markup into the body
    pub fn set_contents(&mut self, markup: &str) {
        self.surface.set_value(Field::Body, &denormalize_paragraphs(markup));
        self.resize();
    }

    pub fn build_post_data(&self) -> PostData {
        let title = if self.shows_title() {
            Some(self.field_text(Field::Title))
        } else {
            None
        };
        PostData::new(self.contents(), title)
    }

    /// Check the post, showing the body error when it is blank
    pub fn validate(&mut self, post: &PostData) -> Result<bool> {
        if is_body_valid(&post.body) {
            return Ok(true);
        }
        let message = self.strings.errors.body.clone();
        self.show_error(&message)?;
        Ok(false)
    }

    /// Build and validate a post; `None` when it was rejected
    pub fn prepare_submission(&mut self) -> Result<Option<PostData>> {
        let post = self.build_post_data();
        if !self.validate(&post)? {
            log::debug!("submission rejected: blank body");
            return Ok(None);
        }
        Ok(Some(post))
    }

    /// Validate and hand the post to `policy`
    pub fn submit<P: SubmitPolicy + ?Sized>(&mut self, policy: &mut P) -> Result<SubmitOutcome> {
        match self.prepare_submission()? {
            Some(post) => {
                policy.send_post(post)?;
                Ok(SubmitOutcome::Submitted)
            }
            None => Ok(SubmitOutcome::Rejected),
        }
    }

    /// Show `message`, unless an error is already showing
    pub fn show_error(&mut self, message: &str) -> Result<()> {
        if self.state.error_shown {
            return Ok(());
        }

        self.surface.show_error(message)?;
        self.state.error_shown = true;
        self.error = Some(message.to_string());
        self.surface.blur();
        log::debug!("error shown: {}", message);
        Ok(())
    }

    /// Remove the error surface and return focus to the body
    ///
    /// Returns false when no error was showing.
    pub fn dismiss_error(&mut self) -> bool {
        if !self.state.error_shown {
            return false;
        }
        self.surface.remove_error();
        self.state.error_shown = false;
        self.error = None;
        self.focus();
        true
    }

    /// Clear the fields and restore the original height
    pub fn reset(&mut self) {
        self.surface.set_mirror("");
        self.surface.set_value(Field::Body, "");
        if let Some(height) = self.state.original_height {
            self.surface.set_height(height);
        }
        if self.shows_title() {
            self.surface.set_value(Field::Title, "");
        }
    }
}
