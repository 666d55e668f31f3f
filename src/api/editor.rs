//! JavaScript-facing comment editor
//!
//! The host page owns the DOM events and forwards them here:
//!
//! ```js
//! const editor = new CommentEditor(el, auth, { collection, showTitle: true }, (name, payload) => {
//!     if (name === 'writeSuccess') editor.reset();
//! });
//! editor.render();
//! editor.initialize();
//! field.addEventListener('keydown', ev => { if (editor.handleKeydown(ev.key, ev.shiftKey)) ev.preventDefault(); });
//! ```

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::Element;

use super::bridge::{JsCollection, JsSession};
use super::helpers::{deserialize, describe, property, serialize, to_js_error};
use super::surface::DomSurface;
use crate::collection::{Collection, ContentTarget};
use crate::error::EditorError;
use crate::models::{EditorConfig, Field};
use crate::view::{AuthEditorOptions, AuthEditorView, EditorSignal, KeyOutcome, KeyPress, SubmitOutcome};
use crate::{utils, wasm_error, wasm_info};

fn field_from_str(field: &str) -> Field {
    match field {
        "title" => Field::Title,
        _ => Field::Body,
    }
}

fn collection_from(value: Option<JsValue>) -> Result<Option<Rc<dyn Collection>>, EditorError> {
    match value {
        Some(value) => Ok(Some(Rc::new(JsCollection::new(value)?))),
        None => Ok(None),
    }
}

fn options_from_js(options: &JsValue) -> Result<AuthEditorOptions, EditorError> {
    let config: EditorConfig = if options.is_object() {
        deserialize(options.clone(), "Failed to read editor options")?
    } else {
        EditorConfig::default()
    };

    let mut editor_options = AuthEditorOptions::new(config).show_write_errors(true);
    if let Some(collection) = collection_from(property(options, "collection"))? {
        editor_options = editor_options.collection(collection);
    }
    if let Some(content) = property(options, "content") {
        let id = property(&content, "id")
            .and_then(|id| id.as_string())
            .ok_or_else(|| EditorError::Configuration("content has no id".to_string()))?;
        let collection = collection_from(property(&content, "collection"))?;
        editor_options = editor_options.content(ContentTarget::new(id, collection));
    }
    if let Some(provider) = property(options, "provider").and_then(|p| p.as_string()) {
        editor_options = editor_options.provider(provider);
    }
    Ok(editor_options)
}

fn set_field(target: &js_sys::Object, key: &str, value: &JsValue) -> Result<(), EditorError> {
    js_sys::Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(|err| EditorError::Host(format!("setting {} failed: {}", key, describe(&err))))
}

fn signal_payload(signal: &EditorSignal) -> Result<JsValue, EditorError> {
    match signal {
        EditorSignal::WriteContent(record) => serialize(record, "Failed to serialize record"),
        EditorSignal::WriteSuccess { record, response } => {
            let payload = js_sys::Object::new();
            let record = serialize(record, "Failed to serialize record")?;
            let response = serialize(response, "Failed to serialize response")?;
            set_field(&payload, "record", &record)?;
            set_field(&payload, "response", &response)?;
            Ok(payload.into())
        }
        EditorSignal::WriteFailure { error, retry } => {
            let payload = js_sys::Object::new();
            let error = serialize(error, "Failed to serialize write error")?;
            let retry = retry.clone();
            let retry = Closure::wrap(Box::new(move || {
                if let Err(err) = retry.invoke() {
                    wasm_error!("retry failed: {}", err);
                }
            }) as Box<dyn Fn()>);
            set_field(&payload, "error", &error)?;
            set_field(&payload, "retry", &retry.into_js_value())?;
            Ok(payload.into())
        }
    }
}

/// Comment editor bound to a host auth object and collection
#[wasm_bindgen]
pub struct CommentEditor {
    view: AuthEditorView<DomSurface>,
}

#[wasm_bindgen]
impl CommentEditor {
    /// Create an editor rendering into `root`
    ///
    /// `options` accepts the editor configuration plus `collection`,
    /// `content` and `provider`. `on_signal(name, payload)` receives
    /// writeContent, writeSuccess and writeFailure.
    #[wasm_bindgen(constructor)]
    pub fn new(
        root: Element,
        auth: JsValue,
        options: JsValue,
        on_signal: Option<js_sys::Function>,
    ) -> Result<CommentEditor, JsValue> {
        let editor_options = options_from_js(&options).map_err(to_js_error)?;
        let session = Rc::new(JsSession::new(auth));
        let view = AuthEditorView::new(DomSurface::new(root), session, editor_options).map_err(to_js_error)?;

        if let Some(callback) = on_signal {
            view.on_signal(move |signal| {
                let payload = match signal_payload(signal) {
                    Ok(payload) => payload,
                    Err(err) => {
                        wasm_error!("dropping {} signal: {}", signal.name(), err);
                        return;
                    }
                };
                if let Err(err) = callback.call2(&JsValue::NULL, &JsValue::from_str(signal.name()), &payload) {
                    wasm_error!("{} handler threw: {}", signal.name(), describe(&err));
                }
            });
        }

        wasm_info!("comment editor created (provider: {})", view.provider());
        Ok(CommentEditor { view })
    }

    pub fn render(&self) -> Result<(), JsValue> {
        self.view.render().map_err(to_js_error)
    }

    /// Record the original height and focus; call once attached
    pub fn initialize(&self) {
        self.view.initialize();
    }

    #[wasm_bindgen(js_name = handleFocus)]
    pub fn handle_focus(&self, field: &str) {
        self.view.handle_focus(field_from_str(field));
    }

    #[wasm_bindgen(js_name = handleBlur)]
    pub fn handle_blur(&self, field: &str) {
        self.view.handle_blur(field_from_str(field));
    }

    /// Returns true when the host should prevent the key's default
    #[wasm_bindgen(js_name = handleKeydown)]
    pub fn handle_keydown(&self, key: &str, shift: bool) -> Result<bool, JsValue> {
        let outcome = self
            .view
            .handle_keydown(&KeyPress::new(key, shift))
            .map_err(to_js_error)?;
        Ok(outcome == KeyOutcome::Submit)
    }

    #[wasm_bindgen(js_name = handleKeyup)]
    pub fn handle_keyup(&self) {
        self.view.handle_keyup();
    }

    /// Post button handler; returns "rejected", "submitted" or "login"
    pub fn submit(&self) -> Result<String, JsValue> {
        let outcome = self.view.submit().map_err(to_js_error)?;
        Ok(match outcome {
            SubmitOutcome::Rejected => "rejected",
            SubmitOutcome::Submitted => "submitted",
            SubmitOutcome::LoginRequested => "login",
        }
        .to_string())
    }

    #[wasm_bindgen(js_name = dismissError)]
    pub fn dismiss_error(&self) -> bool {
        self.view.dismiss_error()
    }

    pub fn reset(&self) {
        self.view.reset();
    }

    /// Re-issue the last failed write; false when there is none
    pub fn retry(&self) -> Result<bool, JsValue> {
        self.view.retry_last_write().map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = isWriteInFlight)]
    pub fn is_write_in_flight(&self) -> bool {
        self.view.is_write_in_flight()
    }

    /// Drop the auth subscriptions
    pub fn destroy(&self) {
        self.view.destroy();
    }
}

#[wasm_bindgen(js_name = normalizeNewlines)]
pub fn normalize_newlines(text: &str) -> String {
    utils::normalize_newlines(text)
}

#[wasm_bindgen(js_name = denormalizeParagraphs)]
pub fn denormalize_paragraphs(markup: &str) -> String {
    utils::denormalize_paragraphs(markup)
}

#[wasm_bindgen(js_name = isBodyValid)]
pub fn is_body_valid(markup: &str) -> bool {
    utils::is_body_valid(markup)
}
