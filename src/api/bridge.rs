//! Adapters over host JavaScript collaborators
//!
//! `JsSession` wraps an auth object exposing `get(provider)`,
//! `login(request)`, `on(event, fn)` and `removeListener(event, fn)`.
//! `JsCollection` wraps an object exposing `write(record, callback)` where
//! the callback follows the node convention `(error, result)`.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::helpers::{describe, method, property, serialize};
use crate::collection::{Collection, WriteCallback, WriteResult};
use crate::error::{EditorError, Result, WriteError};
use crate::models::{CollectionRef, ContentRecord, User};
use crate::session::{LoginRequest, SessionEvent, SessionHandler, SessionProvider, SessionTopic, Subscription};
use crate::{wasm_error, wasm_warn};

fn user_from_js(value: JsValue) -> Option<User> {
    if value.is_null() || value.is_undefined() {
        return None;
    }
    // Model objects expose their attributes through toJSON
    let value = match method(&value, "toJSON") {
        Ok(to_json) => to_json.call0(&value).unwrap_or(value),
        Err(_) => value,
    };
    match serde_wasm_bindgen::from_value(value) {
        Ok(user) => Some(user),
        Err(err) => {
            wasm_warn!("unreadable user from auth: {}", err);
            None
        }
    }
}

/// Session provider backed by a JS auth object
pub struct JsSession {
    auth: JsValue,
}

impl JsSession {
    pub fn new(auth: JsValue) -> Self {
        Self { auth }
    }
}

impl SessionProvider for JsSession {
    fn current_session(&self, provider: &str) -> Option<User> {
        let get = method(&self.auth, "get").ok()?;
        let value = get.call1(&self.auth, &JsValue::from_str(provider)).ok()?;
        user_from_js(value)
    }

    fn login(&self, request: &LoginRequest) -> Result<()> {
        let login = method(&self.auth, "login")?;
        let arg = serialize(request, "Failed to serialize login request")?;
        login
            .call1(&self.auth, &arg)
            .map_err(|err| EditorError::Login(describe(&err)))?;
        Ok(())
    }

    fn subscribe(&self, topic: SessionTopic, handler: SessionHandler) -> Subscription {
        let name = topic.event_name();
        let event_topic = topic.clone();
        let closure = Closure::wrap(Box::new(move |payload: JsValue| {
            let event = match &event_topic {
                SessionTopic::Login(provider) => match user_from_js(payload) {
                    Some(user) => SessionEvent::Login {
                        provider: provider.clone(),
                        user,
                    },
                    None => return,
                },
                SessionTopic::Logout => SessionEvent::Logout,
            };
            handler(&event);
        }) as Box<dyn Fn(JsValue)>);
        let function: js_sys::Function = closure.as_ref().unchecked_ref::<js_sys::Function>().clone();

        match method(&self.auth, "on") {
            Ok(on) => {
                if let Err(err) = on.call2(&self.auth, &JsValue::from_str(&name), &function) {
                    wasm_error!("subscribing to {} failed: {}", name, describe(&err));
                }
            }
            Err(err) => wasm_error!("cannot subscribe to {}: {}", name, err),
        }

        let auth = self.auth.clone();
        Subscription::new(topic, move || {
            match method(&auth, "removeListener") {
                Ok(off) => {
                    if let Err(err) = off.call2(&auth, &JsValue::from_str(&name), &function) {
                        wasm_warn!("unsubscribing from {} failed: {}", name, describe(&err));
                    }
                }
                Err(err) => wasm_warn!("cannot unsubscribe from {}: {}", name, err),
            }
            drop(closure);
        })
    }
}

fn write_error_from_js(err: &JsValue) -> WriteError {
    if let Some(message) = err.as_string() {
        return WriteError::new(message);
    }
    WriteError {
        message: describe(err),
        code: property(err, "code").and_then(|code| code.as_string()),
    }
}

/// Write target backed by a JS collection object
pub struct JsCollection {
    target: JsValue,
    collection: CollectionRef,
}

impl JsCollection {
    /// Wrap `target`, which must carry an `id` and a `write` function
    pub fn new(target: JsValue) -> Result<Self> {
        method(&target, "write")?;
        let id = property(&target, "id")
            .and_then(|id| id.as_string())
            .ok_or_else(|| EditorError::Configuration("collection has no id".to_string()))?;
        let site_id = property(&target, "siteId").and_then(|site| site.as_string());

        Ok(Self {
            target,
            collection: CollectionRef { id, site_id },
        })
    }
}

impl Collection for JsCollection {
    fn collection_ref(&self) -> CollectionRef {
        self.collection.clone()
    }

    fn write(&self, record: ContentRecord, done: WriteCallback) {
        // Shared so a synchronous throw can still complete the write
        let done = Rc::new(RefCell::new(Some(done)));
        let finish = {
            let done = Rc::clone(&done);
            move |result: WriteResult| {
                let callback = done.borrow_mut().take();
                if let Some(callback) = callback {
                    callback(result);
                }
            }
        };

        let write = match method(&self.target, "write") {
            Ok(write) => write,
            Err(err) => return finish(Err(WriteError::new(err.to_string()))),
        };
        let payload = match serialize(&record, "Failed to serialize content record") {
            Ok(payload) => payload,
            Err(err) => return finish(Err(WriteError::new(err.to_string()))),
        };

        let on_complete = {
            let finish = finish.clone();
            Closure::once_into_js(move |err: JsValue, response: JsValue| {
                if err.is_null() || err.is_undefined() {
                    let response = serde_wasm_bindgen::from_value(response).unwrap_or(serde_json::Value::Null);
                    finish(Ok(response));
                } else {
                    finish(Err(write_error_from_js(&err)));
                }
            })
        };

        if let Err(err) = write.call2(&self.target, &payload, &on_complete) {
            finish(Err(write_error_from_js(&err)));
        }
    }
}
