//! Shared helpers for the WASM API
//!
//! Console logging, serde bridging and error conversion used by every
//! JavaScript-facing type.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::EditorError;

// ============================================================================
// Console Logging Functions
// ============================================================================

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);

    #[wasm_bindgen(js_namespace = console)]
    fn info(s: &str);

    #[wasm_bindgen(js_namespace = console)]
    fn warn(s: &str);

    #[wasm_bindgen(js_namespace = console)]
    fn error(s: &str);
}

// ============================================================================
// Logging Macros
// ============================================================================

/// Log a debug message with [editor] prefix
#[macro_export]
macro_rules! wasm_log {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_debug(&format!($($arg)*))
    };
}

/// Log an info message with [editor] prefix
#[macro_export]
macro_rules! wasm_info {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_info(&format!($($arg)*))
    };
}

/// Log a warning message with [editor] ⚠️ prefix
#[macro_export]
macro_rules! wasm_warn {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_warn(&format!($($arg)*))
    };
}

/// Log an error message with [editor] ❌ prefix
#[macro_export]
macro_rules! wasm_error {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_error(&format!($($arg)*))
    };
}

pub fn log_debug(msg: &str) {
    log(&format!("[editor] {}", msg));
}

pub fn log_info(msg: &str) {
    info(&format!("[editor] {}", msg));
}

pub fn log_warn(msg: &str) {
    warn(&format!("[editor] ⚠️ {}", msg));
}

pub fn log_error(msg: &str) {
    error(&format!("[editor] ❌ {}", msg));
}

// ============================================================================
// Serialization/Deserialization Helpers
// ============================================================================

/// Deserialize a value from JavaScript with automatic error handling
pub fn deserialize<T: DeserializeOwned>(value: JsValue, error_context: &str) -> Result<T, EditorError> {
    serde_wasm_bindgen::from_value(value).map_err(|e| {
        let msg = format!("{}: {}", error_context, e);
        log_error(&msg);
        EditorError::Host(msg)
    })
}

/// Serialize a value to JavaScript with automatic error handling
pub fn serialize<T: Serialize>(value: &T, error_context: &str) -> Result<JsValue, EditorError> {
    serde_wasm_bindgen::to_value(value).map_err(|e| {
        let msg = format!("{}: {}", error_context, e);
        log_error(&msg);
        EditorError::Host(msg)
    })
}

// ============================================================================
// JS Object Helpers
// ============================================================================

/// Read `object[name]`, treating null and undefined as absent
pub fn property(object: &JsValue, name: &str) -> Option<JsValue> {
    js_sys::Reflect::get(object, &JsValue::from_str(name))
        .ok()
        .filter(|value| !value.is_null() && !value.is_undefined())
}

/// Look up a callable member of `object`
pub fn method(object: &JsValue, name: &str) -> Result<js_sys::Function, EditorError> {
    property(object, name)
        .and_then(|value| value.dyn_into::<js_sys::Function>().ok())
        .ok_or_else(|| EditorError::Host(format!("expected a `{}` function", name)))
}

/// Best-effort text for a thrown JS value
pub fn describe(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    property(value, "message")
        .and_then(|message| message.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}

// ============================================================================
// Result Conversion Helpers
// ============================================================================

/// Convert an editor error to a JsValue, logging it
pub fn to_js_error(err: EditorError) -> JsValue {
    let msg = err.to_string();
    log_error(&msg);
    JsValue::from_str(&msg)
}
