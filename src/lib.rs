//! Comment Editor WASM Module
//!
//! An embeddable comment editor: an input surface with placeholder
//! emulation and auto-resize, body validation, an auth-gated submit
//! chain and a retryable write to a host-supplied collection.

pub mod error;
pub mod models;
pub mod utils;
pub mod command;
pub mod session;
pub mod collection;
pub mod view;
pub mod api;

// Re-export commonly used types
pub use error::{EditorError, WriteError};
pub use models::*;
pub use view::{AuthEditorOptions, AuthEditorView, EditorSignal, EditorView, Surface};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    {
        if let Err(err) = console_log::init_with_level(log::Level::Debug) {
            web_sys::console::warn_1(&format!("logger already initialized: {}", err).into());
        }
    }

    log::info!("Comment editor WASM module initialized");
}
