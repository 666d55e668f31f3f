//! Comment editor WASM API
//!
//! JavaScript-facing layer over the editor core.
//!
//! # Module Structure
//!
//! - `helpers`: console logging macros, serde bridging, JS object access
//! - `bridge`: `JsSession` and `JsCollection` adapters over host objects
//! - `surface`: `DomSurface`, the web-sys implementation of `Surface`
//! - `editor`: the exported `CommentEditor` class and content functions

pub mod helpers;
pub mod bridge;
pub mod surface;
pub mod editor;

pub use bridge::{JsCollection, JsSession};
pub use editor::CommentEditor;
pub use surface::DomSurface;
