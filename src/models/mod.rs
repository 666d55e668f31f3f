//! Models module for the comment editor
//!
//! Data carried between the editing surface, the submission pipeline and
//! the external collaborators.

pub mod config;
pub mod editor_state;
pub mod post;

// Re-export commonly used types
pub use config::*;
pub use editor_state::*;
pub use post::*;
