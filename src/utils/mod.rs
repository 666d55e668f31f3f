//! Utility modules for the comment editor

pub mod content;

pub use content::*;
