//! Editor state management
//!
//! Per-view state of the input surface. The surface itself holds the text;
//! this tracks what the view needs to remember between events.

use serde::{Deserialize, Serialize};

/// Which input control an event refers to
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Body,
    Title,
}

/// Observable state of the editing surface
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SurfaceState {
    /// Unfocused and empty, placeholder showing
    BlankPlaceholder,
    /// Focused with nothing typed yet
    FocusedEmpty,
    /// The body holds user text
    HasContent,
    /// An error surface is displayed
    ErrorShown,
}

/// Mutable per-view state
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EditorState {
    /// Height recorded by `initialize`, restored by `reset`
    pub original_height: Option<f64>,

    /// Whether the host control supports native placeholders
    pub placeholder_supported: bool,

    pub focused: bool,

    pub error_shown: bool,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            original_height: None,
            placeholder_supported: true,
            focused: false,
            error_shown: false,
        }
    }
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify the surface given whether the body holds user text
    pub fn surface_state(&self, has_content: bool) -> SurfaceState {
        if self.error_shown {
            SurfaceState::ErrorShown
        } else if has_content {
            SurfaceState::HasContent
        } else if self.focused {
            SurfaceState::FocusedEmpty
        } else {
            SurfaceState::BlankPlaceholder
        }
    }
}
