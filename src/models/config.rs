//! Editor configuration and user-facing strings
//!
//! Options arrive from the host as a plain object (or JSON) and are layered
//! over built-in defaults.

use serde::{Deserialize, Serialize};

/// Options recognized by the editor views
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Body placeholder; wins over `i18n.placeholderText`
    pub placeholder_text: Option<String>,

    /// Adds a title field with its own placeholder lifecycle
    pub show_title: bool,

    /// Shows the signed-in user's avatar next to the field
    pub show_avatar: bool,

    /// Overrides for any user-facing string
    pub i18n: StringOverrides,
}

impl EditorConfig {
    /// Parse options from a JSON document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Resolve the final strings over the given defaults
    pub fn strings(&self, defaults: Strings) -> Strings {
        let mut strings = defaults.merged(&self.i18n);
        if let Some(placeholder) = &self.placeholder_text {
            strings.placeholder_text = placeholder.clone();
        }
        strings
    }
}

/// Every string the editor shows to the user
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Strings {
    pub placeholder_text: String,
    pub title_placeholder_text: String,
    pub post: String,
    pub errors: ErrorStrings,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorStrings {
    pub body: String,
    pub duplicate: String,
    pub generic: String,
}

impl Default for Strings {
    fn default() -> Self {
        Self {
            placeholder_text: "What would you like to say?".to_string(),
            title_placeholder_text: "Enter a title".to_string(),
            post: "Post".to_string(),
            errors: ErrorStrings {
                body: "Please add a message".to_string(),
                duplicate: "As much as you like your note, you cannot post it twice".to_string(),
                generic: "There was an error".to_string(),
            },
        }
    }
}

impl Strings {
    /// Defaults for the signed-in comment editor
    pub fn authenticated() -> Self {
        Self {
            post: "Post Your Comment".to_string(),
            ..Self::default()
        }
    }

    /// Apply a partial overlay, field by field
    pub fn merged(mut self, overrides: &StringOverrides) -> Self {
        fn set(target: &mut String, value: &Option<String>) {
            if let Some(value) = value {
                *target = value.clone();
            }
        }

        set(&mut self.placeholder_text, &overrides.placeholder_text);
        set(&mut self.title_placeholder_text, &overrides.title_placeholder_text);
        set(&mut self.post, &overrides.post);
        set(&mut self.errors.body, &overrides.errors.body);
        set(&mut self.errors.duplicate, &overrides.errors.duplicate);
        set(&mut self.errors.generic, &overrides.errors.generic);
        self
    }
}

/// Partial version of [`Strings`]; unset fields keep their defaults
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct StringOverrides {
    pub placeholder_text: Option<String>,
    pub title_placeholder_text: Option<String>,
    pub post: Option<String>,
    pub errors: ErrorOverrides,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ErrorOverrides {
    pub body: Option<String>,
    pub duplicate: Option<String>,
    pub generic: Option<String>,
}
