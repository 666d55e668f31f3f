//! Template context and markup
//!
//! The view only produces a [`TemplateContext`]; turning it into markup is
//! the host surface's job. Browser surfaces use the built-in mustache
//! templates below.

use serde::Serialize;

use crate::error::Result;

/// Class names shared by the templates and the DOM surface
pub mod classes {
    pub const FIELD: &str = "lf-editor-field";
    pub const FOCUS: &str = "lf-editor-focus";
    pub const RESIZE: &str = "lf-editor-resize";
    pub const TITLE: &str = "lf-editor-title";
    pub const POST_BTN: &str = "lf-editor-post-btn";
    pub const ERROR: &str = "lf-editor-error";
    pub const ERROR_MESSAGE: &str = "lf-error-message";
}

/// Strings exposed to the surface template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateStrings {
    pub post: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Everything a surface needs to render the editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateContext {
    pub strings: TemplateStrings,
    pub show_title: bool,
    pub show_avatar: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Flattened view of the context; the templates only branch on booleans
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EditorMarkup<'a> {
    post: &'a str,
    show_username: bool,
    username: &'a str,
    show_title: bool,
    show_avatar: bool,
    avatar_url: &'a str,
}

#[derive(Serialize)]
struct ErrorMarkup<'a> {
    msg: &'a str,
}

const EDITOR_TEMPLATE: &str = include_str!("templates/editor.html.mustache");
const ERROR_TEMPLATE: &str = include_str!("templates/error.html.mustache");

/// Render the editor surface markup
pub fn render_editor(context: &TemplateContext) -> Result<String> {
    let username = context.strings.username.as_deref().unwrap_or("");
    let avatar_url = context.avatar_url.as_deref().unwrap_or("");
    let markup = EditorMarkup {
        post: &context.strings.post,
        show_username: !username.is_empty(),
        username,
        show_title: context.show_title,
        show_avatar: context.show_avatar && !avatar_url.is_empty(),
        avatar_url,
    };

    let template = mustache::compile_str(EDITOR_TEMPLATE)?;
    Ok(template.render_to_string(&markup)?)
}

/// Render the error surface markup for `msg`
pub fn render_error(msg: &str) -> Result<String> {
    let template = mustache::compile_str(ERROR_TEMPLATE)?;
    Ok(template.render_to_string(&ErrorMarkup { msg })?)
}
