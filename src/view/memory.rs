//! Headless surface
//!
//! Keeps field values, placeholders and the error surface in memory. Every
//! mirror paragraph measures one fixed line height.

use std::collections::HashMap;

use super::template::TemplateContext;
use super::Surface;
use crate::error::Result;
use crate::models::Field;

#[derive(Debug, Clone)]
pub struct MemorySurface {
    native_placeholder: bool,
    line_height: f64,
    values: HashMap<Field, String>,
    placeholders: HashMap<Field, String>,
    mirror: String,
    height: f64,
    focus_marker: bool,
    has_focus: bool,
    errors: Vec<String>,
    contexts: Vec<TemplateContext>,
}

impl MemorySurface {
    pub const DEFAULT_LINE_HEIGHT: f64 = 18.0;

    /// Surface whose controls support native placeholders
    pub fn new() -> Self {
        Self {
            native_placeholder: true,
            line_height: Self::DEFAULT_LINE_HEIGHT,
            values: HashMap::new(),
            placeholders: HashMap::new(),
            mirror: String::new(),
            height: 0.0,
            focus_marker: false,
            has_focus: false,
            errors: Vec::new(),
            contexts: Vec::new(),
        }
    }

    /// Surface without native placeholder support
    pub fn without_placeholders() -> Self {
        Self {
            native_placeholder: false,
            ..Self::new()
        }
    }

    pub fn with_line_height(mut self, line_height: f64) -> Self {
        self.line_height = line_height;
        self
    }

    /// Native placeholder attribute of `field`
    pub fn placeholder(&self, field: Field) -> Option<&str> {
        self.placeholders.get(&field).map(String::as_str)
    }

    pub fn mirror(&self) -> &str {
        &self.mirror
    }

    /// Error surfaces currently displayed
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn has_focus_marker(&self) -> bool {
        self.focus_marker
    }

    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    pub fn render_count(&self) -> usize {
        self.contexts.len()
    }

    pub fn last_context(&self) -> Option<&TemplateContext> {
        self.contexts.last()
    }
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for MemorySurface {
    fn render(&mut self, context: &TemplateContext) -> Result<()> {
        self.values.clear();
        self.values.insert(Field::Body, String::new());
        if context.show_title {
            self.values.insert(Field::Title, String::new());
        }
        self.placeholders.clear();
        self.mirror.clear();
        self.errors.clear();
        self.height = self.line_height;
        self.contexts.push(context.clone());
        Ok(())
    }

    fn has_field(&self, field: Field) -> bool {
        self.values.contains_key(&field)
    }

    fn supports_placeholder(&self) -> bool {
        self.native_placeholder
    }

    fn set_placeholder(&mut self, field: Field, text: &str) {
        self.placeholders.insert(field, text.to_string());
    }

    fn value(&self, field: Field) -> String {
        self.values.get(&field).cloned().unwrap_or_default()
    }

    fn set_value(&mut self, field: Field, value: &str) {
        if let Some(slot) = self.values.get_mut(&field) {
            *slot = value.to_string();
        }
    }

    fn set_mirror(&mut self, markup: &str) {
        self.mirror = markup.to_string();
    }

    fn mirror_line_heights(&self) -> Vec<f64> {
        vec![self.line_height; self.mirror.matches("<p>").count()]
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn set_height(&mut self, height: f64) {
        self.height = height;
    }

    fn set_focused(&mut self, focused: bool) {
        self.focus_marker = focused;
    }

    fn focus(&mut self) {
        self.has_focus = true;
    }

    fn blur(&mut self) {
        self.has_focus = false;
    }

    fn show_error(&mut self, message: &str) -> Result<()> {
        self.errors.push(message.to_string());
        Ok(())
    }

    fn remove_error(&mut self) {
        self.errors.pop();
    }
}
