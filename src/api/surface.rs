//! DOM surface
//!
//! Renders the editor template into a root element and drives the textarea,
//! title input, measuring mirror and error element through web-sys.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, HtmlInputElement, HtmlTextAreaElement};

use super::helpers::describe;
use crate::error::{EditorError, Result};
use crate::models::Field;
use crate::utils::cursor_end;
use crate::view::template::{classes, render_editor, render_error};
use crate::view::{Surface, TemplateContext};
use crate::wasm_warn;

pub struct DomSurface {
    root: Element,
    field: Option<HtmlTextAreaElement>,
    title: Option<HtmlInputElement>,
    mirror: Option<HtmlElement>,
    error: Option<Element>,
}

impl DomSurface {
    pub fn new(root: Element) -> Self {
        Self {
            root,
            field: None,
            title: None,
            mirror: None,
            error: None,
        }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    fn find<T: JsCast>(&self, class: &str) -> Option<T> {
        self.root
            .query_selector(&format!(".{}", class))
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<T>().ok())
    }

    fn element(&self, field: Field) -> Option<&HtmlElement> {
        match field {
            Field::Body => self.field.as_ref().map(|el| el.unchecked_ref::<HtmlElement>()),
            Field::Title => self.title.as_ref().map(|el| el.unchecked_ref::<HtmlElement>()),
        }
    }
}

fn host_error(context: &str, err: JsValue) -> EditorError {
    EditorError::Host(format!("{}: {}", context, describe(&err)))
}

impl Surface for DomSurface {
    fn render(&mut self, context: &TemplateContext) -> Result<()> {
        let markup = render_editor(context)?;
        self.root.set_inner_html(&markup);

        self.field = self.find(classes::FIELD);
        self.title = self.find(classes::TITLE);
        self.mirror = self.find(classes::RESIZE);
        self.error = None;

        if self.field.is_none() {
            return Err(EditorError::Host("editor markup has no body field".to_string()));
        }
        Ok(())
    }

    fn has_field(&self, field: Field) -> bool {
        self.element(field).is_some()
    }

    fn supports_placeholder(&self) -> bool {
        self.field
            .as_ref()
            .map(|field| js_sys::Reflect::has(field, &JsValue::from_str("placeholder")).unwrap_or(false))
            .unwrap_or(true)
    }

    fn set_placeholder(&mut self, field: Field, text: &str) {
        if let Some(element) = self.element(field) {
            if let Err(err) = element.set_attribute("placeholder", text) {
                wasm_warn!("setting placeholder failed: {}", describe(&err));
            }
        }
    }

    fn value(&self, field: Field) -> String {
        match field {
            Field::Body => self.field.as_ref().map(|el| el.value()),
            Field::Title => self.title.as_ref().map(|el| el.value()),
        }
        .unwrap_or_default()
    }

    fn set_value(&mut self, field: Field, value: &str) {
        match field {
            Field::Body => {
                if let Some(el) = &self.field {
                    el.set_value(value);
                }
            }
            Field::Title => {
                if let Some(el) = &self.title {
                    el.set_value(value);
                }
            }
        }
    }

    fn set_mirror(&mut self, markup: &str) {
        if let Some(mirror) = &self.mirror {
            mirror.set_inner_html(markup);
        }
    }

    fn mirror_line_heights(&self) -> Vec<f64> {
        let Some(mirror) = &self.mirror else {
            return Vec::new();
        };
        let children = mirror.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .filter_map(|child| child.dyn_into::<HtmlElement>().ok())
            .map(|child| f64::from(child.offset_height()))
            .collect()
    }

    fn height(&self) -> f64 {
        self.field
            .as_ref()
            .map(|field| f64::from(field.offset_height()))
            .unwrap_or(0.0)
    }

    fn set_height(&mut self, height: f64) {
        if let Some(field) = &self.field {
            if let Err(err) = field.style().set_property("height", &format!("{}px", height)) {
                wasm_warn!("resizing editor failed: {}", describe(&err));
            }
        }
    }

    fn set_focused(&mut self, focused: bool) {
        if let Err(err) = self.root.class_list().toggle_with_force(classes::FOCUS, focused) {
            wasm_warn!("toggling focus class failed: {}", describe(&err));
        }
    }

    fn focus(&mut self) {
        let Some(field) = &self.field else {
            return;
        };
        if let Err(err) = field.focus() {
            wasm_warn!("focusing editor failed: {}", describe(&err));
        }
        let end = cursor_end(&field.value());
        if let Err(err) = field.set_selection_range(end, end) {
            wasm_warn!("placing cursor failed: {}", describe(&err));
        }
    }

    fn blur(&mut self) {
        if let Some(field) = &self.field {
            if let Err(err) = field.blur() {
                wasm_warn!("blurring editor failed: {}", describe(&err));
            }
        }
    }

    fn show_error(&mut self, message: &str) -> Result<()> {
        let markup = render_error(message)?;
        self.root
            .insert_adjacent_html("beforeend", &markup)
            .map_err(|err| host_error("showing error", err))?;
        self.error = self
            .root
            .query_selector(&format!(".{}", classes::ERROR))
            .map_err(|err| host_error("locating error", err))?;
        Ok(())
    }

    fn remove_error(&mut self) {
        if let Some(error) = self.error.take() {
            error.remove();
        }
    }
}
