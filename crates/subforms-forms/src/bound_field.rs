//! A form field joined with its submitted value and errors.
//!
//! [`BoundField`] is the rendering surface
//! [`BaseForm::bound_fields`](crate::form::BaseForm::bound_fields) hands
//! out: one per field, carrying the prefix-scoped HTML name, the raw
//! submitted value, any validation errors, and the widget to render with.

use std::collections::HashMap;

use crate::fields::FormFieldDef;
use crate::widgets::{self, Widget};

/// One field of a bound form, ready for rendering.
pub struct BoundField {
    /// The HTML `name` attribute, prefix included.
    pub html_name: String,
    /// Human-readable label.
    pub label: String,
    /// Whether the field must be submitted non-empty.
    pub required: bool,
    /// Whether the field is rendered but not editable.
    pub disabled: bool,
    /// The raw submitted value, if any.
    pub data: Option<String>,
    /// Validation error messages for this field.
    pub errors: Vec<String>,
    widget: Box<dyn Widget>,
}

impl BoundField {
    /// Builds the bound view of one field.
    ///
    /// The prefix, when present, is baked into the HTML name as
    /// `<prefix>-<field>`, matching how the form binds submitted data.
    pub fn new(
        field_def: &FormFieldDef,
        data: Option<String>,
        errors: Vec<String>,
        prefix: Option<&str>,
    ) -> Self {
        let html_name = prefix.map_or_else(
            || field_def.name.clone(),
            |p| format!("{p}-{}", field_def.name),
        );
        Self {
            html_name,
            label: field_def.label.clone(),
            required: field_def.required,
            disabled: field_def.disabled,
            data,
            errors,
            widget: widgets::create_widget(&field_def.widget),
        }
    }

    /// Renders the field's widget, with an auto-generated `id` and the
    /// `disabled` attribute applied where relevant.
    pub fn render(&self, extra_attrs: &HashMap<String, String>) -> String {
        let mut attrs = extra_attrs.clone();
        attrs
            .entry("id".to_string())
            .or_insert_with(|| self.auto_id());
        if self.disabled {
            attrs.insert("disabled".to_string(), "disabled".to_string());
        }
        self.widget.render(&self.html_name, &self.data, &attrs)
    }

    /// The auto-generated HTML `id` for this field.
    pub fn auto_id(&self) -> String {
        format!("id_{}", self.html_name)
    }

    /// Returns `true` if this field has validation errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
