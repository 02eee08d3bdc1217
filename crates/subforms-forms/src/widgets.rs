//! HTML rendering for form fields.
//!
//! Each field definition names a [`WidgetType`]; [`create_widget`] turns
//! that into a boxed [`Widget`] that knows how to render itself. Most
//! widgets are `<input>` variants sharing one renderer; `<textarea>`,
//! `<select>` and checkboxes have their own markup.
//!
//! The hierarchical layer renders its per-subform activation flags as
//! [`HiddenInput`]s.

use std::collections::HashMap;
use std::fmt;

/// The built-in widget kinds a field can ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetType {
    /// `<input type="text">`.
    TextInput,
    /// `<input type="number">`.
    NumberInput,
    /// `<input type="email">`.
    EmailInput,
    /// `<input type="hidden">`.
    HiddenInput,
    /// `<textarea>`.
    Textarea,
    /// `<input type="checkbox">`.
    CheckboxInput,
    /// `<select>`.
    Select,
    /// `<input type="date">`.
    DateInput,
}

/// Renders one form field as HTML.
pub trait Widget: Send + Sync + fmt::Debug {
    /// The [`WidgetType`] this widget implements.
    fn widget_type(&self) -> WidgetType;

    /// Renders the element for the given HTML name, current value, and
    /// extra attributes.
    fn render(&self, name: &str, value: &Option<String>, attrs: &HashMap<String, String>)
        -> String;
}

/// Renders an attribute map as ` key="value"` pairs, sorted for
/// deterministic output.
fn render_attrs(attrs: &HashMap<String, String>) -> String {
    let mut pairs: Vec<(&String, &String)> = attrs.iter().collect();
    pairs.sort();
    pairs
        .iter()
        .map(|(k, v)| format!(r#" {k}="{v}""#))
        .collect()
}

/// Shared renderer for the `<input type="...">` family.
fn input_html(
    input_type: &str,
    name: &str,
    value: &Option<String>,
    attrs: &HashMap<String, String>,
) -> String {
    let val = value.as_deref().unwrap_or("");
    format!(
        r#"<input type="{input_type}" name="{name}" value="{val}"{} />"#,
        render_attrs(attrs)
    )
}

macro_rules! input_widget {
    ($(#[$doc:meta])* $widget:ident, $variant:ident, $html_type:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $widget;

        impl Widget for $widget {
            fn widget_type(&self) -> WidgetType {
                WidgetType::$variant
            }

            fn render(
                &self,
                name: &str,
                value: &Option<String>,
                attrs: &HashMap<String, String>,
            ) -> String {
                input_html($html_type, name, value, attrs)
            }
        }
    };
}

input_widget!(
    /// A plain text input.
    TextInput,
    TextInput,
    "text"
);
input_widget!(
    /// A numeric input.
    NumberInput,
    NumberInput,
    "number"
);
input_widget!(
    /// An email input.
    EmailInput,
    EmailInput,
    "email"
);
input_widget!(
    /// A hidden input; what activation flags render as.
    HiddenInput,
    HiddenInput,
    "hidden"
);
input_widget!(
    /// A date input.
    DateInput,
    DateInput,
    "date"
);

/// A multi-line text area.
#[derive(Debug, Clone)]
pub struct Textarea;

impl Widget for Textarea {
    fn widget_type(&self) -> WidgetType {
        WidgetType::Textarea
    }

    fn render(
        &self,
        name: &str,
        value: &Option<String>,
        attrs: &HashMap<String, String>,
    ) -> String {
        let val = value.as_deref().unwrap_or("");
        format!(
            r#"<textarea name="{name}"{}>{val}</textarea>"#,
            render_attrs(attrs)
        )
    }
}

/// A checkbox; checked when the current value reads as true.
#[derive(Debug, Clone)]
pub struct CheckboxInput;

impl Widget for CheckboxInput {
    fn widget_type(&self) -> WidgetType {
        WidgetType::CheckboxInput
    }

    fn render(
        &self,
        name: &str,
        value: &Option<String>,
        attrs: &HashMap<String, String>,
    ) -> String {
        let checked = match value.as_deref() {
            Some("true" | "1" | "yes" | "on") => " checked",
            _ => "",
        };
        format!(
            r#"<input type="checkbox" name="{name}"{checked}{} />"#,
            render_attrs(attrs)
        )
    }
}

/// A dropdown with a fixed option list.
#[derive(Debug, Clone)]
pub struct Select {
    /// Options as `(value, display_label)` pairs.
    pub choices: Vec<(String, String)>,
}

impl Widget for Select {
    fn widget_type(&self) -> WidgetType {
        WidgetType::Select
    }

    fn render(
        &self,
        name: &str,
        value: &Option<String>,
        attrs: &HashMap<String, String>,
    ) -> String {
        let options: String = self
            .choices
            .iter()
            .map(|(val, label)| {
                let selected = if Some(val.as_str()) == value.as_deref() {
                    " selected"
                } else {
                    ""
                };
                format!(r#"<option value="{val}"{selected}>{label}</option>"#)
            })
            .collect();
        format!(
            r#"<select name="{name}"{}>{options}</select>"#,
            render_attrs(attrs)
        )
    }
}

/// Instantiates the widget implementation for a [`WidgetType`].
///
/// `Select` widgets start with an empty option list; callers that know the
/// choices fill them in themselves.
pub fn create_widget(widget_type: &WidgetType) -> Box<dyn Widget> {
    match widget_type {
        WidgetType::TextInput => Box::new(TextInput),
        WidgetType::NumberInput => Box::new(NumberInput),
        WidgetType::EmailInput => Box::new(EmailInput),
        WidgetType::HiddenInput => Box::new(HiddenInput),
        WidgetType::Textarea => Box::new(Textarea),
        WidgetType::CheckboxInput => Box::new(CheckboxInput),
        WidgetType::Select => Box::new(Select { choices: vec![] }),
        WidgetType::DateInput => Box::new(DateInput),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_input_render() {
        let html = TextInput.render("username", &Some("alice".to_string()), &HashMap::new());
        assert_eq!(html, r#"<input type="text" name="username" value="alice" />"#);
    }

    #[test]
    fn test_render_attrs_sorted() {
        let mut attrs = HashMap::new();
        attrs.insert("id".to_string(), "id_x".to_string());
        attrs.insert("class".to_string(), "wide".to_string());
        let html = TextInput.render("x", &None, &attrs);
        assert!(html.contains(r#" class="wide" id="id_x""#));
    }

    #[test]
    fn test_hidden_input_render() {
        let html = HiddenInput.render("test_mapping", &Some("true".to_string()), &HashMap::new());
        assert_eq!(
            html,
            r#"<input type="hidden" name="test_mapping" value="true" />"#
        );
    }

    #[test]
    fn test_checkbox_checked_states() {
        let html = CheckboxInput.render("flag", &Some("true".to_string()), &HashMap::new());
        assert!(html.contains(" checked"));
        let html = CheckboxInput.render("flag", &None, &HashMap::new());
        assert!(!html.contains(" checked"));
    }

    #[test]
    fn test_select_render() {
        let w = Select {
            choices: vec![
                ("a".to_string(), "Alpha".to_string()),
                ("b".to_string(), "Beta".to_string()),
            ],
        };
        let html = w.render("letter", &Some("b".to_string()), &HashMap::new());
        assert!(html.contains(r#"<option value="a">Alpha</option>"#));
        assert!(html.contains(r#"<option value="b" selected>Beta</option>"#));
    }

    #[test]
    fn test_textarea_render() {
        let html = Textarea.render("bio", &Some("Hello".to_string()), &HashMap::new());
        assert_eq!(html, r#"<textarea name="bio">Hello</textarea>"#);
    }

    #[test]
    fn test_create_widget_dispatch() {
        assert_eq!(
            create_widget(&WidgetType::HiddenInput).widget_type(),
            WidgetType::HiddenInput
        );
        assert_eq!(
            create_widget(&WidgetType::Select).widget_type(),
            WidgetType::Select
        );
    }
}
