//! Form field definitions and type-level validation.
//!
//! A [`FormFieldDef`] is the static description of one field; the
//! [`FormFieldType`] variant it carries decides how a raw submitted string
//! is coerced into a [`Value`] and which built-in checks run. The entry
//! point for both is [`clean_field_value`].
//!
//! The rule that an empty optional field cleans to its declared initial
//! value is what the hierarchical layer relies on: an activation flag that
//! was not submitted cleans to `Bool(false)` instead of `Null`.

use std::collections::HashMap;
use std::sync::LazyLock;

use subforms_core::Value;

use crate::widgets::WidgetType;

static EMAIL_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$").expect("valid regex")
});

static URL_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").expect("valid regex"));

static SLUG_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid regex"));

/// The type of a form field, with its type-specific parameters.
#[derive(Debug, Clone)]
pub enum FormFieldType {
    /// A text field.
    Char {
        /// Minimum length in characters.
        min_length: Option<usize>,
        /// Maximum length in characters.
        max_length: Option<usize>,
        /// Whether to trim surrounding whitespace before validating.
        strip: bool,
    },
    /// A whole-number field.
    Integer {
        /// Smallest accepted value.
        min_value: Option<i64>,
        /// Largest accepted value.
        max_value: Option<i64>,
    },
    /// A floating-point field.
    Float {
        /// Smallest accepted value.
        min_value: Option<f64>,
        /// Largest accepted value.
        max_value: Option<f64>,
    },
    /// A true/false field. Unrecognized input cleans to `false`.
    Boolean,
    /// A true/false/unknown field.
    NullBoolean,
    /// A `YYYY-MM-DD` date field.
    Date,
    /// An email address field.
    Email,
    /// An `http`/`https` URL field.
    Url,
    /// Letters, numbers, hyphens and underscores only.
    Slug,
    /// One value out of a fixed set.
    Choice {
        /// Accepted values as `(value, display_label)` pairs.
        choices: Vec<(String, String)>,
    },
}

/// Complete definition of a single form field.
#[derive(Debug, Clone)]
pub struct FormFieldDef {
    /// The field name (HTML name attribute, before prefixing).
    pub name: String,
    /// The field type, controlling parsing and coercion.
    pub field_type: FormFieldType,
    /// Whether this field must be submitted non-empty.
    pub required: bool,
    /// Default value, also used when an optional field is left empty.
    pub initial: Option<Value>,
    /// Help text displayed alongside the field.
    pub help_text: String,
    /// Human-readable label.
    pub label: String,
    /// The widget type used for rendering.
    pub widget: WidgetType,
    /// Custom error messages keyed by error code.
    pub error_messages: HashMap<String, String>,
    /// Whether the field is rendered but not editable.
    pub disabled: bool,
}

impl FormFieldDef {
    /// Creates a required field with the default widget for its type and a
    /// label derived from the name.
    pub fn new(name: impl Into<String>, field_type: FormFieldType) -> Self {
        let name = name.into();
        let widget = default_widget_for_field_type(&field_type);
        let label = name.replace('_', " ");
        Self {
            name,
            field_type,
            required: true,
            initial: None,
            help_text: String::new(),
            label,
            widget,
            error_messages: HashMap::new(),
            disabled: false,
        }
    }

    /// Sets whether this field is required.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the initial value.
    pub fn initial(mut self, value: Value) -> Self {
        self.initial = Some(value);
        self
    }

    /// Sets the help text.
    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = text.into();
        self
    }

    /// Sets the label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the widget type.
    pub fn widget(mut self, widget: WidgetType) -> Self {
        self.widget = widget;
        self
    }

    /// Sets a custom error message for a given code.
    pub fn error_message(mut self, code: impl Into<String>, msg: impl Into<String>) -> Self {
        self.error_messages.insert(code.into(), msg.into());
        self
    }

    /// Sets whether this field is disabled.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Returns the default widget type for a field type.
pub fn default_widget_for_field_type(field_type: &FormFieldType) -> WidgetType {
    match field_type {
        FormFieldType::Char { .. } | FormFieldType::Slug | FormFieldType::Url => {
            WidgetType::TextInput
        }
        FormFieldType::Integer { .. } | FormFieldType::Float { .. } => WidgetType::NumberInput,
        FormFieldType::Boolean => WidgetType::CheckboxInput,
        FormFieldType::NullBoolean | FormFieldType::Choice { .. } => WidgetType::Select,
        FormFieldType::Date => WidgetType::DateInput,
        FormFieldType::Email => WidgetType::EmailInput,
    }
}

/// Cleans (validates and coerces) a raw submitted string into a [`Value`].
///
/// Required fields reject empty input; optional empty fields clean to the
/// declared initial value (or `Null`). Everything else dispatches on the
/// field type.
pub fn clean_field_value(field: &FormFieldDef, raw: Option<&str>) -> Result<Value, Vec<String>> {
    let raw_str = raw.unwrap_or("");
    if raw_str.is_empty() {
        if field.required {
            let msg = field
                .error_messages
                .get("required")
                .cloned()
                .unwrap_or_else(|| "This field is required.".to_string());
            return Err(vec![msg]);
        }
        return Ok(field.initial.clone().unwrap_or(Value::Null));
    }

    match &field.field_type {
        FormFieldType::Char {
            min_length,
            max_length,
            strip,
        } => clean_char(raw_str, *min_length, *max_length, *strip),
        FormFieldType::Integer {
            min_value,
            max_value,
        } => clean_integer(raw_str, *min_value, *max_value),
        FormFieldType::Float {
            min_value,
            max_value,
        } => clean_float(raw_str, *min_value, *max_value),
        FormFieldType::Boolean => Ok(Value::Bool(is_true_input(raw_str))),
        FormFieldType::NullBoolean => clean_null_boolean(raw_str),
        FormFieldType::Date => clean_date(raw_str),
        FormFieldType::Email => clean_pattern(raw_str, &EMAIL_RE, "Enter a valid email address."),
        FormFieldType::Url => clean_pattern(raw_str, &URL_RE, "Enter a valid URL."),
        FormFieldType::Slug => clean_pattern(
            raw_str,
            &SLUG_RE,
            "Enter a valid \"slug\" consisting of letters, numbers, underscores or hyphens.",
        ),
        FormFieldType::Choice { choices } => clean_choice(raw_str, choices),
    }
}

fn is_true_input(raw: &str) -> bool {
    matches!(raw.to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

fn clean_char(
    raw: &str,
    min_length: Option<usize>,
    max_length: Option<usize>,
    strip: bool,
) -> Result<Value, Vec<String>> {
    let s = if strip { raw.trim() } else { raw };
    // Length limits count characters, not bytes.
    let count = s.chars().count();
    let mut errors = Vec::new();
    if let Some(min) = min_length {
        if count < min {
            errors.push(format!(
                "Ensure this value has at least {min} characters (it has {count})."
            ));
        }
    }
    if let Some(max) = max_length {
        if count > max {
            errors.push(format!(
                "Ensure this value has at most {max} characters (it has {count})."
            ));
        }
    }
    if errors.is_empty() {
        Ok(Value::String(s.to_string()))
    } else {
        Err(errors)
    }
}

fn clean_integer(
    raw: &str,
    min_value: Option<i64>,
    max_value: Option<i64>,
) -> Result<Value, Vec<String>> {
    let Ok(n) = raw.parse::<i64>() else {
        return Err(vec!["Enter a whole number.".to_string()]);
    };
    let mut errors = Vec::new();
    if let Some(min) = min_value {
        if n < min {
            errors.push(format!(
                "Ensure this value is greater than or equal to {min}."
            ));
        }
    }
    if let Some(max) = max_value {
        if n > max {
            errors.push(format!("Ensure this value is less than or equal to {max}."));
        }
    }
    if errors.is_empty() {
        Ok(Value::Int(n))
    } else {
        Err(errors)
    }
}

fn clean_float(
    raw: &str,
    min_value: Option<f64>,
    max_value: Option<f64>,
) -> Result<Value, Vec<String>> {
    let Ok(n) = raw.parse::<f64>() else {
        return Err(vec!["Enter a number.".to_string()]);
    };
    let mut errors = Vec::new();
    if let Some(min) = min_value {
        if n < min {
            errors.push(format!(
                "Ensure this value is greater than or equal to {min}."
            ));
        }
    }
    if let Some(max) = max_value {
        if n > max {
            errors.push(format!("Ensure this value is less than or equal to {max}."));
        }
    }
    if errors.is_empty() {
        Ok(Value::Float(n))
    } else {
        Err(errors)
    }
}

fn clean_null_boolean(raw: &str) -> Result<Value, Vec<String>> {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Value::Bool(true)),
        "false" | "0" | "no" | "off" => Ok(Value::Bool(false)),
        "null" | "none" | "unknown" => Ok(Value::Null),
        _ => Err(vec!["Select a valid choice.".to_string()]),
    }
}

fn clean_date(raw: &str) -> Result<Value, Vec<String>> {
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Value::Date)
        .map_err(|_| vec!["Enter a valid date (YYYY-MM-DD).".to_string()])
}

fn clean_pattern(raw: &str, pattern: &regex::Regex, message: &str) -> Result<Value, Vec<String>> {
    if pattern.is_match(raw) {
        Ok(Value::String(raw.to_string()))
    } else {
        Err(vec![message.to_string()])
    }
}

fn clean_choice(raw: &str, choices: &[(String, String)]) -> Result<Value, Vec<String>> {
    if choices.iter().any(|(v, _)| v == raw) {
        Ok(Value::String(raw.to_string()))
    } else {
        Err(vec![format!(
            "Select a valid choice. {raw} is not one of the available choices."
        )])
    }
}
