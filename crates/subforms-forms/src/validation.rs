//! Validation pipeline for form processing.
//!
//! The pipeline runs in two steps:
//! 1. Field-level validation (type coercion + per-field checks)
//! 2. Form-level cross-field validation (async, may hit a database)
//!
//! Within one form, errors accumulate rather than short-circuiting, so all
//! of a form's issues are reported at once. Across a *tree* of forms the
//! hierarchical layer short-circuits instead; see
//! [`HierarchicalForm`](crate::hierarchical::HierarchicalForm).

use std::collections::HashMap;

use subforms_core::value::FormData;

use crate::fields::{clean_field_value, FormFieldDef};
use crate::form::Form;

/// Performs field-level validation for all fields.
///
/// For each field definition:
/// 1. Extracts the raw value from the data map
/// 2. Runs [`clean_field_value`] for type coercion and field-level validation
/// 3. Populates `cleaned_data` on success or `errors` on failure
///
/// Errors accumulate across all fields (no short-circuiting).
pub fn clean_fields(
    field_defs: &[FormFieldDef],
    raw_data: &HashMap<String, Option<String>>,
    cleaned_data: &mut FormData,
    errors: &mut HashMap<String, Vec<String>>,
) {
    for field in field_defs {
        if field.disabled {
            // Disabled fields use their initial value and skip validation
            if let Some(initial) = &field.initial {
                cleaned_data.insert(field.name.clone(), initial.clone());
            }
            continue;
        }

        let raw = raw_data.get(&field.name).and_then(|v| v.as_deref());

        match clean_field_value(field, raw) {
            Ok(value) => {
                cleaned_data.insert(field.name.clone(), value);
            }
            Err(field_errors) => {
                errors.insert(field.name.clone(), field_errors);
            }
        }
    }
}

/// Runs the full validation pipeline and returns structured error data.
///
/// This is an alternative entry point to `form.is_valid()` for callers that
/// want the errors as a list rather than checking the form afterwards.
///
/// # Returns
///
/// - `Ok(())` if all validation passes
/// - `Err(errors)` with a list of `(field_name, error_messages)` tuples
pub async fn full_clean(form: &mut dyn Form) -> Result<(), Vec<(String, Vec<String>)>> {
    if form.is_valid().await {
        Ok(())
    } else {
        let errors: Vec<(String, Vec<String>)> = form
            .errors()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FormFieldType;
    use crate::form::BaseForm;
    use subforms_core::{QueryDict, Value};

    #[test]
    fn test_clean_fields_accumulates_errors() {
        let fields = vec![
            FormFieldDef::new(
                "a",
                FormFieldType::Integer {
                    min_value: None,
                    max_value: None,
                },
            ),
            FormFieldDef::new(
                "b",
                FormFieldType::Integer {
                    min_value: None,
                    max_value: None,
                },
            ),
        ];
        let mut raw = HashMap::new();
        raw.insert("a".to_string(), Some("nope".to_string()));
        raw.insert("b".to_string(), Some("also nope".to_string()));

        let mut cleaned = FormData::new();
        let mut errors = HashMap::new();
        clean_fields(&fields, &raw, &mut cleaned, &mut errors);

        assert!(errors.contains_key("a"));
        assert!(errors.contains_key("b"));
        assert!(cleaned.is_empty());
    }

    #[test]
    fn test_clean_fields_disabled_uses_initial() {
        let fields = vec![FormFieldDef::new(
            "locked",
            FormFieldType::Char {
                min_length: None,
                max_length: None,
                strip: false,
            },
        )
        .disabled(true)
        .initial(Value::String("fixed".to_string()))];
        let mut raw = HashMap::new();
        raw.insert("locked".to_string(), Some("attacker".to_string()));

        let mut cleaned = FormData::new();
        let mut errors = HashMap::new();
        clean_fields(&fields, &raw, &mut cleaned, &mut errors);

        assert_eq!(
            cleaned.get("locked"),
            Some(&Value::String("fixed".to_string()))
        );
        assert!(errors.is_empty());
    }

    #[tokio::test]
    async fn test_full_clean_ok() {
        let mut form = BaseForm::new(vec![FormFieldDef::new(
            "name",
            FormFieldType::Char {
                min_length: None,
                max_length: None,
                strip: true,
            },
        )]);
        form.bind(&QueryDict::parse("name=ok"));
        assert!(full_clean(&mut form).await.is_ok());
    }

    #[tokio::test]
    async fn test_full_clean_reports_errors() {
        let mut form = BaseForm::new(vec![FormFieldDef::new(
            "name",
            FormFieldType::Char {
                min_length: None,
                max_length: None,
                strip: true,
            },
        )]);
        form.bind(&QueryDict::parse(""));
        let err = full_clean(&mut form).await.unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err[0].0, "name");
    }
}
