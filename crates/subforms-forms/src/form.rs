//! The `Form` trait and its general-purpose implementation.
//!
//! [`Form`] is the contract the hierarchical layer composes over: binding
//! from a [`QueryDict`], async validation, and access to errors and cleaned
//! data. Validation is async so that a hosting application's cross-field
//! checks can do I/O (uniqueness lookups and the like) without blocking
//! hacks.
//!
//! [`BaseForm`] is the concrete implementation built from a list of field
//! definitions;
//! [`HierarchicalForm`](crate::hierarchical::HierarchicalForm) uses one per
//! node of a form tree.

use std::collections::HashMap;

use async_trait::async_trait;

use subforms_core::value::FormData;
use subforms_core::{QueryDict, Value};

use crate::bound_field::BoundField;
use crate::fields::FormFieldDef;
use crate::validation;

/// Binding, validation, and cleaned-data access for one form.
///
/// Implementations must be `Send + Sync`; validation futures cross task
/// boundaries in async hosts.
#[async_trait]
pub trait Form: Send + Sync {
    /// The form's field definitions.
    fn fields(&self) -> &[FormFieldDef];

    /// Initial (default) values for fields.
    fn initial(&self) -> &FormData;

    /// The field-name prefix, when this form is namespaced.
    fn prefix(&self) -> Option<&str>;

    /// Binds submitted data to this form.
    fn bind(&mut self, data: &QueryDict);

    /// Returns `true` once data has been bound.
    fn is_bound(&self) -> bool;

    /// Runs validation; afterwards [`errors`](Form::errors) and
    /// [`cleaned_data`](Form::cleaned_data) reflect the result.
    async fn is_valid(&mut self) -> bool;

    /// Per-field validation errors, keyed by field name.
    fn errors(&self) -> &HashMap<String, Vec<String>>;

    /// The coerced values of the last successful validation.
    fn cleaned_data(&self) -> &FormData;

    /// Cross-field validation hook; the default accepts everything.
    async fn clean(&self) -> Result<(), HashMap<String, Vec<String>>> {
        Ok(())
    }
}

/// A form built from a list of field definitions.
pub struct BaseForm {
    field_defs: Vec<FormFieldDef>,
    initial_data: FormData,
    prefix: Option<String>,
    bound: bool,
    raw_data: HashMap<String, Option<String>>,
    errors: HashMap<String, Vec<String>>,
    cleaned_data: FormData,
}

impl BaseForm {
    /// Creates an unbound form over the given fields.
    pub fn new(fields: Vec<FormFieldDef>) -> Self {
        Self {
            field_defs: fields,
            initial_data: FormData::new(),
            prefix: None,
            bound: false,
            raw_data: HashMap::new(),
            errors: HashMap::new(),
            cleaned_data: FormData::new(),
        }
    }

    /// Sets initial (default) values for fields.
    pub fn with_initial(mut self, initial: FormData) -> Self {
        self.initial_data = initial;
        self
    }

    /// Replaces the initial values in place.
    pub fn set_initial(&mut self, initial: FormData) {
        self.initial_data = initial;
    }

    /// Sets the field-name prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Appends a field definition.
    pub fn add_field(&mut self, field: FormFieldDef) {
        self.field_defs.push(field);
    }

    /// The initial value for a named field, if one was supplied.
    pub fn initial_for(&self, name: &str) -> Option<&Value> {
        self.initial_data.get(name)
    }

    /// The prefix-scoped HTML name for one of this form's fields.
    fn html_name(&self, field_name: &str) -> String {
        self.prefix.as_ref().map_or_else(
            || field_name.to_string(),
            |p| format!("{p}-{field_name}"),
        )
    }

    /// One [`BoundField`] per field, for rendering.
    pub fn bound_fields(&self) -> Vec<BoundField> {
        self.field_defs
            .iter()
            .map(|field| {
                let data = self.raw_data.get(&field.name).cloned().flatten();
                let errors = self.errors.get(&field.name).cloned().unwrap_or_default();
                BoundField::new(field, data, errors, self.prefix.as_deref())
            })
            .collect()
    }
}

#[async_trait]
impl Form for BaseForm {
    fn fields(&self) -> &[FormFieldDef] {
        &self.field_defs
    }

    fn initial(&self) -> &FormData {
        &self.initial_data
    }

    fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Pulls each field's raw value out of the submitted data by its
    /// prefix-scoped name. Rebinding discards previous validation state.
    fn bind(&mut self, data: &QueryDict) {
        self.bound = true;
        self.errors.clear();
        self.cleaned_data.clear();
        self.raw_data = self
            .field_defs
            .iter()
            .map(|field| {
                let value = data.get(&self.html_name(&field.name)).map(String::from);
                (field.name.clone(), value)
            })
            .collect();
    }

    fn is_bound(&self) -> bool {
        self.bound
    }

    /// Field-level cleaning first, then the form-level [`clean`](Form::clean)
    /// hook. Within one form, errors accumulate rather than short-circuit.
    async fn is_valid(&mut self) -> bool {
        if !self.bound {
            return false;
        }

        self.errors.clear();
        self.cleaned_data.clear();

        validation::clean_fields(
            &self.field_defs,
            &self.raw_data,
            &mut self.cleaned_data,
            &mut self.errors,
        );

        if let Err(form_errors) = self.clean().await {
            for (key, msgs) in form_errors {
                self.errors.entry(key).or_default().extend(msgs);
            }
        }

        self.errors.is_empty()
    }

    fn errors(&self) -> &HashMap<String, Vec<String>> {
        &self.errors
    }

    fn cleaned_data(&self) -> &FormData {
        &self.cleaned_data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FormFieldType;

    fn make_test_form() -> BaseForm {
        BaseForm::new(vec![
            FormFieldDef::new(
                "username",
                FormFieldType::Char {
                    min_length: Some(3),
                    max_length: Some(20),
                    strip: true,
                },
            ),
            FormFieldDef::new("email", FormFieldType::Email),
            FormFieldDef::new(
                "age",
                FormFieldType::Integer {
                    min_value: Some(0),
                    max_value: Some(150),
                },
            )
            .required(false),
        ])
    }

    #[tokio::test]
    async fn test_form_unbound() {
        let mut form = make_test_form();
        assert!(!form.is_bound());
        assert!(!form.is_valid().await);
    }

    #[tokio::test]
    async fn test_form_bind_and_validate() {
        let mut form = make_test_form();
        let qd = QueryDict::parse("username=alice&email=alice@example.com&age=30");
        form.bind(&qd);
        assert!(form.is_bound());
        assert!(form.is_valid().await);
        assert_eq!(
            form.cleaned_data().get("username"),
            Some(&Value::String("alice".to_string()))
        );
        assert_eq!(form.cleaned_data().get("age"), Some(&Value::Int(30)));
    }

    #[tokio::test]
    async fn test_form_validation_errors() {
        let mut form = make_test_form();
        let qd = QueryDict::parse("username=ab&email=not-email");
        form.bind(&qd);
        assert!(!form.is_valid().await);
        assert!(form.errors().contains_key("username"));
        assert!(form.errors().contains_key("email"));
    }

    #[tokio::test]
    async fn test_form_with_prefix() {
        let mut form = make_test_form().with_prefix("myform");
        assert_eq!(form.prefix(), Some("myform"));
        let qd = QueryDict::parse(
            "myform-username=alice&myform-email=alice@example.com&myform-age=25",
        );
        form.bind(&qd);
        assert!(form.is_valid().await);
    }

    #[tokio::test]
    async fn test_form_with_initial() {
        let mut initial = FormData::new();
        initial.insert("username".to_string(), Value::String("default_user".into()));
        let form = make_test_form().with_initial(initial);
        assert_eq!(
            form.initial_for("username"),
            Some(&Value::String("default_user".into()))
        );
    }

    #[tokio::test]
    async fn test_form_rebind_clears_state() {
        let mut form = make_test_form();
        let qd1 = QueryDict::parse("username=ab");
        form.bind(&qd1);
        assert!(!form.is_valid().await);
        assert!(!form.errors().is_empty());

        let qd2 = QueryDict::parse("username=alice&email=alice@example.com");
        form.bind(&qd2);
        assert!(form.is_valid().await);
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_form_bound_fields() {
        let mut form = make_test_form();
        let qd = QueryDict::parse("username=alice&email=test@test.com");
        form.bind(&qd);
        let bfs = form.bound_fields();
        assert_eq!(bfs.len(), 3);
        assert_eq!(bfs[0].html_name, "username");
        assert_eq!(bfs[0].data, Some("alice".to_string()));
    }

    #[test]
    fn test_add_field() {
        let mut form = make_test_form();
        form.add_field(FormFieldDef::new("extra", FormFieldType::Boolean).required(false));
        assert_eq!(form.fields().len(), 4);
        assert_eq!(form.fields()[3].name, "extra");
    }
}
