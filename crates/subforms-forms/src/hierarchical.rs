//! Nested form validation orchestration.
//!
//! A [`HierarchicalForm`] instantiates one form per node of a [`FormDef`]
//! tree. Each nested form is scoped to its own field-name prefix and its
//! own slice of the initial data, and the parent gains one hidden boolean
//! "activation" field per nested entry so a submission can record which
//! nested forms are in play.
//!
//! Validation runs in two phases and short-circuits across the tree: the
//! parent validates first, then only the activated nested forms, stopping
//! at the first failing form. On success the activation booleans in the
//! cleaned data are replaced by the nested forms' full cleaned data, which
//! produces exactly the tree shape
//! [`Mapper::apply_form_data`](crate::mapper::Mapper::apply_form_data)
//! consumes.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use subforms_core::value::FormData;
use subforms_core::{QueryDict, Value};

use crate::def::FormDef;
use crate::fields::{FormFieldDef, FormFieldType};
use crate::form::{BaseForm, Form};
use crate::widgets::WidgetType;

/// A form tree built from a [`FormDef`] hierarchy.
pub struct HierarchicalForm {
    def: Arc<FormDef>,
    parent: BaseForm,
    subform_instances: Vec<(String, HierarchicalForm)>,
    cleaned_data: FormData,
}

impl HierarchicalForm {
    /// Builds the form tree for a form description.
    ///
    /// One nested form per declared subform, in declaration order. The
    /// parent form gets a hidden, optional boolean activation field per
    /// nested entry, defaulting to `false`.
    pub fn new(def: Arc<FormDef>) -> Self {
        Self::build(def, None)
    }

    fn build(def: Arc<FormDef>, prefix: Option<String>) -> Self {
        let subform_instances: Vec<(String, Self)> = def
            .subforms()
            .iter()
            .map(|(sub_prefix, sub_def)| {
                (
                    sub_prefix.clone(),
                    Self::build(sub_def.clone(), Some(sub_prefix.clone())),
                )
            })
            .collect();

        let mut parent = BaseForm::new(def.fields.clone());
        if let Some(prefix) = prefix {
            parent = parent.with_prefix(prefix);
        }
        for (sub_prefix, _) in &subform_instances {
            parent.add_field(activation_field(sub_prefix));
        }

        Self {
            def,
            parent,
            subform_instances,
            cleaned_data: FormData::new(),
        }
    }

    /// Seeds initial data across the tree.
    ///
    /// Each `<prefix>-initial` entry is popped off the mapping and handed
    /// to the matching nested form (recursively); the remainder becomes the
    /// parent form's initial data. The popped entries never reach the
    /// parent, so a nested slice is applied exactly once.
    pub fn with_initial(mut self, initial: FormData) -> Self {
        self.set_initial(initial);
        self
    }

    /// Sets the parent form's field-name prefix.
    ///
    /// Nested forms keep their own declaration prefixes regardless.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.parent = self.parent.with_prefix(prefix);
        self
    }

    fn set_initial(&mut self, mut initial: FormData) {
        for (prefix, sub) in &mut self.subform_instances {
            if let Some(Value::Map(sub_initial)) = initial.remove(&format!("{prefix}-initial")) {
                sub.set_initial(sub_initial);
            }
        }
        self.parent.set_initial(initial);
    }

    /// Returns the form description this tree was built from.
    pub fn def(&self) -> &Arc<FormDef> {
        &self.def
    }

    /// Returns the parent form.
    pub fn base(&self) -> &BaseForm {
        &self.parent
    }

    /// Returns the nested forms, in declaration order.
    pub fn subforms(&self) -> &[(String, Self)] {
        &self.subform_instances
    }

    /// Returns the nested form under the given prefix, if declared.
    pub fn subform(&self, prefix: &str) -> Option<&Self> {
        self.subform_instances
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, sub)| sub)
    }

    /// Returns `true` if the parent form or any nested form currently
    /// holds errors. Does not re-run validation.
    pub fn any_errors(&self) -> bool {
        !self.parent.errors().is_empty()
            || self
                .subform_instances
                .iter()
                .any(|(_, sub)| sub.any_errors())
    }
}

fn activation_field(prefix: &str) -> FormFieldDef {
    FormFieldDef::new(prefix, FormFieldType::Boolean)
        .required(false)
        .initial(Value::Bool(false))
        .widget(WidgetType::HiddenInput)
}

#[async_trait]
impl Form for HierarchicalForm {
    fn fields(&self) -> &[FormFieldDef] {
        self.parent.fields()
    }

    fn initial(&self) -> &FormData {
        self.parent.initial()
    }

    fn prefix(&self) -> Option<&str> {
        self.parent.prefix()
    }

    fn bind(&mut self, data: &QueryDict) {
        self.cleaned_data.clear();
        self.parent.bind(data);
        for (_, sub) in &mut self.subform_instances {
            sub.bind(data);
        }
    }

    fn is_bound(&self) -> bool {
        self.parent.is_bound()
    }

    /// Two-phase validation over the form tree.
    ///
    /// Phase one validates the parent form; a failure stops here and no
    /// nested form runs. Phase two walks the nested forms in declaration
    /// order and validates each one whose activation flag cleaned truthy,
    /// stopping at the first failure. On full success each activation flag
    /// in the cleaned data is replaced with that nested form's cleaned
    /// data, recursively.
    async fn is_valid(&mut self) -> bool {
        self.cleaned_data.clear();

        if !self.parent.is_valid().await {
            debug!(form = self.def.name(), "parent form invalid");
            return false;
        }

        let mut cleaned = self.parent.cleaned_data().clone();
        for (prefix, sub) in &mut self.subform_instances {
            let active = cleaned.get(prefix.as_str()).is_some_and(Value::is_truthy);
            if !active {
                continue;
            }
            if !sub.is_valid().await {
                debug!(
                    form = self.def.name(),
                    prefix = prefix.as_str(),
                    "nested form invalid"
                );
                return false;
            }
            cleaned.insert(prefix.clone(), Value::Map(sub.cleaned_data().clone()));
        }

        self.cleaned_data = cleaned;
        true
    }

    fn errors(&self) -> &HashMap<String, Vec<String>> {
        self.parent.errors()
    }

    fn cleaned_data(&self) -> &FormData {
        &self.cleaned_data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::def::{ModelSource, ModelTarget};

    fn char_field(name: &str) -> FormFieldDef {
        FormFieldDef::new(
            name,
            FormFieldType::Char {
                min_length: None,
                max_length: None,
                strip: true,
            },
        )
    }

    fn item_def() -> Arc<FormDef> {
        let mapped = Arc::new(
            FormDef::new(
                "MappedSubForm",
                vec![
                    char_field("fake_field").required(false),
                    char_field("fake_title").required(false),
                ],
            )
            .with_model_to_form(ModelSource::attr("fake_field"), "fake_field")
            .with_form_to_model("fake_field", ModelTarget::attr("fake_field")),
        );
        let unmapped = Arc::new(FormDef::new(
            "UnmappedSubForm",
            vec![char_field("fake_field")],
        ));
        Arc::new(
            FormDef::new("ItemForm", vec![char_field("name")])
                .with_subform("test_mapping", mapped)
                .with_subform("test_no_mapping", unmapped),
        )
    }

    #[test]
    fn test_activation_fields_added() {
        let form = HierarchicalForm::new(item_def());
        let names: Vec<&str> = form.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["name", "test_mapping", "test_no_mapping"]);

        let flag = &form.fields()[1];
        assert!(!flag.required);
        assert_eq!(flag.initial, Some(Value::Bool(false)));
        assert_eq!(flag.widget, WidgetType::HiddenInput);
    }

    #[test]
    fn test_initial_slices_popped_to_subforms() {
        let mut mapped_initial = FormData::new();
        mapped_initial.insert(
            "fake_field".to_string(),
            Value::String("Something unexpected".into()),
        );
        let mut initial = FormData::new();
        initial.insert("name".to_string(), Value::String("Database".into()));
        initial.insert(
            "test_mapping-initial".to_string(),
            Value::Map(mapped_initial),
        );

        let form = HierarchicalForm::new(item_def()).with_initial(initial);

        assert_eq!(
            form.base().initial_for("name"),
            Some(&Value::String("Database".into()))
        );
        assert!(form.base().initial_for("test_mapping-initial").is_none());
        let sub = form.subform("test_mapping").unwrap();
        assert_eq!(
            sub.base().initial_for("fake_field"),
            Some(&Value::String("Something unexpected".into()))
        );
    }

    #[tokio::test]
    async fn test_inactive_subforms_not_validated() {
        // The nested forms' required fields are missing, but their
        // activation flags are off, so the submission is still valid.
        let mut form = HierarchicalForm::new(item_def());
        form.bind(&QueryDict::parse("name=Database"));

        assert!(form.is_valid().await);
        assert_eq!(
            form.cleaned_data().get("name"),
            Some(&Value::String("Database".into()))
        );
        assert_eq!(
            form.cleaned_data().get("test_mapping"),
            Some(&Value::Bool(false))
        );
        assert_eq!(
            form.cleaned_data().get("test_no_mapping"),
            Some(&Value::Bool(false))
        );
    }

    #[tokio::test]
    async fn test_active_subform_cleaned_data_merged() {
        let mut form = HierarchicalForm::new(item_def());
        form.bind(&QueryDict::parse(
            "name=Database&test_mapping=on&test_mapping-fake_field=Something+fake",
        ));

        assert!(form.is_valid().await);
        let Some(Value::Map(sub)) = form.cleaned_data().get("test_mapping") else {
            panic!("activation flag not replaced with nested cleaned data");
        };
        assert_eq!(
            sub.get("fake_field"),
            Some(&Value::String("Something fake".into()))
        );
        assert_eq!(sub.get("fake_title"), Some(&Value::Null));
        // The inactive entry keeps its boolean.
        assert_eq!(
            form.cleaned_data().get("test_no_mapping"),
            Some(&Value::Bool(false))
        );
    }

    #[tokio::test]
    async fn test_parent_failure_short_circuits() {
        let mut form = HierarchicalForm::new(item_def());
        // Parent's required "name" is missing; the activated nested form is
        // also invalid, but it must never run.
        form.bind(&QueryDict::parse("test_no_mapping=on"));

        assert!(!form.is_valid().await);
        assert!(form.errors().contains_key("name"));
        assert!(form
            .subform("test_no_mapping")
            .unwrap()
            .errors()
            .is_empty());
    }

    #[tokio::test]
    async fn test_active_subform_failure_fails_overall() {
        let mut form = HierarchicalForm::new(item_def());
        // UnmappedSubForm's fake_field is required and missing.
        form.bind(&QueryDict::parse("name=Database&test_no_mapping=on"));

        assert!(!form.is_valid().await);
        assert!(form.errors().is_empty());
        assert!(form
            .subform("test_no_mapping")
            .unwrap()
            .errors()
            .contains_key("fake_field"));
        assert!(form.any_errors());
    }

    #[tokio::test]
    async fn test_any_errors_without_revalidation() {
        let mut form = HierarchicalForm::new(item_def());
        assert!(!form.any_errors());

        form.bind(&QueryDict::parse("name=Database&test_no_mapping=on"));
        assert!(!form.is_valid().await);
        assert!(form.any_errors());

        form.bind(&QueryDict::parse(
            "name=Database&test_no_mapping=on&test_no_mapping-fake_field=ok",
        ));
        assert!(form.is_valid().await);
        assert!(!form.any_errors());
    }

    #[tokio::test]
    async fn test_two_levels_of_nesting() {
        let leaf = Arc::new(FormDef::new("Leaf", vec![char_field("deep")]));
        let middle = Arc::new(
            FormDef::new("Middle", vec![char_field("title").required(false)])
                .with_subform("leaf", leaf),
        );
        let root = Arc::new(FormDef::new("Root", vec![char_field("name")]).with_subform("mid", middle));

        let mut form = HierarchicalForm::new(root);
        form.bind(&QueryDict::parse(
            "name=Top&mid=on&mid-title=Hello&mid-leaf=on&leaf-deep=Bottom",
        ));

        assert!(form.is_valid().await);
        let Some(Value::Map(mid)) = form.cleaned_data().get("mid") else {
            panic!("missing middle cleaned data");
        };
        assert_eq!(mid.get("title"), Some(&Value::String("Hello".into())));
        let Some(Value::Map(leaf)) = mid.get("leaf") else {
            panic!("missing leaf cleaned data");
        };
        assert_eq!(leaf.get("deep"), Some(&Value::String("Bottom".into())));
    }

    #[tokio::test]
    async fn test_rebind_clears_merged_data() {
        let mut form = HierarchicalForm::new(item_def());
        form.bind(&QueryDict::parse(
            "name=Database&test_mapping=on&test_mapping-fake_field=x",
        ));
        assert!(form.is_valid().await);
        assert!(!form.cleaned_data().is_empty());

        form.bind(&QueryDict::parse("name=Other"));
        assert!(form.cleaned_data().is_empty());
        assert!(form.is_valid().await);
        assert_eq!(
            form.cleaned_data().get("test_mapping"),
            Some(&Value::Bool(false))
        );
    }
}
