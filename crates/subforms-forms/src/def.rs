//! Declarative form descriptions.
//!
//! A [`FormDef`] is the static description both halves of the library walk:
//! [`HierarchicalForm`](crate::hierarchical::HierarchicalForm) instantiates
//! one form per node for validation, and [`Mapper`](crate::mapper::Mapper)
//! builds one mapping node per node for model/form data flow.
//!
//! The description carries three optional declarations alongside the field
//! list: `subforms` (ordered nested form entries under prefixes),
//! `model_to_form` (how to pull initial values out of a model object), and
//! `form_to_model` (how to apply cleaned values back). Instance resolvers
//! are registered explicitly per subform prefix rather than discovered by
//! naming convention.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use subforms_core::{SubformsError, SubformsResult, Value};

use crate::fields::FormFieldDef;
use crate::model::{ModelHandle, ModelObject};

/// A function computing a form value from a model object.
pub type AttrGetter = Arc<dyn Fn(&dyn ModelObject) -> Value + Send + Sync>;

/// A function applying a form value to a model object.
///
/// The setter is responsible for mutating whatever state it wants; the
/// mapper does not touch the model for setter-style targets.
pub type AttrSetter = Arc<dyn Fn(&mut dyn ModelObject, Value) + Send + Sync>;

/// A function redirecting a nested mapping from the parent model instance
/// to a different (usually related) model instance.
pub type InstanceResolver = Arc<dyn Fn(&ModelHandle) -> ModelHandle + Send + Sync>;

/// Where a form field's initial value comes from on the model side.
#[derive(Clone)]
pub enum ModelSource {
    /// Read the named attribute off the model object.
    Attr(String),
    /// Call the function with the model object and use its return value.
    Getter(AttrGetter),
}

impl ModelSource {
    /// Source that reads a named attribute.
    pub fn attr(name: impl Into<String>) -> Self {
        Self::Attr(name.into())
    }

    /// Source that computes the value with a function.
    pub fn getter(f: impl Fn(&dyn ModelObject) -> Value + Send + Sync + 'static) -> Self {
        Self::Getter(Arc::new(f))
    }
}

impl fmt::Debug for ModelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attr(name) => f.debug_tuple("Attr").field(name).finish(),
            Self::Getter(_) => f.write_str("Getter(..)"),
        }
    }
}

/// Where a cleaned form value goes on the model side.
#[derive(Clone)]
pub enum ModelTarget {
    /// Set the named attribute on the model object.
    Attr(String),
    /// Call the function with the model object and the value.
    Setter(AttrSetter),
}

impl ModelTarget {
    /// Target that sets a named attribute.
    pub fn attr(name: impl Into<String>) -> Self {
        Self::Attr(name.into())
    }

    /// Target that applies the value with a function.
    pub fn setter(f: impl Fn(&mut dyn ModelObject, Value) + Send + Sync + 'static) -> Self {
        Self::Setter(Arc::new(f))
    }
}

impl fmt::Debug for ModelTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attr(name) => f.debug_tuple("Attr").field(name).finish(),
            Self::Setter(_) => f.write_str("Setter(..)"),
        }
    }
}

/// The declarative description of one form in a hierarchy.
///
/// Built once (typically at startup) and shared via `Arc` between the
/// validation and mapping layers.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use subforms_forms::def::{FormDef, ModelSource, ModelTarget};
/// use subforms_forms::fields::{FormFieldDef, FormFieldType};
///
/// let address = Arc::new(
///     FormDef::new("AddressForm", vec![
///         FormFieldDef::new("city", FormFieldType::Char {
///             min_length: None, max_length: None, strip: true,
///         }).required(false),
///     ])
///     .with_model_to_form(ModelSource::attr("city"), "city")
///     .with_form_to_model("city", ModelTarget::attr("city")),
/// );
///
/// let person = FormDef::new("PersonForm", vec![])
///     .with_subform("address", address);
/// assert_eq!(person.subforms().len(), 1);
/// ```
pub struct FormDef {
    name: String,
    /// The form's own field definitions.
    pub fields: Vec<FormFieldDef>,
    subforms: Vec<(String, Arc<FormDef>)>,
    model_to_form: Vec<(ModelSource, String)>,
    form_to_model: Vec<(String, ModelTarget)>,
    resolvers: HashMap<String, InstanceResolver>,
}

impl FormDef {
    /// Creates a new form description with the given name and fields.
    ///
    /// The name only appears in diagnostics and logging.
    pub fn new(name: impl Into<String>, fields: Vec<FormFieldDef>) -> Self {
        Self {
            name: name.into(),
            fields,
            subforms: Vec::new(),
            model_to_form: Vec::new(),
            form_to_model: Vec::new(),
            resolvers: HashMap::new(),
        }
    }

    /// Declares a nested form under the given prefix.
    ///
    /// Declaration order is preserved everywhere the hierarchy is walked.
    pub fn with_subform(mut self, prefix: impl Into<String>, def: Arc<Self>) -> Self {
        self.subforms.push((prefix.into(), def));
        self
    }

    /// Declares a read mapping: pull a value from the model side and store
    /// it under `form_field` in the initial form data.
    pub fn with_model_to_form(mut self, source: ModelSource, form_field: impl Into<String>) -> Self {
        self.model_to_form.push((source, form_field.into()));
        self
    }

    /// Declares a write mapping: take the cleaned value of `form_field` and
    /// apply it to the model side.
    pub fn with_form_to_model(mut self, form_field: impl Into<String>, target: ModelTarget) -> Self {
        self.form_to_model.push((form_field.into(), target));
        self
    }

    /// Registers an instance resolver for the subform under `prefix`.
    ///
    /// When the mapper descends into that subform it calls the resolver
    /// with the current model handle and continues on the handle returned,
    /// which is how nested forms reach related objects.
    pub fn with_resolver(
        mut self,
        prefix: impl Into<String>,
        resolver: impl Fn(&ModelHandle) -> ModelHandle + Send + Sync + 'static,
    ) -> Self {
        self.resolvers.insert(prefix.into(), Arc::new(resolver));
        self
    }

    /// Returns the form's diagnostic name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared nested forms, in declaration order.
    pub fn subforms(&self) -> &[(String, Arc<Self>)] {
        &self.subforms
    }

    /// Returns the declared read mappings, in declaration order.
    pub fn model_to_form(&self) -> &[(ModelSource, String)] {
        &self.model_to_form
    }

    /// Returns the declared write mappings, in declaration order.
    pub fn form_to_model(&self) -> &[(String, ModelTarget)] {
        &self.form_to_model
    }

    /// Returns the resolver registered for a subform prefix, if any.
    pub fn resolver_for(&self, prefix: &str) -> Option<&InstanceResolver> {
        self.resolvers.get(prefix)
    }

    /// Checks this description (and every nested one) for internal
    /// consistency.
    ///
    /// # Errors
    ///
    /// Returns [`SubformsError::ImproperlyConfigured`] if two subforms share
    /// a prefix, or a resolver is registered for a prefix no subform
    /// declares.
    pub fn check(&self) -> SubformsResult<()> {
        let mut seen = std::collections::HashSet::new();
        for (prefix, sub_def) in &self.subforms {
            if !seen.insert(prefix.as_str()) {
                return Err(SubformsError::ImproperlyConfigured(format!(
                    "{}: duplicate subform prefix '{prefix}'",
                    self.name
                )));
            }
            sub_def.check()?;
        }
        for prefix in self.resolvers.keys() {
            if !seen.contains(prefix.as_str()) {
                return Err(SubformsError::ImproperlyConfigured(format!(
                    "{}: resolver registered for unknown subform prefix '{prefix}'",
                    self.name
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for FormDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormDef")
            .field("name", &self.name)
            .field("fields", &self.fields.len())
            .field("subforms", &self.subforms.iter().map(|(p, _)| p).collect::<Vec<_>>())
            .field("model_to_form", &self.model_to_form)
            .field("form_to_model", &self.form_to_model)
            .finish_non_exhaustive()
    }
}
