//! Bidirectional mapping between model objects and form data.
//!
//! A [`Mapper`] is a tree of mapping nodes mirroring a [`FormDef`]
//! hierarchy, one node per form. Each node moves values in two directions:
//!
//! - **read**: pull initial values out of a model object (and, via instance
//!   resolvers, out of related objects) into a form-data tree, with each
//!   nested form's slice stored under `<prefix>-initial`;
//! - **write**: apply a cleaned-data tree back onto the model object(s),
//!   collecting every touched instance into a list the caller persists.
//!
//! The mapper itself never persists anything.

use tracing::{debug, trace};

use std::sync::Arc;

use subforms_core::value::FormData;
use subforms_core::Value;

use crate::def::{FormDef, ModelSource, ModelTarget};
use crate::model::{lock_model, ModelHandle};

/// A recursive mapping node built from a form description.
#[derive(Debug)]
pub struct Mapper {
    def: Arc<FormDef>,
    sub_maps: Vec<(String, Mapper)>,
}

impl Mapper {
    /// Builds the mapping tree for a form description, one child node per
    /// declared subform, in declaration order.
    pub fn new(def: Arc<FormDef>) -> Self {
        let sub_maps = def
            .subforms()
            .iter()
            .map(|(prefix, sub_def)| (prefix.clone(), Self::new(sub_def.clone())))
            .collect();
        Self { def, sub_maps }
    }

    /// Returns the form description this node was built from.
    pub fn def(&self) -> &Arc<FormDef> {
        &self.def
    }

    /// Returns the child mapping nodes, in declaration order.
    pub fn sub_maps(&self) -> &[(String, Self)] {
        &self.sub_maps
    }

    /// Reads initial form data out of a model object tree.
    ///
    /// Declared `model_to_form` pairs fill top-level keys; each subform's
    /// recursive result lands under `<prefix>-initial`. A missing model
    /// attribute reads as [`Value::Null`] rather than an error. The model
    /// side is never mutated on this path.
    pub fn get_form_data(&self, instance: &ModelHandle) -> FormData {
        let span = subforms_core::logging::form_span(self.def.name());
        let _guard = span.enter();

        let mut form_data = FormData::new();
        self.get_form_data_into(instance, &mut form_data);
        form_data
    }

    /// Reads initial form data into a pre-seeded mapping.
    ///
    /// A node with no read mappings and no children leaves the mapping
    /// untouched, so pre-seeded entries survive pass-through nodes.
    pub fn get_form_data_into(&self, instance: &ModelHandle, form_data: &mut FormData) {
        trace!(form = self.def.name(), "reading model into form data");

        for (source, form_field) in self.def.model_to_form() {
            let value = match source {
                ModelSource::Attr(name) => {
                    lock_model(instance).get_attr(name).unwrap_or(Value::Null)
                }
                ModelSource::Getter(getter) => {
                    let guard = lock_model(instance);
                    getter(&*guard)
                }
            };
            form_data.insert(form_field.clone(), value);
        }

        for (prefix, sub_map) in &self.sub_maps {
            let inst = self.instance_for(prefix, instance);
            let mut sub_data = FormData::new();
            sub_map.get_form_data_into(&inst, &mut sub_data);
            form_data.insert(format!("{prefix}-initial"), Value::Map(sub_data));
        }
    }

    /// Applies a cleaned-data tree back onto the model side.
    ///
    /// Returns every instance touched: the root first, then each
    /// resolver-produced instance in declaration order. The same handle may
    /// appear more than once; entries are never merged or deduplicated, so
    /// two resolvers yielding the same related object produce two list
    /// entries each carrying its own writes. Nothing is persisted.
    ///
    /// A nested entry whose value is absent, [`Value::Null`],
    /// `Value::Bool(false)`, or not a map is skipped entirely: its resolver
    /// is not called and it contributes no instances. This is how an
    /// unactivated nested form stays untouched.
    pub fn apply_form_data(&self, form_data: &FormData, instance: &ModelHandle) -> Vec<ModelHandle> {
        let span = subforms_core::logging::form_span(self.def.name());
        let _guard = span.enter();

        let mut instances = vec![instance.clone()];
        self.apply_node(form_data, instance, &mut instances);
        debug!(
            form = self.def.name(),
            instances = instances.len(),
            "applied form data"
        );
        instances
    }

    fn apply_node(
        &self,
        form_data: &FormData,
        instance: &ModelHandle,
        instances: &mut Vec<ModelHandle>,
    ) {
        for (form_field, target) in self.def.form_to_model() {
            let value = form_data.get(form_field).cloned().unwrap_or(Value::Null);
            match target {
                ModelTarget::Attr(name) => {
                    lock_model(instance).set_attr(name, value);
                }
                ModelTarget::Setter(setter) => {
                    let mut guard = lock_model(instance);
                    setter(&mut *guard, value);
                }
            }
        }

        for (prefix, sub_map) in &self.sub_maps {
            let Some(Value::Map(sub_data)) = form_data.get(prefix) else {
                trace!(
                    form = self.def.name(),
                    prefix = prefix.as_str(),
                    "nested entry inactive, skipped"
                );
                continue;
            };

            let inst = self.instance_for(prefix, instance);
            if self.def.resolver_for(prefix).is_some() {
                instances.push(inst.clone());
            }
            sub_map.apply_node(sub_data, &inst, instances);
        }
    }

    fn instance_for(&self, prefix: &str, instance: &ModelHandle) -> ModelHandle {
        match self.def.resolver_for(prefix) {
            Some(resolver) => resolver(instance),
            None => instance.clone(),
        }
    }
}
