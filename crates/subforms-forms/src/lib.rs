//! # subforms-forms
//!
//! A forms layer with first-class support for *hierarchical* forms: a parent
//! form that embeds nested forms under named prefixes, validates them
//! conditionally on hidden activation flags, and merges their cleaned data
//! into a single tree.
//!
//! The companion [`Mapper`](mapper::Mapper) walks the same declarative form
//! description ([`FormDef`](def::FormDef)) to move data between model
//! objects and forms in both directions: pull initial values out of a model
//! tree, and apply cleaned form data back onto (possibly several) model
//! objects without persisting them.
//!
//! ## Modules
//!
//! - [`widgets`] - HTML widget rendering
//! - [`fields`] - Form field definitions and type-level validation
//! - [`form`] - The async [`Form`](form::Form) trait and [`BaseForm`](form::BaseForm)
//! - [`bound_field`] - Field + data + errors bundles for rendering
//! - [`validation`] - The field-level validation pipeline
//! - [`model`] - The [`ModelObject`](model::ModelObject) abstraction
//! - [`def`] - Declarative form descriptions
//! - [`hierarchical`] - Nested form validation orchestration
//! - [`mapper`] - Bidirectional model/form data mapping

pub mod bound_field;
pub mod def;
pub mod fields;
pub mod form;
pub mod hierarchical;
pub mod mapper;
pub mod model;
pub mod validation;
pub mod widgets;

// Re-export the most commonly used types at the crate root.
pub use def::{FormDef, ModelSource, ModelTarget};
pub use form::{BaseForm, Form};
pub use hierarchical::HierarchicalForm;
pub use mapper::Mapper;
pub use model::{lock_model, model_handle, MapModel, ModelHandle, ModelObject};
