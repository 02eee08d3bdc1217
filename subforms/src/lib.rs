//! # subforms
//!
//! Hierarchical form validation and declarative model/form data mapping.
//!
//! This is the meta-crate that re-exports the sub-crates for convenient
//! access. You can depend on `subforms` to get everything, or depend on the
//! individual crates for finer-grained control.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use subforms::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let address = Arc::new(
//!     FormDef::new(
//!         "AddressForm",
//!         vec![FormFieldDef::new(
//!             "city",
//!             FormFieldType::Char { min_length: None, max_length: None, strip: true },
//!         )],
//!     )
//!     .with_model_to_form(ModelSource::attr("city"), "city")
//!     .with_form_to_model("city", ModelTarget::attr("city")),
//! );
//! let person = Arc::new(
//!     FormDef::new(
//!         "PersonForm",
//!         vec![FormFieldDef::new(
//!             "name",
//!             FormFieldType::Char { min_length: None, max_length: None, strip: true },
//!         )],
//!     )
//!     .with_model_to_form(ModelSource::attr("name"), "name")
//!     .with_form_to_model("name", ModelTarget::attr("name"))
//!     .with_subform("address", address),
//! );
//!
//! let model = model_handle(
//!     MapModel::new().with_attr("name", "Ada").with_attr("city", "Portland"),
//! );
//! let initial = Mapper::new(person.clone()).get_form_data(&model);
//!
//! let mut form = HierarchicalForm::new(person.clone()).with_initial(initial);
//! form.bind(&QueryDict::parse("name=Ada&address=on&address-city=Salem"));
//! assert!(form.is_valid().await);
//!
//! let touched = Mapper::new(person).apply_form_data(form.cleaned_data(), &model);
//! assert_eq!(touched.len(), 1);
//! # }
//! ```

/// Foundation types: errors, `Value`, `QueryDict`, logging setup.
pub use subforms_core as core;

/// Forms substrate plus the hierarchical-form and mapper layers.
pub use subforms_forms as forms;

/// The most commonly used types, importable in one line.
pub mod prelude {
    pub use subforms_core::{FormData, QueryDict, SubformsError, SubformsResult, Value};
    pub use subforms_forms::def::{FormDef, ModelSource, ModelTarget};
    pub use subforms_forms::fields::{FormFieldDef, FormFieldType};
    pub use subforms_forms::form::{BaseForm, Form};
    pub use subforms_forms::model::{lock_model, model_handle, MapModel, ModelHandle, ModelObject};
    pub use subforms_forms::{HierarchicalForm, Mapper};
}
