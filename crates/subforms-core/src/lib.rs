//! # subforms-core
//!
//! Foundation types for the subforms library. This crate has no dependency
//! on the forms layer and provides the pieces everything else builds on.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`value`] - The backend-agnostic [`Value`] enum used for form data
//! - [`utils`] - Utility types (`MultiValueDict`)
//! - [`querydict`] - Form-encoded submission data (`QueryDict`)
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod querydict;
pub mod utils;
pub mod value;

// Re-export the most commonly used types at the crate root.
pub use error::{SubformsError, SubformsResult};
pub use querydict::QueryDict;
pub use value::{FormData, Value};
