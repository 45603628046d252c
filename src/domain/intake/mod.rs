//! Context intake domain module.
//!
//! Collects demographic and lifestyle attributes and gates entry to the
//! questionnaire on the required fields being present.

mod context;
mod form;

pub use context::{ContextField, UserContext};
pub use form::{validate_context, ContextIntake, FieldErrors};
