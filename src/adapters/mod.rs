//! Adapters - Implementations of ports for external systems.
//!
//! - `inference` - Inference service over HTTP, plus a scripted mock

pub mod inference;

pub use inference::{HttpInferenceConfig, HttpInferenceService, MockCall, MockInferenceService};
