//! Inference service adapters.
//!
//! - `HttpInferenceService` - JSON over HTTP via reqwest
//! - `MockInferenceService` - scripted, call-recording test double

mod dto;
mod http_client;
mod mock;

pub use http_client::{HttpInferenceConfig, HttpInferenceService};
pub use mock::{MockCall, MockInferenceService};
