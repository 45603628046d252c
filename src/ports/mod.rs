//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `InferenceService` - Risk scoring and adaptive question service

mod inference_service;

pub use inference_service::{
    DiagnoseRequest, DiagnosisOutcome, InferenceError, InferenceService, ScreeningResult,
    StartRequest,
};
