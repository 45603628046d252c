//! Domain layer containing the screening flow's business logic.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors, state machine)
//! - `intake` - Demographic and lifestyle context with the required-field gate
//! - `questionnaire` - Fixed multiple-choice questionnaire and its runner
//! - `assessment` - Per-condition assessments and confidence representation
//! - `interview` - Adaptive interview session state machine
//! - `report` - Terminal report and ranking
//! - `flow` - Top-level phase sequence

pub mod assessment;
pub mod flow;
pub mod foundation;
pub mod intake;
pub mod interview;
pub mod questionnaire;
pub mod report;
