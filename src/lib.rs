//! Medinator - Adaptive Health-Risk Interview Client
//!
//! This crate collects a user's context, runs a fixed questionnaire, then
//! drives an adaptive "detective" interview against a remote inference
//! service and ranks the resulting per-condition assessments into a report.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
