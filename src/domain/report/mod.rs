//! Report domain module.
//!
//! The terminal report of an interview and its ranked presentation.

mod ranking;
mod summary;

pub use ranking::{RankedCondition, RankedReport, RankingSchema};
pub use summary::{Report, TerminalCause};
