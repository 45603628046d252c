//! Flow domain module - the top-level phase sequence.

mod phase;

pub use phase::FlowPhase;
