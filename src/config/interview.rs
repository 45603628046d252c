//! Interview pacing configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const MAX_DWELL_MS: u64 = 60_000;
const MAX_TYPING_DELAY_MS: u64 = 10_000;

/// Timing of the adaptive interview
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct InterviewConfig {
    /// Upper bound on one round trip, in seconds
    #[serde(default = "default_turn_timeout")]
    pub turn_timeout_secs: u64,

    /// How long a completed condition is shown before the next question
    #[serde(default = "default_transition_dwell")]
    pub transition_dwell_ms: u64,

    /// How long a new question stays hidden behind the typing indicator
    #[serde(default = "default_typing_delay")]
    pub typing_delay_ms: u64,
}

impl InterviewConfig {
    pub fn turn_timeout(&self) -> Duration {
        Duration::from_secs(self.turn_timeout_secs)
    }

    pub fn transition_dwell(&self) -> Duration {
        Duration::from_millis(self.transition_dwell_ms)
    }

    pub fn typing_delay(&self) -> Duration {
        Duration::from_millis(self.typing_delay_ms)
    }

    /// Validate interview configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.turn_timeout_secs == 0 || self.turn_timeout_secs > 600 {
            return Err(ValidationError::InvalidTurnTimeout);
        }
        if self.transition_dwell_ms > MAX_DWELL_MS {
            return Err(ValidationError::DwellTooLong { max_ms: MAX_DWELL_MS });
        }
        if self.typing_delay_ms > MAX_TYPING_DELAY_MS {
            return Err(ValidationError::TypingDelayTooLong {
                max_ms: MAX_TYPING_DELAY_MS,
            });
        }
        Ok(())
    }
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            turn_timeout_secs: default_turn_timeout(),
            transition_dwell_ms: default_transition_dwell(),
            typing_delay_ms: default_typing_delay(),
        }
    }
}

fn default_turn_timeout() -> u64 {
    45
}

fn default_transition_dwell() -> u64 {
    3000
}

fn default_typing_delay() -> u64 {
    1500
}
