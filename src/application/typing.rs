//! Typing indicator - deferred visibility for newly installed questions.
//!
//! Purely presentational: it records when a question may be shown as
//! interactive and never touches interview state.

use std::time::Duration;
use tokio::time::{sleep_until, Instant};

/// Tracks when the current question becomes visible.
#[derive(Debug, Clone)]
pub struct TypingIndicator {
    delay: Duration,
    visible_at: Option<Instant>,
}

impl TypingIndicator {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            visible_at: None,
        }
    }

    /// Starts the indicator for a question installed now.
    pub fn restart(&mut self) {
        self.visible_at = Some(Instant::now() + self.delay);
    }

    /// Returns true while the question should still be hidden.
    pub fn is_typing(&self) -> bool {
        self.visible_at.is_some_and(|at| Instant::now() < at)
    }

    /// Instant the question becomes visible, if one was installed.
    pub fn visible_at(&self) -> Option<Instant> {
        self.visible_at
    }

    /// Waits until the question is visible. Returns immediately if it already is.
    pub async fn wait(&self) {
        if let Some(at) = self.visible_at {
            sleep_until(at).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn hides_question_for_configured_delay() {
        let mut typing = TypingIndicator::new(Duration::from_millis(1500));
        assert!(!typing.is_typing());

        typing.restart();
        assert!(typing.is_typing());

        tokio::time::advance(Duration::from_millis(1499)).await;
        assert!(typing.is_typing());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(!typing.is_typing());
    }

    #[tokio::test(start_paused = true)]
    async fn wait_resolves_at_visibility() {
        let mut typing = TypingIndicator::new(Duration::from_millis(1500));
        typing.restart();
        let start = Instant::now();

        typing.wait().await;

        assert_eq!(start.elapsed(), Duration::from_millis(1500));
        assert!(!typing.is_typing());
    }

    #[tokio::test]
    async fn zero_delay_is_never_typing() {
        let mut typing = TypingIndicator::new(Duration::ZERO);
        typing.restart();
        assert!(!typing.is_typing());
    }
}
