//! Reconnect scheduling policy.
//!
//! The state machine asks the policy for a delay before each reconnect
//! attempt; swapping the policy changes timing without touching the state
//! machine. The register default is an unbounded fixed delay so an unattended
//! till keeps converging on the backend without operator intervention.

use std::time::Duration;

/// Delay between a lost connection and the next reconnect attempt.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(3);

/// Reconnect policy, tagged by retry shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Retry forever with a fixed delay.
    Fixed { delay: Duration },
    /// Retry with a fixed delay up to `max_attempts`, then give up.
    Capped { delay: Duration, max_attempts: u32 },
}

impl RetryPolicy {
    /// Delay before reconnect attempt number `attempt` (1-based).
    /// `None` means the policy is exhausted and no reconnect is scheduled.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        match self {
            Self::Fixed { delay } => Some(*delay),
            Self::Capped {
                delay,
                max_attempts,
            } => (attempt <= *max_attempts).then_some(*delay),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::Fixed {
            delay: RECONNECT_DELAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_policy_never_exhausts() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Some(RECONNECT_DELAY));
        assert_eq!(policy.delay_for(1_000_000), Some(RECONNECT_DELAY));
    }

    #[test]
    fn capped_policy_exhausts_after_max_attempts() {
        let policy = RetryPolicy::Capped {
            delay: Duration::from_millis(100),
            max_attempts: 3,
        };
        assert_eq!(policy.delay_for(1), Some(Duration::from_millis(100)));
        assert_eq!(policy.delay_for(3), Some(Duration::from_millis(100)));
        assert_eq!(policy.delay_for(4), None);
    }
}
