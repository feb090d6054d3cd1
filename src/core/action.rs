//! Result state of a user-triggered action
//!
//! One tagged value replaces separate error/success/spinner switches, so a
//! state can never be both failed and succeeded.

use chrono::{DateTime, Utc};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ActionState<T> {
    Idle,
    InProgress { started_at: DateTime<Utc> },
    Succeeded(T),
    Failed(String),
}

impl<T> Default for ActionState<T> {
    fn default() -> Self {
        ActionState::Idle
    }
}

impl<T> ActionState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `InProgress`; returns `false` if an action is already running
    pub fn start(&mut self) -> bool {
        if self.is_busy() {
            return false;
        }
        *self = ActionState::InProgress {
            started_at: Utc::now(),
        };
        true
    }

    pub fn succeed(&mut self, payload: T) {
        *self = ActionState::Succeeded(payload);
    }

    pub fn fail(&mut self, reason: impl fmt::Display) {
        *self = ActionState::Failed(reason.to_string());
    }

    /// Settle from a `Result`
    pub fn finish<E: fmt::Display>(&mut self, result: Result<T, E>) {
        match result {
            Ok(payload) => self.succeed(payload),
            Err(err) => self.fail(err),
        }
    }

    pub fn reset(&mut self) {
        *self = ActionState::Idle;
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, ActionState::InProgress { .. })
    }

    pub fn payload(&self) -> Option<&T> {
        match self {
            ActionState::Succeeded(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ActionState::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for ActionState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionState::Idle => f.write_str("idle"),
            ActionState::InProgress { started_at } => {
                write!(f, "in progress since {}", started_at.format("%H:%M:%S"))
            }
            ActionState::Succeeded(payload) => write!(f, "succeeded: {}", payload),
            ActionState::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut state: ActionState<String> = ActionState::new();
        assert_eq!(state, ActionState::Idle);

        assert!(state.start());
        assert!(state.is_busy());
        assert!(!state.start(), "second start while busy must be refused");

        state.succeed("hash".to_string());
        assert_eq!(state.payload().map(String::as_str), Some("hash"));
        assert!(state.error().is_none());
    }

    #[test]
    fn test_failure_clears_success() {
        let mut state: ActionState<u32> = ActionState::new();
        state.succeed(1);
        state.finish(Err::<u32, _>("boom"));
        assert_eq!(state.error(), Some("boom"));
        assert!(state.payload().is_none());

        state.reset();
        assert_eq!(state, ActionState::Idle);
    }
}
