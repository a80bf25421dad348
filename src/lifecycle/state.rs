//! Server lifecycle state machine.
//!
//! # States
//! ```text
//! Idle → Running → ShuttingDown → Stopped
//!           └──────────────────────↗   (listener failure)
//! ```
//!
//! Transitions only move forward and no state is entered twice.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use tokio::sync::watch;

use crate::observability::metrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LifecycleState {
    Idle,
    Running,
    ShuttingDown,
    Stopped,
}

impl LifecycleState {
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Idle => "idle",
            LifecycleState::Running => "running",
            LifecycleState::ShuttingDown => "shutting_down",
            LifecycleState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid lifecycle transition {from} -> {to}")]
pub struct InvalidTransition {
    pub from: LifecycleState,
    pub to: LifecycleState,
}

/// Current state plus every state entered so far.
#[derive(Debug)]
pub struct StateMachine {
    current: watch::Sender<LifecycleState>,
    history: Mutex<Vec<LifecycleState>>,
}

impl StateMachine {
    pub fn new() -> Self {
        let (current, _) = watch::channel(LifecycleState::Idle);
        Self {
            current,
            history: Mutex::new(vec![LifecycleState::Idle]),
        }
    }

    pub fn current(&self) -> LifecycleState {
        *self.current.borrow()
    }

    /// Observe state changes.
    #[cfg(test)]
    fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.current.subscribe()
    }

    pub fn history(&self) -> Vec<LifecycleState> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Move to `next`, which must come after the current state.
    pub fn advance(&self, next: LifecycleState) -> Result<(), InvalidTransition> {
        let mut from = next;
        let moved = self.current.send_if_modified(|current| {
            from = *current;
            if next <= *current {
                return false;
            }
            *current = next;
            self.history
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(next);
            true
        });

        if !moved {
            return Err(InvalidTransition { from, to: next });
        }

        metrics::record_lifecycle_state(next);
        tracing::debug!(from = %from, to = %next, "Lifecycle transition");
        Ok(())
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_forward_once() {
        let machine = StateMachine::new();
        machine.advance(LifecycleState::Running).unwrap();
        machine.advance(LifecycleState::ShuttingDown).unwrap();
        machine.advance(LifecycleState::Stopped).unwrap();

        assert_eq!(
            machine.history(),
            vec![
                LifecycleState::Idle,
                LifecycleState::Running,
                LifecycleState::ShuttingDown,
                LifecycleState::Stopped,
            ]
        );
    }

    #[test]
    fn may_skip_shutting_down() {
        let machine = StateMachine::new();
        machine.advance(LifecycleState::Running).unwrap();
        machine.advance(LifecycleState::Stopped).unwrap();
        assert_eq!(machine.current(), LifecycleState::Stopped);
    }

    #[test]
    fn refuses_reentry_and_backwards_moves() {
        let machine = StateMachine::new();
        machine.advance(LifecycleState::Running).unwrap();

        let err = machine.advance(LifecycleState::Running).unwrap_err();
        assert_eq!(
            err,
            InvalidTransition {
                from: LifecycleState::Running,
                to: LifecycleState::Running
            }
        );
        assert!(machine.advance(LifecycleState::Idle).is_err());
        assert_eq!(machine.history().len(), 2);
    }

    #[test]
    fn subscribers_see_latest_state() {
        let machine = StateMachine::new();
        let rx = machine.subscribe();
        machine.advance(LifecycleState::Running).unwrap();
        assert_eq!(*rx.borrow(), LifecycleState::Running);
    }
}
