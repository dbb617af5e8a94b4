//! Per-component resolution state machine.
//!
//! `Idle -> Resolving -> { Resolved | Error }`. The terminal states absorb
//! every event; the only mutation path is `advance`, driven by the owning
//! orchestrator.

use std::sync::RwLock;

/// Resolution progress of one component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
    Idle,
    Resolving,
    Resolved,
    Error,
}

impl ResolutionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved | Self::Error)
    }
}

/// Events that drive the machine forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionEvent {
    /// The component began loading its styles.
    Begin,
    /// Every style operation has settled; `failures` counts the ones that
    /// did not succeed.
    AllSettled { failures: usize },
    /// An unrecoverable failure outside the style operations themselves.
    Fault,
}

#[derive(Debug, Default)]
pub struct ResolutionStateMachine {
    state: RwLock<ResolutionState>,
}

impl Default for ResolutionState {
    fn default() -> Self {
        Self::Idle
    }
}

impl ResolutionStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state. Read-only; external callers cannot mutate directly.
    pub fn state(&self) -> ResolutionState {
        *self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Apply `event`, returning the (possibly unchanged) state. Transitions
    /// not defined by the machine are logged and ignored; nothing ever
    /// leaves a terminal state.
    pub fn advance(&self, event: ResolutionEvent) -> ResolutionState {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        let next = match (*state, event) {
            (ResolutionState::Idle, ResolutionEvent::Begin) => ResolutionState::Resolving,
            (ResolutionState::Resolving, ResolutionEvent::AllSettled { failures: 0 }) => {
                ResolutionState::Resolved
            }
            (ResolutionState::Resolving, ResolutionEvent::AllSettled { .. }) => {
                ResolutionState::Error
            }
            (ResolutionState::Idle, ResolutionEvent::Fault)
            | (ResolutionState::Resolving, ResolutionEvent::Fault) => ResolutionState::Error,
            (current, event) => {
                log::warn!("ignoring {:?} in state {:?}", event, current);
                current
            }
        };
        *state = next;
        next
    }
}
