//! Mode Controller
//!
//! The swarm starts `Idle` and switches to `Tracking` exactly once. The
//! switch is modeled as a state machine so the transition is recorded.

use cursors_core::StateMachine;
use serde::{Deserialize, Serialize};

/// Animation mode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Cursors spin in place on the ring
    Idle,
    /// Cursors follow their targets
    Tracking,
}

/// Events accepted by the mode controller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeEvent {
    /// The activation button was pressed
    Activate,
}

/// One-way `Idle` → `Tracking` switch
pub struct ModeController {
    fsm: StateMachine<Mode, ModeEvent>,
}

impl ModeController {
    pub fn new() -> Self {
        let fsm = StateMachine::builder(Mode::Idle)
            .on(Mode::Idle, ModeEvent::Activate, Mode::Tracking)
            .on_enter(Mode::Tracking, || {
                tracing::info!("tracking started");
            })
            .build();
        Self { fsm }
    }

    pub fn mode(&self) -> Mode {
        self.fsm.current_state()
    }

    pub fn is_tracking(&self) -> bool {
        self.fsm.is_in(Mode::Tracking)
    }

    /// Request activation. Returns `true` only for the call that performed the
    /// switch; later calls are no-ops.
    pub fn activate(&mut self) -> bool {
        if !self.fsm.can_send(ModeEvent::Activate) {
            return false;
        }
        self.fsm.send(ModeEvent::Activate);
        true
    }

    /// Transitions taken so far
    pub fn history(&self) -> &[(Mode, ModeEvent, Mode)] {
        self.fsm.history()
    }
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ModeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModeController")
            .field("mode", &self.mode())
            .finish()
    }
}
