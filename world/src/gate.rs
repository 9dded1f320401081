//! Round lifecycle gate deciding when enrollment is accepted.

use bomb_request_core::GateState;

/// Tracks warmup and the live-play window of the current round.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Gate {
    warmup: bool,
    selection_enabled: bool,
}

impl Gate {
    /// Creates a gate for a session that has not seen a map start yet.
    pub(crate) const fn new() -> Self {
        Self {
            warmup: false,
            selection_enabled: false,
        }
    }

    /// Enters warmup for a freshly loaded map and closes the live-play window.
    pub(crate) fn map_started(&mut self) {
        self.warmup = true;
        self.selection_enabled = false;
    }

    /// Leaves warmup.
    pub(crate) fn warmup_ended(&mut self) {
        self.warmup = false;
    }

    /// Opens enrollment once freeze time is over. Returns whether the gate changed.
    pub(crate) fn freeze_ended(&mut self) -> bool {
        if self.warmup {
            return false;
        }
        self.selection_enabled = true;
        true
    }

    /// Closes enrollment while the next round is set up. Returns whether the gate changed.
    pub(crate) fn round_prestart(&mut self) -> bool {
        if self.warmup {
            return false;
        }
        self.selection_enabled = false;
        true
    }

    pub(crate) const fn is_warmup(&self) -> bool {
        self.warmup
    }

    pub(crate) const fn state(&self) -> GateState {
        GateState {
            warmup: self.warmup,
            selection_enabled: self.selection_enabled,
        }
    }
}
