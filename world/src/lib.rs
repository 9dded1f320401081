#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state for the Bomb Request plugin.
//!
//! The world owns the round lifecycle gate and the roster of players waiting
//! for the bomb. It lives for one map: the plugin feeds it commands derived
//! from host callbacks and reacts to the events it emits.

mod gate;
mod roster;

use bomb_request_core::{
    Command, EnrollmentRejection, Event, PlayerId, RosterResetReason, Team,
};

use self::{gate::Gate, roster::Roster};

/// Represents the authoritative Bomb Request session state.
#[derive(Debug, Default)]
pub struct World {
    gate: Gate,
    roster: Roster,
}

impl World {
    /// Creates an empty session with enrollment closed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            gate: Gate::new(),
            roster: Roster::new(),
        }
    }

    fn enroll(&mut self, player: PlayerId, team: Team, out_events: &mut Vec<Event>) {
        let rejection = if !team.carries_bomb() {
            Some(EnrollmentRejection::WrongTeam)
        } else if !self.gate.state().accepts_enrollment() {
            Some(EnrollmentRejection::EnrollmentClosed)
        } else if !self.roster.enroll(player) {
            Some(EnrollmentRejection::AlreadyEnrolled)
        } else {
            None
        };

        match rejection {
            Some(reason) => {
                tracing::debug!(?player, ?reason, "enrollment rejected");
                out_events.push(Event::EnrollmentRejected { player, reason });
            }
            None => {
                tracing::debug!(?player, "player enrolled");
                out_events.push(Event::PlayerEnrolled { player });
            }
        }
    }

    fn reset_roster(&mut self, reason: RosterResetReason, out_events: &mut Vec<Event>) {
        let members = self.roster.reset();
        out_events.push(Event::RosterReset { reason, members });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::MapStarted => {
            world.gate.map_started();
            out_events.push(Event::WarmupStarted);
            world.reset_roster(RosterResetReason::MapChanged, out_events);
        }
        Command::WarmupEnded => {
            world.gate.warmup_ended();
            out_events.push(Event::WarmupEnded);
        }
        Command::RoundFreezeEnded => {
            if world.gate.freeze_ended() {
                out_events.push(Event::EnrollmentOpened);
            }
        }
        Command::RoundPrestart => {
            if world.gate.round_prestart() {
                out_events.push(Event::EnrollmentClosed);
            }
        }
        Command::RoundStarted => {
            if !world.gate.is_warmup() {
                out_events.push(Event::LiveRoundStarted);
            }
        }
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::Enroll { player, team } => world.enroll(player, team, out_events),
        Command::Withdraw { player } => {
            if world.roster.withdraw(player) {
                out_events.push(Event::PlayerWithdrawn { player });
            }
        }
        Command::ResetRoster { reason } => world.reset_roster(reason, out_events),
        Command::ResolveSelection => {
            let candidates = world.roster.members().to_vec();
            if !candidates.is_empty() {
                out_events.push(Event::SelectionRequested { candidates });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use bomb_request_core::{GateState, PlayerId};

    use super::World;

    /// Captures the current gate flags.
    #[must_use]
    pub fn gate(world: &World) -> GateState {
        world.gate.state()
    }

    /// Reports whether the server is in warmup.
    #[must_use]
    pub fn is_warmup(world: &World) -> bool {
        world.gate.is_warmup()
    }

    /// Reports whether enrollment is currently accepted.
    #[must_use]
    pub fn accepts_enrollment(world: &World) -> bool {
        world.gate.state().accepts_enrollment()
    }

    /// Roster members in enrollment order.
    #[must_use]
    pub fn roster(world: &World) -> &[PlayerId] {
        world.roster.members()
    }

    /// Reports whether the player is queued.
    #[must_use]
    pub fn is_enrolled(world: &World, player: PlayerId) -> bool {
        world.roster.contains(player)
    }
}
