#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Bomb Request plugin.
//!
//! This crate defines the message surface that connects the host adapter, the
//! authoritative session world, and pure systems. The plugin translates host
//! callbacks into [`Command`] values, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to. Systems never reach into the game engine directly; whenever they
//! need to inspect or mutate game state they go through the [`Host`]
//! capability trait supplied by the caller.

use std::time::Duration;

use serde::{Deserialize, Serialize};

mod chat;
mod host;

pub use chat::{send_notice, ChatColor, ChatLine, ChatSegment, Notice, CHAT_PREFIX};
pub use host::{CommandRegistration, Host, HostError};

/// Designer name of the round's single bomb item.
pub const BOMB_ITEM: &str = "weapon_c4";

/// Fragment that identifies a bomb when testing an item's designer name.
pub const BOMB_TAG: &str = "c4";

/// Weapon slot a former carrier switches to after losing the bomb.
pub const FALLBACK_SLOT_COMMAND: &str = "slot3";

/// Permission granting the privileged selection edge.
pub const VIP_PERMISSION: &str = "@css/vip";

/// Permission required for administrative roster commands.
pub const ADMIN_PERMISSION: &str = "@css/ban";

/// Delay between round start and the selection resolving, in milliseconds.
pub const ROUND_START_DELAY_MS: u64 = 1_000;

/// Delay between round start and the selection resolving.
pub const ROUND_START_DELAY: Duration = Duration::from_millis(ROUND_START_DELAY_MS);

/// Commands that express all permissible session mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// A new map finished loading; the server is in warmup.
    MapStarted,
    /// Warmup finished and competitive rounds begin.
    WarmupEnded,
    /// Freeze time of the current round elapsed.
    RoundFreezeEnded,
    /// The next round is being set up.
    RoundPrestart,
    /// A round started.
    RoundStarted,
    /// Advances the session clock by the provided delta time.
    Tick {
        /// Duration of host time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that a player be added to the roster.
    Enroll {
        /// Player asking to be queued.
        player: PlayerId,
        /// Team the player belonged to when asking.
        team: Team,
    },
    /// Removes a player from the roster if present.
    Withdraw {
        /// Player leaving the roster.
        player: PlayerId,
    },
    /// Clears every roster member.
    ResetRoster {
        /// Why the roster is being cleared.
        reason: RosterResetReason,
    },
    /// Requests the deferred round-start selection.
    ResolveSelection,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A map started and warmup is active.
    WarmupStarted,
    /// Warmup finished.
    WarmupEnded,
    /// Players may now enroll.
    EnrollmentOpened,
    /// Enrollment is closed until the next freeze end.
    EnrollmentClosed,
    /// A round outside warmup started.
    LiveRoundStarted,
    /// Indicates that the session clock advanced.
    TimeAdvanced {
        /// Duration of host time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a player joined the roster.
    PlayerEnrolled {
        /// Player appended to the roster.
        player: PlayerId,
    },
    /// Reports that an enrollment request was turned down.
    EnrollmentRejected {
        /// Player whose request was rejected.
        player: PlayerId,
        /// Specific reason the request failed.
        reason: EnrollmentRejection,
    },
    /// Confirms that a player left the roster.
    PlayerWithdrawn {
        /// Player removed from the roster.
        player: PlayerId,
    },
    /// Confirms that the roster was emptied.
    RosterReset {
        /// Why the roster was cleared.
        reason: RosterResetReason,
        /// Members that were removed, in enrollment order.
        members: Vec<PlayerId>,
    },
    /// The deferred selection is due and the roster is non-empty.
    SelectionRequested {
        /// Roster members at the time of the request, in enrollment order.
        candidates: Vec<PlayerId>,
    },
}

/// Reasons an enrollment request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnrollmentRejection {
    /// Only the bomb-carrying side may enroll.
    WrongTeam,
    /// Enrollment is only accepted during live play.
    EnrollmentClosed,
    /// The player is queued already.
    AlreadyEnrolled,
}

/// Reasons the roster may be emptied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RosterResetReason {
    /// A new map loaded.
    MapChanged,
    /// The round-start selection resolved.
    SelectionResolved,
    /// An administrator cleared the roster.
    Administrator {
        /// Administrator who issued the reset.
        by: PlayerId,
    },
}

/// Identifier assigned to a connected player by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(u32);

impl PlayerId {
    /// Creates a new player identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Platform account identifier of a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SteamId(u64);

impl SteamId {
    /// Creates a new account identifier.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the account identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Reports whether the identifier has the 17 decimal digits of a real account.
    #[must_use]
    pub const fn is_real_account(&self) -> bool {
        self.0 >= 10_000_000_000_000_000 && self.0 <= 99_999_999_999_999_999
    }
}

/// Team a player is assigned to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    /// Not yet on a team.
    Unassigned,
    /// Watching the match.
    Spectator,
    /// Attacking side; carries the bomb.
    Terrorist,
    /// Defending side.
    CounterTerrorist,
}

impl Team {
    /// Reports whether the team carries the bomb.
    #[must_use]
    pub const fn carries_bomb(self) -> bool {
        matches!(self, Self::Terrorist)
    }
}

/// Connection lifecycle of a player slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// Slot is still loading in.
    Connecting,
    /// Player is fully connected.
    Connected,
    /// Player is leaving.
    Disconnecting,
    /// Slot is empty.
    Disconnected,
}

/// Read-only view of a player as reported by the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerSnapshot {
    /// Identifier of the player slot.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Current team assignment.
    pub team: Team,
    /// Connection lifecycle state.
    pub connection: ConnectionState,
    /// Indicates whether the player's pawn is alive.
    pub alive: bool,
    /// Indicates whether the slot is controlled by a bot.
    pub bot: bool,
    /// Indicates whether the slot is the broadcast relay.
    pub hltv: bool,
    /// Platform account of the player.
    pub steam_id: SteamId,
}

impl PlayerSnapshot {
    /// Reports whether the player is fully connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connection == ConnectionState::Connected
    }

    /// Reports whether the player is connected and on the bomb-carrying side.
    #[must_use]
    pub fn is_terrorist(&self) -> bool {
        self.is_connected() && self.team.carries_bomb()
    }

    /// Reports whether the player is a connected, living terrorist.
    #[must_use]
    pub fn is_alive_terrorist(&self) -> bool {
        self.is_terrorist() && self.alive
    }

    /// Reports whether the slot belongs to a human with a real account.
    #[must_use]
    pub fn is_real_account(&self) -> bool {
        !self.bot && !self.hltv && self.steam_id.is_real_account()
    }
}

/// Snapshot of the round lifecycle gate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GateState {
    /// True between map load and warmup end.
    pub warmup: bool,
    /// True between freeze end and the next round's pre-start.
    pub selection_enabled: bool,
}

impl GateState {
    /// Reports whether enrollment is currently accepted.
    #[must_use]
    pub const fn accepts_enrollment(&self) -> bool {
        !self.warmup && self.selection_enabled
    }
}

/// Tests whether an item's designer name denotes the bomb.
#[must_use]
pub fn is_bomb(designer_name: &str) -> bool {
    designer_name.contains(BOMB_TAG)
}
