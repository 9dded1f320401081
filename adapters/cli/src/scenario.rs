use std::{collections::BTreeSet, fmt, time::Duration};

use bomb_request_core::{PlayerId, Team, ADMIN_PERMISSION, VIP_PERMISSION};
use bomb_request_plugin::{BombRequest, Config};
use bomb_request_simulated_host::{SimulatedHost, SimulatedPlayer};
use bomb_request_world::query;
use serde::Deserialize;
use thiserror::Error;

/// Scenario replayed when no file is supplied.
pub(crate) const DEMO: &str = r#"
[plugin]
seed = 7

[[players]]
id = 1
name = "alice"
team = "terrorist"
vip = true

[[players]]
id = 2
name = "bob"
team = "terrorist"
items = ["weapon_glock", "weapon_c4"]

[[players]]
id = 3
name = "carol"
team = "terrorist"

[[players]]
id = 4
name = "dave"
team = "counter_terrorist"
admin = true

[[players]]
id = 5
name = "bot"
team = "terrorist"
bot = true

[[steps]]
action = "map_start"

[[steps]]
action = "chat"
player = 3
command = "!rb"

[[steps]]
action = "warmup_end"

[[steps]]
action = "freeze_end"

[[steps]]
action = "chat"
player = 1
command = "!rb"

[[steps]]
action = "chat"
player = 3
command = "!rb"

[[steps]]
action = "chat"
player = 4
command = "!rb"

[[steps]]
action = "chat"
player = 1
command = "!checkrb"

[[steps]]
action = "prestart"

[[steps]]
action = "round_start"

[[steps]]
action = "tick"
millis = 1000

[[steps]]
action = "freeze_end"

[[steps]]
action = "chat"
player = 3
command = "!rb"

[[steps]]
action = "chat"
player = 4
command = "!resetrb"

[[steps]]
action = "chat"
player = 2
command = "!rbhelp"
"#;

/// Server population and event sequence to replay against the plugin.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Scenario {
    /// Plugin tunables.
    #[serde(default)]
    pub(crate) plugin: Config,
    /// Players present on the server from the start.
    pub(crate) players: Vec<PlayerSpec>,
    /// Host notifications, in order.
    #[serde(default)]
    pub(crate) steps: Vec<Step>,
}

/// Player slot described by a scenario.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct PlayerSpec {
    /// Slot identifier.
    pub(crate) id: u32,
    /// Display name.
    pub(crate) name: String,
    /// Starting team.
    pub(crate) team: Team,
    /// Holds the VIP permission.
    #[serde(default)]
    pub(crate) vip: bool,
    /// Holds the administrator permission.
    #[serde(default)]
    pub(crate) admin: bool,
    /// Controlled by the server.
    #[serde(default)]
    pub(crate) bot: bool,
    /// Starting inventory.
    #[serde(default)]
    pub(crate) items: Vec<String>,
}

/// Host notification replayed by a scenario.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub(crate) enum Step {
    /// A new map loaded.
    MapStart,
    /// Warmup ended.
    WarmupEnd,
    /// Freeze time ended.
    FreezeEnd,
    /// The next round is being prepared.
    Prestart,
    /// A round started.
    RoundStart,
    /// Host time advanced.
    Tick {
        /// Elapsed milliseconds.
        millis: u64,
    },
    /// A player typed a command.
    Chat {
        /// Typing player.
        player: u32,
        /// Text as typed.
        command: String,
    },
    /// A player moved to another team.
    SwitchTeam {
        /// Moving player.
        player: u32,
        /// Destination team.
        team: Team,
    },
    /// A player's pawn died.
    Kill {
        /// Dying player.
        player: u32,
    },
    /// A player left the server.
    Disconnect {
        /// Leaving player.
        player: u32,
    },
}

/// Errors that can occur while loading or replaying a scenario.
#[derive(Debug, Error)]
pub(crate) enum ScenarioError {
    /// The scenario file is not valid TOML or does not match the schema.
    #[error("could not parse scenario: {0}")]
    Parse(#[from] toml::de::Error),
    /// Two players share a slot identifier.
    #[error("player id {0} is declared more than once")]
    DuplicatePlayer(u32),
    /// A step refers to a player the scenario never declared.
    #[error("step {step} refers to unknown player {player}")]
    UnknownPlayer {
        /// Zero-based position of the offending step.
        step: usize,
        /// Identifier the step used.
        player: u32,
    },
}

impl Scenario {
    /// Parses a scenario from its TOML representation.
    pub(crate) fn from_toml(text: &str) -> Result<Self, ScenarioError> {
        Ok(toml::from_str(text)?)
    }

    /// Returns the built-in demo scenario.
    pub(crate) fn demo() -> Result<Self, ScenarioError> {
        Self::from_toml(DEMO)
    }

    /// Replays the steps against a fresh plugin and simulated server.
    pub(crate) fn run(&self) -> Result<Transcript, ScenarioError> {
        let known = self.validate_players()?;
        let player = |step: usize, id: u32| {
            if known.contains(&id) {
                Ok(PlayerId::new(id))
            } else {
                Err(ScenarioError::UnknownPlayer { step, player: id })
            }
        };

        let mut host = self.populate();
        let mut plugin = BombRequest::new(self.plugin);
        plugin.load(&mut host);

        for (index, step) in self.steps.iter().enumerate() {
            tracing::debug!(index, ?step, "replaying step");
            match step {
                Step::MapStart => plugin.on_map_start(&mut host),
                Step::WarmupEnd => plugin.on_warmup_end(&mut host),
                Step::FreezeEnd => plugin.on_round_freeze_end(&mut host),
                Step::Prestart => plugin.on_round_prestart(&mut host),
                Step::RoundStart => plugin.on_round_start(&mut host),
                Step::Tick { millis } => {
                    plugin.on_tick(&mut host, Duration::from_millis(*millis));
                }
                Step::Chat { player: id, command } => {
                    let invoker = player(index, *id)?;
                    if !plugin.on_chat_command(&mut host, Some(invoker), command) {
                        tracing::warn!(index, %command, "command is not handled by the plugin");
                    }
                }
                Step::SwitchTeam { player: id, team } => {
                    host.set_team(player(index, *id)?, *team);
                }
                Step::Kill { player: id } => host.set_alive(player(index, *id)?, false),
                Step::Disconnect { player: id } => {
                    let leaving = player(index, *id)?;
                    host.disconnect(leaving);
                    plugin.on_player_disconnect(&mut host, leaving);
                }
            }
        }

        let players = self
            .players
            .iter()
            .map(|spec| {
                let id = PlayerId::new(spec.id);
                PlayerTranscript {
                    id,
                    name: spec.name.clone(),
                    lines: host.chat_lines(id),
                    items: host.items(id).to_vec(),
                }
            })
            .collect();

        Ok(Transcript {
            players,
            roster: query::roster(plugin.world()).to_vec(),
            bombs: host.bomb_count(),
        })
    }

    fn validate_players(&self) -> Result<BTreeSet<u32>, ScenarioError> {
        let mut known = BTreeSet::new();
        for spec in &self.players {
            if !known.insert(spec.id) {
                return Err(ScenarioError::DuplicatePlayer(spec.id));
            }
        }
        Ok(known)
    }

    fn populate(&self) -> SimulatedHost {
        let mut host = SimulatedHost::new();
        for spec in &self.players {
            let mut player = SimulatedPlayer::new(PlayerId::new(spec.id), spec.name.clone(), spec.team);
            if spec.vip {
                player = player.with_permission(VIP_PERMISSION);
            }
            if spec.admin {
                player = player.with_permission(ADMIN_PERMISSION);
            }
            if spec.bot {
                player = player.as_bot();
            }
            for item in &spec.items {
                player = player.with_item(item);
            }
            host.add_player(player);
        }
        host
    }
}

/// Outcome of a replay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Transcript {
    /// Per-player chat and inventory, in declaration order.
    pub(crate) players: Vec<PlayerTranscript>,
    /// Roster left queued at the end of the replay.
    pub(crate) roster: Vec<PlayerId>,
    /// Bombs in the world, carried or dropped.
    pub(crate) bombs: usize,
}

/// What a single player saw and holds at the end of a replay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PlayerTranscript {
    /// Slot identifier.
    pub(crate) id: PlayerId,
    /// Display name.
    pub(crate) name: String,
    /// Chat lines received, in order.
    pub(crate) lines: Vec<String>,
    /// Inventory at the end of the replay.
    pub(crate) items: Vec<String>,
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for player in &self.players {
            writeln!(f, "{} (#{})", player.name, player.id.get())?;
            for line in &player.lines {
                writeln!(f, "  > {line}")?;
            }
            if !player.items.is_empty() {
                writeln!(f, "  carries: {}", player.items.join(", "))?;
            }
        }
        let roster: Vec<String> = self
            .roster
            .iter()
            .map(|player| player.get().to_string())
            .collect();
        writeln!(f, "queued: [{}]", roster.join(", "))?;
        write!(f, "bombs in play: {}", self.bombs)
    }
}
