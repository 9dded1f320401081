#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Host-facing entry points of the Bomb Request plugin.
//!
//! The game server calls one method per lifecycle notification or chat
//! invocation, handing over its [`Host`] capabilities each time. Every call is
//! turned into world commands and run to quiescence: world events feed the
//! systems, and whatever commands the systems emit are applied in turn.

use std::{collections::VecDeque, time::Duration};

use bomb_request_core::{Command, Event, Host, PlayerId, RosterResetReason, ROUND_START_DELAY_MS};
use bomb_request_system_chat_commands::{ChatCommand, ChatCommands, SessionView};
use bomb_request_system_handoff::Handoff;
use bomb_request_system_round_timer::{self as round_timer, RoundTimer};
use bomb_request_system_selector::{self as selector, Candidate, Dice, SeededDice, Selector};
use bomb_request_world::{self as world, query, World};
use serde::Deserialize;

/// Human-readable plugin name reported to the host.
pub const MODULE_NAME: &str = "Bomb Request";

/// Plugin version reported to the host.
pub const MODULE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tunables of the plugin. Defaults match the production constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Seed for the selection dice; drawn from OS entropy when absent.
    pub seed: Option<u64>,
    /// Delay between round start and the selection, in milliseconds.
    pub round_start_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            round_start_delay_ms: ROUND_START_DELAY_MS,
        }
    }
}

impl Config {
    fn round_timer(&self) -> round_timer::Config {
        round_timer::Config::new(Duration::from_millis(self.round_start_delay_ms))
    }

    fn selector(&self) -> selector::Config {
        match self.seed {
            Some(seed) => selector::Config::seeded(seed),
            None => selector::Config::from_entropy(),
        }
    }
}

/// Session context of the plugin for the current server.
#[derive(Debug)]
pub struct BombRequest<D = SeededDice> {
    world: World,
    round_timer: RoundTimer,
    selector: Selector<D>,
    handoff: Handoff,
    chat_commands: ChatCommands,
}

impl BombRequest {
    /// Creates the plugin with production dice.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let selector = Selector::new(config.selector());
        Self::with_selector(config, selector)
    }
}

impl<D: Dice> BombRequest<D> {
    /// Creates the plugin with a caller-supplied selector.
    #[must_use]
    pub fn with_selector(config: Config, selector: Selector<D>) -> Self {
        Self {
            world: World::new(),
            round_timer: RoundTimer::new(config.round_timer()),
            selector,
            handoff: Handoff::default(),
            chat_commands: ChatCommands::default(),
        }
    }

    /// Read-only access to the session world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Registers the chat commands with the host.
    pub fn load<H>(&mut self, host: &mut H)
    where
        H: Host + ?Sized,
    {
        for registration in ChatCommand::registrations() {
            host.register_command(registration);
        }
        tracing::info!(name = MODULE_NAME, version = MODULE_VERSION, "plugin has been loaded");
    }

    /// A new map finished loading.
    pub fn on_map_start<H>(&mut self, host: &mut H)
    where
        H: Host + ?Sized,
    {
        self.dispatch(host, [Command::MapStarted]);
    }

    /// Warmup ended.
    pub fn on_warmup_end<H>(&mut self, host: &mut H)
    where
        H: Host + ?Sized,
    {
        self.dispatch(host, [Command::WarmupEnded]);
    }

    /// Freeze time of the current round ended.
    pub fn on_round_freeze_end<H>(&mut self, host: &mut H)
    where
        H: Host + ?Sized,
    {
        self.dispatch(host, [Command::RoundFreezeEnded]);
    }

    /// The next round is being prepared.
    pub fn on_round_prestart<H>(&mut self, host: &mut H)
    where
        H: Host + ?Sized,
    {
        self.dispatch(host, [Command::RoundPrestart]);
    }

    /// A round started.
    pub fn on_round_start<H>(&mut self, host: &mut H)
    where
        H: Host + ?Sized,
    {
        self.dispatch(host, [Command::RoundStarted]);
    }

    /// Host time advanced.
    pub fn on_tick<H>(&mut self, host: &mut H, dt: Duration)
    where
        H: Host + ?Sized,
    {
        self.dispatch(host, [Command::Tick { dt }]);
    }

    /// A player is leaving the server.
    ///
    /// Ignored during warmup and for bots, the broadcast relay, and accounts
    /// without a real platform id. Otherwise the player and every other roster
    /// member the host no longer reports as connected are withdrawn.
    pub fn on_player_disconnect<H>(&mut self, host: &mut H, player: PlayerId)
    where
        H: Host + ?Sized,
    {
        if query::is_warmup(&self.world) {
            return;
        }
        if let Some(snapshot) = host.player(player) {
            if !snapshot.is_real_account() {
                return;
            }
        }

        let mut commands = vec![Command::Withdraw { player }];
        for member in query::roster(&self.world).iter().copied() {
            let connected = host
                .player(member)
                .is_some_and(|snapshot| snapshot.is_connected());
            if member != player && !connected {
                commands.push(Command::Withdraw { player: member });
            }
        }
        self.dispatch(host, commands);
    }

    /// A player typed a command. Returns whether the name belongs to this plugin.
    ///
    /// `invoker` is `None` when the command came from the server console.
    pub fn on_chat_command<H>(
        &mut self,
        host: &mut H,
        invoker: Option<PlayerId>,
        typed: &str,
    ) -> bool
    where
        H: Host + ?Sized,
    {
        let Some(command) = ChatCommand::parse(typed) else {
            return false;
        };

        let mut commands = Vec::new();
        let session = SessionView {
            gate: query::gate(&self.world),
            roster: query::roster(&self.world),
        };
        self.chat_commands
            .handle(host, session, invoker, command, &mut commands);
        self.dispatch(host, commands);
        true
    }

    fn dispatch<H, I>(&mut self, host: &mut H, commands: I)
    where
        H: Host + ?Sized,
        I: IntoIterator<Item = Command>,
    {
        let mut queue: VecDeque<Command> = commands.into_iter().collect();
        while let Some(command) = queue.pop_front() {
            let mut events = Vec::new();
            world::apply(&mut self.world, command, &mut events);
            self.chat_commands.announce(host, &events);

            let mut follow_up = Vec::new();
            self.round_timer.handle(&events, &mut follow_up);
            for event in &events {
                if let Event::SelectionRequested { candidates } = event {
                    self.resolve_selection(host, candidates, &mut follow_up);
                }
            }
            queue.extend(follow_up);
        }
    }

    fn resolve_selection<H>(
        &mut self,
        host: &mut H,
        candidates: &[PlayerId],
        out: &mut Vec<Command>,
    ) where
        H: Host + ?Sized,
    {
        let annotated: Vec<Candidate> = candidates
            .iter()
            .map(|&player| {
                Candidate::new(player, self.chat_commands.is_privileged(host, player))
            })
            .collect();

        match self.selector.select(&annotated) {
            Some(winner) => {
                let _ = self.handoff.resolve(host, winner, candidates);
            }
            None => tracing::warn!("selection requested without candidates"),
        }
        out.push(Command::ResetRoster {
            reason: RosterResetReason::SelectionResolved,
        });
    }
}
