#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! In-memory game server implementing the [`Host`] capability trait.
//!
//! Used by the test suites and the command-line adapter in place of a real
//! server. Every side effect the plugin performs is recorded so callers can
//! assert on chat transcripts and inventory changes.

use std::collections::{BTreeMap, BTreeSet};

use bomb_request_core::{
    is_bomb, ChatLine, CommandRegistration, ConnectionState, Host, HostError, PlayerId,
    PlayerSnapshot, SteamId, Team,
};

const STEAM_ID_BASE: u64 = 76_561_198_000_000_000;

/// Player slot held by the simulated server.
#[derive(Clone, Debug)]
pub struct SimulatedPlayer {
    snapshot: PlayerSnapshot,
    items: Vec<String>,
    permissions: BTreeSet<String>,
    weapon_services: bool,
}

impl SimulatedPlayer {
    /// Creates a connected, living human player on the given team.
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>, team: Team) -> Self {
        Self {
            snapshot: PlayerSnapshot {
                id,
                name: name.into(),
                team,
                connection: ConnectionState::Connected,
                alive: true,
                bot: false,
                hltv: false,
                steam_id: SteamId::new(STEAM_ID_BASE + u64::from(id.get())),
            },
            items: Vec::new(),
            permissions: BTreeSet::new(),
            weapon_services: true,
        }
    }

    /// Grants a permission flag.
    #[must_use]
    pub fn with_permission(mut self, permission: &str) -> Self {
        let _ = self.permissions.insert(permission.to_owned());
        self
    }

    /// Adds an item to the starting inventory.
    #[must_use]
    pub fn with_item(mut self, item: &str) -> Self {
        self.items.push(item.to_owned());
        self
    }

    /// Marks the slot as bot-controlled.
    #[must_use]
    pub fn as_bot(mut self) -> Self {
        self.snapshot.bot = true;
        self
    }

    /// Replaces the platform account identifier.
    #[must_use]
    pub fn with_steam_id(mut self, steam_id: SteamId) -> Self {
        self.snapshot.steam_id = steam_id;
        self
    }

    /// Marks the player's pawn as dead.
    #[must_use]
    pub fn dead(mut self) -> Self {
        self.snapshot.alive = false;
        self
    }

    /// Identifier of the slot.
    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.snapshot.id
    }
}

/// Game server double that records every interaction.
#[derive(Debug, Default)]
pub struct SimulatedHost {
    players: BTreeMap<PlayerId, SimulatedPlayer>,
    dropped: Vec<String>,
    registered: Vec<CommandRegistration>,
    chat: Vec<(PlayerId, ChatLine)>,
    client_commands: Vec<(PlayerId, String)>,
    entity_lookup_broken: bool,
}

impl SimulatedHost {
    /// Creates an empty server.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a player slot.
    pub fn add_player(&mut self, player: SimulatedPlayer) {
        let _ = self.players.insert(player.id(), player);
    }

    /// Moves the player to another team.
    pub fn set_team(&mut self, player: PlayerId, team: Team) {
        if let Some(slot) = self.players.get_mut(&player) {
            slot.snapshot.team = team;
        }
    }

    /// Kills or revives the player's pawn.
    pub fn set_alive(&mut self, player: PlayerId, alive: bool) {
        if let Some(slot) = self.players.get_mut(&player) {
            slot.snapshot.alive = alive;
        }
    }

    /// Marks the player as disconnected while keeping the slot around.
    pub fn disconnect(&mut self, player: PlayerId) {
        if let Some(slot) = self.players.get_mut(&player) {
            slot.snapshot.connection = ConnectionState::Disconnected;
        }
    }

    /// Drops an unattended item into the world.
    pub fn drop_item(&mut self, item: &str) {
        self.dropped.push(item.to_owned());
    }

    /// Makes every inventory call for the player fail.
    pub fn break_weapon_services(&mut self, player: PlayerId) {
        if let Some(slot) = self.players.get_mut(&player) {
            slot.weapon_services = false;
        }
    }

    /// Makes world entity lookups fail.
    pub fn break_entity_lookup(&mut self) {
        self.entity_lookup_broken = true;
    }

    /// Items the player carries, ignoring injected failures.
    #[must_use]
    pub fn items(&self, player: PlayerId) -> &[String] {
        self.players
            .get(&player)
            .map(|slot| slot.items.as_slice())
            .unwrap_or_default()
    }

    /// Unattended items lying in the world.
    #[must_use]
    pub fn dropped_items(&self) -> &[String] {
        &self.dropped
    }

    /// Players currently carrying a bomb.
    #[must_use]
    pub fn bomb_carriers(&self) -> Vec<PlayerId> {
        self.players
            .values()
            .filter(|slot| slot.items.iter().any(|item| is_bomb(item)))
            .map(SimulatedPlayer::id)
            .collect()
    }

    /// Total number of bombs in the world, carried or dropped.
    #[must_use]
    pub fn bomb_count(&self) -> usize {
        let carried = self
            .players
            .values()
            .flat_map(|slot| slot.items.iter())
            .filter(|item| is_bomb(item))
            .count();
        let dropped = self.dropped.iter().filter(|item| is_bomb(item)).count();
        carried + dropped
    }

    /// Plain-text chat lines delivered to the player, in order.
    #[must_use]
    pub fn chat_lines(&self, player: PlayerId) -> Vec<String> {
        self.chat
            .iter()
            .filter(|(recipient, _)| *recipient == player)
            .map(|(_, line)| line.plain())
            .collect()
    }

    /// Every chat line delivered, in order.
    #[must_use]
    pub fn chat_log(&self) -> &[(PlayerId, ChatLine)] {
        &self.chat
    }

    /// Discards the recorded chat transcript.
    pub fn clear_chat(&mut self) {
        self.chat.clear();
    }

    /// Client commands executed for the player, in order.
    #[must_use]
    pub fn client_commands(&self, player: PlayerId) -> Vec<&str> {
        self.client_commands
            .iter()
            .filter(|(target, _)| *target == player)
            .map(|(_, command)| command.as_str())
            .collect()
    }

    /// Commands the plugin registered at load.
    #[must_use]
    pub fn registered_commands(&self) -> &[CommandRegistration] {
        &self.registered
    }

    fn inventory(&self, player: PlayerId) -> Result<&SimulatedPlayer, HostError> {
        let slot = self
            .players
            .get(&player)
            .ok_or(HostError::InvalidPlayer(player))?;
        if !slot.weapon_services {
            return Err(HostError::MissingWeaponServices(player));
        }
        Ok(slot)
    }

    fn inventory_mut(&mut self, player: PlayerId) -> Result<&mut SimulatedPlayer, HostError> {
        let slot = self
            .players
            .get_mut(&player)
            .ok_or(HostError::InvalidPlayer(player))?;
        if !slot.weapon_services {
            return Err(HostError::MissingWeaponServices(player));
        }
        Ok(slot)
    }
}

impl Host for SimulatedHost {
    fn player(&self, player: PlayerId) -> Option<PlayerSnapshot> {
        self.players.get(&player).map(|slot| slot.snapshot.clone())
    }

    fn players(&self) -> Vec<PlayerSnapshot> {
        self.players
            .values()
            .map(|slot| slot.snapshot.clone())
            .collect()
    }

    fn has_permission(&self, player: PlayerId, permission: &str) -> bool {
        self.players
            .get(&player)
            .is_some_and(|slot| slot.permissions.contains(permission))
    }

    fn carried_items(&self, player: PlayerId) -> Result<Vec<String>, HostError> {
        Ok(self.inventory(player)?.items.clone())
    }

    fn remove_item(&mut self, player: PlayerId, item: &str) -> Result<(), HostError> {
        let slot = self.inventory_mut(player)?;
        slot.items.retain(|carried| carried != item);
        Ok(())
    }

    fn give_item(&mut self, player: PlayerId, item: &str) -> Result<(), HostError> {
        let slot = self.inventory_mut(player)?;
        if !slot.snapshot.alive {
            return Err(HostError::MissingPawn(player));
        }
        slot.items.push(item.to_owned());
        Ok(())
    }

    fn execute_client_command(
        &mut self,
        player: PlayerId,
        command: &str,
    ) -> Result<(), HostError> {
        if !self.players.contains_key(&player) {
            return Err(HostError::InvalidPlayer(player));
        }
        self.client_commands.push((player, command.to_owned()));
        Ok(())
    }

    fn remove_unattended_items(&mut self, item: &str) -> Result<usize, HostError> {
        if self.entity_lookup_broken {
            return Err(HostError::EntityLookup(item.to_owned()));
        }
        let before = self.dropped.len();
        self.dropped.retain(|dropped| dropped != item);
        Ok(before - self.dropped.len())
    }

    fn print_to_chat(&mut self, player: PlayerId, line: &ChatLine) {
        self.chat.push((player, line.clone()));
    }

    fn register_command(&mut self, registration: CommandRegistration) {
        self.registered.push(registration);
    }
}
