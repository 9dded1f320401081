//! Capability surface the plugin needs from the game server.

use thiserror::Error;

use crate::{ChatLine, PlayerId, PlayerSnapshot};

/// Failures reported by the host while inspecting or mutating game state.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum HostError {
    /// The player slot no longer resolves to a valid controller.
    #[error("player {0:?} is not valid")]
    InvalidPlayer(PlayerId),
    /// The player's pawn is missing.
    #[error("player {0:?} has no pawn")]
    MissingPawn(PlayerId),
    /// The player's pawn has no weapon services attached.
    #[error("player {0:?} has no weapon services")]
    MissingWeaponServices(PlayerId),
    /// A world entity lookup failed.
    #[error("entity lookup for `{0}` failed")]
    EntityLookup(String),
}

/// Console command descriptor handed to the host at load time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandRegistration {
    /// Name typed by players, without console or chat prefixes.
    pub name: &'static str,
    /// Short description shown by the host's command listing.
    pub description: &'static str,
}

/// Game server capabilities consumed by the plugin.
///
/// Every callback receives the host by mutable reference, so tests can supply
/// an in-memory implementation in place of a real server.
pub trait Host {
    /// Looks up a single player slot.
    fn player(&self, player: PlayerId) -> Option<PlayerSnapshot>;

    /// Enumerates every occupied player slot.
    fn players(&self) -> Vec<PlayerSnapshot>;

    /// Reports whether the player holds the named permission flag.
    fn has_permission(&self, player: PlayerId, permission: &str) -> bool;

    /// Lists the designer names of every item the player carries.
    fn carried_items(&self, player: PlayerId) -> Result<Vec<String>, HostError>;

    /// Removes the named item from the player's inventory.
    fn remove_item(&mut self, player: PlayerId, item: &str) -> Result<(), HostError>;

    /// Gives a freshly spawned item to the player.
    fn give_item(&mut self, player: PlayerId, item: &str) -> Result<(), HostError>;

    /// Runs a client-side console command on behalf of the player.
    fn execute_client_command(&mut self, player: PlayerId, command: &str)
        -> Result<(), HostError>;

    /// Removes every unattended world item with the given designer name.
    ///
    /// Returns how many entities were removed.
    fn remove_unattended_items(&mut self, item: &str) -> Result<usize, HostError>;

    /// Prints a coloured chat line to a single player.
    fn print_to_chat(&mut self, player: PlayerId, line: &ChatLine);

    /// Registers a chat/console command with the host.
    fn register_command(&mut self, registration: CommandRegistration);
}
