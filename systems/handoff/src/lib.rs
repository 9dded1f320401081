#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Moves the round's single bomb to the selected roster member.
//!
//! Simply giving the winner a bomb would leave two in play, so the current one
//! is located and stripped first. Host failures are logged and the affected
//! step is skipped; the handoff always runs to completion.

use bomb_request_core::{
    is_bomb, send_notice, Host, Notice, PlayerId, BOMB_ITEM, FALLBACK_SLOT_COMMAND,
};

/// Configuration parameters required to construct the handoff system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    bomb_item: &'static str,
    fallback_slot_command: &'static str,
}

impl Config {
    /// Creates a configuration for the given item and post-removal weapon switch.
    #[must_use]
    pub const fn new(bomb_item: &'static str, fallback_slot_command: &'static str) -> Self {
        Self {
            bomb_item,
            fallback_slot_command,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(BOMB_ITEM, FALLBACK_SLOT_COMMAND)
    }
}

/// Result of a handoff attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandoffOutcome {
    /// The winner received a fresh bomb.
    Granted {
        /// Player who now carries the bomb.
        winner: PlayerId,
    },
    /// The winner already carried the bomb; nothing was moved.
    Coincidence {
        /// Player who keeps the bomb.
        winner: PlayerId,
    },
    /// The winner could not receive the bomb.
    Skipped {
        /// Player who was selected.
        winner: PlayerId,
    },
}

/// System that performs the inventory side of a selection.
#[derive(Clone, Copy, Debug, Default)]
pub struct Handoff {
    config: Config,
}

impl Handoff {
    /// Creates a new handoff system using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Hands the bomb to `winner` and tells the other candidates they lost.
    pub fn resolve<H>(
        &self,
        host: &mut H,
        winner: PlayerId,
        candidates: &[PlayerId],
    ) -> HandoffOutcome
    where
        H: Host + ?Sized,
    {
        let outcome = self.move_bomb(host, winner);
        for loser in candidates.iter().copied().filter(|player| *player != winner) {
            send_notice(host, loser, &Notice::NoLuck);
        }
        tracing::info!(?outcome, candidates = candidates.len(), "bomb request resolved");
        outcome
    }

    /// Finds the connected player currently carrying the bomb.
    ///
    /// Players whose inventory cannot be read are skipped.
    pub fn find_carrier<H>(&self, host: &H) -> Option<PlayerId>
    where
        H: Host + ?Sized,
    {
        host.players()
            .into_iter()
            .filter(|snapshot| snapshot.is_connected())
            .find_map(|snapshot| match host.carried_items(snapshot.id) {
                Ok(items) => items.iter().any(|item| is_bomb(item)).then_some(snapshot.id),
                Err(error) => {
                    tracing::warn!(player = ?snapshot.id, %error, "failed to inspect inventory");
                    None
                }
            })
    }

    fn move_bomb<H>(&self, host: &mut H, winner: PlayerId) -> HandoffOutcome
    where
        H: Host + ?Sized,
    {
        let carrier = self.find_carrier(host);
        if carrier == Some(winner) {
            send_notice(host, winner, &Notice::Coincidence);
            return HandoffOutcome::Coincidence { winner };
        }

        match carrier {
            Some(carrier) => self.strip_from_player(host, carrier),
            None => self.strip_from_ground(host),
        }

        let eligible = host
            .player(winner)
            .is_some_and(|snapshot| snapshot.is_alive_terrorist());
        if !eligible {
            tracing::info!(?winner, "selected player cannot carry the bomb");
            return HandoffOutcome::Skipped { winner };
        }

        if let Err(error) = host.give_item(winner, self.config.bomb_item) {
            tracing::warn!(?winner, %error, "failed to give bomb");
            return HandoffOutcome::Skipped { winner };
        }
        send_notice(host, winner, &Notice::BombGranted);
        HandoffOutcome::Granted { winner }
    }

    fn strip_from_player<H>(&self, host: &mut H, carrier: PlayerId)
    where
        H: Host + ?Sized,
    {
        let items = match host.carried_items(carrier) {
            Ok(items) => items,
            Err(error) => {
                tracing::warn!(?carrier, %error, "failed to read carrier inventory");
                return;
            }
        };

        for item in items.iter().filter(|item| is_bomb(item)) {
            if let Err(error) = host.remove_item(carrier, item) {
                tracing::warn!(?carrier, %error, "failed to remove bomb from carrier");
                continue;
            }
            let switched = host.execute_client_command(carrier, self.config.fallback_slot_command);
            if let Err(error) = switched {
                tracing::warn!(?carrier, %error, "failed to switch carrier weapon");
            }
        }
    }

    fn strip_from_ground<H>(&self, host: &mut H)
    where
        H: Host + ?Sized,
    {
        match host.remove_unattended_items(self.config.bomb_item) {
            Ok(removed) => tracing::debug!(removed, "removed unattended bombs"),
            Err(error) => tracing::warn!(%error, "failed to remove unattended bombs"),
        }
    }
}
