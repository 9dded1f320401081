//! Ordered, duplicate-free queue of players requesting the bomb.

use bomb_request_core::PlayerId;

/// Players who opted in during the current round, in enrollment order.
#[derive(Clone, Debug, Default)]
pub(crate) struct Roster {
    members: Vec<PlayerId>,
}

impl Roster {
    pub(crate) const fn new() -> Self {
        Self {
            members: Vec::new(),
        }
    }

    pub(crate) fn contains(&self, player: PlayerId) -> bool {
        self.members.contains(&player)
    }

    /// Appends the player. Returns `false` when the player was queued already.
    pub(crate) fn enroll(&mut self, player: PlayerId) -> bool {
        if self.contains(player) {
            return false;
        }
        self.members.push(player);
        true
    }

    /// Removes the player. Returns whether the player was a member.
    pub(crate) fn withdraw(&mut self, player: PlayerId) -> bool {
        let Some(position) = self.members.iter().position(|member| *member == player) else {
            return false;
        };
        let _ = self.members.remove(position);
        true
    }

    /// Empties the roster, yielding the removed members in enrollment order.
    pub(crate) fn reset(&mut self) -> Vec<PlayerId> {
        std::mem::take(&mut self.members)
    }

    pub(crate) fn members(&self) -> &[PlayerId] {
        &self.members
    }
}
