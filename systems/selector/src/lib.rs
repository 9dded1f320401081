#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Weighted random choice of the roster member who receives the bomb.
//!
//! Privileged members get a second chance rather than priority: when at least
//! one of them is queued, an unbiased coin decides whether the draw is
//! restricted to privileged members; otherwise everyone draws from the full
//! roster. Each step takes its randomness from a [`Dice`] source so callers can
//! pin outcomes.

use bomb_request_core::PlayerId;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of the two random decisions the selection needs.
pub trait Dice {
    /// Flips an unbiased coin; `true` means heads.
    fn coin_flip(&mut self) -> bool;

    /// Rolls a die with `sides` faces, returning a value in `0..sides`.
    ///
    /// Callers never pass zero.
    fn roll(&mut self, sides: usize) -> usize;
}

/// [`Dice`] backed by any [`Rng`].
#[derive(Clone, Debug)]
pub struct RngDice<R> {
    rng: R,
}

impl<R: Rng> RngDice<R> {
    /// Wraps the random number generator.
    #[must_use]
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Dice for RngDice<R> {
    fn coin_flip(&mut self) -> bool {
        self.rng.gen_range(0..2) == 0
    }

    fn roll(&mut self, sides: usize) -> usize {
        self.rng.gen_range(0..sides)
    }
}

/// Roster member annotated with the host's privilege lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    /// Queued player.
    pub player: PlayerId,
    /// Whether the player holds the privileged permission.
    pub privileged: bool,
}

impl Candidate {
    /// Creates a new candidate descriptor.
    #[must_use]
    pub const fn new(player: PlayerId, privileged: bool) -> Self {
        Self { player, privileged }
    }
}

/// Extracts the privileged subset of the candidates, preserving order.
#[must_use]
pub fn privileged(candidates: &[Candidate]) -> Vec<PlayerId> {
    candidates
        .iter()
        .filter(|candidate| candidate.privileged)
        .map(|candidate| candidate.player)
        .collect()
}

/// Decides whether this round's draw is restricted to privileged members.
///
/// The coin is only flipped when the privileged pool is non-empty.
pub fn restrict_to_privileged<D>(privileged: &[PlayerId], dice: &mut D) -> bool
where
    D: Dice + ?Sized,
{
    !privileged.is_empty() && dice.coin_flip()
}

/// Draws one player uniformly from the pool.
///
/// A pool of one is returned without consulting the dice.
pub fn draw<D>(pool: &[PlayerId], dice: &mut D) -> Option<PlayerId>
where
    D: Dice + ?Sized,
{
    match pool.len() {
        0 => None,
        1 => Some(pool[0]),
        len => Some(pool[dice.roll(len) % len]),
    }
}

/// Runs the full two-step selection over the candidates.
pub fn select<D>(candidates: &[Candidate], dice: &mut D) -> Option<PlayerId>
where
    D: Dice + ?Sized,
{
    match candidates {
        [] => return None,
        [only] => return Some(only.player),
        _ => {}
    }

    let privileged = privileged(candidates);
    if restrict_to_privileged(&privileged, dice) {
        return draw(&privileged, dice);
    }

    let everyone: Vec<PlayerId> = candidates.iter().map(|candidate| candidate.player).collect();
    draw(&everyone, dice)
}

/// Configuration parameters required to construct the selector.
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    seed: Option<u64>,
}

impl Config {
    /// Seeds the selector deterministically.
    #[must_use]
    pub const fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    /// Seeds the selector from operating system entropy.
    #[must_use]
    pub const fn from_entropy() -> Self {
        Self { seed: None }
    }
}

/// Dice used by the production selector.
pub type SeededDice = RngDice<ChaCha8Rng>;

/// Selection system owning its source of randomness.
#[derive(Clone, Debug)]
pub struct Selector<D = SeededDice> {
    dice: D,
}

impl Selector {
    /// Creates a new selector using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
        Self::with_dice(RngDice::new(ChaCha8Rng::seed_from_u64(seed)))
    }
}

impl<D: Dice> Selector<D> {
    /// Creates a selector drawing from the given dice.
    #[must_use]
    pub const fn with_dice(dice: D) -> Self {
        Self { dice }
    }

    /// Picks the roster member who receives the bomb.
    pub fn select(&mut self, candidates: &[Candidate]) -> Option<PlayerId> {
        select(candidates, &mut self.dice)
    }
}
