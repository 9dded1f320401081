#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! One-shot timer that defers the bomb selection past round start.
//!
//! Round-start game logic hands out the bomb itself; the selection waits a
//! short delay so that logic has settled before the handoff runs.

use std::time::Duration;

use bomb_request_core::{Command, Event, ROUND_START_DELAY};

/// Configuration parameters required to construct the round timer.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    delay: Duration,
}

impl Config {
    /// Creates a new configuration with the provided delay.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(ROUND_START_DELAY)
    }
}

/// Pure system that emits one selection command per live round.
#[derive(Debug)]
pub struct RoundTimer {
    delay: Duration,
    pending: Vec<Duration>,
}

impl RoundTimer {
    /// Creates a new round timer using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            delay: config.delay,
            pending: Vec::new(),
        }
    }

    /// Number of armed timers that have not fired yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Consumes world events and emits [`Command::ResolveSelection`] on expiry.
    ///
    /// Armed timers count down on every `TimeAdvanced` that follows the round start.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        let mut armed = 0;
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => self.advance(*dt, out),
                Event::LiveRoundStarted => {
                    self.pending.push(self.delay);
                    armed += 1;
                }
                _ => {}
            }
        }

        if armed > 0 && self.delay.is_zero() {
            self.advance(Duration::ZERO, out);
        }
    }

    fn advance(&mut self, dt: Duration, out: &mut Vec<Command>) {
        let before = self.pending.len();
        self.pending.retain_mut(|remaining| {
            *remaining = remaining.saturating_sub(dt);
            !remaining.is_zero()
        });
        for _ in self.pending.len()..before {
            out.push(Command::ResolveSelection);
        }
    }
}
