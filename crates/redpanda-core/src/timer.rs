//! Game timers
//!
//! A [`TimerRegistry`] owns every timer created by gameplay code. The core
//! plugin ticks it once per frame with the elapsed game time; gameplay code
//! polls `expired` and requests a restart through `queue_reset`.

use std::collections::HashMap;

use rand::Rng;
use uuid::Uuid;

/// Identifier handed out by [`TimerRegistry::create`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(Uuid);

impl std::fmt::Display for TimerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A countdown measured in seconds of game time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timer {
    /// Accumulated time
    pub timer: f32,
    /// Time after which the timer counts as expired
    pub timeout: f32,
    pub expired: bool,
    /// Whether a new timeout is drawn from the range on every reset
    pub random_timeout: bool,
    pub timer_range_begin: f32,
    pub timer_range_end: f32,
    /// Restart the timer on the next tick
    pub queue_reset: bool,
}

impl Timer {
    /// A timer that expires after a fixed timeout
    pub fn fixed(timeout: f32) -> Self {
        Self {
            timeout,
            ..Default::default()
        }
    }

    /// A timer whose timeout is drawn uniformly from `begin..=end` on each reset
    pub fn random(begin: f32, end: f32) -> Self {
        let (begin, end) = if begin <= end { (begin, end) } else { (end, begin) };
        Self {
            random_timeout: true,
            timer_range_begin: begin,
            timer_range_end: end,
            ..Default::default()
        }
    }

    /// Start counting from `value` instead of zero
    pub fn with_initial_value(mut self, value: f32) -> Self {
        self.timer = value;
        self
    }

    fn draw_timeout<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.timeout = if self.timer_range_begin < self.timer_range_end {
            rng.gen_range(self.timer_range_begin..=self.timer_range_end)
        } else {
            self.timer_range_begin
        };
    }

    /// Advance the timer by `elapsed` seconds, applying a queued reset first.
    ///
    /// A fixed timer that was expired when reset keeps the overshoot past its
    /// timeout; a random timer restarts from zero with a fresh timeout.
    pub fn tick<R: Rng + ?Sized>(&mut self, elapsed: f32, rng: &mut R) {
        if self.queue_reset {
            let was_expired = self.expired;
            self.queue_reset = false;
            self.expired = false;
            if self.random_timeout {
                self.timer = 0.0;
                self.draw_timeout(rng);
            } else if was_expired {
                self.timer = (self.timer - self.timeout).max(0.0);
            } else {
                self.timer = 0.0;
            }
        }

        self.timer += elapsed;
        if self.timer >= self.timeout {
            self.expired = true;
        }
    }
}

/// Errors raised by timer lookups
#[derive(Debug, Clone, thiserror::Error)]
pub enum TimerError {
    #[error("unknown timer: {0}")]
    NotFound(TimerId),
}

/// Owns all game timers, keyed by [`TimerId`]
#[derive(Debug, Default)]
pub struct TimerRegistry {
    timers: HashMap<TimerId, Timer>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a timer and return its id. Random timers get their first
    /// timeout drawn immediately.
    pub fn create(&mut self, mut timer: Timer) -> TimerId {
        if timer.random_timeout {
            timer.draw_timeout(&mut rand::thread_rng());
        }
        let id = TimerId(Uuid::new_v4());
        self.timers.insert(id, timer);
        id
    }

    pub fn timer(&self, id: TimerId) -> Result<&Timer, TimerError> {
        self.timers.get(&id).ok_or(TimerError::NotFound(id))
    }

    pub fn timer_mut(&mut self, id: TimerId) -> Result<&mut Timer, TimerError> {
        self.timers.get_mut(&id).ok_or(TimerError::NotFound(id))
    }

    /// Remove a timer, returning it
    pub fn remove(&mut self, id: TimerId) -> Result<Timer, TimerError> {
        self.timers.remove(&id).ok_or(TimerError::NotFound(id))
    }

    /// Advance every timer by `elapsed` seconds
    pub fn tick(&mut self, elapsed: f32) {
        self.tick_with_rng(elapsed, &mut rand::thread_rng());
    }

    /// Advance every timer using the given random source for random resets
    pub fn tick_with_rng<R: Rng + ?Sized>(&mut self, elapsed: f32, rng: &mut R) {
        for timer in self.timers.values_mut() {
            timer.tick(elapsed, rng);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (TimerId, &Timer)> {
        self.timers.iter().map(|(id, timer)| (*id, timer))
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
