//! Game clock and the deferred enemy turn.
//!
//! `draw_web()` calls at ~60fps with variable delta. [`GameTime`] converts
//! that into discrete ticks; [`TurnTimer`] counts ticks down to a one-shot
//! event that can be cancelled before it fires.

/// Fixed-timestep clock using an accumulator.
pub struct GameTime {
    ms_per_tick: f64,
    /// Milliseconds not yet consumed as ticks.
    accumulator: f64,
    pub total_ticks: u64,
    /// `None` until the first frame.
    last_timestamp: Option<f64>,
}

impl GameTime {
    pub fn new(ticks_per_sec: u32) -> Self {
        Self {
            ms_per_tick: 1000.0 / ticks_per_sec as f64,
            accumulator: 0.0,
            total_ticks: 0,
            last_timestamp: None,
        }
    }

    /// Feed a wall-clock timestamp in ms. Returns the ticks elapsed since the
    /// previous frame.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            // Clamp so a backgrounded tab doesn't replay seconds of ticks.
            Some(prev) => (now_ms - prev).clamp(0.0, 500.0),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let ticks = (self.accumulator / self.ms_per_tick) as u32;
        self.accumulator -= ticks as f64 * self.ms_per_tick;
        self.total_ticks += ticks as u64;
        ticks
    }
}

/// One-shot countdown in ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TurnTimer {
    remaining: Option<u32>,
}

impl TurnTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer, replacing any pending countdown.
    pub fn schedule(&mut self, ticks: u32) {
        self.remaining = Some(ticks);
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    pub fn is_armed(&self) -> bool {
        self.remaining.is_some()
    }

    pub fn remaining(&self) -> Option<u32> {
        self.remaining
    }

    /// Count down by `delta_ticks`. Returns `true` exactly once, on the call
    /// that reaches zero; the timer is disarmed afterwards.
    pub fn advance(&mut self, delta_ticks: u32) -> bool {
        match self.remaining {
            Some(left) if left <= delta_ticks => {
                self.remaining = None;
                true
            }
            Some(left) => {
                self.remaining = Some(left - delta_ticks);
                false
            }
            None => false,
        }
    }
}
