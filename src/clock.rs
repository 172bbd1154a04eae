//! Simulation clock - elapsed time tracking and step-size selection.
//!
//! The step size is picked from a fixed, ordered preset list by index; the
//! presentation layer only ever moves the index up or down. Elapsed time is
//! a plain signed accumulator, and the calendar-like breakdown shown next to
//! it is recomputed fresh from the accumulator on every query (never updated
//! incrementally, so repeated rounding cannot drift).

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Ordered step-size presets in simulated seconds per tick.
///
/// Negative entries run time backwards; the large tail entries trade
/// stability for coarse time-lapse.
pub const STEP_PRESETS: [f64; 22] = [
    -100_000.0, -10_000.0, -100.0, 1.0, 2.0, 3.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0,
    1_000.0, 5_000.0, 10_000.0, 25_000.0, 100_000.0, 200_000.0, 350_000.0, 500_000.0, 1_000_000.0,
];

/// Default preset index, selecting a step of 1 second.
pub const DEFAULT_STEP_INDEX: usize = 3;

// Display convention: 360-day year, 30-day month.
const SECS_PER_MINUTE: f64 = 60.0;
const SECS_PER_HOUR: f64 = 3600.0;
const SECS_PER_DAY: f64 = SECS_PER_HOUR * 24.0;
const SECS_PER_YEAR: f64 = SECS_PER_DAY * 30.0 * 12.0;

/// Calendar-like decomposition of elapsed simulated time.
///
/// Purely a display derivation; the authoritative state is the elapsed
/// seconds accumulator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBreakdown {
    pub years: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

/// Tracks cumulative simulated time and the active step-size preset.
#[derive(Resource, Debug, Clone)]
pub struct SimulationClock {
    elapsed: f64,
    index: usize,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self {
            elapsed: 0.0,
            index: DEFAULT_STEP_INDEX,
        }
    }
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed simulated time in seconds (signed).
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Current step size in simulated seconds per tick.
    pub fn step_size(&self) -> f64 {
        STEP_PRESETS[self.index]
    }

    /// Current index into [`STEP_PRESETS`].
    pub fn step_index(&self) -> usize {
        self.index
    }

    /// Select a preset by index. Out-of-range requests are ignored and the
    /// current step stays unchanged.
    pub fn set_index(&mut self, index: usize) {
        if index < STEP_PRESETS.len() {
            self.index = index;
        }
    }

    /// Move the preset index by a signed delta. Moves that would leave the
    /// preset list are ignored.
    pub fn shift_index(&mut self, delta: i32) {
        let target = self.index as i64 + delta as i64;
        if (0..STEP_PRESETS.len() as i64).contains(&target) {
            self.index = target as usize;
        }
    }

    /// Accumulate one tick's worth of simulated time.
    pub fn advance(&mut self, step: f64) {
        self.elapsed += step;
    }

    /// Decompose elapsed time under the 360-day-year / 30-day-month
    /// convention. Uses floored division so negative elapsed time yields
    /// negative years with positive sub-fields, matching `%` semantics.
    pub fn breakdown(&self) -> TimeBreakdown {
        let mut s = self.elapsed;

        let years = s.div_euclid(SECS_PER_YEAR);
        s = s.rem_euclid(SECS_PER_YEAR);

        let days = s.div_euclid(SECS_PER_DAY);
        s = s.rem_euclid(SECS_PER_DAY);

        let hours = s.div_euclid(SECS_PER_HOUR);
        s = s.rem_euclid(SECS_PER_HOUR);

        let minutes = s.div_euclid(SECS_PER_MINUTE);
        s = s.rem_euclid(SECS_PER_MINUTE);

        TimeBreakdown {
            years: years as i64,
            days: days as i64,
            hours: hours as i64,
            minutes: minutes as i64,
            seconds: s.round() as i64,
        }
    }
}

/// System that accumulates the tick's step into elapsed time. Runs last in
/// the tick chain, after all bodies have moved.
pub fn clock_advance_system(
    step: Res<crate::systems::motion::StepSize>,
    mut clock: ResMut<SimulationClock>,
) {
    clock.advance(step.0);
}
