//! Capture phases
//!
//! The gesture recorded in the world file decides how often the scene is
//! reshuffled. Two gestures are timed sequences (a full-time whistle and a
//! substitution); everything else is a static pose that gets a fresh scene on
//! every tick.

use serde::{Deserialize, Serialize};

/// Scheduling phase, fixed for the whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Settle, then randomize and capture every tick
    #[default]
    Continuous,
    /// Randomize every 0.6 s starting 1.26 s in
    PeriodicFullTime,
    /// Randomize every 0.44 s starting 0.94 s in
    PeriodicSubstitution,
}

/// How often randomization repeats once it has started
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Cadence {
    EveryTick,
    /// Fixed simulated-time interval in seconds
    Every(f64),
}

/// Phase constants driving the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseTiming {
    /// Delay after start before the first randomization; also the capture gate
    pub first_offset: f64,
    pub cadence: Cadence,
}

impl Phase {
    /// Map a gesture label to its phase. Total: unknown labels are continuous.
    pub fn from_gesture(gesture: &str) -> Self {
        match gesture {
            "full_time" => Phase::PeriodicFullTime,
            "substitution" => Phase::PeriodicSubstitution,
            _ => Phase::Continuous,
        }
    }

    pub fn timing(&self) -> PhaseTiming {
        match self {
            Phase::Continuous => PhaseTiming {
                first_offset: 3.0,
                cadence: Cadence::EveryTick,
            },
            Phase::PeriodicFullTime => PhaseTiming {
                first_offset: 1.26,
                cadence: Cadence::Every(0.6),
            },
            Phase::PeriodicSubstitution => PhaseTiming {
                first_offset: 0.94,
                cadence: Cadence::Every(0.44),
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Continuous => "continuous",
            Phase::PeriodicFullTime => "full_time",
            Phase::PeriodicSubstitution => "substitution",
        }
    }
}

impl Cadence {
    /// Next due time after a randomization that was due at `due`
    pub fn advance(&self, due: f64) -> f64 {
        match self {
            Cadence::EveryTick => due,
            Cadence::Every(interval) => due + interval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_gestures() {
        assert_eq!(Phase::from_gesture("full_time"), Phase::PeriodicFullTime);
        assert_eq!(Phase::from_gesture("substitution"), Phase::PeriodicSubstitution);
    }

    #[test]
    fn test_everything_else_is_continuous() {
        for label in ["", "goal", "Full_Time", "full_time ", "substitutions", "kick_off"] {
            assert_eq!(Phase::from_gesture(label), Phase::Continuous, "{label:?}");
        }
    }

    #[test]
    fn test_timing_constants() {
        let t = Phase::PeriodicFullTime.timing();
        assert_eq!(t.first_offset, 1.26);
        assert_eq!(t.cadence, Cadence::Every(0.6));

        let t = Phase::PeriodicSubstitution.timing();
        assert_eq!(t.first_offset, 0.94);
        assert_eq!(t.cadence, Cadence::Every(0.44));

        let t = Phase::Continuous.timing();
        assert_eq!(t.first_offset, 3.0);
        assert_eq!(t.cadence, Cadence::EveryTick);
    }

    #[test]
    fn test_every_tick_never_moves_deadline() {
        assert_eq!(Cadence::EveryTick.advance(3.0), 3.0);
        assert!((Cadence::Every(0.6).advance(1.26) - 1.86).abs() < 1e-12);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Only the two exact labels pick a periodic phase
            #[test]
            fn prop_resolver_total(label in ".*") {
                let phase = Phase::from_gesture(&label);
                let expected = match label.as_str() {
                    "full_time" => Phase::PeriodicFullTime,
                    "substitution" => Phase::PeriodicSubstitution,
                    _ => Phase::Continuous,
                };
                prop_assert_eq!(phase, expected);
            }
        }
    }
}
