//! The speed/direction state machine.
//!
//! Pure over a [`LocRecord`]: no I/O, no storage. [`adjust`] applies one
//! dial detent (or press, for a delta of zero) to the record's drive state
//! and reports what changed. Speed adjustments never persist: drive state
//! is runtime state, and records hit storage only through catalog
//! operations.
//!
//! Two mutually exclusive policies exist, selected by the persisted
//! AC-option flag:
//!
//! - [`DrivePolicy::Momentum`] (AC off): the dial owns direction. Turning
//!   with the loc's travel speeds it up, turning against slows it down, and
//!   the only way to reverse is through a standstill.
//! - [`DrivePolicy::IndependentDirection`] (AC on): the dial only changes
//!   magnitude; direction moves solely via the explicit stop/reverse press
//!   or a direction-set control.

use locroster_types::{DecoderSteps, Direction, LocRecord};

/// Speed above which a 128-step decoder moves in coarse ±2 steps.
const COARSE_THRESHOLD: u16 = 20;

/// Throttle drive policy, from the persisted AC-option flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrivePolicy {
    /// Direction follows the speed dial (AC option off).
    Momentum,
    /// Direction changes only via an explicit control (AC option on).
    IndependentDirection,
}

impl DrivePolicy {
    /// Maps the stored AC-option flag to a policy.
    pub fn from_ac_option(ac_on: bool) -> Self {
        if ac_on {
            Self::IndependentDirection
        } else {
            Self::Momentum
        }
    }
}

/// A speed adjustment that changed drive state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedAdjust {
    /// The new speed, clamped to the decoder's maximum.
    pub speed: u16,
    /// Whether the decoder maximum clipped the requested step.
    pub clamped: bool,
}

/// Applies one speed-dial event to a record's drive state.
///
/// Returns `None` when nothing about the drive state changed (a decrease
/// already at standstill under [`DrivePolicy::IndependentDirection`]).
/// A direction reversal at standstill reports the unchanged speed as a
/// change; callers must retransmit the loc state either way.
pub fn adjust(record: &mut LocRecord, policy: DrivePolicy, delta: i8) -> Option<SpeedAdjust> {
    match policy {
        DrivePolicy::Momentum => {
            if delta == 0 {
                Some(stop_or_reverse(record))
            } else if delta > 0 {
                if record.speed == 0 && record.direction == Direction::Backward {
                    // The reversal consumes the increase press.
                    record.direction = Direction::Forward;
                    Some(SpeedAdjust {
                        speed: record.speed,
                        clamped: false,
                    })
                } else if record.direction == Direction::Forward {
                    Some(increase(record))
                } else {
                    decrease(record)
                }
            } else if record.speed == 0 && record.direction == Direction::Forward {
                record.direction = Direction::Backward;
                Some(SpeedAdjust {
                    speed: record.speed,
                    clamped: false,
                })
            } else if record.direction == Direction::Forward {
                decrease(record)
            } else {
                Some(increase(record))
            }
        }
        DrivePolicy::IndependentDirection => {
            if delta > 0 {
                Some(increase(record))
            } else if delta < 0 {
                decrease(record)
            } else {
                Some(stop_or_reverse(record))
            }
        }
    }
}

/// One step up, coarse above the 128-step threshold, clamped to the mode
/// maximum.
fn increase(record: &mut LocRecord) -> SpeedAdjust {
    let step = if record.steps == DecoderSteps::Step128 && record.speed >= COARSE_THRESHOLD {
        2
    } else {
        1
    };
    let max = record.steps.max_speed();
    let raw = record.speed + step;
    let clamped = raw > max;
    record.speed = raw.min(max);
    SpeedAdjust {
        speed: record.speed,
        clamped,
    }
}

/// One step down, floored at 0. Also clamps: a stored speed above the mode
/// maximum comes back inside the envelope on the first adjustment.
fn decrease(record: &mut LocRecord) -> Option<SpeedAdjust> {
    if record.speed == 0 {
        return None;
    }
    let step = if record.steps == DecoderSteps::Step128 && record.speed > COARSE_THRESHOLD {
        2
    } else {
        1
    };
    let max = record.steps.max_speed();
    let raw = record.speed.saturating_sub(step);
    let clamped = raw > max;
    record.speed = raw.min(max);
    Some(SpeedAdjust {
        speed: record.speed,
        clamped,
    })
}

/// Stop a moving loc; reverse a standing one.
fn stop_or_reverse(record: &mut LocRecord) -> SpeedAdjust {
    if record.speed == 0 {
        record.direction = record.direction.opposite();
    } else {
        record.speed = 0;
    }
    SpeedAdjust {
        speed: 0,
        clamped: false,
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn record(speed: u16, direction: Direction, steps: DecoderSteps) -> LocRecord {
        LocRecord {
            speed,
            direction,
            steps,
            ..LocRecord::default_seed()
        }
    }

    // ========================================================================
    // Momentum policy (AC off)
    // ========================================================================

    #[test]
    fn momentum_increase_with_travel() {
        let mut loc = record(5, Direction::Forward, DecoderSteps::Step28);
        let adj = adjust(&mut loc, DrivePolicy::Momentum, 1).unwrap();
        assert_eq!(adj.speed, 6);
        assert!(!adj.clamped);
        assert_eq!(loc.direction, Direction::Forward);
    }

    #[test]
    fn momentum_increase_against_travel_decreases() {
        let mut loc = record(5, Direction::Backward, DecoderSteps::Step28);
        let adj = adjust(&mut loc, DrivePolicy::Momentum, 1).unwrap();
        assert_eq!(adj.speed, 4);
        assert_eq!(loc.direction, Direction::Backward);
    }

    #[test]
    fn momentum_reversal_consumes_the_press() {
        // Standing backward, increase: direction flips, speed stays 0
        let mut loc = record(0, Direction::Backward, DecoderSteps::Step28);
        let adj = adjust(&mut loc, DrivePolicy::Momentum, 1).unwrap();
        assert_eq!(loc.direction, Direction::Forward);
        assert_eq!(adj.speed, 0);
        assert_eq!(loc.speed, 0);
    }

    #[test]
    fn momentum_reversal_is_symmetric() {
        // Standing forward, decrease: direction flips, speed stays 0
        let mut loc = record(0, Direction::Forward, DecoderSteps::Step28);
        let adj = adjust(&mut loc, DrivePolicy::Momentum, -1).unwrap();
        assert_eq!(loc.direction, Direction::Backward);
        assert_eq!(adj.speed, 0);
    }

    #[test]
    fn momentum_backward_decrease_accelerates() {
        let mut loc = record(3, Direction::Backward, DecoderSteps::Step28);
        let adj = adjust(&mut loc, DrivePolicy::Momentum, -1).unwrap();
        assert_eq!(adj.speed, 4);
    }

    #[test]
    fn momentum_stop_then_toggle() {
        let mut loc = record(12, Direction::Forward, DecoderSteps::Step28);

        // First press stops
        let adj = adjust(&mut loc, DrivePolicy::Momentum, 0).unwrap();
        assert_eq!(adj.speed, 0);
        assert_eq!(loc.direction, Direction::Forward);

        // Second press reverses
        adjust(&mut loc, DrivePolicy::Momentum, 0).unwrap();
        assert_eq!(loc.direction, Direction::Backward);
        assert_eq!(loc.speed, 0);
    }

    // ========================================================================
    // Independent-direction policy (AC on)
    // ========================================================================

    #[test]
    fn independent_delta_sign_never_reverses() {
        let mut loc = record(0, Direction::Backward, DecoderSteps::Step28);
        let adj = adjust(&mut loc, DrivePolicy::IndependentDirection, 1).unwrap();
        assert_eq!(adj.speed, 1);
        assert_eq!(loc.direction, Direction::Backward);
    }

    #[test]
    fn independent_decrease_at_standstill_is_unchanged() {
        let mut loc = record(0, Direction::Forward, DecoderSteps::Step28);
        assert_eq!(adjust(&mut loc, DrivePolicy::IndependentDirection, -1), None);
        assert_eq!(loc.speed, 0);
        assert_eq!(loc.direction, Direction::Forward);
    }

    #[test]
    fn independent_stop_press_is_the_only_reverse_trigger() {
        let mut loc = record(8, Direction::Forward, DecoderSteps::Step28);
        adjust(&mut loc, DrivePolicy::IndependentDirection, 0).unwrap();
        assert_eq!(loc.speed, 0);
        adjust(&mut loc, DrivePolicy::IndependentDirection, 0).unwrap();
        assert_eq!(loc.direction, Direction::Backward);
    }

    // ========================================================================
    // Stepping and clamping
    // ========================================================================

    #[test]
    fn coarse_step_kicks_in_at_threshold() {
        let mut loc = record(19, Direction::Forward, DecoderSteps::Step128);
        assert_eq!(adjust(&mut loc, DrivePolicy::Momentum, 1).unwrap().speed, 20);
        assert_eq!(adjust(&mut loc, DrivePolicy::Momentum, 1).unwrap().speed, 22);
    }

    #[test]
    fn coarse_decrease_threshold_is_exclusive() {
        // 21 > 20: coarse; 20 is not
        let mut loc = record(21, Direction::Forward, DecoderSteps::Step128);
        assert_eq!(adjust(&mut loc, DrivePolicy::Momentum, -1).unwrap().speed, 19);

        let mut loc = record(20, Direction::Forward, DecoderSteps::Step128);
        assert_eq!(adjust(&mut loc, DrivePolicy::Momentum, -1).unwrap().speed, 19);
    }

    #[test]
    fn coarse_stepping_is_fine_below_128_mode() {
        let mut loc = record(25, Direction::Forward, DecoderSteps::Step28);
        assert_eq!(adjust(&mut loc, DrivePolicy::Momentum, 1).unwrap().speed, 26);
    }

    #[test_case(DecoderSteps::Step14, 14; "14 step")]
    #[test_case(DecoderSteps::Step28, 28; "28 step")]
    #[test_case(DecoderSteps::Step128, 127; "128 step")]
    fn increase_at_maximum_clamps(steps: DecoderSteps, max: u16) {
        let mut loc = record(max, Direction::Forward, steps);
        let adj = adjust(&mut loc, DrivePolicy::Momentum, 1).unwrap();
        assert_eq!(adj.speed, max);
        assert!(adj.clamped);
    }

    #[test]
    fn coarse_step_over_the_top_clamps_to_127() {
        let mut loc = record(126, Direction::Forward, DecoderSteps::Step128);
        let adj = adjust(&mut loc, DrivePolicy::Momentum, 1).unwrap();
        assert_eq!(adj.speed, 127);
        assert!(adj.clamped);
    }

    #[test]
    fn out_of_envelope_speed_comes_back_on_first_touch() {
        // A stored speed above the mode maximum (torn or foreign image)
        let mut loc = record(200, Direction::Forward, DecoderSteps::Step14);
        let adj = adjust(&mut loc, DrivePolicy::Momentum, -1).unwrap();
        assert_eq!(adj.speed, 14);
        assert!(adj.clamped);
    }

    #[test]
    fn decrease_floors_at_zero() {
        let mut loc = record(1, Direction::Forward, DecoderSteps::Step28);
        assert_eq!(adjust(&mut loc, DrivePolicy::Momentum, -1).unwrap().speed, 0);
    }
}
