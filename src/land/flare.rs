//! Flare sequencer.
//!
//! Near touchdown the throttle is pulled smoothly to idle while the pitch
//! target is blended to the flare pitch over a fixed window.

/// Pitch and throttle commanded during the flare.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlareCommand {
    /// Pitch target (in degrees).
    pub pitch_deg: f64,

    /// Throttle in [0, 1].
    pub throttle: f64,
}

/// Reference values captured at the start of the flare.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Flare {
    /// Time (in seconds) the flare started.
    pub start_time: f64,
    pub approach_throttle: f64,
    pub approach_pitch_deg: f64,

    /// Pitch change (in degrees) from the approach pitch to the flare pitch.
    pub pitch_range_deg: f64,
}

impl Flare {
    pub fn start(now: f64, throttle: f64, pitch_deg: f64, flare_pitch_deg: f64) -> Self {
        Self {
            start_time: now,
            approach_throttle: throttle,
            approach_pitch_deg: pitch_deg,
            pitch_range_deg: pitch_deg - flare_pitch_deg,
        }
    }

    /// The blended command at time `now`.
    ///
    /// A flare window of 0.01 seconds or less jumps straight to the flare
    /// pitch with idle throttle.
    pub fn command(&self, now: f64, flare_seconds: f64, flare_pitch_deg: f64) -> FlareCommand {
        if flare_seconds > 0.01 {
            let percent = ((now - self.start_time) / flare_seconds).clamp(0.0, 1.0);
            FlareCommand {
                pitch_deg: self.approach_pitch_deg - percent * self.pitch_range_deg,
                throttle: self.approach_throttle * (1.0 - percent),
            }
        } else {
            FlareCommand {
                pitch_deg: flare_pitch_deg,
                throttle: 0.0,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, -2.0, 0.6)]
    #[case(2.5, -5.0, 0.3)]
    #[case(5.0, -8.0, 0.0)]
    #[case(9.0, -8.0, 0.0)]
    fn blends_linearly_over_the_window(
        #[case] elapsed: f64,
        #[case] pitch_deg: f64,
        #[case] throttle: f64,
    ) {
        let flare = Flare::start(100.0, 0.6, -2.0, -8.0);
        assert_relative_eq!(flare.pitch_range_deg, 6.0);

        let command = flare.command(100.0 + elapsed, 5.0, -8.0);
        assert_relative_eq!(command.pitch_deg, pitch_deg, epsilon = 1e-12);
        assert_relative_eq!(command.throttle, throttle, epsilon = 1e-12);
    }

    #[test]
    fn clock_running_backwards_holds_approach_values() {
        let flare = Flare::start(100.0, 0.6, -2.0, -8.0);
        let command = flare.command(99.0, 5.0, -8.0);
        assert_eq!(command.pitch_deg, -2.0);
        assert_eq!(command.throttle, 0.6);
    }

    #[test]
    fn zero_window_cuts_to_flare_pitch() {
        let flare = Flare::start(100.0, 0.6, -2.0, -8.0);
        let command = flare.command(100.0, 0.0, 3.0);
        assert_eq!(
            command,
            FlareCommand {
                pitch_deg: 3.0,
                throttle: 0.0
            }
        );
    }
}
