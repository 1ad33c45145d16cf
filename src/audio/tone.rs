//! Tone cue definitions shared by both timers

use std::time::Duration;

/// Start of a PLAY phase (high pitch).
pub const PLAY_TONE_HZ: f32 = 660.0;
/// Start of a REST phase (medium pitch).
pub const REST_TONE_HZ: f32 = 440.0;
/// Rest countdown warnings, rising pitch toward the phase boundary.
pub const WARNING_3S_HZ: f32 = 800.0;
pub const WARNING_2S_HZ: f32 = 850.0;
pub const WARNING_1S_HZ: f32 = 900.0;
/// Companion tracker: play stopped, rest countdown begins.
pub const TRACKER_STOP_HZ: f32 = 550.0;
/// Companion tracker: rest countdown finished.
pub const TRACKER_COMPLETE_HZ: f32 = 750.0;

const PHASE_TONE_SECS: f32 = 1.0;
const WARNING_TONE_SECS: f32 = 0.1;

/// A single audible cue: a sine tone at `frequency_hz` held for `duration`,
/// enveloped from half amplitude down to silence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneCue {
    pub frequency_hz: f32,
    pub duration: Duration,
}

impl ToneCue {
    pub fn new(frequency_hz: f32, duration: Duration) -> Self {
        Self {
            frequency_hz,
            duration,
        }
    }

    /// One-second phase transition tone.
    pub fn phase(frequency_hz: f32) -> Self {
        Self::new(frequency_hz, Duration::from_secs_f32(PHASE_TONE_SECS))
    }

    /// Quick beep for the final seconds of a rest countdown.
    pub fn warning(frequency_hz: f32) -> Self {
        Self::new(frequency_hz, Duration::from_secs_f32(WARNING_TONE_SECS))
    }
}
