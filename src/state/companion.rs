//! Companion tracker state machine
//!
//! Counts play time up while the user is active, then counts the same
//! amount back down as rest, signaling completion with a tone.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::audio::{tone, ToneCue, ToneSender};
use crate::utils::format_clock;

/// Phase of the companion tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanionPhase {
    Idle,
    Playing,
    Resting,
    RestComplete,
}

impl CompanionPhase {
    pub fn label(&self) -> &'static str {
        match self {
            CompanionPhase::Idle => "IDLE",
            CompanionPhase::Playing => "PLAYING",
            CompanionPhase::Resting => "RESTING",
            CompanionPhase::RestComplete => "REST_COMPLETE",
        }
    }
}

/// Count-up/count-down tracker state machine.
///
/// The rest countdown always starts from the play time accumulated in the
/// preceding playing phase.
#[derive(Debug)]
pub struct CompanionTracker {
    play_elapsed: u64,
    rest_remaining: u64,
    phase: CompanionPhase,
    running: bool,
    tone_tx: ToneSender,
}

impl CompanionTracker {
    pub fn new(tone_tx: ToneSender) -> Self {
        Self {
            play_elapsed: 0,
            rest_remaining: 0,
            phase: CompanionPhase::Idle,
            running: false,
            tone_tx,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn phase(&self) -> CompanionPhase {
        self.phase
    }

    pub fn play_elapsed(&self) -> u64 {
        self.play_elapsed
    }

    pub fn rest_remaining(&self) -> u64 {
        self.rest_remaining
    }

    /// Begin tracking play time from a clean slate. No-op while already
    /// playing.
    pub fn start(&mut self) -> bool {
        if self.phase == CompanionPhase::Playing {
            return false;
        }
        self.play_elapsed = 0;
        self.rest_remaining = 0;
        self.phase = CompanionPhase::Playing;
        self.running = true;
        info!("Tracker playing, counting up");
        true
    }

    /// End the playing phase and begin resting for as long as the play
    /// phase lasted. No-op unless playing.
    pub fn stop_and_rest(&mut self) -> bool {
        if self.phase != CompanionPhase::Playing {
            return false;
        }
        self.send_tone(ToneCue::phase(tone::TRACKER_STOP_HZ));
        self.rest_remaining = self.play_elapsed;
        self.phase = CompanionPhase::Resting;
        info!(
            "Tracker resting, counting down from {}",
            format_clock(self.rest_remaining)
        );
        true
    }

    /// Advance the tracker by one second. No-op unless running.
    ///
    /// The rest boundary is checked before decrementing, so the countdown
    /// never goes below zero.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }
        match self.phase {
            CompanionPhase::Playing => {
                self.play_elapsed += 1;
            }
            CompanionPhase::Resting => {
                if self.rest_remaining == 0 {
                    self.send_tone(ToneCue::phase(tone::TRACKER_COMPLETE_HZ));
                    self.phase = CompanionPhase::RestComplete;
                    self.running = false;
                    info!("Tracker rest complete");
                } else {
                    self.rest_remaining -= 1;
                }
            }
            CompanionPhase::Idle | CompanionPhase::RestComplete => {}
        }
    }

    /// Clear all counters and return to idle.
    pub fn reset(&mut self) {
        self.play_elapsed = 0;
        self.rest_remaining = 0;
        self.phase = CompanionPhase::Idle;
        self.running = false;
        info!("Tracker reset");
    }

    fn send_tone(&self, cue: ToneCue) {
        if let Err(e) = self.tone_tx.try_send(cue) {
            warn!("Failed to queue tone cue: {}", e);
        }
    }

    fn status_message(&self) -> String {
        match self.phase {
            CompanionPhase::Idle => "Press start to begin tracking.".to_string(),
            CompanionPhase::Playing => "PLAYING... tracking time.".to_string(),
            CompanionPhase::Resting => format!(
                "RESTING. Counting down from {}.",
                format_clock(self.play_elapsed)
            ),
            CompanionPhase::RestComplete => "REST COMPLETE. Press reset to clear.".to_string(),
        }
    }

    /// Capture the observable state for a display layer.
    pub fn snapshot(&self) -> CompanionSnapshot {
        CompanionSnapshot {
            phase: self.phase.label().to_string(),
            running: self.running,
            play_time: format_clock(self.play_elapsed),
            rest_time: format_clock(self.rest_remaining),
            status: self.status_message(),
            can_start: self.phase == CompanionPhase::Idle,
            can_stop: self.phase == CompanionPhase::Playing,
            can_reset: matches!(
                self.phase,
                CompanionPhase::Resting | CompanionPhase::RestComplete
            ),
        }
    }
}

/// Observable companion tracker state for a display layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanionSnapshot {
    pub phase: String,
    pub running: bool,
    pub play_time: String,
    pub rest_time: String,
    pub status: String,
    pub can_start: bool,
    pub can_stop: bool,
    pub can_reset: bool,
}
