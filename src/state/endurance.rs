//! Progressive endurance timer state machine
//!
//! Alternates PLAY and REST phases, growing the rep duration by a
//! configurable increment after every completed rest.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::audio::{tone, ToneCue, ToneSender};
use crate::utils::format_clock;

/// Warning beeps are skipped for reps shorter than this.
const WARNING_MIN_REP_SECS: u64 = 4;

/// Phase of the endurance timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndurancePhase {
    Idle,
    Play,
    Rest,
}

impl EndurancePhase {
    pub fn label(&self) -> &'static str {
        match self {
            EndurancePhase::Idle => "IDLE",
            EndurancePhase::Play => "PLAY",
            EndurancePhase::Rest => "REST",
        }
    }
}

/// Progressive interval timer state machine.
///
/// Owns its counters exclusively; one-second ticks are delivered by a
/// single driver task via [`tick`](EnduranceTimer::tick).
#[derive(Debug)]
pub struct EnduranceTimer {
    starting_duration: u64,
    current_duration: u64,
    increment: u64,
    time_remaining: u64,
    phase: EndurancePhase,
    running: bool,
    tone_tx: ToneSender,
}

impl EnduranceTimer {
    /// Create a stopped timer with the given starting rep duration and
    /// per-rest increment. Starting durations below one second are raised
    /// to one.
    pub fn new(starting_duration: u64, increment: u64, tone_tx: ToneSender) -> Self {
        let starting_duration = starting_duration.max(1);
        Self {
            starting_duration,
            current_duration: starting_duration,
            increment,
            time_remaining: 0,
            phase: EndurancePhase::Idle,
            running: false,
            tone_tx,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn phase(&self) -> EndurancePhase {
        self.phase
    }

    pub fn starting_duration(&self) -> u64 {
        self.starting_duration
    }

    pub fn current_duration(&self) -> u64 {
        self.current_duration
    }

    pub fn increment(&self) -> u64 {
        self.increment
    }

    pub fn time_remaining(&self) -> u64 {
        self.time_remaining
    }

    /// Adjust the per-rest increment. Adjustments that would take the
    /// increment negative are rejected and leave it unchanged.
    pub fn adjust_increment(&mut self, delta: i64) -> bool {
        let adjusted = self.increment as i64 + delta;
        if adjusted < 0 {
            return false;
        }
        self.increment = adjusted as u64;
        info!("Increment set to {}s", self.increment);
        true
    }

    /// Adjust the starting rep duration, keeping it at one second or more.
    /// While stopped this also resets the current rep duration to the new
    /// value and clears the countdown.
    pub fn adjust_starting_duration(&mut self, delta: i64) -> bool {
        let adjusted = self.starting_duration as i64 + delta;
        if adjusted < 1 {
            return false;
        }
        self.starting_duration = adjusted as u64;
        if !self.running {
            self.current_duration = self.starting_duration;
            self.time_remaining = 0;
        }
        info!("Starting duration set to {}s", self.starting_duration);
        true
    }

    /// Begin the interval progression. No-op while already running.
    ///
    /// Always restarts from `starting_duration`, even after a `stop()`:
    /// pausing does not preserve progressive-duration progress.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.current_duration = self.starting_duration;
        self.enter_play();
        true
    }

    /// Halt the countdown. Phase, rep duration and remaining time are kept
    /// for display. No-op while not running.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        info!(
            "Endurance timer paused at rep {}s, {} remaining",
            self.current_duration,
            format_clock(self.time_remaining)
        );
        true
    }

    /// Stop and return to the configured starting duration.
    pub fn reset(&mut self) {
        self.running = false;
        self.phase = EndurancePhase::Idle;
        self.current_duration = self.starting_duration;
        self.time_remaining = 0;
        info!("Endurance timer reset to {}s", self.starting_duration);
    }

    /// Advance the countdown by one second. No-op unless running.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }
        match self.phase {
            EndurancePhase::Idle => {}
            EndurancePhase::Play => {
                self.time_remaining = self.time_remaining.saturating_sub(1);
                if self.time_remaining == 0 {
                    self.enter_rest();
                }
            }
            EndurancePhase::Rest => {
                self.time_remaining = self.time_remaining.saturating_sub(1);
                if self.current_duration >= WARNING_MIN_REP_SECS {
                    match self.time_remaining {
                        3 => self.send_tone(ToneCue::warning(tone::WARNING_3S_HZ)),
                        2 => self.send_tone(ToneCue::warning(tone::WARNING_2S_HZ)),
                        1 => self.send_tone(ToneCue::warning(tone::WARNING_1S_HZ)),
                        _ => {}
                    }
                }
                if self.time_remaining == 0 {
                    self.current_duration += self.increment;
                    self.enter_play();
                }
            }
        }
    }

    fn enter_play(&mut self) {
        self.phase = EndurancePhase::Play;
        self.time_remaining = self.current_duration;
        self.send_tone(ToneCue::phase(tone::PLAY_TONE_HZ));
        info!("PLAY for {}s", self.current_duration);
    }

    fn enter_rest(&mut self) {
        self.phase = EndurancePhase::Rest;
        self.time_remaining = self.current_duration;
        self.send_tone(ToneCue::phase(tone::REST_TONE_HZ));
        info!("REST for {}s", self.current_duration);
    }

    fn send_tone(&self, cue: ToneCue) {
        if let Err(e) = self.tone_tx.try_send(cue) {
            warn!("Failed to queue tone cue: {}", e);
        }
    }

    fn status_message(&self) -> String {
        match (self.phase, self.running) {
            (EndurancePhase::Idle, _) => format!(
                "Reset to {} seconds. Press start to begin.",
                self.starting_duration
            ),
            (EndurancePhase::Play, true) => format!("PLAY for {}s", self.current_duration),
            (EndurancePhase::Rest, true) => format!("REST for {}s", self.current_duration),
            (_, false) => format!(
                "Paused at rep {}s. Time remaining: {}. Press start to resume.",
                self.current_duration,
                format_clock(self.time_remaining)
            ),
        }
    }

    /// Capture the observable state for a display layer.
    pub fn snapshot(&self) -> EnduranceSnapshot {
        EnduranceSnapshot {
            phase: self.phase.label().to_string(),
            running: self.running,
            starting_duration: self.starting_duration,
            current_duration: self.current_duration,
            increment: self.increment,
            countdown: format_clock(self.time_remaining),
            status: self.status_message(),
            can_start: !self.running,
            can_stop: self.running,
            can_reset: self.phase != EndurancePhase::Idle,
            can_adjust: !self.running,
        }
    }
}

/// Observable endurance timer state for a display layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnduranceSnapshot {
    pub phase: String,
    pub running: bool,
    pub starting_duration: u64,
    pub current_duration: u64,
    pub increment: u64,
    pub countdown: String,
    pub status: String,
    pub can_start: bool,
    pub can_stop: bool,
    pub can_reset: bool,
    pub can_adjust: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::create_tone_channel;
    use tokio::sync::mpsc;

    fn timer(starting: u64, increment: u64) -> (EnduranceTimer, mpsc::Receiver<ToneCue>) {
        let (tone_tx, tone_rx) = create_tone_channel();
        (EnduranceTimer::new(starting, increment, tone_tx), tone_rx)
    }

    fn drain(rx: &mut mpsc::Receiver<ToneCue>) -> Vec<ToneCue> {
        let mut cues = Vec::new();
        while let Ok(cue) = rx.try_recv() {
            cues.push(cue);
        }
        cues
    }

    fn frequencies(rx: &mut mpsc::Receiver<ToneCue>) -> Vec<f32> {
        drain(rx).iter().map(|cue| cue.frequency_hz).collect()
    }

    #[test]
    fn first_full_cycle_grows_rep_duration() {
        let (mut timer, _rx) = timer(5, 1);
        assert!(timer.start());
        assert_eq!(timer.phase(), EndurancePhase::Play);
        assert_eq!(timer.time_remaining(), 5);

        for _ in 0..5 {
            timer.tick();
        }
        assert_eq!(timer.phase(), EndurancePhase::Rest);
        assert_eq!(timer.time_remaining(), 5);

        for _ in 0..5 {
            timer.tick();
        }
        assert_eq!(timer.phase(), EndurancePhase::Play);
        assert_eq!(timer.current_duration(), 6);
        assert_eq!(timer.time_remaining(), 6);
    }

    #[test]
    fn increment_never_goes_negative() {
        let (mut timer, _rx) = timer(5, 0);
        assert!(!timer.adjust_increment(-1));
        assert_eq!(timer.increment(), 0);
        assert!(timer.adjust_increment(2));
        assert_eq!(timer.increment(), 2);
    }

    #[test]
    fn out_of_range_increment_adjustment_is_rejected_outright() {
        let (mut timer, _rx) = timer(5, 1);
        assert!(!timer.adjust_increment(-2));
        assert_eq!(timer.increment(), 1);
    }

    #[test]
    fn starting_duration_stays_at_least_one_second() {
        let (mut timer, _rx) = timer(5, 1);
        assert!(!timer.adjust_starting_duration(-10));
        assert_eq!(timer.starting_duration(), 5);
        assert!(timer.adjust_starting_duration(-4));
        assert_eq!(timer.starting_duration(), 1);
    }

    #[test]
    fn adjusting_start_while_stopped_resets_current_rep() {
        let (mut timer, _rx) = timer(5, 1);
        assert!(timer.adjust_starting_duration(3));
        assert_eq!(timer.current_duration(), 8);
        assert_eq!(timer.time_remaining(), 0);
    }

    #[test]
    fn adjusting_start_while_running_defers_to_next_start() {
        let (mut timer, _rx) = timer(5, 1);
        timer.start();
        assert!(timer.adjust_starting_duration(3));
        assert_eq!(timer.starting_duration(), 8);
        assert_eq!(timer.current_duration(), 5);
        assert_eq!(timer.time_remaining(), 5);
    }

    #[test]
    fn warning_beeps_fire_at_three_two_one_during_rest() {
        let (mut timer, mut rx) = timer(5, 0);
        timer.start();
        for _ in 0..5 {
            timer.tick();
        }
        assert_eq!(timer.phase(), EndurancePhase::Rest);
        drain(&mut rx);

        timer.tick(); // 4 remaining
        assert!(frequencies(&mut rx).is_empty());
        timer.tick(); // 3 remaining
        assert_eq!(frequencies(&mut rx), vec![tone::WARNING_3S_HZ]);
        timer.tick(); // 2 remaining
        assert_eq!(frequencies(&mut rx), vec![tone::WARNING_2S_HZ]);
        timer.tick(); // 1 remaining
        assert_eq!(frequencies(&mut rx), vec![tone::WARNING_1S_HZ]);
        timer.tick(); // rest over, next play begins
        assert_eq!(frequencies(&mut rx), vec![tone::PLAY_TONE_HZ]);
    }

    #[test]
    fn no_warning_beeps_for_short_reps() {
        let (mut timer, mut rx) = timer(3, 0);
        timer.start();
        for _ in 0..3 {
            timer.tick();
        }
        assert_eq!(timer.phase(), EndurancePhase::Rest);
        drain(&mut rx);

        for _ in 0..3 {
            timer.tick();
        }
        let heard = frequencies(&mut rx);
        assert!(!heard.contains(&tone::WARNING_3S_HZ));
        assert!(!heard.contains(&tone::WARNING_2S_HZ));
        assert!(!heard.contains(&tone::WARNING_1S_HZ));
        assert_eq!(heard, vec![tone::PLAY_TONE_HZ]);
    }

    #[test]
    fn start_after_stop_restarts_from_starting_duration() {
        let (mut timer, _rx) = timer(5, 1);
        timer.start();
        for _ in 0..10 {
            timer.tick();
        }
        assert_eq!(timer.current_duration(), 6);

        assert!(timer.stop());
        assert!(timer.start());
        assert_eq!(timer.current_duration(), 5);
        assert_eq!(timer.time_remaining(), 5);
    }

    #[test]
    fn stop_preserves_phase_and_remaining_time() {
        let (mut timer, _rx) = timer(5, 1);
        timer.start();
        timer.tick();
        timer.tick();
        assert!(timer.stop());
        assert!(!timer.is_running());
        assert_eq!(timer.phase(), EndurancePhase::Play);
        assert_eq!(timer.time_remaining(), 3);

        // Ticks while stopped are ignored
        timer.tick();
        assert_eq!(timer.time_remaining(), 3);
    }

    #[test]
    fn repeated_start_and_stop_are_no_ops() {
        let (mut timer, mut rx) = timer(5, 1);
        assert!(timer.start());
        assert!(!timer.start());
        assert_eq!(frequencies(&mut rx), vec![tone::PLAY_TONE_HZ]);
        assert!(timer.stop());
        assert!(!timer.stop());
    }

    #[test]
    fn reset_returns_to_idle_defaults() {
        let (mut timer, _rx) = timer(5, 1);
        timer.start();
        for _ in 0..7 {
            timer.tick();
        }
        timer.reset();
        assert!(!timer.is_running());
        assert_eq!(timer.phase(), EndurancePhase::Idle);
        assert_eq!(timer.current_duration(), 5);
        assert_eq!(timer.time_remaining(), 0);
    }

    #[test]
    fn snapshot_reflects_command_availability() {
        let (mut timer, _rx) = timer(5, 1);
        let idle = timer.snapshot();
        assert!(idle.can_start && !idle.can_stop && !idle.can_reset && idle.can_adjust);
        assert_eq!(idle.countdown, "00:00");

        timer.start();
        let playing = timer.snapshot();
        assert!(!playing.can_start && playing.can_stop && playing.can_reset);
        assert!(!playing.can_adjust);
        assert_eq!(playing.phase, "PLAY");
        assert_eq!(playing.countdown, "00:05");

        timer.stop();
        let paused = timer.snapshot();
        assert!(paused.can_start && !paused.can_stop && paused.can_reset);
        assert!(paused.status.contains("resume"));
    }
}
