//! Main application state management
//!
//! Owns both timer state machines, the ticker task handle for each, and the
//! watch channels a display layer subscribes to.

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{sync::watch, task::JoinHandle};
use tracing::warn;

use crate::audio::ToneSender;
use crate::config::Config;
use crate::tasks::{companion_ticker, endurance_ticker};

use super::{
    companion::{CompanionSnapshot, CompanionTracker},
    endurance::{EnduranceSnapshot, EnduranceTimer},
};

/// Application state shared between the command layer and the ticker tasks
#[derive(Debug)]
pub struct AppState {
    /// The two timer state machines
    pub endurance: Mutex<EnduranceTimer>,
    pub companion: Mutex<CompanionTracker>,
    /// At most one ticker task per machine; replacing aborts the old one
    endurance_ticker_handle: Mutex<Option<JoinHandle<()>>>,
    companion_ticker_handle: Mutex<Option<JoinHandle<()>>>,
    /// Process metadata
    pub start_time: Instant,
    /// Last action tracking
    last_action: Mutex<Option<String>>,
    last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Snapshot channels for display layers
    endurance_tx: watch::Sender<EnduranceSnapshot>,
    /// Keep the receivers alive to prevent channel closure
    _endurance_rx: watch::Receiver<EnduranceSnapshot>,
    companion_tx: watch::Sender<CompanionSnapshot>,
    _companion_rx: watch::Receiver<CompanionSnapshot>,
}

impl AppState {
    /// Create the application state with timers configured from the CLI
    pub fn new(config: &Config, tone_tx: ToneSender) -> Self {
        let endurance =
            EnduranceTimer::new(config.starting_duration, config.increment, tone_tx.clone());
        let companion = CompanionTracker::new(tone_tx);

        let (endurance_tx, endurance_rx) = watch::channel(endurance.snapshot());
        let (companion_tx, companion_rx) = watch::channel(companion.snapshot());

        Self {
            endurance: Mutex::new(endurance),
            companion: Mutex::new(companion),
            endurance_ticker_handle: Mutex::new(None),
            companion_ticker_handle: Mutex::new(None),
            start_time: Instant::now(),
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            endurance_tx,
            _endurance_rx: endurance_rx,
            companion_tx,
            _companion_rx: companion_rx,
        }
    }

    fn with_endurance<R>(&self, f: impl FnOnce(&mut EnduranceTimer) -> R) -> Result<R, String> {
        let mut timer = self
            .endurance
            .lock()
            .map_err(|e| format!("Failed to lock endurance timer: {}", e))?;
        Ok(f(&mut timer))
    }

    fn with_companion<R>(&self, f: impl FnOnce(&mut CompanionTracker) -> R) -> Result<R, String> {
        let mut tracker = self
            .companion
            .lock()
            .map_err(|e| format!("Failed to lock companion tracker: {}", e))?;
        Ok(f(&mut tracker))
    }

    /// Record the last command for status reporting
    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    fn replace_endurance_ticker(&self, handle: Option<JoinHandle<()>>) {
        if let Ok(mut slot) = self.endurance_ticker_handle.lock() {
            if let Some(old) = slot.take() {
                old.abort();
            }
            *slot = handle;
        }
    }

    fn replace_companion_ticker(&self, handle: Option<JoinHandle<()>>) {
        if let Ok(mut slot) = self.companion_ticker_handle.lock() {
            if let Some(old) = slot.take() {
                old.abort();
            }
            *slot = handle;
        }
    }

    // --- Endurance timer commands ---

    /// Start the endurance timer and its ticker. No-op while running, so a
    /// double start never schedules a second ticker.
    pub fn start_endurance(self: &Arc<Self>) -> Result<bool, String> {
        let started = self.with_endurance(|timer| timer.start())?;
        if started {
            self.record_action("endurance-start");
            self.publish_endurance();
            self.replace_endurance_ticker(Some(tokio::spawn(endurance_ticker(Arc::clone(self)))));
        }
        Ok(started)
    }

    /// Pause the endurance timer and cancel its ticker
    pub fn stop_endurance(&self) -> Result<bool, String> {
        let stopped = self.with_endurance(|timer| timer.stop())?;
        if stopped {
            self.replace_endurance_ticker(None);
            self.record_action("endurance-stop");
            self.publish_endurance();
        }
        Ok(stopped)
    }

    /// Reset the endurance timer to its starting duration
    pub fn reset_endurance(&self) -> Result<(), String> {
        self.with_endurance(|timer| timer.reset())?;
        self.replace_endurance_ticker(None);
        self.record_action("endurance-reset");
        self.publish_endurance();
        Ok(())
    }

    /// Adjust the per-rest increment
    pub fn adjust_increment(&self, delta: i64) -> Result<bool, String> {
        let applied = self.with_endurance(|timer| timer.adjust_increment(delta))?;
        if applied {
            self.record_action("adjust-increment");
            self.publish_endurance();
        }
        Ok(applied)
    }

    /// Adjust the starting rep duration
    pub fn adjust_starting_duration(&self, delta: i64) -> Result<bool, String> {
        let applied = self.with_endurance(|timer| timer.adjust_starting_duration(delta))?;
        if applied {
            self.record_action("adjust-starting-duration");
            self.publish_endurance();
        }
        Ok(applied)
    }

    // --- Companion tracker commands ---

    /// Start the companion tracker counting up
    pub fn start_companion(self: &Arc<Self>) -> Result<bool, String> {
        let started = self.with_companion(|tracker| tracker.start())?;
        if started {
            self.record_action("tracker-start");
            self.publish_companion();
            self.replace_companion_ticker(Some(tokio::spawn(companion_ticker(Arc::clone(self)))));
        }
        Ok(started)
    }

    /// Switch the companion tracker from playing to its rest countdown.
    /// The play ticker is replaced by a fresh rest ticker.
    pub fn stop_and_rest(self: &Arc<Self>) -> Result<bool, String> {
        let resting = self.with_companion(|tracker| tracker.stop_and_rest())?;
        if resting {
            self.record_action("tracker-stop");
            self.publish_companion();
            self.replace_companion_ticker(Some(tokio::spawn(companion_ticker(Arc::clone(self)))));
        }
        Ok(resting)
    }

    /// Reset the companion tracker and cancel its ticker
    pub fn reset_companion(&self) -> Result<(), String> {
        self.with_companion(|tracker| tracker.reset())?;
        self.replace_companion_ticker(None);
        self.record_action("tracker-reset");
        self.publish_companion();
        Ok(())
    }

    // --- Observable outputs ---

    /// Get the current endurance timer snapshot
    pub fn endurance_snapshot(&self) -> Result<EnduranceSnapshot, String> {
        self.with_endurance(|timer| timer.snapshot())
    }

    /// Get the current companion tracker snapshot
    pub fn companion_snapshot(&self) -> Result<CompanionSnapshot, String> {
        self.with_companion(|tracker| tracker.snapshot())
    }

    /// Publish the current endurance snapshot to watchers
    pub fn publish_endurance(&self) {
        match self.endurance_snapshot() {
            Ok(snapshot) => {
                if let Err(e) = self.endurance_tx.send(snapshot) {
                    warn!("Failed to send endurance snapshot: {}", e);
                }
            }
            Err(e) => warn!("{}", e),
        }
    }

    /// Publish the current companion snapshot to watchers
    pub fn publish_companion(&self) {
        match self.companion_snapshot() {
            Ok(snapshot) => {
                if let Err(e) = self.companion_tx.send(snapshot) {
                    warn!("Failed to send companion snapshot: {}", e);
                }
            }
            Err(e) => warn!("{}", e),
        }
    }

    /// Subscribe to endurance snapshot updates
    pub fn subscribe_endurance(&self) -> watch::Receiver<EnduranceSnapshot> {
        self.endurance_tx.subscribe()
    }

    /// Subscribe to companion snapshot updates
    pub fn subscribe_companion(&self) -> watch::Receiver<CompanionSnapshot> {
        self.companion_tx.subscribe()
    }

    /// Calculate process uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Assemble the combined status report
    pub fn status_report(&self) -> Result<StatusReport, String> {
        let endurance = self.endurance_snapshot()?;
        let tracker = self.companion_snapshot()?;
        let (last_action, last_action_time) = self.get_last_action();

        Ok(StatusReport {
            endurance,
            tracker,
            uptime: self.get_uptime(),
            last_action,
            last_action_time,
            timestamp: Utc::now(),
        })
    }
}

/// Combined status report for both timers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReport {
    pub endurance: EnduranceSnapshot,
    pub tracker: CompanionSnapshot,
    pub uptime: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
    pub timestamp: DateTime<Utc>,
}
