//! One-second tick driver tasks for both timers
//!
//! Each task owns the periodic cadence for one machine and checks its
//! running flag at the top of every iteration, so a tick racing a stop or
//! reset resolves as a no-op instead of needing forced cancellation.

use std::{sync::Arc, time::Duration};

use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error};

use crate::state::AppState;

const TICK_PERIOD: Duration = Duration::from_secs(1);

fn tick_interval() -> time::Interval {
    // First fire one second after spawn, then one second apart
    let mut interval = time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

/// Drives the endurance timer while it is running
pub async fn endurance_ticker(state: Arc<AppState>) {
    debug!("Endurance ticker started");

    let mut interval = tick_interval();
    loop {
        interval.tick().await;

        let still_running = {
            let mut timer = match state.endurance.lock() {
                Ok(timer) => timer,
                Err(e) => {
                    error!("Failed to lock endurance timer: {}", e);
                    break;
                }
            };
            if timer.is_running() {
                timer.tick();
                timer.is_running()
            } else {
                false
            }
        };

        state.publish_endurance();

        if !still_running {
            break;
        }
    }

    debug!("Endurance ticker stopped");
}

/// Drives the companion tracker while it is running. Exits on its own once
/// the rest countdown completes.
pub async fn companion_ticker(state: Arc<AppState>) {
    debug!("Companion ticker started");

    let mut interval = tick_interval();
    loop {
        interval.tick().await;

        let still_running = {
            let mut tracker = match state.companion.lock() {
                Ok(tracker) => tracker,
                Err(e) => {
                    error!("Failed to lock companion tracker: {}", e);
                    break;
                }
            };
            if tracker.is_running() {
                tracker.tick();
                tracker.is_running()
            } else {
                false
            }
        };

        state.publish_companion();

        if !still_running {
            break;
        }
    }

    debug!("Companion ticker stopped");
}
