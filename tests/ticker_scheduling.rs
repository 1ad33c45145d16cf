//! Tick scheduling behavior for the shared application state
//!
//! Uses tokio's paused clock so a "second" elapses instantly and the tests
//! can assert exactly how many ticks a ticker delivered.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use drill_pacer::audio::{create_tone_channel, ToneCue};
use drill_pacer::config::Config;
use drill_pacer::state::AppState;

fn test_state(starting_duration: u64, increment: u64) -> (Arc<AppState>, mpsc::Receiver<ToneCue>) {
    let (tone_tx, tone_rx) = create_tone_channel();
    let config = Config {
        starting_duration,
        increment,
        mute: true,
        verbose: false,
    };
    (Arc::new(AppState::new(&config, tone_tx)), tone_rx)
}

/// Advance the paused clock one second at a time, yielding so the ticker
/// task gets polled at every deadline.
async fn run_ticks(n: u64) {
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
    for _ in 0..n {
        tokio::time::advance(Duration::from_secs(1)).await;
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }
}

#[tokio::test(start_paused = true)]
async fn double_start_schedules_a_single_ticker() {
    let (state, _tone_rx) = test_state(5, 1);

    assert!(state.start_endurance().unwrap());
    assert!(!state.start_endurance().unwrap());

    run_ticks(1).await;

    // Exactly one tick elapsed despite the double start
    let snapshot = state.endurance_snapshot().unwrap();
    assert_eq!(snapshot.countdown, "00:04");
}

#[tokio::test(start_paused = true)]
async fn stop_cancels_the_countdown() {
    let (state, _tone_rx) = test_state(5, 1);

    state.start_endurance().unwrap();
    run_ticks(2).await;
    assert_eq!(state.endurance_snapshot().unwrap().countdown, "00:03");

    assert!(state.stop_endurance().unwrap());
    run_ticks(5).await;

    // No further ticks after stop
    let snapshot = state.endurance_snapshot().unwrap();
    assert_eq!(snapshot.countdown, "00:03");
    assert!(!snapshot.running);
    assert_eq!(snapshot.phase, "PLAY");
}

#[tokio::test(start_paused = true)]
async fn endurance_cycle_grows_rep_duration_in_real_ticks() {
    let (state, _tone_rx) = test_state(3, 2);

    state.start_endurance().unwrap();
    // 3s of play, 3s of rest
    run_ticks(6).await;

    let snapshot = state.endurance_snapshot().unwrap();
    assert_eq!(snapshot.phase, "PLAY");
    assert_eq!(snapshot.current_duration, 5);
}

#[tokio::test(start_paused = true)]
async fn companion_play_and_rest_flow() {
    let (state, _tone_rx) = test_state(5, 1);

    state.start_companion().unwrap();
    run_ticks(3).await;
    assert_eq!(state.companion_snapshot().unwrap().play_time, "00:03");

    assert!(state.stop_and_rest().unwrap());
    assert_eq!(state.companion_snapshot().unwrap().rest_time, "00:03");

    // Three countdown ticks plus the completion boundary tick
    run_ticks(4).await;

    let snapshot = state.companion_snapshot().unwrap();
    assert_eq!(snapshot.phase, "REST_COMPLETE");
    assert_eq!(snapshot.rest_time, "00:00");
    assert!(!snapshot.running);
    assert!(snapshot.can_reset);
}

#[tokio::test(start_paused = true)]
async fn companion_reset_cancels_any_ticker() {
    let (state, _tone_rx) = test_state(5, 1);

    state.start_companion().unwrap();
    run_ticks(2).await;
    state.reset_companion().unwrap();

    run_ticks(3).await;

    let snapshot = state.companion_snapshot().unwrap();
    assert_eq!(snapshot.phase, "IDLE");
    assert_eq!(snapshot.play_time, "00:00");
}

#[tokio::test(start_paused = true)]
async fn status_report_combines_both_timers() {
    let (state, _tone_rx) = test_state(5, 1);

    state.start_endurance().unwrap();
    run_ticks(1).await;

    let report = state.status_report().unwrap();
    assert_eq!(report.endurance.phase, "PLAY");
    assert_eq!(report.tracker.phase, "IDLE");
    assert_eq!(report.last_action.as_deref(), Some("endurance-start"));
    assert!(report.last_action_time.is_some());

    // The report serializes cleanly for the status command
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"endurance\""));
    assert!(json.contains("\"tracker\""));
}
