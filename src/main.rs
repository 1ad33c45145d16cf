//! Drill Pacer - paired interval timers with audible phase cues
//!
//! This is the main entry point for the drill-pacer application.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use drill_pacer::{
    audio::{create_tone_channel, tone_player_task},
    config::Config,
    state::AppState,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("drill_pacer={}", config.log_level()))
        .init();

    info!("Starting drill-pacer v0.1.0");
    info!(
        "Configuration: starting_duration={}s, increment={}s, mute={}",
        config.starting_duration, config.increment, config.mute
    );

    // Start the tone playback background task
    let (tone_tx, tone_rx) = create_tone_channel();
    let muted = config.mute;
    tokio::spawn(async move {
        tone_player_task(tone_rx, muted).await;
    });

    // Create application state
    let state = Arc::new(AppState::new(&config, tone_tx));

    // Log snapshot updates as the tickers publish them
    spawn_display_watchers(&state);

    print_help();

    let repl_state = Arc::clone(&state);
    let repl = tokio::spawn(async move {
        command_loop(repl_state).await;
    });

    tokio::select! {
        _ = repl => {
            info!("Command loop finished");
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("drill-pacer shutdown complete");
    Ok(())
}

/// Read commands from stdin until EOF or quit
async fn command_loop(state: Arc<AppState>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read command: {}", e);
                break;
            }
        };

        match dispatch(&state, line.trim()) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => error!("{}", e),
        }
    }
}

/// Apply one command. Returns Ok(false) when the loop should exit.
fn dispatch(state: &Arc<AppState>, command: &str) -> Result<bool, String> {
    match command {
        "" => {}
        "start" => {
            state.start_endurance()?;
        }
        "stop" => {
            state.stop_endurance()?;
        }
        "reset" => {
            state.reset_endurance()?;
        }
        "inc+" => {
            state.adjust_increment(1)?;
        }
        "inc-" => {
            state.adjust_increment(-1)?;
        }
        "dur+" => {
            state.adjust_starting_duration(1)?;
        }
        "dur-" => {
            state.adjust_starting_duration(-1)?;
        }
        "track start" => {
            state.start_companion()?;
        }
        "track stop" => {
            state.stop_and_rest()?;
        }
        "track reset" => {
            state.reset_companion()?;
        }
        "status" => {
            let report = state.status_report()?;
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{}", json),
                Err(e) => error!("Failed to serialize status: {}", e),
            }
        }
        "help" => print_help(),
        "quit" | "exit" => return Ok(false),
        other => error!("Unknown command: {:?} (try 'help')", other),
    }
    Ok(true)
}

fn spawn_display_watchers(state: &Arc<AppState>) {
    let mut endurance_rx = state.subscribe_endurance();
    tokio::spawn(async move {
        while endurance_rx.changed().await.is_ok() {
            let snapshot = endurance_rx.borrow_and_update().clone();
            info!(
                "[endurance] {} {} | {}",
                snapshot.phase, snapshot.countdown, snapshot.status
            );
        }
    });

    let mut companion_rx = state.subscribe_companion();
    tokio::spawn(async move {
        while companion_rx.changed().await.is_ok() {
            let snapshot = companion_rx.borrow_and_update().clone();
            info!(
                "[tracker] play {} / rest {} | {}",
                snapshot.play_time, snapshot.rest_time, snapshot.status
            );
        }
    });
}

fn print_help() {
    info!("Commands:");
    info!("  start | stop | reset        - endurance timer");
    info!("  inc+ | inc-                 - adjust per-rest increment");
    info!("  dur+ | dur-                 - adjust starting rep duration");
    info!("  track start | track stop | track reset - companion tracker");
    info!("  status                      - print combined status as JSON");
    info!("  help | quit");
}
