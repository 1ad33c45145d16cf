//! Drill Pacer - paired interval timers with audible phase cues
//!
//! This library provides two cooperating timers for pacing practice drills:
//! a progressive endurance timer that alternates PLAY and REST phases with a
//! rep duration that grows after every completed rest, and a companion
//! tracker that counts play time up and then rests it back down.

pub mod audio;
pub mod config;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use audio::{ToneCue, ToneSender};
pub use config::Config;
pub use state::AppState;
pub use utils::shutdown_signal;
