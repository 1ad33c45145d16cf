//! Audio cue module
//!
//! Tone cue definitions and the rodio-backed playback task that both timers
//! feed through a channel.

pub mod player;
pub mod tone;

// Re-export main types
pub use player::{create_tone_channel, tone_player_task, ToneSender};
pub use tone::ToneCue;
