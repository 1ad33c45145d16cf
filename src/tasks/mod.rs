//! Background tasks module
//!
//! One-second tick driver tasks that run alongside the command loop.

pub mod ticker;

// Re-export main functions
pub use ticker::{companion_ticker, endurance_ticker};
