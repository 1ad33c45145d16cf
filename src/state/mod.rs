//! State management module
//!
//! Both timer state machines and the shared application state that owns
//! them.

pub mod app_state;
pub mod companion;
pub mod endurance;

// Re-export main types
pub use app_state::{AppState, StatusReport};
pub use companion::{CompanionPhase, CompanionSnapshot, CompanionTracker};
pub use endurance::{EndurancePhase, EnduranceSnapshot, EnduranceTimer};
