//! State machine for the display controller
//!
//! Decides which mode owns the display. The state machine is explicit,
//! finite and deterministic; side effects live in [`crate::app`].

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::{Pending, RotationMode, State};
