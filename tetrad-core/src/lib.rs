//! Board-agnostic core logic for the 7-segment clock
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Segment patterns and the 4-slot display buffer
//! - Scrolling text animation
//! - State machine and the application controller
//! - Button debouncing and wall-clock keeping
//! - Configuration types and the device config parser
//!
//! Everything here is driven by an injected `now_ms` timestamp, so the
//! whole controller runs on the host against a simulated clock.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod app;
pub mod button;
pub mod clock;
pub mod config;
pub mod display;
pub mod format;
pub mod scroller;
pub mod state;
pub mod traits;

pub use app::{Application, Command, Transition};
pub use display::{DisplayBuffer, DisplaySlot, SegmentPattern};
pub use scroller::Scroller;
pub use state::{Event, State};
