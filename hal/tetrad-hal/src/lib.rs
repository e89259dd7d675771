//! Tetrad Hardware Abstraction Layer
//!
//! This crate defines the pin-level traits the display and button drivers
//! are written against. Chip-specific crates implement them, and host tests
//! implement them with recording mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  tetrad-drivers (multiplexer, button)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tetrad-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ tetrad-hal-   │       │  test mocks   │
//! │    rp2040     │       │               │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`gpio::ActiveLevel`] - Logical-to-electrical level mapping

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;

// Re-export key traits at crate root for convenience
pub use gpio::{ActiveLevel, InputPin, OutputPin};
