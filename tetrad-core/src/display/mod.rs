//! Display model
//!
//! The segment table and the in-memory buffer that the multiplexer reads.
//! Nothing in here touches hardware.

pub mod buffer;
pub mod segments;

pub use buffer::{DisplayBuffer, DisplaySlot, DIGIT_COUNT};
pub use segments::{Segment, SegmentPattern};
