//! Display drivers

pub mod multiplex;

pub use multiplex::{DisplayLines, Line, MultiplexDisplay};
