//! Embassy async tasks
//!
//! The radio and the IP stack each need a runner task; the control
//! server gets its own so the main loop never blocks on a socket.

pub mod net;
pub mod server;

pub use net::{cyw43_task, net_task};
pub use server::{server_task, ServerConfig};
