//! Inter-task communication channels
//!
//! The control server parses requests in its own task and hands typed
//! commands to the main loop, which is the only writer of the display.
//! The main loop answers through a signal. Both directions carry the
//! request's [`Ticket`](tetrad_protocol::Ticket).

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use tetrad_protocol::{ApiCommand, ApiReply, Tagged};

/// One request is in flight at a time
const API_CHANNEL_SIZE: usize = 1;

/// Commands from the control server to the main loop
pub static API_REQUESTS: Channel<CriticalSectionRawMutex, Tagged<ApiCommand>, API_CHANNEL_SIZE> =
    Channel::new();

/// Reply to the last command
pub static API_REPLY: Signal<CriticalSectionRawMutex, Tagged<ApiReply>> = Signal::new();
