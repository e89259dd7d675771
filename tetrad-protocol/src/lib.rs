//! Control-plane protocol
//!
//! The clock is driven over a deliberately small HTTP/1.1 surface: one
//! request per connection, JSON responses, `Connection: close` always.
//!
//! ```text
//!  bytes ──► RequestReader ──► Request ──► route() ──► ApiCommand
//!                                                         │
//!                                                    (application)
//!                                                         │
//!  bytes ◄── encode_response() ◄──────────────────── ApiReply
//! ```
//!
//! Everything above the socket lives here, so the server task never
//! touches raw bytes beyond feeding the reader, and the application never
//! sees HTTP at all.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod api;
pub mod decode;
pub mod exchange;
pub mod params;
pub mod request;
pub mod response;

pub use api::{route, ApiCommand, ApiError, ApiReply, ApiText, StatusReport, MAX_TEXT_LEN};
pub use exchange::{Tagged, Ticket};
pub use params::Param;
pub use request::{Method, Request, RequestError, RequestReader, MAX_REQUEST_SIZE};
pub use response::{encode_body, encode_response, status_code};
