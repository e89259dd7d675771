//! API routing
//!
//! Maps a parsed [`Request`] to a typed [`ApiCommand`]. Routing goes by
//! path alone; unknown paths get the informational payload rather than
//! an error.

use heapless::String;

use crate::params::{duration_or, optional_bool};
use crate::request::{Request, RequestError};

/// Longest remote text kept (longer input is truncated)
pub const MAX_TEXT_LEN: usize = 64;

/// Text carried by a remote command
pub type ApiText = String<MAX_TEXT_LEN>;

/// Endpoint paths
pub const STATUS_PATH: &str = "/api/status";
pub const CLEAR_PATH: &str = "/api/clear";
pub const DISPLAY_PATH: &str = "/api/display";
pub const SCROLL_PATH: &str = "/api/scroll";

/// Endpoints advertised by the informational payload
pub const ENDPOINTS: [&str; 4] = [STATUS_PATH, DISPLAY_PATH, SCROLL_PATH, CLEAR_PATH];

/// Commands the control server hands to the application
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ApiCommand {
    /// Report address, state and rotation mode
    Status,
    /// Stop scrolling, blank, drop any remote override
    Clear,
    /// Static text for `duration_s` seconds
    Display {
        text: ApiText,
        /// `None` leaves the indicator as it was
        colon: Option<bool>,
        degree: Option<bool>,
        duration_s: u32,
    },
    /// Scroll text for `duration_s` seconds
    Scroll {
        text: ApiText,
        looping: bool,
        duration_s: u32,
    },
    /// Describe the API
    Info,
}

impl ApiCommand {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            ApiCommand::Status => "status",
            ApiCommand::Clear => "clear",
            ApiCommand::Display { .. } => "display",
            ApiCommand::Scroll { .. } => "scroll",
            ApiCommand::Info => "info",
        }
    }
}

/// Errors reported to API clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ApiError {
    /// The request could not be read or parsed
    BadRequest(RequestError),
    /// The controller is still bringing the network up
    NotReady,
    /// The controller did not answer in time
    Timeout,
}

impl ApiError {
    /// Text reported in the error response
    pub fn message(&self) -> &'static str {
        match self {
            ApiError::BadRequest(e) => e.message(),
            ApiError::NotReady => "not ready",
            ApiError::Timeout => "timed out",
        }
    }
}

impl From<RequestError> for ApiError {
    fn from(e: RequestError) -> Self {
        ApiError::BadRequest(e)
    }
}

/// Snapshot returned by the status endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusReport {
    /// Dotted address, or the no-address placeholder
    pub ip: String<16>,
    /// Upper-snake state name
    pub state: &'static str,
    /// `"time"` or `"temp"`
    pub mode: &'static str,
}

/// The application's answer to a command
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ApiReply {
    /// `{ok:true}`
    Ok,
    Status(StatusReport),
    Info,
    Error(ApiError),
}

/// Route a request to a command
pub fn route(request: &Request, default_duration_s: u32) -> ApiCommand {
    match request.path.as_str() {
        STATUS_PATH => ApiCommand::Status,
        CLEAR_PATH => ApiCommand::Clear,
        DISPLAY_PATH => ApiCommand::Display {
            text: text_param(request),
            colon: optional_bool(request.param("colon")),
            degree: optional_bool(request.param("degree")),
            duration_s: duration_or(request.param("duration"), default_duration_s),
        },
        SCROLL_PATH => ApiCommand::Scroll {
            text: text_param(request),
            looping: request.param("loop").is_some_and(|p| p.to_bool()),
            duration_s: duration_or(request.param("duration"), default_duration_s),
        },
        _ => ApiCommand::Info,
    }
}

fn text_param(request: &Request) -> ApiText {
    let mut text = ApiText::new();
    if let Some(param) = request.param("text") {
        for c in param.to_text().chars() {
            if text.push(c).is_err() {
                break;
            }
        }
    }
    text
}
