//! JSON response encoding
//!
//! Every response carries `Content-Type: application/json` and
//! `Connection: close`; the server closes the socket after writing it.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use serde::Serialize;

use crate::api::{ApiReply, ENDPOINTS};

/// Banner in the informational payload
pub const INFO_MESSAGE: &str = "Pico 7-seg API";

/// Body sent if serialization itself fails
const FALLBACK_BODY: &str = r#"{"ok":false}"#;

#[derive(Serialize)]
struct OkBody {
    ok: bool,
}

#[derive(Serialize)]
struct StatusBody<'a> {
    ok: bool,
    ip: &'a str,
    state: &'a str,
    mode: &'a str,
}

#[derive(Serialize)]
struct InfoBody {
    ok: bool,
    message: &'static str,
    endpoints: [&'static str; 4],
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    ok: bool,
    error: &'a str,
}

/// HTTP status for a reply
pub fn status_code(reply: &ApiReply) -> u16 {
    match reply {
        ApiReply::Error(_) => 500,
        _ => 200,
    }
}

/// JSON body for a reply
pub fn encode_body(reply: &ApiReply) -> String {
    let body = match reply {
        ApiReply::Ok => serde_json::to_string(&OkBody { ok: true }),
        ApiReply::Status(report) => serde_json::to_string(&StatusBody {
            ok: true,
            ip: &report.ip,
            state: report.state,
            mode: report.mode,
        }),
        ApiReply::Info => serde_json::to_string(&InfoBody {
            ok: true,
            message: INFO_MESSAGE,
            endpoints: ENDPOINTS,
        }),
        ApiReply::Error(e) => serde_json::to_string(&ErrorBody {
            ok: false,
            error: e.message(),
        }),
    };
    body.unwrap_or_else(|_| String::from(FALLBACK_BODY))
}

/// Complete HTTP response for a reply
pub fn encode_response(reply: &ApiReply) -> Vec<u8> {
    let code = status_code(reply);
    let reason = if code == 200 { "OK" } else { "ERROR" };
    let body = encode_body(reply);

    format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nConnection: close\r\nContent-Length: {}\r\n\r\n{}",
        code,
        reason,
        body.len(),
        body
    )
    .into_bytes()
}
