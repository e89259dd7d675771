//! Incremental HTTP request reader and request model
//!
//! The reader accumulates bytes from one connection into a fixed buffer
//! and reports when a request is complete: headers terminated and, for
//! a POST, as many body bytes as `Content-Length` announced (or as many
//! as fit). The buffered bytes are then parsed into a [`Request`].

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use heapless::Vec as BoundedVec;
use serde_json::{Map, Value};

use crate::decode::parse_pairs;
use crate::params::Param;

/// Receive buffer size; bytes past this are never read
pub const MAX_REQUEST_SIZE: usize = 1024;

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Errors that can occur while reading or parsing a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestError {
    /// Connection closed or timed out before any bytes arrived
    Empty,
    /// Buffer filled before the end of the headers
    HeaderTooLarge,
    /// Request line lacks a method or target
    MalformedRequestLine,
    /// Request line or headers are not UTF-8
    InvalidUtf8,
}

impl RequestError {
    /// Text reported in the error response
    pub fn message(&self) -> &'static str {
        match self {
            RequestError::Empty => "empty request",
            RequestError::HeaderTooLarge => "request header too large",
            RequestError::MalformedRequestLine => "malformed request line",
            RequestError::InvalidUtf8 => "request is not valid utf-8",
        }
    }
}

/// Request method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Method {
    Get,
    Post,
    Other,
}

impl Method {
    fn parse(token: &str) -> Self {
        match token {
            "GET" => Method::Get,
            "POST" => Method::Post,
            _ => Method::Other,
        }
    }
}

/// A parsed request
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    /// Target path without the query string
    pub path: String,
    /// Decoded query-string pairs, in order
    pub query: Vec<(String, String)>,
    /// Header pairs with lowercased names
    pub headers: Vec<(String, String)>,
    /// POST body, bounded by `Content-Length` and by what was read
    pub body: String,
    /// Body parsed as a JSON object, if it was one
    pub json: Option<Map<String, Value>>,
    /// Decoded form pairs from a body that was not JSON
    pub form: Vec<(String, String)>,
}

impl Request {
    /// Parse a complete request from raw bytes
    pub fn parse(data: &[u8]) -> Result<Self, RequestError> {
        if data.is_empty() {
            return Err(RequestError::Empty);
        }

        let (head, raw_body) = match find(data, HEADER_TERMINATOR) {
            Some(end) => (&data[..end], &data[end + HEADER_TERMINATOR.len()..]),
            None => (data, &[][..]),
        };
        let head = core::str::from_utf8(head).map_err(|_| RequestError::InvalidUtf8)?;

        let mut lines = head.split("\r\n");
        let request_line = lines.next().unwrap_or_default();
        let mut parts = request_line.split(' ').filter(|p| !p.is_empty());
        let (Some(method), Some(target)) = (parts.next(), parts.next()) else {
            return Err(RequestError::MalformedRequestLine);
        };
        let method = Method::parse(method);

        let (path, query) = target.split_once('?').unwrap_or((target, ""));

        let headers: Vec<(String, String)> = lines
            .take_while(|line| !line.is_empty())
            .filter_map(|line| line.split_once(':'))
            .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
            .collect();

        let mut request = Request {
            method,
            path: path.to_string(),
            query: parse_pairs(query),
            headers,
            body: String::new(),
            json: None,
            form: Vec::new(),
        };

        if method == Method::Post {
            let length = request.content_length().min(raw_body.len());
            request.body = String::from_utf8_lossy(&raw_body[..length]).into_owned();
        }

        if !request.body.is_empty() {
            match serde_json::from_str::<Value>(&request.body) {
                Ok(Value::Object(map)) => request.json = Some(map),
                Ok(_) => {}
                Err(_) => request.form = parse_pairs(&request.body),
            }
        }

        Ok(request)
    }

    /// Header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Announced body length; missing or unparsable reads as zero
    pub fn content_length(&self) -> usize {
        self.header("content-length")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    /// Look up a parameter by name
    ///
    /// A JSON body that has the key wins, then a form body, then the
    /// query string. Within one source the last occurrence wins.
    pub fn param(&self, name: &str) -> Option<Param<'_>> {
        if let Some(value) = self.json.as_ref().and_then(|json| json.get(name)) {
            return Some(Param::Json(value));
        }
        last_pair(&self.form, name)
            .or_else(|| last_pair(&self.query, name))
            .map(Param::Text)
    }
}

fn last_pair<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .rev()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Accumulates the bytes of one request
#[derive(Debug, Clone, Default)]
pub struct RequestReader {
    buffer: BoundedVec<u8, MAX_REQUEST_SIZE>,
    /// Offset of the first body byte once the headers are in
    body_start: Option<usize>,
    /// Body bytes still expected after the headers
    expected_body: usize,
}

impl RequestReader {
    /// Create an empty reader
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for the next connection
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.body_start = None;
        self.expected_body = 0;
    }

    /// Feed received bytes
    ///
    /// Returns `Ok(true)` once the request is complete, including when the
    /// buffer filled up after the headers. Bytes that do not fit are
    /// dropped.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<bool, RequestError> {
        let room = MAX_REQUEST_SIZE - self.buffer.len();
        let take = bytes.len().min(room);
        // Cannot fail: `take` is bounded by the remaining capacity
        let _ = self.buffer.extend_from_slice(&bytes[..take]);

        if self.body_start.is_none() {
            if let Some(end) = find(&self.buffer, HEADER_TERMINATOR) {
                let body_start = end + HEADER_TERMINATOR.len();
                self.body_start = Some(body_start);
                self.expected_body = announced_body(&self.buffer[..end]);
            } else if self.is_full() {
                return Err(RequestError::HeaderTooLarge);
            }
        }

        Ok(self.is_complete())
    }

    /// Whether a full request has been buffered
    pub fn is_complete(&self) -> bool {
        match self.body_start {
            Some(start) => self.buffer.len() - start >= self.expected_body || self.is_full(),
            None => false,
        }
    }

    /// Whether the buffer has no room left
    pub fn is_full(&self) -> bool {
        self.buffer.len() == MAX_REQUEST_SIZE
    }

    /// Bytes buffered so far
    pub fn buffered(&self) -> &[u8] {
        &self.buffer
    }

    /// Parse whatever has been buffered
    ///
    /// Called once the request is complete, or when the peer closed or
    /// the read timed out with a partial request.
    pub fn finish(&self) -> Result<Request, RequestError> {
        Request::parse(&self.buffer)
    }
}

/// Body length a POST head announces, zero for anything else
fn announced_body(head: &[u8]) -> usize {
    let Ok(head) = core::str::from_utf8(head) else {
        return 0;
    };
    if !head.starts_with("POST ") {
        return 0;
    }
    head.split("\r\n")
        .skip(1)
        .filter_map(|line| line.split_once(':'))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn text(param: Option<Param<'_>>) -> Option<&str> {
        match param {
            Some(Param::Text(s)) => Some(s),
            Some(Param::Json(Value::String(s))) => Some(s.as_str()),
            _ => None,
        }
    }

    #[test]
    fn test_parse_get_with_query() {
        let req = Request::parse(b"GET /api/display?text=AB12&duration=5 HTTP/1.1\r\nHost: x\r\n\r\n")
            .unwrap();
        assert_eq!(req.method, Method::Get);
        assert_eq!(req.path, "/api/display");
        assert_eq!(text(req.param("text")), Some("AB12"));
        assert_eq!(text(req.param("duration")), Some("5"));
        assert_eq!(req.header("HOST"), Some("x"));
        assert!(req.body.is_empty());
    }

    #[test]
    fn test_post_body_bounded_by_content_length() {
        let req = Request::parse(
            b"POST /api/scroll HTTP/1.1\r\nContent-Length: 9\r\n\r\ntext=HIXXXXXXX",
        )
        .unwrap();
        assert_eq!(req.body, "text=HIXX");
        assert_eq!(text(req.param("text")), Some("HIXX"));
    }

    #[test]
    fn test_post_body_bounded_by_bytes_read() {
        let req =
            Request::parse(b"POST /api/scroll HTTP/1.1\r\nContent-Length: 500\r\n\r\ntext=HI").unwrap();
        assert_eq!(req.body, "text=HI");
    }

    #[test]
    fn test_get_body_ignored() {
        let req = Request::parse(b"GET /api/status HTTP/1.1\r\nContent-Length: 4\r\n\r\nabcd").unwrap();
        assert!(req.body.is_empty());
    }

    #[test]
    fn test_json_overrides_query() {
        let req = Request::parse(
            b"POST /api/display?text=QUERY&duration=9 HTTP/1.1\r\nContent-Length: 15\r\n\r\n{\"text\":\"JSON\"}",
        )
        .unwrap();
        assert!(req.json.is_some());
        assert_eq!(text(req.param("text")), Some("JSON"));
        // Keys missing from the JSON still come from the query
        assert_eq!(text(req.param("duration")), Some("9"));
    }

    #[test]
    fn test_form_overrides_query() {
        let req = Request::parse(
            b"POST /api/display?text=QUERY HTTP/1.1\r\nContent-Length: 9\r\n\r\ntext=FORM",
        )
        .unwrap();
        assert_eq!(text(req.param("text")), Some("FORM"));
    }

    #[test]
    fn test_json_non_object_ignored() {
        let req = Request::parse(b"POST /api/display?text=Q HTTP/1.1\r\nContent-Length: 2\r\n\r\n42")
            .unwrap();
        assert!(req.json.is_none());
        assert!(req.form.is_empty());
        assert_eq!(text(req.param("text")), Some("Q"));
    }

    #[test]
    fn test_missing_terminator_still_parses() {
        let req = Request::parse(b"GET /api/status HTTP/1.1\r\nHost: x").unwrap();
        assert_eq!(req.path, "/api/status");
    }

    #[test]
    fn test_errors() {
        assert_eq!(Request::parse(b""), Err(RequestError::Empty));
        assert_eq!(Request::parse(b"GET\r\n\r\n"), Err(RequestError::MalformedRequestLine));
        assert_eq!(Request::parse(b"GET /\xff HTTP/1.1\r\n\r\n"), Err(RequestError::InvalidUtf8));
    }

    #[test]
    fn test_reader_completes_on_headers() {
        let mut reader = RequestReader::new();
        assert_eq!(reader.feed(b"GET /api/status HTTP/1.1\r\n"), Ok(false));
        assert_eq!(reader.feed(b"Host: x\r\n\r\n"), Ok(true));
        assert_eq!(reader.finish().unwrap().path, "/api/status");
    }

    #[test]
    fn test_reader_waits_for_body() {
        let mut reader = RequestReader::new();
        assert_eq!(
            reader.feed(b"POST /api/scroll HTTP/1.1\r\nContent-Length: 7\r\n\r\ntext"),
            Ok(false)
        );
        assert_eq!(reader.feed(b"=HI"), Ok(true));
        assert_eq!(reader.finish().unwrap().body, "text=HI");
    }

    #[test]
    fn test_reader_header_too_large() {
        let mut reader = RequestReader::new();
        let junk = [b'a'; MAX_REQUEST_SIZE + 10];
        assert_eq!(reader.feed(&junk), Err(RequestError::HeaderTooLarge));
    }

    #[test]
    fn test_reader_full_body_completes() {
        let mut reader = RequestReader::new();
        reader
            .feed(b"POST /api/scroll HTTP/1.1\r\nContent-Length: 5000\r\n\r\n")
            .unwrap();
        let body = [b'x'; MAX_REQUEST_SIZE];
        assert_eq!(reader.feed(&body), Ok(true));
        assert!(reader.is_full());
    }

    #[test]
    fn test_reader_reset() {
        let mut reader = RequestReader::new();
        reader.feed(b"GET / HTTP/1.1\r\n\r\n").unwrap();
        reader.reset();
        assert!(reader.buffered().is_empty());
        assert!(!reader.is_complete());
    }

    proptest! {
        #[test]
        fn prop_parse_never_panics(data in proptest::collection::vec(any::<u8>(), 0..512)) {
            let _ = Request::parse(&data);
        }

        #[test]
        fn prop_reader_chunking_is_irrelevant(split in 0usize..40) {
            let raw: &[u8] = b"POST /api/scroll HTTP/1.1\r\nContent-Length: 7\r\n\r\ntext=HI";
            let split = split.min(raw.len());
            let mut reader = RequestReader::new();
            let _ = reader.feed(&raw[..split]).unwrap();
            prop_assert!(reader.feed(&raw[split..]).unwrap());
            prop_assert_eq!(reader.finish().unwrap().body, "text=HI");
        }
    }
}
