//! Parameter coercion
//!
//! Parameters arrive either as decoded text (query string, form body) or
//! as JSON values. Every coercion here is total: bad input clamps to a
//! default instead of failing the request.

use alloc::string::{String, ToString};

use serde_json::Value;

/// Words read as `true`, compared case-insensitively
const TRUE_WORDS: [&str; 4] = ["1", "true", "yes", "on"];

/// Words read as `false`, compared case-insensitively
const FALSE_WORDS: [&str; 4] = ["0", "false", "no", "off"];

/// A looked-up parameter value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Param<'a> {
    /// From the query string or a form body
    Text(&'a str),
    /// From a JSON object body
    Json(&'a Value),
}

impl Param<'_> {
    /// Whether this is an explicit JSON `null`
    pub fn is_null(&self) -> bool {
        matches!(self, Param::Json(Value::Null))
    }

    /// Coerce to a boolean
    pub fn to_bool(&self) -> bool {
        match self {
            Param::Text(s) => text_to_bool(s),
            Param::Json(value) => json_to_bool(value),
        }
    }

    /// Coerce to display text; non-string JSON renders as JSON text
    pub fn to_text(&self) -> String {
        match self {
            Param::Text(s) => (*s).to_string(),
            Param::Json(Value::String(s)) => s.clone(),
            Param::Json(value) => value.to_string(),
        }
    }

    /// Coerce to whole seconds
    ///
    /// Floats truncate toward zero. Anything unparsable or negative gives
    /// `None`.
    pub fn to_seconds(&self) -> Option<u32> {
        let seconds = match self {
            Param::Text(s) => s.trim().parse::<i64>().ok()?,
            Param::Json(Value::String(s)) => s.trim().parse::<i64>().ok()?,
            Param::Json(Value::Number(n)) => match n.as_i64() {
                Some(i) => i,
                None => n.as_f64().filter(|f| f.is_finite())? as i64,
            },
            Param::Json(_) => return None,
        };
        u32::try_from(seconds).ok()
    }
}

/// Optional boolean: absent or JSON `null` leaves the setting alone
pub fn optional_bool(param: Option<Param<'_>>) -> Option<bool> {
    param.filter(|p| !p.is_null()).map(|p| p.to_bool())
}

/// Duration in seconds, falling back to `default` on bad input
pub fn duration_or(param: Option<Param<'_>>, default: u32) -> u32 {
    param.and_then(|p| p.to_seconds()).unwrap_or(default)
}

fn text_to_bool(s: &str) -> bool {
    let s = s.trim();
    if s.is_empty() || FALSE_WORDS.iter().any(|w| w.eq_ignore_ascii_case(s)) {
        return false;
    }
    if TRUE_WORDS.iter().any(|w| w.eq_ignore_ascii_case(s)) {
        return true;
    }
    // Any other non-empty text is truthy
    true
}

fn json_to_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => text_to_bool(s),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
