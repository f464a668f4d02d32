//! Decoding of status endpoint payloads
//!
//! Two formats are understood: the plain line format
//!
//! ```text
//! IsOpen: true
//! Since: 2020-01-01T00:00:00Z
//! ```
//!
//! and a JSON object carrying `open` and `state.lastchange`. Parsing never
//! fails: anything that cannot be understood becomes [`Status::Undefined`].

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use crate::config::WireFormat;
use crate::status::Status;

const IS_OPEN_PREFIX: &str = "IsOpen:";
const SINCE_PREFIX: &str = "Since:";

/// Result of decoding one payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedStatus {
    pub status: Status,
    pub since: Option<DateTime<Utc>>,
}

impl ParsedStatus {
    pub const UNDEFINED: ParsedStatus = ParsedStatus {
        status: Status::Undefined,
        since: None,
    };
}

/// Decode `payload` in the given wire format
pub fn parse(format: WireFormat, payload: &[u8]) -> ParsedStatus {
    match format {
        WireFormat::Line => parse_lines(payload),
        WireFormat::Structured => parse_structured(payload),
    }
}

/// Decode the `IsOpen:` / `Since:` line format.
///
/// The last `IsOpen:` line wins; a payload without one is undefined.
pub fn parse_lines(payload: &[u8]) -> ParsedStatus {
    let text = String::from_utf8_lossy(payload);
    let mut parsed = ParsedStatus::UNDEFINED;

    for line in text.lines().map(str::trim) {
        if let Some(value) = line.strip_prefix(IS_OPEN_PREFIX) {
            parsed.status = match value.trim().to_lowercase().as_str() {
                "true" => Status::Open,
                "false" => Status::Closed,
                _ => {
                    tracing::debug!("Cannot interpret line: {:?}", line);
                    Status::Undefined
                }
            };
        } else if let Some(value) = line.strip_prefix(SINCE_PREFIX) {
            match parse_iso8601(value.trim()) {
                Some(since) => parsed.since = Some(since),
                None => tracing::debug!("Cannot interpret line: {:?}", line),
            }
        }
    }

    parsed
}

/// Decode the JSON format: `{"open": bool, "state": {"lastchange": <epoch seconds>}}`
pub fn parse_structured(payload: &[u8]) -> ParsedStatus {
    let value: Value = match serde_json::from_slice(payload) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!("Failed to parse status JSON: {}", e);
            return ParsedStatus::UNDEFINED;
        }
    };

    let Some(object) = value.as_object() else {
        tracing::debug!("Status JSON is not an object");
        return ParsedStatus::UNDEFINED;
    };

    let status = if object.get("open").is_some_and(is_truthy) {
        Status::Open
    } else {
        Status::Closed
    };

    let since = object
        .get("state")
        .and_then(|state| state.get("lastchange"))
        .and_then(Value::as_i64)
        .and_then(|secs| DateTime::from_timestamp(secs, 0));

    ParsedStatus { status, since }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Parse an ISO-8601 date or date-time. Values without an offset are local time.
fn parse_iso8601(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}
