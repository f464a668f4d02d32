//! BDD step definitions for parsing feature

use chrono::{DateTime, Utc};
use cucumber::{given, then};

use spacestatus::parser;
use spacestatus::Status;

use crate::world::SpaceStatusWorld;

/// Turn the escapes used in feature files into the characters they stand for
pub fn unescape(s: &str) -> String {
    s.replace("\\n", "\n").replace("\\\"", "\"")
}

pub fn parse_status(s: &str) -> Status {
    match s {
        "Open" => Status::Open,
        "Closed" => Status::Closed,
        "Undefined" => Status::Undefined,
        other => panic!("Unknown status: {}", other),
    }
}

#[given(expr = "a line payload {string}")]
fn line_payload(world: &mut SpaceStatusWorld, payload: String) {
    world.parsed = Some(parser::parse_lines(unescape(&payload).as_bytes()));
}

#[given(expr = "a structured payload {string}")]
fn structured_payload(world: &mut SpaceStatusWorld, payload: String) {
    world.parsed = Some(parser::parse_structured(unescape(&payload).as_bytes()));
}

#[then(expr = "the parsed status should be {string}")]
fn parsed_status(world: &mut SpaceStatusWorld, expected: String) {
    let parsed = world.parsed.expect("nothing parsed");
    assert_eq!(parsed.status, parse_status(&expected));
}

#[then(expr = "the parsed since should be {string}")]
fn parsed_since(world: &mut SpaceStatusWorld, expected: String) {
    let parsed = world.parsed.expect("nothing parsed");
    let expected: DateTime<Utc> = DateTime::parse_from_rfc3339(&expected)
        .expect("invalid timestamp in feature file")
        .with_timezone(&Utc);
    assert_eq!(parsed.since, Some(expected));
}

#[then("the parsed since should be absent")]
fn parsed_since_absent(world: &mut SpaceStatusWorld) {
    let parsed = world.parsed.expect("nothing parsed");
    assert_eq!(parsed.since, None);
}
