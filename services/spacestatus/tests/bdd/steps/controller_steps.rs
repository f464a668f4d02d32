//! BDD step definitions for notification and request features

use cucumber::{given, then, when};

use spacestatus::{Config, SpaceStatusError};

use crate::steps::parser_steps::{parse_status, unescape};
use crate::world::SpaceStatusWorld;

async fn report(world: &mut SpaceStatusWorld, payload: &str) {
    let controller = world.controller();
    let ticket = controller.begin_request();
    let applied = controller
        .on_fetch_success(ticket.epoch, unescape(payload).as_bytes())
        .await;
    assert!(applied, "a fresh request should always resolve");
}

#[given("a status controller with a working notifier")]
fn controller_with_working_notifier(world: &mut SpaceStatusWorld) {
    world.build_controller(&Config::default(), true);
}

#[given("a status controller with a failing notifier")]
fn controller_with_failing_notifier(world: &mut SpaceStatusWorld) {
    world.build_controller(&Config::default(), false);
}

#[given("notifications are disabled")]
fn notifications_disabled(world: &mut SpaceStatusWorld) {
    world.controller().set_notifications_enabled(false);
}

#[given(expr = "the endpoint has reported {string}")]
async fn endpoint_has_reported(world: &mut SpaceStatusWorld, payload: String) {
    report(world, &payload).await;
}

#[given("a request is in flight")]
fn request_in_flight(world: &mut SpaceStatusWorld) {
    let ticket = world.controller().begin_request();
    world.first_ticket = Some(ticket.clone());
    world.ticket = Some(ticket);
}

#[given("another request is started")]
fn another_request(world: &mut SpaceStatusWorld) {
    let ticket = world.controller().begin_request();
    world.ticket = Some(ticket);
}

#[when(expr = "the endpoint reports {string}")]
async fn endpoint_reports(world: &mut SpaceStatusWorld, payload: String) {
    report(world, &payload).await;
}

#[when("the request times out")]
async fn request_times_out(world: &mut SpaceStatusWorld) {
    let controller = world.controller();
    let ticket = controller.begin_request();
    assert!(controller.on_fetch_timeout(ticket.epoch).await);
}

#[when("the watchdog fires")]
async fn watchdog_fires(world: &mut SpaceStatusWorld) {
    let epoch = world.ticket.as_ref().expect("no request in flight").epoch;
    let resolved = world.controller().on_fetch_timeout(epoch).await;
    world.last_resolution = Some(resolved);
}

#[when(expr = "the response {string} arrives")]
async fn response_arrives(world: &mut SpaceStatusWorld, payload: String) {
    let epoch = world.ticket.as_ref().expect("no request in flight").epoch;
    let resolved = world
        .controller()
        .on_fetch_success(epoch, unescape(&payload).as_bytes())
        .await;
    world.last_resolution = Some(resolved);
}

#[when(expr = "the response {string} for the first request arrives")]
async fn first_response_arrives(world: &mut SpaceStatusWorld, payload: String) {
    let epoch = world.first_ticket.as_ref().expect("no first request").epoch;
    let resolved = world
        .controller()
        .on_fetch_success(epoch, unescape(&payload).as_bytes())
        .await;
    world.last_resolution = Some(resolved);
}

#[when(expr = "the request fails with {string}")]
async fn request_fails(world: &mut SpaceStatusWorld, message: String) {
    let epoch = world.ticket.as_ref().expect("no request in flight").epoch;
    let error = SpaceStatusError::Http(message);
    let resolved = world.controller().on_fetch_failure(epoch, &error).await;
    world.last_resolution = Some(resolved);
}

#[then(expr = "the status should be {string}")]
fn status_should_be(world: &mut SpaceStatusWorld, expected: String) {
    assert_eq!(world.controller().status(), parse_status(&expected));
}

#[then("the current and previous status should be equal")]
fn current_equals_previous(world: &mut SpaceStatusWorld) {
    let snapshot = world.controller().snapshot().clone();
    assert_eq!(snapshot.current, snapshot.previous);
}

#[then(expr = "{int} notification(s) should have been attempted")]
fn notifications_attempted(world: &mut SpaceStatusWorld, expected: usize) {
    assert_eq!(world.notification_attempts(), expected);
}

#[then(expr = "{int} fallback message(s) should have been shown")]
fn fallback_messages_shown(world: &mut SpaceStatusWorld, expected: usize) {
    assert_eq!(world.fallback_messages(), expected);
}

#[then("the last completion should have been ignored")]
fn last_completion_ignored(world: &mut SpaceStatusWorld) {
    assert_eq!(world.last_resolution, Some(false));
}
