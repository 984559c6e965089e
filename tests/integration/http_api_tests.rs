//! Integration tests for the HTTP API: request URI → command → JSON.

use core::net::Ipv4Addr;

use serde_json::Value;

use relayboard::adapters::http_api::{ApiResponse, Device};

use crate::mock_hw::{MockBoard, RecordingSink, boot};

fn device() -> Device<MockBoard, RecordingSink> {
    let (app, hw, sink) = boot();
    Device::new(app, hw, sink)
}

fn json(device: &mut Device<MockBoard, RecordingSink>, uri: &str) -> Value {
    match device.serve(uri).unwrap() {
        ApiResponse::Json(body) => serde_json::from_str(&body).unwrap(),
        other => panic!("{uri}: expected JSON, got {other:?}"),
    }
}

#[test]
fn state_uses_wire_keys() {
    let mut d = device();
    let response = d.serve("/api/state").unwrap();
    assert_eq!(response.content_type(), "application/json");
    assert_eq!(
        response.body(),
        r#"{"r1":false,"r2":false,"lp":50,"blink":false,"hz":1.0,"act":"BOOT","seq":0}"#
    );
}

#[test]
fn relay_routes_drive_relays() {
    let mut d = device();

    let v = json(&mut d, "/api/r1?on=1");
    assert_eq!(v["r1"], true);
    assert_eq!(v["act"], "WEB R1 ON");
    assert_eq!(v["seq"], 1);

    // Anything but on=1 means OFF.
    let v = json(&mut d, "/api/r1?on=yes");
    assert_eq!(v["r1"], false);
    assert_eq!(v["seq"], 2);

    let v = json(&mut d, "/api/r2?on=1");
    assert_eq!(v["r2"], true);
    assert_eq!(d.hw.indicator, Some(true));
}

#[test]
fn toggle_with_bad_id_only_reports_state() {
    let mut d = device();

    let v = json(&mut d, "/api/toggle?id=9");
    assert_eq!(v["seq"], 0);
    let v = json(&mut d, "/api/toggle");
    assert_eq!(v["seq"], 0);
    assert_eq!(d.sink.ignored(), 2);

    let v = json(&mut d, "/api/toggle?id=1");
    assert_eq!(v["r1"], true);
}

#[test]
fn light_route_clamps_and_journals() {
    let mut d = device();

    let v = json(&mut d, "/api/light?pct=150");
    assert_eq!(v["lp"], 100);
    assert_eq!(v["act"], "WEB LIGHT 100%");

    // Without pct the call is a plain state read.
    let v = json(&mut d, "/api/light");
    assert_eq!(v["lp"], 100);
    assert_eq!(v["seq"], 1);
}

#[test]
fn blink_route_updates_and_keeps_absent_fields() {
    let mut d = device();

    let v = json(&mut d, "/api/blink?ena=1&hz=2.5");
    assert_eq!(v["blink"], true);
    assert_eq!(v["hz"], 2.5);
    assert_eq!(v["act"], "WEB BLINK ON @ 2.5Hz");

    // Garbled frequency: rejected, enable flag untouched.
    let v = json(&mut d, "/api/blink?hz=fast");
    assert_eq!(v["blink"], true);
    assert_eq!(v["hz"], 2.5);

    let v = json(&mut d, "/api/blink?ena=0");
    assert_eq!(v["blink"], false);
    assert_eq!(v["hz"], 2.5);
    assert_eq!(v["act"], "WEB BLINK OFF");
}

#[test]
fn ip_route_reports_station_address() {
    let mut d = device();

    let response = d.serve("/api/ip").unwrap();
    assert_eq!(response, ApiResponse::Text("0.0.0.0".into()));
    assert_eq!(response.content_type(), "text/plain");

    d.ip = Some(Ipv4Addr::new(192, 168, 1, 42));
    assert_eq!(d.serve("/api/ip").unwrap().body(), "192.168.1.42");
}

#[test]
fn unknown_route_is_not_found() {
    let mut d = device();
    let response = d.serve("/api/r3?on=1").unwrap();
    assert_eq!(response, ApiResponse::NotFound);
    assert_eq!(response.status(), 404);
    assert!(d.hw.coils.is_empty());
}
