//! Integration tests for the AppService → relay/light → actuators pipeline.
//!
//! These run on the host and drive the full command and tick paths
//! against the mock board.

use relayboard::app::commands::AppCommand;
use relayboard::app::events::AppEvent;
use relayboard::app::ports::CoilDrive;
use relayboard::state::{ActionSource, ButtonId, RelayId, RelayPosition};

use crate::mock_hw::{boot, run_for};

fn set_relay(id: i64, on: bool, source: ActionSource) -> AppCommand {
    AppCommand::SetRelay { id, on, source }
}

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn boot_state_is_off_dark_and_unsequenced() {
    let (app, _hw, _sink) = boot();
    let snap = app.snapshot();
    assert!(!snap.relay1_on);
    assert!(!snap.relay2_on);
    assert_eq!(app.light_level(), 0);
    assert_eq!(snap.sequence, 0);
    assert_eq!(snap.last_action.as_str(), "BOOT");
}

// ── Relay commands ────────────────────────────────────────────

#[test]
fn button_sourced_set_relay_pulses_and_journals() {
    let (mut app, mut hw, mut sink) = boot();

    let snap = app.handle_command(set_relay(1, true, ActionSource::Button(ButtonId::One)), &mut hw, &mut sink);

    assert!(snap.relay1_on);
    assert_eq!(snap.sequence, 1);
    assert_eq!(snap.last_action.as_str(), "BTN1 R1 ON");
    assert_eq!(hw.pulses(RelayId::One), vec![(CoilDrive::Set, 30)]);
    assert!(hw.pulses(RelayId::Two).is_empty());
    assert_eq!(
        sink.events,
        vec![AppEvent::RelayChanged {
            relay: RelayId::One,
            position: RelayPosition::On,
            source: ActionSource::Button(ButtonId::One),
            sequence: 1,
        }]
    );
}

#[test]
fn repeated_set_relay_is_idempotent() {
    let (mut app, mut hw, mut sink) = boot();
    app.handle_command(set_relay(1, true, ActionSource::Remote), &mut hw, &mut sink);
    let coil_calls = hw.coils.len();

    let snap = app.handle_command(set_relay(1, true, ActionSource::Remote), &mut hw, &mut sink);

    assert_eq!(snap.sequence, 1);
    assert_eq!(hw.coils.len(), coil_calls, "no second pulse");
    assert_eq!(sink.events.len(), 1);
}

#[test]
fn off_command_pulses_reset_coil() {
    let (mut app, mut hw, mut sink) = boot();
    app.handle_command(set_relay(2, true, ActionSource::Remote), &mut hw, &mut sink);
    let snap = app.handle_command(set_relay(2, false, ActionSource::Remote), &mut hw, &mut sink);

    assert!(!snap.relay2_on);
    assert_eq!(snap.sequence, 2);
    assert_eq!(snap.last_action.as_str(), "WEB R2 OFF");
    assert_eq!(
        hw.pulses(RelayId::Two),
        vec![(CoilDrive::Set, 30), (CoilDrive::Reset, 30)]
    );
}

#[test]
fn toggle_flips_and_reports_remote_source() {
    let (mut app, mut hw, mut sink) = boot();

    let snap = app.handle_command(AppCommand::ToggleRelay { id: 2 }, &mut hw, &mut sink);
    assert!(snap.relay2_on);
    assert_eq!(snap.last_action.as_str(), "WEB R2 ON");

    let snap = app.handle_command(AppCommand::ToggleRelay { id: 2 }, &mut hw, &mut sink);
    assert!(!snap.relay2_on);
    assert_eq!(snap.sequence, 2);
}

#[test]
fn out_of_range_relay_ids_are_ignored() {
    let (mut app, mut hw, mut sink) = boot();

    for id in [0, 3, -1, 1_000] {
        let snap = app.handle_command(set_relay(id, true, ActionSource::Remote), &mut hw, &mut sink);
        assert_eq!(snap.sequence, 0);
        app.handle_command(AppCommand::ToggleRelay { id }, &mut hw, &mut sink);
    }

    assert!(hw.coils.is_empty());
    assert_eq!(sink.ignored(), 8);
    assert_eq!(app.snapshot().sequence, 0);
}

#[test]
fn indicator_mirrors_relay_two() {
    let (mut app, mut hw, mut sink) = boot();

    app.handle_command(set_relay(2, true, ActionSource::Remote), &mut hw, &mut sink);
    assert_eq!(hw.indicator, Some(true));

    app.handle_command(set_relay(1, true, ActionSource::Remote), &mut hw, &mut sink);
    assert_eq!(hw.indicator, Some(true), "relay 1 does not drive LED2");

    app.handle_command(set_relay(2, false, ActionSource::Remote), &mut hw, &mut sink);
    assert_eq!(hw.indicator, Some(false));
}

// ── Light ─────────────────────────────────────────────────────

#[test]
fn relay_one_gates_the_light() {
    let (mut app, mut hw, mut sink) = boot();

    app.handle_command(set_relay(1, true, ActionSource::Remote), &mut hw, &mut sink);
    assert_eq!(app.light_level(), 50);
    // 50 % of 1023, inverted for the active-low output.
    assert_eq!(hw.last_duty(), Some(512));

    app.handle_command(set_relay(1, false, ActionSource::Remote), &mut hw, &mut sink);
    assert_eq!(app.light_level(), 0);
    assert_eq!(hw.last_duty(), Some(1023));
}

#[test]
fn brightness_repeat_keeps_sequence() {
    let (mut app, mut hw, mut sink) = boot();
    app.handle_command(set_relay(1, true, ActionSource::Remote), &mut hw, &mut sink);

    let snap = app.handle_command(AppCommand::SetBrightness { pct: 70 }, &mut hw, &mut sink);
    assert_eq!(snap.sequence, 2);
    assert_eq!(snap.last_action.as_str(), "WEB LIGHT 70%");
    assert_eq!(app.light_level(), 70);

    let snap = app.handle_command(AppCommand::SetBrightness { pct: 70 }, &mut hw, &mut sink);
    assert_eq!(snap.sequence, 2);
    assert_eq!(app.light_level(), 70);

    let snap = app.handle_command(AppCommand::SetBrightness { pct: 71 }, &mut hw, &mut sink);
    assert_eq!(snap.sequence, 3);
    assert_eq!(app.light_level(), 71);
}

#[test]
fn brightness_is_clamped() {
    let (mut app, mut hw, mut sink) = boot();

    let snap = app.handle_command(AppCommand::SetBrightness { pct: 150 }, &mut hw, &mut sink);
    assert_eq!(snap.brightness_pct, 100);
    assert_eq!(snap.last_action.as_str(), "WEB LIGHT 100%");

    let snap = app.handle_command(AppCommand::SetBrightness { pct: -5 }, &mut hw, &mut sink);
    assert_eq!(snap.brightness_pct, 0);
}

#[test]
fn blink_with_relay_one_off_is_dark() {
    let (mut app, mut hw, mut sink) = boot();

    let snap = app.handle_command(
        AppCommand::SetBlink { enabled: Some(true), hz: Some(5.0) },
        &mut hw,
        &mut sink,
    );
    assert!(snap.blink_enabled);
    assert_eq!(snap.last_action.as_str(), "WEB BLINK ON @ 5.0Hz");

    let levels = run_for(&mut app, &mut hw, &mut sink, 1_000, 2);
    assert!(levels.iter().all(|&(_, pct)| pct == 0));
}

#[test]
fn invalid_blink_frequency_keeps_prior_value() {
    let (mut app, mut hw, mut sink) = boot();

    let snap = app.handle_command(
        AppCommand::SetBlink { enabled: Some(true), hz: Some(-3.0) },
        &mut hw,
        &mut sink,
    );

    assert!(snap.blink_enabled);
    assert_eq!(snap.blink_hz, 1.0);
    assert_eq!(snap.last_action.as_str(), "WEB BLINK ON @ 1.0Hz");
    assert_eq!(sink.ignored(), 1);
}

#[test]
fn blink_off_journal_text() {
    let (mut app, mut hw, mut sink) = boot();
    app.handle_command(AppCommand::SetBlink { enabled: Some(true), hz: None }, &mut hw, &mut sink);

    let snap = app.handle_command(AppCommand::SetBlink { enabled: Some(false), hz: None }, &mut hw, &mut sink);
    assert!(!snap.blink_enabled);
    assert_eq!(snap.last_action.as_str(), "WEB BLINK OFF");
    assert_eq!(snap.sequence, 2);
}

#[test]
fn two_hertz_blink_alternates_starting_on() {
    let (mut app, mut hw, mut sink) = boot();
    app.handle_command(set_relay(1, true, ActionSource::Remote), &mut hw, &mut sink);
    app.handle_command(AppCommand::SetBlink { enabled: Some(true), hz: Some(2.0) }, &mut hw, &mut sink);
    assert_eq!(app.light_level(), 50, "blink starts in the on-phase");

    let levels = run_for(&mut app, &mut hw, &mut sink, 1_000, 2);
    assert_eq!(levels[0].1, 50);

    let mut flips = Vec::new();
    for pair in levels.windows(2) {
        if pair[0].1 != pair[1].1 {
            flips.push(pair[1]);
        }
    }

    assert!(flips.len() >= 3, "expected several flips, got {flips:?}");
    for pair in flips.windows(2) {
        assert!(pair[1].0 - pair[0].0 >= 250, "flips too close: {flips:?}");
        assert_ne!(pair[0].1, pair[1].1);
    }
    for (_, pct) in &levels {
        assert!(*pct == 0 || *pct == 50);
    }
}

#[test]
fn steady_light_is_written_once() {
    let (mut app, mut hw, mut sink) = boot();
    app.handle_command(set_relay(1, true, ActionSource::Remote), &mut hw, &mut sink);
    assert_eq!(hw.duties, vec![512]);

    run_for(&mut app, &mut hw, &mut sink, 200, 2);
    assert_eq!(hw.duties, vec![512], "unchanged level is not rewritten");
}

// ── Buttons ───────────────────────────────────────────────────

#[test]
fn clean_press_toggles_bound_relay_once() {
    let (mut app, mut hw, mut sink) = boot();

    hw.press(ButtonId::One);
    run_for(&mut app, &mut hw, &mut sink, 200, 2);
    hw.release(ButtonId::One);
    run_for(&mut app, &mut hw, &mut sink, 200, 2);

    let snap = app.snapshot();
    assert!(snap.relay1_on);
    assert!(!snap.relay2_on);
    assert_eq!(snap.sequence, 1);
    assert_eq!(snap.last_action.as_str(), "BTN1 R1 ON");
    assert_eq!(
        sink.events[0],
        AppEvent::ButtonPressed(ButtonId::One)
    );

    hw.press(ButtonId::One);
    run_for(&mut app, &mut hw, &mut sink, 200, 2);
    assert!(!app.snapshot().relay1_on);
    assert_eq!(app.snapshot().last_action.as_str(), "BTN1 R1 OFF");
}

#[test]
fn bounces_shorter_than_window_are_absorbed() {
    let (mut app, mut hw, mut sink) = boot();

    for _ in 0..6 {
        hw.press(ButtonId::Two);
        run_for(&mut app, &mut hw, &mut sink, 4, 2);
        hw.release(ButtonId::Two);
        run_for(&mut app, &mut hw, &mut sink, 4, 2);
    }
    run_for(&mut app, &mut hw, &mut sink, 200, 2);

    assert_eq!(app.snapshot().sequence, 0);
    assert!(hw.coils.is_empty());
    assert!(sink.events.is_empty());
}

#[test]
fn simultaneous_presses_toggle_both_relays() {
    let (mut app, mut hw, mut sink) = boot();

    hw.press(ButtonId::One);
    hw.press(ButtonId::Two);
    run_for(&mut app, &mut hw, &mut sink, 200, 2);

    let snap = app.snapshot();
    assert!(snap.relay1_on && snap.relay2_on);
    assert_eq!(snap.sequence, 2);
    assert_eq!(snap.last_action.as_str(), "BTN2 R2 ON");
    assert_eq!(hw.indicator, Some(true));
}

#[test]
fn ticks_are_counted() {
    let (mut app, mut hw, mut sink) = boot();
    run_for(&mut app, &mut hw, &mut sink, 20, 2);
    assert_eq!(app.tick_count(), 11);
}
