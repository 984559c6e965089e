//! Relay board firmware: main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter        LogEventSink   Esp32TimeAdapter        │
//! │  (Input+Actuator+Clock) (EventSink)    (ClockPort)             │
//! │  WifiAdapter            MdnsAdapter    HTTP API                │
//! │  (Connectivity)         (discovery)    (command surface)       │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Debounce · Relay pulse · Light presenter              │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The control tick runs on the main task; HTTP handlers run on the
//! server task. Both go through the same `Mutex<Device>`, so commands and
//! ticks never interleave.
#![deny(unused_must_use)]

use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use log::{info, warn};

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::EspWifi;

use relayboard::adapters::hardware::HardwareAdapter;
use relayboard::adapters::http_api::{self, Device};
use relayboard::adapters::log_sink::LogEventSink;
use relayboard::adapters::mdns::MdnsAdapter;
use relayboard::adapters::time::Esp32TimeAdapter;
use relayboard::adapters::wifi::{ConnectivityPort, WifiAdapter};
use relayboard::app::service::AppService;
use relayboard::config::SystemConfig;
use relayboard::drivers::coil::LatchingCoilDriver;
use relayboard::drivers::hw_init;
use relayboard::drivers::light_pwm::{IndicatorLed, LightPwmDriver};
use relayboard::error::Error;
use relayboard::pins;

/// How often the network state machine is polled.
const NET_POLL_MS: u32 = 250;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Relay board v{}                  ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = SystemConfig::default();
    config.validate().map_err(Error::from)?;

    // ── 3. Peripherals, outputs to their boot level ───────────
    hw_init::init_peripherals(config.light_pwm_freq_hz).map_err(Error::from)?;

    let mut hw = HardwareAdapter::new(
        LatchingCoilDriver::new(),
        LightPwmDriver::new(config.light_max_level),
        IndicatorLed::new(pins::LED2_GPIO),
        Esp32TimeAdapter::new(),
    );
    let mut log_sink = LogEventSink::new();

    let mut app = AppService::new(&config);
    app.start(&mut hw, &mut log_sink);

    let device = Arc::new(Mutex::new(Device::new(app, hw, log_sink)));

    // ── 4. Network (failures leave the controller running) ────
    let clock = Esp32TimeAdapter::new();
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take().ok();

    let mut wifi = WifiAdapter::new(config.wifi_connect_timeout_ms)
        .with_driver(EspWifi::new(peripherals.modem, sysloop, nvs)?);

    match (option_env!("RELAY_WIFI_SSID"), option_env!("RELAY_WIFI_PASS")) {
        (Some(ssid), password) => {
            let started = wifi
                .set_credentials(ssid, password.unwrap_or(""))
                .and_then(|()| wifi.connect(clock.now_ms()));
            if let Err(e) = started {
                warn!("WiFi: {} (retrying in background)", Error::from(e));
            }
        }
        (None, _) => warn!("WiFi: no credentials compiled in, running offline"),
    }

    let mut mdns = MdnsAdapter::new(config.mdns_hostname.clone(), config.http_port);

    let _server = match http_api::start_server(config.http_port, device.clone()) {
        Ok(server) => Some(server),
        Err(e) => {
            warn!("{}", Error::from(e));
            None
        }
    };

    info!("System ready. Entering control loop.");

    // ── 5. Control loop ───────────────────────────────────────
    let mut last_net_poll = clock.now_ms();
    loop {
        {
            let mut guard = device.lock().map_err(|_| anyhow!("device lock poisoned"))?;
            let Device { app, hw, sink, .. } = &mut *guard;
            app.tick(hw, sink);
        }

        let now = clock.now_ms();
        if now.wrapping_sub(last_net_poll) >= NET_POLL_MS {
            last_net_poll = now;
            wifi.poll(now);

            let ip = wifi.ip_address();
            if ip.is_some() && !mdns.is_active() {
                if let Err(e) = mdns.start() {
                    warn!("{}", Error::from(e));
                }
            }

            let mut guard = device.lock().map_err(|_| anyhow!("device lock poisoned"))?;
            if guard.ip != ip {
                match ip {
                    Some(addr) => info!("Network: http://{}/ ({}.local)", addr, mdns.hostname()),
                    None => warn!("Network: address lost"),
                }
                guard.ip = ip;
            }
        }

        FreeRtos::delay_ms(config.tick_interval_ms);
    }
}
