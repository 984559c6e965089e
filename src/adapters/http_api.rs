//! HTTP API adapter.
//!
//! Maps `GET /api/...` requests onto [`AppCommand`]s and answers with the
//! JSON state snapshot. Routing and response rendering are plain functions
//! so they run on the host; only the `EspHttpServer` binding is gated.
//!
//! | Path          | Query                | Command                         |
//! |---------------|----------------------|---------------------------------|
//! | `/api/state`  |                      | read-only                       |
//! | `/api/ip`     |                      | station address (text/plain)    |
//! | `/api/r1`     | `on=1`               | set relay 1 (else OFF)          |
//! | `/api/r2`     | `on=1`               | set relay 2 (else OFF)          |
//! | `/api/toggle` | `id=<n>`             | toggle relay `n`                |
//! | `/api/light`  | `pct=<int>`          | set brightness (clamped)        |
//! | `/api/blink`  | `ena=0/1`, `hz=<f>`  | update blink settings           |

use core::net::Ipv4Addr;

use embedded_hal::delay::DelayNs;

use crate::app::commands::AppCommand;
use crate::app::ports::{ActuatorPort, ClockPort, EventSink};
use crate::app::service::AppService;
use crate::state::{ActionSource, StateSnapshot};

/// Every path the server binds.
pub const ROUTES: [&str; 7] = [
    "/api/state",
    "/api/ip",
    "/api/r1",
    "/api/r2",
    "/api/toggle",
    "/api/light",
    "/api/blink",
];

// ───────────────────────────────────────────────────────────────
// Routing
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ApiRequest {
    State,
    NetworkAddress,
    Command(AppCommand),
}

/// Split a request URI into `(path, query)`.
pub fn split_uri(uri: &str) -> (&str, &str) {
    uri.split_once('?').unwrap_or((uri, ""))
}

/// Value of `key` in a `k=v&k=v` query. A bare key yields `""`.
pub fn query_param<'a>(query: &'a str, key: &str) -> Option<&'a str> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}

/// Map a request onto the command surface. `None` for unknown paths.
pub fn route(path: &str, query: &str) -> Option<ApiRequest> {
    let request = match path {
        "/api/state" => ApiRequest::State,
        "/api/ip" => ApiRequest::NetworkAddress,
        "/api/r1" | "/api/r2" => ApiRequest::Command(AppCommand::SetRelay {
            id: if path == "/api/r1" { 1 } else { 2 },
            on: query_param(query, "on") == Some("1"),
            source: ActionSource::Remote,
        }),
        "/api/toggle" => {
            // A missing or garbled id becomes 0, which the service ignores.
            let id = query_param(query, "id")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(0);
            ApiRequest::Command(AppCommand::ToggleRelay { id })
        }
        "/api/light" => match query_param(query, "pct").and_then(|v| v.trim().parse().ok()) {
            Some(pct) => ApiRequest::Command(AppCommand::SetBrightness { pct }),
            None => ApiRequest::State,
        },
        "/api/blink" => ApiRequest::Command(AppCommand::SetBlink {
            enabled: query_param(query, "ena").map(|v| v == "1"),
            // Unparsable frequencies go through as NaN and are rejected.
            hz: query_param(query, "hz").map(|v| v.trim().parse().unwrap_or(f32::NAN)),
        }),
        _ => return None,
    };
    Some(request)
}

// ───────────────────────────────────────────────────────────────
// Responses
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResponse {
    Json(String),
    Text(String),
    NotFound,
}

impl ApiResponse {
    pub fn status(&self) -> u16 {
        match self {
            Self::NotFound => 404,
            _ => 200,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json(_) => "application/json",
            Self::Text(_) | Self::NotFound => "text/plain",
        }
    }

    pub fn body(&self) -> &str {
        match self {
            Self::Json(body) | Self::Text(body) => body,
            Self::NotFound => "not found",
        }
    }

    fn snapshot(snapshot: &StateSnapshot) -> Result<Self, serde_json::Error> {
        serde_json::to_string(snapshot).map(Self::Json)
    }
}

/// Dotted-quad station address, `0.0.0.0` when not associated.
pub fn network_address_text(ip: Option<Ipv4Addr>) -> String {
    ip.unwrap_or(Ipv4Addr::UNSPECIFIED).to_string()
}

// ───────────────────────────────────────────────────────────────
// Device
// ───────────────────────────────────────────────────────────────

/// Everything one HTTP request or control tick needs, behind one lock.
pub struct Device<H, S> {
    pub app: AppService,
    pub hw: H,
    pub sink: S,
    /// Station address, refreshed by the main loop.
    pub ip: Option<Ipv4Addr>,
}

impl<H, S> Device<H, S>
where
    H: ActuatorPort + ClockPort + DelayNs,
    S: EventSink,
{
    pub fn new(app: AppService, hw: H, sink: S) -> Self {
        Self {
            app,
            hw,
            sink,
            ip: None,
        }
    }

    /// Apply a routed request and render the answer.
    pub fn respond(&mut self, request: ApiRequest) -> Result<ApiResponse, serde_json::Error> {
        match request {
            ApiRequest::State => ApiResponse::snapshot(&self.app.snapshot()),
            ApiRequest::NetworkAddress => Ok(ApiResponse::Text(network_address_text(self.ip))),
            ApiRequest::Command(cmd) => {
                let snapshot = self.app.handle_command(cmd, &mut self.hw, &mut self.sink);
                ApiResponse::snapshot(&snapshot)
            }
        }
    }

    /// Route and answer a raw request URI.
    pub fn serve(&mut self, uri: &str) -> Result<ApiResponse, serde_json::Error> {
        let (path, query) = split_uri(uri);
        match route(path, query) {
            Some(request) => self.respond(request),
            None => Ok(ApiResponse::NotFound),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF server binding
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn start_server<H, S>(
    port: u16,
    device: std::sync::Arc<std::sync::Mutex<Device<H, S>>>,
) -> Result<esp_idf_svc::http::server::EspHttpServer<'static>, crate::error::CommsError>
where
    H: ActuatorPort + ClockPort + DelayNs + Send + 'static,
    S: EventSink + Send + 'static,
{
    use esp_idf_svc::http::Method;
    use esp_idf_svc::http::server::{Configuration, EspHttpServer};
    use esp_idf_svc::io::Write as _;
    use log::{info, warn};

    use crate::error::CommsError;

    let config = Configuration {
        http_port: port,
        ..Default::default()
    };
    let mut server = EspHttpServer::new(&config).map_err(|e| {
        warn!("HTTP: server init failed: {:?}", e);
        CommsError::HttpServerFailed
    })?;

    for path in ROUTES {
        let device = device.clone();
        server
            .fn_handler(path, Method::Get, move |req| -> anyhow::Result<()> {
                let response = {
                    let mut device = device
                        .lock()
                        .map_err(|_| anyhow::anyhow!("device lock poisoned"))?;
                    device
                        .serve(req.uri())
                        .map_err(|e| anyhow::anyhow!("snapshot encoding failed: {}", e))?
                };
                let mut resp = req
                    .into_response(response.status(), None, &[("Content-Type", response.content_type())])
                    .map_err(|e| anyhow::anyhow!("{:?}", e))?;
                resp.write_all(response.body().as_bytes())
                    .map_err(|e| anyhow::anyhow!("{:?}", e))?;
                Ok(())
            })
            .map_err(|e| {
                warn!("HTTP: handler registration for {} failed: {:?}", path, e);
                CommsError::HttpServerFailed
            })?;
    }

    info!("HTTP: API listening on port {}", port);
    Ok(server)
}
