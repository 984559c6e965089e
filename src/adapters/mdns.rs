//! mDNS service advertisement adapter.
//!
//! Advertises `<hostname>.local` and an `_http._tcp` service on the HTTP
//! API port, with a TXT record carrying the firmware version. Uses raw
//! ESP-IDF mDNS calls on ESP-IDF and is a no-op on simulation targets.
//!
//! Lifecycle is tied to WiFi: start once the station has an address.

use log::info;

use crate::error::CommsError;

const MDNS_SERVICE_TYPE: &str = "_http";
const MDNS_SERVICE_PROTO: &str = "_tcp";

/// mDNS advertisement adapter.
pub struct MdnsAdapter {
    hostname: heapless::String<24>,
    port: u16,
    active: bool,
}

impl MdnsAdapter {
    pub fn new(hostname: heapless::String<24>, port: u16) -> Self {
        Self {
            hostname,
            port,
            active: false,
        }
    }

    /// Whether mDNS is currently advertising.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Start hostname + service advertisement.
    /// Call after WiFi is connected and has an IP.
    pub fn start(&mut self) -> Result<(), CommsError> {
        if self.active {
            return Ok(());
        }
        self.platform_start()?;
        self.active = true;
        info!(
            "mDNS: advertising {}.local → {}.{}:{}",
            self.hostname, MDNS_SERVICE_TYPE, MDNS_SERVICE_PROTO, self.port
        );
        Ok(())
    }

    /// Stop mDNS advertisement.
    pub fn stop(&mut self) {
        if !self.active {
            return;
        }
        self.platform_stop();
        self.active = false;
        info!("mDNS: stopped");
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_start(&self) -> Result<(), CommsError> {
        use esp_idf_svc::sys::*;

        // SAFETY: every pointer handed to the mdns_* calls is a
        // NUL-terminated buffer that outlives the call; the component
        // copies what it keeps.
        unsafe {
            let ret = mdns_init();
            if ret != ESP_OK as i32 {
                return Err(CommsError::MdnsFailed(ret));
            }

            let mut hostname_buf = [0u8; 32];
            let hb = self.hostname.as_bytes();
            let hl = hb.len().min(31);
            hostname_buf[..hl].copy_from_slice(&hb[..hl]);
            let ret = mdns_hostname_set(hostname_buf.as_ptr() as *const _);
            if ret != ESP_OK as i32 {
                return Err(CommsError::MdnsFailed(ret));
            }
            mdns_instance_name_set(b"Relay Board\0".as_ptr() as *const _);

            let svc_type = b"_http\0";
            let svc_proto = b"_tcp\0";
            let ret = mdns_service_add(
                core::ptr::null(),
                svc_type.as_ptr() as *const _,
                svc_proto.as_ptr() as *const _,
                self.port,
                core::ptr::null_mut(),
                0,
            );
            if ret != ESP_OK as i32 {
                return Err(CommsError::MdnsFailed(ret));
            }

            let ver = concat!(env!("CARGO_PKG_VERSION"), "\0");
            mdns_service_txt_item_set(
                svc_type.as_ptr() as *const _,
                svc_proto.as_ptr() as *const _,
                b"version\0".as_ptr() as *const _,
                ver.as_ptr() as *const _,
            );
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_start(&self) -> Result<(), CommsError> {
        info!(
            "mDNS(sim): registered {}.local {}.{}:{} v={}",
            self.hostname,
            MDNS_SERVICE_TYPE,
            MDNS_SERVICE_PROTO,
            self.port,
            env!("CARGO_PKG_VERSION"),
        );
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_stop(&self) {
        // SAFETY: mdns_free tears down the component started in platform_start.
        unsafe {
            esp_idf_svc::sys::mdns_free();
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_stop(&self) {
        info!("mDNS(sim): unregistered");
    }
}
