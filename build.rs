fn main() {
    println!("cargo:rerun-if-env-changed=RELAY_WIFI_SSID");
    println!("cargo:rerun-if-env-changed=RELAY_WIFI_PASS");

    // ESP-IDF environment is only needed for the on-device binary;
    // host builds (tests, tooling) skip it entirely.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
