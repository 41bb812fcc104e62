fn main() {
    println!("cargo:rerun-if-env-changed=TCPECHO_CONFIG_JSON");

    // Host builds (tests, simulation) have no ESP-IDF toolchain to export.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }
}
