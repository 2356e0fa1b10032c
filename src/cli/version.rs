//! Version and usage output.

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Binary name shown in version and usage output.
pub const BIN_NAME: &str = "storefront-realtime";

pub fn version_line() -> String {
    format!("{} {}", BIN_NAME, VERSION)
}

/// Usage text, including the environment variables the binary reads.
pub fn usage() -> String {
    format!(
        "{bin} {version}
Tail the storefront dashboard's realtime channel, one JSON message per line.

USAGE:
    {bin} [--version | --help]

ENVIRONMENT:
    STOREFRONT_API_URL                   API base URL (default http://localhost:8000/api)
    STOREFRONT_WS_PATH                   socket path (default /ws/chat)
    STOREFRONT_WS_BASE_DELAY_MS          first reconnect delay (default 5000)
    STOREFRONT_WS_MAX_ATTEMPTS           reconnect attempts before giving up (default 5)
    STOREFRONT_WS_CONNECT_TIMEOUT_SECS   connect timeout (default none)
    RUST_LOG                             log filter (default storefront_realtime=info)",
        bin = BIN_NAME,
        version = VERSION
    )
}
