use tracing_subscriber::EnvFilter;

/// Initialise logging for a host embedding the palette. The default level is
/// `info`; passing `debug = true` raises it to `debug` and lets `RUST_LOG`
/// override the filter. With debug off the environment is ignored so a stray
/// `RUST_LOG` cannot make the palette chatty.
pub fn init(debug: bool) {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
