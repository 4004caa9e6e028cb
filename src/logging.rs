use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber.
///
/// Level comes from `RUST_LOG` (default `info`); `LOG_FORMAT=json` switches to
/// JSON lines. Output goes to stderr so command results on stdout stay clean.
/// Calling it again is a no-op.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
