use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn";

/// Picks the tracing filter: `directives` (from `--log-filter` / FLISP_LOG) first, then
/// RUST_LOG, then warnings only. Directives that fail to parse fall back to the default.
fn select_filter(directives: Option<&str>) -> EnvFilter {
    match directives {
        Some(directives) => EnvFilter::try_new(directives).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    }
    .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Initializes tracing for general application use. Output goes to stderr.
pub fn init_logging(directives: Option<&str>) {
    tracing_subscriber::fmt()
        .with_env_filter(select_filter(directives))
        .with_writer(std::io::stderr)
        .init();
}

/// Initializes tracing specifically for tests.
#[cfg(test)]
pub fn init_test_logging() {
    // Ensures it's only done once, sets a default trace level,
    // and captures output for the test runner.
    static TRACING_INIT: std::sync::Once = std::sync::Once::new();
    TRACING_INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("trace") // Show all traces for tests
            .with_test_writer() // Capture output for tests
            .try_init()
            .ok(); // Ignore error if already initialized by another test
    });
}
