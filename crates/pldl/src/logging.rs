use tracing_subscriber::EnvFilter;

const CRATES: &[&str] = &["pldl", "pldl_fetch", "pldl_media"];

fn default_directives(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    CRATES
        .iter()
        .map(|c| format!("{c}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the stderr subscriber. `RUST_LOG` wins over `-v`.
pub fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directives(verbosity).into());

    // Fails only when a global subscriber is already installed; keep that one.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}
