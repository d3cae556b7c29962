//! tracing subscriber setup for the binary

use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_level` applies. Logs go to
/// stderr so stdout stays clean for `--json` output.
pub fn init(default_level: &str, ansi: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))?;

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .with_target(false);

    let collector = tracing_subscriber::registry().with(filter).with(console);
    tracing::subscriber::set_global_default(collector)?;

    tracing::debug!(level = default_level, "logging initialised");
    Ok(())
}
