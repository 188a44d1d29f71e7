use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, EnvFilter};

const LOG_ENV: &str = "CIRCLE_REPLAY_LOG";

/// Installs the stderr subscriber. Verbosity comes from `CIRCLE_REPLAY_LOG`
/// (env-filter syntax), defaulting to warnings only.
pub fn init(json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|err| anyhow!("failed to install log subscriber: {err}"))
}
