use crate::config::Config;
use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Installs the fmt subscriber. Safe to call more than once; later calls are no-ops.
pub fn init_tracing(config: &Config) -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("app_transfer={}", config.log_level).parse()?)
        .add_directive("sea_orm=warn".parse()?)
        .add_directive("sqlx=warn".parse()?);

    if tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .try_init()
        .is_err()
    {
        tracing::debug!("Tracing subscriber already installed");
    }

    Ok(())
}
