use anyhow::Context;
use clap::Parser;
use sneaker_store::{
    configure_tracing, construct_app_state,
    domain::orders::orders_from_db_read_model_reset,
    infra::{Cli, get_config_settings},
    start_server,
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = get_config_settings().context("Could not read application configuration.")?;

    // _worker_guard is held by main() so buffered tracing events are flushed to the log file
    // when it is dropped at exit.
    let _worker_guard = configure_tracing(&settings);

    let app_state = construct_app_state(settings).await?;

    if cli.reset_orders_read_model {
        orders_from_db_read_model_reset(&app_state.pool).await?;
        info!("Orders read model reset, events will be replayed.");
    }

    start_server(app_state).await
}
