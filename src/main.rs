use dotenvy::dotenv;
use tracing::info;

use sharesub_api::infra::{
    app::create_app, notification_worker::run_notification_dispatch_loop,
    renewal_worker::run_renewal_sweep_loop, setup::init_runtime,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let runtime = init_runtime().await?;

    let bind_addr = runtime.app_state.config.bind_addr;
    let sweep_interval_secs = runtime.app_state.config.sweep_interval_secs;

    let app = create_app(runtime.app_state);

    // Background workers start after tracing is initialized by create_app.
    tokio::spawn(run_renewal_sweep_loop(runtime.sweep, sweep_interval_secs));
    tokio::spawn(run_notification_dispatch_loop(
        runtime.notification_rx,
        runtime.notification_sink,
    ));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!("Backend listening at {}", &listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
