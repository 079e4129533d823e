use dsrconfig::get_config;
use dsrserver::{
    ServerBuilder,
    logs::{LoggingOptions, init_logging},
};
use dsrsoap::{CallbackReceiverExt, TracingSink};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // La configuration fixe les options de logging : ses avertissements de
    // chargement sont émis une fois le subscriber installé
    let config = get_config();
    init_logging(LoggingOptions::from_config(&config));

    info!("🚀 DSR callback receiver v{}", env!("CARGO_PKG_VERSION"));
    config.log_load_report();

    let mut server = ServerBuilder::new_configured().build();

    // Les callbacks sont acceptés en POST sur tous les chemins
    server
        .register_callback_receiver(Arc::new(TracingSink))
        .await?;

    server.start().await?;

    let server_info = server.info();
    info!(
        "✅ Listening for DSR notifications on http://{}:{}",
        server_info.bind_address, server_info.http_port
    );
    info!("Press Ctrl+C to stop");

    server.wait().await;
    info!("👋 Receiver stopped");

    Ok(())
}
