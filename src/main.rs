use std::net::TcpListener;
use gym_shop::configuration::get_configuration;
use gym_shop::startup::{build_stores, run};
use gym_shop::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry();

    tracing::info!("Starting application");

    let configuration = match get_configuration() {
        Ok(config) => {
            tracing::info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            tracing::error!("Failed to read configuration: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Configuration error",
            ));
        }
    };

    let stores = build_stores(&configuration.database).await.map_err(|e| {
        tracing::error!("Failed to open storage: {}", e);
        std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "Storage error")
    })?;

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server listening on: {}", address);

    run(listener, stores, &configuration)?.await
}
