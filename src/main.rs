use classroom_signaling::api::signaling_routes;
use classroom_signaling::config::{Config, LogFormat};
use classroom_signaling::SignalingServer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.logging.format);

    let server = SignalingServer::new();
    let routes = signaling_routes::routes(server);

    let (addr, serving) = warp::serve(routes).bind_with_graceful_shutdown(config.bind_address(), async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
        }
        tracing::info!("Shutdown signal received");
    });

    tracing::info!(%addr, "Signaling server running");
    serving.await;
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
