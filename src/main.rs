use clap::Parser;
use minigql::{create_app, SchemaStyle, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "minigql")]
#[command(about = "minigql - a small GraphQL query server", long_about = None)]
struct Args {
    /// Address to bind
    #[arg(long, env = "MINIGQL_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "MINIGQL_PORT", default_value_t = 80)]
    port: u16,

    /// Path of the GraphQL endpoint
    #[arg(long, env = "MINIGQL_ROUTE", default_value = "/graphqlAPI")]
    route: String,

    /// How the schema is constructed
    #[arg(long, env = "MINIGQL_SCHEMA_STYLE", value_enum, default_value_t = SchemaStyle::Sdl)]
    schema_style: SchemaStyle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "minigql=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::new(args.host, args.port, &args.route, args.schema_style);
    let addr = config.bind_addr();
    let route = config.route.clone();

    // Schema errors abort startup
    let app = create_app(config)?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}{}", addr, route);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, waiting for in-flight requests to finish");
}
