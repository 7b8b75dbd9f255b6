use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use kakao_route::kakao::{KakaoClient, KakaoConfig};
use kakao_route::mcp::McpServer;
use kakao_route::routing::RouteService;
use kakao_route::web::{AppState, create_router};

/// Kakao route server.
///
/// Car, transit, bicycle and walking directions from Kakao Mobility, with
/// place names geocoded through Kakao Local. Served over HTTP (`serve`) or
/// as an MCP tool server on stdio (`mcp`).
#[derive(Parser)]
#[command(name = "kakao-route", version, about, long_about = None)]
struct Cli {
    /// Kakao REST API key.
    #[arg(long, env = "KAKAO_REST_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Kakao Mobility base URL.
    #[arg(long, env = "KAKAO_MOBILITY_BASE_URL", default_value = kakao_route::kakao::DEFAULT_MOBILITY_BASE_URL)]
    mobility_base_url: String,

    /// Kakao Local base URL.
    #[arg(long, env = "KAKAO_LOCAL_BASE_URL", default_value = kakao_route::kakao::DEFAULT_LOCAL_BASE_URL)]
    local_base_url: String,

    /// Upstream request timeout in seconds.
    #[arg(long, env = "KAKAO_TIMEOUT_SECS", default_value_t = kakao_route::kakao::DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Host name or IP address to bind the HTTP server to.
    #[arg(long, global = true, default_value = "127.0.0.1")]
    host: String,

    /// Port for the HTTP server.
    #[arg(long, global = true, env = "PORT", default_value_t = 3000)]
    port: u16,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy, Default)]
enum Command {
    /// Serve the HTTP API (default).
    #[default]
    Serve,

    /// Serve MCP over stdin/stdout.
    Mcp,
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kakao_route=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging();

    let config = KakaoConfig::new(cli.api_key)
        .with_mobility_base_url(cli.mobility_base_url)
        .with_local_base_url(cli.local_base_url)
        .with_timeout(cli.timeout_secs);

    let client = match KakaoClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "failed to create Kakao client");
            std::process::exit(1);
        }
    };
    let service = RouteService::new(client);

    let result = match cli.command.unwrap_or_default() {
        Command::Serve => serve(service, &cli.host, cli.port).await,
        Command::Mcp => McpServer::new(service.into()).run_stdio().await,
    };

    if let Err(e) = result {
        error!(error = %e, "server stopped");
        std::process::exit(1);
    }
}

async fn serve(service: RouteService, host: &str, port: u16) -> std::io::Result<()> {
    let app = create_router(AppState::new(service));
    let listener = bind(host, port).await?;
    let addr = listener.local_addr()?;

    info!(%addr, "Kakao route server listening");
    info!("  GET  /health");
    info!("  POST /route/car | /route/future | /route/transit | /route/bicycle | /route/walk");
    info!("  POST /route/destinations");
    info!("  POST /geocode | /search/keyword");
    info!("  POST /mcp");

    axum::serve(listener, app).await
}

/// Bind the HTTP listener. `host` may be a hostname or an IP literal.
async fn bind(host: &str, port: u16) -> std::io::Result<tokio::net::TcpListener> {
    tokio::net::TcpListener::bind((host, port)).await
}
