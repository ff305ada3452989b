use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use http_body_util::BodyExt;
use hyper::Request;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tower::ServiceExt;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use server::handlers::http::routes::build_api_router;
use server::{AppState, build_service, database};

/// Sqlite connections shared by all requests.
const DB_POOL_SIZE: u32 = 8;

#[derive(Parser, Debug)]
#[command(name = "server", about = "ITAMS API server")]
struct Args {
    /// Path to the TOML config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Create or promote this account to super-admin before serving.  The
    /// password is read from `ITAMS_ADMIN_PASSWORD`.
    #[arg(long, value_name = "USERNAME")]
    bootstrap_admin: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let config = shared::config::load_config(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config))?;
    let secret = config
        .auth
        .resolved_jwt_secret()
        .ok_or_else(|| anyhow!("No JWT secret configured; set JWT_SECRET or auth.jwt_secret"))?;

    let db = database::connect(&config.database.url, DB_POOL_SIZE).await?;
    database::create_tables(&db).await?;

    if let Some(username) = args.bootstrap_admin.as_deref() {
        let password = std::env::var("ITAMS_ADMIN_PASSWORD")
            .context("ITAMS_ADMIN_PASSWORD must be set with --bootstrap-admin")?;
        let id = database::bootstrap_super_admin(&db, username, &password).await?;
        info!("Super-admin {} ready (id {})", username, id);
    }

    let addr = config.server.addr();
    let max_connections = config.server.max_connections;

    let state = AppState::new(config.clone(), db, &secret);
    let router = Arc::new(build_api_router());
    let svc = build_service(state, router, &config);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    let slots = Arc::new(Semaphore::new(max_connections));

    info!("Listening on http://{}", addr);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!("Failed to accept connection: {}", e);
                        continue;
                    }
                };

                let permit = match slots.clone().try_acquire_owned() {
                    Ok(permit) => permit,
                    Err(_) => {
                        warn!("Connection limit reached; dropping {}", peer);
                        continue;
                    }
                };

                let svc = svc.clone();
                tokio::task::spawn(async move {
                    let _permit = permit;
                    let io = TokioIo::new(stream);
                    let conn_svc = service_fn(move |req: Request<Incoming>| {
                        svc.clone().oneshot(req.map(|body| body.boxed()))
                    });

                    if let Err(err) = http1::Builder::new()
                        .timer(TokioTimer::new())
                        .serve_connection(io, conn_svc)
                        .await
                    {
                        error!("Error serving connection from {}: {:?}", peer, err);
                    }
                });
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    info!("Server closed");
    Ok(())
}
