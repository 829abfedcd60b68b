//! HookGate Server - webhook gateway with sender signature verification.
//!
//! Every request must carry a valid `X-Twilio-Signature` computed with the
//! shared auth token; anything else is answered with `403 Forbidden` before
//! it reaches the handler.
//!
//! # Usage
//!
//! ```text
//! TWILIO_AUTH_TOKEN=... GATEWAY_LISTEN=0.0.0.0:8080 hookgate-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GATEWAY_LISTEN` | `0.0.0.0:8080` | Bind address |
//! | `TWILIO_AUTH_TOKEN` | *(unset)* | Shared secret; unset rejects every request |
//! | `HOOKGATE_REMOVE_URL_PART` | *(unset)* | Substring removed from the URL before verification |
//! | `HOOKGATE_URL_SCHEME` | `https` | Scheme of the externally visible URL |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod handler;

use std::future::Future;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use hookgate_auth::Secret;
use hookgate_core::GateConfig;
use hookgate_http::{GateHttpConfig, SignatureGateService, WebhookHandler};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::handler::AcknowledgeHandler;

/// Server version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Build the [`GateHttpConfig`] from the application [`GateConfig`].
fn build_http_config(config: &GateConfig) -> GateHttpConfig {
    GateHttpConfig {
        secret: config.auth_token.clone().map(Secret::from),
        remove_url_part: config.remove_url_part.clone(),
        url_scheme: config.url_scheme.clone(),
        ..GateHttpConfig::default()
    }
}

/// Path answered by the gate without signature verification.
const HEALTH_PATH: &str = "/health";

/// Resolve once ctrl-c is received.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for ctrl-c");
    }
    info!("received shutdown signal, draining connections");
}

/// Accept connections on `listener` until `shutdown` resolves, then wait for
/// in-flight webhooks to finish.
async fn serve<H, F>(listener: TcpListener, service: SignatureGateService<H>, shutdown: F)
where
    H: WebhookHandler,
    F: Future<Output = ()>,
{
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());
    tokio::pin!(shutdown);

    loop {
        let (stream, peer_addr) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    warn!(error = %e, "failed to accept connection");
                    continue;
                }
            },
            () = &mut shutdown => break,
        };

        let conn = http.serve_connection(TokioIo::new(stream), service.clone());
        let conn = graceful.watch(conn.into_owned());
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                error!(%peer_addr, error = %e, "connection error");
            }
        });
    }

    graceful.shutdown().await;
    info!("all webhook connections drained");
}

/// Ask a running gate at `addr` whether it is healthy.
async fn run_health_check(addr: &str) -> Result<()> {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .with_context(|| format!("cannot connect to {addr}"))?;
    let request =
        format!("GET {HEALTH_PATH} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await?;

    let mut response = String::new();
    stream.read_to_string(&mut response).await?;

    let status_ok = response
        .lines()
        .next()
        .is_some_and(|line| line.split_whitespace().nth(1) == Some("200"));
    if status_ok && response.contains("\"status\":\"running\"") {
        Ok(())
    } else {
        anyhow::bail!("gate at {addr} is not healthy")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // `--health-check` probes a running gate and reports through the exit code.
    if std::env::args().any(|a| a == "--health-check") {
        let config = GateConfig::from_env();
        let addr = config.gateway_listen.replace("0.0.0.0", "127.0.0.1");
        let healthy = run_health_check(&addr).await.is_ok();
        std::process::exit(i32::from(!healthy));
    }

    let config = GateConfig::from_env();

    init_tracing(&config.log_level)?;
    config.validate().context("invalid configuration")?;

    info!(
        gateway_listen = %config.gateway_listen,
        auth_token_configured = config.auth_token.is_some(),
        remove_url_part = ?config.remove_url_part,
        url_scheme = %config.url_scheme,
        version = VERSION,
        "starting HookGate Server",
    );

    let service = SignatureGateService::new(AcknowledgeHandler, build_http_config(&config));

    let addr: SocketAddr = config
        .gateway_listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.gateway_listen))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, "listening for connections");

    serve(listener, service, shutdown_signal()).await;
    Ok(())
}
