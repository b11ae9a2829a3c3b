//! Listener startup and coordinated shutdown
//!
//! One process runs up to four listeners (REST, GraphQL, SOAP, gRPC) on separate ports, all over
//! the same [`AppState`]. A listener that fails brings the others down with it.

use std::future::Future;
use std::net::{IpAddr, SocketAddr};

use anyhow::{anyhow, bail, Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio_stream::wrappers::TcpListenerStream;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::grpc::CatalogGrpc;
use crate::{graphql, rest, soap, AppState};

/// Ports to serve on; `None` disables that listener
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listeners {
    pub host: String,
    pub rest: Option<u16>,
    pub graphql: Option<u16>,
    pub soap: Option<u16>,
    pub grpc: Option<u16>,
}

/// Common HTTP middleware: request tracing and permissive CORS
pub fn http_layers(router: Router) -> Router {
    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn bind(name: &str, addr: SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {} listener to {}", name, addr))
}

/// Serve an axum router on an already-bound listener until `shutdown` resolves
pub async fn serve_http<F>(
    name: &'static str,
    listener: TcpListener,
    router: Router,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!("{} listening on http://{}", name, addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, http_layers(router))
        .with_graceful_shutdown(shutdown)
        .await
        .with_context(|| format!("{} server error", name))?;

    info!("{} shutdown complete", name);
    Ok(())
}

/// Serve `streamcat.CatalogService` on an already-bound listener until `shutdown` resolves
pub async fn serve_grpc<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!("streamcat-grpc listening on {}", listener.local_addr()?);

    tonic::transport::Server::builder()
        .add_service(CatalogGrpc::new(state).into_server())
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
        .await
        .context("streamcat-grpc server error")?;

    info!("streamcat-grpc shutdown complete");
    Ok(())
}

async fn stopped(mut rx: watch::Receiver<bool>) {
    let _ = rx.wait_for(|stop| *stop).await;
}

/// Bind every enabled listener and serve until `signal` resolves or a listener fails
pub async fn run<F>(listeners: Listeners, state: AppState, signal: F) -> Result<()>
where
    F: Future<Output = ()> + Send,
{
    let ip: IpAddr = listeners
        .host
        .parse()
        .with_context(|| format!("Invalid listen host: {}", listeners.host))?;

    let (stop, rx) = watch::channel(false);
    let mut tasks = JoinSet::new();

    let http: [(&'static str, Option<u16>, fn(AppState) -> Router); 3] = [
        (rest::MODULE, listeners.rest, rest::build_router),
        (graphql::MODULE, listeners.graphql, graphql::build_router),
        (soap::MODULE, listeners.soap, soap::build_router),
    ];
    for (name, port, build) in http {
        if let Some(port) = port {
            let listener = bind(name, SocketAddr::new(ip, port)).await?;
            tasks.spawn(serve_http(name, listener, build(state.clone()), stopped(rx.clone())));
        }
    }
    if let Some(port) = listeners.grpc {
        let listener = bind("streamcat-grpc", SocketAddr::new(ip, port)).await?;
        tasks.spawn(serve_grpc(listener, state.clone(), stopped(rx.clone())));
    }

    if tasks.is_empty() {
        bail!("Every listener is disabled; nothing to serve");
    }

    let early = tokio::select! {
        _ = signal => None,
        Some(joined) = tasks.join_next() => Some(joined),
    };

    let mut first_error = early.map(|joined| match joined {
        Ok(Ok(())) => anyhow!("A listener stopped unexpectedly"),
        Ok(Err(e)) => e,
        Err(e) => anyhow!("Listener task failed: {}", e),
    });

    let _ = stop.send(true);
    while let Some(joined) = tasks.join_next().await {
        let err = match joined {
            Ok(Ok(())) => continue,
            Ok(Err(e)) => e,
            Err(e) => anyhow!("Listener task failed: {}", e),
        };
        error!("{:#}", err);
        if first_error.is_none() {
            first_error = Some(err);
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
