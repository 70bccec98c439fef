use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tracing::{Instrument, info};

use crate::http::connection::Connection;
use crate::server::ServerContext;

pub async fn bind(addr: &str) -> anyhow::Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))
}

/// Accepts connections until `shutdown` completes, then gives in-flight
/// connections up to `grace` to finish before aborting them.
pub async fn run<F>(
    listener: TcpListener,
    ctx: Arc<ServerContext>,
    grace: Duration,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()>,
{
    info!("Listening on {}", listener.local_addr()?);
    info!("Serving files from {}", ctx.root().display());
    if ctx.echo_enabled() {
        info!("Echoing unmatched paths under {}", ctx.diagnostic_prefix());
    }

    let mut connections = JoinSet::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown signal received");
                break;
            }

            accepted = listener.accept() => {
                let (socket, peer) = match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        // Usually fd exhaustion; back off instead of spinning.
                        tracing::warn!(error = %e, "Failed to accept connection");
                        tokio::time::sleep(Duration::from_millis(100)).await;
                        continue;
                    }
                };
                info!("Accepted connection from {}", peer);

                let ctx = Arc::clone(&ctx);
                connections.spawn(
                    async move {
                        let mut conn = Connection::new(socket, ctx);
                        if let Err(e) = conn.run().await {
                            tracing::error!("Connection error from {}: {}", peer, e);
                        }
                    }
                    .instrument(tracing::info_span!("conn", %peer)),
                );
            }

            Some(finished) = connections.join_next(), if !connections.is_empty() => {
                if let Err(e) = finished {
                    if e.is_panic() {
                        tracing::error!(error = %e, "Connection task panicked");
                    }
                }
            }
        }
    }

    drop(listener);

    let drained = tokio::time::timeout(grace, async {
        while connections.join_next().await.is_some() {}
    })
    .await;

    if drained.is_err() {
        tracing::warn!(
            remaining = connections.len(),
            "Grace period elapsed, closing remaining connections"
        );
        connections.shutdown().await;
    }

    info!("Server stopped");
    Ok(())
}
