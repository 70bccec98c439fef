use std::sync::Arc;

use anyhow::Context;

use picohttpd::config::Config;
use picohttpd::server::{ServerContext, listener};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let mut args = std::env::args().skip(1);
    if let Some(port) = args.next() {
        let port = port
            .parse::<u16>()
            .with_context(|| format!("invalid port {:?}\nusage: picohttpd [PORT]", port))?;
        cfg.set_port(port);
    }
    if args.next().is_some() {
        anyhow::bail!("usage: picohttpd [PORT]");
    }

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(cfg.log_level()?)
        .init();

    let ctx = Arc::new(ServerContext::new(&cfg)?);
    let socket = listener::bind(ctx.listen_addr()).await?;

    listener::run(socket, ctx, cfg.server.shutdown_grace(), shutdown_signal()).await
}

/// Completes on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
