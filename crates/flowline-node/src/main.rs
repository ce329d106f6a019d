//! flowline node binary.
//!
//! One process per role: trigger, controller, broker, dispatcher, functions,
//! or agent. The role comes from the config file (first CLI argument,
//! default `flowline.yaml`).

use std::net::SocketAddr;

use tokio::sync::watch;
use tracing_subscriber::{fmt, EnvFilter};

use flowline_node::config::NodeRole;
use flowline_node::{app_state, config, dispatch, router};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "flowline.yaml".to_string());
    let cfg = config::load_from_file(&path).expect("config load failed");
    let listen: SocketAddr = cfg
        .node
        .listen
        .parse()
        .expect("node.listen must be a valid SocketAddr");
    let role = cfg.node.role;

    let state = app_state::AppState::new(cfg).expect("state build failed");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn({
        let state = state.clone();
        async move {
            shutdown_signal().await;
            state.metrics().set_draining();
            tracing::info!("shutdown signal received, draining");
            let _ = shutdown_tx.send(true);
        }
    });

    let consumers = (role == NodeRole::Dispatcher)
        .then(|| tokio::spawn(dispatch::run(state.clone(), shutdown_rx.clone())));

    let app = router::build_router(state);
    tracing::info!(%listen, role = role.as_str(), "flowline-node starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .expect("failed to bind");

    let mut shutdown_rx_server = shutdown_rx.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx_server.changed().await;
        })
        .await
        .expect("server failed");

    if let Some(handle) = consumers {
        let _ = handle.await;
    }
    tracing::info!("flowline-node stopped");
}

/// Resolve on SIGINT or (on unix) SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
