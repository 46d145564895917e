use lang_portal_backend::config::Config;
use lang_portal_backend::db::Store;
use lang_portal_backend::{create_app, logging, seed};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();

    let _file_log_guard = logging::init_tracing(&config.log_level, config.log_dir.as_deref());

    let store = match Store::open(&config.db).await {
        Ok(store) => store,
        Err(err) => {
            tracing::error!(error = %err, url = %config.db.url, "failed to open event store");
            std::process::exit(1);
        }
    };

    if config.seed_demo_data {
        if let Err(err) = seed::seed_demo_data(&store).await {
            tracing::warn!(error = %err, "demo seed failed");
        }
    }

    let app = create_app(store.clone());

    let addr = config.bind_addr();
    tracing::info!(%addr, "lang-portal backend listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("bind listener failed");

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

    if let Err(e) = server.await {
        tracing::error!(error = %e, "server error");
    }

    tracing::info!("HTTP server stopped, closing event store");
    store.close().await;
    tracing::info!("Graceful shutdown complete");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
