mod config;
mod firebase;
mod record;
mod routes;
mod services;
mod state;
mod views;

use std::sync::Arc;

use firebase::auth::FirebaseAuth;
use firebase::firestore::FirestoreStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env().expect("invalid configuration");
    let http = firebase::http_client(config.http_timeout_secs).expect("http client build failed");

    let identity = FirebaseAuth::new(
        http.clone(),
        config.firebase.api_key.clone(),
        &config.endpoints.identity_toolkit,
        &config.endpoints.secure_token,
    );
    let store = FirestoreStore::new(
        http.clone(),
        &config.endpoints.firestore,
        config.firebase.project_id.clone(),
        config.firebase.api_key.clone(),
    );
    tracing::info!(
        project = %config.firebase.project_id,
        collection = %config.collection,
        google = config.google.is_some(),
        "firebase clients initialized"
    );
    tracing::debug!(
        auth_domain = %config.firebase.auth_domain,
        storage_bucket = %config.firebase.storage_bucket,
        messaging_sender_id = %config.firebase.messaging_sender_id,
        app_id = %config.firebase.app_id,
        "firebase app settings"
    );

    let port = config.port;
    let state = state::AppState::new(config, Arc::new(identity), Arc::new(store), http);
    let _sweeper = services::session::spawn_sweeper(state.sessions.clone(), services::session::SWEEP_INTERVAL);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "contribution tracker listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server failed");
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "ctrl-c handler failed");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "sigterm handler failed"),
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutting down");
}
