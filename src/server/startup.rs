//! REST server startup and configuration

use std::sync::Arc;

use anyhow::Result;
use axum::serve;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::server::routing::create_router;
use crate::services::ServiceContext;

/// Start the REST server and block until it shuts down
pub async fn start_server(context: ServiceContext) -> Result<()> {
    let bind_address = context.config.server.bind_address.clone();

    let app = create_router(Arc::new(context)).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "parley server listening");
    println!("🚀 Parley server listening on http://{}", bind_address);

    serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    tracing::info!("server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
