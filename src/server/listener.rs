use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::dispatch::Dispatcher;
use crate::http::connection::Connection;

/// Accepts connections on `listen_addr`, one task per connection.
pub async fn run(listen_addr: &str, dispatcher: Arc<Dispatcher>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("Failed to bind {listen_addr}"))?;
    info!("Listening on {}", listener.local_addr()?);

    serve(listener, dispatcher).await
}

/// Accept loop over an already bound listener.
pub async fn serve(listener: TcpListener, dispatcher: Arc<Dispatcher>) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!(error = %e, "Failed to accept connection");
                continue;
            }
        };
        debug!("Accepted connection from {}", peer);

        let dispatcher = Arc::clone(&dispatcher);
        tokio::spawn(async move {
            // Failures were already rendered and reported by the observer.
            let _ = dispatcher.handle(Connection::new(socket), Some(peer)).await;
        });
    }
}
