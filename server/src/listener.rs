use axum::Router;
use shared::SmolExecutor;
use smol::net::TcpListener;
use tracing::{debug, error, warn};

use crate::handler::handle_connection;

/// Accepts connections forever, serving each one on its own task.
pub async fn serve(listener: TcpListener, router: Router) {
    loop {
        let (stream, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("Failed to accept connection: {}", e);
                continue;
            }
        };

        debug!(%addr, "Accepted connection");
        let router = router.clone();

        smol::spawn(async move {
            if let Err(e) = handle_connection(router, SmolExecutor::new(), stream).await {
                warn!(%addr, "Error serving connection: {}", e);
            }
        })
        .detach();
    }
}
