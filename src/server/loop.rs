// Server loop module
// Accepts connections until shutdown is requested

use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;

use super::connection::handle_connection;
use crate::config::ServeConfig;
use crate::logger;

/// Accept connections on `listener` until `shutdown` resolves.
///
/// Each connection is served in its own task. Accept failures are logged
/// and the loop keeps going.
pub async fn run(listener: TcpListener, cfg: Arc<ServeConfig>, shutdown: impl Future<Output = ()>) {
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        handle_connection(stream, peer_addr, Arc::clone(&cfg));
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = &mut shutdown => {
                logger::log_shutdown();
                return;
            }
        }
    }
}
