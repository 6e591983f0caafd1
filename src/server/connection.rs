// Connection handling module
// Serves a single accepted TCP connection in its own task

use std::net::SocketAddr;
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use crate::config::ServeConfig;
use crate::handler;
use crate::logger;

/// Handle a single connection in a spawned task.
///
/// Requests on the connection share nothing but the read-only config.
/// When the client goes away hyper drops the in-flight response body,
/// which closes the file being streamed.
pub fn handle_connection(stream: TcpStream, peer: SocketAddr, cfg: Arc<ServeConfig>) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let service = service_fn(move |req| handler::handle_request(req, Arc::clone(&cfg), peer));

        if let Err(err) = http1::Builder::new()
            .keep_alive(true)
            .serve_connection(io, service)
            .await
        {
            logger::log_connection_error(&err);
        }
    });
}
