// Listener module
// Creates the TCP listener the server accepts on

use std::io;
use std::net::SocketAddr;

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;

use crate::error::StartupError;

const BACKLOG: i32 = 128;

/// Bind the serving address, reporting an occupied port as `AddrInUse`.
pub fn bind(addr: SocketAddr) -> Result<TcpListener, StartupError> {
    create_listener(addr).map_err(|e| StartupError::from_bind(addr, e))
}

/// Create a `TcpListener` with `SO_REUSEADDR` enabled.
///
/// `SO_REUSEADDR` only allows rebinding a port left in `TIME_WAIT` after a
/// restart. `SO_REUSEPORT` stays off, otherwise a second server would
/// share the port instead of failing to bind.
///
/// Must be called from within a tokio runtime.
fn create_listener(addr: SocketAddr) -> io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    // On Windows SO_REUSEADDR lets another socket steal an active port
    #[cfg(unix)]
    socket.set_reuse_address(true)?;

    // Set non-blocking mode for async compatibility
    socket.set_nonblocking(true)?;

    socket.bind(&addr.into())?;
    socket.listen(BACKLOG)?;

    // Convert socket2::Socket to std::net::TcpListener, then to tokio::net::TcpListener
    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let listener = bind("127.0.0.1:0".parse().unwrap()).unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn test_port_in_use_is_distinct() {
        let first = bind("127.0.0.1:0".parse().unwrap()).unwrap();
        let taken = first.local_addr().unwrap();

        match bind(taken) {
            Err(StartupError::AddrInUse { addr }) => assert_eq!(addr, taken),
            Err(other) => panic!("expected AddrInUse, got {other}"),
            Ok(_) => panic!("second bind on {taken} unexpectedly succeeded"),
        }
    }
}
