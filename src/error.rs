//! Error types
//!
//! `StartupError` covers everything that terminates the process before the
//! accept loop runs. `ServeError` is the per-request taxonomy; each variant
//! maps to exactly one client-facing status.

use std::io;
use std::net::SocketAddr;

use hyper::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid listen address: {0}")]
    InvalidAddress(String),

    #[error("root is not a readable directory: {0}")]
    InvalidRoot(String),

    #[error("port {} is already in use", .addr.port())]
    AddrInUse { addr: SocketAddr },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("failed to open log files: {0}")]
    Logger(#[source] io::Error),

    #[error("runtime error: {0}")]
    Runtime(#[source] io::Error),
}

impl StartupError {
    /// Classify a bind failure, separating an occupied port from everything else
    pub fn from_bind(addr: SocketAddr, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::AddrInUse {
            Self::AddrInUse { addr }
        } else {
            Self::Bind { addr, source }
        }
    }
}

#[derive(Debug, Error)]
pub enum ServeError {
    /// Resolved path escapes the served root
    #[error("path escapes the served root")]
    Traversal,

    #[error("target is a directory")]
    Directory,

    /// Sockets, FIFOs and devices are never streamed
    #[error("target is not a regular file")]
    NotRegularFile,

    #[error("file not found")]
    NotFound,

    /// The file exists but could not be opened for streaming
    #[error("failed to open file: {0}")]
    Open(#[source] io::Error),
}

impl ServeError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Traversal | Self::Directory | Self::NotRegularFile => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Open(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
