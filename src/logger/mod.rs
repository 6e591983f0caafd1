//! Logger module
//!
//! Provides logging utilities for the release server including:
//! - Startup banner and shutdown notice
//! - Access logging with multiple formats
//! - Error, warning and security logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::LoggingConfig;
use std::net::SocketAddr;
use std::path::Path;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &LoggingConfig) -> std::io::Result<()> {
    writer::init(
        config.access_log_file.as_deref(),
        config.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, root: &Path) {
    for line in server_banner(addr, root) {
        write_info(&line);
    }
}

fn server_banner(addr: &SocketAddr, root: &Path) -> Vec<String> {
    let port = addr.port();
    vec![
        "======================================".to_string(),
        "Release download server started".to_string(),
        format!("Server running on: http://localhost:{port}"),
        format!("Listening on: {addr}"),
        format!("Files being served from: {}", root.display()),
        String::new(),
        "Share this link with users on the network:".to_string(),
        format!("   http://<this-host>:{port}"),
        String::new(),
        "To share publicly (using ngrok):".to_string(),
        "   1. Install ngrok: npm install -g ngrok".to_string(),
        format!("   2. Run: ngrok http {port}"),
        "   3. Copy the public URL and share it".to_string(),
        String::new(),
        "Press Ctrl+C to stop the server".to_string(),
        "======================================\n".to_string(),
    ]
}

pub fn log_port_in_use(port: u16) {
    for line in port_in_use_message(port) {
        write_error(&line);
    }
}

/// Port suggested when the configured one is taken
const FALLBACK_PORT: u16 = 3001;

fn port_in_use_message(port: u16) -> Vec<String> {
    let suggested = port.checked_add(1).unwrap_or(FALLBACK_PORT);
    vec![
        format!("[ERROR] Port {port} is already in use!"),
        String::new(),
        "Try using a different port:".to_string(),
        format!("   PORT={suggested} release-server"),
    ]
}

pub fn log_startup_error(err: &impl std::fmt::Display) {
    write_error(&format!("[ERROR] Server error: {err}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_info(&entry.format(format));
}

pub fn log_not_found(path: &str) {
    write_info(&format!("[404] {path}"));
}

pub fn log_traversal(path: &str, peer: &str) {
    write_error(&format!(
        "[SECURITY] Path traversal attempt blocked: {path:?} from {peer}"
    ));
}

pub fn log_stream_error(path: &str, err: &std::io::Error) {
    write_error(&format!("[ERROR] Stream error for {path}: {err}"));
}

pub fn log_transfer_aborted(path: &str, sent: u64, total: u64) {
    log_warning(&format!(
        "Transfer of {path} interrupted after {sent} of {total} bytes"
    ));
}

pub fn log_shutdown() {
    write_info("\n[Shutdown] Stop signal received, no longer accepting connections");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_lists_root_and_port() {
        let addr: SocketAddr = "0.0.0.0:3000".parse().unwrap();
        let banner = server_banner(&addr, Path::new("/srv/releases"));

        assert!(banner.contains(&"Server running on: http://localhost:3000".to_string()));
        assert!(banner.contains(&"Files being served from: /srv/releases".to_string()));
    }

    #[test]
    fn test_banner_explains_public_sharing() {
        let addr: SocketAddr = "0.0.0.0:8080".parse().unwrap();
        let banner = server_banner(&addr, Path::new("/srv/releases"));

        assert!(banner.iter().any(|l| l.starts_with("To share publicly")));
        assert!(banner.contains(&"   2. Run: ngrok http 8080".to_string()));
    }

    #[test]
    fn test_port_in_use_suggests_next_port() {
        let message = port_in_use_message(3000);
        assert_eq!(message[0], "[ERROR] Port 3000 is already in use!");
        assert_eq!(message[3], "   PORT=3001 release-server");
    }

    #[test]
    fn test_port_in_use_at_upper_bound() {
        let message = port_in_use_message(u16::MAX);
        assert_eq!(message[3], "   PORT=3001 release-server");
        assert!(!message.iter().any(|l| l.contains("PORT=0")));
    }
}
