// Server module entry point
// Listener creation, the accept loop, per-connection tasks and shutdown signals

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is exposed as server_loop
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::bind;
pub use server_loop::run;
pub use signal::shutdown_signal;
