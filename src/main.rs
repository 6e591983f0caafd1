use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

mod config;
mod error;
mod handler;
mod http;
mod logger;
mod server;

use error::StartupError;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(StartupError::AddrInUse { addr }) => {
            logger::log_port_in_use(addr.port());
            ExitCode::FAILURE
        }
        Err(err) => {
            logger::log_startup_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), StartupError> {
    let cfg = config::Config::load()?;
    logger::init(&cfg.logging).map_err(StartupError::Logger)?;

    let addr = cfg.socket_addr()?;
    let serve_cfg = Arc::new(cfg.serve_config()?);

    // Tokio runtime, thread count from the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers.filter(|&n| n > 0) {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build().map_err(StartupError::Runtime)?;

    runtime.block_on(async_main(addr, serve_cfg))
}

async fn async_main(addr: SocketAddr, cfg: Arc<config::ServeConfig>) -> Result<(), StartupError> {
    let listener = server::bind(addr)?;
    logger::log_server_start(&addr, &cfg.root);

    server::run(listener, cfg, server::shutdown_signal()).await;
    Ok(())
}
