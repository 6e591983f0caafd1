//! Static file serving module
//!
//! Resolves the request onto the served root, inspects the target, and
//! streams it back with the content headers for its suffix.

use crate::config::ServeConfig;
use crate::error::ServeError;
use crate::handler::resolve::resolve_request_path;
use crate::handler::router::RequestContext;
use crate::http::{self, response, FileBody, ResponseBody};
use crate::logger::{self, AccessLogEntry};
use http_body_util::BodyExt;
use hyper::Response;
use tokio::fs::{self, File};

/// An opened regular file under the root
struct Target {
    file: File,
    len: u64,
    file_name: String,
}

/// Serve the file named by the request, or the matching error response
pub async fn serve(ctx: &RequestContext, cfg: &ServeConfig) -> Response<ResponseBody> {
    match open_target(ctx, cfg).await {
        Ok(target) => build_response(ctx, cfg, target),
        Err(err) => {
            log_failure(ctx, &err);
            http::build_error_response(&err)
        }
    }
}

async fn open_target(ctx: &RequestContext, cfg: &ServeConfig) -> Result<Target, ServeError> {
    let path = resolve_request_path(&cfg.root, &ctx.path)?;

    let metadata = fs::metadata(&path)
        .await
        .map_err(|_| ServeError::NotFound)?;
    if metadata.is_dir() {
        return Err(ServeError::Directory);
    }
    // Normalizing dropped the trailing separator; a file can't have one
    if ctx.path.ends_with('/') || ctx.path.ends_with("/.") {
        return Err(ServeError::NotFound);
    }
    if !metadata.is_file() {
        return Err(ServeError::NotRegularFile);
    }

    // Symlinks may point anywhere; the real target must stay under the real root
    let canonical = fs::canonicalize(&path)
        .await
        .map_err(|_| ServeError::NotFound)?;
    if !canonical.starts_with(&cfg.canonical_root) {
        return Err(ServeError::Traversal);
    }

    let file = File::open(&path).await.map_err(ServeError::Open)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Target {
        file,
        len: metadata.len(),
        file_name,
    })
}

fn build_response(
    ctx: &RequestContext,
    cfg: &ServeConfig,
    target: Target,
) -> Response<ResponseBody> {
    let entry = access_entry(ctx);

    let body = if ctx.is_head() {
        if cfg.access_log {
            logger::log_access(&entry, &cfg.access_log_format);
        }
        response::empty()
    } else {
        let mut body = FileBody::new(target.file, target.len, ctx.path.clone());
        if cfg.access_log {
            body = body.with_access_log(entry, cfg.access_log_format.clone());
        }
        body.boxed()
    };

    http::build_file_response(&ctx.path, &target.file_name, target.len, body)
}

fn access_entry(ctx: &RequestContext) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        ctx.peer.to_string(),
        ctx.method.to_string(),
        ctx.path.clone(),
    );
    entry.query.clone_from(&ctx.query);
    entry.http_version = ctx.http_version.to_string();
    entry.user_agent.clone_from(&ctx.user_agent);
    entry
}

fn log_failure(ctx: &RequestContext, err: &ServeError) {
    match err {
        ServeError::NotFound => logger::log_not_found(&ctx.path),
        ServeError::Traversal => logger::log_traversal(&ctx.path, &ctx.peer.to_string()),
        ServeError::Open(e) => {
            logger::log_error(&format!("Failed to open {}: {e}", ctx.path));
        }
        ServeError::Directory | ServeError::NotRegularFile => {}
    }
}
