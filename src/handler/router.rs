//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, request
//! context extraction, then the static file responder.

use crate::config::ServeConfig;
use crate::handler::{resolve, static_files};
use crate::http::{self, ResponseBody};
use crate::logger;
use hyper::{header, Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Request context encapsulating information needed for request processing
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Decoded request path, with `/` already mapped to the index page
    pub path: String,
    pub query: Option<String>,
    pub method: Method,
    pub http_version: &'static str,
    pub user_agent: Option<String>,
    pub peer: SocketAddr,
}

impl RequestContext {
    pub fn from_request<B>(req: &Request<B>, peer: SocketAddr) -> Self {
        Self {
            path: resolve::request_path(req.uri().path()),
            query: req.uri().query().map(ToString::to_string),
            method: req.method().clone(),
            http_version: version_str(req.version()),
            user_agent: req
                .headers()
                .get(header::USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string),
            peer,
        }
    }

    pub fn is_head(&self) -> bool {
        self.method == Method::HEAD
    }
}

/// Main entry point for HTTP request handling
///
/// Generic over the request body: requests are never read past their head.
pub async fn handle_request<B>(
    req: Request<B>,
    cfg: Arc<ServeConfig>,
    peer: SocketAddr,
) -> Result<Response<ResponseBody>, Infallible> {
    if let Some(resp) = check_http_method(req.method()) {
        return Ok(resp);
    }

    let ctx = RequestContext::from_request(&req, peer);
    Ok(static_files::serve(&ctx, &cfg).await)
}

/// Check HTTP method and return early response for anything but GET/HEAD
fn check_http_method(method: &Method) -> Option<Response<ResponseBody>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::StatusCode;

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    #[test]
    fn test_context_from_request() {
        let req = Request::builder()
            .uri("/builds/my%20app.apk?channel=beta")
            .header(header::USER_AGENT, "curl/8.5")
            .body(())
            .unwrap();

        let ctx = RequestContext::from_request(&req, peer());
        assert_eq!(ctx.path, "/builds/my app.apk");
        assert_eq!(ctx.query.as_deref(), Some("channel=beta"));
        assert_eq!(ctx.user_agent.as_deref(), Some("curl/8.5"));
        assert_eq!(ctx.http_version, "1.1");
        assert!(!ctx.is_head());
    }

    #[test]
    fn test_root_maps_to_index() {
        let req = Request::builder().uri("/?ref=qr").body(()).unwrap();
        let ctx = RequestContext::from_request(&req, peer());
        assert_eq!(ctx.path, "/index.html");
    }

    #[test]
    fn test_method_policy() {
        assert!(check_http_method(&Method::GET).is_none());
        assert!(check_http_method(&Method::HEAD).is_none());
        assert_eq!(
            check_http_method(&Method::OPTIONS).unwrap().status(),
            StatusCode::NO_CONTENT
        );
        for method in [Method::POST, Method::PUT, Method::DELETE, Method::PATCH] {
            assert_eq!(
                check_http_method(&method).unwrap().status(),
                StatusCode::METHOD_NOT_ALLOWED
            );
        }
    }
}
