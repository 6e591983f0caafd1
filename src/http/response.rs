//! HTTP response building module
//!
//! Builders for the file response and the plain-text error responses.
//! Error bodies are fixed strings and never mention filesystem paths.

use std::io;

use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Empty, Full};
use hyper::body::Bytes;
use hyper::{header, Response, StatusCode};

use super::mime;
use crate::error::ServeError;

/// Body type shared by every response the server produces
pub type ResponseBody = BoxBody<Bytes, io::Error>;

pub const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

pub fn full(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into()).map_err(|never| match never {}).boxed()
}

pub fn empty() -> ResponseBody {
    Empty::<Bytes>::new().map_err(|never| match never {}).boxed()
}

/// Build the 200 response for a regular file.
///
/// `request_path` selects the content type; `file_name` is the on-disk base
/// name offered to downloaders of Android packages.
pub fn build_file_response(
    request_path: &str,
    file_name: &str,
    len: u64,
    body: ResponseBody,
) -> Response<ResponseBody> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime::content_type_for(request_path))
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .header(header::CONTENT_LENGTH, len);

    if mime::is_apk(request_path) {
        builder = builder
            .header(
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", quote_filename(file_name)),
            )
            .header(header::CACHE_CONTROL, "no-cache, no-store, must-revalidate")
            .header(header::PRAGMA, "no-cache")
            .header(header::EXPIRES, "0");
    }

    builder.body(body).unwrap_or_else(|e| {
        log_build_error("200", &e);
        bare_response(StatusCode::INTERNAL_SERVER_ERROR)
    })
}

/// Build the response for a request that could not be served
pub fn build_error_response(err: &ServeError) -> Response<ResponseBody> {
    let status = err.status();
    build_text_response(status, status_text(status))
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header(header::CONTENT_TYPE, "text/plain")
        .header(header::ALLOW, ALLOWED_METHODS)
        .body(full("405 Method Not Allowed"))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            bare_response(StatusCode::METHOD_NOT_ALLOWED)
        })
}

/// Build OPTIONS response (CORS preflight)
pub fn build_options_response() -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(header::ALLOW, ALLOWED_METHODS)
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .header(header::ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS)
        .header(header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type")
        .header(header::ACCESS_CONTROL_MAX_AGE, "86400")
        .body(empty())
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            bare_response(StatusCode::NO_CONTENT)
        })
}

fn build_text_response(status: StatusCode, text: &'static str) -> Response<ResponseBody> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "text/plain")
        .body(full(text))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            bare_response(status)
        })
}

fn status_text(status: StatusCode) -> &'static str {
    match status.as_u16() {
        403 => "403 Forbidden",
        404 => "404 Not Found",
        _ => "500 Internal Server Error",
    }
}

fn quote_filename(name: &str) -> String {
    name.replace('\\', "\\\\").replace('"', "\\\"")
}

fn bare_response(status: StatusCode) -> Response<ResponseBody> {
    let mut resp = Response::new(empty());
    *resp.status_mut() = status;
    resp
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
