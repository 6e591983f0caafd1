//! MIME type detection module
//!
//! Returns the Content-Type for a request path by exact, case-sensitive suffix.

pub const APK_SUFFIX: &str = ".apk";

const CONTENT_TYPES: &[(&str, &str)] = &[
    (".html", "text/html; charset=utf-8"),
    (".css", "text/css"),
    (".js", "application/javascript"),
    (APK_SUFFIX, "application/vnd.android.package-archive"),
    (".json", "application/json"),
];

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Get MIME Content-Type based on the path's suffix
pub fn content_type_for(path: &str) -> &'static str {
    CONTENT_TYPES
        .iter()
        .find(|(suffix, _)| path.ends_with(suffix))
        .map_or(DEFAULT_CONTENT_TYPE, |&(_, content_type)| content_type)
}

/// Android packages get download and no-cache headers
pub fn is_apk(path: &str) -> bool {
    path.ends_with(APK_SUFFIX)
}
