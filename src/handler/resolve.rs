//! Request path resolution
//!
//! Maps a URI path onto the served root. The check is component-wise
//! (`Path::starts_with`), so a root of `/srv/app` never admits
//! `/srv/app2/...`. Symlinks are handled later, after the metadata lookup.

use std::path::{Component, Path, PathBuf};

use percent_encoding::percent_decode_str;

use crate::error::ServeError;

pub const INDEX_PATH: &str = "/index.html";

/// Request path after `/` substitution and percent-decoding
pub fn request_path(uri_path: &str) -> String {
    let path = if uri_path == "/" { INDEX_PATH } else { uri_path };
    percent_decode_str(path).decode_utf8_lossy().into_owned()
}

/// Join `request_path` onto `root` and verify the result stays inside it.
///
/// `root` must already be absolute and normalized.
pub fn resolve_request_path(root: &Path, request_path: &str) -> Result<PathBuf, ServeError> {
    // NUL can't name a file and backslash is a separator on some platforms
    if request_path.contains(&['\0', '\\'][..]) {
        return Err(ServeError::Traversal);
    }

    let relative = request_path.trim_start_matches('/');
    let candidate = normalize(&root.join(relative));

    if candidate.starts_with(root) {
        Ok(candidate)
    } else {
        Err(ServeError::Traversal)
    }
}

/// Lexically normalize a path: drop `.` segments, fold `..` into its
/// parent, collapse repeated separators. No filesystem access.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the filesystem root stays at the root
                if !out.pop() && !out.has_root() {
                    out.push(Component::ParentDir);
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> PathBuf {
        PathBuf::from("/srv/app")
    }

    #[test]
    fn test_request_path() {
        assert_eq!(request_path("/"), "/index.html");
        assert_eq!(request_path("/app-release.apk"), "/app-release.apk");
        assert_eq!(request_path("/my%20app.apk"), "/my app.apk");
        assert_eq!(request_path("/%2e%2e/etc/passwd"), "/../etc/passwd");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("/a//b/")), PathBuf::from("/a/b"));
        assert_eq!(normalize(Path::new("/../../etc")), PathBuf::from("/etc"));
        assert_eq!(normalize(Path::new("a/../../b")), PathBuf::from("../b"));
    }

    #[test]
    fn test_resolves_inside_root() {
        assert_eq!(
            resolve_request_path(&root(), "/index.html").unwrap(),
            PathBuf::from("/srv/app/index.html")
        );
        assert_eq!(
            resolve_request_path(&root(), "/builds/./v2/../v1/app.apk").unwrap(),
            PathBuf::from("/srv/app/builds/v1/app.apk")
        );
        assert_eq!(
            resolve_request_path(&root(), "//nested//file.js").unwrap(),
            PathBuf::from("/srv/app/nested/file.js")
        );
    }

    #[test]
    fn test_root_itself_is_inside() {
        assert_eq!(resolve_request_path(&root(), "/.").unwrap(), root());
        assert_eq!(resolve_request_path(&root(), "/a/..").unwrap(), root());
    }

    #[test]
    fn test_traversal_is_rejected() {
        for path in [
            "/../../etc/passwd",
            "/..",
            "/builds/../../etc/passwd",
            "/../app2/secret.apk",
            "/a\\..\\..\\etc",
            "/index.html\0.apk",
        ] {
            assert!(
                matches!(resolve_request_path(&root(), path), Err(ServeError::Traversal)),
                "expected traversal rejection for {path:?}"
            );
        }
    }

    #[test]
    fn test_sibling_directory_is_rejected() {
        // A plain string-prefix check would accept /srv/app2 for root /srv/app
        let candidate = normalize(&root().join("../app2/x"));
        assert!(candidate.to_string_lossy().starts_with("/srv/app"));
        assert!(resolve_request_path(&root(), "/../app2/x").is_err());
    }
}
