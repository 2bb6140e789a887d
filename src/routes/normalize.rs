//! Trailing-slash normalization, applied before any route matching.

use axum::extract::Request;
use axum::http::{header, StatusCode, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::debug;

/// Mount point of the static file tree, which keeps its own path handling.
pub const STATIC_PREFIX: &str = "/static";

/// Redirect target for a path with trailing slashes.
///
/// All trailing slashes are removed at once, so the target never needs a
/// second redirect.
///
/// # Returns
/// * `Some(target)` for a non-root path ending in `/`
/// * `None` when the path is already canonical (the root `/` always is)
///
/// # Example
/// ```ignore
/// assert_eq!(strip_trailing_slash("/cl-to-g/"), Some("/cl-to-g".to_string()));
/// ```
pub fn strip_trailing_slash(path: &str) -> Option<String> {
    if path == "/" || !path.ends_with('/') {
        return None;
    }

    let stripped = path.trim_end_matches('/');
    if stripped.is_empty() {
        Some("/".to_string())
    } else {
        Some(stripped.to_string())
    }
}

/// Check if a path belongs to the static file tree.
pub fn is_static_path(path: &str) -> bool {
    path.strip_prefix(STATIC_PREFIX)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Middleware answering `301` for non-root paths ending in `/`.
/// The query string is carried over to the redirect target. Paths under
/// [`STATIC_PREFIX`] are passed through untouched.
pub async fn redirect_trailing_slash(req: Request, next: Next) -> Response {
    if is_static_path(req.uri().path()) {
        return next.run(req).await;
    }

    let Some(target) = strip_trailing_slash(req.uri().path()) else {
        return next.run(req).await;
    };

    let location = with_query(&target, req.uri());
    debug!("Stripping trailing slash: {} -> {}", req.uri().path(), location);
    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response()
}

fn with_query(path: &str, uri: &Uri) -> String {
    match uri.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_root_is_untouched() {
        assert_eq!(strip_trailing_slash("/"), None);
    }

    #[test]
    fn test_path_without_slash_is_untouched() {
        assert_eq!(strip_trailing_slash("/cl-to-g"), None);
        assert_eq!(strip_trailing_slash("/fr/contact"), None);
    }

    #[test]
    fn test_single_trailing_slash() {
        assert_eq!(strip_trailing_slash("/cl-to-g/"), Some("/cl-to-g".to_string()));
        assert_eq!(strip_trailing_slash("/de/blogs/"), Some("/de/blogs".to_string()));
    }

    #[test]
    fn test_repeated_trailing_slashes() {
        assert_eq!(strip_trailing_slash("/fr//"), Some("/fr".to_string()));
        assert_eq!(strip_trailing_slash("//"), Some("/".to_string()));
    }

    #[test]
    fn test_static_paths() {
        assert!(is_static_path("/static"));
        assert!(is_static_path("/static/"));
        assert!(is_static_path("/static/js/"));
        assert!(!is_static_path("/statics"));
        assert!(!is_static_path("/de/static/"));
    }

    #[test]
    fn test_with_query() {
        let uri: Uri = "/cl-to-g/?amount=3".parse().unwrap();
        assert_eq!(with_query("/cl-to-g", &uri), "/cl-to-g?amount=3");

        let uri: Uri = "/cl-to-g/".parse().unwrap();
        assert_eq!(with_query("/cl-to-g", &uri), "/cl-to-g");
    }

    proptest! {
        #[test]
        fn prop_redirect_target_is_canonical(path in "/[a-z/-]{0,30}/") {
            let target = strip_trailing_slash(&path);
            prop_assert!(target.is_some());
            let target = target.unwrap();
            prop_assert!(target == "/" || !target.ends_with('/'));
            prop_assert_eq!(strip_trailing_slash(&target), None);
        }
    }
}
