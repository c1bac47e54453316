//! Static file serving module
//!
//! Serves `index.html` and the weekly report pages from `site.static_root`
//! when they are deployed next to the portal.

use std::path::{Component, Path, PathBuf};

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use tokio::fs;

use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, CachePolicy, RangeParseResult};
use crate::logger;

/// Serve static files from a directory
pub async fn serve_directory(
    ctx: &RequestContext<'_>,
    root: &str,
    index_files: &[String],
) -> Response<Full<Bytes>> {
    match load_from_directory(Path::new(root), ctx.path, index_files).await {
        Some((content, content_type)) => build_static_file_response(ctx, content, content_type),
        None => http::build_404_response(),
    }
}

/// Load a file below `root` for the request `path`
///
/// Directories resolve through `index_files`; an extensionless path that
/// names no file falls back to `<path>.html`.
pub async fn load_from_directory(
    root: &Path,
    path: &str,
    index_files: &[String],
) -> Option<(Bytes, &'static str)> {
    let relative = relative_path(path)?;

    let root_canonical = match fs::canonicalize(root).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{}': {e}",
                root.display()
            ));
            return None;
        }
    };

    let file_path = resolve_file(&root_canonical.join(&relative), index_files).await?;

    // Symlinks may still point outside the root
    let file_canonical = fs::canonicalize(&file_path).await.ok()?;
    if !file_canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {path} -> {}",
            file_canonical.display()
        ));
        return None;
    }

    match fs::read(&file_canonical).await {
        Ok(content) => Some((Bytes::from(content), mime::content_type_for(&file_canonical))),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_canonical.display()
            ));
            None
        }
    }
}

/// Turn a URL path into a relative filesystem path, rejecting `..`
fn relative_path(path: &str) -> Option<PathBuf> {
    let mut relative = PathBuf::new();
    for segment in path.split('/').filter(|s| !s.is_empty() && *s != ".") {
        if segment == ".." || segment.contains('\\') {
            logger::log_warning(&format!("Rejected suspicious path: {path}"));
            return None;
        }
        relative.push(segment);
    }
    // A drive prefix or root would escape the join
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }
    Some(relative)
}

async fn resolve_file(candidate: &Path, index_files: &[String]) -> Option<PathBuf> {
    match fs::metadata(candidate).await {
        Ok(meta) if meta.is_file() => return Some(candidate.to_path_buf()),
        Ok(meta) if meta.is_dir() => {
            for index_file in index_files {
                let index_path = candidate.join(index_file);
                if is_file(&index_path).await {
                    return Some(index_path);
                }
            }
            return None;
        }
        _ => {}
    }

    if candidate.extension().is_none() {
        let html = candidate.with_extension("html");
        if is_file(&html).await {
            return Some(html);
        }
    }

    None
}

async fn is_file(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_file())
}

/// Build static file response with `ETag` and Range support
fn build_static_file_response(
    ctx: &RequestContext<'_>,
    data: Bytes,
    content_type: &str,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&data);

    if cache::check_etag_match(ctx.if_none_match, &etag) {
        return http::build_304_response(&etag, CachePolicy::default());
    }

    match http::parse_range_header(ctx.range_header, data.len()) {
        RangeParseResult::Valid(range) => http::response::build_partial_response(
            &data,
            range,
            content_type,
            &etag,
            ctx.is_head,
        ),
        RangeParseResult::NotSatisfiable => http::build_416_response(data.len()),
        RangeParseResult::None => http::response::build_cached_response(
            data,
            content_type,
            &etag,
            CachePolicy::default(),
            ctx.is_head,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use hyper::StatusCode;

    struct TempSite {
        root: PathBuf,
    }

    impl TempSite {
        fn new(name: &str) -> Self {
            let root = std::env::temp_dir().join(format!(
                "weekly-portal-static-{name}-{}",
                std::process::id()
            ));
            let _ = std::fs::remove_dir_all(&root);
            std::fs::create_dir_all(root.join("weekly_report/reth")).unwrap();
            std::fs::write(root.join("index.html"), "<h1>Main</h1>").unwrap();
            std::fs::write(root.join("weekly_report/EIPs.html"), "<h1>EIPs</h1>").unwrap();
            std::fs::write(root.join("weekly_report/reth/index.html"), "<h1>reth</h1>").unwrap();
            std::fs::write(root.join("weekly_report/data.json"), "0123456789").unwrap();
            Self { root }
        }

        fn root(&self) -> &str {
            self.root.to_str().unwrap()
        }
    }

    impl Drop for TempSite {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.root);
        }
    }

    fn ctx(path: &str) -> RequestContext<'_> {
        RequestContext {
            path,
            is_head: false,
            if_none_match: None,
            range_header: None,
        }
    }

    fn index_files() -> Vec<String> {
        vec!["index.html".to_string()]
    }

    async fn body(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(
            relative_path("/weekly_report/EIPs"),
            Some(PathBuf::from("weekly_report/EIPs"))
        );
        assert_eq!(relative_path("/"), Some(PathBuf::new()));
        assert_eq!(relative_path("/./index.html"), Some(PathBuf::from("index.html")));
        assert_eq!(relative_path("/../etc/passwd"), None);
        assert_eq!(relative_path("/weekly_report/../../secret"), None);
    }

    #[tokio::test]
    async fn test_resolves_files_indexes_and_clean_urls() {
        let site = TempSite::new("resolve");
        let files = index_files();

        let resp = serve_directory(&ctx("/index.html"), site.root(), &files).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["Content-Type"], "text/html; charset=utf-8");
        assert_eq!(body(resp).await, "<h1>Main</h1>");

        let resp = serve_directory(&ctx("/weekly_report/EIPs"), site.root(), &files).await;
        assert_eq!(body(resp).await, "<h1>EIPs</h1>");

        let resp = serve_directory(&ctx("/weekly_report/reth"), site.root(), &files).await;
        assert_eq!(body(resp).await, "<h1>reth</h1>");

        let resp = serve_directory(&ctx("/weekly_report/nitro"), site.root(), &files).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_traversal_blocked() {
        let site = TempSite::new("traversal");
        let resp = serve_directory(&ctx("/../Cargo.toml"), site.root(), &index_files()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_root_is_404() {
        let resp = serve_directory(
            &ctx("/index.html"),
            "/definitely/not/a/static/root",
            &index_files(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_etag_and_range() {
        let site = TempSite::new("range");
        let files = index_files();

        let full = serve_directory(&ctx("/weekly_report/data.json"), site.root(), &files).await;
        let etag = full.headers()["ETag"].to_str().unwrap().to_string();

        let mut conditional = ctx("/weekly_report/data.json");
        conditional.if_none_match = Some(etag.as_str());
        let resp = serve_directory(&conditional, site.root(), &files).await;
        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);

        let mut ranged = ctx("/weekly_report/data.json");
        ranged.range_header = Some("bytes=2-4");
        let resp = serve_directory(&ranged, site.root(), &files).await;
        assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(resp.headers()["Content-Range"], "bytes 2-4/10");
        assert_eq!(body(resp).await, "234");

        let mut unsatisfiable = ctx("/weekly_report/data.json");
        unsatisfiable.range_header = Some("bytes=50-");
        let resp = serve_directory(&unsatisfiable, site.root(), &files).await;
        assert_eq!(resp.status(), StatusCode::RANGE_NOT_SATISFIABLE);

        let mut reversed = ctx("/weekly_report/data.json");
        reversed.range_header = Some("bytes=9-3");
        let resp = serve_directory(&reversed, site.root(), &files).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body(resp).await, "0123456789");
    }
}
