//! Page loading from disk or over HTTP.

use std::path::Path;

use pagepilot_dom::Document;
use tracing::{debug, info};
use url::Url;

use crate::error::LoadError;

/// Load and parse a page.
///
/// `source` is an `http(s)` URL or a filesystem path. The document URL is
/// the fetched URL, or a `file://` URL for paths, so relative `href`/`src`
/// values resolve the way they would in a browser.
pub async fn load_page(source: &str) -> Result<Document, LoadError> {
    if source.starts_with("http://") || source.starts_with("https://") {
        fetch(source).await
    } else {
        read_file(Path::new(source)).await
    }
}

async fn fetch(source: &str) -> Result<Document, LoadError> {
    let url = Url::parse(source).map_err(|e| LoadError::InvalidUrl(format!("{}: {}", source, e)))?;
    debug!(url = %url, "Fetching page");

    let response = reqwest::get(url.clone()).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    // Redirects change the base for relative links.
    let final_url = response.url().to_string();
    let html = response.text().await?;
    info!(url = %final_url, bytes = html.len(), "Loaded page");
    Ok(Document::parse(&html, &final_url))
}

async fn read_file(path: &Path) -> Result<Document, LoadError> {
    let html = tokio::fs::read_to_string(path).await?;
    let absolute = tokio::fs::canonicalize(path).await?;
    let url = Url::from_file_path(&absolute)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| absolute.display().to_string());
    info!(path = %path.display(), bytes = html.len(), "Loaded page");
    Ok(Document::parse(&html, &url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_load_file_uses_file_url() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("page.html");
        std::fs::write(&file, "<html><head><title>Local</title></head><body></body></html>")
            .unwrap();

        let doc = load_page(file.to_str().unwrap()).await.unwrap();
        assert_eq!(doc.title(), "Local");
        assert!(doc.url().starts_with("file://"));
        assert!(doc.url().ends_with("/page.html"));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = load_page("/definitely/not/here.html").await.unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }

    #[tokio::test]
    async fn test_fetch_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/shop/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"<html><body><a href="cart">Cart</a></body></html>"#),
            )
            .mount(&server)
            .await;

        let url = format!("{}/shop/", server.uri());
        let doc = load_page(&url).await.unwrap();
        assert_eq!(doc.url(), url);
        assert_eq!(doc.resolve_url("cart"), format!("{}/shop/cart", server.uri()));
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = load_page(&format!("{}/gone", server.uri())).await.unwrap_err();
        assert!(matches!(err, LoadError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let err = load_page("http://exa mple.com/").await.unwrap_err();
        assert!(matches!(err, LoadError::InvalidUrl(_)));
    }
}
