use std::time::Duration;

use async_trait::async_trait;
use devis_core::{CatalogError, CatalogPrice, PriceCatalog};
use reqwest::Client;
use tracing::debug;
use url::Url;

/// Catalog served over HTTP at `GET {base_url}/api/prix/{code}`.
///
/// Any non-2xx status is reported as [`CatalogError::NotFound`]; the
/// service answers 404 with an error body for unknown codes.
#[derive(Debug, Clone)]
pub struct HttpPriceCatalog {
    client: Client,
    base_url: Url,
}

impl HttpPriceCatalog {
    pub fn new(
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, CatalogError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| CatalogError::Configuration(format!("invalid base url '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(CatalogError::Configuration(format!(
                "base url '{base_url}' cannot carry a path"
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Configuration(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of the price resource for `code`, with the code percent-encoded
    /// as a single path segment.
    pub fn price_url(
        &self,
        code: &str,
    ) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["api", "prix", code]);
        }
        url
    }
}

#[async_trait]
impl PriceCatalog for HttpPriceCatalog {
    async fn lookup_price(&self, code: &str) -> Result<CatalogPrice, CatalogError> {
        let url = self.price_url(code);
        debug!(%url, "requesting catalog price");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        let status = response.status();
        debug!(%status, code, "catalog response");
        if !status.is_success() {
            return Err(CatalogError::NotFound(code.to_string()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| CatalogError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn catalog(server: &MockServer) -> HttpPriceCatalog {
        HttpPriceCatalog::new(&server.base_url(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn price_url_appends_api_path() {
        let catalog = HttpPriceCatalog::new("http://devis.local", Duration::from_secs(1)).unwrap();

        assert_eq!(
            catalog.price_url("T3").as_str(),
            "http://devis.local/api/prix/T3"
        );
    }

    #[test]
    fn price_url_keeps_base_path_and_encodes_code() {
        let catalog =
            HttpPriceCatalog::new("http://devis.local/app/", Duration::from_secs(1)).unwrap();

        assert_eq!(
            catalog.price_url("A B/1").as_str(),
            "http://devis.local/app/api/prix/A%20B%2F1"
        );
    }

    #[test]
    fn rejects_invalid_base_url() {
        let result = HttpPriceCatalog::new("not a url", Duration::from_secs(1));

        assert!(matches!(result, Err(CatalogError::Configuration(_))));
    }

    #[tokio::test]
    async fn found_code_returns_entry() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/prix/X1");
                then.status(200).json_body(serde_json::json!({
                    "code": "X1",
                    "description": "Portière",
                    "prix": 55,
                    "categorie": "TOLERIE_CARROSSERIE"
                }));
            })
            .await;

        let price = catalog(&server).lookup_price("X1").await.unwrap();

        mock.assert_async().await;
        assert_eq!(price.price, dec!(55));
        assert_eq!(price.category, "TOLERIE_CARROSSERIE");
        assert_eq!(price.description.as_deref(), Some("Portière"));
    }

    #[tokio::test]
    async fn missing_code_is_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/prix/ZZ");
                then.status(404)
                    .json_body(serde_json::json!({ "error": "Prix non trouvé" }));
            })
            .await;

        let result = catalog(&server).lookup_price("ZZ").await;

        assert_eq!(result, Err(CatalogError::NotFound("ZZ".to_string())));
    }

    #[tokio::test]
    async fn server_error_is_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/prix/T1");
                then.status(500);
            })
            .await;

        let result = catalog(&server).lookup_price("T1").await;

        assert_eq!(result, Err(CatalogError::NotFound("T1".to_string())));
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/prix/T1");
                then.status(200).body("<html>login</html>");
            })
            .await;

        let result = catalog(&server).lookup_price("T1").await;

        assert!(matches!(result, Err(CatalogError::Decode(_))), "got {result:?}");
    }

    #[tokio::test]
    async fn unreachable_server_is_transport_error() {
        // Port 9 (discard) on localhost is not expected to be listening.
        let catalog = HttpPriceCatalog::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();

        let result = catalog.lookup_price("T1").await;

        assert!(matches!(result, Err(CatalogError::Transport(_))), "got {result:?}");
    }
}
