//! Implements the `Source` trait by downloading a JSON array over HTTP.

use crate::api::Source;
use crate::error::Res;
use crate::model::NewTransaction;
use anyhow::Context;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

/// Fetches the dataset from a fixed URL. The response body must be a JSON array of transaction
/// objects.
pub struct HttpSource {
    url: Url,
    client: reqwest::Client,
}

impl HttpSource {
    /// Creates a source for `url`. Every request is bounded by `timeout`.
    pub fn new(url: Url, timeout: Duration) -> Res<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build the HTTP client")?;
        Ok(Self { url, client })
    }
}

#[async_trait::async_trait]
impl Source for HttpSource {
    async fn fetch(&self) -> Res<Vec<NewTransaction>> {
        debug!("Fetching dataset from {}", self.url);
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", self.url))?;

        let status = response.status();
        trace!("Dataset response status {status}");
        if !status.is_success() {
            anyhow::bail!("Dataset request to {} failed with status {status}", self.url);
        }

        let data: Vec<NewTransaction> = response
            .json()
            .await
            .with_context(|| format!("Failed to parse the dataset from {}", self.url))?;
        debug!("Fetched {} transactions", data.len());
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use axum::Router;

    async fn serve(router: Router) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        Url::parse(&format!("http://{addr}/data.json")).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_parses_array() {
        let body = r#"[
            {"id": 1, "title": "A", "price": 10, "sold": true, "category": "X",
             "dateOfSale": "2022-03-05T10:00:00+05:30", "image": "a.jpg"},
            {"id": 2, "title": "B", "price": 20.5, "sold": false, "category": "Y",
             "dateOfSale": "2022-04-05T10:00:00+05:30"}
        ]"#;
        let url = serve(Router::new().route("/data.json", get(move || async move { body }))).await;
        let source = HttpSource::new(url, Duration::from_secs(5)).unwrap();

        let data = source.fetch().await.unwrap();

        assert_eq!(data.len(), 2);
        assert_eq!(data[1].price, Some(20.5));
        assert_eq!(
            data[0].date_of_sale.unwrap().to_string(),
            "2022-03-05T04:30:00.000Z"
        );
    }

    #[tokio::test]
    async fn test_fetch_fails_on_error_status() {
        let url = serve(Router::new()).await;
        let source = HttpSource::new(url, Duration::from_secs(5)).unwrap();
        let e = source.fetch().await.unwrap_err();
        assert!(e.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_fetch_fails_on_bad_body() {
        let url = serve(Router::new().route("/data.json", get(|| async { "not json" }))).await;
        let source = HttpSource::new(url, Duration::from_secs(5)).unwrap();
        assert!(source.fetch().await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_gives_up_after_timeout() {
        let slow = get(|| async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            "[]"
        });
        let url = serve(Router::new().route("/data.json", slow)).await;
        let source = HttpSource::new(url, Duration::from_secs(1)).unwrap();

        let started = std::time::Instant::now();
        let result = source.fetch().await;

        assert!(result.is_err());
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
