//! HTTP client implementation for talking to the Microsoft Graph REST API.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;
use uuid::Uuid;

use super::api::GraphApi;
use super::error::{GraphError, GraphResult};

/// Identifier sent in the `SdkVersion` and `x-client-SKU` headers.
pub const CLIENT_SKU: &str = "onenote-export";

/// Default Graph resource root.
pub const DEFAULT_RESOURCE: &str = "https://graph.microsoft.com/";

/// Default Graph API version.
pub const DEFAULT_API_VERSION: &str = "v1.0";

/// Graph API client bound to a single access token.
#[derive(Clone)]
pub struct GraphClient {
  base_url: Url,
  token: String,
  client: reqwest::Client,
}

impl GraphClient {
  /// Create a new Graph client.
  ///
  /// # Arguments
  /// * `resource` - Graph resource root (e.g., `https://graph.microsoft.com/`)
  /// * `api_version` - API version segment (e.g., `v1.0`)
  /// * `token` - OAuth2 access token sent as a bearer credential
  /// * `timeout_secs` - Request timeout in seconds
  ///
  /// # Errors
  /// Returns an error if the resource URL is invalid or if the underlying
  /// `reqwest::Client` cannot be built.
  pub fn new(
    resource: impl AsRef<str>,
    api_version: impl AsRef<str>,
    token: impl Into<String>,
    timeout_secs: u64,
  ) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(timeout_secs))
      .user_agent(format!(
        "onenote-export/{} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("TARGET")
      ))
      .build()
      .context("Failed to create HTTP client")?;

    Self::with_http_client(client, resource, api_version, token)
  }

  /// Create a client that reuses an existing `reqwest::Client`.
  ///
  /// The web server keeps one connection pool and hands out a `GraphClient`
  /// per signed-in session.
  pub fn with_http_client(
    client: reqwest::Client,
    resource: impl AsRef<str>,
    api_version: impl AsRef<str>,
    token: impl Into<String>,
  ) -> Result<Self> {
    let base_url = api_base_url(resource.as_ref(), api_version.as_ref())?;

    Ok(Self {
      base_url,
      token: token.into(),
      client,
    })
  }

  /// Root every relative endpoint is resolved against.
  pub fn base_url(&self) -> &Url {
    &self.base_url
  }

  /// Turn an endpoint into the URL to request.
  ///
  /// Absolute URLs (as found in `@odata.nextLink`) are used verbatim.
  fn resolve_url(&self, endpoint: &str) -> GraphResult<Url> {
    let parsed = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
      Url::parse(endpoint)
    } else {
      self.base_url.join(endpoint.trim_start_matches('/'))
    };

    parsed.map_err(|source| GraphError::InvalidUrl {
      endpoint: endpoint.to_string(),
      source,
    })
  }

  /// Start a GET request carrying the bearer token and diagnostic headers.
  ///
  /// A fresh `client-request-id` is generated for every request.
  fn get(&self, url: Url) -> RequestBuilder {
    let request_id = Uuid::new_v4().to_string();
    trace!(url = %url, client_request_id = %request_id, "GET");

    self
      .client
      .get(url)
      .bearer_auth(&self.token)
      .header("SdkVersion", CLIENT_SKU)
      .header("x-client-SKU", CLIENT_SKU)
      .header("client-request-id", request_id)
      .header("return-client-request-id", "true")
  }

  /// Send a GET request and fail on any non-success status.
  async fn send(&self, endpoint: &str, accept: &str) -> GraphResult<reqwest::Response> {
    let url = self.resolve_url(endpoint)?;
    let response = self.get(url.clone()).header("Accept", accept).send().await?;

    let status = response.status();
    if !status.is_success() {
      let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| String::from("(no error details)"));
      debug!(url = %url, %status, "Graph request failed");
      return Err(GraphError::from_status(status, url.as_str(), error_text));
    }

    Ok(response)
  }
}

#[async_trait]
impl GraphApi for GraphClient {
  async fn get_json(&self, endpoint: &str) -> GraphResult<Value> {
    let response = self.send(endpoint, "application/json").await?;
    let bytes = response.bytes().await?;

    serde_json::from_slice(&bytes).map_err(|e| GraphError::malformed(endpoint, e))
  }

  async fn get_text(&self, endpoint: &str) -> GraphResult<String> {
    let response = self.send(endpoint, "text/html").await?;
    Ok(response.text().await?)
  }
}

/// Build `{resource}{api_version}/`, tolerating missing or doubled slashes.
fn api_base_url(resource: &str, api_version: &str) -> Result<Url> {
  let root = format!(
    "{}/{}/",
    resource.trim_end_matches('/'),
    api_version.trim_matches('/')
  );
  Url::parse(&root).with_context(|| format!("Invalid Graph resource URL: {root}"))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn client() -> GraphClient {
    GraphClient::new(DEFAULT_RESOURCE, DEFAULT_API_VERSION, "test-token", 30).unwrap()
  }

  #[test]
  fn test_graph_client_new() {
    let client = client();
    assert_eq!(client.base_url().as_str(), "https://graph.microsoft.com/v1.0/");
    assert_eq!(client.token, "test-token");
  }

  #[test]
  fn test_graph_client_normalizes_slashes() {
    let client = GraphClient::new("https://graph.microsoft.com", "/beta/", "t", 30).unwrap();
    assert_eq!(client.base_url().as_str(), "https://graph.microsoft.com/beta/");
  }

  #[test]
  fn test_graph_client_rejects_invalid_resource() {
    assert!(GraphClient::new("not a url", "v1.0", "t", 30).is_err());
  }

  #[test]
  fn resolve_url_joins_relative_endpoints() {
    let client = client();
    assert_eq!(
      client.resolve_url("me/onenote/notebooks").unwrap().as_str(),
      "https://graph.microsoft.com/v1.0/me/onenote/notebooks"
    );
    assert_eq!(
      client.resolve_url("/me").unwrap().as_str(),
      "https://graph.microsoft.com/v1.0/me"
    );
  }

  #[test]
  fn resolve_url_keeps_absolute_next_links() {
    let client = client();
    let next = "https://graph.microsoft.com/v1.0/me/onenote/notebooks?$skip=20";
    assert_eq!(client.resolve_url(next).unwrap().as_str(), next);
  }

  #[test]
  fn request_carries_diagnostic_headers() {
    let client = client();
    let url = client.resolve_url("me").unwrap();
    let first = client.get(url.clone()).build().unwrap();
    let second = client.get(url).build().unwrap();

    let headers = first.headers();
    assert_eq!(headers["authorization"], "Bearer test-token");
    assert_eq!(headers["sdkversion"], CLIENT_SKU);
    assert_eq!(headers["x-client-sku"], CLIENT_SKU);
    assert_eq!(headers["return-client-request-id"], "true");
    assert_ne!(
      headers["client-request-id"],
      second.headers()["client-request-id"],
      "every request needs its own correlation id"
    );
  }
}
