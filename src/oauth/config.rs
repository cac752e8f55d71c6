use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

use super::error::OAuthError;

pub const DEFAULT_AUTHORITY_URL: &str = "https://login.microsoftonline.com/common";
pub const DEFAULT_AUTH_ENDPOINT: &str = "/oauth2/v2.0/authorize";
pub const DEFAULT_TOKEN_ENDPOINT: &str = "/oauth2/v2.0/token";
pub const DEFAULT_SCOPES: &str = "User.Read Notes.Read";
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:5000/login/authorized";

/// Registered application and identity provider endpoints.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
  pub client_id: String,
  pub client_secret: String,
  /// Authority root, e.g. `https://login.microsoftonline.com/common`.
  pub authority_url: String,
  /// Path of the authorize endpoint relative to the authority.
  pub auth_endpoint: String,
  /// Path of the token endpoint relative to the authority.
  pub token_endpoint: String,
  pub scopes: Vec<String>,
  /// Where the provider sends the browser back; must match the registration.
  pub redirect_uri: String,
}

/// Token endpoint response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
  pub access_token: String,
  #[serde(default)]
  pub token_type: String,
  #[serde(default)]
  pub expires_in: Option<u64>,
  #[serde(default)]
  pub scope: Option<String>,
  #[serde(default)]
  pub refresh_token: Option<String>,
}

impl OAuthConfig {
  /// Scopes as the space-separated string OAuth2 expects.
  pub fn scope_string(&self) -> String {
    self.scopes.join(" ")
  }

  fn endpoint_url(&self, endpoint: &str) -> Result<Url, OAuthError> {
    let url = format!(
      "{}/{}",
      self.authority_url.trim_end_matches('/'),
      endpoint.trim_start_matches('/')
    );
    Url::parse(&url).map_err(|source| OAuthError::InvalidUrl { url, source })
  }

  /// URL that starts the sign-in in the user's browser.
  ///
  /// # Arguments
  /// * `state` - Anti-forgery value echoed back to the redirect URI.
  ///
  /// # Errors
  /// Returns [`OAuthError::InvalidUrl`] when the authority is not a valid URL.
  pub fn authorization_url(&self, state: &str) -> Result<Url, OAuthError> {
    let mut url = self.endpoint_url(&self.auth_endpoint)?;
    url
      .query_pairs_mut()
      .append_pair("client_id", &self.client_id)
      .append_pair("response_type", "code")
      .append_pair("redirect_uri", &self.redirect_uri)
      .append_pair("response_mode", "query")
      .append_pair("scope", &self.scope_string())
      .append_pair("state", state);
    Ok(url)
  }

  /// Exchange an authorization code for an access token.
  ///
  /// # Arguments
  /// * `http` - Client used for the token request.
  /// * `code` - Code received on the redirect URI.
  ///
  /// # Errors
  /// [`OAuthError::Exchange`] when the provider rejects the code,
  /// [`OAuthError::Network`] when it cannot be reached and
  /// [`OAuthError::Malformed`] when the response is not a token.
  pub async fn exchange_code(&self, http: &reqwest::Client, code: &str) -> Result<TokenResponse, OAuthError> {
    let url = self.endpoint_url(&self.token_endpoint)?;
    let scope = self.scope_string();
    let params = [
      ("client_id", self.client_id.as_str()),
      ("client_secret", self.client_secret.as_str()),
      ("code", code),
      ("redirect_uri", self.redirect_uri.as_str()),
      ("grant_type", "authorization_code"),
      ("scope", scope.as_str()),
    ];

    info!("Exchanging authorization code");

    let response = http.post(url).form(&params).send().await?;

    let status = response.status();
    if !status.is_success() {
      let message = response
        .text()
        .await
        .unwrap_or_else(|_| String::from("(no error details)"));
      return Err(OAuthError::Exchange { status, message });
    }

    let bytes = response.bytes().await?;
    let token: TokenResponse = serde_json::from_slice(&bytes).map_err(OAuthError::Malformed)?;

    info!(
      expires_in = token.expires_in.unwrap_or_default(),
      "Token exchange succeeded"
    );
    Ok(token)
  }
}
