use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while signing a user in.
#[derive(Debug, Error)]
pub enum OAuthError {
  /// The callback arrived for a browser session that never started a login.
  #[error("No sign-in is in progress for this session")]
  MissingState,

  /// The `state` returned to the redirect URI is not the one we issued.
  #[error("State returned to redirect URL does not match")]
  StateMismatch,

  /// The identity provider refused the authorization request.
  #[error("Authorization was denied: {error} {description}")]
  Denied { error: String, description: String },

  /// The callback carried neither a code nor an error.
  #[error("Authorization response is missing the code parameter")]
  MissingCode,

  /// The token endpoint rejected the code exchange.
  #[error("Token exchange failed with status {status}: {message}")]
  Exchange { status: StatusCode, message: String },

  /// The token endpoint could not be reached.
  #[error("Failed to reach the token endpoint: {0}")]
  Network(#[from] reqwest::Error),

  /// The token endpoint answered with something other than a token response.
  #[error("Unexpected token response: {0}")]
  Malformed(#[source] serde_json::Error),

  /// The configured authority or endpoint does not form a valid URL.
  #[error("Invalid OAuth endpoint {url}: {source}")]
  InvalidUrl {
    url: String,
    #[source]
    source: url::ParseError,
  },
}
