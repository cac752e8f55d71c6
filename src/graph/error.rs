//! Error type shared by every Graph fetch operation.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure modes of a single Graph request or of a traversal built on top of
/// them.
///
/// Callers can tell an expired or missing token apart from a transport
/// problem and from a response that did not have the expected shape.
#[derive(Debug, Error)]
pub enum GraphError {
  /// The API rejected the bearer token (401) or the token lacks a scope (403).
  #[error("Graph API rejected the access token ({status}): {message}")]
  Unauthorized { status: StatusCode, message: String },

  /// Any other non-success status code.
  #[error("Graph API returned error {status} for {url}: {message}")]
  Status {
    status: StatusCode,
    url: String,
    message: String,
  },

  /// The request could not be sent or the response body could not be read.
  #[error("Failed to reach the Graph API: {0}")]
  Network(#[from] reqwest::Error),

  /// The response body was not the JSON shape we expected.
  #[error("Unexpected response shape from {context}: {source}")]
  Malformed {
    context: String,
    #[source]
    source: serde_json::Error,
  },

  /// An endpoint could not be turned into an absolute URL.
  #[error("Invalid Graph endpoint {endpoint}: {source}")]
  InvalidUrl {
    endpoint: String,
    #[source]
    source: url::ParseError,
  },
}

impl GraphError {
  /// Classify a non-success HTTP status into the matching variant.
  pub fn from_status(status: StatusCode, url: impl Into<String>, message: impl Into<String>) -> Self {
    let message = message.into();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
      Self::Unauthorized { status, message }
    } else {
      Self::Status {
        status,
        url: url.into(),
        message,
      }
    }
  }

  /// Wrap a deserialization failure with the endpoint that produced it.
  pub fn malformed(context: impl Into<String>, source: serde_json::Error) -> Self {
    Self::Malformed {
      context: context.into(),
      source,
    }
  }

  /// Whether signing in again could fix this error.
  pub fn is_unauthorized(&self) -> bool {
    matches!(self, Self::Unauthorized { .. })
  }
}

/// Result alias for Graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unauthorized_and_forbidden_are_classified_as_auth_failures() {
    let err = GraphError::from_status(StatusCode::UNAUTHORIZED, "me", "expired");
    assert!(err.is_unauthorized());

    let err = GraphError::from_status(StatusCode::FORBIDDEN, "me", "missing scope");
    assert!(err.is_unauthorized());
  }

  #[test]
  fn other_statuses_keep_the_url() {
    let err = GraphError::from_status(StatusCode::NOT_FOUND, "me/onenote/notebooks", "nope");
    assert!(!err.is_unauthorized());
    let message = err.to_string();
    assert!(message.contains("404"));
    assert!(message.contains("me/onenote/notebooks"));
  }

  #[test]
  fn malformed_mentions_context() {
    let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err = GraphError::malformed("me/onenote/notebooks", source);
    assert!(err.to_string().contains("me/onenote/notebooks"));
  }
}
