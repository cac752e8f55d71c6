use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::graph::GraphError;
use crate::oauth::OAuthError;
use crate::render;

/// Failure of a web handler, rendered as an HTML error page.
#[derive(Debug, Error)]
pub enum WebError {
  #[error(transparent)]
  OAuth(#[from] OAuthError),
  #[error(transparent)]
  Graph(#[from] GraphError),
  #[error(transparent)]
  Internal(#[from] anyhow::Error),
}

impl WebError {
  fn status_code(&self) -> StatusCode {
    match self {
      Self::OAuth(OAuthError::Network(_) | OAuthError::Exchange { .. } | OAuthError::Malformed(_)) => {
        StatusCode::BAD_GATEWAY
      }
      Self::OAuth(OAuthError::InvalidUrl { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
      Self::OAuth(_) => StatusCode::BAD_REQUEST,
      Self::Graph(GraphError::Unauthorized { .. }) => StatusCode::UNAUTHORIZED,
      Self::Graph(GraphError::InvalidUrl { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
      Self::Graph(_) => StatusCode::BAD_GATEWAY,
      Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn heading(&self) -> &'static str {
    match self {
      Self::OAuth(_) => "Sign-in failed",
      Self::Graph(GraphError::Unauthorized { .. }) => "Your session is no longer authorized",
      Self::Graph(_) => "Export failed",
      Self::Internal(_) => "Something went wrong",
    }
  }
}

impl IntoResponse for WebError {
  fn into_response(self) -> Response {
    let status = self.status_code();
    error!(%status, "{self:#}");
    (status, Html(render::error_page(self.heading(), &self.to_string()))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn state_mismatch_is_a_bad_request() {
    let err = WebError::from(OAuthError::StateMismatch);
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
  }

  #[test]
  fn rejected_token_is_unauthorized() {
    let err = WebError::from(GraphError::from_status(reqwest::StatusCode::UNAUTHORIZED, "me", "expired"));
    assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
  }

  #[test]
  fn upstream_failure_is_a_bad_gateway() {
    let err = WebError::from(GraphError::from_status(
      reqwest::StatusCode::INTERNAL_SERVER_ERROR,
      "me/onenote/notebooks",
      "boom",
    ));
    assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
  }
}
