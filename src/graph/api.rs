//! Trait definitions for talking to the Graph API.

use async_trait::async_trait;
use serde_json::Value;

use super::error::{GraphError, GraphResult};
use super::models::UserProfile;

/// Low-level Graph operations (enables testing with fake implementations).
///
/// Endpoints are either relative to the API root (`me/onenote/notebooks`) or
/// absolute URLs, which is how `@odata.nextLink` pointers arrive.
#[async_trait]
pub trait GraphApi: Send + Sync {
  /// Issue a GET request and parse the body as JSON.
  ///
  /// # Arguments
  /// * `endpoint` - Relative endpoint or absolute URL to fetch.
  ///
  /// # Returns
  /// The decoded JSON document.
  ///
  /// # Errors
  /// [`GraphError::Unauthorized`] for a rejected token, [`GraphError::Status`]
  /// for other HTTP failures, [`GraphError::Network`] when the request never
  /// completes and [`GraphError::Malformed`] when the body is not JSON.
  async fn get_json(&self, endpoint: &str) -> GraphResult<Value>;

  /// Issue a GET request and return the body decoded as text.
  ///
  /// Used for page content, which Graph serves as HTML rather than JSON.
  async fn get_text(&self, endpoint: &str) -> GraphResult<String>;

  /// Fetch the signed-in user's profile.
  async fn me(&self) -> GraphResult<UserProfile> {
    let body = self.get_json("me").await?;
    serde_json::from_value(body).map_err(|e| GraphError::malformed("me", e))
  }
}
