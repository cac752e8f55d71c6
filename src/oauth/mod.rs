//! OAuth2 authorization-code sign-in against the Microsoft identity platform.
//!
//! The flow has three steps: send the browser to
//! [`OAuthConfig::authorization_url`] with a fresh [`new_state`], check the
//! `state` that comes back with [`verify_state`], then trade the code for an
//! access token with [`OAuthConfig::exchange_code`].

mod config;
mod error;

pub use config::{
  DEFAULT_AUTH_ENDPOINT, DEFAULT_AUTHORITY_URL, DEFAULT_REDIRECT_URI, DEFAULT_SCOPES, DEFAULT_TOKEN_ENDPOINT,
  OAuthConfig, TokenResponse,
};
pub use error::OAuthError;
use uuid::Uuid;

/// Generate an unguessable anti-forgery `state` value.
pub fn new_state() -> String {
  Uuid::new_v4().to_string()
}

/// Check the `state` returned to the redirect URI against the one we issued.
///
/// # Errors
/// [`OAuthError::MissingState`] when no login was started for the session,
/// [`OAuthError::StateMismatch`] when the values differ or none was returned.
pub fn verify_state(issued: Option<&str>, returned: Option<&str>) -> Result<(), OAuthError> {
  let issued = issued.ok_or(OAuthError::MissingState)?;
  match returned {
    Some(returned) if returned == issued => Ok(()),
    _ => Err(OAuthError::StateMismatch),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn states_are_unique() {
    assert_ne!(new_state(), new_state());
  }

  #[test]
  fn matching_state_is_accepted() {
    let state = new_state();
    assert!(verify_state(Some(&state), Some(&state)).is_ok());
  }

  #[test]
  fn mismatched_state_is_rejected() {
    let result = verify_state(Some("issued"), Some("forged"));
    assert!(matches!(result, Err(OAuthError::StateMismatch)));
  }

  #[test]
  fn missing_returned_state_is_a_mismatch() {
    let result = verify_state(Some("issued"), None);
    assert!(matches!(result, Err(OAuthError::StateMismatch)));
  }

  #[test]
  fn callback_without_login_is_rejected() {
    let result = verify_state(None, Some("anything"));
    assert!(matches!(result, Err(OAuthError::MissingState)));
  }
}
