//! Route handlers.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use tracing::{info, warn};

use super::error::WebError;
use super::state::AppState;
use crate::graph::{self, GraphApi, tree};
use crate::oauth::{self, OAuthError};
use crate::render;

/// Name of the cookie holding the session id.
pub const SESSION_COOKIE: &str = "onenote_export_session";

/// Query parameters the identity provider sends to the redirect URI.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
  pub code: Option<String>,
  pub state: Option<String>,
  pub error: Option<String>,
  pub error_description: Option<String>,
}

/// `GET /`
pub async fn homepage() -> Html<String> {
  Html(render::homepage())
}

/// `GET /login`: remember a fresh `state` and send the browser to the provider.
pub async fn login(State(state): State<Arc<AppState>>, jar: CookieJar) -> Result<(CookieJar, Redirect), WebError> {
  let existing = jar.get(SESSION_COOKIE).map(|cookie| cookie.value().to_string());
  let oauth_state = oauth::new_state();
  let url = state.oauth.authorization_url(&oauth_state)?;

  let session_id = state.begin_login(existing.as_deref(), oauth_state).await;
  let jar = if existing.as_deref() == Some(session_id.as_str()) {
    jar
  } else {
    jar.add(session_cookie(session_id))
  };

  info!("Redirecting to identity provider");
  Ok((jar, Redirect::to(url.as_str())))
}

/// `GET /login/authorized`: verify `state`, redeem the code, keep the token.
///
/// A successful sign-in moves the token to a newly issued session id; any
/// failure drops the session.
pub async fn authorized(
  State(state): State<Arc<AppState>>,
  jar: CookieJar,
  Query(query): Query<CallbackQuery>,
) -> Result<(CookieJar, Redirect), WebError> {
  let session_id = jar
    .get(SESSION_COOKIE)
    .map(|cookie| cookie.value().to_string())
    .ok_or(OAuthError::MissingState)?;

  // The issued state is single-use, whatever the outcome of this callback.
  let issued = state.take_oauth_state(&session_id).await;

  match redeem(&state, issued.as_deref(), query).await {
    Ok(access_token) => {
      let new_id = state.complete_login(&session_id, access_token).await;
      Ok((jar.add(session_cookie(new_id)), Redirect::to("/preexport")))
    }
    Err(e) => {
      state.discard_session(&session_id).await;
      Err(e.into())
    }
  }
}

async fn redeem(state: &AppState, issued: Option<&str>, query: CallbackQuery) -> Result<String, OAuthError> {
  oauth::verify_state(issued, query.state.as_deref())?;

  if let Some(error) = query.error {
    return Err(OAuthError::Denied {
      error,
      description: query.error_description.unwrap_or_default(),
    });
  }

  let code = query.code.ok_or(OAuthError::MissingCode)?;
  let token = state.oauth.exchange_code(&state.http, &code).await?;
  Ok(token.access_token)
}

/// `GET /preexport`: confirm who is signed in before exporting.
pub async fn preexport(State(state): State<Arc<AppState>>, jar: CookieJar) -> Result<Response, WebError> {
  let Some(token) = session_token(&state, &jar).await else {
    return Ok(Redirect::to("/login").into_response());
  };

  let client = state.graph_client(&token)?;
  let profile = client.me().await?;

  Ok(Html(render::preexport(&profile, &state.filter)).into_response())
}

/// `GET /export`: walk the notebooks and render them.
pub async fn export(State(state): State<Arc<AppState>>, jar: CookieJar) -> Result<Response, WebError> {
  let Some(token) = session_token(&state, &jar).await else {
    return Ok(Redirect::to("/login").into_response());
  };

  let client = state.graph_client(&token)?;
  let notebooks = graph::export_notebooks(&client, &state.filter)
    .await
    .inspect_err(|e| warn!("Export aborted: {e}"))?;

  info!(
    notebooks = notebooks.len(),
    sections = tree::count_sections(&notebooks),
    pages = tree::count_pages(&notebooks),
    "Export finished"
  );

  Ok(Html(render::exported(&notebooks)).into_response())
}

async fn session_token(state: &AppState, jar: &CookieJar) -> Option<String> {
  let session_id = jar.get(SESSION_COOKIE)?.value().to_string();
  state.access_token(&session_id).await
}

fn session_cookie(id: String) -> Cookie<'static> {
  Cookie::build((SESSION_COOKIE, id))
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax)
    .build()
}
