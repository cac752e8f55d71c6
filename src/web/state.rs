//! Shared state for the web application.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::graph::{ExportFilter, GraphClient};
use crate::oauth::OAuthConfig;

/// How long a session stays usable after it was created.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

/// Upper bound on live sessions; the oldest is evicted beyond it.
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Where the Graph API lives.
#[derive(Debug, Clone)]
pub struct GraphSettings {
  pub resource: String,
  pub api_version: String,
}

/// Per-browser sign-in state, keyed by the session cookie.
#[derive(Debug, Clone)]
pub struct Session {
  /// `state` issued by the last `/login`, consumed by the callback.
  pub oauth_state: Option<String>,
  /// Access token obtained by the callback.
  pub access_token: Option<String>,
  pub created_at: Instant,
}

impl Session {
  fn new() -> Self {
    Self {
      oauth_state: None,
      access_token: None,
      created_at: Instant::now(),
    }
  }

  fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
    now.saturating_duration_since(self.created_at) >= ttl
  }
}

/// Web application state.
pub struct AppState {
  pub oauth: OAuthConfig,
  pub graph: GraphSettings,
  pub filter: ExportFilter,
  /// Connection pool shared by the token exchange and every Graph client.
  pub http: reqwest::Client,
  pub sessions: RwLock<HashMap<String, Session>>,
  session_ttl: Duration,
  max_sessions: usize,
}

impl AppState {
  /// Create the state with an HTTP client using the given timeout.
  ///
  /// # Errors
  /// Returns an error if the `reqwest::Client` cannot be built.
  pub fn new(oauth: OAuthConfig, graph: GraphSettings, filter: ExportFilter, timeout_secs: u64) -> Result<Self> {
    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(timeout_secs))
      .user_agent(format!(
        "onenote-export/{} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("TARGET")
      ))
      .build()
      .context("Failed to create HTTP client")?;

    Ok(Self {
      oauth,
      graph,
      filter,
      http,
      sessions: RwLock::new(HashMap::new()),
      session_ttl: DEFAULT_SESSION_TTL,
      max_sessions: DEFAULT_MAX_SESSIONS,
    })
  }

  /// Override session lifetime and capacity.
  pub fn with_session_limits(mut self, ttl: Duration, max_sessions: usize) -> Self {
    self.session_ttl = ttl;
    self.max_sessions = max_sessions.max(1);
    self
  }

  /// Record a freshly issued `oauth_state` and return the session id to use.
  ///
  /// `existing` is reused only when it names a live session; any other
  /// cookie value is ignored and a new id is issued. Expired sessions are
  /// swept first, then the oldest ones are evicted to stay under capacity.
  pub async fn begin_login(&self, existing: Option<&str>, oauth_state: String) -> String {
    let mut sessions = self.sessions.write().await;
    let now = Instant::now();
    sessions.retain(|_, session| !session.is_expired(now, self.session_ttl));

    if let Some(id) = existing {
      if let Some(session) = sessions.get_mut(id) {
        session.oauth_state = Some(oauth_state);
        return id.to_string();
      }
    }

    while sessions.len() >= self.max_sessions {
      let Some(oldest) = sessions
        .iter()
        .min_by_key(|(_, session)| session.created_at)
        .map(|(id, _)| id.clone())
      else {
        break;
      };
      debug!("Evicting oldest session");
      sessions.remove(&oldest);
    }

    let id = Uuid::new_v4().to_string();
    let mut session = Session::new();
    session.oauth_state = Some(oauth_state);
    sessions.insert(id.clone(), session);
    id
  }

  /// Remove and return the `state` issued to a session.
  pub async fn take_oauth_state(&self, session_id: &str) -> Option<String> {
    self
      .sessions
      .write()
      .await
      .get_mut(session_id)
      .and_then(|session| session.oauth_state.take())
  }

  /// Store the token under a new session id and drop the pre-login one.
  pub async fn complete_login(&self, previous_id: &str, access_token: String) -> String {
    let mut sessions = self.sessions.write().await;
    sessions.remove(previous_id);

    let id = Uuid::new_v4().to_string();
    let mut session = Session::new();
    session.access_token = Some(access_token);
    sessions.insert(id.clone(), session);
    id
  }

  /// Forget a session entirely.
  pub async fn discard_session(&self, session_id: &str) {
    self.sessions.write().await.remove(session_id);
  }

  /// Access token stored for a live session, if that session has signed in.
  pub async fn access_token(&self, session_id: &str) -> Option<String> {
    let now = Instant::now();
    self
      .sessions
      .read()
      .await
      .get(session_id)
      .filter(|session| !session.is_expired(now, self.session_ttl))
      .and_then(|session| session.access_token.clone())
  }

  /// Graph client authenticated as the session's user.
  pub fn graph_client(&self, token: &str) -> Result<GraphClient> {
    GraphClient::with_http_client(self.http.clone(), &self.graph.resource, &self.graph.api_version, token)
  }
}
