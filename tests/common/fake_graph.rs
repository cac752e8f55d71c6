//! Fake Graph API client for testing
//!
//! Serves canned responses keyed by endpoint and records every request, so
//! tests can check both the exported tree and the traffic that produced it.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use onenote_export::graph::{GraphApi, GraphError, GraphResult};
use reqwest::StatusCode;
use serde_json::Value;

use crate::common::fixtures;

/// A fake Graph client that never touches the network.
#[derive(Default)]
pub struct FakeGraphClient {
  json: HashMap<String, Value>,
  text: HashMap<String, String>,
  failures: HashMap<String, StatusCode>,
  requests: Mutex<Vec<String>>,
}

impl FakeGraphClient {
  pub fn new() -> Self {
    Self::default()
  }

  /// The archive used by most tests:
  ///
  /// ```text
  /// Archive
  /// ├── Done (Page A, Page B)
  /// └── In progress (Draft)
  /// Personal
  /// └── Done (Groceries)
  /// ```
  pub fn with_sample_archive() -> Self {
    let mut client = Self::new();
    client.add_json(
      &fixtures::notebooks_endpoint(),
      fixtures::collection(vec![fixtures::named("nb-archive", "Archive"), fixtures::named("nb-personal", "Personal")]),
    );
    client.add_json(
      &fixtures::sections_endpoint("nb-archive"),
      fixtures::collection(vec![
        fixtures::named("sec-done", "Done"),
        fixtures::named("sec-wip", "In progress"),
      ]),
    );
    client.add_json(
      &fixtures::sections_endpoint("nb-personal"),
      fixtures::collection(vec![fixtures::named("sec-personal-done", "Done")]),
    );
    client.add_section_pages("sec-done", &[("page-a", "Page A"), ("page-b", "Page B")]);
    client.add_section_pages("sec-wip", &[("page-draft", "Draft")]);
    client.add_section_pages("sec-personal-done", &[("page-groceries", "Groceries")]);
    client
  }

  pub fn add_json(&mut self, endpoint: &str, body: Value) {
    self.json.insert(endpoint.to_string(), body);
  }

  pub fn add_content(&mut self, page_id: &str, html: &str) {
    self.text.insert(fixtures::content_endpoint(page_id), html.to_string());
  }

  /// Register a single-page listing for a section plus content for every page.
  pub fn add_section_pages(&mut self, section_id: &str, pages: &[(&str, &str)]) {
    let values = pages.iter().map(|(id, title)| fixtures::page(id, title)).collect();
    self.add_json(&fixtures::pages_endpoint(section_id), fixtures::collection(values));
    for (id, title) in pages {
      self.add_content(id, &fixtures::page_html(title));
    }
  }

  /// Make `endpoint` answer with an error status.
  pub fn fail(&mut self, endpoint: &str, status: StatusCode) {
    self.failures.insert(endpoint.to_string(), status);
  }

  /// Every endpoint requested so far, in order.
  pub fn requests(&self) -> Vec<String> {
    self.requests.lock().unwrap().clone()
  }

  /// Requested endpoints that fetched page content.
  pub fn content_requests(&self) -> Vec<String> {
    self
      .requests()
      .into_iter()
      .filter(|endpoint| endpoint.ends_with("/content"))
      .collect()
  }

  /// Whether any endpoint was requested twice.
  pub fn has_duplicate_requests(&self) -> bool {
    let requests = self.requests();
    let unique: HashSet<_> = requests.iter().collect();
    unique.len() != requests.len()
  }

  fn record(&self, endpoint: &str) -> GraphResult<()> {
    self.requests.lock().unwrap().push(endpoint.to_string());
    match self.failures.get(endpoint) {
      Some(status) => Err(GraphError::from_status(*status, endpoint, "canned failure")),
      None => Ok(()),
    }
  }

  fn not_found(endpoint: &str) -> GraphError {
    GraphError::from_status(StatusCode::NOT_FOUND, endpoint, "no canned response")
  }
}

#[async_trait]
impl GraphApi for FakeGraphClient {
  async fn get_json(&self, endpoint: &str) -> GraphResult<Value> {
    self.record(endpoint)?;
    self.json.get(endpoint).cloned().ok_or_else(|| Self::not_found(endpoint))
  }

  async fn get_text(&self, endpoint: &str) -> GraphResult<String> {
    self.record(endpoint)?;
    self.text.get(endpoint).cloned().ok_or_else(|| Self::not_found(endpoint))
  }
}
