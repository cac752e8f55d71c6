//! Test fixtures shaped like Microsoft Graph OneNote responses.

use onenote_export::graph::tree;
use serde_json::{Value, json};

pub fn notebooks_endpoint() -> String {
  tree::notebooks_endpoint()
}

pub fn sections_endpoint(notebook_id: &str) -> String {
  tree::sections_endpoint(notebook_id)
}

pub fn pages_endpoint(section_id: &str) -> String {
  tree::pages_endpoint(section_id)
}

pub fn content_endpoint(page_id: &str) -> String {
  tree::page_content_endpoint(page_id)
}

/// Notebook or section entry.
pub fn named(id: &str, display_name: &str) -> Value {
  json!({
    "id": id,
    "displayName": display_name,
    "self": format!("https://graph.microsoft.com/v1.0/me/onenote/{id}"),
  })
}

pub fn page(id: &str, title: &str) -> Value {
  json!({
    "id": id,
    "title": title,
    "createdDateTime": "2024-03-01T09:30:00Z",
  })
}

/// Last (or only) page of a collection.
pub fn collection(values: Vec<Value>) -> Value {
  json!({
    "@odata.context": "https://graph.microsoft.com/v1.0/$metadata#users('me')/onenote",
    "value": values,
  })
}

/// A collection page that continues at `next_link`.
pub fn collection_with_next(values: Vec<Value>, next_link: &str) -> Value {
  json!({
    "value": values,
    "@odata.nextLink": next_link,
  })
}

pub fn page_html(title: &str) -> String {
  format!(
    "<html><head><title>{title}</title></head><body><div><p>Notes for {title}</p></div></body></html>"
  )
}

pub fn user_profile() -> Value {
  json!({
    "displayName": "Ada Lovelace",
    "userPrincipalName": "ada@example.com",
    "mail": "ada.lovelace@example.com",
  })
}
