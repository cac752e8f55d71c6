//! Depth-first export of the notebook → section → page hierarchy.

use std::fmt;
use std::pin::pin;
use std::sync::Arc;

use futures::TryStreamExt;
use serde::Serialize;
use tracing::info;

use super::api::GraphApi;
use super::error::GraphResult;
use super::models::{Notebook, PageSummary, Section};
use super::pagination::paginate;

/// Notebook name exported when no filter is configured.
pub const DEFAULT_NOTEBOOK: &str = "Archive";

/// Section name exported when no filter is configured.
pub const DEFAULT_SECTION: &str = "Done";

/// Predicate deciding whether a notebook or section is part of the export.
#[derive(Clone, Default)]
pub enum NameFilter {
  /// Keep everything.
  #[default]
  Any,
  /// Keep names equal to this string.
  Exact(String),
  /// Keep names equal to this string, ignoring case.
  IgnoreCase(String),
  /// Keep names accepted by an arbitrary predicate.
  Custom(Arc<dyn Fn(&str) -> bool + Send + Sync>),
}

impl NameFilter {
  /// Build a filter from an injected predicate.
  pub fn custom(predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
    Self::Custom(Arc::new(predicate))
  }

  /// Whether `name` passes the filter.
  pub fn matches(&self, name: &str) -> bool {
    match self {
      Self::Any => true,
      Self::Exact(expected) => name == expected,
      Self::IgnoreCase(expected) => name.to_lowercase() == expected.to_lowercase(),
      Self::Custom(predicate) => predicate(name),
    }
  }
}

impl fmt::Debug for NameFilter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Any => write!(f, "Any"),
      Self::Exact(name) => f.debug_tuple("Exact").field(name).finish(),
      Self::IgnoreCase(name) => f.debug_tuple("IgnoreCase").field(name).finish(),
      Self::Custom(_) => write!(f, "Custom(..)"),
    }
  }
}

impl fmt::Display for NameFilter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Any => write!(f, "any"),
      Self::Exact(name) => write!(f, "\"{name}\""),
      Self::IgnoreCase(name) => write!(f, "\"{name}\" (ignoring case)"),
      Self::Custom(_) => write!(f, "custom predicate"),
    }
  }
}

/// Filters applied at the two collection levels. Pages are never filtered.
#[derive(Debug, Clone)]
pub struct ExportFilter {
  pub notebooks: NameFilter,
  pub sections: NameFilter,
}

impl ExportFilter {
  /// Keep every notebook and section.
  pub fn everything() -> Self {
    Self {
      notebooks: NameFilter::Any,
      sections: NameFilter::Any,
    }
  }
}

impl Default for ExportFilter {
  /// Only the `Archive` notebook and its `Done` sections.
  fn default() -> Self {
    Self {
      notebooks: NameFilter::Exact(DEFAULT_NOTEBOOK.to_string()),
      sections: NameFilter::Exact(DEFAULT_SECTION.to_string()),
    }
  }
}

/// Exported notebook with its retained sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedNotebook {
  pub id: String,
  pub name: String,
  pub sections: Vec<ExportedSection>,
}

/// Exported section with all of its pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedSection {
  pub id: String,
  pub name: String,
  pub pages: Vec<ExportedPage>,
}

/// Exported page. `content` is empty when the tree was built without content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedPage {
  pub id: String,
  pub title: String,
  pub content: String,
}

/// Endpoint listing the signed-in user's notebooks.
pub fn notebooks_endpoint() -> String {
  "me/onenote/notebooks?$select=id,displayName".to_string()
}

/// Endpoint listing the sections of a notebook.
pub fn sections_endpoint(notebook_id: &str) -> String {
  format!("me/onenote/notebooks/{notebook_id}/sections?$select=id,displayName")
}

/// Endpoint listing the pages of a section.
pub fn pages_endpoint(section_id: &str) -> String {
  format!("me/onenote/sections/{section_id}/pages?$select=id,title")
}

/// Endpoint returning a page's HTML body.
pub fn page_content_endpoint(page_id: &str) -> String {
  format!("me/onenote/pages/{page_id}/content")
}

/// Build the filtered notebook tree, fetching every page's content.
///
/// Notebooks and sections are visited depth-first in server order. Children
/// that fail the filter are dropped without fetching anything beneath them.
///
/// # Arguments
/// * `client` - API implementation used for every request.
/// * `filter` - Predicates for notebook and section names.
///
/// # Returns
/// The notebooks that passed the filter, each fully populated.
///
/// # Errors
/// The first failed request aborts the traversal; no partial tree is returned.
pub async fn export_notebooks(client: &dyn GraphApi, filter: &ExportFilter) -> GraphResult<Vec<ExportedNotebook>> {
  build_tree(client, filter, true).await
}

/// Build the filtered notebook tree without fetching page content.
///
/// Used for listings where only the structure matters.
pub async fn outline_notebooks(client: &dyn GraphApi, filter: &ExportFilter) -> GraphResult<Vec<ExportedNotebook>> {
  build_tree(client, filter, false).await
}

async fn build_tree(
  client: &dyn GraphApi,
  filter: &ExportFilter,
  with_content: bool,
) -> GraphResult<Vec<ExportedNotebook>> {
  let mut notebooks = Vec::new();
  let mut listing = pin!(paginate::<Notebook>(client, &notebooks_endpoint()));

  while let Some(notebook) = listing.try_next().await? {
    if !filter.notebooks.matches(&notebook.display_name) {
      continue;
    }
    info!("- {}", notebook.display_name);

    let sections = build_sections(client, &notebook.id, filter, with_content).await?;
    notebooks.push(ExportedNotebook {
      id: notebook.id,
      name: notebook.display_name,
      sections,
    });
  }

  Ok(notebooks)
}

async fn build_sections(
  client: &dyn GraphApi,
  notebook_id: &str,
  filter: &ExportFilter,
  with_content: bool,
) -> GraphResult<Vec<ExportedSection>> {
  let mut sections = Vec::new();
  let mut listing = pin!(paginate::<Section>(client, &sections_endpoint(notebook_id)));

  while let Some(section) = listing.try_next().await? {
    if !filter.sections.matches(&section.display_name) {
      continue;
    }
    info!("- - {}", section.display_name);

    let pages = build_pages(client, &section.id, with_content).await?;
    sections.push(ExportedSection {
      id: section.id,
      name: section.display_name,
      pages,
    });
  }

  Ok(sections)
}

async fn build_pages(client: &dyn GraphApi, section_id: &str, with_content: bool) -> GraphResult<Vec<ExportedPage>> {
  let mut pages = Vec::new();
  let mut listing = pin!(paginate::<PageSummary>(client, &pages_endpoint(section_id)));

  while let Some(page) = listing.try_next().await? {
    info!("- - - {}", page.title);

    let content = if with_content {
      client.get_text(&page_content_endpoint(&page.id)).await?
    } else {
      String::new()
    };

    pages.push(ExportedPage {
      id: page.id,
      title: page.title,
      content,
    });
  }

  Ok(pages)
}

/// Number of sections across all notebooks.
pub fn count_sections(notebooks: &[ExportedNotebook]) -> usize {
  notebooks.iter().map(|n| n.sections.len()).sum()
}

/// Number of pages across all notebooks.
pub fn count_pages(notebooks: &[ExportedNotebook]) -> usize {
  notebooks
    .iter()
    .flat_map(|n| &n.sections)
    .map(|s| s.pages.len())
    .sum()
}
