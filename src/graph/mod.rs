//! Microsoft Graph module providing the API abstraction, the HTTP client, data
//! models, pagination and the filtered notebook traversal.

pub mod api;
pub mod client;
pub mod error;
pub mod models;
pub mod pagination;
pub mod tree;

pub use api::GraphApi;
pub use client::GraphClient;
pub use error::{GraphError, GraphResult};
pub use models::{Notebook, PageSummary, ResultPage, Section, UserProfile};
pub use pagination::{collect_all, paginate};
pub use tree::{
  ExportFilter, ExportedNotebook, ExportedPage, ExportedSection, NameFilter, export_notebooks, outline_notebooks,
};
