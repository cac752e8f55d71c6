//! CLI subcommand handlers.
//!
//! This module groups the implementations for each `onenote-export`
//! subcommand, keeping `cli.rs` limited to argument definitions.

pub mod completions;
pub mod export;
pub mod ls;
pub mod serve;
pub mod version;
pub mod whoami;

use anyhow::{Context, Result};

use crate::cli::Cli;
use crate::graph::GraphClient;

/// Build a Graph client from `--token` and the Graph options.
pub(crate) fn graph_client(cli: &Cli) -> Result<GraphClient> {
  let token = cli
    .graph
    .token
    .as_deref()
    .context("No access token. Provide --token or set GRAPH_TOKEN")?;

  GraphClient::new(&cli.graph.resource, &cli.graph.api_version, token, cli.graph.timeout)
    .context("Unable to construct Graph API client")
}
