//! `serve` subcommand: run the web application.

use std::net::SocketAddr;
use std::process;

use crate::cli::{Cli, OAuthOptions};
use crate::color::ColorScheme;
use crate::web::{self, AppState, GraphSettings};

/// Start the web server and block until it shuts down.
pub(crate) async fn handle_serve_command(bind: SocketAddr, oauth: &OAuthOptions, cli: &Cli, colors: &ColorScheme) {
  let oauth = match oauth.to_config() {
    Ok(config) => config,
    Err(e) => {
      eprintln!("{} {}", colors.error("Error:"), e);
      process::exit(4);
    }
  };

  let filter = cli.filter.export_filter();
  let graph = GraphSettings {
    resource: cli.graph.resource.clone(),
    api_version: cli.graph.api_version.clone(),
  };

  println!("{} {}", colors.progress("→"), colors.info("Starting web server"));
  println!("  {}: {}", colors.emphasis("Open"), colors.link(format!("http://{bind}/")));
  println!("  {}: {}", colors.emphasis("Redirect URI"), colors.link(&oauth.redirect_uri));
  println!("  {}: {}", colors.emphasis("Notebooks"), filter.notebooks);
  println!("  {}: {}", colors.emphasis("Sections"), filter.sections);

  let state = match AppState::new(oauth, graph, filter, cli.graph.timeout) {
    Ok(state) => state,
    Err(e) => {
      eprintln!("{} {}", colors.error("✗"), colors.error("Failed to initialise server"));
      eprintln!("  {e:#}");
      process::exit(1);
    }
  };

  if let Err(e) = web::serve(state, bind).await {
    eprintln!("{} {}", colors.error("✗"), colors.error("Server error"));
    eprintln!("  {e:#}");
    process::exit(1);
  }
}
