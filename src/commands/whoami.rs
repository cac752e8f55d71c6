//! `whoami` subcommand: check that the access token works.

use std::process;

use crate::cli::Cli;
use crate::color::ColorScheme;
use crate::commands::graph_client;
use crate::graph::{GraphApi, GraphError};

/// Call `GET me` with the configured token and print the profile.
///
/// Exits with status 2 when the token is rejected and 1 on any other failure.
pub(crate) async fn handle_whoami_command(cli: &Cli, colors: &ColorScheme) {
  println!("{} {}", colors.info("→"), colors.info("Testing access token"));

  let client = match graph_client(cli) {
    Ok(client) => client,
    Err(e) => {
      eprintln!("{} {}", colors.error("✗"), colors.error("Failed to create API client"));
      eprintln!("  {e:#}");
      process::exit(1);
    }
  };
  println!("  {}: {}", colors.emphasis("API"), colors.link(client.base_url()));

  match client.me().await {
    Ok(profile) => {
      println!("\n{} {}", colors.success("✓"), colors.success("Token is valid"));
      println!("  {}: {}", colors.emphasis("Name"), profile.display_name);
      println!("  {}: {}", colors.emphasis("E-mail"), profile.email());
      println!(
        "  {}: {}",
        colors.emphasis("Principal"),
        colors.dimmed(&profile.user_principal_name)
      );
    }
    Err(e @ GraphError::Unauthorized { .. }) => {
      eprintln!("\n{} {}", colors.error("✗"), colors.error("Access token was rejected"));
      eprintln!("  {e}");
      eprintln!(
        "\n{}",
        colors.info("Sign in through `onenote-export serve` or request a new token with the Notes.Read scope.")
      );
      process::exit(2);
    }
    Err(e) => {
      eprintln!("\n{} {}", colors.error("✗"), colors.error("Failed to reach the Graph API"));
      eprintln!("  {e}");
      process::exit(1);
    }
  }
}
