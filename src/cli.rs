//! Command-line interface definitions for onenote-export.
//!
//! Every setting can come from a flag or from the environment, so the web
//! server can be configured entirely through env vars.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::color::ColorScheme;
use crate::commands::completions::handle_completions_command;
use crate::commands::export::handle_export_command;
use crate::commands::ls::handle_ls_command;
use crate::commands::serve::handle_serve_command;
use crate::commands::version::handle_version_command;
use crate::commands::whoami::handle_whoami_command;
use crate::graph::client::{DEFAULT_API_VERSION, DEFAULT_RESOURCE};
use crate::graph::tree::{DEFAULT_NOTEBOOK, DEFAULT_SECTION};
use crate::graph::{ExportFilter, NameFilter};
use crate::oauth::{
  DEFAULT_AUTH_ENDPOINT, DEFAULT_AUTHORITY_URL, DEFAULT_REDIRECT_URI, DEFAULT_SCOPES, DEFAULT_TOKEN_ENDPOINT,
  OAuthConfig,
};

/// onenote-export - Export OneNote notebooks to HTML
#[derive(Debug, Parser)]
#[command(
  name = "onenote-export",
  version,
  about = "Export OneNote notebooks to HTML",
  long_about = "Signs in with a Microsoft account and exports OneNote notebooks, sections and pages\n\
                through the Microsoft Graph API into a single HTML document.",
  styles = get_clap_styles()
)]
pub struct Cli {
  /// Subcommand to execute
  #[command(subcommand)]
  pub command: Command,

  /// Graph API options
  #[command(flatten)]
  pub graph: GraphOptions,

  /// Notebook and section selection
  #[command(flatten)]
  pub filter: FilterOptions,

  /// Behavior options
  #[command(flatten)]
  pub behavior: BehaviorOptions,
}

/// Subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
  /// Run the web application (sign in, confirm, export in the browser)
  Serve {
    /// Address to listen on
    #[arg(long, env = "ONENOTE_BIND", default_value = "127.0.0.1:5000", value_name = "ADDR")]
    bind: SocketAddr,

    #[command(flatten)]
    oauth: OAuthOptions,
  },

  /// Export notebooks to an HTML file using an existing access token
  Export {
    /// Output file
    #[arg(short, long, default_value = "onenote-export.html", value_name = "FILE")]
    output: PathBuf,

    /// Overwrite an existing output file
    #[arg(long)]
    overwrite: bool,
  },

  /// Print the notebook/section/page tree without downloading page content
  Ls,

  /// Show the account the access token belongs to
  Whoami,

  /// Display version and build information
  Version {
    /// Output in JSON format
    #[arg(long)]
    json: bool,

    /// Show only version number
    #[arg(long)]
    short: bool,
  },

  /// Generate shell completion scripts
  Completions {
    /// Target shell for completions
    #[arg(value_enum)]
    shell: clap_complete::Shell,
  },
}

/// Application registration and identity provider endpoints
#[derive(Debug, Parser)]
pub struct OAuthOptions {
  /// Application (client) ID
  #[arg(long, env = "ONENOTE_CLIENT_ID", value_name = "ID")]
  pub client_id: Option<String>,

  /// Client secret
  #[arg(long, env = "ONENOTE_CLIENT_SECRET", value_name = "SECRET", hide_env_values = true)]
  pub client_secret: Option<String>,

  /// Authority URL
  #[arg(long, env = "ONENOTE_AUTHORITY_URL", default_value = DEFAULT_AUTHORITY_URL, value_name = "URL")]
  pub authority_url: String,

  /// Authorize endpoint, relative to the authority
  #[arg(long, env = "ONENOTE_AUTH_ENDPOINT", default_value = DEFAULT_AUTH_ENDPOINT, value_name = "PATH")]
  pub auth_endpoint: String,

  /// Token endpoint, relative to the authority
  #[arg(long, env = "ONENOTE_TOKEN_ENDPOINT", default_value = DEFAULT_TOKEN_ENDPOINT, value_name = "PATH")]
  pub token_endpoint: String,

  /// Space-separated scopes to request
  #[arg(long, env = "ONENOTE_SCOPES", default_value = DEFAULT_SCOPES, value_name = "SCOPES")]
  pub scopes: String,

  /// Redirect URI registered for the application
  #[arg(long, env = "ONENOTE_REDIRECT_URI", default_value = DEFAULT_REDIRECT_URI, value_name = "URL")]
  pub redirect_uri: String,
}

impl OAuthOptions {
  /// Resolve into an [`OAuthConfig`].
  ///
  /// # Errors
  /// Returns a message naming the missing credential.
  pub fn to_config(&self) -> Result<OAuthConfig, String> {
    let client_id = self
      .client_id
      .clone()
      .filter(|id| !id.trim().is_empty())
      .ok_or("--client-id (or ONENOTE_CLIENT_ID) is required to serve")?;
    let client_secret = self
      .client_secret
      .clone()
      .filter(|secret| !secret.is_empty())
      .ok_or("--client-secret (or ONENOTE_CLIENT_SECRET) is required to serve")?;

    Ok(OAuthConfig {
      client_id,
      client_secret,
      authority_url: self.authority_url.clone(),
      auth_endpoint: self.auth_endpoint.clone(),
      token_endpoint: self.token_endpoint.clone(),
      scopes: self.scopes.split_whitespace().map(str::to_string).collect(),
      redirect_uri: self.redirect_uri.clone(),
    })
  }
}

/// Graph API options
#[derive(Debug, Parser)]
pub struct GraphOptions {
  /// Access token for the Graph API (export, ls, whoami)
  #[arg(long, env = "GRAPH_TOKEN", value_name = "TOKEN", hide_env_values = true)]
  pub token: Option<String>,

  /// Graph resource root
  #[arg(long, env = "GRAPH_RESOURCE", default_value = DEFAULT_RESOURCE, value_name = "URL")]
  pub resource: String,

  /// Graph API version
  #[arg(long, env = "GRAPH_API_VERSION", default_value = DEFAULT_API_VERSION, value_name = "VERSION")]
  pub api_version: String,

  /// Request timeout in seconds
  #[arg(long, default_value = "30", value_name = "SECONDS")]
  pub timeout: u64,
}

/// Which notebooks and sections to export
#[derive(Debug, Parser)]
pub struct FilterOptions {
  /// Export only notebooks with this name
  #[arg(long, default_value = DEFAULT_NOTEBOOK, value_name = "NAME")]
  pub notebook: String,

  /// Export only sections with this name
  #[arg(long, default_value = DEFAULT_SECTION, value_name = "NAME")]
  pub section: String,

  /// Export every notebook and section, ignoring --notebook and --section
  #[arg(long)]
  pub all: bool,

  /// Compare names case-insensitively
  #[arg(long)]
  pub ignore_case: bool,
}

impl FilterOptions {
  /// Build the traversal filter these options describe.
  pub fn export_filter(&self) -> ExportFilter {
    if self.all {
      return ExportFilter::everything();
    }

    let name_filter = |name: &str| {
      if self.ignore_case {
        NameFilter::IgnoreCase(name.to_string())
      } else {
        NameFilter::Exact(name.to_string())
      }
    };

    ExportFilter {
      notebooks: name_filter(&self.notebook),
      sections: name_filter(&self.section),
    }
  }
}

/// Behavior options
#[derive(Debug, Parser)]
pub struct BehaviorOptions {
  /// Show what would be exported without writing anything
  #[arg(long)]
  pub dry_run: bool,

  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Colorize output
  #[arg(long, value_enum, default_value = "auto", value_name = "WHEN")]
  pub color: ColorOption,
}

/// Color output options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorOption {
  Auto,
  Always,
  Never,
}

impl Cli {
  /// Parse CLI arguments from the environment
  pub fn parse_args() -> Self {
    Self::parse()
  }

  /// Validate CLI arguments
  ///
  /// Returns an error if the CLI configuration is invalid.
  pub fn validate(&self) -> Result<(), String> {
    if self.graph.timeout == 0 {
      return Err("--timeout must be at least 1 second".to_string());
    }

    match &self.command {
      Command::Export { .. } | Command::Ls | Command::Whoami => {
        if self.graph.token.as_deref().is_none_or(|token| token.trim().is_empty()) {
          return Err("--token (or GRAPH_TOKEN) is required for this command".to_string());
        }
      }
      Command::Serve { oauth, .. } => {
        oauth.to_config()?;
      }
      Command::Version { .. } | Command::Completions { .. } => {}
    }

    if !self.filter.all && (self.filter.notebook.is_empty() || self.filter.section.is_empty()) {
      return Err("--notebook and --section must not be empty (use --all to export everything)".to_string());
    }

    Ok(())
  }
}

/// Parse CLI arguments, initialize shared services, and dispatch to the chosen
/// command.
pub async fn run() {
  let cli = Cli::parse_args();

  init_tracing(&cli.behavior);

  // Create color scheme based on user preference
  let colors = ColorScheme::new(cli.behavior.color);

  if let Err(e) = cli.validate() {
    eprintln!("{} {}", colors.error("Error:"), e);
    process::exit(4); // Invalid arguments exit code
  }

  match &cli.command {
    Command::Serve { bind, oauth } => {
      handle_serve_command(*bind, oauth, &cli, &colors).await;
    }
    Command::Export { output, overwrite } => {
      handle_export_command(output, *overwrite, &cli, &colors).await;
    }
    Command::Ls => {
      handle_ls_command(&cli, &colors).await;
    }
    Command::Whoami => {
      handle_whoami_command(&cli, &colors).await;
    }
    Command::Version { json, short } => {
      handle_version_command(*json, *short, &colors);
    }
    Command::Completions { shell } => {
      handle_completions_command(*shell);
    }
  }
}

fn init_tracing(behavior: &BehaviorOptions) {
  let level = if behavior.quiet {
    LevelFilter::ERROR
  } else {
    match behavior.verbose {
      0 => LevelFilter::WARN,
      1 => LevelFilter::INFO,
      2 => LevelFilter::DEBUG,
      _ => LevelFilter::TRACE,
    }
  };

  let env_filter = EnvFilter::builder()
    .with_default_directive(level.into())
    .from_env_lossy();

  let _ = tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .try_init();
}

/// Get custom styles for clap help output
fn get_clap_styles() -> clap::builder::Styles {
  use clap::builder::styling::{AnsiColor, Effects};

  clap::builder::Styles::styled()
    .header(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
    .usage(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
    .literal(AnsiColor::BrightGreen.on_default())
    .placeholder(AnsiColor::BrightCyan.on_default())
    .error(AnsiColor::BrightRed.on_default() | Effects::BOLD)
    .valid(AnsiColor::BrightGreen.on_default())
    .invalid(AnsiColor::BrightRed.on_default())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(args: &[&str]) -> Cli {
    let mut argv = vec!["onenote-export"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
  }

  #[test]
  fn test_cli_validation_export_requires_token() {
    let mut cli = parse(&["export"]);
    cli.graph.token = None;

    let result = cli.validate();
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("--token"));
  }

  #[test]
  fn test_cli_validation_export_with_token_succeeds() {
    let cli = parse(&["--token", "abc", "export"]);
    assert!(cli.validate().is_ok());
  }

  #[test]
  fn test_cli_validation_serve_requires_client_credentials() {
    let mut cli = parse(&["serve"]);
    if let Command::Serve { oauth, .. } = &mut cli.command {
      oauth.client_id = None;
      oauth.client_secret = None;
    }

    let result = cli.validate();
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("--client-id"));
  }

  #[test]
  fn test_cli_validation_serve_with_credentials_succeeds() {
    let cli = parse(&["serve", "--client-id", "id", "--client-secret", "secret"]);
    assert!(cli.validate().is_ok());
  }

  #[test]
  fn test_cli_validation_version_needs_nothing() {
    let mut cli = parse(&["version", "--short"]);
    cli.graph.token = None;
    assert!(cli.validate().is_ok());
  }

  #[test]
  fn test_cli_validation_rejects_zero_timeout() {
    let cli = parse(&["--token", "abc", "--timeout", "0", "ls"]);
    assert!(cli.validate().unwrap_err().contains("--timeout"));
  }

  #[test]
  fn test_serve_defaults() {
    let cli = parse(&["serve", "--client-id", "id", "--client-secret", "secret"]);
    let Command::Serve { bind, oauth } = &cli.command else {
      panic!("expected serve");
    };

    assert_eq!(bind.port(), 5000);
    let config = oauth.to_config().unwrap();
    assert_eq!(config.scopes, vec!["User.Read", "Notes.Read"]);
    assert_eq!(config.redirect_uri, DEFAULT_REDIRECT_URI);
  }

  #[test]
  fn test_filter_defaults_to_archive_done() {
    let cli = parse(&["ls"]);
    let filter = cli.filter.export_filter();
    assert!(filter.notebooks.matches("Archive"));
    assert!(!filter.notebooks.matches("archive"));
    assert!(filter.sections.matches("Done"));
  }

  #[test]
  fn test_filter_ignore_case_and_custom_names() {
    let cli = parse(&["--notebook", "Work", "--section", "Notes", "--ignore-case", "ls"]);
    let filter = cli.filter.export_filter();
    assert!(filter.notebooks.matches("work"));
    assert!(filter.sections.matches("NOTES"));
    assert!(!filter.notebooks.matches("Archive"));
  }

  #[test]
  fn test_filter_all_keeps_everything() {
    let cli = parse(&["--all", "ls"]);
    let filter = cli.filter.export_filter();
    assert!(filter.notebooks.matches("Anything"));
    assert!(filter.sections.matches("Whatever"));
  }

  #[test]
  fn test_cli_definition_is_consistent() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
  }
}
