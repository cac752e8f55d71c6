//! `ls` subcommand for printing the notebook hierarchy.
//!
//! Walks the same filtered tree as `export` but skips page content, then
//! renders it as an ASCII tree.

use std::process;

use anyhow::Result;

use crate::cli::Cli;
use crate::color::ColorScheme;
use crate::commands::graph_client;
use crate::graph::{self, ExportedNotebook, tree};

/// Execute the `ls` subcommand.
///
/// # Arguments
/// * `cli` - Top-level CLI options for the token, filter and networking.
/// * `colors` - Shared color palette used to render terminal output.
pub(crate) async fn handle_ls_command(cli: &Cli, colors: &ColorScheme) {
  if let Err(error) = run_ls_command(cli, colors).await {
    eprintln!("{} {}", colors.error("✗"), colors.error("Failed to list notebooks"));
    eprintln!("  {}: {:#}", colors.emphasis("Error"), error);
    process::exit(1);
  }
}

async fn run_ls_command(cli: &Cli, colors: &ColorScheme) -> Result<()> {
  let filter = cli.filter.export_filter();

  println!("{} {}", colors.progress("→"), colors.info("Inspecting notebooks"));
  println!("  {}: {}", colors.emphasis("Notebooks"), filter.notebooks);
  println!("  {}: {}", colors.emphasis("Sections"), filter.sections);

  let client = graph_client(cli)?;
  let notebooks = graph::outline_notebooks(&client, &filter).await?;

  let pages = tree::count_pages(&notebooks);
  println!(
    "  {} Found {} {}",
    colors.success("✓"),
    colors.number(pages),
    if pages == 1 { "page" } else { "pages" }
  );

  if notebooks.is_empty() {
    println!("\n{}", colors.warning("No notebooks matched the filter"));
    return Ok(());
  }

  println!();
  for line in format_tree_lines(&notebooks, colors) {
    println!("  {line}");
  }

  Ok(())
}

/// Render notebooks, sections and pages with box-drawing connectors.
fn format_tree_lines(notebooks: &[ExportedNotebook], colors: &ColorScheme) -> Vec<String> {
  let mut lines = Vec::new();

  for notebook in notebooks {
    lines.push(format!(
      "{} {}",
      colors.emphasis(&notebook.name),
      colors.dimmed(format!("[notebook {}]", notebook.id))
    ));

    for (idx, section) in notebook.sections.iter().enumerate() {
      let last_section = idx + 1 == notebook.sections.len();
      let (connector, indent) = if last_section {
        ("└── ", "    ")
      } else {
        ("├── ", "│   ")
      };
      lines.push(format!(
        "{connector}{} {}",
        colors.emphasis(&section.name),
        colors.dimmed(format!("[section {}]", section.id))
      ));

      for (page_idx, page) in section.pages.iter().enumerate() {
        let page_connector = if page_idx + 1 == section.pages.len() {
          "└── "
        } else {
          "├── "
        };
        lines.push(format!(
          "{indent}{page_connector}{} {}",
          page.title,
          colors.dimmed(format!("[page {}]", page.id))
        ));
      }
    }
  }

  lines
}
