//! `export` subcommand: write the rendered notebooks to an HTML file.

use std::path::Path;
use std::{fs, process};

use anyhow::{Context, Result};

use crate::cli::Cli;
use crate::color::ColorScheme;
use crate::commands::graph_client;
use crate::graph::{self, ExportFilter, GraphApi, tree};
use crate::render;

/// Handle `onenote-export export`.
pub(crate) async fn handle_export_command(output: &Path, overwrite: bool, cli: &Cli, colors: &ColorScheme) {
  let filter = cli.filter.export_filter();

  println!("{} {}", colors.progress("→"), colors.info("Exporting OneNote notebooks"));
  println!("  {}: {}", colors.emphasis("Notebooks"), filter.notebooks);
  println!("  {}: {}", colors.emphasis("Sections"), filter.sections);
  println!("  {}: {}", colors.emphasis("Output"), colors.path(output.display()));

  if cli.behavior.dry_run {
    println!(
      "\n{} {}",
      colors.warning("⚠"),
      colors.warning("DRY RUN: page content will not be downloaded and nothing is written")
    );
  }

  let result = run_export_command(output, overwrite, cli, &filter, colors).await;

  if let Err(e) = result {
    eprintln!("{} {}", colors.error("✗"), colors.error("Export failed"));
    eprintln!("  {}: {:#}", colors.emphasis("Error"), e);
    process::exit(1);
  }

  if !cli.behavior.dry_run {
    println!("\n{} {}", colors.success("✓"), colors.success("Export complete"));
  }
}

async fn run_export_command(
  output: &Path,
  overwrite: bool,
  cli: &Cli,
  filter: &ExportFilter,
  colors: &ColorScheme,
) -> Result<()> {
  let client = graph_client(cli)?;
  if cli.behavior.dry_run {
    let notebooks = graph::outline_notebooks(&client, filter).await?;
    print_summary(&notebooks, colors);
    return Ok(());
  }
  export_to_file(&client, filter, output, overwrite, colors).await
}

/// Walk the notebooks, render them and write the document to `output`.
///
/// The output file is checked before any request is made so an existing file
/// does not cost a full traversal.
pub async fn export_to_file(
  client: &dyn GraphApi,
  filter: &ExportFilter,
  output: &Path,
  overwrite: bool,
  colors: &ColorScheme,
) -> Result<()> {
  if output.exists() && !overwrite {
    anyhow::bail!("File already exists: {}. Use --overwrite to replace it.", output.display());
  }

  println!("\n{} {}", colors.info("→"), colors.info("Fetching notebooks"));
  let notebooks = graph::export_notebooks(client, filter).await?;
  print_summary(&notebooks, colors);

  let html = render::exported(&notebooks);

  if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent).with_context(|| format!("Failed to create directory {}", parent.display()))?;
  }
  fs::write(output, html).with_context(|| format!("Failed to write export to {}", output.display()))?;

  println!("  {} {}", colors.success("✓"), colors.path(output.display()));
  Ok(())
}

fn print_summary(notebooks: &[graph::ExportedNotebook], colors: &ColorScheme) {
  println!(
    "  {} Found {}, {}, {}",
    colors.success("✓"),
    colors.number(render::counted(notebooks.len(), "notebook")),
    colors.number(render::counted(tree::count_sections(notebooks), "section")),
    colors.number(render::counted(tree::count_pages(notebooks), "page"))
  );
}
