//! onenote-export - Export OneNote notebooks to HTML
//!
//! This is the main entry point for the CLI application.

#[tokio::main]
async fn main() {
  onenote_export::cli::run().await;
}
