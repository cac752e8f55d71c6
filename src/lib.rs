//! OneNote exporter library
//!
//! Signs in against the Microsoft identity platform, walks the paginated
//! Microsoft Graph OneNote API and renders the selected notebooks, sections and
//! pages as a single HTML document.

pub mod cli;
pub mod color;
pub mod commands;
pub mod graph;
pub mod oauth;
pub mod render;
pub mod web;
