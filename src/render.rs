//! HTML rendering for the web pages and the exported document.
//!
//! Every value that comes from Graph or from the user is escaped. Page bodies
//! are complete HTML documents of their own, so each one is embedded through
//! an `<iframe srcdoc>` instead of being spliced into the export.

use std::fmt::Write as _;

use crate::graph::{ExportFilter, ExportedNotebook, ExportedPage, UserProfile, tree};

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:2rem auto;max-width:60rem;padding:0 1rem;color:#222}\
nav ul{list-style:none;padding-left:1rem}\
article{border:1px solid #ddd;border-radius:6px;margin:1rem 0;padding:0 1rem 1rem}\
iframe{border:0;width:100%;min-height:24rem;background:#fff}\
.button{display:inline-block;padding:.5rem 1rem;border-radius:4px;background:#7719aa;color:#fff;text-decoration:none}\
.muted{color:#666}";

/// Escape text for use in element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
  let mut escaped = String::with_capacity(text.len());
  for c in text.chars() {
    match c {
      '&' => escaped.push_str("&amp;"),
      '<' => escaped.push_str("&lt;"),
      '>' => escaped.push_str("&gt;"),
      '"' => escaped.push_str("&quot;"),
      '\'' => escaped.push_str("&#39;"),
      _ => escaped.push(c),
    }
  }
  escaped
}

fn layout(title: &str, body: &str) -> String {
  format!(
    "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}</body>\n</html>\n",
    escape_html(title)
  )
}

/// Landing page with the sign-in link.
pub fn homepage() -> String {
  layout(
    "OneNote export",
    "<h1>OneNote export</h1>\n\
     <p>Export your OneNote notebooks, sections and pages to a single HTML document.</p>\n\
     <p><a class=\"button\" href=\"/login\">Sign in with Microsoft</a></p>\n",
  )
}

/// Confirmation page shown after sign-in, before the export starts.
pub fn preexport(profile: &UserProfile, filter: &ExportFilter) -> String {
  let body = format!(
    "<h1>Ready to export</h1>\n\
     <p>Signed in as <strong>{}</strong> <span class=\"muted\">({})</span>.</p>\n\
     <p>Notebooks: {}<br>Sections: {}</p>\n\
     <p><a class=\"button\" href=\"/export\">Export</a></p>\n",
    escape_html(&profile.display_name),
    escape_html(profile.email()),
    escape_html(&filter.notebooks.to_string()),
    escape_html(&filter.sections.to_string()),
  );
  layout("OneNote export", &body)
}

/// The exported document: a table of contents followed by every page.
pub fn exported(notebooks: &[ExportedNotebook]) -> String {
  let mut body = String::new();
  let _ = writeln!(body, "<h1>OneNote export</h1>");
  let _ = writeln!(
    body,
    "<p class=\"muted\">{}, {}, {}</p>",
    counted(notebooks.len(), "notebook"),
    counted(tree::count_sections(notebooks), "section"),
    counted(tree::count_pages(notebooks), "page")
  );

  if notebooks.is_empty() {
    let _ = writeln!(body, "<p>No notebooks matched the export filter.</p>");
    return layout("OneNote export", &body);
  }

  body.push_str(&table_of_contents(notebooks));

  for notebook in notebooks {
    let _ = writeln!(body, "<section>\n<h2>{}</h2>", escape_html(&notebook.name));
    for section in &notebook.sections {
      let _ = writeln!(body, "<h3>{}</h3>", escape_html(&section.name));
      for page in &section.pages {
        body.push_str(&page_article(page));
      }
    }
    let _ = writeln!(body, "</section>");
  }

  layout("OneNote export", &body)
}

/// Error page for failures surfaced by the web handlers.
pub fn error_page(heading: &str, detail: &str) -> String {
  let body = format!(
    "<h1>{}</h1>\n<p>{}</p>\n<p><a href=\"/\">Back to start</a></p>\n",
    escape_html(heading),
    escape_html(detail)
  );
  layout(heading, &body)
}

fn table_of_contents(notebooks: &[ExportedNotebook]) -> String {
  let mut nav = String::from("<nav>\n<ul>\n");
  for notebook in notebooks {
    let _ = writeln!(nav, "<li>{}\n<ul>", escape_html(&notebook.name));
    for section in &notebook.sections {
      let _ = writeln!(nav, "<li>{}\n<ul>", escape_html(&section.name));
      for page in &section.pages {
        let _ = writeln!(
          nav,
          "<li><a href=\"#{}\">{}</a></li>",
          page_anchor(&page.id),
          escape_html(display_title(page))
        );
      }
      let _ = writeln!(nav, "</ul>\n</li>");
    }
    let _ = writeln!(nav, "</ul>\n</li>");
  }
  nav.push_str("</ul>\n</nav>\n");
  nav
}

fn page_article(page: &ExportedPage) -> String {
  format!(
    "<article id=\"{}\">\n<h4>{}</h4>\n<iframe sandbox srcdoc=\"{}\"></iframe>\n</article>\n",
    page_anchor(&page.id),
    escape_html(display_title(page)),
    escape_html(&page.content)
  )
}

/// Graph ids contain `!` and `-`; keep anchors to a conservative alphabet.
fn page_anchor(id: &str) -> String {
  let cleaned: String = id
    .chars()
    .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
    .collect();
  format!("page-{cleaned}")
}

/// `1 page`, `2 pages`.
pub fn counted(count: usize, noun: &str) -> String {
  if count == 1 {
    format!("{count} {noun}")
  } else {
    format!("{count} {noun}s")
  }
}

fn display_title(page: &ExportedPage) -> &str {
  if page.title.trim().is_empty() {
    "Untitled page"
  } else {
    &page.title
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::graph::ExportedSection;

  fn sample_tree() -> Vec<ExportedNotebook> {
    vec![ExportedNotebook {
      id: "1".to_string(),
      name: "Archive".to_string(),
      sections: vec![ExportedSection {
        id: "10".to_string(),
        name: "Done".to_string(),
        pages: vec![ExportedPage {
          id: "0-abc!1".to_string(),
          title: "Page <A>".to_string(),
          content: "<html><body>\"hi\" & bye</body></html>".to_string(),
        }],
      }],
    }]
  }

  #[test]
  fn escape_html_covers_special_characters() {
    insta::assert_snapshot!(escape_html(r#"<a href="x">Tom & Jerry's</a>"#), @"&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;");
  }

  #[test]
  fn exported_embeds_escaped_page_content() {
    let html = exported(&sample_tree());

    assert!(html.contains("<h2>Archive</h2>"));
    assert!(html.contains("<h3>Done</h3>"));
    assert!(html.contains("<h4>Page &lt;A&gt;</h4>"));
    assert!(html.contains("srcdoc=\"&lt;html&gt;&lt;body&gt;&quot;hi&quot; &amp; bye&lt;/body&gt;&lt;/html&gt;\""));
    assert!(html.contains("1 notebook, 1 section, 1 page"));
  }

  #[test]
  fn exported_links_table_of_contents_to_pages() {
    let html = exported(&sample_tree());
    assert!(html.contains("<a href=\"#page-0-abc-1\">Page &lt;A&gt;</a>"));
    assert!(html.contains("<article id=\"page-0-abc-1\">"));
  }

  #[test]
  fn exported_empty_tree_says_so() {
    let html = exported(&[]);
    assert!(html.contains("No notebooks matched"));
    assert!(!html.contains("<nav>"));
    assert!(html.contains("0 notebooks, 0 sections, 0 pages"));
  }

  #[test]
  fn counts_use_singular_only_for_one() {
    assert_eq!(counted(0, "page"), "0 pages");
    assert_eq!(counted(1, "page"), "1 page");
    assert_eq!(counted(2, "section"), "2 sections");

    let mut tree = sample_tree();
    let page = tree[0].sections[0].pages[0].clone();
    tree[0].sections[0].pages.push(page);
    assert!(exported(&tree).contains("1 notebook, 1 section, 2 pages"));
  }

  #[test]
  fn untitled_pages_get_a_placeholder() {
    let mut tree = sample_tree();
    tree[0].sections[0].pages[0].title = String::new();
    assert!(exported(&tree).contains("Untitled page"));
  }

  #[test]
  fn preexport_shows_profile_and_filter() {
    let profile = UserProfile {
      display_name: "Ada <Lovelace>".to_string(),
      user_principal_name: "ada@example.com".to_string(),
      mail: None,
    };
    let html = preexport(&profile, &ExportFilter::default());

    assert!(html.contains("Ada &lt;Lovelace&gt;"));
    assert!(html.contains("ada@example.com"));
    assert!(html.contains("&quot;Archive&quot;"));
    assert!(html.contains("href=\"/export\""));
  }

  #[test]
  fn homepage_links_to_login() {
    assert!(homepage().contains("href=\"/login\""));
  }

  #[test]
  fn error_page_escapes_detail() {
    let html = error_page("Sign-in failed", "<script>");
    assert!(html.contains("&lt;script&gt;"));
    assert!(!html.contains("<script>"));
  }
}
