//! Data transfer objects returned by the Microsoft Graph OneNote API.

use serde::{Deserialize, Serialize};

/// One page of a paginated Graph collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultPage<T> {
  /// Items contained in this page of the result set.
  pub value: Vec<T>,
  #[serde(rename = "@odata.nextLink", default, skip_serializing_if = "Option::is_none")]
  /// Absolute URL of the next page, absent on the last page.
  pub next_link: Option<String>,
}

/// OneNote notebook (the top-level collection).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notebook {
  /// Opaque Graph identifier.
  pub id: String,
  #[serde(rename = "displayName")]
  /// Name shown in OneNote.
  pub display_name: String,
}

/// Notebook section (the sub-collection).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
  /// Opaque Graph identifier.
  pub id: String,
  #[serde(rename = "displayName")]
  /// Name shown in OneNote.
  pub display_name: String,
}

/// Page metadata as listed under a section. Content is fetched separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSummary {
  /// Opaque Graph identifier.
  pub id: String,
  /// Page title; OneNote allows untitled pages, which come back as `null`.
  #[serde(deserialize_with = "null_as_empty")]
  pub title: String,
}

/// Signed-in user, from `GET me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
  #[serde(rename = "displayName")]
  /// Full display name.
  pub display_name: String,
  #[serde(rename = "userPrincipalName")]
  /// Sign-in name, usually an e-mail address.
  pub user_principal_name: String,
  /// Primary mailbox address, when the account has one.
  #[serde(default)]
  pub mail: Option<String>,
}

impl UserProfile {
  /// Address to show the user; prefers the mailbox over the sign-in name.
  pub fn email(&self) -> &str {
    self
      .mail
      .as_deref()
      .filter(|mail| !mail.trim().is_empty())
      .unwrap_or(&self.user_principal_name)
  }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: serde::Deserializer<'de>,
{
  Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn result_page_reads_next_link() {
    let page: ResultPage<Notebook> = serde_json::from_value(json!({
      "value": [{ "id": "1", "displayName": "Archive" }],
      "@odata.nextLink": "https://graph.microsoft.com/v1.0/me/onenote/notebooks?$skip=1"
    }))
    .unwrap();

    assert_eq!(page.value.len(), 1);
    assert_eq!(page.value[0].display_name, "Archive");
    assert!(page.next_link.unwrap().ends_with("$skip=1"));
  }

  #[test]
  fn result_page_without_value_is_rejected() {
    let result = serde_json::from_value::<ResultPage<Notebook>>(json!({ "error": "nope" }));
    assert!(result.is_err());
  }

  #[test]
  fn untitled_page_deserializes_to_empty_title() {
    let page: PageSummary = serde_json::from_value(json!({ "id": "100", "title": null })).unwrap();
    assert_eq!(page.title, "");
  }

  #[test]
  fn page_without_title_field_is_rejected() {
    let result = serde_json::from_value::<PageSummary>(json!({ "id": "100" }));
    assert!(result.is_err());
  }

  #[test]
  fn email_falls_back_to_principal_name() {
    let profile = UserProfile {
      display_name: "Ada".to_string(),
      user_principal_name: "ada@example.com".to_string(),
      mail: None,
    };
    assert_eq!(profile.email(), "ada@example.com");

    let profile = UserProfile {
      mail: Some("ada.lovelace@example.com".to_string()),
      ..profile
    };
    assert_eq!(profile.email(), "ada.lovelace@example.com");
  }
}
