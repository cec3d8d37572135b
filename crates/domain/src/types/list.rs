//! Lists and folders

use serde::{Deserialize, Serialize};

use super::contact::Contact;

/// A contact list
///
/// The folder is fixed at creation time; the provider has no call to move a
/// list to another folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactList {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_subscribers: Option<u64>,
}

impl ContactList {
    /// Case-insensitive natural-key comparison.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    pub fn subscribers(&self) -> u64 {
        self.total_subscribers.unwrap_or(0)
    }
}

/// One page of `GET /contacts/lists`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListsPage {
    #[serde(default)]
    pub lists: Vec<ContactList>,
    /// Total number of lists in the account, across pages
    #[serde(default)]
    pub count: u64,
}

/// Body of a list create call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewList {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<i64>,
}

/// A folder grouping lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_subscribers: Option<u64>,
}

/// `GET /contacts/folders`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldersPage {
    #[serde(default)]
    pub folders: Vec<Folder>,
    #[serde(default)]
    pub count: u64,
}

/// One page of `GET /contacts/lists/{id}/contacts`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListContactsPage {
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub count: u64,
}

/// Result of adding existing contacts to a list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactsAdded {
    #[serde(default)]
    pub success: Vec<String>,
    #[serde(default)]
    pub failure: Vec<String>,
}
