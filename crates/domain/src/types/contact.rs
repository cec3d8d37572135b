//! Contacts

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Attribute name to scalar value (`FIRSTNAME`, `SOURCE`, ...).
pub type Attributes = BTreeMap<String, Value>;

/// Calendar day of `at` as `YYYY-MM-DD`.
pub fn iso_day(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// A contact as returned by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub email: String,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub list_ids: Vec<i64>,
}

impl Contact {
    /// String value of an attribute, if present and non-empty.
    pub fn attribute(&self, name: &str) -> Option<String> {
        match self.attributes.get(name)? {
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// Body of a contact create call
///
/// With `update_enabled` an existing contact is merged (attributes and list
/// membership) instead of being rejected as a duplicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
    pub email: String,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub list_ids: Vec<i64>,
    pub update_enabled: bool,
}

impl NewContact {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            attributes: Attributes::new(),
            list_ids: Vec::new(),
            update_enabled: true,
        }
    }

    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Merge `attributes` over the ones already set.
    pub fn attributes(mut self, attributes: Attributes) -> Self {
        self.attributes.extend(attributes);
        self
    }

    pub fn in_list(mut self, list_id: i64) -> Self {
        self.list_ids.push(list_id);
        self
    }

    pub fn update_enabled(mut self, enabled: bool) -> Self {
        self.update_enabled = enabled;
        self
    }
}

/// Body of a contact update call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactUpdate {
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub list_ids: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unlink_list_ids: Vec<i64>,
}

/// Id returned by create calls
///
/// Updates of an existing contact answer `204 No Content`, so the id is
/// optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedId {
    #[serde(default)]
    pub id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    #[test]
    fn new_contact_serializes_camel_case() {
        let contact = NewContact::new("a@example.com").attribute("FIRSTNAME", "A").in_list(7);

        assert_eq!(
            serde_json::to_value(&contact).unwrap(),
            json!({
                "email": "a@example.com",
                "attributes": {"FIRSTNAME": "A"},
                "listIds": [7],
                "updateEnabled": true
            })
        );
    }

    #[test]
    fn caller_attributes_override_earlier_ones() {
        let mut extra = Attributes::new();
        extra.insert("SOURCE".into(), json!("quiz"));

        let contact = NewContact::new("a@example.com").attribute("SOURCE", "default").attributes(extra);
        assert_eq!(contact.attributes["SOURCE"], json!("quiz"));
    }

    #[test]
    fn attribute_lookup_skips_empty_values() {
        let contact: Contact = serde_json::from_value(json!({
            "email": "a@example.com",
            "attributes": {"FIRSTNAME": "", "SOURCE": "website", "AGE": 41}
        }))
        .unwrap();

        assert_eq!(contact.attribute("FIRSTNAME"), None);
        assert_eq!(contact.attribute("SOURCE").as_deref(), Some("website"));
        assert_eq!(contact.attribute("AGE").as_deref(), Some("41"));
        assert_eq!(contact.attribute("MISSING"), None);
    }

    #[test]
    fn iso_day_truncates_time() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 23, 59, 1).unwrap();
        assert_eq!(iso_day(at), "2024-03-09");
    }

    #[test]
    fn created_id_accepts_empty_object() {
        let created: CreatedId = serde_json::from_value(json!({})).unwrap();
        assert_eq!(created.id, None);
    }
}
