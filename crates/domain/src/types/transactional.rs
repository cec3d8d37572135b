//! Transactional (single triggered) email

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::campaign::Sender;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Recipient {
    pub fn new(email: impl Into<String>) -> Self {
        Self { email: email.into(), name: None }
    }

    pub fn named(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self { email: email.into(), name: Some(name.into()) }
    }
}

/// Body of `POST /smtp/email`
///
/// Either inline content (`subject` + `html_content`) or a stored template
/// (`template_id` + `params`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionalEmail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<Sender>,
    pub to: Vec<Recipient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<BTreeMap<String, Value>>,
}

impl TransactionalEmail {
    pub fn html(sender: Sender, to: Recipient, subject: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            sender: Some(sender),
            to: vec![to],
            subject: Some(subject.into()),
            html_content: Some(html.into()),
            ..Self::default()
        }
    }

    pub fn templated(template_id: i64, to: Vec<Recipient>, params: BTreeMap<String, Value>) -> Self {
        Self { to, template_id: Some(template_id), params: Some(params), ..Self::default() }
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Provider acknowledgement of a send
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentMessage {
    #[serde(default)]
    pub message_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn templated_email_has_no_inline_content() {
        let mut params = BTreeMap::new();
        params.insert("FIRSTNAME".to_string(), json!("Ada"));

        let email = TransactionalEmail::templated(12, vec![Recipient::new("ada@example.com")], params);

        assert_eq!(
            serde_json::to_value(email).unwrap(),
            json!({"to": [{"email": "ada@example.com"}], "templateId": 12, "params": {"FIRSTNAME": "Ada"}})
        );
    }

    #[test]
    fn html_email_carries_tags() {
        let sender = Sender { name: "Team".into(), email: "team@example.com".into() };
        let email = TransactionalEmail::html(sender, Recipient::named("a@example.com", "A"), "Hi", "<p>Hi</p>")
            .tags(["welcome-email"]);

        let value = serde_json::to_value(email).unwrap();
        assert_eq!(value["htmlContent"], json!("<p>Hi</p>"));
        assert_eq!(value["tags"], json!(["welcome-email"]));
        assert_eq!(value["to"][0]["name"], json!("A"));
    }
}
