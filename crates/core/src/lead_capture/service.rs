//! Lead capture and delivery diagnostics

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, instrument, warn};
use verdant_domain::constants::{
    ATTR_FIRSTNAME, ATTR_LEAD_MAGNET, ATTR_SIGNUP_DATE, ATTR_SOURCE, DEFAULT_GREETING_NAME,
    DEFAULT_LEAD_LIST, DEFAULT_LEAD_SOURCE, LEAD_MAGNET_ID, TEST_EMAIL_TAGS, UNKNOWN_PLACEHOLDER,
    WELCOME_EMAIL_TAGS,
};
use verdant_domain::{
    iso_day, ContactList, NewContact, ProviderError, Recipient, Sender, TransactionalEmail,
};

use crate::content;
use crate::marketing::{MarketingService, ProviderResult};

/// A lead submitted through a signup form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadCaptureRequest {
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub list_name: Option<String>,
}

impl LeadCaptureRequest {
    pub fn new(email: impl Into<String>) -> Self {
        Self { email: email.into(), ..Self::default() }
    }

    fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref().map(str::trim).filter(|name| !name.is_empty())
    }

    fn source(&self) -> &str {
        self.source.as_deref().filter(|s| !s.is_empty()).unwrap_or(DEFAULT_LEAD_SOURCE)
    }

    fn list_name(&self) -> &str {
        self.list_name.as_deref().filter(|s| !s.is_empty()).unwrap_or(DEFAULT_LEAD_LIST)
    }
}

/// Result of the welcome-email step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailDelivery {
    Sent { message_id: Option<String> },
    /// The lead is kept; someone has to follow up by hand.
    Failed { error: String },
}

impl EmailDelivery {
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedLead {
    /// `None` when an existing contact was updated
    pub contact_id: Option<i64>,
    pub list: ContactList,
    pub email: EmailDelivery,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeadCaptureOutcome {
    Captured(CapturedLead),
    /// The provider reported the contact as a duplicate.
    AlreadyExists { email: String },
}

/// Metadata of a delivered test email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestEmailSent {
    pub message_id: Option<String>,
    pub sender: Sender,
    pub recipient: String,
    pub subject: String,
    pub timestamp: String,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TestEmailError {
    #[error("API connection failed: {0}")]
    ConnectionFailed(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Signup flow: list, contact, then welcome email
///
/// The first two steps are the capture; their errors are returned. The
/// welcome email is best-effort and its failure is reported in
/// [`CapturedLead::email`] without undoing the capture.
#[derive(Clone)]
pub struct LeadCaptureService {
    marketing: MarketingService,
}

impl LeadCaptureService {
    pub fn new(marketing: MarketingService) -> Self {
        Self { marketing }
    }

    pub fn marketing(&self) -> &MarketingService {
        &self.marketing
    }

    /// Capture a lead. Only non-duplicate provider errors are returned.
    #[instrument(skip(self, request), fields(list = request.list_name()))]
    pub async fn capture(&self, request: &LeadCaptureRequest) -> ProviderResult<LeadCaptureOutcome> {
        match self.capture_contact(request).await {
            Ok((contact_id, list)) => {
                let email = self.send_welcome(request).await;
                Ok(LeadCaptureOutcome::Captured(CapturedLead { contact_id, list, email }))
            }
            Err(err) if err.is_duplicate() => {
                info!("contact already exists");
                Ok(LeadCaptureOutcome::AlreadyExists { email: request.email.clone() })
            }
            Err(err) => {
                error!(error = %err, "lead capture failed");
                Err(err)
            }
        }
    }

    async fn capture_contact(&self, request: &LeadCaptureRequest) -> ProviderResult<(Option<i64>, ContactList)> {
        let list = self.marketing.find_or_create_list(request.list_name(), None).await?;
        info!(list_id = list.id, "list ready");

        let contact = NewContact::new(request.email.clone())
            .attribute(ATTR_FIRSTNAME, request.first_name().unwrap_or_default())
            .attribute(ATTR_SOURCE, request.source())
            .attribute(ATTR_SIGNUP_DATE, iso_day(Utc::now()))
            .attribute(ATTR_LEAD_MAGNET, LEAD_MAGNET_ID)
            .in_list(list.id)
            .update_enabled(true);

        let created = self.marketing.provider().create_contact(&contact).await?;
        info!(contact_id = ?created.id, "contact upserted");
        Ok((created.id, list))
    }

    async fn send_welcome(&self, request: &LeadCaptureRequest) -> EmailDelivery {
        let settings = self.marketing.settings();
        let first_name = request.first_name();
        let email = TransactionalEmail::html(
            settings.sender.transactional(),
            Recipient::named(request.email.clone(), first_name.unwrap_or(DEFAULT_GREETING_NAME)),
            content::welcome_subject(first_name),
            content::welcome_email(first_name, &settings.site_url, &settings.brand_url),
        )
        .tags(WELCOME_EMAIL_TAGS);

        match self.marketing.provider().send_transactional_email(&email).await {
            Ok(sent) => {
                info!(message_id = ?sent.message_id, "welcome email sent");
                EmailDelivery::Sent { message_id: sent.message_id }
            }
            Err(err) => {
                warn!(error = %err, "welcome email failed, lead needs manual follow-up");
                EmailDelivery::Failed { error: err.to_string() }
            }
        }
    }

    /// Check the connection, read the account, then send a fixed test email.
    #[instrument(skip(self, first_name))]
    pub async fn send_test_email(
        &self,
        recipient: &str,
        first_name: Option<&str>,
    ) -> Result<TestEmailSent, TestEmailError> {
        let provider = self.marketing.provider();

        let connection = provider.test_connection().await;
        if !connection.success {
            return Err(TestEmailError::ConnectionFailed(connection.message));
        }

        let account = provider.get_account().await?;
        info!(plan = account.plan_type().unwrap_or(UNKNOWN_PLACEHOLDER), "account reachable");

        let name = first_name.map(str::trim).filter(|n| !n.is_empty()).unwrap_or(DEFAULT_GREETING_NAME);
        let now = Utc::now();
        let timestamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        let sender = self.marketing.settings().sender.transactional();
        let subject = format!("Test Email from Brevo API - {}", now.format("%H:%M:%S"));

        let email = TransactionalEmail::html(
            sender.clone(),
            Recipient::named(recipient, name),
            subject.clone(),
            content::test_email(name, &timestamp),
        )
        .tags(TEST_EMAIL_TAGS);

        let sent = provider.send_transactional_email(&email).await?;
        info!(message_id = ?sent.message_id, "test email sent");

        Ok(TestEmailSent {
            message_id: sent.message_id,
            sender,
            recipient: recipient.to_string(),
            subject,
            timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::testing::{InMemoryProvider, Operation};

    fn service() -> (LeadCaptureService, Arc<InMemoryProvider>) {
        let provider = Arc::new(InMemoryProvider::new());
        (LeadCaptureService::new(MarketingService::new(provider.clone())), provider)
    }

    fn request(email: &str, first_name: Option<&str>) -> LeadCaptureRequest {
        LeadCaptureRequest { first_name: first_name.map(String::from), ..LeadCaptureRequest::new(email) }
    }

    #[tokio::test]
    async fn capture_creates_list_contact_and_sends_welcome() {
        let (service, provider) = service();

        let outcome = service.capture(&request("ada@example.com", Some("Ada"))).await.unwrap();

        let LeadCaptureOutcome::Captured(lead) = outcome else {
            panic!("expected a captured lead");
        };
        assert_eq!(lead.list.name, DEFAULT_LEAD_LIST);
        assert!(lead.contact_id.is_some());
        assert!(lead.email.is_sent());

        let contact = provider.contact("ada@example.com").unwrap();
        assert_eq!(contact.attributes[ATTR_FIRSTNAME], json!("Ada"));
        assert_eq!(contact.attributes[ATTR_SOURCE], json!("website"));
        assert_eq!(contact.attributes[ATTR_LEAD_MAGNET], json!(LEAD_MAGNET_ID));
        assert_eq!(contact.attributes[ATTR_SIGNUP_DATE], json!(iso_day(Utc::now())));

        let sent = provider.sent_emails();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject.as_deref(), Some("Ada, your Free Gut Health Guide is Here! 🌿"));
        assert_eq!(sent[0].to[0].name.as_deref(), Some("Ada"));
        assert_eq!(sent[0].tags, WELCOME_EMAIL_TAGS.map(String::from).to_vec());
    }

    #[tokio::test]
    async fn welcome_failure_keeps_the_lead() {
        let (service, provider) = service();
        provider.fail_on(Operation::SendTransactionalEmail, ProviderError::api(400, r#"{"message":"Sender not verified"}"#));

        let outcome = service.capture(&request("ada@example.com", None)).await.unwrap();

        let LeadCaptureOutcome::Captured(lead) = outcome else {
            panic!("expected a captured lead");
        };
        assert_eq!(
            lead.email,
            EmailDelivery::Failed { error: "Brevo API Error: 400 - Sender not verified".into() }
        );
        assert!(provider.contact("ada@example.com").is_some());
        assert_eq!(provider.lists().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_contact_is_reported_as_existing() {
        let (service, provider) = service();
        provider.fail_on(
            Operation::CreateContact,
            ProviderError::api(400, r#"{"code":"duplicate_parameter","message":"Contact already exist"}"#),
        );

        let outcome = service.capture(&request("ada@example.com", None)).await.unwrap();

        assert_eq!(outcome, LeadCaptureOutcome::AlreadyExists { email: "ada@example.com".into() });
        assert_eq!(provider.calls(Operation::SendTransactionalEmail), 0);
    }

    #[tokio::test]
    async fn other_provider_errors_propagate() {
        let (service, provider) = service();
        provider.fail_on(Operation::GetLists, ProviderError::transport("connection refused"));

        let err = service.capture(&request("ada@example.com", None)).await.unwrap_err();

        assert!(matches!(err, ProviderError::Transport { .. }));
        assert!(provider.contacts().is_empty());
    }

    #[tokio::test]
    async fn resubmitting_a_lead_updates_the_contact() {
        let (service, provider) = service();

        service.capture(&request("ada@example.com", None)).await.unwrap();
        let second = service
            .capture(&LeadCaptureRequest { source: Some("quiz".into()), ..request("ada@example.com", Some("Ada")) })
            .await
            .unwrap();

        assert!(matches!(second, LeadCaptureOutcome::Captured(CapturedLead { contact_id: None, .. })));
        assert_eq!(provider.contacts().len(), 1);
        assert_eq!(provider.contact("ada@example.com").unwrap().attributes[ATTR_SOURCE], json!("quiz"));
    }

    #[tokio::test]
    async fn test_email_reports_delivery_metadata() {
        let (service, provider) = service();

        let sent = service.send_test_email("ops@example.com", None).await.unwrap();

        assert_eq!(sent.recipient, "ops@example.com");
        assert!(sent.subject.starts_with("Test Email from Brevo API - "));
        assert!(sent.message_id.is_some());
        let email = &provider.sent_emails()[0];
        assert_eq!(email.to[0].name.as_deref(), Some(DEFAULT_GREETING_NAME));
        assert_eq!(email.tags, TEST_EMAIL_TAGS.map(String::from).to_vec());
    }

    #[tokio::test]
    async fn test_email_stops_when_connection_fails() {
        let (service, provider) = service();
        provider.fail_on(Operation::GetAccount, ProviderError::api(401, r#"{"message":"Key not found"}"#));

        let err = service.send_test_email("ops@example.com", Some("Ops")).await.unwrap_err();

        assert_eq!(err, TestEmailError::ConnectionFailed("Brevo API Error: 401 - Key not found".into()));
        assert_eq!(provider.calls(Operation::SendTransactionalEmail), 0);
    }
}
