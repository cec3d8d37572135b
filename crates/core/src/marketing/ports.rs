//! Port interface for the email-marketing provider
//!
//! Every call the orchestration layer makes goes through this trait. The
//! infra crate implements it over HTTP; `testing::InMemoryProvider` implements
//! it in memory.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use verdant_domain::constants::LIST_PAGE_SIZE;
use verdant_domain::{
    Account, Automation, AutomationsPage, CampaignQuery, CampaignStats, CampaignsPage,
    ConnectionStatus, Contact, ContactList, ContactUpdate, ContactsAdded, CreatedId, FoldersPage,
    ListContactsPage, ListsPage, NewAutomation, NewCampaign, NewContact, NewList, NewSegment,
    ProviderError, Recipient, ResourceId, SegmentsPage, SentMessage, TransactionalEmail,
};

/// Result of a single provider call
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Raw provider operations
///
/// Methods map one-to-one onto provider calls and do not swallow errors.
/// Idempotency (find-or-create, duplicate handling) is layered on top by
/// [`super::MarketingService`].
#[async_trait]
pub trait EmailMarketingProvider: Send + Sync {
    // Account
    async fn get_account(&self) -> ProviderResult<Account>;

    /// Fetch the account and report the result without failing.
    async fn test_connection(&self) -> ConnectionStatus {
        match self.get_account().await {
            Ok(_) => ConnectionStatus {
                success: true,
                message: "Brevo API connection successful".to_string(),
            },
            Err(err) => ConnectionStatus { success: false, message: err.to_string() },
        }
    }

    // Contacts
    async fn create_contact(&self, contact: &NewContact) -> ProviderResult<CreatedId>;
    async fn get_contact(&self, identifier: &str) -> ProviderResult<Contact>;
    async fn update_contact(&self, identifier: &str, update: &ContactUpdate) -> ProviderResult<()>;
    async fn delete_contact(&self, identifier: &str) -> ProviderResult<()>;

    // Folders and lists
    async fn get_folders(&self) -> ProviderResult<FoldersPage>;
    async fn create_folder(&self, name: &str) -> ProviderResult<ResourceId>;
    async fn get_lists(&self, limit: u32, offset: u32) -> ProviderResult<ListsPage>;

    /// Single create call. Folder resolution happens in the service layer.
    async fn create_list(&self, list: &NewList) -> ProviderResult<ResourceId>;
    async fn get_list_contacts(
        &self,
        list_id: i64,
        limit: u32,
        offset: u32,
    ) -> ProviderResult<ListContactsPage>;
    async fn add_contacts_to_list(
        &self,
        list_id: i64,
        emails: &[String],
    ) -> ProviderResult<ContactsAdded>;

    /// Case-insensitive lookup by name across every page of lists.
    async fn get_list_by_name(&self, name: &str) -> ProviderResult<Option<ContactList>> {
        let mut offset = 0;
        loop {
            let page = self.get_lists(LIST_PAGE_SIZE, offset).await?;
            if let Some(list) = page.lists.iter().find(|list| list.has_name(name)) {
                return Ok(Some(list.clone()));
            }

            let fetched = u32::try_from(page.lists.len()).unwrap_or(u32::MAX);
            offset = offset.saturating_add(fetched);
            if fetched == 0 || u64::from(offset) >= page.count {
                return Ok(None);
            }
        }
    }

    // Segments
    async fn get_segments(&self) -> ProviderResult<SegmentsPage>;
    async fn create_segment(&self, segment: &NewSegment) -> ProviderResult<ResourceId>;

    // Campaigns
    async fn get_campaigns(&self, query: &CampaignQuery) -> ProviderResult<CampaignsPage>;
    async fn create_campaign(&self, campaign: &NewCampaign) -> ProviderResult<ResourceId>;
    async fn get_campaign_stats(&self, campaign_id: i64) -> ProviderResult<CampaignStats>;
    async fn send_campaign(&self, campaign_id: i64) -> ProviderResult<()>;

    // Automations
    async fn create_automation(&self, automation: &NewAutomation) -> ProviderResult<Automation>;
    async fn get_automations(&self) -> ProviderResult<AutomationsPage>;

    // Transactional email
    async fn send_transactional_email(
        &self,
        email: &TransactionalEmail,
    ) -> ProviderResult<SentMessage>;

    /// Send a stored template to `to` with `params`.
    async fn send_templated_email(
        &self,
        template_id: i64,
        to: Vec<Recipient>,
        params: BTreeMap<String, Value>,
    ) -> ProviderResult<SentMessage> {
        self.send_transactional_email(&TransactionalEmail::templated(template_id, to, params)).await
    }
}
