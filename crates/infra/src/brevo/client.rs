//! Brevo v3 REST client
//!
//! Implements [`EmailMarketingProvider`] over [`HttpClient`]. Every attempt
//! of a call, retries included, takes one token from the bucket of its class
//! (contacts, transactional email, everything else) before going out. Non-2xx responses become
//! [`ProviderError::Api`] with the parsed error body; an empty 2xx body is
//! read as `{}`.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};
use url::Url;
use verdant_core::marketing::{EmailMarketingProvider, ProviderResult};
use verdant_domain::constants::API_KEY_HEADER;
use verdant_domain::{
    Account, Automation, AutomationsPage, CampaignQuery, CampaignStats, CampaignsPage, Config,
    Contact, ContactUpdate, ContactsAdded, CreatedId, FoldersPage, ListContactsPage, ListsPage,
    NewAutomation, NewCampaign, NewContact, NewList, NewSegment, ProviderConfig, ProviderError,
    RateLimitClass, RateLimitsConfig, ResourceId, SegmentsPage, SentMessage, TransactionalEmail,
};

use super::rate_limits::RateLimiters;
use crate::errors::InfraError;
use crate::http::HttpClient;

#[derive(Deserialize)]
struct AddContactsResponse {
    #[serde(default)]
    contacts: ContactsAdded,
}

/// Brevo provider over HTTP, paced by per-class token buckets.
pub struct BrevoClient {
    http: HttpClient,
    base_url: String,
    api_key: String,
    limiters: RateLimiters,
}

impl BrevoClient {
    /// Client for `provider.base_url`, authenticated with `provider.api_key`.
    ///
    /// # Errors
    /// `ProviderError::Config` for an empty API key, an invalid base URL or
    /// an invalid rate-limit quota.
    pub fn new(provider: &ProviderConfig, limits: &RateLimitsConfig) -> Result<Self, ProviderError> {
        if provider.api_key.trim().is_empty() {
            return Err(ProviderError::Config("Brevo API key is not configured".into()));
        }
        Url::parse(&provider.base_url)
            .map_err(|e| ProviderError::Config(format!("invalid provider base URL: {e}")))?;

        Ok(Self {
            http: HttpClient::from_config(provider)?,
            base_url: provider.base_url.trim_end_matches('/').to_string(),
            api_key: provider.api_key.clone(),
            limiters: RateLimiters::from_config(limits)?,
        })
    }

    /// Client built from the `provider` and `rate_limits` sections.
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        Self::new(&config.provider, &config.rate_limits)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send one request and return the body of a 2xx response.
    #[instrument(skip_all, fields(class = %class, method = %method, path = %path))]
    async fn execute(
        &self,
        class: RateLimitClass,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ProviderResult<String> {
        let mut request = self
            .http
            .request(method, self.url(path))
            .header(API_KEY_HEADER, &self.api_key)
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").json(&body);
        }

        let response = self
            .http
            .send_paced(request, || async move {
                self.limiters.acquire(class).await;
            })
            .await?;
        let status = response.status();
        let text = response.text().await.map_err(|e| ProviderError::from(InfraError::from(e)))?;

        if !status.is_success() {
            let err = ProviderError::api(status.as_u16(), &text);
            warn!(status = status.as_u16(), code = err.code().unwrap_or_default(), "Brevo API error");
            return Err(err);
        }

        debug!(status = status.as_u16(), bytes = text.len(), "Brevo API call succeeded");
        Ok(text)
    }

    async fn call<R: DeserializeOwned>(
        &self,
        class: RateLimitClass,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ProviderResult<R> {
        let text = self.execute(class, method, path, body).await?;
        let text = if text.trim().is_empty() { "{}" } else { text.as_str() };
        serde_json::from_str(text).map_err(|e| ProviderError::Decode(format!("{path}: {e}")))
    }

    /// For calls answered with 204 No Content.
    async fn call_unit(
        &self,
        class: RateLimitClass,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ProviderResult<()> {
        self.execute(class, method, path, body).await.map(|_| ())
    }

    fn contact_path(identifier: &str) -> String {
        format!("/contacts/{}", urlencoding::encode(identifier))
    }
}

fn to_body<T: Serialize>(body: &T) -> ProviderResult<Option<Value>> {
    serde_json::to_value(body)
        .map(Some)
        .map_err(|e| ProviderError::Decode(format!("failed to serialize request body: {e}")))
}

#[async_trait]
impl EmailMarketingProvider for BrevoClient {
    async fn get_account(&self) -> ProviderResult<Account> {
        self.call(RateLimitClass::General, Method::GET, "/account", None).await
    }

    async fn create_contact(&self, contact: &NewContact) -> ProviderResult<CreatedId> {
        self.call(RateLimitClass::Contacts, Method::POST, "/contacts", to_body(contact)?).await
    }

    async fn get_contact(&self, identifier: &str) -> ProviderResult<Contact> {
        self.call(RateLimitClass::Contacts, Method::GET, &Self::contact_path(identifier), None).await
    }

    async fn update_contact(&self, identifier: &str, update: &ContactUpdate) -> ProviderResult<()> {
        self.call_unit(RateLimitClass::Contacts, Method::PUT, &Self::contact_path(identifier), to_body(update)?)
            .await
    }

    async fn delete_contact(&self, identifier: &str) -> ProviderResult<()> {
        self.call_unit(RateLimitClass::Contacts, Method::DELETE, &Self::contact_path(identifier), None).await
    }

    async fn get_folders(&self) -> ProviderResult<FoldersPage> {
        self.call(RateLimitClass::General, Method::GET, "/contacts/folders", None).await
    }

    async fn create_folder(&self, name: &str) -> ProviderResult<ResourceId> {
        self.call(RateLimitClass::General, Method::POST, "/contacts/folders", Some(json!({ "name": name })))
            .await
    }

    async fn get_lists(&self, limit: u32, offset: u32) -> ProviderResult<ListsPage> {
        let path = format!("/contacts/lists?limit={limit}&offset={offset}");
        self.call(RateLimitClass::General, Method::GET, &path, None).await
    }

    async fn create_list(&self, list: &NewList) -> ProviderResult<ResourceId> {
        self.call(RateLimitClass::General, Method::POST, "/contacts/lists", to_body(list)?).await
    }

    async fn get_list_contacts(&self, list_id: i64, limit: u32, offset: u32) -> ProviderResult<ListContactsPage> {
        let path = format!("/contacts/lists/{list_id}/contacts?limit={limit}&offset={offset}");
        self.call(RateLimitClass::General, Method::GET, &path, None).await
    }

    async fn add_contacts_to_list(&self, list_id: i64, emails: &[String]) -> ProviderResult<ContactsAdded> {
        let path = format!("/contacts/lists/{list_id}/contacts/add");
        let response: AddContactsResponse =
            self.call(RateLimitClass::General, Method::POST, &path, Some(json!({ "emails": emails }))).await?;
        Ok(response.contacts)
    }

    async fn get_segments(&self) -> ProviderResult<SegmentsPage> {
        self.call(RateLimitClass::General, Method::GET, "/contacts/segments", None).await
    }

    async fn create_segment(&self, segment: &NewSegment) -> ProviderResult<ResourceId> {
        self.call(RateLimitClass::General, Method::POST, "/contacts/segments", to_body(segment)?).await
    }

    async fn get_campaigns(&self, query: &CampaignQuery) -> ProviderResult<CampaignsPage> {
        let path = format!(
            "/emailCampaigns?type={}&status={}&limit={}&offset={}",
            urlencoding::encode(&query.campaign_type),
            urlencoding::encode(&query.status),
            query.limit,
            query.offset
        );
        self.call(RateLimitClass::General, Method::GET, &path, None).await
    }

    async fn create_campaign(&self, campaign: &NewCampaign) -> ProviderResult<ResourceId> {
        self.call(RateLimitClass::General, Method::POST, "/emailCampaigns", to_body(campaign)?).await
    }

    async fn get_campaign_stats(&self, campaign_id: i64) -> ProviderResult<CampaignStats> {
        let path = format!("/emailCampaigns/{campaign_id}/statistics");
        self.call(RateLimitClass::General, Method::GET, &path, None).await
    }

    async fn send_campaign(&self, campaign_id: i64) -> ProviderResult<()> {
        let path = format!("/emailCampaigns/{campaign_id}/sendNow");
        self.call_unit(RateLimitClass::General, Method::POST, &path, None).await
    }

    async fn create_automation(&self, automation: &NewAutomation) -> ProviderResult<Automation> {
        self.call(RateLimitClass::General, Method::POST, "/marketing/automation", to_body(automation)?).await
    }

    async fn get_automations(&self) -> ProviderResult<AutomationsPage> {
        self.call(RateLimitClass::General, Method::GET, "/marketing/automation", None).await
    }

    async fn send_transactional_email(&self, email: &TransactionalEmail) -> ProviderResult<SentMessage> {
        self.call(RateLimitClass::Transactional, Method::POST, "/smtp/email", to_body(email)?).await
    }
}
