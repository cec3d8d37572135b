//! Orchestration helpers over the provider port

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use verdant_domain::constants::{
    ATTR_ADDED_BY, ATTR_ADDED_DATE, ATTR_FIRSTNAME, ATTR_SIGNUP_DATE, ATTR_SOURCE,
    CAMPAIGN_ORIGIN_TAG, DEFAULT_FOLDER_NAME, DEFAULT_PLAN_TYPE, LIST_PAGE_SIZE,
    ORCHESTRATION_ADDED_BY, ORCHESTRATION_SOURCE, RECENT_CAMPAIGNS_LIMIT, UNKNOWN_PLACEHOLDER,
};
use verdant_domain::{
    iso_day, AccountOverview, Attributes, AutomationStep, CampaignCreated, CampaignPerformance,
    CampaignQuery, CampaignRecipients, CampaignStatus, Config, ConnectionStatus, Contact,
    ContactAdded, ContactList, Folder, ListCreated, ListSubscribers, ListSummary, NewAutomation,
    NewCampaign, NewContact, NewList, NewSegment, Outcome, SegmentCreated,
    SegmentCriteria, SenderConfig, SubscriberSummary, TriggerSettings, WelcomeEmail,
    WelcomeSeriesCreated, WelcomeStepSummary,
};

use super::ports::{EmailMarketingProvider, ProviderResult};
use crate::content;

/// Identity and links stamped into generated email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketingSettings {
    pub sender: SenderConfig,
    /// Environment-dependent site root for download links
    pub site_url: String,
    /// Public site root for logos and footer links
    pub brand_url: String,
}

impl Default for MarketingSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl MarketingSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            sender: config.sender.clone(),
            site_url: config.site_url().to_string(),
            brand_url: config.site.production_url.clone(),
        }
    }
}

/// Idempotent, named marketing operations
///
/// Lookup helpers (`find_or_create_*`) return provider errors to the caller.
/// The user-facing helpers return an [`Outcome`] and never fail: provider
/// errors are folded into the outcome with their original text.
#[derive(Clone)]
pub struct MarketingService {
    provider: Arc<dyn EmailMarketingProvider>,
    settings: MarketingSettings,
}

impl MarketingService {
    /// Create a new marketing service
    pub fn new(provider: Arc<dyn EmailMarketingProvider>) -> Self {
        Self { provider, settings: MarketingSettings::default() }
    }

    pub fn with_settings(mut self, settings: MarketingSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn provider(&self) -> &Arc<dyn EmailMarketingProvider> {
        &self.provider
    }

    pub fn settings(&self) -> &MarketingSettings {
        &self.settings
    }

    // ------------------------------------------------------------------
    // Find-or-create
    // ------------------------------------------------------------------

    /// Find a list by name (case-insensitive) or create it.
    ///
    /// A duplicate-name rejection means another caller created the list
    /// between our lookup and our create; it is resolved by looking the list
    /// up again.
    #[instrument(skip(self))]
    pub async fn find_or_create_list(
        &self,
        name: &str,
        folder_id: Option<i64>,
    ) -> ProviderResult<ContactList> {
        if let Some(list) = self.provider.get_list_by_name(name).await? {
            debug!(list_id = list.id, "list found");
            return Ok(list);
        }

        match self.create_list_in_folder(name, folder_id).await {
            Ok(list) => Ok(list),
            Err(err) if err.is_duplicate() => {
                warn!(error = %err, "list created concurrently, re-querying");
                self.provider.get_list_by_name(name).await?.ok_or(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Find a folder by name (case-insensitive) or create it.
    #[instrument(skip(self))]
    pub async fn find_or_create_folder(&self, name: &str) -> ProviderResult<Folder> {
        if let Some(folder) = self.find_folder(name).await? {
            return Ok(folder);
        }

        match self.provider.create_folder(name).await {
            Ok(created) => {
                info!(folder_id = created.id, "folder created");
                Ok(Folder { id: created.id, name: name.to_string(), total_subscribers: None })
            }
            Err(err) if err.is_duplicate() => {
                warn!(error = %err, "folder created concurrently, re-querying");
                self.find_folder(name).await?.ok_or(err)
            }
            Err(err) => Err(err),
        }
    }

    async fn find_folder(&self, name: &str) -> ProviderResult<Option<Folder>> {
        let wanted = name.to_lowercase();
        let page = self.provider.get_folders().await?;
        Ok(page.folders.into_iter().find(|folder| folder.name.to_lowercase() == wanted))
    }

    /// Create a list, placing it in `folder_id` or, when absent, in the first
    /// existing folder (creating a default folder if the account has none).
    /// If no folder can be resolved the list is created without one.
    pub async fn create_list_in_folder(
        &self,
        name: &str,
        folder_id: Option<i64>,
    ) -> ProviderResult<ContactList> {
        let folder_id = match folder_id {
            Some(id) => Some(id),
            None => self.resolve_default_folder().await,
        };

        let created =
            self.provider.create_list(&NewList { name: name.to_string(), folder_id }).await?;
        info!(list_id = created.id, ?folder_id, name, "list created");

        Ok(ContactList { id: created.id, name: name.to_string(), folder_id, total_subscribers: Some(0) })
    }

    async fn resolve_default_folder(&self) -> Option<i64> {
        match self.provider.get_folders().await {
            Ok(page) => match page.folders.first() {
                Some(folder) => Some(folder.id),
                None => match self.find_or_create_folder(DEFAULT_FOLDER_NAME).await {
                    Ok(folder) => Some(folder.id),
                    Err(err) => {
                        warn!(error = %err, "could not create default folder, creating list without one");
                        None
                    }
                },
            },
            Err(err) => {
                warn!(error = %err, "could not list folders, creating list without one");
                None
            }
        }
    }

    // ------------------------------------------------------------------
    // Contacts and lists
    // ------------------------------------------------------------------

    /// Upsert `email` into the list named `list_name`, creating the list if
    /// needed. Caller attributes override the bookkeeping ones.
    #[instrument(skip(self, attributes))]
    pub async fn add_contact_to_list(
        &self,
        email: &str,
        list_name: &str,
        attributes: Attributes,
    ) -> Outcome<ContactAdded> {
        let result: ProviderResult<(ContactList, Option<i64>)> = async {
            let list = self.find_or_create_list(list_name, None).await?;
            let contact = NewContact::new(email)
                .attribute(ATTR_SOURCE, ORCHESTRATION_SOURCE)
                .attribute(ATTR_ADDED_BY, ORCHESTRATION_ADDED_BY)
                .attribute(ATTR_ADDED_DATE, iso_day(Utc::now()))
                .attributes(attributes)
                .in_list(list.id);

            match self.provider.create_contact(&contact).await {
                Ok(created) => Ok((list, created.id)),
                Err(err) if err.is_duplicate() => {
                    debug!("contact already exists");
                    Ok((list, None))
                }
                Err(err) => Err(err),
            }
        }
        .await;

        match result {
            Ok((list, contact_id)) => Outcome::ok(
                format!("Added {email} to \"{}\" list", list.name),
                ContactAdded { contact_id, list_id: list.id, list_name: list.name },
            ),
            Err(err) => {
                warn!(error = %err, "failed to add contact");
                Outcome::failed(format!("Failed to add {email}: {err}"), err)
            }
        }
    }

    /// Create a list in the first available folder.
    #[instrument(skip(self))]
    pub async fn create_list(&self, name: &str) -> Outcome<ListCreated> {
        match self.create_list_in_folder(name, None).await {
            Ok(list) => Outcome::ok(
                format!("Created list \"{name}\" (ID: {})", list.id),
                ListCreated { list_id: list.id, name: list.name, folder_id: list.folder_id },
            ),
            Err(err) => Outcome::failed(format!("Failed to create list \"{name}\": {err}"), err),
        }
    }

    /// Subscribers of a list, projected to email, first name, signup date
    /// and source.
    #[instrument(skip(self))]
    pub async fn get_list_subscribers(&self, list_name: &str, limit: u32) -> Outcome<ListSubscribers> {
        let result: ProviderResult<Option<ListSubscribers>> = async {
            let Some(list) = self.provider.get_list_by_name(list_name).await? else {
                return Ok(None);
            };
            let page = self.provider.get_list_contacts(list.id, limit, 0).await?;
            Ok(Some(ListSubscribers {
                list_name: list.name,
                total_subscribers: page.count,
                subscribers: page.contacts.iter().map(subscriber_summary).collect(),
            }))
        }
        .await;

        match result {
            Ok(Some(subscribers)) => Outcome::ok(
                format!(
                    "\"{list_name}\" has {} total subscribers",
                    subscribers.total_subscribers
                ),
                subscribers,
            ),
            Ok(None) => Outcome::rejected(format!("List \"{list_name}\" not found")),
            Err(err) => Outcome::failed(
                format!("Failed to get subscribers for \"{list_name}\": {err}"),
                err,
            ),
        }
    }

    /// Lists cannot change folder once created; this always reports why.
    pub fn move_list_to_folder(&self, list_name: &str, folder_name: &str) -> Outcome<()> {
        Outcome::rejected(format!(
            "Cannot move \"{list_name}\" to \"{folder_name}\": the provider fixes a list's folder \
             when the list is created. Create a new list in \"{folder_name}\" and import the \
             contacts instead."
        ))
    }

    // ------------------------------------------------------------------
    // Campaigns
    // ------------------------------------------------------------------

    /// Draft a campaign for an existing list. Unlike contact helpers this
    /// never creates the list.
    #[instrument(skip(self, content))]
    pub async fn create_campaign(
        &self,
        subject: &str,
        topic: &str,
        list_name: &str,
        content: Option<&str>,
    ) -> Outcome<CampaignCreated> {
        let list = match self.provider.get_list_by_name(list_name).await {
            Ok(Some(list)) => list,
            Ok(None) => {
                return Outcome::rejected(format!(
                    "List \"{list_name}\" not found. Create it first or use an existing list."
                ))
            }
            Err(err) => return Outcome::failed(format!("Failed to create campaign: {err}"), err),
        };

        let html_content = content.map_or_else(
            || content::campaign_placeholder(topic, subject, &self.settings.brand_url),
            str::to_string,
        );
        let name = format!("{topic} - {}", Utc::now().format("%-m/%-d/%Y"));
        let campaign = NewCampaign {
            name: name.clone(),
            subject: subject.to_string(),
            html_content,
            sender: self.settings.sender.campaign(),
            recipients: CampaignRecipients { list_ids: vec![list.id] },
            tags: vec![CAMPAIGN_ORIGIN_TAG.to_string(), content::slugify(topic)],
        };

        match self.provider.create_campaign(&campaign).await {
            Ok(created) => {
                let recipients = list
                    .total_subscribers
                    .map_or_else(|| UNKNOWN_PLACEHOLDER.to_string(), |n| n.to_string());
                info!(campaign_id = created.id, "campaign drafted");
                Outcome::ok(
                    format!(
                        "Created campaign \"{subject}\" for \"{list_name}\" ({recipients} recipients)"
                    ),
                    CampaignCreated {
                        campaign_id: created.id,
                        campaign_name: name,
                        subject: subject.to_string(),
                        list_name: list.name,
                        status: CampaignStatus::Draft,
                    },
                )
            }
            Err(err) => Outcome::failed(format!("Failed to create campaign: {err}"), err),
        }
    }

    /// Statistics of the first sent campaign whose name contains
    /// `partial_name` (case-insensitive).
    #[instrument(skip(self))]
    pub async fn get_campaign_performance(&self, partial_name: &str) -> Outcome<CampaignPerformance> {
        let needle = partial_name.to_lowercase();
        let result: ProviderResult<Option<CampaignPerformance>> = async {
            let page = self.provider.get_campaigns(&CampaignQuery::default()).await?;
            let Some(campaign) =
                page.campaigns.into_iter().find(|c| c.name.to_lowercase().contains(&needle))
            else {
                return Ok(None);
            };

            let stats = self.provider.get_campaign_stats(campaign.id).await?;
            Ok(Some(CampaignPerformance {
                campaign_name: campaign.name,
                subject: campaign.subject,
                sent: stats.delivered,
                opens: stats.unique_opens,
                clicks: stats.unique_clicks,
                unsubscribes: stats.unsubscriptions,
                bounces: stats.bounces(),
                open_rate: stats.open_rate(),
                click_rate: stats.click_rate(),
            }))
        }
        .await;

        match result {
            Ok(Some(report)) => {
                Outcome::ok(format!("\"{}\" Performance Report", report.campaign_name), report)
            }
            Ok(None) => Outcome::rejected(format!("Campaign containing \"{partial_name}\" not found")),
            Err(err) => Outcome::failed(format!("Failed to get campaign performance: {err}"), err),
        }
    }

    // ------------------------------------------------------------------
    // Segments and automations
    // ------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn create_engagement_segment(
        &self,
        name: &str,
        criteria: SegmentCriteria,
    ) -> Outcome<SegmentCreated> {
        let query_string = criteria.query_string();
        let description = criteria.describe();
        let segment = NewSegment { name: name.to_string(), query_string: query_string.clone(), category_id: None };

        match self.provider.create_segment(&segment).await {
            Ok(created) => Outcome::ok(
                format!("Created segment \"{name}\" with criteria: {description}"),
                SegmentCreated {
                    segment_id: created.id,
                    segment_name: name.to_string(),
                    criteria,
                    query_string,
                    description,
                },
            ),
            Err(err) => Outcome::failed(format!("Failed to create segment \"{name}\": {err}"), err),
        }
    }

    /// Automation sending `emails` (or the default three-step series) to
    /// every contact added to an existing list.
    #[instrument(skip(self, emails))]
    pub async fn create_welcome_series(
        &self,
        list_name: &str,
        emails: Option<Vec<WelcomeEmail>>,
    ) -> Outcome<WelcomeSeriesCreated> {
        let list = match self.provider.get_list_by_name(list_name).await {
            Ok(Some(list)) => list,
            Ok(None) => return Outcome::rejected(format!("List \"{list_name}\" not found")),
            Err(err) => return Outcome::failed(format!("Failed to create welcome series: {err}"), err),
        };

        let emails = emails.unwrap_or_else(WelcomeEmail::default_series);
        let name = format!("Welcome Series - {list_name}");
        let automation = NewAutomation {
            name: name.clone(),
            trigger_settings: TriggerSettings::list_addition(list.id),
            steps: emails.iter().map(AutomationStep::from).collect(),
        };

        match self.provider.create_automation(&automation).await {
            Ok(created) => Outcome::ok(
                format!("Created {}-part welcome series for \"{list_name}\"", emails.len()),
                WelcomeSeriesCreated {
                    automation_id: created.id,
                    automation_name: created.name.unwrap_or(name),
                    list_name: list.name,
                    email_count: emails.len(),
                    emails: emails
                        .iter()
                        .map(|email| WelcomeStepSummary {
                            subject: email.subject.clone(),
                            delay_days: email.delay_days(),
                        })
                        .collect(),
                },
            ),
            Err(err) => Outcome::failed(format!("Failed to create welcome series: {err}"), err),
        }
    }

    // ------------------------------------------------------------------
    // Account
    // ------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn account_overview(&self) -> Outcome<AccountOverview> {
        let result: ProviderResult<AccountOverview> = async {
            let account = self.provider.get_account().await?;
            let lists = self.provider.get_lists(LIST_PAGE_SIZE, 0).await?;
            let campaigns =
                self.provider.get_campaigns(&CampaignQuery::sent(RECENT_CAMPAIGNS_LIMIT)).await?;

            Ok(AccountOverview {
                plan_type: account.plan_type().unwrap_or(DEFAULT_PLAN_TYPE).to_string(),
                emails_remaining: account
                    .credits_remaining()
                    .map_or_else(|| Value::from(UNKNOWN_PLACEHOLDER), Value::from),
                total_contacts: lists.lists.iter().map(ContactList::subscribers).sum(),
                total_lists: lists.count,
                recent_campaigns: campaigns.count,
                lists: lists
                    .lists
                    .iter()
                    .map(|list| ListSummary {
                        id: list.id,
                        name: list.name.clone(),
                        subscribers: list.subscribers(),
                    })
                    .collect(),
            })
        }
        .await;

        match result {
            Ok(overview) => Outcome::ok("Brevo Account Overview", overview),
            Err(err) => Outcome::failed(format!("Failed to get account overview: {err}"), err),
        }
    }

    pub async fn test_connection(&self) -> ConnectionStatus {
        let status = self.provider.test_connection().await;
        if status.success {
            ConnectionStatus { success: true, message: "Brevo connection successful!".to_string() }
        } else {
            ConnectionStatus { success: false, message: format!("Connection failed: {}", status.message) }
        }
    }
}

fn subscriber_summary(contact: &Contact) -> SubscriberSummary {
    SubscriberSummary {
        email: contact.email.clone(),
        first_name: contact.attribute(ATTR_FIRSTNAME).unwrap_or_default(),
        added_date: contact
            .attribute(ATTR_SIGNUP_DATE)
            .unwrap_or_else(|| UNKNOWN_PLACEHOLDER.to_string()),
        source: contact.attribute(ATTR_SOURCE).unwrap_or_else(|| UNKNOWN_PLACEHOLDER.to_string()),
    }
}
