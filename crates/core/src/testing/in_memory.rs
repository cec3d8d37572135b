//! In-memory provider for orchestration and handler tests

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::Mutex;
use verdant_domain::constants::DUPLICATE_PARAMETER_CODE;
use verdant_domain::{
    Account, Automation, AutomationsPage, Campaign, CampaignQuery, CampaignStats, CampaignStatus,
    CampaignsPage, Contact, ContactList, ContactUpdate, ContactsAdded, CreatedId, Folder,
    FoldersPage, ListContactsPage, ListsPage, NewAutomation, NewCampaign, NewContact, NewList,
    NewSegment, Plan, ProviderError, ResourceId, Segment, SegmentsPage, SentMessage,
    TransactionalEmail,
};

use crate::marketing::{EmailMarketingProvider, ProviderResult};

/// Provider call, for counting and failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetAccount,
    CreateContact,
    GetContact,
    UpdateContact,
    DeleteContact,
    GetFolders,
    CreateFolder,
    GetLists,
    CreateList,
    GetListContacts,
    AddContactsToList,
    GetSegments,
    CreateSegment,
    GetCampaigns,
    CreateCampaign,
    GetCampaignStats,
    SendCampaign,
    CreateAutomation,
    GetAutomations,
    SendTransactionalEmail,
}

#[derive(Default)]
struct State {
    next_id: i64,
    account: Account,
    folders: Vec<Folder>,
    lists: Vec<ContactList>,
    contacts: Vec<Contact>,
    campaigns: Vec<(Campaign, CampaignStats)>,
    created_campaigns: Vec<NewCampaign>,
    segments: Vec<Segment>,
    automations: Vec<NewAutomation>,
    sent: Vec<TransactionalEmail>,
    calls: HashMap<Operation, usize>,
    failures: HashMap<Operation, ProviderError>,
    list_race: bool,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn contact_mut(&mut self, identifier: &str) -> Option<&mut Contact> {
        let wanted = identifier.to_lowercase();
        self.contacts.iter_mut().find(|c| c.email.to_lowercase() == wanted)
    }

    fn subscribers(&self, list_id: i64) -> u64 {
        self.contacts.iter().filter(|c| c.list_ids.contains(&list_id)).count() as u64
    }
}

fn duplicate(message: &str) -> ProviderError {
    ProviderError::api(
        400,
        &serde_json::json!({"code": DUPLICATE_PARAMETER_CODE, "message": message}).to_string(),
    )
}

fn not_found(message: &str) -> ProviderError {
    ProviderError::api(
        404,
        &serde_json::json!({"code": "document_not_found", "message": message}).to_string(),
    )
}

/// Provider that keeps folders, lists, contacts and campaigns in memory
///
/// Mirrors the provider's observable rules: names are unique
/// case-insensitively, contact upserts merge when `update_enabled` is set,
/// and a list's subscriber count is derived from contact membership.
pub struct InMemoryProvider {
    state: Mutex<State>,
}

impl Default for InMemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryProvider {
    pub fn new() -> Self {
        let state = State {
            account: Account {
                email: Some("owner@example.com".into()),
                plan: vec![Plan { plan_type: Some("free".into()), credits_remaining: Some(300) }],
                ..Account::default()
            },
            ..State::default()
        };
        Self { state: Mutex::new(state) }
    }

    /// Make every call of `operation` fail with `error` until cleared.
    pub fn fail_on(&self, operation: Operation, error: ProviderError) {
        self.state.lock().failures.insert(operation, error);
    }

    pub fn clear_failure(&self, operation: Operation) {
        self.state.lock().failures.remove(&operation);
    }

    /// Next list creation stores the list, then reports a duplicate, as if a
    /// concurrent caller had won the race.
    pub fn simulate_list_creation_race(&self) {
        self.state.lock().list_race = true;
    }

    pub fn calls(&self, operation: Operation) -> usize {
        self.state.lock().calls.get(&operation).copied().unwrap_or(0)
    }

    pub fn seed_folder(&self, name: &str) -> i64 {
        let mut state = self.state.lock();
        let id = state.next_id();
        state.folders.push(Folder { id, name: name.to_string(), total_subscribers: None });
        id
    }

    pub fn seed_list(&self, name: &str, folder_id: Option<i64>) -> i64 {
        let mut state = self.state.lock();
        let id = state.next_id();
        state.lists.push(ContactList { id, name: name.to_string(), folder_id, total_subscribers: None });
        id
    }

    /// Add a bare contact (no attributes) to an existing list.
    pub fn seed_contact(&self, email: &str, list_name: &str) {
        let mut state = self.state.lock();
        let list_ids = state.lists.iter().filter(|l| l.has_name(list_name)).map(|l| l.id).collect();
        let id = state.next_id();
        state.contacts.push(Contact {
            id: Some(id),
            email: email.to_string(),
            attributes: BTreeMap::new(),
            list_ids,
        });
    }

    pub fn seed_sent_campaign(&self, name: &str, subject: &str, stats: CampaignStats) -> i64 {
        let mut state = self.state.lock();
        let id = state.next_id();
        let campaign = Campaign {
            id,
            name: name.to_string(),
            subject: Some(subject.to_string()),
            status: Some(CampaignStatus::Sent),
        };
        state.campaigns.push((campaign, stats));
        id
    }

    pub fn folders(&self) -> Vec<Folder> {
        self.state.lock().folders.clone()
    }

    pub fn lists(&self) -> Vec<ContactList> {
        self.state.lock().lists.clone()
    }

    pub fn contacts(&self) -> Vec<Contact> {
        self.state.lock().contacts.clone()
    }

    pub fn contact(&self, email: &str) -> Option<Contact> {
        self.state.lock().contact_mut(email).map(|c| c.clone())
    }

    pub fn created_campaigns(&self) -> Vec<NewCampaign> {
        self.state.lock().created_campaigns.clone()
    }

    pub fn created_automations(&self) -> Vec<NewAutomation> {
        self.state.lock().automations.clone()
    }

    pub fn sent_emails(&self) -> Vec<TransactionalEmail> {
        self.state.lock().sent.clone()
    }

    /// Count the call and return the injected failure, if any.
    fn enter(&self, operation: Operation) -> ProviderResult<parking_lot::MutexGuard<'_, State>> {
        let mut state = self.state.lock();
        *state.calls.entry(operation).or_insert(0) += 1;
        if let Some(err) = state.failures.get(&operation).cloned() {
            return Err(err);
        }
        Ok(state)
    }
}

#[async_trait]
impl EmailMarketingProvider for InMemoryProvider {
    async fn get_account(&self) -> ProviderResult<Account> {
        let state = self.enter(Operation::GetAccount)?;
        Ok(state.account.clone())
    }

    async fn create_contact(&self, contact: &NewContact) -> ProviderResult<CreatedId> {
        let mut state = self.enter(Operation::CreateContact)?;

        if let Some(existing) = state.contact_mut(&contact.email) {
            if !contact.update_enabled {
                return Err(duplicate("Contact already exist"));
            }
            existing.attributes.extend(contact.attributes.clone());
            for id in &contact.list_ids {
                if !existing.list_ids.contains(id) {
                    existing.list_ids.push(*id);
                }
            }
            return Ok(CreatedId { id: None });
        }

        let id = state.next_id();
        state.contacts.push(Contact {
            id: Some(id),
            email: contact.email.clone(),
            attributes: contact.attributes.clone(),
            list_ids: contact.list_ids.clone(),
        });
        Ok(CreatedId { id: Some(id) })
    }

    async fn get_contact(&self, identifier: &str) -> ProviderResult<Contact> {
        let mut state = self.enter(Operation::GetContact)?;
        state.contact_mut(identifier).map(|c| c.clone()).ok_or_else(|| not_found("Contact does not exist"))
    }

    async fn update_contact(&self, identifier: &str, update: &ContactUpdate) -> ProviderResult<()> {
        let mut state = self.enter(Operation::UpdateContact)?;
        let contact = state.contact_mut(identifier).ok_or_else(|| not_found("Contact does not exist"))?;

        contact.attributes.extend(update.attributes.clone());
        contact.list_ids.retain(|id| !update.unlink_list_ids.contains(id));
        for id in &update.list_ids {
            if !contact.list_ids.contains(id) {
                contact.list_ids.push(*id);
            }
        }
        Ok(())
    }

    async fn delete_contact(&self, identifier: &str) -> ProviderResult<()> {
        let mut state = self.enter(Operation::DeleteContact)?;
        let wanted = identifier.to_lowercase();
        let before = state.contacts.len();
        state.contacts.retain(|c| c.email.to_lowercase() != wanted);
        if state.contacts.len() == before {
            return Err(not_found("Contact does not exist"));
        }
        Ok(())
    }

    async fn get_folders(&self) -> ProviderResult<FoldersPage> {
        let state = self.enter(Operation::GetFolders)?;
        Ok(FoldersPage { folders: state.folders.clone(), count: state.folders.len() as u64 })
    }

    async fn create_folder(&self, name: &str) -> ProviderResult<ResourceId> {
        let mut state = self.enter(Operation::CreateFolder)?;
        let wanted = name.to_lowercase();
        if state.folders.iter().any(|f| f.name.to_lowercase() == wanted) {
            return Err(duplicate("Folder name already exists"));
        }
        let id = state.next_id();
        state.folders.push(Folder { id, name: name.to_string(), total_subscribers: None });
        Ok(ResourceId { id })
    }

    async fn get_lists(&self, limit: u32, offset: u32) -> ProviderResult<ListsPage> {
        let state = self.enter(Operation::GetLists)?;
        let lists = state
            .lists
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|list| ContactList { total_subscribers: Some(state.subscribers(list.id)), ..list.clone() })
            .collect();
        Ok(ListsPage { lists, count: state.lists.len() as u64 })
    }

    async fn create_list(&self, list: &NewList) -> ProviderResult<ResourceId> {
        let mut state = self.enter(Operation::CreateList)?;
        if state.lists.iter().any(|l| l.has_name(&list.name)) {
            return Err(duplicate("List name already exists"));
        }

        let id = state.next_id();
        state.lists.push(ContactList {
            id,
            name: list.name.clone(),
            folder_id: list.folder_id,
            total_subscribers: None,
        });

        if state.list_race {
            state.list_race = false;
            return Err(duplicate("List name already exists"));
        }
        Ok(ResourceId { id })
    }

    async fn get_list_contacts(&self, list_id: i64, limit: u32, offset: u32) -> ProviderResult<ListContactsPage> {
        let state = self.enter(Operation::GetListContacts)?;
        if !state.lists.iter().any(|l| l.id == list_id) {
            return Err(not_found("List ID does not exist"));
        }
        let members: Vec<Contact> = state.contacts.iter().filter(|c| c.list_ids.contains(&list_id)).cloned().collect();
        let count = members.len() as u64;
        let contacts = members.into_iter().skip(offset as usize).take(limit as usize).collect();
        Ok(ListContactsPage { contacts, count })
    }

    async fn add_contacts_to_list(&self, list_id: i64, emails: &[String]) -> ProviderResult<ContactsAdded> {
        let mut state = self.enter(Operation::AddContactsToList)?;
        let mut result = ContactsAdded::default();
        for email in emails {
            match state.contact_mut(email) {
                Some(contact) => {
                    if !contact.list_ids.contains(&list_id) {
                        contact.list_ids.push(list_id);
                    }
                    result.success.push(email.clone());
                }
                None => result.failure.push(email.clone()),
            }
        }
        Ok(result)
    }

    async fn get_segments(&self) -> ProviderResult<SegmentsPage> {
        let state = self.enter(Operation::GetSegments)?;
        Ok(SegmentsPage { segments: state.segments.clone(), count: state.segments.len() as u64 })
    }

    async fn create_segment(&self, segment: &NewSegment) -> ProviderResult<ResourceId> {
        let mut state = self.enter(Operation::CreateSegment)?;
        let id = state.next_id();
        state.segments.push(Segment { id, name: segment.name.clone() });
        Ok(ResourceId { id })
    }

    async fn get_campaigns(&self, query: &CampaignQuery) -> ProviderResult<CampaignsPage> {
        let state = self.enter(Operation::GetCampaigns)?;
        let matching: Vec<Campaign> = state
            .campaigns
            .iter()
            .map(|(campaign, _)| campaign)
            .filter(|c| query.status != "sent" || c.status == Some(CampaignStatus::Sent))
            .cloned()
            .collect();
        let count = matching.len() as u64;
        let campaigns = matching.into_iter().skip(query.offset as usize).take(query.limit as usize).collect();
        Ok(CampaignsPage { campaigns, count })
    }

    async fn create_campaign(&self, campaign: &NewCampaign) -> ProviderResult<ResourceId> {
        let mut state = self.enter(Operation::CreateCampaign)?;
        let id = state.next_id();
        state.created_campaigns.push(campaign.clone());
        state.campaigns.push((
            Campaign {
                id,
                name: campaign.name.clone(),
                subject: Some(campaign.subject.clone()),
                status: Some(CampaignStatus::Draft),
            },
            CampaignStats::default(),
        ));
        Ok(ResourceId { id })
    }

    async fn get_campaign_stats(&self, campaign_id: i64) -> ProviderResult<CampaignStats> {
        let state = self.enter(Operation::GetCampaignStats)?;
        state
            .campaigns
            .iter()
            .find(|(c, _)| c.id == campaign_id)
            .map(|(_, stats)| *stats)
            .ok_or_else(|| not_found("Campaign ID does not exist"))
    }

    async fn send_campaign(&self, campaign_id: i64) -> ProviderResult<()> {
        let mut state = self.enter(Operation::SendCampaign)?;
        let (campaign, _) = state
            .campaigns
            .iter_mut()
            .find(|(c, _)| c.id == campaign_id)
            .ok_or_else(|| not_found("Campaign ID does not exist"))?;
        campaign.status = Some(CampaignStatus::Sent);
        Ok(())
    }

    async fn create_automation(&self, automation: &NewAutomation) -> ProviderResult<Automation> {
        let mut state = self.enter(Operation::CreateAutomation)?;
        let id = state.next_id();
        state.automations.push(automation.clone());
        Ok(Automation { id: Some(id), name: Some(automation.name.clone()) })
    }

    async fn get_automations(&self) -> ProviderResult<AutomationsPage> {
        let state = self.enter(Operation::GetAutomations)?;
        let automations: Vec<Automation> = state
            .automations
            .iter()
            .enumerate()
            .map(|(i, a)| Automation { id: i64::try_from(i + 1).ok(), name: Some(a.name.clone()) })
            .collect();
        Ok(AutomationsPage { count: automations.len() as u64, automations })
    }

    async fn send_transactional_email(&self, email: &TransactionalEmail) -> ProviderResult<SentMessage> {
        let mut state = self.enter(Operation::SendTransactionalEmail)?;
        state.sent.push(email.clone());
        let n = state.sent.len();
        Ok(SentMessage { message_id: Some(format!("<{n}@in-memory.test>")) })
    }
}
