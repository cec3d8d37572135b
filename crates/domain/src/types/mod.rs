//! Provider data model and the normalized records returned to callers
//!
//! Field names follow the provider's camelCase JSON. Every field the provider
//! may omit is an `Option` or carries a serde default, so missing-field
//! handling is visible in the type.

pub mod account;
pub mod automation;
pub mod campaign;
pub mod contact;
pub mod list;
pub mod outcome;
pub mod reports;
pub mod segment;
pub mod transactional;

use serde::{Deserialize, Serialize};

pub use account::{Account, Plan};
pub use automation::{Automation, AutomationStep, AutomationsPage, NewAutomation, TriggerSettings, WelcomeEmail};
pub use campaign::{
    Campaign, CampaignQuery, CampaignRecipients, CampaignStats, CampaignStatus, CampaignsPage,
    NewCampaign, Sender,
};
pub use contact::{iso_day, Attributes, Contact, ContactUpdate, CreatedId, NewContact};
pub use list::{ContactList, ContactsAdded, Folder, FoldersPage, ListContactsPage, ListsPage, NewList};
pub use outcome::Outcome;
pub use reports::{
    AccountOverview, CampaignCreated, CampaignPerformance, ConnectionStatus, ContactAdded,
    ListCreated, ListPlacement, ListSubscribers, ListSummary, OrganizationReport,
    OrganizationSummary, SegmentCreated, SetupListEntry, SetupReport, SubscriberSummary,
    WelcomeSeriesCreated, WelcomeStepSummary,
};
pub use segment::{NewSegment, Segment, SegmentCriteria, SegmentsPage};
pub use transactional::{Recipient, SentMessage, TransactionalEmail};

use crate::impl_domain_status_conversions;

/// Id returned by create calls that always produce a new resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceId {
    pub id: i64,
}

/// Quota class a provider call is charged against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateLimitClass {
    /// Account, list, folder, campaign and automation calls
    General,
    /// Contact create/read/update/delete
    Contacts,
    /// Transactional email sends
    Transactional,
}

impl RateLimitClass {
    pub const ALL: [Self; 3] = [Self::General, Self::Contacts, Self::Transactional];
}

impl_domain_status_conversions!(RateLimitClass {
    General => "general",
    Contacts => "contacts",
    Transactional => "transactional",
});
