//! Projections returned in `Outcome::data`

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::campaign::CampaignStatus;
use super::segment::SegmentCriteria;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactAdded {
    pub contact_id: Option<i64>,
    pub list_id: i64,
    pub list_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCreated {
    pub list_id: i64,
    pub name: String,
    pub folder_id: Option<i64>,
}

/// Per-subscriber projection; missing attributes become placeholders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberSummary {
    pub email: String,
    pub first_name: String,
    pub added_date: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSubscribers {
    pub list_name: String,
    pub total_subscribers: u64,
    pub subscribers: Vec<SubscriberSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignCreated {
    pub campaign_id: i64,
    pub campaign_name: String,
    pub subject: String,
    pub list_name: String,
    pub status: CampaignStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignPerformance {
    pub campaign_name: String,
    pub subject: Option<String>,
    pub sent: u64,
    pub opens: u64,
    pub clicks: u64,
    pub unsubscribes: u64,
    pub bounces: u64,
    pub open_rate: String,
    pub click_rate: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentCreated {
    pub segment_id: i64,
    pub segment_name: String,
    pub criteria: SegmentCriteria,
    pub query_string: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WelcomeStepSummary {
    pub subject: String,
    pub delay_days: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WelcomeSeriesCreated {
    pub automation_id: Option<i64>,
    pub automation_name: String,
    pub list_name: String,
    pub email_count: usize,
    pub emails: Vec<WelcomeStepSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSummary {
    pub id: i64,
    pub name: String,
    pub subscribers: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountOverview {
    pub plan_type: String,
    /// Remaining credits, or `"Unknown"`
    pub emails_remaining: Value,
    pub total_contacts: u64,
    pub total_lists: u64,
    pub recent_campaigns: u64,
    pub lists: Vec<ListSummary>,
}

/// Result of a connectivity self-test; never an error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub success: bool,
    pub message: String,
}

/// A list and the folder it lives in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPlacement {
    pub id: i64,
    pub name: String,
    /// Folder name, or `No folder assigned`
    pub folder: String,
    pub folder_id: Option<i64>,
    pub contacts: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationSummary {
    pub total_folders: usize,
    pub total_lists: usize,
    pub lists_without_folder: usize,
}

/// Current folder/list layout of the account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationReport {
    pub folders: Vec<super::list::Folder>,
    pub lists: Vec<ListPlacement>,
    /// Lists grouped by folder name
    pub organized: BTreeMap<String, Vec<ListPlacement>>,
    pub summary: OrganizationSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupListEntry {
    pub name: String,
    pub id: i64,
    pub folder: String,
}

/// Outcome of ensuring the folder/list taxonomy exists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupReport {
    pub folders_created: usize,
    pub folders_reused: usize,
    pub lists_created: usize,
    pub lists_existing: usize,
    pub lists_skipped: usize,
    /// Folder name to id, for every folder that was created or found
    pub folders: BTreeMap<String, i64>,
    /// Lists created by this run
    pub lists: Vec<SetupListEntry>,
    /// Items that failed for reasons other than already existing
    pub failures: Vec<String>,
}
