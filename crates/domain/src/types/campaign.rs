//! Email campaigns and their statistics

use serde::{Deserialize, Serialize};

/// Sender identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignRecipients {
    pub list_ids: Vec<i64>,
}

/// Body of a campaign create call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCampaign {
    pub name: String,
    pub subject: String,
    pub html_content: String,
    pub sender: Sender,
    pub recipients: CampaignRecipients,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CampaignStatus {
    Draft,
    Scheduled,
    Queued,
    InProcess,
    Sent,
    Suspended,
    Archive,
    #[serde(other)]
    Unknown,
}

/// A campaign as listed by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CampaignStatus>,
}

/// One page of `GET /emailCampaigns`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignsPage {
    #[serde(default)]
    pub campaigns: Vec<Campaign>,
    #[serde(default)]
    pub count: u64,
}

/// Filter for campaign listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignQuery {
    pub campaign_type: String,
    pub status: String,
    pub limit: u32,
    pub offset: u32,
}

impl Default for CampaignQuery {
    fn default() -> Self {
        Self {
            campaign_type: "classic".to_string(),
            status: "sent".to_string(),
            limit: crate::constants::LIST_PAGE_SIZE,
            offset: 0,
        }
    }
}

impl CampaignQuery {
    /// Sent classic campaigns, most recent page only.
    pub fn sent(limit: u32) -> Self {
        Self { limit, ..Self::default() }
    }
}

/// Delivery statistics of one campaign
///
/// Rates are always relative to `delivered` (opens) or `unique_opens`
/// (clicks).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CampaignStats {
    pub delivered: u64,
    pub unique_opens: u64,
    pub unique_clicks: u64,
    pub unsubscriptions: u64,
    pub hard_bounces: u64,
    pub soft_bounces: u64,
}

impl CampaignStats {
    /// `unique_opens / delivered`, as a one-decimal percentage.
    pub fn open_rate(&self) -> String {
        format_rate(self.unique_opens, self.delivered)
    }

    /// `unique_clicks / unique_opens`, as a one-decimal percentage.
    pub fn click_rate(&self) -> String {
        format_rate(self.unique_clicks, self.unique_opens)
    }

    pub fn bounces(&self) -> u64 {
        self.hard_bounces + self.soft_bounces
    }
}

/// Percentage with one decimal. A zero denominator yields `0.0%`.
#[allow(clippy::cast_precision_loss)]
pub fn format_rate(numerator: u64, denominator: u64) -> String {
    if denominator == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", numerator as f64 / denominator as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn rates_are_relative_to_delivered_and_opens() {
        let stats = CampaignStats { delivered: 1000, unique_opens: 250, unique_clicks: 50, ..Default::default() };

        assert_eq!(stats.open_rate(), "25.0%");
        assert_eq!(stats.click_rate(), "20.0%");
    }

    #[test]
    fn zero_denominator_reports_zero_percent() {
        let stats = CampaignStats::default();

        assert_eq!(stats.open_rate(), "0.0%");
        assert_eq!(stats.click_rate(), "0.0%");
    }

    #[test]
    fn rates_round_to_one_decimal() {
        assert_eq!(format_rate(1, 3), "33.3%");
        assert_eq!(format_rate(2, 3), "66.7%");
    }

    #[test]
    fn bounces_sum_hard_and_soft() {
        let stats = CampaignStats { hard_bounces: 3, soft_bounces: 4, ..Default::default() };
        assert_eq!(stats.bounces(), 7);
    }

    #[test]
    fn unknown_status_does_not_fail_decoding() {
        let campaign: Campaign =
            serde_json::from_value(json!({"id": 9, "name": "Spring", "status": "somethingNew"})).unwrap();
        assert_eq!(campaign.status, Some(CampaignStatus::Unknown));

        let campaign: Campaign = serde_json::from_value(json!({"id": 9, "status": "inProcess"})).unwrap();
        assert_eq!(campaign.status, Some(CampaignStatus::InProcess));
    }
}
