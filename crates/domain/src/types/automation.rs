//! Marketing automations (welcome series)

use serde::{Deserialize, Serialize};

use crate::constants::{AUTOMATION_STEP_EMAIL, LIST_ADDITION_TRIGGER, SECONDS_PER_DAY};

/// One email of a welcome series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelcomeEmail {
    pub subject: String,
    /// Seconds after the trigger
    pub delay: u64,
    pub content: String,
}

impl WelcomeEmail {
    pub fn new(subject: impl Into<String>, delay: u64, content: impl Into<String>) -> Self {
        Self { subject: subject.into(), delay, content: content.into() }
    }

    /// Delay rounded to whole days.
    pub fn delay_days(&self) -> u64 {
        self.delay.saturating_add(SECONDS_PER_DAY / 2) / SECONDS_PER_DAY
    }

    /// Immediate, +3 days and +7 days.
    pub fn default_series() -> Vec<Self> {
        vec![
            Self::new(
                "Welcome to Your Gut Health Journey! 🌿",
                0,
                "Thank you for joining our community! Your gut health guide is attached.",
            ),
            Self::new(
                "The Hidden Signs of Parasite Infection",
                3 * SECONDS_PER_DAY,
                "Most people don't realize they have parasites. Here are the warning signs...",
            ),
            Self::new(
                "Dr. Sebi's Natural Parasite Cleanse Protocol",
                7 * SECONDS_PER_DAY,
                "Discover the natural methods that have helped thousands restore their gut health.",
            ),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerSettings {
    pub trigger_type: String,
    pub list_id: i64,
}

impl TriggerSettings {
    /// Fires when a contact is added to `list_id`.
    pub fn list_addition(list_id: i64) -> Self {
        Self { trigger_type: LIST_ADDITION_TRIGGER.to_string(), list_id }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationStep {
    #[serde(rename = "type")]
    pub step_type: String,
    pub delay: u64,
    pub subject: String,
    pub content: String,
}

impl From<&WelcomeEmail> for AutomationStep {
    fn from(email: &WelcomeEmail) -> Self {
        Self {
            step_type: AUTOMATION_STEP_EMAIL.to_string(),
            delay: email.delay,
            subject: email.subject.clone(),
            content: email.content.clone(),
        }
    }
}

/// Body of an automation create call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAutomation {
    pub name: String,
    pub trigger_settings: TriggerSettings,
    pub steps: Vec<AutomationStep>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Automation {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}

/// `GET /marketing/automation`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationsPage {
    #[serde(default)]
    pub automations: Vec<Automation>,
    #[serde(default)]
    pub count: u64,
}
