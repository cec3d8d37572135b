//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Provider
pub const DEFAULT_PROVIDER_BASE_URL: &str = "https://api.brevo.com/v3";
pub const API_KEY_HEADER: &str = "api-key";
pub const DUPLICATE_PARAMETER_CODE: &str = "duplicate_parameter";
pub const DOCUMENT_NOT_FOUND_CODE: &str = "document_not_found";
pub const LIST_PAGE_SIZE: u32 = 50;
pub const RECENT_CAMPAIGNS_LIMIT: u32 = 10;

// Rate limit quotas (tokens per hour)
pub const RATE_LIMIT_INTERVAL_MS: u64 = 3_600_000;
pub const GENERAL_TOKENS_PER_INTERVAL: u64 = 100;
pub const CONTACTS_TOKENS_PER_INTERVAL: u64 = 36_000;
pub const TRANSACTIONAL_TOKENS_PER_INTERVAL: u64 = 3_600_000;

// Lists and folders
pub const DEFAULT_FOLDER_NAME: &str = "Email Lists";
pub const NO_FOLDER_LABEL: &str = "No folder assigned";
pub const UNKNOWN_PLACEHOLDER: &str = "Unknown";
pub const DEFAULT_PLAN_TYPE: &str = "Free";

// Contact attributes
pub const ATTR_FIRSTNAME: &str = "FIRSTNAME";
pub const ATTR_SOURCE: &str = "SOURCE";
pub const ATTR_SIGNUP_DATE: &str = "SIGNUP_DATE";
pub const ATTR_LEAD_MAGNET: &str = "LEAD_MAGNET";
pub const ATTR_ADDED_BY: &str = "ADDED_BY";
pub const ATTR_ADDED_DATE: &str = "ADDED_DATE";

// Bookkeeping values stamped by the orchestration helpers
pub const ORCHESTRATION_SOURCE: &str = "marketing-automation";
pub const ORCHESTRATION_ADDED_BY: &str = "verdant";
pub const CAMPAIGN_ORIGIN_TAG: &str = "verdant-created";

// Lead capture
pub const DEFAULT_LEAD_LIST: &str = "Gut Health Guide Downloads";
pub const DEFAULT_LEAD_SOURCE: &str = "website";
pub const LEAD_MAGNET_ID: &str = "gut-health-guide";
pub const DEFAULT_GREETING_NAME: &str = "Friend";
pub const WELCOME_EMAIL_TAGS: [&str; 3] = ["lead-magnet", "gut-health-guide", "welcome-email"];
pub const TEST_EMAIL_TAGS: [&str; 2] = ["test-email", "api-verification"];

// Automations
pub const SECONDS_PER_DAY: u64 = 86_400;
pub const LIST_ADDITION_TRIGGER: &str = "contact_list_addition";
pub const AUTOMATION_STEP_EMAIL: &str = "email";

// Organization set-up pacing
pub const FOLDER_PACING_MS: u64 = 500;
pub const LIST_PACING_MS: u64 = 300;

/// Folder and list taxonomy created by organization set-up.
pub const DEFAULT_TAXONOMY: &[(&str, &[&str])] = &[
    ("Lead Magnets", &["Gut Health Guide Downloads", "Quiz Completers"]),
    ("Sales Funnels", &["Product Page Visitors", "Cart Abandoners", "High-Intent Prospects"]),
    ("Customers", &["ParaCleanse Buyers", "Repeat Customers", "VIP Customers"]),
    ("Behavioral Segments", &["Highly Engaged", "At-Risk Subscribers", "Blog Power Readers"]),
    ("Blog & Content", &["Blog Subscribers", "Newsletter Subscribers"]),
];
