//! Account metadata

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    #[serde(rename = "type", default)]
    pub plan_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits_remaining: Option<i64>,
}

/// `GET /account`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default)]
    pub plan: Vec<Plan>,
}

impl Account {
    /// Type of the first plan, if any.
    pub fn plan_type(&self) -> Option<&str> {
        self.plan.first().and_then(|plan| plan.plan_type.as_deref())
    }

    pub fn credits_remaining(&self) -> Option<i64> {
        self.plan.first().and_then(|plan| plan.credits_remaining)
    }
}
