//! Engagement segments

use serde::{Deserialize, Serialize};

/// Structured segment criteria
///
/// Unset fields (and zero counts or empty paths) contribute nothing to the
/// query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_opened: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_clicked: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_visited: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_activity_days: Option<u32>,
}

impl SegmentCriteria {
    fn opened(&self) -> Option<u32> {
        self.email_opened.filter(|n| *n > 0)
    }

    fn clicked(&self) -> Option<u32> {
        self.email_clicked.filter(|n| *n > 0)
    }

    fn page(&self) -> Option<&str> {
        self.page_visited.as_deref().filter(|p| !p.is_empty())
    }

    fn inactive_days(&self) -> Option<u32> {
        self.no_activity_days.filter(|n| *n > 0)
    }

    /// Provider query string. Field order is fixed; parts are joined with
    /// ` AND `.
    pub fn query_string(&self) -> String {
        let mut parts = Vec::new();
        if let Some(n) = self.opened() {
            parts.push(format!("EMAIL_OPENED[Campaign] >= {n}"));
        }
        if let Some(n) = self.clicked() {
            parts.push(format!("EMAIL_CLICKED[Campaign] >= {n}"));
        }
        if let Some(path) = self.page() {
            parts.push(format!("PAGE_VISITED[\"{path}\"] exists"));
        }
        if let Some(days) = self.inactive_days() {
            parts.push(format!("LAST_ACTIVITY < \"{days} days ago\""));
        }
        parts.join(" AND ")
    }

    /// Human-readable summary, e.g. `opened 2+ emails, no activity in 30+ days`.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(n) = self.opened() {
            parts.push(format!("opened {n}+ emails"));
        }
        if let Some(n) = self.clicked() {
            parts.push(format!("clicked {n}+ email links"));
        }
        if let Some(path) = self.page() {
            parts.push(format!("visited {path} page"));
        }
        if let Some(days) = self.inactive_days() {
            parts.push(format!("no activity in {days}+ days"));
        }
        parts.join(", ")
    }
}

/// Body of a segment create call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSegment {
    pub name: String,
    pub query_string: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

/// `GET /contacts/segments`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentsPage {
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_for_opens_and_inactivity() {
        let criteria = SegmentCriteria { email_opened: Some(2), no_activity_days: Some(30), ..Default::default() };

        assert_eq!(criteria.query_string(), "EMAIL_OPENED[Campaign] >= 2 AND LAST_ACTIVITY < \"30 days ago\"");
    }

    #[test]
    fn query_keeps_fixed_field_order() {
        let criteria = SegmentCriteria {
            no_activity_days: Some(14),
            page_visited: Some("/products/paracleanse".into()),
            email_clicked: Some(1),
            email_opened: Some(3),
        };

        assert_eq!(
            criteria.query_string(),
            "EMAIL_OPENED[Campaign] >= 3 AND EMAIL_CLICKED[Campaign] >= 1 AND \
             PAGE_VISITED[\"/products/paracleanse\"] exists AND LAST_ACTIVITY < \"14 days ago\""
        );
    }

    #[test]
    fn absent_criteria_are_omitted() {
        assert_eq!(SegmentCriteria::default().query_string(), "");

        let criteria = SegmentCriteria { email_opened: Some(0), page_visited: Some(String::new()), email_clicked: Some(4), ..Default::default() };
        assert_eq!(criteria.query_string(), "EMAIL_CLICKED[Campaign] >= 4");
    }

    #[test]
    fn description_reads_naturally() {
        let criteria = SegmentCriteria {
            email_opened: Some(2),
            page_visited: Some("/quiz".into()),
            no_activity_days: Some(30),
            ..Default::default()
        };

        assert_eq!(criteria.describe(), "opened 2+ emails, visited /quiz page, no activity in 30+ days");
    }

    #[test]
    fn criteria_deserialize_from_camel_case() {
        let criteria: SegmentCriteria = serde_json::from_str(r#"{"emailOpened":2,"noActivityDays":30}"#).unwrap();
        assert_eq!(criteria.email_opened, Some(2));
        assert_eq!(criteria.no_activity_days, Some(30));
    }
}
