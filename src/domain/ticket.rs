use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TicketComment {
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TicketAttachment {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

/// Normalized issue-tracker record, as produced by the upstream scraper.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    #[validate(length(min = 1, message = "issue key must not be empty"))]
    pub issue_key: String,
    #[validate(length(min = 1, message = "summary must not be empty"))]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub issue_type: String,
    #[serde(default)]
    pub assignee: String,
    #[serde(default)]
    pub reporter: String,
    #[serde(default)]
    pub comments: Vec<TicketComment>,
    #[serde(default)]
    pub attachments: Vec<TicketAttachment>,
    #[serde(default)]
    pub components: Vec<String>,
    #[serde(default)]
    pub custom_fields: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub processing_time: Option<u64>,
    #[serde(default)]
    pub scraped_at: Option<String>,
}

/// Coarse classification of `issue_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    Defect,
    Feature,
    Other,
}

const DEFECT_TYPES: &[&str] = &["bug", "defect", "incident", "problem", "error", "regression"];
const FEATURE_TYPES: &[&str] = &[
    "story",
    "user story",
    "feature",
    "new feature",
    "epic",
    "improvement",
    "enhancement",
];

impl Ticket {
    pub fn issue_kind(&self) -> IssueKind {
        let issue_type = self.issue_type.trim().to_lowercase();
        if DEFECT_TYPES.iter().any(|t| issue_type.contains(t)) {
            IssueKind::Defect
        } else if FEATURE_TYPES.iter().any(|t| issue_type.contains(t)) {
            IssueKind::Feature
        } else {
            IssueKind::Other
        }
    }

    /// Summary with a non-empty fallback, for phrasing analysis output.
    pub fn display_summary(&self) -> &str {
        let summary = self.summary.trim();
        if !summary.is_empty() {
            return summary;
        }
        let key = self.issue_key.trim();
        if !key.is_empty() {
            return key;
        }
        "Untitled ticket"
    }

    pub fn has_comments(&self) -> bool {
        self.comments.iter().any(|c| !c.body.trim().is_empty())
    }
}
