use serde::{Deserialize, Serialize};

use super::qa_profile::QaProfile;
use super::ticket::Ticket;

/// Body of an analyze-ticket call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub qa_profile: QaProfile,
    pub ticket_json: Ticket,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regeneration_reason: Option<String>,
}
