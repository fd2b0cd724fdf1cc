use sha2::{Digest, Sha256};

use super::PROMPT_VERSION;
use crate::domain::qa_profile::QaProfile;
use crate::domain::ticket::Ticket;

/// Stable digest of one generation input, for correlating log lines across retries.
pub(crate) fn hash_input(ticket: &Ticket, profile: &QaProfile) -> String {
    let ticket_json = serde_json::to_string(ticket).unwrap_or_default();
    let profile_json = serde_json::to_string(profile).unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(PROMPT_VERSION.as_bytes());
    hasher.update(b"::");
    hasher.update(profile_json.as_bytes());
    hasher.update(b"::");
    hasher.update(ticket_json.as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::qa_profile::TestCaseFormat;
    use serde_json::json;

    fn ticket(summary: &str) -> Ticket {
        serde_json::from_value(json!({"issueKey": "QA-1", "summary": summary})).unwrap()
    }

    #[test]
    fn test_same_input_same_hash() {
        let profile = QaProfile::default();
        assert_eq!(hash_input(&ticket("a"), &profile), hash_input(&ticket("a"), &profile));
        assert_eq!(hash_input(&ticket("a"), &profile).len(), 16);
    }

    #[test]
    fn test_profile_changes_the_hash() {
        let mut other = QaProfile::default();
        other.test_case_format = TestCaseFormat::Table;
        assert_ne!(
            hash_input(&ticket("a"), &QaProfile::default()),
            hash_input(&ticket("a"), &other)
        );
    }
}
