//! Deterministic ticket heuristics that run before (and without) any model call.

pub mod complexity;
pub mod conflicts;
pub mod rules;
pub mod summary;

pub use complexity::{estimate_test_complexity, TestComplexity};
pub use conflicts::{detect_configuration_conflicts, ConfigurationConflict, ConflictKind};
pub use summary::analyze_ticket_content;

use serde::Serialize;

use crate::domain::qa_document::TicketSummary;
use crate::domain::qa_profile::{QaCategory, QaProfile};
use crate::domain::ticket::Ticket;

/// Everything the analyzer can say about a ticket without a model call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketInsights {
    pub ticket_summary: TicketSummary,
    pub configuration_warnings: Vec<ConfigurationConflict>,
    pub categories: Vec<QaCategory>,
    pub complexity: TestComplexity,
}

pub fn analyze(ticket: &Ticket, profile: &QaProfile) -> TicketInsights {
    TicketInsights {
        ticket_summary: analyze_ticket_content(ticket),
        configuration_warnings: detect_configuration_conflicts(ticket, profile),
        categories: generate_test_case_categories(profile),
        complexity: estimate_test_complexity(ticket),
    }
}

/// Enabled categories in canonical order.
pub fn generate_test_case_categories(profile: &QaProfile) -> Vec<QaCategory> {
    QaCategory::ALL
        .iter()
        .copied()
        .filter(|category| profile.qa_categories.is_enabled(*category))
        .collect()
}
