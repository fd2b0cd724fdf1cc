use super::coverage::CoverageSummary;
use crate::application::use_cases::ticket_analysis::{TestComplexity, TicketInsights};
use crate::domain::qa_profile::{QaProfile, TestCaseFormat};
use crate::domain::qa_suggestion::SuggestionRequest;
use crate::domain::ticket::Ticket;
use crate::infrastructure::config::GenerationSettings;
use crate::shared::text::preview_text;
use crate::shared::token_counter::TokenCounter;

const COMMENT_PREVIEW_CHARS: usize = 600;
const CUSTOM_FIELD_PREVIEW_CHARS: usize = 120;

pub(crate) fn build_document_system_prompt(format: TestCaseFormat) -> String {
    format!(
        "You are a senior QA engineer. Turn the issue-tracker ticket into a QA canvas document: a short problem/solution/context summary, configuration warnings, acceptance criteria and test cases. Every test case must use the `{}` format. Be concrete: name the screens, fields, endpoints and values from the ticket. Never invent requirements the ticket does not support.",
        format
    )
}

pub(crate) fn build_document_user_prompt(
    ticket: &Ticket,
    profile: &QaProfile,
    insights: &TicketInsights,
    settings: &GenerationSettings,
    regeneration_reason: Option<&str>,
) -> String {
    let mut body = String::new();
    body.push_str(&format!("Ticket: {}\n", ticket.issue_key));
    body.push_str(&format!("Summary: {}\n", ticket.display_summary()));
    push_field(&mut body, "Issue type", &ticket.issue_type);
    push_field(&mut body, "Status", &ticket.status);
    push_field(&mut body, "Priority", &ticket.priority);
    push_field(&mut body, "Assignee", &ticket.assignee);
    push_field(&mut body, "Reporter", &ticket.reporter);
    if !ticket.components.is_empty() {
        body.push_str(&format!("Components: {}\n", ticket.components.join(", ")));
    }

    let description = ticket.description.trim();
    if !description.is_empty() {
        body.push_str("\nDescription:\n");
        body.push_str(&TokenCounter::fit_to_budget(
            description,
            settings.description_token_budget,
        ));
        body.push('\n');
    }

    if profile.include_comments && ticket.has_comments() {
        let comments: Vec<_> = ticket
            .comments
            .iter()
            .filter(|comment| !comment.body.trim().is_empty())
            .collect();
        let skip = comments.len().saturating_sub(settings.max_comments);
        body.push_str(&format!(
            "\nComments ({} of {}, most recent last):\n",
            comments.len() - skip,
            comments.len()
        ));
        for comment in comments.into_iter().skip(skip) {
            let author = if comment.author.trim().is_empty() {
                "unknown"
            } else {
                comment.author.trim()
            };
            body.push_str(&format!("- {}", author));
            if !comment.date.trim().is_empty() {
                body.push_str(&format!(" ({})", comment.date.trim()));
            }
            body.push_str(": ");
            body.push_str(&preview_text(&comment.body, COMMENT_PREVIEW_CHARS));
            body.push('\n');
        }
    }

    if profile.include_images && !ticket.attachments.is_empty() {
        body.push_str("\nAttachments:\n");
        for attachment in &ticket.attachments {
            body.push_str("- ");
            body.push_str(&attachment.name);
            if let Some(mime) = attachment.mime_type.as_ref() {
                body.push_str(&format!(" ({})", mime));
            }
            body.push('\n');
        }
    }

    if !ticket.custom_fields.is_empty() {
        body.push_str("\nCustom fields:\n");
        for (name, value) in &ticket.custom_fields {
            let rendered = match value.as_str() {
                Some(text) => text.to_string(),
                None => value.to_string(),
            };
            body.push_str(&format!(
                "- {}: {}\n",
                name,
                preview_text(&rendered, CUSTOM_FIELD_PREVIEW_CHARS)
            ));
        }
    }

    body.push_str("\nAnalyzer notes:\n");
    body.push_str(&format!("- Problem: {}\n", insights.ticket_summary.problem));
    body.push_str(&format!("- Solution hint: {}\n", insights.ticket_summary.solution));
    body.push_str(&format!("- Context: {}\n", insights.ticket_summary.context));
    body.push_str(&format!("- Estimated test complexity: {}\n", insights.complexity));
    if !insights.configuration_warnings.is_empty() {
        body.push_str("- Configuration warnings already raised (do not repeat them):\n");
        for conflict in &insights.configuration_warnings {
            body.push_str(&format!(
                "  - [{:?}] {}: {}\n",
                conflict.severity, conflict.title, conflict.message
            ));
        }
    }

    if let Some(reason) = regeneration_reason.map(str::trim).filter(|r| !r.is_empty()) {
        body.push_str(&format!("\nRegeneration reason: {}\n", reason));
    }

    let categories: Vec<&str> = insights.categories.iter().map(|c| c.as_str()).collect();
    body.push_str("\nRequirements:\n");
    body.push_str(&format!(
        "- Only write test cases for these categories: {}.\n",
        categories.join(", ")
    ));
    body.push_str(&format!(
        "- Every test case has \"format\": \"{}\".\n",
        profile.test_case_format
    ));
    body.push_str(&format!(
        "- Write {} test cases in total.\n",
        test_case_target(insights.complexity)
    ));
    body.push_str("- Number acceptance criteria AC-1, AC-2, ... and test cases TC-1, TC-2, ...\n");
    body.push_str("- Leave metadata as an empty object; the server fills it in.\n");

    body
}

fn push_field(body: &mut String, label: &str, value: &str) {
    let value = value.trim();
    if !value.is_empty() {
        body.push_str(&format!("{}: {}\n", label, value));
    }
}

fn test_case_target(complexity: TestComplexity) -> &'static str {
    match complexity {
        TestComplexity::Low => "2 to 3",
        TestComplexity::Medium => "4 to 6",
        TestComplexity::High => "7 to 10",
    }
}

pub(crate) fn build_suggestion_system_prompt() -> String {
    "You are a senior QA engineer reviewing an existing QA canvas document. Propose the most valuable additions: missing edge cases, negative paths, clarification questions for the product owner, or checks for categories that have no test cases yet. Do not repeat anything the document already covers.".to_string()
}

pub(crate) fn build_suggestion_user_prompt(
    request: &SuggestionRequest,
    coverage: &CoverageSummary,
) -> String {
    let document = &request.current_document;
    let mut body = String::new();
    body.push_str(&format!("Coverage: {}\n", coverage.describe()));
    body.push_str(&format!("\nProblem: {}\n", document.ticket_summary.problem));
    body.push_str(&format!("Solution: {}\n", document.ticket_summary.solution));
    body.push_str(&format!("Context: {}\n", document.ticket_summary.context));

    if let Some(ticket) = request.ticket_json.as_ref() {
        body.push_str(&format!("\nTicket {}: {}\n", ticket.issue_key, ticket.display_summary()));
        if !ticket.description.trim().is_empty() {
            body.push_str(&TokenCounter::fit_to_budget(ticket.description.trim(), 500));
            body.push('\n');
        }
    }

    if !document.acceptance_criteria.is_empty() {
        body.push_str("\nAcceptance criteria:\n");
        for criterion in &document.acceptance_criteria {
            body.push_str(&format!("- {}: {}\n", criterion.id, criterion.title));
        }
    }
    if !document.test_cases.is_empty() {
        body.push_str("\nExisting test cases:\n");
        for case in &document.test_cases {
            body.push_str(&format!("- {} [{}]: {}\n", case.id(), case.category(), case.title()));
        }
    }

    if !request.focus_areas.is_empty() {
        let focus: Vec<&str> = request.focus_areas.iter().map(|t| t.as_str()).collect();
        body.push_str(&format!("\nFocus on: {}\n", focus.join(", ")));
    }
    if !request.exclude_types.is_empty() {
        let excluded: Vec<&str> = request.exclude_types.iter().map(|t| t.as_str()).collect();
        body.push_str(&format!("Do not suggest: {}\n", excluded.join(", ")));
    }
    body.push_str(&format!(
        "\nReturn at most {} suggestions, best first.\n",
        request.max_suggestions
    ));

    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::document_schema::tests::{
        sample_document_value, sample_ticket_value,
    };
    use crate::application::use_cases::qa_canvas::coverage::summarize_coverage;
    use crate::application::use_cases::ticket_analysis::analyze;
    use crate::domain::qa_suggestion::SuggestionType;
    use serde_json::json;

    fn sample_ticket() -> Ticket {
        serde_json::from_value(sample_ticket_value()).unwrap()
    }

    fn prompt_for(profile: &QaProfile, settings: &GenerationSettings) -> String {
        let ticket = sample_ticket();
        let insights = analyze(&ticket, profile);
        build_document_user_prompt(&ticket, profile, &insights, settings, Some("new comment"))
    }

    #[test]
    fn test_document_prompt_carries_ticket_and_analysis() {
        let prompt = prompt_for(&QaProfile::default(), &GenerationSettings::default());
        assert!(prompt.contains("Ticket: MOB-42"));
        assert!(prompt.contains("Components: Frontend, Mobile"));
        assert!(prompt.contains("- Dana Developer (2024-03-02): This looks like a CSS issue."));
        assert!(prompt.contains("Mobile Testing Disabled"));
        assert!(prompt.contains("categories: functional, ux, ui, negative."));
        assert!(prompt.contains("\"format\": \"gherkin\""));
        assert!(prompt.contains("Regeneration reason: new comment"));
        assert!(prompt.contains("- sprint: 24.3"));
        assert!(!prompt.contains("screenshot.png"));
    }

    #[test]
    fn test_behaviour_flags_gate_comments_and_attachments() {
        let mut profile = QaProfile::default();
        profile.include_comments = false;
        profile.include_images = true;
        let prompt = prompt_for(&profile, &GenerationSettings::default());
        assert!(!prompt.contains("Comments ("));
        assert!(prompt.contains("- screenshot.png (image/png)"));
    }

    #[test]
    fn test_comments_are_capped_to_the_most_recent() {
        let mut ticket = sample_ticket();
        ticket.comments = (1..=4)
            .map(|n| {
                serde_json::from_value(json!({"author": format!("dev{}", n), "body": format!("note {}", n)}))
                    .unwrap()
            })
            .collect();
        let profile = QaProfile::default();
        let settings = GenerationSettings {
            max_comments: 2,
            ..GenerationSettings::default()
        };
        let insights = analyze(&ticket, &profile);
        let prompt = build_document_user_prompt(&ticket, &profile, &insights, &settings, None);

        assert!(prompt.contains("Comments (2 of 4, most recent last)"));
        assert!(!prompt.contains("note 2"));
        assert!(prompt.contains("- dev4: note 4"));
        assert!(!prompt.contains("Regeneration reason"));
    }

    #[test]
    fn test_long_description_is_trimmed_to_budget() {
        let mut ticket = sample_ticket();
        ticket.description = "word ".repeat(5000);
        let profile = QaProfile::default();
        let settings = GenerationSettings {
            description_token_budget: 50,
            ..GenerationSettings::default()
        };
        let insights = analyze(&ticket, &profile);
        let prompt = build_document_user_prompt(&ticket, &profile, &insights, &settings, None);
        assert!(prompt.len() < 5000);
        assert!(prompt.contains("…"));
    }

    #[test]
    fn test_suggestion_prompt_lists_existing_work_and_filters() {
        let request: SuggestionRequest = serde_json::from_value(json!({
            "currentDocument": sample_document_value(),
            "maxSuggestions": 5,
            "focusAreas": ["edge_case"],
            "excludeTypes": ["performance_test"]
        }))
        .unwrap();
        assert_eq!(request.focus_areas, vec![SuggestionType::EdgeCase]);

        let coverage = summarize_coverage(&request.current_document);
        let prompt = build_suggestion_user_prompt(&request, &coverage);
        assert!(prompt.contains("- AC-1: Button is tappable"));
        assert!(prompt.contains("- TC-1 [functional]: Login from iOS Safari"));
        assert!(prompt.contains("Focus on: edge_case"));
        assert!(prompt.contains("Do not suggest: performance_test"));
        assert!(prompt.contains("at most 5 suggestions"));
    }
}
