use once_cell::sync::Lazy;
use regex::Regex;

use super::rules::{score, Signal};
use crate::domain::qa_document::TicketSummary;
use crate::domain::ticket::{IssueKind, Ticket, TicketComment};
use crate::shared::text::{first_sentence, preview_text, split_sentences};

const MAX_SNIPPET_CHARS: usize = 400;
const MAX_DETAIL_CHARS: usize = 240;
const MAX_LISTED_FIELDS: usize = 5;

static FAILURE_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(not working|doesn't work|does not work|broken|fails?|failing|failed|crash(es|ing)?|errors?|unable|cannot|can't|wrong)\b",
    )
    .unwrap()
});

static LEADING_VERB: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(add|implement|create|support|introduce|enable|build|allow|provide)\s+").unwrap()
});

/// Human-readable problem / solution / context summary of a ticket.
///
/// Every field is non-empty, even for a ticket carrying only a summary.
pub fn analyze_ticket_content(ticket: &Ticket) -> TicketSummary {
    TicketSummary {
        problem: describe_problem(ticket),
        solution: describe_solution(ticket),
        context: describe_context(ticket),
    }
}

fn describe_problem(ticket: &Ticket) -> String {
    let summary = ticket.display_summary().trim_end_matches('.');

    let mut problem = match ticket.issue_kind() {
        IssueKind::Defect if FAILURE_PHRASE.is_match(summary) => {
            format!("Problem observed: {}.", summary)
        }
        IssueKind::Defect => format!("{} is not working as expected.", summary),
        IssueKind::Feature | IssueKind::Other => {
            format!("Need to implement {}.", need_subject(summary))
        }
    };

    if let Some(detail) = first_sentence(&ticket.description) {
        problem.push_str(" Reported details: ");
        problem.push_str(&preview_text(&detail, MAX_DETAIL_CHARS));
    }

    problem
}

/// Summary with a leading imperative verb removed ("Add dark mode" -> "dark mode").
fn need_subject(summary: &str) -> String {
    let stripped = LEADING_VERB.replace(summary, "");
    let stripped = stripped.trim();
    if stripped.is_empty() {
        return summary.to_string();
    }

    let mut chars = stripped.chars();
    match (chars.next(), chars.next()) {
        // Keep acronyms like "API" or "SSO" intact.
        (Some(first), Some(second)) if first.is_uppercase() && second.is_lowercase() => {
            let mut subject: String = first.to_lowercase().collect();
            subject.push_str(&stripped[first.len_utf8()..]);
            subject
        }
        _ => stripped.to_string(),
    }
}

fn describe_solution(ticket: &Ticket) -> String {
    if let Some(comment) = most_actionable_comment(&ticket.comments) {
        let body = preview_text(&comment.body, MAX_SNIPPET_CHARS);
        let author = comment.author.trim();
        return if author.is_empty() {
            format!("Developer guidance: {}", body)
        } else {
            format!("Developer guidance from {}: {}", author, body)
        };
    }

    if let Some(sentence) = most_actionable_sentence(&ticket.description) {
        return format!(
            "Proposed approach from the description: {}",
            preview_text(&sentence, MAX_SNIPPET_CHARS)
        );
    }

    let summary = ticket.display_summary().trim_end_matches('.');
    let detail = first_sentence(&ticket.description)
        .map(|sentence| format!(" ({})", preview_text(&sentence, MAX_DETAIL_CHARS)))
        .unwrap_or_default();

    match ticket.issue_kind() {
        IssueKind::Defect => format!(
            "Identify the root cause of \"{}\"{}, apply a fix and verify the behaviour in every affected environment.",
            summary, detail
        ),
        IssueKind::Feature | IssueKind::Other => format!(
            "Implement {}{} and verify it meets the expectations stated in the ticket.",
            need_subject(summary),
            detail
        ),
    }
}

/// Highest scoring comment on actionable language; earliest wins ties.
fn most_actionable_comment(comments: &[TicketComment]) -> Option<&TicketComment> {
    let mut best: Option<(&TicketComment, u32)> = None;
    for comment in comments.iter().filter(|c| !c.body.trim().is_empty()) {
        let weight = score(&comment.body, Signal::Actionable);
        if weight == 0 {
            continue;
        }
        if best.map_or(true, |(_, top)| weight > top) {
            best = Some((comment, weight));
        }
    }
    best.map(|(comment, _)| comment)
}

fn most_actionable_sentence(text: &str) -> Option<String> {
    let mut best: Option<(String, u32)> = None;
    for sentence in split_sentences(text) {
        let weight = score(&sentence, Signal::Actionable);
        if weight == 0 {
            continue;
        }
        if best.as_ref().map_or(true, |(_, top)| weight > *top) {
            best = Some((sentence, weight));
        }
    }
    best.map(|(sentence, _)| sentence)
}

fn describe_context(ticket: &Ticket) -> String {
    let mut parts: Vec<String> = Vec::new();

    let components: Vec<&str> = ticket
        .components
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect();
    if !components.is_empty() {
        let noun = if components.len() == 1 { "component" } else { "components" };
        parts.push(format!(
            "This change touches the {} {}.",
            components.join(", "),
            noun
        ));
    }

    let issue_type = ticket.issue_type.trim();
    let status = ticket.status.trim();
    match (issue_type.is_empty(), status.is_empty()) {
        (false, false) => parts.push(format!(
            "Tracked as {} {} with status {}.",
            ticket.issue_key, issue_type, status
        )),
        (false, true) => parts.push(format!("Tracked as {} {}.", ticket.issue_key, issue_type)),
        (true, false) => parts.push(format!("Ticket {} has status {}.", ticket.issue_key, status)),
        (true, true) => {}
    }

    let priority = ticket.priority.trim();
    if !priority.is_empty() {
        parts.push(format!("Priority: {}.", priority));
    }
    let assignee = ticket.assignee.trim();
    if !assignee.is_empty() {
        parts.push(format!("Assigned to {}.", assignee));
    }
    let reporter = ticket.reporter.trim();
    if !reporter.is_empty() {
        parts.push(format!("Reported by {}.", reporter));
    }

    if !ticket.custom_fields.is_empty() {
        let names: Vec<&str> = ticket
            .custom_fields
            .keys()
            .take(MAX_LISTED_FIELDS)
            .map(String::as_str)
            .collect();
        parts.push(format!("Additional fields: {}.", names.join(", ")));
    }

    if !ticket.attachments.is_empty() {
        let noun = if ticket.attachments.len() == 1 { "attachment" } else { "attachments" };
        parts.push(format!("{} {} provided.", ticket.attachments.len(), noun));
    }

    if parts.is_empty() {
        return format!(
            "Standalone change described only by its summary: \"{}\". No component, priority or ownership metadata was provided.",
            ticket.display_summary().trim_end_matches('.')
        );
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ticket(value: serde_json::Value) -> Ticket {
        serde_json::from_value(value).unwrap()
    }

    fn bug_ticket() -> Ticket {
        ticket(json!({
            "issueKey": "MOB-42",
            "summary": "Login button not working on mobile devices",
            "description": "Users cannot tap the login button on iOS Safari. Desktop is fine.",
            "status": "Open",
            "priority": "High",
            "issueType": "Bug",
            "assignee": "Dana Developer",
            "reporter": "Sam Support",
            "comments": [
                {"author": "Sam Support", "date": "2024-03-01", "body": "Seen by three customers today."},
                {"author": "Dana Developer", "date": "2024-03-02", "body": "This looks like a CSS issue. We need to fix the button styles for small viewports."}
            ],
            "components": ["Frontend", "Mobile"]
        }))
    }

    #[test]
    fn test_bug_problem_quotes_summary() {
        let summary = analyze_ticket_content(&bug_ticket());
        assert!(summary.problem.contains("Login button not working"));
        assert!(summary.problem.contains("mobile devices"));
        assert!(summary.problem.contains("Reported details: Users cannot tap"));
    }

    #[test]
    fn test_bug_solution_comes_from_developer_comment() {
        let summary = analyze_ticket_content(&bug_ticket());
        assert!(summary.solution.contains("fix"));
        assert!(summary.solution.contains("CSS issue"));
        assert!(summary.solution.contains("Dana Developer"));
    }

    #[test]
    fn test_context_lists_components_and_metadata() {
        let summary = analyze_ticket_content(&bug_ticket());
        assert!(summary.context.contains("Frontend, Mobile components"));
        assert!(summary.context.contains("Priority: High."));
        assert!(summary.context.contains("Assigned to Dana Developer."));
    }

    #[test]
    fn test_feature_problem_is_a_need_statement() {
        let summary = analyze_ticket_content(&ticket(json!({
            "issueKey": "WEB-7",
            "summary": "Add dark mode toggle to settings page",
            "description": "Users want to switch between light and dark themes.",
            "issueType": "Story"
        })));
        assert!(summary.problem.starts_with("Need to implement dark mode toggle to settings page."));
    }

    #[test]
    fn test_acronym_subject_is_not_lowercased() {
        assert_eq!(need_subject("Add API rate limiting"), "API rate limiting");
        assert_eq!(need_subject("Export to CSV"), "export to CSV");
    }

    #[test]
    fn test_description_drives_solution_without_comments() {
        let summary = analyze_ticket_content(&ticket(json!({
            "issueKey": "WEB-8",
            "summary": "Checkout total is wrong",
            "description": "Totals ignore discounts. We should update the price calculation to apply coupons first.",
            "issueType": "Bug"
        })));
        assert!(summary
            .solution
            .starts_with("Proposed approach from the description: We should update the price calculation"));
    }

    #[test]
    fn test_summary_only_ticket_is_fully_populated() {
        let minimal = ticket(json!({"issueKey": "X-1", "summary": "Update"}));
        let summary = analyze_ticket_content(&minimal);
        assert!(!summary.problem.is_empty());
        assert!(!summary.solution.is_empty());
        assert!(!summary.context.is_empty());
        assert!(summary.context.contains("\"Update\""));
    }

    #[test]
    fn test_comment_without_actionable_language_is_skipped() {
        let mut t = bug_ticket();
        t.comments = vec![TicketComment {
            author: "Sam".to_string(),
            date: String::new(),
            body: "Seen again today.".to_string(),
        }];
        t.description.clear();
        let summary = analyze_ticket_content(&t);
        assert!(summary.solution.starts_with("Identify the root cause of"));
    }
}
