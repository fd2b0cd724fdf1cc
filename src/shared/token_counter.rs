//! Provider-agnostic token estimation for prompt budgeting.
//!
//! Approximation: ~4 characters per token, which holds well enough for the
//! OpenAI-compatible and Gemini models this service talks to.

pub struct TokenCounter;

impl TokenCounter {
    pub fn estimate_tokens(text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        (text.chars().count() + 3) / 4
    }

    /// Trim `text` so its estimate stays within `budget` tokens.
    ///
    /// Cuts on a whitespace boundary when one exists in the kept window and marks
    /// the cut with an ellipsis.
    pub fn fit_to_budget(text: &str, budget: usize) -> String {
        if Self::estimate_tokens(text) <= budget {
            return text.to_string();
        }

        let max_chars = budget.saturating_mul(4);
        let kept: String = text.chars().take(max_chars).collect();
        let cut = match kept.rfind(char::is_whitespace) {
            Some(pos) if pos > max_chars / 2 => kept[..pos].trim_end().to_string(),
            _ => kept,
        };
        format!("{}…", cut)
    }
}
