use serde_json::Value;

/// First `limit` characters of `value`, with an ellipsis when cut.
pub fn preview_text(value: &str, limit: usize) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    let snippet: String = trimmed.chars().take(limit).collect();
    if trimmed.chars().count() > limit {
        format!("{}…", snippet.trim_end())
    } else {
        snippet
    }
}

/// Split prose into sentences on `.`, `!`, `?` and line breaks.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        if ch == '\n' || ch == '\r' {
            push_sentence(&mut sentences, &mut current);
            continue;
        }
        current.push(ch);
        if matches!(ch, '.' | '!' | '?') {
            push_sentence(&mut sentences, &mut current);
        }
    }
    push_sentence(&mut sentences, &mut current);

    sentences
}

fn push_sentence(sentences: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
    current.clear();
}

pub fn first_sentence(text: &str) -> Option<String> {
    split_sentences(text).into_iter().next()
}

pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Count words across every string leaf of a JSON value.
pub fn count_words_in_value(value: &Value) -> usize {
    match value {
        Value::String(text) => count_words(text),
        Value::Array(items) => items.iter().map(count_words_in_value).sum(),
        Value::Object(map) => map.values().map(count_words_in_value).sum(),
        _ => 0,
    }
}

/// `snake_case` -> `camelCase`, for reporting Rust field names as wire paths.
pub fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for ch in field.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_preview_text() {
        assert_eq!(preview_text("  ", 10), "<empty>");
        assert_eq!(preview_text("hello", 10), "hello");
        assert_eq!(preview_text("hello world", 5), "hello…");
    }

    #[test]
    fn test_split_sentences() {
        let sentences = split_sentences("This is a CSS issue. We need to fix it!\nThanks");
        assert_eq!(
            sentences,
            vec!["This is a CSS issue.", "We need to fix it!", "Thanks"]
        );
        assert!(split_sentences("   ").is_empty());
    }

    #[test]
    fn test_count_words_in_value() {
        let value = json!({"a": "two words", "b": ["three more words", 4], "c": {"d": "one"}});
        assert_eq!(count_words_in_value(&value), 6);
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("ticket_id"), "ticketId");
        assert_eq!(camel_case("issue_key"), "issueKey");
        assert_eq!(camel_case("summary"), "summary");
    }
}
