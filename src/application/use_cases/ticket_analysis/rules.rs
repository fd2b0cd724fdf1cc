//! Keyword rule table for free-text ticket heuristics.
//!
//! Each row maps a regex pattern to the signal it raises and the weight it adds.
//! Every row fires at most once per scanned text, so repeated words do not
//! inflate a score. Case sensitivity is part of the pattern (`(?i)` prefix).

use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Api,
    Security,
    Mobile,
    HighComplexity,
    LowComplexity,
    Actionable,
}

/// Minimum score for a category signal to count as present.
pub const CATEGORY_SIGNAL_THRESHOLD: u32 = 2;

const RULE_TABLE: &[(Signal, &str, &str, u32)] = &[
    // API involvement
    (Signal::Api, "api", r"(?i)\bapis?\b", 2),
    (Signal::Api, "endpoint", r"(?i)\bend-?points?\b", 2),
    (Signal::Api, "rest", r"\bREST(ful)?\b", 2),
    (Signal::Api, "graphql", r"(?i)\bgraphql\b", 2),
    (Signal::Api, "webhook", r"(?i)\bwebhooks?\b", 2),
    (Signal::Api, "http", r"(?i)\bhttps?\b", 1),
    (Signal::Api, "json", r"(?i)\bjson\b", 1),
    (Signal::Api, "status code", r"(?i)\bstatus codes?\b", 1),
    (Signal::Api, "payload", r"(?i)\b(request|response) (body|payload)\b", 1),
    // Security / authentication
    (Signal::Security, "authentication", r"(?i)\bauthenticat(e|es|ed|ing|ion)\b", 2),
    (Signal::Security, "oauth", r"(?i)\boauth\s?2?(\.0)?\b", 2),
    (Signal::Security, "security", r"(?i)\bsecur(e|ity)\b", 2),
    (Signal::Security, "credentials", r"(?i)\bcredentials?\b", 2),
    (Signal::Security, "authorization", r"(?i)\bauthori[sz]ation\b", 2),
    (Signal::Security, "sso", r"\bSSO\b", 2),
    (Signal::Security, "jwt", r"(?i)\bjwt\b", 2),
    (Signal::Security, "encryption", r"(?i)\b(en|de)crypt(ion|ed|s)?\b", 2),
    (Signal::Security, "injection", r"(?i)\b(xss|csrf|sql injection)\b", 2),
    (Signal::Security, "login", r"(?i)\b(log[- ]?in|sign[- ]?in)\b", 2),
    (Signal::Security, "password", r"(?i)\bpasswords?\b", 2),
    (Signal::Security, "token", r"(?i)\btokens?\b", 1),
    (Signal::Security, "permission", r"(?i)\bpermissions?\b", 1),
    // Mobile platforms
    (Signal::Mobile, "mobile", r"(?i)\bmobile\b", 2),
    (Signal::Mobile, "ios", r"(?i)\bios\b", 2),
    (Signal::Mobile, "android", r"(?i)\bandroid\b", 2),
    (Signal::Mobile, "tablet", r"(?i)\btablets?\b", 1),
    (Signal::Mobile, "phone", r"(?i)\b(smart)?phones?\b", 1),
    (Signal::Mobile, "responsive", r"(?i)\bresponsive\b", 1),
    (Signal::Mobile, "viewport", r"(?i)\bviewports?\b", 1),
    (Signal::Mobile, "touch", r"(?i)\btouch(screen)?\b", 1),
    // Complexity markers
    (Signal::HighComplexity, "integration", r"(?i)\bintegrat(e|es|ed|ing|ion|ions)\b", 2),
    (Signal::HighComplexity, "multiple systems", r"(?i)\bmultiple (systems|services|platforms)\b", 3),
    (Signal::HighComplexity, "workflow", r"(?i)\bworkflows?\b", 2),
    (Signal::HighComplexity, "complex", r"(?i)\bcomplex(ity)?\b", 2),
    (Signal::HighComplexity, "external dependency", r"(?i)\b(external|third[- ]party) (apis?|services?|systems?)\b", 2),
    (Signal::HighComplexity, "migration", r"(?i)\bmigrat(e|es|ed|ing|ion)\b", 2),
    (Signal::HighComplexity, "architecture", r"(?i)\barchitectur(e|al)\b", 2),
    (Signal::HighComplexity, "concurrency", r"(?i)\b(concurren(t|cy)|race conditions?)\b", 2),
    (Signal::HighComplexity, "end-to-end", r"(?i)\bend[- ]to[- ]end\b", 1),
    (Signal::LowComplexity, "typo", r"(?i)\btypos?\b", 3),
    (Signal::LowComplexity, "text fix", r"(?i)\btext (fix|change|update)\b", 3),
    (Signal::LowComplexity, "spelling", r"(?i)\b(spelling|misspell(ed|ing)?)\b", 2),
    (Signal::LowComplexity, "simple", r"(?i)\bsimple\b", 2),
    (Signal::LowComplexity, "minor", r"(?i)\bminor\b", 2),
    (Signal::LowComplexity, "cosmetic", r"(?i)\bcosmetic\b", 2),
    (Signal::LowComplexity, "wording", r"(?i)\b(wording|copy change|label change)\b", 2),
    // Actionable developer language
    (Signal::Actionable, "fix", r"(?i)\bfix(es|ed|ing)?\b", 3),
    (Signal::Actionable, "implement", r"(?i)\bimplement(s|ed|ing|ation)?\b", 3),
    (Signal::Actionable, "add", r"(?i)\badd(s|ed|ing)?\b", 2),
    (Signal::Actionable, "change", r"(?i)\bchang(e|es|ed|ing)\b", 2),
    (Signal::Actionable, "update", r"(?i)\bupdat(e|es|ed|ing)\b", 2),
    (Signal::Actionable, "resolve", r"(?i)\bresolv(e|es|ed|ing)\b", 2),
    (Signal::Actionable, "refactor", r"(?i)\brefactor(s|ed|ing)?\b", 2),
    (Signal::Actionable, "need to", r"(?i)\b(needs? to|should)\b", 1),
    (Signal::Actionable, "cause", r"(?i)\b(root cause|caused by|issue)\b", 1),
];

pub struct SignalRule {
    pub signal: Signal,
    pub label: &'static str,
    pub pattern: Regex,
    pub weight: u32,
}

pub static RULES: Lazy<Vec<SignalRule>> = Lazy::new(|| {
    RULE_TABLE
        .iter()
        .map(|(signal, label, pattern, weight)| SignalRule {
            signal: *signal,
            label: *label,
            pattern: Regex::new(pattern).unwrap(),
            weight: *weight,
        })
        .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalHit {
    pub signal: Signal,
    pub label: &'static str,
    pub weight: u32,
}

/// Matches of the rule table against one piece of text.
#[derive(Debug, Clone, Default)]
pub struct SignalScan {
    hits: Vec<SignalHit>,
}

impl SignalScan {
    pub fn score(&self, signal: Signal) -> u32 {
        self.hits
            .iter()
            .filter(|hit| hit.signal == signal)
            .map(|hit| hit.weight)
            .sum()
    }

    pub fn labels(&self, signal: Signal) -> Vec<&'static str> {
        self.hits
            .iter()
            .filter(|hit| hit.signal == signal)
            .map(|hit| hit.label)
            .collect()
    }

    pub fn is_present(&self, signal: Signal) -> bool {
        self.score(signal) >= CATEGORY_SIGNAL_THRESHOLD
    }
}

pub fn scan(text: &str) -> SignalScan {
    let hits = RULES
        .iter()
        .filter(|rule| rule.pattern.is_match(text))
        .map(|rule| SignalHit {
            signal: rule.signal,
            label: rule.label,
            weight: rule.weight,
        })
        .collect();
    SignalScan { hits }
}

/// Score of a single signal, without keeping the hit list around.
pub fn score(text: &str, signal: Signal) -> u32 {
    RULES
        .iter()
        .filter(|rule| rule.signal == signal && rule.pattern.is_match(text))
        .map(|rule| rule.weight)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_pattern_compiles() {
        assert_eq!(RULES.len(), RULE_TABLE.len());
    }

    #[test]
    fn test_api_signal() {
        let result = scan("Expose a REST API endpoint for invoices");
        assert_eq!(result.score(Signal::Api), 6);
        assert_eq!(result.labels(Signal::Api), vec!["api", "endpoint", "rest"]);
        assert!(result.is_present(Signal::Api));
    }

    #[test]
    fn test_rest_is_case_sensitive() {
        assert_eq!(score("Hide the rest of the form", Signal::Api), 0);
    }

    #[test]
    fn test_weak_terms_alone_stay_below_threshold() {
        let result = scan("Refresh the cached token");
        assert_eq!(result.score(Signal::Security), 1);
        assert!(!result.is_present(Signal::Security));
    }

    #[test]
    fn test_login_alone_is_a_security_signal() {
        assert!(scan("Fix login page redirect").is_present(Signal::Security));
        assert!(scan("Users cannot log in after the update").is_present(Signal::Security));
        assert!(scan("Reset password email is blank").is_present(Signal::Security));
    }

    #[test]
    fn test_oauth2_matches() {
        assert!(scan("Implement OAuth2 authentication").is_present(Signal::Security));
    }

    #[test]
    fn test_rule_fires_once_per_text() {
        assert_eq!(score("typo typo typo", Signal::LowComplexity), 3);
    }
}
