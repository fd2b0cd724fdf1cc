use serde::{Deserialize, Serialize};
use std::fmt;

use super::rules::{scan, Signal};
use crate::domain::ticket::Ticket;

/// Descriptions longer than this count as a high-complexity signal.
const LONG_DESCRIPTION_CHARS: usize = 1500;
/// Descriptions shorter than this (including empty ones) count as a low-complexity signal.
const SHORT_DESCRIPTION_CHARS: usize = 80;

const LONG_DESCRIPTION_WEIGHT: u32 = 3;
const SHORT_DESCRIPTION_WEIGHT: u32 = 1;

const HIGH_THRESHOLD: u32 = 2;
const LOW_THRESHOLD: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestComplexity {
    Low,
    Medium,
    High,
}

impl TestComplexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestComplexity::Low => "low",
            TestComplexity::Medium => "medium",
            TestComplexity::High => "high",
        }
    }
}

impl fmt::Display for TestComplexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bucket the testing effort of a ticket from summary and description wording.
///
/// A bucket needs its score to reach a threshold and beat the opposite score.
/// Anything undecided is `Medium`, so a bare "Update" with no description lands
/// there too: the short-description weight alone cannot reach the low threshold.
pub fn estimate_test_complexity(ticket: &Ticket) -> TestComplexity {
    let text = format!("{}\n{}", ticket.summary, ticket.description);
    let signals = scan(&text);
    let description_len = ticket.description.trim().chars().count();

    let mut high = signals.score(Signal::HighComplexity);
    if description_len > LONG_DESCRIPTION_CHARS {
        high += LONG_DESCRIPTION_WEIGHT;
    }

    let mut low = signals.score(Signal::LowComplexity);
    if description_len < SHORT_DESCRIPTION_CHARS {
        low += SHORT_DESCRIPTION_WEIGHT;
    }

    if high >= HIGH_THRESHOLD && high > low {
        TestComplexity::High
    } else if low >= LOW_THRESHOLD && low >= high {
        TestComplexity::Low
    } else {
        TestComplexity::Medium
    }
}
