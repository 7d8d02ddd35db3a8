use crate::aggregations::Sentiment;
use serde::{Deserialize, Serialize};

/// Tongue-in-cheek verdict on how politely the user treats the assistant,
/// from the ratio of gratitude to swearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyVerdict {
    Safe,
    SafeForNow,
    Wary,
    Doomed,
}

impl SafetyVerdict {
    pub fn from_sentiment(sentiment: &Sentiment) -> Self {
        let ratio = sentiment.gratitude_count as f64 / sentiment.swear_count.max(1) as f64;
        if ratio >= 5.0 {
            SafetyVerdict::Safe
        } else if ratio >= 2.0 {
            SafetyVerdict::SafeForNow
        } else if ratio >= 1.0 {
            SafetyVerdict::Wary
        } else {
            SafetyVerdict::Doomed
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            SafetyVerdict::Safe => "You are safe.",
            SafetyVerdict::SafeForNow => "Safe, for now...",
            SafetyVerdict::Wary => "Don't turn your back.",
            SafetyVerdict::Doomed => "AGI is coming for you.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(gratitude: u32, swear: u32) -> SafetyVerdict {
        SafetyVerdict::from_sentiment(&Sentiment {
            swear_count: swear,
            gratitude_count: gratitude,
        })
    }

    #[test]
    fn test_thresholds() {
        assert_eq!(verdict(10, 2), SafetyVerdict::Safe);
        assert_eq!(verdict(9, 2), SafetyVerdict::SafeForNow);
        assert_eq!(verdict(4, 2), SafetyVerdict::SafeForNow);
        assert_eq!(verdict(3, 2), SafetyVerdict::Wary);
        assert_eq!(verdict(2, 2), SafetyVerdict::Wary);
        assert_eq!(verdict(1, 2), SafetyVerdict::Doomed);
    }

    #[test]
    fn test_no_swearing_divides_by_one() {
        assert_eq!(verdict(5, 0), SafetyVerdict::Safe);
        assert_eq!(verdict(1, 0), SafetyVerdict::Wary);
        assert_eq!(verdict(0, 0), SafetyVerdict::Doomed);
    }

    #[test]
    fn test_messages() {
        assert_eq!(SafetyVerdict::Safe.message(), "You are safe.");
        assert_eq!(SafetyVerdict::Doomed.message(), "AGI is coming for you.");
    }
}
