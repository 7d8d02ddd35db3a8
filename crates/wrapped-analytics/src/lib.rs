//! Statistics, classification, and reporting for chat-wrapped.
//!
//! Turns a list of conversation records into a fixed-shape
//! [`StatisticsSummary`]: totals, streaks, busiest day, time-of-day buckets,
//! sentiment counts, and a topic distribution.

pub mod aggregations;
pub mod classifier;
pub mod reports;
pub mod verdict;

pub use aggregations::{
    aggregate, Aggregator, DailyStats, DateRange, LongestConversation, Sentiment,
    StatisticsSummary, Streaks, TimeOfDay, TimeSlot, Topics,
};
pub use classifier::{KeywordClassifier, KeywordMatcher};
pub use reports::ReportGenerator;
pub use verdict::SafetyVerdict;
