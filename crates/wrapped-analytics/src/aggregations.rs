//! Conversation statistics.
//!
//! Groups records by local calendar date and computes the summary shown in
//! the story: totals, streaks, busiest day, time-of-day buckets, sentiment
//! counts, and topic distribution. Records without a start time count toward
//! totals, sentiment, and topics but are left out of every date-based figure.

use crate::classifier::KeywordClassifier;
use chrono::{Duration, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wrapped_core::config::{AppConfig, KeywordConfig, TimeBuckets};
use wrapped_core::types::ConversationRecord;

/// Everything the story presents, computed once per data set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsSummary {
    pub total_conversations: u32,
    pub total_messages: u64,
    /// Distinct calendar dates with at least one conversation.
    pub active_days: u32,
    pub date_range: DateRange,
    pub streaks: Streaks,
    pub longest_conversation: LongestConversation,
    pub daily_stats: DailyStats,
    pub time_of_day: TimeOfDay,
    pub sentiment: Sentiment,
    pub topics: Topics,
}

impl StatisticsSummary {
    pub fn is_empty(&self) -> bool {
        self.total_conversations == 0
    }

    /// Average messages per conversation, `None` for an empty summary.
    pub fn average_messages(&self) -> Option<f64> {
        if self.total_conversations == 0 {
            None
        } else {
            Some(self.total_messages as f64 / self.total_conversations as f64)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Streaks {
    /// Longest run of consecutive active days.
    pub longest: u32,
    /// Run ending at the latest date in the data (not at today's date).
    pub current: u32,
    /// First day of the longest run; the earliest such run on ties.
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LongestConversation {
    pub message_count: u32,
    pub date: Option<NaiveDate>,
    /// Empty when there is no data.
    pub title: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    pub most_chats_in_one_day: u32,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub morning: u32,
    pub afternoon: u32,
    pub evening: u32,
    pub night: u32,
}

impl TimeOfDay {
    pub fn get(&self, slot: TimeSlot) -> u32 {
        match slot {
            TimeSlot::Morning => self.morning,
            TimeSlot::Afternoon => self.afternoon,
            TimeSlot::Evening => self.evening,
            TimeSlot::Night => self.night,
        }
    }

    fn bump(&mut self, slot: TimeSlot) {
        match slot {
            TimeSlot::Morning => self.morning += 1,
            TimeSlot::Afternoon => self.afternoon += 1,
            TimeSlot::Evening => self.evening += 1,
            TimeSlot::Night => self.night += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.morning + self.afternoon + self.evening + self.night
    }

    /// Busiest bucket; earlier buckets win ties. `None` when all are zero.
    pub fn peak(&self) -> Option<TimeSlot> {
        TimeSlot::ALL
            .into_iter()
            .fold(None, |best: Option<TimeSlot>, slot| match best {
                Some(b) if self.get(b) >= self.get(slot) => Some(b),
                _ if self.get(slot) > 0 => Some(slot),
                _ => best,
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 4] = [
        TimeSlot::Morning,
        TimeSlot::Afternoon,
        TimeSlot::Evening,
        TimeSlot::Night,
    ];

    /// Bucket a local time of day.
    pub fn of(time: NaiveTime, buckets: &TimeBuckets) -> Self {
        let hour = time.hour();
        if hour >= buckets.morning && hour < buckets.afternoon {
            TimeSlot::Morning
        } else if hour >= buckets.afternoon && hour < buckets.evening {
            TimeSlot::Afternoon
        } else if hour >= buckets.evening && hour < buckets.night {
            TimeSlot::Evening
        } else {
            TimeSlot::Night
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "Morning",
            TimeSlot::Afternoon => "Afternoon",
            TimeSlot::Evening => "Evening",
            TimeSlot::Night => "Night",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sentiment {
    pub swear_count: u32,
    pub gratitude_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topics {
    /// Topic label -> number of keyword mentions across all messages.
    pub distribution: BTreeMap<String, u32>,
}

impl Topics {
    /// Most mentioned topic. Ties go to the label that sorts first; topics
    /// nobody mentioned never win.
    pub fn top_topic(&self) -> Option<(&str, u32)> {
        self.ranked().into_iter().next()
    }

    /// Mentioned topics, most frequent first.
    pub fn ranked(&self) -> Vec<(&str, u32)> {
        let mut ranked: Vec<(&str, u32)> = self
            .distribution
            .iter()
            .filter(|(_, &count)| count > 0)
            .map(|(label, &count)| (label.as_str(), count))
            .collect();
        // Stable sort keeps label order among equal counts.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

/// Computes [`StatisticsSummary`] values with a fixed bucket and keyword
/// configuration.
#[derive(Debug, Clone)]
pub struct Aggregator {
    buckets: TimeBuckets,
    classifier: KeywordClassifier,
}

impl Aggregator {
    pub fn new(buckets: TimeBuckets, keywords: &KeywordConfig) -> Self {
        Self {
            buckets,
            classifier: KeywordClassifier::from_config(keywords),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.buckets, &config.keywords)
    }

    /// Summarise `records`. Pure: the same input always gives the same output.
    pub fn aggregate(&self, records: &[ConversationRecord]) -> StatisticsSummary {
        let mut summary = StatisticsSummary {
            total_conversations: records.len() as u32,
            topics: Topics {
                distribution: self.classifier.empty_distribution(),
            },
            ..Default::default()
        };

        let mut by_date: BTreeMap<NaiveDate, Vec<&ConversationRecord>> = BTreeMap::new();
        let mut longest: Option<&ConversationRecord> = None;

        for record in records {
            summary.total_messages += u64::from(record.message_count);

            if longest.map_or(true, |best| record.message_count > best.message_count) {
                longest = Some(record);
            }

            if let Some(started) = record.started_at {
                by_date.entry(started.date()).or_default().push(record);
                summary
                    .time_of_day
                    .bump(TimeSlot::of(started.time(), &self.buckets));
            }

            for text in &record.messages {
                summary.sentiment.swear_count += self.classifier.swear_count(text);
                summary.sentiment.gratitude_count += self.classifier.gratitude_count(text);
                for (topic, hits) in self.classifier.topic_counts(text) {
                    if let Some(count) = summary.topics.distribution.get_mut(topic) {
                        *count += hits;
                    }
                }
            }
        }

        if let Some(record) = longest {
            summary.longest_conversation = LongestConversation {
                message_count: record.message_count,
                date: record.date(),
                title: record.title.clone(),
            };
        }

        summary.active_days = by_date.len() as u32;
        summary.date_range = DateRange {
            start: by_date.keys().next().copied(),
            end: by_date.keys().next_back().copied(),
        };
        summary.daily_stats = busiest_day(&by_date);
        summary.streaks = streaks(by_date.keys().copied());

        tracing::debug!(
            conversations = summary.total_conversations,
            messages = summary.total_messages,
            active_days = summary.active_days,
            undated = records.len() - by_date.values().map(Vec::len).sum::<usize>(),
            "Aggregated conversation statistics"
        );

        summary
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(TimeBuckets::default(), &KeywordConfig::default())
    }
}

/// Summarise `records` with the default buckets and keyword tables.
pub fn aggregate(records: &[ConversationRecord]) -> StatisticsSummary {
    Aggregator::default().aggregate(records)
}

/// Busiest date; the earliest date wins ties.
fn busiest_day(by_date: &BTreeMap<NaiveDate, Vec<&ConversationRecord>>) -> DailyStats {
    let mut stats = DailyStats::default();
    for (date, day) in by_date {
        let count = day.len() as u32;
        if count > stats.most_chats_in_one_day {
            stats = DailyStats {
                most_chats_in_one_day: count,
                date: Some(*date),
            };
        }
    }
    stats
}

/// Scan ascending distinct dates for runs of consecutive days.
fn streaks(dates: impl Iterator<Item = NaiveDate>) -> Streaks {
    let mut result = Streaks::default();
    let mut run_len = 0u32;
    let mut run_start: Option<NaiveDate> = None;
    let mut prev: Option<NaiveDate> = None;

    for date in dates {
        match prev {
            Some(p) if p + Duration::days(1) == date => run_len += 1,
            _ => {
                run_len = 1;
                run_start = Some(date);
            }
        }
        if run_len > result.longest {
            result.longest = run_len;
            result.start_date = run_start;
        }
        prev = Some(date);
    }

    // The last run is the one that reaches the latest observed date.
    result.current = run_len;
    result
}
