//! Markdown and plain-text reports from a statistics summary.

use crate::aggregations::{StatisticsSummary, TimeSlot};
use crate::verdict::SafetyVerdict;
use chrono::NaiveDate;

/// Report generator for creating markdown and terminal summaries.
pub struct ReportGenerator;

impl ReportGenerator {
    /// Generate a full markdown report.
    pub fn markdown_report(summary: &StatisticsSummary, heading: &str) -> String {
        let mut report = String::new();

        report.push_str(&format!("# {}\n\n", heading));
        if let (Some(start), Some(end)) = (summary.date_range.start, summary.date_range.end) {
            report.push_str(&format!(
                "**{} - {}**\n\n",
                start.format("%B %d, %Y"),
                end.format("%B %d, %Y")
            ));
        }

        if summary.is_empty() {
            report.push_str("No conversations found.\n");
            return report;
        }

        // Overview.
        report.push_str("## Overview\n\n");
        report.push_str(&format!(
            "- **Conversations:** {}\n",
            summary.total_conversations
        ));
        report.push_str(&format!("- **Messages:** {}\n", summary.total_messages));
        report.push_str(&format!("- **Active Days:** {}\n", summary.active_days));
        if let Some(avg) = summary.average_messages() {
            report.push_str(&format!("- **Avg Messages per Chat:** {:.1}\n", avg));
        }
        let longest = &summary.longest_conversation;
        report.push_str(&format!(
            "- **Longest Chat:** {} ({} messages, {})\n\n",
            longest.title,
            longest.message_count,
            format_date(longest.date)
        ));

        // Streaks.
        report.push_str("## Streaks\n\n");
        report.push_str(&format!(
            "- **Longest Streak:** {} days (from {})\n",
            summary.streaks.longest,
            format_date(summary.streaks.start_date)
        ));
        report.push_str(&format!(
            "- **Latest Streak:** {} days\n",
            summary.streaks.current
        ));
        report.push_str(&format!(
            "- **Most Active Day:** {} chats on {}\n\n",
            summary.daily_stats.most_chats_in_one_day,
            format_date(summary.daily_stats.date)
        ));

        // Time of day table.
        let total = summary.time_of_day.total();
        report.push_str("## Time of Day\n\n");
        report.push_str("| Time | Chats | Share |\n");
        report.push_str("|------|-------|-------|\n");
        for slot in TimeSlot::ALL {
            let count = summary.time_of_day.get(slot);
            report.push_str(&format!(
                "| {} | {} | {:.1}% |\n",
                slot.label(),
                count,
                percent(count, total)
            ));
        }
        report.push('\n');

        // Topics.
        let ranked = summary.topics.ranked();
        if !ranked.is_empty() {
            report.push_str("## Top Topics\n\n");
            for (i, (topic, count)) in ranked.iter().enumerate() {
                report.push_str(&format!("{}. {} - {} mentions\n", i + 1, topic, count));
            }
            report.push('\n');
        }

        // Sentiment.
        let verdict = SafetyVerdict::from_sentiment(&summary.sentiment);
        report.push_str("## Are you safe from AGI?\n\n");
        report.push_str(&format!(
            "- **Thank-yous:** {}\n- **Swears:** {}\n\n**{}**\n",
            summary.sentiment.gratitude_count,
            summary.sentiment.swear_count,
            verdict.message()
        ));

        report
    }

    /// Generate a compact summary suitable for the terminal.
    pub fn text_summary(summary: &StatisticsSummary) -> String {
        let mut output = String::new();

        if summary.is_empty() {
            output.push_str("  No conversations found.\n");
            return output;
        }

        output.push_str(&format!(
            "  Chats: {}  Messages: {}  Active days: {}\n",
            summary.total_conversations, summary.total_messages, summary.active_days
        ));
        output.push_str(&format!(
            "  Longest streak: {} days  Latest streak: {} days\n",
            summary.streaks.longest, summary.streaks.current
        ));
        output.push_str(&format!(
            "  Most active day: {} chats ({})\n",
            summary.daily_stats.most_chats_in_one_day,
            format_date(summary.daily_stats.date)
        ));
        if let Some(slot) = summary.time_of_day.peak() {
            output.push_str(&format!("  Favourite time: {}\n", slot.label()));
        }
        if let Some((topic, _)) = summary.topics.top_topic() {
            output.push_str(&format!("  Top topic: {}\n", topic));
        }
        output.push_str(&format!(
            "  Verdict: {}\n",
            SafetyVerdict::from_sentiment(&summary.sentiment).message()
        ));

        output
    }
}

/// Format an optional date for display.
pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%b %d, %Y").to_string(),
        None => "-".to_string(),
    }
}

/// Share of `part` in `total` as a percentage (0 when total is 0).
pub fn percent(part: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}
