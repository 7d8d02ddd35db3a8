//! Terminal rendering for story pages.

use wrapped_analytics::aggregations::{StatisticsSummary, TimeOfDay, TimeSlot};
use wrapped_analytics::reports::{format_date, percent};
use wrapped_analytics::verdict::SafetyVerdict;
use wrapped_story::{Page, PageContent, StreakSlice, TotalsSlice};

const BAR_WIDTH: u32 = 30;

/// Render one page as a block of text. `position` is (index, total pages).
pub fn render_page(page: &Page, position: (usize, usize), heading: &str) -> String {
    let (index, total) = position;
    let mut out = format!(
        "\n\x1b[1;35m── {} ── ({}/{})\x1b[0m\n\n",
        page.title(),
        index + 1,
        total
    );

    match &page.content {
        None => out.push_str("  (waiting for your data...)\n"),
        Some(PageContent::Welcome) => {
            out.push_str(&format!("  \x1b[1m{}\x1b[0m\n\n", heading));
            out.push_str("  Let's look back at everything you asked your assistant.\n");
        }
        Some(PageContent::Totals(totals)) => render_totals(&mut out, totals),
        Some(PageContent::Streaks(streaks)) => render_streaks(&mut out, streaks),
        Some(PageContent::TimeOfDay(time)) => render_time_of_day(&mut out, time),
        Some(PageContent::Summary(summary)) => render_summary(&mut out, summary, heading),
    }

    out
}

fn render_totals(out: &mut String, totals: &TotalsSlice) {
    out.push_str(&format!(
        "  You started \x1b[1m{}\x1b[0m conversations\n",
        totals.total_conversations
    ));
    out.push_str(&format!(
        "  and exchanged \x1b[1m{}\x1b[0m messages.\n",
        totals.total_messages
    ));
    if let (Some(start), Some(end)) = (totals.date_range.start, totals.date_range.end) {
        out.push_str(&format!(
            "  From {} to {}.\n",
            format_date(Some(start)),
            format_date(Some(end))
        ));
    }
    let longest = &totals.longest_conversation;
    if longest.message_count > 0 {
        out.push_str(&format!(
            "\n  Your longest chat, \"{}\", ran {} messages ({}).\n",
            longest.title,
            longest.message_count,
            format_date(longest.date)
        ));
    }
}

fn render_streaks(out: &mut String, slice: &StreakSlice) {
    out.push_str(&format!(
        "  Longest streak: \x1b[1m{}\x1b[0m days in a row",
        slice.streaks.longest
    ));
    if let Some(start) = slice.streaks.start_date {
        out.push_str(&format!(", starting {}", format_date(Some(start))));
    }
    out.push('\n');
    out.push_str(&format!(
        "  Latest streak: {} days\n",
        slice.streaks.current
    ));
    out.push_str(&format!(
        "  Busiest day: {} chats on {}\n",
        slice.daily_stats.most_chats_in_one_day,
        format_date(slice.daily_stats.date)
    ));
}

fn render_time_of_day(out: &mut String, time: &TimeOfDay) {
    let total = time.total();
    let max = TimeSlot::ALL
        .into_iter()
        .map(|slot| time.get(slot))
        .max()
        .unwrap_or(0);

    for slot in TimeSlot::ALL {
        let count = time.get(slot);
        let width = if max == 0 { 0 } else { count * BAR_WIDTH / max };
        out.push_str(&format!(
            "  {:<10} {:<width$} {} ({:.0}%)\n",
            slot.label(),
            "█".repeat(width as usize),
            count,
            percent(count, total),
            width = BAR_WIDTH as usize
        ));
    }
    if let Some(peak) = time.peak() {
        out.push_str(&format!("\n  You're a {} person.\n", slot_persona(peak)));
    }
}

fn slot_persona(slot: TimeSlot) -> &'static str {
    match slot {
        TimeSlot::Morning => "morning",
        TimeSlot::Afternoon => "afternoon",
        TimeSlot::Evening => "evening",
        TimeSlot::Night => "night owl",
    }
}

fn render_summary(out: &mut String, summary: &StatisticsSummary, heading: &str) {
    out.push_str(&format!("  \x1b[1m{}\x1b[0m\n\n", heading));
    let top_topic = summary
        .topics
        .top_topic()
        .map(|(topic, _)| topic)
        .unwrap_or("-");
    let cells = [
        ("Total Chats", summary.total_conversations.to_string()),
        ("Messages Exchanged", summary.total_messages.to_string()),
        ("Longest Daily Streak", summary.streaks.longest.to_string()),
        (
            "Most Active Day",
            summary.daily_stats.most_chats_in_one_day.to_string(),
        ),
        (
            "Longest Chat (messages)",
            summary.longest_conversation.message_count.to_string(),
        ),
        ("Most Common Topic", top_topic.to_string()),
    ];
    for (label, value) in cells {
        out.push_str(&format!("  {:<24} {}\n", label, value));
    }

    let verdict = SafetyVerdict::from_sentiment(&summary.sentiment);
    out.push_str(&format!(
        "\n  Are you safe from AGI? {}{}\x1b[0m\n",
        verdict_colour(verdict),
        verdict.message()
    ));
}

fn verdict_colour(verdict: SafetyVerdict) -> &'static str {
    match verdict {
        SafetyVerdict::Safe => "\x1b[0;32m",
        SafetyVerdict::SafeForNow => "\x1b[0;33m",
        SafetyVerdict::Wary => "\x1b[38;5;208m",
        SafetyVerdict::Doomed => "\x1b[0;31m",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use wrapped_analytics::aggregate;
    use wrapped_core::types::{ConversationRecord, PageKind};
    use wrapped_story::build_pages;

    fn summary() -> Arc<StatisticsSummary> {
        let start = chrono::NaiveDate::from_ymd_opt(2024, 2, 1)
            .unwrap()
            .and_hms_opt(22, 15, 0)
            .unwrap();
        Arc::new(aggregate(&[ConversationRecord::new("a", "Late night debugging")
            .started_at(start)
            .with_messages(["why won't this rust code compile", "thanks!"])]))
    }

    #[test]
    fn test_unbound_page_renders_placeholder() {
        let pages = build_pages(&[PageKind::TotalStats], None);
        let text = render_page(&pages[0], (0, 1), "Wrapped");
        assert!(text.contains("Totals"));
        assert!(text.contains("(1/1)"));
        assert!(text.contains("waiting for your data"));
    }

    #[test]
    fn test_bound_pages_render() {
        let summary = summary();
        let pages = build_pages(&PageKind::ALL, Some(&summary));
        let rendered: Vec<String> = pages
            .iter()
            .enumerate()
            .map(|(i, p)| render_page(p, (i, pages.len()), "Your 2024 Chat Wrapped"))
            .collect();

        assert!(rendered[0].contains("Your 2024 Chat Wrapped"));
        assert!(rendered[1].contains("Late night debugging"));
        assert!(rendered[2].contains("Longest streak"));
        assert!(rendered[3].contains("night owl"));
        assert!(rendered[4].contains("Most Common Topic"));
        assert!(rendered[4].contains("Coding"));
        assert!(rendered[4].contains("Don't turn your back."));
    }
}
