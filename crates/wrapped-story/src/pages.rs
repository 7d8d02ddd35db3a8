//! Story pages and the statistics slices they present.

use std::sync::Arc;
use wrapped_analytics::aggregations::{
    DailyStats, DateRange, LongestConversation, StatisticsSummary, Streaks, TimeOfDay,
};
use wrapped_core::types::PageKind;

/// Figures shown on the totals page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalsSlice {
    pub total_conversations: u32,
    pub total_messages: u64,
    pub date_range: DateRange,
    pub longest_conversation: LongestConversation,
}

/// Figures shown on the streaks page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakSlice {
    pub streaks: Streaks,
    pub daily_stats: DailyStats,
}

/// What a bound page renders.
#[derive(Debug, Clone, PartialEq)]
pub enum PageContent {
    Welcome,
    Totals(TotalsSlice),
    Streaks(StreakSlice),
    TimeOfDay(TimeOfDay),
    Summary(Arc<StatisticsSummary>),
}

/// One story page. `content` is `None` while the statistics it presents are
/// not available; renderers decide how to show that.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub kind: PageKind,
    pub content: Option<PageContent>,
}

impl Page {
    /// Build a page of `kind`, bound to its slice of `summary` when present.
    pub fn new(kind: PageKind, summary: Option<&Arc<StatisticsSummary>>) -> Self {
        let content = match kind {
            PageKind::Welcome => Some(PageContent::Welcome),
            _ => summary.map(|s| slice_for(kind, s)),
        };
        Self { kind, content }
    }

    pub fn is_bound(&self) -> bool {
        self.content.is_some()
    }

    pub fn title(&self) -> &'static str {
        self.kind.title()
    }
}

fn slice_for(kind: PageKind, summary: &Arc<StatisticsSummary>) -> PageContent {
    match kind {
        PageKind::Welcome => PageContent::Welcome,
        PageKind::TotalStats => PageContent::Totals(TotalsSlice {
            total_conversations: summary.total_conversations,
            total_messages: summary.total_messages,
            date_range: summary.date_range,
            longest_conversation: summary.longest_conversation.clone(),
        }),
        PageKind::StreakStats => PageContent::Streaks(StreakSlice {
            streaks: summary.streaks,
            daily_stats: summary.daily_stats,
        }),
        PageKind::TimeStats => PageContent::TimeOfDay(summary.time_of_day),
        PageKind::SummaryStats => PageContent::Summary(Arc::clone(summary)),
    }
}

/// Build the pages for `kinds`, in order.
pub fn build_pages(kinds: &[PageKind], summary: Option<&Arc<StatisticsSummary>>) -> Vec<Page> {
    kinds.iter().map(|&kind| Page::new(kind, summary)).collect()
}
