use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One chat session, normalised from an export.
///
/// Records are built once by the ingestor and treated as read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub id: String,
    pub title: String,
    /// Number of user/assistant turns in the session.
    pub message_count: u32,
    /// Local wall-clock time of the first message. `None` when the export
    /// carried no usable timestamp.
    pub started_at: Option<NaiveDateTime>,
    /// Message texts in conversation order.
    #[serde(default)]
    pub messages: Vec<String>,
}

impl ConversationRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            message_count: 0,
            started_at: None,
            messages: Vec::new(),
        }
    }

    pub fn started_at(mut self, started_at: NaiveDateTime) -> Self {
        self.started_at = Some(started_at);
        self
    }

    /// Set the message texts; the message count follows the text count.
    pub fn with_messages<I, S>(mut self, messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.messages = messages.into_iter().map(Into::into).collect();
        self.message_count = self.messages.len() as u32;
        self
    }

    pub fn with_message_count(mut self, count: u32) -> Self {
        self.message_count = count;
        self
    }

    /// Calendar date the session started on.
    pub fn date(&self) -> Option<NaiveDate> {
        self.started_at.map(|t| t.date())
    }
}

/// The pages a story can be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    Welcome,
    TotalStats,
    StreakStats,
    TimeStats,
    SummaryStats,
}

impl PageKind {
    /// Default story order.
    pub const ALL: [PageKind; 5] = [
        PageKind::Welcome,
        PageKind::TotalStats,
        PageKind::StreakStats,
        PageKind::TimeStats,
        PageKind::SummaryStats,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            PageKind::Welcome => "Welcome",
            PageKind::TotalStats => "Totals",
            PageKind::StreakStats => "Streaks",
            PageKind::TimeStats => "Time of Day",
            PageKind::SummaryStats => "Summary",
        }
    }
}
