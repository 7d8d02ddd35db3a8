//! Story navigation.
//!
//! [`StorySequence`] is a page list with a clamped cursor. [`Presentation`]
//! wraps it in a two-state machine: `NotReady` until a summary arrives, then
//! `Ready` for the rest of the session.

use crate::error::{Result, StoryError};
use crate::pages::{build_pages, Page};
use std::sync::Arc;
use wrapped_analytics::aggregations::StatisticsSummary;
use wrapped_core::config::{EndBehavior, StoryConfig};
use wrapped_core::types::PageKind;

/// Outcome of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The cursor now points at this index.
    Moved(usize),
    /// Already on the last page; the story is finished.
    AtEnd,
    /// Already on the first page.
    AtStart,
}

#[derive(Debug, Clone)]
pub struct StorySequence {
    pages: Vec<Page>,
    current_index: usize,
    at_end: EndBehavior,
}

impl StorySequence {
    pub fn new(pages: Vec<Page>) -> Self {
        Self::with_end_behavior(pages, EndBehavior::Stop)
    }

    pub fn with_end_behavior(pages: Vec<Page>, at_end: EndBehavior) -> Self {
        Self {
            pages,
            current_index: 0,
            at_end,
        }
    }

    /// Move forward one page. On the last page this is a no-op reporting
    /// [`Navigation::AtEnd`], or a wrap to the first page when looping.
    pub fn advance(&mut self) -> Navigation {
        if self.pages.is_empty() {
            return Navigation::AtEnd;
        }
        if self.current_index + 1 < self.pages.len() {
            self.current_index += 1;
            return Navigation::Moved(self.current_index);
        }
        match self.at_end {
            EndBehavior::Stop => Navigation::AtEnd,
            EndBehavior::Loop => {
                self.current_index = 0;
                tracing::debug!("Story wrapped to first page");
                Navigation::Moved(0)
            }
        }
    }

    /// Move back one page, staying put on the first.
    pub fn retreat(&mut self) -> Navigation {
        if self.current_index == 0 {
            return Navigation::AtStart;
        }
        self.current_index -= 1;
        Navigation::Moved(self.current_index)
    }

    pub fn current(&self) -> Result<&Page> {
        self.pages
            .get(self.current_index)
            .ok_or(StoryError::OutOfRange)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn is_last(&self) -> bool {
        self.current_index + 1 >= self.pages.len()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }
}

/// A presentation session.
#[derive(Debug, Clone)]
pub enum Presentation {
    /// No summary yet; statistics pages are unbound.
    NotReady {
        pages: Vec<Page>,
        at_end: EndBehavior,
    },
    /// Summary bound; navigation enabled.
    Ready(StorySequence),
}

impl Presentation {
    pub fn new(config: &StoryConfig) -> Self {
        Presentation::NotReady {
            pages: build_pages(&config.pages, None),
            at_end: config.at_end,
        }
    }

    /// Bind the summary and enable navigation. Only the first call succeeds.
    pub fn bind(&mut self, summary: Arc<StatisticsSummary>) -> Result<()> {
        let Presentation::NotReady { pages, at_end } = self else {
            return Err(StoryError::AlreadyReady);
        };
        let kinds: Vec<PageKind> = pages.iter().map(|p| p.kind).collect();
        let sequence =
            StorySequence::with_end_behavior(build_pages(&kinds, Some(&summary)), *at_end);
        tracing::debug!(pages = sequence.len(), "Presentation ready");
        *self = Presentation::Ready(sequence);
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Presentation::Ready(_))
    }

    pub fn pages(&self) -> &[Page] {
        match self {
            Presentation::NotReady { pages, .. } => pages,
            Presentation::Ready(sequence) => sequence.pages(),
        }
    }

    /// The page on screen; the first page until the summary is bound.
    pub fn current(&self) -> Result<&Page> {
        match self {
            Presentation::NotReady { pages, .. } => pages.first().ok_or(StoryError::OutOfRange),
            Presentation::Ready(sequence) => sequence.current(),
        }
    }

    /// Advance when ready; `None` while not ready.
    pub fn advance(&mut self) -> Option<Navigation> {
        match self {
            Presentation::NotReady { .. } => None,
            Presentation::Ready(sequence) => Some(sequence.advance()),
        }
    }

    /// Retreat when ready; `None` while not ready.
    pub fn retreat(&mut self) -> Option<Navigation> {
        match self {
            Presentation::NotReady { .. } => None,
            Presentation::Ready(sequence) => Some(sequence.retreat()),
        }
    }

    pub fn sequence(&self) -> Option<&StorySequence> {
        match self {
            Presentation::NotReady { .. } => None,
            Presentation::Ready(sequence) => Some(sequence),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::PageContent;
    use wrapped_analytics::aggregations::aggregate;

    fn four_pages() -> Vec<Page> {
        build_pages(
            &[
                PageKind::Welcome,
                PageKind::TotalStats,
                PageKind::StreakStats,
                PageKind::TimeStats,
            ],
            None,
        )
    }

    #[test]
    fn test_advance_stops_at_last_page() {
        let mut story = StorySequence::new(four_pages());
        assert_eq!(story.advance(), Navigation::Moved(1));
        assert_eq!(story.advance(), Navigation::Moved(2));
        assert_eq!(story.advance(), Navigation::Moved(3));
        assert!(story.is_last());
        for _ in 0..3 {
            assert_eq!(story.advance(), Navigation::AtEnd);
            assert_eq!(story.current_index(), 3);
        }
        assert_eq!(story.current().unwrap().kind, PageKind::TimeStats);
    }

    #[test]
    fn test_retreat_stops_at_first_page() {
        let mut story = StorySequence::new(four_pages());
        assert_eq!(story.retreat(), Navigation::AtStart);
        assert_eq!(story.current_index(), 0);

        story.advance();
        story.advance();
        assert_eq!(story.retreat(), Navigation::Moved(1));
        assert_eq!(story.retreat(), Navigation::Moved(0));
        assert_eq!(story.retreat(), Navigation::AtStart);
    }

    #[test]
    fn test_loop_wraps_to_first_page() {
        let mut story = StorySequence::with_end_behavior(four_pages(), EndBehavior::Loop);
        for _ in 0..3 {
            story.advance();
        }
        assert_eq!(story.advance(), Navigation::Moved(0));
        assert_eq!(story.current().unwrap().kind, PageKind::Welcome);
        assert_eq!(story.retreat(), Navigation::AtStart);
    }

    #[test]
    fn test_single_page_story() {
        let mut story = StorySequence::new(build_pages(&[PageKind::Welcome], None));
        assert!(story.is_last());
        assert_eq!(story.advance(), Navigation::AtEnd);
        assert_eq!(story.retreat(), Navigation::AtStart);
    }

    #[test]
    fn test_empty_story_current_out_of_range() {
        let mut story = StorySequence::new(Vec::new());
        assert!(story.is_empty());
        assert_eq!(story.current().unwrap_err(), StoryError::OutOfRange);
        assert_eq!(story.advance(), Navigation::AtEnd);
        assert_eq!(story.retreat(), Navigation::AtStart);
        assert_eq!(story.current_index(), 0);
    }

    #[test]
    fn test_unbound_pages_pass_through() {
        let mut story = StorySequence::new(four_pages());
        story.advance();
        let page = story.current().unwrap();
        assert_eq!(page.kind, PageKind::TotalStats);
        assert!(page.content.is_none());
    }

    #[test]
    fn test_presentation_binds_once() {
        let mut presentation = Presentation::new(&StoryConfig::default());
        assert!(!presentation.is_ready());
        assert_eq!(presentation.advance(), None);
        assert_eq!(presentation.retreat(), None);
        assert_eq!(
            presentation.current().unwrap().content,
            Some(PageContent::Welcome)
        );
        assert!(presentation.pages()[1..].iter().all(|p| !p.is_bound()));

        let summary = Arc::new(aggregate(&[]));
        presentation.bind(Arc::clone(&summary)).unwrap();
        assert!(presentation.is_ready());
        assert!(presentation.pages().iter().all(Page::is_bound));
        assert_eq!(presentation.advance(), Some(Navigation::Moved(1)));

        let again = presentation.bind(summary);
        assert_eq!(again, Err(StoryError::AlreadyReady));
        // Binding again leaves the cursor where it was.
        assert_eq!(presentation.sequence().unwrap().current_index(), 1);
    }

    #[test]
    fn test_presentation_honours_story_config() {
        let config = StoryConfig {
            pages: vec![PageKind::Welcome, PageKind::SummaryStats],
            at_end: EndBehavior::Loop,
        };
        let mut presentation = Presentation::new(&config);
        presentation.bind(Arc::new(aggregate(&[]))).unwrap();
        assert_eq!(presentation.pages().len(), 2);
        assert_eq!(presentation.advance(), Some(Navigation::Moved(1)));
        assert_eq!(presentation.advance(), Some(Navigation::Moved(0)));
    }

    #[test]
    fn test_empty_not_ready_presentation() {
        let config = StoryConfig {
            pages: Vec::new(),
            at_end: EndBehavior::Stop,
        };
        let presentation = Presentation::new(&config);
        assert_eq!(presentation.current().unwrap_err(), StoryError::OutOfRange);
    }
}
