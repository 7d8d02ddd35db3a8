//! Story presentation model.
//!
//! A story is an ordered list of pages, each optionally bound to a slice of
//! the statistics summary, plus a cursor that moves forward and back.

pub mod error;
pub mod pages;
pub mod sequencer;

pub use error::StoryError;
pub use pages::{build_pages, Page, PageContent, StreakSlice, TotalsSlice};
pub use sequencer::{Navigation, Presentation, StorySequence};
