use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoryError {
    #[error("Story has no pages")]
    OutOfRange,

    #[error("Presentation is already bound to a summary")]
    AlreadyReady,
}

pub type Result<T> = std::result::Result<T, StoryError>;
