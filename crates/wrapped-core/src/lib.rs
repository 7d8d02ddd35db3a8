pub mod config;
pub mod error;
pub mod ingest;
pub mod types;

pub use config::AppConfig;
pub use error::{ConfigError, IngestError};
pub use ingest::{load_export, load_export_async, parse_export, Ingested};
pub use types::{ConversationRecord, PageKind};
