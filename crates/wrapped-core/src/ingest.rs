//! Export ingestion.
//!
//! Reads a chat-assistant export (`conversations.json`) or a file of
//! already-normalised records and produces [`ConversationRecord`]s. Bad
//! individual records are logged and tolerated; only an unreadable file or a
//! top-level shape that is not a list fails the whole load.

use crate::config::TimezoneConfig;
use crate::error::{IngestError, Result};
use crate::types::ConversationRecord;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;
use uuid::Uuid;

const UNTITLED: &str = "Untitled";

/// Naive formats accepted for `started_at`, interpreted as local time.
const LOCAL_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Result of ingesting one export file.
#[derive(Debug, Clone, Default)]
pub struct Ingested {
    pub records: Vec<ConversationRecord>,
    /// Array entries that were not objects and were dropped.
    pub skipped: usize,
    /// Records kept without a start time.
    pub undated: usize,
}

/// Read and parse an export file.
pub fn load_export(path: &Path, tz: &TimezoneConfig) -> Result<Ingested> {
    let contents = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "Read export");
    parse_export(&contents, tz)
}

/// Read and parse an export file without blocking the runtime.
pub async fn load_export_async(path: &Path, tz: &TimezoneConfig) -> Result<Ingested> {
    let contents = tokio::fs::read_to_string(path).await?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "Read export");
    parse_export(&contents, tz)
}

/// Parse export JSON into conversation records.
pub fn parse_export(json: &str, tz: &TimezoneConfig) -> Result<Ingested> {
    let root: Value = serde_json::from_str(json)?;
    let items = match root {
        Value::Array(items) => items,
        other => {
            return Err(IngestError::InvalidShape(format!(
                "expected a list of conversations, found {}",
                kind_of(&other)
            )))
        }
    };

    let mut ingested = Ingested::default();
    let mut seen_ids = HashSet::new();

    for (index, item) in items.iter().enumerate() {
        let Some(obj) = item.as_object() else {
            tracing::warn!(index, kind = kind_of(item), "Skipping non-object export entry");
            ingested.skipped += 1;
            continue;
        };

        let mut record = if obj.contains_key("mapping") {
            parse_chat_export(obj, tz)
        } else {
            parse_normalised(obj, tz)
        };
        record.id = unique_id(record.id, &mut seen_ids);

        if record.started_at.is_none() {
            tracing::warn!(
                id = %record.id,
                "Conversation has no usable start time; excluded from date statistics"
            );
            ingested.undated += 1;
        }
        ingested.records.push(record);
    }

    tracing::info!(
        records = ingested.records.len(),
        skipped = ingested.skipped,
        undated = ingested.undated,
        "Ingested export"
    );
    Ok(ingested)
}

/// A conversation in the assistant's native export layout: a tree of message
/// nodes keyed by node id.
fn parse_chat_export(obj: &Map<String, Value>, tz: &TimezoneConfig) -> ConversationRecord {
    let id = id_field(obj, "id")
        .or_else(|| id_field(obj, "conversation_id"))
        .unwrap_or_default();
    let started_at = obj
        .get("create_time")
        .and_then(Value::as_f64)
        .and_then(|secs| epoch_to_local(secs, tz));

    let mut turns: Vec<(f64, &str, String)> = Vec::new();
    if let Some(mapping) = obj.get("mapping").and_then(Value::as_object) {
        for (node_id, node) in mapping {
            let Some(message) = node.get("message").filter(|m| !m.is_null()) else {
                continue;
            };
            let role = message
                .pointer("/author/role")
                .and_then(Value::as_str)
                .unwrap_or_default();
            if role != "user" && role != "assistant" {
                continue;
            }
            let text = message.get("content").map(content_text).unwrap_or_default();
            if text.trim().is_empty() {
                continue;
            }
            let at = message
                .get("create_time")
                .and_then(Value::as_f64)
                .unwrap_or(f64::MAX);
            turns.push((at, node_id.as_str(), text));
        }
    }
    turns.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(b.1)));

    let mut record = ConversationRecord::new(id, title_of(obj))
        .with_messages(turns.into_iter().map(|(_, _, text)| text));
    record.started_at = started_at;
    record
}

/// A record already in `ConversationRecord` shape, with lenient field types.
fn parse_normalised(obj: &Map<String, Value>, tz: &TimezoneConfig) -> ConversationRecord {
    let id = id_field(obj, "id").unwrap_or_default();
    let messages: Vec<String> = obj
        .get("messages")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|m| match m {
                    Value::String(s) => Some(s.clone()),
                    Value::Object(_) => m.get("content").map(content_text),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    let mut record = ConversationRecord::new(id, title_of(obj)).with_messages(messages);
    if let Some(raw) = obj.get("message_count") {
        match message_count_of(raw) {
            Some(count) => record.message_count = count,
            None => tracing::warn!(
                id = %record.id,
                value = %raw,
                "Unusable message_count; using the number of messages"
            ),
        }
    }
    record.started_at = obj.get("started_at").and_then(|v| match v {
        Value::String(s) => parse_local_timestamp(s, tz),
        Value::Number(n) => n.as_f64().and_then(|secs| epoch_to_local(secs, tz)),
        _ => None,
    });
    record
}

/// Extract displayable text from a message content value.
fn content_text(content: &Value) -> String {
    match content {
        Value::String(s) => s.clone(),
        Value::Object(map) => {
            if let Some(parts) = map.get("parts").and_then(Value::as_array) {
                parts
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join("\n")
            } else {
                map.get("text")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            }
        }
        _ => String::new(),
    }
}

fn parse_local_timestamp(raw: &str, tz: &TimezoneConfig) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(tz.to_local(dt.with_timezone(&Utc)));
    }
    LOCAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

fn epoch_to_local(secs: f64, tz: &TimezoneConfig) -> Option<NaiveDateTime> {
    if !secs.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis((secs * 1000.0).round() as i64).map(|dt| tz.to_local(dt))
}

fn title_of(obj: &Map<String, Value>) -> String {
    string_field(obj, "title")
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// Ids may be strings or numbers in the export; numbers keep their JSON text.
fn id_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Non-negative integers, including integral floats such as `3.0`.
fn message_count_of(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return Some(u32::try_from(n).unwrap_or(u32::MAX));
    }
    let f = value.as_f64()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 {
        Some(if f >= u32::MAX as f64 { u32::MAX } else { f as u32 })
    } else {
        None
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Keep ids unique within one export: blank ids get a fresh UUID, repeats get
/// a numeric suffix.
fn unique_id(id: String, seen: &mut HashSet<String>) -> String {
    let base = if id.trim().is_empty() {
        Uuid::new_v4().to_string()
    } else {
        id
    };
    let mut candidate = base.clone();
    let mut n = 2;
    while !seen.insert(candidate.clone()) {
        candidate = format!("{}-{}", base, n);
        n += 1;
    }
    candidate
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
