use crate::error::ConfigError;
use crate::types::PageKind;
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Top-level application configuration, loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub timezone: TimezoneConfig,
    pub buckets: TimeBuckets,
    pub keywords: KeywordConfig,
    pub story: StoryConfig,
}

impl AppConfig {
    /// Load configuration from default path (~/.config/chat-wrapped/config.toml),
    /// falling back to defaults if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Write current configuration to the default path.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::default_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Default config file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("chat-wrapped")
            .join("config.toml")
    }

    /// Reject configurations the aggregator and sequencer cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timezone.validate()?;
        self.buckets.validate()?;
        self.keywords.validate()?;
        if self.story.pages.is_empty() {
            return Err(ConfigError::Invalid("story.pages must not be empty".into()));
        }
        Ok(())
    }
}

/// How epoch timestamps in an export map onto local wall-clock time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimezoneConfig {
    /// Fixed offset from UTC in minutes. Unset means the system local zone.
    pub utc_offset_minutes: Option<i32>,
}

impl TimezoneConfig {
    pub fn fixed(minutes: i32) -> Self {
        Self {
            utc_offset_minutes: Some(minutes),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self.utc_offset_minutes {
            Some(m) if m.abs() >= 24 * 60 => Err(ConfigError::Invalid(format!(
                "timezone.utc_offset_minutes out of range: {}",
                m
            ))),
            _ => Ok(()),
        }
    }

    /// Convert a UTC instant into local wall-clock time.
    pub fn to_local(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        match self
            .utc_offset_minutes
            .and_then(|m| FixedOffset::east_opt(m * 60))
        {
            Some(offset) => instant.with_timezone(&offset).naive_local(),
            None => instant.with_timezone(&Local).naive_local(),
        }
    }
}

/// Hour boundaries for the four time-of-day buckets.
///
/// `[morning, afternoon)` is morning, `[afternoon, evening)` afternoon,
/// `[evening, night)` evening and everything else night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeBuckets {
    pub morning: u32,
    pub afternoon: u32,
    pub evening: u32,
    pub night: u32,
}

impl Default for TimeBuckets {
    fn default() -> Self {
        Self {
            morning: 5,
            afternoon: 12,
            evening: 17,
            night: 21,
        }
    }
}

impl TimeBuckets {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ordered = self.morning < self.afternoon
            && self.afternoon < self.evening
            && self.evening < self.night
            && self.night < 24;
        if ordered {
            Ok(())
        } else {
            Err(ConfigError::Invalid(format!(
                "buckets must satisfy morning < afternoon < evening < night < 24, got {}/{}/{}/{}",
                self.morning, self.afternoon, self.evening, self.night
            )))
        }
    }
}

/// Keyword tables for sentiment and topic classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    pub swear: Vec<String>,
    pub gratitude: Vec<String>,
    /// Topic label -> keywords that mark a message as being about it.
    pub topics: BTreeMap<String, Vec<String>>,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        let topics = [
            (
                "Coding",
                &[
                    "code", "bug", "function", "compile", "debug", "rust", "python",
                    "javascript", "typescript", "sql", "api", "error",
                ][..],
            ),
            (
                "Writing",
                &["essay", "email", "draft", "rewrite", "proofread", "poem", "story"][..],
            ),
            (
                "Learning",
                &["explain", "learn", "understand", "tutorial", "what is", "how does"][..],
            ),
            (
                "Career",
                &["resume", "interview", "job", "salary", "cover letter"][..],
            ),
            ("Health", &["workout", "exercise", "diet", "sleep", "health"][..]),
            ("Food", &["recipe", "cook", "cooking", "dinner", "meal"][..]),
            ("Travel", &["trip", "travel", "flight", "hotel", "itinerary"][..]),
        ];

        Self {
            swear: to_strings(&[
                "damn", "dammit", "shit", "crap", "fuck", "fucking", "wtf", "hell",
                "bullshit", "bloody",
            ]),
            gratitude: to_strings(&[
                "thanks", "thank you", "thx", "appreciate", "appreciated", "grateful",
                "cheers",
            ]),
            topics: topics
                .iter()
                .map(|(label, words)| (label.to_string(), to_strings(words)))
                .collect(),
        }
    }
}

impl KeywordConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let blank = self
            .swear
            .iter()
            .chain(&self.gratitude)
            .chain(self.topics.values().flatten())
            .any(|k| k.trim().is_empty());
        if blank {
            return Err(ConfigError::Invalid("keywords must not be blank".into()));
        }
        if let Some((label, _)) = self.topics.iter().find(|(_, words)| words.is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "topic '{}' has no keywords",
                label
            )));
        }
        Ok(())
    }
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// Story presentation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryConfig {
    /// Pages in presentation order.
    pub pages: Vec<PageKind>,
    /// What advancing past the last page does.
    pub at_end: EndBehavior,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            pages: PageKind::ALL.to_vec(),
            at_end: EndBehavior::Stop,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndBehavior {
    /// Stay on the last page and report completion.
    #[default]
    Stop,
    /// Wrap around to the first page.
    Loop,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    #[test]
    fn test_default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[buckets]"));
        assert!(toml_str.contains("thank you"));
        assert!(toml_str.contains("welcome"));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.buckets, config.buckets);
        assert_eq!(parsed.story.pages, config.story.pages);
        assert_eq!(parsed.keywords.topics, config.keywords.topics);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let parsed: AppConfig = toml::from_str("[buckets]\nnight = 22\n").unwrap();
        assert_eq!(parsed.buckets.night, 22);
        assert_eq!(parsed.buckets.morning, 5);
        assert_eq!(parsed.story.at_end, EndBehavior::Stop);
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_unordered_buckets_rejected() {
        let mut config = AppConfig::default();
        config.buckets.afternoon = 4;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.buckets = TimeBuckets {
            morning: 5,
            afternoon: 12,
            evening: 17,
            night: 24,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_story_and_blank_keyword_rejected() {
        let mut config = AppConfig::default();
        config.story.pages.clear();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.keywords.gratitude.push("  ".into());
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.keywords.topics.insert("Empty".into(), Vec::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[timezone]\nutc_offset_minutes = 60\n\n[story]\nat_end = \"loop\"\npages = [\"welcome\", \"summary_stats\"]\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.timezone.utc_offset_minutes, Some(60));
        assert_eq!(config.story.at_end, EndBehavior::Loop);
        assert_eq!(
            config.story.pages,
            vec![PageKind::Welcome, PageKind::SummaryStats]
        );
    }

    #[test]
    fn test_load_from_rejects_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[timezone]\nutc_offset_minutes = 5000\n").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_save_to_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        AppConfig::default().save_to(&path).unwrap();
        let reloaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(reloaded.buckets, TimeBuckets::default());
    }

    #[test]
    fn test_fixed_offset_to_local() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 1, 23, 30, 0).unwrap();
        let local = TimezoneConfig::fixed(120).to_local(instant);
        let expected = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(1, 30, 0)
            .unwrap();
        assert_eq!(local, expected);

        let local = TimezoneConfig::fixed(-300).to_local(instant);
        assert_eq!(local.time().to_string(), "18:30:00");
    }
}
