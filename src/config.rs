use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::dataset::{CefrLevel, DatasetSource};
use crate::engine::thresholds::ThresholdTable;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_start_level")]
    pub start_level: CefrLevel,
    #[serde(default)]
    pub part_of_speech: Option<String>,
    #[serde(default)]
    pub dataset_url: Option<String>,
    #[serde(default)]
    pub dataset_path: Option<PathBuf>,
    #[serde(default)]
    pub stories_url: Option<String>,
    #[serde(default)]
    pub stories_path: Option<PathBuf>,
    #[serde(default = "default_cache_max_age_hours")]
    pub cache_max_age_hours: u32,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default)]
    pub game: GameRules,
}

/// Tuning for selection, synthesis, and progression.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRules {
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
    #[serde(default = "default_rolling_window")]
    pub rolling_window: usize,
    #[serde(default = "default_reintroduce_spacing")]
    pub reintroduce_spacing: u32,
    #[serde(default = "default_reintroduce_miss_threshold")]
    pub reintroduce_miss_threshold: u32,
    #[serde(default = "default_true")]
    pub strict_promotion: bool,
    #[serde(default = "default_true")]
    pub clear_queue_on_demotion: bool,
    #[serde(default = "default_true")]
    pub preserve_streak_on_level_change: bool,
    #[serde(default = "default_cloze_probability")]
    pub cloze_probability: f64,
    #[serde(default = "default_streak_milestone")]
    pub streak_milestone: u32,
    #[serde(default = "default_distractor_count")]
    pub distractor_count: usize,
    #[serde(default = "default_stop_words")]
    pub stop_words: Vec<String>,
    #[serde(default = "default_abbreviations")]
    pub abbreviations: Vec<String>,
    #[serde(default)]
    pub thresholds: ThresholdTable,
}

fn default_start_level() -> CefrLevel {
    CefrLevel::A1
}
fn default_cache_max_age_hours() -> u32 {
    24
}
fn default_locale() -> String {
    "en".to_string()
}
fn default_batch_size() -> u32 {
    10
}
fn default_rolling_window() -> usize {
    50
}
fn default_reintroduce_spacing() -> u32 {
    10
}
fn default_reintroduce_miss_threshold() -> u32 {
    10
}
fn default_true() -> bool {
    true
}
fn default_cloze_probability() -> f64 {
    0.5
}
fn default_streak_milestone() -> u32 {
    10
}
fn default_distractor_count() -> usize {
    3
}
fn default_stop_words() -> Vec<String> {
    [
        "og", "i", "på", "er", "å", "som", "det", "den", "de", "til", "av", "for", "med", "at",
        "ikke", "om",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
fn default_abbreviations() -> Vec<String> {
    [
        "Mr.", "Mrs.", "Ms.", "Dr.", "St.", "Prof.", "f.eks.", "bl.a.", "dvs.", "osv.", "ca.",
        "nr.", "kl.", "mht.", "evt.",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            rolling_window: default_rolling_window(),
            reintroduce_spacing: default_reintroduce_spacing(),
            reintroduce_miss_threshold: default_reintroduce_miss_threshold(),
            strict_promotion: true,
            clear_queue_on_demotion: true,
            preserve_streak_on_level_change: true,
            cloze_probability: default_cloze_probability(),
            streak_milestone: default_streak_milestone(),
            distractor_count: default_distractor_count(),
            stop_words: default_stop_words(),
            abbreviations: default_abbreviations(),
            thresholds: ThresholdTable::default(),
        }
    }
}

impl GameRules {
    /// Clamp values that would stall or break the game back to defaults.
    pub fn normalize(&mut self) {
        if self.batch_size == 0 {
            self.batch_size = default_batch_size();
        }
        if self.rolling_window == 0 {
            self.rolling_window = default_rolling_window();
        }
        if self.streak_milestone == 0 {
            self.streak_milestone = default_streak_milestone();
        }
        if self.distractor_count == 0 {
            self.distractor_count = default_distractor_count();
        }
        if !(0.0..=1.0).contains(&self.cloze_probability) {
            log::warn!(
                "cloze_probability {} out of range, using default",
                self.cloze_probability
            );
            self.cloze_probability = default_cloze_probability();
        }
        for word in &mut self.stop_words {
            *word = word.trim().to_lowercase();
        }
        self.thresholds.normalize();
    }

    pub fn is_stop_word(&self, headword: &str) -> bool {
        let headword = headword.trim().to_lowercase();
        self.stop_words.iter().any(|w| *w == headword)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_level: default_start_level(),
            part_of_speech: None,
            dataset_url: None,
            dataset_path: None,
            stories_url: None,
            stories_path: None,
            cache_max_age_hours: default_cache_max_age_hours(),
            locale: default_locale(),
            game: GameRules::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let mut config: Config = toml::from_str(&content)
                .with_context(|| format!("parsing {}", path.display()))?;
            config.normalize();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ordtrener")
            .join("config.toml")
    }

    /// Call after deserialization or CLI overrides.
    pub fn normalize(&mut self) {
        if let Some(pos) = &self.part_of_speech {
            let pos = pos.trim().to_lowercase();
            self.part_of_speech = if pos.is_empty() || pos == "all" {
                None
            } else {
                Some(pos)
            };
        }
        if !["en", "nb"].contains(&self.locale.as_str()) {
            log::warn!("unsupported locale {:?}, using en", self.locale);
            self.locale = default_locale();
        }
        self.game.normalize();
    }

    /// A local file wins over a URL; with neither, the embedded sample is used.
    pub fn dataset_source(&self) -> DatasetSource {
        if let Some(path) = &self.dataset_path {
            DatasetSource::File(path.clone())
        } else if let Some(url) = &self.dataset_url {
            DatasetSource::Url(url.clone())
        } else {
            DatasetSource::Embedded
        }
    }

    pub fn stories_source(&self) -> DatasetSource {
        if let Some(path) = &self.stories_path {
            DatasetSource::File(path.clone())
        } else if let Some(url) = &self.stories_url {
            DatasetSource::Url(url.clone())
        } else {
            DatasetSource::Embedded
        }
    }

    pub fn cache_max_age(&self) -> Duration {
        Duration::hours(i64::from(self.cache_max_age_hours))
    }
}
