//! Loading game configuration (session defaults, content endpoints, optional
//! word and quiz banks) from TOML.
//!
//! See `GameConfig` for the expected schema. Every field has a default, so an
//! empty file is valid.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::{QuizTier, RawQuizRecord, RawWordRecord, WordTier};

const DEFAULT_MAX_QUESTIONS: usize = 10;

const QUIZ_BEGINNER_URL: &str = "https://api-osteoplay-vet.netlify.app/api/endpoint/gEb65grRFjRYw8gB4Bgv";
const QUIZ_CHALLENGING_URL: &str = "https://api-osteoplay-vet.netlify.app/api/endpoint/OoCYH3oFPQaiSzuSYlH0";
const PROJECT_INFO_URL: &str = "https://api-osteoplay-vet.netlify.app/api/endpoint/SQdkqBQjK3wzO8rlJbVa";

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GameConfig {
  /// Questions per session when the client does not ask for a count.
  pub max_questions: usize,
  /// Shuffle the question list before capping it.
  pub randomize: bool,
  pub content: ContentConfig,
  pub about: AboutConfig,
  /// Extra static words merged into the built-in table.
  pub words: Vec<WordEntryCfg>,
  /// Static quiz bank, used for tiers without a quiz endpoint.
  pub quiz: Vec<QuizEntryCfg>,
}

impl Default for GameConfig {
  fn default() -> Self {
    Self {
      max_questions: DEFAULT_MAX_QUESTIONS,
      randomize: true,
      content: ContentConfig::default(),
      about: AboutConfig::default(),
      words: Vec::new(),
      quiz: Vec::new(),
    }
  }
}

/// Remote content API. Keys are tier names (`easy`, `beginner`, ...).
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
  pub timeout_secs: u64,
  pub word_endpoints: HashMap<String, String>,
  pub quiz_endpoints: HashMap<String, String>,
}

impl Default for ContentConfig {
  fn default() -> Self {
    Self {
      timeout_secs: 15,
      word_endpoints: HashMap::new(),
      quiz_endpoints: HashMap::from([
        (QuizTier::Beginner.as_str().to_string(), QUIZ_BEGINNER_URL.to_string()),
        (QuizTier::Challenging.as_str().to_string(), QUIZ_CHALLENGING_URL.to_string()),
      ]),
    }
  }
}

impl ContentConfig {
  pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs.max(1)) }

  pub fn has_endpoints(&self) -> bool {
    !self.word_endpoints.is_empty() || !self.quiz_endpoints.is_empty()
  }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AboutConfig {
  pub endpoint: Option<String>,
}

impl Default for AboutConfig {
  fn default() -> Self { Self { endpoint: Some(PROJECT_INFO_URL.to_string()) } }
}

/// Static word entry. Without a tier it is offered in every tier.
#[derive(Clone, Debug, Deserialize)]
pub struct WordEntryCfg {
  #[serde(default)]
  pub tier: Option<WordTier>,
  #[serde(flatten)]
  pub record: RawWordRecord,
}

#[derive(Clone, Debug, Deserialize)]
pub struct QuizEntryCfg {
  pub tier: QuizTier,
  #[serde(flatten)]
  pub record: RawQuizRecord,
}

/// Per-session overrides sent by the client.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOptions {
  #[serde(default)]
  pub max_questions: Option<usize>,
  #[serde(default)]
  pub randomize: Option<bool>,
}

impl GameOptions {
  /// Fill missing values from the config. A zero count falls back too.
  pub fn resolve(&self, cfg: &GameConfig) -> (usize, bool) {
    let fallback = if cfg.max_questions == 0 { DEFAULT_MAX_QUESTIONS } else { cfg.max_questions };
    let max = self.max_questions.filter(|n| *n > 0).unwrap_or(fallback);
    (max, self.randomize.unwrap_or(cfg.randomize))
  }
}

#[cfg(test)]
impl GameConfig {
  /// No endpoints at all: static tables only, nothing touches the network.
  pub fn offline() -> Self {
    Self {
      content: ContentConfig { timeout_secs: 1, word_endpoints: HashMap::new(), quiz_endpoints: HashMap::new() },
      about: AboutConfig { endpoint: None },
      ..Default::default()
    }
  }
}

pub fn parse_game_config(s: &str) -> Result<GameConfig, toml::de::Error> {
  toml::from_str::<GameConfig>(s)
}

/// Attempt to load `GameConfig` from GAME_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_game_config_from_env() -> Option<GameConfig> {
  let path = std::env::var("GAME_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_game_config(&s) {
      Ok(cfg) => {
        info!(target: "osteoplay_backend", %path, words = cfg.words.len(), quiz = cfg.quiz.len(), "Loaded game config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "osteoplay_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "osteoplay_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
