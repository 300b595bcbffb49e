//! Application state: question providers, the player table, config, and the
//! cached "about" text.
//!
//! Content sources are picked once at startup: a tier map of content API
//! endpoints when configured, otherwise the built-in/configured static tables.

use std::{collections::HashMap, sync::Arc};
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::config::{load_game_config_from_env, GameConfig};
use crate::content::{ContentClient, ProjectInfo};
use crate::domain::{MultipleChoiceItem, QuizTier, WordCard, WordTier};
use crate::error::GameError;
use crate::player::Player;
use crate::provider::{ingest_all, ContentSource, QuestionProvider};
use crate::seeds::seed_words;

pub struct AppState {
  pub config: GameConfig,
  pub words: QuestionProvider<WordCard>,
  pub quiz: QuestionProvider<MultipleChoiceItem>,
  pub players: Arc<RwLock<HashMap<String, Player>>>,
  content: Option<ContentClient>,
  about: Mutex<Option<ProjectInfo>>,
}

impl AppState {
  /// Build state from env: load config, pick content sources.
  #[instrument(level = "info", skip_all)]
  pub fn new() -> Self {
    Self::from_config(load_game_config_from_env().unwrap_or_default())
  }

  pub fn from_config(config: GameConfig) -> Self {
    let content = if config.content.has_endpoints() || config.about.endpoint.is_some() {
      match ContentClient::new(config.content.timeout()) {
        Ok(c) => Some(c),
        Err(e) => {
          error!(target: "osteoplay_backend", error = %e, "Content client unavailable; using static tables only");
          None
        }
      }
    } else {
      None
    };

    let word_source = match &content {
      Some(client) if !config.content.word_endpoints.is_empty() => {
        info!(target: "osteoplay_backend", tiers = ?config.content.word_endpoints.keys().collect::<Vec<_>>(), "Word game uses the content API");
        ContentSource::Remote { client: client.clone(), endpoints: config.content.word_endpoints.clone() }
      }
      _ => ContentSource::Static(static_word_table(&config)),
    };

    let quiz_source = match &content {
      Some(client) if !config.content.quiz_endpoints.is_empty() => {
        info!(target: "osteoplay_backend", tiers = ?config.content.quiz_endpoints.keys().collect::<Vec<_>>(), "Quiz uses the content API");
        ContentSource::Remote { client: client.clone(), endpoints: config.content.quiz_endpoints.clone() }
      }
      _ => ContentSource::Static(static_quiz_table(&config)),
    };

    Self {
      words: QuestionProvider::new("words", word_source),
      quiz: QuestionProvider::new("quiz", quiz_source),
      players: Arc::new(RwLock::new(HashMap::new())),
      content,
      about: Mutex::new(None),
      config,
    }
  }

  /// Register a new player on the home screen.
  #[instrument(level = "debug", skip(self))]
  pub async fn create_player(&self) -> String {
    let id = Uuid::new_v4().to_string();
    self.players.write().await.insert(id.clone(), Player::new());
    info!(target: "session", player = %id, "Player created");
    id
  }

  pub async fn remove_player(&self, id: &str) {
    if self.players.write().await.remove(id).is_some() {
      info!(target: "session", player = %id, "Player removed");
    }
  }

  /// Run `f` against a player under the table's write lock.
  pub async fn with_player<R>(
    &self,
    id: &str,
    f: impl FnOnce(&mut Player) -> Result<R, GameError>,
  ) -> Result<R, GameError> {
    let mut players = self.players.write().await;
    let player = players.get_mut(id).ok_or_else(|| GameError::UnknownPlayer(id.to_string()))?;
    f(player)
  }

  /// Project information for the about screen, fetched once and cached.
  /// The lock only guards the cached value; the remote call runs without it,
  /// so two first callers may both fetch.
  #[instrument(level = "info", skip(self))]
  pub async fn project_info(&self) -> Option<ProjectInfo> {
    if let Some(info) = self.about.lock().await.as_ref() {
      return Some(info.clone());
    }
    let (client, url) = match (&self.content, &self.config.about.endpoint) {
      (Some(client), Some(url)) => (client, url),
      _ => return None,
    };
    match client.fetch_project_info(url).await {
      Ok(info) => {
        if info.is_some() {
          *self.about.lock().await = info.clone();
        }
        info
      }
      Err(e) => {
        error!(target: "osteoplay_backend", error = %e, "Project info fetch failed");
        None
      }
    }
  }

  /// Forget cached questions and project information.
  pub async fn clear_caches(&self) {
    self.words.clear_cache().await;
    self.quiz.clear_cache().await;
    *self.about.lock().await = None;
  }
}

impl Default for AppState {
  fn default() -> Self { Self::new() }
}

fn static_word_table(config: &GameConfig) -> HashMap<String, Vec<WordCard>> {
  let builtin: Vec<WordCard> = ingest_all(seed_words());
  let mut table: HashMap<String, Vec<WordCard>> =
    WordTier::ALL.iter().map(|t| (t.as_str().to_string(), builtin.clone())).collect();

  for (i, entry) in config.words.iter().enumerate() {
    let Some(card) = entry.record.clone().clean(builtin.len() + i) else { continue };
    match entry.tier {
      Some(tier) => table.entry(tier.as_str().to_string()).or_default().push(card),
      None => {
        for tier in WordTier::ALL {
          table.entry(tier.as_str().to_string()).or_default().push(card.clone());
        }
      }
    }
  }

  for (tier, cards) in &table {
    info!(target: "osteoplay_backend", %tier, words = cards.len(), "Startup word inventory");
  }
  table
}

fn static_quiz_table(config: &GameConfig) -> HashMap<String, Vec<MultipleChoiceItem>> {
  let mut table: HashMap<String, Vec<MultipleChoiceItem>> = HashMap::new();
  for (i, entry) in config.quiz.iter().enumerate() {
    if let Some(item) = entry.record.clone().clean(i) {
      table.entry(entry.tier.as_str().to_string()).or_default().push(item);
    }
  }
  for tier in [QuizTier::Beginner, QuizTier::Challenging] {
    let count = table.get(tier.as_str()).map_or(0, Vec::len);
    info!(target: "osteoplay_backend", tier = tier.as_str(), questions = count, "Startup quiz inventory");
  }
  table
}
