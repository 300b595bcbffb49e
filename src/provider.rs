//! Question provider: loads question records per tier from a static table or
//! the remote content API, keeps a per-tier cache, and selects the subset
//! played in one session.
//!
//! Failures never propagate: an unreachable endpoint or a malformed body is
//! logged and reported as an empty list, which callers treat as "no content".

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

use crate::content::ContentClient;
use crate::domain::{MultipleChoiceItem, RawQuizRecord, RawWordRecord, WordCard};
use crate::error::ContentError;
use crate::rng::{shuffle, IndexSource};

/// A question type that can be built from a raw content record.
pub trait Ingest: Clone + Send + Sync + Sized {
  type Raw: DeserializeOwned + Send;

  /// Clean one raw record; `None` drops it.
  fn ingest(raw: Self::Raw, position: usize) -> Option<Self>;
}

impl Ingest for WordCard {
  type Raw = RawWordRecord;
  fn ingest(raw: RawWordRecord, position: usize) -> Option<Self> { raw.clean(position) }
}

impl Ingest for MultipleChoiceItem {
  type Raw = RawQuizRecord;
  fn ingest(raw: RawQuizRecord, position: usize) -> Option<Self> { raw.clean(position) }
}

/// Clean a batch of raw records, dropping the unusable ones.
pub fn ingest_all<T: Ingest>(raws: Vec<T::Raw>) -> Vec<T> {
  raws.into_iter().enumerate().filter_map(|(i, raw)| T::ingest(raw, i)).collect()
}

/// Per-tier question lists, filled at most once per tier until cleared.
pub struct TierCache<T> {
  inner: RwLock<HashMap<String, Vec<T>>>,
}

impl<T: Clone> TierCache<T> {
  pub fn new() -> Self {
    Self { inner: RwLock::new(HashMap::new()) }
  }

  pub async fn get(&self, tier: &str) -> Option<Vec<T>> {
    self.inner.read().await.get(tier).cloned()
  }

  pub async fn put(&self, tier: &str, items: Vec<T>) {
    self.inner.write().await.insert(tier.to_string(), items);
  }

  pub async fn clear(&self) {
    self.inner.write().await.clear();
  }
}

impl<T: Clone> Default for TierCache<T> {
  fn default() -> Self { Self::new() }
}

/// Where question records come from.
pub enum ContentSource<T> {
  /// Built-in or configured table, already cleaned.
  Static(HashMap<String, Vec<T>>),
  /// Content API, one endpoint URL per tier.
  Remote { client: ContentClient, endpoints: HashMap<String, String> },
}

impl<T: Ingest> ContentSource<T> {
  async fn load(&self, tier: &str) -> Result<Vec<T>, ContentError> {
    match self {
      ContentSource::Static(table) => Ok(table.get(tier).cloned().unwrap_or_default()),
      ContentSource::Remote { client, endpoints } => {
        let url = endpoints.get(tier).ok_or_else(|| ContentError::NoEndpoint(tier.to_string()))?;
        let raws = client.fetch_items::<T::Raw>(url).await?;
        Ok(ingest_all(raws))
      }
    }
  }

  fn kind(&self) -> &'static str {
    match self {
      ContentSource::Static(_) => "static",
      ContentSource::Remote { .. } => "remote",
    }
  }
}

pub struct QuestionProvider<T> {
  name: &'static str,
  source: ContentSource<T>,
  cache: TierCache<T>,
}

impl<T: Ingest> QuestionProvider<T> {
  pub fn new(name: &'static str, source: ContentSource<T>) -> Self {
    Self::with_cache(name, source, TierCache::new())
  }

  pub fn with_cache(name: &'static str, source: ContentSource<T>, cache: TierCache<T>) -> Self {
    Self { name, source, cache }
  }

  /// All records for a tier; empty when the source has none or fails.
  #[instrument(level = "info", skip(self), fields(provider = self.name, source = self.source.kind()))]
  pub async fn fetch(&self, tier: &str) -> Vec<T> {
    if let Some(hit) = self.cache.get(tier).await {
      debug!(target: "osteoplay_backend", provider = self.name, %tier, count = hit.len(), "Question cache hit");
      return hit;
    }

    match self.source.load(tier).await {
      Ok(items) if items.is_empty() => {
        warn!(target: "osteoplay_backend", provider = self.name, %tier, "No questions available");
        items
      }
      Ok(items) => {
        info!(target: "osteoplay_backend", provider = self.name, %tier, count = items.len(), "Questions loaded");
        self.cache.put(tier, items.clone()).await;
        items
      }
      Err(e) => {
        error!(target: "osteoplay_backend", provider = self.name, %tier, error = %e, "Question fetch failed; reporting no content");
        Vec::new()
      }
    }
  }

  pub async fn clear_cache(&self) {
    self.cache.clear().await;
    info!(target: "osteoplay_backend", provider = self.name, "Question cache cleared");
  }
}

/// Optionally shuffle, then keep at most `max_count` records.
/// Fewer records than `max_count` simply makes a shorter session.
pub fn select<T, S: IndexSource + ?Sized>(mut records: Vec<T>, max_count: usize, randomize: bool, rng: &mut S) -> Vec<T> {
  if randomize {
    shuffle(&mut records, rng);
  }
  records.truncate(max_count);
  records
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::rng::testing::Scripted;
  use crate::session::fixtures::card;
  use pretty_assertions::assert_eq;
  use std::time::Duration;

  fn static_provider(words: &[&str]) -> QuestionProvider<WordCard> {
    let table = HashMap::from([("easy".to_string(), words.iter().map(|w| card(w)).collect())]);
    QuestionProvider::new("words", ContentSource::Static(table))
  }

  #[tokio::test]
  async fn static_table_is_served_per_tier() {
    let p = static_provider(&["ATLAS", "SACRO"]);
    assert_eq!(p.fetch("easy").await.len(), 2);
    assert!(p.fetch("hard").await.is_empty());
  }

  #[tokio::test]
  async fn failing_remote_yields_empty_list() {
    let client = ContentClient::new(Duration::from_secs(2)).unwrap();
    let endpoints = HashMap::from([("beginner".to_string(), "http://127.0.0.1:9/".to_string())]);
    let p: QuestionProvider<MultipleChoiceItem> =
      QuestionProvider::new("quiz", ContentSource::Remote { client, endpoints });
    assert!(p.fetch("beginner").await.is_empty());
    assert!(p.fetch("challenging").await.is_empty());
  }

  #[tokio::test]
  async fn injected_cache_wins_until_cleared() {
    let cache = TierCache::new();
    cache.put("easy", vec![card("FEMUR")]).await;
    let table = HashMap::from([("easy".to_string(), vec![card("ATLAS"), card("SACRO")])]);
    let p = QuestionProvider::with_cache("words", ContentSource::Static(table), cache);
    assert_eq!(p.fetch("easy").await, vec![card("FEMUR")]);
    p.clear_cache().await;
    assert_eq!(p.fetch("easy").await.len(), 2);
  }

  #[test]
  fn selection_caps_and_shuffles() {
    let picked = select((0..10).collect(), 3, true, &mut Scripted::new(vec![]));
    assert_eq!(picked, vec![1, 2, 3]);
    let picked = select((0..10).collect(), 3, false, &mut Scripted::new(vec![]));
    assert_eq!(picked, vec![0, 1, 2]);
  }

  #[test]
  fn short_lists_run_short() {
    let picked = select(vec!['a', 'b'], 10, true, &mut Scripted::identity());
    assert_eq!(picked, vec!['a', 'b']);
  }

  #[test]
  fn ingest_drops_bad_records() {
    let raws = vec![
      RawWordRecord { word: "atlas".into(), ..Default::default() },
      RawWordRecord::default(),
      RawWordRecord { word: "tíbia".into(), ..Default::default() },
    ];
    let cards: Vec<WordCard> = ingest_all(raws);
    assert_eq!(cards.iter().map(|c| c.word.as_str()).collect::<Vec<_>>(), vec!["ATLAS", "TÍBIA"]);
    assert_eq!(cards[1].id, "2");
  }
}
