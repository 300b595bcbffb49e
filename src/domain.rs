//! Domain models: word puzzles and their masks, multiple-choice items,
//! difficulty tiers, per-round results and the raw records served by the
//! content sources.

use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ParseOptionKeyError;

/// Hint shown when a word record arrives without one.
pub const MISSING_HINT: &str = "Sem dica disponível.";

/// One position of a masked word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "char", rename_all = "snake_case")]
pub enum Cell {
  /// Always visible, never editable.
  Fixed(char),
  /// Editable, starts empty.
  Blank,
}

/// Per-character visibility pattern of a word. One cell per `char` of the word.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Mask(Vec<Cell>);

impl Mask {
  pub fn new(cells: Vec<Cell>) -> Self { Self(cells) }

  pub fn cells(&self) -> &[Cell] { &self.0 }

  pub fn is_blank(&self, index: usize) -> bool {
    matches!(self.0.get(index), Some(Cell::Blank))
  }

  pub fn blank_count(&self) -> usize {
    self.0.iter().filter(|c| matches!(c, Cell::Blank)).count()
  }

  /// Fixed cells that hold a visible letter (separators excluded).
  pub fn visible_letter_count(&self) -> usize {
    self.0.iter().filter(|c| matches!(c, Cell::Fixed(ch) if ch.is_alphabetic())).count()
  }

  /// Space-separated rendering with `_` for blanks, e.g. `F _ M _ R`.
  pub fn render(&self) -> String {
    self.0
      .iter()
      .map(|c| match c {
        Cell::Fixed(ch) => ch.to_string(),
        Cell::Blank => "_".to_string(),
      })
      .collect::<Vec<_>>()
      .join(" ")
  }
}

/// How many letters of a word the masking engine hides.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HidePolicy {
  /// Hide this many letters, always leaving at least one visible.
  Count(usize),
  /// Hide every non-whitespace character.
  All,
}

/// Difficulty of the fill-in-the-blank word game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordTier {
  #[serde(alias = "beginner")]
  Easy,
  #[default]
  Normal,
  #[serde(alias = "challenging")]
  Hard,
}

impl WordTier {
  pub const ALL: [WordTier; 3] = [WordTier::Easy, WordTier::Normal, WordTier::Hard];

  pub fn as_str(self) -> &'static str {
    match self {
      WordTier::Easy => "easy",
      WordTier::Normal => "normal",
      WordTier::Hard => "hard",
    }
  }

  pub fn hide_policy(self) -> HidePolicy {
    match self {
      WordTier::Easy => HidePolicy::Count(2),
      WordTier::Normal => HidePolicy::Count(3),
      WordTier::Hard => HidePolicy::All,
    }
  }
}

/// Question bank of the multiple-choice quiz.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizTier {
  #[default]
  Beginner,
  Challenging,
}

impl QuizTier {
  pub fn as_str(self) -> &'static str {
    match self {
      QuizTier::Beginner => "beginner",
      QuizTier::Challenging => "challenging",
    }
  }
}

/// Cleaned word record, ready to be masked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WordCard {
  pub id: String,
  /// Uppercase answer.
  pub word: String,
  pub hint: String,
  /// URL, path or `data:` URI. Display only.
  pub image: Option<String>,
}

/// One round of the word game: the card plus the blank layout drawn for it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WordPuzzle {
  pub id: String,
  pub word: String,
  pub hint: String,
  pub image: Option<String>,
  pub mask: Mask,
}

impl WordPuzzle {
  pub fn new(card: WordCard, mask: Mask) -> Self {
    Self { id: card.id, word: card.word, hint: card.hint, image: card.image, mask }
  }
}

/// Letter of a quiz alternative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum OptionKey {
  A,
  B,
  C,
  D,
  E,
}

impl OptionKey {
  pub const ALL: [OptionKey; 5] = [OptionKey::A, OptionKey::B, OptionKey::C, OptionKey::D, OptionKey::E];

  pub fn index(self) -> usize {
    match self {
      OptionKey::A => 0,
      OptionKey::B => 1,
      OptionKey::C => 2,
      OptionKey::D => 3,
      OptionKey::E => 4,
    }
  }

  /// Parse `a`..`e`, case-insensitive, surrounding whitespace ignored.
  pub fn parse(letter: &str) -> Result<Self, ParseOptionKeyError> {
    match letter.trim().to_ascii_lowercase().as_str() {
      "a" => Ok(OptionKey::A),
      "b" => Ok(OptionKey::B),
      "c" => Ok(OptionKey::C),
      "d" => Ok(OptionKey::D),
      "e" => Ok(OptionKey::E),
      _ => Err(ParseOptionKeyError(letter.to_string())),
    }
  }
}

impl TryFrom<String> for OptionKey {
  type Error = ParseOptionKeyError;
  fn try_from(value: String) -> Result<Self, Self::Error> { OptionKey::parse(&value) }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuizOption {
  pub key: OptionKey,
  pub text: String,
}

/// Multiple-choice question with exactly five alternatives, stored in key order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MultipleChoiceItem {
  pub id: String,
  pub prompt: String,
  pub options: [QuizOption; 5],
  pub correct: OptionKey,
}

impl MultipleChoiceItem {
  pub fn option_text(&self, key: OptionKey) -> &str {
    &self.options[key.index()].text
  }
}

/// Outcome of one word-game round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordRoundResult {
  pub puzzle: WordPuzzle,
  /// `None` when the round was skipped.
  pub user_answer: Option<String>,
  pub correct_answer: String,
  pub is_correct: bool,
}

/// Outcome of one quiz round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizRoundResult {
  pub item: MultipleChoiceItem,
  /// `None` when the question was skipped.
  pub user_answer: Option<OptionKey>,
  pub correct_answer: OptionKey,
  pub is_correct: bool,
}

/// Word record as served by the content API or the static table.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawWordRecord {
  #[serde(default)]
  pub id: Option<String>,
  #[serde(default, alias = "name", alias = "palavra")]
  pub word: String,
  #[serde(default, alias = "dica")]
  pub hint: Option<String>,
  #[serde(default, alias = "imagem")]
  pub image: Option<String>,
}

impl RawWordRecord {
  /// Uppercase and trim the word, fill defaults. Words without a single
  /// letter have nothing to hide and are dropped.
  pub fn clean(self, position: usize) -> Option<WordCard> {
    let word = self.word.trim().to_uppercase();
    if !word.chars().any(char::is_alphabetic) {
      warn!(target: "osteoplay_backend", position, "Dropping word record without a word");
      return None;
    }
    let hint = self
      .hint
      .map(|h| h.trim().to_string())
      .filter(|h| !h.is_empty())
      .unwrap_or_else(|| MISSING_HINT.to_string());
    Some(WordCard {
      id: self.id.unwrap_or_else(|| position.to_string()),
      word,
      hint,
      image: clean_image(self.image),
    })
  }
}

/// Keep URLs, paths and data URIs; wrap bare base64 blobs into a data URI.
fn clean_image(image: Option<String>) -> Option<String> {
  let image = image?.trim().to_string();
  if image.is_empty() {
    return None;
  }
  let is_reference = image.starts_with("http://")
    || image.starts_with("https://")
    || image.starts_with("data:")
    || image.starts_with('/')
    || image.contains('.');
  if is_reference {
    return Some(image);
  }
  match base64::engine::general_purpose::STANDARD.decode(image.as_bytes()) {
    Ok(_) => Some(format!("data:image/png;base64,{image}")),
    Err(e) => {
      warn!(target: "osteoplay_backend", error = %e, "Dropping unusable image reference");
      None
    }
  }
}

/// Quiz record as served by the content API. Accepts both the API's field
/// names (`pergunta`, `op_a`, `op_correta`) and English ones.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawQuizRecord {
  #[serde(default)]
  pub id: Option<String>,
  #[serde(default, alias = "pergunta")]
  pub prompt: String,
  #[serde(default, alias = "op_a")]
  pub option_a: String,
  #[serde(default, alias = "op_b")]
  pub option_b: String,
  #[serde(default, alias = "op_c")]
  pub option_c: String,
  #[serde(default, alias = "op_d")]
  pub option_d: String,
  #[serde(default, alias = "op_e")]
  pub option_e: String,
  #[serde(default, alias = "op_correta")]
  pub correct_option: String,
}

impl RawQuizRecord {
  /// Lower-case the correct letter and build the option table.
  /// Records with an unusable correct letter are dropped.
  pub fn clean(self, position: usize) -> Option<MultipleChoiceItem> {
    let id = self.id.unwrap_or_else(|| position.to_string());
    let correct = match OptionKey::parse(&self.correct_option) {
      Ok(k) => k,
      Err(e) => {
        warn!(target: "osteoplay_backend", %id, error = %e, "Dropping quiz record");
        return None;
      }
    };
    let texts = [self.option_a, self.option_b, self.option_c, self.option_d, self.option_e];
    let options = OptionKey::ALL.map(|key| QuizOption { key, text: texts[key.index()].trim().to_string() });
    Some(MultipleChoiceItem { id, prompt: self.prompt.trim().to_string(), options, correct })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn mask_renders_blanks_as_underscores() {
    let mask = Mask::new(vec![
      Cell::Fixed('F'),
      Cell::Blank,
      Cell::Fixed('M'),
      Cell::Blank,
      Cell::Fixed('R'),
    ]);
    assert_eq!(mask.render(), "F _ M _ R");
    assert_eq!(mask.blank_count(), 2);
    assert_eq!(mask.visible_letter_count(), 3);
    assert!(mask.is_blank(1));
    assert!(!mask.is_blank(0));
    assert!(!mask.is_blank(99));
  }

  #[test]
  fn word_record_accepts_portuguese_field_names() {
    let raw: RawWordRecord = serde_json::from_str(
      r#"{"palavra": " Fêmur ", "dica": "Maior osso do corpo.", "imagem": "/questoes/IMG_4526.PNG"}"#,
    )
    .unwrap();
    let card = raw.clean(3).unwrap();
    assert_eq!(card.id, "3");
    assert_eq!(card.word, "FÊMUR");
    assert_eq!(card.hint, "Maior osso do corpo.");
    assert_eq!(card.image.as_deref(), Some("/questoes/IMG_4526.PNG"));
  }

  #[test]
  fn word_record_defaults_missing_hint_and_image() {
    let raw: RawWordRecord = serde_json::from_str(r#"{"name": "atlas"}"#).unwrap();
    let card = raw.clean(0).unwrap();
    assert_eq!(card.hint, MISSING_HINT);
    assert_eq!(card.image, None);
  }

  #[test]
  fn blank_word_is_dropped() {
    let raw = RawWordRecord { word: "   ".into(), ..Default::default() };
    assert!(raw.clean(0).is_none());
  }

  #[test]
  fn word_without_letters_is_dropped() {
    let raw = RawWordRecord { word: " - 42 ".into(), ..Default::default() };
    assert!(raw.clean(0).is_none());
  }

  #[test]
  fn bare_base64_image_becomes_data_uri() {
    let raw = RawWordRecord { word: "sacro".into(), image: Some("aGVsbG8=".into()), ..Default::default() };
    let card = raw.clean(0).unwrap();
    assert_eq!(card.image.as_deref(), Some("data:image/png;base64,aGVsbG8="));

    let raw = RawWordRecord { word: "sacro".into(), image: Some("not base64!".into()), ..Default::default() };
    assert_eq!(raw.clean(0).unwrap().image, None);
  }

  #[test]
  fn quiz_record_lowercases_correct_letter() {
    let raw: RawQuizRecord = serde_json::from_str(
      r#"{"id":"q1","pergunta":"Qual o maior osso?","op_a":"Fêmur","op_b":"Tíbia","op_c":"Úmero","op_d":"Atlas","op_e":"Sacro","op_correta":"A"}"#,
    )
    .unwrap();
    let item = raw.clean(0).unwrap();
    assert_eq!(item.id, "q1");
    assert_eq!(item.correct, OptionKey::A);
    assert_eq!(item.option_text(OptionKey::C), "Úmero");
    assert_eq!(item.options[4].key, OptionKey::E);
  }

  #[test]
  fn quiz_record_with_bad_letter_is_dropped() {
    let raw = RawQuizRecord { prompt: "?".into(), correct_option: "f".into(), ..Default::default() };
    assert!(raw.clean(0).is_none());
  }

  #[test]
  fn option_key_deserializes_case_insensitively() {
    let key: OptionKey = serde_json::from_str(r#""C""#).unwrap();
    assert_eq!(key, OptionKey::C);
    assert!(serde_json::from_str::<OptionKey>(r#""z""#).is_err());
    assert_eq!(serde_json::to_string(&OptionKey::D).unwrap(), r#""d""#);
  }

  #[test]
  fn tier_aliases_map_to_word_tiers() {
    let t: WordTier = serde_json::from_str(r#""beginner""#).unwrap();
    assert_eq!(t, WordTier::Easy);
    let t: WordTier = serde_json::from_str(r#""challenging""#).unwrap();
    assert_eq!(t, WordTier::Hard);
    assert_eq!(WordTier::Normal.hide_policy(), HidePolicy::Count(3));
  }
}
