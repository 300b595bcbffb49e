//! End-of-session aggregation: percentage, feedback buckets, winner state,
//! the quiz review list and the shareable score link.
//!
//! The two games disagree on what counts as winning: the word
//! game wants a perfect score, the quiz is won from 70% up.

use serde::Serialize;

use crate::domain::{OptionKey, QuizRoundResult, WordRoundResult};

/// Total assumed when a score arrives through a share link.
pub const SHARED_RESULT_TOTAL: u32 = 10;

/// Query parameter carrying a shared score.
pub const SHARE_PARAM: &str = "result";

pub fn percentage(score: u32, total: u32) -> f64 {
  if total == 0 { 0.0 } else { 100.0 * f64::from(score) / f64::from(total) }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Feedback {
  pub message: &'static str,
  pub tips: &'static [&'static str],
}

/// Word-game feedback, stepped at 100 / 70 / 40.
pub fn word_feedback(percentage: f64) -> Feedback {
  if percentage >= 100.0 {
    Feedback {
      message: "Lendário! Anatomia dominada.",
      tips: &["Você está pronto para exames práticos!", "Considere ser monitor da disciplina."],
    }
  } else if percentage >= 70.0 {
    Feedback {
      message: "Mandou muito bem!",
      tips: &["Revise apenas os detalhes que errou.", "Tente o modo difícil na próxima."],
    }
  } else if percentage >= 40.0 {
    Feedback {
      message: "Bom começo, continue estudando.",
      tips: &["Foque nos nomes dos ossos principais.", "Use flashcards para memorização."],
    }
  } else {
    Feedback {
      message: "Não desanime, a prática leva à perfeição.",
      tips: &["Revisite o atlas de anatomia.", "Comece pelos ossos dos membros."],
    }
  }
}

/// Quiz banner message, stepped at 100 / 70 / 50.
pub fn quiz_message(percentage: f64) -> &'static str {
  if percentage >= 100.0 {
    "Perfeito! Você dominou o conteúdo!"
  } else if percentage >= 70.0 {
    "Excelente trabalho!"
  } else if percentage >= 50.0 {
    "Bom desempenho, continue estudando!"
  } else {
    "Continue praticando, você vai melhorar!"
  }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordResultSummary {
  pub score: u32,
  pub total: u32,
  pub percentage: f64,
  pub is_winner: bool,
  /// Three-star display: one star per point, capped at three.
  pub stars: u32,
  pub feedback: Feedback,
  pub results: Vec<WordRoundResult>,
  /// Query string that re-opens this result, e.g. `result=7`.
  pub share_query: String,
}

impl WordResultSummary {
  pub fn new(score: u32, total: u32, results: Vec<WordRoundResult>) -> Self {
    let pct = percentage(score, total);
    Self {
      score,
      total,
      percentage: pct,
      is_winner: score == total,
      stars: score.min(3),
      feedback: word_feedback(pct),
      results,
      share_query: share_query(score),
    }
  }

  /// Result re-hydrated from a share link: no per-round detail.
  pub fn shared(score: u32) -> Self {
    Self::new(score, SHARED_RESULT_TOTAL, Vec::new())
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEntry {
  pub id: String,
  pub prompt: String,
  pub correct_key: OptionKey,
  pub correct_text: String,
  pub user_key: Option<OptionKey>,
  pub user_text: Option<String>,
  pub is_correct: bool,
  pub skipped: bool,
}

impl From<&QuizRoundResult> for ReviewEntry {
  fn from(r: &QuizRoundResult) -> Self {
    Self {
      id: r.item.id.clone(),
      prompt: r.item.prompt.clone(),
      correct_key: r.correct_answer,
      correct_text: r.item.option_text(r.correct_answer).to_string(),
      user_key: r.user_answer,
      user_text: r.user_answer.map(|k| r.item.option_text(k).to_string()),
      is_correct: r.is_correct,
      skipped: r.user_answer.is_none(),
    }
  }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResultSummary {
  pub score: u32,
  pub total: u32,
  pub percentage: f64,
  pub is_winner: bool,
  pub message: &'static str,
  pub review: Vec<ReviewEntry>,
}

impl QuizResultSummary {
  pub fn new(score: u32, total: u32, results: &[QuizRoundResult]) -> Self {
    let pct = percentage(score, total);
    Self {
      score,
      total,
      percentage: pct,
      is_winner: pct >= 70.0,
      message: quiz_message(pct),
      review: results.iter().map(ReviewEntry::from).collect(),
    }
  }
}

pub fn share_query(score: u32) -> String {
  format!("{SHARE_PARAM}={score}")
}

/// Parse a shared score. Anything that is not a whole number between 0 and
/// the implied total is rejected.
pub fn decode_shared_score(param: &str) -> Option<u32> {
  param.trim().parse::<u32>().ok().filter(|s| *s <= SHARED_RESULT_TOTAL)
}
