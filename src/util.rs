//! Small utility helpers used across modules.

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Canonical form used to compare a guess with the answer: uppercase,
/// canonically decomposed, combining marks removed. `Fêmur` and `FEMUR`
/// normalize to the same string.
pub fn normalize_answer(s: &str) -> String {
  s.to_uppercase().nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge response payloads.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  match s.char_indices().nth(max) {
    None => s.to_string(),
    Some((cut, _)) => format!("{}… ({} bytes total)", &s[..cut], s.len()),
  }
}
