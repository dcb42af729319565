//! Question normalization, dedup hashing, and boundary validation.

use crate::constants::MAX_QUESTION_CHARS;
use crate::errors::{KbError, KbResult};

/// Lowercase, replace punctuation with spaces, collapse whitespace.
///
/// Two phrasings that differ only in case, punctuation, or spacing normalize
/// to the same string. An apostrophe between two letters is dropped, so
/// "don't" stays the single word "dont".
pub fn normalize(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    for (i, &c) in chars.iter().enumerate() {
        if c.is_alphanumeric() || c.is_whitespace() {
            out.extend(c.to_lowercase());
        } else if is_apostrophe(c) && joins_letters(&chars, i) {
            continue;
        } else {
            out.push(' ');
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_apostrophe(c: char) -> bool {
    matches!(c, '\'' | '\u{2019}')
}

fn joins_letters(chars: &[char], i: usize) -> bool {
    let before = i.checked_sub(1).and_then(|j| chars.get(j));
    let after = chars.get(i + 1);
    matches!((before, after), (Some(b), Some(a)) if b.is_alphabetic() && a.is_alphabetic())
}

/// Stable dedup hash of a question: blake3 over the normalized text.
pub fn question_hash(text: &str) -> String {
    blake3::hash(normalize(text).as_bytes()).to_hex().to_string()
}

/// Reject empty or oversized question text before it reaches embedding or scoring.
pub fn validate_question(text: &str) -> KbResult<()> {
    if text.trim().is_empty() {
        return Err(KbError::validation("question text is empty"));
    }
    if normalize(text).is_empty() {
        return Err(KbError::validation("question text has no words"));
    }
    let chars = text.chars().count();
    if chars > MAX_QUESTION_CHARS {
        return Err(KbError::validation(format!(
            "question text is {chars} characters, limit is {MAX_QUESTION_CHARS}"
        )));
    }
    Ok(())
}
