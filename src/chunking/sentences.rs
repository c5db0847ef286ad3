//! Text normalization and sentence segmentation.

use regex::Regex;
use std::sync::OnceLock;

fn missing_space_after_period() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.(\p{Lu})").expect("static regex"))
}

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Collapse whitespace runs and put a space after periods glued to the next sentence.
///
/// Only a period directly followed by an uppercase letter is treated as a
/// missing space, so `3.5`, `e.g` and URLs survive.
pub fn normalize(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    missing_space_after_period()
        .replace_all(&collapsed, ". ${1}")
        .into_owned()
}

/// Split normalized text into sentences.
///
/// A boundary is a run of `.`, `!` or `?` followed by whitespace or the end
/// of the text. A trailing fragment without terminal punctuation gets a period.
pub fn split_sentences(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        current.push(c);
        i += 1;

        if !is_terminal(c) {
            continue;
        }
        while i < chars.len() && is_terminal(chars[i]) {
            current.push(chars[i]);
            i += 1;
        }
        if i >= chars.len() || chars[i].is_whitespace() {
            let sentence = current.trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            current.clear();
        }
    }

    let tail = current.trim();
    if !tail.is_empty() {
        let mut sentence = tail.to_string();
        if !sentence.ends_with(is_terminal) {
            sentence.push('.');
        }
        sentences.push(sentence);
    }

    sentences
}

/// Break a sentence longer than `max_chars` at word boundaries.
///
/// Words longer than `max_chars` are cut at character boundaries.
pub fn split_oversized(sentence: &str, max_chars: usize) -> Vec<String> {
    if sentence.chars().count() <= max_chars {
        return vec![sentence.to_string()];
    }

    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in sentence.split(' ') {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > max_chars {
            if !current.is_empty() {
                pieces.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(max_chars);
            pieces.push(word.into_iter().collect());
            word = rest;
        }
        if word.is_empty() {
            continue;
        }

        let word: String = word.into_iter().collect();
        let word_len = word.chars().count();
        if current.is_empty() {
            current = word;
            current_len = word_len;
        } else if current_len + 1 + word_len > max_chars {
            pieces.push(std::mem::replace(&mut current, word));
            current_len = word_len;
        } else {
            current.push(' ');
            current.push_str(&word);
            current_len += 1 + word_len;
        }
    }

    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}
