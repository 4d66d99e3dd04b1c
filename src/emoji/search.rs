//! Multi-token ranked emoji search
//!
//! Every query token must match (logical AND). A token matches a record when
//! the record's search blob contains `",token"`, i.e. the token is a prefix of
//! one of the record's words. Earlier matches score lower (better); a token
//! equal to the id or the bare shortcode scores zero.

use std::collections::HashMap;

use super::data::{EmojiDataMap, EmojiRecord};

/// Result cap used by the picker
pub const DEFAULT_MAX_RESULTS: usize = 90;

/// Lower-case, split on whitespace and commas, and deduplicate.
///
/// A hyphen directly after a letter separates words, so `"party-parrot"`
/// searches for `party` and `parrot` while `"-1"` and `"1-2"` are kept.
pub fn normalize_query(query: &str) -> Vec<String> {
    let mut spaced = String::with_capacity(query.len());
    let mut prev: Option<char> = None;
    for ch in query.to_lowercase().chars() {
        if ch == '-' && prev.is_some_and(|p| p.is_alphabetic()) {
            spaced.push(' ');
        } else {
            spaced.push(ch);
        }
        prev = Some(ch);
    }

    let mut tokens: Vec<String> = Vec::new();
    for token in spaced.split(|c: char| c.is_whitespace() || c == ',') {
        if !token.is_empty() && !tokens.iter().any(|t| t == token) {
            tokens.push(token.to_string());
        }
    }
    tokens
}

/// Search the data map, returning at most `max_results` records
pub fn search<'a>(map: &'a EmojiDataMap, query: &str, max_results: usize) -> Vec<&'a EmojiRecord> {
    let tokens = normalize_query(query);
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut pool: Vec<&EmojiRecord> = map.records().collect();
    let mut scores: HashMap<&str, usize> = HashMap::new();

    for token in &tokens {
        let needle = format!(",{}", token);
        pool.retain(|&record| match record.search_blob.find(&needle) {
            Some(index) => {
                let exact = record.id == *token || record.bare_shortcode() == token.as_str();
                let score = if exact { 0 } else { index + 1 };
                *scores.entry(record.id.as_str()).or_insert(0) += score;
                true
            }
            None => false,
        });

        if pool.is_empty() {
            break;
        }
    }

    if pool.len() < 2 {
        return pool;
    }

    pool.sort_by(|a, b| {
        let score_a = scores.get(a.id.as_str()).copied().unwrap_or(0);
        let score_b = scores.get(b.id.as_str()).copied().unwrap_or(0);
        score_a.cmp(&score_b).then_with(|| a.id.cmp(&b.id))
    });
    pool.truncate(max_results);

    tracing::trace!("Search {:?} matched {} emojis", tokens, pool.len());
    pool
}
