use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Splits a comma-separated ID list, dropping empty segments.
pub fn parse_id_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Removes parenthesized substrings and the whitespace around them.
///
/// `"Song (Live)"` becomes `"Song"`. An unmatched `(` leaves the rest of the
/// title untouched.
pub fn strip_parenthetical(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut rest = title;

    while let Some(open) = rest.find('(') {
        match rest[open..].find(')') {
            Some(close) => {
                out.push_str(rest[..open].trim_end());
                rest = rest[open + close + 1..].trim_start();
            }
            None => break,
        }
    }

    out.push_str(rest);
    out
}

/// Builds a playlist name from two track titles.
///
/// Both titles are cleaned of parentheticals independently, then joined with
/// a single space. The result is a heuristic name, not guaranteed unique.
pub fn derive_playlist_name(first_title: &str, second_title: &str) -> String {
    format!(
        "{} {}",
        strip_parenthetical(first_title),
        strip_parenthetical(second_title)
    )
}
