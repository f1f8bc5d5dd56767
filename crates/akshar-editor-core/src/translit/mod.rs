//! Romanized Hindi to Devanagari, one word at a time.
//!
//! Resolution order:
//! 1. runtime overlay (entries added with [`Transliterator::add_mapping`])
//! 2. the curated base dictionary
//! 3. the ITRANS generator, followed by word-final vowel corrections
//!
//! Lookups in the first two tiers are case-insensitive. Anything the
//! generator cannot handle is echoed back unchanged.

pub mod dictionary;
pub mod itrans;

use std::collections::{BTreeSet, HashMap};

use smol_str::SmolStr;

pub use dictionary::PhoneticDictionary;

const SIGN_AA: char = 'ा';
const SIGN_I: char = 'ि';
const SIGN_II: char = 'ी';
const SIGN_U: char = 'ु';
const SIGN_UU: char = 'ू';

/// Two-tier word resolver with a mutable overlay on top of the base map.
#[derive(Debug, Clone, Default)]
pub struct Transliterator {
    overlay: HashMap<SmolStr, SmolStr>,
}

impl Transliterator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Best-effort Devanagari rendering of `word`.
    ///
    /// Never fails: generator errors fall back to returning `word` as-is.
    pub fn transliterate(&self, word: &str) -> String {
        if word.is_empty() {
            return String::new();
        }
        if let Some(hit) = self.lookup(word) {
            tracing::trace!(word, "dictionary hit");
            return hit.to_string();
        }

        let lower = word.to_lowercase();
        if lower.len() <= 2 && lower.chars().all(|c| c == 'e') {
            return "ए".to_string();
        }

        match itrans::to_devanagari(generator_input(word, &lower)) {
            Ok(generated) => correct_final_vowel(&lower, generated),
            Err(err) => {
                tracing::trace!(word, error = %err, "generator declined, echoing input");
                word.to_string()
            }
        }
    }

    /// Dictionary-only lookup: overlay first, then the base map.
    pub fn lookup(&self, word: &str) -> Option<&str> {
        let key = word.to_lowercase();
        self.overlay
            .get(key.as_str())
            .map(SmolStr::as_str)
            .or_else(|| dictionary::base().get(&key))
    }

    /// Insert or overwrite an overlay entry. The key is stored lowercased.
    ///
    /// Blank keys or renderings are ignored.
    pub fn add_mapping(&mut self, source: &str, rendered: &str) {
        let key = source.trim().to_lowercase();
        let rendered = rendered.trim();
        if key.is_empty() || rendered.is_empty() {
            tracing::debug!(source, "ignoring blank phonetic mapping");
            return;
        }
        tracing::debug!(key = %key, rendered, "phonetic mapping added");
        self.overlay.insert(SmolStr::new(key), SmolStr::new(rendered));
    }

    /// Every known source key, base and overlay, sorted and deduplicated.
    pub fn list_mappings(&self) -> Vec<SmolStr> {
        dictionary::base()
            .keys()
            .chain(self.overlay.keys())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn dictionary_version(&self) -> u32 {
        dictionary::base().version()
    }
}

/// A capital after the first letter means deliberate ITRANS notation
/// (`T`, `Sh`, `M`...), so the word goes through as typed. Otherwise a
/// sentence-initial capital is just case.
fn generator_input<'a>(word: &'a str, lower: &'a str) -> &'a str {
    if word.chars().skip(1).any(|c| c.is_uppercase()) {
        word
    } else {
        lower
    }
}

fn correct_final_vowel(lower: &str, mut out: String) -> String {
    if lower.ends_with('a') {
        if !out.ends_with([SIGN_AA, 'अ', 'आ']) {
            out.push(SIGN_AA);
        }
    } else if lower.ends_with('i') {
        if out.ends_with(SIGN_I) {
            out.pop();
            out.push(SIGN_II);
        }
    } else if lower.ends_with('u') && out.ends_with(SIGN_U) {
        out.pop();
        out.push(SIGN_UU);
    }
    out
}
