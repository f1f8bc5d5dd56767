//! Curated word map loaded from the embedded data asset.
//!
//! The asset is a TSV file: one `key<TAB>rendering` pair per line, `#`
//! comments, and a `# version: N` header. It is parsed once on first use and
//! never mutated afterwards.

use std::collections::HashMap;
use std::sync::LazyLock;

use smol_str::SmolStr;

const WORDS_TSV: &str = include_str!("../../data/phonetic_words.tsv");

static BASE: LazyLock<PhoneticDictionary> = LazyLock::new(|| {
    let dict = PhoneticDictionary::parse(WORDS_TSV);
    tracing::debug!(
        entries = dict.len(),
        version = dict.version(),
        "phonetic dictionary loaded"
    );
    dict
});

/// The immutable base dictionary shared by every engine.
pub fn base() -> &'static PhoneticDictionary {
    &BASE
}

/// Read-only map from lowercase romanized words to Devanagari.
#[derive(Debug, Clone, Default)]
pub struct PhoneticDictionary {
    version: u32,
    entries: HashMap<SmolStr, SmolStr>,
}

impl PhoneticDictionary {
    /// Parse the TSV asset format. Malformed lines are skipped.
    pub fn parse(source: &str) -> Self {
        let mut dict = Self::default();
        for (line_no, line) in source.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(comment) = line.strip_prefix('#') {
                if let Some(version) = comment.trim().strip_prefix("version:") {
                    dict.version = version.trim().parse().unwrap_or(0);
                }
                continue;
            }

            let Some((key, rendering)) = line.split_once('\t') else {
                tracing::warn!(line = line_no + 1, "dictionary line without a tab, skipped");
                continue;
            };
            let key = key.trim().to_lowercase();
            let rendering = rendering.trim();
            if key.is_empty() || rendering.is_empty() {
                tracing::warn!(line = line_no + 1, "empty dictionary field, skipped");
                continue;
            }
            dict.entries.insert(SmolStr::new(key), SmolStr::new(rendering));
        }
        dict
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact lookup of an already-lowercased key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(SmolStr::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &SmolStr> {
        self.entries.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        let dict = PhoneticDictionary::parse(
            "# version: 7\n\n# comment\nGhar\tघर\nbroken line\npaani\t पानी \n\tमैं\n",
        );
        assert_eq!(dict.version(), 7);
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get("ghar"), Some("घर"));
        assert_eq!(dict.get("paani"), Some("पानी"));
    }

    #[test]
    fn test_base_asset() {
        let dict = base();
        assert_eq!(dict.version(), 1);
        assert!(dict.len() > 400);
        assert_eq!(dict.get("namaste"), Some("नमस्ते"));
        assert_eq!(dict.get("bhi"), Some("भी"));
        assert_eq!(dict.get("somvar"), Some("सोमवार"));
        assert_eq!(dict.get("khushi"), Some("ख़ुशी"));
    }

    #[test]
    fn test_base_keys_are_lowercase() {
        assert!(base().keys().all(|k| k.as_str() == k.to_lowercase()));
    }
}
