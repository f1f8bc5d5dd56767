//! ITRANS-style romanization to Devanagari.
//!
//! Longest-match tokenization over a fixed table. A consonant followed by
//! another consonant, punctuation or the end of the word carries a virama;
//! a following vowel becomes its dependent sign (`a` is inherent).

use crate::error::TransliterationError;

const VIRAMA: char = '\u{094D}';

/// Longest token in any table.
const MAX_TOKEN_LEN: usize = 3;

/// `(romanization, independent form, dependent sign)`.
const VOWELS: &[(&str, &str, &str)] = &[
    ("a", "अ", ""),
    ("aa", "आ", "ा"),
    ("A", "आ", "ा"),
    ("i", "इ", "ि"),
    ("ii", "ई", "ी"),
    ("I", "ई", "ी"),
    ("ee", "ई", "ी"),
    ("u", "उ", "ु"),
    ("uu", "ऊ", "ू"),
    ("U", "ऊ", "ू"),
    ("oo", "ऊ", "ू"),
    ("RRi", "ऋ", "ृ"),
    ("R^i", "ऋ", "ृ"),
    ("e", "ए", "े"),
    ("ai", "ऐ", "ै"),
    ("o", "ओ", "ो"),
    ("au", "औ", "ौ"),
];

const CONSONANTS: &[(&str, &str)] = &[
    ("k", "क"),
    ("c", "क"),
    ("kh", "ख"),
    ("g", "ग"),
    ("gh", "घ"),
    ("~N", "ङ"),
    ("ch", "च"),
    ("Ch", "छ"),
    ("chh", "छ"),
    ("j", "ज"),
    ("jh", "झ"),
    ("~n", "ञ"),
    ("T", "ट"),
    ("Th", "ठ"),
    ("D", "ड"),
    ("Dh", "ढ"),
    ("N", "ण"),
    ("t", "त"),
    ("th", "थ"),
    ("d", "द"),
    ("dh", "ध"),
    ("n", "न"),
    ("p", "प"),
    ("ph", "फ"),
    ("b", "ब"),
    ("bh", "भ"),
    ("m", "म"),
    ("y", "य"),
    ("r", "र"),
    ("l", "ल"),
    ("L", "ळ"),
    ("v", "व"),
    ("w", "व"),
    ("sh", "श"),
    ("Sh", "ष"),
    ("shh", "ष"),
    ("s", "स"),
    ("h", "ह"),
    // Conjunct shortcuts.
    ("x", "क्ष"),
    ("kSh", "क्ष"),
    ("ksh", "क्ष"),
    ("GY", "ज्ञ"),
    ("j~n", "ज्ञ"),
    // Nukta consonants.
    ("q", "क\u{093C}"),
    ("K", "ख\u{093C}"),
    ("G", "ग\u{093C}"),
    ("z", "ज\u{093C}"),
    ("f", "फ\u{093C}"),
    (".D", "ड\u{093C}"),
    (".Dh", "ढ\u{093C}"),
];

/// Signs that attach to the preceding syllable (or stand alone).
const MARKS: &[(&str, &str)] = &[
    ("M", "ं"),
    (".n", "ं"),
    (".N", "ँ"),
    ("H", "ः"),
    (".a", "ऽ"),
    ("OM", "ॐ"),
    ("AUM", "ॐ"),
    ("|", "।"),
    ("||", "॥"),
];

#[derive(Debug, Clone, Copy)]
enum Token {
    Vowel {
        independent: &'static str,
        sign: &'static str,
    },
    Consonant(&'static str),
    Mark(&'static str),
    Other(char),
}

fn lookup(candidate: &str) -> Option<Token> {
    if let Some((_, independent, sign)) = VOWELS.iter().find(|(k, _, _)| *k == candidate) {
        return Some(Token::Vowel { independent, sign });
    }
    if let Some((_, c)) = CONSONANTS.iter().find(|(k, _)| *k == candidate) {
        return Some(Token::Consonant(c));
    }
    MARKS
        .iter()
        .find(|(k, _)| *k == candidate)
        .map(|(_, m)| Token::Mark(m))
}

fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(input.len());
    let mut pos = 0;
    while pos < input.len() {
        let longest = (1..=MAX_TOKEN_LEN.min(input.len() - pos))
            .rev()
            .find_map(|len| lookup(&input[pos..pos + len]).map(|token| (token, len)));
        match longest {
            Some((token, len)) => {
                tokens.push(token);
                pos += len;
            }
            None => {
                let c = input.as_bytes()[pos] as char;
                tokens.push(Token::Other(devanagari_digit(c).unwrap_or(c)));
                pos += 1;
            }
        }
    }
    tokens
}

fn devanagari_digit(c: char) -> Option<char> {
    let digit = c.to_digit(10)?;
    char::from_u32(0x0966 + digit)
}

/// Convert one romanized word to Devanagari.
///
/// Fails on empty input and on anything outside printable ASCII, such as
/// text that is already Devanagari.
pub fn to_devanagari(input: &str) -> Result<String, TransliterationError> {
    if input.is_empty() {
        return Err(TransliterationError::Empty);
    }
    if let Some(c) = input.chars().find(|c| !c.is_ascii_graphic()) {
        return Err(TransliterationError::Unsupported(c));
    }

    let mut out = String::with_capacity(input.len() * 3);
    let mut open_consonant = false;
    for token in tokenize(input) {
        match token {
            Token::Vowel { independent, sign } => {
                if open_consonant {
                    out.push_str(sign);
                } else {
                    out.push_str(independent);
                }
                open_consonant = false;
            }
            Token::Consonant(consonant) => {
                if open_consonant {
                    out.push(VIRAMA);
                }
                out.push_str(consonant);
                open_consonant = true;
            }
            Token::Mark(mark) => {
                // A mark right after a bare consonant implies the inherent vowel.
                out.push_str(mark);
                open_consonant = false;
            }
            Token::Other(c) => {
                if open_consonant {
                    out.push(VIRAMA);
                }
                out.push(c);
                open_consonant = false;
            }
        }
    }
    if open_consonant {
        out.push(VIRAMA);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_words() {
        assert_eq!(to_devanagari("namaste").unwrap(), "नमस्ते");
        assert_eq!(to_devanagari("kamala").unwrap(), "कमल");
        assert_eq!(to_devanagari("raam").unwrap(), "राम्");
        assert_eq!(to_devanagari("bhi").unwrap(), "भि");
        assert_eq!(to_devanagari("guru").unwrap(), "गुरु");
    }

    #[test]
    fn test_independent_vowels() {
        assert_eq!(to_devanagari("a").unwrap(), "अ");
        assert_eq!(to_devanagari("aa").unwrap(), "आ");
        assert_eq!(to_devanagari("e").unwrap(), "ए");
        assert_eq!(to_devanagari("ai").unwrap(), "ऐ");
        assert_eq!(to_devanagari("au").unwrap(), "औ");
        assert_eq!(to_devanagari("ee").unwrap(), "ई");
    }

    #[test]
    fn test_longest_match() {
        // "kh" not "k" + "h", "ai" not "a" + "i".
        assert_eq!(to_devanagari("khai").unwrap(), "खै");
        assert_eq!(to_devanagari("chhoTa").unwrap(), "छोट");
        assert_eq!(to_devanagari("shanti").unwrap(), "शन्ति");
    }

    #[test]
    fn test_case_sensitive_retroflex() {
        assert_eq!(to_devanagari("Tamaatar").unwrap(), "टमातर्");
        assert_eq!(to_devanagari("DhoL").unwrap(), "ढोळ्");
    }

    #[test]
    fn test_conjuncts_and_nukta() {
        assert_eq!(to_devanagari("xatriya").unwrap(), "क्षत्रिय");
        assert_eq!(to_devanagari("GYaana").unwrap(), "ज्ञान");
        assert_eq!(to_devanagari("zara").unwrap(), "ज\u{093C}र");
    }

    #[test]
    fn test_marks() {
        assert_eq!(to_devanagari("haM").unwrap(), "हं");
        assert_eq!(to_devanagari("ma.N").unwrap(), "मँ");
        assert_eq!(to_devanagari("duHkha").unwrap(), "दुःख");
    }

    #[test]
    fn test_digits_and_punctuation() {
        assert_eq!(to_devanagari("2024").unwrap(), "२०२४");
        assert_eq!(to_devanagari("ram-").unwrap(), "रम्-");
    }

    #[test]
    fn test_rejects_non_ascii() {
        assert_eq!(to_devanagari(""), Err(TransliterationError::Empty));
        assert_eq!(
            to_devanagari("नमस्ते"),
            Err(TransliterationError::Unsupported('न'))
        );
        assert!(to_devanagari("café").is_err());
    }
}
