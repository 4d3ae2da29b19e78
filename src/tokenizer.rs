//! Text normalization and the reference tokenizer.

use crate::models::Tokenizer;
use crate::token::Token;

/// Collapse whitespace runs, trim, and straighten typographic quotes.
/// Token spans are always relative to the normalized text.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.trim().chars() {
        let c = match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2013}' | '\u{2014}' => '-',
            '\u{00A0}' => ' ',
            other => other,
        };
        if c.is_whitespace() {
            pending_space = true;
        } else {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        }
    }
    out
}

/// Splits on whitespace and peels punctuation into separate tokens.
/// Word-internal apostrophes and hyphens stay attached ("doctor's",
/// "well-known"); "n't" is not split.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceTokenizer;

impl Tokenizer for ReferenceTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let chars: Vec<char> = text.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if c.is_whitespace() {
                i += 1;
                continue;
            }
            if is_word_char(c) {
                let start = i;
                while i < chars.len() && (is_word_char(chars[i]) || is_internal(&chars, i)) {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                tokens.push(Token::new(text, start, i));
            } else {
                tokens.push(Token::new(c.to_string(), i, i + 1));
                i += 1;
            }
        }
        tokens
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}

/// Apostrophes and hyphens are part of a word only between word characters.
fn is_internal(chars: &[char], i: usize) -> bool {
    (chars[i] == '\'' || chars[i] == '-')
        && i > 0
        && is_word_char(chars[i - 1])
        && i + 1 < chars.len()
        && is_word_char(chars[i + 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize("  The   doctor\n treated  "), "The doctor treated");
    }

    #[test]
    fn normalize_straightens_quotes() {
        assert_eq!(normalize("\u{2018}x\u{2019}"), "'x'");
    }

    #[test]
    fn words_and_spans() {
        let toks = ReferenceTokenizer.tokenize("The doctor treated the patient");
        assert_eq!(toks.len(), 5);
        assert_eq!(toks[1].text, "doctor");
        assert_eq!(toks[1].span.start, 4);
        assert_eq!(toks[1].span.end, 10);
    }

    #[test]
    fn punctuation_is_split_off() {
        let toks = ReferenceTokenizer.tokenize("It moved.");
        assert_eq!(
            toks.iter().map(|t| t.text.as_str()).collect::<Vec<_>>(),
            vec!["It", "moved", "."]
        );
    }

    #[test]
    fn internal_apostrophe_kept() {
        let toks = ReferenceTokenizer.tokenize("the doctor's patient");
        assert_eq!(toks[1].text, "doctor's");
    }

    #[test]
    fn commas_separate() {
        let toks = ReferenceTokenizer.tokenize("Obama, the president, spoke");
        assert_eq!(
            toks.iter().map(|t| t.text.as_str()).collect::<Vec<_>>(),
            vec!["Obama", ",", "the", "president", ",", "spoke"]
        );
    }
}
