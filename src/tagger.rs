//! Reference part-of-speech tagger.
//!
//! Resolution order per token: punctuation, numbers, closed-class table,
//! capitalization, the common-noun table, verb morphology, suffix
//! heuristics, then a default of NN. Two context passes repair the
//! verb/participle and noun/verb ambiguities the first pass cannot see.

use crate::lemma::{irregular_verb, is_base_verb, Lemmatizer};
use crate::models::PosTagger;
use crate::token::{PosTag, Token};

static DETERMINERS: &[&str] = &[
    "a", "all", "an", "another", "any", "both", "each", "either", "every", "neither", "no",
    "some", "that", "the", "these", "this", "those",
];

static MODALS: &[&str] = &[
    "can", "could", "may", "might", "must", "ought", "shall", "should", "will", "would",
];

static PREPOSITIONS: &[&str] = &[
    "about", "above", "across", "after", "against", "along", "among", "around", "at", "before",
    "behind", "below", "beneath", "beside", "between", "beyond", "by", "during", "for", "from",
    "in", "inside", "into", "near", "of", "on", "onto", "over", "through", "toward", "under",
    "upon", "with", "within", "without",
];

static PRONOUNS: &[&str] = &[
    "he", "her", "him", "i", "it", "me", "she", "them", "they", "us", "we", "you",
];

static POSSESSIVE_PRONOUNS: &[&str] = &["her", "his", "its", "my", "our", "their", "your"];

static BE_FORMS: &[&str] = &["am", "are", "be", "been", "being", "is", "was", "were"];

static HAVE_FORMS: &[&str] = &["had", "has", "have", "having"];

static DO_FORMS: &[&str] = &["did", "do", "does"];

static NUMBER_WORDS: &[(&str, u64)] = &[
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
    ("twenty", 20),
    ("fifty", 50),
    ("hundred", 100),
    ("thousand", 1000),
];

/// Numeric value of a cardinal token, spelled or in digits.
pub fn cardinal_value(word: &str) -> Option<u64> {
    let lower = word.to_lowercase();
    if let Ok(n) = lower.parse::<u64>() {
        return Some(n);
    }
    NUMBER_WORDS
        .iter()
        .find(|(w, _)| *w == lower)
        .map(|(_, n)| *n)
}

static COMMON_NOUNS: &[&str] = &[
    "agency", "allocation", "army", "author", "bank", "board", "book", "building", "car",
    "chair", "child", "city", "commitment", "committee", "company", "component", "computer",
    "corporation", "council", "country", "court", "crowd", "decision", "department", "device",
    "doctor", "door", "driver", "engineer", "example", "family", "freedom", "function",
    "government", "group", "hammer", "happiness", "herd", "hospital", "idea", "information",
    "institution", "judge", "justice", "knife", "knowledge", "lawyer", "machine", "man",
    "manager", "meeting", "member", "ministry", "mountain", "nurse", "officer", "organization",
    "park", "part", "patient", "person", "policy", "president", "problem", "river", "rock",
    "room", "scalpel", "school", "scientist", "soldier", "stone", "street", "student",
    "surgeon", "table", "teacher", "team", "tool", "town", "treatment", "tree", "truth",
    "type", "university", "ventilator", "water", "woman", "worker",
];

static ADJECTIVES: &[&str] = &[
    "bad", "big", "blue", "critical", "ethical", "final", "good", "green", "last", "medical",
    "new", "old", "only", "red", "remaining", "scarce", "small", "sole", "tall", "young",
];

static NEGATION_ADVERBS: &[&str] = &["never", "not", "n't"];

fn is_common_noun(word: &str) -> bool {
    COMMON_NOUNS.binary_search(&word).is_ok()
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceTagger {
    lemmatizer: Lemmatizer,
}

impl ReferenceTagger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lexical_tag(&self, word: &str, lower: &str, sentence_initial: bool) -> PosTag {
        if word.chars().all(|c| c.is_ascii_punctuation()) {
            return PosTag::Punct;
        }
        if cardinal_value(lower).is_some() {
            return PosTag::Cd;
        }

        // Closed classes.
        if lower == "there" {
            return PosTag::Ex;
        }
        if lower == "to" {
            return PosTag::To;
        }
        if MODALS.contains(&lower) {
            return PosTag::Md;
        }
        if BE_FORMS.contains(&lower) {
            return match lower {
                "is" => PosTag::Vbz,
                "was" | "were" => PosTag::Vbd,
                "are" | "am" => PosTag::Vbp,
                "been" => PosTag::Vbn,
                "being" => PosTag::Vbg,
                _ => PosTag::Vb,
            };
        }
        if HAVE_FORMS.contains(&lower) {
            return match lower {
                "has" => PosTag::Vbz,
                "had" => PosTag::Vbd,
                "having" => PosTag::Vbg,
                _ => PosTag::Vbp,
            };
        }
        if DO_FORMS.contains(&lower) {
            return match lower {
                "does" => PosTag::Vbz,
                "did" => PosTag::Vbd,
                _ => PosTag::Vbp,
            };
        }
        if DETERMINERS.contains(&lower) {
            return PosTag::Dt;
        }
        if PREPOSITIONS.contains(&lower) {
            return PosTag::In;
        }
        if lower == "and" || lower == "or" || lower == "but" || lower == "nor" {
            return PosTag::Cc;
        }
        if POSSESSIVE_PRONOUNS.contains(&lower)
            && !PRONOUNS.contains(&lower)
        {
            return PosTag::PrpDollar;
        }
        if PRONOUNS.contains(&lower) {
            return PosTag::Prp;
        }
        if lower == "who" || lower == "whom" || lower == "what" {
            return PosTag::Wp;
        }
        if lower == "which" {
            return PosTag::Wdt;
        }
        if lower == "where" || lower == "when" || lower == "why" || lower == "how" {
            return PosTag::Wrb;
        }
        if NEGATION_ADVERBS.contains(&lower) || lower.ends_with("ly") {
            return PosTag::Rb;
        }

        // Proper nouns: all-caps acronyms anywhere, capitalized words away
        // from the sentence start.
        let capitalized = word.chars().next().map(|c| c.is_uppercase()).unwrap_or(false);
        let all_caps = word.len() >= 2 && word.chars().all(|c| c.is_uppercase());
        if all_caps {
            return PosTag::Nnp;
        }
        if capitalized && !sentence_initial {
            return PosTag::Nnp;
        }

        // Open classes: nouns, then adjectives, then verbs by morphology.
        if is_common_noun(lower) {
            return PosTag::Nn;
        }
        let noun_lemma = self.lemmatizer.noun_lemma(lower);
        if noun_lemma != lower && is_common_noun(&noun_lemma) {
            return PosTag::Nns;
        }
        if ADJECTIVES.contains(&lower) {
            return PosTag::Jj;
        }
        if is_base_verb(lower) {
            return PosTag::Vb;
        }
        if let Some(lemma) = irregular_verb(lower) {
            return if lemma == lower { PosTag::Vb } else { PosTag::Vbd };
        }
        if lower.ends_with("ed") && is_base_verb(&self.lemmatizer.verb_lemma(lower)) {
            return PosTag::Vbd;
        }
        if lower.ends_with("ing") && is_base_verb(&self.lemmatizer.verb_lemma(lower)) {
            return PosTag::Vbg;
        }
        if lower.ends_with('s') && is_base_verb(&self.lemmatizer.verb_lemma(lower)) {
            return PosTag::Vbz;
        }

        // Suffix heuristics for out-of-table words.
        if lower.ends_with("tion")
            || lower.ends_with("sion")
            || lower.ends_with("ment")
            || lower.ends_with("ness")
            || lower.ends_with("ity")
            || lower.ends_with("ship")
            || lower.ends_with("ance")
            || lower.ends_with("ence")
        {
            return PosTag::Nn;
        }
        if lower.ends_with("ous")
            || lower.ends_with("ful")
            || lower.ends_with("less")
            || lower.ends_with("ive")
            || lower.ends_with("ic")
        {
            return PosTag::Jj;
        }
        if lower.ends_with("est") && lower.len() > 4 {
            return PosTag::Jjs;
        }
        if lower.ends_with("ed") {
            return PosTag::Vbd;
        }
        if lower.ends_with("ing") {
            return PosTag::Vbg;
        }

        if capitalized {
            return PosTag::Nnp;
        }
        if lower.ends_with('s') && !lower.ends_with("ss") {
            return PosTag::Nns;
        }
        PosTag::Nn
    }
}

impl PosTagger for ReferenceTagger {
    fn tag(&self, tokens: &[Token]) -> Vec<PosTag> {
        let mut tags: Vec<PosTag> = tokens
            .iter()
            .enumerate()
            .map(|(i, t)| self.lexical_tag(&t.text, &t.text.to_lowercase(), i == 0))
            .collect();

        // Pass 2: participles. An -ed verb after a be/have form is VBN.
        for i in 0..tags.len() {
            if tags[i] == PosTag::Vbd {
                let mut j = i;
                while j > 0 {
                    j -= 1;
                    let prev = tokens[j].text.to_lowercase();
                    if tags[j] == PosTag::Rb {
                        continue;
                    }
                    if BE_FORMS.contains(&prev.as_str()) || HAVE_FORMS.contains(&prev.as_str()) {
                        tags[i] = PosTag::Vbn;
                    }
                    break;
                }
            }
        }

        // Pass 3: base verbs after a modal or infinitival "to"; nouns after
        // a determiner when the word is noun-compatible.
        for i in 1..tags.len() {
            let prev_tag = tags[i - 1];
            let lower = tokens[i].text.to_lowercase();
            if (prev_tag == PosTag::Md || prev_tag == PosTag::To) && is_base_verb(&lower) {
                tags[i] = PosTag::Vb;
            }
            if matches!(prev_tag, PosTag::Dt | PosTag::PrpDollar | PosTag::Cd)
                && tags[i].is_verb()
                && (is_common_noun(&lower) || lower.ends_with("ing"))
            {
                tags[i] = PosTag::Nn;
            }
        }

        tags
    }
}
