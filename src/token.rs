//! Tokens, character spans, and the Penn Treebank tagset used by the
//! reference tagger and the dependency tree.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Penn Treebank part-of-speech tags, restricted to the tags the pipeline
/// actually consumes. `from_str` accepts the standard surface forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosTag {
    /// Coordinating conjunction (and, or)
    Cc,
    /// Cardinal number
    Cd,
    /// Determiner
    Dt,
    /// Existential "there"
    Ex,
    /// Preposition or subordinating conjunction
    In,
    /// Adjective
    Jj,
    /// Comparative adjective
    Jjr,
    /// Superlative adjective
    Jjs,
    /// Modal auxiliary
    Md,
    /// Singular or mass noun
    Nn,
    /// Plural noun
    Nns,
    /// Singular proper noun
    Nnp,
    /// Plural proper noun
    Nnps,
    /// Possessive marker ('s)
    Pos,
    /// Personal pronoun
    Prp,
    /// Possessive pronoun
    PrpDollar,
    /// Adverb
    Rb,
    /// Infinitival "to"
    To,
    /// Base-form verb
    Vb,
    /// Past-tense verb
    Vbd,
    /// Gerund or present participle
    Vbg,
    /// Past participle
    Vbn,
    /// Non-third-person present verb
    Vbp,
    /// Third-person singular present verb
    Vbz,
    /// Wh-determiner
    Wdt,
    /// Wh-pronoun
    Wp,
    /// Wh-adverb
    Wrb,
    /// Sentence-final or internal punctuation
    Punct,
}

impl PosTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            PosTag::Cc => "CC",
            PosTag::Cd => "CD",
            PosTag::Dt => "DT",
            PosTag::Ex => "EX",
            PosTag::In => "IN",
            PosTag::Jj => "JJ",
            PosTag::Jjr => "JJR",
            PosTag::Jjs => "JJS",
            PosTag::Md => "MD",
            PosTag::Nn => "NN",
            PosTag::Nns => "NNS",
            PosTag::Nnp => "NNP",
            PosTag::Nnps => "NNPS",
            PosTag::Pos => "POS",
            PosTag::Prp => "PRP",
            PosTag::PrpDollar => "PRP$",
            PosTag::Rb => "RB",
            PosTag::To => "TO",
            PosTag::Vb => "VB",
            PosTag::Vbd => "VBD",
            PosTag::Vbg => "VBG",
            PosTag::Vbn => "VBN",
            PosTag::Vbp => "VBP",
            PosTag::Vbz => "VBZ",
            PosTag::Wdt => "WDT",
            PosTag::Wp => "WP",
            PosTag::Wrb => "WRB",
            PosTag::Punct => ".",
        }
    }

    pub fn from_str(s: &str) -> Option<PosTag> {
        match s {
            "CC" => Some(PosTag::Cc),
            "CD" => Some(PosTag::Cd),
            "DT" => Some(PosTag::Dt),
            "EX" => Some(PosTag::Ex),
            "IN" => Some(PosTag::In),
            "JJ" => Some(PosTag::Jj),
            "JJR" => Some(PosTag::Jjr),
            "JJS" => Some(PosTag::Jjs),
            "MD" => Some(PosTag::Md),
            "NN" => Some(PosTag::Nn),
            "NNS" => Some(PosTag::Nns),
            "NNP" => Some(PosTag::Nnp),
            "NNPS" => Some(PosTag::Nnps),
            "POS" => Some(PosTag::Pos),
            "PRP" => Some(PosTag::Prp),
            "PRP$" => Some(PosTag::PrpDollar),
            "RB" => Some(PosTag::Rb),
            "TO" => Some(PosTag::To),
            "VB" => Some(PosTag::Vb),
            "VBD" => Some(PosTag::Vbd),
            "VBG" => Some(PosTag::Vbg),
            "VBN" => Some(PosTag::Vbn),
            "VBP" => Some(PosTag::Vbp),
            "VBZ" => Some(PosTag::Vbz),
            "WDT" => Some(PosTag::Wdt),
            "WP" => Some(PosTag::Wp),
            "WRB" => Some(PosTag::Wrb),
            "." | "," | ":" | ";" | "!" | "?" => Some(PosTag::Punct),
            _ => None,
        }
    }

    pub fn is_noun(&self) -> bool {
        matches!(self, PosTag::Nn | PosTag::Nns | PosTag::Nnp | PosTag::Nnps)
    }

    pub fn is_proper_noun(&self) -> bool {
        matches!(self, PosTag::Nnp | PosTag::Nnps)
    }

    pub fn is_plural_noun(&self) -> bool {
        matches!(self, PosTag::Nns | PosTag::Nnps)
    }

    pub fn is_verb(&self) -> bool {
        matches!(
            self,
            PosTag::Vb | PosTag::Vbd | PosTag::Vbg | PosTag::Vbn | PosTag::Vbp | PosTag::Vbz
        )
    }

    pub fn is_adjective(&self) -> bool {
        matches!(self, PosTag::Jj | PosTag::Jjr | PosTag::Jjs)
    }
}

/// A surface token with its character span in the normalized sentence.
/// Token indices throughout the pipeline are 1-based; index 0 is the
/// synthetic root of the dependency tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            span: Span::new(start, end),
        }
    }

    pub fn is_punctuation(&self) -> bool {
        !self.text.is_empty() && self.text.chars().all(|c| c.is_ascii_punctuation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_length() {
        assert_eq!(Span::new(3, 9).len(), 6);
        assert!(Span::new(4, 4).is_empty());
    }

    #[test]
    fn tag_round_trips_surface_form() {
        assert_eq!(PosTag::from_str("NNS"), Some(PosTag::Nns));
        assert_eq!(PosTag::Nns.as_str(), "NNS");
        assert_eq!(PosTag::from_str("PRP$"), Some(PosTag::PrpDollar));
    }

    #[test]
    fn tag_classes() {
        assert!(PosTag::Nnp.is_noun());
        assert!(PosTag::Nnp.is_proper_noun());
        assert!(!PosTag::Nn.is_proper_noun());
        assert!(PosTag::Vbn.is_verb());
        assert!(PosTag::Jjs.is_adjective());
    }

    #[test]
    fn punctuation_token() {
        assert!(Token::new(".", 10, 11).is_punctuation());
        assert!(!Token::new("doctor", 0, 6).is_punctuation());
    }
}
