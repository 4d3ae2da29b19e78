//! Interfaces to the pre-trained models the pipeline consumes.
//!
//! The core never trains or mutates a model: tokenizer, tagger, parser, and
//! gazetteer arrive as frozen implementations of these traits. A `ModelSet`
//! may be shared across threads by reference; nothing here requires
//! synchronization.

use crate::deptree::DepArc;
use crate::gazetteer::{EntityClass, StaticGazetteer};
use crate::lemma::Lemmatizer;
use crate::token::{PosTag, Token};

pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;
}

pub trait PosTagger: Send + Sync {
    /// One tag per token, parallel to the input slice.
    fn tag(&self, tokens: &[Token]) -> Vec<PosTag>;
}

pub trait DependencyParser: Send + Sync {
    fn parse(&self, tokens: &[Token], tags: &[PosTag]) -> Vec<DepArc>;
}

pub trait Gazetteer: Send + Sync {
    fn lookup(&self, surface: &str) -> Option<EntityClass>;

    fn recognizes(&self, surface: &str) -> bool {
        self.lookup(surface).is_some()
    }
}

impl Gazetteer for StaticGazetteer {
    fn lookup(&self, surface: &str) -> Option<EntityClass> {
        StaticGazetteer::lookup(self, surface)
    }
}

/// The frozen model inputs of one builder instance.
pub struct ModelSet {
    pub tokenizer: Option<Box<dyn Tokenizer>>,
    pub tagger: Option<Box<dyn PosTagger>>,
    pub parser: Option<Box<dyn DependencyParser>>,
    pub gazetteer: Option<Box<dyn Gazetteer>>,
    pub lemmatizer: Lemmatizer,
}

impl std::fmt::Debug for ModelSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelSet")
            .field("tokenizer", &self.tokenizer.is_some())
            .field("tagger", &self.tagger.is_some())
            .field("parser", &self.parser.is_some())
            .field("gazetteer", &self.gazetteer.is_some())
            .finish()
    }
}

impl ModelSet {
    /// No models at all. Useful for asserting the fail-fast contract.
    pub fn empty() -> Self {
        Self {
            tokenizer: None,
            tagger: None,
            parser: None,
            gazetteer: None,
            lemmatizer: Lemmatizer::new(),
        }
    }

    /// The built-in reference models: rule-based tokenizer, tagger, and
    /// dependency parser plus the static gazetteer.
    pub fn reference() -> Self {
        Self {
            tokenizer: Some(Box::new(crate::tokenizer::ReferenceTokenizer)),
            tagger: Some(Box::new(crate::tagger::ReferenceTagger::new())),
            parser: Some(Box::new(crate::parser::ReferenceParser)),
            gazetteer: Some(Box::new(StaticGazetteer::new())),
            lemmatizer: Lemmatizer::new(),
        }
    }

    pub fn with_tokenizer(mut self, tokenizer: Box<dyn Tokenizer>) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    pub fn with_tagger(mut self, tagger: Box<dyn PosTagger>) -> Self {
        self.tagger = Some(tagger);
        self
    }

    pub fn with_parser(mut self, parser: Box<dyn DependencyParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    pub fn with_gazetteer(mut self, gazetteer: Box<dyn Gazetteer>) -> Self {
        self.gazetteer = Some(gazetteer);
        self
    }

    pub fn with_lemmatizer(mut self, lemmatizer: Lemmatizer) -> Self {
        self.lemmatizer = lemmatizer;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_set_is_complete() {
        let models = ModelSet::reference();
        assert!(models.tokenizer.is_some());
        assert!(models.tagger.is_some());
        assert!(models.parser.is_some());
        assert!(models.gazetteer.is_some());
    }

    #[test]
    fn empty_set_has_no_models() {
        let models = ModelSet::empty();
        assert!(models.tagger.is_none());
        assert!(models.parser.is_none());
    }
}
