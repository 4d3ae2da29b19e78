//! Act extraction: verb phrases, their real-world acts, and the structural
//! assertions expressed by copulas, possession, existence, and location.

use crate::deptree::{DepTree, Relation};
use crate::graph::{AssertionKind, Modality, RealWorldAct, Tense, VerbPhrase};
use crate::iri::{sanitize, IriMinter};
use crate::lemma::Lemmatizer;
use crate::token::PosTag;

/// Copular predicate → relation IRI. The predicate lemma and its marking
/// preposition select the row ("a component of X" → has_part).
static COPULAR_RELATIONS: &[(&str, &str, &str)] = &[
    ("component", "of", "cco:has_part"),
    ("member", "of", "cco:member_of"),
    ("type", "of", "rdfs:subClassOf"),
    ("part", "of", "bfo:part_of"),
    ("example", "of", "rdf:type"),
    ("responsible", "for", "cco:has_function"),
];

/// Prepositions on a copular predicate that express location.
static LOCATIVE_PREPOSITIONS: &[&str] = &["at", "in", "on"];

/// An assertion still holding token indices; the graph assembly resolves
/// them to referent IRIs.
#[derive(Debug, Clone)]
pub struct PendingAssertion {
    pub kind: AssertionKind,
    pub subject_head: usize,
    pub object_head: Option<usize>,
    pub relation: Option<&'static str>,
    pub copula: String,
    pub negated: bool,
}

#[derive(Debug, Default)]
pub struct ExtractedActs {
    pub verb_phrases: Vec<VerbPhrase>,
    pub acts: Vec<RealWorldAct>,
    pub assertions: Vec<PendingAssertion>,
}

pub struct TreeActExtractor<'a> {
    lemmatizer: &'a Lemmatizer,
    minter: &'a IriMinter,
}

impl<'a> TreeActExtractor<'a> {
    pub fn new(lemmatizer: &'a Lemmatizer, minter: &'a IriMinter) -> Self {
        Self { lemmatizer, minter }
    }

    pub fn extract(&self, tree: &DepTree) -> ExtractedActs {
        let mut out = ExtractedActs::default();
        for root in tree.roots() {
            if tree.tag(root).is_verb() {
                self.extract_verbal(tree, root, &mut out);
            } else if tree.has_child(root, Relation::Cop) {
                self.extract_copular(tree, root, &mut out);
            }
        }
        out
    }

    fn extract_verbal(&self, tree: &DepTree, head: usize, out: &mut ExtractedActs) {
        let lemma = self.lemmatizer.verb_lemma(tree.text(head));
        let negated = self.negation(tree, head);

        // "X has Y" with no auxiliary is possession, not an act.
        if lemma == "have" && !tree.has_child(head, Relation::Aux) {
            if let (Some(subject), Some(object)) = (
                tree.child_with(head, Relation::Nsubj),
                tree.child_with(head, Relation::Obj),
            ) {
                out.assertions.push(PendingAssertion {
                    kind: AssertionKind::Possessive,
                    subject_head: subject,
                    object_head: Some(object),
                    relation: None,
                    copula: tree.text(head).to_string(),
                    negated,
                });
                return;
            }
        }

        let mut modal = None;
        let mut auxiliaries = Vec::new();
        let mut is_passive = tree.has_child(head, Relation::NsubjPass);
        let mut has_have_aux = false;
        for &(dep, rel) in tree.children(head) {
            match rel {
                Relation::Aux => {
                    let text = tree.text(dep).to_string();
                    if tree.tag(dep) == PosTag::Md {
                        modal = Some(text.to_lowercase());
                    } else {
                        if self.lemmatizer.verb_lemma(&text) == "have" {
                            has_have_aux = true;
                        }
                        auxiliaries.push(text);
                    }
                }
                Relation::AuxPass => {
                    is_passive = true;
                    auxiliaries.push(tree.text(dep).to_string());
                }
                _ => {}
            }
        }

        let is_perfect = has_have_aux && tree.tag(head) == PosTag::Vbn && !is_passive;
        let modality = modal.as_deref().and_then(default_modality);
        let tense = self.tense(tree, head, modal.as_deref(), is_perfect);

        // The verb group: head, auxiliaries, modal, negation tokens.
        let mut group: Vec<usize> = vec![head];
        for &(dep, rel) in tree.children(head) {
            if matches!(rel, Relation::Aux | Relation::AuxPass | Relation::Neg) {
                group.push(dep);
            }
        }
        group.sort_unstable();
        let source_text = sanitize(&tree.subtree_text(&group));
        let index_range = (group[0], group[group.len() - 1]);
        let span = tree.subtree_span(&group);

        let head_surface = sanitize(tree.text(head));
        let phrase_iri = self.minter.mint(&head_surface, span.0, "verb_phrase");
        let act_iri = self.minter.mint(&lemma, span.0, "act");

        out.verb_phrases.push(VerbPhrase {
            iri: phrase_iri.clone(),
            head_surface,
            lemma: lemma.clone(),
            head_index: head,
            modal,
            modality,
            auxiliaries,
            tense,
            is_passive,
            is_perfect,
            is_negated: negated,
            source_text,
            index_range,
            span,
            about: act_iri.clone(),
        });
        out.acts.push(RealWorldAct {
            iri: act_iri,
            label: lemma,
            mention: phrase_iri,
            modality,
            is_negated: negated,
            has_ambiguity: false,
            ambiguity_type: None,
            ontology_constraint: None,
        });
    }

    /// Copular root: classify the predication and emit an assertion. The
    /// subject is the `nsubj` child; the object depends on the pattern.
    fn extract_copular(&self, tree: &DepTree, pred: usize, out: &mut ExtractedActs) {
        let copula = tree
            .child_with(pred, Relation::Cop)
            .map(|c| tree.text(c).to_string())
            .unwrap_or_default();
        let negated = self.negation(tree, pred);

        // Existential: "there is X".
        if tree.child_with(pred, Relation::Expl).is_some() {
            out.assertions.push(PendingAssertion {
                kind: AssertionKind::Existential,
                subject_head: pred,
                object_head: None,
                relation: None,
                copula,
                negated,
            });
            return;
        }

        let Some(subject) = tree.child_with(pred, Relation::Nsubj) else {
            return;
        };

        // Locative: "X is in Y" puts a case marker on the predicate.
        if let Some(case) = tree.child_with(pred, Relation::Case) {
            if LOCATIVE_PREPOSITIONS.contains(&tree.text(case).to_lowercase().as_str()) {
                out.assertions.push(PendingAssertion {
                    kind: AssertionKind::Locative,
                    subject_head: subject,
                    object_head: Some(pred),
                    relation: Some("bfo:located_in"),
                    copula,
                    negated,
                });
                return;
            }
        }

        // Relational predicates: "a component of X", "responsible for X".
        let pred_lemma = self.lemmatizer.noun_lemma(tree.text(pred));
        for &(lemma, prep, relation) in COPULAR_RELATIONS {
            if pred_lemma != lemma {
                continue;
            }
            let object = tree.children(pred).iter().find_map(|&(dep, rel)| {
                if !matches!(rel, Relation::Nmod | Relation::Obl) {
                    return None;
                }
                let case = tree.child_with(dep, Relation::Case)?;
                (tree.text(case).to_lowercase() == prep).then_some(dep)
            });
            if let Some(object) = object {
                out.assertions.push(PendingAssertion {
                    kind: AssertionKind::Copular,
                    subject_head: subject,
                    object_head: Some(object),
                    relation: Some(relation),
                    copula,
                    negated,
                });
                return;
            }
        }

        // Plain predication: "the doctor is a surgeon".
        out.assertions.push(PendingAssertion {
            kind: AssertionKind::Copular,
            subject_head: subject,
            object_head: Some(pred),
            relation: None,
            copula,
            negated,
        });
    }

    fn negation(&self, tree: &DepTree, head: usize) -> bool {
        tree.children(head).iter().any(|&(dep, rel)| {
            rel == Relation::Neg
                || (rel == Relation::Advmod
                    && matches!(
                        tree.text(dep).to_lowercase().as_str(),
                        "not" | "never" | "n't"
                    ))
        })
    }

    /// Finite tense rides on the first tensed element: the auxiliary when
    /// one is present, otherwise the head itself.
    fn tense(&self, tree: &DepTree, head: usize, modal: Option<&str>, is_perfect: bool) -> Tense {
        if matches!(modal, Some("will") | Some("shall")) {
            return Tense::Future;
        }
        if modal.is_some() {
            return Tense::Unspecified;
        }
        let aux_tags: Vec<PosTag> = tree
            .children(head)
            .iter()
            .filter(|(_, r)| matches!(r, Relation::Aux | Relation::AuxPass))
            .map(|&(d, _)| tree.tag(d))
            .collect();
        if aux_tags.contains(&PosTag::Vbd) {
            return Tense::Past;
        }
        if aux_tags.contains(&PosTag::Vbz) || aux_tags.contains(&PosTag::Vbp) {
            return Tense::Present;
        }
        match tree.tag(head) {
            PosTag::Vbd => Tense::Past,
            PosTag::Vbz | PosTag::Vbp | PosTag::Vb => Tense::Present,
            _ if is_perfect => Tense::Past,
            _ => Tense::Unspecified,
        }
    }
}

/// Default (most accessible) modal force per modal auxiliary.
pub fn default_modality(modal: &str) -> Option<Modality> {
    match modal {
        "must" => Some(Modality::Obligation),
        "shall" => Some(Modality::Obligation),
        "should" => Some(Modality::Recommendation),
        "ought" => Some(Modality::Recommendation),
        "may" => Some(Modality::Permission),
        "can" => Some(Modality::Ability),
        "could" => Some(Modality::Possibility),
        "might" => Some(Modality::Possibility),
        "would" => Some(Modality::Conditional),
        "will" => Some(Modality::Prediction),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deptree::DepTree;
    use crate::models::{DependencyParser, PosTagger, Tokenizer};
    use crate::parser::ReferenceParser;
    use crate::tagger::ReferenceTagger;
    use crate::tokenizer::ReferenceTokenizer;

    fn extract(text: &str) -> ExtractedActs {
        let tokens = ReferenceTokenizer.tokenize(text);
        let tags = ReferenceTagger::new().tag(&tokens);
        let arcs = ReferenceParser.parse(&tokens, &tags);
        let tree = DepTree::new(tokens, tags, arcs);
        let lem = Lemmatizer::new();
        let minter = IriMinter::new();
        TreeActExtractor::new(&lem, &minter).extract(&tree)
    }

    #[test]
    fn active_transitive_act() {
        let out = extract("The doctor treated the patient");
        assert_eq!(out.verb_phrases.len(), 1);
        let vp = &out.verb_phrases[0];
        assert_eq!(vp.lemma, "treat");
        assert_eq!(vp.tense, Tense::Past);
        assert!(!vp.is_passive);
        assert!(!vp.is_negated);
        assert_eq!(out.acts.len(), 1);
        assert_eq!(out.acts[0].label, "treat");
    }

    #[test]
    fn passive_voice_detected() {
        let out = extract("The patient was treated by the doctor");
        let vp = &out.verb_phrases[0];
        assert!(vp.is_passive);
        assert_eq!(vp.lemma, "treat");
        assert_eq!(vp.auxiliaries, vec!["was".to_string()]);
        assert_eq!(vp.tense, Tense::Past);
    }

    #[test]
    fn modal_recorded_with_default_force() {
        let out = extract("The doctor must allocate the ventilator");
        let vp = &out.verb_phrases[0];
        assert_eq!(vp.modal.as_deref(), Some("must"));
        assert_eq!(vp.modality, Some(Modality::Obligation));
        assert_eq!(vp.lemma, "allocate");
    }

    #[test]
    fn negated_verb_phrase() {
        let out = extract("The doctor did not move");
        let vp = &out.verb_phrases[0];
        assert!(vp.is_negated);
    }

    #[test]
    fn verb_group_source_text() {
        let out = extract("The patient was treated by the doctor");
        assert_eq!(out.verb_phrases[0].source_text, "was treated");
        assert_eq!(out.verb_phrases[0].index_range, (3, 4));
    }

    #[test]
    fn copular_part_whole() {
        let out = extract("CBP is a component of DHS");
        assert!(out.verb_phrases.is_empty());
        assert_eq!(out.assertions.len(), 1);
        let a = &out.assertions[0];
        assert_eq!(a.kind, AssertionKind::Copular);
        assert_eq!(a.relation, Some("cco:has_part"));
        assert!(!a.negated);
        assert_eq!(a.copula, "is");
    }

    #[test]
    fn negated_copula() {
        let out = extract("CBP is not a component of DHS");
        assert!(out.assertions[0].negated);
    }

    #[test]
    fn existential_there() {
        let out = extract("There is a problem");
        let a = &out.assertions[0];
        assert_eq!(a.kind, AssertionKind::Existential);
        assert!(a.object_head.is_none());
    }

    #[test]
    fn possessive_have() {
        let out = extract("The hospital has a ventilator");
        assert!(out.verb_phrases.is_empty());
        let a = &out.assertions[0];
        assert_eq!(a.kind, AssertionKind::Possessive);
        assert!(a.object_head.is_some());
    }

    #[test]
    fn locative_copula() {
        let out = extract("The doctor is in the hospital");
        let a = &out.assertions[0];
        assert_eq!(a.kind, AssertionKind::Locative);
        assert_eq!(a.relation, Some("bfo:located_in"));
    }

    #[test]
    fn default_modality_table() {
        assert_eq!(default_modality("must"), Some(Modality::Obligation));
        assert_eq!(default_modality("should"), Some(Modality::Recommendation));
        assert_eq!(default_modality("may"), Some(Modality::Permission));
        assert_eq!(default_modality("xyzzy"), None);
    }
}
