//! Ambiguity representation and detection.
//!
//! Each ambiguity is a tagged variant carrying its own payload, anchored to
//! a graph node by IRI. Detection reads the default graph and never
//! changes a reading; the only write-back is the selectional-violation
//! surface flag on the affected act node.

use crate::act::default_modality;
use crate::deptree::{DepTree, Relation};
use crate::graph::{Modality, SentenceAnalysis};
use crate::selectional::{categorize_entity, SelectionalPreferences, Violation};

/// Modals whose deontic and epistemic senses are both live.
static AMBIGUOUS_MODALS: &[&str] = &["can", "may", "must", "should"];

/// Universal quantifiers that participate in scope ambiguity.
static UNIVERSAL_QUANTIFIERS: &[&str] = &["all", "each", "every"];

/// Any quantifying determiner, for quantifier-quantifier interaction.
static QUANTIFIER_WORDS: &[&str] = &[
    "all", "each", "every", "few", "many", "most", "no", "some",
];

/// Nominalization suffixes whose process/continuant type is underdetermined.
static NOMINALIZATION_SUFFIXES: &[&str] = &["ing", "ity", "ment", "ness", "tion"];

/// Verbs predicating duration of their subject.
static DURATION_VERBS: &[&str] = &["continue", "last", "take"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Confidence {
    Low,
    Medium,
    High,
    Score(f64),
}

impl Confidence {
    pub fn value(&self) -> f64 {
        match self {
            Confidence::Low => 0.3,
            Confidence::Medium => 0.5,
            Confidence::High => 0.8,
            Confidence::Score(v) => *v,
        }
    }
}

/// Evidence signals recorded during detection and consumed by the
/// resolver's hierarchy of evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    AgentSubject,
    IntentionalAct,
    SecondPersonSubject,
    PerfectAspect,
    StativeVerb,
    OfComplement,
    SubjectOfIntentionalAct,
    DurationPredicate,
    PredicateAdjective,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::AgentSubject => "agent_subject",
            Signal::IntentionalAct => "intentional_act",
            Signal::SecondPersonSubject => "second_person_subject",
            Signal::PerfectAspect => "perfect_aspect",
            Signal::StativeVerb => "stative_verb",
            Signal::OfComplement => "of_complement",
            Signal::SubjectOfIntentionalAct => "subject_of_intentional_act",
            Signal::DurationPredicate => "duration_predicate",
            Signal::PredicateAdjective => "predicate_adjective",
        }
    }
}

/// Logical forms of the two scope readings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formalizations {
    pub wide: String,
    pub narrow: String,
}

#[derive(Debug, Clone)]
pub enum AmbiguityKind {
    ModalForce {
        modal: String,
        readings: Vec<Modality>,
    },
    NounCategory {
        noun: String,
    },
    Scope {
        quantifier: String,
        formalizations: Formalizations,
    },
    SelectionalViolation {
        violation: Violation,
        agent: String,
        patient: Option<String>,
    },
    PotentialMetonymy {
        literal_type: String,
        suggested_type: String,
    },
}

impl AmbiguityKind {
    pub fn name(&self) -> &'static str {
        match self {
            AmbiguityKind::ModalForce { .. } => "modal_force",
            AmbiguityKind::NounCategory { .. } => "noun_category",
            AmbiguityKind::Scope { .. } => "scope",
            AmbiguityKind::SelectionalViolation { .. } => "selectional_violation",
            AmbiguityKind::PotentialMetonymy { .. } => "potential_metonymy",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Ambiguity {
    pub kind: AmbiguityKind,
    /// IRI of the graph node the ambiguity attaches to.
    pub node_iri: String,
    pub span: (usize, usize),
    /// Reading tags, default first.
    pub readings: Vec<String>,
    pub default_reading: String,
    pub signals: Vec<Signal>,
    pub confidence: Confidence,
}

/// The deontic/epistemic reading pair of an ambiguous modal.
pub fn modal_readings(modal: &str) -> Vec<Modality> {
    match modal {
        "must" => vec![Modality::Obligation, Modality::Inference],
        "should" => vec![Modality::Recommendation, Modality::Expectation],
        "may" => vec![Modality::Permission, Modality::Possibility],
        "can" => vec![Modality::Ability, Modality::Permission],
        _ => Vec::new(),
    }
}

pub struct AmbiguityDetector<'a> {
    prefs: &'a SelectionalPreferences,
}

impl<'a> AmbiguityDetector<'a> {
    pub fn new(prefs: &'a SelectionalPreferences) -> Self {
        Self { prefs }
    }

    /// Run every detection rule over the default graph. Selectional
    /// violations additionally flag the act node they sit on.
    pub fn detect(&self, tree: &DepTree, analysis: &mut SentenceAnalysis) -> Vec<Ambiguity> {
        let mut out = Vec::new();
        self.detect_modal_force(tree, analysis, &mut out);
        self.detect_noun_category(tree, analysis, &mut out);
        self.detect_scope(tree, analysis, &mut out);
        self.detect_selectional(tree, analysis, &mut out);
        self.detect_metonymy(tree, analysis, &mut out);
        out
    }

    fn subject_referent_iri(
        &self,
        tree: &DepTree,
        analysis: &SentenceAnalysis,
        verb_head: usize,
        passive: bool,
    ) -> Option<String> {
        let subject_rel = if passive {
            Relation::OblAgent
        } else {
            Relation::Nsubj
        };
        let head = tree.child_with(verb_head, subject_rel)?;
        analysis.referent_by_head(head).map(|r| r.iri.clone())
    }

    fn detect_modal_force(
        &self,
        tree: &DepTree,
        analysis: &SentenceAnalysis,
        out: &mut Vec<Ambiguity>,
    ) {
        for phrase in &analysis.verb_phrases {
            let Some(modal) = phrase.modal.as_deref() else {
                continue;
            };
            if !AMBIGUOUS_MODALS.contains(&modal) {
                continue;
            }
            let readings = modal_readings(modal);
            if readings.len() < 2 {
                continue;
            }

            let mut signals = Vec::new();
            let verb_class = self.prefs.get_verb_class(&phrase.lemma);
            if let Some(class) = verb_class {
                if class.is_intentional() {
                    signals.push(Signal::IntentionalAct);
                }
                if class == crate::selectional::VerbClass::Stative {
                    signals.push(Signal::StativeVerb);
                }
            }
            if let Some(subject_iri) =
                self.subject_referent_iri(tree, analysis, phrase.head_index, phrase.is_passive)
            {
                if let Some(subject) = analysis.referent_by_iri(&subject_iri) {
                    let categories =
                        categorize_entity(subject.denotes_type.curie(), &surface_core(subject));
                    if categories.iter().any(|c| {
                        matches!(
                            c,
                            crate::selectional::EntityCategory::Animate
                                | crate::selectional::EntityCategory::Organization
                        )
                    }) {
                        signals.push(Signal::AgentSubject);
                    }
                    if subject.surface.eq_ignore_ascii_case("you") {
                        signals.push(Signal::SecondPersonSubject);
                    }
                }
            }
            if phrase.is_perfect {
                signals.push(Signal::PerfectAspect);
            }

            let default = phrase
                .modality
                .or_else(|| default_modality(modal))
                .unwrap_or(readings[0]);
            out.push(Ambiguity {
                kind: AmbiguityKind::ModalForce {
                    modal: modal.to_string(),
                    readings: readings.clone(),
                },
                node_iri: phrase.about.clone(),
                span: phrase.span,
                readings: readings.iter().map(|m| m.as_str().to_string()).collect(),
                default_reading: default.as_str().to_string(),
                signals,
                confidence: Confidence::Medium,
            });
        }
    }

    fn detect_noun_category(
        &self,
        tree: &DepTree,
        analysis: &SentenceAnalysis,
        out: &mut Vec<Ambiguity>,
    ) {
        for referent in &analysis.referents {
            let head_word = tree.text(referent.head_index).to_lowercase();
            if !NOMINALIZATION_SUFFIXES
                .iter()
                .any(|s| head_word.ends_with(s) && head_word.len() > s.len() + 2)
            {
                continue;
            }
            // Only nouns whose upper-ontology type is still open: a
            // gazetteer hit on person/organization/artifact settles it.
            if !matches!(
                referent.denotes_type,
                crate::gazetteer::EntityClass::Entity
                    | crate::gazetteer::EntityClass::Abstract
            ) {
                continue;
            }

            let mut signals = Vec::new();
            let head = referent.head_index;
            // "of"-complement directly after the nominalization.
            let of_complement = tree.children(head).iter().any(|&(dep, rel)| {
                matches!(rel, Relation::Nmod)
                    && tree
                        .child_with(dep, Relation::Case)
                        .map(|c| tree.text(c).eq_ignore_ascii_case("of"))
                        .unwrap_or(false)
            });
            if of_complement {
                signals.push(Signal::OfComplement);
            }
            if let Some((parent, rel)) = tree.parent(head) {
                if rel == Relation::Nsubj && tree.tag(parent).is_verb() {
                    let lemma_class = self
                        .prefs
                        .get_verb_class(tree.text(parent));
                    if lemma_class.map(|c| c.is_intentional()).unwrap_or(false) {
                        signals.push(Signal::SubjectOfIntentionalAct);
                    }
                    if DURATION_VERBS
                        .contains(&tree.text(parent).to_lowercase().trim_end_matches("ed"))
                        || DURATION_VERBS.contains(&tree.text(parent).to_lowercase().as_str())
                    {
                        signals.push(Signal::DurationPredicate);
                    }
                }
                // Copular predication with an adjectival predicate.
                if rel == Relation::Nsubj
                    && tree.has_child(parent, Relation::Cop)
                    && tree.tag(parent).is_adjective()
                {
                    signals.push(Signal::PredicateAdjective);
                }
            }

            out.push(Ambiguity {
                kind: AmbiguityKind::NounCategory {
                    noun: head_word.clone(),
                },
                node_iri: referent.iri.clone(),
                span: referent.span,
                readings: vec!["continuant".to_string(), "process".to_string()],
                default_reading: "continuant".to_string(),
                signals,
                confidence: Confidence::Medium,
            });
        }
    }

    fn detect_scope(
        &self,
        tree: &DepTree,
        analysis: &SentenceAnalysis,
        out: &mut Vec<Ambiguity>,
    ) {
        let negated = analysis.verb_phrases.iter().any(|v| v.is_negated)
            || analysis.assertions.iter().any(|a| a.negated);

        let quantified: Vec<(&crate::graph::DiscourseReferent, String)> = analysis
            .referents
            .iter()
            .filter_map(|r| {
                tree.children(r.head_index)
                    .iter()
                    .find(|(d, rel)| {
                        *rel == Relation::Det
                            && QUANTIFIER_WORDS.contains(&tree.text(*d).to_lowercase().as_str())
                    })
                    .map(|(d, _)| (r, tree.text(*d).to_lowercase()))
            })
            .collect();

        for (referent, quantifier) in &quantified {
            if !UNIVERSAL_QUANTIFIERS.contains(&quantifier.as_str()) {
                continue;
            }
            let other_quantifier = quantified
                .iter()
                .any(|(r, _)| r.iri != referent.iri);
            if !negated && !other_quantifier {
                continue;
            }
            out.push(Ambiguity {
                kind: AmbiguityKind::Scope {
                    quantifier: quantifier.clone(),
                    formalizations: Formalizations {
                        wide: "\u{00AC}\u{2200}x P(x)".to_string(),
                        narrow: "\u{2200}x \u{00AC}P(x)".to_string(),
                    },
                },
                node_iri: referent.iri.clone(),
                span: referent.span,
                readings: vec!["wide".to_string(), "narrow".to_string()],
                default_reading: "wide".to_string(),
                signals: Vec::new(),
                confidence: Confidence::Medium,
            });
        }
    }

    fn detect_selectional(
        &self,
        tree: &DepTree,
        analysis: &mut SentenceAnalysis,
        out: &mut Vec<Ambiguity>,
    ) {
        // Read phase over a shared view; the act flags are written after.
        let view: &SentenceAnalysis = analysis;
        let mut flags: Vec<(String, Violation, String, Option<String>)> = Vec::new();
        for phrase in &view.verb_phrases {
            let agent_iri = match self.subject_referent_iri(
                tree,
                view,
                phrase.head_index,
                phrase.is_passive,
            ) {
                Some(iri) => iri,
                None => continue,
            };
            let Some(agent) = view.referent_by_iri(&agent_iri) else {
                continue;
            };
            let agent_categories =
                categorize_entity(agent.denotes_type.curie(), &surface_core(agent));

            let patient_rel = if phrase.is_passive {
                Relation::NsubjPass
            } else {
                Relation::Obj
            };
            let patient = tree
                .child_with(phrase.head_index, patient_rel)
                .and_then(|h| view.referent_by_head(h));
            let patient_categories = patient
                .map(|p| categorize_entity(p.denotes_type.curie(), &surface_core(p)));

            if let Some(violation) = self.prefs.get_violation(
                &phrase.lemma,
                &agent_categories,
                patient_categories.as_deref(),
            ) {
                flags.push((
                    phrase.about.clone(),
                    violation,
                    agent.surface.clone(),
                    patient.map(|p| p.surface.clone()),
                ));
            }
        }

        for (act_iri, violation, agent, patient) in flags {
            if let Some(act) = analysis.acts.iter_mut().find(|a| a.iri == act_iri) {
                act.has_ambiguity = true;
                act.ambiguity_type = Some(violation.signal.as_str().to_string());
                act.ontology_constraint = Some(violation.ontology_constraint.clone());
            }
            let span = analysis
                .verb_phrases
                .iter()
                .find(|v| v.about == act_iri)
                .map(|v| v.span)
                .unwrap_or((0, 0));
            out.push(Ambiguity {
                kind: AmbiguityKind::SelectionalViolation {
                    violation,
                    agent,
                    patient,
                },
                node_iri: act_iri,
                span,
                readings: Vec::new(),
                default_reading: "anomalous".to_string(),
                signals: Vec::new(),
                confidence: Confidence::High,
            });
        }
    }

    fn detect_metonymy(
        &self,
        tree: &DepTree,
        analysis: &SentenceAnalysis,
        out: &mut Vec<Ambiguity>,
    ) {
        for phrase in &analysis.verb_phrases {
            let Some(subject_iri) =
                self.subject_referent_iri(tree, analysis, phrase.head_index, phrase.is_passive)
            else {
                continue;
            };
            let Some(subject) = analysis.referent_by_iri(&subject_iri) else {
                continue;
            };
            let core = surface_core(subject);
            if !crate::gazetteer::is_metonymic_location(&core) {
                continue;
            }
            let Some(class) = self.prefs.get_verb_class(&phrase.lemma) else {
                continue;
            };
            let reqs = self.prefs.requirements(class);
            if !reqs
                .subject_required
                .contains(&crate::selectional::EntityCategory::Organization)
            {
                continue;
            }
            out.push(Ambiguity {
                kind: AmbiguityKind::PotentialMetonymy {
                    literal_type: "cco:Artifact".to_string(),
                    suggested_type: "cco:Organization".to_string(),
                },
                node_iri: subject.iri.clone(),
                span: subject.span,
                readings: vec![
                    "literal_location".to_string(),
                    "organization".to_string(),
                ],
                default_reading: "literal_location".to_string(),
                signals: Vec::new(),
                confidence: Confidence::Medium,
            });
        }
    }
}

/// The mention text without its determiner, for category lookups.
fn surface_core(referent: &crate::graph::DiscourseReferent) -> String {
    let lower = referent.surface.to_lowercase();
    for det in ["the ", "a ", "an "] {
        if let Some(rest) = lower.strip_prefix(det) {
            return rest.to_string();
        }
    }
    lower
}
