//! Ambiguity resolution: decide per ambiguity whether to preserve
//! alternatives, resolve to one reading, or only flag.
//!
//! The decision policy is fixed per ambiguity type; modal force runs a
//! hierarchy of evidence combining structural signals with an adverbial
//! scan of the sentence.

use crate::ambiguity::{Ambiguity, AmbiguityKind, Signal};
use crate::graph::Modality;
use crate::token::Token;

/// Adverbs that strengthen the deontic reading of a modal.
static DEONTIC_ADVERBS: &[&str] = &[
    "absolutely",
    "certainly",
    "definitely",
    "imperatively",
    "necessarily",
    "strongly",
    "unquestionably",
];

/// Adverbs that strengthen the epistemic reading.
static EPISTEMIC_ADVERBS: &[&str] = &[
    "apparently",
    "conceivably",
    "likely",
    "maybe",
    "perhaps",
    "possibly",
    "presumably",
    "probably",
];

#[derive(Debug, Clone, Copy)]
pub struct ResolverConfig {
    pub preserve_threshold: f64,
    pub max_readings_per_node: usize,
    pub max_total_alternatives: usize,
    pub always_preserve_scope: bool,
    pub use_selectional_evidence: bool,
    /// Plausibility assigned to the default reading in the lattice.
    pub default_plausibility: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            preserve_threshold: 0.7,
            max_readings_per_node: 3,
            max_total_alternatives: 10,
            always_preserve_scope: true,
            use_selectional_evidence: true,
            default_plausibility: 0.7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionCategory {
    Preserved,
    Resolved,
    FlaggedOnly,
}

impl DecisionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionCategory::Preserved => "preserved",
            DecisionCategory::Resolved => "resolved",
            DecisionCategory::FlaggedOnly => "flaggedOnly",
        }
    }
}

/// One audited decision.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub ambiguity: Ambiguity,
    pub category: DecisionCategory,
    pub reason: String,
    pub confidence: f64,
    pub preserve_alternatives: bool,
    pub explanation: Option<String>,
    /// The winning reading, for resolved decisions.
    pub resolved_reading: Option<String>,
    /// Net deontic-minus-epistemic adverb boost, kept so the lattice can
    /// reweigh alternative plausibilities.
    pub modal_net_boost: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ResolutionSet {
    pub preserved: Vec<Resolution>,
    pub resolved: Vec<Resolution>,
    pub flagged_only: Vec<Resolution>,
}

impl ResolutionSet {
    pub fn push(&mut self, resolution: Resolution) {
        match resolution.category {
            DecisionCategory::Preserved => self.preserved.push(resolution),
            DecisionCategory::Resolved => self.resolved.push(resolution),
            DecisionCategory::FlaggedOnly => self.flagged_only.push(resolution),
        }
    }

    pub fn len(&self) -> usize {
        self.preserved.len() + self.resolved.len() + self.flagged_only.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct AmbiguityResolver {
    config: ResolverConfig,
}

impl AmbiguityResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn resolve(&self, ambiguities: Vec<Ambiguity>, tokens: &[Token]) -> ResolutionSet {
        let mut out = ResolutionSet::default();
        for ambiguity in ambiguities {
            let resolution = match &ambiguity.kind {
                AmbiguityKind::SelectionalViolation { .. } => Resolution {
                    category: DecisionCategory::FlaggedOnly,
                    reason: "anomalous_input".to_string(),
                    confidence: ambiguity.confidence.value(),
                    preserve_alternatives: false,
                    explanation: Some(
                        "argument violates the verb's selectional preferences; \
                         flagged rather than reinterpreted"
                            .to_string(),
                    ),
                    resolved_reading: None,
                    modal_net_boost: 0.0,
                    ambiguity,
                },
                AmbiguityKind::PotentialMetonymy { suggested_type, .. } => {
                    let suggestion = format!(
                        "metonymic location; consider retyping as {}",
                        suggested_type
                    );
                    Resolution {
                        category: DecisionCategory::FlaggedOnly,
                        reason: "metonymy_flag".to_string(),
                        confidence: ambiguity.confidence.value(),
                        preserve_alternatives: false,
                        explanation: Some(suggestion),
                        resolved_reading: None,
                        modal_net_boost: 0.0,
                        ambiguity,
                    }
                }
                AmbiguityKind::Scope { .. } => self.resolve_scope(ambiguity),
                AmbiguityKind::ModalForce { .. } => self.resolve_modal(ambiguity, tokens),
                AmbiguityKind::NounCategory { .. } => self.resolve_noun(ambiguity),
            };
            out.push(resolution);
        }
        out
    }

    fn resolve_scope(&self, ambiguity: Ambiguity) -> Resolution {
        let confidence = ambiguity.confidence.value();
        if self.config.always_preserve_scope || confidence < self.config.preserve_threshold {
            Resolution {
                category: DecisionCategory::Preserved,
                reason: "scope_always_preserved".to_string(),
                confidence,
                preserve_alternatives: true,
                explanation: None,
                resolved_reading: None,
                modal_net_boost: 0.0,
                ambiguity,
            }
        } else {
            let reading = ambiguity.default_reading.clone();
            Resolution {
                category: DecisionCategory::Resolved,
                reason: "scope_confidence_above_threshold".to_string(),
                confidence,
                preserve_alternatives: false,
                explanation: None,
                resolved_reading: Some(reading),
                modal_net_boost: 0.0,
                ambiguity,
            }
        }
    }

    /// Hierarchy of evidence for modal force: structural signals, then the
    /// adverbial scan, then the threshold test.
    fn resolve_modal(&self, ambiguity: Ambiguity, tokens: &[Token]) -> Resolution {
        let base = ambiguity.confidence.value();
        let mut deontic: f64 = 0.0;
        let mut epistemic: f64 = 0.0;

        for signal in &ambiguity.signals {
            match signal {
                Signal::AgentSubject => deontic += 0.1,
                Signal::IntentionalAct => deontic += 0.1,
                Signal::SecondPersonSubject => deontic += 0.15,
                Signal::PerfectAspect => epistemic += 0.2,
                Signal::StativeVerb => epistemic += 0.1,
                _ => {}
            }
        }

        // Adverbial scan. Only this part carries over into alternative
        // plausibilities; structural signals decide but do not reweigh.
        let mut adverb_net: f64 = 0.0;
        for token in tokens {
            let lower = token.text.to_lowercase();
            if DEONTIC_ADVERBS.contains(&lower.as_str()) {
                deontic += 0.15;
                adverb_net += 0.15;
            }
            if EPISTEMIC_ADVERBS.contains(&lower.as_str()) {
                epistemic += 0.15;
                adverb_net -= 0.15;
            }
        }

        let net = deontic - epistemic;
        let adjusted = (base + net.abs()).min(1.0);

        let favored = self.favored_modal_reading(&ambiguity, net);
        if net.abs() >= 0.2 {
            return Resolution {
                category: DecisionCategory::Resolved,
                reason: "evidence_hierarchy".to_string(),
                confidence: adjusted,
                preserve_alternatives: false,
                explanation: Some(format!(
                    "net {} evidence {:.2}",
                    if net > 0.0 { "deontic" } else { "epistemic" },
                    net.abs()
                )),
                resolved_reading: favored,
                modal_net_boost: adverb_net,
                ambiguity,
            };
        }
        if adjusted >= self.config.preserve_threshold {
            let reading = favored.or_else(|| Some(ambiguity.default_reading.clone()));
            return Resolution {
                category: DecisionCategory::Resolved,
                reason: "confidence_above_threshold".to_string(),
                confidence: adjusted,
                preserve_alternatives: false,
                explanation: None,
                resolved_reading: reading,
                modal_net_boost: adverb_net,
                ambiguity,
            };
        }
        Resolution {
            category: DecisionCategory::Preserved,
            reason: "balanced_evidence".to_string(),
            confidence: adjusted,
            preserve_alternatives: true,
            explanation: None,
            resolved_reading: None,
            modal_net_boost: adverb_net,
            ambiguity,
        }
    }

    /// The reading the evidence points at: deontic boost selects the
    /// deontic member of the pair, epistemic the other.
    fn favored_modal_reading(&self, ambiguity: &Ambiguity, net: f64) -> Option<String> {
        let AmbiguityKind::ModalForce { readings, .. } = &ambiguity.kind else {
            return None;
        };
        if net == 0.0 {
            return Some(ambiguity.default_reading.clone());
        }
        let want_deontic = net > 0.0;
        readings
            .iter()
            .find(|m| m.is_deontic() == want_deontic)
            .map(|m| m.as_str().to_string())
            .or_else(|| Some(ambiguity.default_reading.clone()))
    }

    fn resolve_noun(&self, ambiguity: Ambiguity) -> Resolution {
        let confidence = ambiguity.confidence.value();
        let has = |s: Signal| ambiguity.signals.contains(&s);

        if self.config.use_selectional_evidence && has(Signal::SubjectOfIntentionalAct) {
            return Resolution {
                category: DecisionCategory::Resolved,
                reason: "selectional_match".to_string(),
                confidence: 0.99,
                preserve_alternatives: false,
                explanation: Some(
                    "subject of an intentional act must be a continuant".to_string(),
                ),
                resolved_reading: Some("continuant".to_string()),
                modal_net_boost: 0.0,
                ambiguity,
            };
        }
        if has(Signal::OfComplement) && confidence < 0.9 {
            return Resolution {
                category: DecisionCategory::Preserved,
                reason: "of_complement_underdetermined".to_string(),
                confidence,
                preserve_alternatives: true,
                explanation: None,
                resolved_reading: Some("process".to_string()),
                modal_net_boost: 0.0,
                ambiguity,
            };
        }
        if has(Signal::DurationPredicate) || has(Signal::PredicateAdjective) {
            return Resolution {
                category: DecisionCategory::Resolved,
                reason: "structural_signal".to_string(),
                confidence: 0.85,
                preserve_alternatives: false,
                explanation: None,
                resolved_reading: Some("process".to_string()),
                modal_net_boost: 0.0,
                ambiguity,
            };
        }
        Resolution {
            category: DecisionCategory::Resolved,
            reason: "default_heuristic".to_string(),
            confidence: 0.6,
            preserve_alternatives: false,
            explanation: None,
            resolved_reading: Some("continuant".to_string()),
            modal_net_boost: 0.0,
            ambiguity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ambiguity::{Confidence, Formalizations};

    fn modal_ambiguity(signals: Vec<Signal>) -> Ambiguity {
        Ambiguity {
            kind: AmbiguityKind::ModalForce {
                modal: "should".to_string(),
                readings: vec![Modality::Recommendation, Modality::Expectation],
            },
            node_iri: "inst:allocate_abc12345".to_string(),
            span: (11, 26),
            readings: vec!["recommendation".to_string(), "expectation".to_string()],
            default_reading: "recommendation".to_string(),
            signals,
            confidence: Confidence::Medium,
        }
    }

    fn toks(words: &[&str]) -> Vec<Token> {
        words
            .iter()
            .enumerate()
            .map(|(i, w)| Token::new(*w, i * 5, i * 5 + w.len()))
            .collect()
    }

    #[test]
    fn balanced_modal_is_preserved() {
        let resolver = AmbiguityResolver::new(ResolverConfig::default());
        let set = resolver.resolve(
            vec![modal_ambiguity(vec![Signal::AgentSubject])],
            &toks(&["the", "doctor", "should", "allocate"]),
        );
        assert_eq!(set.preserved.len(), 1);
        assert_eq!(set.preserved[0].reason, "balanced_evidence");
    }

    #[test]
    fn strong_deontic_evidence_resolves() {
        let resolver = AmbiguityResolver::new(ResolverConfig::default());
        let set = resolver.resolve(
            vec![modal_ambiguity(vec![
                Signal::AgentSubject,
                Signal::IntentionalAct,
            ])],
            &toks(&["you", "absolutely", "should"]),
        );
        assert_eq!(set.resolved.len(), 1);
        assert_eq!(
            set.resolved[0].resolved_reading.as_deref(),
            Some("recommendation")
        );
    }

    #[test]
    fn epistemic_adverb_resolves_to_expectation() {
        let resolver = AmbiguityResolver::new(ResolverConfig::default());
        let set = resolver.resolve(
            vec![modal_ambiguity(vec![Signal::PerfectAspect])],
            &toks(&["she", "should", "probably", "have", "arrived"]),
        );
        assert_eq!(set.resolved.len(), 1);
        assert_eq!(
            set.resolved[0].resolved_reading.as_deref(),
            Some("expectation")
        );
    }

    #[test]
    fn scope_always_preserved_by_default() {
        let resolver = AmbiguityResolver::new(ResolverConfig::default());
        let ambiguity = Ambiguity {
            kind: AmbiguityKind::Scope {
                quantifier: "every".to_string(),
                formalizations: Formalizations {
                    wide: "w".to_string(),
                    narrow: "n".to_string(),
                },
            },
            node_iri: "inst:student_ab".to_string(),
            span: (0, 5),
            readings: vec!["wide".to_string(), "narrow".to_string()],
            default_reading: "wide".to_string(),
            signals: Vec::new(),
            confidence: Confidence::High,
        };
        let set = resolver.resolve(vec![ambiguity], &[]);
        assert_eq!(set.preserved.len(), 1);
    }

    #[test]
    fn noun_with_intentional_subject_resolves_continuant() {
        let resolver = AmbiguityResolver::new(ResolverConfig::default());
        let ambiguity = Ambiguity {
            kind: AmbiguityKind::NounCategory {
                noun: "committee".to_string(),
            },
            node_iri: "inst:committee_xy".to_string(),
            span: (0, 9),
            readings: vec!["continuant".to_string(), "process".to_string()],
            default_reading: "continuant".to_string(),
            signals: vec![Signal::SubjectOfIntentionalAct],
            confidence: Confidence::Medium,
        };
        let set = resolver.resolve(vec![ambiguity], &[]);
        assert_eq!(set.resolved.len(), 1);
        assert!((set.resolved[0].confidence - 0.99).abs() < 1e-9);
    }

    #[test]
    fn of_complement_preserves_with_process_default() {
        let resolver = AmbiguityResolver::new(ResolverConfig::default());
        let ambiguity = Ambiguity {
            kind: AmbiguityKind::NounCategory {
                noun: "allocation".to_string(),
            },
            node_iri: "inst:allocation_xy".to_string(),
            span: (0, 10),
            readings: vec!["continuant".to_string(), "process".to_string()],
            default_reading: "continuant".to_string(),
            signals: vec![Signal::OfComplement],
            confidence: Confidence::Medium,
        };
        let set = resolver.resolve(vec![ambiguity], &[]);
        assert_eq!(set.preserved.len(), 1);
        assert_eq!(
            set.preserved[0].resolved_reading.as_deref(),
            Some("process")
        );
    }
}
