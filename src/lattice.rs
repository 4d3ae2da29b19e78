//! Alternative-reading construction and the interpretation lattice.
//!
//! Every preserved ambiguity yields one alternative per non-default
//! reading: a clone of the original node, re-typed or re-annotated, with a
//! plausibility drawn from the probability left over by the default
//! reading. Caps bound both per-node readings and the lattice as a whole.

use tracing::debug;

use crate::ambiguity::AmbiguityKind;
use crate::graph::Modality;
use crate::iri::IriMinter;
use crate::resolver::{Resolution, ResolutionSet, ResolverConfig};

pub const PLAUSIBILITY_FLOOR: f64 = 0.05;
pub const PLAUSIBILITY_CEILING: f64 = 0.95;

/// Kind-specific annotation carried by an alternative node.
#[derive(Debug, Clone)]
pub enum AlternativePayload {
    ModalForce {
        modality: Modality,
        actuality: &'static str,
    },
    NounCategory {
        /// `bfo:Process` or `bfo:Continuant`, appended to the clone's types.
        appended_type: &'static str,
    },
    Scope {
        formalization: String,
    },
    Metonymy {
        metonymic_source: String,
        literal_type: String,
        metonymy_type: &'static str,
    },
}

#[derive(Debug, Clone)]
pub struct AlternativeReading {
    /// `<parent>_alt_<reading>`, disjoint from every default IRI.
    pub iri: String,
    /// IRI of the default-graph node this clone derives from.
    pub derived_from: String,
    pub reading: String,
    pub plausibility: f64,
    pub payload: AlternativePayload,
}

#[derive(Debug, Clone)]
pub struct InterpretationLattice {
    pub default_plausibility: f64,
    pub alternatives: Vec<AlternativeReading>,
    pub resolutions: ResolutionSet,
    pub ambiguities_preserved: usize,
}

pub struct AlternativeGraphBuilder {
    config: ResolverConfig,
}

impl AlternativeGraphBuilder {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, resolutions: ResolutionSet) -> InterpretationLattice {
        let mut alternatives = Vec::new();
        for resolution in &resolutions.preserved {
            self.alternatives_for(resolution, &mut alternatives);
        }
        if alternatives.len() > self.config.max_total_alternatives {
            debug!(
                dropped = alternatives.len() - self.config.max_total_alternatives,
                "alternative cap reached"
            );
            alternatives.truncate(self.config.max_total_alternatives);
        }
        let preserved = resolutions.preserved.len();
        InterpretationLattice {
            default_plausibility: self.config.default_plausibility,
            alternatives,
            resolutions,
            ambiguities_preserved: preserved,
        }
    }

    fn alternatives_for(&self, resolution: &Resolution, out: &mut Vec<AlternativeReading>) {
        let ambiguity = &resolution.ambiguity;
        let mut readings: Vec<String> = ambiguity
            .readings
            .iter()
            .filter(|r| **r != ambiguity.default_reading)
            .cloned()
            .collect();
        // The default reading occupies one slot of the per-node cap.
        let cap = self.config.max_readings_per_node.saturating_sub(1);
        readings.truncate(cap);
        if readings.is_empty() {
            return;
        }
        let base = (1.0 - self.config.default_plausibility) / readings.len() as f64;

        for reading in &readings {
            let payload = match &ambiguity.kind {
                AmbiguityKind::ModalForce { .. } => {
                    let Some(modality) = Modality::from_str(reading) else {
                        continue;
                    };
                    AlternativePayload::ModalForce {
                        modality,
                        actuality: modality.actuality(),
                    }
                }
                AmbiguityKind::NounCategory { .. } => AlternativePayload::NounCategory {
                    appended_type: if reading.as_str() == "process" {
                        "bfo:Process"
                    } else {
                        "bfo:Continuant"
                    },
                },
                AmbiguityKind::Scope { formalizations, .. } => AlternativePayload::Scope {
                    formalization: if reading.as_str() == "wide" {
                        formalizations.wide.clone()
                    } else {
                        formalizations.narrow.clone()
                    },
                },
                AmbiguityKind::PotentialMetonymy { literal_type, .. } => {
                    AlternativePayload::Metonymy {
                        metonymic_source: ambiguity.node_iri.clone(),
                        literal_type: literal_type.clone(),
                        metonymy_type: "location_for_institution",
                    }
                }
                // Violations are flagged, never cloned.
                AmbiguityKind::SelectionalViolation { .. } => continue,
            };

            let plausibility = self.plausibility(&ambiguity.kind, reading, base, resolution);
            out.push(AlternativeReading {
                iri: IriMinter::mint_alternative(&ambiguity.node_iri, reading),
                derived_from: ambiguity.node_iri.clone(),
                reading: reading.to_string(),
                plausibility,
                payload,
            });
        }
    }

    fn plausibility(
        &self,
        kind: &AmbiguityKind,
        reading: &str,
        base: f64,
        resolution: &Resolution,
    ) -> f64 {
        let raw = match kind {
            AmbiguityKind::Scope { .. } => {
                if reading == "wide" {
                    0.4
                } else {
                    0.35
                }
            }
            AmbiguityKind::PotentialMetonymy { .. } => 0.6,
            AmbiguityKind::ModalForce { .. } => {
                // Intensifier evidence shifts the clone's plausibility
                // toward or away from its force.
                let net = resolution.modal_net_boost;
                let boost = match Modality::from_str(reading) {
                    Some(m) if net > 0.0 => {
                        if m.is_deontic() {
                            0.15
                        } else {
                            -0.15
                        }
                    }
                    Some(m) if net < 0.0 => {
                        if m.is_deontic() {
                            -0.15
                        } else {
                            0.15
                        }
                    }
                    _ => 0.0,
                };
                base + boost
            }
            _ => base,
        };
        raw.clamp(PLAUSIBILITY_FLOOR, PLAUSIBILITY_CEILING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ambiguity::{Ambiguity, Confidence, Formalizations};
    use crate::resolver::DecisionCategory;

    fn preserved(ambiguity: Ambiguity) -> ResolutionSet {
        let mut set = ResolutionSet::default();
        set.push(Resolution {
            ambiguity,
            category: DecisionCategory::Preserved,
            reason: "balanced_evidence".to_string(),
            confidence: 0.6,
            preserve_alternatives: true,
            explanation: None,
            resolved_reading: None,
            modal_net_boost: 0.0,
        });
        set
    }

    fn modal_ambiguity() -> Ambiguity {
        Ambiguity {
            kind: AmbiguityKind::ModalForce {
                modal: "should".to_string(),
                readings: vec![Modality::Recommendation, Modality::Expectation],
            },
            node_iri: "inst:allocate_ab12cd34".to_string(),
            span: (11, 26),
            readings: vec!["recommendation".to_string(), "expectation".to_string()],
            default_reading: "recommendation".to_string(),
            signals: Vec::new(),
            confidence: Confidence::Medium,
        }
    }

    #[test]
    fn modal_alternative_iri_and_payload() {
        let lattice =
            AlternativeGraphBuilder::new(ResolverConfig::default()).build(preserved(modal_ambiguity()));
        assert_eq!(lattice.alternatives.len(), 1);
        let alt = &lattice.alternatives[0];
        assert_eq!(alt.iri, "inst:allocate_ab12cd34_alt_expectation");
        assert_eq!(alt.derived_from, "inst:allocate_ab12cd34");
        match &alt.payload {
            AlternativePayload::ModalForce {
                modality,
                actuality,
            } => {
                assert_eq!(*modality, Modality::Expectation);
                assert_eq!(*actuality, "tagteam:Hypothetical");
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn default_and_alternatives_split_probability() {
        let lattice =
            AlternativeGraphBuilder::new(ResolverConfig::default()).build(preserved(modal_ambiguity()));
        assert!((lattice.default_plausibility - 0.7).abs() < 1e-9);
        let alt = &lattice.alternatives[0];
        assert!((alt.plausibility - 0.3).abs() < 1e-9);
    }

    #[test]
    fn plausibility_clamped() {
        let mut set = preserved(modal_ambiguity());
        set.preserved[0].modal_net_boost = -0.5;
        let lattice = AlternativeGraphBuilder::new(ResolverConfig::default()).build(set);
        let alt = &lattice.alternatives[0];
        // Epistemic evidence boosts the epistemic clone: 0.3 + 0.15.
        assert!((alt.plausibility - 0.45).abs() < 1e-9);
        assert!(alt.plausibility > PLAUSIBILITY_FLOOR && alt.plausibility < PLAUSIBILITY_CEILING);
    }

    #[test]
    fn scope_plausibilities_fixed() {
        let ambiguity = Ambiguity {
            kind: AmbiguityKind::Scope {
                quantifier: "every".to_string(),
                formalizations: Formalizations {
                    wide: "\u{00AC}\u{2200}x P(x)".to_string(),
                    narrow: "\u{2200}x \u{00AC}P(x)".to_string(),
                },
            },
            node_iri: "inst:student_ff00aa11".to_string(),
            span: (0, 13),
            readings: vec!["wide".to_string(), "narrow".to_string()],
            default_reading: "wide".to_string(),
            signals: Vec::new(),
            confidence: Confidence::Medium,
        };
        let lattice = AlternativeGraphBuilder::new(ResolverConfig::default()).build(preserved(ambiguity));
        assert_eq!(lattice.alternatives.len(), 1);
        let narrow = &lattice.alternatives[0];
        assert_eq!(narrow.reading, "narrow");
        assert!((narrow.plausibility - 0.35).abs() < 1e-9);
        match &narrow.payload {
            AlternativePayload::Scope { formalization } => {
                assert_eq!(formalization, "\u{2200}x \u{00AC}P(x)");
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn metonymy_clone_shape() {
        let ambiguity = Ambiguity {
            kind: AmbiguityKind::PotentialMetonymy {
                literal_type: "cco:Artifact".to_string(),
                suggested_type: "cco:Organization".to_string(),
            },
            node_iri: "inst:white_house_9e8d7c6b".to_string(),
            span: (0, 15),
            readings: vec!["literal_location".to_string(), "organization".to_string()],
            default_reading: "literal_location".to_string(),
            signals: Vec::new(),
            confidence: Confidence::Medium,
        };
        let lattice = AlternativeGraphBuilder::new(ResolverConfig::default()).build(preserved(ambiguity));
        let alt = &lattice.alternatives[0];
        assert_eq!(alt.reading, "organization");
        assert!((alt.plausibility - 0.6).abs() < 1e-9);
        match &alt.payload {
            AlternativePayload::Metonymy {
                metonymy_type,
                literal_type,
                ..
            } => {
                assert_eq!(*metonymy_type, "location_for_institution");
                assert_eq!(literal_type, "cco:Artifact");
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn total_alternatives_capped() {
        let mut set = ResolutionSet::default();
        for i in 0..15 {
            let mut ambiguity = modal_ambiguity();
            ambiguity.node_iri = format!("inst:act_{:08x}", i);
            set.push(Resolution {
                ambiguity,
                category: DecisionCategory::Preserved,
                reason: "balanced_evidence".to_string(),
                confidence: 0.6,
                preserve_alternatives: true,
                explanation: None,
                resolved_reading: None,
                modal_net_boost: 0.0,
            });
        }
        let lattice = AlternativeGraphBuilder::new(ResolverConfig::default()).build(set);
        assert_eq!(lattice.alternatives.len(), 10);
        assert_eq!(lattice.ambiguities_preserved, 15);
    }
}
