//! JSON-LD serialization: the fixed context and node rendering.
//!
//! Property keys in emitted nodes are context terms; the `@context` maps
//! them to their authoritative IRIs, including the opaque CCO 2.0
//! identifiers (`is_about` → `cco:ont00001808`, `Organization` →
//! `cco:ont00001180`). `serde_json`'s map keeps keys sorted, so identical
//! input always serializes to identical bytes.

use serde_json::{json, Map, Value};

use crate::ambiguity::{Ambiguity, AmbiguityKind};
use crate::graph::{
    ArtificialAgent, DiscourseReferent, InformationBearingEntity, ParsingAct, RealWorldAct,
    RealWorldEntity, Role, SentenceAnalysis, StructuralAssertion, VerbPhrase,
};
use crate::lattice::{AlternativePayload, AlternativeReading, InterpretationLattice};
use crate::resolver::Resolution;

/// Provenance triad emitted into every graph.
#[derive(Debug, Clone)]
pub struct ProvenanceTriad {
    pub ibe: InformationBearingEntity,
    pub agent: ArtificialAgent,
    pub act: ParsingAct,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLdSerializer;

impl JsonLdSerializer {
    /// The fixed context: namespaces, type coercions for every object
    /// property, numeric and timestamp coercions, and the
    /// compatibility-critical class aliases.
    pub fn context() -> Value {
        json!({
            "bfo": "http://purl.obolibrary.org/obo/",
            "cco": "https://www.commoncoreontologies.org/",
            "tagteam": "http://tagteam.io/ont/",
            "inst": "http://tagteam.io/inst/",
            "rdf": "http://www.w3.org/1999/02/22-rdf-syntax-ns#",
            "rdfs": "http://www.w3.org/2000/01/rdf-schema#",
            "owl": "http://www.w3.org/2002/07/owl#",
            "xsd": "http://www.w3.org/2001/XMLSchema#",

            // Object properties.
            "is_about": {"@id": "cco:ont00001808", "@type": "@id"},
            "is_concretized_by": {"@id": "tagteam:isConcretizedBy", "@type": "@id"},
            "inheres_in": {"@id": "cco:inheres_in", "@type": "@id"},
            "is_bearer_of": {"@id": "cco:is_bearer_of", "@type": "@id"},
            "realized_in": {"@id": "bfo:realized_in", "@type": "@id"},
            "has_input": {"@id": "cco:has_input", "@type": "@id"},
            "has_agent": {"@id": "cco:has_agent", "@type": "@id"},
            "has_output": {"@id": "cco:has_output", "@type": "@id"},
            "derivedFrom": {"@id": "tagteam:derivedFrom", "@type": "@id"},
            "denotesType": {"@id": "tagteam:denotesType", "@type": "@id"},
            "isDenotedBy": {"@id": "tagteam:isDenotedBy", "@type": "@id"},
            "subject": {"@id": "tagteam:subject", "@type": "@id"},
            "relation": {"@id": "tagteam:relation", "@type": "@id"},
            "object": {"@id": "tagteam:object", "@type": "@id"},

            // Literals.
            "spanStart": {"@id": "tagteam:spanStart", "@type": "xsd:integer"},
            "spanEnd": {"@id": "tagteam:spanEnd", "@type": "xsd:integer"},
            "indexStart": {"@id": "tagteam:indexStart", "@type": "xsd:integer"},
            "indexEnd": {"@id": "tagteam:indexEnd", "@type": "xsd:integer"},
            "quantity": {"@id": "tagteam:quantity", "@type": "xsd:integer"},
            "charCount": {"@id": "tagteam:charCount", "@type": "xsd:integer"},
            "wordCount": {"@id": "tagteam:wordCount", "@type": "xsd:integer"},
            "plausibility": {"@id": "tagteam:plausibility", "@type": "xsd:decimal"},
            "confidence": {"@id": "tagteam:confidence", "@type": "xsd:decimal"},
            "receivedAt": {"@id": "tagteam:receivedAt", "@type": "xsd:dateTime"},
            "timestamp": {"@id": "tagteam:timestamp", "@type": "xsd:dateTime"},

            // Compatibility-critical class aliases (opaque CCO 2.0 ids).
            "DiscourseReferent": "tagteam:DiscourseReferent",
            "VerbPhrase": "tagteam:VerbPhrase",
            "Organization": "cco:ont00001180",
            "InformationBearingEntity": "cco:InformationBearingEntity",
            "ArtificialAgent": "cco:ArtificialAgent",
            "IntentionalAct": "cco:IntentionalAct"
        })
    }

    /// Render the default graph: tier 1, tier 2, assertions, roles, and the
    /// provenance triad, in that order.
    pub fn graph_nodes(
        &self,
        analysis: &SentenceAnalysis,
        provenance: &ProvenanceTriad,
    ) -> Vec<Value> {
        let ibe_iri = provenance.ibe.iri.as_str();
        let mut nodes = Vec::new();
        for referent in &analysis.referents {
            nodes.push(self.referent_node(referent, ibe_iri, analysis));
        }
        for phrase in &analysis.verb_phrases {
            nodes.push(self.verb_phrase_node(phrase, ibe_iri));
        }
        for entity in &analysis.entities {
            nodes.push(self.entity_node(entity));
        }
        for act in &analysis.acts {
            nodes.push(self.act_node(act));
        }
        for assertion in &analysis.assertions {
            nodes.push(self.assertion_node(assertion));
        }
        for role in analysis.roles.iter() {
            nodes.push(self.role_node(role));
        }
        nodes.push(self.ibe_node(&provenance.ibe));
        nodes.push(self.agent_node(&provenance.agent));
        nodes.push(self.parsing_act_node(&provenance.act));
        nodes
    }

    fn referent_node(
        &self,
        referent: &DiscourseReferent,
        ibe_iri: &str,
        analysis: &SentenceAnalysis,
    ) -> Value {
        let mut node = Map::new();
        node.insert("@id".into(), json!(referent.iri));
        node.insert(
            "@type".into(),
            json!(["tagteam:DiscourseReferent", "cco:InformationContentEntity"]),
        );
        node.insert("rdfs:label".into(), json!(referent.surface));
        node.insert("tagteam:sourceText".into(), json!(referent.surface));
        node.insert("spanStart".into(), json!(referent.span.0));
        node.insert("spanEnd".into(), json!(referent.span.1));
        node.insert("tagteam:headPos".into(), json!(referent.head_pos.as_str()));
        node.insert("tagteam:udRole".into(), json!(referent.ud_role.as_str()));
        node.insert(
            "denotesType".into(),
            json!(referent.denotes_type.curie()),
        );
        node.insert(
            "tagteam:definiteness".into(),
            json!(referent.definiteness.as_str()),
        );
        if let Some(quantity) = referent.quantity {
            node.insert("quantity".into(), json!(quantity));
        }
        if let Some(indicator) = &referent.quantity_indicator {
            node.insert("tagteam:quantityIndicator".into(), json!(indicator));
        }
        if referent.is_scarce {
            node.insert("tagteam:isScarce".into(), json!(true));
        }
        match referent.aliases.len() {
            0 => {}
            1 => {
                node.insert("tagteam:alias".into(), json!(referent.aliases[0]));
            }
            _ => {
                node.insert("tagteam:alias".into(), json!(referent.aliases));
            }
        }
        if let Some(canonical) = &referent.canonical_form {
            node.insert("tagteam:resolvedVia".into(), json!("alias"));
            node.insert("tagteam:canonicalForm".into(), json!(canonical));
        }
        let borne = analysis.roles.borne_by(&referent.iri);
        if !borne.is_empty() {
            node.insert("is_bearer_of".into(), json!(borne));
        }
        node.insert("is_about".into(), json!(referent.about));
        node.insert("is_concretized_by".into(), json!(ibe_iri));
        Value::Object(node)
    }

    fn verb_phrase_node(&self, phrase: &VerbPhrase, ibe_iri: &str) -> Value {
        let mut node = Map::new();
        node.insert("@id".into(), json!(phrase.iri));
        node.insert(
            "@type".into(),
            json!(["tagteam:VerbPhrase", "cco:InformationContentEntity"]),
        );
        node.insert("rdfs:label".into(), json!(phrase.head_surface));
        node.insert("tagteam:lemma".into(), json!(phrase.lemma));
        if let Some(modal) = &phrase.modal {
            node.insert("tagteam:modal".into(), json!(modal));
        }
        if let Some(modality) = phrase.modality {
            node.insert("tagteam:modality".into(), json!(modality.as_str()));
        }
        if !phrase.auxiliaries.is_empty() {
            node.insert("tagteam:auxiliaries".into(), json!(phrase.auxiliaries));
        }
        node.insert("tagteam:tense".into(), json!(phrase.tense.as_str()));
        node.insert("tagteam:isPassive".into(), json!(phrase.is_passive));
        node.insert("tagteam:isPerfect".into(), json!(phrase.is_perfect));
        node.insert("tagteam:isNegated".into(), json!(phrase.is_negated));
        node.insert("tagteam:sourceText".into(), json!(phrase.source_text));
        node.insert("indexStart".into(), json!(phrase.index_range.0));
        node.insert("indexEnd".into(), json!(phrase.index_range.1));
        node.insert("spanStart".into(), json!(phrase.span.0));
        node.insert("spanEnd".into(), json!(phrase.span.1));
        node.insert("is_about".into(), json!(phrase.about));
        node.insert("is_concretized_by".into(), json!(ibe_iri));
        Value::Object(node)
    }

    fn entity_node(&self, entity: &RealWorldEntity) -> Value {
        json!({
            "@id": entity.iri,
            "@type": ["owl:NamedIndividual", entity.class.curie()],
            "rdfs:label": entity.label,
            "isDenotedBy": entity.mention,
        })
    }

    fn act_node(&self, act: &RealWorldAct) -> Value {
        let mut node = Map::new();
        node.insert("@id".into(), json!(act.iri));
        node.insert(
            "@type".into(),
            json!(["owl:NamedIndividual", "cco:IntentionalAct"]),
        );
        node.insert("rdfs:label".into(), json!(act.label));
        node.insert("isDenotedBy".into(), json!(act.mention));
        if let Some(modality) = act.modality {
            node.insert("tagteam:modality".into(), json!(modality.as_str()));
            node.insert(
                "tagteam:actualityStatus".into(),
                json!(modality.actuality()),
            );
        }
        if act.is_negated {
            node.insert("tagteam:isNegated".into(), json!(true));
        }
        if act.has_ambiguity {
            node.insert("tagteam:hasAmbiguity".into(), json!(true));
            if let Some(kind) = &act.ambiguity_type {
                node.insert("tagteam:ambiguityType".into(), json!(kind));
            }
            if let Some(constraint) = &act.ontology_constraint {
                node.insert("tagteam:ontologyConstraint".into(), json!(constraint));
            }
        }
        Value::Object(node)
    }

    fn assertion_node(&self, assertion: &StructuralAssertion) -> Value {
        let mut node = Map::new();
        node.insert("@id".into(), json!(assertion.iri));
        node.insert("@type".into(), json!(["tagteam:StructuralAssertion"]));
        node.insert(
            "tagteam:assertionType".into(),
            json!(assertion.kind.as_str()),
        );
        node.insert("subject".into(), json!(assertion.subject));
        if let Some(relation) = assertion.relation {
            node.insert("relation".into(), json!(relation));
        }
        if let Some(object) = &assertion.object {
            node.insert("object".into(), json!(object));
        }
        node.insert("tagteam:copula".into(), json!(assertion.copula));
        node.insert("tagteam:negated".into(), json!(assertion.negated));
        Value::Object(node)
    }

    fn role_node(&self, role: &Role) -> Value {
        json!({
            "@id": role.iri,
            "@type": ["owl:NamedIndividual", "bfo:Role", role.role_type.curie()],
            "inheres_in": role.bearer,
            "realized_in": role.act,
        })
    }

    fn ibe_node(&self, ibe: &InformationBearingEntity) -> Value {
        json!({
            "@id": ibe.iri,
            "@type": ["owl:NamedIndividual", "cco:InformationBearingEntity"],
            "rdfs:label": "input text",
            "tagteam:textValue": ibe.text,
            "charCount": ibe.char_count,
            "wordCount": ibe.word_count,
            "receivedAt": ibe.received_at.to_rfc3339(),
        })
    }

    fn agent_node(&self, agent: &ArtificialAgent) -> Value {
        json!({
            "@id": agent.iri,
            "@type": ["owl:NamedIndividual", "cco:ArtificialAgent"],
            "rdfs:label": agent.name,
            "tagteam:version": agent.version,
            "tagteam:capabilities": agent.capabilities,
        })
    }

    fn parsing_act_node(&self, act: &ParsingAct) -> Value {
        json!({
            "@id": act.iri,
            "@type": ["owl:NamedIndividual", "cco:IntentionalAct", "tagteam:ParsingAct"],
            "rdfs:label": "parsing act",
            "has_input": act.input,
            "has_agent": act.agent,
            "has_output": act.outputs,
        })
    }

    /// The `_ambiguityReport` attachment.
    pub fn ambiguity_report(
        &self,
        ambiguities: &[Ambiguity],
        timestamp: &chrono::DateTime<chrono::Utc>,
    ) -> Value {
        let mut by_type: Map<String, Value> = Map::new();
        for ambiguity in ambiguities {
            let key = ambiguity.kind.name().to_string();
            let count = by_type.get(&key).and_then(Value::as_u64).unwrap_or(0);
            by_type.insert(key, json!(count + 1));
        }
        let reading_total: usize = ambiguities.iter().map(|a| a.readings.len()).sum();
        let average = if ambiguities.is_empty() {
            0.0
        } else {
            reading_total as f64 / ambiguities.len() as f64
        };
        json!({
            "@type": "tagteam:AmbiguityReport",
            "tagteam:ambiguityCount": ambiguities.len(),
            "tagteam:timestamp": timestamp.to_rfc3339(),
            "tagteam:statistics": {
                "total": ambiguities.len(),
                "byType": by_type,
                "averageReadings": average,
            },
            "tagteam:ambiguities": ambiguities
                .iter()
                .map(|a| self.ambiguity_entry(a))
                .collect::<Vec<_>>(),
        })
    }

    fn ambiguity_entry(&self, ambiguity: &Ambiguity) -> Value {
        let mut node = Map::new();
        node.insert("tagteam:type".into(), json!(ambiguity.kind.name()));
        node.insert("tagteam:nodeId".into(), json!(ambiguity.node_iri));
        node.insert("spanStart".into(), json!(ambiguity.span.0));
        node.insert("spanEnd".into(), json!(ambiguity.span.1));
        node.insert("tagteam:readings".into(), json!(ambiguity.readings));
        node.insert(
            "tagteam:defaultReading".into(),
            json!(ambiguity.default_reading),
        );
        node.insert(
            "tagteam:signals".into(),
            json!(ambiguity
                .signals
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()),
        );
        node.insert("confidence".into(), json!(ambiguity.confidence.value()));
        match &ambiguity.kind {
            AmbiguityKind::ModalForce { modal, .. } => {
                node.insert("tagteam:modal".into(), json!(modal));
            }
            AmbiguityKind::NounCategory { noun } => {
                node.insert("tagteam:noun".into(), json!(noun));
            }
            AmbiguityKind::Scope {
                quantifier,
                formalizations,
            } => {
                node.insert("tagteam:quantifier".into(), json!(quantifier));
                node.insert(
                    "tagteam:formalizations".into(),
                    json!({
                        "wide": formalizations.wide,
                        "narrow": formalizations.narrow,
                    }),
                );
            }
            AmbiguityKind::SelectionalViolation {
                violation,
                agent,
                patient,
            } => {
                node.insert("tagteam:verb".into(), json!(violation.verb));
                node.insert("tagteam:signal".into(), json!(violation.signal.as_str()));
                node.insert(
                    "tagteam:verbClass".into(),
                    json!(violation.verb_class.as_str()),
                );
                node.insert("tagteam:requirement".into(), json!(violation.requirement));
                node.insert(
                    "tagteam:ontologyConstraint".into(),
                    json!(violation.ontology_constraint),
                );
                node.insert("tagteam:agent".into(), json!(agent));
                if let Some(patient) = patient {
                    node.insert("tagteam:patient".into(), json!(patient));
                }
            }
            AmbiguityKind::PotentialMetonymy {
                literal_type,
                suggested_type,
            } => {
                node.insert("tagteam:literalType".into(), json!(literal_type));
                node.insert("tagteam:suggestedType".into(), json!(suggested_type));
            }
        }
        Value::Object(node)
    }

    /// The `_interpretationLattice` attachment.
    pub fn lattice(
        &self,
        lattice: &InterpretationLattice,
        analysis: &SentenceAnalysis,
        ibe_iri: &str,
    ) -> Value {
        json!({
            "@type": "tagteam:InterpretationLattice",
            "tagteam:defaultReading": "default",
            "tagteam:defaultPlausibility": lattice.default_plausibility,
            "tagteam:alternatives": lattice
                .alternatives
                .iter()
                .map(|alt| self.alternative_node(alt, analysis, ibe_iri))
                .collect::<Vec<_>>(),
            "tagteam:resolutions": {
                "preserved": lattice.resolutions.preserved.iter()
                    .map(|r| self.resolution_entry(r)).collect::<Vec<_>>(),
                "resolved": lattice.resolutions.resolved.iter()
                    .map(|r| self.resolution_entry(r)).collect::<Vec<_>>(),
                "flaggedOnly": lattice.resolutions.flagged_only.iter()
                    .map(|r| self.resolution_entry(r)).collect::<Vec<_>>(),
            },
            "tagteam:ambiguitiesPreserved": lattice.ambiguities_preserved,
        })
    }

    fn resolution_entry(&self, resolution: &Resolution) -> Value {
        let mut node = Map::new();
        node.insert(
            "tagteam:ambiguityType".into(),
            json!(resolution.ambiguity.kind.name()),
        );
        node.insert(
            "tagteam:nodeId".into(),
            json!(resolution.ambiguity.node_iri),
        );
        node.insert(
            "tagteam:category".into(),
            json!(resolution.category.as_str()),
        );
        node.insert("tagteam:reason".into(), json!(resolution.reason));
        node.insert("confidence".into(), json!(resolution.confidence));
        node.insert(
            "tagteam:preserveAlternatives".into(),
            json!(resolution.preserve_alternatives),
        );
        if let Some(explanation) = &resolution.explanation {
            node.insert("tagteam:explanation".into(), json!(explanation));
        }
        if let Some(reading) = &resolution.resolved_reading {
            node.insert("tagteam:resolvedReading".into(), json!(reading));
        }
        Value::Object(node)
    }

    /// An alternative reading: the original node cloned under a derived
    /// IRI, re-typed or re-annotated for its reading.
    pub fn alternative_node(
        &self,
        alt: &AlternativeReading,
        analysis: &SentenceAnalysis,
        ibe_iri: &str,
    ) -> Value {
        let base = match &alt.payload {
            AlternativePayload::ModalForce { .. } => analysis
                .acts
                .iter()
                .find(|a| a.iri == alt.derived_from)
                .map(|a| self.act_node(a)),
            AlternativePayload::Metonymy { .. } => analysis
                .referents
                .iter()
                .find(|r| r.iri == alt.derived_from)
                .and_then(|r| analysis.entities.iter().find(|e| e.iri == r.about))
                .map(|e| self.entity_node(e)),
            _ => analysis
                .referents
                .iter()
                .find(|r| r.iri == alt.derived_from)
                .map(|r| self.referent_node(r, ibe_iri, analysis)),
        };
        let mut node = match base {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };

        node.insert("@id".into(), json!(alt.iri));
        node.insert("derivedFrom".into(), json!(alt.derived_from));
        node.insert("tagteam:reading".into(), json!(alt.reading));
        node.insert("plausibility".into(), json!(alt.plausibility));

        match &alt.payload {
            AlternativePayload::ModalForce {
                modality,
                actuality,
            } => {
                node.insert("tagteam:modality".into(), json!(modality.as_str()));
                node.insert("tagteam:actualityStatus".into(), json!(actuality));
            }
            AlternativePayload::NounCategory { appended_type } => {
                if let Some(Value::Array(types)) = node.get_mut("@type") {
                    types.push(json!(appended_type));
                }
                node.insert("tagteam:nominalizationReading".into(), json!(alt.reading));
            }
            AlternativePayload::Scope { formalization } => {
                node.insert("tagteam:scopeReading".into(), json!(alt.reading));
                node.insert("tagteam:formalization".into(), json!(formalization));
            }
            AlternativePayload::Metonymy {
                metonymic_source,
                literal_type,
                metonymy_type,
            } => {
                node.insert(
                    "@type".into(),
                    json!(["owl:NamedIndividual", "cco:Organization", "bfo:Object"]),
                );
                node.insert("tagteam:metonymicSource".into(), json!(metonymic_source));
                node.insert("tagteam:literalType".into(), json!(literal_type));
                node.insert("tagteam:metonymyType".into(), json!(metonymy_type));
            }
        }
        Value::Object(node)
    }
}
