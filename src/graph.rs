//! Typed graph nodes for the two linguistic tiers and the provenance triad.
//!
//! Tier 1 nodes are mentions (discourse referents, verb phrases); tier 2
//! nodes are the real-world entities and acts they denote. Role edges are
//! stored in one direction only — [`RoleEdges`] materializes the inverse at
//! serialization time, so no node ever holds a back-pointer.

use chrono::{DateTime, Utc};

use crate::deptree::Relation;
use crate::gazetteer::EntityClass;
use crate::token::PosTag;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Definiteness {
    Definite,
    Indefinite,
    Bare,
}

impl Definiteness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Definiteness::Definite => "definite",
            Definiteness::Indefinite => "indefinite",
            Definiteness::Bare => "bare",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tense {
    Past,
    Present,
    Future,
    Unspecified,
}

impl Tense {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tense::Past => "past",
            Tense::Present => "present",
            Tense::Future => "future",
            Tense::Unspecified => "unspecified",
        }
    }
}

/// Modal force of a verb phrase reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modality {
    Obligation,
    Recommendation,
    Permission,
    Possibility,
    Ability,
    Expectation,
    Inference,
    Conditional,
    Prediction,
    Habitual,
}

impl Modality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Obligation => "obligation",
            Modality::Recommendation => "recommendation",
            Modality::Permission => "permission",
            Modality::Possibility => "possibility",
            Modality::Ability => "ability",
            Modality::Expectation => "expectation",
            Modality::Inference => "inference",
            Modality::Conditional => "conditional",
            Modality::Prediction => "prediction",
            Modality::Habitual => "habitual",
        }
    }

    pub fn from_str(s: &str) -> Option<Modality> {
        match s {
            "obligation" => Some(Modality::Obligation),
            "recommendation" => Some(Modality::Recommendation),
            "permission" => Some(Modality::Permission),
            "possibility" => Some(Modality::Possibility),
            "ability" => Some(Modality::Ability),
            "expectation" => Some(Modality::Expectation),
            "inference" => Some(Modality::Inference),
            "conditional" => Some(Modality::Conditional),
            "prediction" => Some(Modality::Prediction),
            "habitual" => Some(Modality::Habitual),
            _ => None,
        }
    }

    /// Actuality status of an act under this modal force.
    pub fn actuality(&self) -> &'static str {
        match self {
            Modality::Obligation | Modality::Recommendation => "tagteam:Prescribed",
            Modality::Expectation
            | Modality::Possibility
            | Modality::Inference
            | Modality::Conditional
            | Modality::Prediction => "tagteam:Hypothetical",
            Modality::Permission => "tagteam:Permitted",
            Modality::Ability => "tagteam:Potential",
            Modality::Habitual => "tagteam:Actual",
        }
    }

    /// Whether the force is deontic (prescriptive) rather than epistemic.
    pub fn is_deontic(&self) -> bool {
        matches!(
            self,
            Modality::Obligation | Modality::Recommendation | Modality::Permission
        )
    }
}

/// Tier-1 mention of an entity.
#[derive(Debug, Clone)]
pub struct DiscourseReferent {
    pub iri: String,
    /// Sanitized surface text of the whole mention subtree.
    pub surface: String,
    /// Character span in the normalized sentence.
    pub span: (usize, usize),
    /// 1-based index of the head token.
    pub head_index: usize,
    pub head_pos: PosTag,
    /// Relation assigned by the parent arc of the head.
    pub ud_role: Relation,
    pub denotes_type: EntityClass,
    pub definiteness: Definiteness,
    pub quantity: Option<u64>,
    pub quantity_indicator: Option<String>,
    pub aliases: Vec<String>,
    pub is_scarce: bool,
    /// Set when this mention matched a previously registered alias.
    pub canonical_form: Option<String>,
    /// IRI of the denoted tier-2 entity.
    pub about: String,
}

/// Tier-1 mention of an act.
#[derive(Debug, Clone)]
pub struct VerbPhrase {
    pub iri: String,
    pub head_surface: String,
    pub lemma: String,
    pub head_index: usize,
    pub modal: Option<String>,
    pub modality: Option<Modality>,
    pub auxiliaries: Vec<String>,
    pub tense: Tense,
    pub is_passive: bool,
    pub is_perfect: bool,
    pub is_negated: bool,
    /// Surface text of the verb group (auxiliaries + head).
    pub source_text: String,
    /// 1-based token index range of the verb group.
    pub index_range: (usize, usize),
    pub span: (usize, usize),
    /// IRI of the denoted tier-2 act.
    pub about: String,
}

/// Tier-2 entity denoted by a referent.
#[derive(Debug, Clone)]
pub struct RealWorldEntity {
    pub iri: String,
    pub class: EntityClass,
    pub label: String,
    /// IRI of the tier-1 mention.
    pub mention: String,
}

/// Tier-2 act denoted by a verb phrase.
#[derive(Debug, Clone)]
pub struct RealWorldAct {
    pub iri: String,
    pub label: String,
    pub mention: String,
    pub modality: Option<Modality>,
    pub is_negated: bool,
    /// Selectional-violation surface flags (§ ambiguity detection).
    pub has_ambiguity: bool,
    pub ambiguity_type: Option<String>,
    pub ontology_constraint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssertionKind {
    Copular,
    Possessive,
    Locative,
    Existential,
}

impl AssertionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssertionKind::Copular => "copular",
            AssertionKind::Possessive => "possessive",
            AssertionKind::Locative => "locative",
            AssertionKind::Existential => "existential",
        }
    }
}

/// A copular, possessive, locative, or existential claim modeled as a typed
/// edge between referents rather than as an act.
#[derive(Debug, Clone)]
pub struct StructuralAssertion {
    pub iri: String,
    pub kind: AssertionKind,
    /// IRI of the subject referent.
    pub subject: String,
    /// Fixed relation IRI, when the predicate names one.
    pub relation: Option<&'static str>,
    /// IRI of the object referent, when present.
    pub object: Option<String>,
    /// Copula or possession verb surface form.
    pub copula: String,
    pub negated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleType {
    Agent,
    Patient,
    Instrument,
    Location,
    Recipient,
    Beneficiary,
    Oblique,
}

impl RoleType {
    pub fn curie(&self) -> &'static str {
        match self {
            RoleType::Agent => "cco:AgentRole",
            RoleType::Patient => "cco:PatientRole",
            RoleType::Instrument => "cco:InstrumentRole",
            RoleType::Location => "cco:LocationRole",
            RoleType::Recipient => "cco:RecipientRole",
            RoleType::Beneficiary => "cco:BeneficiaryRole",
            RoleType::Oblique => "cco:ObliqueRole",
        }
    }
}

/// A BFO realizable role: inheres in a referent, realized in an act.
#[derive(Debug, Clone)]
pub struct Role {
    pub iri: String,
    pub role_type: RoleType,
    /// IRI of the bearer referent (`inheres_in`). Never empty: the mapper
    /// refuses to emit a role without a bearer.
    pub bearer: String,
    /// IRI of the act (`realized_in`).
    pub act: String,
}

/// Role edges stored in the forward direction only. The serializer asks
/// for the inverse (`is_bearer_of`) when it writes entity nodes.
#[derive(Debug, Clone, Default)]
pub struct RoleEdges {
    roles: Vec<Role>,
}

impl RoleEdges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, role: Role) {
        self.roles.push(role);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.roles.iter()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// IRIs of roles borne by the given referent (the inverse direction,
    /// computed on demand).
    pub fn borne_by(&self, referent_iri: &str) -> Vec<&str> {
        self.roles
            .iter()
            .filter(|r| r.bearer == referent_iri)
            .map(|r| r.iri.as_str())
            .collect()
    }

    /// IRIs of roles realized in the given act.
    pub fn realized_in(&self, act_iri: &str) -> Vec<&str> {
        self.roles
            .iter()
            .filter(|r| r.act == act_iri)
            .map(|r| r.iri.as_str())
            .collect()
    }
}

/// The text as an information-bearing entity.
#[derive(Debug, Clone)]
pub struct InformationBearingEntity {
    pub iri: String,
    pub text: String,
    pub char_count: usize,
    pub word_count: usize,
    pub received_at: DateTime<Utc>,
}

/// The parsing agent that produced tier 1 and tier 2.
#[derive(Debug, Clone)]
pub struct ArtificialAgent {
    pub iri: String,
    pub name: String,
    pub version: String,
    pub capabilities: Vec<&'static str>,
}

/// The parsing act linking input text, agent, and every tier-1 output.
#[derive(Debug, Clone)]
pub struct ParsingAct {
    pub iri: String,
    /// IRI of the information-bearing entity.
    pub input: String,
    /// IRI of the agent.
    pub agent: String,
    /// IRIs of every tier-1 node produced.
    pub outputs: Vec<String>,
}

/// Everything assembled for one sentence before serialization.
#[derive(Debug, Clone, Default)]
pub struct SentenceAnalysis {
    pub referents: Vec<DiscourseReferent>,
    pub verb_phrases: Vec<VerbPhrase>,
    pub entities: Vec<RealWorldEntity>,
    pub acts: Vec<RealWorldAct>,
    pub assertions: Vec<StructuralAssertion>,
    pub roles: RoleEdges,
}

impl SentenceAnalysis {
    pub fn referent_by_head(&self, head_index: usize) -> Option<&DiscourseReferent> {
        self.referents.iter().find(|r| r.head_index == head_index)
    }

    pub fn referent_by_iri(&self, iri: &str) -> Option<&DiscourseReferent> {
        self.referents.iter().find(|r| r.iri == iri)
    }

    pub fn act_for_phrase(&self, phrase: &VerbPhrase) -> Option<&RealWorldAct> {
        self.acts.iter().find(|a| a.iri == phrase.about)
    }

    /// IRIs of every tier-1 node, in emission order.
    pub fn t1_iris(&self) -> Vec<String> {
        let mut out: Vec<String> = self.referents.iter().map(|r| r.iri.clone()).collect();
        out.extend(self.verb_phrases.iter().map(|v| v.iri.clone()));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modality_actuality_table() {
        assert_eq!(Modality::Obligation.actuality(), "tagteam:Prescribed");
        assert_eq!(Modality::Possibility.actuality(), "tagteam:Hypothetical");
        assert_eq!(Modality::Permission.actuality(), "tagteam:Permitted");
        assert_eq!(Modality::Ability.actuality(), "tagteam:Potential");
        assert_eq!(Modality::Habitual.actuality(), "tagteam:Actual");
    }

    #[test]
    fn modality_round_trips() {
        for m in [
            Modality::Obligation,
            Modality::Recommendation,
            Modality::Expectation,
        ] {
            assert_eq!(Modality::from_str(m.as_str()), Some(m));
        }
    }

    #[test]
    fn role_edges_inverse_lookup() {
        let mut edges = RoleEdges::new();
        edges.push(Role {
            iri: "inst:role_a".into(),
            role_type: RoleType::Agent,
            bearer: "inst:doctor_m".into(),
            act: "inst:treat_a".into(),
        });
        edges.push(Role {
            iri: "inst:role_p".into(),
            role_type: RoleType::Patient,
            bearer: "inst:patient_m".into(),
            act: "inst:treat_a".into(),
        });
        assert_eq!(edges.borne_by("inst:doctor_m"), vec!["inst:role_a"]);
        assert_eq!(
            edges.realized_in("inst:treat_a"),
            vec!["inst:role_a", "inst:role_p"]
        );
        assert!(edges.borne_by("inst:nobody").is_empty());
    }

    #[test]
    fn deontic_split() {
        assert!(Modality::Obligation.is_deontic());
        assert!(Modality::Permission.is_deontic());
        assert!(!Modality::Expectation.is_deontic());
        assert!(!Modality::Possibility.is_deontic());
    }
}
