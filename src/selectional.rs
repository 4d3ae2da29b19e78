//! Selectional preferences: verb-class requirements on the semantic
//! category of subjects and objects.
//!
//! The tables are frozen; per-instance verb additions copy rather than
//! mutate. This layer carries its own minimal morphological stripper so it
//! can be used standalone, without the lemmatizer.

use crate::gazetteer::is_metonymic_location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerbClass {
    IntentionalMental,
    IntentionalPhysical,
    Communication,
    Transfer,
    Employment,
    Governance,
    Creation,
    Perception,
    Causation,
    Stative,
}

impl VerbClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerbClass::IntentionalMental => "intentional-mental",
            VerbClass::IntentionalPhysical => "intentional-physical",
            VerbClass::Communication => "communication",
            VerbClass::Transfer => "transfer",
            VerbClass::Employment => "employment",
            VerbClass::Governance => "governance",
            VerbClass::Creation => "creation",
            VerbClass::Perception => "perception",
            VerbClass::Causation => "causation",
            VerbClass::Stative => "stative",
        }
    }

    pub fn is_intentional(&self) -> bool {
        matches!(
            self,
            VerbClass::IntentionalMental | VerbClass::IntentionalPhysical
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityCategory {
    Animate,
    Organization,
    Collective,
    MaterialEntity,
    Inanimate,
    Abstract,
    Proposition,
}

impl EntityCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityCategory::Animate => "animate",
            EntityCategory::Organization => "organization",
            EntityCategory::Collective => "collective",
            EntityCategory::MaterialEntity => "material-entity",
            EntityCategory::Inanimate => "inanimate",
            EntityCategory::Abstract => "abstract",
            EntityCategory::Proposition => "proposition",
        }
    }
}

/// Requirements one verb class places on its arguments.
#[derive(Debug, Clone, Copy)]
pub struct ClassRequirements {
    pub class: VerbClass,
    pub subject_required: &'static [EntityCategory],
    pub subject_forbidden: &'static [EntityCategory],
    pub object_required: &'static [EntityCategory],
    pub object_forbidden: &'static [EntityCategory],
    /// The ontology type the class realizes, used in violation reports.
    pub ontology_type: &'static str,
}

use EntityCategory::{
    Abstract, Animate, Collective, Inanimate, MaterialEntity, Organization, Proposition,
};

static REQUIREMENTS: &[ClassRequirements] = &[
    ClassRequirements {
        class: VerbClass::IntentionalMental,
        subject_required: &[Animate, Organization],
        subject_forbidden: &[Inanimate, MaterialEntity, Abstract],
        object_required: &[],
        object_forbidden: &[],
        ontology_type: "cco:IntentionalAct",
    },
    ClassRequirements {
        class: VerbClass::IntentionalPhysical,
        subject_required: &[Animate, Organization],
        subject_forbidden: &[Abstract, Proposition],
        object_required: &[],
        object_forbidden: &[Proposition],
        ontology_type: "cco:IntentionalAct",
    },
    ClassRequirements {
        class: VerbClass::Communication,
        subject_required: &[Animate, Organization],
        subject_forbidden: &[Inanimate, MaterialEntity],
        object_required: &[],
        object_forbidden: &[],
        ontology_type: "cco:CommunicationAct",
    },
    ClassRequirements {
        class: VerbClass::Transfer,
        subject_required: &[Animate, Organization],
        subject_forbidden: &[Abstract],
        object_required: &[],
        object_forbidden: &[],
        ontology_type: "cco:ActOfTransfer",
    },
    ClassRequirements {
        class: VerbClass::Employment,
        subject_required: &[Organization, Animate],
        subject_forbidden: &[Inanimate, MaterialEntity, Abstract],
        object_required: &[Animate],
        object_forbidden: &[Abstract],
        ontology_type: "cco:ActOfEmployment",
    },
    ClassRequirements {
        class: VerbClass::Governance,
        subject_required: &[Organization],
        subject_forbidden: &[Inanimate, MaterialEntity],
        object_required: &[],
        object_forbidden: &[],
        ontology_type: "cco:ActOfGovernance",
    },
    ClassRequirements {
        class: VerbClass::Creation,
        subject_required: &[Animate, Organization],
        subject_forbidden: &[Abstract, Proposition],
        object_required: &[],
        object_forbidden: &[],
        ontology_type: "cco:ActOfArtifactCreation",
    },
    ClassRequirements {
        class: VerbClass::Perception,
        subject_required: &[Animate],
        subject_forbidden: &[Inanimate, MaterialEntity, Abstract, Organization],
        object_required: &[],
        object_forbidden: &[],
        ontology_type: "cco:ActOfPerception",
    },
    ClassRequirements {
        class: VerbClass::Causation,
        subject_required: &[],
        subject_forbidden: &[],
        object_required: &[],
        object_forbidden: &[],
        ontology_type: "bfo:Process",
    },
    ClassRequirements {
        class: VerbClass::Stative,
        subject_required: &[],
        subject_forbidden: &[],
        object_required: &[],
        object_forbidden: &[],
        ontology_type: "bfo:Process",
    },
];

static VERB_CLASSES: &[(&str, VerbClass)] = &[
    ("administer", VerbClass::Governance),
    ("allocate", VerbClass::Transfer),
    ("announce", VerbClass::Communication),
    ("appoint", VerbClass::Employment),
    ("ask", VerbClass::Communication),
    ("be", VerbClass::Stative),
    ("believe", VerbClass::IntentionalMental),
    ("build", VerbClass::Creation),
    ("carry", VerbClass::IntentionalPhysical),
    ("cause", VerbClass::Causation),
    ("choose", VerbClass::IntentionalMental),
    ("contain", VerbClass::Stative),
    ("create", VerbClass::Creation),
    ("decide", VerbClass::IntentionalMental),
    ("declare", VerbClass::Communication),
    ("design", VerbClass::Creation),
    ("develop", VerbClass::Creation),
    ("distribute", VerbClass::Transfer),
    ("donate", VerbClass::Transfer),
    ("eat", VerbClass::IntentionalPhysical),
    ("employ", VerbClass::Employment),
    ("enable", VerbClass::Causation),
    ("examine", VerbClass::Perception),
    ("exist", VerbClass::Stative),
    ("fire", VerbClass::Employment),
    ("give", VerbClass::Transfer),
    ("govern", VerbClass::Governance),
    ("have", VerbClass::Stative),
    ("hear", VerbClass::Perception),
    ("hire", VerbClass::Employment),
    ("hope", VerbClass::IntentionalMental),
    ("include", VerbClass::Stative),
    ("intend", VerbClass::IntentionalMental),
    ("know", VerbClass::Stative),
    ("legislate", VerbClass::Governance),
    ("lift", VerbClass::IntentionalPhysical),
    ("make", VerbClass::Creation),
    ("move", VerbClass::IntentionalPhysical),
    ("notice", VerbClass::Perception),
    ("observe", VerbClass::Perception),
    ("offer", VerbClass::Transfer),
    ("own", VerbClass::Stative),
    ("perceive", VerbClass::Perception),
    ("prevent", VerbClass::Causation),
    ("produce", VerbClass::Creation),
    ("promote", VerbClass::Employment),
    ("push", VerbClass::IntentionalPhysical),
    ("regulate", VerbClass::Governance),
    ("remain", VerbClass::Stative),
    ("report", VerbClass::Communication),
    ("run", VerbClass::IntentionalPhysical),
    ("say", VerbClass::Communication),
    ("see", VerbClass::Perception),
    ("seem", VerbClass::Stative),
    ("send", VerbClass::Transfer),
    ("speak", VerbClass::Communication),
    ("state", VerbClass::Communication),
    ("tell", VerbClass::Communication),
    ("think", VerbClass::IntentionalMental),
    ("transfer", VerbClass::Transfer),
    ("treat", VerbClass::IntentionalPhysical),
    ("walk", VerbClass::IntentionalPhysical),
    ("want", VerbClass::IntentionalMental),
    ("watch", VerbClass::Perception),
    ("write", VerbClass::Creation),
];

/// Label sets for category membership. A label may belong to several
/// categories ("family" is animate and collective).
static ANIMATE_LABELS: &[&str] = &[
    "bird", "cat", "child", "doctor", "dog", "engineer", "family", "horse", "judge", "lawyer",
    "man", "manager", "nurse", "officer", "patient", "person", "president", "scientist",
    "soldier", "student", "surgeon", "teacher", "woman", "worker",
];

static ORGANIZATION_LABELS: &[&str] = &[
    "agency", "army", "bank", "board", "cbp", "committee", "company", "congress", "corporation",
    "council", "court", "department", "dhs", "fbi", "government", "hospital", "ministry",
    "police", "school", "senate", "team", "university",
];

static COLLECTIVE_LABELS: &[&str] = &[
    "board", "committee", "council", "crowd", "family", "group", "herd", "staff", "team",
];

static MATERIAL_LABELS: &[&str] = &[
    "car", "chair", "computer", "device", "door", "hammer", "knife", "machine", "mountain",
    "river", "rock", "scalpel", "stone", "table", "tool", "tree", "ventilator", "water",
];

static ABSTRACT_LABELS: &[&str] = &[
    "decision", "freedom", "happiness", "idea", "information", "justice", "knowledge", "policy",
    "scarcity", "truth",
];

static PROPOSITION_LABELS: &[&str] = &["claim", "fact", "proposition", "statement"];

#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    pub valid: bool,
    pub confidence: f64,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationSignal {
    InanimateAgent,
    AbstractAgent,
    AbstractPhysicalActor,
    InvalidAgent,
    InvalidPatient,
}

impl ViolationSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationSignal::InanimateAgent => "inanimate_agent",
            ViolationSignal::AbstractAgent => "abstract_agent",
            ViolationSignal::AbstractPhysicalActor => "abstract_physical_actor",
            ViolationSignal::InvalidAgent => "invalid_agent",
            ViolationSignal::InvalidPatient => "invalid_patient",
        }
    }
}

/// A structured selectional violation, surfaced as an ambiguity rather
/// than an error.
#[derive(Debug, Clone)]
pub struct Violation {
    pub signal: ViolationSignal,
    pub verb: String,
    pub verb_class: VerbClass,
    pub requirement: String,
    pub ontology_constraint: String,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionalPreferences {
    extra_verbs: Vec<(String, VerbClass)>,
}

impl SelectionalPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy-extending builder for domain verbs; the static table stays
    /// frozen.
    pub fn with_verb(mut self, verb: &str, class: VerbClass) -> Self {
        self.extra_verbs.push((verb.to_lowercase(), class));
        self
    }

    /// Class of a verb, tolerating inflected forms through the local
    /// stripper.
    pub fn get_verb_class(&self, verb: &str) -> Option<VerbClass> {
        let lower = verb.to_lowercase();
        for candidate in strip_candidates(&lower) {
            if let Some((_, class)) = self.extra_verbs.iter().find(|(v, _)| *v == candidate) {
                return Some(*class);
            }
            if let Some((_, class)) = VERB_CLASSES.iter().find(|(v, _)| *v == candidate) {
                return Some(*class);
            }
        }
        None
    }

    pub fn requirements(&self, class: VerbClass) -> &'static ClassRequirements {
        REQUIREMENTS
            .iter()
            .find(|r| r.class == class)
            .unwrap_or(&REQUIREMENTS[REQUIREMENTS.len() - 1])
    }

    pub fn check_subject(&self, verb: &str, categories: &[EntityCategory]) -> CheckResult {
        let Some(class) = self.get_verb_class(verb) else {
            return CheckResult {
                valid: true,
                confidence: 0.5,
                reason: "unknown verb".to_string(),
            };
        };
        let reqs = self.requirements(class);
        if categories.iter().any(|c| reqs.subject_forbidden.contains(c)) {
            return CheckResult {
                valid: false,
                confidence: 0.9,
                reason: format!(
                    "{} verbs forbid {} subjects",
                    class.as_str(),
                    join_categories(categories)
                ),
            };
        }
        if reqs.subject_required.is_empty() {
            return CheckResult {
                valid: true,
                confidence: 0.7,
                reason: "no subject requirement".to_string(),
            };
        }
        if categories.iter().any(|c| reqs.subject_required.contains(c)) {
            return CheckResult {
                valid: true,
                confidence: 0.93,
                reason: format!("subject satisfies {} requirement", class.as_str()),
            };
        }
        CheckResult {
            valid: true,
            confidence: 0.6,
            reason: "subject category outside requirement but not forbidden".to_string(),
        }
    }

    /// Permissive analog for objects: only forbidden categories fail.
    pub fn check_object(&self, verb: &str, categories: &[EntityCategory]) -> CheckResult {
        let Some(class) = self.get_verb_class(verb) else {
            return CheckResult {
                valid: true,
                confidence: 0.5,
                reason: "unknown verb".to_string(),
            };
        };
        let reqs = self.requirements(class);
        if categories.iter().any(|c| reqs.object_forbidden.contains(c)) {
            return CheckResult {
                valid: false,
                confidence: 0.9,
                reason: format!(
                    "{} verbs forbid {} objects",
                    class.as_str(),
                    join_categories(categories)
                ),
            };
        }
        if !reqs.object_required.is_empty()
            && categories.iter().any(|c| reqs.object_required.contains(c))
        {
            return CheckResult {
                valid: true,
                confidence: 0.93,
                reason: format!("object satisfies {} requirement", class.as_str()),
            };
        }
        CheckResult {
            valid: true,
            confidence: 0.7,
            reason: "object unconstrained".to_string(),
        }
    }

    /// Structured violation for an agent (and optionally patient) pairing,
    /// or None when the combination is acceptable.
    pub fn get_violation(
        &self,
        verb: &str,
        agent: &[EntityCategory],
        patient: Option<&[EntityCategory]>,
    ) -> Option<Violation> {
        let class = self.get_verb_class(verb)?;
        let reqs = self.requirements(class);

        if agent.iter().any(|c| reqs.subject_forbidden.contains(c)) {
            let signal = if agent
                .iter()
                .any(|c| matches!(c, EntityCategory::Inanimate | EntityCategory::MaterialEntity))
            {
                ViolationSignal::InanimateAgent
            } else if agent.contains(&EntityCategory::Abstract) {
                if class == VerbClass::IntentionalPhysical {
                    ViolationSignal::AbstractPhysicalActor
                } else {
                    ViolationSignal::AbstractAgent
                }
            } else {
                ViolationSignal::InvalidAgent
            };
            return Some(Violation {
                signal,
                verb: verb.to_string(),
                verb_class: class,
                requirement: format!(
                    "subject of {} must be {}",
                    class.as_str(),
                    join_categories(reqs.subject_required)
                ),
                ontology_constraint: reqs.ontology_type.to_string(),
            });
        }

        if let Some(patient) = patient {
            if patient.iter().any(|c| reqs.object_forbidden.contains(c)) {
                return Some(Violation {
                    signal: ViolationSignal::InvalidPatient,
                    verb: verb.to_string(),
                    verb_class: class,
                    requirement: format!(
                        "object of {} must not be {}",
                        class.as_str(),
                        join_categories(reqs.object_forbidden)
                    ),
                    ontology_constraint: reqs.ontology_type.to_string(),
                });
            }
        }
        None
    }
}

/// Categorize an entity by its ontology class, then by label membership,
/// then by suffix heuristics. Several categories may apply.
pub fn categorize_entity(class_curie: &str, label: &str) -> Vec<EntityCategory> {
    let mut out = Vec::new();
    let lower = label.to_lowercase();
    let head = lower.rsplit(' ').next().unwrap_or(&lower).to_string();

    // Metonymic locations stand in for their institutions.
    if is_metonymic_location(&lower) {
        return vec![EntityCategory::Organization];
    }

    // Type-based check.
    match class_curie {
        "cco:Person" => out.push(EntityCategory::Animate),
        "cco:Organization" => out.push(EntityCategory::Organization),
        "cco:Artifact" | "bfo:MaterialEntity" => {
            out.push(EntityCategory::MaterialEntity);
            out.push(EntityCategory::Inanimate);
        }
        "cco:GeographicalLocation" => out.push(EntityCategory::Inanimate),
        "bfo:GenericallyDependentContinuant" => out.push(EntityCategory::Abstract),
        _ => {}
    }

    // Label-based membership across every category.
    let singular = head.strip_suffix('s').unwrap_or(&head);
    for candidate in [head.as_str(), singular, lower.as_str()] {
        if ANIMATE_LABELS.contains(&candidate) && !out.contains(&EntityCategory::Animate) {
            out.push(EntityCategory::Animate);
        }
        if ORGANIZATION_LABELS.contains(&candidate)
            && !out.contains(&EntityCategory::Organization)
        {
            out.push(EntityCategory::Organization);
        }
        if COLLECTIVE_LABELS.contains(&candidate) && !out.contains(&EntityCategory::Collective) {
            out.push(EntityCategory::Collective);
        }
        if MATERIAL_LABELS.contains(&candidate) {
            if !out.contains(&EntityCategory::MaterialEntity) {
                out.push(EntityCategory::MaterialEntity);
            }
            if !out.contains(&EntityCategory::Inanimate) {
                out.push(EntityCategory::Inanimate);
            }
        }
        if ABSTRACT_LABELS.contains(&candidate) && !out.contains(&EntityCategory::Abstract) {
            out.push(EntityCategory::Abstract);
        }
        if PROPOSITION_LABELS.contains(&candidate)
            && !out.contains(&EntityCategory::Proposition)
        {
            out.push(EntityCategory::Proposition);
        }
    }

    if !out.is_empty() {
        return out;
    }

    // Suffix heuristics.
    if (head.ends_with("er") || head.ends_with("or")) && !MATERIAL_LABELS.contains(&head.as_str())
    {
        return vec![EntityCategory::Animate];
    }
    if head.ends_with("tion")
        || head.ends_with("ment")
        || head.ends_with("ness")
        || head.ends_with("ity")
    {
        return vec![EntityCategory::Abstract];
    }

    vec![EntityCategory::Inanimate]
}

/// Minimal inflection stripper local to this layer.
fn strip_candidates(verb: &str) -> Vec<String> {
    let mut out = vec![verb.to_string()];
    if let Some(base) = verb.strip_suffix("ies") {
        out.push(format!("{}y", base));
    }
    if let Some(base) = verb.strip_suffix("es") {
        out.push(base.to_string());
    }
    if let Some(base) = verb.strip_suffix('s') {
        out.push(base.to_string());
    }
    for suffix in ["ed", "ing"] {
        if let Some(base) = verb.strip_suffix(suffix) {
            out.push(base.to_string());
            out.push(format!("{}e", base));
            let chars: Vec<char> = base.chars().collect();
            if chars.len() >= 2 && chars[chars.len() - 1] == chars[chars.len() - 2] {
                out.push(base[..base.len() - 1].to_string());
            }
        }
    }
    out
}

fn join_categories(categories: &[EntityCategory]) -> String {
    if categories.is_empty() {
        return "anything".to_string();
    }
    categories
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(" or ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verb_class_lookup_handles_inflection() {
        let prefs = SelectionalPreferences::new();
        assert_eq!(
            prefs.get_verb_class("decide"),
            Some(VerbClass::IntentionalMental)
        );
        assert_eq!(
            prefs.get_verb_class("decided"),
            Some(VerbClass::IntentionalMental)
        );
        assert_eq!(
            prefs.get_verb_class("decides"),
            Some(VerbClass::IntentionalMental)
        );
        assert_eq!(
            prefs.get_verb_class("deciding"),
            Some(VerbClass::IntentionalMental)
        );
    }

    #[test]
    fn unknown_verb_is_permissive() {
        let prefs = SelectionalPreferences::new();
        let result = prefs.check_subject("blorptex", &[EntityCategory::Inanimate]);
        assert!(result.valid);
        assert!(result.confidence <= 0.5);
    }

    #[test]
    fn forbidden_subject_fails_with_high_confidence() {
        let prefs = SelectionalPreferences::new();
        let result = prefs.check_subject(
            "decide",
            &[EntityCategory::MaterialEntity, EntityCategory::Inanimate],
        );
        assert!(!result.valid);
        assert!((result.confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn satisfied_requirement_scores_high() {
        let prefs = SelectionalPreferences::new();
        let result = prefs.check_subject("decide", &[EntityCategory::Animate]);
        assert!(result.valid);
        assert!(result.confidence >= 0.9 && result.confidence <= 0.95);
    }

    #[test]
    fn rock_deciding_is_inanimate_agent() {
        let prefs = SelectionalPreferences::new();
        let categories = categorize_entity("bfo:MaterialEntity", "rock");
        let violation = prefs.get_violation("decide", &categories, None).unwrap();
        assert_eq!(violation.signal, ViolationSignal::InanimateAgent);
        assert_eq!(violation.verb_class, VerbClass::IntentionalMental);
        assert!(!violation.ontology_constraint.is_empty());
    }

    #[test]
    fn doctor_treating_is_fine() {
        let prefs = SelectionalPreferences::new();
        let categories = categorize_entity("cco:Person", "doctor");
        assert!(prefs.get_violation("treat", &categories, None).is_none());
    }

    #[test]
    fn family_is_animate_and_collective() {
        let categories = categorize_entity("bfo:Entity", "family");
        assert!(categories.contains(&EntityCategory::Animate));
        assert!(categories.contains(&EntityCategory::Collective));
    }

    #[test]
    fn metonymic_location_categorized_as_organization() {
        let categories = categorize_entity("cco:GeographicalLocation", "White House");
        assert_eq!(categories, vec![EntityCategory::Organization]);
    }

    #[test]
    fn suffix_heuristics() {
        assert_eq!(
            categorize_entity("bfo:Entity", "blogger"),
            vec![EntityCategory::Animate]
        );
        assert_eq!(
            categorize_entity("bfo:Entity", "flotation"),
            vec![EntityCategory::Abstract]
        );
    }

    #[test]
    fn per_instance_verb_addition() {
        let prefs =
            SelectionalPreferences::new().with_verb("triage", VerbClass::IntentionalMental);
        assert_eq!(
            prefs.get_verb_class("triaged"),
            Some(VerbClass::IntentionalMental)
        );
        assert_eq!(SelectionalPreferences::new().get_verb_class("triage"), None);
    }

    #[test]
    fn abstract_physical_actor_signal() {
        let prefs = SelectionalPreferences::new();
        let violation = prefs
            .get_violation("treat", &[EntityCategory::Abstract], None)
            .unwrap();
        assert_eq!(violation.signal, ViolationSignal::AbstractPhysicalActor);
    }

    #[test]
    fn invalid_patient_signal() {
        let prefs = SelectionalPreferences::new();
        let violation = prefs
            .get_violation(
                "hire",
                &[EntityCategory::Organization],
                Some(&[EntityCategory::Abstract]),
            )
            .unwrap();
        assert_eq!(violation.signal, ViolationSignal::InvalidPatient);
    }
}
