//! Gazetteer tables mapping known surface forms to ontology classes.
//!
//! The static tables are frozen; a caller extends a gazetteer instance
//! through the builder methods, which copy rather than mutate shared state.

/// Upper-ontology class assigned to a recognized entity mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityClass {
    Person,
    Organization,
    Location,
    Artifact,
    /// Natural material objects (rock, water)
    MaterialEntity,
    /// Abstract continuants (justice, policy)
    Abstract,
    /// Unclassified fallback
    Entity,
}

impl EntityClass {
    /// Compact CURIE written into `denotesType` and T2 `@type`.
    pub fn curie(&self) -> &'static str {
        match self {
            EntityClass::Person => "cco:Person",
            EntityClass::Organization => "cco:Organization",
            EntityClass::Location => "cco:GeographicalLocation",
            EntityClass::Artifact => "cco:Artifact",
            EntityClass::MaterialEntity => "bfo:MaterialEntity",
            EntityClass::Abstract => "bfo:GenericallyDependentContinuant",
            EntityClass::Entity => "bfo:Entity",
        }
    }
}

/// Common nouns and proper names with a known class. Lookup is
/// case-insensitive on the lemma.
static ENTRIES: &[(&str, EntityClass)] = &[
    // Persons
    ("alice", EntityClass::Person),
    ("author", EntityClass::Person),
    ("bob", EntityClass::Person),
    ("carol", EntityClass::Person),
    ("child", EntityClass::Person),
    ("doctor", EntityClass::Person),
    ("driver", EntityClass::Person),
    ("engineer", EntityClass::Person),
    ("john", EntityClass::Person),
    ("judge", EntityClass::Person),
    ("lawyer", EntityClass::Person),
    ("man", EntityClass::Person),
    ("manager", EntityClass::Person),
    ("mary", EntityClass::Person),
    ("nurse", EntityClass::Person),
    ("officer", EntityClass::Person),
    ("patient", EntityClass::Person),
    ("person", EntityClass::Person),
    ("president", EntityClass::Person),
    ("scientist", EntityClass::Person),
    ("soldier", EntityClass::Person),
    ("student", EntityClass::Person),
    ("surgeon", EntityClass::Person),
    ("teacher", EntityClass::Person),
    ("woman", EntityClass::Person),
    ("worker", EntityClass::Person),
    // Organizations
    ("agency", EntityClass::Organization),
    ("army", EntityClass::Organization),
    ("bank", EntityClass::Organization),
    ("board", EntityClass::Organization),
    ("cbp", EntityClass::Organization),
    ("cia", EntityClass::Organization),
    ("committee", EntityClass::Organization),
    ("company", EntityClass::Organization),
    ("congress", EntityClass::Organization),
    ("corporation", EntityClass::Organization),
    ("council", EntityClass::Organization),
    ("court", EntityClass::Organization),
    ("department", EntityClass::Organization),
    ("dhs", EntityClass::Organization),
    ("fbi", EntityClass::Organization),
    ("government", EntityClass::Organization),
    ("hospital", EntityClass::Organization),
    ("ministry", EntityClass::Organization),
    ("nasa", EntityClass::Organization),
    ("police", EntityClass::Organization),
    ("school", EntityClass::Organization),
    ("senate", EntityClass::Organization),
    ("team", EntityClass::Organization),
    ("university", EntityClass::Organization),
    // Locations
    ("boston", EntityClass::Location),
    ("city", EntityClass::Location),
    ("country", EntityClass::Location),
    ("london", EntityClass::Location),
    ("moscow", EntityClass::Location),
    ("paris", EntityClass::Location),
    ("park", EntityClass::Location),
    ("room", EntityClass::Location),
    ("street", EntityClass::Location),
    ("town", EntityClass::Location),
    ("washington", EntityClass::Location),
    // Artifacts
    ("book", EntityClass::Artifact),
    ("car", EntityClass::Artifact),
    ("chair", EntityClass::Artifact),
    ("computer", EntityClass::Artifact),
    ("device", EntityClass::Artifact),
    ("door", EntityClass::Artifact),
    ("hammer", EntityClass::Artifact),
    ("knife", EntityClass::Artifact),
    ("machine", EntityClass::Artifact),
    ("scalpel", EntityClass::Artifact),
    ("table", EntityClass::Artifact),
    ("tool", EntityClass::Artifact),
    ("ventilator", EntityClass::Artifact),
    // Natural material entities
    ("mountain", EntityClass::MaterialEntity),
    ("river", EntityClass::MaterialEntity),
    ("rock", EntityClass::MaterialEntity),
    ("stone", EntityClass::MaterialEntity),
    ("tree", EntityClass::MaterialEntity),
    ("water", EntityClass::MaterialEntity),
    // Abstract continuants
    ("decision", EntityClass::Abstract),
    ("freedom", EntityClass::Abstract),
    ("idea", EntityClass::Abstract),
    ("information", EntityClass::Abstract),
    ("justice", EntityClass::Abstract),
    ("knowledge", EntityClass::Abstract),
    ("policy", EntityClass::Abstract),
    ("truth", EntityClass::Abstract),
];

/// Locations conventionally used to refer to the institution housed there.
/// A metonymic reading retypes these as organizations.
pub static METONYMIC_LOCATIONS: &[&str] = &[
    "white house",
    "kremlin",
    "pentagon",
    "downing street",
    "wall street",
    "city hall",
    "capitol hill",
];

pub fn is_metonymic_location(label: &str) -> bool {
    let lower = label.to_lowercase();
    METONYMIC_LOCATIONS.contains(&lower.as_str())
}

/// Table-backed gazetteer with per-instance extension.
#[derive(Debug, Clone, Default)]
pub struct StaticGazetteer {
    extra: Vec<(String, EntityClass)>,
}

impl StaticGazetteer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy-extending builder; the static table stays shared and frozen.
    pub fn with_entry(mut self, surface: &str, class: EntityClass) -> Self {
        self.extra.push((surface.to_lowercase(), class));
        self
    }

    /// Look up a surface form (single- or multi-word), case-insensitive.
    pub fn lookup(&self, surface: &str) -> Option<EntityClass> {
        let lower = surface.trim().to_lowercase();
        if lower.is_empty() {
            return None;
        }
        if let Some((_, class)) = self.extra.iter().find(|(s, _)| *s == lower) {
            return Some(*class);
        }
        if is_metonymic_location(&lower) {
            return Some(EntityClass::Location);
        }
        ENTRIES
            .iter()
            .find(|(s, _)| *s == lower)
            .map(|(_, c)| *c)
    }

    pub fn recognizes(&self, surface: &str) -> bool {
        self.lookup(surface).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_nouns_classified() {
        let gaz = StaticGazetteer::new();
        assert_eq!(gaz.lookup("doctor"), Some(EntityClass::Person));
        assert_eq!(gaz.lookup("ventilator"), Some(EntityClass::Artifact));
        assert_eq!(gaz.lookup("rock"), Some(EntityClass::MaterialEntity));
    }

    #[test]
    fn acronyms_case_insensitive() {
        let gaz = StaticGazetteer::new();
        assert_eq!(gaz.lookup("CBP"), Some(EntityClass::Organization));
        assert_eq!(gaz.lookup("DHS"), Some(EntityClass::Organization));
    }

    #[test]
    fn metonymic_locations_are_locations_literally() {
        let gaz = StaticGazetteer::new();
        assert!(is_metonymic_location("White House"));
        assert_eq!(gaz.lookup("White House"), Some(EntityClass::Location));
        assert!(!is_metonymic_location("hospital"));
    }

    #[test]
    fn per_instance_extension_does_not_leak() {
        let extended = StaticGazetteer::new().with_entry("Zorg", EntityClass::Organization);
        assert_eq!(extended.lookup("zorg"), Some(EntityClass::Organization));
        assert_eq!(StaticGazetteer::new().lookup("zorg"), None);
    }

    #[test]
    fn unknown_word_is_none() {
        assert_eq!(StaticGazetteer::new().lookup("blorptex"), None);
    }

    #[test]
    fn curies_are_stable() {
        assert_eq!(EntityClass::Person.curie(), "cco:Person");
        assert_eq!(EntityClass::Organization.curie(), "cco:Organization");
        assert_eq!(EntityClass::Entity.curie(), "bfo:Entity");
    }
}
