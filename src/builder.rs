//! Graph assembly: the coordinator that runs the pipeline stages in order
//! and owns no linguistic logic of its own.
//!
//! normalize → tokenize → tag → parse → extract entities/acts/roles →
//! provenance → detect → resolve → lattice → serialize.

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::act::TreeActExtractor;
use crate::ambiguity::AmbiguityDetector;
use crate::deptree::{DepTree, Relation, SubtreeOptions};
use crate::entity::TreeEntityExtractor;
use crate::error::{BuildError, BuildWarning};
use crate::graph::{
    ArtificialAgent, InformationBearingEntity, ParsingAct, SentenceAnalysis, StructuralAssertion,
};
use crate::iri::IriMinter;
use crate::jsonld::{JsonLdSerializer, ProvenanceTriad};
use crate::lattice::AlternativeGraphBuilder;
use crate::models::ModelSet;
use crate::resolver::{AmbiguityResolver, ResolverConfig};
use crate::selectional::SelectionalPreferences;
use crate::tokenizer::{normalize, ReferenceTokenizer};

/// Recognized build options. Everything is optional; the zero value runs
/// the default-reading pipeline with no ambiguity machinery.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Attach `_ambiguityReport`.
    pub detect_ambiguity: bool,
    /// Run the resolver/lattice pipeline and attach
    /// `_interpretationLattice`. Implies detection.
    pub preserve_ambiguity: bool,
    pub preserve_threshold: Option<f64>,
    pub max_readings_per_node: Option<usize>,
    pub max_total_alternatives: Option<usize>,
    pub use_selectional_evidence: Option<bool>,
    /// Domain tag recorded in `_metadata` and handed to value annotators.
    pub context: Option<String>,
    /// Pre-computed annotations merged into the output.
    pub scored_values: Option<Value>,
    pub context_intensity: Option<Value>,
    pub pretty: bool,
    /// Attach `_debug.tokens`.
    pub verbose: bool,
    /// Timestamp for the information-bearing entity and the report. When
    /// absent the wall clock is read, which breaks byte-identical replay.
    pub received_at: Option<DateTime<Utc>>,
}

impl BuildOptions {
    fn resolver_config(&self) -> ResolverConfig {
        let mut config = ResolverConfig::default();
        if let Some(threshold) = self.preserve_threshold {
            config.preserve_threshold = threshold;
        }
        if let Some(max) = self.max_readings_per_node {
            config.max_readings_per_node = max;
        }
        if let Some(max) = self.max_total_alternatives {
            config.max_total_alternatives = max;
        }
        if let Some(use_sel) = self.use_selectional_evidence {
            config.use_selectional_evidence = use_sel;
        }
        config
    }
}

/// A finished build: one JSON object with `@context`, `@graph`,
/// `_metadata`, and the optional report/lattice/debug attachments.
#[derive(Debug, Clone)]
pub struct Graph {
    value: Value,
    pretty: bool,
}

impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Graph {
    pub fn from_value(value: Value) -> Self {
        Self {
            value,
            pretty: false,
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn context(&self) -> &Value {
        &self.value["@context"]
    }

    pub fn nodes(&self) -> &[Value] {
        self.value["@graph"].as_array().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn node(&self, iri: &str) -> Option<&Value> {
        self.nodes().iter().find(|n| n["@id"] == json!(iri))
    }

    /// Nodes carrying the given `@type` entry.
    pub fn nodes_of_type(&self, type_curie: &str) -> Vec<&Value> {
        self.nodes()
            .iter()
            .filter(|n| {
                n["@type"]
                    .as_array()
                    .map(|types| types.contains(&json!(type_curie)))
                    .unwrap_or(false)
            })
            .collect()
    }

    pub fn metadata(&self) -> &Value {
        &self.value["_metadata"]
    }

    pub fn ambiguity_report(&self) -> Option<&Value> {
        self.value.get("_ambiguityReport")
    }

    pub fn interpretation_lattice(&self) -> Option<&Value> {
        self.value.get("_interpretationLattice")
    }

    pub fn to_json(&self) -> Result<String, BuildError> {
        Ok(serde_json::to_string(&self.value)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, BuildError> {
        Ok(serde_json::to_string_pretty(&self.value)?)
    }

    /// Serialize honoring the `pretty` build option.
    pub fn serialize(&self) -> Result<String, BuildError> {
        if self.pretty {
            self.to_json_pretty()
        } else {
            self.to_json()
        }
    }

    pub fn parse(text: &str) -> Result<Graph, BuildError> {
        Ok(Graph::from_value(serde_json::from_str(text)?))
    }
}

#[derive(Debug)]
pub struct GraphBuilder {
    models: ModelSet,
    prefs: SelectionalPreferences,
    minter: IriMinter,
}

impl GraphBuilder {
    /// Fails fast when a required model (tagger, parser) is absent.
    pub fn new(models: ModelSet) -> Result<Self, BuildError> {
        if models.tagger.is_none() {
            return Err(BuildError::MissingModel("tagger"));
        }
        if models.parser.is_none() {
            return Err(BuildError::MissingModel("parser"));
        }
        Ok(Self {
            models,
            prefs: SelectionalPreferences::new(),
            minter: IriMinter::new(),
        })
    }

    pub fn with_preferences(mut self, prefs: SelectionalPreferences) -> Self {
        self.prefs = prefs;
        self
    }

    pub fn build(&self, text: &str, options: &BuildOptions) -> Result<Graph, BuildError> {
        if text.trim().is_empty() {
            return Err(BuildError::EmptyInput);
        }
        let normalized = normalize(text);
        let received_at = options.received_at.unwrap_or_else(Utc::now);
        let mut warnings: Vec<BuildWarning> = Vec::new();

        let fallback_tokenizer = ReferenceTokenizer;
        let tokenizer: &dyn crate::models::Tokenizer = self
            .models
            .tokenizer
            .as_deref()
            .unwrap_or(&fallback_tokenizer);
        let tagger = self
            .models
            .tagger
            .as_deref()
            .ok_or(BuildError::MissingModel("tagger"))?;
        let parser = self
            .models
            .parser
            .as_deref()
            .ok_or(BuildError::MissingModel("parser"))?;

        let tokens = tokenizer.tokenize(&normalized);
        let tags = tagger.tag(&tokens);
        let arcs = parser.parse(&tokens, &tags);
        let tree = DepTree::new(tokens, tags, arcs);

        let degraded = !tree.is_empty() && (!tree.is_well_formed() || tree.roots().is_empty());
        if degraded {
            warnings.push(BuildWarning::parse_shape(
                "parser returned an unusual tree; graph reduced to provenance",
            ));
        }

        let mut analysis = SentenceAnalysis::default();
        if !degraded {
            self.analyze(&tree, &mut analysis, &mut warnings);
        }

        let provenance = self.provenance(&normalized, &tree, &analysis, received_at);

        // Ambiguity machinery, gated by options.
        let detect = options.detect_ambiguity || options.preserve_ambiguity;
        let ambiguities = if detect && !degraded {
            let detector = AmbiguityDetector::new(&self.prefs);
            detector.detect(&tree, &mut analysis)
        } else {
            Vec::new()
        };

        let serializer = JsonLdSerializer;
        let mut root = Map::new();
        root.insert("@context".into(), JsonLdSerializer::context());
        root.insert(
            "@graph".into(),
            Value::Array(serializer.graph_nodes(&analysis, &provenance)),
        );

        if detect {
            root.insert(
                "_ambiguityReport".into(),
                serializer.ambiguity_report(&ambiguities, &received_at),
            );
        }
        if options.preserve_ambiguity {
            let config = options.resolver_config();
            let resolver = AmbiguityResolver::new(config);
            let resolutions = resolver.resolve(ambiguities.clone(), tree.tokens());
            let lattice = AlternativeGraphBuilder::new(config).build(resolutions);
            root.insert(
                "_interpretationLattice".into(),
                serializer.lattice(&lattice, &analysis, &provenance.ibe.iri),
            );
        }

        root.insert(
            "_metadata".into(),
            self.metadata(options, &tree, &warnings),
        );
        if let Some(values) = &options.scored_values {
            root.insert("tagteam:scoredValues".into(), values.clone());
        }
        if let Some(intensity) = &options.context_intensity {
            root.insert("tagteam:contextIntensity".into(), intensity.clone());
        }
        if options.verbose {
            root.insert("_debug".into(), self.debug_tokens(&tree));
        }

        Ok(Graph {
            value: Value::Object(root),
            pretty: options.pretty,
        })
    }

    /// Run the extractors and resolve pending assertions to referent IRIs,
    /// creating mentions on demand for copular predicates the arc scan
    /// does not reach.
    fn analyze(
        &self,
        tree: &DepTree,
        analysis: &mut SentenceAnalysis,
        warnings: &mut Vec<BuildWarning>,
    ) {
        let gazetteer = self.models.gazetteer.as_deref();
        let entity_extractor =
            TreeEntityExtractor::new(gazetteer, &self.models.lemmatizer, &self.minter);
        let extracted = entity_extractor.extract(tree, warnings);
        analysis.referents = extracted.referents;
        analysis.entities = extracted.entities;

        let act_extractor = TreeActExtractor::new(&self.models.lemmatizer, &self.minter);
        let acts = act_extractor.extract(tree);
        analysis.verb_phrases = acts.verb_phrases;
        analysis.acts = acts.acts;

        for pending in acts.assertions {
            let subject = self.ensure_referent(
                tree,
                &entity_extractor,
                analysis,
                pending.subject_head,
                warnings,
            );
            let object = pending.object_head.and_then(|head| {
                self.ensure_referent(tree, &entity_extractor, analysis, head, warnings)
            });
            let Some(subject) = subject else {
                continue;
            };
            if pending.object_head.is_some() && object.is_none() {
                continue;
            }
            let span_start = tree.token(pending.subject_head).span.start;
            let iri = self.minter.mint(
                &format!("{}_assertion", pending.kind.as_str()),
                span_start,
                "assertion",
            );
            analysis.assertions.push(StructuralAssertion {
                iri,
                kind: pending.kind,
                subject,
                relation: pending.relation,
                object,
                copula: pending.copula,
                negated: pending.negated,
            });
        }

        let mapper = crate::role::TreeRoleMapper::new(&self.minter);
        analysis.roles = mapper.map(tree, &analysis.referents, &analysis.verb_phrases, warnings);
    }

    /// IRI of the referent at `head`, extracting one if the entity pass
    /// skipped it (copular predicates, existential pivots).
    fn ensure_referent(
        &self,
        tree: &DepTree,
        extractor: &TreeEntityExtractor,
        analysis: &mut SentenceAnalysis,
        head: usize,
        warnings: &mut Vec<BuildWarning>,
    ) -> Option<String> {
        if let Some(referent) = analysis.referent_by_head(head) {
            return Some(referent.iri.clone());
        }
        let ud_role = tree.parent(head).map(|(_, r)| r).unwrap_or(Relation::Root);
        match extractor.entity_at(tree, head, ud_role, &SubtreeOptions::default()) {
            Some((referent, entity, _aliases)) => {
                let iri = referent.iri.clone();
                debug!(head, iri = %iri, "referent created for assertion argument");
                analysis.referents.push(referent);
                analysis.entities.push(entity);
                Some(iri)
            }
            None => {
                warnings.push(BuildWarning::extraction(format!(
                    "assertion argument at token {} has no extractable mention",
                    head
                )));
                None
            }
        }
    }

    fn provenance(
        &self,
        text: &str,
        tree: &DepTree,
        analysis: &SentenceAnalysis,
        received_at: DateTime<Utc>,
    ) -> ProvenanceTriad {
        let ibe = InformationBearingEntity {
            iri: self.minter.mint("text", 0, &format!("ibe|{}", text)),
            text: crate::iri::sanitize(text),
            char_count: text.chars().count(),
            word_count: tree
                .tokens()
                .iter()
                .filter(|t| !t.is_punctuation())
                .count(),
            received_at,
        };
        let agent = ArtificialAgent {
            iri: "inst:TagTeamParser".to_string(),
            name: "TagTeam Parser".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            capabilities: vec![
                "entity-extraction",
                "act-extraction",
                "role-mapping",
                "ambiguity-detection",
                "ambiguity-preservation",
            ],
        };
        let act = ParsingAct {
            iri: format!(
                "{}_ParsingAct",
                self.minter.mint("parse", 0, &format!("parsing_act|{}", text))
            ),
            input: ibe.iri.clone(),
            agent: agent.iri.clone(),
            outputs: analysis.t1_iris(),
        };
        ProvenanceTriad { ibe, agent, act }
    }

    fn metadata(
        &self,
        options: &BuildOptions,
        tree: &DepTree,
        warnings: &[BuildWarning],
    ) -> Value {
        let mut metadata = Map::new();
        metadata.insert("generator".into(), json!("tagteam"));
        metadata.insert("version".into(), json!(env!("CARGO_PKG_VERSION")));
        metadata.insert("tokenCount".into(), json!(tree.len()));
        if let Some(context) = &options.context {
            metadata.insert("context".into(), json!(context));
        }
        metadata.insert(
            "warnings".into(),
            json!(warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>()),
        );
        Value::Object(metadata)
    }

    fn debug_tokens(&self, tree: &DepTree) -> Value {
        json!({
            "tokens": tree
                .tokens()
                .iter()
                .zip(tree.tags())
                .map(|(token, tag)| json!({
                    "text": token.text,
                    "tags": [tag.as_str()],
                }))
                .collect::<Vec<_>>(),
        })
    }
}

/// Build a graph with the built-in reference models.
pub fn build(text: &str, options: &BuildOptions) -> Result<Graph, BuildError> {
    GraphBuilder::new(ModelSet::reference())?.build(text, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_an_error() {
        let err = build("", &BuildOptions::default()).unwrap_err();
        assert_eq!(err.kind(), "input");
        let err = build("   \n ", &BuildOptions::default()).unwrap_err();
        assert_eq!(err.kind(), "input");
    }

    #[test]
    fn missing_models_fail_fast() {
        let err = GraphBuilder::new(ModelSet::empty()).unwrap_err();
        assert_eq!(err.kind(), "model");
    }

    #[test]
    fn simple_sentence_builds() {
        let graph = build("The doctor treated the patient", &BuildOptions::default()).unwrap();
        assert!(graph.nodes().len() >= 8);
        assert!(graph.ambiguity_report().is_none());
        assert!(graph.interpretation_lattice().is_none());
    }

    #[test]
    fn provenance_triad_always_present() {
        let graph = build("The doctor treated the patient", &BuildOptions::default()).unwrap();
        assert_eq!(
            graph.nodes_of_type("cco:InformationBearingEntity").len(),
            1
        );
        assert_eq!(graph.nodes_of_type("cco:ArtificialAgent").len(), 1);
        assert_eq!(graph.nodes_of_type("tagteam:ParsingAct").len(), 1);
        let agent = &graph.nodes_of_type("cco:ArtificialAgent")[0];
        assert!(agent["@id"].as_str().unwrap().ends_with("Parser"));
        let act = &graph.nodes_of_type("tagteam:ParsingAct")[0];
        assert!(act["@id"].as_str().unwrap().ends_with("ParsingAct"));
    }

    #[test]
    fn detect_option_attaches_report() {
        let options = BuildOptions {
            detect_ambiguity: true,
            ..Default::default()
        };
        let graph = build("The doctor should allocate the ventilator", &options).unwrap();
        let report = graph.ambiguity_report().unwrap();
        assert_eq!(report["@type"], json!("tagteam:AmbiguityReport"));
    }

    #[test]
    fn verbose_attaches_debug_tokens() {
        let options = BuildOptions {
            verbose: true,
            ..Default::default()
        };
        let graph = build("The doctor treated the patient", &options).unwrap();
        let tokens = graph.value()["_debug"]["tokens"].as_array().unwrap();
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[0]["text"], json!("The"));
        assert_eq!(tokens[0]["tags"], json!(["DT"]));
    }

    #[test]
    fn annotations_merge_into_root() {
        let options = BuildOptions {
            scored_values: Some(json!({"care": 0.9})),
            context_intensity: Some(json!(0.4)),
            context: Some("MedicalEthics".to_string()),
            ..Default::default()
        };
        let graph = build("The doctor treated the patient", &options).unwrap();
        assert_eq!(graph.value()["tagteam:scoredValues"], json!({"care": 0.9}));
        assert_eq!(graph.value()["tagteam:contextIntensity"], json!(0.4));
        assert_eq!(graph.metadata()["context"], json!("MedicalEthics"));
    }

    #[test]
    fn punctuation_only_input_degrades_to_provenance() {
        let graph = build("...", &BuildOptions::default()).unwrap();
        assert!(graph.nodes().len() <= 3);
    }
}
