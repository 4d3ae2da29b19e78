//! TagTeam: English sentences to BFO/CCO-grounded JSON-LD knowledge graphs.
//!
//! One [`build`] call runs the whole pipeline — normalize, tokenize, tag,
//! parse, extract entities/acts/roles, attach provenance, detect and
//! resolve ambiguity, serialize — and returns a single JSON object. The
//! graph carries three tiers: linguistic mentions (discourse referents and
//! verb phrases), the real-world entities and acts they denote, and a
//! provenance triad recording that an artificial parsing agent produced
//! the first two from an information-bearing text.
//!
//! Genuinely ambiguous readings are not discarded: with
//! `preserve_ambiguity` the resolver sorts each detected ambiguity into
//! preserved / resolved / flagged, and preserved ones become alternative
//! nodes in an interpretation lattice with plausibility scores.
//!
//! ```no_run
//! use tagteam::{build, BuildOptions};
//!
//! let graph = build(
//!     "The doctor should allocate the ventilator",
//!     &BuildOptions {
//!         preserve_ambiguity: true,
//!         ..Default::default()
//!     },
//! )?;
//! println!("{}", graph.serialize()?);
//! # Ok::<(), tagteam::BuildError>(())
//! ```
//!
//! The linguistic front end (tokenizer, tagger, dependency parser,
//! gazetteer) is consumed through the trait seams in [`models`];
//! [`ModelSet::reference`] wires the built-in rule-based implementations.
//! All lexical tables are frozen — per-instance extension copies, never
//! mutates — so a `GraphBuilder` can be shared across threads by
//! reference.

pub mod act;
pub mod ambiguity;
pub mod builder;
pub mod deptree;
pub mod entity;
pub mod error;
pub mod gazetteer;
pub mod graph;
pub mod iri;
pub mod jsonld;
pub mod lattice;
pub mod lemma;
pub mod models;
pub mod parser;
pub mod resolver;
pub mod role;
pub mod selectional;
pub mod tagger;
pub mod token;
pub mod tokenizer;

pub use act::TreeActExtractor;
pub use ambiguity::{Ambiguity, AmbiguityDetector, AmbiguityKind, Confidence, Signal};
pub use builder::{build, BuildOptions, Graph, GraphBuilder};
pub use deptree::{DepArc, DepTree, Relation, SubtreeOptions, EXCLUDED_LABELS};
pub use entity::TreeEntityExtractor;
pub use error::{BuildError, BuildWarning};
pub use gazetteer::{EntityClass, StaticGazetteer, METONYMIC_LOCATIONS};
pub use graph::{
    Definiteness, DiscourseReferent, Modality, RealWorldAct, RealWorldEntity, Role, RoleEdges,
    RoleType, SentenceAnalysis, StructuralAssertion, Tense, VerbPhrase,
};
pub use iri::{sanitize, IriMinter, Sha256Hasher};
pub use jsonld::{JsonLdSerializer, ProvenanceTriad};
pub use lattice::{AlternativeGraphBuilder, AlternativeReading, InterpretationLattice};
pub use lemma::Lemmatizer;
pub use models::{DependencyParser, Gazetteer, ModelSet, PosTagger, Tokenizer};
pub use parser::ReferenceParser;
pub use resolver::{
    AmbiguityResolver, DecisionCategory, Resolution, ResolutionSet, ResolverConfig,
};
pub use role::TreeRoleMapper;
pub use selectional::{
    categorize_entity, CheckResult, EntityCategory, SelectionalPreferences, VerbClass, Violation,
};
pub use tagger::ReferenceTagger;
pub use token::{PosTag, Span, Token};
pub use tokenizer::{normalize, ReferenceTokenizer};
