//! Entity extraction from the dependency tree.
//!
//! One deterministic pass: root nouns first (verbless headlines), then
//! every entity-bearing arc, with a conservative coordination split and
//! appositive alias handling.

use std::collections::HashMap;

use tracing::debug;

use crate::deptree::{DepTree, Relation, SubtreeOptions};
use crate::error::BuildWarning;
use crate::gazetteer::EntityClass;
use crate::graph::{Definiteness, DiscourseReferent, RealWorldEntity};
use crate::iri::{sanitize, IriMinter};
use crate::lemma::Lemmatizer;
use crate::models::Gazetteer;
use crate::tagger::cardinal_value;
use crate::token::PosTag;

/// Modifiers that mark a referent as scarce ("the last ventilator").
static SCARCITY_MARKERS: &[&str] = &["final", "last", "only", "remaining", "sole"];

#[derive(Debug, Default)]
pub struct ExtractedEntities {
    pub referents: Vec<DiscourseReferent>,
    pub entities: Vec<RealWorldEntity>,
    /// alias text (lowercased) → canonical entity text.
    pub alias_map: HashMap<String, String>,
}

pub struct TreeEntityExtractor<'a> {
    gazetteer: Option<&'a dyn Gazetteer>,
    lemmatizer: &'a Lemmatizer,
    minter: &'a IriMinter,
}

impl<'a> TreeEntityExtractor<'a> {
    pub fn new(
        gazetteer: Option<&'a dyn Gazetteer>,
        lemmatizer: &'a Lemmatizer,
        minter: &'a IriMinter,
    ) -> Self {
        Self {
            gazetteer,
            lemmatizer,
            minter,
        }
    }

    pub fn extract(
        &self,
        tree: &DepTree,
        warnings: &mut Vec<BuildWarning>,
    ) -> ExtractedEntities {
        let mut out = ExtractedEntities::default();
        let mut seen: Vec<usize> = Vec::new();

        // 1. Verbless roots: a root noun with no copula and no subject of
        // its own is an entity mention (headlines, fragments).
        for root in tree.roots() {
            let tag = tree.tag(root);
            if !tag.is_verb()
                && !tree.has_child(root, Relation::Cop)
                && !tree.has_child(root, Relation::Nsubj)
            {
                self.emit(tree, root, Relation::Root, &mut seen, &mut out, warnings);
            }
        }

        // 2. Entity-bearing arcs, in sentence order.
        let mut arcs: Vec<_> = tree
            .arcs()
            .iter()
            .filter(|a| a.rel.bears_entity())
            .collect();
        arcs.sort_by_key(|a| a.dep);
        for arc in arcs {
            if !seen.contains(&arc.dep) {
                self.emit(tree, arc.dep, arc.rel, &mut seen, &mut out, warnings);
            }
        }

        // 5. Alias promotion: a later mention matching a registered alias
        // of an already-seen canonical resolves to it.
        let alias_map = out.alias_map.clone();
        for i in 1..out.referents.len() {
            let key = out.referents[i].surface.to_lowercase();
            if let Some(canonical) = alias_map.get(&key) {
                let seen_before = out.referents[..i]
                    .iter()
                    .any(|r| r.surface.eq_ignore_ascii_case(canonical));
                if seen_before {
                    out.referents[i].canonical_form = Some(canonical.clone());
                }
            }
        }

        out
    }

    /// Build the mention at `head`, splitting a proper-noun coordination
    /// when the conservative conditions all hold.
    fn emit(
        &self,
        tree: &DepTree,
        head: usize,
        ud_role: Relation,
        seen: &mut Vec<usize>,
        out: &mut ExtractedEntities,
        warnings: &mut Vec<BuildWarning>,
    ) {
        let conjuncts: Vec<usize> = tree
            .children(head)
            .iter()
            .filter(|(_, r)| *r == Relation::Conj)
            .map(|(d, _)| *d)
            .collect();

        if !conjuncts.is_empty() && self.should_split(tree, head, &conjuncts) {
            let head_opts = SubtreeOptions {
                skip_labels: vec![Relation::Conj, Relation::Cc],
            };
            self.build_single(tree, head, ud_role, &head_opts, seen, out, warnings);
            let conj_opts = SubtreeOptions {
                skip_labels: vec![Relation::Cc],
            };
            for conj in conjuncts {
                self.build_single(tree, conj, ud_role, &conj_opts, seen, out, warnings);
            }
        } else {
            self.build_single(
                tree,
                head,
                ud_role,
                &SubtreeOptions::default(),
                seen,
                out,
                warnings,
            );
        }
    }

    /// Conservative split test: proper-noun heads throughout, no compounds
    /// anywhere, and the gazetteer must recognize every conjunct.
    fn should_split(&self, tree: &DepTree, head: usize, conjuncts: &[usize]) -> bool {
        let Some(gazetteer) = self.gazetteer else {
            return false;
        };
        if !tree.tag(head).is_proper_noun() {
            return false;
        }
        if conjuncts.iter().any(|&c| !tree.tag(c).is_proper_noun()) {
            return false;
        }
        if tree.has_child(head, Relation::Compound) {
            return false;
        }
        for &conj in conjuncts {
            let subtree = tree.entity_subtree(conj, &SubtreeOptions::default());
            let has_compound = subtree.iter().any(|&i| {
                tree.parent(i)
                    .map(|(_, r)| r == Relation::Compound)
                    .unwrap_or(false)
                    && i != conj
            });
            if has_compound {
                return false;
            }
        }
        if !gazetteer.recognizes(tree.text(head)) {
            return false;
        }
        conjuncts.iter().all(|&c| gazetteer.recognizes(tree.text(c)))
    }

    fn build_single(
        &self,
        tree: &DepTree,
        head: usize,
        ud_role: Relation,
        opts: &SubtreeOptions,
        seen: &mut Vec<usize>,
        out: &mut ExtractedEntities,
        warnings: &mut Vec<BuildWarning>,
    ) {
        if seen.contains(&head) {
            return;
        }
        match self.entity_at(tree, head, ud_role, opts) {
            Some((referent, entity, aliases)) => {
                seen.push(head);
                for alias in aliases {
                    out.alias_map
                        .insert(alias.to_lowercase(), entity.label.clone());
                }
                out.referents.push(referent);
                out.entities.push(entity);
            }
            None => {
                debug!(head, "skipping empty entity subtree");
                warnings.push(BuildWarning::extraction(format!(
                    "no entity could be built at token {}",
                    head
                )));
            }
        }
    }

    /// Build one referent/entity pair from the subtree at `head`. Public
    /// for the graph assembly, which needs mentions for copular predicates
    /// that the arc scan does not cover.
    pub fn entity_at(
        &self,
        tree: &DepTree,
        head: usize,
        ud_role: Relation,
        opts: &SubtreeOptions,
    ) -> Option<(DiscourseReferent, RealWorldEntity, Vec<String>)> {
        let subtree = tree.entity_subtree(head, opts);
        if subtree.is_empty() {
            return None;
        }

        let surface_raw = tree.subtree_text(&subtree);
        let surface = sanitize(&surface_raw);
        let span = tree.subtree_span(&subtree);
        let head_pos = tree.tag(head);

        // Core text: the mention minus its determiner, used for gazetteer
        // lookup and as the tier-2 label.
        let core: Vec<usize> = subtree
            .iter()
            .copied()
            .filter(|&i| !matches!(tree.tag(i), PosTag::Dt | PosTag::PrpDollar))
            .collect();
        let core_text = sanitize(&tree.subtree_text(&core));
        let label = if core_text.is_empty() {
            surface.clone()
        } else {
            core_text
        };

        let class = self.classify(tree, head, &label);

        // 4. Appositive aliases anywhere in the subtree.
        let mut aliases = Vec::new();
        for &index in &subtree {
            for appos in tree.appositions(index) {
                let alias_subtree = tree.entity_subtree(appos, &SubtreeOptions::default());
                if !alias_subtree.is_empty() {
                    aliases.push(sanitize(&tree.subtree_text(&alias_subtree)));
                }
            }
        }

        let definiteness = self.definiteness(tree, head);
        let is_scarce = self.scarcity(tree, head, &subtree);
        let quantity_indicator = self.quantity_indicator(tree, head, &subtree, is_scarce);
        let quantity = self.quantity(tree, head, is_scarce);

        let referent_iri = self.minter.mint(&label, span.0, "referent");
        let entity_iri = self.minter.mint(&label, span.0, "entity");

        let referent = DiscourseReferent {
            iri: referent_iri.clone(),
            surface,
            span,
            head_index: head,
            head_pos,
            ud_role,
            denotes_type: class,
            definiteness,
            quantity,
            quantity_indicator,
            aliases: aliases.clone(),
            is_scarce,
            canonical_form: None,
            about: entity_iri.clone(),
        };
        let entity = RealWorldEntity {
            iri: entity_iri,
            class,
            label,
            mention: referent_iri,
        };
        Some((referent, entity, aliases))
    }

    /// 6. Gazetteer-first on the core text, then on the head lemma; the
    /// fallback class is the same for proper and common heads.
    fn classify(&self, tree: &DepTree, head: usize, label: &str) -> EntityClass {
        if let Some(gazetteer) = self.gazetteer {
            if let Some(class) = gazetteer.lookup(label) {
                return class;
            }
            let head_lemma = self.lemmatizer.noun_lemma(tree.text(head));
            if let Some(class) = gazetteer.lookup(&head_lemma) {
                return class;
            }
        }
        EntityClass::Entity
    }

    fn definiteness(&self, tree: &DepTree, head: usize) -> Definiteness {
        for &(dep, rel) in tree.children(head) {
            if rel == Relation::Det {
                if tree.tag(dep) == PosTag::PrpDollar {
                    return Definiteness::Definite;
                }
                return match tree.text(dep).to_lowercase().as_str() {
                    "the" | "this" | "that" | "these" | "those" => Definiteness::Definite,
                    _ => Definiteness::Indefinite,
                };
            }
        }
        Definiteness::Bare
    }

    fn scarcity(&self, tree: &DepTree, _head: usize, subtree: &[usize]) -> bool {
        subtree.iter().any(|&i| {
            SCARCITY_MARKERS
                .binary_search(&tree.text(i).to_lowercase().as_str())
                .is_ok()
        })
    }

    fn quantity_indicator(
        &self,
        tree: &DepTree,
        _head: usize,
        subtree: &[usize],
        is_scarce: bool,
    ) -> Option<String> {
        for &i in subtree {
            if tree.tag(i) == PosTag::Cd {
                return Some(tree.text(i).to_string());
            }
        }
        if is_scarce {
            subtree
                .iter()
                .find(|&&i| {
                    SCARCITY_MARKERS
                        .binary_search(&tree.text(i).to_lowercase().as_str())
                        .is_ok()
                })
                .map(|&i| tree.text(i).to_string())
        } else {
            None
        }
    }

    fn quantity(&self, tree: &DepTree, head: usize, is_scarce: bool) -> Option<u64> {
        if let Some(num) = tree.child_with(head, Relation::Nummod) {
            if let Some(value) = cardinal_value(tree.text(num)) {
                return Some(value);
            }
        }
        if is_scarce && !tree.tag(head).is_plural_noun() {
            return Some(1);
        }
        None
    }
}
