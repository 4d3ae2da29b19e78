//! Semantic role mapping from UD arcs to BFO/CCO realizable roles.
//!
//! Roles inhere in referents and are realized in acts. The mapper never
//! emits a role without a bearer: an argument arc whose dependent produced
//! no referent is skipped with a warning instead.

use tracing::warn;

use crate::deptree::{DepTree, Relation};
use crate::error::BuildWarning;
use crate::graph::{DiscourseReferent, Role, RoleEdges, RoleType, VerbPhrase};
use crate::iri::IriMinter;

pub struct TreeRoleMapper<'a> {
    minter: &'a IriMinter,
}

impl<'a> TreeRoleMapper<'a> {
    pub fn new(minter: &'a IriMinter) -> Self {
        Self { minter }
    }

    pub fn map(
        &self,
        tree: &DepTree,
        referents: &[DiscourseReferent],
        verb_phrases: &[VerbPhrase],
        warnings: &mut Vec<BuildWarning>,
    ) -> RoleEdges {
        let mut edges = RoleEdges::new();
        for phrase in verb_phrases {
            for &(dep, rel) in tree.children(phrase.head_index) {
                let Some(role_type) = self.role_for(tree, dep, rel, phrase.is_passive) else {
                    continue;
                };
                let Some(referent) = referents.iter().find(|r| r.head_index == dep) else {
                    warn!(
                        dep,
                        relation = rel.as_str(),
                        "argument arc has no referent; role skipped"
                    );
                    warnings.push(BuildWarning::extraction(format!(
                        "no bearer for {} argument at token {}",
                        rel.as_str(),
                        dep
                    )));
                    continue;
                };
                let label = format!("{}_{}", role_label(role_type), phrase.lemma);
                let iri = self.minter.mint(&label, referent.span.0, "role");
                edges.push(Role {
                    iri,
                    role_type,
                    bearer: referent.iri.clone(),
                    act: phrase.about.clone(),
                });
            }
        }
        edges
    }

    /// The UD → role table. Obliques subtype by their case preposition.
    fn role_for(
        &self,
        tree: &DepTree,
        dep: usize,
        rel: Relation,
        passive: bool,
    ) -> Option<RoleType> {
        match rel {
            Relation::Nsubj => {
                if passive {
                    None
                } else {
                    Some(RoleType::Agent)
                }
            }
            Relation::NsubjPass => Some(RoleType::Patient),
            Relation::Obj => Some(RoleType::Patient),
            Relation::Iobj => Some(RoleType::Recipient),
            Relation::OblAgent => Some(RoleType::Agent),
            Relation::Obl => {
                let prep = tree
                    .child_with(dep, Relation::Case)
                    .map(|c| tree.text(c).to_lowercase());
                Some(match prep.as_deref() {
                    Some("with") => RoleType::Instrument,
                    Some("at") | Some("in") | Some("on") => RoleType::Location,
                    Some("for") => RoleType::Beneficiary,
                    Some("to") => RoleType::Recipient,
                    _ => RoleType::Oblique,
                })
            }
            _ => None,
        }
    }
}

fn role_label(role_type: RoleType) -> &'static str {
    match role_type {
        RoleType::Agent => "agent",
        RoleType::Patient => "patient",
        RoleType::Instrument => "instrument",
        RoleType::Location => "location",
        RoleType::Recipient => "recipient",
        RoleType::Beneficiary => "beneficiary",
        RoleType::Oblique => "oblique",
    }
}
