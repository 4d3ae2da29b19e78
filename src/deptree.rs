//! Read-only dependency tree over a tagged sentence.
//!
//! The tree stores Universal Dependencies v2 arcs between 1-based token
//! indices (head 0 is the synthetic root) and derives constant-time
//! child/parent indices at construction. Traversal never mutates.

use crate::token::{PosTag, Token};

/// Universal Dependencies v2 relations recognized by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// Arc from the synthetic root (head index 0)
    Root,
    Nsubj,
    NsubjPass,
    Obj,
    Iobj,
    Obl,
    OblAgent,
    Nmod,
    Amod,
    Nummod,
    Det,
    Compound,
    Cop,
    Aux,
    AuxPass,
    Case,
    Mark,
    Conj,
    Cc,
    Appos,
    Acl,
    AclRelcl,
    Advcl,
    Advmod,
    /// Negation marker ("not", "never") on a predicate
    Neg,
    Xcomp,
    Expl,
    Punct,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Root => "root",
            Relation::Nsubj => "nsubj",
            Relation::NsubjPass => "nsubj:pass",
            Relation::Obj => "obj",
            Relation::Iobj => "iobj",
            Relation::Obl => "obl",
            Relation::OblAgent => "obl:agent",
            Relation::Nmod => "nmod",
            Relation::Amod => "amod",
            Relation::Nummod => "nummod",
            Relation::Det => "det",
            Relation::Compound => "compound",
            Relation::Cop => "cop",
            Relation::Aux => "aux",
            Relation::AuxPass => "aux:pass",
            Relation::Case => "case",
            Relation::Mark => "mark",
            Relation::Conj => "conj",
            Relation::Cc => "cc",
            Relation::Appos => "appos",
            Relation::Acl => "acl",
            Relation::AclRelcl => "acl:relcl",
            Relation::Advcl => "advcl",
            Relation::Advmod => "advmod",
            Relation::Neg => "neg",
            Relation::Xcomp => "xcomp",
            Relation::Expl => "expl",
            Relation::Punct => "punct",
        }
    }

    pub fn from_str(s: &str) -> Option<Relation> {
        match s {
            "root" => Some(Relation::Root),
            "nsubj" => Some(Relation::Nsubj),
            "nsubj:pass" => Some(Relation::NsubjPass),
            "obj" => Some(Relation::Obj),
            "iobj" => Some(Relation::Iobj),
            "obl" => Some(Relation::Obl),
            "obl:agent" => Some(Relation::OblAgent),
            "nmod" => Some(Relation::Nmod),
            "amod" => Some(Relation::Amod),
            "nummod" => Some(Relation::Nummod),
            "det" => Some(Relation::Det),
            "compound" => Some(Relation::Compound),
            "cop" => Some(Relation::Cop),
            "aux" => Some(Relation::Aux),
            "aux:pass" => Some(Relation::AuxPass),
            "case" => Some(Relation::Case),
            "mark" => Some(Relation::Mark),
            "conj" => Some(Relation::Conj),
            "cc" => Some(Relation::Cc),
            "appos" => Some(Relation::Appos),
            "acl" => Some(Relation::Acl),
            "acl:relcl" => Some(Relation::AclRelcl),
            "advcl" => Some(Relation::Advcl),
            "advmod" => Some(Relation::Advmod),
            "neg" => Some(Relation::Neg),
            "xcomp" => Some(Relation::Xcomp),
            "expl" => Some(Relation::Expl),
            "punct" => Some(Relation::Punct),
            _ => None,
        }
    }

    /// Arcs that introduce a distinct entity mention when they land on a noun.
    pub fn bears_entity(&self) -> bool {
        matches!(
            self,
            Relation::Nsubj
                | Relation::NsubjPass
                | Relation::Obj
                | Relation::Iobj
                | Relation::Obl
                | Relation::OblAgent
                | Relation::Nmod
        )
    }
}

/// Labels never followed when collecting the text of an entity mention.
/// Clausal modifiers and appositions describe the entity rather than
/// belonging to its surface form.
pub const EXCLUDED_LABELS: &[Relation] = &[
    Relation::Acl,
    Relation::AclRelcl,
    Relation::Advcl,
    Relation::Cop,
    Relation::Punct,
    Relation::Appos,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepArc {
    /// 1-based head index; 0 for the sentence root.
    pub head: usize,
    /// 1-based dependent index.
    pub dep: usize,
    pub rel: Relation,
}

impl DepArc {
    pub fn new(head: usize, dep: usize, rel: Relation) -> Self {
        Self { head, dep, rel }
    }
}

/// Options for [`DepTree::entity_subtree`].
#[derive(Debug, Clone, Default)]
pub struct SubtreeOptions {
    /// Labels excluded in addition to [`EXCLUDED_LABELS`], used when a
    /// coordination is split into separate entities.
    pub skip_labels: Vec<Relation>,
}

#[derive(Debug, Clone)]
pub struct DepTree {
    tokens: Vec<Token>,
    tags: Vec<PosTag>,
    arcs: Vec<DepArc>,
    /// children[i] lists (dependent, relation) pairs for head i (0 = root).
    children: Vec<Vec<(usize, Relation)>>,
    /// parent[i] holds (head, relation) for dependent i; parent[0] unused.
    parent: Vec<Option<(usize, Relation)>>,
}

impl DepTree {
    pub fn new(tokens: Vec<Token>, tags: Vec<PosTag>, arcs: Vec<DepArc>) -> Self {
        let n = tokens.len();
        let mut children = vec![Vec::new(); n + 1];
        let mut parent = vec![None; n + 1];
        for arc in &arcs {
            if arc.head <= n && arc.dep >= 1 && arc.dep <= n {
                children[arc.head].push((arc.dep, arc.rel));
                parent[arc.dep] = Some((arc.head, arc.rel));
            }
        }
        for list in &mut children {
            list.sort_by_key(|(dep, _)| *dep);
        }
        Self {
            tokens,
            tags,
            arcs,
            children,
            parent,
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn tags(&self) -> &[PosTag] {
        &self.tags
    }

    pub fn arcs(&self) -> &[DepArc] {
        &self.arcs
    }

    /// Surface text of the 1-based token index.
    pub fn text(&self, index: usize) -> &str {
        &self.tokens[index - 1].text
    }

    /// Tag of the 1-based token index.
    pub fn tag(&self, index: usize) -> PosTag {
        self.tags[index - 1]
    }

    pub fn token(&self, index: usize) -> &Token {
        &self.tokens[index - 1]
    }

    pub fn children(&self, head: usize) -> &[(usize, Relation)] {
        &self.children[head]
    }

    pub fn parent(&self, dep: usize) -> Option<(usize, Relation)> {
        self.parent.get(dep).copied().flatten()
    }

    /// Find the first child of `head` with the given relation.
    pub fn child_with(&self, head: usize, rel: Relation) -> Option<usize> {
        self.children[head]
            .iter()
            .find(|(_, r)| *r == rel)
            .map(|(d, _)| *d)
    }

    pub fn has_child(&self, head: usize, rel: Relation) -> bool {
        self.child_with(head, rel).is_some()
    }

    /// Indices attached directly to the synthetic root.
    pub fn roots(&self) -> Vec<usize> {
        self.children[0].iter().map(|(d, _)| *d).collect()
    }

    /// Appositive dependents of `head`.
    pub fn appositions(&self, head: usize) -> Vec<usize> {
        self.children[head]
            .iter()
            .filter(|(_, r)| *r == Relation::Appos)
            .map(|(d, _)| *d)
            .collect()
    }

    /// Collect the indices of the entity mention rooted at `head`, sorted
    /// ascending. Arcs labeled with [`EXCLUDED_LABELS`] (plus any
    /// `opts.skip_labels`) are never followed; `case` is skipped only on the
    /// head itself, since a preposition marks the mention's role rather than
    /// its text.
    pub fn entity_subtree(&self, head: usize, opts: &SubtreeOptions) -> Vec<usize> {
        let mut out = Vec::new();
        self.collect_subtree(head, opts, true, &mut out);
        out.sort_unstable();
        out
    }

    fn collect_subtree(
        &self,
        index: usize,
        opts: &SubtreeOptions,
        is_head: bool,
        out: &mut Vec<usize>,
    ) {
        if index == 0 || index > self.len() || out.contains(&index) {
            return;
        }
        out.push(index);
        for &(dep, rel) in &self.children[index] {
            if EXCLUDED_LABELS.contains(&rel) || opts.skip_labels.contains(&rel) {
                continue;
            }
            if is_head && rel == Relation::Case {
                continue;
            }
            self.collect_subtree(dep, opts, false, out);
        }
    }

    /// Surface text of a subtree, joined in token order.
    pub fn subtree_text(&self, indices: &[usize]) -> String {
        indices
            .iter()
            .map(|&i| self.text(i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Character span covered by a sorted index set, in the normalized text.
    pub fn subtree_span(&self, indices: &[usize]) -> (usize, usize) {
        let start = indices
            .first()
            .map(|&i| self.token(i).span.start)
            .unwrap_or(0);
        let end = indices
            .last()
            .map(|&i| self.token(i).span.end)
            .unwrap_or(0);
        (start, end)
    }

    /// True when every node reaches the root without revisiting an index.
    /// A malformed parse (cycle, orphaned head) downgrades the build rather
    /// than failing it.
    pub fn is_well_formed(&self) -> bool {
        if !self.roots().is_empty() || self.is_empty() {
            for dep in 1..=self.len() {
                let mut seen = 0usize;
                let mut current = dep;
                while let Some((head, _)) = self.parent(current) {
                    if head == 0 {
                        break;
                    }
                    seen += 1;
                    if seen > self.len() {
                        return false;
                    }
                    current = head;
                }
            }
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Token;

    fn toks(words: &[&str]) -> Vec<Token> {
        let mut out = Vec::new();
        let mut pos = 0;
        for w in words {
            out.push(Token::new(*w, pos, pos + w.len()));
            pos += w.len() + 1;
        }
        out
    }

    /// "The doctor treated the patient"
    fn simple_tree() -> DepTree {
        DepTree::new(
            toks(&["The", "doctor", "treated", "the", "patient"]),
            vec![PosTag::Dt, PosTag::Nn, PosTag::Vbd, PosTag::Dt, PosTag::Nn],
            vec![
                DepArc::new(2, 1, Relation::Det),
                DepArc::new(3, 2, Relation::Nsubj),
                DepArc::new(0, 3, Relation::Root),
                DepArc::new(5, 4, Relation::Det),
                DepArc::new(3, 5, Relation::Obj),
            ],
        )
    }

    #[test]
    fn children_and_parent_indices() {
        let tree = simple_tree();
        assert_eq!(tree.parent(1), Some((2, Relation::Det)));
        assert_eq!(tree.parent(2), Some((3, Relation::Nsubj)));
        assert_eq!(tree.roots(), vec![3]);
        assert_eq!(tree.child_with(3, Relation::Obj), Some(5));
    }

    #[test]
    fn entity_subtree_is_sorted_and_bounded() {
        let tree = simple_tree();
        let subject = tree.entity_subtree(2, &SubtreeOptions::default());
        assert_eq!(subject, vec![1, 2]);
        assert_eq!(tree.subtree_text(&subject), "The doctor");
    }

    #[test]
    fn excluded_labels_are_public_contract() {
        assert!(EXCLUDED_LABELS.contains(&Relation::Appos));
        assert!(EXCLUDED_LABELS.contains(&Relation::AclRelcl));
        assert!(!EXCLUDED_LABELS.contains(&Relation::Amod));
    }

    #[test]
    fn case_skipped_only_at_head() {
        // "by the doctor": doctor <-case- by, doctor <-det- the
        let tree = DepTree::new(
            toks(&["by", "the", "doctor"]),
            vec![PosTag::In, PosTag::Dt, PosTag::Nn],
            vec![
                DepArc::new(3, 1, Relation::Case),
                DepArc::new(3, 2, Relation::Det),
                DepArc::new(0, 3, Relation::Root),
            ],
        );
        let subtree = tree.entity_subtree(3, &SubtreeOptions::default());
        assert_eq!(subtree, vec![2, 3]);
        assert_eq!(tree.subtree_text(&subtree), "the doctor");
    }

    #[test]
    fn skip_labels_prune_coordination() {
        // "Alice and Bob": Bob conj of Alice, and cc of Bob
        let tree = DepTree::new(
            toks(&["Alice", "and", "Bob"]),
            vec![PosTag::Nnp, PosTag::Cc, PosTag::Nnp],
            vec![
                DepArc::new(0, 1, Relation::Root),
                DepArc::new(3, 2, Relation::Cc),
                DepArc::new(1, 3, Relation::Conj),
            ],
        );
        let whole = tree.entity_subtree(1, &SubtreeOptions::default());
        assert_eq!(whole, vec![1, 2, 3]);
        let split = tree.entity_subtree(
            1,
            &SubtreeOptions {
                skip_labels: vec![Relation::Conj, Relation::Cc],
            },
        );
        assert_eq!(split, vec![1]);
    }

    #[test]
    fn appositions_listed() {
        // "Obama , the president": president appos of Obama
        let tree = DepTree::new(
            toks(&["Obama", ",", "the", "president"]),
            vec![PosTag::Nnp, PosTag::Punct, PosTag::Dt, PosTag::Nn],
            vec![
                DepArc::new(0, 1, Relation::Root),
                DepArc::new(1, 2, Relation::Punct),
                DepArc::new(4, 3, Relation::Det),
                DepArc::new(1, 4, Relation::Appos),
            ],
        );
        assert_eq!(tree.appositions(1), vec![4]);
        // The appositive text never leaks into the entity subtree.
        let subtree = tree.entity_subtree(1, &SubtreeOptions::default());
        assert_eq!(subtree, vec![1]);
    }

    #[test]
    fn malformed_tree_detected() {
        let tree = DepTree::new(
            toks(&["a", "b"]),
            vec![PosTag::Nn, PosTag::Nn],
            vec![
                DepArc::new(2, 1, Relation::Nmod),
                DepArc::new(1, 2, Relation::Nmod),
            ],
        );
        assert!(!tree.is_well_formed());
    }
}
