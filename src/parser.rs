//! Reference dependency parser.
//!
//! A deterministic rule cascade over the tagged sentence: chunk noun
//! phrases, find the predicate (verbal or copular), then attach chunks by
//! position and case marking. The output is a UD-v2 arc list consumed by
//! [`crate::deptree::DepTree`]. Coverage targets declarative clauses:
//! active/passive transitives, copular predication, existentials,
//! coordination, appositives, and infinitival complements.

use crate::deptree::{DepArc, Relation};
use crate::models::DependencyParser;
use crate::token::{PosTag, Token};

#[derive(Debug, Clone, Copy)]
struct Chunk {
    start: usize,
    end: usize,
    head: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Predicate {
    /// Main verb at index, with passive voice flag.
    Verbal { main: usize, passive: bool },
    /// Copula at index; the post-copular predicate head becomes the root.
    Copular { cop: usize },
    /// No verb at all (headlines); the first chunk head is the root.
    None,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceParser;

impl DependencyParser for ReferenceParser {
    fn parse(&self, tokens: &[Token], tags: &[PosTag]) -> Vec<DepArc> {
        Analysis::new(tokens, tags).run()
    }
}

struct Analysis<'a> {
    tokens: &'a [Token],
    tags: &'a [PosTag],
    n: usize,
    arcs: Vec<DepArc>,
    attached: Vec<bool>,
}

impl<'a> Analysis<'a> {
    fn new(tokens: &'a [Token], tags: &'a [PosTag]) -> Self {
        let n = tokens.len();
        Self {
            tokens,
            tags,
            n,
            arcs: Vec::new(),
            attached: vec![false; n + 1],
        }
    }

    fn lower(&self, i: usize) -> String {
        self.tokens[i - 1].text.to_lowercase()
    }

    fn tag(&self, i: usize) -> PosTag {
        self.tags[i - 1]
    }

    fn push(&mut self, head: usize, dep: usize, rel: Relation) {
        if dep >= 1 && dep <= self.n && !self.attached[dep] {
            self.arcs.push(DepArc::new(head, dep, rel));
            self.attached[dep] = true;
        }
    }

    fn is_be(&self, i: usize) -> bool {
        matches!(
            self.lower(i).as_str(),
            "am" | "are" | "be" | "been" | "being" | "is" | "was" | "were"
        )
    }

    fn is_negation(&self, i: usize) -> bool {
        matches!(self.lower(i).as_str(), "not" | "never" | "n't")
    }

    fn run(mut self) -> Vec<DepArc> {
        if self.n == 0 {
            return self.arcs;
        }
        let chunks = self.chunk_nouns();
        let predicate = self.find_predicate(&chunks);

        let root = match predicate {
            Predicate::Verbal { main, passive } => {
                self.attach_verbal(main, passive, &chunks);
                main
            }
            Predicate::Copular { cop } => self.attach_copular(cop, &chunks),
            Predicate::None => self.attach_verbless(&chunks),
        };

        if root != 0 {
            self.arcs.push(DepArc::new(0, root, Relation::Root));
            self.attached[root] = true;
        }

        // Anything still loose (stray punctuation, particles) hangs off the
        // root so the tree stays connected.
        for i in 1..=self.n {
            if !self.attached[i] && root != 0 && root != i {
                let rel = if self.tag(i) == PosTag::Punct {
                    Relation::Punct
                } else if self.tag(i) == PosTag::Rb {
                    if self.is_negation(i) {
                        Relation::Neg
                    } else {
                        Relation::Advmod
                    }
                } else {
                    Relation::Advmod
                };
                self.push(root, i, rel);
            }
        }

        self.arcs
    }

    /// Maximal DT/CD/JJ/NN runs plus single-token pronoun and existential
    /// chunks, with the last noun as head.
    fn chunk_nouns(&self) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut i = 1;
        while i <= self.n {
            let tag = self.tag(i);
            if matches!(tag, PosTag::Prp | PosTag::Ex) {
                chunks.push(Chunk {
                    start: i,
                    end: i,
                    head: i,
                });
                i += 1;
                continue;
            }
            if matches!(
                tag,
                PosTag::Dt
                    | PosTag::PrpDollar
                    | PosTag::Cd
                    | PosTag::Jj
                    | PosTag::Jjr
                    | PosTag::Jjs
            ) || tag.is_noun()
            {
                let start = i;
                let mut j = i;
                while j <= self.n
                    && (matches!(
                        self.tag(j),
                        PosTag::Dt
                            | PosTag::PrpDollar
                            | PosTag::Cd
                            | PosTag::Jj
                            | PosTag::Jjr
                            | PosTag::Jjs
                    ) || self.tag(j).is_noun())
                {
                    j += 1;
                }
                let end = j - 1;
                let head = (start..=end)
                    .rev()
                    .find(|&k| self.tag(k).is_noun())
                    .unwrap_or(end);
                chunks.push(Chunk { start, end, head });
                i = j;
                continue;
            }
            i += 1;
        }
        chunks
    }

    /// Locate the clause predicate. A be-form followed (at most adverbs
    /// apart) by a participle heads a verbal group; a be-form followed by a
    /// noun phrase or preposition is a copula.
    fn find_predicate(&self, chunks: &[Chunk]) -> Predicate {
        let in_chunk = |i: usize| chunks.iter().any(|c| i >= c.start && i <= c.end);

        let mut i = 1;
        while i <= self.n {
            let tag = self.tag(i);
            if tag == PosTag::Md || (tag.is_verb() && !in_chunk(i)) {
                // Walk the verb group: modal, auxiliaries, negation, verb.
                let mut main = i;
                let mut saw_be = false;
                let mut j = i;
                while j <= self.n {
                    let t = self.tag(j);
                    if t == PosTag::Md || t.is_verb() {
                        if self.is_be(j) {
                            saw_be = true;
                        }
                        main = j;
                        j += 1;
                    } else if t == PosTag::Rb {
                        j += 1;
                    } else {
                        break;
                    }
                }
                if self.is_be(main) {
                    // Bare be-form: copular clause.
                    return Predicate::Copular { cop: main };
                }
                let passive = saw_be && self.tag(main) == PosTag::Vbn;
                return Predicate::Verbal { main, passive };
            }
            i += 1;
        }
        Predicate::None
    }

    /// Verbal clause: attach auxiliaries, subject, objects, obliques, and
    /// infinitival complements around the main verb. Returns nothing; the
    /// main verb is the root.
    fn attach_verbal(&mut self, main: usize, passive: bool, chunks: &[Chunk]) {
        // Auxiliaries and negation left of the main verb.
        let group_start = self.verb_group_start(main, chunks);
        for i in group_start..main {
            let tag = self.tag(i);
            if tag == PosTag::Md {
                self.push(main, i, Relation::Aux);
            } else if tag.is_verb() {
                if self.is_be(i) && passive {
                    self.push(main, i, Relation::AuxPass);
                } else {
                    self.push(main, i, Relation::Aux);
                }
            } else if tag == PosTag::Rb {
                if self.is_negation(i) {
                    self.push(main, i, Relation::Neg);
                } else {
                    self.push(main, i, Relation::Advmod);
                }
            }
        }

        let coordinated = self.coordinate_chunks(chunks);
        self.appositions(chunks);

        // Subject: the last chunk before the verb group.
        let subject = chunks
            .iter()
            .filter(|c| {
                c.end < group_start && !self.attached[c.head] && !self.has_case_marker(c)
            })
            .next_back()
            .copied();
        if let Some(subj) = subject {
            self.build_np(&subj);
            let rel = if self.tag(subj.head) == PosTag::Ex {
                Relation::Expl
            } else if passive {
                Relation::NsubjPass
            } else {
                Relation::Nsubj
            };
            self.push(main, subj.head, rel);
        }
        // Pre-verbal chunks before the subject: prepositional modifiers of
        // the subject, or left dangling for the loose pass.
        self.attach_prepositional(chunks, &coordinated, main, passive);

        // Infinitival complement: "to" + base verb after the main verb.
        let mut inf_verb = None;
        for i in main + 1..=self.n {
            if self.tag(i) == PosTag::To
                && i + 1 <= self.n
                && self.tag(i + 1) == PosTag::Vb
            {
                self.push(i + 1, i, Relation::Mark);
                self.push(main, i + 1, Relation::Xcomp);
                inf_verb = Some(i + 1);
            }
        }

        // Bare post-verbal chunks: object, or recipient + object when two
        // stack up ("gave the committee a report").
        let attach_to = inf_verb.unwrap_or(main);
        let bare: Vec<Chunk> = chunks
            .iter()
            .filter(|c| {
                c.start > main
                    && !self.attached[c.head]
                    && !coordinated.contains(&c.head)
                    && !self.has_case_marker(c)
            })
            .copied()
            .collect();
        match bare.len() {
            0 => {}
            1 => {
                self.build_np(&bare[0]);
                let target = if bare[0].start > attach_to { attach_to } else { main };
                self.push(target, bare[0].head, Relation::Obj);
            }
            _ => {
                self.build_np(&bare[0]);
                self.build_np(&bare[1]);
                self.push(main, bare[0].head, Relation::Iobj);
                self.push(main, bare[1].head, Relation::Obj);
                for extra in &bare[2..] {
                    self.build_np(extra);
                    self.push(main, extra.head, Relation::Obj);
                }
            }
        }
    }

    /// Copular clause: the predicate nominal (or prepositional object)
    /// becomes the root; the copula, subject, and any case marker attach
    /// beneath it. Returns the root index.
    fn attach_copular(&mut self, cop: usize, chunks: &[Chunk]) -> usize {
        let coordinated = self.coordinate_chunks(chunks);
        self.appositions(chunks);

        let predicate = chunks
            .iter()
            .find(|c| c.start > cop && !self.attached[c.head] && !coordinated.contains(&c.head))
            .copied();

        let Some(pred) = predicate else {
            // "It is." and friends: fall back to the copula as root.
            let subject = chunks
                .iter()
                .filter(|c| {
                    c.end < cop && !self.attached[c.head] && !self.has_case_marker(c)
                })
                .next_back()
                .copied();
            if let Some(subj) = subject {
                self.build_np(&subj);
                self.push(cop, subj.head, Relation::Nsubj);
            }
            return cop;
        };

        self.build_np(&pred);
        self.push(pred.head, cop, Relation::Cop);

        // Case marker between copula and predicate ("is in the hospital").
        for i in cop + 1..pred.start {
            if matches!(self.tag(i), PosTag::In | PosTag::To) {
                self.push(pred.head, i, Relation::Case);
            } else if self.tag(i) == PosTag::Rb && self.is_negation(i) {
                self.push(pred.head, i, Relation::Neg);
            }
        }

        let subject = chunks
            .iter()
            .filter(|c| c.end < cop && !self.attached[c.head] && !self.has_case_marker(c))
            .next_back()
            .copied();
        if let Some(subj) = subject {
            self.build_np(&subj);
            let rel = if self.tag(subj.head) == PosTag::Ex {
                Relation::Expl
            } else {
                Relation::Nsubj
            };
            self.push(pred.head, subj.head, rel);
        }

        // Post-predicate prepositional phrases ("a component of DHS").
        self.attach_prepositional(chunks, &coordinated, pred.head, false);

        pred.head
    }

    /// Verbless input: first chunk head is the root, remaining chunk heads
    /// attach to the synthetic root as additional roots.
    fn attach_verbless(&mut self, chunks: &[Chunk]) -> usize {
        let coordinated = self.coordinate_chunks(chunks);
        self.appositions(chunks);
        let mut root = 0;
        let free: Vec<Chunk> = chunks
            .iter()
            .filter(|c| !self.attached[c.head] && !coordinated.contains(&c.head))
            .copied()
            .collect();
        for chunk in free {
            self.build_np(&chunk);
            if root == 0 {
                root = chunk.head;
            } else {
                self.arcs.push(DepArc::new(0, chunk.head, Relation::Root));
                self.attached[chunk.head] = true;
            }
        }
        root
    }

    /// Internal arcs of one noun phrase chunk.
    fn build_np(&mut self, chunk: &Chunk) {
        for i in chunk.start..=chunk.end {
            if i == chunk.head {
                continue;
            }
            let rel = match self.tag(i) {
                PosTag::Dt | PosTag::PrpDollar => Relation::Det,
                PosTag::Cd => Relation::Nummod,
                PosTag::Jj | PosTag::Jjr | PosTag::Jjs => Relation::Amod,
                t if t.is_noun() => Relation::Compound,
                _ => Relation::Amod,
            };
            self.push(chunk.head, i, rel);
        }
    }

    /// True when a preposition directly precedes the chunk.
    fn has_case_marker(&self, chunk: &Chunk) -> bool {
        chunk.start > 1 && matches!(self.tag(chunk.start - 1), PosTag::In)
    }

    /// Attach case-marked chunks: "of"-phrases modify the preceding noun;
    /// "by"-phrases in a passive clause mark the demoted agent; everything
    /// else is an oblique of the predicate.
    fn attach_prepositional(
        &mut self,
        chunks: &[Chunk],
        coordinated: &[usize],
        predicate: usize,
        passive: bool,
    ) {
        for (idx, chunk) in chunks.iter().enumerate() {
            if self.attached[chunk.head] || coordinated.contains(&chunk.head) {
                continue;
            }
            if !self.has_case_marker(chunk) {
                continue;
            }
            let prep = chunk.start - 1;
            let prep_word = self.lower(prep);
            self.build_np(chunk);
            self.push(chunk.head, prep, Relation::Case);

            let preceding_noun = idx
                .checked_sub(1)
                .map(|p| chunks[p])
                .filter(|prev| prev.end + 1 == prep);

            if prep_word == "by" && passive {
                self.push(predicate, chunk.head, Relation::OblAgent);
            } else if prep_word == "of" {
                if let Some(prev) = preceding_noun {
                    self.push(prev.head, chunk.head, Relation::Nmod);
                } else {
                    self.push(predicate, chunk.head, Relation::Obl);
                }
            } else {
                self.push(predicate, chunk.head, Relation::Obl);
            }
        }
    }

    /// Conjoined chunks: "X and Y" links Y to X with `conj` and the
    /// conjunction to Y with `cc`. Returns the conjunct heads, which must
    /// not be re-attached as clause arguments.
    fn coordinate_chunks(&mut self, chunks: &[Chunk]) -> Vec<usize> {
        let mut conjunct_heads = Vec::new();
        for pair in chunks.windows(2) {
            let (left, right) = (pair[0], pair[1]);
            if right.start == left.end + 2 {
                let between = left.end + 1;
                if self.tag(between) == PosTag::Cc {
                    self.build_np(&right);
                    self.push(right.head, between, Relation::Cc);
                    self.push(left.head, right.head, Relation::Conj);
                    conjunct_heads.push(right.head);
                }
            }
        }
        conjunct_heads
    }

    /// Appositive chunks: "X , Y ," (or sentence end) links Y to X.
    fn appositions(&mut self, chunks: &[Chunk]) {
        for pair in chunks.windows(2) {
            let (left, right) = (pair[0], pair[1]);
            if right.start == left.end + 2 {
                let between = left.end + 1;
                let closing_ok = right.end == self.n
                    || self
                        .tag(right.end + 1)
                        .eq(&PosTag::Punct);
                if self.tag(between) == PosTag::Punct
                    && self.lower(between) == ","
                    && closing_ok
                    && self.tag(right.head).is_noun()
                    && self.tag(left.head).is_noun()
                {
                    self.build_np(&right);
                    self.push(left.head, between, Relation::Punct);
                    self.push(left.head, right.head, Relation::Appos);
                }
            }
        }
    }

    fn verb_group_start(&self, main: usize, chunks: &[Chunk]) -> usize {
        let in_chunk = |i: usize| chunks.iter().any(|c| i >= c.start && i <= c.end);
        let mut start = main;
        while start > 1 {
            let prev = start - 1;
            let t = self.tag(prev);
            if (t == PosTag::Md || t == PosTag::Rb || t.is_verb()) && !in_chunk(prev) {
                start = prev;
            } else {
                break;
            }
        }
        start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deptree::DepTree;
    use crate::models::{PosTagger, Tokenizer};
    use crate::tagger::ReferenceTagger;
    use crate::tokenizer::ReferenceTokenizer;

    fn parse(text: &str) -> DepTree {
        let tokens = ReferenceTokenizer.tokenize(text);
        let tags = ReferenceTagger::new().tag(&tokens);
        let arcs = ReferenceParser.parse(&tokens, &tags);
        DepTree::new(tokens, tags, arcs)
    }

    fn rel_between(tree: &DepTree, head_text: &str, dep_text: &str) -> Option<Relation> {
        let find = |text: &str| {
            (1..=tree.len()).find(|&i| tree.text(i).eq_ignore_ascii_case(text))
        };
        let head = find(head_text)?;
        let dep = find(dep_text)?;
        tree.parent(dep).filter(|(h, _)| *h == head).map(|(_, r)| r)
    }

    #[test]
    fn active_transitive() {
        let tree = parse("The doctor treated the patient");
        assert_eq!(tree.roots(), vec![3]);
        assert_eq!(rel_between(&tree, "treated", "doctor"), Some(Relation::Nsubj));
        assert_eq!(rel_between(&tree, "treated", "patient"), Some(Relation::Obj));
        assert_eq!(rel_between(&tree, "doctor", "The"), Some(Relation::Det));
    }

    #[test]
    fn passive_with_agent() {
        let tree = parse("The patient was treated by the doctor");
        assert_eq!(
            rel_between(&tree, "treated", "patient"),
            Some(Relation::NsubjPass)
        );
        assert_eq!(rel_between(&tree, "treated", "was"), Some(Relation::AuxPass));
        assert_eq!(
            rel_between(&tree, "treated", "doctor"),
            Some(Relation::OblAgent)
        );
        assert_eq!(rel_between(&tree, "doctor", "by"), Some(Relation::Case));
    }

    #[test]
    fn copular_predication() {
        let tree = parse("CBP is a component of DHS");
        // Predicate nominal is the root.
        let root = tree.roots()[0];
        assert_eq!(tree.text(root), "component");
        assert_eq!(rel_between(&tree, "component", "is"), Some(Relation::Cop));
        assert_eq!(rel_between(&tree, "component", "CBP"), Some(Relation::Nsubj));
        assert_eq!(rel_between(&tree, "component", "DHS"), Some(Relation::Nmod));
        assert_eq!(rel_between(&tree, "DHS", "of"), Some(Relation::Case));
    }

    #[test]
    fn modal_aux() {
        let tree = parse("The doctor should allocate the ventilator");
        assert_eq!(rel_between(&tree, "allocate", "should"), Some(Relation::Aux));
        assert_eq!(
            rel_between(&tree, "allocate", "doctor"),
            Some(Relation::Nsubj)
        );
        assert_eq!(
            rel_between(&tree, "allocate", "ventilator"),
            Some(Relation::Obj)
        );
    }

    #[test]
    fn oblique_with_cardinal() {
        let tree = parse("The doctor must allocate the last ventilator between two patients");
        assert_eq!(
            rel_between(&tree, "allocate", "patients"),
            Some(Relation::Obl)
        );
        assert_eq!(rel_between(&tree, "patients", "between"), Some(Relation::Case));
        assert_eq!(rel_between(&tree, "patients", "two"), Some(Relation::Nummod));
        assert_eq!(rel_between(&tree, "ventilator", "last"), Some(Relation::Amod));
    }

    #[test]
    fn infinitival_complement() {
        let tree = parse("The rock decided to move");
        assert_eq!(rel_between(&tree, "decided", "move"), Some(Relation::Xcomp));
        assert_eq!(rel_between(&tree, "move", "to"), Some(Relation::Mark));
        assert_eq!(rel_between(&tree, "decided", "rock"), Some(Relation::Nsubj));
    }

    #[test]
    fn negated_copula() {
        let tree = parse("CBP is not a component of DHS");
        assert_eq!(rel_between(&tree, "component", "not"), Some(Relation::Neg));
        assert_eq!(rel_between(&tree, "component", "is"), Some(Relation::Cop));
    }

    #[test]
    fn existential_there() {
        let tree = parse("There is a problem");
        let root = tree.roots()[0];
        assert_eq!(tree.text(root), "problem");
        assert_eq!(rel_between(&tree, "problem", "There"), Some(Relation::Expl));
    }

    #[test]
    fn coordination() {
        let tree = parse("Alice and Bob met");
        assert_eq!(rel_between(&tree, "Alice", "Bob"), Some(Relation::Conj));
        assert_eq!(rel_between(&tree, "Bob", "and"), Some(Relation::Cc));
        assert_eq!(rel_between(&tree, "met", "Alice"), Some(Relation::Nsubj));
    }

    #[test]
    fn verbless_headline() {
        let tree = parse("New policy");
        assert_eq!(tree.roots(), vec![2]);
        assert_eq!(rel_between(&tree, "policy", "New"), Some(Relation::Amod));
    }

    #[test]
    fn of_phrase_before_verb_is_not_subject() {
        let tree = parse("The allocation of ventilators lasted");
        assert_eq!(
            rel_between(&tree, "lasted", "allocation"),
            Some(Relation::Nsubj)
        );
        assert_eq!(
            rel_between(&tree, "allocation", "ventilators"),
            Some(Relation::Nmod)
        );
        assert_eq!(rel_between(&tree, "ventilators", "of"), Some(Relation::Case));
    }

    #[test]
    fn possessive_have() {
        let tree = parse("The hospital has a ventilator");
        assert_eq!(rel_between(&tree, "has", "hospital"), Some(Relation::Nsubj));
        assert_eq!(rel_between(&tree, "has", "ventilator"), Some(Relation::Obj));
    }
}
