//! Graph invariants checked across a sentence corpus: role bearers,
//! concretization, tier links, provenance completeness, determinism, and
//! round-trip serialization.

use serde_json::{json, Value};
use tagteam::{build, BuildOptions, Graph};

static CORPUS: &[&str] = &[
    "The doctor treated the patient",
    "The patient was treated by the doctor",
    "CBP is a component of DHS",
    "The doctor should allocate the ventilator",
    "The doctor must allocate the last ventilator between two patients",
    "The rock decided to move",
    "The hospital has a ventilator",
    "There is a problem",
    "Obama, the president, spoke",
    "New policy",
];

fn pinned_options(preserve: bool) -> BuildOptions {
    BuildOptions {
        preserve_ambiguity: preserve,
        received_at: Some("2024-01-15T10:30:00Z".parse().unwrap()),
        ..Default::default()
    }
}

fn graphs(preserve: bool) -> Vec<Graph> {
    CORPUS
        .iter()
        .map(|text| build(text, &pinned_options(preserve)).unwrap())
        .collect()
}

fn has_type(node: &Value, curie: &str) -> bool {
    node["@type"]
        .as_array()
        .map(|t| t.contains(&json!(curie)))
        .unwrap_or(false)
}

#[test]
fn every_role_bearer_is_a_referent_in_graph() {
    for graph in graphs(false) {
        for node in graph.nodes() {
            if !has_type(node, "bfo:Role") {
                continue;
            }
            let bearer_iri = node["inheres_in"]
                .as_str()
                .expect("role without inheres_in");
            let bearer = graph.node(bearer_iri).expect("bearer missing from graph");
            assert!(has_type(bearer, "tagteam:DiscourseReferent"));
        }
    }
}

#[test]
fn every_referent_concretized_by_the_single_ibe() {
    for graph in graphs(false) {
        let ibes: Vec<&Value> = graph
            .nodes()
            .iter()
            .filter(|n| has_type(n, "cco:InformationBearingEntity"))
            .collect();
        assert_eq!(ibes.len(), 1);
        let ibe_iri = ibes[0]["@id"].clone();
        for node in graph.nodes() {
            if has_type(node, "tagteam:DiscourseReferent")
                || has_type(node, "tagteam:VerbPhrase")
            {
                assert_eq!(node["is_concretized_by"], ibe_iri);
            }
        }
    }
}

#[test]
fn referent_denotes_type_matches_its_entity() {
    for graph in graphs(false) {
        for node in graph.nodes() {
            if !has_type(node, "tagteam:DiscourseReferent") {
                continue;
            }
            let about = node["is_about"].as_str().expect("referent without is_about");
            let entity = graph.node(about).expect("tier-2 node missing");
            let denoted = node["denotesType"].as_str().unwrap();
            assert!(
                has_type(entity, denoted),
                "entity {} lacks type {}",
                about,
                denoted
            );
        }
    }
}

#[test]
fn provenance_triad_enumerates_every_t1_node() {
    for graph in graphs(false) {
        let parsing_acts: Vec<&Value> = graph
            .nodes()
            .iter()
            .filter(|n| has_type(n, "tagteam:ParsingAct"))
            .collect();
        assert_eq!(parsing_acts.len(), 1);
        let outputs = parsing_acts[0]["has_output"].as_array().unwrap();
        for node in graph.nodes() {
            if has_type(node, "tagteam:DiscourseReferent")
                || has_type(node, "tagteam:VerbPhrase")
            {
                assert!(
                    outputs.contains(&node["@id"]),
                    "t1 node {} missing from has_output",
                    node["@id"]
                );
            }
        }
        assert!(
            graph
                .nodes()
                .iter()
                .filter(|n| has_type(n, "cco:ArtificialAgent"))
                .count()
                == 1
        );
    }
}

#[test]
fn identical_input_serializes_byte_identically() {
    for text in CORPUS {
        let a = build(text, &pinned_options(true)).unwrap();
        let b = build(text, &pinned_options(true)).unwrap();
        assert_eq!(a.to_json().unwrap(), b.to_json().unwrap());
    }
}

#[test]
fn alternative_iris_derive_from_default_nodes() {
    for graph in graphs(true) {
        let Some(lattice) = graph.interpretation_lattice() else {
            continue;
        };
        for alt in lattice["tagteam:alternatives"].as_array().unwrap() {
            let iri = alt["@id"].as_str().unwrap();
            let derived_from = alt["derivedFrom"].as_str().unwrap();
            let reading = alt["tagteam:reading"].as_str().unwrap();
            assert!(
                iri.starts_with(derived_from),
                "alternative {} does not extend its parent {}",
                iri,
                derived_from
            );
            assert!(iri.contains("_alt_"), "alternative {} lacks _alt_ tag", iri);
            assert!(iri.ends_with(&reading.replace('-', "_")));
            // The parent must be a default-graph node, and the alternative
            // must not be.
            assert!(graph.node(derived_from).is_some());
            assert!(graph.node(iri).is_none());
        }
    }
}

#[test]
fn plausibilities_stay_in_open_interval() {
    for graph in graphs(true) {
        let Some(lattice) = graph.interpretation_lattice() else {
            continue;
        };
        let default = lattice["tagteam:defaultPlausibility"].as_f64().unwrap();
        assert!((default - 0.7).abs() < 1e-9);
        for alt in lattice["tagteam:alternatives"].as_array().unwrap() {
            let plausibility = alt["plausibility"].as_f64().unwrap();
            assert!(plausibility > 0.0 && plausibility < 1.0);
        }
    }
}

#[test]
fn violations_never_become_alternatives() {
    for graph in graphs(true) {
        let Some(lattice) = graph.interpretation_lattice() else {
            continue;
        };
        let flagged: Vec<Value> = lattice["tagteam:resolutions"]["flaggedOnly"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|r| r["tagteam:ambiguityType"] == json!("selectional_violation"))
            .map(|r| r["tagteam:nodeId"].clone())
            .collect();
        for alt in lattice["tagteam:alternatives"].as_array().unwrap() {
            assert!(
                !flagged.contains(&alt["derivedFrom"]),
                "violation node {} leaked into alternatives",
                alt["derivedFrom"]
            );
        }
    }
}

#[test]
fn serialization_round_trips() {
    for graph in graphs(true) {
        let text = graph.to_json().unwrap();
        let reparsed = Graph::parse(&text).unwrap();
        assert_eq!(reparsed, graph);
    }
}

#[test]
fn repeated_builds_share_iris_and_counts() {
    for text in CORPUS {
        let a = build(text, &pinned_options(false)).unwrap();
        let b = build(text, &pinned_options(false)).unwrap();
        assert_eq!(a.nodes().len(), b.nodes().len());
        let ids = |g: &Graph| -> Vec<String> {
            g.nodes()
                .iter()
                .map(|n| n["@id"].as_str().unwrap().to_string())
                .collect()
        };
        assert_eq!(ids(&a), ids(&b));
    }
}

#[test]
fn detection_only_adds_report_for_clean_sentences() {
    // Sentences with no selectional violation: the default graph must be
    // unchanged by detection.
    for text in &[
        "The doctor treated the patient",
        "CBP is a component of DHS",
        "The doctor should allocate the ventilator",
    ] {
        let plain = build(text, &pinned_options(false)).unwrap();
        let detected = build(
            text,
            &BuildOptions {
                detect_ambiguity: true,
                received_at: Some("2024-01-15T10:30:00Z".parse().unwrap()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(plain.value()["@graph"], detected.value()["@graph"]);
        assert!(detected.ambiguity_report().is_some());
        assert!(plain.ambiguity_report().is_none());
    }
}

#[test]
fn preservation_removes_no_default_nodes() {
    for text in CORPUS {
        let plain = build(text, &pinned_options(false)).unwrap();
        let preserved = build(text, &pinned_options(true)).unwrap();
        for node in plain.nodes() {
            let iri = node["@id"].as_str().unwrap();
            assert!(
                preserved.node(iri).is_some(),
                "node {} missing after preservation",
                iri
            );
        }
    }
}
