//! Lemmatizer fixture table: every inflection family and every special
//! case the cascade handles, pinned one row per form.

use tagteam::Lemmatizer;

/// (surface form, expected verb lemma)
static VERB_FIXTURES: &[(&str, &str)] = &[
    // Irregulars
    ("was", "be"),
    ("were", "be"),
    ("is", "be"),
    ("been", "be"),
    ("had", "have"),
    ("has", "have"),
    ("did", "do"),
    ("went", "go"),
    ("ran", "run"),
    ("gave", "give"),
    ("given", "give"),
    ("took", "take"),
    ("made", "make"),
    ("said", "say"),
    ("saw", "see"),
    ("knew", "know"),
    ("thought", "think"),
    ("found", "find"),
    ("told", "tell"),
    ("wrote", "write"),
    ("written", "write"),
    ("spoke", "speak"),
    ("chosen", "choose"),
    // Regular -ed
    ("treated", "treat"),
    ("walked", "walk"),
    ("moved", "move"),
    ("examined", "examine"),
    // Silent-e restoration
    ("allocated", "allocate"),
    ("decided", "decide"),
    ("created", "create"),
    ("distributed", "distribute"),
    // -ered stems never get an e restored
    ("gathered", "gather"),
    ("delivered", "deliver"),
    ("administered", "administer"),
    // Consonant doubling
    ("stopped", "stop"),
    ("planned", "plan"),
    ("stopping", "stop"),
    // -ied
    ("carried", "carry"),
    ("tried", "try"),
    // -ies
    ("carries", "carry"),
    ("tries", "try"),
    // Third person
    ("treats", "treat"),
    ("moves", "move"),
    ("hopes", "hope"),
    ("decides", "decide"),
    ("watches", "watch"),
    ("goes", "go"),
    // Progressive
    ("treating", "treat"),
    ("allocating", "allocate"),
    ("running", "run"),
    ("deciding", "decide"),
    ("hoping", "hope"),
];

/// (surface form, expected noun lemma)
static NOUN_FIXTURES: &[(&str, &str)] = &[
    ("patients", "patient"),
    ("doctors", "doctor"),
    ("ventilators", "ventilator"),
    ("cities", "city"),
    ("churches", "church"),
    ("boxes", "box"),
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("people", "person"),
    ("feet", "foot"),
    ("committee", "committee"),
    ("scarcity", "scarcity"),
];

#[test]
fn verb_fixture_table() {
    let lem = Lemmatizer::new();
    for (form, expected) in VERB_FIXTURES {
        assert_eq!(
            lem.verb_lemma(form),
            *expected,
            "verb lemma of {:?}",
            form
        );
    }
}

#[test]
fn noun_fixture_table() {
    let lem = Lemmatizer::new();
    for (form, expected) in NOUN_FIXTURES {
        assert_eq!(
            lem.noun_lemma(form),
            *expected,
            "noun lemma of {:?}",
            form
        );
    }
}

#[test]
fn case_is_ignored() {
    let lem = Lemmatizer::new();
    assert_eq!(lem.verb_lemma("Treated"), "treat");
    assert_eq!(lem.verb_lemma("WAS"), "be");
    assert_eq!(lem.noun_lemma("Patients"), "patient");
}

#[test]
fn unknown_words_fall_through_gracefully() {
    let lem = Lemmatizer::new();
    // Out-of-table words still come back as a plausible stem.
    assert_eq!(lem.verb_lemma("blorped"), "blorp");
    assert_eq!(lem.noun_lemma("blorps"), "blorp");
}
