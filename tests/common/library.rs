//! Literary fixture: authors and books across four eras and two continents
//!
//! Ontology: `Person` (temporal, spatial), `Author IS_A Person` (temporal),
//! `Book` (temporal), and the relation type `wrote` (Author → Book).
//!
//! Contexts, in insertion order:
//!
//! | id           | kind     | value       |
//! |--------------|----------|-------------|
//! | medieval     | temporal | 500..1500   |
//! | renaissance  | temporal | 1300..1600  |
//! | modern       | temporal | 1500..2000  |
//! | contemporary | temporal | 1900..2100  |
//! | europe       | spatial  | Europe      |
//! | america      | spatial  | America     |
//!
//! `renaissance REFINES medieval`, `medieval INCOMPATIBLE_WITH contemporary`.

use tkg::{ContextKind, Properties, PropertyValue, TkgApi};

pub fn props(entries: &[(&str, PropertyValue)]) -> Properties {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn era(start: i64, end: i64) -> Properties {
    props(&[("startTime", start.into()), ("endTime", end.into())])
}

fn placed(name: &str, location: &str, timestamp: i64) -> Properties {
    props(&[
        ("name", name.into()),
        ("location", location.into()),
        ("timestamp", timestamp.into()),
    ])
}

pub fn library() -> TkgApi {
    let mut api = TkgApi::new("Library");

    api.create_concept(
        "Person",
        props(&[("temporal", true.into()), ("spatial", true.into())]),
        &[],
    )
    .unwrap();
    api.create_concept("Author", props(&[("temporal", true.into())]), &["Person"])
        .unwrap();
    api.create_concept("Book", props(&[("temporal", true.into())]), &[])
        .unwrap();
    api.create_relation_type(
        "wrote",
        props(&[("temporal", true.into())]),
        Some("Author"),
        Some("Book"),
    )
    .unwrap();

    api.create_context("medieval", &ContextKind::Temporal, era(500, 1500));
    api.create_context("renaissance", &ContextKind::Temporal, era(1300, 1600));
    api.create_context("modern", &ContextKind::Temporal, era(1500, 2000));
    api.create_context("contemporary", &ContextKind::Temporal, era(1900, 2100));
    api.create_context("europe", &ContextKind::Spatial, props(&[("location", "Europe".into())]));
    api.create_context("america", &ContextKind::Spatial, props(&[("location", "America".into())]));
    api.relate_contexts("renaissance", "medieval", "REFINES", Properties::new())
        .unwrap();
    api.relate_contexts("medieval", "contemporary", "INCOMPATIBLE_WITH", Properties::new())
        .unwrap();

    api.create_entity("shakespeare", "Author", placed("William Shakespeare", "Europe", 1600));
    api.create_entity("cervantes", "Author", placed("Miguel de Cervantes", "Europe", 1605));
    api.create_entity("hemingway", "Author", placed("Ernest Hemingway", "America", 1940));
    api.create_entity("hamlet", "Book", placed("Hamlet", "Europe", 1600));
    api.create_entity("don_quixote", "Book", placed("Don Quixote", "Europe", 1605));
    api.create_entity("old_man", "Book", placed("The Old Man and the Sea", "America", 1952));

    api.create_relation(
        "shakespeare_wrote_hamlet",
        "shakespeare",
        "wrote",
        "hamlet",
        props(&[("year", 1600.into())]),
    )
    .unwrap();
    api.create_relation(
        "cervantes_wrote_quixote",
        "cervantes",
        "wrote",
        "don_quixote",
        props(&[("year", 1605.into())]),
    )
    .unwrap();
    api.create_relation(
        "hemingway_wrote_oldman",
        "hemingway",
        "wrote",
        "old_man",
        props(&[("year", 1952.into())]),
    )
    .unwrap();

    api
}
