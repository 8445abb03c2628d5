mod common;

use std::sync::Arc;
use std::thread;

use serde_json::json;
use spellfall::error::SpellfallError;
use spellfall::field::{FieldDescriptor, FieldRegistry, OperatorClass, Attribute};
use spellfall::interface::QueryInterface;
use spellfall::settings::Settings;
use spellfall::snapshot::CorpusSnapshot;

use common::names;

fn setup() -> QueryInterface {
    QueryInterface::new(common::snapshot())
}

#[test]
fn queries_get_increasing_ids() {
    let interface = setup();
    let first = interface.search("level:3 dt:fire").unwrap();
    let second = interface.search("level:3 dt:fire").unwrap();
    assert_eq!(first.names, names(&["Fireball"]));
    assert_eq!(first.names, second.names);
    assert!(second.id.value() > first.id.value());
}

#[test]
fn failed_queries_keep_their_id() {
    let interface = setup();
    let failure = interface.search("colour:red").unwrap_err();
    assert!(matches!(failure.error, SpellfallError::UnknownField { .. }));
    let next = interface.search("dt:fire").unwrap();
    assert_eq!(next.id.value(), failure.id.value() + 1);
    assert_eq!(
        next.urls.get("Fireball").map(String::as_str),
        Some("https://www.dnd5eapi.co/api/spells/fireball")
    );
    // only records with a link are listed
    assert!(next.urls.len() <= next.names.len());
}

#[test]
fn swapping_keeps_held_snapshots_intact() {
    let interface = setup();
    let held = interface.snapshot().unwrap();
    let smaller: Vec<_> = common::corpus().into_iter().take(2).collect();
    let previous = interface.replace(CorpusSnapshot::load(&smaller).unwrap()).unwrap();
    assert!(Arc::ptr_eq(&held, &previous));
    // the held snapshot still answers from the old corpus
    assert_eq!(held.search("dt:fire").unwrap().len(), 3);
    assert_eq!(interface.search("dt:fire").unwrap().names, names(&["Fireball"]));
}

#[test]
fn concurrent_readers_see_one_snapshot() {
    let interface = Arc::new(setup());
    let expected = interface.search("dt:(fire cold) level<=5").unwrap().names;
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let interface = Arc::clone(&interface);
            thread::spawn(move || {
                (0..25)
                    .map(|_| interface.search("dt:(fire cold) level<=5").unwrap().names)
                    .collect::<Vec<_>>()
            })
        })
        .collect();
    for reader in readers {
        for result in reader.join().unwrap() {
            assert_eq!(result, expected);
        }
    }
}

#[test]
fn reload_reads_the_corpus_file_again() {
    let path = std::env::temp_dir().join(format!("spellfall-reload-{}.json", std::process::id()));
    let first: Vec<_> = common::corpus().into_iter().take(3).collect();
    std::fs::write(&path, serde_json::to_string(&first).unwrap()).unwrap();
    let interface = QueryInterface::open(&path).unwrap();
    assert_eq!(interface.snapshot().unwrap().records().len(), 3);

    std::fs::write(&path, serde_json::to_string(&common::corpus()).unwrap()).unwrap();
    assert_eq!(interface.reload().unwrap(), common::corpus().len());
    assert_eq!(interface.search("n:resurrection").unwrap().names, names(&["Resurrection"]));

    // a broken file leaves the current snapshot in place
    std::fs::write(&path, "{ not json").unwrap();
    assert!(interface.reload().is_err());
    assert_eq!(interface.snapshot().unwrap().records().len(), common::corpus().len());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn reload_without_a_source_is_refused() {
    assert!(matches!(setup().reload(), Err(SpellfallError::Config(_))));
}

#[test]
fn data_contract_violations_fail_the_load() {
    let mut missing_level = common::corpus();
    missing_level[1].as_object_mut().unwrap().remove("level");
    match CorpusSnapshot::load(&missing_level) {
        Err(SpellfallError::DataContract { record, .. }) => assert_eq!(record, "Lightning Bolt"),
        other => panic!("expected DataContract, got {other:?}"),
    }

    let mut duplicated = common::corpus();
    duplicated.push(common::corpus()[0].clone());
    match CorpusSnapshot::load(&duplicated) {
        Err(e @ SpellfallError::DataContract { .. }) => assert!(!e.is_user_error()),
        other => panic!("expected DataContract, got {other:?}"),
    }

    let nameless = vec![json!({ "level": 1 })];
    match CorpusSnapshot::load(&nameless) {
        Err(SpellfallError::DataContract { record, .. }) => assert_eq!(record, "<record #0>"),
        other => panic!("expected DataContract, got {other:?}"),
    }

    assert!(matches!(
        CorpusSnapshot::from_json("{\"name\": \"Fireball\"}"),
        Err(SpellfallError::DataContract { .. })
    ));
}

#[test]
fn registry_surface() {
    let registry = FieldRegistry::standard().unwrap();
    let summaries = registry.summaries();
    assert_eq!(summaries.len(), registry.len());
    let level = summaries.iter().find(|s| s.name == "level").unwrap();
    assert_eq!(level.aliases, ["level", "l"]);
    assert_eq!(level.operator_class, OperatorClass::Numeric);
    assert_eq!(level.domain.as_ref().map(Vec::len), Some(10));
    let damage = summaries.iter().find(|s| s.name == "damage_amount").unwrap();
    assert!(damage.domain.is_none());
    let json = serde_json::to_value(&summaries).unwrap();
    assert_eq!(json[0]["name"], "name");
    assert_eq!(json[1]["operator_class"], "Numeric");
}

#[test]
fn aliases_must_be_unique() {
    let clash = FieldRegistry::new(vec![
        FieldDescriptor::literal("level", &["l"], OperatorClass::Numeric, Attribute::Level),
        FieldDescriptor::literal("ritual", &["L"], OperatorClass::Boolean, Attribute::Ritual),
    ]);
    assert!(matches!(clash, Err(SpellfallError::Config(_))));
}

#[test]
fn custom_registries_index_only_their_fields() {
    let registry = FieldRegistry::new(vec![
        FieldDescriptor::literal("level", &["lvl"], OperatorClass::Numeric, Attribute::Level),
    ])
    .unwrap();
    let snapshot = CorpusSnapshot::load_with(&common::corpus(), registry).unwrap();
    assert_eq!(snapshot.indices().len(), 1);
    assert_eq!(snapshot.search("lvl:7").unwrap(), names(&["Resurrection"]));
    assert!(matches!(snapshot.search("l:7"), Err(SpellfallError::UnknownField { .. })));
    assert!(snapshot.record("Fireball").unwrap().tags().is_empty());
}

#[test]
fn settings_defaults() {
    let settings = Settings::load_from("spellfall-settings-that-do-not-exist").unwrap();
    assert_eq!(settings.corpus_path, "data/spells.json");
    assert_eq!(settings.log_filter, "info");
    assert_eq!(Settings::default().bind_address, "127.0.0.1:8088");
}
