use std::path::PathBuf;

use e4f::base::Len;
use e4f::index::{IdCollision, IdIndex};
use e4f::model::{EntityKind, EntityRef};
use e4f::Database;
use helpers::documents::ExportDocument;
use helpers::export::TestExport;

fn fixture() -> Database {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/exif4film.xml");
    Database::open(&path).expect("fixture imports").0
}

#[test]
fn test_exposures_for_roll() {
    let db = fixture();

    let holidays = db.exposures_for_roll(3);
    assert_eq!(holidays.len(), 24);
    let numbers: Vec<i32> = holidays.iter().map(|e| e.number).collect();
    assert_eq!(numbers, (1..=24).collect::<Vec<_>>());

    assert_eq!(db.exposures_for_roll(5).len(), 12);
    // The orphan frame references a roll that does not exist
    assert!(db.roll(9).is_none());
    assert!(db.exposures.iter().any(|e| e.roll_id == 9));
    assert!(db.exposures_for_roll(9).is_empty());
    assert!(db.exposures_for_roll(4).is_empty());
    assert!(db.exposures_for_roll(0).is_empty());
}

#[test]
fn test_exposures_for_roll_is_idempotent() {
    let db = fixture();
    for roll in db.exposed_rolls.iter() {
        let first: Vec<i32> = db.exposures_for_roll(roll.id).iter().map(|e| e.id).collect();
        let second: Vec<i32> = db.exposures_for_roll(roll.id).iter().map(|e| e.id).collect();
        assert_eq!(first, second);
    }
}

#[test]
fn test_collisions_keep_newest() {
    let mut document = ExportDocument::new("1");
    document
        .record("Make", &[("id", "1"), ("make_name", "Agfa")])
        .record("Make", &[("id", "2"), ("make_name", "Ilford")])
        .record("Make", &[("id", "1"), ("make_name", "Foma")])
        .record("Lens", &[("id", "1"), ("lens_title", "Color-Skopar")]);
    let export = TestExport::new(document);
    let (db, report) = export.open();

    assert_eq!(db.makes.len(), 3);
    assert_eq!(db.make_name(1), Some("Foma"));
    assert_eq!(db.make_name(2), Some("Ilford"));
    assert_eq!(
        report.collisions,
        vec![IdCollision {
            kind: EntityKind::Make,
            id: 1,
            replaced: 0,
            position: 2,
        }]
    );
    // Ids are per kind
    assert_eq!(db.lens(1).map(|l| l.title.as_str()), Some("Color-Skopar"));
    assert_eq!(
        db.shared_ids().get(&1),
        Some(&vec![EntityKind::Make, EntityKind::Lens])
    );
}

#[test]
fn test_exposures_for_roll_before_indexing() {
    let mut document = ExportDocument::new("1");
    document
        .record("ExposedRoll", &[("id", "1")])
        .record("Exposure", &[("id", "11"), ("exposure_roll_id", "1")])
        .record("Exposure", &[("id", "12")]);
    let (mut db, _) = e4f::import::import_reader(document.to_xml().as_bytes()).unwrap();

    assert!(db.exposures_for_roll(1).is_empty());
    db.build_indices();
    let ids: Vec<i32> = db.exposures_for_roll(1).iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![11]);
    assert!(db.exposures_for_roll(0).is_empty());
}

#[test]
fn test_modified_sequences_do_not_panic() {
    let mut db = fixture();
    db.cameras.clear();
    db.lenses.truncate(1);
    assert!(db.camera(1).is_none());
    assert!(db.lens(2).is_none());
    assert!(db.lens(1).is_some());
}

#[test]
fn test_lookups_fail_closed() {
    let db = fixture();
    assert!(db.camera(0).is_none());
    assert!(db.camera(2).is_none());
    assert!(db.lens(-1).is_none());
    assert!(db.film(13).is_none());
    assert!(db.make(13).is_some());
    assert!(db.make_name(99).is_none());
}

#[test]
fn test_rebuilding_indices() {
    let mut db = fixture();
    db.makes.reverse();
    assert!(db.build_indices().is_empty());
    assert_eq!(db.make_name(7), Some("Kodak"));
    assert_eq!(db.make(13).map(|m| m.id), Some(13));
}

#[test]
fn test_entities() {
    let db = fixture();
    let entities: Vec<EntityRef> = db.entities().collect();
    assert_eq!(entities.len(), 1 + 2 + 2 + 2 + 37 + 2 + 2 + 1);
    assert_eq!(entities[0].to_string(), "Camera 1");
    assert_eq!(entities.last().unwrap().to_string(), "Artist");

    for kind in EntityKind::ALL {
        assert_eq!(
            entities.iter().filter(|e| e.kind() == kind).count(),
            db.count(kind)
        );
    }
}

#[test]
fn test_id_index() {
    #[derive(Debug)]
    struct Record(i32);

    let mut collisions = Vec::new();
    let index = IdIndex::build(
        EntityKind::Film,
        &[Record(4), Record(0), Record(8), Record(4)],
        |r| r.0,
        &mut collisions,
    );

    assert_eq!(index.len(), 2);
    assert_eq!(index.get(4), Some(3));
    assert_eq!(index.get(8), Some(2));
    assert_eq!(index.get(0), None);
    assert_eq!(collisions.len(), 1);
    assert_eq!(
        collisions[0].to_string(),
        "Film 4 present already (record 0 replaced by record 3)"
    );
}
