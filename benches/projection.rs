use criterion::{criterion_group, criterion_main, Criterion};

use e4f::import::import_reader;
use e4f::{project_exposure, XmpOptions, XmpPacket};
use helpers::documents::create_export;
use rand::thread_rng;

fn criterion_benchmark(c: &mut Criterion) {
    let mut rng = thread_rng();

    // 50 rolls of about 36 frames
    let xml = create_export(50, 35., &mut rng).to_xml();

    c.bench_function("import", |b| {
        b.iter(|| import_reader(xml.as_bytes()).expect("Error while importing"))
    });

    let (mut db, _) = import_reader(xml.as_bytes()).expect("Error while importing");
    db.build_indices();

    c.bench_function("project", |b| {
        b.iter(|| {
            for roll in db.exposed_rolls.iter() {
                for (index, exposure) in db.exposures_for_roll(roll.id).into_iter().enumerate() {
                    project_exposure(&db, roll, exposure, index);
                }
            }
        })
    });

    let options = XmpOptions::default();
    let roll = &db.exposed_rolls[0];
    let exposure = db.exposures_for_roll(roll.id)[0];
    let properties = project_exposure(&db, roll, exposure, 0);
    c.bench_function("serialize", |b| {
        b.iter(|| {
            XmpPacket::from_properties(&properties)
                .serialize(&options)
                .expect("Error while serializing")
        })
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().significance_level(0.1).sample_size(50);
    targets = criterion_benchmark
}
criterion_main!(benches);
