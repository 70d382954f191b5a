use quick_xml::escape::escape;
use rand::{seq::SliceRandom, Rng, RngCore};
use rand_distr::{Distribution, Normal, Poisson};

pub const FILM_TYPES: [&str; 4] = ["F135", "F120", "F220", "F620"];
pub const APERTURES: [&str; 6] = ["1.4", "2", "2.8", "4", "5.6", "8"];
pub const SHUTTER_SPEEDS: [&str; 5] = ["1/30", "1/60", "1/125", "1/250", "1/500"];

pub struct TestRecord {
    pub kind: &'static str,
    pub fields: Vec<(&'static str, String)>,
}

/// An export document under construction
pub struct ExportDocument {
    pub version: String,
    pub records: Vec<TestRecord>,
}

impl ExportDocument {
    pub fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
            records: Vec::new(),
        }
    }

    pub fn record(&mut self, kind: &'static str, fields: &[(&'static str, &str)]) -> &mut Self {
        self.records.push(TestRecord {
            kind,
            fields: fields.iter().map(|(k, v)| (*k, v.to_string())).collect(),
        });
        self
    }

    pub fn count(&self, kind: &str) -> usize {
        self.records.iter().filter(|r| r.kind == kind).count()
    }

    /// One container per kind (in order of first appearance), records in
    /// insertion order
    pub fn to_xml(&self) -> String {
        let mut kinds: Vec<&str> = Vec::new();
        for record in self.records.iter() {
            if !kinds.contains(&record.kind) {
                kinds.push(record.kind);
            }
        }

        let mut xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Exif4Film version=\"{}\">\n",
            escape(&self.version)
        );
        for kind in kinds {
            xml += &format!("  <{}>\n", kind);
            for record in self.records.iter().filter(|r| r.kind == kind) {
                xml += &format!("    <dk.codeunited.exif4film.model.{}>\n", kind);
                for (name, value) in record.fields.iter() {
                    xml += &format!("      <{}>{}</{}>\n", name, escape(value), name);
                }
                xml += &format!("    </dk.codeunited.exif4film.model.{}>\n", kind);
            }
            xml += &format!("  </{}>\n", kind);
        }
        xml += "</Exif4Film>\n";
        xml
    }
}

/// Creates an export with one camera, lens and film per make, `roll_count`
/// rolls and a Poisson number of exposures per roll
///
/// Ids start at 1 for each kind; every exposure references a GPS fix of
/// its own.
pub fn create_export(roll_count: usize, lambda_exposures: f32, rng: &mut dyn RngCore) -> ExportDocument {
    let mut document = ExportDocument::new("1");
    let makes = ["Nikon", "Leica", "Kodak"];

    document.record("Artist", &[("artist_name", "Jane Doe")]);
    for (ix, name) in makes.iter().enumerate() {
        let id = (ix + 1).to_string();
        document.record("Make", &[("id", &id), ("make_name", name)]);
        document.record(
            "Camera",
            &[
                ("id", &id),
                ("camera_make_id", &id),
                ("camera_title", &format!("{} body", name)),
                ("camera_serial_number", &format!("SN{}", 1000 + ix)),
            ],
        );
        document.record(
            "Lens",
            &[
                ("id", &id),
                ("lens_make_id", &id),
                ("lens_title", &format!("{} 50mm", name)),
                ("lens_aperture_min", "2"),
                ("lens_aperture_max", "16"),
                ("lens_focal_length_min", "50"),
                ("lens_focal_length_max", "50"),
            ],
        );
        document.record(
            "Film",
            &[
                ("id", &id),
                ("film_make_id", &id),
                ("film_title", "400"),
                ("film_make_process", "C-41"),
            ],
        );
    }

    let poi = Poisson::new(lambda_exposures).unwrap();
    let latitude = Normal::<f64>::new(45., 10.).unwrap();
    let longitude = Normal::<f64>::new(0., 50.).unwrap();
    let mut exposure_id = 0;

    for roll_ix in 0..roll_count {
        let roll_id = (roll_ix + 1).to_string();
        let make = (rng.gen_range(0..makes.len()) + 1).to_string();
        let film_type = FILM_TYPES.choose(rng).unwrap();
        document.record(
            "ExposedRoll",
            &[
                ("id", &roll_id),
                ("exposedroll_camera_id", &make),
                ("exposedroll_film_id", &make),
                ("exposedroll_film_type", film_type),
                ("exposedroll_iso", "400"),
                ("exposedroll_description", &format!("Roll {:03}", roll_ix + 1)),
            ],
        );

        let exposures = 1 + poi.sample(rng) as usize;
        for number in 0..exposures {
            exposure_id += 1;
            let id = exposure_id.to_string();
            document.record(
                "GpsLocation",
                &[
                    ("id", &id),
                    ("gps_latitude", &latitude.sample(rng).clamp(-89., 89.).to_string()),
                    ("gps_longitude", &longitude.sample(rng).clamp(-179., 179.).to_string()),
                    ("gps_altitude", &rng.gen_range(0. ..3000.0f64).to_string()),
                ],
            );
            document.record(
                "Exposure",
                &[
                    ("id", &id),
                    ("exposure_roll_id", &roll_id),
                    ("exposure_number", &(number + 1).to_string()),
                    ("exposure_lens_id", &make),
                    ("exposure_gps_location", &id),
                    ("exposure_aperture", APERTURES.choose(rng).unwrap()),
                    ("exposure_shutter_speed", SHUTTER_SPEEDS.choose(rng).unwrap()),
                    ("exposure_focal_length", "50"),
                    ("exposure_flash_on", if rng.gen_bool(0.1) { "true" } else { "false" }),
                    ("exposure_metering_mode", "Average"),
                    ("exposure_light_source", "Daylight"),
                    ("exposure_time_taken", "2013-05-02 14:03:11"),
                    ("exposure_description", &format!("Frame {} & more", number + 1)),
                ],
            );
        }
    }

    document
}
