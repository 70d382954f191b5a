//! Streaming import of an Exif4Film XML export
//!
//! The document is read in a single forward pass. Records live under
//! `Exif4Film/<Kind>/dk.codeunited.exif4film.model.<Kind>`, and each child
//! element of a record holds the text of one field:
//!
//! ```xml
//! <Exif4Film version="1">
//!   <Make>
//!     <dk.codeunited.exif4film.model.Make>
//!       <id>13</id>
//!       <make_name>Nikon</make_name>
//!     </dk.codeunited.exif4film.model.Make>
//!   </Make>
//! </Exif4Film>
//! ```
//!
//! Anything else is skipped. A field whose text cannot be coerced keeps its
//! previous (zero) value and is listed in the [`ImportReport`].

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;

use crate::coerce::{parse_bool, parse_float, parse_int};
use crate::database::Database;
use crate::error::{Error, Result};
use crate::index::IdCollision;
use crate::model::{
    Artist, Camera, EntityKind, ExposedRoll, Exposure, Film, GpsLocation, Lens, Make,
};

/// Tag of the document element
pub const ROOT_TAG: &str = "Exif4Film";

/// Prefix of the record tags (followed by the kind name)
pub const RECORD_TAG_PREFIX: &str = "dk.codeunited.exif4film.model.";

/// A field whose text could not be converted
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CoercionFailure {
    pub kind: EntityKind,
    /// Position of the record in its sequence
    pub record: usize,
    pub field: String,
    pub text: String,
}

/// Diagnostics gathered while importing (nothing here is fatal)
#[derive(Serialize, Debug, Default)]
pub struct ImportReport {
    pub coercion_failures: Vec<CoercionFailure>,
    /// Number of unrecognized elements (their content is skipped)
    pub ignored_elements: usize,
    /// Filled when the indices are built by [`Database::open`]
    pub collisions: Vec<IdCollision>,
}

/// Reads the export at `path` (indices are not built)
pub fn import_file(path: &Path) -> Result<(Database, ImportReport)> {
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Importing {}", path.display());
    import_reader(BufReader::new(file))
}

/// Reads an export from any buffered source (indices are not built)
pub fn import_reader<R: BufRead>(source: R) -> Result<(Database, ImportReport)> {
    // Text is kept verbatim, the numeric coercions trim it themselves
    let mut reader = Reader::from_reader(source);

    let mut importer = Importer::default();
    let mut buf = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|source| Error::Xml {
                position: reader.buffer_position() as u64,
                source,
            })?;

        match event {
            Event::Start(e) => importer.start(&e),
            Event::Empty(e) => {
                importer.start(&e);
                importer.end();
            }
            Event::End(_) => importer.end(),
            Event::Text(e) => {
                let text = e.unescape().map_err(|source| Error::Xml {
                    position: reader.buffer_position() as u64,
                    source,
                })?;
                importer.text(&text);
            }
            Event::CData(e) => importer.text(&String::from_utf8_lossy(&e.into_inner())),
            Event::Eof => break,
            _ => (),
        }
        buf.clear();
    }

    Ok(importer.finish())
}

/// What an open element stands for
enum Frame {
    Root,
    /// `<Camera>`, `<Make>`, ... grouping the records of one kind
    Container(EntityKind),
    /// A record, the last one of its kind's sequence
    Record(EntityKind),
    /// A field of the current record, with the text read so far
    Field {
        kind: EntityKind,
        name: String,
        text: Option<String>,
    },
    Ignored,
}

/// Outcome of a field assignment
enum Assign {
    Done,
    /// Not a field of this kind
    Unknown,
    /// Text could not be coerced, the field is untouched
    Invalid,
}

#[derive(Default)]
struct Importer {
    db: Database,
    report: ImportReport,
    /// Open elements, outermost first
    stack: Vec<Frame>,
}

impl Importer {
    fn start(&mut self, element: &BytesStart) {
        let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();

        let frame = match self.stack.last() {
            None if name == ROOT_TAG => {
                self.db.version = root_version(element).unwrap_or_default();
                debug!("Export version {:?}", self.db.version);
                Frame::Root
            }
            Some(Frame::Root) => match EntityKind::from_name(&name) {
                Some(kind) => Frame::Container(kind),
                None => Frame::Ignored,
            },
            Some(Frame::Container(kind)) => {
                let kind = *kind;
                if name.strip_prefix(RECORD_TAG_PREFIX) == Some(kind.name()) {
                    self.push_record(kind);
                    Frame::Record(kind)
                } else {
                    Frame::Ignored
                }
            }
            Some(Frame::Record(kind)) => Frame::Field {
                kind: *kind,
                name: name.clone(),
                text: None,
            },
            Some(Frame::Field { .. }) => Frame::Ignored,
            // Already counted at the top of the ignored subtree
            Some(Frame::Ignored) => {
                self.stack.push(Frame::Ignored);
                return;
            }
            None => Frame::Ignored,
        };

        if let Frame::Ignored = frame {
            debug!("Ignoring element {}", name);
            self.report.ignored_elements += 1;
        }
        self.stack.push(frame);
    }

    fn text(&mut self, chunk: &str) {
        if let Some(Frame::Field { text, .. }) = self.stack.last_mut() {
            text.get_or_insert_with(String::new).push_str(chunk);
        }
    }

    fn end(&mut self) {
        if let Some(Frame::Field {
            kind,
            name,
            text: Some(text),
        }) = self.stack.pop()
        {
            self.assign(kind, &name, &text);
        }
    }

    fn push_record(&mut self, kind: EntityKind) {
        debug!("New {} record", kind);
        match kind {
            EntityKind::Camera => self.db.cameras.push(Camera::default()),
            EntityKind::Make => self.db.makes.push(Make::default()),
            EntityKind::GpsLocation => self.db.gps_locations.push(GpsLocation::default()),
            EntityKind::ExposedRoll => self.db.exposed_rolls.push(ExposedRoll::default()),
            EntityKind::Exposure => self.db.exposures.push(Exposure::default()),
            EntityKind::Film => self.db.films.push(Film::default()),
            EntityKind::Lens => self.db.lenses.push(Lens::default()),
            EntityKind::Artist => self.db.artists.push(Artist::default()),
        }
    }

    /// Sets a field of the record under construction
    fn assign(&mut self, kind: EntityKind, field: &str, text: &str) {
        let db = &mut self.db;
        let outcome = match kind {
            EntityKind::Camera => db.cameras.last_mut().map(|o| camera_field(o, field, text)),
            EntityKind::Make => db.makes.last_mut().map(|o| make_field(o, field, text)),
            EntityKind::GpsLocation => db
                .gps_locations
                .last_mut()
                .map(|o| gps_location_field(o, field, text)),
            EntityKind::ExposedRoll => db
                .exposed_rolls
                .last_mut()
                .map(|o| exposed_roll_field(o, field, text)),
            EntityKind::Exposure => db
                .exposures
                .last_mut()
                .map(|o| exposure_field(o, field, text)),
            EntityKind::Film => db.films.last_mut().map(|o| film_field(o, field, text)),
            EntityKind::Lens => db.lenses.last_mut().map(|o| lens_field(o, field, text)),
            EntityKind::Artist => db.artists.last_mut().map(|o| artist_field(o, field, text)),
        };

        match outcome {
            Some(Assign::Done) | None => (),
            Some(Assign::Unknown) => {
                debug!("Ignoring field {} of {}", field, kind);
                self.report.ignored_elements += 1;
            }
            Some(Assign::Invalid) => {
                let record = self.db.count(kind) - 1;
                debug!(
                    "Cannot convert {:?} for field {} of {} record {}",
                    text, field, kind, record
                );
                self.report.coercion_failures.push(CoercionFailure {
                    kind,
                    record,
                    field: field.to_string(),
                    text: text.to_string(),
                });
            }
        }
    }

    fn finish(self) -> (Database, ImportReport) {
        info!(
            "Imported {} cameras, {} makes, {} locations, {} rolls, {} exposures, {} films, {} lenses, {} artists",
            self.db.cameras.len(),
            self.db.makes.len(),
            self.db.gps_locations.len(),
            self.db.exposed_rolls.len(),
            self.db.exposures.len(),
            self.db.films.len(),
            self.db.lenses.len(),
            self.db.artists.len()
        );
        (self.db, self.report)
    }
}

fn root_version(element: &BytesStart) -> Option<String> {
    let attribute = element.try_get_attribute("version").ok()??;
    attribute.unescape_value().ok().map(Cow::into_owned)
}

// --- Field setters

fn int(dst: &mut i32, text: &str) -> Assign {
    match parse_int(text) {
        Some(value) => {
            *dst = value;
            Assign::Done
        }
        None => Assign::Invalid,
    }
}

fn float(dst: &mut f64, text: &str) -> Assign {
    match parse_float(text) {
        Some(value) => {
            *dst = value;
            Assign::Done
        }
        None => Assign::Invalid,
    }
}

fn boolean(dst: &mut bool, text: &str) -> Assign {
    *dst = parse_bool(text);
    Assign::Done
}

fn string(dst: &mut String, text: &str) -> Assign {
    *dst = text.to_string();
    Assign::Done
}

fn camera_field(o: &mut Camera, field: &str, text: &str) -> Assign {
    match field {
        "id" => int(&mut o.id, text),
        "camera_default_frame_count" => int(&mut o.default_frame_count, text),
        "camera_make_id" => int(&mut o.make_id, text),
        "camera_serial_number" => string(&mut o.serial_number, text),
        "camera_default_film_type" => string(&mut o.default_film_type, text),
        "camera_title" => string(&mut o.title, text),
        _ => Assign::Unknown,
    }
}

fn make_field(o: &mut Make, field: &str, text: &str) -> Assign {
    match field {
        "id" => int(&mut o.id, text),
        "make_name" => string(&mut o.name, text),
        _ => Assign::Unknown,
    }
}

fn gps_location_field(o: &mut GpsLocation, field: &str, text: &str) -> Assign {
    match field {
        "id" => int(&mut o.id, text),
        "gps_latitude" => float(&mut o.latitude, text),
        "gps_longitude" => float(&mut o.longitude, text),
        "gps_altitude" => float(&mut o.altitude, text),
        _ => Assign::Unknown,
    }
}

fn exposed_roll_field(o: &mut ExposedRoll, field: &str, text: &str) -> Assign {
    match field {
        "id" => int(&mut o.id, text),
        "exposedroll_film_type" => string(&mut o.film_type, text),
        "exposedroll_camera_id" => int(&mut o.camera_id, text),
        "exposedroll_film_id" => int(&mut o.film_id, text),
        "exposedroll_iso" => int(&mut o.iso, text),
        "exposedroll_description" => string(&mut o.description, text),
        "exposedroll_frame_count" => int(&mut o.frame_count, text),
        "exposedroll_time_unloaded" => string(&mut o.time_unloaded, text),
        "exposedroll_time_loaded" => string(&mut o.time_loaded, text),
        _ => Assign::Unknown,
    }
}

fn exposure_field(o: &mut Exposure, field: &str, text: &str) -> Assign {
    match field {
        "id" => int(&mut o.id, text),
        "exposure_flash_on" => boolean(&mut o.flash_on, text),
        "exposure_description" => string(&mut o.description, text),
        "exposure_number" => int(&mut o.number, text),
        "exposure_gps_location" => int(&mut o.gps_location_id, text),
        "exposure_compensation" => int(&mut o.compensation, text),
        "exposure_roll_id" => int(&mut o.roll_id, text),
        "exposure_focal_length" => int(&mut o.focal_length, text),
        "exposure_light_source" => string(&mut o.light_source, text),
        "exposure_time_taken" => string(&mut o.time_taken, text),
        "exposure_shutter_speed" => string(&mut o.shutter_speed, text),
        "exposure_lens_id" => int(&mut o.lens_id, text),
        "exposure_aperture" => string(&mut o.aperture, text),
        "exposure_metering_mode" => string(&mut o.metering_mode, text),
        _ => Assign::Unknown,
    }
}

fn film_field(o: &mut Film, field: &str, text: &str) -> Assign {
    match field {
        "id" => int(&mut o.id, text),
        "film_title" => string(&mut o.title, text),
        "film_make_process" => string(&mut o.process, text),
        "film_color_type" => string(&mut o.color_type, text),
        "film_iso" => int(&mut o.iso, text),
        "film_make_id" => int(&mut o.make_id, text),
        _ => Assign::Unknown,
    }
}

fn lens_field(o: &mut Lens, field: &str, text: &str) -> Assign {
    match field {
        "id" => int(&mut o.id, text),
        "lens_title" => string(&mut o.title, text),
        "lens_serial_number" => string(&mut o.serial_number, text),
        "lens_make_id" => int(&mut o.make_id, text),
        "lens_aperture_min" => string(&mut o.aperture_min, text),
        "lens_aperture_max" => string(&mut o.aperture_max, text),
        "lens_focal_length_min" => int(&mut o.focal_length_min, text),
        "lens_focal_length_max" => int(&mut o.focal_length_max, text),
        _ => Assign::Unknown,
    }
}

fn artist_field(o: &mut Artist, field: &str, text: &str) -> Assign {
    match field {
        "artist_name" => string(&mut o.name, text),
        _ => Assign::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn import(xml: &str) -> (Database, ImportReport) {
        import_reader(xml.as_bytes()).expect("import should succeed")
    }

    #[test]
    fn test_fields_and_version() {
        let (db, report) = import(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <Exif4Film version="2">
              <Camera>
                <dk.codeunited.exif4film.model.Camera>
                  <camera_default_frame_count>36</camera_default_frame_count>
                  <id>1</id>
                  <camera_make_id>13</camera_make_id>
                  <camera_serial_number>A&amp;B 42</camera_serial_number>
                  <camera_title><![CDATA[F3]]></camera_title>
                </dk.codeunited.exif4film.model.Camera>
              </Camera>
            </Exif4Film>"#,
        );

        assert_eq!(db.version, "2");
        assert_eq!(
            db.cameras,
            vec![Camera {
                id: 1,
                default_frame_count: 36,
                make_id: 13,
                serial_number: "A&B 42".to_string(),
                default_film_type: String::new(),
                title: "F3".to_string(),
            }]
        );
        assert!(report.coercion_failures.is_empty());
        assert_eq!(report.ignored_elements, 0);
    }

    #[test]
    fn test_invalid_text_keeps_zero() {
        let (db, report) = import(
            r#"<Exif4Film version="1"><Exposure>
              <dk.codeunited.exif4film.model.Exposure>
                <id>4</id>
                <exposure_focal_length>fifty</exposure_focal_length>
                <exposure_flash_on>yes</exposure_flash_on>
                <exposure_aperture>f/2</exposure_aperture>
              </dk.codeunited.exif4film.model.Exposure>
            </Exposure></Exif4Film>"#,
        );

        let exposure = &db.exposures[0];
        assert_eq!(exposure.id, 4);
        assert_eq!(exposure.focal_length, 0);
        assert!(!exposure.flash_on);
        assert_eq!(exposure.aperture, "f/2");

        assert_eq!(
            report.coercion_failures,
            vec![CoercionFailure {
                kind: EntityKind::Exposure,
                record: 0,
                field: "exposure_focal_length".to_string(),
                text: "fifty".to_string(),
            }]
        );
    }

    #[test]
    fn test_unknown_elements_are_skipped() {
        let (db, report) = import(
            r#"<Exif4Film>
              <Make>
                <dk.codeunited.exif4film.model.Make>
                  <id>2</id>
                  <make_name>Ilford<nested>ignored</nested></make_name>
                  <make_country>UK</make_country>
                </dk.codeunited.exif4film.model.Make>
                <dk.codeunited.exif4film.model.Camera><id>9</id></dk.codeunited.exif4film.model.Camera>
              </Make>
              <Tripod><dk.codeunited.exif4film.model.Tripod/></Tripod>
            </Exif4Film>"#,
        );

        assert_eq!(db.makes.len(), 1);
        assert_eq!(db.makes[0].name, "Ilford");
        assert!(db.cameras.is_empty());
        // nested, make_country, the misplaced camera and the tripod
        assert_eq!(report.ignored_elements, 4);
    }

    #[test]
    fn test_empty_elements() {
        let (db, report) = import(
            r#"<Exif4Film>
              <Artist><dk.codeunited.exif4film.model.Artist/></Artist>
              <Lens><dk.codeunited.exif4film.model.Lens><id>3</id><lens_focal_length_min/></dk.codeunited.exif4film.model.Lens></Lens>
            </Exif4Film>"#,
        );

        assert_eq!(db.artists, vec![Artist::default()]);
        assert_eq!(db.lenses[0].id, 3);
        assert_eq!(db.lenses[0].focal_length_min, 0);
        assert!(report.coercion_failures.is_empty());
    }

    #[test]
    fn test_text_is_kept_verbatim() {
        let (db, report) = import(
            "<Exif4Film><Exposure><dk.codeunited.exif4film.model.Exposure>\n\
             <id>\n  7\n</id>\n\
             <exposure_description>  Pier at dusk </exposure_description>\n\
             <exposure_time_taken>a <![CDATA[<b>]]> c</exposure_time_taken>\n\
             </dk.codeunited.exif4film.model.Exposure></Exposure></Exif4Film>",
        );

        let exposure = &db.exposures[0];
        assert_eq!(exposure.id, 7);
        assert_eq!(exposure.description, "  Pier at dusk ");
        assert_eq!(exposure.time_taken, "a <b> c");
        assert!(report.coercion_failures.is_empty());
        assert_eq!(report.ignored_elements, 0);
    }

    #[test]
    fn test_other_root_is_ignored() {
        let (db, report) = import(
            "<Export><Camera><dk.codeunited.exif4film.model.Camera/></Camera></Export>",
        );
        assert!(db.cameras.is_empty());
        assert_eq!(report.ignored_elements, 1);
    }

    #[test]
    fn test_malformed_document() {
        let result = import_reader("<Exif4Film><Make></Camera></Exif4Film>".as_bytes());
        assert!(matches!(result, Err(Error::Xml { .. })));
    }
}
