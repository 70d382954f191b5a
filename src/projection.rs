//! Projection of an exposure onto XMP properties
//!
//! [`project_exposure`] looks up everything an exposure refers to (camera
//! through its roll, lens, film, GPS fix) and emits the matching properties.
//! A reference that does not resolve, or a value that does not parse, only
//! drops the properties that depend on it.

use log::debug;

use crate::coerce::parse_float;
use crate::database::Database;
use crate::metadata::{
    Namespace, PropertySet, PropertySink, NS_ANALOG, NS_DC, NS_EXIF, NS_EXIF_AUX, NS_TIFF,
};
use crate::model::{ExposedRoll, Exposure, Lens};

/// Rational with a denominator of 10 (one decimal of precision)
pub fn tenths_rational(value: f64) -> String {
    format!("{}/10", (value * 10.).round() as i64)
}

/// Aperture text as a rational (`"2.8"` gives `"28/10"`)
pub fn aperture_rational(aperture: &str) -> Option<String> {
    parse_float(aperture).map(tenths_rational)
}

/// Hemisphere letters of a coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    fn hemisphere(&self, negative: bool) -> char {
        match (self, negative) {
            (Axis::Latitude, false) => 'N',
            (Axis::Latitude, true) => 'S',
            (Axis::Longitude, false) => 'E',
            (Axis::Longitude, true) => 'W',
        }
    }
}

/// Degrees and decimal minutes of a signed coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpsCoordinate {
    pub degrees: u32,
    pub minutes: f64,
    pub hemisphere: char,
}

impl GpsCoordinate {
    pub fn new(value: f64, axis: Axis) -> Self {
        let magnitude = value.abs();
        let degrees = magnitude.floor();
        Self {
            degrees: degrees as u32,
            minutes: (magnitude - degrees) * 60.,
            // -0.0 is in the southern / western hemisphere too
            hemisphere: axis.hemisphere(value.is_sign_negative()),
        }
    }
}

impl std::fmt::Display for GpsCoordinate {
    /// XMP `GPSCoordinate` form: `DDD,MM.mmmmmmK`
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{},{:.6}{}", self.degrees, self.minutes, self.hemisphere)
    }
}

/// Film format for display (`F120` is `120`, unknown codes are kept)
pub fn normalize_film_type(film_type: &str) -> &str {
    match film_type {
        "F120" => "120",
        "F220" => "220",
        "F135" => "135",
        other => other,
    }
}

/// EXIF MeteringMode code
///
/// Only "Unknown" and "Average" are mapped, everything else is 0.
pub fn metering_mode_code(metering_mode: &str) -> u32 {
    match metering_mode {
        "Unknown" => 0,
        "Average" => 1,
        // TODO: map the remaining Exif4Film metering modes once their names are known
        _ => 0,
    }
}

/// EXIF LightSource code (only "Daylight" is mapped)
pub fn light_source_code(light_source: &str) -> u32 {
    match light_source {
        "Daylight" => 1,
        _ => 0,
    }
}

/// Human readable lens name, with its maker unless the title already
/// starts with it
pub fn lens_description(maker: Option<&str>, title: &str) -> Option<String> {
    match maker.filter(|name| !name.is_empty()) {
        Some(maker) if title.is_empty() => Some(maker.to_string()),
        Some(maker) if !title.starts_with(maker) => Some(format!("{} {}", maker, title)),
        _ if title.is_empty() => None,
        _ => Some(title.to_string()),
    }
}

/// EXIF LensInfo (`"<fmin>/1 <fmax>/1 <amin>/10 <amax>/10"`), if the focal
/// range is known and both apertures parse
pub fn lens_info(lens: &Lens) -> Option<String> {
    if lens.focal_length_min == 0 || lens.focal_length_max == 0 {
        return None;
    }
    let aperture_min = aperture_rational(&lens.aperture_min)?;
    let aperture_max = aperture_rational(&lens.aperture_max)?;

    Some(format!(
        "{}/1 {}/1 {} {}",
        lens.focal_length_min, lens.focal_length_max, aperture_min, aperture_max
    ))
}

/// Film name, prefixed by its maker when known
pub fn film_label(maker: Option<&str>, title: &str) -> Option<String> {
    if title.is_empty() {
        return None;
    }
    match maker.filter(|name| !name.is_empty()) {
        Some(maker) => Some(format!("{} {}", maker, title)),
        None => Some(title.to_string()),
    }
}

fn set_if_not_empty(properties: &mut PropertySet, ns: Namespace, name: &str, value: &str) {
    if !value.is_empty() {
        properties.set_property(ns, name, value);
    }
}

/// Computes the properties of the `index`-th (0-based) exposure of `roll`
pub fn project_exposure(
    db: &Database,
    roll: &ExposedRoll,
    exposure: &Exposure,
    index: usize,
) -> PropertySet {
    let mut properties = PropertySet::new();
    let p = &mut properties;

    let number = (index + 1).to_string();
    p.set_property(NS_EXIF_AUX, "ImageNumber", &number);
    p.set_property(NS_ANALOG, "ExposureNumber", &number);

    set_if_not_empty(p, NS_DC, "description", &exposure.description);

    if let Some(artist) = db.artist() {
        if !artist.name.is_empty() {
            p.append_array_item(NS_DC, "creator", &artist.name);
        }
    }

    set_if_not_empty(p, NS_EXIF, "DateTimeOriginal", &exposure.time_taken);

    if roll.iso != 0 {
        p.append_array_item(NS_EXIF, "ISOSpeedRatings", &roll.iso.to_string());
    }

    set_if_not_empty(p, NS_EXIF, "ShutterSpeedValue", &exposure.shutter_speed);

    if let Some(f_number) = aperture_rational(&exposure.aperture) {
        p.set_property(NS_EXIF, "FNumber", &f_number);
    }

    if exposure.focal_length != 0 {
        p.set_property(NS_EXIF, "FocalLength", &exposure.focal_length.to_string());
    }

    project_camera(db, roll, p);
    project_lens(db, exposure, p);
    project_film(db, roll, p);

    p.set_property(
        NS_EXIF,
        "Flash/exif:Fired",
        if exposure.flash_on { "true" } else { "false" },
    );
    p.set_property(
        NS_EXIF,
        "MeteringMode",
        &metering_mode_code(&exposure.metering_mode).to_string(),
    );
    p.set_property(
        NS_EXIF,
        "LightSource",
        &light_source_code(&exposure.light_source).to_string(),
    );

    project_gps(db, exposure, p);

    properties
}

fn project_camera(db: &Database, roll: &ExposedRoll, p: &mut PropertySet) {
    let Some(camera) = db.camera(roll.camera_id) else {
        debug!("Roll {}: no camera {}", roll.id, roll.camera_id);
        return;
    };

    if let Some(maker) = db.make_name(camera.make_id) {
        set_if_not_empty(p, NS_TIFF, "Make", maker);
    }
    set_if_not_empty(p, NS_TIFF, "Model", &camera.title);
    set_if_not_empty(p, NS_EXIF_AUX, "SerialNumber", &camera.serial_number);
}

fn project_lens(db: &Database, exposure: &Exposure, p: &mut PropertySet) {
    let Some(lens) = db.lens(exposure.lens_id) else {
        debug!("Exposure {}: no lens {}", exposure.id, exposure.lens_id);
        return;
    };

    // In EXIF, MaxApertureValue is the widest aperture, i.e. the smallest
    // f-number: the lens "minimum" aperture
    if let Some(widest) = aperture_rational(&lens.aperture_min) {
        p.set_property(NS_EXIF, "MaxApertureValue", &widest);
    }

    if let Some(description) = lens_description(db.make_name(lens.make_id), &lens.title) {
        p.set_property(NS_EXIF_AUX, "Lens", &description);
    }

    if let Some(info) = lens_info(lens) {
        p.set_property(NS_EXIF_AUX, "LensInfo", &info);
    }

    if !lens.serial_number.is_empty() {
        p.set_property(NS_EXIF_AUX, "LensSerialNumber", &lens.serial_number);
        p.set_property(NS_ANALOG, "LensSerialNumber", &lens.serial_number);
    }
}

fn project_film(db: &Database, roll: &ExposedRoll, p: &mut PropertySet) {
    let Some(film) = db.film(roll.film_id) else {
        debug!("Roll {}: no film {}", roll.id, roll.film_id);
        return;
    };

    set_if_not_empty(p, NS_ANALOG, "RollId", &roll.description);

    let maker = db.make_name(film.make_id);
    if let Some(maker) = maker {
        set_if_not_empty(p, NS_ANALOG, "FilmMaker", maker);
    }
    if let Some(label) = film_label(maker, &film.title) {
        p.set_property(NS_ANALOG, "Film", &label);
    }

    set_if_not_empty(p, NS_ANALOG, "FilmType", normalize_film_type(&roll.film_type));
    set_if_not_empty(p, NS_ANALOG, "FilmProcess", &film.process);
}

fn project_gps(db: &Database, exposure: &Exposure, p: &mut PropertySet) {
    let Some(gps) = db.gps_location(exposure.gps_location_id) else {
        return;
    };

    // Assume 1/10th of meter precision
    p.set_property(NS_EXIF, "GPSAltitude", &tenths_rational(gps.altitude));
    p.set_property(
        NS_EXIF,
        "GPSLatitude",
        &GpsCoordinate::new(gps.latitude, Axis::Latitude).to_string(),
    );
    p.set_property(
        NS_EXIF,
        "GPSLongitude",
        &GpsCoordinate::new(gps.longitude, Axis::Longitude).to_string(),
    );
}

#[cfg(test)]
mod tests {
    use ntest::assert_about_eq;

    use super::*;

    #[test]
    fn test_tenths_rational() {
        assert_eq!(tenths_rational(2.8), "28/10");
        assert_eq!(tenths_rational(1.4), "14/10");
        assert_eq!(tenths_rational(16.), "160/10");
        assert_eq!(tenths_rational(-12.34), "-123/10");
        assert_eq!(aperture_rational("5.6"), Some("56/10".to_string()));
        assert_eq!(aperture_rational(""), None);
        assert_eq!(aperture_rational("wide"), None);
    }

    #[test]
    fn test_gps_coordinate() {
        let south = GpsCoordinate::new(-3.5, Axis::Latitude);
        assert_eq!(south.degrees, 3);
        assert_about_eq!(south.minutes, 30.0);
        assert_eq!(south.hemisphere, 'S');
        assert_eq!(south.to_string(), "3,30.000000S");

        let east = GpsCoordinate::new(10.25, Axis::Longitude);
        assert_eq!((east.degrees, east.hemisphere), (10, 'E'));
        assert_about_eq!(east.minutes, 15.0);
        assert_eq!(east.to_string(), "10,15.000000E");

        assert_eq!(GpsCoordinate::new(-0.0, Axis::Longitude).hemisphere, 'W');
        assert_eq!(GpsCoordinate::new(0.0, Axis::Latitude).hemisphere, 'N');
    }

    #[test]
    fn test_lens_description() {
        assert_eq!(
            lens_description(Some("Nikon"), "Nikkor 50mm f/1.4"),
            Some("Nikon Nikkor 50mm f/1.4".to_string())
        );
        assert_eq!(
            lens_description(Some("Zeiss"), "Zeiss Planar 80mm"),
            Some("Zeiss Planar 80mm".to_string())
        );
        assert_eq!(lens_description(None, "Summicron"), Some("Summicron".to_string()));
        assert_eq!(lens_description(Some(""), "Summicron"), Some("Summicron".to_string()));
        assert_eq!(lens_description(Some("Leica"), ""), Some("Leica".to_string()));
        assert_eq!(lens_description(None, ""), None);
    }

    #[test]
    fn test_lens_info() {
        let mut lens = Lens {
            aperture_min: "2.8".to_string(),
            aperture_max: "22".to_string(),
            focal_length_min: 28,
            focal_length_max: 85,
            ..Default::default()
        };
        assert_eq!(lens_info(&lens), Some("28/1 85/1 28/10 220/10".to_string()));

        lens.aperture_max = "n/a".to_string();
        assert_eq!(lens_info(&lens), None);

        lens.aperture_max = "22".to_string();
        lens.focal_length_max = 0;
        assert_eq!(lens_info(&lens), None);
    }

    #[test]
    fn test_code_tables() {
        assert_eq!(metering_mode_code("Unknown"), 0);
        assert_eq!(metering_mode_code("Average"), 1);
        assert_eq!(metering_mode_code("Spot"), 0);
        assert_eq!(light_source_code("Daylight"), 1);
        assert_eq!(light_source_code("Tungsten"), 0);
    }

    #[test]
    fn test_film_label() {
        assert_eq!(film_label(Some("Kodak"), "Tri-X"), Some("Kodak Tri-X".to_string()));
        assert_eq!(film_label(None, "Tri-X"), Some("Tri-X".to_string()));
        assert_eq!(film_label(Some("Kodak"), ""), None);
    }
}
