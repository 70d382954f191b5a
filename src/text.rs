//! Plain text rendering of rolls and exposures

use crate::coerce::parse_float;
use crate::database::Database;
use crate::model::{ExposedRoll, Exposure};
use crate::projection::film_label;

/// One frame as text
///
/// ```text
/// Frame 3, 2013-05-02 14:03:11 1/125 f/5.6 50mm
///     Long 10.250000 Lat -3.500000
///     Street corner
/// ```
/// (the continuation lines are indented by a tab, the GPS line only appears
/// when the location resolves)
pub fn exposure_to_text(db: &Database, exposure: &Exposure, index: usize) -> String {
    let aperture = parse_float(&exposure.aperture)
        .map(|f| format!("f/{:.1}", f))
        .unwrap_or_default();

    let mut shoot_info = format!(
        "{} {} {}mm",
        exposure.shutter_speed, aperture, exposure.focal_length
    );
    if let Some(gps) = db.gps_location(exposure.gps_location_id) {
        shoot_info += &format!("\n\tLong {:.6} Lat {:.6}", gps.longitude, gps.latitude);
    }

    format!(
        "Frame {}, {} {}\n\t{}",
        index + 1,
        exposure.time_taken,
        shoot_info,
        exposure.description
    )
}

/// Roll description, then its film on a second line
pub fn roll_summary(db: &Database, roll: &ExposedRoll) -> String {
    let label = db
        .film(roll.film_id)
        .and_then(|film| film_label(db.make_name(film.make_id), &film.title))
        .unwrap_or_default();

    format!(
        "{}\nType {}, {}, {} ISO",
        roll.description, roll.film_type, label, roll.iso
    )
}
