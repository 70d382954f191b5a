//! Entities of an Exif4Film export
//!
//! All records are plain data: they are filled once by the importer and
//! read-only afterwards. References to other entities are raw ids
//! ([`NO_REFERENCE`](crate::base::NO_REFERENCE) when unset) which may point
//! to records absent from the export.

use std::fmt;

use serde::Serialize;

use crate::base::EntityId;

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct Camera {
    pub id: EntityId,
    pub default_frame_count: i32,
    pub make_id: EntityId,
    pub serial_number: String,
    pub default_film_type: String,
    pub title: String,
}

/// A manufacturer (of cameras, lenses or films)
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct Make {
    pub id: EntityId,
    pub name: String,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct GpsLocation {
    pub id: EntityId,
    pub longitude: f64,
    pub latitude: f64,
    /// Altitude in meters
    pub altitude: f64,
}

/// A loaded film, from load to unload
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct ExposedRoll {
    pub id: EntityId,
    /// Film format code (`F135`, `F120`, `F220`, ...)
    pub film_type: String,
    pub camera_id: EntityId,
    pub iso: i32,
    pub frame_count: i32,
    pub time_unloaded: String,
    pub time_loaded: String,
    pub film_id: EntityId,
    pub description: String,
}

/// One frame of a roll
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct Exposure {
    pub id: EntityId,
    pub flash_on: bool,
    pub description: String,
    pub number: i32,
    pub gps_location_id: EntityId,
    pub compensation: i32,
    pub roll_id: EntityId,
    /// Focal length in mm
    pub focal_length: i32,
    pub light_source: String,
    pub time_taken: String,
    pub shutter_speed: String,
    pub lens_id: EntityId,
    /// Kept as text since the export allows non numeric values
    pub aperture: String,
    pub metering_mode: String,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct Film {
    pub id: EntityId,
    pub process: String,
    pub title: String,
    pub color_type: String,
    pub iso: i32,
    pub make_id: EntityId,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct Lens {
    pub id: EntityId,
    pub title: String,
    pub serial_number: String,
    pub make_id: EntityId,
    /// Smallest f-number, i.e. the widest opening
    pub aperture_min: String,
    pub aperture_max: String,
    pub focal_length_min: i32,
    pub focal_length_max: i32,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct Artist {
    pub name: String,
}

/// The closed set of entity kinds found in an export
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Camera,
    Make,
    GpsLocation,
    ExposedRoll,
    Exposure,
    Film,
    Lens,
    Artist,
}

impl EntityKind {
    pub const ALL: [EntityKind; 8] = [
        EntityKind::Camera,
        EntityKind::Make,
        EntityKind::GpsLocation,
        EntityKind::ExposedRoll,
        EntityKind::Exposure,
        EntityKind::Film,
        EntityKind::Lens,
        EntityKind::Artist,
    ];

    /// Name used in the export tags
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Camera => "Camera",
            EntityKind::Make => "Make",
            EntityKind::GpsLocation => "GpsLocation",
            EntityKind::ExposedRoll => "ExposedRoll",
            EntityKind::Exposure => "Exposure",
            EntityKind::Film => "Film",
            EntityKind::Lens => "Lens",
            EntityKind::Artist => "Artist",
        }
    }

    /// Finds the kind from its export name
    pub fn from_name(name: &str) -> Option<EntityKind> {
        EntityKind::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A borrowed record of any kind, for heterogeneous iteration
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Camera(&'a Camera),
    Make(&'a Make),
    GpsLocation(&'a GpsLocation),
    ExposedRoll(&'a ExposedRoll),
    Exposure(&'a Exposure),
    Film(&'a Film),
    Lens(&'a Lens),
    Artist(&'a Artist),
}

impl<'a> EntityRef<'a> {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRef::Camera(_) => EntityKind::Camera,
            EntityRef::Make(_) => EntityKind::Make,
            EntityRef::GpsLocation(_) => EntityKind::GpsLocation,
            EntityRef::ExposedRoll(_) => EntityKind::ExposedRoll,
            EntityRef::Exposure(_) => EntityKind::Exposure,
            EntityRef::Film(_) => EntityKind::Film,
            EntityRef::Lens(_) => EntityKind::Lens,
            EntityRef::Artist(_) => EntityKind::Artist,
        }
    }

    /// Artists have no id
    pub fn id(&self) -> Option<EntityId> {
        match self {
            EntityRef::Camera(o) => Some(o.id),
            EntityRef::Make(o) => Some(o.id),
            EntityRef::GpsLocation(o) => Some(o.id),
            EntityRef::ExposedRoll(o) => Some(o.id),
            EntityRef::Exposure(o) => Some(o.id),
            EntityRef::Film(o) => Some(o.id),
            EntityRef::Lens(o) => Some(o.id),
            EntityRef::Artist(_) => None,
        }
    }
}

impl std::fmt::Display for EntityRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.id() {
            Some(id) => write!(f, "{} {}", self.kind(), id),
            None => write!(f, "{}", self.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(EntityKind::from_name("Roll"), None);
    }

    #[test]
    fn test_entity_ref() {
        let lens = Lens {
            id: 12,
            ..Default::default()
        };
        let artist = Artist {
            name: "Jane".to_string(),
        };

        assert_eq!(EntityRef::Lens(&lens).to_string(), "Lens 12");
        assert_eq!(EntityRef::Artist(&artist).id(), None);
        assert_eq!(EntityRef::Artist(&artist).to_string(), "Artist");
    }
}
