//! Import of Exif4Film XML exports and projection of film exposures onto
//! XMP metadata.
//!
//! ```no_run
//! use std::path::Path;
//! use e4f::{project_exposure, Database};
//!
//! let (db, _report) = Database::open(Path::new("export.xml")).unwrap();
//! for roll in db.exposed_rolls.iter() {
//!     for (index, exposure) in db.exposures_for_roll(roll.id).into_iter().enumerate() {
//!         let properties = project_exposure(&db, roll, exposure, index);
//!         println!("{} properties", properties.len());
//!     }
//! }
//! ```

pub mod base;
pub mod coerce;
pub mod database;
pub mod error;
pub mod import;
pub mod index;
pub mod metadata;
pub mod model;
pub mod projection;
pub mod text;

pub use database::Database;
pub use error::{Error, Result};
pub use import::ImportReport;
pub use metadata::xmp::{XmpOptions, XmpPacket};
pub use metadata::{PropertySet, PropertySink};
pub use projection::project_exposure;
