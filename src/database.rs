//! The in-memory relational model of an export

use std::collections::BTreeMap;
use std::path::Path;

use log::{debug, info};
use serde::Serialize;

use crate::base::EntityId;
use crate::error::Result;
use crate::import::{import_file, ImportReport};
use crate::index::{IdCollision, IdIndex, Indices};
use crate::model::{
    Artist, Camera, EntityKind, EntityRef, ExposedRoll, Exposure, Film, GpsLocation, Lens, Make,
};

/// Entity sequences (in document order) and their id indices
#[derive(Serialize, Debug, Default)]
pub struct Database {
    /// Version attribute of the export root
    pub version: String,
    pub cameras: Vec<Camera>,
    pub makes: Vec<Make>,
    pub gps_locations: Vec<GpsLocation>,
    pub exposed_rolls: Vec<ExposedRoll>,
    pub exposures: Vec<Exposure>,
    pub films: Vec<Film>,
    pub lenses: Vec<Lens>,
    pub artists: Vec<Artist>,

    #[serde(skip)]
    indices: Indices,
}

impl Database {
    /// Imports an export and builds its indices
    pub fn open(path: &Path) -> Result<(Database, ImportReport)> {
        let (mut db, mut report) = import_file(path)?;
        report.collisions = db.build_indices();
        Ok((db, report))
    }

    /// Builds the id -> record maps for the indexable kinds
    ///
    /// Returns the id collisions; in each case the last record wins.
    /// Building again starts from scratch.
    pub fn build_indices(&mut self) -> Vec<IdCollision> {
        let mut collisions = Vec::new();

        self.indices = Indices {
            cameras: IdIndex::build(EntityKind::Camera, &self.cameras, |o| o.id, &mut collisions),
            makes: IdIndex::build(EntityKind::Make, &self.makes, |o| o.id, &mut collisions),
            gps_locations: IdIndex::build(
                EntityKind::GpsLocation,
                &self.gps_locations,
                |o| o.id,
                &mut collisions,
            ),
            rolls: IdIndex::build(
                EntityKind::ExposedRoll,
                &self.exposed_rolls,
                |o| o.id,
                &mut collisions,
            ),
            films: IdIndex::build(EntityKind::Film, &self.films, |o| o.id, &mut collisions),
            lenses: IdIndex::build(EntityKind::Lens, &self.lenses, |o| o.id, &mut collisions),
        };

        info!(
            "Indexed {} cameras, {} makes, {} locations, {} rolls, {} films, {} lenses ({} collisions)",
            self.cameras.len(),
            self.makes.len(),
            self.gps_locations.len(),
            self.exposed_rolls.len(),
            self.films.len(),
            self.lenses.len(),
            collisions.len()
        );

        collisions
    }

    pub fn camera(&self, id: EntityId) -> Option<&Camera> {
        self.indices.cameras.get(id).and_then(|ix| self.cameras.get(ix))
    }

    pub fn make(&self, id: EntityId) -> Option<&Make> {
        self.indices.makes.get(id).and_then(|ix| self.makes.get(ix))
    }

    pub fn gps_location(&self, id: EntityId) -> Option<&GpsLocation> {
        self.indices
            .gps_locations
            .get(id)
            .and_then(|ix| self.gps_locations.get(ix))
    }

    pub fn roll(&self, id: EntityId) -> Option<&ExposedRoll> {
        self.indices.rolls.get(id).and_then(|ix| self.exposed_rolls.get(ix))
    }

    pub fn film(&self, id: EntityId) -> Option<&Film> {
        self.indices.films.get(id).and_then(|ix| self.films.get(ix))
    }

    pub fn lens(&self, id: EntityId) -> Option<&Lens> {
        self.indices.lenses.get(id).and_then(|ix| self.lenses.get(ix))
    }

    /// The artist of the export (only the first one is meaningful)
    pub fn artist(&self) -> Option<&Artist> {
        self.artists.first()
    }

    /// Name of a maker, if the id resolves
    pub fn make_name(&self, id: EntityId) -> Option<&str> {
        self.make(id).map(|mk| mk.name.as_str())
    }

    /// Exposures of a roll, in document order
    ///
    /// Membership is computed by scanning all the exposures. The list is
    /// empty when `roll_id` is not the id of an indexed roll, even if some
    /// exposures reference it.
    pub fn exposures_for_roll(&self, roll_id: EntityId) -> Vec<&Exposure> {
        if self.roll(roll_id).is_none() {
            return Vec::new();
        }
        self.exposures
            .iter()
            .filter(|exp| exp.roll_id == roll_id)
            .collect()
    }

    /// Every record, kind by kind, each kind in document order
    pub fn entities(&self) -> impl Iterator<Item = EntityRef<'_>> {
        self.cameras
            .iter()
            .map(EntityRef::Camera)
            .chain(self.makes.iter().map(EntityRef::Make))
            .chain(self.gps_locations.iter().map(EntityRef::GpsLocation))
            .chain(self.exposed_rolls.iter().map(EntityRef::ExposedRoll))
            .chain(self.exposures.iter().map(EntityRef::Exposure))
            .chain(self.films.iter().map(EntityRef::Film))
            .chain(self.lenses.iter().map(EntityRef::Lens))
            .chain(self.artists.iter().map(EntityRef::Artist))
    }

    /// Number of records of a kind
    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Camera => self.cameras.len(),
            EntityKind::Make => self.makes.len(),
            EntityKind::GpsLocation => self.gps_locations.len(),
            EntityKind::ExposedRoll => self.exposed_rolls.len(),
            EntityKind::Exposure => self.exposures.len(),
            EntityKind::Film => self.films.len(),
            EntityKind::Lens => self.lenses.len(),
            EntityKind::Artist => self.artists.len(),
        }
    }

    /// Ids used by records of more than one kind
    ///
    /// The export numbers each kind separately, so this is informational.
    pub fn shared_ids(&self) -> BTreeMap<EntityId, Vec<EntityKind>> {
        let mut kinds_by_id: BTreeMap<EntityId, Vec<EntityKind>> = BTreeMap::new();
        for entity in self.entities() {
            if let Some(id) = entity.id() {
                let kinds = kinds_by_id.entry(id).or_default();
                if !kinds.contains(&entity.kind()) {
                    kinds.push(entity.kind());
                }
            }
        }

        kinds_by_id.retain(|id, kinds| {
            let shared = kinds.len() > 1;
            if shared {
                debug!("Id {} is used by {:?}", id, kinds);
            }
            shared
        });
        kinds_by_id
    }
}
