//! Id lookup tables over the imported record sequences

use std::collections::HashMap;
use std::fmt;

use log::{debug, warn};
use serde::Serialize;

use crate::base::{EntityId, Len, NO_REFERENCE};
use crate::model::EntityKind;

/// Two records of the same kind sharing an id; the later one wins
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct IdCollision {
    pub kind: EntityKind,
    pub id: EntityId,
    /// Position of the record that was replaced
    pub replaced: usize,
    /// Position of the record now indexed
    pub position: usize,
}

impl fmt::Display for IdCollision {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} present already (record {} replaced by record {})",
            self.kind, self.id, self.replaced, self.position
        )
    }
}

/// Maps entity ids to positions in a record sequence
#[derive(Debug, Clone, Default)]
pub struct IdIndex {
    positions: HashMap<EntityId, usize>,
}

impl IdIndex {
    /// Builds the index of `records`, pushing a diagnostic into
    /// `collisions` for every id seen twice.
    ///
    /// Records without an id cannot be referenced and are left out.
    pub fn build<T>(
        kind: EntityKind,
        records: &[T],
        id_of: impl Fn(&T) -> EntityId,
        collisions: &mut Vec<IdCollision>,
    ) -> Self {
        let mut positions = HashMap::with_capacity(records.len());

        for (position, record) in records.iter().enumerate() {
            let id = id_of(record);
            if id == NO_REFERENCE {
                debug!("{} record {} has no id, not indexed", kind, position);
                continue;
            }

            if let Some(replaced) = positions.insert(id, position) {
                let collision = IdCollision {
                    kind,
                    id,
                    replaced,
                    position,
                };
                warn!("{}", collision);
                collisions.push(collision);
            }
        }

        Self { positions }
    }

    /// Position of the record with this id (the "no reference" id never
    /// resolves)
    pub fn get(&self, id: EntityId) -> Option<usize> {
        if id == NO_REFERENCE {
            return None;
        }
        self.positions.get(&id).copied()
    }
}

impl Len for IdIndex {
    fn len(&self) -> usize {
        self.positions.len()
    }
}

/// All the lookup tables of a database
#[derive(Debug, Clone, Default)]
pub struct Indices {
    pub cameras: IdIndex,
    pub makes: IdIndex,
    pub gps_locations: IdIndex,
    pub rolls: IdIndex,
    pub films: IdIndex,
    pub lenses: IdIndex,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins() {
        let ids = [3, 5, 3, 0, 7];
        let mut collisions = Vec::new();
        let index = IdIndex::build(EntityKind::Make, &ids, |id| *id, &mut collisions);

        assert_eq!(index.len(), 3);
        assert_eq!(index.get(3), Some(2));
        assert_eq!(index.get(5), Some(1));
        assert_eq!(index.get(7), Some(4));
        assert_eq!(index.get(0), None);
        assert_eq!(index.get(42), None);

        assert_eq!(
            collisions,
            vec![IdCollision {
                kind: EntityKind::Make,
                id: 3,
                replaced: 0,
                position: 2,
            }]
        );
    }

    #[test]
    fn test_empty_index_fails_closed() {
        let index = IdIndex::default();
        assert!(index.is_empty());
        assert_eq!(index.get(1), None);
    }
}
