use std::path::PathBuf;

use log::debug;
use rand::{rngs::StdRng, SeedableRng};
use temp_dir::TempDir;

use crate::documents::{create_export, ExportDocument};
use e4f::{Database, ImportReport};

/// An export written in a temporary directory
pub struct TestExport {
    pub dir: TempDir,
    pub path: PathBuf,
    pub document: ExportDocument,
}

impl TestExport {
    pub fn new(document: ExportDocument) -> Self {
        let dir = TempDir::new().expect("Could not create temporary directory");
        let path = dir.path().join("export.xml");
        std::fs::write(&path, document.to_xml()).expect("Could not write the export");
        debug!("Wrote {} records in {}", document.records.len(), path.display());

        Self {
            dir,
            path,
            document,
        }
    }

    /// Random export (see [`create_export`])
    pub fn random(roll_count: usize, lambda_exposures: f32, seed: Option<u64>) -> Self {
        let mut rng = if let Some(seed) = seed {
            StdRng::seed_from_u64(seed)
        } else {
            StdRng::from_entropy()
        };
        Self::new(create_export(roll_count, lambda_exposures, &mut rng))
    }

    /// Imports the export and builds the indices
    pub fn open(&self) -> (Database, ImportReport) {
        Database::open(&self.path).expect("Error while importing the export")
    }
}
