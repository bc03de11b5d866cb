use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::loader;
use super::model::{Dataset, DatasetId, Table};

/// Owns every loaded dataset, in load order.
#[derive(Debug, Default)]
pub struct DatasetRegistry {
    datasets: Vec<Dataset>,
    next_id: u64,
}

impl DatasetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `path` and register the table under the file's base name.
    pub fn load(&mut self, path: &Path) -> EngineResult<&Dataset> {
        let table = loader::load_file(path).map_err(|e| {
            log::error!("Failed to load {}: {e:#}", path.display());
            EngineError::Load(format!("{e:#}"))
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        log::info!(
            "Loaded {} rows with columns {:?} from {}",
            table.len(),
            table.columns(),
            path.display()
        );
        Ok(self.insert(name, path, table))
    }

    /// Register an already-parsed table.
    ///
    /// When a dataset with the same proposed name is already loaded, the new
    /// one is named `"Copy - " + name` (repeated until the name is free),
    /// whether or not the contents match. The same content under another
    /// name is kept as is.
    pub fn insert(&mut self, name: String, source_path: &Path, table: Table) -> &Dataset {
        let mut display_name = name;
        while let Some(existing) = self.find(&display_name) {
            if existing.current == table {
                log::info!("Loaded identical dataset under new name");
            }
            display_name = format!("Copy - {display_name}");
        }

        let id = DatasetId(self.next_id);
        self.next_id += 1;
        self.datasets
            .push(Dataset::new(id, display_name, source_path.to_path_buf(), table));
        &self.datasets[self.datasets.len() - 1]
    }

    /// Remove the dataset with this display name and hand it back.
    pub fn remove(&mut self, display_name: &str) -> EngineResult<Dataset> {
        let idx = self
            .datasets
            .iter()
            .position(|d| d.display_name == display_name)
            .ok_or_else(|| EngineError::DatasetNotFound(display_name.to_string()))?;
        Ok(self.datasets.remove(idx))
    }

    pub fn find(&self, display_name: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.display_name == display_name)
    }

    pub fn get(&self, id: DatasetId) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.id == id)
    }

    pub fn get_mut(&mut self, id: DatasetId) -> Option<&mut Dataset> {
        self.datasets.iter_mut().find(|d| d.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dataset> {
        self.datasets.iter()
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}
