//! Dataset store collaborator
//!
//! The entry state machine only talks to the [`VehicleStore`] trait; the
//! bundled [`JsonDataStore`] implements it over a single pretty-printed JSON
//! file holding the records, the brand list, and dataset metadata.

use crate::error::{FaradayError, Result};
use crate::logging::get_logger;
use crate::record::{Brand, VehicleRecord};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Dataset-wide metadata, rewritten on every save
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DatasetMeta {
    /// Last modification time, ISO-8601 UTC
    pub updated_at: String,

    /// Number of vehicle records
    pub overall_count: usize,
}

/// On-disk dataset layout
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Dataset {
    #[serde(default)]
    pub data: Vec<VehicleRecord>,

    #[serde(default)]
    pub brands: Vec<Brand>,

    #[serde(default)]
    pub meta: DatasetMeta,
}

/// Dataset collaborator used by the entry state machine.
///
/// `persist` is the single mutation point; an aborted entry session never
/// calls it.
#[async_trait::async_trait]
pub trait VehicleStore: Send {
    /// Names of all known brands
    async fn existing_brands(&self) -> Result<Vec<String>>;

    /// Distinct model names recorded for a brand
    async fn existing_models(&self, brand: &str) -> Result<Vec<String>>;

    /// Id of the named brand, or a fresh id if the brand is new.
    ///
    /// A fresh id is not registered until a record carrying it is persisted.
    async fn find_or_create_brand_id(&self, brand: &str) -> Result<Uuid>;

    /// Append a finished, validated record to the dataset
    async fn persist(&mut self, record: &VehicleRecord) -> Result<()>;
}

/// JSON-file-backed vehicle store
pub struct JsonDataStore {
    file_path: PathBuf,
    dataset: Dataset,
    logger: crate::logging::StructuredLogger,
}

impl JsonDataStore {
    /// Open a dataset file, creating an empty dataset if the file does not
    /// exist yet.
    pub fn open<P: AsRef<Path>>(file_path: P) -> Result<Self> {
        let logger = get_logger("store");
        let file_path = file_path.as_ref().to_path_buf();

        let dataset = if file_path.exists() {
            let contents = std::fs::read_to_string(&file_path)?;
            let dataset: Dataset = serde_json::from_str(&contents)?;
            logger.info(&format!(
                "Loaded dataset with {} record(s) and {} brand(s)",
                dataset.data.len(),
                dataset.brands.len()
            ));
            dataset
        } else {
            logger.info("No dataset file found, starting empty");
            Dataset::default()
        };

        Ok(Self {
            file_path,
            dataset,
            logger,
        })
    }

    /// The loaded dataset
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    fn write_to_file(&self) -> Result<()> {
        if let Some(parent) = self.file_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&self.dataset)?;
        std::fs::write(&self.file_path, contents)?;
        Ok(())
    }

    fn update_meta(&mut self) {
        self.dataset.meta = DatasetMeta {
            updated_at: Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            overall_count: self.dataset.data.len(),
        };
    }
}

#[async_trait::async_trait]
impl VehicleStore for JsonDataStore {
    async fn existing_brands(&self) -> Result<Vec<String>> {
        Ok(self
            .dataset
            .brands
            .iter()
            .map(|brand| brand.name.clone())
            .collect())
    }

    async fn existing_models(&self, brand: &str) -> Result<Vec<String>> {
        let mut models: Vec<String> = self
            .dataset
            .data
            .iter()
            .filter(|record| record.brand == brand)
            .map(|record| record.model.clone())
            .collect();
        models.sort();
        models.dedup();
        Ok(models)
    }

    async fn find_or_create_brand_id(&self, brand: &str) -> Result<Uuid> {
        match self
            .dataset
            .brands
            .iter()
            .find(|existing| existing.name == brand)
        {
            Some(existing) => Ok(existing.id),
            None => Ok(Uuid::new_v4()),
        }
    }

    async fn persist(&mut self, record: &VehicleRecord) -> Result<()> {
        self.dataset.data.push(record.clone());

        let brand_known = self
            .dataset
            .brands
            .iter()
            .any(|brand| brand.name == record.brand);
        if !brand_known {
            self.dataset.brands.push(Brand {
                id: record.brand_id,
                name: record.brand.clone(),
            });
            self.dataset.brands.sort_by(|a, b| a.name.cmp(&b.name));
        }

        self.update_meta();
        self.write_to_file().map_err(|e| {
            FaradayError::store(format!(
                "Failed to write dataset to {}: {e}",
                self.file_path.display()
            ))
        })?;

        self.logger.info(&format!(
            "Persisted {} {} ({} record(s) total)",
            record.brand,
            record.model,
            self.dataset.data.len()
        ));
        Ok(())
    }
}
