use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::hospital::HospitalId;

#[derive(Debug, Clone)]
pub struct StoragePaths {
    pub data_dir: PathBuf,
    overrides: BTreeMap<HospitalId, PathBuf>,
}

impl StoragePaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            overrides: BTreeMap::new(),
        }
    }

    /// Points one hospital at an explicit file instead of `<data_dir>/<default file name>`.
    pub fn with_override(mut self, hospital: HospitalId, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.overrides.insert(hospital, path);
        }
        self
    }

    pub fn disclosure_file(&self, hospital: HospitalId) -> PathBuf {
        self.overrides
            .get(&hospital)
            .cloned()
            .unwrap_or_else(|| self.data_dir.join(hospital.default_file_name()))
    }

    pub fn disclosure_files(&self) -> Vec<(HospitalId, PathBuf)> {
        HospitalId::ALL
            .into_iter()
            .map(|h| (h, self.disclosure_file(h)))
            .collect()
    }
}

pub fn file_present_nonempty(path: &Path) -> bool {
    match std::fs::metadata(path) {
        Ok(m) => m.is_file() && m.len() > 0,
        Err(_) => false,
    }
}
