use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use crate::disclosure::{self, DisclosureRecord};
use crate::hospital::HospitalId;
use crate::storage::{StoragePaths, file_present_nonempty};

static EMPTY_INDEX: LazyLock<PriceIndex> = LazyLock::new(PriceIndex::default);

/// Billing code -> record for one hospital. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct PriceIndex {
    records: HashMap<String, DisclosureRecord>,
}

impl PriceIndex {
    pub fn get(&self, code: &str) -> Option<&DisclosureRecord> {
        self.records.get(code)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct IndexBuilder {
    records: HashMap<String, DisclosureRecord>,
    duplicates: usize,
}

impl IndexBuilder {
    /// Registers `record` unless its code is already present.
    ///
    /// First write wins on purpose: dual-code files expose the same code through more than one
    /// row, and the earliest row is the one the hospital lists first. Do not switch this to
    /// overwrite. Returns whether the record was inserted.
    pub fn insert_if_absent(&mut self, record: DisclosureRecord) -> bool {
        if self.records.contains_key(&record.code) {
            self.duplicates += 1;
            return false;
        }
        self.records.insert(record.code.clone(), record);
        true
    }

    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    pub fn finish(self) -> PriceIndex {
        PriceIndex {
            records: self.records,
        }
    }
}

/// Every hospital's price index, loaded once at startup and shared read-only.
#[derive(Debug, Default)]
pub struct PriceBook {
    indices: BTreeMap<HospitalId, PriceIndex>,
}

impl PriceBook {
    /// Loads each hospital's disclosure file independently.
    ///
    /// A hospital whose file is missing or malformed is logged and gets an empty index; it never
    /// stops the others from loading.
    pub fn load(paths: &StoragePaths) -> Self {
        let mut indices = BTreeMap::new();
        for (hospital, path) in paths.disclosure_files() {
            tracing::info!(
                "Loading {} procedures from {}",
                hospital.display_name(),
                path.display()
            );
            let index = if !file_present_nonempty(&path) {
                tracing::error!(
                    "Disclosure file for {} missing or empty at {}",
                    hospital,
                    path.display()
                );
                PriceIndex::default()
            } else {
                match disclosure::load(&path, hospital.layout()) {
                    Ok(index) => index,
                    Err(e) => {
                        tracing::error!("Failed loading {} disclosure: {:#}", hospital, e);
                        PriceIndex::default()
                    }
                }
            };
            if index.is_empty() {
                tracing::warn!(
                    "No priced procedures loaded for {}; its lookups will resolve empty",
                    hospital.display_name()
                );
            }
            indices.insert(hospital, index);
        }
        Self { indices }
    }

    #[cfg(test)]
    pub fn from_indices(indices: impl IntoIterator<Item = (HospitalId, PriceIndex)>) -> Self {
        Self {
            indices: indices.into_iter().collect(),
        }
    }

    /// The hospital's index, or an empty one when nothing was loaded for it.
    pub fn index(&self, hospital: HospitalId) -> &PriceIndex {
        self.indices.get(&hospital).unwrap_or(&*EMPTY_INDEX)
    }

    pub fn procedures_loaded(&self, hospital: HospitalId) -> usize {
        self.index(hospital).len()
    }
}
