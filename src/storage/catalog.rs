//! Catalog of named key-value stores described by a JSON manifest.
//!
//! A catalog directory holds index files plus a `manifest.json`:
//!
//! ```json
//! {
//!   "stores": {
//!     "meanings.valueIdToParent": {
//!       "keys": "meanings.valIds",
//!       "values": "meanings.mainIds",
//!       "len": 3
//!     }
//!   }
//! }
//! ```
//!
//! Paths are relative to the catalog directory. All stores are opened
//! eagerly so a broken index fails at startup rather than on first query.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{FuzzdexError, Result};
use crate::storage::column::LoadOptions;
use crate::storage::kv::SortedKeyValueStore;

/// File name of the manifest inside a catalog directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Where one store's columns live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreEntry {
    pub keys: String,
    pub values: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values2: Option<String>,
    /// Expected element count, checked on open when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub len: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogManifest {
    #[serde(default)]
    pub stores: BTreeMap<String, StoreEntry>,
}

impl CatalogManifest {
    /// Read `manifest.json` from `dir`.
    pub fn read<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let json = fs::read_to_string(dir.as_ref().join(MANIFEST_FILE))?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Write `manifest.json` into `dir`.
    pub fn write<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(dir.as_ref().join(MANIFEST_FILE), json)?;
        Ok(())
    }
}

/// All stores of a catalog directory, opened and validated.
#[derive(Debug)]
pub struct Catalog {
    dir: PathBuf,
    stores: BTreeMap<String, SortedKeyValueStore>,
}

impl Catalog {
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        Self::open_with(dir, &LoadOptions::default())
    }

    pub fn open_with<P: AsRef<Path>>(dir: P, options: &LoadOptions) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let manifest = CatalogManifest::read(&dir)?;

        let mut stores = BTreeMap::new();
        for (name, entry) in manifest.stores {
            let store = open_entry(&dir, &name, &entry, options)?;
            stores.insert(name, store);
        }

        info!(dir = %dir.display(), stores = stores.len(), "opened catalog");
        Ok(Catalog { dir, stores })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The store registered under `name`.
    pub fn store(&self, name: &str) -> Result<&SortedKeyValueStore> {
        self.stores
            .get(name)
            .ok_or_else(|| FuzzdexError::not_found(format!("no store named {name:?}")))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.stores.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

fn open_entry(
    dir: &Path,
    name: &str,
    entry: &StoreEntry,
    options: &LoadOptions,
) -> Result<SortedKeyValueStore> {
    let mut store = SortedKeyValueStore::open_with(
        dir.join(&entry.keys),
        dir.join(&entry.values),
        options,
    )?;
    if let Some(values2) = &entry.values2 {
        store = store.with_secondary_file(dir.join(values2), options)?;
    }
    if let Some(expected) = entry.len {
        if store.len() != expected {
            return Err(FuzzdexError::format(format!(
                "store {name:?} has {} entries, manifest declares {expected}",
                store.len()
            )));
        }
    }
    Ok(store)
}
