//! Path-keyed memoization of incident loads.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::{IncidentTable, LoadError, LoadOptions, load_incidents};

/// Caches loaded incident tables by file path.
///
/// A path is read at most once per cache. Changes to the file on disk are
/// not detected; a different path is the only thing that triggers a reload.
#[derive(Debug, Default)]
pub struct IncidentCache {
    tables: BTreeMap<PathBuf, IncidentTable>,
}

impl IncidentCache {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tables: BTreeMap::new(),
        }
    }

    /// Returns the table for `path`, loading it on first use.
    ///
    /// Failed loads are not cached.
    ///
    /// # Errors
    ///
    /// Propagates any [`LoadError`] from [`load_incidents`].
    pub fn get_or_load(
        &mut self,
        path: &Path,
        options: &LoadOptions,
    ) -> Result<IncidentTable, LoadError> {
        if let Some(table) = self.tables.get(path) {
            log::debug!("Incident cache hit for {}", path.display());
            return Ok(table.clone());
        }

        let table: IncidentTable = load_incidents(path, options)?.into();
        self.tables.insert(path.to_path_buf(), table.clone());
        Ok(table)
    }

    /// Number of cached tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    const CSV: &str = "LATITUDE;LONGITUDE;DATA_FATO;DESCR_NATUREZA_PRINCIPAL;MUNICIPIO;\
                       CAUSA_PRESUMIDA;DESCRICAO_LOCAL_IMEDIATO;SINTESE\n\
                       -19,95;-44,19;20/06/2025;HOMICIDIO;BETIM;;;\n";

    fn temp_csv(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "crime_tour_cache_{}_{name}.csv",
            std::process::id()
        ));
        std::fs::write(&path, CSV).unwrap();
        path
    }

    #[test]
    fn second_load_does_not_reread_file() {
        let path = temp_csv("reread");
        let mut cache = IncidentCache::new();

        let first = cache.get_or_load(&path, &LoadOptions::default()).unwrap();
        std::fs::remove_file(&path).unwrap();
        let second = cache.get_or_load(&path, &LoadOptions::default()).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn different_path_loads_again() {
        let a = temp_csv("a");
        let b = temp_csv("b");
        let mut cache = IncidentCache::new();

        let first = cache.get_or_load(&a, &LoadOptions::default()).unwrap();
        let second = cache.get_or_load(&b, &LoadOptions::default()).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 2);

        std::fs::remove_file(a).ok();
        std::fs::remove_file(b).ok();
    }

    #[test]
    fn failures_are_not_cached() {
        let mut cache = IncidentCache::new();
        let missing = Path::new("/nonexistent/crime_tour.csv");
        assert!(cache.get_or_load(missing, &LoadOptions::default()).is_err());
        assert!(cache.is_empty());
    }
}
