//! Identifier generation and the slot → entity identity cache.
//!
//! Entities keep one identifier per slot key for the lifetime of the
//! [`IdentityCache`]; intents, parameters and utterances draw fresh ones
//! from the [`IdGenerator`].

use std::path::Path;

use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use crate::error::{ExportResult, IdentityError};

/// Source of random (v4) UUIDs.
///
/// Seeded from the OS by default; [`IdGenerator::seeded`] makes every
/// generated identifier reproducible.
#[derive(Debug)]
pub struct IdGenerator {
    rng: StdRng,
}

impl IdGenerator {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw a fresh v4 UUID.
    pub fn next_id(&mut self) -> Uuid {
        let bytes: [u8; 16] = self.rng.r#gen();
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::from_entropy()
    }
}

/// Slot identity key → entity identifier. Entries are never removed.
#[derive(Debug, Default, Clone)]
pub struct IdentityCache {
    entries: IndexMap<String, Uuid>,
}

impl IdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the identifier for `slot_key`, allocating one on first sight.
    pub fn resolve(&mut self, slot_key: &str, ids: &mut IdGenerator) -> Uuid {
        if let Some(id) = self.entries.get(slot_key) {
            return *id;
        }
        let id = ids.next_id();
        self.entries.insert(slot_key.to_string(), id);
        id
    }

    pub fn get(&self, slot_key: &str) -> Option<Uuid> {
        self.entries.get(slot_key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Restore a cache saved with [`IdentityCache::save`].
    ///
    /// A missing file yields an empty cache.
    pub fn load(path: &Path) -> ExportResult<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no identity cache yet, starting empty");
                return Ok(Self::new());
            }
            Err(source) => {
                return Err(IdentityError::Io {
                    path: path.display().to_string(),
                    source,
                }
                .into());
            }
        };
        let entries: IndexMap<String, Uuid> =
            serde_json::from_str(&content).map_err(|e| IdentityError::Corrupt {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        tracing::debug!(entries = entries.len(), path = %path.display(), "loaded identity cache");
        Ok(Self { entries })
    }

    /// Persist all entries as a JSON object.
    pub fn save(&self, path: &Path) -> ExportResult<()> {
        let json = serde_json::to_string_pretty(&self.entries).map_err(|e| {
            IdentityError::Corrupt {
                path: path.display().to_string(),
                message: e.to_string(),
            }
        })?;
        std::fs::write(path, json).map_err(|source| IdentityError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportError;

    #[test]
    fn same_key_resolves_to_same_id() {
        let mut ids = IdGenerator::from_entropy();
        let mut cache = IdentityCache::new();
        let a = cache.resolve("slot-1", &mut ids);
        let b = cache.resolve("slot-1", &mut ids);
        assert_eq!(a, b);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn distinct_keys_resolve_to_distinct_ids() {
        let mut ids = IdGenerator::from_entropy();
        let mut cache = IdentityCache::new();
        let a = cache.resolve("slot-1", &mut ids);
        let b = cache.resolve("slot-2", &mut ids);
        assert_ne!(a, b);
    }

    #[test]
    fn generated_ids_are_v4() {
        let mut ids = IdGenerator::seeded(7);
        let id = ids.next_id();
        assert_eq!(id.get_version_num(), 4);
    }

    #[test]
    fn seeded_generators_are_reproducible() {
        let mut a = IdGenerator::seeded(42);
        let mut b = IdGenerator::seeded(42);
        for _ in 0..5 {
            assert_eq!(a.next_id(), b.next_id());
        }
    }

    #[test]
    fn cache_survives_save_and_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ids.json");
        let mut ids = IdGenerator::from_entropy();

        let mut cache = IdentityCache::new();
        let first = cache.resolve("slot-1", &mut ids);
        cache.save(&path).unwrap();

        let mut restored = IdentityCache::load(&path).unwrap();
        assert_eq!(restored.get("slot-1"), Some(first));
        assert_eq!(restored.resolve("slot-1", &mut ids), first);
    }

    #[test]
    fn missing_cache_file_is_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let cache = IdentityCache::load(&dir.path().join("absent.json")).unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn corrupt_cache_file_is_reported() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ids.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();
        let err = IdentityCache::load(&path).unwrap_err();
        assert!(matches!(
            err,
            ExportError::Identity(IdentityError::Corrupt { .. })
        ));
    }
}
