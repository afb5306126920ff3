use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::record::EntityRecord;

/// Append-only builder for one entity pool. Rejects duplicate identifiers.
#[derive(Debug, Clone)]
pub struct PoolBuilder {
    entity: String,
    records: Vec<EntityRecord>,
    index: BTreeMap<String, usize>,
}

impl PoolBuilder {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            records: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    pub fn push(&mut self, record: EntityRecord) -> Result<()> {
        if self.index.contains_key(record.id()) {
            return Err(Error::DuplicateId {
                entity: self.entity.clone(),
                id: record.id().to_string(),
            });
        }
        self.index.insert(record.id().to_string(), self.records.len());
        self.records.push(record);
        Ok(())
    }

    /// Freeze the builder into an immutable pool.
    pub fn freeze(self) -> EntityPool {
        EntityPool {
            entity: self.entity,
            records: self.records,
            index: self.index,
        }
    }
}

/// Frozen, ordered collection of generated records of one entity type.
///
/// Insertion order is preserved for reproducibility but carries no semantic
/// meaning. The only post-freeze mutation allowed is writing the derived
/// `depends_on` and `critical` fields during the scheduling phase.
#[derive(Debug, Clone)]
pub struct EntityPool {
    entity: String,
    records: Vec<EntityRecord>,
    index: BTreeMap<String, usize>,
}

impl EntityPool {
    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[EntityRecord] {
        &self.records
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&EntityRecord> {
        self.index.get(id).map(|position| &self.records[*position])
    }

    /// Mutable access for the derived-field write pass of the scheduling
    /// phase; base fields must not be rewritten through this handle.
    pub fn record_mut(&mut self, id: &str) -> Option<&mut EntityRecord> {
        let position = *self.index.get(id)?;
        self.records.get_mut(position)
    }

    /// Mutable sweep over all records, for the critical-flag write pass.
    pub fn records_mut(&mut self) -> &mut [EntityRecord] {
        &mut self.records
    }
}

/// Frozen pools keyed by entity type; the cross-entity lookup context for
/// reference wiring.
#[derive(Debug, Default, Clone)]
pub struct PoolSet {
    pools: BTreeMap<String, EntityPool>,
}

impl PoolSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pool: EntityPool) {
        self.pools.insert(pool.entity().to_string(), pool);
    }

    pub fn get(&self, entity: &str) -> Option<&EntityPool> {
        self.pools.get(entity)
    }

    pub fn contains(&self, entity: &str) -> bool {
        self.pools.contains_key(entity)
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EntityPool)> {
        self.pools.iter().map(|(name, pool)| (name.as_str(), pool))
    }
}
