use crate::entity::{Entity, Partition};
use crate::error::BlockplanError;
use std::collections::HashMap;

/// Indexed, insertion-ordered view of the declarative storage configuration.
/// Built once from the config list; never mutated afterward.
#[derive(Debug)]
pub struct EntityStore {
    entities: Vec<Entity>,
    index: HashMap<String, usize>,
}

impl EntityStore {
    /// Builds the store, validating the two invariants that can be checked
    /// without touching the live system: every reference resolves to an
    /// earlier id (the graph is a DAG, §3 invariant 1), and no entity
    /// declares `preserve=true` while its parent does not (the reverse of
    /// the `Unsupported` case the handlers already enforce; see
    /// SPEC_FULL.md's Open Question resolution).
    pub fn new(entities: Vec<Entity>) -> Result<EntityStore, BlockplanError> {
        let mut index = HashMap::with_capacity(entities.len());
        for (position, entity) in entities.iter().enumerate() {
            if index.insert(entity.id().to_owned(), position).is_some() {
                return Err(BlockplanError::Config {
                    id: entity.id().to_owned(),
                    why: "duplicate entity id".into(),
                });
            }
        }

        let store = EntityStore { entities, index };

        for entity in &store.entities {
            for reference in store.references_of(entity) {
                let &target_position = store.index.get(reference).ok_or_else(|| {
                    BlockplanError::UnknownEntity {
                        referrer: entity.id().to_owned(),
                        id: reference.to_owned(),
                    }
                })?;
                let own_position = store.index[entity.id()];
                if target_position >= own_position {
                    return Err(BlockplanError::Config {
                        id: entity.id().to_owned(),
                        why: format!(
                            "references '{}', which is not declared earlier in the sequence",
                            reference
                        ),
                    });
                }
            }

            if entity.preserve() {
                if let Some(parent_id) = entity.single_parent() {
                    // existence was already checked by the loop above.
                    let parent = &store.entities[store.index[parent_id]];
                    if !parent.preserve() {
                        return Err(BlockplanError::Config {
                            id: entity.id().to_owned(),
                            why: format!(
                                "is marked preserve=true, but its parent '{}' is not; a \
                                 preserved entity cannot sit on top of a device that will be \
                                 recreated",
                                parent_id
                            ),
                        });
                    }
                }
            }
        }

        Ok(store)
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.index.get(id).map(|&position| &self.entities[position])
    }

    pub fn require(&self, referrer: &str, id: &str) -> Result<&Entity, BlockplanError> {
        self.get(id).ok_or_else(|| BlockplanError::UnknownEntity {
            referrer: referrer.to_owned(),
            id: id.to_owned(),
        })
    }

    /// Entities in declaration order, the order the executor dispatches them in.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> { self.entities.iter() }

    /// The ids every field of `entity` refers to, used for the forward-reference check.
    fn references_of<'a>(&self, entity: &'a Entity) -> Vec<&'a str> {
        match entity {
            Entity::Disk(_) => Vec::new(),
            Entity::Partition(e) => vec![e.device.as_str()],
            Entity::Format(e) => vec![e.volume.as_str()],
            Entity::Mount(e) => vec![e.device.as_str()],
            Entity::LvmVolgroup(e) => e.devices.iter().map(String::as_str).collect(),
            Entity::LvmPartition(e) => vec![e.volgroup.as_str()],
            Entity::DmCrypt(e) => vec![e.volume.as_str()],
            Entity::Raid(e) => {
                let mut refs: Vec<&str> = e.devices.iter().map(String::as_str).collect();
                if let Some(spares) = &e.spare_devices {
                    refs.extend(spares.iter().map(String::as_str));
                }
                refs
            }
            Entity::Bcache(e) => vec![e.backing_device.as_str(), e.cache_device.as_str()],
        }
    }

    /// The 1-based partition number `partition` should occupy: its declared
    /// `number`, or one past the count of partitions already declared for
    /// the same `device` earlier in the sequence (spec.md §3).
    pub fn partition_number(&self, partition: &Partition) -> u32 {
        if let Some(number) = partition.number {
            return number;
        }

        1 + self
            .entities
            .iter()
            .take_while(|e| e.id() != partition.id)
            .filter(|e| matches!(e, Entity::Partition(p) if p.device == partition.device))
            .count() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entity(value: serde_json::Value) -> Entity { serde_json::from_value(value).unwrap() }

    #[test]
    fn rejects_forward_reference() {
        let entities = vec![entity(json!({
            "id": "sda1", "type": "partition", "device": "sda", "size": "1GiB"
        }))];
        let err = EntityStore::new(entities).unwrap_err();
        assert!(matches!(err, BlockplanError::UnknownEntity { .. }));
    }

    #[test]
    fn rejects_reverse_asymmetric_preserve() {
        let entities = vec![
            entity(json!({"id": "sda", "type": "disk", "path": "/dev/sda", "preserve": false})),
            entity(json!({
                "id": "sda1", "type": "partition", "device": "sda", "size": "1GiB",
                "preserve": true
            })),
        ];
        let err = EntityStore::new(entities).unwrap_err();
        assert!(matches!(err, BlockplanError::Config { .. }));
    }

    #[test]
    fn accepts_well_formed_chain() {
        let entities = vec![
            entity(json!({"id": "sda", "type": "disk", "path": "/dev/sda", "ptable": "gpt"})),
            entity(json!({"id": "sda1", "type": "partition", "device": "sda", "size": "1GiB"})),
        ];
        assert!(EntityStore::new(entities).is_ok());
    }

    #[test]
    fn partition_number_defaults_to_sequence_position() {
        let entities = vec![
            entity(json!({"id": "sda", "type": "disk", "path": "/dev/sda", "ptable": "gpt"})),
            entity(json!({"id": "sda1", "type": "partition", "device": "sda", "size": "1GiB"})),
            entity(json!({"id": "sda2", "type": "partition", "device": "sda", "size": "1GiB"})),
        ];
        let store = EntityStore::new(entities).unwrap();
        let p1 = match store.get("sda1").unwrap() {
            Entity::Partition(p) => p.clone(),
            _ => panic!("expected a partition"),
        };
        let p2 = match store.get("sda2").unwrap() {
            Entity::Partition(p) => p.clone(),
            _ => panic!("expected a partition"),
        };
        assert_eq!(store.partition_number(&p1), 1);
        assert_eq!(store.partition_number(&p2), 2);
    }

    #[test]
    fn partition_number_honors_explicit_value() {
        let entities = vec![
            entity(json!({"id": "sda", "type": "disk", "path": "/dev/sda", "ptable": "gpt"})),
            entity(json!({
                "id": "sda1", "type": "partition", "device": "sda", "size": "1GiB", "number": 3
            })),
        ];
        let store = EntityStore::new(entities).unwrap();
        let p1 = match store.get("sda1").unwrap() {
            Entity::Partition(p) => p.clone(),
            _ => panic!("expected a partition"),
        };
        assert_eq!(store.partition_number(&p1), 3);
    }
}
