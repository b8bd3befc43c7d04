use crate::entity::Bcache;
use crate::error::BlockplanError;
use crate::resolver::resolve;
use crate::store::EntityStore;
use block_external as external;

/// Realizes a `bcache` record: pairs a backing device with a cache device.
/// `ptable` is always rejected — the rejection message mentions LVM, which
/// reads like a copy-paste from the lvm_partition handler, but the rejection
/// itself is correct and kept verbatim.
pub fn handle(store: &EntityStore, bcache: &Bcache) -> Result<(), BlockplanError> {
    if bcache.ptable.is_some() {
        return Err(BlockplanError::Unsupported {
            id: bcache.id.clone(),
            why: "a partition table cannot be placed on a logical volume".into(),
        });
    }

    let backing = resolve(store, &bcache.backing_device)?;
    let cache = resolve(store, &bcache.cache_device)?;

    external::modprobe_bcache()?;
    external::make_bcache(&backing, &cache)?;

    if resolve(store, &bcache.id).is_err() {
        debug!("bcache node did not appear automatically; registering devices manually");
        let _ = external::register(&backing);
        let _ = external::register(&cache);
        resolve(store, &bcache.id)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use serde_json::json;

    fn entity(value: serde_json::Value) -> Entity { serde_json::from_value(value).unwrap() }

    #[test]
    fn ptable_is_rejected_before_resolving_either_device() {
        let store = EntityStore::new(vec![
            entity(json!({"id": "sda1", "type": "disk", "path": "/dev/sda1"})),
            entity(json!({"id": "sdb1", "type": "disk", "path": "/dev/sdb1"})),
            entity(json!({
                "id": "bcache0", "type": "bcache", "backing_device": "sda1",
                "cache_device": "sdb1", "ptable": "gpt"
            })),
        ])
        .unwrap();

        let bcache = match store.get("bcache0").unwrap() {
            Entity::Bcache(bcache) => bcache,
            _ => unreachable!(),
        };

        let err = handle(&store, bcache).unwrap_err();
        assert!(matches!(err, BlockplanError::Unsupported { .. }));
    }
}
