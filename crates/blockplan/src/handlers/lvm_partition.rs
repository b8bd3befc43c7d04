use crate::entity::{Entity, LvmPartition};
use crate::error::BlockplanError;
use crate::sizeunit::SizeSpec;
use crate::store::EntityStore;
use block_external as external;

/// Realizes an `lvm_partition` (logical volume) record. `ptable` is always
/// rejected: a partition table cannot sit on top of a logical volume.
pub fn handle(store: &EntityStore, lvm_partition: &LvmPartition) -> Result<(), BlockplanError> {
    if lvm_partition.ptable.is_some() {
        return Err(BlockplanError::Unsupported {
            id: lvm_partition.id.clone(),
            why: "a partition table cannot be placed on a logical volume".into(),
        });
    }

    let volgroup = match store.require(&lvm_partition.id, &lvm_partition.volgroup)? {
        Entity::LvmVolgroup(volgroup) => volgroup,
        _ => {
            return Err(BlockplanError::Config {
                id: lvm_partition.id.clone(),
                why: format!("'{}' is not an lvm_volgroup", lvm_partition.volgroup),
            })
        }
    };

    if lvm_partition.preserve.unwrap_or(false) {
        let matches = external::lvs(&volgroup.name)
            .map_err(|why| BlockplanError::PreserveMismatch {
                id: lvm_partition.id.clone(),
                why: why.to_string(),
            })?
            .into_iter()
            .any(|path| {
                path.file_name().and_then(|n| n.to_str()).map_or(false, |name| {
                    name.ends_with(&lvm_partition.name.replace('-', "--"))
                })
            });

        return if matches {
            Ok(())
        } else {
            Err(BlockplanError::PreserveMismatch {
                id: lvm_partition.id.clone(),
                why: format!(
                    "no logical volume named '{}' found on volume group '{}'",
                    lvm_partition.name, volgroup.name
                ),
            })
        };
    }

    if volgroup.preserve.unwrap_or(false) {
        return Err(BlockplanError::Unsupported {
            id: lvm_partition.id.clone(),
            why: format!(
                "parent volume group '{}' is preserved but this logical volume is not",
                lvm_partition.volgroup
            ),
        });
    }

    let size = match &lvm_partition.size {
        Some(size) => Some(SizeSpec::parse(&lvm_partition.id, size)?.to_bytes()),
        None => None,
    };

    external::lvcreate(&volgroup.name, &lvm_partition.name, size)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entity(value: serde_json::Value) -> Entity { serde_json::from_value(value).unwrap() }

    #[test]
    fn ptable_is_rejected_before_any_volume_is_created() {
        let store = EntityStore::new(vec![
            entity(json!({"id": "vg0", "type": "lvm_volgroup", "name": "vg0", "devices": []})),
            entity(json!({
                "id": "lv_root", "type": "lvm_partition", "volgroup": "vg0", "name": "lv_root",
                "ptable": "gpt"
            })),
        ])
        .unwrap();

        let lv_root = match store.get("lv_root").unwrap() {
            Entity::LvmPartition(lv) => lv,
            _ => unreachable!(),
        };

        let err = handle(&store, lv_root).unwrap_err();
        assert!(matches!(err, BlockplanError::Unsupported { .. }));
    }
}
