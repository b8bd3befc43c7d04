use crate::entity::{Entity, Mount};
use crate::environment::Environment;
use crate::error::BlockplanError;
use crate::resolver::resolve;
use crate::store::EntityStore;
use block_external::exec;
use block_tabfiles::{uuid_of, FstabEntry, FstabLocation, SideFiles};
use std::fs;

/// Realizes a `mount` record: mounts the referenced volume under the target
/// root (skipped for swap) and appends one fstab line.
pub fn handle(
    store: &EntityStore,
    environment: &Environment,
    mount: &Mount,
) -> Result<(), BlockplanError> {
    let format = match store.require(&mount.id, &mount.device)? {
        Entity::Format(format) => format,
        _ => {
            return Err(BlockplanError::Config {
                id: mount.id.clone(),
                why: format!("'{}' is not a format entity", mount.device),
            })
        }
    };

    let volume_path = resolve(store, &format.volume)?;
    let is_swap = format.fstype == "swap";

    if !is_swap {
        let relative = mount.path.as_deref().ok_or_else(|| BlockplanError::Config {
            id: mount.id.clone(),
            why: "mount path is required unless the format's fstype is swap".into(),
        })?;

        let mountpoint = environment.target.join(relative.trim_start_matches('/'));
        fs::create_dir_all(&mountpoint)?;

        exec(
            "mount",
            None,
            None,
            &[volume_path.clone().into(), mountpoint.clone().into()],
        )?;
    }

    let location = location_for(store, &format.volume, &volume_path)?;

    let entry = FstabEntry {
        location,
        path: if is_swap { None } else { mount.path.as_deref().map(|p| p.trim_start_matches('/').to_owned()) },
        fstype: format.fstype.clone(),
    };

    let side_files = SideFiles::new(environment.fstab.clone());
    side_files.write_fstab_line(&entry)?;

    Ok(())
}

/// §6: the fstab location is a resolved device path for `raid`, `bcache` and
/// `lvm_partition` volumes, and a `UUID=` reference for `partition` and
/// `dm_crypt` volumes (nodes that can shift across boots).
fn location_for(
    store: &EntityStore,
    volume_id: &str,
    volume_path: &std::path::Path,
) -> Result<FstabLocation, BlockplanError> {
    let volume = store.require(volume_id, volume_id)?;
    match volume {
        Entity::Raid(_) | Entity::Bcache(_) | Entity::LvmPartition(_) => {
            Ok(FstabLocation::Path(volume_path.to_path_buf()))
        }
        Entity::Partition(_) | Entity::DmCrypt(_) => {
            let uuid = uuid_of(volume_path).ok_or_else(|| BlockplanError::ResolutionFailed {
                id: volume_id.to_owned(),
                why: "could not determine filesystem UUID".into(),
            })?;
            Ok(FstabLocation::Uuid(uuid))
        }
        other => Err(BlockplanError::Config {
            id: volume_id.to_owned(),
            why: format!("entity type '{}' is not a valid mount volume", other.type_name()),
        }),
    }
}
