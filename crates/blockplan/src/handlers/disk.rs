use crate::entity::Disk;
use crate::error::BlockplanError;
use crate::resolver::resolve;
use crate::store::EntityStore;
use crate::sync::sync;
use crate::wipe::{wipe, WipeMode};
use block_external as external;
use block_platform::Bootloader;
use block_types::PartitionTable;
use std::path::Path;

/// Realizes a `disk` record: validates or wipes the disk, then lays a fresh
/// partition table if one is declared.
pub fn handle(store: &EntityStore, disk: &Disk) -> Result<(), BlockplanError> {
    let path = resolve(store, &disk.id)?;
    let preserved = disk.preserve.unwrap_or(false);
    let ptable = parse_ptable(&disk.id, disk.ptable.as_deref(), preserved)?;

    if preserved {
        verify_preserved(&disk.id, &path, ptable)?;
    } else if let Some(mode) = WipeMode::parse(&disk.id, disk.wipe.as_deref())? {
        teardown(&disk.id, &path, mode)?;
    }

    if let Some(ptable) = ptable {
        block_ops::mklabel(&path, ptable)?;
        sync(&path)?;
    }

    Ok(())
}

/// Resolves the `ptable` field. On a from-scratch disk (not preserved) that
/// omits `ptable`, defaults to the table kind matching the host's own boot
/// mode: `gpt` under EFI, `msdos` under BIOS.
fn parse_ptable(
    id: &str,
    ptable: Option<&str>,
    preserved: bool,
) -> Result<Option<PartitionTable>, BlockplanError> {
    match ptable {
        None if preserved => Ok(None),
        None => Ok(Some(match Bootloader::detect() {
            Bootloader::Efi => PartitionTable::Gpt,
            Bootloader::Bios => PartitionTable::Msdos,
        })),
        Some("gpt") => Ok(Some(PartitionTable::Gpt)),
        Some("msdos") | Some("dos") => Ok(Some(PartitionTable::Msdos)),
        Some(other) => Err(BlockplanError::Config {
            id: id.to_owned(),
            why: format!("unknown partition table format '{}'", other),
        }),
    }
}

fn verify_preserved(
    id: &str,
    path: &Path,
    declared: Option<PartitionTable>,
) -> Result<(), BlockplanError> {
    let declared = match declared {
        Some(declared) => declared,
        None => return Ok(()),
    };

    let current = block_ops::parted::partition_table_kind(path).map_err(|why| {
        BlockplanError::PreserveMismatch { id: id.to_owned(), why: why.to_string() }
    })?;

    match current {
        Some(current) if current == declared => Ok(()),
        Some(current) => Err(BlockplanError::PreserveMismatch {
            id: id.to_owned(),
            why: format!("on-disk table is {:?}, declared table is {:?}", current, declared),
        }),
        None => Err(BlockplanError::PreserveMismatch {
            id: id.to_owned(),
            why: "no partition table found on disk".into(),
        }),
    }
}

/// Tears down whatever stack sits on `path` before it is wiped, in the order
/// higher layers must be released before lower ones: LVM, then bcache, then
/// MD, then per-partition superblocks, then the whole disk.
fn teardown(id: &str, path: &Path, mode: WipeMode) -> Result<(), BlockplanError> {
    let partitions = block_ops::existing_partitions(path).map_err(|why| {
        BlockplanError::ResolutionFailed { id: id.to_owned(), why: why.to_string() }
    })?;
    let partition_paths: Vec<_> = partitions.iter().filter_map(|p| p.path.clone()).collect();

    // a) LVM: remove any volume group backed by one of this disk's partitions.
    let pvs = external::pvs().unwrap_or_default();
    let mut removed_groups = std::collections::HashSet::new();
    for partition_path in &partition_paths {
        if let Some(Some(group)) = pvs.get(partition_path) {
            if removed_groups.insert(group.clone()) {
                let _ = external::vgremove(group);
            }
        }
    }
    for partition_path in &partition_paths {
        wipe(partition_path, WipeMode::Pvremove)?;
    }

    // b) bcache: stop any cache set backed by one of this disk's partitions.
    let mut touched_bcache = false;
    for partition_path in &partition_paths {
        if let Some(uuid) = external::super_show_cset_uuid(partition_path) {
            let _ = external::stop_cache_set(&uuid);
            touched_bcache = true;
        }
    }
    if touched_bcache {
        let _ = external::modprobe_remove_bcache();
        for partition_path in &partition_paths {
            wipe(partition_path, WipeMode::Superblock)?;
        }
        let _ = external::modprobe_bcache();
    }

    // c) MD: stop any array assembled from this disk's partitions.
    let _ = external::exec("partprobe", None, None, &[path.into()]);
    if let Ok(scan) = external::scan() {
        for array in external::scan_array_names(&scan) {
            let _ = external::stop(&array);
            let _ = external::remove(&array);
        }
    }

    // d) erase every partition's superblock before the whole-disk wipe.
    for partition_path in &partition_paths {
        wipe(partition_path, WipeMode::Superblock)?;
    }

    // e) finally wipe the disk itself. A bare "no label" failure from parted
    // at this point is not fatal; there was nothing to tear down.
    if let Err(why) = wipe(path, mode) {
        debug!("final disk wipe on {} reported (ignored): {}", path.display(), why);
    }

    Ok(())
}
