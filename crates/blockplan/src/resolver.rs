use crate::entity::Entity;
use crate::error::BlockplanError;
use crate::store::EntityStore;
use crate::sync::sync;
use std::{
    fs, io,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

/// Recursively maps an entity id to the device node that realizes it, per the
/// per-type rules, then waits for that node to settle before returning it.
pub fn resolve(store: &EntityStore, id: &str) -> Result<PathBuf, BlockplanError> {
    let entity = store.get(id).ok_or_else(|| BlockplanError::UnknownEntity {
        referrer: id.to_owned(),
        id: id.to_owned(),
    })?;

    let path = match entity {
        Entity::Disk(disk) => resolve_disk(disk.serial.as_deref(), disk.path.as_deref(), id)?,
        Entity::Partition(partition) => {
            let parent = resolve(store, &partition.device)?;
            let number = store.partition_number(partition);
            let existing = block_ops::partition_by_number(&parent, number).map_err(|why| {
                BlockplanError::ResolutionFailed { id: id.to_owned(), why: why.to_string() }
            })?;
            let existing = existing.ok_or_else(|| BlockplanError::Config {
                id: id.to_owned(),
                why: format!("no partition at index {} on '{}'", number, partition.device),
            })?;
            existing.path.ok_or_else(|| BlockplanError::ResolutionFailed {
                id: id.to_owned(),
                why: "partition has no device node".into(),
            })?
        }
        Entity::LvmPartition(lvm_partition) => {
            let volgroup = match store.require(id, &lvm_partition.volgroup)? {
                Entity::LvmVolgroup(volgroup) => volgroup,
                _ => {
                    return Err(BlockplanError::Config {
                        id: id.to_owned(),
                        why: format!("'{}' is not an lvm_volgroup", lvm_partition.volgroup),
                    })
                }
            };
            PathBuf::from(format!("/dev/{}/{}", volgroup.name, lvm_partition.name))
        }
        Entity::DmCrypt(dm_crypt) => PathBuf::from(format!("/dev/mapper/{}", dm_crypt.dm_name())),
        Entity::Raid(_) => PathBuf::from(format!("/dev/{}", id)),
        Entity::Bcache(bcache) => {
            let backing = resolve(store, &bcache.backing_device)?;
            resolve_bcache(&backing, id)?
        }
        Entity::Format(_) | Entity::Mount(_) | Entity::LvmVolgroup(_) => {
            return Err(BlockplanError::Config {
                id: id.to_owned(),
                why: "this entity type does not have its own device node".into(),
            })
        }
    };

    sync(&path)?;
    Ok(path)
}

/// Resolves a `format` entity's volume, then `mount`'s device-of-a-device, by
/// one extra hop through `resolve`.
pub fn resolve_volume(store: &EntityStore, id: &str) -> Result<PathBuf, BlockplanError> {
    match store.require(id, id)? {
        Entity::Format(format) => resolve(store, &format.volume),
        Entity::Mount(mount) => resolve_volume(store, &mount.device),
        _ => resolve(store, id),
    }
}

fn resolve_disk(serial: Option<&str>, path: Option<&Path>, id: &str) -> Result<PathBuf, BlockplanError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }

    let serial = serial.ok_or_else(|| BlockplanError::Config {
        id: id.to_owned(),
        why: "neither 'serial' nor 'path' is set".into(),
    })?;

    let by_id = Path::new("/dev/disk/by-id");
    let entries = fs::read_dir(by_id).map_err(|why| BlockplanError::ResolutionFailed {
        id: id.to_owned(),
        why: why.to_string(),
    })?;

    for entry in entries {
        let entry = entry.map_err(|why| BlockplanError::ResolutionFailed {
            id: id.to_owned(),
            why: why.to_string(),
        })?;

        let candidate = fs::canonicalize(entry.path()).unwrap_or_else(|_| entry.path());
        if let Ok(found) = get_serial(&candidate) {
            if found == serial {
                return Ok(candidate);
            }
        }
    }

    Err(BlockplanError::ResolutionFailed {
        id: id.to_owned(),
        why: format!("no disk with serial '{}' found", serial),
    })
}

/// Queries `udevadm` for a device's `ID_SERIAL`, the same probe distinst's
/// disk detector uses.
fn get_serial(path: &Path) -> io::Result<String> {
    let output = Command::new("udevadm")
        .arg("info")
        .arg("--query=all")
        .arg("--name")
        .arg(path)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()?;

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .find_map(|line| line.strip_prefix("E: ID_SERIAL=").map(str::to_owned))
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "ID_SERIAL not reported"))
}

/// Finds the bcache node whose `slaves/` entry matches the backing device's
/// kernel name. Fragile string match, kept faithful to the system being
/// modeled: a future revision could instead read `cset.uuid` directly from
/// `bcache-super-show`.
fn resolve_bcache(backing: &Path, id: &str) -> Result<PathBuf, BlockplanError> {
    let kname = backing
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| BlockplanError::ResolutionFailed {
            id: id.to_owned(),
            why: format!("backing device path {:?} has no basename", backing),
        })?;

    let block_dir = Path::new("/sys/block");
    let entries = fs::read_dir(block_dir).map_err(|why| BlockplanError::ResolutionFailed {
        id: id.to_owned(),
        why: why.to_string(),
    })?;

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => continue,
        };

        let name = entry.file_name();
        let name = name.to_string_lossy();
        if !name.starts_with("bcache") {
            continue;
        }

        let slaves = entry.path().join("slaves");
        let slave_entries = match fs::read_dir(&slaves) {
            Ok(entries) => entries,
            Err(_) => continue,
        };

        for slave in slave_entries.flatten() {
            if slave.file_name().to_string_lossy() == kname {
                return Ok(PathBuf::from(format!("/dev/{}", name)));
            }
        }
    }

    Err(BlockplanError::ResolutionFailed {
        id: id.to_owned(),
        why: format!("no bcache node found backed by {:?}", backing),
    })
}
