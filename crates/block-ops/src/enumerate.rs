use crate::parted::*;
use std::{io, path::PathBuf};

/// A partition already present on a disk's partition table, as reported by libparted.
#[derive(Debug, Clone, PartialEq)]
pub struct ExistingPartition {
    pub number: u32,
    pub start: u64,
    pub end: u64,
    pub path: Option<PathBuf>,
}

/// Lists the partitions currently in the partition table of `device_path`, in
/// ascending partition-number order. Returns an empty list if the device has no
/// partition table at all.
pub fn existing_partitions<P: AsRef<std::path::Path>>(
    device_path: P,
) -> io::Result<Vec<ExistingPartition>> {
    let mut device = match open_device(&device_path) {
        Ok(device) => device,
        Err(why) => return Err(why),
    };

    let disk = match open_disk(&mut device) {
        Ok(disk) => disk,
        Err(_) => return Ok(Vec::new()),
    };

    let mut partitions = Vec::new();
    for part in disk.parts() {
        let number = part.num();
        if number < 1 {
            // Free space / metadata / extended-container pseudo-entries.
            continue;
        }

        partitions.push(ExistingPartition {
            number: number as u32,
            start: part.geom_start() as u64,
            end: part.geom_end() as u64,
            path: part.get_path().map(|p| p.to_path_buf()),
        });
    }

    partitions.sort_by_key(|p| p.number);
    Ok(partitions)
}

/// Returns the partition at 1-based `number`, if the disk's table declares one.
pub fn partition_by_number<P: AsRef<std::path::Path>>(
    device_path: P,
    number: u32,
) -> io::Result<Option<ExistingPartition>> {
    Ok(existing_partitions(device_path)?.into_iter().find(|p| p.number == number))
}
